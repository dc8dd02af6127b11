#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Periodic hazard check for players standing still.
//!
//! Moves already evaluate the destination cell. Explosions may start
//! detonating and hazards may arrive while the player waits, so this system
//! requests a check on a fixed tick cadence as well.

use hitbox_core::{Command, Event, GameState, HAZARD_CHECK_INTERVAL};

/// Pure system that turns the simulation clock into periodic hazard checks.
#[derive(Debug)]
pub struct HazardWatch {
    game_state: GameState,
    interval: u64,
}

impl HazardWatch {
    /// Creates a watch that checks every `interval` ticks.
    ///
    /// A zero interval disables periodic checks.
    #[must_use]
    pub fn with_interval(interval: u64) -> Self {
        Self {
            game_state: GameState::Start,
            interval,
        }
    }

    /// Consumes world events and emits hazard checks when they are due.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::GameStarted { .. } => self.game_state = GameState::Playing,
                Event::ReturnedToStart => self.game_state = GameState::Start,
                Event::TimeAdvanced { tick } => {
                    if self.game_state == GameState::Playing && self.is_due(*tick) {
                        out.push(Command::CheckHazards);
                    }
                }
                _ => {}
            }
        }
    }

    fn is_due(&self, tick: u64) -> bool {
        self.interval != 0 && tick % self.interval == 0
    }
}

impl Default for HazardWatch {
    fn default() -> Self {
        Self::with_interval(HAZARD_CHECK_INTERVAL)
    }
}

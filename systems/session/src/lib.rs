#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game session controller.
//!
//! A [`Session`] owns one world and the systems reacting to it. Every public
//! operation submits a command, then pumps the resulting events through the
//! systems until no further commands are produced, returning the full event
//! log of the operation.

use hitbox_core::{
    CellCoord, Command, Direction, Event, GameState, HazardView, PlayerSnapshot, ShakeEffect,
    TileKind,
};
use hitbox_system_generation::{ConfigError, GenerationConfig, Generator};
use hitbox_system_hazard_watch::HazardWatch;
use hitbox_world::{self as world, query, World};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seed used when a configuration does not name one.
pub const DEFAULT_SEED: u64 = 0x4849_5442_4f58;

/// Everything needed to create a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seed of the first generated world; restarts derive later seeds from it.
    pub seed: u64,
    /// Generator tunables.
    pub generation: GenerationConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            generation: GenerationConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Parses and validates a session configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, SessionError> {
        let config: Self = toml::from_str(contents).map_err(ConfigError::from)?;
        config.generation.validate()?;
        Ok(config)
    }
}

/// Reasons a session may fail to start.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The generation configuration was rejected.
    #[error("invalid generation config")]
    Config(#[from] ConfigError),
}

/// Single-player game session.
#[derive(Debug)]
pub struct Session {
    world: World,
    hazard_watch: HazardWatch,
}

impl Session {
    /// Creates a session on the start screen.
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        let generator = Generator::new(config.generation)?;
        Ok(Self {
            world: World::new(generator, config.seed),
            hazard_watch: HazardWatch::default(),
        })
    }

    /// Leaves the start screen and generates the world.
    pub fn start_game(&mut self) -> Vec<Event> {
        self.submit(Command::StartGame)
    }

    /// Attempts to move the player by the given delta.
    pub fn try_move(&mut self, dx: i32, dy: i32) -> Vec<Event> {
        self.submit(Command::TryMove { dx, dy })
    }

    /// Attempts to move the player one cell in `direction`.
    pub fn step(&mut self, direction: Direction) -> Vec<Event> {
        let (dx, dy) = direction.delta();
        self.try_move(dx, dy)
    }

    /// Advances the simulation by one tick.
    pub fn tick(&mut self) -> Vec<Event> {
        self.submit(Command::Tick)
    }

    /// Regenerates the world from the next derived seed.
    pub fn restart(&mut self) -> Vec<Event> {
        self.submit(Command::Restart)
    }

    /// Returns to the start screen.
    pub fn return_to_start(&mut self) -> Vec<Event> {
        self.submit(Command::ReturnToStart)
    }

    /// Applies `command` and every follow-up command the systems emit.
    pub fn submit(&mut self, command: Command) -> Vec<Event> {
        let mut log = Vec::new();
        let mut pending = vec![command];

        while !pending.is_empty() {
            let mut events = Vec::new();
            for command in pending.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            self.hazard_watch.handle(&events, &mut pending);
            log.extend(events);
        }

        log
    }

    /// Read-only access to the world for rendering collaborators.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[cfg(test)]
    fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Current game state.
    #[must_use]
    pub fn game_state(&self) -> GameState {
        query::game_state(&self.world)
    }

    /// Tile at `cell`, ignoring fog of war.
    #[must_use]
    pub fn tile_at(&self, cell: CellCoord) -> Option<TileKind> {
        query::tile_at(&self.world, cell)
    }

    /// Reports whether `cell` has been revealed.
    #[must_use]
    pub fn is_revealed(&self, cell: CellCoord) -> bool {
        query::is_revealed(&self.world, cell)
    }

    /// Countdown of the explosion at `cell`.
    #[must_use]
    pub fn explosion_timer_at(&self, cell: CellCoord) -> Option<u32> {
        query::explosion_timer_at(&self.world, cell)
    }

    /// Snapshot of every moving hazard.
    #[must_use]
    pub fn hazards(&self) -> HazardView {
        query::hazard_view(&self.world)
    }

    /// Player position and vitals.
    #[must_use]
    pub fn player(&self) -> PlayerSnapshot {
        query::player(&self.world)
    }

    /// Current score.
    #[must_use]
    pub fn score(&self) -> u32 {
        query::score(&self.world)
    }

    /// Active shake effect.
    #[must_use]
    pub fn shake(&self) -> Option<ShakeEffect> {
        query::shake(&self.world)
    }
}

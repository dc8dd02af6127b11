//! Countdown state of explosion tiles.

use hitbox_core::{CellCoord, Event, Grid, TileKind, DETONATION_THRESHOLD, EXPLOSION_CYCLE};

/// Per-cell explosion countdowns, meaningful only where the tile is an explosion.
#[derive(Clone, Debug)]
pub(crate) struct ExplosionTimers {
    timers: Grid<u32>,
}

impl ExplosionTimers {
    pub(crate) fn new(timers: Grid<u32>) -> Self {
        Self { timers }
    }

    pub(crate) fn empty() -> Self {
        Self::new(Grid::filled(0, 0))
    }

    pub(crate) fn timer_at(&self, cell: CellCoord) -> Option<u32> {
        self.timers.at(cell)
    }

    #[cfg(any(test, feature = "test_scaffolding"))]
    pub(crate) fn set(&mut self, cell: CellCoord, timer: u32) {
        self.timers.set(cell, timer);
    }

    /// Decrements every explosion by one tick.
    ///
    /// Timers reaching the detonation threshold announce the detonation;
    /// timers reaching zero wrap to a full cycle within the same tick, so no
    /// explosion is ever observed at zero.
    pub(crate) fn tick(
        &mut self,
        tiles: &Grid<TileKind>,
        revealed: &Grid<bool>,
        out_events: &mut Vec<Event>,
    ) {
        for (cell, tile) in tiles.iter() {
            if *tile != TileKind::Explosion {
                continue;
            }
            let Some(timer) = self.timers.get_mut(cell) else {
                continue;
            };

            *timer = timer.saturating_sub(1);
            if *timer == DETONATION_THRESHOLD {
                out_events.push(Event::ExplosionDetonated {
                    cell,
                    revealed: revealed.at(cell).unwrap_or(false),
                });
            }
            if *timer == 0 {
                *timer = EXPLOSION_CYCLE;
            }
        }
    }
}

//! Moving hazards patrolling their cyclic paths.

use hitbox_core::{CellCoord, Grid, HazardId, HazardSnapshot, TileKind};
use hitbox_system_generation::PlacedHazard;

/// Authoritative state of a single moving hazard.
#[derive(Clone, Debug)]
pub(crate) struct MovingHazard {
    id: HazardId,
    cell: CellCoord,
    path: Vec<CellCoord>,
    progress: usize,
    move_timer: u32,
    move_speed: u32,
    under_tile: TileKind,
}

impl MovingHazard {
    /// Adopts a freshly placed hazard. Hazards without a path are dropped.
    pub(crate) fn from_placed(id: HazardId, placed: PlacedHazard) -> Option<Self> {
        let cell = placed.start()?;
        Some(Self {
            id,
            cell,
            path: placed.path,
            progress: 0,
            move_timer: placed.move_timer,
            move_speed: placed.move_speed,
            under_tile: placed.under_tile,
        })
    }

    /// Advances the move timer and steps along the path once it elapses.
    ///
    /// A step restores the vacated cell, moves to the next path cell, captures
    /// the tile found there and then covers it. Returns the cells left and
    /// entered when a step happened.
    pub(crate) fn advance(&mut self, tiles: &mut Grid<TileKind>) -> Option<(CellCoord, CellCoord)> {
        self.move_timer = self.move_timer.saturating_add(1);
        if self.move_timer < self.move_speed || self.path.is_empty() {
            return None;
        }
        self.move_timer = 0;

        let from = self.cell;
        tiles.set(from, self.under_tile);

        self.progress = (self.progress + 1) % self.path.len();
        self.cell = self.path[self.progress];
        self.under_tile = tiles.at(self.cell).unwrap_or(TileKind::Floor);
        tiles.set(self.cell, TileKind::MovingHazard);

        Some((from, self.cell))
    }

    pub(crate) fn id(&self) -> HazardId {
        self.id
    }

    pub(crate) fn snapshot(&self) -> HazardSnapshot {
        HazardSnapshot {
            id: self.id,
            cell: self.cell,
            path: self.path.clone(),
            path_progress: self.progress,
            move_timer: self.move_timer,
            move_speed: self.move_speed,
            under_tile: self.under_tile,
        }
    }
}

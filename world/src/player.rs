//! Player vitals and position.

use hitbox_core::{
    CellCoord, PlayerSnapshot, HURT_DURATION, INITIAL_LIVES, RESPAWN_HURT_DURATION,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Player {
    pub(crate) cell: CellCoord,
    lives: u32,
    hurt_timer: u32,
}

/// Result of applying one hit to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HitOutcome {
    Survived { lives: u32 },
    Depleted,
}

impl Player {
    pub(crate) fn new(cell: CellCoord) -> Self {
        Self {
            cell,
            lives: INITIAL_LIVES,
            hurt_timer: 0,
        }
    }

    pub(crate) fn take_hit(&mut self) -> HitOutcome {
        self.lives = self.lives.saturating_sub(1);
        self.hurt_timer = HURT_DURATION;
        if self.lives == 0 {
            HitOutcome::Depleted
        } else {
            HitOutcome::Survived { lives: self.lives }
        }
    }

    pub(crate) fn respawn(&mut self, cell: CellCoord) {
        *self = Self::new(cell);
        self.hurt_timer = RESPAWN_HURT_DURATION;
    }

    pub(crate) fn decay(&mut self) {
        self.hurt_timer = self.hurt_timer.saturating_sub(1);
    }

    #[cfg(any(test, feature = "test_scaffolding"))]
    pub(crate) fn set_lives(&mut self, lives: u32) {
        self.lives = lives;
    }

    pub(crate) fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            cell: self.cell,
            lives: self.lives,
            hurt_timer: self.hurt_timer,
        }
    }
}

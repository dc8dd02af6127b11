#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Hitbox engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! presentation layers to react to deterministically. Systems consume event
//! streams, query immutable snapshots, and respond exclusively with new
//! command batches.

use serde::{Deserialize, Serialize};

mod grid;

pub use grid::Grid;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "HITBOX";

/// Number of tiles along each edge of the square world.
pub const WORLD_SIZE: u32 = 128;

/// Cell the player occupies when a session starts and after every respawn.
pub const START_CELL: CellCoord = CellCoord::new(64, 64);

/// Lives granted at the start of a session and after every respawn.
pub const INITIAL_LIVES: u32 = 3;

/// Ticks the hurt indicator stays active after ordinary damage.
pub const HURT_DURATION: u32 = 15;

/// Ticks the hurt indicator stays active after a respawn.
pub const RESPAWN_HURT_DURATION: u32 = 30;

/// Timer value an explosion wraps to once its countdown is exhausted.
pub const EXPLOSION_CYCLE: u32 = 120;

/// Explosion timers at or below this value damage the player.
pub const DETONATION_THRESHOLD: u32 = 10;

/// Explosion timers at or below this value (and above detonation) blink.
pub const WARNING_THRESHOLD: u32 = 30;

/// Number of ticks between periodic hazard checks while the player stands still.
pub const HAZARD_CHECK_INTERVAL: u64 = 5;

/// Shake descriptor emitted whenever the player takes damage.
pub const DAMAGE_SHAKE: ShakeEffect = ShakeEffect::new(10, 5.0);

/// Describes whether the session is waiting on the start screen or running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Pre-game state; the world has not been generated yet.
    Start,
    /// The world exists and the player may move.
    Playing,
}

/// Tile types that may occupy a cell of the world grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    /// Walkable ground. Also the placeholder the filler converts.
    Floor,
    /// Walkable decoration.
    Grass,
    /// Static hazard that damages on contact.
    Lava,
    /// Collectible worth one point.
    Coin,
    /// Impassable cell.
    Wall,
    /// Landmark at the centre of a shrine.
    Shrine,
    /// Timer-driven hazard that damages while detonating.
    Explosion,
    /// Cell currently covered by a patrolling hazard.
    MovingHazard,
}

impl TileKind {
    /// Every tile kind in declaration order.
    pub const ALL: [TileKind; 8] = [
        TileKind::Floor,
        TileKind::Grass,
        TileKind::Lava,
        TileKind::Coin,
        TileKind::Wall,
        TileKind::Shrine,
        TileKind::Explosion,
        TileKind::MovingHazard,
    ];

    /// Reports whether the player may enter a cell holding this tile.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Wall)
    }

    /// Stable lowercase label used by adapters when describing tiles.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Floor => "floor",
            Self::Grass => "grass",
            Self::Lava => "lava",
            Self::Coin => "coin",
            Self::Wall => "wall",
            Self::Shrine => "shrine",
            Self::Explosion => "explosion",
            Self::MovingHazard => "moving_hazard",
        }
    }
}

/// Large-scale region classifications that drive tile-fill probabilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    /// Dense walls with sparse explosions.
    NeonCity,
    /// Lava pools and frequent explosions.
    LavaFields,
    /// Grass-heavy, hazard-free region.
    CrystalGarden,
    /// Mostly empty floor.
    Void,
    /// Circular area carved around the start cell.
    SafeZone,
}

/// Observable stages of an explosion countdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExplosionPhase {
    /// Timer above the warning threshold; harmless.
    Building,
    /// Timer within the warning band; harmless but about to detonate.
    Warning,
    /// Timer at or below the detonation threshold; damages the player.
    Detonating,
}

impl ExplosionPhase {
    /// Classifies an explosion timer value.
    #[must_use]
    pub const fn from_timer(timer: u32) -> Self {
        if timer <= DETONATION_THRESHOLD {
            Self::Detonating
        } else if timer <= WARNING_THRESHOLD {
            Self::Warning
        } else {
            Self::Building
        }
    }

    /// Reports whether the phase damages a player standing on the cell.
    #[must_use]
    pub const fn is_damaging(self) -> bool {
        matches!(self, Self::Detonating)
    }
}

/// Screen-shake descriptor consumed by rendering collaborators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShakeEffect {
    duration: u32,
    magnitude: f32,
}

impl ShakeEffect {
    /// Creates a new shake lasting `duration` ticks with the given magnitude.
    #[must_use]
    pub const fn new(duration: u32, magnitude: f32) -> Self {
        Self {
            duration,
            magnitude,
        }
    }

    /// Remaining ticks of shaking.
    #[must_use]
    pub const fn duration(&self) -> u32 {
        self.duration
    }

    /// Maximum displacement in pixels.
    #[must_use]
    pub const fn magnitude(&self) -> f32 {
        self.magnitude
    }

    /// Returns the effect one tick later, or `None` once it has expired.
    #[must_use]
    pub const fn decayed(self) -> Option<Self> {
        if self.duration <= 1 {
            None
        } else {
            Some(Self::new(self.duration - 1, self.magnitude))
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Leaves the start screen, generating the world and revealing the start area.
    StartGame,
    /// Attempts to move the player by the provided delta.
    ///
    /// Input layers only ever submit orthogonal unit vectors; the world applies
    /// whatever delta it receives.
    TryMove {
        /// Horizontal offset in tiles.
        dx: i32,
        /// Vertical offset in tiles.
        dy: i32,
    },
    /// Advances explosion timers, hazards and decaying effects by one tick.
    Tick,
    /// Evaluates the player's current cell for damage.
    CheckHazards,
    /// Regenerates the world from the next derived seed and resumes play.
    Restart,
    /// Abandons the session and returns to the start screen.
    ReturnToStart,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The world was generated and the session entered [`GameState::Playing`].
    GameStarted {
        /// Seed the world was generated from.
        seed: u64,
        /// Number of moving hazards that were placed.
        hazards: usize,
    },
    /// The session returned to the start screen.
    ReturnedToStart,
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Index of the tick that just completed, starting at one.
        tick: u64,
    },
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after moving.
        to: CellCoord,
    },
    /// Reports that a move request was rejected without side effects.
    MoveRejected {
        /// Cell the move would have entered, when it lies inside the grid.
        target: Option<CellCoord>,
        /// Specific reason the move failed.
        reason: MoveRejection,
    },
    /// Confirms that a coin was collected.
    CoinCollected {
        /// Cell the coin occupied.
        cell: CellCoord,
        /// Score after the collection.
        score: u32,
    },
    /// Reports that the player took damage.
    PlayerDamaged {
        /// Tile that caused the damage.
        cause: DamageCause,
        /// Lives remaining after the hit, before any respawn.
        lives: u32,
        /// Shake requested by the hit.
        shake: ShakeEffect,
    },
    /// Reports that the player ran out of lives and respawned.
    PlayerRespawned {
        /// Cell the player respawned on.
        cell: CellCoord,
    },
    /// An explosion crossed from warning into detonation.
    ExplosionDetonated {
        /// Cell holding the explosion.
        cell: CellCoord,
        /// Whether the player has revealed the cell.
        revealed: bool,
    },
    /// A moving hazard advanced along its patrol path.
    HazardAdvanced {
        /// Identifier of the hazard that moved.
        hazard: HazardId,
        /// Cell the hazard left.
        from: CellCoord,
        /// Cell the hazard now covers.
        to: CellCoord,
    },
}

/// Reasons a move request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRejection {
    /// The session is not in [`GameState::Playing`].
    NotPlaying,
    /// The candidate cell lies outside the world.
    OutOfBounds,
    /// The candidate cell holds a wall.
    Wall,
}

/// Tile types capable of damaging the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageCause {
    /// The player stands in lava.
    Lava,
    /// The player stands in a detonating explosion.
    Explosion,
    /// The player shares a cell with a moving hazard.
    MovingHazard,
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Unit offset `(dx, dy)` associated with the direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Unique identifier assigned to a moving hazard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HazardId(u32);

impl HazardId {
    /// Creates a new hazard identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Computes the straight-line distance between two cell coordinates.
    #[must_use]
    pub fn euclidean_distance(self, other: CellCoord) -> f64 {
        let dx = f64::from(self.column()) - f64::from(other.column());
        let dy = f64::from(self.row()) - f64::from(other.row());
        dx.hypot(dy)
    }

    /// Offsets the coordinate, returning `None` when the result leaves `[0, bound)`.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32, bound: u32) -> Option<CellCoord> {
        let column = i64::from(self.column) + i64::from(dx);
        let row = i64::from(self.row) + i64::from(dy);
        let bound = i64::from(bound);
        if (0..bound).contains(&column) && (0..bound).contains(&row) {
            Some(CellCoord::new(
                u32::try_from(column).ok()?,
                u32::try_from(row).ok()?,
            ))
        } else {
            None
        }
    }
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlayerSnapshot {
    /// Cell currently occupied by the player.
    pub cell: CellCoord,
    /// Remaining lives.
    pub lives: u32,
    /// Ticks left on the hurt indicator.
    pub hurt_timer: u32,
}

/// Immutable representation of a single moving hazard used for queries.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HazardSnapshot {
    /// Unique identifier assigned to the hazard.
    pub id: HazardId,
    /// Cell currently covered by the hazard.
    pub cell: CellCoord,
    /// Cyclic patrol path.
    pub path: Vec<CellCoord>,
    /// Index of `cell` within `path`.
    pub path_progress: usize,
    /// Ticks accumulated since the last step.
    pub move_timer: u32,
    /// Ticks required between steps.
    pub move_speed: u32,
    /// Tile hidden beneath the hazard.
    pub under_tile: TileKind,
}

/// Read-only snapshot describing all moving hazards within the world.
#[derive(Clone, Debug, Default)]
pub struct HazardView {
    snapshots: Vec<HazardSnapshot>,
}

impl HazardView {
    /// Creates a new hazard view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<HazardSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured hazard snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &HazardSnapshot> {
        self.snapshots.iter()
    }

    /// Number of hazards captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no hazards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<HazardSnapshot> {
        self.snapshots
    }
}

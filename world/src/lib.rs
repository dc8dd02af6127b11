#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Hitbox.
//!
//! The world owns the tile grid, fog of war, explosion countdowns, moving
//! hazards and the player. It is mutated exclusively through [`apply`] and
//! observed through the [`query`] module.

mod explosions;
mod hazards;
mod player;

use hitbox_core::{
    CellCoord, Command, DamageCause, Event, ExplosionPhase, GameState, Grid, HazardId,
    MoveRejection, ShakeEffect, TileKind, DAMAGE_SHAKE, WELCOME_BANNER,
};
use hitbox_system_generation::Generator;

use explosions::ExplosionTimers;
use hazards::MovingHazard;
use player::{HitOutcome, Player};

/// Represents the authoritative Hitbox world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    generator: Generator,
    base_seed: u64,
    generation_index: u64,
    state: GameState,
    tiles: Grid<TileKind>,
    revealed: Grid<bool>,
    explosions: ExplosionTimers,
    hazards: Vec<MovingHazard>,
    player: Player,
    start_cell: CellCoord,
    score: u32,
    shake: Option<ShakeEffect>,
    tick_index: u64,
}

impl World {
    /// Creates a world waiting on the start screen.
    ///
    /// Nothing is generated until [`Command::StartGame`] arrives. Successive
    /// sessions derive their seeds from `seed` by adding the session index.
    #[must_use]
    pub fn new(generator: Generator, seed: u64) -> Self {
        let start_cell = generator.config().start_cell();
        Self {
            banner: WELCOME_BANNER,
            generator,
            base_seed: seed,
            generation_index: 0,
            state: GameState::Start,
            tiles: Grid::filled(0, TileKind::Floor),
            revealed: Grid::filled(0, false),
            explosions: ExplosionTimers::empty(),
            hazards: Vec::new(),
            player: Player::new(start_cell),
            start_cell,
            score: 0,
            shake: None,
            tick_index: 0,
        }
    }

    fn begin_session(&mut self, out_events: &mut Vec<Event>) {
        let seed = self.base_seed.wrapping_add(self.generation_index);
        self.generation_index = self.generation_index.wrapping_add(1);

        let generated = self.generator.generate_seeded(seed);
        let size = generated.tiles.size();
        self.tiles = generated.tiles;
        self.explosions = ExplosionTimers::new(generated.explosion_timers);
        self.revealed = Grid::filled(size, false);
        self.hazards = generated
            .hazards
            .into_iter()
            .zip(0_u32..)
            .filter_map(|(placed, index)| MovingHazard::from_placed(HazardId::new(index), placed))
            .collect();
        self.player = Player::new(self.start_cell);
        self.score = 0;
        self.shake = None;
        self.tick_index = 0;
        self.state = GameState::Playing;
        self.reveal_around(self.start_cell);

        tracing::debug!(seed, hazards = self.hazards.len(), "session started");
        out_events.push(Event::GameStarted {
            seed,
            hazards: self.hazards.len(),
        });
    }

    fn end_session(&mut self) {
        self.state = GameState::Start;
        self.tiles = Grid::filled(0, TileKind::Floor);
        self.revealed = Grid::filled(0, false);
        self.explosions = ExplosionTimers::empty();
        self.hazards.clear();
        self.player = Player::new(self.start_cell);
        self.score = 0;
        self.shake = None;
    }

    fn reveal_around(&mut self, center: CellCoord) {
        let size = self.revealed.size();
        for dy in -1..=1 {
            for dx in -1..=1 {
                if let Some(cell) = center.offset(dx, dy, size) {
                    self.revealed.set(cell, true);
                }
            }
        }
    }

    fn try_move(&mut self, dx: i32, dy: i32, out_events: &mut Vec<Event>) {
        if self.state != GameState::Playing {
            out_events.push(Event::MoveRejected {
                target: None,
                reason: MoveRejection::NotPlaying,
            });
            return;
        }

        let from = self.player.cell;
        let Some(target) = from.offset(dx, dy, self.tiles.size()) else {
            out_events.push(Event::MoveRejected {
                target: None,
                reason: MoveRejection::OutOfBounds,
            });
            return;
        };

        if self.tiles.at(target).is_some_and(|tile| !tile.is_passable()) {
            out_events.push(Event::MoveRejected {
                target: Some(target),
                reason: MoveRejection::Wall,
            });
            return;
        }

        self.player.cell = target;
        out_events.push(Event::PlayerMoved { from, to: target });
        self.reveal_around(target);
        self.collect_coin(target, out_events);
        self.check_hazards(out_events);
    }

    fn collect_coin(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        if self.tiles.at(cell) != Some(TileKind::Coin) {
            return;
        }
        self.tiles.set(cell, TileKind::Floor);
        self.score = self.score.saturating_add(1);
        out_events.push(Event::CoinCollected {
            cell,
            score: self.score,
        });
    }

    fn damage_cause(&self, cell: CellCoord) -> Option<DamageCause> {
        match self.tiles.at(cell)? {
            TileKind::Lava => Some(DamageCause::Lava),
            TileKind::MovingHazard => Some(DamageCause::MovingHazard),
            TileKind::Explosion => {
                let timer = self.explosions.timer_at(cell)?;
                ExplosionPhase::from_timer(timer)
                    .is_damaging()
                    .then_some(DamageCause::Explosion)
            }
            _ => None,
        }
    }

    fn check_hazards(&mut self, out_events: &mut Vec<Event>) {
        if let Some(cause) = self.damage_cause(self.player.cell) {
            self.damage_player(cause, out_events);
        }
    }

    fn damage_player(&mut self, cause: DamageCause, out_events: &mut Vec<Event>) {
        let outcome = self.player.take_hit();
        self.shake = Some(DAMAGE_SHAKE);
        let lives = match outcome {
            HitOutcome::Survived { lives } => lives,
            HitOutcome::Depleted => 0,
        };
        tracing::debug!(?cause, lives, cell = ?self.player.cell, "player damaged");
        out_events.push(Event::PlayerDamaged {
            cause,
            lives,
            shake: DAMAGE_SHAKE,
        });

        if outcome == HitOutcome::Depleted {
            self.score = 0;
            self.player.respawn(self.start_cell);
            tracing::debug!(cell = ?self.start_cell, "player respawned");
            out_events.push(Event::PlayerRespawned {
                cell: self.start_cell,
            });
        }
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        if self.state != GameState::Playing {
            return;
        }

        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });

        self.explosions
            .tick(&self.tiles, &self.revealed, out_events);

        for hazard in &mut self.hazards {
            if let Some((from, to)) = hazard.advance(&mut self.tiles) {
                out_events.push(Event::HazardAdvanced {
                    hazard: hazard.id(),
                    from,
                    to,
                });
            }
        }

        self.shake = self.shake.and_then(ShakeEffect::decayed);
        self.player.decay();
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartGame => {
            if world.state == GameState::Start {
                world.begin_session(out_events);
            }
        }
        Command::Restart => world.begin_session(out_events),
        Command::ReturnToStart => {
            if world.state == GameState::Playing {
                world.end_session();
                out_events.push(Event::ReturnedToStart);
            }
        }
        Command::TryMove { dx, dy } => world.try_move(dx, dy, out_events),
        Command::Tick => world.tick(out_events),
        Command::CheckHazards => {
            if world.state == GameState::Playing {
                world.check_hazards(out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
///
/// Coordinates outside the world, and every cell while the session sits on
/// the start screen, report "no tile" rather than failing.
pub mod query {
    use hitbox_core::{
        CellCoord, ExplosionPhase, GameState, HazardView, PlayerSnapshot, ShakeEffect, TileKind,
    };

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Reports whether the session is on the start screen or playing.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state
    }

    /// Number of tiles along each edge of the current world; zero before generation.
    #[must_use]
    pub fn world_size(world: &World) -> u32 {
        world.tiles.size()
    }

    /// Tile stored at `cell`, regardless of fog of war.
    #[must_use]
    pub fn tile_at(world: &World, cell: CellCoord) -> Option<TileKind> {
        world.tiles.at(cell)
    }

    /// Reports whether the player has revealed `cell`.
    #[must_use]
    pub fn is_revealed(world: &World, cell: CellCoord) -> bool {
        world.revealed.at(cell).unwrap_or(false)
    }

    /// Tile at `cell` when it has been revealed; hidden cells report `None`.
    #[must_use]
    pub fn revealed_tile(world: &World, cell: CellCoord) -> Option<TileKind> {
        if is_revealed(world, cell) {
            tile_at(world, cell)
        } else {
            None
        }
    }

    /// Countdown of the explosion at `cell`, or `None` when the cell holds no explosion.
    #[must_use]
    pub fn explosion_timer_at(world: &World, cell: CellCoord) -> Option<u32> {
        if tile_at(world, cell) == Some(TileKind::Explosion) {
            world.explosions.timer_at(cell)
        } else {
            None
        }
    }

    /// Phase of the explosion at `cell`.
    #[must_use]
    pub fn explosion_phase_at(world: &World, cell: CellCoord) -> Option<ExplosionPhase> {
        explosion_timer_at(world, cell).map(ExplosionPhase::from_timer)
    }

    /// Captures a read-only view of every moving hazard.
    #[must_use]
    pub fn hazard_view(world: &World) -> HazardView {
        HazardView::from_snapshots(world.hazards.iter().map(|hazard| hazard.snapshot()).collect())
    }

    /// Player position and vitals.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot()
    }

    /// Coins collected since the last death.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Active shake effect, if any.
    #[must_use]
    pub fn shake(world: &World) -> Option<ShakeEffect> {
        world.shake
    }
}

/// Direct state manipulation for scenario tests.
#[cfg(any(test, feature = "test_scaffolding"))]
pub mod scaffolding {
    use hitbox_core::{CellCoord, TileKind};

    use super::World;

    /// Overwrites the tile at `cell`.
    pub fn set_tile(world: &mut World, cell: CellCoord, tile: TileKind) {
        world.tiles.set(cell, tile);
    }

    /// Overwrites the explosion countdown at `cell`.
    pub fn set_explosion_timer(world: &mut World, cell: CellCoord, timer: u32) {
        world.explosions.set(cell, timer);
    }

    /// Overwrites the player's remaining lives.
    pub fn set_player_lives(world: &mut World, lives: u32) {
        world.player.set_lives(lives);
    }

    /// Teleports the player without triggering any side effect.
    pub fn place_player(world: &mut World, cell: CellCoord) {
        world.player.cell = cell;
    }

    /// Overwrites the score.
    pub fn set_score(world: &mut World, score: u32) {
        world.score = score;
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural world generator.
//!
//! Generation is a single synchronous pass: biomes are synthesised per
//! region, structures are stamped in a fixed order (safe zone, rooms,
//! treasure rooms, paths), leftover floor is filled from per-biome tables,
//! shrines are stamped on top, and moving hazards are placed last. Later
//! passes overwrite earlier ones; the filler only converts cells still holding
//! the floor placeholder.

mod biomes;
mod config;
mod filler;
mod hazards;
mod random;
mod stampers;

use hitbox_core::{Biome, CellCoord, Grid, TileKind};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use config::{
    ConfigError, FillTables, GenerationConfig, HazardConfig, RoomConfig, ThresholdEntry,
    ThresholdTable, TreasureRoomConfig,
};
pub use hazards::PlacedHazard;
pub use random::{CoherentNoise, ConstantNoise, PerlinNoise, RandomSource, ScriptedRandom};

/// Derives the Perlin seed used alongside the uniform stream for `seed`.
#[must_use]
pub const fn noise_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

/// Complete output of one generation pass.
#[derive(Clone, Debug)]
pub struct GeneratedWorld {
    /// Tile layer, including moving hazards at their starting cells.
    pub tiles: Grid<TileKind>,
    /// Biome assignment the filler consumed.
    pub biomes: Grid<Biome>,
    /// Initial explosion countdowns; zero where the tile is not an explosion.
    pub explosion_timers: Grid<u32>,
    /// Moving hazards in placement order.
    pub hazards: Vec<PlacedHazard>,
    /// Summary of the pass.
    pub report: GenerationReport,
}

/// Counters describing a finished generation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Hazards the placer aimed for.
    pub hazards_requested: u32,
    /// Hazards actually placed.
    pub hazards_placed: u32,
    /// Candidate cells the placer examined.
    pub hazard_attempts: u32,
    /// Coins present after generation.
    pub coins: u32,
    /// Explosions present after generation.
    pub explosions: u32,
}

impl GenerationReport {
    /// Reports whether the placer gave up before reaching its target.
    #[must_use]
    pub const fn hazard_shortfall(&self) -> bool {
        self.hazards_placed < self.hazards_requested
    }
}

/// Generates worlds from a validated configuration.
#[derive(Clone, Debug)]
pub struct Generator {
    config: GenerationConfig,
}

impl Generator {
    /// Creates a generator after validating `config`.
    pub fn new(config: GenerationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration driving the generator.
    #[must_use]
    pub const fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generates a world from a seed using ChaCha8 and Perlin noise.
    #[must_use]
    pub fn generate_seeded(&self, seed: u64) -> GeneratedWorld {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let noise = PerlinNoise::new(noise_seed(seed));
        let world = self.generate(&mut rng, &noise);
        tracing::info!(
            seed,
            coins = world.report.coins,
            explosions = world.report.explosions,
            hazards = world.report.hazards_placed,
            "generated world"
        );
        world
    }

    /// Generates a world from explicit random and noise sources.
    pub fn generate(
        &self,
        rng: &mut dyn RandomSource,
        noise: &dyn CoherentNoise,
    ) -> GeneratedWorld {
        let config = &self.config;
        let size = config.world_size;
        let start = config.start_cell();
        let low = config.structure_margin;
        let high = size.saturating_sub(config.structure_margin);

        let mut canvas = stampers::Canvas::new(biomes::synthesize_biomes(config, rng, noise));
        stampers::carve_safe_zone(&mut canvas, start, config.safe_zone_radius);

        for _ in 0..config.rooms.count {
            let column = rng.range_u32(low, high);
            let row = rng.range_u32(low, high);
            let width = rng.range_u32(config.rooms.min_size, config.rooms.max_size);
            let height = rng.range_u32(config.rooms.min_size, config.rooms.max_size);
            stampers::carve_room(
                &mut canvas,
                CellCoord::new(column, row),
                width,
                height,
                config.rooms.gap_chance,
                rng,
            );
        }

        for _ in 0..config.treasure_rooms.count {
            let column = rng.range_u32(low, high);
            let row = rng.range_u32(low, high);
            stampers::carve_treasure_room(
                &mut canvas,
                CellCoord::new(column, row),
                config.treasure_rooms.radius,
                config.treasure_rooms.coin_chance,
                rng,
            );
        }

        for _ in 0..config.path_count {
            let from_column = rng.range_u32(0, size);
            let from_row = rng.range_u32(0, size);
            let to_column = rng.range_u32(0, size);
            let to_row = rng.range_u32(0, size);
            stampers::carve_path(
                &mut canvas,
                CellCoord::new(from_column, from_row),
                CellCoord::new(to_column, to_row),
            );
        }

        let explosion_timers = filler::fill_floor(&mut canvas, config, rng);

        for _ in 0..config.shrine_count {
            let column = rng.range_u32(low, high);
            let row = rng.range_u32(low, high);
            stampers::stamp_shrine(&mut canvas, CellCoord::new(column, row));
        }

        let placement = hazards::place_hazards(&mut canvas.tiles, &config.hazards, start, rng);
        let report = GenerationReport {
            hazards_requested: config.hazards.target,
            hazards_placed: placement.hazards.len() as u32,
            hazard_attempts: placement.attempts,
            coins: count_tiles(&canvas.tiles, TileKind::Coin),
            explosions: count_tiles(&canvas.tiles, TileKind::Explosion),
        };
        if report.hazard_shortfall() {
            tracing::warn!(
                requested = report.hazards_requested,
                placed = report.hazards_placed,
                attempts = report.hazard_attempts,
                "hazard placement exhausted its attempts"
            );
        }

        GeneratedWorld {
            explosion_timers: clear_stale_timers(explosion_timers, &canvas.tiles),
            tiles: canvas.tiles,
            biomes: canvas.biomes,
            hazards: placement.hazards,
            report,
        }
    }
}

/// Zeroes timers of explosions that later stamps overwrote.
fn clear_stale_timers(mut timers: Grid<u32>, tiles: &Grid<TileKind>) -> Grid<u32> {
    for (cell, tile) in tiles.iter() {
        if *tile != TileKind::Explosion {
            timers.set(cell, 0);
        }
    }
    timers
}

fn count_tiles(tiles: &Grid<TileKind>, kind: TileKind) -> u32 {
    tiles.values().filter(|tile| **tile == kind).count() as u32
}

use hitbox_core::{Biome, CellCoord, TileKind, WORLD_SIZE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ordered cumulative-threshold lookup table.
///
/// A unit roll selects the first entry whose `below` bound exceeds it, or the
/// fallback when no entry matches. Thresholds must increase strictly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable<T> {
    /// Entries checked in order.
    pub entries: Vec<ThresholdEntry<T>>,
    /// Value chosen when the roll clears every threshold.
    pub fallback: T,
}

/// Single row of a [`ThresholdTable`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdEntry<T> {
    /// Exclusive upper bound of the roll selecting `value`.
    pub below: f64,
    /// Value selected for rolls under `below`.
    pub value: T,
}

impl<T: Copy> ThresholdTable<T> {
    /// Builds a table from `(threshold, value)` pairs.
    #[must_use]
    pub fn new(entries: &[(f64, T)], fallback: T) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|&(below, value)| ThresholdEntry { below, value })
                .collect(),
            fallback,
        }
    }

    /// Maps a unit roll to a value.
    #[must_use]
    pub fn pick(&self, roll: f64) -> T {
        self.entries
            .iter()
            .find(|entry| roll < entry.below)
            .map_or(self.fallback, |entry| entry.value)
    }

    fn validate(&self, table: &'static str) -> Result<(), ConfigError> {
        let mut previous = 0.0;
        for (index, entry) in self.entries.iter().enumerate() {
            let in_range = (0.0..=1.0).contains(&entry.below);
            let increasing = index == 0 || entry.below > previous;
            if !in_range || !increasing {
                return Err(ConfigError::UnsortedThresholds { table });
            }
            previous = entry.below;
        }
        Ok(())
    }
}

/// Parameters of the walled rectangular room stamper.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Rooms stamped per world.
    pub count: u32,
    /// Inclusive lower bound of room width and height.
    pub min_size: u32,
    /// Exclusive upper bound of room width and height.
    pub max_size: u32,
    /// Probability that a border cell is left open.
    pub gap_chance: f64,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            count: 12,
            min_size: 4,
            max_size: 8,
            gap_chance: 0.2,
        }
    }
}

/// Parameters of the circular treasure room stamper.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreasureRoomConfig {
    /// Treasure rooms stamped per world.
    pub count: u32,
    /// Radius of the room; cells at exactly this distance become walls.
    pub radius: u32,
    /// Probability that an interior cell holds a coin.
    pub coin_chance: f64,
}

impl Default for TreasureRoomConfig {
    fn default() -> Self {
        Self {
            count: 6,
            radius: 5,
            coin_chance: 0.4,
        }
    }
}

/// Per-biome tile fill tables applied to leftover floor cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillTables {
    /// Table for [`Biome::NeonCity`].
    pub neon_city: ThresholdTable<TileKind>,
    /// Table for [`Biome::LavaFields`].
    pub lava_fields: ThresholdTable<TileKind>,
    /// Table for [`Biome::CrystalGarden`].
    pub crystal_garden: ThresholdTable<TileKind>,
    /// Table for [`Biome::Void`].
    pub void: ThresholdTable<TileKind>,
    /// Table for [`Biome::SafeZone`].
    pub safe_zone: ThresholdTable<TileKind>,
}

impl FillTables {
    /// Returns the table that fills cells of `biome`.
    #[must_use]
    pub fn table_for(&self, biome: Biome) -> &ThresholdTable<TileKind> {
        match biome {
            Biome::NeonCity => &self.neon_city,
            Biome::LavaFields => &self.lava_fields,
            Biome::CrystalGarden => &self.crystal_garden,
            Biome::Void => &self.void,
            Biome::SafeZone => &self.safe_zone,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.neon_city.validate("fill.neon_city")?;
        self.lava_fields.validate("fill.lava_fields")?;
        self.crystal_garden.validate("fill.crystal_garden")?;
        self.void.validate("fill.void")?;
        self.safe_zone.validate("fill.safe_zone")
    }
}

impl Default for FillTables {
    fn default() -> Self {
        use TileKind::{Coin, Explosion, Floor, Grass, Lava, Wall};

        Self {
            neon_city: ThresholdTable::new(&[(0.25, Wall), (0.35, Coin), (0.38, Explosion)], Floor),
            lava_fields: ThresholdTable::new(
                &[(0.20, Lava), (0.30, Wall), (0.40, Coin), (0.55, Explosion)],
                Floor,
            ),
            crystal_garden: ThresholdTable::new(&[(0.5, Grass), (0.6, Coin)], Floor),
            void: ThresholdTable::new(&[(0.05, Wall), (0.08, Coin)], Floor),
            safe_zone: ThresholdTable::new(&[(0.3, Grass), (0.4, Coin)], Floor),
        }
    }
}

/// Parameters of the moving-hazard placer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardConfig {
    /// Hazards the placer tries to create.
    pub target: u32,
    /// Candidate cells examined before giving up.
    pub attempts: u32,
    /// Distance from every world edge candidates must keep.
    pub margin: u32,
    /// Candidates must lie strictly farther than this from the start cell.
    pub min_start_distance: f64,
    /// Inclusive lower bound of forward patrol steps.
    pub min_path_length: u32,
    /// Exclusive upper bound of forward patrol steps.
    pub max_path_length: u32,
    /// Ticks between two hazard steps.
    pub move_speed: u32,
}

impl Default for HazardConfig {
    fn default() -> Self {
        Self {
            target: 10,
            attempts: 50,
            margin: 15,
            min_start_distance: 15.0,
            min_path_length: 4,
            max_path_length: 8,
            move_speed: 30,
        }
    }
}

/// Every tunable of the world generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Tiles along each edge of the square world.
    pub world_size: u32,
    /// Edge length of the square regions sharing one biome draw.
    pub region_size: u32,
    /// Cumulative distribution of region biomes.
    pub biome_table: ThresholdTable<Biome>,
    /// Spatial frequency of the boundary perturbation noise.
    pub boundary_noise_scale: f64,
    /// Noise samples above this value borrow the neighbouring region's biome.
    pub boundary_noise_threshold: f64,
    /// Radius of the safe zone carved around the start cell.
    pub safe_zone_radius: u32,
    /// Distance from the world edge kept by rooms, treasure rooms and shrines.
    pub structure_margin: u32,
    /// Room stamper parameters.
    pub rooms: RoomConfig,
    /// Treasure room stamper parameters.
    pub treasure_rooms: TreasureRoomConfig,
    /// Corridors carved between random endpoints.
    pub path_count: u32,
    /// Shrines stamped after filling.
    pub shrine_count: u32,
    /// Per-biome fill tables.
    pub fill: FillTables,
    /// Inclusive lower bound of initial explosion timers.
    pub explosion_timer_min: u32,
    /// Exclusive upper bound of initial explosion timers.
    pub explosion_timer_max: u32,
    /// Moving-hazard placer parameters.
    pub hazards: HazardConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            world_size: WORLD_SIZE,
            region_size: 16,
            biome_table: ThresholdTable::new(
                &[
                    (0.25, Biome::LavaFields),
                    (0.55, Biome::CrystalGarden),
                    (0.80, Biome::NeonCity),
                ],
                Biome::Void,
            ),
            boundary_noise_scale: 0.08,
            boundary_noise_threshold: 0.8,
            safe_zone_radius: 8,
            structure_margin: 10,
            rooms: RoomConfig::default(),
            treasure_rooms: TreasureRoomConfig::default(),
            path_count: 10,
            shrine_count: 5,
            fill: FillTables::default(),
            explosion_timer_min: 60,
            explosion_timer_max: 180,
            hazards: HazardConfig::default(),
        }
    }
}

impl GenerationConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// Missing keys keep their default values.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Cell the player starts on: the centre of the world.
    #[must_use]
    pub const fn start_cell(&self) -> CellCoord {
        CellCoord::new(self.world_size / 2, self.world_size / 2)
    }

    /// Checks every invariant the generator relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.region_size == 0 || self.world_size % self.region_size != 0 {
            return Err(ConfigError::RegionSize {
                world_size: self.world_size,
                region_size: self.region_size,
            });
        }

        let margin = self.structure_margin.max(self.hazards.margin);
        if self.world_size <= margin.saturating_mul(2) {
            return Err(ConfigError::WorldTooSmall {
                world_size: self.world_size,
                margin,
            });
        }

        self.biome_table.validate("biome_table")?;
        self.fill.validate()?;

        check_probability("rooms.gap_chance", self.rooms.gap_chance)?;
        check_probability("treasure_rooms.coin_chance", self.treasure_rooms.coin_chance)?;
        check_probability("boundary_noise_threshold", self.boundary_noise_threshold)?;

        check_range("rooms.size", self.rooms.min_size, self.rooms.max_size)?;
        check_range(
            "explosion_timer",
            self.explosion_timer_min.max(1),
            self.explosion_timer_max,
        )?;
        if self.explosion_timer_min == 0 {
            return Err(ConfigError::EmptyRange {
                name: "explosion_timer",
                low: self.explosion_timer_min,
                high: self.explosion_timer_max,
            });
        }
        check_range(
            "hazards.path_length",
            self.hazards.min_path_length,
            self.hazards.max_path_length,
        )?;

        if self.hazards.move_speed == 0 {
            return Err(ConfigError::ZeroMoveSpeed);
        }

        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Probability { name, value })
    }
}

fn check_range(name: &'static str, low: u32, high: u32) -> Result<(), ConfigError> {
    if low < high {
        Ok(())
    } else {
        Err(ConfigError::EmptyRange { name, low, high })
    }
}

/// Reasons a generation configuration may be rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Regions must tile the world exactly.
    #[error("region size {region_size} must be positive and divide world size {world_size}")]
    RegionSize {
        /// Configured world size.
        world_size: u32,
        /// Configured region size.
        region_size: u32,
    },
    /// Placement margins leave no interior to place structures in.
    #[error("world size {world_size} leaves no interior inside a margin of {margin}")]
    WorldTooSmall {
        /// Configured world size.
        world_size: u32,
        /// Largest configured margin.
        margin: u32,
    },
    /// A threshold table is unsorted or leaves `[0, 1]`.
    #[error("thresholds of `{table}` must increase strictly within [0, 1]")]
    UnsortedThresholds {
        /// Name of the offending table.
        table: &'static str,
    },
    /// A probability lies outside `[0, 1]`.
    #[error("probability `{name}` = {value} lies outside [0, 1]")]
    Probability {
        /// Name of the offending field.
        name: &'static str,
        /// Configured value.
        value: f64,
    },
    /// A half-open range is empty or starts at zero where positive values are required.
    #[error("range `{name}` is empty ({low}..{high})")]
    EmptyRange {
        /// Name of the offending range.
        name: &'static str,
        /// Configured lower bound.
        low: u32,
        /// Configured upper bound.
        high: u32,
    },
    /// Hazards would never move.
    #[error("hazard move speed must be positive")]
    ZeroMoveSpeed,
    /// The TOML text could not be parsed.
    #[error("failed to parse generation config")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        let config = GenerationConfig::default();
        config.validate().expect("defaults must validate");
        assert_eq!(config.start_cell(), hitbox_core::START_CELL);
    }

    #[test]
    fn lava_fields_table_matches_documented_thresholds() {
        let table = &GenerationConfig::default().fill.lava_fields;
        assert_eq!(table.pick(0.0), TileKind::Lava);
        assert_eq!(table.pick(0.19), TileKind::Lava);
        assert_eq!(table.pick(0.20), TileKind::Wall);
        assert_eq!(table.pick(0.35), TileKind::Coin);
        assert_eq!(table.pick(0.50), TileKind::Explosion);
        assert_eq!(table.pick(0.55), TileKind::Floor);
        assert_eq!(table.pick(0.99), TileKind::Floor);
    }

    #[test]
    fn biome_table_covers_every_region_biome() {
        let table = &GenerationConfig::default().biome_table;
        assert_eq!(table.pick(0.1), Biome::LavaFields);
        assert_eq!(table.pick(0.3), Biome::CrystalGarden);
        assert_eq!(table.pick(0.7), Biome::NeonCity);
        assert_eq!(table.pick(0.9), Biome::Void);
    }

    #[test]
    fn rejects_region_size_that_does_not_divide_world() {
        let config = GenerationConfig {
            region_size: 15,
            ..GenerationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RegionSize {
                world_size: 128,
                region_size: 15
            })
        ));
    }

    #[test]
    fn rejects_unsorted_fill_table() {
        let mut config = GenerationConfig::default();
        config.fill.void = ThresholdTable::new(&[(0.5, TileKind::Wall), (0.2, TileKind::Coin)], TileKind::Floor);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsortedThresholds {
                table: "fill.void"
            })
        ));
    }

    #[test]
    fn rejects_zero_initial_explosion_timer() {
        let config = GenerationConfig {
            explosion_timer_min: 0,
            ..GenerationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyRange {
                name: "explosion_timer",
                ..
            })
        ));
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let contents = r#"
            path_count = 3

            [hazards]
            target = 4

            [fill.lava_fields]
            fallback = "floor"
            entries = [
                { below = 0.45, value = "lava" },
                { below = 0.50, value = "explosion" },
            ]
        "#;

        let config = GenerationConfig::from_toml_str(contents).expect("valid toml");
        assert_eq!(config.path_count, 3);
        assert_eq!(config.hazards.target, 4);
        assert_eq!(config.hazards.move_speed, 30);
        assert_eq!(config.fill.lava_fields.pick(0.3), TileKind::Lava);
        assert_eq!(config.fill.neon_city, FillTables::default().neon_city);
        assert_eq!(config.world_size, WORLD_SIZE);
    }

    #[test]
    fn malformed_toml_reports_parse_error() {
        let error = GenerationConfig::from_toml_str("world_size = \"large\"")
            .expect_err("string world size must fail");
        assert!(matches!(error, ConfigError::Parse(_)));
    }
}

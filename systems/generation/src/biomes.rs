use hitbox_core::{Biome, CellCoord, Grid};

use crate::{
    config::GenerationConfig,
    random::{CoherentNoise, RandomSource},
};

/// Assigns a biome to every cell of the world.
///
/// Regions draw one biome each in row-major order. Cells whose noise sample
/// exceeds the boundary threshold adopt the biome of the diagonally adjacent
/// region on the side of the region the cell leans towards.
pub(crate) fn synthesize_biomes(
    config: &GenerationConfig,
    rng: &mut dyn RandomSource,
    noise: &dyn CoherentNoise,
) -> Grid<Biome> {
    let regions = draw_regions(config, rng);
    let region_size = config.region_size;
    let last_region = regions.size().saturating_sub(1);
    let mut biomes = Grid::filled(config.world_size, Biome::Void);

    for row in 0..config.world_size {
        for column in 0..config.world_size {
            let cell = CellCoord::new(column, row);
            let region = CellCoord::new(column / region_size, row / region_size);
            let sample = noise.sample(
                f64::from(column) * config.boundary_noise_scale,
                f64::from(row) * config.boundary_noise_scale,
            );

            let source = if sample > config.boundary_noise_threshold {
                CellCoord::new(
                    neighbour_index(region.column(), column % region_size, region_size, last_region),
                    neighbour_index(region.row(), row % region_size, region_size, last_region),
                )
            } else {
                region
            };

            if let Some(biome) = regions.at(source) {
                biomes.set(cell, biome);
            }
        }
    }

    biomes
}

fn draw_regions(config: &GenerationConfig, rng: &mut dyn RandomSource) -> Grid<Biome> {
    let per_edge = config.world_size / config.region_size;
    let mut regions = Grid::filled(per_edge, Biome::Void);
    for row in 0..per_edge {
        for column in 0..per_edge {
            let biome = config.biome_table.pick(rng.next_unit());
            regions.set(CellCoord::new(column, row), biome);
        }
    }
    regions
}

/// Steps towards the next region when the local offset lies past the middle,
/// otherwise towards the previous one, clamped to the region grid.
fn neighbour_index(region: u32, local: u32, region_size: u32, last_region: u32) -> u32 {
    if local > region_size / 2 {
        (region + 1).min(last_region)
    } else {
        region.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ConstantNoise, ScriptedRandom};

    fn small_config() -> GenerationConfig {
        GenerationConfig {
            world_size: 32,
            region_size: 16,
            ..GenerationConfig::default()
        }
    }

    #[test]
    fn quiet_noise_keeps_hard_region_edges() {
        let config = small_config();
        let mut rng = ScriptedRandom::new([0.1, 0.3, 0.7, 0.9], 0.0);
        let biomes = synthesize_biomes(&config, &mut rng, &ConstantNoise(0.0));

        assert_eq!(biomes.at(CellCoord::new(0, 0)), Some(Biome::LavaFields));
        assert_eq!(biomes.at(CellCoord::new(15, 15)), Some(Biome::LavaFields));
        assert_eq!(biomes.at(CellCoord::new(16, 0)), Some(Biome::CrystalGarden));
        assert_eq!(biomes.at(CellCoord::new(0, 16)), Some(Biome::NeonCity));
        assert_eq!(biomes.at(CellCoord::new(31, 31)), Some(Biome::Void));
    }

    #[test]
    fn loud_noise_borrows_neighbouring_region() {
        let config = small_config();
        let mut rng = ScriptedRandom::new([0.1, 0.3, 0.7, 0.9], 0.0);
        let biomes = synthesize_biomes(&config, &mut rng, &ConstantNoise(0.95));

        // Far half of the first region leans towards the diagonal neighbour.
        assert_eq!(biomes.at(CellCoord::new(12, 12)), Some(Biome::Void));
        // Near half clamps to the region itself.
        assert_eq!(biomes.at(CellCoord::new(2, 2)), Some(Biome::LavaFields));
        // Mixed halves pick the region differing on one axis only.
        assert_eq!(biomes.at(CellCoord::new(12, 2)), Some(Biome::CrystalGarden));
        // Cells on the last region clamp back towards the interior.
        assert_eq!(biomes.at(CellCoord::new(17, 17)), Some(Biome::LavaFields));
    }

    #[test]
    fn draws_one_value_per_region() {
        let config = GenerationConfig::default();
        let mut rng = ScriptedRandom::new(vec![0.5; 64], 0.5);
        let _ = synthesize_biomes(&config, &mut rng, &ConstantNoise(0.0));
        assert_eq!(rng.remaining(), 0);
    }
}

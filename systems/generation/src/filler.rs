use hitbox_core::{Grid, TileKind};

use crate::{config::GenerationConfig, random::RandomSource, stampers::Canvas};

/// Converts every remaining floor placeholder into a biome-appropriate tile.
///
/// Each floor cell draws one roll against its biome's table; explosions draw a
/// second value for their initial timer. Returns the explosion timer layer,
/// zero wherever no explosion was placed.
pub(crate) fn fill_floor(
    canvas: &mut Canvas,
    config: &GenerationConfig,
    rng: &mut dyn RandomSource,
) -> Grid<u32> {
    let mut timers = Grid::filled(canvas.tiles.size(), 0_u32);
    let cells: Vec<_> = canvas
        .tiles
        .iter()
        .filter(|(_, tile)| **tile == TileKind::Floor)
        .map(|(cell, _)| cell)
        .collect();

    for cell in cells {
        let Some(biome) = canvas.biomes.at(cell) else {
            continue;
        };
        let tile = config.fill.table_for(biome).pick(rng.next_unit());
        canvas.tiles.set(cell, tile);

        if tile == TileKind::Explosion {
            let timer = rng.range_u32(config.explosion_timer_min, config.explosion_timer_max);
            timers.set(cell, timer);
        }
    }

    timers
}

#[cfg(test)]
mod tests {
    use hitbox_core::{Biome, CellCoord};

    use super::*;
    use crate::random::ScriptedRandom;

    #[test]
    fn only_floor_cells_are_filled() {
        let mut canvas = Canvas::new(Grid::filled(4, Biome::CrystalGarden));
        canvas.tiles.set(CellCoord::new(0, 0), TileKind::Wall);
        canvas.tiles.set(CellCoord::new(1, 0), TileKind::Coin);
        let mut rng = ScriptedRandom::constant(0.1);

        let _ = fill_floor(&mut canvas, &GenerationConfig::default(), &mut rng);

        assert_eq!(canvas.tiles.at(CellCoord::new(0, 0)), Some(TileKind::Wall));
        assert_eq!(canvas.tiles.at(CellCoord::new(1, 0)), Some(TileKind::Coin));
        let grass = canvas
            .tiles
            .values()
            .filter(|tile| **tile == TileKind::Grass)
            .count();
        assert_eq!(grass, 14);
    }

    #[test]
    fn explosions_receive_initial_timers_in_range() {
        let mut canvas = Canvas::new(Grid::filled(2, Biome::LavaFields));
        // roll, timer draw, repeated for each of the four cells.
        let mut rng = ScriptedRandom::new([0.5, 0.0, 0.5, 0.999, 0.9, 0.5, 0.1], 0.9);

        let timers = fill_floor(&mut canvas, &GenerationConfig::default(), &mut rng);

        assert_eq!(canvas.tiles.at(CellCoord::new(0, 0)), Some(TileKind::Explosion));
        assert_eq!(timers.at(CellCoord::new(0, 0)), Some(60));
        assert_eq!(canvas.tiles.at(CellCoord::new(1, 0)), Some(TileKind::Explosion));
        assert_eq!(timers.at(CellCoord::new(1, 0)), Some(179));
        assert_eq!(canvas.tiles.at(CellCoord::new(0, 1)), Some(TileKind::Floor));
        assert_eq!(timers.at(CellCoord::new(0, 1)), Some(0));
        assert_eq!(canvas.tiles.at(CellCoord::new(1, 1)), Some(TileKind::Explosion));
        assert_eq!(timers.at(CellCoord::new(1, 1)), Some(60 + 12));
    }
}

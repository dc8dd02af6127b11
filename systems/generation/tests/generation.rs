use hitbox_core::{CellCoord, TileKind, START_CELL};
use hitbox_system_generation::{
    ConstantNoise, GeneratedWorld, GenerationConfig, GenerationReport, Generator, ScriptedRandom,
};

fn generator() -> Generator {
    Generator::new(GenerationConfig::default()).expect("default config is valid")
}

fn seeded(seed: u64) -> GeneratedWorld {
    generator().generate_seeded(seed)
}

#[test]
fn identical_seeds_generate_identical_worlds() {
    let first = seeded(1234);
    let second = seeded(1234);

    assert_eq!(first.tiles, second.tiles);
    assert_eq!(first.biomes, second.biomes);
    assert_eq!(first.explosion_timers, second.explosion_timers);
    assert_eq!(first.hazards, second.hazards);
    assert_eq!(first.report, second.report);
}

#[test]
fn different_seeds_generate_different_worlds() {
    assert_ne!(seeded(1).tiles, seeded(2).tiles);
}

#[test]
fn explosion_timers_exist_exactly_on_explosions() {
    for seed in 0..8 {
        let world = seeded(seed);
        for (cell, tile) in world.tiles.iter() {
            let timer = world.explosion_timers.at(cell).expect("timer layer covers grid");
            if *tile == TileKind::Explosion {
                assert!((60..180).contains(&timer), "seed {seed} cell {cell:?} timer {timer}");
            } else {
                assert_eq!(timer, 0, "seed {seed} cell {cell:?}");
            }
        }
    }
}

#[test]
fn hazards_patrol_connected_cyclic_paths() {
    for seed in 0..8 {
        let world = seeded(seed);
        assert!(world.hazards.len() <= 10);
        assert_eq!(world.report.hazards_placed as usize, world.hazards.len());

        let markers = world
            .tiles
            .values()
            .filter(|tile| **tile == TileKind::MovingHazard)
            .count();
        assert_eq!(markers, world.hazards.len(), "seed {seed}");

        for hazard in &world.hazards {
            let start = hazard.start().expect("placed hazards have paths");
            assert!(hazard.path.len() > 2);
            assert!(start.euclidean_distance(START_CELL) > 15.0);
            assert_eq!(world.tiles.at(start), Some(TileKind::MovingHazard));
            assert_eq!(hazard.under_tile, TileKind::Floor);
            assert!(hazard.move_timer < hazard.move_speed);

            for (index, cell) in hazard.path.iter().enumerate() {
                let next = hazard.path[(index + 1) % hazard.path.len()];
                assert_eq!(cell.manhattan_distance(next), 1, "seed {seed} path {:?}", hazard.path);
                if *cell != start {
                    assert_eq!(world.tiles.at(*cell), Some(TileKind::Floor));
                }
            }
        }
    }
}

#[test]
fn hazard_paths_never_share_cells() {
    for seed in 0..8 {
        let world = seeded(seed);
        let mut seen = std::collections::HashSet::new();
        for cell in world.hazards.iter().flat_map(|hazard| hazard.path.iter()) {
            let _ = seen.insert(*cell);
        }
        let distinct_per_hazard: usize = world
            .hazards
            .iter()
            .map(|hazard| {
                hazard
                    .path
                    .iter()
                    .collect::<std::collections::HashSet<_>>()
                    .len()
            })
            .sum();
        assert_eq!(seen.len(), distinct_per_hazard, "seed {seed}");
    }
}

#[test]
fn report_counts_match_tiles() {
    let world = seeded(77);
    let coins = world
        .tiles
        .values()
        .filter(|tile| **tile == TileKind::Coin)
        .count();
    assert_eq!(world.report.coins as usize, coins);
}

#[test]
fn degenerate_world_proceeds_without_hazards() {
    let mut rng = ScriptedRandom::constant(0.0);
    let world = generator().generate(&mut rng, &ConstantNoise(0.0));

    assert!(world.hazards.is_empty());
    assert_eq!(world.report.hazard_attempts, 50);
    assert!(world.report.hazard_shortfall());

    assert_eq!(world.tiles.at(START_CELL), Some(TileKind::Grass));
    assert_eq!(world.tiles.at(CellCoord::new(10, 10)), Some(TileKind::Shrine));
    assert_eq!(world.tiles.at(CellCoord::new(10, 9)), Some(TileKind::Coin));
    assert_eq!(world.tiles.at(CellCoord::new(40, 20)), Some(TileKind::Lava));
    assert_eq!(world.tiles.at(CellCoord::new(15, 10)), Some(TileKind::Wall));
}

#[test]
fn degenerate_world_matches_golden_layout() {
    let mut rng = ScriptedRandom::constant(0.0);
    let world = generator().generate(&mut rng, &ConstantNoise(0.0));

    assert_eq!(
        world.report,
        GenerationReport {
            hazards_requested: 10,
            hazards_placed: 0,
            hazard_attempts: 50,
            coins: 64,
            explosions: 0,
        }
    );

    let histogram: Vec<(TileKind, usize)> = TileKind::ALL
        .iter()
        .map(|kind| (*kind, world.tiles.values().filter(|tile| *tile == kind).count()))
        .collect();
    assert_eq!(
        histogram,
        vec![
            (TileKind::Floor, 4),
            (TileKind::Grass, 197),
            (TileKind::Lava, 16_106),
            (TileKind::Coin, 64),
            (TileKind::Wall, 12),
            (TileKind::Shrine, 1),
            (TileKind::Explosion, 0),
            (TileKind::MovingHazard, 0),
        ]
    );
}

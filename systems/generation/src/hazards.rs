use std::collections::HashSet;

use hitbox_core::{CellCoord, Grid, TileKind};

use crate::{config::HazardConfig, random::RandomSource};

/// Moving hazard produced by the placer, positioned on the first cell of its path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedHazard {
    /// Cyclic patrol path; the hazard starts on its first cell.
    pub path: Vec<CellCoord>,
    /// Initial phase offset in `[0, move_speed)`.
    pub move_timer: u32,
    /// Ticks between two steps.
    pub move_speed: u32,
    /// Tile the hazard covered when it was placed.
    pub under_tile: TileKind,
}

impl PlacedHazard {
    /// Cell the hazard occupies after placement.
    #[must_use]
    pub fn start(&self) -> Option<CellCoord> {
        self.path.first().copied()
    }
}

/// Outcome of a hazard placement pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct HazardPlacement {
    pub(crate) hazards: Vec<PlacedHazard>,
    pub(crate) attempts: u32,
}

/// Places up to `config.target` hazards within `config.attempts` candidates.
///
/// Accepted hazards overwrite their starting cell with
/// [`TileKind::MovingHazard`]. Patrol paths never share cells.
pub(crate) fn place_hazards(
    tiles: &mut Grid<TileKind>,
    config: &HazardConfig,
    start: CellCoord,
    rng: &mut dyn RandomSource,
) -> HazardPlacement {
    let mut placement = HazardPlacement::default();
    let mut claimed = HashSet::new();
    let size = tiles.size();
    let low = config.margin;
    let high = size.saturating_sub(config.margin);

    while placement.hazards.len() < config.target as usize && placement.attempts < config.attempts {
        placement.attempts += 1;

        let column = rng.range_u32(low, high);
        let row = rng.range_u32(low, high);
        let candidate = CellCoord::new(column, row);
        if candidate.euclidean_distance(start) <= config.min_start_distance
            || tiles.at(candidate) != Some(TileKind::Floor)
        {
            continue;
        }

        let horizontal = rng.next_unit() > 0.5;
        let length = rng.range_u32(config.min_path_length, config.max_path_length);
        let path = patrol_path(tiles, &claimed, candidate, horizontal, length);
        if path.len() <= 2 {
            continue;
        }

        let move_timer = rng.range_u32(0, config.move_speed);
        let under_tile = tiles.at(candidate).unwrap_or(TileKind::Floor);
        tiles.set(candidate, TileKind::MovingHazard);
        claimed.extend(path.iter().copied());
        placement.hazards.push(PlacedHazard {
            path,
            move_timer,
            move_speed: config.move_speed,
            under_tile,
        });
    }

    placement
}

/// Builds a back-and-forth path from `origin` along one axis.
///
/// The forward leg stops at the first cell that leaves the grid, is not floor,
/// or already belongs to another hazard. The return leg walks the forward
/// leg's interior back towards the origin so the sequence repeats cleanly.
fn patrol_path(
    tiles: &Grid<TileKind>,
    claimed: &HashSet<CellCoord>,
    origin: CellCoord,
    horizontal: bool,
    length: u32,
) -> Vec<CellCoord> {
    let mut forward = Vec::with_capacity(length as usize);
    for step in 0..length {
        let cell = if horizontal {
            CellCoord::new(origin.column() + step, origin.row())
        } else {
            CellCoord::new(origin.column(), origin.row() + step)
        };
        if tiles.at(cell) != Some(TileKind::Floor) || claimed.contains(&cell) {
            break;
        }
        forward.push(cell);
    }

    let interior = forward.len().saturating_sub(1);
    let back: Vec<_> = forward
        .get(1..interior)
        .unwrap_or(&[])
        .iter()
        .rev()
        .copied()
        .collect();
    forward.extend(back);
    forward
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    fn config() -> HazardConfig {
        HazardConfig {
            target: 1,
            attempts: 1,
            margin: 0,
            min_start_distance: 0.5,
            min_path_length: 4,
            max_path_length: 8,
            move_speed: 30,
        }
    }

    /// Script selecting cell `(column, row)` of a 32-wide grid, an axis, and a length.
    fn script(column: u32, row: u32, horizontal: bool, length: u32, phase: f64) -> ScriptedRandom {
        let unit = |value: u32, span: u32| (f64::from(value) + 0.5) / f64::from(span);
        ScriptedRandom::new(
            [
                unit(column, 32),
                unit(row, 32),
                if horizontal { 0.9 } else { 0.1 },
                unit(length - 4, 4),
                phase,
            ],
            0.0,
        )
    }

    #[test]
    fn builds_palindromic_horizontal_path() {
        let mut tiles = Grid::filled(32, TileKind::Floor);
        let mut rng = script(10, 20, true, 5, 0.5);
        let placement = place_hazards(&mut tiles, &config(), CellCoord::new(0, 0), &mut rng);

        assert_eq!(placement.hazards.len(), 1);
        let hazard = &placement.hazards[0];
        let columns: Vec<_> = hazard.path.iter().map(|cell| cell.column()).collect();
        assert_eq!(columns, vec![10, 11, 12, 13, 14, 13, 12, 11]);
        assert!(hazard.path.iter().all(|cell| cell.row() == 20));
        assert_eq!(hazard.move_timer, 15);
        assert_eq!(hazard.under_tile, TileKind::Floor);
        assert_eq!(
            tiles.at(CellCoord::new(10, 20)),
            Some(TileKind::MovingHazard)
        );
    }

    #[test]
    fn forward_leg_stops_at_obstacle() {
        let mut tiles = Grid::filled(32, TileKind::Floor);
        tiles.set(CellCoord::new(5, 9), TileKind::Wall);
        let mut rng = script(5, 6, false, 7, 0.0);
        let placement = place_hazards(&mut tiles, &config(), CellCoord::new(0, 0), &mut rng);

        let rows: Vec<_> = placement.hazards[0]
            .path
            .iter()
            .map(|cell| cell.row())
            .collect();
        assert_eq!(rows, vec![6, 7, 8, 7]);
    }

    #[test]
    fn short_paths_are_discarded() {
        let mut tiles = Grid::filled(32, TileKind::Floor);
        tiles.set(CellCoord::new(12, 4), TileKind::Lava);
        let mut rng = script(10, 4, true, 6, 0.0);
        let placement = place_hazards(&mut tiles, &config(), CellCoord::new(0, 0), &mut rng);

        assert!(placement.hazards.is_empty());
        assert_eq!(placement.attempts, 1);
        assert!(tiles.values().all(|tile| *tile != TileKind::MovingHazard));
    }

    #[test]
    fn candidates_near_start_are_rejected() {
        let mut tiles = Grid::filled(32, TileKind::Floor);
        let config = HazardConfig {
            min_start_distance: 15.0,
            ..config()
        };
        let mut rng = script(16, 16, true, 5, 0.0);
        let placement = place_hazards(&mut tiles, &config, CellCoord::new(16, 16), &mut rng);
        assert!(placement.hazards.is_empty());
    }

    #[test]
    fn exhausted_attempts_yield_fewer_hazards() {
        let mut tiles = Grid::filled(32, TileKind::Wall);
        let config = HazardConfig {
            target: 10,
            attempts: 50,
            ..config()
        };
        let mut rng = ScriptedRandom::constant(0.7);
        let placement = place_hazards(&mut tiles, &config, CellCoord::new(0, 0), &mut rng);

        assert!(placement.hazards.is_empty());
        assert_eq!(placement.attempts, 50);
    }

    #[test]
    fn paths_never_overlap() {
        let mut tiles = Grid::filled(32, TileKind::Floor);
        let config = HazardConfig {
            target: 2,
            attempts: 2,
            ..config()
        };
        let mut first = script(10, 10, true, 7, 0.0);
        let placement = place_hazards(&mut tiles, &config, CellCoord::new(0, 0), &mut first);
        assert_eq!(placement.hazards.len(), 1);

        // A vertical path starting above the first path must stop before crossing it.
        let mut claimed = HashSet::new();
        claimed.extend(placement.hazards[0].path.iter().copied());
        let path = patrol_path(&tiles, &claimed, CellCoord::new(12, 8), false, 5);
        assert_eq!(path, vec![CellCoord::new(12, 8), CellCoord::new(12, 9)]);
    }
}

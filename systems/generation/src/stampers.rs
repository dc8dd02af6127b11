use hitbox_core::{Biome, CellCoord, Grid, TileKind};

use crate::random::RandomSource;

const RING_TOLERANCE: f64 = 1e-9;

/// Tile and biome layers mutated by the structure stampers.
#[derive(Clone, Debug)]
pub(crate) struct Canvas {
    pub(crate) tiles: Grid<TileKind>,
    pub(crate) biomes: Grid<Biome>,
}

impl Canvas {
    pub(crate) fn new(biomes: Grid<Biome>) -> Self {
        Self {
            tiles: Grid::filled(biomes.size(), TileKind::Floor),
            biomes,
        }
    }

    fn size(&self) -> u32 {
        self.tiles.size()
    }

    /// Cells of the square `[center - radius, center + radius]` that lie in the grid,
    /// row by row.
    fn square_around(&self, center: CellCoord, radius: u32) -> Vec<CellCoord> {
        let last = self.size().saturating_sub(1);
        let rows = center.row().saturating_sub(radius)..=center.row().saturating_add(radius).min(last);
        rows.flat_map(|row| {
            let columns = center.column().saturating_sub(radius)
                ..=center.column().saturating_add(radius).min(last);
            columns.map(move |column| CellCoord::new(column, row))
        })
        .collect()
    }
}

/// Forces every cell within Euclidean `radius` of `center` to safe-zone floor.
pub(crate) fn carve_safe_zone(canvas: &mut Canvas, center: CellCoord, radius: u32) {
    let limit = f64::from(radius);
    for cell in canvas.square_around(center, radius) {
        if cell.euclidean_distance(center) <= limit {
            canvas.biomes.set(cell, Biome::SafeZone);
            canvas.tiles.set(cell, TileKind::Floor);
        }
    }
}

/// Stamps a `width × height` room anchored at `origin`.
///
/// Border cells become walls unless the roll lands within `gap_chance`, in
/// which case they keep their previous tile. Interior cells become floor.
pub(crate) fn carve_room(
    canvas: &mut Canvas,
    origin: CellCoord,
    width: u32,
    height: u32,
    gap_chance: f64,
    rng: &mut dyn RandomSource,
) {
    if width == 0 || height == 0 {
        return;
    }

    let right = origin.column() + width - 1;
    let bottom = origin.row() + height - 1;
    let size = canvas.size();

    for row in origin.row()..=bottom.min(size.saturating_sub(1)) {
        for column in origin.column()..=right.min(size.saturating_sub(1)) {
            let cell = CellCoord::new(column, row);
            let on_border = column == origin.column()
                || column == right
                || row == origin.row()
                || row == bottom;

            if on_border {
                if !rng.chance(gap_chance) {
                    canvas.tiles.set(cell, TileKind::Wall);
                }
            } else {
                canvas.tiles.set(cell, TileKind::Floor);
            }
        }
    }
}

/// Stamps a circular treasure room: a wall ring at exactly `radius`, coins or floor inside.
pub(crate) fn carve_treasure_room(
    canvas: &mut Canvas,
    center: CellCoord,
    radius: u32,
    coin_chance: f64,
    rng: &mut dyn RandomSource,
) {
    let limit = f64::from(radius);
    for cell in canvas.square_around(center, radius) {
        let distance = cell.euclidean_distance(center);
        if distance > limit {
            continue;
        }

        let tile = if (distance - limit).abs() < RING_TOLERANCE {
            TileKind::Wall
        } else if rng.chance(coin_chance) {
            TileKind::Coin
        } else {
            TileKind::Floor
        };
        canvas.tiles.set(cell, tile);
    }
}

/// Carves a two-wide floor corridor between `from` and `to`.
///
/// One step is taken per whole unit of Euclidean distance; each step marks the
/// interpolated cell plus its right and lower neighbours. Coincident or
/// sub-unit endpoints carve nothing.
pub(crate) fn carve_path(canvas: &mut Canvas, from: CellCoord, to: CellCoord) {
    let steps = from.euclidean_distance(to).floor();
    if steps < 1.0 {
        return;
    }

    let (x1, y1) = (f64::from(from.column()), f64::from(from.row()));
    let (x2, y2) = (f64::from(to.column()), f64::from(to.row()));
    let step_count = steps as u32;

    for step in 0..=step_count {
        let t = f64::from(step) / steps;
        let x = (x1 + (x2 - x1) * t).floor();
        let y = (y1 + (y2 - y1) * t).floor();
        if x < 0.0 || y < 0.0 {
            continue;
        }

        let cell = CellCoord::new(x as u32, y as u32);
        if !canvas.tiles.contains(cell) {
            continue;
        }
        canvas.tiles.set(cell, TileKind::Floor);
        canvas
            .tiles
            .set(CellCoord::new(cell.column() + 1, cell.row()), TileKind::Floor);
        canvas
            .tiles
            .set(CellCoord::new(cell.column(), cell.row() + 1), TileKind::Floor);
    }
}

/// Stamps a shrine: a 3×3 floor square with a shrine centre and four orthogonal coins.
///
/// Centres without a one-cell margin to every edge are ignored.
pub(crate) fn stamp_shrine(canvas: &mut Canvas, center: CellCoord) {
    let size = canvas.size();
    let (column, row) = (center.column(), center.row());
    if column < 1 || row < 1 || column + 1 >= size || row + 1 >= size {
        return;
    }

    for cell in canvas.square_around(center, 1) {
        canvas.tiles.set(cell, TileKind::Floor);
    }
    canvas.tiles.set(center, TileKind::Shrine);
    for neighbour in [
        CellCoord::new(column, row - 1),
        CellCoord::new(column, row + 1),
        CellCoord::new(column - 1, row),
        CellCoord::new(column + 1, row),
    ] {
        canvas.tiles.set(neighbour, TileKind::Coin);
    }
}

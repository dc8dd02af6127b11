use glam::UVec2;
use hitbox_core::CellCoord;

use crate::RenderingError;

/// Tiles visible along each edge of the viewport.
pub const VIEW_TILES: u32 = 32;

/// Square viewport following the player, clamped to the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Camera {
    origin: UVec2,
    view_tiles: u32,
    world_size: u32,
}

impl Camera {
    /// Creates a camera showing `view_tiles × view_tiles` cells of a `world_size` world.
    ///
    /// Views larger than the world shrink to the world.
    pub fn new(view_tiles: u32, world_size: u32) -> Result<Self, RenderingError> {
        if view_tiles == 0 {
            return Err(RenderingError::EmptyView);
        }
        Ok(Self {
            origin: UVec2::ZERO,
            view_tiles: view_tiles.min(world_size),
            world_size,
        })
    }

    /// Centres the view on `focus`, keeping it inside the world.
    pub fn follow(&mut self, focus: CellCoord) {
        let half = self.view_tiles / 2;
        let limit = self.world_size.saturating_sub(self.view_tiles);
        self.origin = UVec2::new(
            focus.column().saturating_sub(half).min(limit),
            focus.row().saturating_sub(half).min(limit),
        );
    }

    /// World cell shown in the top-left corner.
    #[must_use]
    pub fn origin(&self) -> CellCoord {
        CellCoord::new(self.origin.x, self.origin.y)
    }

    /// Tiles visible along each edge.
    #[must_use]
    pub const fn view_tiles(&self) -> u32 {
        self.view_tiles
    }

    /// Visible world cells in row-major view order.
    pub fn visible_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (0..self.view_tiles).flat_map(move |row| {
            (0..self.view_tiles)
                .map(move |column| CellCoord::new(self.origin.x + column, self.origin.y + row))
        })
    }

    /// World cell under a view-space position, when inside the view.
    #[must_use]
    pub fn to_world(&self, view: UVec2) -> Option<CellCoord> {
        if view.x >= self.view_tiles || view.y >= self.view_tiles {
            return None;
        }
        let cell = self.origin + view;
        Some(CellCoord::new(cell.x, cell.y))
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Hitbox adapters.
//!
//! Adapters capture world state into a [`Scene`], pick a [`Theme`] through the
//! [`ThemeSelector`], and hand both to a [`RenderingBackend`]. Nothing in this
//! crate mutates the simulation.

mod camera;
mod themes;

use anyhow::Result as AnyResult;
use hitbox_core::{CellCoord, Direction, ExplosionPhase, GameState, ShakeEffect, TileKind};
use thiserror::Error;

pub use camera::{Camera, VIEW_TILES};
pub use themes::{Ascii, PixelArt, Theme, ThemeKind, ThemeSelector, TileStyle, Vaporwave};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the color moved towards white by `amount`.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        self.map_rgb(|channel| channel + (1.0 - channel) * amount)
    }

    /// Returns the color moved towards black by `amount`.
    #[must_use]
    pub fn darken(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        self.map_rgb(|channel| channel * (1.0 - amount))
    }

    fn map_rgb(self, map: impl Fn(f32) -> f32) -> Self {
        Self::new(map(self.red), map(self.green), map(self.blue), self.alpha)
    }
}

/// Input gathered by adapters for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Movement requested this frame.
    pub direction: Option<Direction>,
    /// Whether the player confirmed the start screen or requested a restart.
    pub confirm: bool,
    /// Whether the player asked to cycle to the next theme.
    pub next_theme: bool,
    /// View-space cell under the pointer, if any.
    pub hover: Option<(u32, u32)>,
}

/// Whether the backend should keep presenting frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    /// Present another frame.
    Continue,
    /// Stop after presenting the current frame.
    Exit,
}

/// Visible cell captured for presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneTile {
    /// World coordinate of the cell.
    pub cell: CellCoord,
    /// Revealed tile, or `None` while fogged.
    pub tile: Option<TileKind>,
    /// Countdown phase when the tile is an explosion.
    pub explosion: Option<ExplosionPhase>,
}

/// Heads-up display contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Hud {
    /// Current score.
    pub score: u32,
    /// Remaining lives.
    pub lives: u32,
    /// Revealed tile under the pointer.
    pub hovered: Option<(CellCoord, TileKind)>,
}

/// Scene description combining the viewport, visible tiles and the player.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Whether the session is on the start screen or playing.
    pub game_state: GameState,
    /// Viewport the tiles were captured through.
    pub camera: Camera,
    /// Visible cells in row-major view order.
    pub tiles: Vec<SceneTile>,
    /// Cell occupied by the player.
    pub player: CellCoord,
    /// Whether the hurt indicator is active.
    pub player_hurt: bool,
    /// Heads-up display contents.
    pub hud: Hud,
    /// Active screen shake.
    pub shake: Option<ShakeEffect>,
    /// Animation frame counter.
    pub frame: u64,
}

impl Scene {
    /// Creates a start-screen scene with an empty viewport.
    #[must_use]
    pub fn start_screen(camera: Camera) -> Self {
        Self {
            game_state: GameState::Start,
            camera,
            tiles: Vec::new(),
            player: camera.origin(),
            player_hurt: false,
            hud: Hud::default(),
            shake: None,
            frame: 0,
        }
    }

    /// Captured cell at view position `(column, row)`.
    #[must_use]
    pub fn tile_at_view(&self, column: u32, row: u32) -> Option<&SceneTile> {
        let view = self.camera.view_tiles();
        if column >= view || row >= view {
            return None;
        }
        let index = usize::try_from(row * view + column).ok()?;
        self.tiles.get(index)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window or printed banner.
    pub window_title: String,
    /// Theme used to style the scene.
    pub theme: ThemeKind,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, theme: ThemeKind, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            theme,
            scene,
        }
    }

    /// Style of every visible cell in row-major view order, player included.
    #[must_use]
    pub fn styled_cells(&self) -> Vec<TileStyle> {
        let theme = self.theme.theme();
        let scene = &self.scene;
        scene
            .tiles
            .iter()
            .map(|tile| {
                if tile.cell == scene.player && scene.game_state == GameState::Playing {
                    theme.player(scene.player_hurt)
                } else {
                    match tile.tile {
                        Some(kind) => theme.tile(kind, tile.explosion, scene.frame),
                        None => theme.fog(),
                    }
                }
            })
            .collect()
    }
}

/// Rendering backend capable of presenting Hitbox scenes.
pub trait RenderingBackend {
    /// Runs the backend until the update closure asks it to exit.
    ///
    /// `update_scene` receives the input captured for each frame and may
    /// mutate the presentation before it is drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Presentation) -> FrameControl;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderingError {
    /// Viewports must show at least one tile.
    #[error("viewport must show at least one tile")]
    EmptyView,
}

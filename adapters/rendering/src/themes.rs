use hitbox_core::{ExplosionPhase, TileKind};

use crate::Color;

/// Visual description of a single cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileStyle {
    /// Fill color of the cell.
    pub fill: Color,
    /// Glyph drawn on top of the fill; text backends draw only this.
    pub glyph: char,
}

impl TileStyle {
    /// Creates a new tile style.
    #[must_use]
    pub const fn new(fill: Color, glyph: char) -> Self {
        Self { fill, glyph }
    }
}

/// Polymorphic visual skin. The simulation never references a theme.
pub trait Theme {
    /// Identifier of the theme.
    fn kind(&self) -> ThemeKind;

    /// Human readable name shown on the start screen.
    fn name(&self) -> &'static str;

    /// Style of cells hidden by fog of war.
    fn fog(&self) -> TileStyle;

    /// Style of a revealed tile on animation frame `frame`.
    ///
    /// `explosion` carries the countdown phase when the tile is an explosion.
    fn tile(&self, tile: TileKind, explosion: Option<ExplosionPhase>, frame: u64) -> TileStyle;

    /// Style of the player marker.
    fn player(&self, hurt: bool) -> TileStyle;
}

/// Available themes, in selector order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ThemeKind {
    /// Neon pinks and purples.
    Vaporwave,
    /// NES-style palette.
    PixelArt,
    /// Green-on-black terminal glyphs.
    Ascii,
}

impl ThemeKind {
    /// Every theme in selector order.
    pub const ALL: [ThemeKind; 3] = [ThemeKind::Vaporwave, ThemeKind::PixelArt, ThemeKind::Ascii];

    /// Shared instance implementing the theme.
    #[must_use]
    pub fn theme(self) -> &'static dyn Theme {
        match self {
            Self::Vaporwave => &Vaporwave,
            Self::PixelArt => &PixelArt,
            Self::Ascii => &Ascii,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Vaporwave => 0,
            Self::PixelArt => 1,
            Self::Ascii => 2,
        }
    }
}

/// Cyclic theme picker driven by the start screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemeSelector {
    index: usize,
}

impl ThemeSelector {
    /// Creates a selector positioned on `kind`.
    #[must_use]
    pub fn new(kind: ThemeKind) -> Self {
        Self { index: kind.index() }
    }

    /// Currently selected theme.
    #[must_use]
    pub fn current(&self) -> ThemeKind {
        ThemeKind::ALL[self.index % ThemeKind::ALL.len()]
    }

    /// Selects and returns the next theme, wrapping around.
    pub fn next(&mut self) -> ThemeKind {
        self.index = (self.index + 1) % ThemeKind::ALL.len();
        self.current()
    }
}

impl Default for ThemeSelector {
    fn default() -> Self {
        Self::new(ThemeKind::Vaporwave)
    }
}

fn cycle(glyphs: &[char], frame: u64, period: u64) -> char {
    let step = usize::try_from(frame / period.max(1)).unwrap_or(0);
    glyphs.get(step % glyphs.len().max(1)).copied().unwrap_or(' ')
}

fn explosion_glyph(phase: Option<ExplosionPhase>, frame: u64) -> (char, bool) {
    match phase {
        Some(ExplosionPhase::Detonating) => (cycle(&['✱', '※', '✹'], frame, 4), true),
        Some(ExplosionPhase::Warning) if frame % 10 < 5 => ('!', true),
        _ => ('*', false),
    }
}

/// Neon vaporwave theme.
#[derive(Clone, Copy, Debug, Default)]
pub struct Vaporwave;

impl Theme for Vaporwave {
    fn kind(&self) -> ThemeKind {
        ThemeKind::Vaporwave
    }

    fn name(&self) -> &'static str {
        "Vaporwave"
    }

    fn fog(&self) -> TileStyle {
        TileStyle::new(Color::from_rgb_u8(30, 10, 50), ' ')
    }

    fn tile(&self, tile: TileKind, explosion: Option<ExplosionPhase>, frame: u64) -> TileStyle {
        match tile {
            TileKind::Floor => TileStyle::new(Color::from_rgb_u8(75, 0, 130), '.'),
            TileKind::Grass => TileStyle::new(Color::from_rgb_u8(0, 255, 255).darken(0.5), ','),
            TileKind::Lava => TileStyle::new(Color::from_rgb_u8(255, 20, 147), '~'),
            TileKind::Coin => TileStyle::new(Color::from_rgb_u8(255, 215, 0), '$'),
            TileKind::Wall => TileStyle::new(Color::from_rgb_u8(138, 43, 226), '#'),
            TileKind::Shrine => TileStyle::new(Color::from_rgb_u8(0, 255, 255), '+'),
            TileKind::Explosion => {
                let (glyph, hot) = explosion_glyph(explosion, frame);
                let base = Color::from_rgb_u8(255, 71, 184);
                TileStyle::new(if hot { base.lighten(0.5) } else { base }, glyph)
            }
            TileKind::MovingHazard => TileStyle::new(Color::from_rgb_u8(255, 0, 80), 'x'),
        }
    }

    fn player(&self, hurt: bool) -> TileStyle {
        let fill = if hurt {
            Color::from_rgb_u8(255, 20, 147)
        } else {
            Color::from_rgb_u8(0, 255, 255)
        };
        TileStyle::new(fill, '@')
    }
}

/// NES-inspired pixel art theme.
#[derive(Clone, Copy, Debug, Default)]
pub struct PixelArt;

impl Theme for PixelArt {
    fn kind(&self) -> ThemeKind {
        ThemeKind::PixelArt
    }

    fn name(&self) -> &'static str {
        "Pixel Art Retro"
    }

    fn fog(&self) -> TileStyle {
        TileStyle::new(Color::from_rgb_u8(40, 40, 60), ' ')
    }

    fn tile(&self, tile: TileKind, explosion: Option<ExplosionPhase>, frame: u64) -> TileStyle {
        match tile {
            TileKind::Floor => TileStyle::new(Color::from_rgb_u8(188, 148, 92), '.'),
            TileKind::Grass => TileStyle::new(Color::from_rgb_u8(0, 168, 0), '"'),
            TileKind::Lava => TileStyle::new(Color::from_rgb_u8(248, 56, 0), '~'),
            TileKind::Coin => TileStyle::new(Color::from_rgb_u8(252, 188, 0), 'o'),
            TileKind::Wall => TileStyle::new(Color::from_rgb_u8(80, 80, 80), '#'),
            TileKind::Shrine => TileStyle::new(Color::from_rgb_u8(160, 120, 252), '&'),
            TileKind::Explosion => {
                let (glyph, hot) = explosion_glyph(explosion, frame);
                let fill = if hot {
                    Color::from_rgb_u8(252, 252, 252)
                } else {
                    Color::from_rgb_u8(228, 92, 16)
                };
                TileStyle::new(fill, glyph)
            }
            TileKind::MovingHazard => TileStyle::new(Color::from_rgb_u8(0, 0, 0), 'M'),
        }
    }

    fn player(&self, hurt: bool) -> TileStyle {
        let fill = if hurt {
            Color::from_rgb_u8(248, 56, 0)
        } else {
            Color::from_rgb_u8(252, 216, 168)
        };
        TileStyle::new(fill, '@')
    }
}

/// Terminal glyph theme.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ascii;

impl Ascii {
    const TERMINAL: Color = Color::from_rgb_u8(0, 255, 0);
    const AMBER: Color = Color::from_rgb_u8(255, 191, 0);
    const DANGER: Color = Color::from_rgb_u8(255, 0, 0);
}

impl Theme for Ascii {
    fn kind(&self) -> ThemeKind {
        ThemeKind::Ascii
    }

    fn name(&self) -> &'static str {
        "ASCII Terminal"
    }

    fn fog(&self) -> TileStyle {
        TileStyle::new(Color::from_rgb_u8(0, 50, 0), ' ')
    }

    fn tile(&self, tile: TileKind, explosion: Option<ExplosionPhase>, frame: u64) -> TileStyle {
        match tile {
            TileKind::Floor => TileStyle::new(Self::TERMINAL.darken(0.7), '·'),
            TileKind::Grass => TileStyle::new(Color::from_rgb_u8(0, 180, 0), '"'),
            TileKind::Lava => TileStyle::new(Self::DANGER, cycle(&['≋', '≈', '∼'], frame, 8)),
            TileKind::Coin => TileStyle::new(Self::AMBER, cycle(&['◯', '◐', '●', '◑'], frame, 6)),
            TileKind::Wall => TileStyle::new(Color::from_rgb_u8(128, 128, 128), '█'),
            TileKind::Shrine => TileStyle::new(Self::AMBER, '✦'),
            TileKind::Explosion => {
                let (glyph, hot) = explosion_glyph(explosion, frame);
                TileStyle::new(if hot { Self::DANGER } else { Self::AMBER }, glyph)
            }
            TileKind::MovingHazard => {
                TileStyle::new(Self::DANGER, if frame % 20 < 10 { '◉' } else { '●' })
            }
        }
    }

    fn player(&self, hurt: bool) -> TileStyle {
        if hurt {
            TileStyle::new(Self::DANGER, '☹')
        } else {
            TileStyle::new(Color::from_rgb_u8(255, 255, 255), '☺')
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_wraps_after_last_theme() {
        let mut selector = ThemeSelector::default();
        assert_eq!(selector.next(), ThemeKind::PixelArt);
        assert_eq!(selector.next(), ThemeKind::Ascii);
        assert_eq!(selector.next(), ThemeKind::Vaporwave);
    }

    #[test]
    fn every_theme_reports_its_own_kind() {
        for kind in ThemeKind::ALL {
            assert_eq!(kind.theme().kind(), kind);
            assert_eq!(ThemeSelector::new(kind).current(), kind);
        }
    }

    #[test]
    fn every_tile_gets_a_visible_glyph() {
        for kind in ThemeKind::ALL {
            let theme = kind.theme();
            for tile in TileKind::ALL {
                let style = theme.tile(tile, Some(ExplosionPhase::Building), 0);
                assert!(!style.glyph.is_whitespace(), "{} {tile:?}", theme.name());
            }
        }
    }

    #[test]
    fn detonating_explosions_stand_out() {
        for kind in ThemeKind::ALL {
            let theme = kind.theme();
            let idle = theme.tile(TileKind::Explosion, Some(ExplosionPhase::Building), 0);
            let hot = theme.tile(TileKind::Explosion, Some(ExplosionPhase::Detonating), 0);
            assert_ne!(idle, hot, "{}", theme.name());
        }
    }

    #[test]
    fn warning_blinks() {
        let theme = ThemeKind::Ascii.theme();
        let on = theme.tile(TileKind::Explosion, Some(ExplosionPhase::Warning), 0);
        let off = theme.tile(TileKind::Explosion, Some(ExplosionPhase::Warning), 5);
        assert_eq!(on.glyph, '!');
        assert_eq!(off.glyph, '*');
    }
}

//! Headless backend that replays scripted input and prints the final frame.

use std::io::Write;

use anyhow::{bail, Context, Result};
use hitbox_core::{Direction, GameState};
use hitbox_rendering::{FrameControl, FrameInput, Presentation, RenderingBackend};

/// Parses a movement script.
///
/// `w`, `a`, `s` and `d` move, `r` confirms or restarts, `t` cycles the theme
/// and `.` waits one frame. Whitespace is ignored.
pub(crate) fn parse_script(script: &str) -> Result<Vec<FrameInput>> {
    script
        .chars()
        .filter(|symbol| !symbol.is_whitespace())
        .enumerate()
        .map(|(index, symbol)| {
            let mut input = FrameInput::default();
            match symbol.to_ascii_lowercase() {
                'w' => input.direction = Some(Direction::North),
                'a' => input.direction = Some(Direction::West),
                's' => input.direction = Some(Direction::South),
                'd' => input.direction = Some(Direction::East),
                'r' => input.confirm = true,
                't' => input.next_theme = true,
                '.' => {}
                other => bail!("unknown move `{other}` at position {index}"),
            }
            Ok(input)
        })
        .collect()
}

/// Parses a `COL,ROW` pointer position in view coordinates.
pub(crate) fn parse_hover(value: &str) -> Result<(u32, u32)> {
    let (column, row) = value
        .split_once(',')
        .with_context(|| format!("expected COL,ROW, got `{value}`"))?;
    let column = column
        .trim()
        .parse::<u32>()
        .with_context(|| format!("invalid column `{column}`"))?;
    let row = row
        .trim()
        .parse::<u32>()
        .with_context(|| format!("invalid row `{row}`"))?;
    Ok((column, row))
}

/// Text backend writing the last presented frame to `out`.
#[derive(Debug)]
pub(crate) struct TextBackend<W> {
    inputs: Vec<FrameInput>,
    out: W,
}

impl<W: Write> TextBackend<W> {
    pub(crate) fn new(inputs: Vec<FrameInput>, out: W) -> Self {
        Self { inputs, out }
    }

    fn draw(&mut self, presentation: &Presentation) -> Result<()> {
        let scene = &presentation.scene;
        let theme = presentation.theme.theme();
        writeln!(self.out, "{} [{}]", presentation.window_title, theme.name())?;

        if scene.game_state == GameState::Start {
            writeln!(self.out, "press r to start")?;
            return Ok(());
        }

        let view = scene.camera.view_tiles() as usize;
        let glyphs: Vec<char> = presentation
            .styled_cells()
            .into_iter()
            .map(|style| style.glyph)
            .collect();
        for row in glyphs.chunks(view.max(1)) {
            let line: String = row.iter().collect();
            writeln!(self.out, "{line}")?;
        }

        write!(
            self.out,
            "score {}  lives {}",
            scene.hud.score, scene.hud.lives
        )?;
        if let Some((cell, tile)) = scene.hud.hovered {
            write!(
                self.out,
                "  hover ({}, {}) {}",
                cell.column(),
                cell.row(),
                tile.label()
            )?;
        }
        writeln!(self.out)?;
        Ok(())
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn run<F>(mut self, mut presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut Presentation) -> FrameControl,
    {
        let inputs = std::mem::take(&mut self.inputs);
        for input in inputs {
            if update_scene(input, &mut presentation) == FrameControl::Exit {
                break;
            }
        }
        self.draw(&presentation).context("failed to write frame")?;
        self.out.flush().context("failed to flush output")
    }
}

#[cfg(test)]
mod tests {
    use hitbox_core::{CellCoord, START_CELL};
    use hitbox_rendering::{Camera, Hud, Scene, SceneTile, ThemeKind, VIEW_TILES};
    use hitbox_system_session::{Session, SessionConfig};

    use super::*;
    use crate::scene;

    fn render(scene: Scene) -> String {
        let presentation = Presentation::new("HITBOX", ThemeKind::Ascii, scene);
        let mut out = Vec::new();
        TextBackend::new(Vec::new(), &mut out)
            .run(presentation, |_, _| FrameControl::Continue)
            .expect("writing to a vector succeeds");
        String::from_utf8(out).expect("utf-8 output")
    }

    #[test]
    fn parses_wasd_script() {
        let inputs = parse_script("wd s.rt").expect("valid script");
        assert_eq!(inputs.len(), 6);
        assert_eq!(inputs[0].direction, Some(Direction::North));
        assert_eq!(inputs[1].direction, Some(Direction::East));
        assert_eq!(inputs[2].direction, Some(Direction::South));
        assert_eq!(inputs[3], FrameInput::default());
        assert!(inputs[4].confirm);
        assert!(inputs[5].next_theme);
    }

    #[test]
    fn rejects_unknown_symbols() {
        let error = parse_script("wq").expect_err("q is not a move");
        assert!(error.to_string().contains("`q`"));
    }

    #[test]
    fn parses_hover_positions() {
        assert_eq!(parse_hover("3,17").expect("valid position"), (3, 17));
        assert_eq!(parse_hover(" 0 , 31 ").expect("valid position"), (0, 31));
        assert!(parse_hover("3").is_err());
        assert!(parse_hover("a,1").is_err());
    }

    #[test]
    fn hud_names_hovered_tile_only_when_revealed() {
        let mut session = Session::new(SessionConfig::default()).expect("valid config");
        let _ = session.start_game();
        let mut camera = Camera::new(VIEW_TILES, 128).expect("positive view");
        let label = session.tile_at(START_CELL).expect("start cell exists").label();

        let revealed = render(scene::capture(&session, &mut camera, Some((16, 16)), 0));
        let hud = revealed.lines().last().expect("hud line");
        assert_eq!(hud, format!("score 0  lives 3  hover (64, 64) {label}"));

        let fogged = render(scene::capture(&session, &mut camera, Some((0, 0)), 0));
        let hud = fogged.lines().last().expect("hud line");
        assert_eq!(hud, "score 0  lives 3");
    }

    #[test]
    fn draws_grid_and_hud() {
        let camera = Camera::new(2, 2).expect("positive view");
        let tiles = camera
            .visible_cells()
            .map(|cell| SceneTile {
                cell,
                tile: None,
                explosion: None,
            })
            .collect();
        let scene = Scene {
            game_state: GameState::Playing,
            camera,
            tiles,
            player: CellCoord::new(1, 1),
            player_hurt: false,
            hud: Hud {
                score: 7,
                lives: 2,
                hovered: None,
            },
            shake: None,
            frame: 0,
        };
        let presentation = Presentation::new("HITBOX", ThemeKind::PixelArt, scene);

        let mut out = Vec::new();
        let backend = TextBackend::new(Vec::new(), &mut out);
        backend
            .run(presentation, |_, _| FrameControl::Continue)
            .expect("writing to a vector succeeds");

        let text = String::from_utf8(out).expect("utf-8 output");
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "HITBOX [Pixel Art Retro]");
        assert_eq!(lines[1], "  ");
        assert_eq!(lines[2], " @");
        assert_eq!(lines[3], "score 7  lives 2");
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a scripted Hitbox session.

mod scene;
mod text;

use std::{fs, io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hitbox_core::{Event, GameState};
use hitbox_rendering::{
    Camera, FrameControl, Presentation, RenderingBackend, ThemeKind, ThemeSelector, VIEW_TILES,
};
use hitbox_system_session::{Session, SessionConfig};
use hitbox_world::query;
use tracing_subscriber::EnvFilter;

use crate::text::TextBackend;

/// Command-line arguments accepted by the `hitbox` binary.
#[derive(Debug, Parser)]
#[command(name = "hitbox", about = "Tile-based exploration with a procedural world")]
struct CliArgs {
    /// Seed of the first generated world; overrides the config file.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file holding the session and generation configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Movement script: w/a/s/d move, r restarts, t cycles the theme, . waits.
    #[arg(long, default_value = "")]
    moves: String,
    /// Simulation ticks run after every scripted input.
    #[arg(long, default_value_t = 6)]
    ticks_per_move: u32,
    /// Pointer position `COL,ROW` in view cells; the HUD names the revealed tile under it.
    #[arg(long, value_parser = text::parse_hover)]
    hover: Option<(u32, u32)>,
    /// Theme used to draw the final frame.
    #[arg(long, value_enum, default_value_t = ThemeArg::Ascii)]
    theme: ThemeArg,
    /// Enables debug logging unless `RUST_LOG` says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ThemeArg {
    Vaporwave,
    PixelArt,
    Ascii,
}

impl From<ThemeArg> for ThemeKind {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Vaporwave => ThemeKind::Vaporwave,
            ThemeArg::PixelArt => ThemeKind::PixelArt,
            ThemeArg::Ascii => ThemeKind::Ascii,
        }
    }
}

/// Entry point for the Hitbox command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let config = load_config(&args)?;
    let mut session = Session::new(config).context("failed to create session")?;
    let mut inputs = text::parse_script(&args.moves).context("invalid --moves script")?;
    for input in &mut inputs {
        input.hover = args.hover;
    }

    let mut selector = ThemeSelector::new(args.theme.into());

    log_events(&session.start_game());
    let mut camera = Camera::new(VIEW_TILES, query::world_size(session.world()))
        .context("failed to create camera")?;
    let initial = scene::capture(&session, &mut camera, args.hover, 0);
    let banner = query::welcome_banner(session.world());
    let presentation = Presentation::new(banner, selector.current(), initial);

    let ticks_per_move = args.ticks_per_move;
    let mut frame = 0_u64;
    let backend = TextBackend::new(inputs, io::stdout().lock());
    backend.run(presentation, move |input, presentation| {
        if input.confirm {
            let events = if session.game_state() == GameState::Start {
                session.start_game()
            } else {
                session.restart()
            };
            log_events(&events);
        }
        if input.next_theme {
            presentation.theme = selector.next();
        }
        if let Some(direction) = input.direction {
            log_events(&session.step(direction));
        }
        for _ in 0..ticks_per_move {
            log_events(&session.tick());
            frame = frame.wrapping_add(1);
        }

        presentation.scene = scene::capture(&session, &mut camera, input.hover, frame);
        FrameControl::Continue
    })
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(args: &CliArgs) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            SessionConfig::from_toml_str(&contents)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => SessionConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn log_events(events: &[Event]) {
    for event in events {
        match event {
            Event::PlayerDamaged { cause, lives, .. } => {
                tracing::info!(?cause, lives, "player damaged");
            }
            Event::PlayerRespawned { .. } => tracing::info!("player respawned"),
            Event::GameStarted { seed, hazards } => {
                tracing::info!(seed, hazards, "game started");
            }
            other => tracing::trace!(event = ?other, "event"),
        }
    }
}

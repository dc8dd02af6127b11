//! Captures session state into rendering scenes.

use glam::UVec2;
use hitbox_core::GameState;
use hitbox_rendering::{Camera, Hud, Scene, SceneTile};
use hitbox_system_session::Session;
use hitbox_world::query;

/// Builds the scene visible through `camera`, re-centring it on the player first.
pub(crate) fn capture(
    session: &Session,
    camera: &mut Camera,
    hover: Option<(u32, u32)>,
    frame: u64,
) -> Scene {
    if session.game_state() == GameState::Start {
        return Scene::start_screen(*camera);
    }

    let world = session.world();
    let player = session.player();
    camera.follow(player.cell);

    let tiles = camera
        .visible_cells()
        .map(|cell| {
            let tile = query::revealed_tile(world, cell);
            SceneTile {
                cell,
                tile,
                explosion: tile.and_then(|_| query::explosion_phase_at(world, cell)),
            }
        })
        .collect();

    let hovered = hover
        .and_then(|(column, row)| camera.to_world(UVec2::new(column, row)))
        .and_then(|cell| query::revealed_tile(world, cell).map(|tile| (cell, tile)));

    Scene {
        game_state: GameState::Playing,
        camera: *camera,
        tiles,
        player: player.cell,
        player_hurt: player.hurt_timer > 0,
        hud: Hud {
            score: session.score(),
            lives: player.lives,
            hovered,
        },
        shake: session.shake(),
        frame,
    }
}

#[cfg(test)]
mod tests {
    use hitbox_core::START_CELL;
    use hitbox_rendering::VIEW_TILES;
    use hitbox_system_session::SessionConfig;

    use super::*;

    #[test]
    fn capture_hides_unrevealed_cells() {
        let mut session = Session::new(SessionConfig::default()).expect("valid config");
        let _ = session.start_game();
        let mut camera = Camera::new(VIEW_TILES, 128).expect("positive view");

        let scene = capture(&session, &mut camera, Some((16, 16)), 0);

        assert_eq!(scene.tiles.len(), (VIEW_TILES * VIEW_TILES) as usize);
        assert_eq!(scene.player, START_CELL);
        let revealed = scene.tiles.iter().filter(|tile| tile.tile.is_some()).count();
        assert_eq!(revealed, 9);
        assert_eq!(scene.hud.hovered.map(|(cell, _)| cell), Some(START_CELL));
    }

    #[test]
    fn start_screen_capture_is_empty() {
        let session = Session::new(SessionConfig::default()).expect("valid config");
        let mut camera = Camera::new(VIEW_TILES, 128).expect("positive view");
        let scene = capture(&session, &mut camera, None, 0);
        assert_eq!(scene.game_state, GameState::Start);
        assert!(scene.tiles.is_empty());
    }
}

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use hitbox_core::{Command, Direction, Event, HazardSnapshot, PlayerSnapshot};
use hitbox_system_session::{Session, SessionConfig};

#[test]
fn deterministic_replay_produces_identical_logs() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(
        first.events.iter().any(|event| event.starts_with("GameStarted")),
        "replay never started a game"
    );
}

#[test]
fn different_seeds_diverge() {
    let first = replay_with_seed(1, scripted_commands());
    let second = replay_with_seed(2, scripted_commands());
    assert_ne!(first.fingerprint(), second.fingerprint());
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    replay_with_seed(0x5eed, commands)
}

fn replay_with_seed(seed: u64, commands: Vec<Command>) -> ReplayOutcome {
    let config = SessionConfig {
        seed,
        ..SessionConfig::default()
    };
    let mut session = Session::new(config).expect("valid config");
    let mut events = Vec::new();

    for command in commands {
        record_events(&session.submit(command), &mut events);
    }

    ReplayOutcome {
        player: session.player(),
        score: session.score(),
        hazards: session.hazards().into_vec(),
        events,
    }
}

fn record_events(events: &[Event], log: &mut Vec<String>) {
    log.extend(events.iter().map(|event| format!("{event:?}")));
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = vec![Command::StartGame];
    let walk = [
        Direction::East,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::North,
        Direction::North,
        Direction::East,
    ];
    for direction in walk.iter().cycle().take(40) {
        let (dx, dy) = direction.delta();
        commands.push(Command::TryMove { dx, dy });
        for _ in 0..7 {
            commands.push(Command::Tick);
        }
    }
    commands.push(Command::Restart);
    commands.extend(std::iter::repeat(Command::Tick).take(90));
    commands
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    player: PlayerSnapshot,
    score: u32,
    hazards: Vec<HazardSnapshot>,
    events: Vec<String>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use lane_defence_core::{Command, EnemySnapshot, Event, GameState, PixelRect, Rules, SpeedTier};
use lane_defence_system_spawning::{Config, Spawning};
use lane_defence_world::{self as world, query, World};

fn advance(spawning: &mut Spawning, ticks: u64) -> Vec<Command> {
    let mut commands = Vec::new();
    for tick in 0..ticks {
        spawning.handle(
            &[Event::TimeAdvanced { tick }],
            GameState::Playing,
            &mut commands,
        );
    }
    commands
}

fn speeds(commands: &[Command]) -> Vec<SpeedTier> {
    commands
        .iter()
        .map(|command| match command {
            Command::SpawnEnemy { speed, .. } => *speed,
            other => panic!("unexpected command emitted: {other:?}"),
        })
        .collect()
}

#[test]
fn warmup_spawns_are_always_slow() {
    for seed in 0..32 {
        let mut spawning = Spawning::new(Config::new(100, 10, 5, seed));
        let commands = advance(&mut spawning, 1_000);

        assert_eq!(commands.len(), 10, "one spawn per hundred ticks");
        assert!(
            speeds(&commands)
                .iter()
                .all(|speed| *speed == SpeedTier::Slow),
            "seed {seed} produced a fast warm-up spawn"
        );
    }
}

#[test]
fn post_warmup_spawns_draw_from_both_tiers() {
    let mut spawning = Spawning::new(Config::new(1, 10, 5, 0x4d59_5df4_d0f3_3173));
    let commands = advance(&mut spawning, 400);
    let tiers = speeds(&commands);

    assert_eq!(tiers.len(), 400);
    assert!(tiers[..10].iter().all(|speed| *speed == SpeedTier::Slow));
    assert!(tiers[10..].contains(&SpeedTier::Fast));
    assert!(tiers[10..].contains(&SpeedTier::Slow));
}

#[test]
fn session_reset_restarts_the_ramp() {
    let mut spawning = Spawning::new(Config::new(1, 2, 5, 3));
    let _ = advance(&mut spawning, 5);
    assert_eq!(spawning.spawn_count(), 5);

    let mut commands = Vec::new();
    spawning.handle(&[Event::SessionReset], GameState::Playing, &mut commands);

    assert!(commands.is_empty(), "a reset alone never spawns");
    assert_eq!(spawning.spawn_count(), 0);
    assert_eq!(spawning.spawn_timer(), 0);
}

#[test]
fn leaving_playing_clears_the_timer() {
    let mut spawning = Spawning::new(Config::new(100, 10, 5, 11));
    let commands = advance(&mut spawning, 60);
    assert!(commands.is_empty());
    assert_eq!(spawning.spawn_timer(), 60);

    let mut commands = Vec::new();
    spawning.handle(
        &[Event::GameStateChanged {
            state: GameState::Menu,
        }],
        GameState::Menu,
        &mut commands,
    );
    assert_eq!(spawning.spawn_timer(), 0);

    spawning.handle(
        &[Event::TimeAdvanced { tick: 61 }],
        GameState::Menu,
        &mut commands,
    );
    assert!(commands.is_empty(), "menu ticks must not spawn");
    assert_eq!(spawning.spawn_timer(), 0);
}

#[test]
fn deterministic_replay_produces_identical_sequence() {
    let first = replay(0x1234_5678);
    let second = replay(0x1234_5678);

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(first.enemies.len(), 6);
}

fn replay(seed: u64) -> ReplayOutcome {
    let rules = Rules::default();
    let mut world = World::new(rules.clone());
    let mut spawning = Spawning::new(Config::from_rules(&rules, seed));
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartGame, &mut events);

    for _ in 0..600 {
        let mut tick_events = Vec::new();
        world::apply(&mut world, Command::Tick, &mut tick_events);

        let mut commands = Vec::new();
        spawning.handle(&tick_events, query::game_state(&world), &mut commands);
        for command in commands {
            let mut spawn_events = Vec::new();
            world::apply(&mut world, command, &mut spawn_events);
        }
    }

    let enemies = query::enemy_view(&world)
        .into_vec()
        .into_iter()
        .map(EnemyState::from)
        .collect();
    ReplayOutcome { enemies }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    enemies: Vec<EnemyState>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct EnemyState {
    bounds: PixelRect,
    speed: SpeedTier,
}

impl From<EnemySnapshot> for EnemyState {
    fn from(snapshot: EnemySnapshot) -> Self {
        Self {
            bounds: snapshot.bounds,
            speed: snapshot.speed,
        }
    }
}

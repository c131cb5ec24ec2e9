#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick-driven spawning system responsible for emitting enemy spawn commands.

use lane_defence_core::{Command, Event, GameState, Rules, SpeedTier};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const SPEED_TIERS: [SpeedTier; 2] = [SpeedTier::Slow, SpeedTier::Fast];

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: u32,
    warmup_spawns: u32,
    rows: u32,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided cadence, warm-up and seed.
    #[must_use]
    pub const fn new(spawn_interval: u32, warmup_spawns: u32, rows: u32, rng_seed: u64) -> Self {
        Self {
            spawn_interval,
            warmup_spawns,
            rows,
            rng_seed,
        }
    }

    /// Derives the spawning configuration from the round's rules.
    #[must_use]
    pub fn from_rules(rules: &Rules, rng_seed: u64) -> Self {
        Self::new(rules.spawn_interval, rules.warmup_spawns, rules.rows, rng_seed)
    }
}

/// Pure system that emits one enemy every `spawn_interval` ticks while playing.
#[derive(Debug)]
pub struct Spawning {
    spawn_interval: u32,
    warmup_spawns: u32,
    rows: u32,
    timer: u32,
    spawned: u32,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            warmup_spawns: config.warmup_spawns,
            rows: config.rows,
            timer: 0,
            spawned: 0,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Ticks counted toward the next spawn.
    #[must_use]
    pub const fn spawn_timer(&self) -> u32 {
        self.timer
    }

    /// Enemies requested since the last session reset.
    #[must_use]
    pub const fn spawn_count(&self) -> u32 {
        self.spawned
    }

    /// Consumes world events to emit spawn commands.
    ///
    /// `Event::SessionReset` clears both counters, and the timer only runs
    /// while the game is being played.
    pub fn handle(&mut self, events: &[Event], game_state: GameState, out: &mut Vec<Command>) {
        for event in events {
            if matches!(event, Event::SessionReset) {
                self.timer = 0;
                self.spawned = 0;
            }
        }

        if game_state != GameState::Playing {
            self.timer = 0;
            return;
        }

        if self.spawn_interval == 0 || self.rows == 0 {
            return;
        }

        let ticks = events
            .iter()
            .filter(|event| matches!(event, Event::TimeAdvanced { .. }))
            .count();

        for _ in 0..ticks {
            self.timer = self.timer.saturating_add(1);
            if self.timer < self.spawn_interval {
                continue;
            }

            self.timer = 0;
            let row = self.rng.gen_range(0..self.rows);
            let speed = self.next_speed();
            self.spawned = self.spawned.saturating_add(1);
            out.push(Command::SpawnEnemy { row, speed });
        }
    }

    fn next_speed(&mut self) -> SpeedTier {
        if self.spawned < self.warmup_spawns {
            return SpeedTier::Slow;
        }
        SPEED_TIERS[self.rng.gen_range(0..SPEED_TIERS.len())]
    }
}

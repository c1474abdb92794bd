#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting enemy spawn commands.

use bank_heist_core::{Command, EnemyKind, SPAWN_PERIOD_TICKS, SPAWN_SEQUENCE};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    period_ticks: u64,
    sequence: &'static [EnemyKind],
}

impl Config {
    /// Creates a new configuration using the provided cadence and spawn order.
    #[must_use]
    pub const fn new(period_ticks: u64, sequence: &'static [EnemyKind]) -> Self {
        Self {
            period_ticks,
            sequence,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(SPAWN_PERIOD_TICKS, &SPAWN_SEQUENCE)
    }
}

/// Pure system that walks the pre-authored spawn order on a fixed cadence.
#[derive(Debug)]
pub struct Spawning {
    period_ticks: u64,
    sequence: &'static [EnemyKind],
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            period_ticks: config.period_ticks,
            sequence: config.sequence,
        }
    }

    /// Emits a spawn command when `tick` lands one past a multiple of the period.
    ///
    /// `spawned` is the number of enemies the session has spawned so far and
    /// selects the next entry of the sequence, wrapping around at its end.
    pub fn handle(&self, tick: u64, spawned: u32, out: &mut Vec<Command>) {
        if self.period_ticks == 0 || self.sequence.is_empty() {
            return;
        }

        if tick % self.period_ticks != 1 % self.period_ticks {
            return;
        }

        let index = usize::try_from(spawned).unwrap_or(usize::MAX) % self.sequence.len();
        out.push(Command::SpawnEnemy {
            kind: self.sequence[index],
        });
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns targeting data into aim and firing commands.

use bank_heist_core::{Command, TurretId, TurretTarget, TURRET_DESYNC_STRIDE};

/// Turret combat system that queues aim and firing commands for targeted turrets.
#[derive(Debug, Default)]
pub struct TurretCombat {
    scratch: Vec<Command>,
}

impl TurretCombat {
    /// Creates a new turret combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a `Command::AimTurret` for every target and a
    /// `Command::FireTurret` right after it when the turret is in range and
    /// its cadence lands on `tick`.
    pub fn handle(&mut self, tick: u64, targets: &[TurretTarget], out: &mut Vec<Command>) {
        if targets.is_empty() {
            return;
        }

        self.scratch.clear();

        for target in targets {
            self.scratch.push(Command::AimTurret {
                turret: target.turret,
                at: target.prediction,
            });
            if target.in_range() && fires_on(tick, target.turret, target.kind.cooldown_ticks()) {
                self.scratch.push(Command::FireTurret {
                    turret: target.turret,
                    target: target.enemy,
                    aim: target.prediction,
                });
            }
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

/// Reports whether the turret's cadence fires on `tick`.
///
/// Each turret is offset by its placement index so identical turrets placed
/// side by side do not shoot in unison.
#[must_use]
pub fn fires_on(tick: u64, turret: TurretId, cooldown_ticks: u64) -> bool {
    if cooldown_ticks == 0 {
        return true;
    }
    let offset = u64::from(turret.get()).wrapping_mul(TURRET_DESYNC_STRIDE);
    tick.wrapping_add(offset) % cooldown_ticks == 0
}

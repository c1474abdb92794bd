#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that picks the nearest enemy for every turret and predicts
//! where it will be when a bullet arrives.

use bank_heist_core::{
    EnemyId, EnemyView, TurretTarget, TurretView, WalkingPath, BULLET_TRAVEL_RATE, TILE_LENGTH,
};
use glam::Vec2;

/// Turret targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TurretTargeting {
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TurretTargeting {
    /// Creates a new turret targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes a target for every turret while at least one enemy exists.
    ///
    /// The nearest enemy is chosen by squared distance between tile centres.
    /// Ties keep the enemy that comes first in population order. The output
    /// buffer is cleared before populating it with the latest assignments.
    pub fn handle(
        &mut self,
        turrets: &TurretView,
        enemies: &EnemyView,
        path: &WalkingPath,
        out: &mut Vec<TurretTarget>,
    ) {
        out.clear();

        if turrets.is_empty() || enemies.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies, path);

        for turret in turrets.iter() {
            let origin = turret.tile.center();
            let mut best: Option<(f32, &EnemyCandidate)> = None;
            for candidate in &self.enemy_workspace {
                let distance_sq = origin.distance_squared(candidate.center);
                match best {
                    Some((closest, _)) if distance_sq >= closest => {}
                    _ => best = Some((distance_sq, candidate)),
                }
            }

            if let Some((_, candidate)) = best {
                out.push(TurretTarget {
                    turret: turret.id,
                    kind: turret.kind,
                    enemy: candidate.id,
                    origin,
                    prediction: candidate.prediction,
                    distance_sq: origin.distance_squared(candidate.prediction),
                });
            }
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView, path: &WalkingPath) {
        self.enemy_workspace.clear();
        self.enemy_workspace.reserve(enemies.len());

        for snapshot in enemies.iter() {
            self.enemy_workspace.push(EnemyCandidate {
                id: snapshot.id,
                center: snapshot.center,
                prediction: predict(path, snapshot.progress, snapshot.speed),
            });
        }
    }
}

/// Centre of the tile an enemy is expected to occupy once a bullet has
/// covered its whole ray.
#[must_use]
pub fn predict(path: &WalkingPath, progress: f32, speed: f32) -> Vec2 {
    path.resolve_world(progress + speed / BULLET_TRAVEL_RATE) + Vec2::splat(TILE_LENGTH * 0.5)
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    center: Vec2,
    prediction: Vec2,
}

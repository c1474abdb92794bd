//! Robbers walking the route towards the gold.

use bank_heist_core::{
    EnemyId, EnemyKind, EnemySnapshot, WalkingPath, GOLD_CHECK_PERIOD, TILE_LENGTH,
};
use glam::Vec2;

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) progress: f32,
    pub(crate) speed: f32,
    pub(crate) health: f32,
    pub(crate) max_health: f32,
    desync: u32,
}

impl Enemy {
    /// Creates an enemy at the start of a route made of `segments` unit segments.
    ///
    /// Speeds are expressed as a fraction of the whole route, so longer routes
    /// take the same time to walk.
    pub(crate) fn new(id: EnemyId, kind: EnemyKind, segments: usize, desync: u32) -> Self {
        let health = kind.health();
        Self {
            id,
            kind,
            progress: 0.0,
            speed: kind.route_fraction_per_tick() * segments as f32,
            health,
            max_health: health,
            desync,
        }
    }

    pub(crate) fn advance(&mut self) {
        self.progress += self.speed;
    }

    /// Reports whether this enemy's staggered gold check falls on `tick`.
    pub(crate) fn checks_gold_on(&self, tick: u64) -> bool {
        tick.wrapping_add(u64::from(self.desync)) % GOLD_CHECK_PERIOD == 0
    }

    pub(crate) fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Top-left corner of the enemy sprite.
    pub(crate) fn anchor(&self, path: &WalkingPath) -> Vec2 {
        path.resolve_world(self.progress)
    }

    pub(crate) fn center(&self, path: &WalkingPath) -> Vec2 {
        self.anchor(path) + Vec2::splat(TILE_LENGTH * 0.5)
    }

    pub(crate) fn snapshot(&self, path: &WalkingPath) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            progress: self.progress,
            speed: self.speed,
            health: self.health,
            max_health: self.max_health,
            anchor: self.anchor(path),
            center: self.center(path),
        }
    }
}

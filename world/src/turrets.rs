//! Authoritative turret state management utilities.

use bank_heist_core::{
    TileCoord, TurretId, TurretKind, TurretSnapshot, TURRET_INITIAL_DIRECTION, TURRET_SCAN_STEP,
};
use glam::Vec2;

/// Turret stored inside the session.
#[derive(Clone, Debug)]
pub(crate) struct TurretState {
    /// Identifier allocated by the session, equal to the placement index.
    pub(crate) id: TurretId,
    pub(crate) kind: TurretKind,
    /// Wall tile hosting the turret.
    pub(crate) tile: TileCoord,
    /// Aim direction in radians, measured with `sin` along x and `cos` along y.
    pub(crate) direction: f32,
}

impl TurretState {
    pub(crate) fn origin(&self) -> Vec2 {
        self.tile.center()
    }

    /// Turns the turret to face a world position. A zero offset keeps the old aim.
    pub(crate) fn aim_at(&mut self, at: Vec2) {
        let offset = at - self.origin();
        if offset != Vec2::ZERO {
            self.direction = offset.x.atan2(offset.y);
        }
    }

    pub(crate) fn snapshot(&self) -> TurretSnapshot {
        TurretSnapshot {
            id: self.id,
            kind: self.kind,
            tile: self.tile,
            direction: self.direction,
        }
    }
}

/// Registry that stores turrets in placement order.
#[derive(Debug, Default)]
pub(crate) struct TurretRegistry {
    entries: Vec<TurretState>,
}

impl TurretRegistry {
    pub(crate) fn insert(&mut self, kind: TurretKind, tile: TileCoord) -> TurretId {
        let id = TurretId::new(u32::try_from(self.entries.len()).unwrap_or(u32::MAX));
        self.entries.push(TurretState {
            id,
            kind,
            tile,
            direction: TURRET_INITIAL_DIRECTION,
        });
        id
    }

    pub(crate) fn get(&self, id: TurretId) -> Option<&TurretState> {
        usize::try_from(id.get())
            .ok()
            .and_then(|index| self.entries.get(index))
    }

    pub(crate) fn get_mut(&mut self, id: TurretId) -> Option<&mut TurretState> {
        usize::try_from(id.get())
            .ok()
            .and_then(|index| self.entries.get_mut(index))
    }

    /// Idle scanning rotation applied every tick.
    pub(crate) fn spin(&mut self) {
        for turret in &mut self.entries {
            turret.direction += TURRET_SCAN_STEP;
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TurretState> {
        self.entries.iter()
    }
}

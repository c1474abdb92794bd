//! Floor traps and their contact rules.

use bank_heist_core::{TileCoord, TrapId, TrapKind, TrapSnapshot, SPIKE_CONTACT_DAMAGE, SPIKE_DAMAGE_CAP};

#[derive(Clone, Debug)]
pub(crate) struct Trap {
    pub(crate) id: TrapId,
    pub(crate) kind: TrapKind,
    pub(crate) tile: TileCoord,
    dealt: f32,
    pub(crate) dead: bool,
}

/// Outcome of a single enemy stepping on a trap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Contact {
    /// The spike wounded the enemy. `worn` is set once the spike is past its cap.
    Pricked { worn: bool },
    /// The bomb went off.
    Detonated,
}

impl Trap {
    pub(crate) fn new(id: TrapId, kind: TrapKind, tile: TileCoord) -> Self {
        Self {
            id,
            kind,
            tile,
            dealt: 0.0,
            dead: false,
        }
    }

    /// Resolves one contact. Dead traps keep acting on every enemy they touch
    /// until they are swept.
    pub(crate) fn trigger(&mut self) -> Contact {
        match self.kind {
            TrapKind::Spike => {
                self.dealt += SPIKE_CONTACT_DAMAGE;
                let worn = self.dealt > SPIKE_DAMAGE_CAP;
                if worn {
                    self.dead = true;
                }
                Contact::Pricked { worn }
            }
            TrapKind::Bomb => {
                self.dead = true;
                Contact::Detonated
            }
        }
    }

    pub(crate) fn snapshot(&self) -> TrapSnapshot {
        TrapSnapshot {
            id: self.id,
            kind: self.kind,
            tile: self.tile,
            dealt: self.dealt,
            dead: self.dead,
        }
    }
}

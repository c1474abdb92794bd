#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that reports every enemy standing on a trap.

use bank_heist_core::{Command, EnemyView, TrapView};

/// Trap contact system that pairs traps with the enemies overlapping them.
#[derive(Debug, Default)]
pub struct TrapContacts {
    scratch: Vec<Command>,
}

impl TrapContacts {
    /// Creates a new trap contact system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits one `Command::TriggerTrap` per overlapping trap and enemy pair.
    ///
    /// Pairs are produced trap by trap in placement order, then enemy by
    /// enemy in population order. An enemy overlaps a trap when its centre
    /// lies inside the trap's tile, edges included.
    pub fn handle(&mut self, traps: &TrapView, enemies: &EnemyView, out: &mut Vec<Command>) {
        if enemies.is_empty() {
            return;
        }

        self.scratch.clear();

        for trap in traps.iter().filter(|trap| !trap.dead) {
            for enemy in enemies.iter() {
                if trap.tile.contains(enemy.center) {
                    self.scratch.push(Command::TriggerTrap {
                        trap: trap.id,
                        enemy: enemy.id,
                    });
                }
            }
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bank_heist_core::{
        EnemyId, EnemyKind, EnemySnapshot, TileCoord, TrapId, TrapKind, TrapSnapshot,
    };
    use glam::Vec2;

    #[test]
    fn overlapping_pairs_are_reported_trap_major() {
        let mut system = TrapContacts::new();
        let traps = TrapView::from_snapshots(vec![
            trap(1, TileCoord::new(4, 1), false),
            trap(0, TileCoord::new(3, 1), false),
        ]);
        let enemies = EnemyView::from_snapshots(vec![
            enemy(2, Vec2::new(64.0, 24.0)),
            enemy(0, Vec2::new(72.0, 24.0)),
            enemy(1, Vec2::new(120.0, 24.0)),
        ]);
        let mut out = Vec::new();

        system.handle(&traps, &enemies, &mut out);

        assert_eq!(
            out,
            vec![
                Command::TriggerTrap {
                    trap: TrapId::new(0),
                    enemy: EnemyId::new(2),
                },
                Command::TriggerTrap {
                    trap: TrapId::new(1),
                    enemy: EnemyId::new(0),
                },
                Command::TriggerTrap {
                    trap: TrapId::new(1),
                    enemy: EnemyId::new(2),
                },
            ],
        );
    }

    #[test]
    fn spent_traps_are_ignored() {
        let mut system = TrapContacts::new();
        let traps = TrapView::from_snapshots(vec![trap(0, TileCoord::new(3, 1), true)]);
        let enemies = EnemyView::from_snapshots(vec![enemy(0, Vec2::new(56.0, 24.0))]);
        let mut out = Vec::new();

        system.handle(&traps, &enemies, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn enemies_off_the_tile_do_not_trigger() {
        let mut system = TrapContacts::new();
        let traps = TrapView::from_snapshots(vec![trap(0, TileCoord::new(3, 1), false)]);
        let enemies = EnemyView::from_snapshots(vec![enemy(0, Vec2::new(64.5, 24.0))]);
        let mut out = Vec::new();

        system.handle(&traps, &enemies, &mut out);

        assert!(out.is_empty());
    }

    fn trap(id: u32, tile: TileCoord, dead: bool) -> TrapSnapshot {
        TrapSnapshot {
            id: TrapId::new(id),
            kind: TrapKind::Spike,
            tile,
            dealt: 0.0,
            dead,
        }
    }

    fn enemy(id: u32, center: Vec2) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Grunt,
            progress: 0.0,
            speed: 0.0,
            health: 7.5,
            max_health: 7.5,
            anchor: center - Vec2::splat(8.0),
            center,
        }
    }
}

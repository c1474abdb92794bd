#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for a single Bank Heist level attempt.

mod economy;
mod effects;
mod enemies;
mod level;
mod traps;
mod turrets;

use std::time::Duration;

use bank_heist_core::{
    Command, EnemyId, EnemyKind, Event, Placeable, ShopItem, TileCoord, TileKind, TrapId,
    TurretId, WalkingPath, BOMB_OVERKILL, ENEMY_DESYNC_RANGE, SPIKE_CONTACT_DAMAGE, TILE_LENGTH,
};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

pub use economy::Statistics;
pub use effects::{Bullet, Decal, Particle};
pub use level::{Level, LevelError, TileGrid};

use economy::Economy;
use effects::{Burst, Effects};
use enemies::Enemy;
use traps::{Contact, Trap};
use turrets::TurretRegistry;

/// Represents one attempt at a level: its tiles, populations and economy.
#[derive(Debug)]
pub struct Session {
    grid: TileGrid,
    path: WalkingPath,
    enemies: Vec<Enemy>,
    next_enemy_id: u32,
    turrets: TurretRegistry,
    traps: Vec<Trap>,
    next_trap_id: u32,
    effects: Effects,
    economy: Economy,
    statistics: Statistics,
    elapsed: Duration,
    spawned: u32,
    rng: ChaCha8Rng,
}

impl Session {
    /// Starts a fresh attempt on the level with the level's original tiles.
    #[must_use]
    pub fn new(level: &Level, seed: u64) -> Self {
        Self {
            grid: level.grid().clone(),
            path: level.path().clone(),
            enemies: Vec::new(),
            next_enemy_id: 0,
            turrets: TurretRegistry::default(),
            traps: Vec::new(),
            next_trap_id: 0,
            effects: Effects::default(),
            economy: Economy::default(),
            statistics: Statistics::default(),
            elapsed: Duration::ZERO,
            spawned: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn trap_index(&self, id: TrapId) -> Option<usize> {
        self.traps.iter().position(|trap| trap.id == id)
    }

    fn advance_combatants(&mut self, tick: u64, out_events: &mut Vec<Event>) {
        let gold_tile = self.path.gold();
        for enemy in &mut self.enemies {
            enemy.advance();
            if !enemy.checks_gold_on(tick) {
                continue;
            }
            let anchor = enemy.anchor(&self.path);
            if !gold_tile.is_some_and(|tile| tile.contains(anchor)) {
                continue;
            }

            let amount = enemy.kind.damage();
            self.economy.gold -= amount;
            self.statistics.damage_taken += amount;
            let scatter = Vec2::new(
                effects::signed(&mut self.rng),
                effects::signed(&mut self.rng),
            ) * TILE_LENGTH;
            let at = anchor + scatter + Vec2::splat(TILE_LENGTH * 0.5);
            self.effects.burst(&mut self.rng, at, Burst::Gold);
            out_events.push(Event::GoldDamaged {
                enemy: enemy.id,
                amount,
            });
        }

        self.turrets.spin();
        self.effects.advance_bullets();
    }

    fn spawn_enemy(&mut self, kind: EnemyKind, out_events: &mut Vec<Event>) {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        self.spawned = self.spawned.saturating_add(1);
        let desync = self.rng.gen_range(0..=ENEMY_DESYNC_RANGE);
        self.enemies
            .push(Enemy::new(id, kind, self.path.segment_count(), desync));
        debug!(enemy = id.get(), ?kind, "enemy spawned");
        out_events.push(Event::EnemySpawned { enemy: id, kind });
    }

    fn fire_turret(
        &mut self,
        turret: TurretId,
        target: EnemyId,
        aim: Vec2,
        out_events: &mut Vec<Event>,
    ) {
        let Some(state) = self.turrets.get(turret) else {
            return;
        };
        let kind = state.kind;
        let origin = state.origin();
        let Some(enemy) = self.enemies.iter_mut().find(|enemy| enemy.id == target) else {
            return;
        };

        for _ in 0..kind.pellets() {
            self.effects
                .fire(&mut self.rng, origin, aim, kind.accuracy());
            enemy.health -= kind.pellet_damage();
        }
        out_events.push(Event::TurretFired {
            turret,
            kind,
            target,
        });
    }

    fn trigger_trap(&mut self, trap: TrapId, enemy: EnemyId, out_events: &mut Vec<Event>) {
        let Some(index) = self.trap_index(trap) else {
            return;
        };
        let path = &self.path;
        let Some(victim) = self.enemies.iter_mut().find(|candidate| candidate.id == enemy) else {
            return;
        };
        let at = victim.center(path);

        match self.traps[index].trigger() {
            Contact::Pricked { worn } => {
                victim.health -= SPIKE_CONTACT_DAMAGE;
                if worn {
                    self.effects.burst(&mut self.rng, at, Burst::Spark);
                }
                out_events.push(Event::EnemyPricked { trap, enemy });
            }
            Contact::Detonated => {
                victim.health = victim.health.min(0.0) - BOMB_OVERKILL;
                self.effects.burst(&mut self.rng, at, Burst::Bomb);
                out_events.push(Event::BombDetonated { trap, enemy });
            }
        }
    }

    /// Removes spent traps and dead enemies, paying out loot for each kill.
    fn sweep(&mut self, out_events: &mut Vec<Event>) {
        for trap in self.traps.iter().filter(|trap| trap.dead) {
            self.grid.poke(trap.tile, TileKind::Floor);
            debug!(trap = trap.id.get(), kind = ?trap.kind, "trap removed");
            out_events.push(Event::TrapRemoved {
                trap: trap.id,
                kind: trap.kind,
                tile: trap.tile,
            });
        }
        self.traps.retain(|trap| !trap.dead);

        for enemy in self.enemies.iter().filter(|enemy| enemy.is_dead()) {
            let loot = enemy.kind.loot();
            self.economy.cash = self.economy.cash.saturating_add(loot);
            self.statistics.kills = self.statistics.kills.saturating_add(1);
            let at = enemy.center(&self.path);
            self.effects
                .burst(&mut self.rng, at, Burst::Death(enemy.kind));
            debug!(enemy = enemy.id.get(), kind = ?enemy.kind, loot, "enemy killed");
            out_events.push(Event::EnemyKilled {
                enemy: enemy.id,
                kind: enemy.kind,
                loot,
            });
        }
        self.enemies.retain(|enemy| !enemy.is_dead());
    }

    fn purchase(&mut self, item: ShopItem, out_events: &mut Vec<Event>) {
        if self.economy.hand.is_some() {
            return;
        }

        if item == ShopItem::HealthUp && self.economy.heal_cooldown > 0 {
            out_events.push(Event::HealthRestoreUnavailable {
                remaining: self.economy.heal_cooldown,
            });
            return;
        }

        if !self.economy.try_spend(item.price(), &mut self.statistics) {
            out_events.push(Event::PurchaseRejected {
                item,
                cash: self.economy.cash,
            });
            return;
        }

        out_events.push(Event::PurchaseCompleted { item });
        match item.placeable() {
            Some(placeable) => self.economy.hand = Some(placeable),
            None => {
                self.economy.heal();
                out_events.push(Event::HealthRestored {
                    gold: self.economy.gold,
                });
            }
        }
    }

    fn place(&mut self, cursor: Vec2, repeat: bool, out_events: &mut Vec<Event>) {
        let Some(placeable) = self.economy.hand else {
            return;
        };
        let tile = TileCoord::containing(cursor);
        if !tile.in_bounds() || !placeable.fits_on(self.grid.peek(tile)) {
            return;
        }

        match placeable {
            Placeable::Turret(kind) => {
                let turret = self.turrets.insert(kind, tile);
                self.statistics.turrets_placed = self.statistics.turrets_placed.saturating_add(1);
                debug!(turret = turret.get(), ?kind, ?tile, "turret placed");
                out_events.push(Event::TurretPlaced { turret, kind, tile });
            }
            Placeable::Trap(kind) => {
                let trap = TrapId::new(self.next_trap_id);
                self.next_trap_id = self.next_trap_id.wrapping_add(1);
                self.traps.push(Trap::new(trap, kind, tile));
                self.statistics.traps_placed = self.statistics.traps_placed.saturating_add(1);
                debug!(trap = trap.get(), ?kind, ?tile, "trap placed");
                out_events.push(Event::TrapPlaced { trap, kind, tile });
            }
        }
        self.effects.burst(&mut self.rng, cursor, Burst::Spark);
        self.grid.poke(tile, placeable.tile_kind());
        if !repeat {
            self.economy.hand = None;
        }
    }
}

/// Applies the provided command to the session, mutating state deterministically.
pub fn apply(session: &mut Session, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::AdvanceClock { dt } => {
            session.elapsed = session.elapsed.saturating_add(dt);
            out_events.push(Event::ClockAdvanced {
                elapsed: session.elapsed,
            });
        }
        Command::AdvanceCombatants { tick } => session.advance_combatants(tick, out_events),
        Command::SpawnEnemy { kind } => session.spawn_enemy(kind, out_events),
        Command::AimTurret { turret, at } => {
            if let Some(state) = session.turrets.get_mut(turret) {
                state.aim_at(at);
            }
        }
        Command::FireTurret {
            turret,
            target,
            aim,
        } => session.fire_turret(turret, target, aim, out_events),
        Command::TriggerTrap { trap, enemy } => session.trigger_trap(trap, enemy, out_events),
        Command::Sweep => session.sweep(out_events),
        Command::AdvanceEffects => session.effects.advance(&session.grid),
        Command::Purchase { item } => session.purchase(item, out_events),
        Command::Place { cursor, repeat } => session.place(cursor, repeat, out_events),
        Command::ExpireCooldowns => session.economy.expire_cooldown(),
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use std::time::Duration;

    use bank_heist_core::{
        EnemyView, Placeable, TileCoord, TileKind, TrapView, TurretView, WalkingPath,
    };
    use glam::Vec2;

    use super::{Bullet, Decal, Particle, Session, Statistics, TileGrid};

    /// Provides read-only access to the session's current tile grid.
    #[must_use]
    pub fn tile_grid(session: &Session) -> &TileGrid {
        &session.grid
    }

    /// Route walked by every enemy.
    #[must_use]
    pub fn path(session: &Session) -> &WalkingPath {
        &session.path
    }

    /// Captures a read-only view of the enemies on the route.
    #[must_use]
    pub fn enemy_view(session: &Session) -> EnemyView {
        EnemyView::from_snapshots(
            session
                .enemies
                .iter()
                .map(|enemy| enemy.snapshot(&session.path))
                .collect(),
        )
    }

    /// Captures a read-only view of the placed turrets.
    #[must_use]
    pub fn turret_view(session: &Session) -> TurretView {
        TurretView::from_snapshots(session.turrets.iter().map(|turret| turret.snapshot()).collect())
    }

    /// Captures a read-only view of the traps still on the floor.
    #[must_use]
    pub fn trap_view(session: &Session) -> TrapView {
        TrapView::from_snapshots(session.traps.iter().map(|trap| trap.snapshot()).collect())
    }

    /// Bullets currently in flight.
    #[must_use]
    pub fn bullets(session: &Session) -> &[Bullet] {
        &session.effects.bullets
    }

    /// Particles currently alive.
    #[must_use]
    pub fn particles(session: &Session) -> &[Particle] {
        &session.effects.particles
    }

    /// Floor stains left by particles during the last effects tick.
    #[must_use]
    pub fn decals(session: &Session) -> &[Decal] {
        &session.effects.decals
    }

    /// Offset the presentation layer should shake the screen by.
    #[must_use]
    pub fn screenshake(session: &Session) -> Vec2 {
        session.effects.screenshake
    }

    /// Gold left in the stash. Negative once the level is lost.
    #[must_use]
    pub fn gold(session: &Session) -> f32 {
        session.economy.gold
    }

    /// Cash available to spend in the shop.
    #[must_use]
    pub fn cash(session: &Session) -> u32 {
        session.economy.cash
    }

    /// Real time elapsed since the attempt started.
    #[must_use]
    pub fn elapsed(session: &Session) -> Duration {
        session.elapsed
    }

    /// Number of enemies spawned so far.
    #[must_use]
    pub fn spawned(session: &Session) -> u32 {
        session.spawned
    }

    /// Item bought but not yet deployed.
    #[must_use]
    pub fn holding(session: &Session) -> Option<Placeable> {
        session.economy.hand
    }

    /// Cumulative statistics of the attempt.
    #[must_use]
    pub fn statistics(session: &Session) -> Statistics {
        session.statistics
    }

    /// Values shown on the heads-up display.
    #[must_use]
    pub fn hud(session: &Session) -> Hud {
        Hud {
            gold: session.economy.gold,
            cash: session.economy.cash,
            elapsed_seconds: session.elapsed.as_secs(),
            heal_cooldown: session.economy.heal_cooldown,
            holding: session.economy.hand,
        }
    }

    /// Ghost tile drawn under the cursor while an item is in hand.
    ///
    /// Returns `None` when the hand is empty or the cursor is off the grid.
    #[must_use]
    pub fn placement_preview(session: &Session, cursor: Vec2) -> Option<PlacementPreview> {
        let placeable = session.economy.hand?;
        let tile = TileCoord::containing(cursor);
        if !tile.in_bounds() {
            return None;
        }
        let valid = placeable.fits_on(session.grid.peek(tile));
        Some(PlacementPreview {
            tile,
            kind: if valid {
                placeable.tile_kind()
            } else {
                TileKind::Nope
            },
            valid,
        })
    }

    /// Heads-up display values.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct Hud {
        /// Gold left in the stash.
        pub gold: f32,
        /// Cash available to spend.
        pub cash: u32,
        /// Whole seconds elapsed since the attempt started.
        pub elapsed_seconds: u64,
        /// Ticks left before health-ups can be bought again.
        pub heal_cooldown: u32,
        /// Item bought but not yet deployed.
        pub holding: Option<Placeable>,
    }

    /// Ghost tile shown under the cursor.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PlacementPreview {
        /// Hovered tile.
        pub tile: TileCoord,
        /// Tile kind to draw: the held item, or the Nope marker.
        pub kind: TileKind,
        /// Whether a click would deploy the item.
        pub valid: bool,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bank_heist_core::{TrapKind, TurretKind};

    const LEVEL: &str = "\
####################
#S.................#
##################.#
#G.................#
####################
####################
####################
####################
####################
####################
####################
####################
####################
####################
####################
";

    fn session() -> Session {
        Session::new(&Level::parse(LEVEL).expect("valid level"), 7)
    }

    fn run(session: &mut Session, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(session, command, &mut events);
        events
    }

    #[test]
    fn fresh_session_starts_with_default_economy() {
        let session = session();
        let hud = query::hud(&session);
        assert_eq!(hud.gold, 100.0);
        assert_eq!(hud.cash, 150);
        assert_eq!(hud.elapsed_seconds, 0);
        assert!(query::enemy_view(&session).is_empty());
        assert_eq!(query::statistics(&session), Statistics::default());
    }

    #[test]
    fn purchase_puts_item_in_hand_and_blocks_further_purchases() {
        let mut session = session();
        let events = run(
            &mut session,
            Command::Purchase {
                item: ShopItem::PistolTurret,
            },
        );
        assert_eq!(
            events,
            vec![Event::PurchaseCompleted {
                item: ShopItem::PistolTurret
            }]
        );
        assert_eq!(
            query::holding(&session),
            Some(Placeable::Turret(TurretKind::Pistol))
        );

        let ignored = run(
            &mut session,
            Command::Purchase {
                item: ShopItem::SpikeTrap,
            },
        );
        assert!(ignored.is_empty());
        assert_eq!(query::cash(&session), 100);
    }

    #[test]
    fn placement_requires_matching_tile() {
        let mut session = session();
        let _ = run(
            &mut session,
            Command::Purchase {
                item: ShopItem::SpikeTrap,
            },
        );

        let on_wall = Vec2::new(8.0, 8.0);
        let preview = query::placement_preview(&session, on_wall).expect("preview");
        assert_eq!(preview.kind, TileKind::Nope);
        assert!(run(
            &mut session,
            Command::Place {
                cursor: on_wall,
                repeat: false
            }
        )
        .is_empty());

        let on_floor = Vec2::new(3.0 * 16.0 + 4.0, 16.0 + 4.0);
        let events = run(
            &mut session,
            Command::Place {
                cursor: on_floor,
                repeat: false,
            },
        );
        assert_eq!(
            events,
            vec![Event::TrapPlaced {
                trap: TrapId::new(0),
                kind: TrapKind::Spike,
                tile: TileCoord::new(3, 1),
            }]
        );
        assert_eq!(
            query::tile_grid(&session).peek(TileCoord::new(3, 1)),
            TileKind::SpikeTrap
        );
        assert_eq!(query::holding(&session), None);
        assert_eq!(query::particles(&session).len(), 100);
        assert_eq!(query::statistics(&session).traps_placed, 1);
    }

    #[test]
    fn repeat_placement_keeps_item_in_hand() {
        let mut session = session();
        let _ = run(
            &mut session,
            Command::Purchase {
                item: ShopItem::PistolTurret,
            },
        );
        for column in [2, 3] {
            let events = run(
                &mut session,
                Command::Place {
                    cursor: TileCoord::new(column, 0).center(),
                    repeat: true,
                },
            );
            assert_eq!(events.len(), 1);
        }
        assert!(query::holding(&session).is_some());
        let ids: Vec<u32> = query::turret_view(&session)
            .iter()
            .map(|turret| turret.id.get())
            .collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn bomb_obliterates_enemy_and_reverts_tile() {
        let mut session = session();
        let _ = run(&mut session, Command::SpawnEnemy { kind: EnemyKind::Bulk });
        let _ = run(
            &mut session,
            Command::Purchase {
                item: ShopItem::BombTrap,
            },
        );
        let tile = TileCoord::new(1, 1);
        session.grid.poke(tile, TileKind::Floor);
        let _ = run(
            &mut session,
            Command::Place {
                cursor: tile.center(),
                repeat: false,
            },
        );
        let enemy = EnemyId::new(0);
        session.enemies[0].health = 1.0e9;

        let events = run(
            &mut session,
            Command::TriggerTrap {
                trap: TrapId::new(0),
                enemy,
            },
        );
        assert_eq!(
            events,
            vec![Event::BombDetonated {
                trap: TrapId::new(0),
                enemy
            }]
        );
        let health = query::enemy_view(&session)
            .iter()
            .next()
            .map(|snapshot| snapshot.health)
            .expect("enemy still present until sweep");
        assert!(health < 0.0);
        assert!(query::trap_view(&session).iter().all(|trap| trap.dead));
        assert!(query::screenshake(&session).length() > 0.0);

        let swept = run(&mut session, Command::Sweep);
        assert!(swept.contains(&Event::TrapRemoved {
            trap: TrapId::new(0),
            kind: TrapKind::Bomb,
            tile,
        }));
        assert!(swept.contains(&Event::EnemyKilled {
            enemy,
            kind: EnemyKind::Bulk,
            loot: 25,
        }));
        assert_eq!(query::tile_grid(&session).peek(tile), TileKind::Floor);
        assert!(query::enemy_view(&session).is_empty());
        assert_eq!(query::cash(&session), 25);
        assert_eq!(query::statistics(&session).kills, 1);
    }

    #[test]
    fn health_up_respects_cooldown() {
        let mut session = session();
        session.economy.gold = 50.0;
        let events = run(
            &mut session,
            Command::Purchase {
                item: ShopItem::HealthUp,
            },
        );
        assert_eq!(
            events,
            vec![
                Event::PurchaseCompleted {
                    item: ShopItem::HealthUp
                },
                Event::HealthRestored { gold: 65.0 },
            ]
        );
        let _ = run(&mut session, Command::ExpireCooldowns);
        let events = run(
            &mut session,
            Command::Purchase {
                item: ShopItem::HealthUp,
            },
        );
        assert_eq!(
            events,
            vec![Event::HealthRestoreUnavailable { remaining: 599 }]
        );
        assert_eq!(query::cash(&session), 100);
    }

    #[test]
    fn clock_accumulates_elapsed_time() {
        let mut session = session();
        let events = run(
            &mut session,
            Command::AdvanceClock {
                dt: Duration::from_millis(1_500),
            },
        );
        assert_eq!(
            events,
            vec![Event::ClockAdvanced {
                elapsed: Duration::from_millis(1_500)
            }]
        );
        assert_eq!(query::hud(&session).elapsed_seconds, 1);
    }
}

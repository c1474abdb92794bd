#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Bank Heist engine.
//!
//! This crate defines the message surface that connects the driver, the
//! authoritative session, and pure systems. The driver submits [`Command`]
//! values describing desired mutations, the session executes those commands
//! via its `apply` entry point, and then reports [`Event`] values that the
//! driver translates into [`SoundCue`] requests for the presentation layer.
//! Systems consume read-only views and respond exclusively with new commands.

mod catalog;
mod path;

use std::time::Duration;

use glam::Vec2;

pub use catalog::{
    EnemyKind, Placeable, Rgb, ShopItem, SoundCue, TileKind, TrapKind, TurretKind, SPAWN_SEQUENCE,
};
pub use path::{TileCoord, WalkingPath};

/// Number of tile columns in every level.
pub const LEVEL_COLUMNS: i32 = 20;
/// Number of tile rows in every level.
pub const LEVEL_ROWS: i32 = 15;
/// Side length of a square tile measured in world units.
pub const TILE_LENGTH: f32 = 16.0;
/// Number of levels shipped with the game.
pub const LEVEL_COUNT: usize = 3;

/// Gold stockpile at the start of every attempt, also the heal ceiling.
pub const STARTING_GOLD: f32 = 100.0;
/// Cash balance at the start of every attempt.
pub const STARTING_CASH: u32 = 150;
/// Gold restored by a single health-up purchase.
pub const HEALTH_UP_AMOUNT: f32 = 15.0;
/// Ticks during which the health-up purchase stays disabled.
pub const HEALTH_UP_COOLDOWN_TICKS: u32 = 600;
/// Elapsed time after which the robbers give up.
pub const DEFAULT_WIN_AFTER: Duration = Duration::from_secs(100);
/// Stored high score meaning "no score recorded yet".
pub const HIGH_SCORE_SENTINEL: f32 = -666.0;

/// Fraction of the whole route an enemy with unit speed covers per tick.
pub const ENEMY_BASE_SPEED: f32 = 0.001;
/// Gold removed by an enemy with unit damage on every gold check.
pub const ENEMY_BASE_DAMAGE: f32 = 7.5;
/// Health of an enemy with unit health multiplier.
pub const ENEMY_BASE_HEALTH: f32 = 5.0;
/// Period, in ticks, of each enemy's gold-damage check.
pub const GOLD_CHECK_PERIOD: u64 = 60;
/// Inclusive upper bound of the per-enemy gold check offset.
pub const ENEMY_DESYNC_RANGE: u32 = 0xDEAD_BEEF;

/// Damage dealt by a single pellet with unit damage multiplier.
pub const TURRET_BASE_DAMAGE: f32 = 2.5;
/// Multiplier applied to a turret's index before the cooldown modulo.
pub const TURRET_DESYNC_STRIDE: u64 = 1337;
/// Radians added to every turret's aim direction each tick.
pub const TURRET_SCAN_STEP: f32 = 0.0123;
/// Aim direction assigned to freshly placed turrets.
pub const TURRET_INITIAL_DIRECTION: f32 = 13.14;

/// Progress a bullet covers per tick along its ray.
pub const BULLET_TRAVEL_RATE: f32 = 0.05;
/// Length of the drawn bullet segment in world units.
pub const BULLET_LENGTH: f32 = 10.0;

/// Health removed from an enemy by each spike contact.
pub const SPIKE_CONTACT_DAMAGE: f32 = 1.0;
/// Damage a spike trap must exceed before it breaks.
pub const SPIKE_DAMAGE_CAP: f32 = 10.0;
/// Health an enemy is left below zero after a bomb detonation.
pub const BOMB_OVERKILL: f32 = 9999.0;

/// Spawn cadence measured in ticks.
pub const SPAWN_PERIOD_TICKS: u64 = 50;

/// Velocity retained by a particle after each tick.
pub const PARTICLE_DRAG: f32 = 0.9;
/// Factor applied to the screenshake impulse every frame, before flipping it.
pub const SCREENSHAKE_DISSIPATION: f32 = 0.5;

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Adds real time to the session clock.
    AdvanceClock {
        /// Duration that elapsed since the previous frame.
        dt: Duration,
    },
    /// Moves enemies along the route, spins turrets and advances bullets.
    AdvanceCombatants {
        /// Frame counter used by periodic checks.
        tick: u64,
    },
    /// Adds an enemy of the provided variant at the start of the route.
    SpawnEnemy {
        /// Variant to spawn.
        kind: EnemyKind,
    },
    /// Points a turret at the provided world position without firing.
    AimTurret {
        /// Turret being rotated.
        turret: TurretId,
        /// World position the turret should face.
        at: Vec2,
    },
    /// Fires a turret at an enemy, applying pellet damage immediately.
    FireTurret {
        /// Turret that fires.
        turret: TurretId,
        /// Enemy that receives the damage.
        target: EnemyId,
        /// World position the cosmetic bullets travel towards.
        aim: Vec2,
    },
    /// Resolves a single trap overlapping a single enemy.
    TriggerTrap {
        /// Trap that was stepped on.
        trap: TrapId,
        /// Enemy standing on the trap.
        enemy: EnemyId,
    },
    /// Removes dead traps and enemies once every pass of the tick has run.
    Sweep,
    /// Ticks particles and decays the screenshake impulse.
    AdvanceEffects,
    /// Attempts to buy an item from the shop.
    Purchase {
        /// Catalog entry the player selected.
        item: ShopItem,
    },
    /// Attempts to deploy the item currently in hand at the cursor.
    Place {
        /// Cursor position in world units.
        cursor: Vec2,
        /// Keeps the item in hand after a successful placement.
        repeat: bool,
    },
    /// Counts down the health-up cooldown by one tick.
    ExpireCooldowns,
}

/// Events reported by the session after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the session clock advanced.
    ClockAdvanced {
        /// Total elapsed time of the attempt.
        elapsed: Duration,
    },
    /// Confirms that an enemy entered the route.
    EnemySpawned {
        /// Identifier allocated to the enemy.
        enemy: EnemyId,
        /// Variant of the enemy.
        kind: EnemyKind,
    },
    /// Reports that an enemy reached zero health and paid out its loot.
    EnemyKilled {
        /// Identifier of the killed enemy.
        enemy: EnemyId,
        /// Variant of the killed enemy.
        kind: EnemyKind,
        /// Cash awarded for the kill.
        loot: u32,
    },
    /// Reports that an enemy standing on the gold stole some of it.
    GoldDamaged {
        /// Enemy responsible for the damage.
        enemy: EnemyId,
        /// Gold removed from the stockpile.
        amount: f32,
    },
    /// Reports that a turret fired at an enemy.
    TurretFired {
        /// Turret that fired.
        turret: TurretId,
        /// Model of the turret.
        kind: TurretKind,
        /// Enemy that received the pellets.
        target: EnemyId,
    },
    /// Reports that a spike trap wounded an enemy.
    EnemyPricked {
        /// Trap that dealt the damage.
        trap: TrapId,
        /// Enemy that was wounded.
        enemy: EnemyId,
    },
    /// Reports that a bomb trap detonated under an enemy.
    BombDetonated {
        /// Trap that exploded.
        trap: TrapId,
        /// Enemy that was obliterated.
        enemy: EnemyId,
    },
    /// Reports that a spent trap left the map.
    TrapRemoved {
        /// Trap that was removed.
        trap: TrapId,
        /// Variant of the trap.
        kind: TrapKind,
        /// Tile that reverted to floor.
        tile: TileCoord,
    },
    /// Confirms that a purchase went through.
    PurchaseCompleted {
        /// Item that was bought.
        item: ShopItem,
    },
    /// Reports that the player could not afford an item.
    PurchaseRejected {
        /// Item the player attempted to buy.
        item: ShopItem,
        /// Cash available at the time of the attempt.
        cash: u32,
    },
    /// Reports that a health-up restored some gold.
    HealthRestored {
        /// Gold stockpile after the restore.
        gold: f32,
    },
    /// Reports that a health-up was requested while still cooling down.
    HealthRestoreUnavailable {
        /// Ticks left before health-ups are available again.
        remaining: u32,
    },
    /// Confirms that a turret was deployed on a wall.
    TurretPlaced {
        /// Identifier allocated to the turret.
        turret: TurretId,
        /// Model of the turret.
        kind: TurretKind,
        /// Wall tile that now hosts the turret.
        tile: TileCoord,
    },
    /// Confirms that a trap was deployed on the floor.
    TrapPlaced {
        /// Identifier allocated to the trap.
        trap: TrapId,
        /// Variant of the trap.
        kind: TrapKind,
        /// Floor tile that now hosts the trap.
        tile: TileCoord,
    },
}

impl Event {
    /// Sound cue the presentation layer should play for this event, if any.
    #[must_use]
    pub const fn cue(&self) -> Option<SoundCue> {
        match self {
            Self::ClockAdvanced { .. }
            | Self::EnemySpawned { .. }
            | Self::TrapRemoved { .. } => None,
            Self::EnemyKilled { .. } => Some(SoundCue::EnemyDied),
            Self::GoldDamaged { .. } => Some(SoundCue::GoldDamaged),
            Self::TurretFired { kind, .. } => Some(kind.fire_cue()),
            Self::EnemyPricked { .. } => Some(SoundCue::EnemyHit),
            Self::BombDetonated { .. } => None,
            Self::PurchaseCompleted { .. } => Some(SoundCue::Purchase),
            Self::PurchaseRejected { .. } => Some(SoundCue::PurchaseFailed),
            Self::HealthRestored { .. } => Some(SoundCue::Heal),
            Self::HealthRestoreUnavailable { .. } => Some(SoundCue::HealFailed),
            Self::TurretPlaced { .. } => Some(SoundCue::TurretPlaced),
            Self::TrapPlaced { .. } => Some(SoundCue::TrapPlaced),
        }
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier assigned to a turret, equal to its placement index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TurretId(u32);

impl TurretId {
    /// Creates a new turret identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a trap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrapId(u32);

impl TrapId {
    /// Creates a new trap identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Normalises `value` into `0.0..=1.0` relative to the provided bounds.
///
/// Degenerate or inverted bounds and non-finite inputs collapse to zero.
#[must_use]
pub fn clamped_fraction(value: f32, low: f32, high: f32) -> f32 {
    let span = high - low;
    if span.is_nan() || span <= 0.0 {
        return 0.0;
    }
    let fraction = (value - low) / span;
    if fraction.is_nan() {
        return 0.0;
    }
    fraction.clamp(0.0, 1.0)
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Variant of the enemy.
    pub kind: EnemyKind,
    /// Path position along the walking route.
    pub progress: f32,
    /// Path position gained per tick.
    pub speed: f32,
    /// Remaining health.
    pub health: f32,
    /// Health the enemy spawned with.
    pub max_health: f32,
    /// Top-left corner of the enemy sprite in world units.
    pub anchor: Vec2,
    /// Centre of the enemy sprite in world units.
    pub center: Vec2,
}

impl EnemySnapshot {
    /// Remaining health as a fraction of the spawn health, clamped for display.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        clamped_fraction(self.health, 0.0, self.max_health)
    }
}

/// Read-only snapshot describing all enemies on the route.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    ///
    /// Identifiers grow with spawn order, so sorting by identifier preserves
    /// the population order that tie-breaks rely on.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in population order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single turret's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurretSnapshot {
    /// Identifier allocated to the turret.
    pub id: TurretId,
    /// Model of the turret.
    pub kind: TurretKind,
    /// Wall tile hosting the turret.
    pub tile: TileCoord,
    /// Current aim direction in radians.
    pub direction: f32,
}

/// Read-only snapshot describing all turrets placed on the level.
#[derive(Clone, Debug, Default)]
pub struct TurretView {
    snapshots: Vec<TurretSnapshot>,
}

impl TurretView {
    /// Creates a new turret view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TurretSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured turret snapshots in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &TurretSnapshot> {
        self.snapshots.iter()
    }

    /// Reports whether the view contains no turrets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TurretSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single trap's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrapSnapshot {
    /// Identifier allocated to the trap.
    pub id: TrapId,
    /// Variant of the trap.
    pub kind: TrapKind,
    /// Floor tile hosting the trap.
    pub tile: TileCoord,
    /// Damage dealt so far. Only spike traps accumulate damage.
    pub dealt: f32,
    /// Whether the trap is spent and waiting for removal.
    pub dead: bool,
}

/// Read-only snapshot describing all traps on the level.
#[derive(Clone, Debug, Default)]
pub struct TrapView {
    snapshots: Vec<TrapSnapshot>,
}

impl TrapView {
    /// Creates a new trap view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TrapSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured trap snapshots in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &TrapSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TrapSnapshot> {
        self.snapshots
    }
}

/// Target chosen by a turret for the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurretTarget {
    /// Turret that selected the target.
    pub turret: TurretId,
    /// Model of the turret.
    pub kind: TurretKind,
    /// Nearest enemy to the turret.
    pub enemy: EnemyId,
    /// Centre of the turret's tile in world units.
    pub origin: Vec2,
    /// Where the enemy is expected to be when a bullet arrives.
    pub prediction: Vec2,
    /// Squared distance between the turret and the prediction.
    pub distance_sq: f32,
}

impl TurretTarget {
    /// Reports whether the prediction lies strictly inside the turret's range.
    #[must_use]
    pub fn in_range(&self) -> bool {
        let range = self.kind.range();
        self.distance_sq < range * range
    }
}

//! Static tables describing tiles, entity variants and the shop.

use serde::{Deserialize, Serialize};

use crate::{ENEMY_BASE_DAMAGE, ENEMY_BASE_HEALTH, ENEMY_BASE_SPEED, TURRET_BASE_DAMAGE};

/// Classification of a single level tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Solid wall. Turrets are mounted on walls.
    Wall,
    /// Walkable floor. Traps are laid on the floor.
    Floor,
    /// Wall hosting a pistol turret.
    PistolTurret,
    /// Wall hosting a shotgun turret.
    ShotgunTurret,
    /// Wall hosting an uzi turret.
    UziTurret,
    /// The gold stash at the end of the route.
    Gold,
    /// Floor hosting a spike trap.
    SpikeTrap,
    /// Floor hosting a bomb trap.
    BombTrap,
    /// Where the robbers enter the level.
    Spawn,
    /// Marker shown when the held item cannot be placed on the hovered tile.
    Nope,
}

impl TileKind {
    /// Maps a level file character to its tile.
    #[must_use]
    pub const fn from_level_char(character: char) -> Self {
        match character {
            '#' => Self::Wall,
            'G' => Self::Gold,
            'S' => Self::Spawn,
            _ => Self::Floor,
        }
    }

    /// Reports whether the tile kind belongs on walls.
    #[must_use]
    pub const fn is_wall_placeable(self) -> bool {
        matches!(
            self,
            Self::PistolTurret | Self::ShotgunTurret | Self::UziTurret | Self::Wall
        )
    }

    /// Reports whether the tile kind belongs on the floor.
    #[must_use]
    pub const fn is_floor_placeable(self) -> bool {
        matches!(self, Self::SpikeTrap | Self::BombTrap | Self::Floor)
    }

    /// Entity hosted by the tile, if the tile is a placed turret or trap.
    #[must_use]
    pub const fn placeable(self) -> Option<Placeable> {
        match self {
            Self::PistolTurret => Some(Placeable::Turret(TurretKind::Pistol)),
            Self::ShotgunTurret => Some(Placeable::Turret(TurretKind::Shotgun)),
            Self::UziTurret => Some(Placeable::Turret(TurretKind::Uzi)),
            Self::SpikeTrap => Some(Placeable::Trap(TrapKind::Spike)),
            Self::BombTrap => Some(Placeable::Trap(TrapKind::Bomb)),
            Self::Wall | Self::Floor | Self::Gold | Self::Spawn | Self::Nope => None,
        }
    }
}

/// RGB colour attached to enemies and particles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Plain white, the default particle colour.
    pub const WHITE: Self = Self::from_rgb(255, 255, 255);

    /// Creates a new colour from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the colour.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the colour.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the colour.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Species of robber walking the route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Balanced robber.
    Grunt,
    /// Fast and fragile robber.
    Speedy,
    /// Slow robber that hits the gold hard.
    Bulk,
}

impl EnemyKind {
    /// Multiplier applied to [`ENEMY_BASE_SPEED`].
    #[must_use]
    pub const fn speed_multiplier(self) -> f32 {
        match self {
            Self::Grunt => 1.0,
            Self::Speedy => 1.75,
            Self::Bulk => 0.6,
        }
    }

    /// Multiplier applied to [`ENEMY_BASE_DAMAGE`].
    #[must_use]
    pub const fn damage_multiplier(self) -> f32 {
        match self {
            Self::Grunt => 1.0,
            Self::Speedy => 0.75,
            Self::Bulk => 3.0,
        }
    }

    /// Multiplier applied to [`ENEMY_BASE_HEALTH`].
    #[must_use]
    pub const fn health_multiplier(self) -> f32 {
        match self {
            Self::Grunt => 1.5,
            Self::Speedy => 1.25,
            Self::Bulk => 5.5,
        }
    }

    /// Fraction of the whole route covered per tick.
    #[must_use]
    pub fn route_fraction_per_tick(self) -> f32 {
        ENEMY_BASE_SPEED * self.speed_multiplier()
    }

    /// Gold removed on every successful gold check.
    #[must_use]
    pub fn damage(self) -> f32 {
        ENEMY_BASE_DAMAGE * self.damage_multiplier()
    }

    /// Health the enemy spawns with.
    #[must_use]
    pub fn health(self) -> f32 {
        ENEMY_BASE_HEALTH * self.health_multiplier()
    }

    /// Cash paid out when the enemy is killed.
    #[must_use]
    pub const fn loot(self) -> u32 {
        match self {
            Self::Grunt => 15,
            Self::Speedy => 20,
            Self::Bulk => 25,
        }
    }

    /// Colour of the enemy's death burst.
    #[must_use]
    pub const fn color(self) -> Rgb {
        match self {
            Self::Grunt => Rgb::from_rgb(255, 153, 35),
            Self::Speedy => Rgb::from_rgb(119, 179, 0),
            Self::Bulk => Rgb::from_rgb(0, 74, 179),
        }
    }
}

const G: EnemyKind = EnemyKind::Grunt;
const S: EnemyKind = EnemyKind::Speedy;
const B: EnemyKind = EnemyKind::Bulk;

/// Pre-authored order in which enemies enter every level, repeated forever.
#[rustfmt::skip]
pub const SPAWN_SEQUENCE: [EnemyKind; 62] = [
    S, S, S, S, S, S, S, S, S, S,
    G, G, G, G, S, S, G, G, G, G,
    S, S, G, G, B, B, B, B, B, B,
    B, B, S, B, S, B, S, B, S, B,
    G, G, G, G, B, B, B, B, S, S,
    S, S, G, S, G, S, G, S, G, S,
    G, S,
];

/// Turret models that can be mounted on walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurretKind {
    /// Accurate single-shot turret.
    Pistol,
    /// Slow turret firing a spread of pellets.
    Shotgun,
    /// Rapid-fire turret with long range.
    Uzi,
}

impl TurretKind {
    /// Ticks between two shots.
    #[must_use]
    pub const fn cooldown_ticks(self) -> u64 {
        match self {
            Self::Pistol => 35,
            Self::Shotgun => 85,
            Self::Uzi => 10,
        }
    }

    /// Jitter applied to each pellet's end point. Lower is tighter.
    #[must_use]
    pub const fn accuracy(self) -> f32 {
        match self {
            Self::Pistol => 0.0,
            Self::Shotgun => 19.0,
            Self::Uzi => 4.0,
        }
    }

    /// Pellets fired per shot.
    #[must_use]
    pub const fn pellets(self) -> u32 {
        match self {
            Self::Pistol => 1,
            Self::Shotgun => 10,
            Self::Uzi => 1,
        }
    }

    /// Multiplier applied to [`TURRET_BASE_DAMAGE`] for each pellet.
    #[must_use]
    pub const fn damage_multiplier(self) -> f32 {
        match self {
            Self::Pistol => 0.5,
            Self::Shotgun => 0.35,
            Self::Uzi => 0.1,
        }
    }

    /// Damage dealt by a single pellet.
    #[must_use]
    pub fn pellet_damage(self) -> f32 {
        TURRET_BASE_DAMAGE * self.damage_multiplier()
    }

    /// Firing range in world units.
    #[must_use]
    pub const fn range(self) -> f32 {
        match self {
            Self::Pistol => 80.0,
            Self::Shotgun => 50.0,
            Self::Uzi => 100.0,
        }
    }

    /// Sound requested whenever the turret fires.
    #[must_use]
    pub const fn fire_cue(self) -> SoundCue {
        match self {
            Self::Pistol => SoundCue::PistolFired,
            Self::Shotgun => SoundCue::ShotgunFired,
            Self::Uzi => SoundCue::UziFired,
        }
    }
}

/// Trap variants that can be laid on the floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrapKind {
    /// Wounds every robber crossing it until it breaks.
    Spike,
    /// Obliterates the first robber that steps on it.
    Bomb,
}

/// Anything the player can hold in hand and deploy on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Placeable {
    /// A turret destined for a wall.
    Turret(TurretKind),
    /// A trap destined for the floor.
    Trap(TrapKind),
}

impl Placeable {
    /// Tile written into the grid once the item is deployed.
    #[must_use]
    pub const fn tile_kind(self) -> TileKind {
        match self {
            Self::Turret(TurretKind::Pistol) => TileKind::PistolTurret,
            Self::Turret(TurretKind::Shotgun) => TileKind::ShotgunTurret,
            Self::Turret(TurretKind::Uzi) => TileKind::UziTurret,
            Self::Trap(TrapKind::Spike) => TileKind::SpikeTrap,
            Self::Trap(TrapKind::Bomb) => TileKind::BombTrap,
        }
    }

    /// Reports whether the item may be deployed on a tile of the given kind.
    ///
    /// Wall items need a bare wall and floor items need a bare floor.
    #[must_use]
    pub const fn fits_on(self, existing: TileKind) -> bool {
        let tile = self.tile_kind();
        if tile.is_wall_placeable() {
            matches!(existing, TileKind::Wall)
        } else if tile.is_floor_placeable() {
            matches!(existing, TileKind::Floor)
        } else {
            false
        }
    }
}

/// Entries of the in-game shop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShopItem {
    /// Pistol turret.
    PistolTurret,
    /// Shotgun turret.
    ShotgunTurret,
    /// Uzi turret.
    UziTurret,
    /// Restores some gold.
    HealthUp,
    /// Spike trap.
    SpikeTrap,
    /// Bomb trap.
    BombTrap,
}

impl ShopItem {
    /// Cash required to buy the item.
    #[must_use]
    pub const fn price(self) -> u32 {
        match self {
            Self::PistolTurret | Self::HealthUp => 50,
            Self::ShotgunTurret | Self::SpikeTrap => 100,
            Self::UziTurret | Self::BombTrap => 150,
        }
    }

    /// Item put in hand after purchase. Health-ups are consumed immediately.
    #[must_use]
    pub const fn placeable(self) -> Option<Placeable> {
        match self {
            Self::PistolTurret => Some(Placeable::Turret(TurretKind::Pistol)),
            Self::ShotgunTurret => Some(Placeable::Turret(TurretKind::Shotgun)),
            Self::UziTurret => Some(Placeable::Turret(TurretKind::Uzi)),
            Self::SpikeTrap => Some(Placeable::Trap(TrapKind::Spike)),
            Self::BombTrap => Some(Placeable::Trap(TrapKind::Bomb)),
            Self::HealthUp => None,
        }
    }
}

/// Named sound requests emitted for the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SoundCue {
    /// An enemy was killed.
    EnemyDied,
    /// A spike trap wounded an enemy.
    EnemyHit,
    /// An enemy stole gold.
    GoldDamaged,
    /// A pistol turret fired.
    PistolFired,
    /// A shotgun turret fired.
    ShotgunFired,
    /// An uzi turret fired.
    UziFired,
    /// A turret was mounted.
    TurretPlaced,
    /// A trap was laid.
    TrapPlaced,
    /// A purchase went through.
    Purchase,
    /// The player could not afford a purchase.
    PurchaseFailed,
    /// A health-up restored gold.
    Heal,
    /// A health-up was requested during its cooldown.
    HealFailed,
    /// The level was survived.
    LevelPassed,
    /// The gold ran out.
    LevelFailed,
    /// A title menu entry was selected.
    MenuSelect,
}

impl SoundCue {
    /// Stable identifier used to look the sound up in an asset bank.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::EnemyDied => "enemy_die",
            Self::EnemyHit => "enemy_hit",
            Self::GoldDamaged => "gold_damage",
            Self::PistolFired => "turret_pistol",
            Self::ShotgunFired => "turret_shotgun",
            Self::UziFired => "turret_uzi",
            Self::TurretPlaced => "place_turret",
            Self::TrapPlaced => "place_trap",
            Self::Purchase => "purchase",
            Self::PurchaseFailed => "failed_purchase",
            Self::Heal => "heal",
            Self::HealFailed => "failed_heal",
            Self::LevelPassed => "level_pass",
            Self::LevelFailed => "level_fail",
            Self::MenuSelect => "menu_select",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_characters_map_to_tiles() {
        assert_eq!(TileKind::from_level_char('#'), TileKind::Wall);
        assert_eq!(TileKind::from_level_char('G'), TileKind::Gold);
        assert_eq!(TileKind::from_level_char('S'), TileKind::Spawn);
        assert_eq!(TileKind::from_level_char('.'), TileKind::Floor);
        assert_eq!(TileKind::from_level_char(' '), TileKind::Floor);
    }

    #[test]
    fn placement_predicates_split_walls_and_floors() {
        for tile in [
            TileKind::Wall,
            TileKind::PistolTurret,
            TileKind::ShotgunTurret,
            TileKind::UziTurret,
        ] {
            assert!(tile.is_wall_placeable());
            assert!(!tile.is_floor_placeable());
        }
        for tile in [TileKind::Floor, TileKind::SpikeTrap, TileKind::BombTrap] {
            assert!(tile.is_floor_placeable());
            assert!(!tile.is_wall_placeable());
        }
        for tile in [TileKind::Gold, TileKind::Spawn, TileKind::Nope] {
            assert!(!tile.is_floor_placeable());
            assert!(!tile.is_wall_placeable());
        }
    }

    #[test]
    fn tile_mapping_agrees_with_placeables() {
        for item in [
            ShopItem::PistolTurret,
            ShopItem::ShotgunTurret,
            ShopItem::UziTurret,
            ShopItem::SpikeTrap,
            ShopItem::BombTrap,
        ] {
            let placeable = item.placeable().expect("placeable item");
            assert_eq!(placeable.tile_kind().placeable(), Some(placeable));
        }
        assert_eq!(ShopItem::HealthUp.placeable(), None);
    }

    #[test]
    fn turrets_need_bare_walls_and_traps_need_bare_floor() {
        let pistol = Placeable::Turret(TurretKind::Pistol);
        let spike = Placeable::Trap(TrapKind::Spike);
        assert!(pistol.fits_on(TileKind::Wall));
        assert!(!pistol.fits_on(TileKind::UziTurret));
        assert!(!pistol.fits_on(TileKind::Floor));
        assert!(spike.fits_on(TileKind::Floor));
        assert!(!spike.fits_on(TileKind::BombTrap));
        assert!(!spike.fits_on(TileKind::Gold));
    }

    #[test]
    fn grunt_damage_matches_base_damage() {
        assert!((EnemyKind::Grunt.damage() - 7.5).abs() < f32::EPSILON);
        assert!((EnemyKind::Bulk.health() - 27.5).abs() < f32::EPSILON);
    }

    #[test]
    fn spawn_sequence_opens_with_speedy_wave() {
        assert!(SPAWN_SEQUENCE[..10]
            .iter()
            .all(|kind| *kind == EnemyKind::Speedy));
        assert_eq!(SPAWN_SEQUENCE[24], EnemyKind::Bulk);
        assert_eq!(SPAWN_SEQUENCE[61], EnemyKind::Speedy);
    }
}

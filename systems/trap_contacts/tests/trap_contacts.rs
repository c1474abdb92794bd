use bank_heist_core::{
    Command, EnemyId, EnemyKind, Event, ShopItem, TileCoord, TileKind, TrapId, TrapKind,
};
use bank_heist_system_trap_contacts::TrapContacts;
use bank_heist_world::{self as world, query, Level, Session};

const CORRIDOR: &str = "\
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

fn replay(item: ShopItem, kinds: &[EnemyKind], ticks: u64) -> (Session, Vec<Event>) {
    let level = Level::parse(CORRIDOR).expect("valid level");
    let mut session = Session::new(&level, 21);
    let mut contacts = TrapContacts::new();
    let mut events = Vec::new();

    world::apply(&mut session, Command::Purchase { item }, &mut events);
    world::apply(
        &mut session,
        Command::Place {
            cursor: TileCoord::new(5, 1).center(),
            repeat: false,
        },
        &mut events,
    );
    for &kind in kinds {
        world::apply(&mut session, Command::SpawnEnemy { kind }, &mut events);
    }

    let mut commands = Vec::new();
    for tick in 1..=ticks {
        world::apply(&mut session, Command::AdvanceCombatants { tick }, &mut events);
        contacts.handle(
            &query::trap_view(&session),
            &query::enemy_view(&session),
            &mut commands,
        );
        for command in commands.drain(..) {
            world::apply(&mut session, command, &mut events);
        }
        world::apply(&mut session, Command::Sweep, &mut events);
    }
    (session, events)
}

#[test]
fn bomb_obliterates_the_first_enemy_to_step_on_it() {
    let (session, events) = replay(ShopItem::BombTrap, &[EnemyKind::Bulk], 400);

    let detonations: Vec<_> = events
        .iter()
        .filter(|event| matches!(event, Event::BombDetonated { .. }))
        .collect();
    assert_eq!(
        detonations,
        vec![&Event::BombDetonated {
            trap: TrapId::new(0),
            enemy: EnemyId::new(0),
        }]
    );

    let detonated_at = events
        .iter()
        .position(|event| matches!(event, Event::BombDetonated { .. }))
        .expect("bomb detonated");
    let tail = &events[detonated_at..];
    assert!(tail.contains(&Event::TrapRemoved {
        trap: TrapId::new(0),
        kind: TrapKind::Bomb,
        tile: TileCoord::new(5, 1),
    }));
    assert!(tail.contains(&Event::EnemyKilled {
        enemy: EnemyId::new(0),
        kind: EnemyKind::Bulk,
        loot: EnemyKind::Bulk.loot(),
    }));

    assert_eq!(
        query::tile_grid(&session).peek(TileCoord::new(5, 1)),
        TileKind::Floor
    );
    assert_eq!(query::statistics(&session).kills, 1);
    assert_eq!(query::cash(&session), EnemyKind::Bulk.loot());
}

#[test]
fn bomb_catches_every_enemy_on_its_tile_in_the_same_tick() {
    let (session, events) = replay(
        ShopItem::BombTrap,
        &[EnemyKind::Grunt, EnemyKind::Grunt],
        400,
    );

    let detonations: Vec<_> = events
        .iter()
        .filter(|event| matches!(event, Event::BombDetonated { .. }))
        .collect();
    assert_eq!(
        detonations,
        vec![
            &Event::BombDetonated {
                trap: TrapId::new(0),
                enemy: EnemyId::new(0),
            },
            &Event::BombDetonated {
                trap: TrapId::new(0),
                enemy: EnemyId::new(1),
            },
        ]
    );

    let removals = events
        .iter()
        .filter(|event| matches!(event, Event::TrapRemoved { .. }))
        .count();
    assert_eq!(removals, 1);
    assert_eq!(query::statistics(&session).kills, 2);
    assert!(query::enemy_view(&session).is_empty());
    assert_eq!(query::cash(&session), 2 * EnemyKind::Grunt.loot());
}

#[test]
fn spike_wounds_an_enemy_while_it_crosses() {
    let (session, events) = replay(ShopItem::SpikeTrap, &[EnemyKind::Grunt], 300);

    let pricks = events
        .iter()
        .filter(|event| matches!(event, Event::EnemyPricked { .. }))
        .count();
    assert!(pricks > 0, "grunt never touched the spike");

    let grunt = EnemyKind::Grunt.health();
    if pricks as f32 >= grunt {
        assert_eq!(query::statistics(&session).kills, 1);
    } else {
        let health = query::enemy_view(&session)
            .iter()
            .next()
            .map(|snapshot| snapshot.health)
            .expect("grunt survives");
        assert!((health - (grunt - pricks as f32)).abs() < 1e-4);
    }
}

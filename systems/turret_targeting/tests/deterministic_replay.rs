use bank_heist_core::{Command, EnemyId, EnemyKind, Event, ShopItem, TileCoord, TurretTarget};
use bank_heist_system_turret_targeting::TurretTargeting;
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

#[test]
fn deterministic_replay_follows_the_leading_enemy() {
    let first = replay(17);
    let second = replay(17);
    assert_eq!(first, second, "replay diverged between runs");

    let populated: Vec<_> = first.iter().filter(|targets| !targets.is_empty()).collect();
    assert!(!populated.is_empty(), "turret never acquired a target");
    assert!(populated.iter().all(|targets| targets.len() == 1));

    // The first spawn stays nearest to the turret while both walk the top corridor.
    assert_eq!(populated[0][0].enemy, EnemyId::new(0));
    assert!(first.iter().any(|targets| targets
        .iter()
        .any(|target| target.in_range())));
}

fn replay(seed: u64) -> Vec<Vec<TurretTarget>> {
    let level = Level::parse(CORRIDOR).expect("valid level");
    let mut session = Session::new(&level, seed);
    let mut targeting = TurretTargeting::new();
    let mut events: Vec<Event> = Vec::new();

    world::apply(
        &mut session,
        Command::Purchase {
            item: ShopItem::UziTurret,
        },
        &mut events,
    );
    world::apply(
        &mut session,
        Command::Place {
            cursor: TileCoord::new(6, 0).center(),
            repeat: false,
        },
        &mut events,
    );

    let mut assignments = Vec::new();
    let mut targets = Vec::new();
    for tick in 1..=400_u64 {
        if tick == 1 || tick == 200 {
            world::apply(
                &mut session,
                Command::SpawnEnemy {
                    kind: EnemyKind::Grunt,
                },
                &mut events,
            );
        }
        world::apply(&mut session, Command::AdvanceCombatants { tick }, &mut events);
        targeting.handle(
            &query::turret_view(&session),
            &query::enemy_view(&session),
            query::path(&session),
            &mut targets,
        );
        assignments.push(targets.clone());
    }
    assignments
}

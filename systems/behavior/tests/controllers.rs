use std::time::Duration;

use maze_chase_core::{
    BehaviorMode, Command, Direction, EnemyId, Event, Point, Settings, Size, WallPolicy,
};
use maze_chase_system_behavior::{ControllerState, EnemyBehavior, State};
use maze_chase_world::{apply, query, World};

const ENEMY: EnemyId = EnemyId::new(0);

fn world(walls: WallPolicy, behavior: BehaviorMode, pickups: u32) -> World {
    let mut settings = Settings::default();
    settings.grid.walls = walls;
    settings.enemy.behavior = behavior;
    settings.population.enemies = 0;
    settings.population.pickups = pickups;
    let mut world = World::with_settings(settings);
    let mut events = Vec::new();
    apply(&mut world, Command::GenerateLevel { seed: 11 }, &mut events);
    world
}

fn spawn_enemy(world: &mut World, position: Point, facing: Direction) {
    let mut events = Vec::new();
    apply(
        world,
        Command::SpawnEnemy {
            position,
            size: Size::new(20, 20),
            facing,
        },
        &mut events,
    );
}

/// Feeds events to the system and applies its commands until it goes quiet.
fn pump(world: &mut World, behavior: &mut EnemyBehavior, events: Vec<Event>) -> Vec<Event> {
    let mut log = Vec::new();
    let mut pending = events;
    loop {
        let mut commands = Vec::new();
        behavior.handle(
            &pending,
            &query::enemy_view(world),
            query::player(world).as_ref(),
            query::rooms(world),
            &mut commands,
        );
        log.append(&mut pending);
        if commands.is_empty() {
            return log;
        }
        for command in commands {
            apply(world, command, &mut pending);
        }
    }
}

fn tick(world: &mut World, behavior: &mut EnemyBehavior) -> Vec<Event> {
    let mut events = Vec::new();
    apply(
        world,
        Command::Tick {
            dt: Duration::from_millis(50),
        },
        &mut events,
    );
    pump(world, behavior, events)
}

fn movement(events: &[Event]) -> Vec<Event> {
    events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::EnemyMoved { .. }
                    | Event::EnemyMoveBlocked { .. }
                    | Event::EnemyFacingChanged { .. }
            )
        })
        .cloned()
        .collect()
}

fn walk_into_top_wall(mode: BehaviorMode) -> (Vec<Event>, EnemyBehavior) {
    let mut world = world(WallPolicy::Keep, mode, 0);
    spawn_enemy(&mut world, Point::new(30, 20), Direction::Up);
    let mut behavior = EnemyBehavior::new();

    let mut log = Vec::new();
    for _ in 0..14 {
        log.extend(tick(&mut world, &mut behavior));
    }
    (movement(&log), behavior)
}

#[test]
fn state_machine_reverses_after_hitting_a_wall() {
    let (events, behavior) = walk_into_top_wall(BehaviorMode::StateMachine);

    let blocked = events
        .iter()
        .position(|event| {
            *event
                == Event::EnemyMoveBlocked {
                    enemy: ENEMY,
                    direction: Direction::Up,
                }
        })
        .expect("enemy reaches the top wall");
    assert_eq!(
        events[blocked + 1],
        Event::EnemyFacingChanged {
            enemy: ENEMY,
            direction: Direction::Down,
        }
    );
    assert!(matches!(
        events[blocked + 2],
        Event::EnemyMoved {
            direction: Direction::Down,
            ..
        }
    ));
    assert_eq!(
        behavior.controller_state(ENEMY),
        Some(ControllerState::Machine(State::Down))
    );
}

#[test]
fn both_controllers_honour_the_same_contract() {
    let (machine, _) = walk_into_top_wall(BehaviorMode::StateMachine);
    let (tree, behavior) = walk_into_top_wall(BehaviorMode::BehaviorTree);

    assert_eq!(machine, tree);
    assert_eq!(
        behavior.controller_state(ENEMY),
        Some(ControllerState::Tree)
    );
    let reversals = tree
        .iter()
        .filter(|event| matches!(event, Event::EnemyFacingChanged { .. }))
        .count();
    assert_eq!(reversals, 1);
}

#[test]
fn enemy_turns_toward_a_visible_player() {
    let mut world = world(WallPolicy::RemoveAll, BehaviorMode::StateMachine, 0);
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::SpawnPlayer {
            position: Point::new(350, 260),
            size: Size::new(20, 20),
        },
        &mut events,
    );
    spawn_enemy(&mut world, Point::new(350, 20), Direction::Left);
    let mut behavior = EnemyBehavior::new();

    let events = movement(&tick(&mut world, &mut behavior));
    assert_eq!(
        events,
        vec![
            Event::EnemyFacingChanged {
                enemy: ENEMY,
                direction: Direction::Down,
            },
            Event::EnemyMoved {
                enemy: ENEMY,
                direction: Direction::Down,
                from: Point::new(350, 20),
                to: Point::new(350, 22),
            },
        ]
    );
}

#[test]
fn controllers_idle_once_the_game_is_won() {
    let mut world = world(WallPolicy::RemoveAll, BehaviorMode::BehaviorTree, 1);
    spawn_enemy(&mut world, Point::new(30, 20), Direction::Right);
    let mut behavior = EnemyBehavior::new();
    let _ = tick(&mut world, &mut behavior);

    let pickup = query::pickup_view(&world)
        .iter()
        .next()
        .map(|pickup| pickup.id)
        .expect("generated pickup");
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::ResolvePickupCollision { pickup },
        &mut events,
    );
    assert!(events.contains(&Event::GameWon));
    let _ = pump(&mut world, &mut behavior, events);

    for _ in 0..5 {
        assert!(movement(&tick(&mut world, &mut behavior)).is_empty());
    }
}

#[test]
fn removed_enemies_lose_their_controller() {
    let mut world = world(WallPolicy::RemoveAll, BehaviorMode::StateMachine, 0);
    spawn_enemy(&mut world, Point::new(30, 20), Direction::Right);
    let mut behavior = EnemyBehavior::new();
    let _ = tick(&mut world, &mut behavior);
    assert!(behavior.controller_state(ENEMY).is_some());

    let mut events = Vec::new();
    apply(
        &mut world,
        Command::ResolveEnemyCollision { enemy: ENEMY },
        &mut events,
    );
    let _ = pump(&mut world, &mut behavior, events);
    assert_eq!(behavior.controller_state(ENEMY), None);
}

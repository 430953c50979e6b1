use std::time::Duration;

use maze_chase_core::{Command, Direction, Event, KeyState, Point, Settings, Size, WallPolicy};
use maze_chase_system_collision::Collision;
use maze_chase_world::{apply, query, World};

fn world() -> World {
    let mut settings = Settings::default();
    settings.grid.walls = WallPolicy::RemoveAll;
    settings.population.enemies = 0;
    settings.population.pickups = 0;
    let mut world = World::with_settings(settings);
    let mut events = Vec::new();
    apply(&mut world, Command::GenerateLevel { seed: 3 }, &mut events);
    apply(
        &mut world,
        Command::SpawnPlayer {
            position: Point::new(20, 20),
            size: Size::new(20, 20),
        },
        &mut events,
    );
    world
}

fn run(world: &mut World, collision: &mut Collision, commands: Vec<Command>) -> Vec<Event> {
    let mut log = Vec::new();
    let mut pending = Vec::new();
    for command in commands {
        apply(world, command, &mut pending);
    }
    loop {
        let mut follow_up = Vec::new();
        collision.handle(
            &pending,
            query::player(world).as_ref(),
            &query::enemy_view(world),
            &query::pickup_view(world),
            &mut follow_up,
        );
        log.append(&mut pending);
        if follow_up.is_empty() {
            return log;
        }
        for command in follow_up {
            apply(world, command, &mut pending);
        }
    }
}

fn step_right(world: &mut World, collision: &mut Collision) -> Vec<Event> {
    run(
        world,
        collision,
        vec![
            Command::Tick {
                dt: Duration::from_millis(50),
            },
            Command::StepPlayer,
        ],
    )
}

#[test]
fn collecting_every_pickup_wins_exactly_once() {
    let mut world = world();
    let mut collision = Collision::new();
    let mut events = Vec::new();
    for x in [41, 45] {
        apply(
            &mut world,
            Command::SpawnPickup {
                position: Point::new(x, 25),
                size: Size::new(10, 10),
            },
            &mut events,
        );
    }
    apply(
        &mut world,
        Command::SetDirectionKey {
            direction: Direction::Right,
            state: KeyState::Pressed,
        },
        &mut events,
    );
    assert_eq!(query::pickup_count(&world), 2);

    let first = step_right(&mut world, &mut collision);
    assert!(first
        .iter()
        .any(|event| matches!(event, Event::PickupFetched { .. })));
    assert!(!first.contains(&Event::GameWon));
    assert_eq!(query::pickup_count(&world), 1);

    let mut later = Vec::new();
    for _ in 0..6 {
        later.extend(step_right(&mut world, &mut collision));
    }
    let wins = later.iter().filter(|event| **event == Event::GameWon).count();
    assert_eq!(wins, 1);
    assert!(query::is_game_won(&world));
    assert_eq!(query::player(&world).map(|player| player.points), Some(2));
}

#[test]
fn touching_an_enemy_removes_only_the_enemy() {
    let mut world = world();
    let mut collision = Collision::new();
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::SpawnPickup {
            position: Point::new(400, 20),
            size: Size::new(10, 10),
        },
        &mut events,
    );
    apply(
        &mut world,
        Command::SpawnEnemy {
            position: Point::new(30, 20),
            size: Size::new(20, 20),
            facing: Direction::Up,
        },
        &mut events,
    );

    let log = run(
        &mut world,
        &mut collision,
        vec![Command::Tick {
            dt: Duration::from_millis(50),
        }],
    );
    assert!(log
        .iter()
        .any(|event| matches!(event, Event::PlayerCollidedWithEnemy { .. })));
    assert!(query::enemy_view(&world).is_empty());
    assert!(query::player(&world).is_some());
    assert!(!query::is_game_won(&world));
}

//! Level construction from settings or authored descriptions.

use maze_chase_core::{
    Direction, Event, GridLayout, LevelDescription, ObjectKind, RoomId, Side, SpriteCatalog,
    WallPolicy,
};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::{RoomGraph, World};

/// Generates a grid from the active settings and populates it at random.
pub(crate) fn generate(world: &mut World, seed: u64, out_events: &mut Vec<Event>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let grid = RoomGraph::generate(world.settings.layout(), world.settings.grid.walls, &mut rng);
    world.install_grid(grid, out_events);
    populate(world, &mut rng, out_events);
}

/// Places the player in a random room, then enemies and pickups elsewhere.
fn populate(world: &mut World, rng: &mut ChaCha8Rng, out_events: &mut Vec<Event>) {
    let population = world.settings.population;
    let room_count = world.grid.rooms().len();
    if room_count == 0 {
        return;
    }

    let player_slot = rng.gen_range(0..room_count);
    let position = world.grid.rooms()[player_slot].center_for(population.player_size);
    world.spawn_player(position, population.player_size, out_events);

    let others: Vec<usize> = (0..room_count).filter(|slot| *slot != player_slot).collect();
    if others.is_empty() {
        debug!("single-room grid leaves no space for enemies or pickups");
        return;
    }

    for _ in 0..population.enemies {
        let Some(&slot) = others.choose(rng) else {
            break;
        };
        let facing = random_direction(rng);
        let position = world.grid.rooms()[slot].center_for(population.enemy_size);
        let _ = world.spawn_enemy(None, position, population.enemy_size, facing, out_events);
    }

    scatter_pickups(world, &others, rng, out_events);
}

/// Centers the configured number of pickups in rooms drawn from `slots`.
fn scatter_pickups(
    world: &mut World,
    slots: &[usize],
    rng: &mut ChaCha8Rng,
    out_events: &mut Vec<Event>,
) {
    let population = world.settings.population;
    for _ in 0..population.pickups {
        let Some(&slot) = slots.choose(rng) else {
            break;
        };
        let position = world.grid.rooms()[slot].center_for(population.pickup_size);
        world.spawn_pickup(None, position, population.pickup_size, out_events);
    }
}

/// Builds the level described by `level`, centering each object in its room.
///
/// The world is left untouched when the description is invalid.
pub(crate) fn load(
    world: &mut World,
    level: &LevelDescription,
    sprites: &SpriteCatalog,
    seed: u64,
    out_events: &mut Vec<Event>,
) {
    if let Err(reason) = level.validate(sprites) {
        warn!(%reason, "rejected level description");
        out_events.push(Event::LevelRejected { reason });
        return;
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let layout = GridLayout {
        rows: level.rows,
        columns: level.columns,
        width: world.settings.screen.width,
        height: world.settings.screen.height,
    };
    let mut grid = RoomGraph::build(layout);
    for room in &level.rooms {
        let Some(target) = grid.room_mut(RoomId::new(room.number)) else {
            continue;
        };
        for (side, present) in [
            (Side::Top, room.top),
            (Side::Right, room.right),
            (Side::Bottom, room.bottom),
            (Side::Left, room.left),
        ] {
            let _ = target.set_wall(side, present);
        }
    }
    if world.settings.grid.walls == WallPolicy::RemoveAll {
        grid.apply_policy(WallPolicy::RemoveAll, &mut rng);
    }
    world.install_grid(grid, out_events);

    for room in &level.rooms {
        for object in &room.objects {
            let Some(size) = sprites.size_of(object.resource_id) else {
                continue;
            };
            let Some(position) = world
                .grid
                .room(RoomId::new(room.number))
                .map(|target| target.center_for(size))
            else {
                continue;
            };

            match object.kind {
                ObjectKind::Player => world.spawn_player(position, size, out_events),
                ObjectKind::Enemy => {
                    let facing = object
                        .property("direction")
                        .and_then(Direction::from_name)
                        .filter(|direction| *direction != Direction::None)
                        .unwrap_or_else(|| random_direction(&mut rng));
                    let _ = world.spawn_enemy(
                        Some(object.name.clone()),
                        position,
                        size,
                        facing,
                        out_events,
                    );
                }
                ObjectKind::Pickup if level.auto_populate_pickups => {}
                ObjectKind::Pickup => {
                    world.spawn_pickup(Some(object.name.clone()), position, size, out_events);
                }
            }
        }
    }

    if level.auto_populate_pickups {
        let player_room = world
            .registry
            .player()
            .and_then(|player| player.cursor.room());
        let slots: Vec<usize> = world
            .grid
            .rooms()
            .iter()
            .enumerate()
            .filter(|(_, room)| Some(room.id()) != player_room)
            .map(|(slot, _)| slot)
            .collect();
        debug!(rooms = slots.len(), "populating pickups for loaded level");
        scatter_pickups(world, &slots, &mut rng, out_events);
    }
}

fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Direction {
    Direction::CARDINALS
        .choose(rng)
        .copied()
        .unwrap_or(Direction::Down)
}

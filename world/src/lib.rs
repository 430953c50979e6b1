#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Chase.

mod cursor;
mod grid;
mod level;
mod movement;
mod registry;
mod timer;

use std::time::Duration;

use maze_chase_core::{
    Command, Direction, EnemyId, Event, KeyState, ObjectId, Point, Rect, RoomId, Settings, Side,
    Size, WELCOME_BANNER,
};
use tracing::{debug, trace, warn};

pub use cursor::RoomCursor;
pub use grid::RoomGraph;
pub use movement::MoveValidator;

use movement::destination;
use registry::{Enemy, Pickup, Player, Registry};
use timer::PeriodicTimer;

/// Represents the authoritative Maze Chase world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    settings: Settings,
    validator: MoveValidator,
    grid: RoomGraph,
    registry: Registry,
    last_dt: Duration,
}

impl World {
    /// Creates an empty world using default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Creates an empty world using the provided settings.
    #[must_use]
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            banner: WELCOME_BANNER,
            validator: MoveValidator::new(settings.movement.ignore_restrictions),
            settings,
            grid: RoomGraph::default(),
            registry: Registry::new(),
            last_dt: Duration::ZERO,
        }
    }

    fn reload(&mut self, settings: Settings) {
        self.validator = MoveValidator::new(settings.movement.ignore_restrictions);
        let enemy_rate = settings.enemy_move_rate();
        for enemy in self.registry.enemies_mut() {
            enemy.timer.set_frequency(enemy_rate);
        }
        if let Some(player) = self.registry.player_mut() {
            player.timer.set_frequency(settings.player_move_rate());
        }
        self.settings = settings;
    }

    fn install_grid(&mut self, grid: RoomGraph, out_events: &mut Vec<Event>) {
        self.registry.clear();
        for room in grid.rooms() {
            self.registry.add_room(room.id());
        }
        debug!(
            columns = grid.columns(),
            rows = grid.rows(),
            "installed room grid"
        );
        out_events.push(Event::LevelLoaded {
            columns: grid.columns(),
            rows: grid.rows(),
        });
        self.grid = grid;
    }

    fn spawn_player(&mut self, position: Point, size: Size, out_events: &mut Vec<Event>) {
        let mut cursor = RoomCursor::new();
        let bounds = Rect::from_origin(position, size);
        let _ = cursor.track(
            self.grid.view(),
            &bounds.hotspot(self.settings.player.hotspot_size),
            self.settings.room.inner_bounds_offset,
        );

        self.registry.set_player(Player {
            position,
            size,
            facing: Direction::None,
            cursor,
            timer: PeriodicTimer::new(self.settings.player_move_rate()),
            keys: Default::default(),
            health: self.settings.player.health,
            points: 0,
        });
        out_events.push(Event::PlayerSpawned {
            room: cursor.room(),
        });
    }

    fn spawn_enemy(
        &mut self,
        name: Option<String>,
        position: Point,
        size: Size,
        facing: Direction,
        out_events: &mut Vec<Event>,
    ) -> EnemyId {
        let id = self.registry.allocate_enemy_id();
        let behavior = self.settings.enemy.behavior;
        let mut cursor = RoomCursor::new();
        let bounds = Rect::from_origin(position, size);
        let _ = cursor.track(
            self.grid.view(),
            &bounds.hotspot(self.settings.enemy.hotspot_size),
            self.settings.room.inner_bounds_offset,
        );

        let _ = self.registry.add_enemy(Enemy {
            id,
            name: name.unwrap_or_else(|| format!("enemy-{}", id.get())),
            position,
            size,
            facing,
            cursor,
            timer: PeriodicTimer::new(self.settings.enemy_move_rate()),
            behavior,
        });
        out_events.push(Event::EnemySpawned {
            enemy: id,
            room: cursor.room(),
            behavior,
        });
        id
    }

    fn spawn_pickup(
        &mut self,
        name: Option<String>,
        position: Point,
        size: Size,
        out_events: &mut Vec<Event>,
    ) {
        let center = Rect::from_origin(position, size).center();
        let Some(room) = self
            .grid
            .rooms()
            .iter()
            .find(|room| room.bounds().contains(center))
            .map(|room| room.id())
        else {
            warn!(x = position.x(), y = position.y(), "pickup placed outside every room");
            return;
        };

        let id = self.registry.allocate_pickup_id();
        let _ = self.registry.add_pickup(Pickup {
            id,
            name: name.unwrap_or_else(|| format!("pickup-{}", id.get())),
            position,
            size,
            room,
        });
        out_events.push(Event::PickupSpawned { pickup: id, room });
    }

    fn enemy_step_pixels(&self) -> i32 {
        let enemy = &self.settings.enemy;
        if !enemy.move_at_speed {
            return enemy.pixels_per_step;
        }
        let millis = i64::try_from(self.last_dt.as_millis()).unwrap_or(i64::MAX);
        let pixels = i64::from(enemy.speed).saturating_mul(millis) / 1000;
        i32::try_from(pixels).unwrap_or(i32::MAX).max(1)
    }

    fn step_enemy(&mut self, id: EnemyId, out_events: &mut Vec<Event>) {
        if self.registry.is_won() {
            return;
        }

        let pixels = self.enemy_step_pixels();
        let hotspot_size = self.settings.enemy.hotspot_size;
        let inset = self.settings.room.inner_bounds_offset;
        let rooms = self.grid.view();
        let Some(enemy) = self.registry.enemy_mut(id) else {
            return;
        };

        let direction = enemy.facing;
        if direction == Direction::None {
            return;
        }
        if enemy.timer.is_ready() {
            enemy.timer.reset();
        }

        if !self
            .validator
            .can_move(direction, &enemy.cursor, &enemy.bounds(), rooms)
        {
            trace!(enemy = id.get(), ?direction, "enemy step blocked");
            out_events.push(Event::EnemyMoveBlocked {
                enemy: id,
                direction,
            });
            return;
        }

        let from = enemy.position;
        enemy.position = destination(from, direction, pixels);
        trace!(enemy = id.get(), ?direction, "enemy stepped");
        out_events.push(Event::EnemyMoved {
            enemy: id,
            direction,
            from,
            to: enemy.position,
        });

        let hotspot = enemy.bounds().hotspot(hotspot_size);
        if let Some(room) = enemy.cursor.track(rooms, &hotspot, inset) {
            out_events.push(Event::RoomEntered {
                object: ObjectId::Enemy(id),
                room,
            });
        }
    }

    fn step_player(&mut self, out_events: &mut Vec<Event>) {
        if self.registry.is_won() {
            return;
        }

        let pixels = self.settings.player.pixels_to_move;
        let hotspot_size = self.settings.player.hotspot_size;
        let inset = self.settings.room.inner_bounds_offset;
        let track = self.settings.room.track_player;
        let rooms = self.grid.view();
        let Some(player) = self.registry.player_mut() else {
            return;
        };
        if player.timer.is_ready() {
            player.timer.reset();
        }

        let bounds = player.bounds();
        let held: Vec<Direction> = player.keys.pressed().collect();
        let mut accepted = Vec::with_capacity(held.len());
        for direction in held {
            if self
                .validator
                .can_move(direction, &player.cursor, &bounds, rooms)
            {
                accepted.push(direction);
            } else {
                out_events.push(Event::PlayerMoveBlocked { direction });
            }
        }

        let from = player.position;
        for direction in accepted {
            player.position = destination(player.position, direction, pixels);
            player.facing = direction;
        }
        if player.position == from {
            return;
        }

        out_events.push(Event::PlayerMoved {
            from,
            to: player.position,
        });
        if !track {
            return;
        }
        let hotspot = player.bounds().hotspot(hotspot_size);
        if let Some(room) = player.cursor.track(rooms, &hotspot, inset) {
            out_events.push(Event::RoomEntered {
                object: ObjectId::Player,
                room,
            });
        }
    }

    fn remove_walls(&mut self, room: RoomId, side: Side, out_events: &mut Vec<Event>) {
        for (room, side) in self.grid.remove_wall_pair(room, side) {
            out_events.push(Event::WallRemoved { room, side });
        }
    }

    fn finish_removal(&mut self, object: ObjectId, out_events: &mut Vec<Event>) {
        out_events.push(Event::ObjectRemoved { object });
        if self.registry.settle_win() {
            debug!("every pickup collected");
            out_events.push(Event::GameWon);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ReloadSettings { settings } => {
            world.reload(settings);
            out_events.push(Event::SettingsReloaded);
        }
        Command::GenerateLevel { seed } => level::generate(world, seed, out_events),
        Command::LoadLevel {
            level,
            sprites,
            seed,
        } => level::load(world, &level, &sprites, seed, out_events),
        Command::Clear => {
            world.registry.clear();
            world.grid = RoomGraph::default();
            out_events.push(Event::WorldCleared);
        }
        Command::Tick { dt } => {
            world.last_dt = dt;
            out_events.push(Event::TimeAdvanced { dt });
            if world.registry.is_won() {
                return;
            }
            for enemy in world.registry.enemies_mut() {
                enemy.timer.advance(dt);
            }
            if let Some(player) = world.registry.player_mut() {
                player.timer.advance(dt);
            }
        }
        Command::SpawnPlayer { position, size } => {
            world.spawn_player(position, size, out_events);
        }
        Command::SpawnEnemy {
            position,
            size,
            facing,
        } => {
            if facing == Direction::None {
                warn!(
                    x = position.x(),
                    y = position.y(),
                    "enemy must face a cardinal direction"
                );
                return;
            }
            let _ = world.spawn_enemy(None, position, size, facing, out_events);
        }
        Command::SpawnPickup { position, size } => {
            world.spawn_pickup(None, position, size, out_events);
        }
        Command::SetEnemyFacing { enemy, direction } => {
            if world.registry.is_won() || direction == Direction::None {
                return;
            }
            let Some(state) = world.registry.enemy_mut(enemy) else {
                return;
            };
            if state.facing != direction {
                state.facing = direction;
                out_events.push(Event::EnemyFacingChanged { enemy, direction });
            }
        }
        Command::StepEnemy { enemy } => world.step_enemy(enemy, out_events),
        Command::SetDirectionKey { direction, state } => {
            if world.registry.is_won() {
                return;
            }
            if let Some(player) = world.registry.player_mut() {
                player.keys.set(direction, state);
                if state == KeyState::Pressed && direction != Direction::None {
                    player.facing = direction;
                }
            }
        }
        Command::StepPlayer => world.step_player(out_events),
        Command::RemoveWall { room, side } => world.remove_walls(room, side, out_events),
        Command::RemoveFacingWall => {
            let Some(player) = world.registry.player() else {
                return;
            };
            let (Some(room), Some(side)) = (player.cursor.room(), player.facing.side()) else {
                return;
            };
            world.remove_walls(room, side, out_events);
        }
        Command::ResolveEnemyCollision { enemy } => {
            if world.registry.remove_enemy(enemy).is_none() {
                return;
            }
            debug!(enemy = enemy.get(), "player collided with enemy");
            out_events.push(Event::PlayerCollidedWithEnemy { enemy });
            world.finish_removal(ObjectId::Enemy(enemy), out_events);
        }
        Command::ResolvePickupCollision { pickup } => {
            if world.registry.remove_pickup(pickup).is_none() {
                return;
            }
            if let Some(player) = world.registry.player_mut() {
                player.points = player.points.saturating_add(1);
            }
            debug!(pickup = pickup.get(), "pickup fetched");
            out_events.push(Event::PickupFetched { pickup });
            out_events.push(Event::PlayerCollidedWithPickup { pickup });
            world.finish_removal(ObjectId::Pickup(pickup), out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use maze_chase_core::{
        Direction, EnemyId, EnemySnapshot, EnemyView, ObjectId, PickupSnapshot, PickupView,
        PlayerSnapshot, Room, RoomsView, Settings,
    };

    use super::{MoveValidator, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the active settings.
    #[must_use]
    pub fn settings(world: &World) -> &Settings {
        &world.settings
    }

    /// Exposes a read-only view of the rooms of the current level.
    #[must_use]
    pub fn rooms(world: &World) -> RoomsView<'_> {
        world.grid.view()
    }

    /// Looks up a room by one-based row and column, as level authors count them.
    #[must_use]
    pub fn room_at(world: &World, row: u32, column: u32) -> Option<&Room> {
        let row = row.checked_sub(1)?;
        let column = column.checked_sub(1)?;
        world.grid.view().room_at(row, column)
    }

    /// Validator applied to every step.
    #[must_use]
    pub fn move_validator(world: &World) -> MoveValidator {
        world.validator
    }

    /// Captures a read-only view of the enemies roaming the maze.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let hotspot_size = world.settings.enemy.hotspot_size;
        let snapshots = world
            .registry
            .enemies()
            .map(|enemy| {
                let bounds = enemy.bounds();
                EnemySnapshot {
                    id: enemy.id,
                    name: enemy.name.clone(),
                    bounds,
                    hotspot: bounds.hotspot(hotspot_size),
                    facing: enemy.facing,
                    room: enemy.cursor.room(),
                    ready_for_step: enemy.timer.is_ready(),
                    behavior: enemy.behavior,
                }
            })
            .collect();
        EnemyView::from_snapshots(snapshots)
    }

    /// Captures the player's state, if a player exists.
    #[must_use]
    pub fn player(world: &World) -> Option<PlayerSnapshot> {
        let player = world.registry.player()?;
        let bounds = player.bounds();
        Some(PlayerSnapshot {
            bounds,
            hotspot: bounds.hotspot(world.settings.player.hotspot_size),
            facing: player.facing,
            room: player.cursor.room(),
            ready_for_step: player.timer.is_ready(),
            keys: player.keys,
            health: player.health,
            points: player.points,
        })
    }

    /// Captures a read-only view of the pickups left to collect.
    #[must_use]
    pub fn pickup_view(world: &World) -> PickupView {
        let snapshots = world
            .registry
            .pickups()
            .map(|pickup| PickupSnapshot {
                id: pickup.id,
                name: pickup.name.clone(),
                bounds: pickup.bounds(),
                room: pickup.room,
            })
            .collect();
        PickupView::from_snapshots(snapshots)
    }

    /// Every registered object in registration order.
    #[must_use]
    pub fn objects(world: &World) -> &[ObjectId] {
        world.registry.objects()
    }

    /// Number of pickups left to collect.
    #[must_use]
    pub fn pickup_count(world: &World) -> usize {
        world.registry.pickup_count()
    }

    /// Reports whether every pickup was collected.
    #[must_use]
    pub fn is_game_won(world: &World) -> bool {
        world.registry.is_won()
    }

    /// Reports whether the enemy could step toward `direction` right now.
    #[must_use]
    pub fn can_enemy_move(world: &World, enemy: EnemyId, direction: Direction) -> bool {
        world.registry.enemy(enemy).is_some_and(|enemy| {
            world
                .validator
                .can_move(direction, &enemy.cursor, &enemy.bounds(), world.grid.view())
        })
    }

    /// Reports whether the player could step toward `direction` right now.
    #[must_use]
    pub fn can_player_move(world: &World, direction: Direction) -> bool {
        world.registry.player().is_some_and(|player| {
            world
                .validator
                .can_move(direction, &player.cursor, &player.bounds(), world.grid.view())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use maze_chase_core::{Command, Direction, Event, Point, Settings, Size, WallPolicy};

    use super::{apply, query, World};

    fn open_world() -> World {
        let mut settings = Settings::default();
        settings.grid.walls = WallPolicy::RemoveAll;
        settings.population.enemies = 0;
        settings.population.pickups = 0;
        World::with_settings(settings)
    }

    #[test]
    fn tick_readies_enemy_timers() {
        let mut world = open_world();
        let mut events = Vec::new();
        apply(&mut world, Command::GenerateLevel { seed: 5 }, &mut events);
        apply(
            &mut world,
            Command::SpawnEnemy {
                position: Point::new(30, 20),
                size: Size::new(20, 20),
                facing: Direction::Right,
            },
            &mut events,
        );

        let enemy = query::enemy_view(&world).into_vec().remove(0);
        assert!(!enemy.ready_for_step);

        events.clear();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(50),
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::TimeAdvanced {
                dt: Duration::from_millis(50)
            }]
        );
        assert!(query::enemy_view(&world).into_vec()[0].ready_for_step);
    }

    #[test]
    fn idle_enemies_do_not_step() {
        let mut world = open_world();
        let mut events = Vec::new();
        apply(&mut world, Command::GenerateLevel { seed: 5 }, &mut events);
        apply(
            &mut world,
            Command::SpawnEnemy {
                position: Point::new(30, 20),
                size: Size::new(20, 20),
                facing: Direction::None,
            },
            &mut events,
        );
        let id = query::enemy_view(&world).into_vec()[0].id;

        events.clear();
        apply(&mut world, Command::StepEnemy { enemy: id }, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn room_lookup_is_one_based() {
        let mut world = open_world();
        let mut events = Vec::new();
        apply(&mut world, Command::GenerateLevel { seed: 1 }, &mut events);

        let room = query::room_at(&world, 2, 3).expect("room at row 2 column 3");
        assert_eq!(room.id().get(), 12);
        assert!(query::room_at(&world, 0, 1).is_none());
        assert!(query::room_at(&world, 11, 1).is_none());
    }
}

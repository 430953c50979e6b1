//! Headless driver wiring the world to the pure systems.

use maze_chase_core::{Command, Event, ObjectId, Settings};
use maze_chase_system_behavior::EnemyBehavior;
use maze_chase_system_collision::Collision;
use maze_chase_system_player::PlayerControl;
use maze_chase_world::{apply, query, World};

/// Owns the world and its systems and settles every command submitted.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    player_control: PlayerControl,
    behavior: EnemyBehavior,
    collision: Collision,
}

impl Simulation {
    pub(crate) fn new(settings: Settings) -> Self {
        Self {
            world: World::with_settings(settings),
            player_control: PlayerControl::new(),
            behavior: EnemyBehavior::new(),
            collision: Collision::new(),
        }
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn behavior(&self) -> &EnemyBehavior {
        &self.behavior
    }

    /// Applies `command` and pumps the systems until no command is left.
    ///
    /// Each round runs player control, then enemy behavior, lets the world
    /// apply their commands, and finally runs the collision pass over every
    /// event it has not seen yet. Returns every event raised, in order.
    pub(crate) fn submit(&mut self, command: Command) -> Vec<Event> {
        let mut pending = Vec::new();
        apply(&mut self.world, command, &mut pending);
        let mut unseen_by_collision = pending.clone();
        let mut log = Vec::new();

        while !pending.is_empty() {
            let player = query::player(&self.world);
            let mut commands = Vec::new();
            self.player_control
                .handle(&pending, player.as_ref(), &mut commands);
            self.behavior.handle(
                &pending,
                &query::enemy_view(&self.world),
                player.as_ref(),
                query::rooms(&self.world),
                &mut commands,
            );

            let mut moved = Vec::new();
            for command in commands {
                apply(&mut self.world, command, &mut moved);
            }
            unseen_by_collision.extend(moved.iter().cloned());

            let mut resolutions = Vec::new();
            self.collision.handle(
                &unseen_by_collision,
                query::player(&self.world).as_ref(),
                &query::enemy_view(&self.world),
                &query::pickup_view(&self.world),
                &mut resolutions,
            );
            let mut resolved = Vec::new();
            for command in resolutions {
                apply(&mut self.world, command, &mut resolved);
            }
            unseen_by_collision.clone_from(&resolved);

            log.append(&mut pending);
            pending = moved;
            pending.append(&mut resolved);
        }

        log
    }
}

/// Running totals reported when the simulation ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) ticks: u32,
    pub(crate) enemy_steps: u32,
    pub(crate) walls_hit: u32,
    pub(crate) player_steps: u32,
    pub(crate) pickups_collected: u32,
    pub(crate) enemies_caught: u32,
    pub(crate) won_at: Option<u32>,
}

impl Summary {
    pub(crate) fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TimeAdvanced { .. } => self.ticks += 1,
                Event::EnemyMoved { .. } => self.enemy_steps += 1,
                Event::EnemyMoveBlocked { .. } => self.walls_hit += 1,
                Event::PlayerMoved { .. } => self.player_steps += 1,
                Event::ObjectRemoved {
                    object: ObjectId::Pickup(_),
                } => self.pickups_collected += 1,
                Event::ObjectRemoved {
                    object: ObjectId::Enemy(_),
                } => self.enemies_caught += 1,
                Event::GameWon => self.won_at = Some(self.ticks),
                _ => {}
            }
        }
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that steers enemies through the maze.
//!
//! Each enemy gets a controller the first time it is seen, either the state
//! machine or the behavior tree depending on the enemy's configured mode.
//! Controllers only run when time advances, and learn how their previous step
//! went from the world's move events.

mod agent;
mod fsm;
pub mod tree;

use std::{collections::BTreeMap, fmt};

use maze_chase_core::{
    BehaviorMode, Command, EnemyId, EnemyView, Event, ObjectId, PlayerSnapshot, RoomsView,
};
use maze_chase_system_sight::{look_for_player, Sighting};
use tracing::trace;

use agent::{Agent, MoveOutcome};
use tree::Behavior;

pub use fsm::State;

/// Controller currently driving an enemy, as shown to presentation layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    /// State machine in the contained state.
    Machine(State),
    /// Behavior tree.
    Tree,
}

impl ControllerState {
    /// Single-letter tag for presentation layers.
    #[must_use]
    pub const fn label(self) -> char {
        match self {
            Self::Machine(state) => state.label(),
            Self::Tree => 'T',
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Brain {
    controller: ControllerState,
    last_move: MoveOutcome,
}

impl Brain {
    fn new(mode: BehaviorMode) -> Self {
        let controller = match mode {
            BehaviorMode::StateMachine => ControllerState::Machine(State::default()),
            BehaviorMode::BehaviorTree => ControllerState::Tree,
        };
        Self {
            controller,
            last_move: MoveOutcome::Pending,
        }
    }
}

/// Enemy behavior system keeping one controller memory per enemy.
pub struct EnemyBehavior {
    brains: BTreeMap<EnemyId, Brain>,
    tree: Box<dyn Behavior<Agent>>,
    game_won: bool,
}

impl fmt::Debug for EnemyBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnemyBehavior")
            .field("brains", &self.brains)
            .field("game_won", &self.game_won)
            .finish_non_exhaustive()
    }
}

impl Default for EnemyBehavior {
    fn default() -> Self {
        Self {
            brains: BTreeMap::new(),
            tree: tree::enemy_tree(),
            game_won: false,
        }
    }
}

impl EnemyBehavior {
    /// Creates a behavior system with no controllers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events and emits facing and step commands.
    ///
    /// Decisions are only taken when the batch contains
    /// [`Event::TimeAdvanced`] and the game has not been won. The sighting of
    /// every enemy is computed once, before its controller runs.
    pub fn handle(
        &mut self,
        events: &[Event],
        enemies: &EnemyView,
        player: Option<&PlayerSnapshot>,
        rooms: RoomsView<'_>,
        out: &mut Vec<Command>,
    ) {
        let mut time_advanced = false;
        for event in events {
            match event {
                Event::TimeAdvanced { .. } => time_advanced = true,
                Event::EnemyMoved {
                    enemy, direction, ..
                } => self.record(*enemy, MoveOutcome::Moved(*direction)),
                Event::EnemyMoveBlocked { enemy, .. } => {
                    self.record(*enemy, MoveOutcome::Blocked);
                }
                Event::ObjectRemoved {
                    object: ObjectId::Enemy(enemy),
                } => {
                    let _ = self.brains.remove(enemy);
                }
                Event::GameWon => self.game_won = true,
                Event::PickupSpawned { .. } => self.game_won = false,
                Event::LevelLoaded { .. } | Event::WorldCleared => {
                    self.brains.clear();
                    self.game_won = false;
                }
                _ => {}
            }
        }

        if !time_advanced || self.game_won {
            return;
        }

        for enemy in enemies.iter() {
            let brain = self
                .brains
                .entry(enemy.id)
                .or_insert_with(|| Brain::new(enemy.behavior));
            let sighting = player.map_or(Sighting::Unplaced, |player| {
                look_for_player(rooms, enemy, player)
            });

            let mut agent = Agent::new(enemy, brain.last_move, sighting);
            match &mut brain.controller {
                ControllerState::Machine(state) => fsm::run(state, &mut agent),
                ControllerState::Tree => {
                    let _ = self.tree.tick(&mut agent);
                }
            }
            brain.last_move = agent.last_move;
            if !agent.commands.is_empty() {
                trace!(
                    enemy = enemy.id.get(),
                    commands = agent.commands.len(),
                    ?sighting,
                    "enemy decided"
                );
            }
            out.append(&mut agent.commands);
        }
    }

    /// Controller state of the enemy, once it has been driven at least once.
    #[must_use]
    pub fn controller_state(&self, enemy: EnemyId) -> Option<ControllerState> {
        self.brains.get(&enemy).map(|brain| brain.controller)
    }

    fn record(&mut self, enemy: EnemyId, outcome: MoveOutcome) {
        if let Some(brain) = self.brains.get_mut(&enemy) {
            brain.last_move = outcome;
        }
    }
}

//! Per-enemy blackboard handed to the controllers.

use maze_chase_core::{Command, Direction, EnemyId, EnemySnapshot};
use maze_chase_system_sight::Sighting;

/// Outcome of the most recent step the world reported for an enemy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum MoveOutcome {
    /// No step resolved since the enemy was created or last reversed.
    #[default]
    Pending,
    /// The enemy stepped toward the direction.
    Moved(Direction),
    /// The validator rejected the step.
    Blocked,
}

/// Everything a controller reads or writes while deciding for one enemy.
///
/// Decisions are recorded as commands; the local `facing` mirrors the
/// facing those commands will establish.
#[derive(Debug)]
pub(crate) struct Agent {
    pub(crate) enemy: EnemyId,
    pub(crate) facing: Direction,
    pub(crate) ready: bool,
    pub(crate) last_move: MoveOutcome,
    pub(crate) sighting: Sighting,
    pub(crate) commands: Vec<Command>,
}

impl Agent {
    pub(crate) fn new(snapshot: &EnemySnapshot, last_move: MoveOutcome, sighting: Sighting) -> Self {
        Self {
            enemy: snapshot.id,
            facing: snapshot.facing,
            ready: snapshot.ready_for_step,
            last_move,
            sighting,
            commands: Vec::new(),
        }
    }

    fn face(&mut self, direction: Direction) {
        if direction == self.facing {
            return;
        }
        self.facing = direction;
        self.commands.push(Command::SetEnemyFacing {
            enemy: self.enemy,
            direction,
        });
    }

    /// Turns toward the player when they are in sight.
    pub(crate) fn look_for_player(&mut self) -> bool {
        let Some(direction) = self.sighting.direction() else {
            return false;
        };
        self.face(direction);
        true
    }

    /// Reverses the facing and forgets the outcome that triggered it.
    pub(crate) fn invert_facing(&mut self) {
        self.face(self.facing.inverse());
        self.last_move = MoveOutcome::Pending;
    }

    pub(crate) fn step(&mut self) {
        self.commands.push(Command::StepEnemy { enemy: self.enemy });
    }

    pub(crate) fn step_if_ready(&mut self) -> bool {
        if !self.ready {
            return false;
        }
        self.step();
        true
    }

    pub(crate) const fn moved(&self) -> bool {
        matches!(self.last_move, MoveOutcome::Moved(_))
    }

    pub(crate) fn blocked(&self) -> bool {
        self.last_move == MoveOutcome::Blocked
    }
}

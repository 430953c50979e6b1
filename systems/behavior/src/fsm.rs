//! Table-driven finite state machine controller.

use maze_chase_core::Direction;
use tracing::trace;

use crate::agent::Agent;

/// States of the enemy state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum State {
    /// Walking up.
    Up,
    /// Walking down.
    #[default]
    Down,
    /// Walking left.
    Left,
    /// Walking right.
    Right,
    /// The last step ran into a wall.
    HitWall,
}

impl State {
    /// Single-letter tag for presentation layers.
    #[must_use]
    pub const fn label(self) -> char {
        match self {
            Self::Up => 'U',
            Self::Down => 'D',
            Self::Left => 'L',
            Self::Right => 'R',
            Self::HitWall => 'H',
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Trigger {
    /// The last step succeeded and the enemy now faces the direction.
    Moved(Direction),
    /// The last step was rejected.
    Blocked,
}

impl Trigger {
    fn fires(self, agent: &Agent) -> bool {
        match self {
            Self::Moved(direction) => agent.moved() && agent.facing == direction,
            Self::Blocked => agent.blocked(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Transition {
    trigger: Trigger,
    target: State,
}

const fn moved(direction: Direction, target: State) -> Transition {
    Transition {
        trigger: Trigger::Moved(direction),
        target,
    }
}

const HIT_WALL: Transition = Transition {
    trigger: Trigger::Blocked,
    target: State::HitWall,
};

const TO_UP: Transition = moved(Direction::Up, State::Up);
const TO_DOWN: Transition = moved(Direction::Down, State::Down);
const TO_LEFT: Transition = moved(Direction::Left, State::Left);
const TO_RIGHT: Transition = moved(Direction::Right, State::Right);

const FROM_UP: [Transition; 4] = [TO_DOWN, TO_LEFT, TO_RIGHT, HIT_WALL];
const FROM_DOWN: [Transition; 4] = [TO_UP, TO_LEFT, TO_RIGHT, HIT_WALL];
const FROM_LEFT: [Transition; 4] = [TO_UP, TO_DOWN, TO_RIGHT, HIT_WALL];
const FROM_RIGHT: [Transition; 4] = [TO_UP, TO_DOWN, TO_LEFT, HIT_WALL];
const FROM_HIT_WALL: [Transition; 4] = [TO_UP, TO_DOWN, TO_LEFT, TO_RIGHT];

const fn transitions(state: State) -> &'static [Transition] {
    match state {
        State::Up => &FROM_UP,
        State::Down => &FROM_DOWN,
        State::Left => &FROM_LEFT,
        State::Right => &FROM_RIGHT,
        State::HitWall => &FROM_HIT_WALL,
    }
}

/// Takes the first transition that fires, then runs the resulting state's
/// action.
pub(crate) fn run(state: &mut State, agent: &mut Agent) {
    if let Some(next) = transitions(*state)
        .iter()
        .find(|transition| transition.trigger.fires(agent))
        .map(|transition| transition.target)
    {
        let previous = *state;
        trace!(enemy = agent.enemy.get(), from = ?previous, to = ?next, "state transition");
        *state = next;
    }

    match *state {
        State::HitWall => {
            agent.invert_facing();
            agent.step();
        }
        State::Up | State::Down | State::Left | State::Right => {
            let _ = agent.look_for_player();
            let _ = agent.step_if_ready();
        }
    }
}

#[cfg(test)]
mod tests {
    use maze_chase_core::{
        BehaviorMode, Command, Direction, EnemyId, EnemySnapshot, Rect, RoomId,
    };
    use maze_chase_system_sight::Sighting;

    use super::{run, State};
    use crate::agent::{Agent, MoveOutcome};

    fn agent(facing: Direction, ready: bool, last_move: MoveOutcome, sighting: Sighting) -> Agent {
        let snapshot = EnemySnapshot {
            id: EnemyId::new(1),
            name: "enemy-1".to_owned(),
            bounds: Rect::new(0, 0, 20, 20),
            hotspot: Rect::new(5, 5, 10, 10),
            facing,
            room: Some(RoomId::new(0)),
            ready_for_step: ready,
            behavior: BehaviorMode::StateMachine,
        };
        Agent::new(&snapshot, last_move, sighting)
    }

    const STEP: Command = Command::StepEnemy {
        enemy: EnemyId::new(1),
    };

    #[test]
    fn pending_outcome_keeps_the_initial_state() {
        let mut state = State::default();
        let mut agent = agent(Direction::Right, true, MoveOutcome::Pending, Sighting::Hidden);
        run(&mut state, &mut agent);
        assert_eq!(state, State::Down);
        assert_eq!(agent.commands, vec![STEP]);
    }

    #[test]
    fn successful_move_follows_the_facing() {
        let mut state = State::Down;
        let mut agent = agent(
            Direction::Left,
            false,
            MoveOutcome::Moved(Direction::Left),
            Sighting::Hidden,
        );
        run(&mut state, &mut agent);
        assert_eq!(state, State::Left);
        assert!(agent.commands.is_empty());
    }

    #[test]
    fn blocked_move_reverses_and_steps_at_once() {
        let mut state = State::Up;
        let mut agent = agent(Direction::Up, false, MoveOutcome::Blocked, Sighting::Hidden);
        run(&mut state, &mut agent);
        assert_eq!(state, State::HitWall);
        assert_eq!(
            agent.commands,
            vec![
                Command::SetEnemyFacing {
                    enemy: EnemyId::new(1),
                    direction: Direction::Down,
                },
                STEP,
            ]
        );
    }

    #[test]
    fn hit_wall_recovers_on_the_next_successful_move() {
        let mut state = State::HitWall;
        let mut agent = agent(
            Direction::Down,
            false,
            MoveOutcome::Moved(Direction::Down),
            Sighting::Hidden,
        );
        run(&mut state, &mut agent);
        assert_eq!(state, State::Down);
    }

    #[test]
    fn directional_states_turn_toward_a_spotted_player() {
        let mut state = State::Right;
        let mut agent = agent(
            Direction::Right,
            true,
            MoveOutcome::Moved(Direction::Right),
            Sighting::Spotted(Direction::Up),
        );
        run(&mut state, &mut agent);
        assert_eq!(state, State::Right);
        assert_eq!(
            agent.commands,
            vec![
                Command::SetEnemyFacing {
                    enemy: EnemyId::new(1),
                    direction: Direction::Up,
                },
                STEP,
            ]
        );
    }

    #[test]
    fn labels_are_initials() {
        let labels: String = [State::Up, State::Down, State::Left, State::Right, State::HitWall]
            .into_iter()
            .map(State::label)
            .collect();
        assert_eq!(labels, "UDLRH");
    }
}

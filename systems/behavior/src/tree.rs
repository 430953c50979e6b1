//! Minimal behavior tree used as the alternative enemy controller.
//!
//! Nodes never run across ticks: every evaluation completes immediately with
//! [`Status::Success`] or [`Status::Failure`].

use crate::agent::Agent;

/// Result of evaluating a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// The node achieved its goal.
    Success,
    /// The node could not achieve its goal.
    Failure,
}

/// A behavior tree node evaluated against a context `C`.
pub trait Behavior<C>: Send + Sync {
    /// Evaluates the node, reading and writing the context.
    fn tick(&self, ctx: &mut C) -> Status;
}

impl<C> Behavior<C> for Box<dyn Behavior<C>> {
    fn tick(&self, ctx: &mut C) -> Status {
        (**self).tick(ctx)
    }
}

/// Runs children left to right until one fails.
pub struct Sequence<C> {
    children: Vec<Box<dyn Behavior<C>>>,
}

impl<C> Sequence<C> {
    /// Creates a sequence over `children`.
    #[must_use]
    pub fn new(children: Vec<Box<dyn Behavior<C>>>) -> Self {
        Self { children }
    }
}

impl<C> Behavior<C> for Sequence<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        for child in &self.children {
            if child.tick(ctx) == Status::Failure {
                return Status::Failure;
            }
        }
        Status::Success
    }
}

/// Evaluates its child and reports success whatever the child returned.
pub struct AlwaysSucceed<C> {
    child: Box<dyn Behavior<C>>,
}

impl<C> AlwaysSucceed<C> {
    /// Wraps `child`.
    #[must_use]
    pub fn new(child: Box<dyn Behavior<C>>) -> Self {
        Self { child }
    }
}

impl<C> Behavior<C> for AlwaysSucceed<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        let _ = self.child.tick(ctx);
        Status::Success
    }
}

/// Shorthand for a boxed [`Sequence`].
#[must_use]
pub fn sequence<C: 'static>(children: Vec<Box<dyn Behavior<C>>>) -> Box<dyn Behavior<C>> {
    Box::new(Sequence::new(children))
}

/// Shorthand for a boxed [`AlwaysSucceed`].
#[must_use]
pub fn always_succeed<C: 'static>(child: Box<dyn Behavior<C>>) -> Box<dyn Behavior<C>> {
    Box::new(AlwaysSucceed::new(child))
}

struct LastMoveBlocked;

impl Behavior<Agent> for LastMoveBlocked {
    fn tick(&self, agent: &mut Agent) -> Status {
        if agent.blocked() {
            Status::Success
        } else {
            Status::Failure
        }
    }
}

struct InvertFacing;

impl Behavior<Agent> for InvertFacing {
    fn tick(&self, agent: &mut Agent) -> Status {
        agent.invert_facing();
        Status::Success
    }
}

struct MoveIfReady;

impl Behavior<Agent> for MoveIfReady {
    fn tick(&self, agent: &mut Agent) -> Status {
        if agent.step_if_ready() {
            Status::Success
        } else {
            Status::Failure
        }
    }
}

struct LookForPlayer;

impl Behavior<Agent> for LookForPlayer {
    fn tick(&self, agent: &mut Agent) -> Status {
        if agent.look_for_player() {
            Status::Success
        } else {
            Status::Failure
        }
    }
}

/// Reverse after a blocked step, move when the timer allows, then look.
pub(crate) fn enemy_tree() -> Box<dyn Behavior<Agent>> {
    sequence(vec![
        always_succeed(sequence(vec![
            Box::new(LastMoveBlocked),
            Box::new(InvertFacing),
        ])),
        always_succeed(Box::new(MoveIfReady)),
        Box::new(LookForPlayer),
    ])
}

//! Wall-aware validation of single steps.

use maze_chase_core::{Direction, Point, Rect, RoomsView};

use crate::RoomCursor;

/// Decides whether an entity may step from its current room.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveValidator {
    ignore_restrictions: bool,
}

impl MoveValidator {
    /// Creates a validator, optionally letting every move through.
    #[must_use]
    pub const fn new(ignore_restrictions: bool) -> Self {
        Self {
            ignore_restrictions,
        }
    }

    /// Reports whether walls are being ignored.
    #[must_use]
    pub const fn ignores_restrictions(&self) -> bool {
        self.ignore_restrictions
    }

    /// Reports whether an entity with `bounds` may step toward `direction`.
    ///
    /// The step is blocked when the wall on the current room's side, or the
    /// opposite wall of the room beyond it, crosses the entity's bounds. An
    /// entity without an established room never moves.
    #[must_use]
    pub fn can_move(
        &self,
        direction: Direction,
        cursor: &RoomCursor,
        bounds: &Rect,
        rooms: RoomsView<'_>,
    ) -> bool {
        let Some(side) = direction.side() else {
            return true;
        };

        if self.ignore_restrictions {
            return true;
        }

        let Some(current) = cursor.current(rooms) else {
            return false;
        };

        let blocked_ahead = cursor.neighbor(rooms, side).is_some_and(|target| {
            target.has_wall(side.opposite())
                && bounds.intersects_line(&target.wall_line(side.opposite()))
        });
        let blocked_here = current.has_wall(side) && bounds.intersects_line(&current.wall_line(side));

        !(blocked_ahead || blocked_here)
    }
}

/// Position reached by stepping `pixels` toward `direction`.
///
/// # Panics
///
/// Panics when `direction` is [`Direction::None`].
#[must_use]
pub(crate) fn destination(position: Point, direction: Direction, pixels: i32) -> Point {
    let (dx, dy) = direction.offset(pixels);
    position.translated(dx, dy)
}

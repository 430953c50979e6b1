#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Line-of-sight search used by enemies hunting the player.
//!
//! Enemies only see along the row or column they occupy. A search walks the
//! neighbor links room by room toward the player and stops at the first wall,
//! whether it stands on the departing room's side or on the arriving room's
//! opposite side.

use maze_chase_core::{Direction, EnemySnapshot, PlayerSnapshot, Rect, RoomId, RoomsView};

/// Result of an enemy looking for the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sighting {
    /// Either the enemy or the player has no established room.
    Unplaced,
    /// The two rooms share neither a row nor a column.
    OffAxis,
    /// The enemy already stands in the player's room.
    SameRoom,
    /// The rooms share an axis but the enemy is outside the player's band.
    Misaligned,
    /// The player is visible toward the contained direction.
    Spotted(Direction),
    /// Walls hide the player in both directions along the shared axis.
    Hidden,
}

impl Sighting {
    /// Direction toward the player, if they were spotted.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Spotted(direction) => Some(direction),
            _ => None,
        }
    }
}

/// Axis along which a search travels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Searching up and down a column.
    Vertical,
    /// Searching left and right along a row.
    Horizontal,
}

impl Axis {
    const fn directions(self) -> [Direction; 2] {
        match self {
            Self::Vertical => [Direction::Up, Direction::Down],
            Self::Horizontal => [Direction::Left, Direction::Right],
        }
    }
}

/// Looks for the player from the enemy's room.
///
/// Column searches try up before down and row searches try left before right.
/// The enemy must sit inside the player's band on the perpendicular axis,
/// meaning its hotspot center is no further than half the player's sprite
/// from the player's hotspot center.
#[must_use]
pub fn look_for_player(
    rooms: RoomsView<'_>,
    enemy: &EnemySnapshot,
    player: &PlayerSnapshot,
) -> Sighting {
    let (Some(from), Some(target)) = (enemy.room, player.room) else {
        return Sighting::Unplaced;
    };
    let (Some(from_row), Some(from_column), Some(target_row), Some(target_column)) = (
        rooms.row_of(from),
        rooms.column_of(from),
        rooms.row_of(target),
        rooms.column_of(target),
    ) else {
        return Sighting::Unplaced;
    };

    if from_row != target_row && from_column != target_column {
        return Sighting::OffAxis;
    }
    if from == target {
        return Sighting::SameRoom;
    }

    let axis = if from_column == target_column {
        Axis::Vertical
    } else {
        Axis::Horizontal
    };
    if !is_aligned(&enemy.hotspot, player, axis) {
        return Sighting::Misaligned;
    }

    axis.directions()
        .into_iter()
        .find(|direction| is_in_line_of_sight(rooms, from, target, *direction))
        .map_or(Sighting::Hidden, Sighting::Spotted)
}

/// Reports whether the hotspot lies inside the player's band for `axis`.
#[must_use]
pub fn is_aligned(hotspot: &Rect, player: &PlayerSnapshot, axis: Axis) -> bool {
    let own = hotspot.center();
    let target = player.hotspot.center();
    let (offset, half_extent) = match axis {
        Axis::Vertical => (
            i64::from(own.x()) - i64::from(target.x()),
            i64::from(player.bounds.width() / 2),
        ),
        Axis::Horizontal => (
            i64::from(own.y()) - i64::from(target.y()),
            i64::from(player.bounds.height() / 2),
        ),
    };
    offset.abs() <= half_extent
}

/// Walks from `from` toward `direction` and reports whether `target` is
/// reached before a wall or the grid edge.
#[must_use]
pub fn is_in_line_of_sight(
    rooms: RoomsView<'_>,
    from: RoomId,
    target: RoomId,
    direction: Direction,
) -> bool {
    let Some(side) = direction.side() else {
        return false;
    };
    let Some(mut current) = rooms.room(from) else {
        return false;
    };

    for _ in 0..rooms.len() {
        let Some(next) = rooms.neighbor(current.id(), side) else {
            return false;
        };
        if current.has_wall(side) || next.has_wall(side.opposite()) {
            return false;
        }
        if next.id() == target {
            return true;
        }
        current = next;
    }
    false
}

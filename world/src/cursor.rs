//! Per-entity record of the occupied room.

use maze_chase_core::{Rect, Room, RoomId, RoomsView, Side};

/// Tracks which room an entity occupies.
///
/// The cursor only changes when a membership test succeeds, so an entity that
/// straddles two rooms keeps its previous room until its hotspot lands inside
/// another room's inner bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoomCursor {
    room: Option<RoomId>,
}

impl RoomCursor {
    /// Creates a cursor that has not yet established a room.
    #[must_use]
    pub const fn new() -> Self {
        Self { room: None }
    }

    /// Creates a cursor pointing at the provided room.
    #[must_use]
    pub const fn at(room: RoomId) -> Self {
        Self { room: Some(room) }
    }

    /// Identifier of the recorded room, if established.
    #[must_use]
    pub const fn room(&self) -> Option<RoomId> {
        self.room
    }

    /// Resolves the recorded room within the provided view.
    #[must_use]
    pub fn current<'a>(&self, rooms: RoomsView<'a>) -> Option<&'a Room> {
        rooms.room(self.room?)
    }

    /// Resolves the room adjacent to the recorded room across `side`.
    #[must_use]
    pub fn neighbor<'a>(&self, rooms: RoomsView<'a>, side: Side) -> Option<&'a Room> {
        rooms.neighbor(self.room?, side)
    }

    /// Re-runs the membership test against every room.
    ///
    /// Rooms are tested in index order and the last room whose inner bounds
    /// overlap the hotspot wins. Returns the new room when the cursor changed.
    pub fn track(&mut self, rooms: RoomsView<'_>, hotspot: &Rect, inset: i32) -> Option<RoomId> {
        let found = rooms
            .iter()
            .filter(|room| room.inner_bounds(inset).overlaps(hotspot))
            .map(Room::id)
            .last()?;

        if self.room == Some(found) {
            return None;
        }
        self.room = Some(found);
        Some(found)
    }
}

//! Room nodes and read-only access to the room graph.

use serde::{Deserialize, Serialize};

use crate::{Line, Point, Rect, RoomId, Side, Size};

/// Grid dimensions together with the pixel area the rooms are laid over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridLayout {
    /// Number of room rows.
    pub rows: u32,
    /// Number of room columns.
    pub columns: u32,
    /// Width of the area covered by the grid in pixels.
    pub width: i32,
    /// Height of the area covered by the grid in pixels.
    pub height: i32,
}

impl GridLayout {
    /// Total number of rooms described by the layout.
    #[must_use]
    pub const fn room_count(&self) -> u32 {
        self.rows.saturating_mul(self.columns)
    }

    /// Pixel dimensions of a single room. Non-divisible areas truncate.
    #[must_use]
    pub fn cell_size(&self) -> Size {
        let columns = i32::try_from(self.columns).unwrap_or(i32::MAX).max(1);
        let rows = i32::try_from(self.rows).unwrap_or(i32::MAX).max(1);
        Size::new(self.width / columns, self.height / rows)
    }
}

/// Single grid cell bounded by up to four walls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Room {
    id: RoomId,
    bounds: Rect,
    walls: [bool; 4],
    neighbors: [Option<RoomId>; 4],
}

impl Room {
    /// Creates a room with all four walls standing and no neighbors.
    #[must_use]
    pub const fn new(id: RoomId, bounds: Rect) -> Self {
        Self {
            id,
            bounds,
            walls: [true; 4],
            neighbors: [None; 4],
        }
    }

    /// Row-major index of the room.
    #[must_use]
    pub const fn id(&self) -> RoomId {
        self.id
    }

    /// Pixel area covered by the room.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Room bounds shrunk by `offset`, used for membership tests.
    #[must_use]
    pub fn inner_bounds(&self, offset: i32) -> Rect {
        self.bounds.inset(offset)
    }

    /// Reports whether the wall on the provided side is standing.
    #[must_use]
    pub const fn has_wall(&self, side: Side) -> bool {
        self.walls[side.index()]
    }

    /// Number of walls still standing.
    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.walls.iter().filter(|wall| **wall).count()
    }

    /// Adjacent room across the provided side, if one exists.
    #[must_use]
    pub const fn neighbor(&self, side: Side) -> Option<RoomId> {
        self.neighbors[side.index()]
    }

    /// Segment traced by the wall on the provided side.
    #[must_use]
    pub const fn wall_line(&self, side: Side) -> Line {
        let left = self.bounds.x();
        let top = self.bounds.y();
        let right = left + self.bounds.width();
        let bottom = top + self.bounds.height();
        let (start, end) = match side {
            Side::Top => (Point::new(left, top), Point::new(right, top)),
            Side::Right => (Point::new(right, top), Point::new(right, bottom)),
            Side::Bottom => (Point::new(right, bottom), Point::new(left, bottom)),
            Side::Left => (Point::new(left, bottom), Point::new(left, top)),
        };
        Line::new(start, end)
    }

    /// Position that centers an object of `size` within the room.
    #[must_use]
    pub const fn center_for(&self, size: Size) -> Point {
        self.bounds.centered_origin(size)
    }

    /// Raises or clears the wall on the provided side, reporting whether it changed.
    pub fn set_wall(&mut self, side: Side, present: bool) -> bool {
        let slot = &mut self.walls[side.index()];
        let changed = *slot != present;
        *slot = present;
        changed
    }

    /// Records the room adjacent across the provided side.
    pub fn set_neighbor(&mut self, side: Side, neighbor: Option<RoomId>) {
        self.neighbors[side.index()] = neighbor;
    }
}

/// Read-only view over the rooms of the current level.
#[derive(Clone, Copy, Debug)]
pub struct RoomsView<'a> {
    rooms: &'a [Room],
    columns: u32,
    rows: u32,
}

impl<'a> RoomsView<'a> {
    /// Creates a view over rooms laid out row-major across `columns` by `rows`.
    #[must_use]
    pub const fn new(rooms: &'a [Room], columns: u32, rows: u32) -> Self {
        Self {
            rooms,
            columns,
            rows,
        }
    }

    /// Grid dimensions expressed as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Number of rooms in the view.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Reports whether the view contains no rooms.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Looks up a room by identifier.
    #[must_use]
    pub fn room(&self, id: RoomId) -> Option<&'a Room> {
        let index = usize::try_from(id.get()).ok()?;
        self.rooms.get(index)
    }

    /// Looks up the room adjacent to `id` across `side`.
    #[must_use]
    pub fn neighbor(&self, id: RoomId, side: Side) -> Option<&'a Room> {
        let neighbor = self.room(id)?.neighbor(side)?;
        self.room(neighbor)
    }

    /// Zero-based row containing the room.
    #[must_use]
    pub fn row_of(&self, id: RoomId) -> Option<u32> {
        let _ = self.room(id)?;
        id.get().checked_div(self.columns)
    }

    /// Zero-based column containing the room.
    #[must_use]
    pub fn column_of(&self, id: RoomId) -> Option<u32> {
        let _ = self.room(id)?;
        id.get().checked_rem(self.columns)
    }

    /// Looks up a room by zero-based row and column.
    #[must_use]
    pub fn room_at(&self, row: u32, column: u32) -> Option<&'a Room> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        let index = row.checked_mul(self.columns)?.checked_add(column)?;
        self.room(RoomId::new(index))
    }

    /// Iterator over the rooms in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Room> {
        self.rooms.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{GridLayout, Room, RoomsView};
    use crate::{Point, Rect, RoomId, Side, Size};

    #[test]
    fn wall_lines_trace_the_rectangle_corners() {
        let room = Room::new(RoomId::new(0), Rect::new(10, 20, 30, 40));
        let top = room.wall_line(Side::Top);
        assert_eq!((top.start(), top.end()), (Point::new(10, 20), Point::new(40, 20)));
        let right = room.wall_line(Side::Right);
        assert_eq!(
            (right.start(), right.end()),
            (Point::new(40, 20), Point::new(40, 60))
        );
        let bottom = room.wall_line(Side::Bottom);
        assert_eq!(
            (bottom.start(), bottom.end()),
            (Point::new(40, 60), Point::new(10, 60))
        );
        let left = room.wall_line(Side::Left);
        assert_eq!(
            (left.start(), left.end()),
            (Point::new(10, 60), Point::new(10, 20))
        );
    }

    #[test]
    fn row_and_column_follow_row_major_order() {
        let rooms: Vec<Room> = (0..6)
            .map(|index| Room::new(RoomId::new(index), Rect::new(0, 0, 1, 1)))
            .collect();
        let view = RoomsView::new(&rooms, 3, 2);
        assert_eq!(view.row_of(RoomId::new(4)), Some(1));
        assert_eq!(view.column_of(RoomId::new(4)), Some(1));
        assert_eq!(view.room_at(1, 2).map(Room::id), Some(RoomId::new(5)));
        assert!(view.room_at(2, 0).is_none());
        assert!(view.row_of(RoomId::new(6)).is_none());
    }

    #[test]
    fn cell_size_truncates_uneven_areas() {
        let layout = GridLayout {
            rows: 3,
            columns: 7,
            width: 800,
            height: 600,
        };
        assert_eq!(layout.cell_size(), Size::new(114, 200));
        assert_eq!(layout.room_count(), 21);
    }
}

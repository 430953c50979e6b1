//! Room topology and maze generation.

use maze_chase_core::{GridLayout, Rect, Room, RoomId, RoomsView, Side, WallPolicy};
use rand::{seq::SliceRandom, Rng};
use tracing::debug;

/// Side order scanned when picking a random wall to open.
const REMOVAL_ORDER: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

/// Grid of rooms laid out row-major with per-side walls and neighbor links.
#[derive(Clone, Debug, Default)]
pub struct RoomGraph {
    rooms: Vec<Room>,
    columns: u32,
    rows: u32,
}

impl RoomGraph {
    /// Allocates rooms left-to-right, top-to-bottom with every wall standing.
    #[must_use]
    pub fn build(layout: GridLayout) -> Self {
        let cell = layout.cell_size();
        let rooms = (0..layout.room_count())
            .map(|index| {
                let row = index / layout.columns;
                let column = index % layout.columns;
                let x = i32::try_from(column)
                    .unwrap_or(i32::MAX)
                    .saturating_mul(cell.width());
                let y = i32::try_from(row)
                    .unwrap_or(i32::MAX)
                    .saturating_mul(cell.height());
                let mut room = Room::new(
                    RoomId::new(index),
                    Rect::new(x, y, cell.width(), cell.height()),
                );
                for side in Side::ALL {
                    room.set_neighbor(side, neighbor_index(index, side, layout));
                }
                room
            })
            .collect();

        Self {
            rooms,
            columns: layout.columns,
            rows: layout.rows,
        }
    }

    /// Builds the grid and applies the wall policy.
    #[must_use]
    pub fn generate<R: Rng + ?Sized>(layout: GridLayout, policy: WallPolicy, rng: &mut R) -> Self {
        let mut graph = Self::build(layout);
        graph.apply_policy(policy, rng);
        graph
    }

    /// Removes walls according to the provided policy.
    pub fn apply_policy<R: Rng + ?Sized>(&mut self, policy: WallPolicy, rng: &mut R) {
        match policy {
            WallPolicy::Keep => {}
            WallPolicy::RemoveAll => {
                for room in &mut self.rooms {
                    for side in Side::ALL {
                        let _ = room.set_wall(side, false);
                    }
                }
                debug!(rooms = self.rooms.len(), "removed every wall");
            }
            WallPolicy::RandomSide => self.remove_random_sides(rng),
        }
    }

    /// Opens one random interior side per room.
    ///
    /// After opening the chosen side, the same opening is mirrored onto the
    /// room's iteration partner: the following room (or the room itself when
    /// it is the last one) for top, right and bottom openings, and the
    /// preceding room for left openings. Every opening is pairwise, so no
    /// room ever loses a boundary wall.
    fn remove_random_sides<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let count = self.rooms.len();
        for index in 0..count {
            let room = &self.rooms[index];
            let candidates: Vec<Side> = REMOVAL_ORDER
                .into_iter()
                .filter(|side| room.neighbor(*side).is_some())
                .collect();
            let Some(&side) = candidates.choose(rng) else {
                continue;
            };

            let id = room.id();
            let _ = self.remove_wall_pair(id, side);

            let partner = if side == Side::Left {
                index.checked_sub(1)
            } else {
                Some((index + 1).min(count - 1))
            };
            let Some(partner) = partner.and_then(|slot| self.rooms.get(slot)).map(Room::id) else {
                continue;
            };
            let _ = self.remove_wall_pair(partner, side.opposite());
        }
    }

    /// Removes the wall on `side` of `room` together with its neighbor's twin.
    ///
    /// Returns the walls that actually came down. Nothing is removed when the
    /// room has no neighbor across `side`.
    pub fn remove_wall_pair(&mut self, room: RoomId, side: Side) -> Vec<(RoomId, Side)> {
        let Some(neighbor) = self.room(room).and_then(|current| current.neighbor(side)) else {
            return Vec::new();
        };

        let mut removed = Vec::with_capacity(2);
        for (id, wall) in [(room, side), (neighbor, side.opposite())] {
            let Some(target) = self.room_mut(id) else {
                continue;
            };
            if target.set_wall(wall, false) {
                debug!(room = id.get(), side = ?wall, "removed wall");
                removed.push((id, wall));
            }
        }
        removed
    }

    /// Read-only view over the rooms.
    #[must_use]
    pub fn view(&self) -> RoomsView<'_> {
        RoomsView::new(&self.rooms, self.columns, self.rows)
    }

    /// Looks up a room by identifier.
    #[must_use]
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(usize::try_from(id.get()).ok()?)
    }

    /// Looks up a room by identifier for mutation.
    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(usize::try_from(id.get()).ok()?)
    }

    /// Rooms in row-major order.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Number of room columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of room rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }
}

fn neighbor_index(index: u32, side: Side, layout: GridLayout) -> Option<RoomId> {
    let row = index / layout.columns;
    let column = index % layout.columns;
    let neighbor = match side {
        Side::Top => (row >= 1).then(|| index - layout.columns),
        Side::Bottom => (row + 1 < layout.rows).then(|| index + layout.columns),
        Side::Left => (column > 0).then(|| index - 1),
        Side::Right => (column + 1 < layout.columns).then(|| index + 1),
    };
    neighbor.map(RoomId::new)
}

#[cfg(test)]
mod tests {
    use maze_chase_core::{GridLayout, Rect, RoomId, Side, WallPolicy};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::RoomGraph;

    fn layout(rows: u32, columns: u32) -> GridLayout {
        GridLayout {
            rows,
            columns,
            width: 800,
            height: 600,
        }
    }

    #[test]
    fn positions_and_neighbors_follow_row_major_order() {
        let graph = RoomGraph::build(layout(3, 4));
        let room = graph.room(RoomId::new(5)).expect("room 5");
        assert_eq!(room.bounds(), Rect::new(200, 200, 200, 200));
        assert_eq!(room.neighbor(Side::Top), Some(RoomId::new(1)));
        assert_eq!(room.neighbor(Side::Bottom), Some(RoomId::new(9)));
        assert_eq!(room.neighbor(Side::Left), Some(RoomId::new(4)));
        assert_eq!(room.neighbor(Side::Right), Some(RoomId::new(6)));

        let corner = graph.room(RoomId::new(11)).expect("room 11");
        assert_eq!(corner.neighbor(Side::Right), None);
        assert_eq!(corner.neighbor(Side::Bottom), None);
        assert_eq!(corner.wall_count(), 4);
    }

    #[test]
    fn remove_all_opens_every_room() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let graph = RoomGraph::generate(layout(10, 10), WallPolicy::RemoveAll, &mut rng);
        assert!(graph.rooms().iter().all(|room| room.wall_count() == 0));
    }

    #[test]
    fn random_sides_keep_boundary_walls_and_symmetric_openings() {
        for seed in 0..32 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let graph = RoomGraph::generate(layout(6, 7), WallPolicy::RandomSide, &mut rng);
            let view = graph.view();

            for room in graph.rooms() {
                for side in Side::ALL {
                    match room.neighbor(side) {
                        None => assert!(
                            room.has_wall(side),
                            "seed {seed}: room {} lost boundary {side:?}",
                            room.id().get()
                        ),
                        Some(neighbor) => {
                            let neighbor = view.room(neighbor).expect("neighbor exists");
                            assert_eq!(
                                room.has_wall(side),
                                neighbor.has_wall(side.opposite()),
                                "seed {seed}: one-sided opening at room {} {side:?}",
                                room.id().get()
                            );
                        }
                    }
                }
            }

            let opened = graph.rooms().iter().filter(|room| room.wall_count() < 4).count();
            assert_eq!(opened, graph.rooms().len(), "seed {seed}: every room opens a side");
        }
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let walls = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            RoomGraph::generate(layout(5, 5), WallPolicy::RandomSide, &mut rng)
                .rooms()
                .iter()
                .map(|room| Side::ALL.map(|side| room.has_wall(side)))
                .collect::<Vec<_>>()
        };
        assert_eq!(walls(7), walls(7));
    }

    #[test]
    fn wall_pairs_need_a_neighbor() {
        let mut graph = RoomGraph::build(layout(2, 2));
        assert!(graph.remove_wall_pair(RoomId::new(0), Side::Left).is_empty());

        let removed = graph.remove_wall_pair(RoomId::new(0), Side::Right);
        assert_eq!(
            removed,
            vec![(RoomId::new(0), Side::Right), (RoomId::new(1), Side::Left)]
        );
        assert!(graph.remove_wall_pair(RoomId::new(1), Side::Left).is_empty());
    }

    #[test]
    fn single_room_grid_keeps_all_walls() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let graph = RoomGraph::generate(layout(1, 1), WallPolicy::RandomSide, &mut rng);
        assert_eq!(graph.rooms()[0].wall_count(), 4);
    }
}

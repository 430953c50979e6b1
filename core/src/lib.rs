#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots such as [`EnemyView`] and [`RoomsView`], and respond exclusively
//! with new command batches.

mod geometry;
mod level;
mod rooms;
mod settings;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use geometry::{Line, Point, Rect, Size};
pub use level::{
    LevelDescription, LevelError, ObjectDescription, ObjectKind, RoomDescription, Sprite,
    SpriteCatalog,
};
pub use rooms::{GridLayout, Room, RoomsView};
pub use settings::{
    EnemySettings, GridSettings, MovementSettings, PlayerSettings, PopulationSettings,
    RoomSettings, ScreenSettings, Settings, SettingsError,
};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Chase.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the active settings.
    ReloadSettings {
        /// Settings that become active immediately.
        settings: Settings,
    },
    /// Builds a fresh level from the grid, screen and population settings.
    GenerateLevel {
        /// Seed driving wall removal and entity placement.
        seed: u64,
    },
    /// Builds a level from an authored description.
    LoadLevel {
        /// Rooms, walls and objects to create.
        level: LevelDescription,
        /// Sprite dimensions referenced by the level objects.
        sprites: SpriteCatalog,
        /// Seed used for enemy starting directions.
        seed: u64,
    },
    /// Tears down the level and every registered object.
    Clear,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Places the player at an explicit position.
    SpawnPlayer {
        /// Top-left corner of the player sprite.
        position: Point,
        /// Dimensions of the player sprite.
        size: Size,
    },
    /// Places an enemy at an explicit position.
    SpawnEnemy {
        /// Top-left corner of the enemy sprite.
        position: Point,
        /// Dimensions of the enemy sprite.
        size: Size,
        /// Initial facing direction; `Direction::None` is refused.
        facing: Direction,
    },
    /// Places a pickup at an explicit position.
    SpawnPickup {
        /// Top-left corner of the pickup sprite.
        position: Point,
        /// Dimensions of the pickup sprite.
        size: Size,
    },
    /// Turns an enemy toward a new direction.
    SetEnemyFacing {
        /// Enemy to turn.
        enemy: EnemyId,
        /// Direction the enemy should face; `Direction::None` is ignored.
        direction: Direction,
    },
    /// Requests that an enemy advance one step in its facing direction.
    StepEnemy {
        /// Enemy attempting to move.
        enemy: EnemyId,
    },
    /// Records a change in a direction key.
    SetDirectionKey {
        /// Direction bound to the key.
        direction: Direction,
        /// New state of the key.
        state: KeyState,
    },
    /// Requests that the player advance along every held direction.
    StepPlayer,
    /// Removes the wall on one side of a room together with its neighbor's twin.
    RemoveWall {
        /// Room owning the wall.
        room: RoomId,
        /// Side of the room to open.
        side: Side,
    },
    /// Removes the wall pair the player is facing.
    RemoveFacingWall,
    /// Settles a detected player and enemy overlap.
    ResolveEnemyCollision {
        /// Enemy touched by the player.
        enemy: EnemyId,
    },
    /// Settles a detected player and pickup overlap.
    ResolvePickupCollision {
        /// Pickup touched by the player.
        pickup: PickupId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that new settings are active.
    SettingsReloaded,
    /// Confirms that a level was built.
    LevelLoaded {
        /// Number of room columns.
        columns: u32,
        /// Number of room rows.
        rows: u32,
    },
    /// Reports that a level description could not be built.
    LevelRejected {
        /// Specific reason the level was rejected.
        reason: LevelError,
    },
    /// Confirms that the level and every object were torn down.
    WorldCleared,
    /// Confirms that a wall no longer stands.
    WallRemoved {
        /// Room that owned the wall.
        room: RoomId,
        /// Side of the room that opened.
        side: Side,
    },
    /// Confirms that the player was created.
    PlayerSpawned {
        /// Room containing the player, if any.
        room: Option<RoomId>,
    },
    /// Confirms that an enemy was created.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Room containing the enemy, if any.
        room: Option<RoomId>,
        /// Controller selected for the enemy.
        behavior: BehaviorMode,
    },
    /// Confirms that a pickup was created.
    PickupSpawned {
        /// Identifier assigned to the pickup.
        pickup: PickupId,
        /// Room owning the pickup.
        room: RoomId,
    },
    /// Confirms that an enemy turned.
    EnemyFacingChanged {
        /// Enemy that turned.
        enemy: EnemyId,
        /// Direction the enemy now faces.
        direction: Direction,
    },
    /// Confirms that an enemy moved.
    EnemyMoved {
        /// Enemy that moved.
        enemy: EnemyId,
        /// Direction of travel.
        direction: Direction,
        /// Position before the step.
        from: Point,
        /// Position after the step.
        to: Point,
    },
    /// Reports that an enemy step was blocked by a wall.
    EnemyMoveBlocked {
        /// Enemy whose step was rejected.
        enemy: EnemyId,
        /// Direction of the rejected step.
        direction: Direction,
    },
    /// Confirms that the player moved.
    PlayerMoved {
        /// Position before the step.
        from: Point,
        /// Position after the step.
        to: Point,
    },
    /// Reports that one held direction could not be applied.
    PlayerMoveBlocked {
        /// Direction of the rejected step.
        direction: Direction,
    },
    /// Announces that an object's room changed.
    RoomEntered {
        /// Object whose room changed.
        object: ObjectId,
        /// Room the object now occupies.
        room: RoomId,
    },
    /// Announces that the player touched an enemy.
    PlayerCollidedWithEnemy {
        /// Enemy that was touched.
        enemy: EnemyId,
    },
    /// Announces that the player touched a pickup.
    PlayerCollidedWithPickup {
        /// Pickup that was touched.
        pickup: PickupId,
    },
    /// Announces that a pickup was collected.
    PickupFetched {
        /// Pickup that was collected.
        pickup: PickupId,
    },
    /// Confirms that an object left the registry.
    ObjectRemoved {
        /// Object that was removed.
        object: ObjectId,
    },
    /// Announces that every pickup was collected.
    GameWon,
}

/// Cardinal movement directions plus the idle sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Movement toward decreasing y.
    Up,
    /// Movement toward increasing y.
    Down,
    /// Movement toward decreasing x.
    Left,
    /// Movement toward increasing x.
    Right,
    /// No movement.
    None,
}

impl Direction {
    /// The four movement directions in key-scan order.
    pub const CARDINALS: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Direction pointing the opposite way. `None` stays `None`.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::None => Self::None,
        }
    }

    /// Room side crossed when travelling in this direction.
    #[must_use]
    pub const fn side(self) -> Option<Side> {
        match self {
            Self::Up => Some(Side::Top),
            Self::Down => Some(Side::Bottom),
            Self::Left => Some(Side::Left),
            Self::Right => Some(Side::Right),
            Self::None => None,
        }
    }

    /// Pixel delta covered by a step of `pixels` in this direction.
    ///
    /// # Panics
    ///
    /// Panics when called on [`Direction::None`]; an idle entity has no move
    /// distance and callers must filter it out first.
    #[must_use]
    pub const fn offset(self, pixels: i32) -> (i32, i32) {
        match self {
            Self::Up => (0, -pixels),
            Self::Down => (0, pixels),
            Self::Left => (-pixels, 0),
            Self::Right => (pixels, 0),
            Self::None => panic!("cannot compute a move distance without a direction"),
        }
    }

    /// Parses a lowercase direction name as used in level properties.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

/// Sides of a room, each of which may carry a wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Edge toward decreasing y.
    Top,
    /// Edge toward increasing x.
    Right,
    /// Edge toward increasing y.
    Bottom,
    /// Edge toward decreasing x.
    Left,
}

impl Side {
    /// Every side in wall-storage order.
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// Side facing this one across a shared wall.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
        }
    }

    /// Direction of travel that crosses this side.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::Top => Direction::Up,
            Self::Right => Direction::Right,
            Self::Bottom => Direction::Down,
            Self::Left => Direction::Left,
        }
    }

    /// Storage slot of the side within per-room arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Top => 0,
            Self::Right => 1,
            Self::Bottom => 2,
            Self::Left => 3,
        }
    }
}

/// Unique identifier of a room, equal to its row-major index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(u32);

impl RoomId {
    /// Creates a new room identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PickupId(u32);

impl PickupId {
    /// Creates a new pickup identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Reference to any object tracked by the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectId {
    /// A room of the current level.
    Room(RoomId),
    /// A roaming enemy.
    Enemy(EnemyId),
    /// A collectible pickup.
    Pickup(PickupId),
    /// The player character.
    Player,
}

/// Pressed state of a direction key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeyState {
    /// The key is held down.
    Pressed,
    /// The key is up.
    #[default]
    Released,
}

/// Pressed state of the four direction keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DirectionKeys {
    states: [KeyState; 4],
}

impl DirectionKeys {
    fn slot(direction: Direction) -> Option<usize> {
        Direction::CARDINALS
            .iter()
            .position(|candidate| *candidate == direction)
    }

    /// State of the key bound to `direction`. `None` always reads as released.
    #[must_use]
    pub fn state(&self, direction: Direction) -> KeyState {
        Self::slot(direction).map_or(KeyState::Released, |slot| self.states[slot])
    }

    /// Records a key change. Changes to `None` are ignored.
    pub fn set(&mut self, direction: Direction, state: KeyState) {
        if let Some(slot) = Self::slot(direction) {
            self.states[slot] = state;
        }
    }

    /// Held directions in key-scan order.
    pub fn pressed(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::CARDINALS
            .into_iter()
            .filter(|direction| self.state(*direction) == KeyState::Pressed)
    }

    /// Reports whether any direction is held.
    #[must_use]
    pub fn any_pressed(&self) -> bool {
        self.pressed().next().is_some()
    }
}

/// Decision engine assigned to an enemy when it is created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorMode {
    /// Explicit state table with per-direction states and a wall-recovery state.
    #[default]
    StateMachine,
    /// Composite behavior tree.
    BehaviorTree,
}

/// Wall removal applied after the room grid is built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallPolicy {
    /// Every wall stays standing.
    Keep,
    /// Every wall is removed, leaving an open arena.
    RemoveAll,
    /// Each room opens one random interior side toward its neighbor.
    #[default]
    RandomSide,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Display name of the enemy.
    pub name: String,
    /// Sprite bounds used for collisions and wall checks.
    pub bounds: Rect,
    /// Sub-rectangle used for room membership and alignment.
    pub hotspot: Rect,
    /// Direction the enemy faces.
    pub facing: Direction,
    /// Room recorded by the enemy's cursor.
    pub room: Option<RoomId>,
    /// Indicates whether the move timer elapsed.
    pub ready_for_step: bool,
    /// Controller selected for the enemy.
    pub behavior: BehaviorMode,
}

/// Read-only view of all enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a snapshot by identifier.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Number of captured enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemies were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Sprite bounds used for collisions and wall checks.
    pub bounds: Rect,
    /// Sub-rectangle used for room membership and alignment.
    pub hotspot: Rect,
    /// Direction the player faces.
    pub facing: Direction,
    /// Room recorded by the player's cursor.
    pub room: Option<RoomId>,
    /// Indicates whether the move timer elapsed.
    pub ready_for_step: bool,
    /// Held direction keys.
    pub keys: DirectionKeys,
    /// Remaining health.
    pub health: i32,
    /// Points collected so far.
    pub points: u32,
}

/// Immutable representation of a single pickup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickupSnapshot {
    /// Unique identifier assigned to the pickup.
    pub id: PickupId,
    /// Display name of the pickup.
    pub name: String,
    /// Sprite bounds used for collisions.
    pub bounds: Rect,
    /// Room owning the pickup.
    pub room: RoomId,
}

/// Read-only view of all pickups.
#[derive(Clone, Debug, Default)]
pub struct PickupView {
    snapshots: Vec<PickupSnapshot>,
}

impl PickupView {
    /// Creates a new pickup view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PickupSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &PickupSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured pickups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no pickups were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, DirectionKeys, KeyState, Side};

    #[test]
    fn inverse_and_side_agree() {
        for direction in Direction::CARDINALS {
            let side = direction.side().expect("cardinal side");
            assert_eq!(side.direction(), direction);
            assert_eq!(direction.inverse().side(), Some(side.opposite()));
        }
        assert_eq!(Direction::None.inverse(), Direction::None);
        assert_eq!(Direction::None.side(), None);
    }

    #[test]
    fn offset_moves_along_screen_axes() {
        assert_eq!(Direction::Up.offset(3), (0, -3));
        assert_eq!(Direction::Right.offset(3), (3, 0));
    }

    #[test]
    #[should_panic(expected = "without a direction")]
    fn idle_direction_has_no_move_distance() {
        let _ = Direction::None.offset(1);
    }

    #[test]
    fn side_slots_are_distinct() {
        let mut slots: Vec<usize> = Side::ALL.iter().map(|side| side.index()).collect();
        slots.sort_unstable();
        assert_eq!(slots, vec![0, 1, 2, 3]);
    }

    #[test]
    fn held_keys_scan_in_fixed_order() {
        let mut keys = DirectionKeys::default();
        assert!(!keys.any_pressed());
        keys.set(Direction::Right, KeyState::Pressed);
        keys.set(Direction::Up, KeyState::Pressed);
        keys.set(Direction::None, KeyState::Pressed);
        assert_eq!(
            keys.pressed().collect::<Vec<_>>(),
            vec![Direction::Up, Direction::Right]
        );
        keys.set(Direction::Up, KeyState::Released);
        assert_eq!(keys.state(Direction::Up), KeyState::Released);
        assert_eq!(keys.state(Direction::None), KeyState::Released);
    }

    #[test]
    fn direction_names_parse_case_insensitively() {
        assert_eq!(Direction::from_name(" Left "), Some(Direction::Left));
        assert_eq!(Direction::from_name("sideways"), None);
    }
}

//! Level descriptions supplied by the level data provider.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Size;

/// Hand-authored level: grid dimensions, per-room walls and declared objects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDescription {
    /// Number of room rows.
    pub rows: u32,
    /// Number of room columns.
    pub columns: u32,
    /// One entry per room.
    #[serde(default)]
    pub rooms: Vec<RoomDescription>,
    /// Ignores declared pickups and scatters the configured number instead.
    #[serde(default)]
    pub auto_populate_pickups: bool,
}

impl LevelDescription {
    /// Checks the description for structural problems before it is built.
    pub fn validate(&self, sprites: &SpriteCatalog) -> Result<(), LevelError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(LevelError::EmptyGrid);
        }

        let expected = self.rows.saturating_mul(self.columns);
        let found = u32::try_from(self.rooms.len()).unwrap_or(u32::MAX);
        if found != expected {
            return Err(LevelError::RoomCountMismatch { expected, found });
        }

        let mut seen = BTreeSet::new();
        let mut players = 0_usize;
        for room in &self.rooms {
            if room.number >= expected {
                return Err(LevelError::RoomOutOfRange {
                    number: room.number,
                    rooms: expected,
                });
            }
            if !seen.insert(room.number) {
                return Err(LevelError::DuplicateRoom {
                    number: room.number,
                });
            }
            for object in &room.objects {
                if sprites.size_of(object.resource_id).is_none() {
                    return Err(LevelError::UnknownResource {
                        resource_id: object.resource_id,
                    });
                }
                if object.kind == ObjectKind::Player {
                    players += 1;
                }
            }
        }

        match players {
            0 => Err(LevelError::MissingPlayer),
            1 => Ok(()),
            _ => Err(LevelError::DuplicatePlayer),
        }
    }
}

const fn wall_present() -> bool {
    true
}

/// Wall visibility and contents of a single room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDescription {
    /// Row-major index of the room.
    pub number: u32,
    /// Whether the top wall stands.
    #[serde(default = "wall_present")]
    pub top: bool,
    /// Whether the right wall stands.
    #[serde(default = "wall_present")]
    pub right: bool,
    /// Whether the bottom wall stands.
    #[serde(default = "wall_present")]
    pub bottom: bool,
    /// Whether the left wall stands.
    #[serde(default = "wall_present")]
    pub left: bool,
    /// Objects placed at the center of the room.
    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
}

/// Object declared by a level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDescription {
    /// Display name of the object.
    pub name: String,
    /// Kind of object to create.
    pub kind: ObjectKind,
    /// Sprite resource used to size the object.
    pub resource_id: u32,
    /// Free-form properties attached by the level author.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl ObjectDescription {
    /// Looks up a free-form property by key.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// Kinds of objects a level may declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// The player character.
    Player,
    /// A collectible pickup.
    Pickup,
    /// A roaming enemy.
    Enemy,
}

/// Sprite dimensions registered for a resource identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprite {
    /// Resource identifier referenced by level objects.
    pub resource_id: u32,
    /// Sprite width in pixels.
    pub width: i32,
    /// Sprite height in pixels.
    pub height: i32,
}

/// Resolves resource identifiers to sprite dimensions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteCatalog {
    #[serde(default)]
    sprites: Vec<Sprite>,
}

impl SpriteCatalog {
    /// Creates a catalog from the provided sprite entries.
    #[must_use]
    pub fn new(sprites: Vec<Sprite>) -> Self {
        Self { sprites }
    }

    /// Dimensions registered for the resource, if any.
    #[must_use]
    pub fn size_of(&self, resource_id: u32) -> Option<Size> {
        self.sprites
            .iter()
            .rev()
            .find(|sprite| sprite.resource_id == resource_id)
            .map(|sprite| Size::new(sprite.width, sprite.height))
    }
}

/// Reasons a level description is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// The grid has no rows or no columns.
    #[error("level grid must contain at least one row and one column")]
    EmptyGrid,
    /// The number of room entries does not match the grid.
    #[error("level declares {found} rooms but its grid holds {expected}")]
    RoomCountMismatch {
        /// Rooms implied by the grid dimensions.
        expected: u32,
        /// Room entries present in the description.
        found: u32,
    },
    /// A room number lies outside the grid.
    #[error("room {number} is outside a grid of {rooms} rooms")]
    RoomOutOfRange {
        /// Offending room number.
        number: u32,
        /// Rooms implied by the grid dimensions.
        rooms: u32,
    },
    /// Two entries share a room number.
    #[error("room {number} is declared more than once")]
    DuplicateRoom {
        /// Repeated room number.
        number: u32,
    },
    /// An object references a sprite that is not registered.
    #[error("no sprite registered for resource {resource_id}")]
    UnknownResource {
        /// Unregistered resource identifier.
        resource_id: u32,
    },
    /// No room declares the player.
    #[error("level does not declare a player")]
    MissingPlayer,
    /// More than one room declares a player.
    #[error("level declares more than one player")]
    DuplicatePlayer,
}

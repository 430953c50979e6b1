//! Session settings loaded from TOML.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{BehaviorMode, GridLayout, Size, WallPolicy};

/// Complete set of tunables consulted by the world and the systems.
///
/// Every section falls back to its defaults when omitted, so an empty
/// document is a valid configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Room grid dimensions and wall policy.
    pub grid: GridSettings,
    /// Pixel area the grid is laid over.
    pub screen: ScreenSettings,
    /// Enemy pacing and controller selection.
    pub enemy: EnemySettings,
    /// Player pacing and attributes.
    pub player: PlayerSettings,
    /// Room membership tracking.
    pub room: RoomSettings,
    /// Movement validation switches.
    pub movement: MovementSettings,
    /// Procedural population of generated levels.
    pub population: PopulationSettings,
}

impl Settings {
    /// Parses settings from a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Grid layout derived from the grid and screen sections.
    #[must_use]
    pub const fn layout(&self) -> GridLayout {
        GridLayout {
            rows: self.grid.rows,
            columns: self.grid.columns,
            width: self.screen.width,
            height: self.screen.height,
        }
    }

    /// Interval an enemy waits between timed steps.
    #[must_use]
    pub const fn enemy_move_rate(&self) -> Duration {
        Duration::from_millis(self.enemy.move_rate_ms)
    }

    /// Interval the player waits between steps while a key is held.
    #[must_use]
    pub const fn player_move_rate(&self) -> Duration {
        Duration::from_millis(self.player.move_rate_ms)
    }
}

/// Room grid dimensions and wall policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Number of room rows.
    pub rows: u32,
    /// Number of room columns.
    pub columns: u32,
    /// Wall removal applied after the grid is built.
    pub walls: WallPolicy,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            rows: 10,
            columns: 10,
            walls: WallPolicy::RandomSide,
        }
    }
}

/// Pixel area covered by the room grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenSettings {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// Enemy pacing and controller selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemySettings {
    /// Controller assigned to enemies when they are created.
    pub behavior: BehaviorMode,
    /// Milliseconds between timed steps.
    pub move_rate_ms: u64,
    /// Pixels covered by a single step when moving at a constant pace.
    pub pixels_per_step: i32,
    /// Scales each step by elapsed time instead of using a constant pace.
    pub move_at_speed: bool,
    /// Pixels per second covered when `move_at_speed` is enabled.
    pub speed: i32,
    /// Side of the square used for room membership tests.
    pub hotspot_size: i32,
}

impl Default for EnemySettings {
    fn default() -> Self {
        Self {
            behavior: BehaviorMode::StateMachine,
            move_rate_ms: 50,
            pixels_per_step: 2,
            move_at_speed: false,
            speed: 60,
            hotspot_size: 10,
        }
    }
}

/// Player pacing and attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Pixels covered by each held direction per step.
    pub pixels_to_move: i32,
    /// Milliseconds between steps while a key is held.
    pub move_rate_ms: u64,
    /// Side of the square used for room membership tests.
    pub hotspot_size: i32,
    /// Health assigned when the player is created.
    pub health: i32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            pixels_to_move: 2,
            move_rate_ms: 10,
            hotspot_size: 10,
            health: 100,
        }
    }
}

/// Room membership tracking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomSettings {
    /// Pixels trimmed from each room edge before membership tests.
    pub inner_bounds_offset: i32,
    /// Updates the player's room whenever the player moves.
    pub track_player: bool,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            inner_bounds_offset: 2,
            track_player: true,
        }
    }
}

/// Movement validation switches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementSettings {
    /// Lets every entity walk through walls.
    pub ignore_restrictions: bool,
}

/// Procedural population of generated levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationSettings {
    /// Enemies placed in a generated level.
    pub enemies: u32,
    /// Pickups placed in a generated level.
    pub pickups: u32,
    /// Sprite size of the player.
    pub player_size: Size,
    /// Sprite size of each enemy.
    pub enemy_size: Size,
    /// Sprite size of each pickup.
    pub pickup_size: Size,
    /// Seed used when the runner does not supply one.
    pub seed: u64,
}

impl Default for PopulationSettings {
    fn default() -> Self {
        Self {
            enemies: 3,
            pickups: 5,
            player_size: Size::new(20, 20),
            enemy_size: Size::new(20, 20),
            pickup_size: Size::new(10, 10),
            seed: 0,
        }
    }
}

/// Reasons settings could not be loaded.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings from {}", .path.display())]
    Read {
        /// Location of the settings file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid settings TOML.
    #[error("failed to parse settings")]
    Parse(#[from] toml::de::Error),
}

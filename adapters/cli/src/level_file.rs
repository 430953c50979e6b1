//! TOML level files combining a level description with its sprite sizes.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use maze_chase_core::{LevelDescription, Sprite, SpriteCatalog};
use serde::Deserialize;

/// Level description together with the sprites its objects reference.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct LevelFile {
    pub(crate) level: LevelDescription,
    #[serde(default)]
    sprites: Vec<Sprite>,
}

impl LevelFile {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read level file {}", path.display()))?;
        Self::parse(&source).with_context(|| format!("invalid level file {}", path.display()))
    }

    fn parse(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub(crate) fn sprites(&self) -> SpriteCatalog {
        SpriteCatalog::new(self.sprites.clone())
    }
}

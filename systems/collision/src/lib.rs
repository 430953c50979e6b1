#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that detects the player touching enemies and pickups.
//!
//! Only objects sharing the player's room are tested, and a contact needs at
//! least one overlapping pixel.

use std::collections::BTreeSet;

use maze_chase_core::{Command, EnemyId, EnemyView, Event, PickupView, PlayerSnapshot};
use tracing::debug;

/// Collision pass run after every batch of movement events.
#[derive(Debug, Default)]
pub struct Collision {
    game_won: bool,
    moved_enemies: BTreeSet<EnemyId>,
}

impl Collision {
    /// Creates a collision system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits resolution commands for every contact caused by the batch.
    ///
    /// Enemies are tested when the player moved, when they moved themselves,
    /// or on a tick while they share the player's room. Pickups are only
    /// tested when the player moved.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: Option<&PlayerSnapshot>,
        enemies: &EnemyView,
        pickups: &PickupView,
        out: &mut Vec<Command>,
    ) {
        self.moved_enemies.clear();
        let mut player_moved = false;
        let mut time_advanced = false;

        for event in events {
            match event {
                Event::TimeAdvanced { .. } => time_advanced = true,
                Event::PlayerMoved { .. } => player_moved = true,
                Event::EnemyMoved { enemy, .. } => {
                    let _ = self.moved_enemies.insert(*enemy);
                }
                Event::GameWon => self.game_won = true,
                Event::PickupSpawned { .. } | Event::LevelLoaded { .. } | Event::WorldCleared => {
                    self.game_won = false;
                }
                _ => {}
            }
        }

        if self.game_won {
            return;
        }
        let Some(player) = player else {
            return;
        };
        let Some(room) = player.room else {
            return;
        };

        for enemy in enemies.iter() {
            let candidate = player_moved
                || self.moved_enemies.contains(&enemy.id)
                || (time_advanced && enemy.room == Some(room));
            if !candidate || enemy.room != Some(room) || !player.bounds.overlaps(&enemy.bounds) {
                continue;
            }
            debug!(enemy = enemy.id.get(), room = room.get(), "enemy contact");
            out.push(Command::ResolveEnemyCollision { enemy: enemy.id });
        }

        if !player_moved {
            return;
        }
        for pickup in pickups.iter() {
            if pickup.room != room || !player.bounds.overlaps(&pickup.bounds) {
                continue;
            }
            debug!(pickup = pickup.id.get(), room = room.get(), "pickup contact");
            out.push(Command::ResolvePickupCollision { pickup: pickup.id });
        }
    }
}

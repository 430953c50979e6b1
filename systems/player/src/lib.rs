#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that keeps the player walking while direction keys are held.

use maze_chase_core::{Command, Event, PlayerSnapshot};

/// Issues player steps at the rate allowed by the player's move timer.
#[derive(Debug, Default)]
pub struct PlayerControl {
    game_won: bool,
}

impl PlayerControl {
    /// Creates the player control system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits [`Command::StepPlayer`] when time advanced, the timer is ready
    /// and at least one direction key is pressed.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: Option<&PlayerSnapshot>,
        out: &mut Vec<Command>,
    ) {
        let mut time_advanced = false;
        for event in events {
            match event {
                Event::TimeAdvanced { .. } => time_advanced = true,
                Event::GameWon => self.game_won = true,
                Event::PickupSpawned { .. } | Event::LevelLoaded { .. } | Event::WorldCleared => {
                    self.game_won = false;
                }
                _ => {}
            }
        }

        if !time_advanced || self.game_won {
            return;
        }
        let Some(player) = player else {
            return;
        };
        if player.ready_for_step && player.keys.any_pressed() {
            out.push(Command::StepPlayer);
        }
    }
}

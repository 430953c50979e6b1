#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Maze Chase headless and reports the outcome.

mod level_file;
mod simulation;

use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use maze_chase_core::{Command, Direction, Event, KeyState, Settings};
use maze_chase_world::query;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use level_file::LevelFile;
use simulation::{Simulation, Summary};

/// Runs a maze for a fixed number of ticks and prints a summary.
#[derive(Debug, Parser)]
#[command(name = "maze-chase")]
struct Args {
    /// TOML settings file; defaults apply when omitted.
    #[arg(long)]
    settings: Option<PathBuf>,
    /// TOML level file; a maze is generated from the settings when omitted.
    #[arg(long)]
    level: Option<PathBuf>,
    /// Seed for maze generation and random placement; overrides the settings.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u32,
    /// Duration of a single tick in milliseconds.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
    /// Direction key held by the player for the whole run.
    #[arg(long, value_parser = parse_direction)]
    hold: Option<Direction>,
    /// Log filter, overriding RUST_LOG.
    #[arg(long)]
    log: Option<String>,
}

fn parse_direction(value: &str) -> Result<Direction, String> {
    Direction::from_name(value)
        .filter(|direction| *direction != Direction::None)
        .ok_or_else(|| format!("unknown direction `{value}`, expected up, down, left or right"))
}

fn init_logging(filter: Option<&str>) -> Result<()> {
    let filter = match filter {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter `{directives}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
    Ok(())
}

/// Entry point for the Maze Chase command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log.as_deref())?;

    let settings = match &args.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    let seed = args.seed.unwrap_or(settings.population.seed);
    let mut simulation = Simulation::new(settings);
    println!("{}", query::welcome_banner(simulation.world()));

    let command = match &args.level {
        Some(path) => {
            let file = LevelFile::load(path)?;
            let sprites = file.sprites();
            Command::LoadLevel {
                level: file.level,
                sprites,
                seed,
            }
        }
        None => Command::GenerateLevel { seed },
    };
    let mut summary = Summary::default();
    let events = simulation.submit(command);
    if let Some(reason) = events.iter().find_map(|event| match event {
        Event::LevelRejected { reason } => Some(reason),
        _ => None,
    }) {
        bail!("level rejected: {reason}");
    }
    summary.record(&events);

    let (columns, rows) = query::rooms(simulation.world()).dimensions();
    info!(
        columns,
        rows,
        enemies = query::enemy_view(simulation.world()).len(),
        pickups = query::pickup_count(simulation.world()),
        "level ready"
    );

    if let Some(direction) = args.hold {
        summary.record(&simulation.submit(Command::SetDirectionKey {
            direction,
            state: KeyState::Pressed,
        }));
    }

    let dt = Duration::from_millis(args.tick_ms);
    for tick in 0..args.ticks {
        summary.record(&simulation.submit(Command::Tick { dt }));
        if query::is_game_won(simulation.world()) {
            info!(tick, "every pickup collected");
            break;
        }
    }

    print_summary(&simulation, &summary);
    Ok(())
}

fn print_summary(simulation: &Simulation, summary: &Summary) {
    let world = simulation.world();
    println!("ticks simulated: {}", summary.ticks);
    println!("enemy steps: {}", summary.enemy_steps);
    println!("enemy steps blocked by walls: {}", summary.walls_hit);
    println!("player steps: {}", summary.player_steps);
    println!("pickups collected: {}", summary.pickups_collected);
    println!("enemies caught: {}", summary.enemies_caught);
    if let Some(player) = query::player(world) {
        println!("player points: {} health: {}", player.points, player.health);
    }
    for enemy in query::enemy_view(world).iter() {
        let label = simulation
            .behavior()
            .controller_state(enemy.id)
            .map_or('-', |state| state.label());
        debug!(enemy = enemy.id.get(), name = %enemy.name, room = ?enemy.room, "enemy at rest");
        println!(
            "{} [{label}] facing {:?} at ({}, {})",
            enemy.name,
            enemy.facing,
            enemy.bounds.x(),
            enemy.bounds.y()
        );
    }
    match summary.won_at {
        Some(tick) => println!("game won after {tick} ticks"),
        None => println!("pickups left: {}", query::pickup_count(world)),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use maze_chase_core::Direction;

    use super::Args;

    #[test]
    fn parses_run_options() {
        let args = Args::try_parse_from([
            "maze-chase",
            "--seed",
            "7",
            "--ticks",
            "30",
            "--hold",
            "left",
        ])
        .expect("valid arguments");
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.ticks, 30);
        assert_eq!(args.tick_ms, 16);
        assert_eq!(args.hold, Some(Direction::Left));
        assert!(args.level.is_none());
    }

    #[test]
    fn rejects_unknown_directions() {
        assert!(Args::try_parse_from(["maze-chase", "--hold", "sideways"]).is_err());
        assert!(Args::try_parse_from(["maze-chase", "--hold", "none"]).is_err());
    }
}

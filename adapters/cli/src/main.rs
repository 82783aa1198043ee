#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives a headless Labyrinth session.
//!
//! Each character of the key script is one frame: the key is translated into
//! a command, the frame's elapsed time is fed to the world as a tick, and an
//! ASCII frame is printed whenever a turn commits.

mod config;
mod frame;
mod script;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use labyrinth_core::{Command, Event, WELCOME_BANNER};
use labyrinth_world::{self as world, query, World};
use log::{info, warn};

use crate::config::{FileConfig, Settings};

/// Turn-based labyrinth played by one scripted human and any number of random walkers.
#[derive(Debug, Parser)]
#[command(name = "labyrinth", version)]
struct Cli {
    /// TOML file providing defaults for the options below.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Labyrinth pattern file.
    #[arg(long)]
    pattern: Option<PathBuf>,
    /// Seed for random-walking players.
    #[arg(long)]
    seed: Option<u64>,
    /// Turns committed per second.
    #[arg(long)]
    frequency: Option<f64>,
    /// Players present at start; the first one follows the script.
    #[arg(long)]
    players: Option<usize>,
    /// Simulated milliseconds elapsed per scripted key.
    #[arg(long)]
    dt_ms: Option<u64>,
    /// Keys to play: ^ v < > (or U D L R) steer, + adds a player, - removes
    /// one, * and / change speed, r reloads the pattern, . waits.
    #[arg(long, default_value = "")]
    script: String,
}

impl Cli {
    fn overrides(&self) -> FileConfig {
        FileConfig {
            pattern: self.pattern.clone(),
            seed: self.seed,
            frequency: self.frequency,
            players: self.players,
            dt_ms: self.dt_ms,
        }
    }
}

/// Entry point for the Labyrinth command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let file_config = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(file_config.merge(cli.overrides()))?;
    let keys = script::parse(&cli.script)?;

    let mut world = World::new(settings.world);
    println!("{WELCOME_BANNER}");
    print!("{}", frame::render(&world));

    for key in keys {
        let mut events = Vec::new();
        if let Some(command) = key.command() {
            world::apply(&mut world, command, &mut events);
        }
        world::apply(&mut world, Command::Tick { dt: settings.frame }, &mut events);
        report(&world, &events);
    }

    info!(
        "session ended after {} turns with {} players",
        query::turn_number(&world),
        query::player_count(&world)
    );
    Ok(())
}

fn report(world: &World, events: &[Event]) {
    for event in events {
        match event {
            Event::TurnCommitted { turn } => {
                println!("turn {turn}");
                print!("{}", frame::render(world));
            }
            Event::LapCompleted { player, .. } => {
                info!("player {} completed a lap", player.get());
            }
            Event::PatternLoaded { fallback: true, .. } => {
                warn!("pattern reloaded from the built-in labyrinth");
            }
            Event::TurnIntervalChanged { interval } => {
                info!(
                    "turn frequency now {:.3} per second",
                    1.0 / interval.as_secs_f64()
                );
            }
            _ => {}
        }
    }
}

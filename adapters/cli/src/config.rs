//! Session configuration merged from an optional TOML file and CLI overrides.

use std::{fs, path::Path, path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use labyrinth_world::{Config, PatternSource, DEFAULT_PATTERN_FILE, MAX_TURN_INTERVAL};
use serde::Deserialize;

const DEFAULT_FREQUENCY: f64 = 2.0;
const DEFAULT_DT_MS: u64 = 100;
const MAX_PLAYERS: usize = 100;

/// Settings that may be provided through a configuration file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    /// Pattern file, relative to the working directory.
    pub(crate) pattern: Option<PathBuf>,
    /// Seed shared by random-walking players.
    pub(crate) seed: Option<u64>,
    /// Turns committed per second.
    pub(crate) frequency: Option<f64>,
    /// Players present when the session starts.
    pub(crate) players: Option<usize>,
    /// Simulated milliseconds elapsed per scripted frame.
    pub(crate) dt_ms: Option<u64>,
}

impl FileConfig {
    /// Reads and parses the configuration file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse configuration toml contents")
    }

    /// Layers `overrides` on top of the values read from the file.
    pub(crate) fn merge(self, overrides: FileConfig) -> Self {
        Self {
            pattern: overrides.pattern.or(self.pattern),
            seed: overrides.seed.or(self.seed),
            frequency: overrides.frequency.or(self.frequency),
            players: overrides.players.or(self.players),
            dt_ms: overrides.dt_ms.or(self.dt_ms),
        }
    }
}

/// Fully resolved parameters of a scripted session.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) world: Config,
    pub(crate) frame: Duration,
}

impl Settings {
    /// Fills gaps with defaults and validates the merged configuration.
    ///
    /// A missing seed is drawn from the thread-local generator so that
    /// unseeded sessions differ between runs.
    pub(crate) fn resolve(config: FileConfig) -> Result<Self> {
        let frequency = config.frequency.unwrap_or(DEFAULT_FREQUENCY);
        if !frequency.is_finite() || frequency <= 0.0 {
            bail!("turn frequency must be a positive number, got {frequency}");
        }

        let players = config.players.unwrap_or(1);
        if players > MAX_PLAYERS {
            bail!("at most {MAX_PLAYERS} players are supported, got {players}");
        }

        let pattern = config
            .pattern
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PATTERN_FILE));
        let seed = config.seed.unwrap_or_else(rand::random);
        let turn_interval =
            Duration::try_from_secs_f64(1.0 / frequency).unwrap_or(MAX_TURN_INTERVAL);
        let world = Config::new(PatternSource::file(pattern))
            .with_turn_interval(turn_interval)
            .with_rng_seed(seed)
            .with_players(players);

        Ok(Self {
            world,
            frame: Duration::from_millis(config.dt_ms.unwrap_or(DEFAULT_DT_MS)),
        })
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Labyrinth.
//!
//! The world owns the grid, the player roster and the turn clock. Every
//! mutation goes through [`apply`]; adapters read state back through the
//! [`query`] module.

mod pattern;
mod roster;

use std::time::Duration;

use labyrinth_core::{Command, Event, PlayerId, Position};
use labyrinth_system_policy::MovePolicy;
use log::{debug, trace};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use pattern::{Grid, PatternError, PatternSource, DEFAULT_PATTERN_FILE, FALLBACK_PATTERN};

use roster::{Player, Roster};

const DEFAULT_RNG_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;
const DEFAULT_TURN_INTERVAL: Duration = Duration::from_millis(500);

/// Shortest interval between turns reachable through [`Command::AugmentFrequency`].
pub const MIN_TURN_INTERVAL: Duration = Duration::from_millis(1);
/// Longest interval between turns reachable through [`Command::DiminishFrequency`].
pub const MAX_TURN_INTERVAL: Duration = Duration::from_secs(60);

/// Configuration parameters required to construct the world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pattern: PatternSource,
    turn_interval: Duration,
    rng_seed: u64,
    players: usize,
}

impl Config {
    /// Creates a configuration reading the provided pattern source.
    #[must_use]
    pub fn new(pattern: PatternSource) -> Self {
        Self {
            pattern,
            turn_interval: DEFAULT_TURN_INTERVAL,
            rng_seed: DEFAULT_RNG_SEED,
            players: 1,
        }
    }

    /// Sets the time that must accumulate before a turn commits.
    #[must_use]
    pub fn with_turn_interval(mut self, turn_interval: Duration) -> Self {
        self.turn_interval = clamp_interval(turn_interval);
        self
    }

    /// Sets the seed of the generator shared by random-walking players.
    #[must_use]
    pub fn with_rng_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = rng_seed;
        self
    }

    /// Sets how many players start in the labyrinth; at least one always does.
    #[must_use]
    pub fn with_players(mut self, players: usize) -> Self {
        self.players = players.max(1);
        self
    }

    /// Source the grid is loaded and reloaded from.
    #[must_use]
    pub fn pattern(&self) -> &PatternSource {
        &self.pattern
    }

    /// Time that must accumulate before a turn commits.
    #[must_use]
    pub const fn turn_interval(&self) -> Duration {
        self.turn_interval
    }

    /// Seed of the generator shared by random-walking players.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Number of players present when the world starts.
    #[must_use]
    pub const fn players(&self) -> usize {
        self.players
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(PatternSource::default())
    }
}

/// Represents the authoritative Labyrinth world state.
#[derive(Debug)]
pub struct World {
    source: PatternSource,
    grid: Grid,
    roster: Roster,
    rng: ChaCha8Rng,
    turn: u64,
    turn_interval: Duration,
    since_last_turn: Duration,
}

impl World {
    /// Creates a new world from the provided configuration.
    ///
    /// The first player is steered manually, every other starting player
    /// walks at random.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let Config {
            pattern,
            turn_interval,
            rng_seed,
            players,
        } = config;
        let grid = Grid::load(&pattern);
        let origin = grid.origin();

        let mut roster = Roster::default();
        for index in 0..players.max(1) {
            let policy = if index == 0 {
                MovePolicy::manual()
            } else {
                MovePolicy::random_walk()
            };
            let _ = roster.push(Player::spawn(origin, policy));
        }

        Self {
            source: pattern,
            grid,
            roster,
            rng: ChaCha8Rng::seed_from_u64(rng_seed),
            turn: 0,
            turn_interval: clamp_interval(turn_interval),
            since_last_turn: Duration::ZERO,
        }
    }

    fn plan_turn(&mut self) {
        let grid = &self.grid;
        let rng = &mut self.rng;
        for (_, player) in self.roster.iter_mut() {
            let neighbors = grid.neighborhood(player.position);
            player.pending = player.policy.next_move(player.position, &neighbors, rng);
        }
    }

    fn step_once(&mut self, out_events: &mut Vec<Event>) {
        let ids: Vec<PlayerId> = self.roster.ids().collect();
        for player in ids {
            let Some(entry) = self.roster.get_mut(player) else {
                continue;
            };
            let Some(direction) = entry.pending.take() else {
                continue;
            };
            let destination = entry.position.offset(direction);
            self.move_to(player, destination, out_events);
        }

        self.turn = self.turn.saturating_add(1);
        trace!("turn {} committed", self.turn);
        out_events.push(Event::TurnCommitted { turn: self.turn });
    }

    fn move_to(&mut self, player: PlayerId, to: Position, out_events: &mut Vec<Event>) {
        let grid = &self.grid;
        let Some(entry) = self.roster.get_mut(player) else {
            return;
        };
        if !grid.size().contains(to) || grid.cell_at(to).is_wall() {
            return;
        }

        let from = entry.position;
        entry.position = to;
        out_events.push(Event::PlayerMoved { player, from, to });

        if grid.goal() == Some(to) {
            let origin = grid.origin();
            entry.position = origin;
            out_events.push(Event::LapCompleted {
                player,
                goal: to,
                origin,
            });
        }
    }

    fn reload(&mut self, out_events: &mut Vec<Event>) {
        self.grid = Grid::load(&self.source);
        let origin = self.grid.origin();
        for (_, player) in self.roster.iter_mut() {
            player.position = origin;
            player.pending = None;
        }

        out_events.push(Event::PatternLoaded {
            size: self.grid.size(),
            origin,
            goal: self.grid.goal(),
            fallback: self.grid.is_fallback(),
        });
    }

    fn set_turn_interval(&mut self, interval: Duration, out_events: &mut Vec<Event>) {
        let interval = clamp_interval(interval);
        if interval == self.turn_interval {
            return;
        }
        self.turn_interval = interval;
        debug!("turn interval set to {interval:?}");
        out_events.push(Event::TurnIntervalChanged { interval });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Requests that cannot be honoured (unknown players, walls, positions outside
/// the grid, removing the last player) are ignored without emitting events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            world.since_last_turn = world.since_last_turn.saturating_add(dt);
            if world.since_last_turn >= world.turn_interval {
                world.plan_turn();
                world.step_once(out_events);
                world.since_last_turn = Duration::ZERO;
            }
        }
        Command::CommitTurn => {
            world.step_once(out_events);
        }
        Command::SetDirection { player, direction } => {
            if let Some(manual) = world
                .roster
                .get_mut(player)
                .and_then(|entry| entry.policy.as_manual_mut())
            {
                manual.queue(direction);
            }
        }
        Command::MovePlayer { player, to } => {
            world.move_to(player, to, out_events);
        }
        Command::AddPlayer => {
            let origin = world.grid.origin();
            let policy = MovePolicy::random_walk();
            let kind = policy.kind();
            let player = world.roster.push(Player::spawn(origin, policy));
            debug!("player {} joined at ({}, {})", player.get(), origin.x(), origin.y());
            out_events.push(Event::PlayerAdded {
                player,
                cell: origin,
                policy: kind,
            });
        }
        Command::RemovePlayer { player } => {
            if let Some((player, removed)) = world.roster.remove(player) {
                debug!("player {} left", player.get());
                out_events.push(Event::PlayerRemoved {
                    player,
                    cell: removed.position,
                });
            }
        }
        Command::ReloadPattern => {
            world.reload(out_events);
        }
        Command::AugmentFrequency => {
            let interval = world.turn_interval / 2;
            world.set_turn_interval(interval, out_events);
        }
        Command::DiminishFrequency => {
            let interval = world.turn_interval.saturating_mul(2);
            world.set_turn_interval(interval, out_events);
        }
    }
}

fn clamp_interval(interval: Duration) -> Duration {
    interval.clamp(MIN_TURN_INTERVAL, MAX_TURN_INTERVAL)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{Grid, PatternSource, World};
    use labyrinth_core::{Cell, Direction, GridSize, Neighborhood, PlayerId, PolicyKind, Position};

    /// Provides read-only access to the grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Source the grid was loaded from and is reloaded from.
    #[must_use]
    pub fn pattern_source(world: &World) -> &PatternSource {
        &world.source
    }

    /// Dimensions of the grid.
    #[must_use]
    pub fn grid_size(world: &World) -> GridSize {
        world.grid.size()
    }

    /// Cell at `position`; positions outside the grid read as walls.
    #[must_use]
    pub fn cell_at(world: &World, position: Position) -> Cell {
        world.grid.cell_at(position)
    }

    /// Spawn cell players start from and return to after a lap.
    #[must_use]
    pub fn origin(world: &World) -> Position {
        world.grid.origin()
    }

    /// Lap cell, if the grid has one.
    #[must_use]
    pub fn goal(world: &World) -> Option<Position> {
        world.grid.goal()
    }

    /// Traversability of the four cells around `position`.
    #[must_use]
    pub fn neighborhood(world: &World, position: Position) -> Neighborhood {
        world.grid.neighborhood(position)
    }

    /// Cell occupied by the player, if the identifier is in range.
    #[must_use]
    pub fn player_position(world: &World, player: PlayerId) -> Option<Position> {
        world.roster.get(player).map(|entry| entry.position)
    }

    /// Number of players in the roster.
    #[must_use]
    pub fn player_count(world: &World) -> usize {
        world.roster.len()
    }

    /// Number of turns committed since the world was created.
    #[must_use]
    pub fn turn_number(world: &World) -> u64 {
        world.turn
    }

    /// Time that must accumulate before the next turn commits.
    #[must_use]
    pub fn turn_interval(world: &World) -> Duration {
        world.turn_interval
    }

    /// Turns committed per second of accumulated tick time.
    #[must_use]
    pub fn turn_frequency(world: &World) -> f64 {
        1.0 / world.turn_interval.as_secs_f64()
    }

    /// Captures a read-only view of the players in roster order.
    #[must_use]
    pub fn player_view(world: &World) -> PlayerView {
        let snapshots = world
            .roster
            .iter()
            .map(|(id, entry)| PlayerSnapshot {
                id,
                position: entry.position,
                pending: entry.pending,
                policy: entry.policy.kind(),
            })
            .collect();
        PlayerView { snapshots }
    }

    /// Read-only snapshot describing all players within the labyrinth.
    #[derive(Clone, Debug, Default)]
    pub struct PlayerView {
        snapshots: Vec<PlayerSnapshot>,
    }

    impl PlayerView {
        /// Iterator over the captured snapshots in roster order.
        pub fn iter(&self) -> impl Iterator<Item = &PlayerSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<PlayerSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single player's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PlayerSnapshot {
        /// Roster index of the player.
        pub id: PlayerId,
        /// Cell currently occupied by the player.
        pub position: Position,
        /// Direction scheduled for the next commit, if any.
        pub pending: Option<Direction>,
        /// Strategy steering the player.
        pub policy: PolicyKind,
    }
}

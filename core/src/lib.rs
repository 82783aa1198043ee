#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Labyrinth engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and move policies. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then reports [`Event`] values describing what
//! actually changed. Commands are infallible: requests that cannot be honoured
//! leave the world untouched and produce no event.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Labyrinth.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the turn clock by the provided delta time.
    ///
    /// A turn is committed when the accumulated time reaches the configured
    /// turn interval; at most one turn commits per tick.
    Tick {
        /// Duration of time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Resolves every pending direction immediately and advances the turn counter.
    CommitTurn,
    /// Queues a direction on a manually controlled player.
    SetDirection {
        /// Player receiving the direction.
        player: PlayerId,
        /// Direction to attempt on the next committed turn.
        direction: Direction,
    },
    /// Attempts to place a player on the provided cell.
    MovePlayer {
        /// Player to relocate.
        player: PlayerId,
        /// Destination cell.
        to: Position,
    },
    /// Appends a random-walking player at the origin.
    AddPlayer,
    /// Removes a player from the roster, keeping at least one.
    RemovePlayer {
        /// Player to remove; `None` removes the most recently added player.
        player: Option<PlayerId>,
    },
    /// Re-reads the pattern source and resets every player to the new origin.
    ReloadPattern,
    /// Doubles the turn frequency.
    AugmentFrequency,
    /// Halves the turn frequency.
    DiminishFrequency,
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the turn clock advanced.
    TimeAdvanced {
        /// Duration of time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a grid was (re)built from the pattern source.
    PatternLoaded {
        /// Dimensions of the parsed grid.
        size: GridSize,
        /// Spawn cell parsed from the pattern.
        origin: Position,
        /// Lap cell parsed from the pattern, if any.
        goal: Option<Position>,
        /// Whether the built-in pattern replaced an unavailable source.
        fallback: bool,
    },
    /// Confirms that a player joined the roster.
    PlayerAdded {
        /// Identifier assigned to the new player.
        player: PlayerId,
        /// Cell the player occupies after joining.
        cell: Position,
        /// Strategy steering the player.
        policy: PolicyKind,
    },
    /// Confirms that a player left the roster.
    PlayerRemoved {
        /// Identifier the player held before removal.
        player: PlayerId,
        /// Cell the player occupied when removed.
        cell: Position,
    },
    /// Confirms that a player moved between two cells.
    PlayerMoved {
        /// Identifier of the player that moved.
        player: PlayerId,
        /// Cell occupied before moving.
        from: Position,
        /// Cell entered by the move.
        to: Position,
    },
    /// Reports that a player entered the goal and was sent back to the origin.
    LapCompleted {
        /// Identifier of the player that completed the lap.
        player: PlayerId,
        /// Goal cell that was reached.
        goal: Position,
        /// Origin cell the player now occupies.
        origin: Position,
    },
    /// Confirms that a turn was committed.
    TurnCommitted {
        /// Turn counter after the commit.
        turn: u64,
    },
    /// Reports that the duration between turns changed.
    TurnIntervalChanged {
        /// Duration that must accumulate before the next turn commits.
        interval: Duration,
    },
}

/// Traversability of a single grid square.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Square that players may enter.
    #[default]
    Empty,
    /// Square that blocks movement.
    Wall,
}

impl Cell {
    /// Reports whether the cell blocks movement.
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }
}

/// Cardinal movement directions available to players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in the order neighbourhoods are reported.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Column and row delta applied by a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are signed so that the cells just outside the grid border can
/// be named; the grid reports such cells as walls.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Position one cell away in the provided direction.
    #[must_use]
    pub const fn offset(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// Traversability of the four cells surrounding a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Neighborhood {
    /// Cell above the position.
    pub up: Cell,
    /// Cell below the position.
    pub down: Cell,
    /// Cell left of the position.
    pub left: Cell,
    /// Cell right of the position.
    pub right: Cell,
}

impl Neighborhood {
    /// Builds a neighbourhood by looking up each adjacent cell of `center`.
    #[must_use]
    pub fn around(center: Position, mut cell_at: impl FnMut(Position) -> Cell) -> Self {
        Self {
            up: cell_at(center.offset(Direction::Up)),
            down: cell_at(center.offset(Direction::Down)),
            left: cell_at(center.offset(Direction::Left)),
            right: cell_at(center.offset(Direction::Right)),
        }
    }

    /// Neighbourhood in which every adjacent cell is a wall.
    #[must_use]
    pub const fn enclosed() -> Self {
        Self {
            up: Cell::Wall,
            down: Cell::Wall,
            left: Cell::Wall,
            right: Cell::Wall,
        }
    }

    /// Cell lying in the provided direction.
    #[must_use]
    pub const fn cell(&self, direction: Direction) -> Cell {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Iterates over the neighbours in Up, Down, Left, Right order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, Cell)> + '_ {
        Direction::ALL
            .into_iter()
            .map(move |direction| (direction, self.cell(direction)))
    }

    /// Directions whose neighbour is not a wall, in Up, Down, Left, Right order.
    pub fn open_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.iter()
            .filter(|(_, cell)| !cell.is_wall())
            .map(|(direction, _)| direction)
    }
}

/// Dimensions of a grid measured in whole cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    width: u32,
    height: u32,
}

impl GridSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of columns, equal to the longest pattern row.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the position lies inside the grid.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        u32::try_from(position.x()).map_or(false, |x| x < self.width)
            && u32::try_from(position.y()).map_or(false, |y| y < self.height)
    }
}

/// Roster index of a player.
///
/// Identifiers are positional: removing a player shifts every later player
/// down by one.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a new player identifier with the provided numeric value.
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

/// Strategies available for choosing a player's next direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyKind {
    /// Directions are supplied one at a time by an external input source.
    Manual,
    /// Directions are drawn uniformly among the open neighbours.
    RandomWalk,
}

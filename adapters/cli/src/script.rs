//! Scripted key presses standing in for keyboard input.

use anyhow::{bail, Result};
use labyrinth_core::{Command, Direction, PlayerId};

/// Player steered by the direction keys.
const HUMAN: PlayerId = PlayerId::new(0);

/// A single key press read from the script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Key {
    Steer(Direction),
    AddPlayer,
    RemovePlayer,
    Faster,
    Slower,
    Reload,
    Idle,
}

impl Key {
    fn from_symbol(symbol: char) -> Option<Self> {
        let key = match symbol {
            '^' | 'U' | 'u' => Self::Steer(Direction::Up),
            'v' | 'D' | 'd' => Self::Steer(Direction::Down),
            '<' | 'L' | 'l' => Self::Steer(Direction::Left),
            '>' | 'R' => Self::Steer(Direction::Right),
            '+' => Self::AddPlayer,
            '-' => Self::RemovePlayer,
            '*' => Self::Faster,
            '/' => Self::Slower,
            'r' => Self::Reload,
            '.' => Self::Idle,
            _ => return None,
        };
        Some(key)
    }

    /// Command submitted to the world for this key, if any.
    pub(crate) fn command(self) -> Option<Command> {
        match self {
            Self::Steer(direction) => Some(Command::SetDirection {
                player: HUMAN,
                direction,
            }),
            Self::AddPlayer => Some(Command::AddPlayer),
            Self::RemovePlayer => Some(Command::RemovePlayer { player: None }),
            Self::Faster => Some(Command::AugmentFrequency),
            Self::Slower => Some(Command::DiminishFrequency),
            Self::Reload => Some(Command::ReloadPattern),
            Self::Idle => None,
        }
    }
}

/// Parses a script into key presses, ignoring whitespace.
pub(crate) fn parse(script: &str) -> Result<Vec<Key>> {
    let mut keys = Vec::with_capacity(script.len());
    for (offset, symbol) in script.chars().enumerate() {
        if symbol.is_whitespace() {
            continue;
        }
        match Key::from_symbol(symbol) {
            Some(key) => keys.push(key),
            None => bail!("unknown key {symbol:?} at position {offset} of the script"),
        }
    }
    Ok(keys)
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Move policies that decide where a player heads on the next turn.
//!
//! Policies never see the grid itself. Each turn the world hands them the
//! player's current position together with the traversability of the four
//! adjacent cells, and the policy answers with a direction or with `None` to
//! stay put.

use labyrinth_core::{Direction, Neighborhood, PolicyKind, Position};
use rand::{seq::SliceRandom, Rng};

/// Strategy owned by a single player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MovePolicy {
    /// Replays directions queued by an external input source.
    Manual(Manual),
    /// Wanders uniformly among the open neighbours.
    RandomWalk(RandomWalk),
}

impl MovePolicy {
    /// Creates a manual policy with nothing queued.
    #[must_use]
    pub const fn manual() -> Self {
        Self::Manual(Manual::new())
    }

    /// Creates a random-walk policy.
    #[must_use]
    pub const fn random_walk() -> Self {
        Self::RandomWalk(RandomWalk)
    }

    /// Kind of strategy wrapped by the policy.
    #[must_use]
    pub const fn kind(&self) -> PolicyKind {
        match self {
            Self::Manual(_) => PolicyKind::Manual,
            Self::RandomWalk(_) => PolicyKind::RandomWalk,
        }
    }

    /// Manual strategy wrapped by the policy, if any.
    pub fn as_manual_mut(&mut self) -> Option<&mut Manual> {
        match self {
            Self::Manual(manual) => Some(manual),
            Self::RandomWalk(_) => None,
        }
    }

    /// Chooses the direction to attempt on the upcoming turn.
    pub fn next_move<R>(
        &mut self,
        current: Position,
        neighbors: &Neighborhood,
        rng: &mut R,
    ) -> Option<Direction>
    where
        R: Rng + ?Sized,
    {
        match self {
            Self::Manual(manual) => manual.next_move(current, neighbors),
            Self::RandomWalk(walk) => walk.next_move(current, neighbors, rng),
        }
    }
}

/// Policy driven by single-shot directions from a human player.
///
/// At most one direction is buffered: queueing again before the next turn
/// replaces the earlier request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manual {
    queued: Option<Direction>,
}

impl Manual {
    /// Creates a manual policy with nothing queued.
    #[must_use]
    pub const fn new() -> Self {
        Self { queued: None }
    }

    /// Buffers the direction consumed by the next call to [`Manual::next_move`].
    pub fn queue(&mut self, direction: Direction) {
        self.queued = Some(direction);
    }

    /// Direction currently buffered, if any.
    #[must_use]
    pub const fn queued(&self) -> Option<Direction> {
        self.queued
    }

    /// Hands out the buffered direction and clears the buffer.
    pub fn next_move(&mut self, _current: Position, _neighbors: &Neighborhood) -> Option<Direction> {
        self.queued.take()
    }
}

/// Policy that picks uniformly among the directions not blocked by a wall.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RandomWalk;

impl RandomWalk {
    /// Chooses an open direction, or `None` when every neighbour is a wall.
    ///
    /// A single open neighbour is returned without consulting `rng`.
    pub fn next_move<R>(
        &self,
        _current: Position,
        neighbors: &Neighborhood,
        rng: &mut R,
    ) -> Option<Direction>
    where
        R: Rng + ?Sized,
    {
        let mut open = [Direction::Up; 4];
        let mut count = 0;
        for direction in neighbors.open_directions() {
            open[count] = direction;
            count += 1;
        }

        match count {
            0 => None,
            1 => Some(open[0]),
            _ => open[..count].choose(rng).copied(),
        }
    }
}

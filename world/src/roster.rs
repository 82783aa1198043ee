//! Insertion-ordered collection of players.

use labyrinth_core::{Direction, PlayerId, Position};
use labyrinth_system_policy::MovePolicy;

#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) position: Position,
    pub(crate) pending: Option<Direction>,
    pub(crate) policy: MovePolicy,
}

impl Player {
    pub(crate) fn spawn(position: Position, policy: MovePolicy) -> Self {
        Self {
            position,
            pending: None,
            policy,
        }
    }
}

/// Players addressed by their index; never empty once populated.
#[derive(Clone, Debug, Default)]
pub(crate) struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub(crate) fn len(&self) -> usize {
        self.players.len()
    }

    pub(crate) fn push(&mut self, player: Player) -> PlayerId {
        self.players.push(player);
        id_for(self.players.len() - 1)
    }

    /// Removes the selected player, or the last one when `player` is `None`.
    ///
    /// Refuses to remove the final player.
    pub(crate) fn remove(&mut self, player: Option<PlayerId>) -> Option<(PlayerId, Player)> {
        if self.players.len() <= 1 {
            return None;
        }
        let index = match player {
            Some(id) => index_for(id).filter(|index| *index < self.players.len())?,
            None => self.players.len() - 1,
        };
        Some((id_for(index), self.players.remove(index)))
    }

    pub(crate) fn get(&self, player: PlayerId) -> Option<&Player> {
        index_for(player).and_then(|index| self.players.get(index))
    }

    pub(crate) fn get_mut(&mut self, player: PlayerId) -> Option<&mut Player> {
        index_for(player).and_then(|index| self.players.get_mut(index))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (PlayerId, &Player)> {
        self.players
            .iter()
            .enumerate()
            .map(|(index, player)| (id_for(index), player))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut Player)> {
        self.players
            .iter_mut()
            .enumerate()
            .map(|(index, player)| (id_for(index), player))
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.players.len()).map(id_for)
    }
}

fn id_for(index: usize) -> PlayerId {
    PlayerId::new(u32::try_from(index).unwrap_or(u32::MAX))
}

fn index_for(player: PlayerId) -> Option<usize> {
    usize::try_from(player.get()).ok()
}

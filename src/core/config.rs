//! Game roster configuration.
//!
//! A game is configured by who plays which animal:
//! - `with_player`: the player gets a random animal at start
//! - `with_animal`: the player controls a specific animal
//!
//! Both can be mixed; explicit assignments are honored first and random
//! players receive the remaining animals in player-id order.

use serde::{Deserialize, Serialize};

use super::error::{DominantSpeciesError, Result};
use super::{GameRng, PlayerId};
use crate::animals::AnimalType;

/// Most animals (and therefore players) a game supports.
pub const MAX_PLAYERS: usize = 6;

/// Roster for a new game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Players that receive a random animal.
    pub random_players: Vec<PlayerId>,
    /// Fixed animal assignments.
    pub assignments: Vec<(AnimalType, PlayerId)>,
}

impl GameConfig {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Roster where every player gets a random animal.
    #[must_use]
    pub fn random(players: impl IntoIterator<Item = PlayerId>) -> Self {
        Self {
            random_players: players.into_iter().collect(),
            assignments: Vec::new(),
        }
    }

    /// Add a player with a random animal (builder pattern).
    #[must_use]
    pub fn with_player(mut self, player: PlayerId) -> Self {
        self.random_players.push(player);
        self
    }

    /// Assign a specific animal to a player (builder pattern).
    #[must_use]
    pub fn with_animal(mut self, animal: AnimalType, player: PlayerId) -> Self {
        self.assignments.push((animal, player));
        self
    }

    /// Resolve the roster into animal assignments, ordered by food chain.
    ///
    /// Random players are deduplicated and served in id order from a
    /// shuffled list of the animals nobody picked explicitly.
    pub fn resolve(&self, rng: &mut GameRng) -> Result<Vec<(AnimalType, PlayerId)>> {
        let mut random_players = self.random_players.clone();
        random_players.sort_unstable();
        random_players.dedup();
        random_players.retain(|p| !self.assignments.iter().any(|(_, q)| q == p));

        let total = self.assignments.len() + random_players.len();
        if total == 0 {
            return Err(DominantSpeciesError::Min1Player);
        }
        if total > MAX_PLAYERS {
            return Err(DominantSpeciesError::Max6Players);
        }

        let mut assigned = self.assignments.clone();
        for (i, (animal, _)) in assigned.iter().enumerate() {
            if assigned[..i].iter().any(|(other, _)| other == animal) {
                return Err(DominantSpeciesError::InvalidPlayer);
            }
        }

        let mut remaining: Vec<AnimalType> = AnimalType::FOOD_CHAIN_ORDER
            .iter()
            .copied()
            .filter(|animal| !assigned.iter().any(|(a, _)| a == animal))
            .collect();
        rng.shuffle(&mut remaining);

        assigned.extend(remaining.into_iter().zip(random_players));
        assigned.sort_by_key(|(animal, _)| animal.food_chain_index());

        Ok(assigned)
    }
}

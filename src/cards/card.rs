//! Dominance cards.
//!
//! The deck holds one of each card, shuffled, with Ice Age always at the
//! bottom. Five cards lie face up; a dominating animal takes one of them
//! after each Domination.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::GameRng;

/// Cards kept face up between rounds.
pub const AVAILABLE_CARDS: usize = 5;

pub const INITIAL_DECK_SIZE: usize = 26;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Card {
    Aquatic,
    Biodiversity,
    Biomass,
    Blight,
    Catastrophe,
    ColdSnap,
    Disease,
    Ecodiversity,
    Evolution,
    Fecundity,
    Fertile,
    Habitat,
    Hibernation,
    IceAge,
    IceSheet,
    Immigrants,
    Instinct,
    Intelligence,
    MassExodus,
    Metamorphosis,
    NicheBiomes,
    Nocturnal,
    Omnivore,
    Parasitism,
    Predator,
    Symbiotic,
}

impl Card {
    pub const ALL: [Card; INITIAL_DECK_SIZE] = [
        Card::Aquatic,
        Card::Biodiversity,
        Card::Biomass,
        Card::Blight,
        Card::Catastrophe,
        Card::ColdSnap,
        Card::Disease,
        Card::Ecodiversity,
        Card::Evolution,
        Card::Fecundity,
        Card::Fertile,
        Card::Habitat,
        Card::Hibernation,
        Card::IceAge,
        Card::IceSheet,
        Card::Immigrants,
        Card::Instinct,
        Card::Intelligence,
        Card::MassExodus,
        Card::Metamorphosis,
        Card::NicheBiomes,
        Card::Nocturnal,
        Card::Omnivore,
        Card::Parasitism,
        Card::Predator,
        Card::Symbiotic,
    ];

    /// Shuffled deck, front is the top, Ice Age last.
    #[must_use]
    pub fn initial_deck(rng: &mut GameRng) -> Vector<Card> {
        let mut cards: Vec<Card> = Self::ALL.iter().copied().filter(|&c| c != Card::IceAge).collect();
        rng.shuffle(&mut cards);
        cards.push(Card::IceAge);
        cards.into_iter().collect()
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_deck_ends_with_ice_age() {
        let mut rng = GameRng::new(11);
        let deck = Card::initial_deck(&mut rng);

        assert_eq!(deck.len(), INITIAL_DECK_SIZE);
        assert_eq!(deck.back(), Some(&Card::IceAge));
        assert_eq!(deck.iter().filter(|&&c| c == Card::IceAge).count(), 1);
    }

    #[test]
    fn test_initial_deck_is_seeded() {
        let a = Card::initial_deck(&mut GameRng::new(5));
        let b = Card::initial_deck(&mut GameRng::new(5));
        assert_eq!(a, b);
    }
}

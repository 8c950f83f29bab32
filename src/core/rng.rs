//! Seeded randomness for shuffles and draws.
//!
//! The deck shuffle, element draws, random animal assignment and the automa
//! all pull from a `GameRng` the caller passes in. A game never keeps one,
//! so replaying the same commands against the same seed reproduces the same
//! game event for event.
//!
//! ```
//! use dominant_species::core::GameRng;
//!
//! let mut a = GameRng::new(7);
//! let mut b = GameRng::new(7);
//!
//! let mut bag_a = vec!['g', 'm', 's', 'w'];
//! let mut bag_b = bag_a.clone();
//! a.shuffle(&mut bag_a);
//! b.shuffle(&mut bag_b);
//!
//! assert_eq!(bag_a, bag_b);
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// ChaCha8 stream plus the seed it started from.
#[derive(Clone, Debug)]
pub struct GameRng {
    stream: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            stream: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform index below `len`; 0 for an empty range.
    pub fn next_index(&mut self, len: usize) -> usize {
        match len {
            0 => 0,
            n => self.stream.gen_range(0..n),
        }
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.stream);
    }

    #[must_use]
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.stream)
    }

    /// Index drawn in proportion to `counts`, as when drawing one element
    /// out of a bag holding `counts[i]` of each type. `None` for an empty bag.
    pub fn weighted_index(&mut self, counts: &[u32]) -> Option<usize> {
        let total: u32 = counts.iter().sum();
        if total == 0 {
            return None;
        }
        let mut ticket = self.stream.gen_range(0..total);
        counts.iter().position(|&count| {
            if ticket < count {
                true
            } else {
                ticket -= count;
                false
            }
        })
    }

    /// Checkpoint of the stream position.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.stream.get_word_pos(),
        }
    }

    /// Resume a stream from a checkpoint.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut stream = ChaCha8Rng::seed_from_u64(state.seed);
        stream.set_word_pos(state.word_pos);
        Self {
            stream,
            seed: state.seed,
        }
    }
}

/// Where a `GameRng` stands, for replay checkpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    pub word_pos: u128,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animals::ElementType;
    use crate::cards::Card;

    #[test]
    fn test_same_seed_same_deck() {
        let mut deck_a = Card::ALL.to_vec();
        let mut deck_b = Card::ALL.to_vec();
        GameRng::new(42).shuffle(&mut deck_a);
        GameRng::new(42).shuffle(&mut deck_b);
        assert_eq!(deck_a, deck_b);

        let mut deck_c = Card::ALL.to_vec();
        GameRng::new(43).shuffle(&mut deck_c);
        assert_ne!(deck_a, deck_c);
    }

    #[test]
    fn test_shuffle_keeps_every_card() {
        let mut deck = Card::ALL.to_vec();
        GameRng::new(9).shuffle(&mut deck);
        deck.sort_unstable();
        assert_eq!(deck, Card::ALL.to_vec());
    }

    #[test]
    fn test_next_index_bounds() {
        let mut rng = GameRng::new(3);
        assert_eq!(rng.next_index(0), 0);
        assert!((0..50).all(|_| rng.next_index(6) < 6));
    }

    #[test]
    fn test_choose_element() {
        let mut rng = GameRng::new(5);
        let elements = [ElementType::Grass, ElementType::Sun];
        let chosen = rng.choose(&elements).copied();
        assert!(chosen.is_some_and(|e| elements.contains(&e)));

        let none: [ElementType; 0] = [];
        assert_eq!(rng.choose(&none), None);
    }

    #[test]
    fn test_weighted_index_skips_empty_types() {
        let mut rng = GameRng::new(11);
        for _ in 0..20 {
            assert_eq!(rng.weighted_index(&[0, 0, 3, 0]), Some(2));
        }
        assert_eq!(rng.weighted_index(&[]), None);
        assert_eq!(rng.weighted_index(&[0, 0, 0]), None);
    }

    #[test]
    fn test_checkpoint_resumes_stream() {
        let mut rng = GameRng::new(8);
        for _ in 0..30 {
            rng.next_index(100);
        }
        let checkpoint = rng.state();
        let ahead: Vec<usize> = (0..8).map(|_| rng.next_index(100)).collect();

        let mut resumed = GameRng::from_state(&checkpoint);
        assert_eq!(resumed.seed(), 8);
        let replayed: Vec<usize> = (0..8).map(|_| resumed.next_index(100)).collect();
        assert_eq!(ahead, replayed);
    }

    #[test]
    fn test_checkpoint_serde() {
        let checkpoint = GameRng::new(21).state();
        let json = serde_json::to_string(&checkpoint).unwrap();
        let back: GameRngState = serde_json::from_str(&json).unwrap();
        assert_eq!(checkpoint, back);
    }
}

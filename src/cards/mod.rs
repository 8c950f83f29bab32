//! Dominance cards and their effects.

pub mod card;
mod effects;

pub use card::{Card, AVAILABLE_CARDS, INITIAL_DECK_SIZE};

//! Animal factions and their player-board state.

pub mod animal;
pub mod animal_type;

pub use animal::{Animal, Elements, INITIAL_SPECIES_ON_BOARD, MAX_ELEMENTS};
pub use animal_type::{AnimalMap, AnimalType, ElementType};

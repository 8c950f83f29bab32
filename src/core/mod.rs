//! Core engine types: players, RNG, errors, roster configuration.
//!
//! These are the pieces every other module builds on; none of them know
//! about the board or the action display.

pub mod config;
pub mod error;
pub mod player;
pub mod rng;

pub use config::{GameConfig, MAX_PLAYERS};
pub use error::{DominantSpeciesError, Result};
pub use player::PlayerId;
pub use rng::{GameRng, GameRngState};

//! The game aggregate, its phase controller and its command surface.
//!
//! ## Commands
//!
//! `perform`, `skip`, `end_turn`, `force_end_turn` and `leave` each run
//! against a snapshot: on success the fired events are dispatched to the
//! listeners and returned, on error the game is left exactly as it was.
//!
//! ## Phases
//!
//! Planning, Execution and Reset repeat until the Ice Age card has been
//! taken and the final Reset has scored every tile.

mod automa;
mod commands;
mod phases;
mod scoring;
mod state;

pub use scoring::bonus_vps;
pub use state::{Game, Phase, INITIAL_TUNDRA_TILES};

//! Rules engine trait for driving a game.
//!
//! Drivers program against `RulesEngine`:
//! - Which players act and what they may do
//! - Commands that either apply fully or not at all
//! - The final result
//!
//! `Game` is the only implementation.

pub mod engine;

pub use engine::{GameResult, RulesEngine};

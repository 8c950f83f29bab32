//! Actions: what a player submits and the rules that apply it.
//!
//! [`Action`] is the closed set of moves; [`ActionKind`] its type tag, which
//! is what the queue and the action display talk about.

pub mod action;
pub mod kind;
mod card_actions;
mod execution;

pub use action::{Action, ActionResult, ExodusMove, FollowUpActions, SpeciesMove, TileSpecies};
pub use card_actions::{AQUATIC_MAX_SPECIES, EVOLUTION_MAX_TILES, HIBERNATION_MAX_SPECIES};
pub use execution::{competition_tile_types, max_speciation, migration_max_species, speciation_element};
pub use kind::ActionKind;

pub(crate) use execution::distinct_elements;

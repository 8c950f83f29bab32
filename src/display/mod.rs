//! The action display and its action types.

pub mod action_display;
pub mod action_type;

pub use action_display::{ActionDisplay, ActionPawn, ELEMENTS_PER_BOX};
pub use action_type::{ActionType, FreeActionPawn};

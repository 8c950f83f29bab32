//! The action queue: pending possible actions in FIFO order.

pub mod action_queue;
pub mod possible_action;

pub use action_queue::ActionQueue;
pub use possible_action::{ActionKinds, PossibleAction, Requirement};

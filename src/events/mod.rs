//! Events fired by the game and the listeners that observe them.

pub mod event;
pub mod listener;

pub use event::{EventType, EventValue, GameEvent};
pub use listener::{EventListener, EventListeners, ListenerId};

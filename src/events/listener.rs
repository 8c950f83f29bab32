//! Event listener registry.
//!
//! Listeners are plain callbacks. They are invoked in registration order
//! after a command has completed, once per fired event.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::event::GameEvent;

/// Callback invoked for each fired event.
pub type EventListener = Arc<dyn Fn(&GameEvent) + Send + Sync>;

/// Handle returned on registration, used to unregister.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub u32);

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Listener({})", self.0)
    }
}

#[derive(Clone, Default)]
pub struct EventListeners {
    next_id: u32,
    listeners: Vec<(ListenerId, EventListener)>,
}

impl EventListeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: EventListener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Returns whether a listener was registered under `id`.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn dispatch(&self, events: &[GameEvent]) {
        for event in events {
            for (_, listener) in &self.listeners {
                listener(event);
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for EventListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventListeners")
            .field("next_id", &self.next_id)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animals::AnimalType;
    use crate::events::EventType;
    use std::sync::Mutex;

    #[test]
    fn test_dispatch_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut listeners = EventListeners::new();

        let a = Arc::clone(&seen);
        listeners.add(Arc::new(move |_: &GameEvent| a.lock().unwrap().push("a")));
        let b = Arc::clone(&seen);
        listeners.add(Arc::new(move |_: &GameEvent| b.lock().unwrap().push("b")));

        listeners.dispatch(&[GameEvent::new(EventType::GainActionPawn, AnimalType::Birds)]);

        assert_eq!(*seen.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_remove() {
        let mut listeners = EventListeners::new();
        let id = listeners.add(Arc::new(|_: &GameEvent| {}));

        assert_eq!(listeners.len(), 1);
        assert!(listeners.remove(id));
        assert!(!listeners.remove(id));
        assert!(listeners.is_empty());
    }
}

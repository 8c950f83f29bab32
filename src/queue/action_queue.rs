//! FIFO of pending possible actions.
//!
//! Only the head entry is ever actionable. Follow-ups produced by an action
//! are appended behind whatever is already waiting.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::possible_action::PossibleAction;
use crate::actions::ActionKind;
use crate::animals::AnimalType;
use crate::core::{DominantSpeciesError, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionQueue {
    actions: Vector<PossibleAction>,
}

impl ActionQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn initial(action: PossibleAction) -> Self {
        let mut queue = Self::new();
        queue.add(action);
        queue
    }

    #[must_use]
    pub fn next_possible_action(&self) -> Option<&PossibleAction> {
        self.actions.front()
    }

    #[must_use]
    pub fn next_animal(&self) -> Option<AnimalType> {
        self.next_possible_action().map(|pa| pa.animal)
    }

    #[must_use]
    pub fn can_perform(&self, animal: AnimalType, kind: ActionKind) -> bool {
        self.next_possible_action()
            .is_some_and(|pa| pa.can_be_performed_by(animal) && pa.can_perform(kind))
    }

    /// Consume the head entry for `kind`.
    pub fn perform(&mut self, animal: AnimalType, kind: ActionKind) -> Result<PossibleAction> {
        if !self.can_perform(animal, kind) {
            return Err(DominantSpeciesError::CannotPerformAction);
        }
        self.actions.pop_front().ok_or(DominantSpeciesError::CannotPerformAction)
    }

    #[must_use]
    pub fn can_skip(&self) -> bool {
        self.next_possible_action().is_some_and(PossibleAction::can_skip)
    }

    /// Drop the head entry if it is optional.
    pub fn skip(&mut self) -> Result<PossibleAction> {
        if !self.can_skip() {
            return Err(DominantSpeciesError::CannotSkipAction);
        }
        self.actions.pop_front().ok_or(DominantSpeciesError::CannotSkipAction)
    }

    /// Drop the head entry regardless of its requirement.
    pub(crate) fn forfeit(&mut self) -> Option<PossibleAction> {
        self.actions.pop_front()
    }

    pub fn add(&mut self, action: PossibleAction) {
        self.actions.push_back(action);
    }

    pub fn add_all(&mut self, actions: impl IntoIterator<Item = PossibleAction>) {
        self.actions.extend(actions);
    }

    /// Whether the head entry belongs to `animal`.
    #[must_use]
    pub fn has_actions(&self, animal: AnimalType) -> bool {
        self.next_possible_action().is_some_and(|pa| pa.can_be_performed_by(animal))
    }

    pub fn remove_all(&mut self, animal: AnimalType) {
        self.actions.retain(|pa| pa.animal != animal);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PossibleAction> {
        self.actions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_head_is_actionable() {
        let mut queue = ActionQueue::initial(PossibleAction::mandatory(AnimalType::Birds, ActionKind::Migration));
        queue.add(PossibleAction::optional(AnimalType::Mammals, ActionKind::Fertile));

        assert!(queue.can_perform(AnimalType::Birds, ActionKind::Migration));
        assert!(!queue.can_perform(AnimalType::Mammals, ActionKind::Fertile));
        assert_eq!(
            queue.perform(AnimalType::Mammals, ActionKind::Fertile),
            Err(DominantSpeciesError::CannotPerformAction)
        );
        assert_eq!(queue.skip(), Err(DominantSpeciesError::CannotSkipAction));

        queue.perform(AnimalType::Birds, ActionKind::Migration).unwrap();
        assert_eq!(queue.next_animal(), Some(AnimalType::Mammals));
        assert!(queue.can_skip());
        queue.skip().unwrap();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_add_appends() {
        let mut queue = ActionQueue::new();
        queue.add_all([
            PossibleAction::mandatory(AnimalType::Reptiles, ActionKind::Regression),
            PossibleAction::mandatory(AnimalType::Birds, ActionKind::Regression),
        ]);
        queue.add(PossibleAction::mandatory(AnimalType::Mammals, ActionKind::Regression));

        let order: Vec<_> = queue.iter().map(|pa| pa.animal).collect();
        assert_eq!(order, vec![AnimalType::Reptiles, AnimalType::Birds, AnimalType::Mammals]);
    }

    #[test]
    fn test_remove_all_for_animal() {
        let mut queue = ActionQueue::new();
        queue.add(PossibleAction::mandatory(AnimalType::Birds, ActionKind::RemoveElement));
        queue.add(PossibleAction::mandatory(AnimalType::Insects, ActionKind::RemoveElement));
        queue.add(PossibleAction::mandatory(AnimalType::Birds, ActionKind::RemoveActionPawn));

        queue.remove_all(AnimalType::Birds);

        assert_eq!(queue.len(), 1);
        assert!(queue.has_actions(AnimalType::Insects));
        assert!(!queue.has_actions(AnimalType::Birds));
    }

    #[test]
    fn test_empty_queue() {
        let mut queue = ActionQueue::new();
        assert_eq!(queue.next_animal(), None);
        assert!(!queue.can_skip());
        assert!(!queue.has_actions(AnimalType::Mammals));
        assert_eq!(queue.forfeit(), None);
    }
}

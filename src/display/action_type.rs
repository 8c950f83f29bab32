//! Action types: the rows of the action display.
//!
//! Declaration order is execution order. Each type has a number of pawn
//! spaces, of which only the first `executable` are carried out; Glaciation
//! has four spaces but only the leftmost executes each round.

use serde::{Deserialize, Serialize};

use crate::actions::ActionKind;
use crate::animals::AnimalType;

/// Space pre-filled for an animal at the start of every round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FreeActionPawn {
    pub animal: AnimalType,
    pub index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionType {
    Initiative,
    Adaptation,
    Regression,
    Abundance,
    Wasteland,
    Depletion,
    Glaciation,
    Speciation,
    Wanderlust,
    Migration,
    Competition,
    Domination,
}

impl ActionType {
    pub const EXECUTION_ORDER: [ActionType; 12] = [
        ActionType::Initiative,
        ActionType::Adaptation,
        ActionType::Regression,
        ActionType::Abundance,
        ActionType::Wasteland,
        ActionType::Depletion,
        ActionType::Glaciation,
        ActionType::Speciation,
        ActionType::Wanderlust,
        ActionType::Migration,
        ActionType::Competition,
        ActionType::Domination,
    ];

    /// Types with an element box.
    pub const WITH_ELEMENTS: [ActionType; 6] = [
        ActionType::Adaptation,
        ActionType::Regression,
        ActionType::Abundance,
        ActionType::Wasteland,
        ActionType::Depletion,
        ActionType::Wanderlust,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Number of pawn spaces.
    #[must_use]
    pub const fn capacity(self) -> usize {
        match self {
            ActionType::Initiative | ActionType::Wasteland | ActionType::Depletion => 1,
            ActionType::Abundance => 2,
            ActionType::Adaptation | ActionType::Regression | ActionType::Wanderlust => 3,
            ActionType::Glaciation => 4,
            ActionType::Domination => 5,
            ActionType::Migration => 6,
            ActionType::Speciation => 7,
            ActionType::Competition => 8,
        }
    }

    /// Number of leading spaces that are carried out.
    #[must_use]
    pub const fn executable(self) -> usize {
        match self {
            ActionType::Glaciation => 1,
            other => other.capacity(),
        }
    }

    #[must_use]
    pub const fn free_action_pawn(self) -> Option<FreeActionPawn> {
        match self {
            ActionType::Regression => Some(FreeActionPawn { animal: AnimalType::Reptiles, index: 2 }),
            ActionType::Speciation => Some(FreeActionPawn { animal: AnimalType::Insects, index: 6 }),
            ActionType::Competition => Some(FreeActionPawn { animal: AnimalType::Arachnids, index: 0 }),
            _ => None,
        }
    }

    /// Whether the pawn of `animal` at `index` is this type's free pawn.
    #[must_use]
    pub fn is_free_action_pawn(self, animal: AnimalType, index: usize) -> bool {
        self.free_action_pawn()
            .is_some_and(|free| free.animal == animal && free.index == index)
    }

    /// Kind of the follow-up a pawn on this type yields. Initiative pawns
    /// resolve during activation and have none.
    #[must_use]
    pub const fn action_kind(self) -> Option<ActionKind> {
        Some(match self {
            ActionType::Initiative => return None,
            ActionType::Adaptation => ActionKind::Adaptation,
            ActionType::Regression => ActionKind::Regression,
            ActionType::Abundance => ActionKind::Abundance,
            ActionType::Wasteland => ActionKind::Wasteland,
            ActionType::Depletion => ActionKind::Depletion,
            ActionType::Glaciation => ActionKind::Glaciation,
            ActionType::Speciation => ActionKind::Speciation,
            ActionType::Wanderlust => ActionKind::Wanderlust,
            ActionType::Migration => ActionKind::Migration,
            ActionType::Competition => ActionKind::Competition,
            ActionType::Domination => ActionKind::Domination,
        })
    }

    /// Types that run an effect when execution reaches them.
    #[must_use]
    pub const fn has_activation(self) -> bool {
        matches!(self, ActionType::Initiative | ActionType::Regression)
    }

    #[must_use]
    pub const fn has_element_box(self) -> bool {
        matches!(
            self,
            ActionType::Adaptation
                | ActionType::Regression
                | ActionType::Abundance
                | ActionType::Wasteland
                | ActionType::Depletion
                | ActionType::Wanderlust
        )
    }

    /// The type executed after this one.
    #[must_use]
    pub fn next(self) -> Option<ActionType> {
        Self::EXECUTION_ORDER.get(self.index() + 1).copied()
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_order_matches_declaration() {
        for (i, t) in ActionType::EXECUTION_ORDER.iter().enumerate() {
            assert_eq!(t.index(), i);
        }
        assert_eq!(ActionType::Initiative.next(), Some(ActionType::Adaptation));
        assert_eq!(ActionType::Domination.next(), None);
    }

    #[test]
    fn test_glaciation_executes_one() {
        assert_eq!(ActionType::Glaciation.capacity(), 4);
        assert_eq!(ActionType::Glaciation.executable(), 1);
    }

    #[test]
    fn test_free_pawns() {
        assert!(ActionType::Regression.is_free_action_pawn(AnimalType::Reptiles, 2));
        assert!(!ActionType::Regression.is_free_action_pawn(AnimalType::Reptiles, 0));
        assert!(!ActionType::Competition.is_free_action_pawn(AnimalType::Birds, 0));
        assert!(ActionType::Competition.is_free_action_pawn(AnimalType::Arachnids, 0));
        assert_eq!(ActionType::Migration.free_action_pawn(), None);
    }

    #[test]
    fn test_action_kinds() {
        assert_eq!(ActionType::Initiative.action_kind(), None);
        assert_eq!(ActionType::Domination.action_kind(), Some(ActionKind::Domination));
    }

    #[test]
    fn test_element_boxes() {
        for t in ActionType::WITH_ELEMENTS {
            assert!(t.has_element_box());
        }
        assert!(!ActionType::Glaciation.has_element_box());
    }
}

//! Queue entries: who must or may act next, and with which action kinds.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::actions::ActionKind;
use crate::animals::AnimalType;

/// Kinds offered by a choice entry.
pub type ActionKinds = SmallVec<[ActionKind; 3]>;

/// How an entry constrains its animal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Requirement {
    /// Must be performed; cannot be skipped.
    Mandatory(ActionKind),
    /// May be performed or skipped.
    Optional(ActionKind),
    /// Exactly one of the kinds must be performed.
    Choice(ActionKinds),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PossibleAction {
    pub animal: AnimalType,
    pub requirement: Requirement,
}

impl PossibleAction {
    #[must_use]
    pub fn mandatory(animal: AnimalType, kind: ActionKind) -> Self {
        Self { animal, requirement: Requirement::Mandatory(kind) }
    }

    #[must_use]
    pub fn optional(animal: AnimalType, kind: ActionKind) -> Self {
        Self { animal, requirement: Requirement::Optional(kind) }
    }

    #[must_use]
    pub fn choice(animal: AnimalType, kinds: impl IntoIterator<Item = ActionKind>) -> Self {
        Self { animal, requirement: Requirement::Choice(kinds.into_iter().collect()) }
    }

    #[must_use]
    pub fn can_skip(&self) -> bool {
        matches!(self.requirement, Requirement::Optional(_))
    }

    #[must_use]
    pub fn can_perform(&self, kind: ActionKind) -> bool {
        match &self.requirement {
            Requirement::Mandatory(k) | Requirement::Optional(k) => *k == kind,
            Requirement::Choice(kinds) => kinds.contains(&kind),
        }
    }

    #[must_use]
    pub fn can_be_performed_by(&self, animal: AnimalType) -> bool {
        self.animal == animal
    }

    /// The kinds this entry accepts, first one first.
    #[must_use]
    pub fn kinds(&self) -> ActionKinds {
        match &self.requirement {
            Requirement::Mandatory(k) | Requirement::Optional(k) => smallvec![*k],
            Requirement::Choice(kinds) => kinds.clone(),
        }
    }
}

//! Action kinds: the type tag of every move variant.
//!
//! Queue entries and action spaces name kinds, not concrete actions. A kind
//! says *what* may be done next; the `Action` payload says *how*.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionKind {
    PlaceActionPawn,
    Adaptation,
    Regression,
    Abundance,
    Wasteland,
    Depletion,
    Glaciation,
    Speciation,
    Wanderlust,
    WanderlustMove,
    Migration,
    Competition,
    Domination,
    DominanceCard,
    RemoveElement,
    RemoveActionPawn,
    RemoveAllBut1SpeciesOnEachTile,
    Aquatic,
    Biomass,
    Blight,
    Catastrophe,
    Evolution,
    Fecundity,
    Fertile,
    Habitat,
    Hibernation,
    MassExodus,
    Metamorphosis,
    Predator,
    SaveFromExtinction,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

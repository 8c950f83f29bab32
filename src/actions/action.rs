//! The closed set of moves a player can submit.
//!
//! Each variant carries exactly the choices its rule needs. Applying an
//! action checks its preconditions before touching state and reports the
//! follow-ups it queues in an [`ActionResult`].

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::kind::ActionKind;
use crate::animals::{AnimalType, ElementType};
use crate::board::{Corner, Hex};
use crate::cards::Card;
use crate::core::{GameRng, Result};
use crate::display::ActionType;
use crate::game::Game;
use crate::queue::PossibleAction;

/// Follow-ups an action appends to the queue, in order.
pub type FollowUpActions = SmallVec<[PossibleAction; 4]>;

/// Species moved from one tile to another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpeciesMove {
    pub from: Hex,
    pub to: Hex,
    pub species: u32,
}

/// Species taken from a tile into the most recently placed tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileSpecies {
    pub hex: Hex,
    pub species: u32,
}

/// Species of any animal pushed off a tile by Mass Exodus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExodusMove {
    pub to: Hex,
    pub animal: AnimalType,
    pub species: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    PlaceActionPawn {
        action_type: ActionType,
        index: usize,
    },
    Adaptation {
        element: ElementType,
    },
    /// Element types in the Regression box the animal protects.
    Regression {
        skip: Vec<ElementType>,
    },
    Abundance {
        element: ElementType,
        corner: Corner,
    },
    Wasteland {
        element: ElementType,
    },
    Depletion {
        corner: Corner,
    },
    Glaciation {
        hex: Hex,
    },
    /// `corner` names the element the tiles surround; the Insects' free
    /// pawn needs none.
    Speciation {
        corner: Option<Corner>,
        tiles: Vec<Hex>,
        species: Vec<u32>,
    },
    Wanderlust {
        stack: usize,
        hex: Hex,
        element: Option<(ElementType, Corner)>,
    },
    WanderlustMove {
        moves: Vec<TileSpecies>,
    },
    Migration {
        moves: Vec<SpeciesMove>,
    },
    Competition {
        tiles: Vec<Hex>,
        animals: Vec<AnimalType>,
    },
    Domination {
        hex: Hex,
    },
    DominanceCard {
        card: Card,
    },
    RemoveElement {
        element: ElementType,
    },
    RemoveActionPawn,
    RemoveAllBut1SpeciesOnEachTile,
    Aquatic {
        element: ElementType,
        corner: Corner,
        tile: Option<Hex>,
        species: u32,
    },
    Biomass {
        tiles: Vec<Hex>,
        animals: Vec<AnimalType>,
    },
    Blight {
        hex: Hex,
        corners: Vec<Corner>,
    },
    /// `adjacent` must list every tile around `hex`, each with the animal
    /// that loses a species there (ignored on empty tiles).
    Catastrophe {
        hex: Hex,
        keep: Option<AnimalType>,
        adjacent: Vec<(Hex, Option<AnimalType>)>,
    },
    Evolution {
        tiles: Vec<Hex>,
        animals: Vec<AnimalType>,
    },
    Fecundity {
        tiles: Vec<Hex>,
    },
    Fertile {
        hex: Hex,
    },
    Habitat {
        element: ElementType,
        corner: Corner,
    },
    Hibernation {
        hex: Hex,
        species: u32,
    },
    MassExodus {
        from: Hex,
        moves: Vec<ExodusMove>,
    },
    Metamorphosis {
        from: ElementType,
        to: ElementType,
    },
    Predator {
        tiles: Vec<Hex>,
        animals: Vec<AnimalType>,
    },
    SaveFromExtinction {
        hex: Hex,
    },
}

impl Action {
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::PlaceActionPawn { .. } => ActionKind::PlaceActionPawn,
            Action::Adaptation { .. } => ActionKind::Adaptation,
            Action::Regression { .. } => ActionKind::Regression,
            Action::Abundance { .. } => ActionKind::Abundance,
            Action::Wasteland { .. } => ActionKind::Wasteland,
            Action::Depletion { .. } => ActionKind::Depletion,
            Action::Glaciation { .. } => ActionKind::Glaciation,
            Action::Speciation { .. } => ActionKind::Speciation,
            Action::Wanderlust { .. } => ActionKind::Wanderlust,
            Action::WanderlustMove { .. } => ActionKind::WanderlustMove,
            Action::Migration { .. } => ActionKind::Migration,
            Action::Competition { .. } => ActionKind::Competition,
            Action::Domination { .. } => ActionKind::Domination,
            Action::DominanceCard { .. } => ActionKind::DominanceCard,
            Action::RemoveElement { .. } => ActionKind::RemoveElement,
            Action::RemoveActionPawn => ActionKind::RemoveActionPawn,
            Action::RemoveAllBut1SpeciesOnEachTile => ActionKind::RemoveAllBut1SpeciesOnEachTile,
            Action::Aquatic { .. } => ActionKind::Aquatic,
            Action::Biomass { .. } => ActionKind::Biomass,
            Action::Blight { .. } => ActionKind::Blight,
            Action::Catastrophe { .. } => ActionKind::Catastrophe,
            Action::Evolution { .. } => ActionKind::Evolution,
            Action::Fecundity { .. } => ActionKind::Fecundity,
            Action::Fertile { .. } => ActionKind::Fertile,
            Action::Habitat { .. } => ActionKind::Habitat,
            Action::Hibernation { .. } => ActionKind::Hibernation,
            Action::MassExodus { .. } => ActionKind::MassExodus,
            Action::Metamorphosis { .. } => ActionKind::Metamorphosis,
            Action::Predator { .. } => ActionKind::Predator,
            Action::SaveFromExtinction { .. } => ActionKind::SaveFromExtinction,
        }
    }

    /// Apply to the game on behalf of its current animal.
    ///
    /// Queue bookkeeping is the caller's job; this only runs the rule.
    pub fn apply(&self, game: &mut Game, rng: &mut GameRng) -> Result<ActionResult> {
        match self {
            Action::PlaceActionPawn { action_type, index } => game.apply_place_action_pawn(*action_type, *index),
            Action::Adaptation { element } => game.apply_adaptation(*element),
            Action::Regression { skip } => game.apply_regression(skip),
            Action::Abundance { element, corner } => game.apply_abundance(*element, *corner),
            Action::Wasteland { element } => game.apply_wasteland(*element),
            Action::Depletion { corner } => game.apply_depletion(*corner),
            Action::Glaciation { hex } => game.apply_glaciation(*hex),
            Action::Speciation { corner, tiles, species } => game.apply_speciation(*corner, tiles, species),
            Action::Wanderlust { stack, hex, element } => game.apply_wanderlust(*stack, *hex, *element),
            Action::WanderlustMove { moves } => game.apply_wanderlust_move(moves),
            Action::Migration { moves } => game.apply_migration(moves),
            Action::Competition { tiles, animals } => game.apply_competition(tiles, animals),
            Action::Domination { hex } => game.apply_domination(*hex),
            Action::DominanceCard { card } => game.apply_dominance_card(*card, rng),
            Action::RemoveElement { element } => game.apply_remove_element(*element),
            Action::RemoveActionPawn => game.apply_remove_action_pawn(),
            Action::RemoveAllBut1SpeciesOnEachTile => game.apply_remove_all_but_1_species(),
            Action::Aquatic { element, corner, tile, species } => {
                game.apply_aquatic(*element, *corner, *tile, *species)
            }
            Action::Biomass { tiles, animals } => game.apply_biomass(tiles, animals),
            Action::Blight { hex, corners } => game.apply_blight(*hex, corners),
            Action::Catastrophe { hex, keep, adjacent } => game.apply_catastrophe(*hex, *keep, adjacent),
            Action::Evolution { tiles, animals } => game.apply_evolution(tiles, animals),
            Action::Fecundity { tiles } => game.apply_fecundity(tiles),
            Action::Fertile { hex } => game.apply_fertile(*hex),
            Action::Habitat { element, corner } => game.apply_habitat(*element, *corner),
            Action::Hibernation { hex, species } => game.apply_hibernation(*hex, *species),
            Action::MassExodus { from, moves } => game.apply_mass_exodus(*from, moves),
            Action::Metamorphosis { from, to } => game.apply_metamorphosis(*from, *to),
            Action::Predator { tiles, animals } => game.apply_predator(tiles, animals),
            Action::SaveFromExtinction { hex } => game.apply_save_from_extinction(*hex),
        }
    }

    /// Check the rule without changing `game`.
    ///
    /// Runs the action against a clone; the persistent game state makes the
    /// clone cheap.
    pub fn validate(&self, game: &Game) -> Result<()> {
        let mut trial = game.clone();
        let mut rng = GameRng::new(0);
        self.apply(&mut trial, &mut rng).map(|_| ())
    }
}

/// Outcome of applying an action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionResult {
    pub can_undo: bool,
    pub follow_ups: FollowUpActions,
}

impl ActionResult {
    #[must_use]
    pub fn undo_allowed() -> Self {
        Self { can_undo: true, follow_ups: FollowUpActions::new() }
    }

    #[must_use]
    pub fn undo_not_allowed() -> Self {
        Self { can_undo: false, follow_ups: FollowUpActions::new() }
    }

    /// Append a follow-up (builder pattern).
    #[must_use]
    pub fn with_follow_up(mut self, follow_up: PossibleAction) -> Self {
        self.follow_ups.push(follow_up);
        self
    }

    /// Append several follow-ups (builder pattern).
    #[must_use]
    pub fn with_follow_ups(mut self, follow_ups: impl IntoIterator<Item = PossibleAction>) -> Self {
        self.follow_ups.extend(follow_ups);
        self
    }
}

//! Game events.
//!
//! Every observable change fires an event tagged with the animal it concerns
//! and that animal's player. Events carry typed values in a fixed order per
//! event type; the order is documented on each `EventType` variant.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::animals::{AnimalType, ElementType};
use crate::board::{Corner, Hex, TileType};
use crate::cards::Card;
use crate::core::PlayerId;
use crate::display::ActionType;

/// What happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    // Phases
    /// [round]
    PlanningPhase,
    /// [round]
    ExecutionPhase,
    /// [action type]
    Executing,
    /// [round]
    ResetPhase,
    /// [species, hex, tile type]
    Extinction,

    // Actions
    /// [action type, 1-based space]
    PlaceActionPawn,
    /// [1-based position]
    Initiative,
    /// [element, corner]
    Abundance,
    /// [element]
    Adaptation,
    /// [element, corner]
    Depletion,
    /// [species, from, from type, to, to type]
    Migration,
    /// [action pawns, element types in regression box]
    Regression,
    /// [element]
    SkipRegressionOfElement,
    /// [hex, tile type]
    Glaciation,
    /// [species, hex, tile type]
    Speciation,
    /// [1-based stack, tile type, hex]
    Wanderlust,
    /// [animal, hex, tile type]
    Competition,
    /// [element]
    Wasteland,
    /// [hex, tile type, dominant animal or empty]
    Domination,
    /// [card]
    Card,

    // Cards
    /// [species, hex, tile type]
    Hibernation,
    /// [animal kept, hex, tile type]
    Catastrophe,

    // Animal
    /// []
    GainActionPawn,
    /// []
    RemoveActionPawn,
    /// [element]
    AddElementToAnimal,
    /// [element]
    RemoveElementFromAnimal,
    /// [vps]
    GainVps,
    /// [vps, hex, tile type]
    GainVpsFromTile,
    /// [vps]
    GainBonusVps,
    /// [vps]
    LoseVps,

    // Earth
    /// [element, corner]
    AddElement,
    /// [element, corner]
    RemoveElement,
    /// [species, hex, tile type]
    AddSpecies,
    /// [animal, species, hex, tile type]
    RemoveSpecies,
    /// [animal, species, hex, tile type]
    EliminateSpecies,
    /// [animal, species, from, from type, to, to type]
    MoveSpecies,

    /// [round]
    FinalScoring,
    /// [hex, tile type]
    SaveFromExtinction,
}

/// A single typed event parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventValue {
    Number(u32),
    Animal(AnimalType),
    Element(ElementType),
    Hex(Hex),
    Corner(Corner),
    Tile(TileType),
    ActionType(ActionType),
    Card(Card),
    Empty,
}

impl From<u32> for EventValue {
    fn from(value: u32) -> Self {
        EventValue::Number(value)
    }
}

impl From<AnimalType> for EventValue {
    fn from(value: AnimalType) -> Self {
        EventValue::Animal(value)
    }
}

impl From<ElementType> for EventValue {
    fn from(value: ElementType) -> Self {
        EventValue::Element(value)
    }
}

impl From<Hex> for EventValue {
    fn from(value: Hex) -> Self {
        EventValue::Hex(value)
    }
}

impl From<Corner> for EventValue {
    fn from(value: Corner) -> Self {
        EventValue::Corner(value)
    }
}

impl From<TileType> for EventValue {
    fn from(value: TileType) -> Self {
        EventValue::Tile(value)
    }
}

impl From<ActionType> for EventValue {
    fn from(value: ActionType) -> Self {
        EventValue::ActionType(value)
    }
}

impl From<Card> for EventValue {
    fn from(value: Card) -> Self {
        EventValue::Card(value)
    }
}

impl<T: Into<EventValue>> From<Option<T>> for EventValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(EventValue::Empty, Into::into)
    }
}

/// An event with its parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub event_type: EventType,

    /// Animal the event concerns.
    pub animal: AnimalType,

    /// Player controlling `animal`.
    pub player: Option<PlayerId>,

    pub values: SmallVec<[EventValue; 6]>,
}

impl GameEvent {
    pub fn new(event_type: EventType, animal: AnimalType) -> Self {
        Self {
            event_type,
            animal,
            player: None,
            values: SmallVec::new(),
        }
    }

    /// Set the player (builder pattern).
    #[must_use]
    pub fn with_player(mut self, player: PlayerId) -> Self {
        self.player = Some(player);
        self
    }

    /// Append a value (builder pattern).
    #[must_use]
    pub fn with(mut self, value: impl Into<EventValue>) -> Self {
        self.values.push(value.into());
        self
    }

    #[must_use]
    pub fn value(&self, index: usize) -> Option<EventValue> {
        self.values.get(index).copied()
    }

    /// The value at `index` if it is a number.
    #[must_use]
    pub fn number(&self, index: usize) -> Option<u32> {
        match self.value(index) {
            Some(EventValue::Number(n)) => Some(n),
            _ => None,
        }
    }
}

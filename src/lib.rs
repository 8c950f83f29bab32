//! # dominant-species
//!
//! A deterministic rules engine for the Dominant Species board game.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Every random draw goes through a seeded `GameRng`.
//!    The same seed and the same commands always produce the same game.
//!
//! 2. **All or nothing**: A command either applies fully or leaves the game
//!    untouched. Errors are values, never panics.
//!
//! 3. **Closed action set**: Moves are a single `Action` enum; the action
//!    queue says which kinds the current animal may perform next.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) cloning via `im-rs`, used for
//!   snapshot rollback and for validating actions against a copy.
//!
//! - **Events**: Every state change fires a `GameEvent`; registered
//!   listeners receive them once a command succeeds.
//!
//! ## Modules
//!
//! - `core`: Players, configuration, RNG, errors
//! - `board`: Hex grid, corners, tiles and the shared Earth board
//! - `animals`: Animal types, elements and per-animal state
//! - `supply`: Element draw bag and wanderlust tile stacks
//! - `display`: The action display and its pawn spaces
//! - `queue`: Pending possible actions
//! - `actions`: The `Action` enum and the rules that apply it
//! - `cards`: Dominance cards and their effects
//! - `events`: Game events and listeners
//! - `game`: The game aggregate, phases, scoring and commands
//! - `rules`: `RulesEngine` trait for drivers

pub mod core;
pub mod board;
pub mod animals;
pub mod supply;
pub mod display;
pub mod queue;
pub mod actions;
pub mod cards;
pub mod events;
pub mod game;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    GameConfig, MAX_PLAYERS, PlayerId,
    GameRng, GameRngState,
    DominantSpeciesError, Result,
};

pub use crate::board::{Board, Corner, Hex, Tile, TileType};

pub use crate::animals::{Animal, AnimalType, ElementType};

pub use crate::supply::{DrawBag, WanderlustTiles};

pub use crate::display::{ActionDisplay, ActionPawn, ActionType};

pub use crate::queue::{ActionQueue, PossibleAction, Requirement};

pub use crate::actions::{Action, ActionKind, ActionResult, ExodusMove, SpeciesMove, TileSpecies};

pub use crate::cards::Card;

pub use crate::events::{EventListener, EventType, EventValue, GameEvent, ListenerId};

pub use crate::game::{bonus_vps, Game, Phase};

pub use crate::rules::{GameResult, RulesEngine};

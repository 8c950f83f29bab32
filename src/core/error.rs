//! Rule violation errors.
//!
//! Every failed command reports exactly one reason from a closed set. These
//! are expected, caller-recoverable conditions: a client that consulted
//! `possible_actions` and the board queries first never sees them.

use serde::{Deserialize, Serialize};

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, DominantSpeciesError>;

/// Reason a command or internal mutation was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum DominantSpeciesError {
    // Roster
    #[error("at least 1 player is required")]
    Min1Player,
    #[error("at most 6 players are allowed")]
    Max6Players,
    #[error("player does not control an animal in this game")]
    InvalidPlayer,
    #[error("player is not the current player")]
    NotCurrentPlayer,
    #[error("animal is not playing")]
    AnimalNotFound,
    #[error("game has ended")]
    GameEnded,

    // Queue
    #[error("action cannot be performed now")]
    CannotPerformAction,
    #[error("action cannot be skipped")]
    CannotSkipAction,

    // Animal
    #[error("no action pawn available")]
    NoActionPawn,
    #[error("maximum number of elements reached")]
    MaxElementsReached,
    #[error("not enough species in gene pool")]
    NotEnoughSpeciesInGenePool,
    #[error("not enough eliminated species")]
    NotEnoughEliminatedSpecies,
    #[error("element cannot be removed")]
    CannotRemoveElement,

    // Board
    #[error("there is already an element at this corner")]
    AlreadyElementAtCorner,
    #[error("no element at corner")]
    NoElementAtCorner,
    #[error("must be adjacent to a tile")]
    MustBeAdjacentToTile,
    #[error("there is already a tile at this hex")]
    AlreadyTileAtHex,
    #[error("hex is not on the board")]
    InvalidHex,
    #[error("hexes do not form a corner")]
    InvalidCorner,
    #[error("tile not found")]
    TileNotFound,
    #[error("tile is already tundra")]
    AlreadyTundra,
    #[error("species must be positive")]
    SpeciesMustBePositive,
    #[error("not enough species on tile")]
    NotEnoughSpeciesOnTile,

    // Supplies
    #[error("card is not available")]
    CardNotAvailable,
    #[error("no tundra tile available")]
    NoTundraTileAvailable,
    #[error("no elements in draw bag")]
    NoElementsInDrawBag,
    #[error("element is not in draw bag")]
    ElementNotInDrawBag,
    #[error("no wanderlust tile available")]
    NoTileAvailable,

    // Action display
    #[error("action space not allowed")]
    ActionSpaceNotAllowed,
    #[error("invalid action space")]
    InvalidActionSpace,
    #[error("action space is not empty")]
    ActionSpaceNotEmpty,
    #[error("action space is empty")]
    ActionSpaceEmpty,
    #[error("element is not available")]
    ElementNotAvailable,

    // Actions
    #[error("cannot skip more element types than action pawns placed")]
    CannotSkipMoreElementTypesThanActionPawnsPlaced,
    #[error("element is not in depletion box")]
    ElementNotInDepletionBox,
    #[error("must be adjacent to tundra tile")]
    MustBeAdjacentToTundraTile,
    #[error("must select at least 1 tile")]
    MustSelectAtLeast1Tile,
    #[error("must specify species for each tile")]
    MustSpecifySpeciesForEachTile,
    #[error("must select 1 tile")]
    MustSelect1Tile,
    #[error("maximum species exceeded")]
    MaxSpeciesExceeded,
    #[error("must select up to 3 tiles")]
    MustSelectUpTo3Tiles,
    #[error("element not found")]
    ElementNotFound,
    #[error("invalid element type")]
    InvalidElementType,
    #[error("must be adjacent to element")]
    MustBeAdjacentToElement,
    #[error("invalid move")]
    InvalidMove,
    #[error("no tile selected")]
    NoTileSelected,
    #[error("maximum distance exceeded")]
    MaxDistanceExceeded,
    #[error("cannot move through blank hex")]
    CannotMoveThroughBlankHex,
    #[error("must select animal for each tile")]
    MustSelectAnimalForEachTile,
    #[error("not opposing species")]
    NotOpposingSpecies,
    #[error("invalid tile")]
    InvalidTile,
    #[error("duplicate tile types")]
    DuplicateTileTypes,
    #[error("tile already scored")]
    TileAlreadyScored,

    // Card follow-ups
    #[error("invalid species")]
    InvalidSpecies,
    #[error("at most 4 species allowed")]
    Max4SpeciesAllowed,
    #[error("must be adjacent to aquatic tile")]
    MustBeAdjacentToAquaticTile,
    #[error("duplicate tiles")]
    DuplicateTiles,
    #[error("must select all affected tiles")]
    MustSelectAllAffectedTiles,
    #[error("must select all but 1 element on tile")]
    MustSelectAllBut1ElementOnTile,
    #[error("must select all adjacent tiles")]
    MustSelectAllAdjacentTiles,
    #[error("must select up to 2 tiles")]
    MustSelectUpTo2Tiles,
    #[error("must select different players")]
    MustSelectDifferentPlayers,
    #[error("at most 5 eliminated species allowed")]
    Max5EliminatedSpeciesAllowed,
    #[error("must move all species on tile")]
    MustMoveAllSpeciesOnTile,
    #[error("must select adjacent tiles")]
    MustSelectAdjacentTiles,
    #[error("no tile scored")]
    NoTileScored,
    #[error("must be mammals")]
    MustBeMammals,
    #[error("tile not occupied by player")]
    TileNotOccupiedByPlayer,
    #[error("must select all tiles occupied by player")]
    MustSelectAllTilesOccupiedByPlayer,
    #[error("must select opposing species")]
    MustSelectOpposingSpecies,
}

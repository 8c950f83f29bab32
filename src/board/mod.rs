//! Board geometry and the tiles and elements placed on it.
//!
//! - `hex`: axial coordinates, distance, the fixed board outline
//! - `corner`: unordered triples of mutually adjacent hexes
//! - `tile`: terrain, occupancy, dominance, scoring, extinction
//! - `earth`: the sparse board of placed tiles and corner elements

pub mod corner;
pub mod earth;
pub mod hex;
pub mod tile;

pub use corner::Corner;
pub use earth::{
    AdjacentElements, Board, INITIAL_DESERT, INITIAL_FOREST, INITIAL_JUNGLE, INITIAL_MOUNTAIN,
    INITIAL_SAVANNAH, INITIAL_SEA, INITIAL_WETLAND,
};
pub use hex::{board_hexes, Hex};
pub use tile::{Tile, TileType};

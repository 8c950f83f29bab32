//! The shared board ("Earth"): placed tiles and corner elements.
//!
//! Both maps are sparse and persistent (`im::OrdMap`), so cloning the board
//! for a rollback snapshot is O(1) and iteration order is deterministic.

use im::OrdMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::corner::Corner;
use super::hex::{board_hexes, Hex};
use super::tile::{Tile, TileType};
use crate::animals::{Animal, AnimalType, ElementType};
use crate::core::{DominantSpeciesError, Result};

pub const INITIAL_SEA: Hex = Hex::new(0, 0);
pub const INITIAL_JUNGLE: Hex = Hex::new(-1, 0);
pub const INITIAL_WETLAND: Hex = Hex::new(0, -1);
pub const INITIAL_SAVANNAH: Hex = Hex::new(1, -1);
pub const INITIAL_FOREST: Hex = Hex::new(-1, 1);
pub const INITIAL_MOUNTAIN: Hex = Hex::new(0, 1);
pub const INITIAL_DESERT: Hex = Hex::new(1, 0);

/// Adjacent element types of a hex, one entry per element.
pub type AdjacentElements = SmallVec<[ElementType; 6]>;

/// Placed tiles and elements.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    tiles: OrdMap<Hex, Tile>,
    elements: OrdMap<Corner, ElementType>,
    last_placed_tile: Option<Hex>,
}

impl Board {
    /// The printed starting board with species for the animals in play.
    pub fn initial(animals: &[AnimalType]) -> Result<Self> {
        let mut board = Board::default();

        for (hex, tile_type, tundra) in [
            (INITIAL_JUNGLE, TileType::Jungle, false),
            (INITIAL_WETLAND, TileType::Wetland, false),
            (INITIAL_SAVANNAH, TileType::Savannah, false),
            (INITIAL_SEA, TileType::Sea, true),
            (INITIAL_FOREST, TileType::Forest, false),
            (INITIAL_MOUNTAIN, TileType::Mountain, false),
            (INITIAL_DESERT, TileType::Desert, false),
        ] {
            board.tiles.insert(hex, Tile::initial(tile_type, tundra));
        }

        for &animal in animals {
            let [two, one_a, one_b] = initial_species_hexes(animal);
            board.tile_mut(two)?.add_species(animal, 2)?;
            board.tile_mut(one_a)?.add_species(animal, 1)?;
            board.tile_mut(one_b)?.add_species(animal, 1)?;
        }

        use ElementType::*;
        let corner = Corner::new;
        for (c, element) in [
            (corner(INITIAL_JUNGLE, INITIAL_WETLAND, INITIAL_SEA)?, Grub),
            (corner(INITIAL_JUNGLE, INITIAL_FOREST, Hex::new(-2, 1))?, Grub),
            (corner(INITIAL_SAVANNAH, INITIAL_WETLAND, INITIAL_SEA)?, Water),
            (corner(INITIAL_JUNGLE, INITIAL_WETLAND, Hex::new(-1, -1))?, Water),
            (corner(INITIAL_SAVANNAH, INITIAL_DESERT, INITIAL_SEA)?, Grass),
            (corner(INITIAL_SAVANNAH, INITIAL_WETLAND, Hex::new(1, -2))?, Grass),
            (corner(INITIAL_MOUNTAIN, INITIAL_DESERT, INITIAL_SEA)?, Sun),
            (corner(INITIAL_SAVANNAH, INITIAL_DESERT, Hex::new(2, -1))?, Sun),
            (corner(INITIAL_MOUNTAIN, INITIAL_FOREST, INITIAL_SEA)?, Meat),
            (corner(INITIAL_MOUNTAIN, INITIAL_DESERT, Hex::new(1, 1))?, Meat),
            (corner(INITIAL_JUNGLE, INITIAL_FOREST, INITIAL_SEA)?, Seed),
            (corner(INITIAL_FOREST, INITIAL_MOUNTAIN, Hex::new(-1, 2))?, Seed),
        ] {
            board.elements.insert(c, element);
        }

        Ok(board)
    }

    #[must_use]
    pub fn tiles(&self) -> &OrdMap<Hex, Tile> {
        &self.tiles
    }

    #[must_use]
    pub fn tile(&self, hex: Hex) -> Option<&Tile> {
        self.tiles.get(&hex)
    }

    pub fn tile_mut(&mut self, hex: Hex) -> Result<&mut Tile> {
        self.tiles.get_mut(&hex).ok_or(DominantSpeciesError::TileNotFound)
    }

    #[must_use]
    pub fn has_tile(&self, hex: Hex) -> bool {
        self.tiles.contains_key(&hex)
    }

    #[must_use]
    pub fn elements(&self) -> &OrdMap<Corner, ElementType> {
        &self.elements
    }

    #[must_use]
    pub fn element(&self, corner: Corner) -> Option<ElementType> {
        self.elements.get(&corner).copied()
    }

    #[must_use]
    pub fn last_placed_tile(&self) -> Option<Hex> {
        self.last_placed_tile
    }

    pub(crate) fn clear_last_placed_tile(&mut self) {
        self.last_placed_tile = None;
    }

    /// Checks the preconditions of `add_tile` without placing anything.
    pub fn check_tile_placement(&self, hex: Hex) -> Result<()> {
        if self.has_tile(hex) {
            return Err(DominantSpeciesError::AlreadyTileAtHex);
        }
        if !hex.is_on_board() {
            return Err(DominantSpeciesError::InvalidHex);
        }
        if self.adjacent_tiles(hex).next().is_none() {
            return Err(DominantSpeciesError::MustBeAdjacentToTile);
        }
        Ok(())
    }

    /// Place a tile next to an existing one and remember it as the last placed.
    pub fn add_tile(&mut self, hex: Hex, tile: Tile) -> Result<()> {
        self.check_tile_placement(hex)?;
        self.tiles.insert(hex, tile);
        self.last_placed_tile = Some(hex);
        Ok(())
    }

    /// Checks the preconditions of `add_element` without placing anything.
    pub fn check_element_placement(&self, corner: Corner) -> Result<()> {
        if self.elements.contains_key(&corner) {
            return Err(DominantSpeciesError::AlreadyElementAtCorner);
        }
        if !corner.hexes().iter().any(|&h| self.has_tile(h)) {
            return Err(DominantSpeciesError::MustBeAdjacentToTile);
        }
        if !corner.is_on_board() {
            return Err(DominantSpeciesError::InvalidCorner);
        }
        Ok(())
    }

    pub fn add_element(&mut self, corner: Corner, element: ElementType) -> Result<()> {
        self.check_element_placement(corner)?;
        self.elements.insert(corner, element);
        Ok(())
    }

    pub fn remove_element(&mut self, corner: Corner) -> Result<ElementType> {
        self.elements
            .remove(&corner)
            .ok_or(DominantSpeciesError::NoElementAtCorner)
    }

    /// On-board hexes around `hex`.
    pub fn adjacent_hexes(&self, hex: Hex) -> impl Iterator<Item = Hex> {
        hex.neighbors().into_iter().filter(|h| h.is_on_board())
    }

    /// Placed tiles around `hex`.
    pub fn adjacent_tiles(&self, hex: Hex) -> impl Iterator<Item = (Hex, &Tile)> + '_ {
        hex.neighbors()
            .into_iter()
            .filter_map(move |h| self.tiles.get(&h).map(|t| (h, t)))
    }

    /// Placed tiles touching a corner.
    pub fn corner_tiles(&self, corner: Corner) -> impl Iterator<Item = (Hex, &Tile)> + '_ {
        corner
            .hexes()
            .into_iter()
            .filter_map(move |h| self.tiles.get(&h).map(|t| (h, t)))
    }

    /// Element corners touching `hex`.
    pub fn adjacent_elements(&self, hex: Hex) -> impl Iterator<Item = (Corner, ElementType)> + '_ {
        Corner::around(hex)
            .into_iter()
            .filter_map(move |c| self.element(c).map(|e| (c, e)))
    }

    /// Types of the elements touching `hex`, one entry per element.
    #[must_use]
    pub fn adjacent_element_types(&self, hex: Hex) -> AdjacentElements {
        self.adjacent_elements(hex).map(|(_, e)| e).collect()
    }

    /// Hexes holding at least one species of the animal.
    #[must_use]
    pub fn tiles_with_species(&self, animal: AnimalType) -> Vec<Hex> {
        self.tiles
            .iter()
            .filter(|(_, t)| t.has_species(animal))
            .map(|(h, _)| *h)
            .collect()
    }

    /// Empty on-board hexes next to a placed tile.
    #[must_use]
    pub fn vacant_hexes(&self) -> Vec<Hex> {
        board_hexes()
            .filter(|&h| !self.has_tile(h) && self.adjacent_tiles(h).next().is_some())
            .collect()
    }

    /// Empty on-board corners touching at least one placed tile.
    #[must_use]
    pub fn vacant_corners(&self) -> Vec<Corner> {
        let mut seen = FxHashSet::default();
        let mut vacant = Vec::new();
        for hex in self.tiles.keys() {
            for corner in Corner::around(*hex) {
                if corner.is_on_board()
                    && !self.elements.contains_key(&corner)
                    && seen.insert(corner)
                {
                    vacant.push(corner);
                }
            }
        }
        vacant.sort_unstable();
        vacant
    }

    #[must_use]
    pub fn has_vacant_corner(&self) -> bool {
        !self.vacant_corners().is_empty()
    }

    /// Whether species can walk from `from` to `to` in at most
    /// `max_distance` steps, stepping only on placed tiles.
    #[must_use]
    pub fn can_move_through_tiles(&self, from: Hex, to: Hex, max_distance: u32) -> bool {
        if !self.has_tile(from) || !self.has_tile(to) {
            return false;
        }

        let mut visited = FxHashSet::default();
        visited.insert(from);
        let mut frontier = vec![from];

        for _ in 0..max_distance {
            let mut next = Vec::new();
            for hex in frontier {
                for (neighbor, _) in self.adjacent_tiles(hex) {
                    if neighbor == to {
                        return true;
                    }
                    if visited.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
            frontier = next;
        }

        from == to
    }

    /// Recompute the dominant animal of every tile.
    pub fn recalculate_dominance(&mut self, animals: &OrdMap<AnimalType, Animal>) {
        let hexes: Vec<Hex> = self.tiles.keys().copied().collect();
        for hex in hexes {
            let adjacent = self.adjacent_element_types(hex);
            if let Some(tile) = self.tiles.get_mut(&hex) {
                tile.recalculate_dominance(animals.values(), &adjacent);
            }
        }
    }
}

/// Where an animal's starting species go: two on the first hex, one on each
/// of the others.
fn initial_species_hexes(animal: AnimalType) -> [Hex; 3] {
    match animal {
        AnimalType::Insects => [INITIAL_SAVANNAH, INITIAL_WETLAND, INITIAL_DESERT],
        AnimalType::Arachnids => [INITIAL_JUNGLE, INITIAL_FOREST, INITIAL_WETLAND],
        AnimalType::Amphibians => [INITIAL_WETLAND, INITIAL_JUNGLE, INITIAL_SAVANNAH],
        AnimalType::Birds => [INITIAL_FOREST, INITIAL_MOUNTAIN, INITIAL_JUNGLE],
        AnimalType::Reptiles => [INITIAL_DESERT, INITIAL_SAVANNAH, INITIAL_MOUNTAIN],
        AnimalType::Mammals => [INITIAL_MOUNTAIN, INITIAL_DESERT, INITIAL_FOREST],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::initial(&AnimalType::FOOD_CHAIN_ORDER).unwrap()
    }

    #[test]
    fn test_initial_layout() {
        let board = board();
        assert_eq!(board.tiles().len(), 7);
        assert_eq!(board.elements().len(), 12);
        assert!(board.tile(INITIAL_SEA).unwrap().is_tundra());
        assert_eq!(board.tile(INITIAL_WETLAND).unwrap().species(AnimalType::Amphibians), 2);
        assert_eq!(board.tile(INITIAL_WETLAND).unwrap().species(AnimalType::Insects), 1);
        assert_eq!(board.tile(INITIAL_SEA).unwrap().total_species(), 0);
    }

    #[test]
    fn test_initial_species_only_for_playing_animals() {
        let board = Board::initial(&[AnimalType::Birds]).unwrap();
        let total: u32 = board.tiles().values().map(Tile::total_species).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn test_adjacent_element_types() {
        let board = board();
        // the sea touches all six of its corners
        assert_eq!(board.adjacent_element_types(INITIAL_SEA).len(), 6);
        // jungle: grub x2, water, seed
        let mut jungle = board.adjacent_element_types(INITIAL_JUNGLE);
        jungle.sort();
        assert_eq!(
            jungle.as_slice(),
            &[ElementType::Grub, ElementType::Grub, ElementType::Seed, ElementType::Water]
        );
    }

    #[test]
    fn test_add_tile_rules() {
        let mut board = board();
        let tile = || Tile::initial(TileType::Forest, false);

        assert_eq!(board.add_tile(INITIAL_SEA, tile()), Err(DominantSpeciesError::AlreadyTileAtHex));
        assert_eq!(board.add_tile(Hex::new(3, -3), tile()), Err(DominantSpeciesError::MustBeAdjacentToTile));
        assert_eq!(board.add_tile(Hex::new(5, 5), tile()), Err(DominantSpeciesError::InvalidHex));

        board.add_tile(Hex::new(1, 1), tile()).unwrap();
        assert_eq!(board.last_placed_tile(), Some(Hex::new(1, 1)));
    }

    #[test]
    fn test_add_element_rules() {
        let mut board = board();
        let existing = Corner::new(INITIAL_JUNGLE, INITIAL_WETLAND, INITIAL_SEA).unwrap();
        assert_eq!(
            board.add_element(existing, ElementType::Sun),
            Err(DominantSpeciesError::AlreadyElementAtCorner)
        );

        let far = Corner::new(Hex::new(3, -3), Hex::new(2, -2), Hex::new(3, -2)).unwrap();
        assert_eq!(
            board.add_element(far, ElementType::Sun),
            Err(DominantSpeciesError::MustBeAdjacentToTile)
        );

        let sun = Corner::new(INITIAL_DESERT, INITIAL_SAVANNAH, Hex::new(2, -1)).unwrap();
        assert_eq!(
            board.add_element(sun, ElementType::Meat),
            Err(DominantSpeciesError::AlreadyElementAtCorner)
        );

        let open = Corner::new(INITIAL_DESERT, Hex::new(2, -1), Hex::new(2, 0)).unwrap();
        board.add_element(open, ElementType::Sun).unwrap();
        assert_eq!(board.remove_element(open), Ok(ElementType::Sun));
        assert_eq!(board.remove_element(open), Err(DominantSpeciesError::NoElementAtCorner));
    }

    #[test]
    fn test_vacant_hexes_and_corners() {
        let board = board();
        let hexes = board.vacant_hexes();
        assert!(hexes.contains(&Hex::new(1, 1)));
        assert!(!hexes.contains(&INITIAL_SEA));
        assert!(hexes.iter().all(|h| h.is_on_board()));

        let corners = board.vacant_corners();
        assert!(!corners.is_empty());
        assert!(corners.iter().all(|c| board.element(*c).is_none()));
        // the sea has all six corners filled
        assert!(corners.iter().all(|c| !c.is_adjacent(INITIAL_SEA)));
    }

    #[test]
    fn test_can_move_through_tiles() {
        let board = board();
        assert!(board.can_move_through_tiles(INITIAL_JUNGLE, INITIAL_SEA, 1));
        assert!(!board.can_move_through_tiles(INITIAL_JUNGLE, INITIAL_DESERT, 1));
        assert!(board.can_move_through_tiles(INITIAL_JUNGLE, INITIAL_DESERT, 2));
    }

    #[test]
    fn test_cannot_move_through_blank_hex() {
        let mut board = board();
        for hex in [Hex::new(1, 1), Hex::new(2, 0), Hex::new(2, -2)] {
            board.add_tile(hex, Tile::initial(TileType::Sea, false)).unwrap();
        }
        assert!(board.can_move_through_tiles(Hex::new(1, 1), INITIAL_SAVANNAH, 2));
        // the only hex between them, (2,-1), is blank
        assert_eq!(Hex::new(2, 0).distance(Hex::new(2, -2)), 2);
        assert!(!board.can_move_through_tiles(Hex::new(2, 0), Hex::new(2, -2), 2));
    }

    #[test]
    fn test_initial_dominance() {
        let mut board = board();
        let animals: OrdMap<AnimalType, Animal> = AnimalType::FOOD_CHAIN_ORDER
            .iter()
            .map(|&a| (a, Animal::initial(a, crate::core::PlayerId::new(a.food_chain_index() as u8), 6)))
            .collect();
        board.recalculate_dominance(&animals);

        // jungle: grub x2, water, seed. arachnids match 4, amphibians 3, birds 2
        assert_eq!(board.tile(INITIAL_JUNGLE).unwrap().dominant(), Some(AnimalType::Arachnids));
        // mountain: sun, meat x2, seed. mammals 4, reptiles 2, birds 2
        assert_eq!(board.tile(INITIAL_MOUNTAIN).unwrap().dominant(), Some(AnimalType::Mammals));
    }
}

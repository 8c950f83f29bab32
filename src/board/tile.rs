//! Terrain tiles: occupancy, dominance, scoring and extinction.
//!
//! ## Dominance
//!
//! An animal's strength on a tile is the number of (held element, adjacent
//! corner element) pairs of equal type. The unique strongest animal present
//! dominates; a tie or a maximum of zero leaves the tile without a dominant
//! animal.
//!
//! ## Extinction
//!
//! Species of an animal that matches no adjacent element are endangered.
//! At extinction they are eliminated, minus any hibernating species and any
//! species explicitly saved.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::animals::{Animal, AnimalMap, AnimalType, ElementType};
use crate::core::{DominantSpeciesError, Result};

/// Terrain of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileType {
    Sea,
    Wetland,
    Savannah,
    Jungle,
    Forest,
    Desert,
    Mountain,
}

impl TileType {
    pub const ALL: [TileType; 7] = [
        TileType::Sea,
        TileType::Wetland,
        TileType::Savannah,
        TileType::Jungle,
        TileType::Forest,
        TileType::Desert,
        TileType::Mountain,
    ];

    /// Victory points per place, first place first.
    #[must_use]
    pub const fn scoring(self) -> &'static [u32] {
        match self {
            TileType::Sea => &[9, 5, 3, 2],
            TileType::Wetland => &[8, 4, 2, 1],
            TileType::Savannah => &[7, 4, 2],
            TileType::Jungle => &[6, 3, 2],
            TileType::Forest => &[5, 3, 2],
            TileType::Desert => &[4, 2],
            TileType::Mountain => &[3, 2],
        }
    }

    /// Points for the 0-based `place`; 0 beyond the table.
    #[must_use]
    pub fn score(self, place: usize) -> u32 {
        self.scoring().get(place).copied().unwrap_or(0)
    }

    /// Most species a single speciation may add to a tile of this type.
    #[must_use]
    pub const fn max_speciation(self) -> u32 {
        match self {
            TileType::Sea | TileType::Wetland => 4,
            TileType::Savannah | TileType::Jungle => 3,
            TileType::Forest | TileType::Desert | TileType::Mountain => 2,
        }
    }

    #[must_use]
    pub const fn is_aquatic(self) -> bool {
        matches!(self, TileType::Sea | TileType::Wetland)
    }
}

/// A placed terrain tile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    tile_type: TileType,
    tundra: bool,
    species: AnimalMap<u32>,
    hibernating: AnimalMap<u32>,
    dominant: Option<AnimalType>,
}

impl Tile {
    #[must_use]
    pub fn initial(tile_type: TileType, tundra: bool) -> Self {
        Self {
            tile_type,
            tundra,
            species: AnimalMap::default(),
            hibernating: AnimalMap::default(),
            dominant: None,
        }
    }

    #[must_use]
    pub fn tile_type(&self) -> TileType {
        self.tile_type
    }

    #[must_use]
    pub fn is_tundra(&self) -> bool {
        self.tundra
    }

    #[must_use]
    pub fn dominant(&self) -> Option<AnimalType> {
        self.dominant
    }

    #[must_use]
    pub fn species(&self, animal: AnimalType) -> u32 {
        self.species[animal]
    }

    #[must_use]
    pub fn hibernating(&self, animal: AnimalType) -> u32 {
        self.hibernating[animal]
    }

    #[must_use]
    pub fn has_species(&self, animal: AnimalType) -> bool {
        self.species[animal] > 0
    }

    #[must_use]
    pub fn has_opposing_species(&self, animal: AnimalType) -> bool {
        self.species.iter().any(|(a, &n)| a != animal && n > 0)
    }

    #[must_use]
    pub fn total_species(&self) -> u32 {
        self.species.iter().map(|(_, n)| n).sum()
    }

    /// Animals with at least one species here, in food-chain order.
    pub fn animals(&self) -> impl Iterator<Item = AnimalType> + '_ {
        self.species.iter().filter(|(_, &n)| n > 0).map(|(a, _)| a)
    }

    pub fn add_species(&mut self, animal: AnimalType, species: u32) -> Result<()> {
        if species == 0 {
            return Err(DominantSpeciesError::SpeciesMustBePositive);
        }
        self.species[animal] += species;
        Ok(())
    }

    /// Removes species; hibernating species are clamped to what remains.
    pub fn remove_species(&mut self, animal: AnimalType, species: u32) -> Result<()> {
        if species == 0 {
            return Err(DominantSpeciesError::SpeciesMustBePositive);
        }
        if species > self.species[animal] {
            return Err(DominantSpeciesError::NotEnoughSpeciesOnTile);
        }
        self.species[animal] -= species;
        self.hibernating[animal] = self.hibernating[animal].min(self.species[animal]);
        Ok(())
    }

    /// Removes every species of the animal and returns how many there were.
    pub fn remove_all_species(&mut self, animal: AnimalType) -> u32 {
        let species = self.species[animal];
        self.species[animal] = 0;
        self.hibernating[animal] = 0;
        species
    }

    /// Adds species that are protected from the next extinction.
    pub fn add_hibernating_species(&mut self, animal: AnimalType, species: u32) -> Result<()> {
        self.add_species(animal, species)?;
        self.hibernating[animal] += species;
        Ok(())
    }

    pub fn glaciate(&mut self) -> Result<()> {
        if self.tundra {
            return Err(DominantSpeciesError::AlreadyTundra);
        }
        self.tundra = true;
        Ok(())
    }

    /// Recompute the dominant animal from the animals present.
    ///
    /// `animals` supplies the element holdings; animals without species on
    /// the tile are ignored.
    pub fn recalculate_dominance<'a>(
        &mut self,
        animals: impl IntoIterator<Item = &'a Animal>,
        adjacent: &[ElementType],
    ) {
        let mut best: Option<(AnimalType, u32)> = None;
        let mut tied = false;

        for animal in animals {
            if !self.has_species(animal.animal_type()) {
                continue;
            }
            let matches = animal.match_elements(adjacent);
            match best {
                Some((_, max)) if matches < max => {}
                Some((_, max)) if matches == max => tied = true,
                _ => {
                    best = Some((animal.animal_type(), matches));
                    tied = false;
                }
            }
        }

        self.dominant = match best {
            Some((animal, max)) if max > 0 && !tied => Some(animal),
            _ => None,
        };
    }

    /// Points per animal, best placed first.
    ///
    /// Animals rank by species count, fewest first, ties broken by
    /// food-chain order. Tundra tiles give nothing for second place.
    #[must_use]
    pub fn score(&self) -> SmallVec<[(AnimalType, u32); 6]> {
        let mut ranked: SmallVec<[(AnimalType, u32); 6]> =
            self.species.iter().filter(|(_, &n)| n > 0).map(|(a, &n)| (a, n)).collect();
        ranked.sort_by(|(a, x), (b, y)| x.cmp(y).then(a.cmp(b)));

        ranked
            .into_iter()
            .enumerate()
            .map(|(place, (animal, _))| {
                let points = if self.tundra && place == 1 {
                    0
                } else {
                    self.tile_type.score(place)
                };
                (animal, points)
            })
            .collect()
    }

    /// Species of the animal that would go extinct: all of them when the
    /// animal matches no adjacent element.
    #[must_use]
    pub fn endangered_species(&self, animal: &Animal, adjacent: &[ElementType]) -> u32 {
        if animal.match_elements(adjacent) == 0 {
            self.species[animal.animal_type()]
        } else {
            0
        }
    }

    /// Eliminate endangered species minus hibernating and `save`.
    ///
    /// Hibernation is cleared either way. Returns the number eliminated.
    pub fn extinction(&mut self, animal: &Animal, adjacent: &[ElementType], save: u32) -> u32 {
        let animal_type = animal.animal_type();
        let endangered = self.endangered_species(animal, adjacent);
        let eliminated = endangered.saturating_sub(self.hibernating[animal_type] + save);

        self.species[animal_type] -= eliminated;
        self.hibernating[animal_type] = 0;

        eliminated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;

    fn animal(animal_type: AnimalType) -> Animal {
        Animal::initial(animal_type, PlayerId::new(0), 6)
    }

    #[test]
    fn test_remove_species_guarded() {
        let mut tile = Tile::initial(TileType::Forest, false);
        tile.add_species(AnimalType::Birds, 2).unwrap();

        assert_eq!(
            tile.remove_species(AnimalType::Birds, 3),
            Err(DominantSpeciesError::NotEnoughSpeciesOnTile)
        );
        assert_eq!(
            tile.remove_species(AnimalType::Birds, 0),
            Err(DominantSpeciesError::SpeciesMustBePositive)
        );
        tile.remove_species(AnimalType::Birds, 2).unwrap();
        assert!(!tile.has_species(AnimalType::Birds));
    }

    #[test]
    fn test_hibernating_clamped() {
        let mut tile = Tile::initial(TileType::Forest, false);
        tile.add_hibernating_species(AnimalType::Reptiles, 3).unwrap();
        assert_eq!(tile.species(AnimalType::Reptiles), 3);
        tile.remove_species(AnimalType::Reptiles, 2).unwrap();
        assert_eq!(tile.hibernating(AnimalType::Reptiles), 1);
    }

    #[test]
    fn test_score_sea() {
        let mut tile = Tile::initial(TileType::Sea, false);
        tile.add_species(AnimalType::Mammals, 7).unwrap();
        tile.add_species(AnimalType::Reptiles, 6).unwrap();
        tile.add_species(AnimalType::Birds, 5).unwrap();
        tile.add_species(AnimalType::Amphibians, 4).unwrap();
        tile.add_species(AnimalType::Insects, 1).unwrap();

        let score = tile.score();
        assert_eq!(
            score.as_slice(),
            &[
                (AnimalType::Insects, 9),
                (AnimalType::Amphibians, 5),
                (AnimalType::Birds, 3),
                (AnimalType::Reptiles, 2),
                (AnimalType::Mammals, 0),
            ]
        );
    }

    #[test]
    fn test_score_tie_broken_by_food_chain() {
        let mut tile = Tile::initial(TileType::Sea, false);
        tile.add_species(AnimalType::Insects, 7).unwrap();
        tile.add_species(AnimalType::Arachnids, 7).unwrap();

        let score = tile.score();
        assert_eq!(score.as_slice(), &[(AnimalType::Arachnids, 9), (AnimalType::Insects, 5)]);
    }

    #[test]
    fn test_score_fewest_species_places_first() {
        let mut tile = Tile::initial(TileType::Sea, false);
        tile.add_species(AnimalType::Mammals, 3).unwrap();
        tile.add_species(AnimalType::Birds, 1).unwrap();

        let score = tile.score();
        assert_eq!(score.as_slice(), &[(AnimalType::Birds, 9), (AnimalType::Mammals, 5)]);
    }

    #[test]
    fn test_score_tundra_skips_second_place() {
        let mut tile = Tile::initial(TileType::Desert, true);
        tile.add_species(AnimalType::Mammals, 3).unwrap();
        tile.add_species(AnimalType::Birds, 2).unwrap();
        tile.add_species(AnimalType::Insects, 1).unwrap();

        let score = tile.score();
        assert_eq!(
            score.as_slice(),
            &[(AnimalType::Insects, 4), (AnimalType::Birds, 0), (AnimalType::Mammals, 0)]
        );
    }

    #[test]
    fn test_dominance_unique_max() {
        let mammals = animal(AnimalType::Mammals);
        let birds = animal(AnimalType::Birds);

        let mut tile = Tile::initial(TileType::Mountain, false);
        tile.add_species(AnimalType::Mammals, 1).unwrap();
        tile.add_species(AnimalType::Birds, 2).unwrap();

        tile.recalculate_dominance([&mammals, &birds], &[ElementType::Meat, ElementType::Sun]);
        assert_eq!(tile.dominant(), Some(AnimalType::Mammals));

        tile.recalculate_dominance([&mammals, &birds], &[ElementType::Meat, ElementType::Seed]);
        assert_eq!(tile.dominant(), None);

        tile.recalculate_dominance([&mammals, &birds], &[ElementType::Sun]);
        assert_eq!(tile.dominant(), None);
    }

    #[test]
    fn test_dominance_ignores_absent_animals() {
        let mammals = animal(AnimalType::Mammals);
        let birds = animal(AnimalType::Birds);

        let mut tile = Tile::initial(TileType::Mountain, false);
        tile.add_species(AnimalType::Birds, 1).unwrap();

        tile.recalculate_dominance([&mammals, &birds], &[ElementType::Meat, ElementType::Seed]);
        assert_eq!(tile.dominant(), Some(AnimalType::Birds));
    }

    #[test]
    fn test_glaciate_twice() {
        let mut tile = Tile::initial(TileType::Jungle, false);
        tile.glaciate().unwrap();
        assert!(tile.is_tundra());
        assert_eq!(tile.glaciate(), Err(DominantSpeciesError::AlreadyTundra));
    }

    #[test]
    fn test_extinction_with_hibernation_and_save() {
        let mammals = animal(AnimalType::Mammals);
        let mut tile = Tile::initial(TileType::Forest, false);
        tile.add_species(AnimalType::Mammals, 3).unwrap();
        tile.add_hibernating_species(AnimalType::Mammals, 1).unwrap();

        let eliminated = tile.extinction(&mammals, &[ElementType::Grass], 1);
        assert_eq!(eliminated, 2);
        assert_eq!(tile.species(AnimalType::Mammals), 2);
        assert_eq!(tile.hibernating(AnimalType::Mammals), 0);
    }

    #[test]
    fn test_no_extinction_when_matching() {
        let mammals = animal(AnimalType::Mammals);
        let mut tile = Tile::initial(TileType::Forest, false);
        tile.add_species(AnimalType::Mammals, 3).unwrap();

        assert_eq!(tile.extinction(&mammals, &[ElementType::Meat], 0), 0);
        assert_eq!(tile.species(AnimalType::Mammals), 3);
    }
}

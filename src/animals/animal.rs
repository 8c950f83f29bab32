//! Per-animal faction state.
//!
//! Counters are guarded: removing what is not there is an error, never an
//! underflow. Victory points are the exception and saturate at zero.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::animal_type::{AnimalType, ElementType};
use crate::core::{DominantSpeciesError, PlayerId, Result};

/// Most elements an animal can hold.
pub const MAX_ELEMENTS: usize = 6;

/// Species each animal has on the board at start.
pub const INITIAL_SPECIES_ON_BOARD: u32 = 3;

/// Held element list, starting elements first.
pub type Elements = SmallVec<[ElementType; MAX_ELEMENTS]>;

/// State of one animal faction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
    player: PlayerId,
    animal_type: AnimalType,
    gene_pool: u32,
    eliminated_species: u32,
    action_pawns: u32,
    score: u32,
    elements: Elements,
}

impl Animal {
    /// Starting state for a game with `animal_count` animals.
    ///
    /// The species already placed on the initial board are taken out of the
    /// gene pool.
    #[must_use]
    pub fn initial(animal_type: AnimalType, player: PlayerId, animal_count: usize) -> Self {
        Self {
            player,
            animal_type,
            gene_pool: Self::initial_species(animal_count) - INITIAL_SPECIES_ON_BOARD,
            eliminated_species: 0,
            action_pawns: Self::initial_action_pawns(animal_count),
            score: 0,
            elements: animal_type.initial_elements().iter().copied().collect(),
        }
    }

    /// Total species an animal owns for a game with `animal_count` animals.
    #[must_use]
    pub const fn initial_species(animal_count: usize) -> u32 {
        match animal_count {
            2 => 55,
            3 => 50,
            4 => 45,
            5 => 40,
            _ => 35,
        }
    }

    #[must_use]
    pub const fn initial_action_pawns(animal_count: usize) -> u32 {
        match animal_count {
            2 => 7,
            3 => 6,
            4 => 5,
            5 => 4,
            _ => 3,
        }
    }

    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    #[must_use]
    pub fn animal_type(&self) -> AnimalType {
        self.animal_type
    }

    #[must_use]
    pub fn gene_pool(&self) -> u32 {
        self.gene_pool
    }

    #[must_use]
    pub fn eliminated_species(&self) -> u32 {
        self.eliminated_species
    }

    #[must_use]
    pub fn action_pawns(&self) -> u32 {
        self.action_pawns
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn elements(&self) -> &[ElementType] {
        &self.elements
    }

    #[must_use]
    pub fn number_of_elements(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn has_action_pawn(&self) -> bool {
        self.action_pawns > 0
    }

    pub fn add_action_pawn(&mut self) {
        self.action_pawns += 1;
    }

    pub fn add_action_pawns(&mut self, count: u32) {
        self.action_pawns += count;
    }

    pub fn remove_action_pawn(&mut self) -> Result<()> {
        if self.action_pawns == 0 {
            return Err(DominantSpeciesError::NoActionPawn);
        }
        self.action_pawns -= 1;
        Ok(())
    }

    #[must_use]
    pub fn can_add_element(&self) -> bool {
        self.elements.len() < MAX_ELEMENTS
    }

    pub fn add_element(&mut self, element: ElementType) -> Result<()> {
        if !self.can_add_element() {
            return Err(DominantSpeciesError::MaxElementsReached);
        }
        self.elements.push(element);
        Ok(())
    }

    #[must_use]
    pub fn has_element(&self, element: ElementType) -> bool {
        self.elements.contains(&element)
    }

    fn initial_len(&self) -> usize {
        self.animal_type.initial_elements().len()
    }

    /// Whether any element beyond the starting ones is held.
    #[must_use]
    pub fn can_remove_element(&self) -> bool {
        self.elements.len() > self.initial_len()
    }

    /// Whether an element of this type can go without touching the
    /// starting elements.
    #[must_use]
    pub fn can_remove_element_type(&self, element: ElementType) -> bool {
        self.elements
            .iter()
            .rposition(|&e| e == element)
            .is_some_and(|i| i >= self.initial_len())
    }

    #[must_use]
    pub fn can_remove_one_of(&self, elements: &[ElementType]) -> bool {
        elements.iter().any(|&e| self.can_remove_element_type(e))
    }

    /// Distinct element types that could be removed, in holding order.
    #[must_use]
    pub fn removable_element_types(&self) -> SmallVec<[ElementType; MAX_ELEMENTS]> {
        let mut types: SmallVec<[ElementType; MAX_ELEMENTS]> = SmallVec::new();
        for &e in &self.elements[self.initial_len().min(self.elements.len())..] {
            if !types.contains(&e) {
                types.push(e);
            }
        }
        types
    }

    /// Removes the last held element of this type.
    pub fn remove_element(&mut self, element: ElementType) -> Result<()> {
        if !self.can_remove_element_type(element) {
            return Err(DominantSpeciesError::CannotRemoveElement);
        }
        if let Some(i) = self.elements.iter().rposition(|&e| e == element) {
            self.elements.remove(i);
        }
        Ok(())
    }

    /// Number of (held element, adjacent element) pairs of equal type.
    #[must_use]
    pub fn match_elements(&self, adjacent: &[ElementType]) -> u32 {
        self.elements
            .iter()
            .map(|e| adjacent.iter().filter(|a| *a == e).count() as u32)
            .sum()
    }

    pub fn add_species_to_gene_pool(&mut self, species: u32) {
        self.gene_pool += species;
    }

    pub fn remove_species_from_gene_pool(&mut self, species: u32) -> Result<()> {
        if species > self.gene_pool {
            return Err(DominantSpeciesError::NotEnoughSpeciesInGenePool);
        }
        self.gene_pool -= species;
        Ok(())
    }

    pub fn add_eliminated_species(&mut self, species: u32) {
        self.eliminated_species += species;
    }

    pub fn remove_eliminated_species(&mut self, species: u32) -> Result<()> {
        if species > self.eliminated_species {
            return Err(DominantSpeciesError::NotEnoughEliminatedSpecies);
        }
        self.eliminated_species -= species;
        Ok(())
    }

    pub fn add_vps(&mut self, vps: u32) {
        self.score += vps;
    }

    /// Loses up to `vps` points and returns how many were actually lost.
    pub fn lose_vps(&mut self, vps: u32) -> u32 {
        let lost = vps.min(self.score);
        self.score -= lost;
        lost
    }

    pub(crate) fn leave(&mut self) {
        self.score = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mammals() -> Animal {
        Animal::initial(AnimalType::Mammals, PlayerId::new(0), 3)
    }

    #[test]
    fn test_initial_counters() {
        let animal = mammals();
        assert_eq!(animal.gene_pool(), 47);
        assert_eq!(animal.action_pawns(), 6);
        assert_eq!(animal.elements(), &[ElementType::Meat, ElementType::Meat]);

        let six = Animal::initial(AnimalType::Insects, PlayerId::new(5), 6);
        assert_eq!(six.gene_pool(), 32);
        assert_eq!(six.action_pawns(), 3);
    }

    #[test]
    fn test_remove_action_pawn_guarded() {
        let mut animal = Animal::initial(AnimalType::Birds, PlayerId::new(0), 6);
        for _ in 0..3 {
            animal.remove_action_pawn().unwrap();
        }
        assert_eq!(animal.remove_action_pawn(), Err(DominantSpeciesError::NoActionPawn));
    }

    #[test]
    fn test_max_elements() {
        let mut animal = mammals();
        for _ in 0..4 {
            animal.add_element(ElementType::Sun).unwrap();
        }
        assert_eq!(
            animal.add_element(ElementType::Sun),
            Err(DominantSpeciesError::MaxElementsReached)
        );
    }

    #[test]
    fn test_starting_elements_are_kept() {
        let mut animal = mammals();
        assert!(!animal.can_remove_element());
        assert_eq!(
            animal.remove_element(ElementType::Meat),
            Err(DominantSpeciesError::CannotRemoveElement)
        );

        animal.add_element(ElementType::Meat).unwrap();
        animal.add_element(ElementType::Grass).unwrap();
        assert!(animal.can_remove_element_type(ElementType::Meat));
        animal.remove_element(ElementType::Meat).unwrap();
        assert!(!animal.can_remove_element_type(ElementType::Meat));
        assert_eq!(animal.elements(), &[ElementType::Meat, ElementType::Meat, ElementType::Grass]);
        assert_eq!(animal.removable_element_types().as_slice(), &[ElementType::Grass]);
    }

    #[test]
    fn test_match_elements_counts_pairs() {
        let mut animal = mammals();
        animal.add_element(ElementType::Grass).unwrap();

        let adjacent = [ElementType::Meat, ElementType::Grass, ElementType::Sun];
        // two meats each match the one adjacent meat, one grass matches
        assert_eq!(animal.match_elements(&adjacent), 3);
        assert_eq!(animal.match_elements(&[]), 0);
    }

    #[test]
    fn test_gene_pool_and_eliminated_guarded() {
        let mut animal = mammals();
        assert_eq!(
            animal.remove_species_from_gene_pool(48),
            Err(DominantSpeciesError::NotEnoughSpeciesInGenePool)
        );
        assert_eq!(
            animal.remove_eliminated_species(1),
            Err(DominantSpeciesError::NotEnoughEliminatedSpecies)
        );
        animal.add_eliminated_species(2);
        animal.remove_eliminated_species(2).unwrap();
    }

    #[test]
    fn test_lose_vps_saturates() {
        let mut animal = mammals();
        animal.add_vps(4);
        assert_eq!(animal.lose_vps(9), 4);
        assert_eq!(animal.score(), 0);
    }
}

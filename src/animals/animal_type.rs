//! Animal factions, element types and per-animal storage.
//!
//! ## Food chain
//!
//! Animals are declared in food-chain order (Mammals on top, Insects at the
//! bottom). Many rules iterate in this order or break ties by it, so
//! `AnimalType` derives `Ord` from the declaration order.
//!
//! ## AnimalMap
//!
//! Fixed-size per-animal storage backed by an array for O(1) access,
//! indexable by `AnimalType`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Playable animal faction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnimalType {
    Mammals,
    Reptiles,
    Birds,
    Amphibians,
    Arachnids,
    Insects,
}

impl AnimalType {
    /// All animals, top of the food chain first.
    pub const FOOD_CHAIN_ORDER: [AnimalType; 6] = [
        AnimalType::Mammals,
        AnimalType::Reptiles,
        AnimalType::Birds,
        AnimalType::Amphibians,
        AnimalType::Arachnids,
        AnimalType::Insects,
    ];

    /// Position in the food chain, 0 for Mammals.
    #[must_use]
    pub const fn food_chain_index(self) -> usize {
        self as usize
    }

    /// Elements printed on the animal's player board. They can never be lost.
    #[must_use]
    pub fn initial_elements(self) -> &'static [ElementType] {
        use ElementType::*;
        match self {
            AnimalType::Mammals => &[Meat, Meat],
            AnimalType::Reptiles => &[Sun, Sun],
            AnimalType::Birds => &[Seed, Seed],
            AnimalType::Amphibians => &[Water, Water, Water],
            AnimalType::Arachnids => &[Grub, Grub],
            AnimalType::Insects => &[Grass, Grass],
        }
    }
}

impl std::fmt::Display for AnimalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Element token type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementType {
    Grass,
    Grub,
    Meat,
    Seed,
    Sun,
    Water,
}

impl ElementType {
    pub const ALL: [ElementType; 6] = [
        ElementType::Grass,
        ElementType::Grub,
        ElementType::Meat,
        ElementType::Seed,
        ElementType::Sun,
        ElementType::Water,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Per-animal data storage with O(1) access.
///
/// ```
/// use dominant_species::animals::{AnimalMap, AnimalType};
///
/// let mut species: AnimalMap<u32> = AnimalMap::default();
/// species[AnimalType::Birds] += 2;
/// assert_eq!(species[AnimalType::Birds], 2);
/// assert_eq!(species[AnimalType::Insects], 0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimalMap<T> {
    data: [T; 6],
}

impl<T> AnimalMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(AnimalType) -> T) -> Self {
        Self {
            data: AnimalType::FOOD_CHAIN_ORDER.map(factory),
        }
    }

    /// Iterate over (AnimalType, &T) pairs in food-chain order.
    pub fn iter(&self) -> impl Iterator<Item = (AnimalType, &T)> {
        AnimalType::FOOD_CHAIN_ORDER.into_iter().zip(self.data.iter())
    }

    /// Iterate over (AnimalType, &mut T) pairs in food-chain order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (AnimalType, &mut T)> {
        AnimalType::FOOD_CHAIN_ORDER.into_iter().zip(self.data.iter_mut())
    }
}

impl<T> Index<AnimalType> for AnimalMap<T> {
    type Output = T;

    fn index(&self, animal: AnimalType) -> &T {
        &self.data[animal.food_chain_index()]
    }
}

impl<T> IndexMut<AnimalType> for AnimalMap<T> {
    fn index_mut(&mut self, animal: AnimalType) -> &mut T {
        &mut self.data[animal.food_chain_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_food_chain_order() {
        assert_eq!(AnimalType::Mammals.food_chain_index(), 0);
        assert_eq!(AnimalType::Insects.food_chain_index(), 5);
        assert!(AnimalType::Mammals < AnimalType::Reptiles);
        let mut sorted = AnimalType::FOOD_CHAIN_ORDER;
        sorted.sort();
        assert_eq!(sorted, AnimalType::FOOD_CHAIN_ORDER);
    }

    #[test]
    fn test_initial_elements() {
        assert_eq!(AnimalType::Amphibians.initial_elements().len(), 3);
        assert_eq!(
            AnimalType::Reptiles.initial_elements(),
            &[ElementType::Sun, ElementType::Sun]
        );
    }

    #[test]
    fn test_animal_map_iter_order() {
        let map = AnimalMap::new(|a| a.food_chain_index() * 10);
        let values: Vec<_> = map.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![0, 10, 20, 30, 40, 50]);
    }
}

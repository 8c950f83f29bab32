//! The element draw bag.
//!
//! A multiset of element tokens. Random draws are weighted by how many of
//! each type remain, scanning types in a fixed order so a given seed always
//! yields the same draw.

use serde::{Deserialize, Serialize};

use crate::animals::ElementType;
use crate::core::{DominantSpeciesError, GameRng, Result};

/// Tokens of each element type in a new bag.
pub const INITIAL_PER_ELEMENT: u32 = 18;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawBag {
    counts: [u32; 6],
}

impl DrawBag {
    #[must_use]
    pub fn initial() -> Self {
        Self {
            counts: [INITIAL_PER_ELEMENT; 6],
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self { counts: [0; 6] }
    }

    #[must_use]
    pub fn count(&self, element: ElementType) -> u32 {
        self.counts[element.index()]
    }

    #[must_use]
    pub fn len(&self) -> u32 {
        self.counts.iter().sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn contains(&self, element: ElementType) -> bool {
        self.count(element) > 0
    }

    #[must_use]
    pub fn contains_any(&self, elements: &[ElementType]) -> bool {
        elements.iter().any(|&e| self.contains(e))
    }

    pub fn add(&mut self, element: ElementType) {
        self.counts[element.index()] += 1;
    }

    pub fn remove(&mut self, element: ElementType) -> Result<()> {
        let count = &mut self.counts[element.index()];
        if *count == 0 {
            return Err(DominantSpeciesError::ElementNotInDrawBag);
        }
        *count -= 1;
        Ok(())
    }

    /// Draw a random token.
    pub fn draw(&mut self, rng: &mut GameRng) -> Result<ElementType> {
        let index = rng
            .weighted_index(&self.counts)
            .ok_or(DominantSpeciesError::NoElementsInDrawBag)?;
        let element = ElementType::ALL[index];
        self.remove(element)?;
        Ok(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_bag() {
        let bag = DrawBag::initial();
        assert_eq!(bag.len(), 108);
        assert!(ElementType::ALL.iter().all(|&e| bag.count(e) == 18));
    }

    #[test]
    fn test_draw_empty_bag() {
        let mut bag = DrawBag::empty();
        let mut rng = GameRng::new(1);
        assert_eq!(bag.draw(&mut rng), Err(DominantSpeciesError::NoElementsInDrawBag));
    }

    #[test]
    fn test_draw_only_available_type() {
        let mut bag = DrawBag::empty();
        bag.add(ElementType::Water);
        bag.add(ElementType::Water);
        let mut rng = GameRng::new(1);

        assert_eq!(bag.draw(&mut rng), Ok(ElementType::Water));
        assert_eq!(bag.draw(&mut rng), Ok(ElementType::Water));
        assert!(bag.is_empty());
    }

    #[test]
    fn test_remove_missing() {
        let mut bag = DrawBag::empty();
        assert_eq!(bag.remove(ElementType::Sun), Err(DominantSpeciesError::ElementNotInDrawBag));
        assert!(!bag.contains_any(&[ElementType::Sun, ElementType::Meat]));
        bag.add(ElementType::Meat);
        assert!(bag.contains_any(&[ElementType::Sun, ElementType::Meat]));
    }

    #[test]
    fn test_draw_deterministic() {
        let mut a = DrawBag::initial();
        let mut b = DrawBag::initial();
        let mut rng_a = GameRng::new(11);
        let mut rng_b = GameRng::new(11);

        for _ in 0..30 {
            assert_eq!(a.draw(&mut rng_a), b.draw(&mut rng_b));
        }
        assert_eq!(a.len(), 78);
    }
}

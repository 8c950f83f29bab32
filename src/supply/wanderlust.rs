//! Wanderlust tile stacks.
//!
//! Twenty-four terrain tiles are shuffled into three stacks of eight. The
//! top tile of each stack lies face up and is the one a Wanderlust action
//! takes; an emptied face-up slot is refilled at reseed.

use serde::{Deserialize, Serialize};

use crate::board::TileType;
use crate::core::{DominantSpeciesError, GameRng, Result};

pub const STACKS: usize = 3;
pub const TILES_PER_STACK: usize = 8;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WanderlustStack {
    face_up: Option<TileType>,
    face_down: Vec<TileType>,
}

impl WanderlustStack {
    #[must_use]
    pub fn face_up(&self) -> Option<TileType> {
        self.face_up
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.face_down.len() + usize::from(self.face_up.is_some())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WanderlustTiles {
    stacks: [WanderlustStack; STACKS],
}

impl WanderlustTiles {
    /// Shuffled stacks: six seas and three of every other terrain.
    #[must_use]
    pub fn initial(rng: &mut GameRng) -> Self {
        let mut tiles: Vec<TileType> = TileType::ALL
            .iter()
            .flat_map(|&t| {
                let copies = if t == TileType::Sea { 6 } else { 3 };
                std::iter::repeat(t).take(copies)
            })
            .collect();
        rng.shuffle(&mut tiles);

        let mut stacks: [WanderlustStack; STACKS] = Default::default();
        for (stack, chunk) in stacks.iter_mut().zip(tiles.chunks(TILES_PER_STACK)) {
            // last element is the top of the stack
            stack.face_down = chunk.to_vec();
            stack.face_up = stack.face_down.pop();
        }

        Self { stacks }
    }

    #[must_use]
    pub fn stacks(&self) -> &[WanderlustStack; STACKS] {
        &self.stacks
    }

    #[must_use]
    pub fn face_up(&self, stack: usize) -> Option<TileType> {
        self.stacks.get(stack).and_then(WanderlustStack::face_up)
    }

    /// Take the face-up tile of a stack.
    pub fn remove_face_up(&mut self, stack: usize) -> Result<TileType> {
        self.stacks
            .get_mut(stack)
            .and_then(|s| s.face_up.take())
            .ok_or(DominantSpeciesError::NoTileAvailable)
    }

    /// Turn the top tile face up on every stack without a face-up tile.
    pub fn flip_top_face_up(&mut self) {
        for stack in &mut self.stacks {
            if stack.face_up.is_none() {
                stack.face_up = stack.face_down.pop();
            }
        }
    }

    /// Tiles left across all stacks.
    #[must_use]
    pub fn size(&self) -> usize {
        self.stacks.iter().map(WanderlustStack::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_stacks() {
        let mut rng = GameRng::new(3);
        let tiles = WanderlustTiles::initial(&mut rng);

        assert_eq!(tiles.size(), 24);
        for stack in tiles.stacks() {
            assert_eq!(stack.len(), TILES_PER_STACK);
            assert!(stack.face_up().is_some());
        }
    }

    #[test]
    fn test_remove_and_flip() {
        let mut rng = GameRng::new(3);
        let mut tiles = WanderlustTiles::initial(&mut rng);

        let taken = tiles.face_up(1).unwrap();
        assert_eq!(tiles.remove_face_up(1), Ok(taken));
        assert_eq!(tiles.remove_face_up(1), Err(DominantSpeciesError::NoTileAvailable));
        assert_eq!(tiles.size(), 23);

        tiles.flip_top_face_up();
        assert!(tiles.face_up(1).is_some());
        assert_eq!(tiles.size(), 23);
    }

    #[test]
    fn test_invalid_stack() {
        let mut rng = GameRng::new(3);
        let mut tiles = WanderlustTiles::initial(&mut rng);
        assert_eq!(tiles.remove_face_up(3), Err(DominantSpeciesError::NoTileAvailable));
    }
}

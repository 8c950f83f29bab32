//! Victory points: tile scoring, the Survival card and final scoring.

use tracing::debug;

use super::state::Game;
use crate::animals::AnimalType;
use crate::board::Hex;
use crate::core::{DominantSpeciesError, PlayerId, Result};
use crate::events::EventType;

/// Bonus points for `n` of something: 0, 1, 3, 4, 10, 15, 21, 28, 36, then
/// 45 for nine or more.
#[must_use]
pub fn bonus_vps(n: u32) -> u32 {
    const TABLE: [u32; 10] = [0, 1, 3, 4, 10, 15, 21, 28, 36, 45];
    TABLE[(n as usize).min(TABLE.len() - 1)]
}

impl Game {
    /// Award every animal on the tile its place value and mark the tile
    /// scored for this round.
    pub(crate) fn score_tile(&mut self, hex: Hex) -> Result<()> {
        let tile = self.board.tile(hex).ok_or(DominantSpeciesError::TileNotFound)?;
        let tile_type = tile.tile_type();
        let scores = tile.score();

        for (animal, vps) in scores {
            if vps == 0 {
                continue;
            }
            self.animal_mut(animal)?.add_vps(vps);
            self.emit(
                self.event(animal, EventType::GainVpsFromTile)
                    .with(vps)
                    .with(hex)
                    .with(tile_type),
            );
        }

        self.scored_tiles.push_back(hex);
        Ok(())
    }

    /// The animal with strictly the most species on tundra tiles.
    pub(crate) fn survival_animal(&self) -> Option<AnimalType> {
        let mut best: Option<(AnimalType, u32)> = None;
        let mut tied = false;

        for animal in self.playing_animals() {
            let species: u32 = self
                .board
                .tiles()
                .values()
                .filter(|t| t.is_tundra())
                .map(|t| t.species(animal))
                .sum();
            if species == 0 {
                continue;
            }
            match best {
                Some((_, most)) if species < most => {}
                Some((_, most)) if species == most => tied = true,
                _ => {
                    best = Some((animal, species));
                    tied = false;
                }
            }
        }

        if tied {
            None
        } else {
            best.map(|(animal, _)| animal)
        }
    }

    pub(crate) fn survival(&mut self) -> Result<()> {
        let Some(animal) = self.survival_animal() else {
            return Ok(());
        };
        let occupied = self
            .board
            .tiles()
            .values()
            .filter(|t| t.is_tundra() && t.has_species(animal))
            .count() as u32;

        let vps = bonus_vps(occupied);
        self.animal_mut(animal)?.add_vps(vps);
        self.emit(self.event(animal, EventType::GainBonusVps).with(vps));
        debug!(animal = %animal, vps, "survival");
        Ok(())
    }

    /// Score every tile once more at the end of the game.
    pub(crate) fn final_scoring(&mut self) -> Result<()> {
        let round = self.round;
        self.emit(self.event(self.current, EventType::FinalScoring).with(round));

        let hexes: Vec<Hex> = self.board.tiles().keys().copied().collect();
        for hex in hexes {
            self.score_tile(hex)?;
        }
        Ok(())
    }

    /// A player's score is that of their weakest animal.
    pub fn score(&self, player: PlayerId) -> Result<u32> {
        self.animals
            .values()
            .filter(|a| a.player() == player)
            .map(|a| a.score())
            .min()
            .ok_or(DominantSpeciesError::InvalidPlayer)
    }

    /// Players by score, best first; ties go to the player whose animal is
    /// higher in the food chain.
    #[must_use]
    pub fn ranking(&self) -> Vec<PlayerId> {
        let mut players: Vec<(PlayerId, u32, AnimalType)> = Vec::new();
        for animal in self.animals.values() {
            let player = animal.player();
            if players.iter().any(|(p, _, _)| *p == player) {
                continue;
            }
            if let Ok(score) = self.score(player) {
                players.push((player, score, animal.animal_type()));
            }
        }
        players.sort_by(|(_, a, x), (_, b, y)| b.cmp(a).then(x.cmp(y)));
        players.into_iter().map(|(p, _, _)| p).collect()
    }
}

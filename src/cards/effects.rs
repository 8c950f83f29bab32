//! What each dominance card does when taken.
//!
//! Some cards resolve at once; the rest queue follow-up actions for the
//! taking animal or for every animal in food-chain order.

use tracing::debug;

use super::card::Card;
use crate::actions::{ActionKind, ActionResult};
use crate::animals::AnimalType;
use crate::board::Hex;
use crate::core::{DominantSpeciesError, GameRng, Result};
use crate::display::ActionType;
use crate::events::EventType;
use crate::game::{bonus_vps, Game};
use crate::queue::PossibleAction;

impl Game {
    /// Resolve `card` for the current animal.
    pub(crate) fn apply_card(&mut self, card: Card, rng: &mut GameRng) -> Result<ActionResult> {
        let animal = self.current;
        debug!(animal = %animal, card = %card, "card");

        let mandatory = |kind| ActionResult::undo_allowed().with_follow_up(PossibleAction::mandatory(animal, kind));
        let optional = |kind| ActionResult::undo_allowed().with_follow_up(PossibleAction::optional(animal, kind));
        let nothing = ActionResult::undo_allowed;

        Ok(match card {
            Card::Aquatic => {
                if self.board.has_vacant_corner() && !self.bag.is_empty() {
                    mandatory(ActionKind::Aquatic)
                } else {
                    nothing()
                }
            }

            Card::Biodiversity => {
                let vps = self
                    .board
                    .tiles()
                    .values()
                    .filter(|t| t.has_species(animal) && t.has_opposing_species(animal))
                    .count() as u32;
                self.animal_mut(animal)?.add_vps(vps);
                self.emit(self.event(animal, EventType::GainVps).with(vps));
                nothing()
            }

            Card::Biomass => {
                if self.biomass_tiles().is_empty() {
                    nothing()
                } else {
                    mandatory(ActionKind::Biomass)
                }
            }

            Card::Blight => {
                if self.board.elements().is_empty() {
                    nothing()
                } else {
                    mandatory(ActionKind::Blight)
                }
            }

            Card::Catastrophe => mandatory(ActionKind::Catastrophe),

            Card::ColdSnap => {
                self.cold_snap()?;
                nothing()
            }

            Card::Disease => {
                let current_elements = self.animal_ref(animal)?.number_of_elements();
                let follow_ups: Vec<PossibleAction> = self
                    .playing_animals()
                    .into_iter()
                    .filter(|&a| {
                        self.animal(a)
                            .is_some_and(|x| x.can_remove_element() && x.number_of_elements() > current_elements)
                    })
                    .map(|a| PossibleAction::mandatory(a, ActionKind::RemoveElement))
                    .collect();
                nothing().with_follow_ups(follow_ups)
            }

            Card::Ecodiversity => {
                for other in self.playing_animals() {
                    let held = self.animal_ref(other)?;
                    let vps = self.board.elements().values().filter(|&&e| held.has_element(e)).count() as u32;
                    self.animal_mut(other)?.add_vps(vps);
                    self.emit(self.event(other, EventType::GainVps).with(vps));
                }
                nothing()
            }

            Card::Evolution => optional(ActionKind::Evolution),

            Card::Fecundity => {
                let a = self.animal_ref(animal)?;
                if a.gene_pool() > 0 && !self.board.tiles_with_species(animal).is_empty() {
                    optional(ActionKind::Fecundity)
                } else {
                    nothing()
                }
            }

            Card::Fertile => {
                if self.board.tiles_with_species(animal).is_empty() {
                    nothing()
                } else {
                    optional(ActionKind::Fertile)
                }
            }

            Card::Habitat => {
                if !self.bag.is_empty() && self.board.has_vacant_corner() {
                    mandatory(ActionKind::Habitat)
                } else {
                    nothing()
                }
            }

            Card::Hibernation => {
                if self.animal_ref(animal)?.eliminated_species() > 0 {
                    optional(ActionKind::Hibernation)
                } else {
                    nothing()
                }
            }

            Card::IceAge => {
                for other in self.playing_animals() {
                    let dominated = self
                        .board
                        .tiles()
                        .values()
                        .filter(|t| t.dominant() == Some(other))
                        .count() as u32;
                    if dominated == 0 {
                        continue;
                    }
                    let vps = bonus_vps(dominated);
                    self.animal_mut(other)?.add_vps(vps);
                    self.emit(self.event(other, EventType::GainBonusVps).with(vps));
                }
                nothing()
            }

            Card::IceSheet => {
                if self.can_glaciate() {
                    mandatory(ActionKind::Glaciation)
                } else {
                    nothing()
                }
            }

            Card::Immigrants => {
                let follow_ups: Vec<PossibleAction> = self
                    .playing_animals()
                    .into_iter()
                    .map(|a| {
                        let can_remove = self.animal(a).is_some_and(|x| x.can_remove_element());
                        let kinds = [
                            ActionKind::RemoveElement,
                            ActionKind::RemoveActionPawn,
                            ActionKind::RemoveAllBut1SpeciesOnEachTile,
                        ];
                        let skip = usize::from(!can_remove);
                        PossibleAction::choice(a, kinds.into_iter().skip(skip))
                    })
                    .collect();
                nothing().with_follow_ups(follow_ups)
            }

            Card::Instinct => {
                let can_place = self
                    .display
                    .possible_placements()
                    .iter()
                    .any(|&(t, _)| t != ActionType::Initiative);
                if can_place {
                    mandatory(ActionKind::PlaceActionPawn)
                } else {
                    nothing()
                }
            }

            Card::Intelligence => {
                let index = animal.food_chain_index();
                self.gain_action_pawns(|a| a.food_chain_index() <= index)?;
                nothing()
            }

            Card::MassExodus => mandatory(ActionKind::MassExodus),

            Card::Metamorphosis => {
                let removable = self.animal_ref(animal)?.removable_element_types();
                if self.bag.is_empty() || removable.is_empty() {
                    nothing()
                } else if self.bag.contains_any(&removable) {
                    optional(ActionKind::Metamorphosis)
                } else {
                    mandatory(ActionKind::Metamorphosis)
                }
            }

            Card::NicheBiomes => {
                self.niche_biomes()?;
                nothing()
            }

            Card::Nocturnal => {
                self.move_forward_on_initiative(animal)?;
                self.emit(self.event(animal, EventType::Initiative));
                nothing()
            }

            Card::Omnivore => {
                self.animal_mut(animal)?.add_action_pawn();
                self.emit(self.event(animal, EventType::GainActionPawn));
                nothing()
            }

            Card::Parasitism => {
                let index = animal.food_chain_index();
                self.gain_action_pawns(|a| a.food_chain_index() >= index)?;
                nothing()
            }

            Card::Predator => {
                if self.predator_tiles().is_empty() {
                    nothing()
                } else {
                    mandatory(ActionKind::Predator)
                }
            }

            Card::Symbiotic => {
                self.symbiotic(rng)?;
                ActionResult::undo_not_allowed()
            }
        })
    }

    /// Whether any tile could be glaciated now.
    fn can_glaciate(&self) -> bool {
        self.tundra_tiles > 0
            && self.board.tiles().iter().any(|(h, t)| {
                !t.is_tundra() && self.board.adjacent_tiles(*h).any(|(_, adj)| adj.is_tundra())
            })
    }

    /// Every other player's animals lose one species on each tundra tile.
    fn cold_snap(&mut self) -> Result<()> {
        let player = self.animal_ref(self.current)?.player();
        let others: Vec<AnimalType> = self
            .playing_animals()
            .into_iter()
            .filter(|&a| self.animal(a).is_some_and(|x| x.player() != player))
            .collect();
        let tundra: Vec<Hex> = self
            .board
            .tiles()
            .iter()
            .filter(|(_, t)| t.is_tundra())
            .map(|(h, _)| *h)
            .collect();

        for hex in tundra {
            for &other in &others {
                let tile = self.board.tile_mut(hex)?;
                if !tile.has_species(other) {
                    continue;
                }
                tile.remove_species(other, 1)?;
                let tile_type = tile.tile_type();
                self.animal_mut(other)?.add_eliminated_species(1);
                self.emit(
                    self.event(other, EventType::EliminateSpecies)
                        .with(other)
                        .with(1u32)
                        .with(hex)
                        .with(tile_type),
                );
            }
        }
        Ok(())
    }

    /// Animals scoring above the current one lose the first-place value of
    /// the last tile scored.
    fn niche_biomes(&mut self) -> Result<()> {
        let hex = self.scored_tiles.back().copied().ok_or(DominantSpeciesError::NoTileScored)?;
        let tile_type = self.board.tile(hex).ok_or(DominantSpeciesError::TileNotFound)?.tile_type();
        let first_place = tile_type.score(0);
        let own = self.animal_ref(self.current)?.score();

        for other in self.playing_animals() {
            if self.animal_ref(other)?.score() <= own {
                continue;
            }
            let lost = self.animal_mut(other)?.lose_vps(first_place);
            self.emit(self.event(other, EventType::LoseVps).with(lost));
        }
        Ok(())
    }

    fn gain_action_pawns(&mut self, filter: impl Fn(AnimalType) -> bool) -> Result<()> {
        for other in self.playing_animals().into_iter().filter(|&a| filter(a)) {
            self.animal_mut(other)?.add_action_pawn();
            self.emit(self.event(other, EventType::GainActionPawn));
        }
        Ok(())
    }

    /// The current animal and every animal with fewer elements draw one
    /// element from the bag.
    fn symbiotic(&mut self, rng: &mut GameRng) -> Result<()> {
        let current = self.current;
        let count = self.animal_ref(current)?.number_of_elements();

        for other in self.playing_animals() {
            let a = self.animal_ref(other)?;
            if other != current && a.number_of_elements() >= count {
                continue;
            }
            if !a.can_add_element() || self.bag.is_empty() {
                continue;
            }
            let element = self.bag.draw(rng)?;
            self.animal_mut(other)?.add_element(element)?;
            self.emit(self.event(other, EventType::AddElementToAnimal).with(element));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{INITIAL_MOUNTAIN, INITIAL_SEA};
    use crate::core::{GameConfig, PlayerId};

    fn game(animals: &[AnimalType]) -> Game {
        let mut config = GameConfig::new();
        for (i, &animal) in animals.iter().enumerate() {
            config = config.with_animal(animal, PlayerId::new(i as u8));
        }
        Game::start(&config, &mut GameRng::new(17)).unwrap()
    }

    fn apply(game: &mut Game, card: Card) -> ActionResult {
        game.apply_card(card, &mut GameRng::new(0)).unwrap()
    }

    #[test]
    fn test_catastrophe_is_mandatory() {
        let mut game = game(&[AnimalType::Mammals, AnimalType::Reptiles]);
        let result = apply(&mut game, Card::Catastrophe);

        assert_eq!(
            result.follow_ups.as_slice(),
            &[PossibleAction::mandatory(AnimalType::Reptiles, ActionKind::Catastrophe)]
        );
    }

    #[test]
    fn test_omnivore_gains_pawn() {
        let mut game = game(&[AnimalType::Mammals, AnimalType::Reptiles]);
        let pawns = game.animal(AnimalType::Reptiles).unwrap().action_pawns();

        let result = apply(&mut game, Card::Omnivore);

        assert!(result.follow_ups.is_empty());
        assert_eq!(game.animal(AnimalType::Reptiles).unwrap().action_pawns(), pawns + 1);
    }

    #[test]
    fn test_intelligence_and_parasitism_split_food_chain() {
        let mut game = game(&[AnimalType::Mammals, AnimalType::Birds, AnimalType::Insects]);
        game.current = AnimalType::Birds;
        let before: Vec<u32> = game.playing_animals().iter().map(|&a| game.animal(a).unwrap().action_pawns()).collect();

        apply(&mut game, Card::Intelligence);
        let after: Vec<u32> = game.playing_animals().iter().map(|&a| game.animal(a).unwrap().action_pawns()).collect();
        // Mammals and Birds are at or above the Birds.
        assert_eq!(after, vec![before[0] + 1, before[1] + 1, before[2]]);

        apply(&mut game, Card::Parasitism);
        let last: Vec<u32> = game.playing_animals().iter().map(|&a| game.animal(a).unwrap().action_pawns()).collect();
        assert_eq!(last, vec![after[0], after[1] + 1, after[2] + 1]);
    }

    #[test]
    fn test_niche_biomes_needs_scored_tile() {
        let mut game = game(&[AnimalType::Mammals, AnimalType::Reptiles]);
        assert_eq!(
            game.apply_card(Card::NicheBiomes, &mut GameRng::new(0)),
            Err(DominantSpeciesError::NoTileScored)
        );

        // Mountain scores 3 for first place.
        game.score_tile(INITIAL_MOUNTAIN).unwrap();
        game.animal_mut(AnimalType::Mammals).unwrap().add_vps(5);
        apply(&mut game, Card::NicheBiomes);

        // Reptiles placed first with fewer species; Mammals end above them.
        assert_eq!(game.animal(AnimalType::Mammals).unwrap().score(), 2 + 5 - 3);
        assert_eq!(game.animal(AnimalType::Reptiles).unwrap().score(), 3);
    }

    #[test]
    fn test_cold_snap_hits_other_players_on_tundra() {
        // The sea starts as tundra.
        let mut game = game(&[AnimalType::Mammals, AnimalType::Reptiles]);
        game.board.tile_mut(INITIAL_SEA).unwrap().add_species(AnimalType::Mammals, 1).unwrap();
        game.board.tile_mut(INITIAL_SEA).unwrap().add_species(AnimalType::Reptiles, 1).unwrap();
        let eliminated = game.animal(AnimalType::Mammals).unwrap().eliminated_species();

        apply(&mut game, Card::ColdSnap);

        let sea = game.board().tile(INITIAL_SEA).unwrap();
        assert!(!sea.has_species(AnimalType::Mammals));
        assert!(sea.has_species(AnimalType::Reptiles));
        assert_eq!(game.animal(AnimalType::Mammals).unwrap().eliminated_species(), eliminated + 1);
    }

    #[test]
    fn test_immigrants_offers_choice_to_everyone() {
        let mut game = game(&[AnimalType::Mammals, AnimalType::Reptiles]);
        let result = apply(&mut game, Card::Immigrants);

        assert_eq!(result.follow_ups.len(), 2);
        assert_eq!(result.follow_ups[0].animal, AnimalType::Mammals);
        assert!(result.follow_ups[0].can_perform(ActionKind::RemoveActionPawn));
        assert!(result.follow_ups[1].can_perform(ActionKind::RemoveAllBut1SpeciesOnEachTile));
        // Starting elements cannot be removed.
        assert!(!result.follow_ups[0].can_perform(ActionKind::RemoveElement));
    }

    #[test]
    fn test_ice_age_rewards_dominance() {
        let mut game = game(&[AnimalType::Mammals, AnimalType::Reptiles]);
        let dominated = game
            .board()
            .tiles()
            .values()
            .filter(|t| t.dominant() == Some(AnimalType::Mammals))
            .count() as u32;

        apply(&mut game, Card::IceAge);

        assert_eq!(game.animal(AnimalType::Mammals).unwrap().score(), bonus_vps(dominated));
    }

    #[test]
    fn test_symbiotic_feeds_the_poorer() {
        let mut game = game(&[AnimalType::Mammals, AnimalType::Reptiles]);
        let bag = game.bag().len();
        let result = apply(&mut game, Card::Symbiotic);

        assert!(!result.can_undo);
        // Both start with two elements: only the current animal draws.
        assert_eq!(game.bag().len(), bag - 1);
        assert_eq!(game.animal(AnimalType::Reptiles).unwrap().number_of_elements(), 3);
    }

    #[test]
    fn test_ice_sheet_needs_glaciation_target() {
        let mut game = game(&[AnimalType::Mammals, AnimalType::Reptiles]);
        // Every starting tile lies next to the tundra sea.
        assert!(game.can_glaciate());
        let result = apply(&mut game, Card::IceSheet);
        assert_eq!(result.follow_ups.len(), 1);

        game.tundra_tiles = 0;
        assert!(apply(&mut game, Card::IceSheet).follow_ups.is_empty());
    }
}

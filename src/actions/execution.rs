//! Rules for the actions taken from the action display.
//!
//! Every method acts for the game's current animal, checks all of its
//! preconditions first and only then mutates. The pawn that triggered the
//! action goes back to its owner once the action is done, except for free
//! pawns, which stay reserved on the display.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use super::action::{ActionResult, SpeciesMove, TileSpecies};
use super::kind::ActionKind;
use crate::animals::{AnimalType, ElementType};
use crate::board::{Corner, Hex, Tile, TileType};
use crate::cards::Card;
use crate::core::{DominantSpeciesError, GameRng, Result};
use crate::display::ActionType;
use crate::events::EventType;
use crate::game::{bonus_vps, Game, Phase};
use crate::queue::PossibleAction;

/// Species a Migration may move, by space.
const MIGRATION_MAX_SPECIES: [u32; 6] = [7, 6, 5, 4, 3, 2];

/// Element a Speciation space works from, by space.
const SPECIATION_ELEMENTS: [ElementType; 6] = [
    ElementType::Meat,
    ElementType::Sun,
    ElementType::Seed,
    ElementType::Water,
    ElementType::Grub,
    ElementType::Grass,
];

/// Element type a Speciation space works from.
#[must_use]
pub fn speciation_element(index: usize) -> Option<ElementType> {
    SPECIATION_ELEMENTS.get(index).copied()
}

/// Most species a Migration space may move.
#[must_use]
pub fn migration_max_species(index: usize) -> u32 {
    MIGRATION_MAX_SPECIES.get(index).copied().unwrap_or(0)
}

/// Distinct element types, first occurrence first.
pub(crate) fn distinct_elements(elements: &[ElementType]) -> SmallVec<[ElementType; 6]> {
    let mut distinct = SmallVec::new();
    for &e in elements {
        if !distinct.contains(&e) {
            distinct.push(e);
        }
    }
    distinct
}

/// Tile types a Competition space may target; tundra tiles always qualify.
#[must_use]
pub fn competition_tile_types(index: usize) -> &'static [TileType] {
    use TileType::*;
    match index {
        0 => &TileType::ALL,
        1 => &[Jungle, Wetland],
        2 => &[Wetland, Desert],
        3 => &[Desert, Forest],
        4 => &[Forest, Savannah],
        5 => &[Savannah, Mountain],
        6 => &[Mountain, Sea],
        7 => &[Sea, Jungle],
        _ => &[],
    }
}

/// Most species a single speciation may put on a tile.
#[must_use]
pub fn max_speciation(tile: &Tile) -> u32 {
    if tile.is_tundra() {
        1
    } else {
        tile.tile_type().max_speciation()
    }
}

impl Game {
    pub(crate) fn apply_place_action_pawn(&mut self, action_type: ActionType, index: usize) -> Result<ActionResult> {
        let animal = self.current;

        if self.phase == Phase::Execution && action_type == ActionType::Initiative {
            return Err(DominantSpeciesError::ActionSpaceNotAllowed);
        }
        self.display.check_placement(action_type, index)?;

        if self.phase != Phase::Execution {
            self.animal_mut(animal)?.remove_action_pawn()?;
        }
        self.display.place_action_pawn(animal, action_type, index)?;

        self.emit(
            self.event(animal, EventType::PlaceActionPawn)
                .with(action_type)
                .with(index as u32 + 1),
        );
        Ok(ActionResult::undo_allowed())
    }

    pub(crate) fn apply_adaptation(&mut self, element: ElementType) -> Result<ActionResult> {
        let animal = self.current;

        if !self.display.elements(ActionType::Adaptation).contains(&element) {
            return Err(DominantSpeciesError::ElementNotAvailable);
        }
        if !self.animal_ref(animal)?.can_add_element() {
            return Err(DominantSpeciesError::MaxElementsReached);
        }

        self.return_current_action_pawn()?;
        self.display.remove_element(ActionType::Adaptation, element)?;
        self.animal_mut(animal)?.add_element(element)?;

        self.emit(self.event(animal, EventType::Adaptation).with(element));
        Ok(ActionResult::undo_allowed())
    }

    /// `skip` names the box types the animal protects, one per pawn placed.
    pub(crate) fn apply_regression(&mut self, skip: &[ElementType]) -> Result<ActionResult> {
        let animal = self.current;
        let skip = distinct_elements(skip);

        let pawns = self.display.number_of_action_pawns(ActionType::Regression, animal);
        if skip.len() as u32 > pawns {
            return Err(DominantSpeciesError::CannotSkipMoreElementTypesThanActionPawnsPlaced);
        }

        let box_types = distinct_elements(self.display.elements(ActionType::Regression));
        self.emit(
            self.event(animal, EventType::Regression)
                .with(pawns)
                .with(box_types.len() as u32),
        );
        for &element in &skip {
            self.emit(self.event(animal, EventType::SkipRegressionOfElement).with(element));
        }

        for element in box_types.into_iter().filter(|e| !skip.contains(e)) {
            let a = self.animal_mut(animal)?;
            if a.can_remove_element_type(element) {
                a.remove_element(element)?;
                self.emit(self.event(animal, EventType::RemoveElementFromAnimal).with(element));
            }
        }

        self.return_regression_pawns(animal)?;
        Ok(ActionResult::undo_allowed())
    }

    pub(crate) fn apply_abundance(&mut self, element: ElementType, corner: Corner) -> Result<ActionResult> {
        let animal = self.current;

        if !self.display.elements(ActionType::Abundance).contains(&element) {
            return Err(DominantSpeciesError::ElementNotAvailable);
        }
        self.board.check_element_placement(corner)?;

        self.return_current_action_pawn()?;
        self.display.remove_element(ActionType::Abundance, element)?;
        self.board.add_element(corner, element)?;

        self.emit(self.event(animal, EventType::Abundance).with(element).with(corner));
        Ok(ActionResult::undo_allowed())
    }

    pub(crate) fn apply_wasteland(&mut self, element: ElementType) -> Result<ActionResult> {
        let animal = self.current;

        if !self.display.elements(ActionType::Wasteland).contains(&element) {
            return Err(DominantSpeciesError::ElementNotAvailable);
        }

        self.return_current_action_pawn()?;
        self.display.remove_element(ActionType::Wasteland, element)?;
        self.bag.add(element);

        self.emit(self.event(animal, EventType::Wasteland).with(element));
        Ok(ActionResult::undo_allowed())
    }

    pub(crate) fn apply_depletion(&mut self, corner: Corner) -> Result<ActionResult> {
        let animal = self.current;

        let element = self.board.element(corner).ok_or(DominantSpeciesError::NoElementAtCorner)?;
        if !self.display.elements(ActionType::Depletion).contains(&element) {
            return Err(DominantSpeciesError::ElementNotInDepletionBox);
        }

        self.return_current_action_pawn()?;
        self.board.remove_element(corner)?;
        self.bag.add(element);

        self.emit(self.event(animal, EventType::Depletion).with(element).with(corner));
        Ok(ActionResult::undo_allowed())
    }

    /// Also the follow-up of Ice Sheet; the pawn only returns when the
    /// display is executing Glaciation.
    pub(crate) fn apply_glaciation(&mut self, hex: Hex) -> Result<ActionResult> {
        let animal = self.current;

        let tile = self.board.tile(hex).ok_or(DominantSpeciesError::TileNotFound)?;
        let adjacent_tundra = self.board.adjacent_tiles(hex).filter(|(_, t)| t.is_tundra()).count() as u32;
        if adjacent_tundra == 0 {
            return Err(DominantSpeciesError::MustBeAdjacentToTundraTile);
        }
        if tile.is_tundra() {
            return Err(DominantSpeciesError::AlreadyTundra);
        }
        if self.tundra_tiles == 0 {
            return Err(DominantSpeciesError::NoTundraTileAvailable);
        }
        let tile_type = tile.tile_type();

        if self.display.executing() == ActionType::Glaciation {
            self.return_current_action_pawn()?;
        }

        self.tundra_tiles -= 1;
        self.board.tile_mut(hex)?.glaciate()?;
        self.emit(self.event(animal, EventType::Glaciation).with(hex).with(tile_type));

        // Elements enclosed by three tundra tiles leave the game.
        let enclosed: Vec<Corner> = self
            .board
            .adjacent_elements(hex)
            .map(|(corner, _)| corner)
            .filter(|corner| {
                corner
                    .hexes()
                    .iter()
                    .all(|&h| self.board.tile(h).is_some_and(Tile::is_tundra))
            })
            .collect();
        for corner in enclosed {
            let element = self.board.remove_element(corner)?;
            self.emit(self.event(animal, EventType::RemoveElement).with(element).with(corner));
        }

        let present: Vec<(AnimalType, u32)> = self
            .board
            .tile(hex)
            .map(|t| t.animals().map(|a| (a, t.species(a))).collect())
            .unwrap_or_default();
        for (other, species) in present {
            let removed = species - 1;
            if removed > 0 {
                self.board.tile_mut(hex)?.remove_species(other, removed)?;
                self.animal_mut(other)?.add_species_to_gene_pool(removed);
                self.emit(
                    self.event(other, EventType::RemoveSpecies)
                        .with(other)
                        .with(removed)
                        .with(hex)
                        .with(tile_type),
                );
            }
        }

        let vps = bonus_vps(adjacent_tundra);
        self.animal_mut(animal)?.add_vps(vps);
        self.emit(self.event(animal, EventType::GainBonusVps).with(vps));

        Ok(ActionResult::undo_allowed())
    }

    pub(crate) fn apply_speciation(
        &mut self,
        corner: Option<Corner>,
        tiles: &[Hex],
        species: &[u32],
    ) -> Result<ActionResult> {
        let animal = self.current;

        let pawn = self
            .display
            .current_action_pawn()
            .filter(|p| p.animal == animal && p.action_type == ActionType::Speciation)
            .ok_or(DominantSpeciesError::NoActionPawn)?;

        if tiles.is_empty() {
            return Err(DominantSpeciesError::MustSelectAtLeast1Tile);
        }
        if species.len() != tiles.len() {
            return Err(DominantSpeciesError::MustSpecifySpeciesForEachTile);
        }

        if pawn.is_free() && animal == AnimalType::Insects {
            if tiles.len() != 1 {
                return Err(DominantSpeciesError::MustSelect1Tile);
            }
            if species[0] > 1 {
                return Err(DominantSpeciesError::MaxSpeciesExceeded);
            }
        } else {
            if tiles.len() > 3 {
                return Err(DominantSpeciesError::MustSelectUpTo3Tiles);
            }
            let corner = corner.ok_or(DominantSpeciesError::ElementNotFound)?;
            let element = self.board.element(corner).ok_or(DominantSpeciesError::ElementNotFound)?;
            if speciation_element(pawn.index) != Some(element) {
                return Err(DominantSpeciesError::InvalidElementType);
            }
            if !tiles.iter().all(|&h| corner.is_adjacent(h)) {
                return Err(DominantSpeciesError::MustBeAdjacentToElement);
            }
        }

        for (i, hex) in tiles.iter().enumerate() {
            if tiles[..i].contains(hex) {
                return Err(DominantSpeciesError::DuplicateTiles);
            }
            let tile = self.board.tile(*hex).ok_or(DominantSpeciesError::TileNotFound)?;
            if species[i] > max_speciation(tile) {
                return Err(DominantSpeciesError::MaxSpeciesExceeded);
            }
        }
        let total: u32 = species.iter().sum();
        if total > self.animal_ref(animal)?.gene_pool() {
            return Err(DominantSpeciesError::NotEnoughSpeciesInGenePool);
        }

        for (&hex, &n) in tiles.iter().zip(species) {
            if n == 0 {
                continue;
            }
            self.animal_mut(animal)?.remove_species_from_gene_pool(n)?;
            let tile = self.board.tile_mut(hex)?;
            tile.add_species(animal, n)?;
            let tile_type = tile.tile_type();
            self.emit(self.event(animal, EventType::Speciation).with(n).with(hex).with(tile_type));
        }

        self.return_current_action_pawn()?;
        Ok(ActionResult::undo_allowed())
    }

    pub(crate) fn apply_wanderlust(
        &mut self,
        stack: usize,
        hex: Hex,
        element: Option<(ElementType, Corner)>,
    ) -> Result<ActionResult> {
        let animal = self.current;

        let tile_type = self.wanderlust.face_up(stack).ok_or(DominantSpeciesError::NoTileAvailable)?;
        self.board.check_tile_placement(hex)?;
        if let Some((e, corner)) = element {
            if !self.display.elements(ActionType::Wanderlust).contains(&e) {
                return Err(DominantSpeciesError::ElementNotAvailable);
            }
            if !corner.is_adjacent(hex) {
                return Err(DominantSpeciesError::MustBeAdjacentToTile);
            }
            if self.board.element(corner).is_some() {
                return Err(DominantSpeciesError::AlreadyElementAtCorner);
            }
            if !corner.is_on_board() {
                return Err(DominantSpeciesError::InvalidCorner);
            }
        }

        self.return_current_action_pawn()?;
        self.wanderlust.remove_face_up(stack)?;
        self.board.add_tile(hex, Tile::initial(tile_type, false))?;
        self.emit(
            self.event(animal, EventType::Wanderlust)
                .with(stack as u32 + 1)
                .with(tile_type)
                .with(hex),
        );

        if let Some((e, corner)) = element {
            self.display.remove_element(ActionType::Wanderlust, e)?;
            self.board.add_element(corner, e)?;
            self.emit(self.event(animal, EventType::AddElement).with(e).with(corner));
        }

        let adjacent: Vec<Hex> = self.board.adjacent_tiles(hex).map(|(h, _)| h).collect();
        let vps = bonus_vps(adjacent.len() as u32);
        self.animal_mut(animal)?.add_vps(vps);
        self.emit(self.event(animal, EventType::GainBonusVps).with(vps));

        let movers = self.playing_animals().into_iter().filter(|&a| {
            adjacent
                .iter()
                .any(|&h| self.board.tile(h).is_some_and(|t| t.has_species(a)))
        });
        let follow_ups: Vec<PossibleAction> = movers
            .map(|a| PossibleAction::optional(a, ActionKind::WanderlustMove))
            .collect();

        Ok(ActionResult::undo_allowed().with_follow_ups(follow_ups))
    }

    pub(crate) fn apply_wanderlust_move(&mut self, moves: &[TileSpecies]) -> Result<ActionResult> {
        let animal = self.current;

        if moves.iter().any(|m| m.species == 0) {
            return Err(DominantSpeciesError::InvalidMove);
        }
        let target = self.board.last_placed_tile().ok_or(DominantSpeciesError::NoTileSelected)?;
        let target_type = self.board.tile(target).ok_or(DominantSpeciesError::TileNotFound)?.tile_type();

        let mut grouped: BTreeMap<Hex, u32> = BTreeMap::new();
        for m in moves {
            *grouped.entry(m.hex).or_default() += m.species;
        }

        for (&from, &n) in &grouped {
            let tile = self.board.tile(from).ok_or(DominantSpeciesError::TileNotFound)?;
            if !from.is_adjacent(target) {
                return Err(DominantSpeciesError::MustBeAdjacentToTile);
            }
            if tile.species(animal) < n {
                return Err(DominantSpeciesError::NotEnoughSpeciesOnTile);
            }
        }

        for (from, n) in grouped {
            let from_tile = self.board.tile_mut(from)?;
            from_tile.remove_species(animal, n)?;
            let from_type = from_tile.tile_type();
            self.board.tile_mut(target)?.add_species(animal, n)?;
            self.emit(
                self.event(animal, EventType::MoveSpecies)
                    .with(animal)
                    .with(n)
                    .with(from)
                    .with(from_type)
                    .with(target)
                    .with(target_type),
            );
        }

        Ok(ActionResult::undo_allowed())
    }

    pub(crate) fn apply_migration(&mut self, moves: &[SpeciesMove]) -> Result<ActionResult> {
        let animal = self.current;

        let pawn = self
            .display
            .current_action_pawn()
            .filter(|p| p.animal == animal && p.action_type == ActionType::Migration)
            .ok_or(DominantSpeciesError::NoActionPawn)?;
        let max_species = migration_max_species(pawn.index);
        let max_distance = if animal == AnimalType::Birds { 2 } else { 1 };

        if moves.iter().any(|m| m.species == 0 || m.from == m.to) {
            return Err(DominantSpeciesError::InvalidMove);
        }
        if moves.iter().map(|m| m.species).sum::<u32>() > max_species {
            return Err(DominantSpeciesError::MaxSpeciesExceeded);
        }
        if moves.iter().any(|m| m.from.distance(m.to) > max_distance) {
            return Err(DominantSpeciesError::MaxDistanceExceeded);
        }
        if moves
            .iter()
            .any(|m| !self.board.can_move_through_tiles(m.from, m.to, max_distance))
        {
            return Err(DominantSpeciesError::CannotMoveThroughBlankHex);
        }

        // Only species already on a source tile may leave it.
        let mut leaving: BTreeMap<Hex, u32> = BTreeMap::new();
        for m in moves {
            *leaving.entry(m.from).or_default() += m.species;
        }
        for (&from, &n) in &leaving {
            let tile = self.board.tile(from).ok_or(DominantSpeciesError::TileNotFound)?;
            if tile.species(animal) < n {
                return Err(DominantSpeciesError::NotEnoughSpeciesOnTile);
            }
        }

        let mut grouped: BTreeMap<(Hex, Hex), u32> = BTreeMap::new();
        for m in moves {
            *grouped.entry((m.from, m.to)).or_default() += m.species;
        }

        self.return_current_action_pawn()?;
        for ((from, to), n) in grouped {
            let from_tile = self.board.tile_mut(from)?;
            from_tile.remove_species(animal, n)?;
            let from_type = from_tile.tile_type();
            let to_tile = self.board.tile_mut(to)?;
            to_tile.add_species(animal, n)?;
            let to_type = to_tile.tile_type();
            self.emit(
                self.event(animal, EventType::Migration)
                    .with(n)
                    .with(from)
                    .with(from_type)
                    .with(to)
                    .with(to_type),
            );
        }

        Ok(ActionResult::undo_allowed())
    }

    /// Tiles the current animal may compete on from its Competition pawn.
    pub(crate) fn competition_tiles(&self) -> Result<Vec<Hex>> {
        let animal = self.current;
        let pawn = self
            .display
            .current_action_pawn()
            .filter(|p| p.animal == animal && p.action_type == ActionType::Competition)
            .ok_or(DominantSpeciesError::NoActionPawn)?;
        let types = competition_tile_types(pawn.index);

        Ok(self
            .board
            .tiles()
            .iter()
            .filter(|(_, t)| t.is_tundra() || types.contains(&t.tile_type()))
            .filter(|(_, t)| t.has_species(animal) && t.has_opposing_species(animal))
            .map(|(h, _)| *h)
            .collect())
    }

    pub(crate) fn apply_competition(&mut self, tiles: &[Hex], animals: &[AnimalType]) -> Result<ActionResult> {
        let animal = self.current;

        let possible = self.competition_tiles()?;
        if tiles.len() != animals.len() {
            return Err(DominantSpeciesError::MustSelectAnimalForEachTile);
        }
        if animals.contains(&animal) {
            return Err(DominantSpeciesError::NotOpposingSpecies);
        }
        if !tiles.iter().all(|h| possible.contains(h)) {
            return Err(DominantSpeciesError::InvalidTile);
        }

        let mut types: SmallVec<[TileType; 8]> = SmallVec::new();
        for &hex in tiles {
            let tile_type = self.board.tile(hex).ok_or(DominantSpeciesError::TileNotFound)?.tile_type();
            if types.contains(&tile_type) {
                return Err(DominantSpeciesError::DuplicateTileTypes);
            }
            types.push(tile_type);
        }
        for (&hex, &target) in tiles.iter().zip(animals) {
            if !self.board.tile(hex).is_some_and(|t| t.has_species(target)) {
                return Err(DominantSpeciesError::NotEnoughSpeciesOnTile);
            }
        }

        self.return_current_action_pawn()?;
        for (&hex, &target) in tiles.iter().zip(animals) {
            let tile = self.board.tile_mut(hex)?;
            tile.remove_species(target, 1)?;
            let tile_type = tile.tile_type();
            self.animal_mut(target)?.add_eliminated_species(1);
            self.emit(
                self.event(animal, EventType::Competition)
                    .with(target)
                    .with(hex)
                    .with(tile_type),
            );
        }

        Ok(ActionResult::undo_allowed())
    }

    pub(crate) fn apply_domination(&mut self, hex: Hex) -> Result<ActionResult> {
        let animal = self.current;

        let tile = self.board.tile(hex).ok_or(DominantSpeciesError::TileNotFound)?;
        if self.scored_tiles.contains(&hex) {
            return Err(DominantSpeciesError::TileAlreadyScored);
        }
        let tile_type = tile.tile_type();
        let dominant = tile.dominant();

        self.return_current_action_pawn()?;
        self.emit(
            self.event(animal, EventType::Domination)
                .with(hex)
                .with(tile_type)
                .with(dominant),
        );
        self.score_tile(hex)?;

        let result = ActionResult::undo_allowed();
        Ok(match dominant {
            Some(d) if !self.available_cards.is_empty() => {
                result.with_follow_up(PossibleAction::mandatory(d, ActionKind::DominanceCard))
            }
            _ => result,
        })
    }

    pub(crate) fn apply_dominance_card(&mut self, card: Card, rng: &mut GameRng) -> Result<ActionResult> {
        let animal = self.current;

        if self.available_cards.remove(&card).is_none() {
            return Err(DominantSpeciesError::CardNotAvailable);
        }
        self.emit(self.event(animal, EventType::Card).with(card));

        self.apply_card(card, rng)
    }

    pub(crate) fn apply_save_from_extinction(&mut self, hex: Hex) -> Result<ActionResult> {
        let animal = self.current;

        if animal != AnimalType::Mammals {
            return Err(DominantSpeciesError::MustBeMammals);
        }
        let tile_type = self.board.tile(hex).ok_or(DominantSpeciesError::TileNotFound)?.tile_type();

        self.emit(self.event(animal, EventType::SaveFromExtinction).with(hex).with(tile_type));
        self.extinction(Some(hex))?;

        Ok(ActionResult::undo_not_allowed())
    }
}

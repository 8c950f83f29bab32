//! Rules for the follow-up actions queued by dominance cards.
//!
//! These run outside the action display: no pawn is involved, except for
//! `RemoveActionPawn`, which takes one from the animal's supply.

use std::collections::BTreeMap;

use super::action::{ActionResult, ExodusMove};
use crate::animals::{AnimalType, ElementType};
use crate::board::{Corner, Hex};
use crate::core::{DominantSpeciesError, Result};
use crate::events::EventType;
use crate::game::Game;

/// Most species Aquatic may add.
pub const AQUATIC_MAX_SPECIES: u32 = 4;

/// Most eliminated species Hibernation may bring back.
pub const HIBERNATION_MAX_SPECIES: u32 = 5;

/// Most tiles Evolution may touch.
pub const EVOLUTION_MAX_TILES: usize = 2;

impl Game {
    /// Tiles holding more species than elements around them.
    pub(crate) fn biomass_tiles(&self) -> Vec<Hex> {
        self.board
            .tiles()
            .iter()
            .filter(|(h, t)| t.total_species() as usize > self.board.adjacent_elements(**h).count())
            .map(|(h, _)| *h)
            .collect()
    }

    /// Tiles of the current animal that hold opposing species.
    pub(crate) fn predator_tiles(&self) -> Vec<Hex> {
        let animal = self.current;
        self.board
            .tiles()
            .iter()
            .filter(|(_, t)| t.has_species(animal) && t.has_opposing_species(animal))
            .map(|(h, _)| *h)
            .collect()
    }

    fn eliminate(&mut self, hex: Hex, animal: AnimalType, species: u32) -> Result<()> {
        let tile = self.board.tile_mut(hex)?;
        tile.remove_species(animal, species)?;
        let tile_type = tile.tile_type();
        self.animal_mut(animal)?.add_eliminated_species(species);
        self.emit(
            self.event(animal, EventType::EliminateSpecies)
                .with(animal)
                .with(species)
                .with(hex)
                .with(tile_type),
        );
        Ok(())
    }

    pub(crate) fn apply_remove_element(&mut self, element: ElementType) -> Result<ActionResult> {
        let animal = self.current;
        self.animal_mut(animal)?.remove_element(element)?;
        self.emit(self.event(animal, EventType::RemoveElementFromAnimal).with(element));
        Ok(ActionResult::undo_allowed())
    }

    pub(crate) fn apply_remove_action_pawn(&mut self) -> Result<ActionResult> {
        let animal = self.current;
        self.animal_mut(animal)?.remove_action_pawn()?;
        self.emit(self.event(animal, EventType::RemoveActionPawn));
        Ok(ActionResult::undo_allowed())
    }

    pub(crate) fn apply_remove_all_but_1_species(&mut self) -> Result<ActionResult> {
        let animal = self.current;
        let crowded: Vec<(Hex, u32)> = self
            .board
            .tiles()
            .iter()
            .filter(|(_, t)| t.species(animal) > 1)
            .map(|(h, t)| (*h, t.species(animal) - 1))
            .collect();

        for (hex, species) in crowded {
            self.eliminate(hex, animal, species)?;
        }
        Ok(ActionResult::undo_allowed())
    }

    pub(crate) fn apply_aquatic(
        &mut self,
        element: ElementType,
        corner: Corner,
        tile: Option<Hex>,
        species: u32,
    ) -> Result<ActionResult> {
        let animal = self.current;

        if species > AQUATIC_MAX_SPECIES {
            return Err(DominantSpeciesError::Max4SpeciesAllowed);
        }
        if !self.board.corner_tiles(corner).any(|(_, t)| t.tile_type().is_aquatic()) {
            return Err(DominantSpeciesError::MustBeAdjacentToAquaticTile);
        }
        if !self.bag.contains(element) {
            return Err(DominantSpeciesError::ElementNotInDrawBag);
        }
        self.board.check_element_placement(corner)?;

        match tile {
            Some(hex) => {
                if !corner.is_adjacent(hex) {
                    return Err(DominantSpeciesError::MustBeAdjacentToTile);
                }
                let target = self.board.tile(hex).ok_or(DominantSpeciesError::TileNotFound)?;
                if !target.tile_type().is_aquatic() {
                    return Err(DominantSpeciesError::InvalidTile);
                }
                if species > self.animal_ref(animal)?.gene_pool() {
                    return Err(DominantSpeciesError::NotEnoughSpeciesInGenePool);
                }
            }
            None if species > 0 => return Err(DominantSpeciesError::InvalidSpecies),
            None => {}
        }

        self.bag.remove(element)?;
        self.board.add_element(corner, element)?;
        self.emit(self.event(animal, EventType::AddElement).with(element).with(corner));

        if let Some(hex) = tile.filter(|_| species > 0) {
            self.animal_mut(animal)?.remove_species_from_gene_pool(species)?;
            let target = self.board.tile_mut(hex)?;
            target.add_species(animal, species)?;
            let tile_type = target.tile_type();
            self.emit(self.event(animal, EventType::AddSpecies).with(species).with(hex).with(tile_type));
        }

        Ok(ActionResult::undo_allowed())
    }

    pub(crate) fn apply_biomass(&mut self, tiles: &[Hex], animals: &[AnimalType]) -> Result<ActionResult> {
        if tiles.len() != animals.len() {
            return Err(DominantSpeciesError::MustSelectAnimalForEachTile);
        }
        for (i, hex) in tiles.iter().enumerate() {
            if tiles[..i].contains(hex) {
                return Err(DominantSpeciesError::DuplicateTiles);
            }
        }

        let affected = self.biomass_tiles();
        if !affected.iter().all(|h| tiles.contains(h)) {
            return Err(DominantSpeciesError::MustSelectAllAffectedTiles);
        }
        if !tiles.iter().all(|h| affected.contains(h)) {
            return Err(DominantSpeciesError::InvalidTile);
        }
        for (&hex, &target) in tiles.iter().zip(animals) {
            if !self.board.tile(hex).is_some_and(|t| t.has_species(target)) {
                return Err(DominantSpeciesError::NotEnoughSpeciesOnTile);
            }
        }

        for (&hex, &target) in tiles.iter().zip(animals) {
            self.eliminate(hex, target, 1)?;
        }
        Ok(ActionResult::undo_allowed())
    }

    /// Remove every element around `hex` but one.
    pub(crate) fn apply_blight(&mut self, hex: Hex, corners: &[Corner]) -> Result<ActionResult> {
        let animal = self.current;

        if !self.board.has_tile(hex) {
            return Err(DominantSpeciesError::TileNotFound);
        }
        if !corners.iter().all(|c| c.is_adjacent(hex)) {
            return Err(DominantSpeciesError::MustSelect1Tile);
        }
        let mut selected: Vec<Corner> = corners.to_vec();
        selected.sort_unstable();
        selected.dedup();

        let around = self.board.adjacent_elements(hex).count();
        if selected.len() + 1 < around {
            return Err(DominantSpeciesError::MustSelectAllBut1ElementOnTile);
        }
        if selected.iter().any(|&c| self.board.element(c).is_none()) {
            return Err(DominantSpeciesError::NoElementAtCorner);
        }

        for corner in selected {
            let element = self.board.remove_element(corner)?;
            self.emit(self.event(animal, EventType::RemoveElement).with(element).with(corner));
        }
        Ok(ActionResult::undo_allowed())
    }

    /// `keep` keeps one species on `hex`; every other species there is
    /// eliminated, and each adjacent tile loses one species of the animal
    /// named for it.
    pub(crate) fn apply_catastrophe(
        &mut self,
        hex: Hex,
        keep: Option<AnimalType>,
        adjacent: &[(Hex, Option<AnimalType>)],
    ) -> Result<ActionResult> {
        let animal = self.current;

        let tile = self.board.tile(hex).ok_or(DominantSpeciesError::TileNotFound)?;
        let tile_type = tile.tile_type();

        let mut expected: Vec<Hex> = self.board.adjacent_tiles(hex).map(|(h, _)| h).collect();
        let mut given: Vec<Hex> = adjacent.iter().map(|(h, _)| *h).collect();
        expected.sort_unstable();
        given.sort_unstable();
        if expected != given {
            return Err(DominantSpeciesError::MustSelectAllAdjacentTiles);
        }

        let on_tile: Vec<(AnimalType, u32)> = tile.animals().map(|a| (a, tile.species(a))).collect();
        if !on_tile.is_empty() && !keep.is_some_and(|k| tile.has_species(k)) {
            return Err(DominantSpeciesError::NotEnoughSpeciesOnTile);
        }
        for &(h, target) in adjacent {
            let t = self.board.tile(h).ok_or(DominantSpeciesError::TileNotFound)?;
            if t.total_species() == 0 {
                continue;
            }
            let target = target.ok_or(DominantSpeciesError::MustSelectAnimalForEachTile)?;
            if !t.has_species(target) {
                return Err(DominantSpeciesError::NotEnoughSpeciesOnTile);
            }
        }

        self.emit(self.event(animal, EventType::Catastrophe).with(keep).with(hex).with(tile_type));

        for (other, species) in on_tile {
            let eliminated = if Some(other) == keep { species - 1 } else { species };
            if eliminated > 0 {
                self.eliminate(hex, other, eliminated)?;
            }
        }
        for &(h, target) in adjacent {
            if let Some(target) = target {
                if self.board.tile(h).is_some_and(|t| t.total_species() > 0) {
                    self.eliminate(h, target, 1)?;
                }
            }
        }

        Ok(ActionResult::undo_allowed())
    }

    /// Replace one opposing species with one of the current animal's on up
    /// to two tiles, each from a different player.
    pub(crate) fn apply_evolution(&mut self, tiles: &[Hex], animals: &[AnimalType]) -> Result<ActionResult> {
        let animal = self.current;

        if tiles.len() > EVOLUTION_MAX_TILES {
            return Err(DominantSpeciesError::MustSelectUpTo2Tiles);
        }
        if animals.len() != tiles.len() {
            return Err(DominantSpeciesError::MustSelectAnimalForEachTile);
        }
        let mut players = Vec::with_capacity(animals.len());
        for &target in animals {
            let player = self.animal_ref(target)?.player();
            if players.contains(&player) {
                return Err(DominantSpeciesError::MustSelectDifferentPlayers);
            }
            players.push(player);
        }
        if animals.contains(&animal) {
            return Err(DominantSpeciesError::NotOpposingSpecies);
        }
        if tiles.len() as u32 > self.animal_ref(animal)?.gene_pool() {
            return Err(DominantSpeciesError::NotEnoughSpeciesInGenePool);
        }
        for (&hex, &target) in tiles.iter().zip(animals) {
            let tile = self.board.tile(hex).ok_or(DominantSpeciesError::TileNotFound)?;
            if !tile.has_species(target) {
                return Err(DominantSpeciesError::NotEnoughSpeciesOnTile);
            }
        }

        for (&hex, &target) in tiles.iter().zip(animals) {
            self.animal_mut(animal)?.remove_species_from_gene_pool(1)?;

            let tile = self.board.tile_mut(hex)?;
            tile.remove_species(target, 1)?;
            tile.add_species(animal, 1)?;
            let tile_type = tile.tile_type();
            self.animal_mut(target)?.add_species_to_gene_pool(1);

            self.emit(
                self.event(target, EventType::RemoveSpecies)
                    .with(target)
                    .with(1u32)
                    .with(hex)
                    .with(tile_type),
            );
            self.emit(self.event(animal, EventType::AddSpecies).with(1u32).with(hex).with(tile_type));
        }

        Ok(ActionResult::undo_allowed())
    }

    /// One extra species on each selected tile the animal already occupies.
    pub(crate) fn apply_fecundity(&mut self, tiles: &[Hex]) -> Result<ActionResult> {
        let animal = self.current;

        let mut selected: Vec<Hex> = tiles.to_vec();
        selected.sort_unstable();
        selected.dedup();

        if !selected
            .iter()
            .all(|&h| self.board.tile(h).is_some_and(|t| t.has_species(animal)))
        {
            return Err(DominantSpeciesError::InvalidTile);
        }
        if selected.len() as u32 > self.animal_ref(animal)?.gene_pool() {
            return Err(DominantSpeciesError::NotEnoughSpeciesInGenePool);
        }

        for hex in selected {
            self.animal_mut(animal)?.remove_species_from_gene_pool(1)?;
            let tile = self.board.tile_mut(hex)?;
            tile.add_species(animal, 1)?;
            let tile_type = tile.tile_type();
            self.emit(self.event(animal, EventType::AddSpecies).with(1u32).with(hex).with(tile_type));
        }
        Ok(ActionResult::undo_allowed())
    }

    pub(crate) fn apply_fertile(&mut self, hex: Hex) -> Result<ActionResult> {
        let animal = self.current;

        let tile = self
            .board
            .tile(hex)
            .filter(|t| t.has_species(animal))
            .ok_or(DominantSpeciesError::InvalidTile)?;
        let vps = tile.total_species();

        self.animal_mut(animal)?.add_vps(vps);
        self.emit(self.event(animal, EventType::GainVps).with(vps));
        Ok(ActionResult::undo_allowed())
    }

    pub(crate) fn apply_habitat(&mut self, element: ElementType, corner: Corner) -> Result<ActionResult> {
        let animal = self.current;

        if !self.bag.contains(element) {
            return Err(DominantSpeciesError::ElementNotInDrawBag);
        }
        self.board.check_element_placement(corner)?;

        self.bag.remove(element)?;
        self.board.add_element(corner, element)?;
        self.emit(self.event(animal, EventType::AddElement).with(element).with(corner));
        Ok(ActionResult::undo_allowed())
    }

    pub(crate) fn apply_hibernation(&mut self, hex: Hex, species: u32) -> Result<ActionResult> {
        let animal = self.current;

        if species > HIBERNATION_MAX_SPECIES {
            return Err(DominantSpeciesError::Max5EliminatedSpeciesAllowed);
        }
        if species == 0 {
            return Err(DominantSpeciesError::SpeciesMustBePositive);
        }
        let tile_type = self.board.tile(hex).ok_or(DominantSpeciesError::TileNotFound)?.tile_type();
        if species > self.animal_ref(animal)?.eliminated_species() {
            return Err(DominantSpeciesError::NotEnoughEliminatedSpecies);
        }

        self.animal_mut(animal)?.remove_eliminated_species(species)?;
        self.board.tile_mut(hex)?.add_hibernating_species(animal, species)?;
        self.emit(self.event(animal, EventType::Hibernation).with(species).with(hex).with(tile_type));
        Ok(ActionResult::undo_allowed())
    }

    /// Every species on `from` moves to adjacent tiles.
    pub(crate) fn apply_mass_exodus(&mut self, from: Hex, moves: &[ExodusMove]) -> Result<ActionResult> {
        let source = self.board.tile(from).ok_or(DominantSpeciesError::TileNotFound)?;
        let from_type = source.tile_type();

        if moves.iter().map(|m| m.species).sum::<u32>() != source.total_species() {
            return Err(DominantSpeciesError::MustMoveAllSpeciesOnTile);
        }
        if !moves.iter().all(|m| m.to.is_adjacent(from)) {
            return Err(DominantSpeciesError::MustSelectAdjacentTiles);
        }
        if !moves.iter().all(|m| self.board.has_tile(m.to)) {
            return Err(DominantSpeciesError::TileNotFound);
        }
        if moves.iter().any(|m| m.species == 0) {
            return Err(DominantSpeciesError::InvalidMove);
        }

        let mut leaving: BTreeMap<AnimalType, u32> = BTreeMap::new();
        let mut grouped: BTreeMap<(Hex, AnimalType), u32> = BTreeMap::new();
        for m in moves {
            *leaving.entry(m.animal).or_default() += m.species;
            *grouped.entry((m.to, m.animal)).or_default() += m.species;
        }
        if leaving.iter().any(|(&a, &n)| source.species(a) != n) {
            return Err(DominantSpeciesError::NotEnoughSpeciesOnTile);
        }

        for ((to, mover), n) in grouped {
            self.board.tile_mut(from)?.remove_species(mover, n)?;
            let target = self.board.tile_mut(to)?;
            target.add_species(mover, n)?;
            let to_type = target.tile_type();
            self.emit(
                self.event(mover, EventType::MoveSpecies)
                    .with(mover)
                    .with(n)
                    .with(from)
                    .with(from_type)
                    .with(to)
                    .with(to_type),
            );
        }
        Ok(ActionResult::undo_allowed())
    }

    /// Swap a held element for one from the draw bag; the old one goes
    /// into the bag.
    pub(crate) fn apply_metamorphosis(&mut self, from: ElementType, to: ElementType) -> Result<ActionResult> {
        let animal = self.current;

        if !self.animal_ref(animal)?.can_remove_element_type(from) {
            return Err(DominantSpeciesError::CannotRemoveElement);
        }
        if !self.bag.contains(to) {
            return Err(DominantSpeciesError::ElementNotInDrawBag);
        }

        self.bag.remove(to)?;
        let a = self.animal_mut(animal)?;
        a.remove_element(from)?;
        a.add_element(to)?;
        self.bag.add(from);

        self.emit(self.event(animal, EventType::RemoveElementFromAnimal).with(from));
        self.emit(self.event(animal, EventType::AddElementToAnimal).with(to));
        Ok(ActionResult::undo_allowed())
    }

    /// Eliminate one opposing species on every tile the animal shares.
    pub(crate) fn apply_predator(&mut self, tiles: &[Hex], animals: &[AnimalType]) -> Result<ActionResult> {
        let animal = self.current;

        if tiles.len() != animals.len() {
            return Err(DominantSpeciesError::MustSelectAnimalForEachTile);
        }
        for (i, hex) in tiles.iter().enumerate() {
            if tiles[..i].contains(hex) {
                return Err(DominantSpeciesError::DuplicateTiles);
            }
        }
        if !tiles
            .iter()
            .all(|&h| self.board.tile(h).is_some_and(|t| t.has_species(animal)))
        {
            return Err(DominantSpeciesError::TileNotOccupiedByPlayer);
        }
        if !self.predator_tiles().iter().all(|h| tiles.contains(h)) {
            return Err(DominantSpeciesError::MustSelectAllTilesOccupiedByPlayer);
        }
        if animals.contains(&animal) {
            return Err(DominantSpeciesError::MustSelectOpposingSpecies);
        }

        let mut eliminations = Vec::new();
        for (&hex, &target) in tiles.iter().zip(animals) {
            let tile = self.board.tile(hex).ok_or(DominantSpeciesError::TileNotFound)?;
            if !tile.has_opposing_species(animal) {
                continue;
            }
            if !tile.has_species(target) {
                return Err(DominantSpeciesError::MustSelectOpposingSpecies);
            }
            eliminations.push((hex, target));
        }

        for (hex, target) in eliminations {
            self.eliminate(hex, target, 1)?;
        }
        Ok(ActionResult::undo_allowed())
    }
}

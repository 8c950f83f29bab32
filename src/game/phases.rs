//! Phase transitions and action display execution.
//!
//! ## Round structure
//!
//! Planning: animals take turns placing pawns in initiative order, skipping
//! animals without pawns, until nobody has any left.
//!
//! Execution: the display is walked type by type in execution order. Types
//! with an activation (Initiative, Regression) resolve their pawns at once;
//! every other pawn hands its owner an optional follow-up.
//!
//! Reset: extinction, the Survival bonus, then either reseeding for the
//! next round or final scoring.

use smallvec::smallvec;
use tracing::{debug, info};

use super::state::{Game, Phase};
use crate::actions::{distinct_elements, ActionKind, FollowUpActions};
use crate::animals::AnimalType;
use crate::board::{Corner, Hex};
use crate::cards::Card;
use crate::core::{GameRng, Result};
use crate::display::ActionType;
use crate::events::EventType;
use crate::queue::PossibleAction;

impl Game {
    /// Whether the game is over: Ice Age has been taken and the final Reset
    /// has nothing left to resolve.
    #[must_use]
    pub fn is_ended(&self) -> bool {
        !self.deck.contains(&Card::IceAge)
            && !self.available_cards.contains(&Card::IceAge)
            && !self.display.has_action_pawn(ActionType::Domination)
            && self.queue.is_empty()
            && self.phase == Phase::Reset
    }

    // === Planning ===

    pub(crate) fn start_planning_phase(&mut self) {
        self.phase = Phase::Planning;
        self.emit(self.event(self.current, EventType::PlanningPhase).with(self.round));

        if let Some(&first) = self.initiative.front() {
            self.current = first;
            self.queue.add(PossibleAction::mandatory(first, ActionKind::PlaceActionPawn));
        }
        debug!(round = self.round, first = %self.current, "planning phase");
    }

    /// The next animal on the initiative track, counting from `start` and
    /// wrapping around, that still has a pawn to place. Nobody places once
    /// the display is full.
    pub(crate) fn next_placer_from(&self, start: usize) -> Option<AnimalType> {
        if self.display.possible_placements().is_empty() {
            return None;
        }
        let len = self.initiative.len();
        (0..len)
            .map(|k| self.initiative[(start + k) % len])
            .find(|a| self.animals.get(a).is_some_and(|animal| animal.has_action_pawn()))
    }

    pub(crate) fn next_animal_to_place(&self) -> Option<AnimalType> {
        let start = self.initiative.index_of(&self.current).map_or(0, |i| i + 1);
        self.next_placer_from(start)
    }

    /// Hand the turn to the next animal with pawns, or start Execution when
    /// every pawn is placed.
    pub(crate) fn place_next_action_pawn_from(&mut self, start: usize, rng: &mut GameRng) -> Result<()> {
        match self.next_placer_from(start) {
            Some(animal) => {
                self.current = animal;
                self.queue.add(PossibleAction::mandatory(animal, ActionKind::PlaceActionPawn));
                Ok(())
            }
            None => self.start_execution_phase(rng),
        }
    }

    pub(crate) fn place_next_action_pawn(&mut self, rng: &mut GameRng) -> Result<()> {
        let start = self.initiative.index_of(&self.current).map_or(0, |i| i + 1);
        self.place_next_action_pawn_from(start, rng)
    }

    // === Execution ===

    pub(crate) fn start_execution_phase(&mut self, rng: &mut GameRng) -> Result<()> {
        self.phase = Phase::Execution;
        self.emit(self.event(self.current, EventType::ExecutionPhase).with(self.round));
        debug!(round = self.round, "execution phase");

        let follow_ups = self.start_at_initiative()?;
        self.queue.add_all(follow_ups);
        match self.queue.next_animal() {
            Some(animal) => {
                self.current = animal;
                Ok(())
            }
            None => self.start_reset_phase(rng),
        }
    }

    /// Move execution to the next pawn, or into Reset when none is left.
    pub(crate) fn next_action_pawn(&mut self, rng: &mut GameRng) -> Result<()> {
        let follow_ups = match self.display.advance_to_next_pawn().and_then(|p| p.to_follow_up()) {
            Some(follow_up) => smallvec![follow_up],
            None => self.next_action_type()?,
        };
        self.queue.add_all(follow_ups);

        match self.queue.next_animal() {
            Some(animal) => {
                self.current = animal;
                Ok(())
            }
            None => self.start_reset_phase(rng),
        }
    }

    fn start_at_initiative(&mut self) -> Result<FollowUpActions> {
        self.display.set_cursor(ActionType::Initiative, 0);
        if self.display.has_action_pawn(ActionType::Initiative) {
            self.emit(self.event(self.current, EventType::Executing).with(ActionType::Initiative));
        }

        let follow_ups = self.activate(ActionType::Initiative)?;
        if follow_ups.is_empty() {
            return self.next_action_type();
        }
        Ok(follow_ups)
    }

    /// Leave the executing type and move on until some type yields
    /// follow-ups. Empty once the last type is done.
    fn next_action_type(&mut self) -> Result<FollowUpActions> {
        loop {
            let executing = self.display.executing();
            self.deactivate(executing)?;

            let Some(next) = executing.next() else {
                return Ok(FollowUpActions::new());
            };
            self.display.set_cursor(next, 0);

            if next.has_activation() {
                self.emit(self.event(self.current, EventType::Executing).with(next));
            }
            let mut follow_ups = self.activate(next)?;

            if follow_ups.is_empty() {
                if let Some(follow_up) = self.display.advance_to_next_pawn().and_then(|p| p.to_follow_up()) {
                    if !next.has_activation() {
                        self.emit(self.event(follow_up.animal, EventType::Executing).with(next));
                    }
                    follow_ups.push(follow_up);
                }
            }

            if !follow_ups.is_empty() {
                return Ok(follow_ups);
            }
        }
    }

    fn activate(&mut self, action_type: ActionType) -> Result<FollowUpActions> {
        match action_type {
            ActionType::Initiative => self.activate_initiative(),
            ActionType::Regression => self.activate_regression(),
            _ => Ok(FollowUpActions::new()),
        }
    }

    fn deactivate(&mut self, action_type: ActionType) -> Result<()> {
        if action_type == ActionType::Wasteland {
            self.remove_wasteland_elements_from_tundra()?;
        }
        Ok(())
    }

    /// The Initiative pawn moves its animal one step forward and lets it
    /// place that pawn again.
    fn activate_initiative(&mut self) -> Result<FollowUpActions> {
        let Some(pawn) = self.display.remove_leftmost_action_pawn(ActionType::Initiative) else {
            return Ok(FollowUpActions::new());
        };
        let index = self.move_forward_on_initiative(pawn.animal)?;
        self.emit(self.event(pawn.animal, EventType::Initiative).with(index as u32 + 1));

        if self.display.possible_placements().iter().all(|&(t, _)| t == ActionType::Initiative) {
            // Nowhere to go: the pawn goes home.
            self.animal_mut(pawn.animal)?.add_action_pawn();
            return Ok(FollowUpActions::new());
        }
        Ok(smallvec![PossibleAction::mandatory(pawn.animal, ActionKind::PlaceActionPawn)])
    }

    fn activate_regression(&mut self) -> Result<FollowUpActions> {
        let box_types = distinct_elements(self.display.elements(ActionType::Regression));
        let mut follow_ups = FollowUpActions::new();

        for animal in self.playing_animals() {
            let pawns = self.display.number_of_action_pawns(ActionType::Regression, animal);
            let to_remove = (box_types.len() as u32).saturating_sub(pawns);

            self.emit(
                self.event(animal, EventType::Regression)
                    .with(pawns)
                    .with(box_types.len() as u32),
            );

            if to_remove == 0 || !self.animal_ref(animal)?.can_remove_one_of(&box_types) {
                self.return_regression_pawns(animal)?;
            } else if pawns == 0 {
                for &element in &box_types {
                    let a = self.animal_mut(animal)?;
                    if a.can_remove_element_type(element) {
                        a.remove_element(element)?;
                        self.emit(self.event(animal, EventType::RemoveElementFromAnimal).with(element));
                    }
                }
                self.return_regression_pawns(animal)?;
            } else {
                follow_ups.push(PossibleAction::mandatory(animal, ActionKind::Regression));
            }
        }

        Ok(follow_ups)
    }

    /// All of the animal's Regression pawns go home; the free one stays
    /// reserved on the display until reseed.
    pub(crate) fn return_regression_pawns(&mut self, animal: AnimalType) -> Result<()> {
        let returned = self.display.remove_action_pawns(ActionType::Regression, animal);
        self.animal_mut(animal)?.add_action_pawns(returned);
        Ok(())
    }

    /// Elements of a type in the Wasteland box leave the board wherever
    /// they touch a tundra tile.
    fn remove_wasteland_elements_from_tundra(&mut self) -> Result<()> {
        let wasteland = self.display.elements(ActionType::Wasteland).to_vec();
        let doomed: Vec<Corner> = self
            .board
            .elements()
            .iter()
            .filter(|(c, e)| wasteland.contains(*e) && self.board.corner_tiles(**c).any(|(_, t)| t.is_tundra()))
            .map(|(c, _)| *c)
            .collect();

        for corner in doomed {
            let element = self.board.remove_element(corner)?;
            self.emit(self.event(self.current, EventType::RemoveElement).with(element).with(corner));
        }
        Ok(())
    }

    // === Reset ===

    pub(crate) fn start_reset_phase(&mut self, rng: &mut GameRng) -> Result<()> {
        self.phase = Phase::Reset;
        self.emit(self.event(self.current, EventType::ResetPhase).with(self.round));
        debug!(round = self.round, "reset phase");

        let savable = self.endangered_mammal_tiles();
        if savable.len() > 1 {
            self.current = AnimalType::Mammals;
            self.queue.add(PossibleAction::optional(AnimalType::Mammals, ActionKind::SaveFromExtinction));
            return Ok(());
        }

        self.extinction(savable.first().copied())?;
        self.recalculate_dominance();
        self.complete_reset(rng)
    }

    /// Tiles where Mammals would lose species to extinction.
    pub(crate) fn endangered_mammal_tiles(&self) -> Vec<Hex> {
        let Some(mammals) = self.animals.get(&AnimalType::Mammals).filter(|_| self.is_playing(AnimalType::Mammals))
        else {
            return Vec::new();
        };

        self.board
            .tiles()
            .iter()
            .filter(|(h, t)| {
                t.has_species(AnimalType::Mammals)
                    && t.endangered_species(mammals, &self.board.adjacent_element_types(**h)) > 0
            })
            .map(|(h, _)| *h)
            .collect()
    }

    /// Species matching no adjacent element die out; Mammals may keep one
    /// species on `save`.
    pub(crate) fn extinction(&mut self, save: Option<Hex>) -> Result<()> {
        let hexes: Vec<Hex> = self.board.tiles().keys().copied().collect();
        let playing = self.playing_animals();

        for hex in hexes {
            let adjacent = self.board.adjacent_element_types(hex);
            for &animal in &playing {
                let spared = u32::from(animal == AnimalType::Mammals && save == Some(hex));
                let Some(state) = self.animals.get(&animal) else {
                    continue;
                };
                let tile = self.board.tile_mut(hex)?;
                let eliminated = tile.extinction(state, &adjacent, spared);
                let tile_type = tile.tile_type();

                if eliminated > 0 {
                    self.animal_mut(animal)?.add_eliminated_species(eliminated);
                    self.emit(
                        self.event(animal, EventType::Extinction)
                            .with(eliminated)
                            .with(hex)
                            .with(tile_type),
                    );
                }
            }
        }
        Ok(())
    }

    /// Survival, then the next round or the end of the game.
    pub(crate) fn complete_reset(&mut self, rng: &mut GameRng) -> Result<()> {
        self.survival()?;
        self.scored_tiles.clear();
        self.board.clear_last_placed_tile();

        if self.is_ended() {
            self.final_scoring()?;
            info!(round = self.round, "game ended");
            return Ok(());
        }

        self.reseed(rng)?;
        self.round += 1;
        self.start_planning_phase();
        Ok(())
    }

    fn reseed(&mut self, rng: &mut GameRng) -> Result<()> {
        self.draw_cards();
        self.display.slide_glaciation_left();

        for action_type in [ActionType::Regression, ActionType::Depletion, ActionType::Wanderlust] {
            for element in self.display.remove_all_elements(action_type) {
                self.bag.add(element);
            }
        }

        self.display.slide_elements_down();
        self.display.draw_elements(&mut self.bag, rng)?;
        self.display.reset_free_action_pawns();
        self.wanderlust.flip_top_face_up();
        Ok(())
    }
}

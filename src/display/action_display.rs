//! The action display: pawn spaces per action type, element boxes, and the
//! execution cursor.
//!
//! ## Spaces
//!
//! Each action type has `capacity` spaces holding at most one animal's
//! pawn. Free pawn spaces are reserved for their animal; when that animal
//! is not in the game the space stays blocked.
//!
//! ## Execution cursor
//!
//! During Execution the display tracks the type being executed and the
//! space index within it. The display only answers "where is the next
//! pawn"; activations and the phase change live in the game controller,
//! which owns the board they touch.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::action_type::ActionType;
use crate::animals::{AnimalType, ElementType};
use crate::core::{DominantSpeciesError, GameRng, Result};
use crate::queue::PossibleAction;
use crate::supply::DrawBag;

/// Elements drawn into each refilled box.
pub const ELEMENTS_PER_BOX: usize = 4;

/// A pawn on a space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionPawn {
    pub animal: AnimalType,
    pub action_type: ActionType,
    pub index: usize,
}

impl ActionPawn {
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.action_type.is_free_action_pawn(self.animal, self.index)
    }

    /// The optional follow-up the pawn's owner gets when execution reaches it.
    #[must_use]
    pub fn to_follow_up(&self) -> Option<PossibleAction> {
        self.action_type
            .action_kind()
            .map(|kind| PossibleAction::optional(self.animal, kind))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDisplay {
    pawns: [Vec<Option<AnimalType>>; 12],
    blocked: [Option<usize>; 12],
    elements: [Vec<ElementType>; 12],
    executing: ActionType,
    index: usize,
}

impl ActionDisplay {
    /// Empty display with free pawns placed and the boxes filled from the bag.
    pub fn initial(playing: &[AnimalType], bag: &mut DrawBag, rng: &mut GameRng) -> Result<Self> {
        let pawns = ActionType::EXECUTION_ORDER.map(|t| vec![None; t.capacity()]);
        let blocked = ActionType::EXECUTION_ORDER.map(|t| {
            t.free_action_pawn()
                .filter(|free| !playing.contains(&free.animal))
                .map(|free| free.index)
        });

        let mut display = Self {
            pawns,
            blocked,
            elements: Default::default(),
            executing: ActionType::Initiative,
            index: 0,
        };

        display.draw_elements(bag, rng)?;
        display.reset_free_action_pawns();

        Ok(display)
    }

    #[must_use]
    pub fn action_pawns(&self, action_type: ActionType) -> &[Option<AnimalType>] {
        &self.pawns[action_type.index()]
    }

    #[must_use]
    pub fn elements(&self, action_type: ActionType) -> &[ElementType] {
        &self.elements[action_type.index()]
    }

    #[must_use]
    pub fn executing(&self) -> ActionType {
        self.executing
    }

    #[must_use]
    pub fn executing_index(&self) -> usize {
        self.index
    }

    /// Whether a space exists and is not reserved for an absent animal.
    #[must_use]
    pub fn is_space_available(&self, action_type: ActionType, index: usize) -> bool {
        index < action_type.capacity() && self.blocked[action_type.index()] != Some(index)
    }

    /// Fill the Adaptation, Abundance and Wanderlust boxes from the bag.
    /// Stops early if the bag runs out.
    pub fn draw_elements(&mut self, bag: &mut DrawBag, rng: &mut GameRng) -> Result<()> {
        for action_type in [ActionType::Adaptation, ActionType::Abundance, ActionType::Wanderlust] {
            for _ in 0..ELEMENTS_PER_BOX {
                if bag.is_empty() {
                    return Ok(());
                }
                let element = bag.draw(rng)?;
                self.elements[action_type.index()].push(element);
            }
        }
        Ok(())
    }

    pub fn reset_free_action_pawns(&mut self) {
        for action_type in ActionType::EXECUTION_ORDER {
            if let Some(free) = action_type.free_action_pawn() {
                if self.is_space_available(action_type, free.index) {
                    self.pawns[action_type.index()][free.index] = Some(free.animal);
                }
            }
        }
    }

    /// First pawn at or after `start` among the executable spaces.
    #[must_use]
    pub fn next_action_pawn_of(&self, action_type: ActionType, start: usize) -> Option<ActionPawn> {
        let spaces = &self.pawns[action_type.index()];
        let len = spaces.len().min(action_type.executable());

        (start..len).find_map(|index| {
            spaces[index].map(|animal| ActionPawn {
                animal,
                action_type,
                index,
            })
        })
    }

    #[must_use]
    pub fn has_action_pawn(&self, action_type: ActionType) -> bool {
        self.next_action_pawn_of(action_type, 0).is_some()
    }

    #[must_use]
    pub fn has_any_action_pawn(&self) -> bool {
        ActionType::EXECUTION_ORDER.iter().any(|&t| self.has_action_pawn(t))
    }

    /// Pawn at the execution cursor.
    #[must_use]
    pub fn current_action_pawn(&self) -> Option<ActionPawn> {
        self.next_action_pawn_of(self.executing, self.index)
    }

    /// Next pawn from the cursor onwards, looking into later types.
    #[must_use]
    pub fn next_action_pawn(&self) -> Option<ActionPawn> {
        let mut action_type = self.executing;
        let mut start = self.index;
        loop {
            if let Some(pawn) = self.next_action_pawn_of(action_type, start) {
                return Some(pawn);
            }
            action_type = action_type.next()?;
            start = 0;
        }
    }

    pub fn check_placement(&self, action_type: ActionType, index: usize) -> Result<()> {
        if !self.is_space_available(action_type, index) {
            return Err(DominantSpeciesError::InvalidActionSpace);
        }
        if self.pawns[action_type.index()][index].is_some() {
            return Err(DominantSpeciesError::ActionSpaceNotEmpty);
        }
        Ok(())
    }

    pub fn place_action_pawn(&mut self, animal: AnimalType, action_type: ActionType, index: usize) -> Result<()> {
        self.check_placement(action_type, index)?;
        self.pawns[action_type.index()][index] = Some(animal);
        Ok(())
    }

    /// Empty spaces in execution order.
    #[must_use]
    pub fn possible_placements(&self) -> Vec<(ActionType, usize)> {
        ActionType::EXECUTION_ORDER
            .iter()
            .flat_map(|&t| {
                (0..t.capacity())
                    .filter(move |&i| self.check_placement(t, i).is_ok())
                    .map(move |i| (t, i))
            })
            .collect()
    }

    /// Take the pawn at the execution cursor off the display.
    pub fn remove_current_action_pawn(&mut self) -> Result<ActionPawn> {
        let space = self.pawns[self.executing.index()]
            .get_mut(self.index)
            .ok_or(DominantSpeciesError::ActionSpaceEmpty)?;
        let animal = space.take().ok_or(DominantSpeciesError::ActionSpaceEmpty)?;

        Ok(ActionPawn {
            animal,
            action_type: self.executing,
            index: self.index,
        })
    }

    /// Remove the leftmost executable pawn of a type.
    pub fn remove_leftmost_action_pawn(&mut self, action_type: ActionType) -> Option<ActionPawn> {
        let pawn = self.next_action_pawn_of(action_type, 0)?;
        self.pawns[action_type.index()][pawn.index] = None;
        Some(pawn)
    }

    /// Remove all of an animal's pawns from a type and return how many of
    /// them were not the free pawn.
    pub fn remove_action_pawns(&mut self, action_type: ActionType, animal: AnimalType) -> u32 {
        let mut returned = 0;
        for (index, space) in self.pawns[action_type.index()].iter_mut().enumerate() {
            if *space == Some(animal) {
                *space = None;
                if !action_type.is_free_action_pawn(animal, index) {
                    returned += 1;
                }
            }
        }
        returned
    }

    /// Remove an animal from the whole display. Its free space, if any,
    /// stays blocked for the rest of the game.
    pub fn remove_animal(&mut self, animal: AnimalType) {
        for action_type in ActionType::EXECUTION_ORDER {
            self.remove_action_pawns(action_type, animal);
            if let Some(free) = action_type.free_action_pawn().filter(|f| f.animal == animal) {
                self.pawns[action_type.index()][free.index] = None;
                self.blocked[action_type.index()] = Some(free.index);
            }
        }
    }

    #[must_use]
    pub fn number_of_action_pawns(&self, action_type: ActionType, animal: AnimalType) -> u32 {
        self.pawns[action_type.index()]
            .iter()
            .filter(|space| **space == Some(animal))
            .count() as u32
    }

    pub fn remove_element(&mut self, action_type: ActionType, element: ElementType) -> Result<()> {
        let elements = &mut self.elements[action_type.index()];
        let position = elements
            .iter()
            .position(|&e| e == element)
            .ok_or(DominantSpeciesError::ElementNotAvailable)?;
        elements.remove(position);
        Ok(())
    }

    pub fn add_element(&mut self, action_type: ActionType, element: ElementType) {
        self.elements[action_type.index()].push(element);
    }

    pub fn remove_all_elements(&mut self, action_type: ActionType) -> Vec<ElementType> {
        std::mem::take(&mut self.elements[action_type.index()])
    }

    /// Close gaps between Glaciation pawns, one pass left to right.
    pub fn slide_glaciation_left(&mut self) {
        let spaces = &mut self.pawns[ActionType::Glaciation.index()];
        for i in 0..spaces.len().saturating_sub(1) {
            if spaces[i].is_none() {
                spaces[i] = spaces[i + 1].take();
            }
        }
    }

    /// Wasteland into Depletion, Abundance into Wasteland, Adaptation into
    /// Regression.
    pub fn slide_elements_down(&mut self) {
        for (from, to) in [
            (ActionType::Wasteland, ActionType::Depletion),
            (ActionType::Abundance, ActionType::Wasteland),
            (ActionType::Adaptation, ActionType::Regression),
        ] {
            let moved = self.remove_all_elements(from);
            self.elements[to.index()].extend(moved);
        }
    }

    pub(crate) fn set_cursor(&mut self, action_type: ActionType, index: usize) {
        trace!(action_type = ?action_type, index, "action display cursor");
        self.executing = action_type;
        self.index = index;
    }

    /// Move the cursor onto the next pawn of the executing type.
    pub(crate) fn advance_to_next_pawn(&mut self) -> Option<ActionPawn> {
        let pawn = self.next_action_pawn_of(self.executing, self.index)?;
        self.index = pawn.index;
        Some(pawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display(playing: &[AnimalType]) -> (ActionDisplay, DrawBag) {
        let mut bag = DrawBag::initial();
        let mut rng = GameRng::new(4);
        let display = ActionDisplay::initial(playing, &mut bag, &mut rng).unwrap();
        (display, bag)
    }

    #[test]
    fn test_initial_boxes_and_free_pawns() {
        let (display, bag) = display(&AnimalType::FOOD_CHAIN_ORDER);

        assert_eq!(bag.len(), 108 - 12);
        assert_eq!(display.elements(ActionType::Adaptation).len(), 4);
        assert_eq!(display.elements(ActionType::Abundance).len(), 4);
        assert_eq!(display.elements(ActionType::Wanderlust).len(), 4);
        assert!(display.elements(ActionType::Regression).is_empty());

        assert_eq!(display.action_pawns(ActionType::Regression), &[None, None, Some(AnimalType::Reptiles)]);
        assert_eq!(display.action_pawns(ActionType::Speciation)[6], Some(AnimalType::Insects));
        assert_eq!(display.action_pawns(ActionType::Competition)[0], Some(AnimalType::Arachnids));
    }

    #[test]
    fn test_free_space_blocked_without_animal() {
        let (mut display, _) = display(&[AnimalType::Mammals, AnimalType::Birds]);

        assert_eq!(display.action_pawns(ActionType::Regression), &[None, None, None]);
        assert_eq!(
            display.place_action_pawn(AnimalType::Birds, ActionType::Regression, 2),
            Err(DominantSpeciesError::InvalidActionSpace)
        );
        assert!(!display.possible_placements().contains(&(ActionType::Competition, 0)));
        assert!(display.possible_placements().contains(&(ActionType::Competition, 7)));
    }

    #[test]
    fn test_leaving_animal_free_space_stays_empty() {
        let (mut display, _) = display(&AnimalType::FOOD_CHAIN_ORDER);

        display.remove_animal(AnimalType::Insects);
        display.reset_free_action_pawns();

        assert_eq!(display.action_pawns(ActionType::Speciation)[6], None);
        assert_eq!(display.action_pawns(ActionType::Regression)[2], Some(AnimalType::Reptiles));
        assert_eq!(
            display.place_action_pawn(AnimalType::Birds, ActionType::Speciation, 6),
            Err(DominantSpeciesError::InvalidActionSpace)
        );
    }

    #[test]
    fn test_place_action_pawn_errors() {
        let (mut display, _) = display(&AnimalType::FOOD_CHAIN_ORDER);

        assert_eq!(
            display.place_action_pawn(AnimalType::Birds, ActionType::Initiative, 1),
            Err(DominantSpeciesError::InvalidActionSpace)
        );
        display.place_action_pawn(AnimalType::Birds, ActionType::Initiative, 0).unwrap();
        assert_eq!(
            display.place_action_pawn(AnimalType::Mammals, ActionType::Initiative, 0),
            Err(DominantSpeciesError::ActionSpaceNotEmpty)
        );
    }

    #[test]
    fn test_possible_placements_in_execution_order() {
        let (display, _) = display(&AnimalType::FOOD_CHAIN_ORDER);
        let placements = display.possible_placements();

        assert_eq!(placements[0], (ActionType::Initiative, 0));
        assert_eq!(placements[1], (ActionType::Adaptation, 0));
        // 1+3+2+2+1+1+4+6+3+6+7+5 free spaces
        assert_eq!(placements.len(), 41);
    }

    #[test]
    fn test_remove_action_pawns_skips_free_count() {
        let (mut display, _) = display(&AnimalType::FOOD_CHAIN_ORDER);
        display.place_action_pawn(AnimalType::Reptiles, ActionType::Regression, 0).unwrap();

        assert_eq!(display.number_of_action_pawns(ActionType::Regression, AnimalType::Reptiles), 2);
        assert_eq!(display.remove_action_pawns(ActionType::Regression, AnimalType::Reptiles), 1);
        assert_eq!(display.action_pawns(ActionType::Regression), &[None, None, None]);
    }

    #[test]
    fn test_cursor_and_current_pawn() {
        let (mut display, _) = display(&AnimalType::FOOD_CHAIN_ORDER);
        display.place_action_pawn(AnimalType::Birds, ActionType::Migration, 3).unwrap();

        display.set_cursor(ActionType::Migration, 0);
        let pawn = display.advance_to_next_pawn().unwrap();
        assert_eq!(pawn.index, 3);
        assert_eq!(display.executing_index(), 3);
        assert_eq!(display.current_action_pawn(), Some(pawn));

        let removed = display.remove_current_action_pawn().unwrap();
        assert_eq!(removed.animal, AnimalType::Birds);
        assert_eq!(display.remove_current_action_pawn(), Err(DominantSpeciesError::ActionSpaceEmpty));

        // next pawn across types is the free arachnid on competition
        let next = display.next_action_pawn().unwrap();
        assert_eq!((next.action_type, next.index), (ActionType::Competition, 0));
        assert!(next.is_free());
    }

    #[test]
    fn test_glaciation_only_first_space_executes() {
        let (mut display, _) = display(&AnimalType::FOOD_CHAIN_ORDER);
        display.place_action_pawn(AnimalType::Birds, ActionType::Glaciation, 2).unwrap();
        assert!(!display.has_action_pawn(ActionType::Glaciation));

        display.slide_glaciation_left();
        assert_eq!(
            display.action_pawns(ActionType::Glaciation),
            &[None, Some(AnimalType::Birds), None, None]
        );
        display.slide_glaciation_left();
        assert!(display.has_action_pawn(ActionType::Glaciation));
    }

    #[test]
    fn test_slide_elements_down() {
        let (mut display, _) = display(&AnimalType::FOOD_CHAIN_ORDER);
        let adaptation = display.elements(ActionType::Adaptation).to_vec();
        let abundance = display.elements(ActionType::Abundance).to_vec();
        display.add_element(ActionType::Wasteland, ElementType::Sun);

        display.slide_elements_down();

        assert_eq!(display.elements(ActionType::Regression), adaptation.as_slice());
        assert_eq!(display.elements(ActionType::Wasteland), abundance.as_slice());
        assert_eq!(display.elements(ActionType::Depletion), &[ElementType::Sun]);
        assert!(display.elements(ActionType::Adaptation).is_empty());
        assert!(display.elements(ActionType::Abundance).is_empty());
    }

    #[test]
    fn test_remove_element_from_box() {
        let (mut display, _) = display(&AnimalType::FOOD_CHAIN_ORDER);
        let element = display.elements(ActionType::Adaptation)[0];
        display.remove_element(ActionType::Adaptation, element).unwrap();
        assert_eq!(display.elements(ActionType::Adaptation).len(), 3);
        assert_eq!(
            display.remove_element(ActionType::Depletion, element),
            Err(DominantSpeciesError::ElementNotAvailable)
        );
    }
}

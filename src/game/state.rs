//! The game aggregate and its read-only surface.
//!
//! `Game` owns every piece of shared state: animals, board, action display,
//! draw bag, card deck, wanderlust stacks and the action queue. All of it
//! lives in `im` structures or small arrays, so cloning a game is cheap;
//! commands snapshot the game before applying and restore it on error.

use im::{OrdMap, OrdSet, Vector};
use serde::{Deserialize, Serialize};
use tracing::{info, trace};

use crate::actions::ActionKind;
use crate::animals::{Animal, AnimalType};
use crate::board::{Board, Hex};
use crate::cards::{Card, AVAILABLE_CARDS};
use crate::core::{DominantSpeciesError, GameConfig, GameRng, PlayerId, Result};
use crate::display::ActionDisplay;
use crate::events::{EventListeners, EventType, GameEvent};
use crate::queue::{ActionQueue, PossibleAction};
use crate::supply::{DrawBag, WanderlustTiles};

/// Tundra tiles in the supply at start.
pub const INITIAL_TUNDRA_TILES: u32 = 11;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Planning,
    Execution,
    Reset,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// A running game.
#[derive(Clone, Debug)]
pub struct Game {
    pub(crate) round: u32,
    pub(crate) phase: Phase,
    pub(crate) animals: OrdMap<AnimalType, Animal>,
    /// Leftmost first.
    pub(crate) initiative: Vector<AnimalType>,
    pub(crate) board: Board,
    pub(crate) display: ActionDisplay,
    pub(crate) bag: DrawBag,
    pub(crate) current: AnimalType,
    pub(crate) queue: ActionQueue,
    /// Tiles scored by Domination this round, in scoring order.
    pub(crate) scored_tiles: Vector<Hex>,
    pub(crate) deck: Vector<Card>,
    pub(crate) available_cards: OrdSet<Card>,
    pub(crate) tundra_tiles: u32,
    pub(crate) wanderlust: WanderlustTiles,
    pub(crate) can_undo: bool,
    /// Events fired by the command in progress.
    pub(crate) events: Vec<GameEvent>,
    pub(crate) listeners: EventListeners,
}

impl Game {
    /// Set up a new game from a roster.
    ///
    /// Animals are seated in food-chain order; the initiative track starts
    /// in reverse food-chain order and its leftmost animal places first.
    pub fn start(config: &GameConfig, rng: &mut GameRng) -> Result<Self> {
        let roster = config.resolve(rng)?;
        let playing: Vec<AnimalType> = roster.iter().map(|&(animal, _)| animal).collect();
        let count = playing.len();

        let animals: OrdMap<AnimalType, Animal> = roster
            .iter()
            .map(|&(animal, player)| (animal, Animal::initial(animal, player, count)))
            .collect();
        let initiative: Vector<AnimalType> = playing.iter().rev().copied().collect();
        let current = initiative.front().copied().ok_or(DominantSpeciesError::Min1Player)?;

        let board = Board::initial(&playing)?;
        let mut bag = DrawBag::initial();
        let display = ActionDisplay::initial(&playing, &mut bag, rng)?;
        let deck = Card::initial_deck(rng);
        let wanderlust = WanderlustTiles::initial(rng);

        let mut game = Self {
            round: 1,
            phase: Phase::Planning,
            animals,
            initiative,
            board,
            display,
            bag,
            current,
            queue: ActionQueue::initial(PossibleAction::mandatory(current, ActionKind::PlaceActionPawn)),
            scored_tiles: Vector::new(),
            deck,
            available_cards: OrdSet::new(),
            tundra_tiles: INITIAL_TUNDRA_TILES,
            wanderlust,
            can_undo: false,
            events: Vec::new(),
            listeners: EventListeners::new(),
        };

        game.draw_cards();
        game.recalculate_dominance();

        info!(animals = count, first = %current, "game started");
        Ok(game)
    }

    // === Queries ===

    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Every animal that took part, including those that left.
    #[must_use]
    pub fn animals(&self) -> &OrdMap<AnimalType, Animal> {
        &self.animals
    }

    #[must_use]
    pub fn animal(&self, animal: AnimalType) -> Option<&Animal> {
        self.animals.get(&animal)
    }

    #[must_use]
    pub fn initiative(&self) -> &Vector<AnimalType> {
        &self.initiative
    }

    /// Whether the animal is in the game and has not left.
    #[must_use]
    pub fn is_playing(&self, animal: AnimalType) -> bool {
        self.initiative.contains(&animal)
    }

    /// Animals still in the game, in food-chain order.
    #[must_use]
    pub fn playing_animals(&self) -> Vec<AnimalType> {
        AnimalType::FOOD_CHAIN_ORDER
            .iter()
            .copied()
            .filter(|&a| self.is_playing(a))
            .collect()
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn display(&self) -> &ActionDisplay {
        &self.display
    }

    #[must_use]
    pub fn bag(&self) -> &DrawBag {
        &self.bag
    }

    /// Animal whose turn it is.
    #[must_use]
    pub fn current_animal(&self) -> AnimalType {
        self.current
    }

    #[must_use]
    pub fn queue(&self) -> &ActionQueue {
        &self.queue
    }

    /// Cards still face down, Ice Age last.
    #[must_use]
    pub fn deck(&self) -> &Vector<Card> {
        &self.deck
    }

    #[must_use]
    pub fn available_cards(&self) -> &OrdSet<Card> {
        &self.available_cards
    }

    #[must_use]
    pub fn tundra_tiles(&self) -> u32 {
        self.tundra_tiles
    }

    #[must_use]
    pub fn wanderlust(&self) -> &WanderlustTiles {
        &self.wanderlust
    }

    #[must_use]
    pub fn scored_tiles(&self) -> &Vector<Hex> {
        &self.scored_tiles
    }

    /// Whether the last performed action may be taken back by the client.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.can_undo
    }

    /// Animals a player controls, in food-chain order.
    #[must_use]
    pub fn animals_of(&self, player: PlayerId) -> Vec<AnimalType> {
        self.animals
            .values()
            .filter(|a| a.player() == player)
            .map(Animal::animal_type)
            .collect()
    }

    // === Internal helpers ===

    pub(crate) fn animal_ref(&self, animal: AnimalType) -> Result<&Animal> {
        self.animals.get(&animal).ok_or(DominantSpeciesError::AnimalNotFound)
    }

    pub(crate) fn animal_mut(&mut self, animal: AnimalType) -> Result<&mut Animal> {
        self.animals.get_mut(&animal).ok_or(DominantSpeciesError::AnimalNotFound)
    }

    /// An event for `animal`, tagged with its player.
    pub(crate) fn event(&self, animal: AnimalType, event_type: EventType) -> GameEvent {
        let event = GameEvent::new(event_type, animal);
        match self.animals.get(&animal) {
            Some(a) => event.with_player(a.player()),
            None => event,
        }
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        trace!(event_type = ?event.event_type, animal = %event.animal, "event");
        self.events.push(event);
    }

    pub(crate) fn recalculate_dominance(&mut self) {
        self.board.recalculate_dominance(&self.animals);
    }

    /// Take the pawn at the execution cursor off the display and give it
    /// back to the current animal, unless it is a free pawn.
    pub(crate) fn return_current_action_pawn(&mut self) -> Result<()> {
        let current = self.current;
        self.display
            .current_action_pawn()
            .filter(|pawn| pawn.animal == current)
            .ok_or(DominantSpeciesError::NoActionPawn)?;

        let pawn = self.display.remove_current_action_pawn()?;
        if !pawn.is_free() {
            self.animal_mut(pawn.animal)?.add_action_pawn();
        }
        Ok(())
    }

    /// Move an animal one step left on the initiative track and return its
    /// new index.
    pub(crate) fn move_forward_on_initiative(&mut self, animal: AnimalType) -> Result<usize> {
        let index = self
            .initiative
            .index_of(&animal)
            .ok_or(DominantSpeciesError::AnimalNotFound)?;
        if index == 0 {
            return Ok(0);
        }
        self.initiative.swap(index - 1, index);
        Ok(index - 1)
    }

    /// Refill the available cards from the deck.
    pub(crate) fn draw_cards(&mut self) {
        while self.available_cards.len() < AVAILABLE_CARDS {
            match self.deck.pop_front() {
                Some(card) => {
                    self.available_cards.insert(card);
                }
                None => break,
            }
        }
    }

    pub(crate) fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::INITIAL_JUNGLE;

    fn game(animals: &[AnimalType]) -> Game {
        let mut config = GameConfig::new();
        for (i, &animal) in animals.iter().enumerate() {
            config = config.with_animal(animal, PlayerId::new(i as u8));
        }
        Game::start(&config, &mut GameRng::new(42)).unwrap()
    }

    #[test]
    fn test_start_initiative_in_reverse_food_chain() {
        let game = game(&[AnimalType::Mammals, AnimalType::Amphibians, AnimalType::Insects]);

        assert_eq!(
            game.initiative().iter().copied().collect::<Vec<_>>(),
            vec![AnimalType::Insects, AnimalType::Amphibians, AnimalType::Mammals]
        );
        assert_eq!(game.current_animal(), AnimalType::Insects);
        assert_eq!(game.phase(), Phase::Planning);
        assert_eq!(game.round(), 1);
        assert!(game.queue().can_perform(AnimalType::Insects, ActionKind::PlaceActionPawn));
    }

    #[test]
    fn test_start_supplies() {
        let game = game(&[AnimalType::Birds, AnimalType::Reptiles]);

        assert_eq!(game.available_cards().len(), AVAILABLE_CARDS);
        assert_eq!(game.deck().len(), 26 - AVAILABLE_CARDS);
        assert_eq!(game.deck().back(), Some(&Card::IceAge));
        assert_eq!(game.tundra_tiles(), INITIAL_TUNDRA_TILES);
        assert_eq!(game.animal(AnimalType::Birds).unwrap().action_pawns(), 7);
        assert!(game.animal(AnimalType::Mammals).is_none());
    }

    #[test]
    fn test_move_forward_on_initiative() {
        let mut game = game(&[AnimalType::Insects, AnimalType::Birds, AnimalType::Mammals]);
        // Mammals, Birds, Insects
        assert_eq!(game.move_forward_on_initiative(AnimalType::Insects).unwrap(), 1);
        assert_eq!(game.move_forward_on_initiative(AnimalType::Insects).unwrap(), 0);
        assert_eq!(game.move_forward_on_initiative(AnimalType::Insects).unwrap(), 0);
        assert_eq!(game.initiative()[0], AnimalType::Insects);
        assert_eq!(
            game.move_forward_on_initiative(AnimalType::Reptiles),
            Err(DominantSpeciesError::AnimalNotFound)
        );
    }

    #[test]
    fn test_event_carries_player() {
        let game = game(&[AnimalType::Insects, AnimalType::Birds]);
        let event = game.event(AnimalType::Birds, EventType::GainActionPawn);
        assert_eq!(event.player, Some(PlayerId::new(1)));
        assert_eq!(game.event(AnimalType::Mammals, EventType::GainActionPawn).player, None);
    }

    #[test]
    fn test_clone_is_independent() {
        let game = game(&[AnimalType::Arachnids, AnimalType::Birds]);
        let mut copy = game.clone();
        copy.board.tile_mut(INITIAL_JUNGLE).unwrap().remove_all_species(AnimalType::Arachnids);

        assert!(game.board().tile(INITIAL_JUNGLE).unwrap().has_species(AnimalType::Arachnids));
        assert!(!copy.board().tile(INITIAL_JUNGLE).unwrap().has_species(AnimalType::Arachnids));
    }
}

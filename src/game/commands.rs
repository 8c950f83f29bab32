//! The command surface: perform, skip, end turn, force end turn, leave.
//!
//! Every command runs against a snapshot of the game. On success the events
//! it fired are handed to the listeners and returned; on error the game is
//! restored to the snapshot and nothing is dispatched.

use tracing::{debug, info};

use super::automa;
use super::state::{Game, Phase};
use crate::actions::{Action, ActionKind};
use crate::animals::AnimalType;
use crate::core::{DominantSpeciesError, GameRng, PlayerId, Result};
use crate::events::{EventListener, GameEvent, ListenerId};
use crate::queue::PossibleAction;

impl Game {
    // === Commands ===

    /// Perform an action for the current animal of `player`.
    pub fn perform(&mut self, player: PlayerId, action: &Action, rng: &mut GameRng) -> Result<Vec<GameEvent>> {
        self.run(|game| game.perform_action(player, action, rng))
    }

    /// Skip the optional action at the head of the queue.
    pub fn skip(&mut self, player: PlayerId, rng: &mut GameRng) -> Result<Vec<GameEvent>> {
        self.run(|game| {
            game.check_current_player(player)?;
            game.skip_head()?;
            game.advance_when_idle(rng)
        })
    }

    /// Skip whatever optional actions remain and pass the turn on.
    pub fn end_turn(&mut self, player: PlayerId, rng: &mut GameRng) -> Result<Vec<GameEvent>> {
        self.run(|game| {
            game.check_current_player(player)?;
            game.end_current_turn(rng)
        })
    }

    /// End the turn of a player who is not responding: optional actions are
    /// skipped, mandatory ones are played by the automa.
    pub fn force_end_turn(&mut self, player: PlayerId, rng: &mut GameRng) -> Result<Vec<GameEvent>> {
        self.run(|game| {
            game.check_current_player(player)?;
            let animal = game.current;

            while game.current == animal && game.queue.has_actions(animal) {
                if game.queue.can_skip() {
                    game.skip_head()?;
                    continue;
                }
                match automa::choose(game, rng) {
                    Some(action) => game.apply_action(player, &action, rng)?,
                    None => game.forfeit_head()?,
                }
            }

            if game.is_ended() {
                return Ok(());
            }
            game.end_current_turn(rng)
        })
    }

    /// Remove every animal of `player` from the game.
    pub fn leave(&mut self, player: PlayerId, rng: &mut GameRng) -> Result<Vec<GameEvent>> {
        self.run(|game| {
            let leaving: Vec<AnimalType> = game
                .animals_of(player)
                .into_iter()
                .filter(|&a| game.is_playing(a))
                .collect();
            if leaving.is_empty() {
                return Err(DominantSpeciesError::InvalidPlayer);
            }
            for animal in leaving {
                game.remove_animal(animal, rng)?;
            }
            Ok(())
        })
    }

    pub fn add_event_listener(&mut self, listener: EventListener) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    // === Queries ===

    /// Kinds the current animal may perform now.
    #[must_use]
    pub fn possible_actions(&self) -> Vec<ActionKind> {
        if self.is_ended() {
            return Vec::new();
        }
        self.queue
            .next_possible_action()
            .filter(|pa| pa.can_be_performed_by(self.current))
            .map(|pa| pa.kinds().into_vec())
            .unwrap_or_default()
    }

    /// The player expected to act, if any.
    #[must_use]
    pub fn current_players(&self) -> Vec<PlayerId> {
        if self.is_ended() || !self.is_playing(self.current) {
            return Vec::new();
        }
        self.animals
            .get(&self.current)
            .map(|a| vec![a.player()])
            .unwrap_or_default()
    }

    // === Internals ===

    fn run(&mut self, command: impl FnOnce(&mut Game) -> Result<()>) -> Result<Vec<GameEvent>> {
        let snapshot = self.clone();
        match command(self) {
            Ok(()) => {
                let events = self.take_events();
                self.listeners.dispatch(&events);
                Ok(events)
            }
            Err(error) => {
                debug!(%error, "command rejected");
                *self = snapshot;
                Err(error)
            }
        }
    }

    fn check_current_player(&self, player: PlayerId) -> Result<()> {
        if self.is_ended() {
            return Err(DominantSpeciesError::GameEnded);
        }
        if !self.current_players().contains(&player) {
            return Err(DominantSpeciesError::NotCurrentPlayer);
        }
        Ok(())
    }

    pub(crate) fn perform_action(&mut self, player: PlayerId, action: &Action, rng: &mut GameRng) -> Result<()> {
        self.apply_action(player, action, rng)?;
        self.advance_when_idle(rng)
    }

    /// Play one action without moving the turn on.
    fn apply_action(&mut self, player: PlayerId, action: &Action, rng: &mut GameRng) -> Result<()> {
        self.check_current_player(player)?;

        let animal = self.current;
        let kind = action.kind();
        if !self.queue.can_perform(animal, kind) {
            return Err(DominantSpeciesError::CannotPerformAction);
        }
        debug!(animal = %animal, kind = %kind, "perform");

        let result = action.apply(self, rng)?;
        self.queue.perform(animal, kind)?;
        self.queue.add_all(result.follow_ups);
        self.can_undo = result.can_undo;
        self.recalculate_dominance();
        Ok(())
    }

    /// Once the queue runs dry, hand the turn to whoever acts next or move
    /// the phase on. Entries still queued for other animals wait for
    /// `end_turn`.
    fn advance_when_idle(&mut self, rng: &mut GameRng) -> Result<()> {
        if !self.queue.is_empty() {
            return Ok(());
        }
        self.can_undo = false;
        match self.phase {
            Phase::Planning => self.place_next_action_pawn(rng),
            Phase::Execution => self.next_action_pawn(rng),
            Phase::Reset => self.complete_reset(rng),
        }
    }

    fn skip_head(&mut self) -> Result<()> {
        let skipped = self.queue.skip()?;
        debug!(animal = %self.current, kind = ?skipped.kinds().first(), "skip");
        self.drop_head(&skipped)
    }

    /// Drop a mandatory head nobody can play.
    fn forfeit_head(&mut self) -> Result<()> {
        let Some(forfeited) = self.queue.forfeit() else {
            return Ok(());
        };
        debug!(animal = %forfeited.animal, kind = ?forfeited.kinds().first(), "forfeit");
        if forfeited.can_perform(ActionKind::Regression) {
            self.return_regression_pawns(forfeited.animal)?;
        }
        self.drop_head(&forfeited)
    }

    /// Clean up after a head that was not performed: its pawn goes home.
    fn drop_head(&mut self, head: &PossibleAction) -> Result<()> {
        if head.can_perform(ActionKind::SaveFromExtinction) {
            self.extinction(None)?;
        } else {
            let animal = self.current;
            let at_cursor = self.display.current_action_pawn().is_some_and(|p| {
                p.animal == animal && p.action_type.action_kind().is_some_and(|k| head.can_perform(k))
            });
            if at_cursor {
                self.return_current_action_pawn()?;
            }
        }

        self.recalculate_dominance();
        Ok(())
    }

    /// Skip the current animal's optional actions and hand the turn to
    /// whoever acts next, advancing the phase when the queue runs dry.
    pub(crate) fn end_current_turn(&mut self, rng: &mut GameRng) -> Result<()> {
        let ender = self.current;
        let phase = self.phase;
        debug!(animal = %ender, phase = %phase, "end turn");

        loop {
            while self.queue.has_actions(self.current) {
                self.skip_head()?;
            }

            if self.queue.is_empty() {
                self.advance_when_idle(rng)?;
            } else {
                self.current = self.queue.next_animal().ok_or(DominantSpeciesError::NoActionPawn)?;
            }

            let again = self.current == ender && self.phase == phase && self.queue.can_skip();
            if !again || self.is_ended() {
                break;
            }
        }

        self.can_undo = false;
        Ok(())
    }

    fn remove_animal(&mut self, animal: AnimalType, rng: &mut GameRng) -> Result<()> {
        let was_current = self.current == animal;
        let position = self.initiative.index_of(&animal).unwrap_or(0);
        let was_saving = self
            .queue
            .iter()
            .any(|pa| pa.animal == animal && pa.can_perform(ActionKind::SaveFromExtinction));

        self.animal_mut(animal)?.leave();
        self.initiative.retain(|&a| a != animal);
        self.queue.remove_all(animal);
        self.display.remove_animal(animal);

        let hexes = self.board.tiles_with_species(animal);
        for hex in hexes {
            self.board.tile_mut(hex)?.remove_all_species(animal);
        }
        self.recalculate_dominance();
        info!(animal = %animal, "animal left the game");

        if was_saving {
            self.extinction(None)?;
        }

        if was_current && !self.initiative.is_empty() && !self.is_ended() {
            if self.queue.is_empty() {
                match self.phase {
                    Phase::Planning => self.place_next_action_pawn_from(position, rng)?,
                    Phase::Execution => self.next_action_pawn(rng)?,
                    Phase::Reset => self.complete_reset(rng)?,
                }
            } else {
                self.current = self.queue.next_animal().ok_or(DominantSpeciesError::NoActionPawn)?;
            }
            self.can_undo = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::display::ActionType;

    fn game(animals: &[AnimalType]) -> Game {
        let mut config = GameConfig::new();
        for (i, &animal) in animals.iter().enumerate() {
            config = config.with_animal(animal, PlayerId::new(i as u8));
        }
        Game::start(&config, &mut GameRng::new(13)).unwrap()
    }

    #[test]
    fn test_perform_requires_current_player() {
        let mut game = game(&[AnimalType::Mammals, AnimalType::Reptiles]);
        let mut rng = GameRng::new(0);
        // Reptiles (player 1) place first.
        let action = Action::PlaceActionPawn { action_type: ActionType::Migration, index: 0 };

        assert_eq!(
            game.perform(PlayerId::new(0), &action, &mut rng),
            Err(DominantSpeciesError::NotCurrentPlayer)
        );
        assert!(game.perform(PlayerId::new(1), &action, &mut rng).is_ok());
    }

    #[test]
    fn test_perform_rejects_wrong_kind() {
        let mut game = game(&[AnimalType::Mammals, AnimalType::Reptiles]);
        let mut rng = GameRng::new(0);

        assert_eq!(
            game.perform(PlayerId::new(1), &Action::RemoveActionPawn, &mut rng),
            Err(DominantSpeciesError::CannotPerformAction)
        );
    }

    #[test]
    fn test_failed_perform_restores_state() {
        let mut game = game(&[AnimalType::Mammals, AnimalType::Reptiles]);
        let mut rng = GameRng::new(0);
        let pawns = game.animal(AnimalType::Reptiles).unwrap().action_pawns();
        // Regression has three spaces.
        let action = Action::PlaceActionPawn { action_type: ActionType::Regression, index: 9 };

        assert!(game.perform(PlayerId::new(1), &action, &mut rng).is_err());
        assert_eq!(game.animal(AnimalType::Reptiles).unwrap().action_pawns(), pawns);
        assert!(game.take_events().is_empty());
    }

    #[test]
    fn test_end_turn_with_mandatory_head_fails() {
        let mut game = game(&[AnimalType::Mammals, AnimalType::Reptiles]);
        let mut rng = GameRng::new(0);

        assert_eq!(game.end_turn(PlayerId::new(1), &mut rng), Err(DominantSpeciesError::CannotSkipAction));
        assert_eq!(game.current_animal(), AnimalType::Reptiles);
    }

    #[test]
    fn test_perform_hands_turn_to_next_on_initiative() {
        let mut game = game(&[AnimalType::Mammals, AnimalType::Reptiles]);
        let mut rng = GameRng::new(0);
        let action = Action::PlaceActionPawn { action_type: ActionType::Migration, index: 0 };

        game.perform(PlayerId::new(1), &action, &mut rng).unwrap();

        assert_eq!(game.current_animal(), AnimalType::Mammals);
        assert_eq!(game.possible_actions(), vec![ActionKind::PlaceActionPawn]);
        assert_eq!(game.current_players(), vec![PlayerId::new(0)]);
        assert!(!game.can_undo());
        assert_eq!(game.end_turn(PlayerId::new(1), &mut rng), Err(DominantSpeciesError::NotCurrentPlayer));
    }

    #[test]
    fn test_skip_emptying_queue_moves_execution_on() {
        let mut game = game(&[AnimalType::Mammals, AnimalType::Reptiles]);
        let mut rng = GameRng::new(1);
        game.queue = crate::queue::ActionQueue::new();
        for animal in [AnimalType::Mammals, AnimalType::Reptiles] {
            while game.animal(animal).unwrap().has_action_pawn() {
                game.animal_mut(animal).unwrap().remove_action_pawn().unwrap();
            }
        }
        game.display.place_action_pawn(AnimalType::Reptiles, ActionType::Migration, 0).unwrap();
        game.place_next_action_pawn(&mut rng).unwrap();
        assert_eq!(game.phase(), Phase::Execution);

        game.skip(PlayerId::new(1), &mut rng).unwrap();

        assert!(!game.display().has_action_pawn(ActionType::Migration));
        assert!(!game.queue().can_perform(AnimalType::Reptiles, ActionKind::Migration));
        assert_ne!(game.phase(), Phase::Execution);
    }

    #[test]
    fn test_skip_mandatory_fails() {
        let mut game = game(&[AnimalType::Mammals, AnimalType::Reptiles]);
        let mut rng = GameRng::new(0);

        assert_eq!(game.skip(PlayerId::new(1), &mut rng), Err(DominantSpeciesError::CannotSkipAction));
    }

    #[test]
    fn test_leave_removes_animal() {
        let mut game = game(&[AnimalType::Mammals, AnimalType::Reptiles, AnimalType::Birds]);
        let mut rng = GameRng::new(0);
        // Initiative: Birds, Reptiles, Mammals. Birds (player 2) are current.

        game.leave(PlayerId::new(2), &mut rng).unwrap();

        assert!(!game.is_playing(AnimalType::Birds));
        assert!(game.board().tiles_with_species(AnimalType::Birds).is_empty());
        assert_eq!(game.current_animal(), AnimalType::Reptiles);
        assert!(game.queue().can_perform(AnimalType::Reptiles, ActionKind::PlaceActionPawn));
        assert_eq!(game.leave(PlayerId::new(2), &mut rng), Err(DominantSpeciesError::InvalidPlayer));
    }

    #[test]
    fn test_force_end_turn_places_a_pawn() {
        let mut game = game(&[AnimalType::Mammals, AnimalType::Reptiles]);
        let mut rng = GameRng::new(5);
        let pawns = game.animal(AnimalType::Reptiles).unwrap().action_pawns();

        game.force_end_turn(PlayerId::new(1), &mut rng).unwrap();

        assert_eq!(game.animal(AnimalType::Reptiles).unwrap().action_pawns(), pawns - 1);
        assert_eq!(game.current_animal(), AnimalType::Mammals);
    }
}

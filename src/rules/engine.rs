//! Rules engine trait over the game's command surface.
//!
//! Drivers (servers, bots, playout loops) talk to a game through
//! `RulesEngine`:
//! - Who may act and with which actions
//! - Performing, skipping and ending turns
//! - The final result

use crate::actions::Action;
use crate::core::{GameRng, PlayerId, Result};
use crate::events::GameEvent;
use crate::game::Game;

/// How a finished game came out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// One player ranked first.
    Winner(PlayerId),
    /// No player to rank.
    Draw,
    /// Top score shared after the food-chain tiebreak.
    Winners(Vec<PlayerId>),
}

impl GameResult {
    /// Players sharing first place.
    #[must_use]
    pub fn winners(&self) -> &[PlayerId] {
        match self {
            GameResult::Winner(player) => std::slice::from_ref(player),
            GameResult::Winners(players) => players,
            GameResult::Draw => &[],
        }
    }

    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        self.winners().contains(&player)
    }
}

/// The command surface a driver needs to play a game to the end.
///
/// Commands leave the game untouched when they fail. `legal_actions` is
/// empty for anyone who is not acting now, and `is_terminal` stays `None`
/// until the final scoring has run.
pub trait RulesEngine {
    /// Players expected to act now.
    fn current_players(&self) -> Vec<PlayerId>;

    /// Legal actions for a player; empty unless it is their turn.
    fn legal_actions(&self, player: PlayerId) -> Vec<Action>;

    fn perform(&mut self, player: PlayerId, action: &Action, rng: &mut GameRng) -> Result<Vec<GameEvent>>;

    fn skip(&mut self, player: PlayerId, rng: &mut GameRng) -> Result<Vec<GameEvent>>;

    fn end_turn(&mut self, player: PlayerId, rng: &mut GameRng) -> Result<Vec<GameEvent>>;

    /// Final result once the game has ended.
    fn is_terminal(&self) -> Option<GameResult>;
}

impl RulesEngine for Game {
    fn current_players(&self) -> Vec<PlayerId> {
        Game::current_players(self)
    }

    fn legal_actions(&self, player: PlayerId) -> Vec<Action> {
        if Game::current_players(self).contains(&player) {
            Game::legal_actions(self)
        } else {
            Vec::new()
        }
    }

    fn perform(&mut self, player: PlayerId, action: &Action, rng: &mut GameRng) -> Result<Vec<GameEvent>> {
        Game::perform(self, player, action, rng)
    }

    fn skip(&mut self, player: PlayerId, rng: &mut GameRng) -> Result<Vec<GameEvent>> {
        Game::skip(self, player, rng)
    }

    fn end_turn(&mut self, player: PlayerId, rng: &mut GameRng) -> Result<Vec<GameEvent>> {
        Game::end_turn(self, player, rng)
    }

    fn is_terminal(&self) -> Option<GameResult> {
        if !self.is_ended() {
            return None;
        }
        Some(result(self))
    }
}

/// Winners by final score. Players still tied after the food-chain
/// tiebreak share the win.
fn result(game: &Game) -> GameResult {
    let ranking = game.ranking();
    let Some(&first) = ranking.first() else {
        return GameResult::Draw;
    };
    let best = game.score(first).unwrap_or(0);
    let tied: Vec<PlayerId> = ranking
        .into_iter()
        .filter(|&p| game.score(p).is_ok_and(|s| s == best))
        .collect();

    if tied.len() == 1 {
        GameResult::Winner(first)
    } else {
        GameResult::Winners(tied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animals::AnimalType;
    use crate::core::GameConfig;

    fn game() -> Game {
        let config = GameConfig::new()
            .with_animal(AnimalType::Mammals, PlayerId::new(0))
            .with_animal(AnimalType::Insects, PlayerId::new(1));
        Game::start(&config, &mut GameRng::new(2)).unwrap()
    }

    #[test]
    fn test_winners_of_each_result() {
        let alone = GameResult::Winner(PlayerId::new(1));
        assert_eq!(alone.winners(), &[PlayerId::new(1)]);
        assert!(!alone.is_winner(PlayerId::new(0)));

        assert!(GameResult::Draw.winners().is_empty());

        let shared = GameResult::Winners(vec![PlayerId::new(0), PlayerId::new(2)]);
        assert!(shared.is_winner(PlayerId::new(2)));
        assert!(!shared.is_winner(PlayerId::new(1)));
    }

    #[test]
    fn test_legal_actions_only_for_current_player() {
        let game = game();
        // Insects place first.
        assert!(RulesEngine::legal_actions(&game, PlayerId::new(0)).is_empty());
        assert!(!RulesEngine::legal_actions(&game, PlayerId::new(1)).is_empty());
        assert_eq!(game.is_terminal(), None);
    }

    #[test]
    fn test_result_ties_share_win() {
        let mut game = game();
        assert_eq!(result(&game), GameResult::Winners(vec![PlayerId::new(0), PlayerId::new(1)]));

        game.animal_mut(AnimalType::Insects).unwrap().add_vps(3);
        assert_eq!(result(&game), GameResult::Winner(PlayerId::new(1)));
    }
}

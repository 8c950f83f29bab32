//! Legal move generation and the automa.
//!
//! Candidates are generated per action kind from the board and display, then
//! filtered through [`Action::validate`]. The automa picks uniformly among
//! what is left; it is what plays mandatory actions for a player whose turn
//! is forced to end.

use super::state::Game;
use crate::actions::{
    distinct_elements, speciation_element, Action, ActionKind, ExodusMove, SpeciesMove, TileSpecies,
    HIBERNATION_MAX_SPECIES,
};
use crate::animals::{AnimalType, ElementType};
use crate::board::{Corner, Hex};
use crate::core::GameRng;
use crate::display::ActionType;
use crate::supply::STACKS;

impl Game {
    /// Every action the current animal may legally perform for the head of
    /// the queue.
    #[must_use]
    pub fn legal_actions(&self) -> Vec<Action> {
        if self.is_ended() || !self.queue.has_actions(self.current) {
            return Vec::new();
        }
        self.possible_actions()
            .into_iter()
            .flat_map(|kind| candidates(self, kind))
            .filter(|action| action.validate(self).is_ok())
            .collect()
    }
}

/// A uniformly random legal action for the head of the queue.
pub(crate) fn choose(game: &Game, rng: &mut GameRng) -> Option<Action> {
    let actions = game.legal_actions();
    rng.choose(&actions).cloned()
}

/// Plausible actions of one kind; not all of them need be legal.
fn candidates(game: &Game, kind: ActionKind) -> Vec<Action> {
    let animal = game.current;
    let board = &game.board;
    let display = &game.display;

    match kind {
        ActionKind::PlaceActionPawn => display
            .possible_placements()
            .into_iter()
            .map(|(action_type, index)| Action::PlaceActionPawn { action_type, index })
            .collect(),

        ActionKind::Adaptation => distinct_elements(display.elements(ActionType::Adaptation))
            .into_iter()
            .map(|element| Action::Adaptation { element })
            .collect(),

        ActionKind::Regression => {
            let pawns = display.number_of_action_pawns(ActionType::Regression, animal) as usize;
            let skip: Vec<ElementType> = distinct_elements(display.elements(ActionType::Regression))
                .into_iter()
                .take(pawns)
                .collect();
            vec![Action::Regression { skip }, Action::Regression { skip: Vec::new() }]
        }

        ActionKind::Abundance => {
            let corners = board.vacant_corners();
            element_placements(display.elements(ActionType::Abundance), &corners)
                .map(|(element, corner)| Action::Abundance { element, corner })
                .collect()
        }

        ActionKind::Wasteland => distinct_elements(display.elements(ActionType::Wasteland))
            .into_iter()
            .map(|element| Action::Wasteland { element })
            .collect(),

        ActionKind::Depletion => {
            let box_types = display.elements(ActionType::Depletion);
            board
                .elements()
                .iter()
                .filter(|(_, e)| box_types.contains(*e))
                .map(|(c, _)| Action::Depletion { corner: *c })
                .collect()
        }

        ActionKind::Glaciation => board
            .tiles()
            .iter()
            .filter(|(_, t)| !t.is_tundra())
            .map(|(h, _)| Action::Glaciation { hex: *h })
            .collect(),

        ActionKind::Speciation => speciation_candidates(game),

        ActionKind::Wanderlust => {
            let hexes = board.vacant_hexes();
            (0..STACKS)
                .filter(|&stack| game.wanderlust.face_up(stack).is_some())
                .flat_map(|stack| {
                    hexes.iter().map(move |&hex| Action::Wanderlust { stack, hex, element: None })
                })
                .collect()
        }

        ActionKind::WanderlustMove => {
            let Some(target) = board.last_placed_tile() else {
                return Vec::new();
            };
            let moves: Vec<TileSpecies> = board
                .adjacent_tiles(target)
                .filter(|(_, t)| t.has_species(animal))
                .map(|(hex, _)| TileSpecies { hex, species: 1 })
                .collect();
            vec![Action::WanderlustMove { moves }, Action::WanderlustMove { moves: Vec::new() }]
        }

        ActionKind::Migration => {
            let mut moves = Vec::new();
            for (from, _) in board.tiles().iter().filter(|(_, t)| t.has_species(animal)) {
                if let Some((to, _)) = board.adjacent_tiles(*from).next() {
                    moves.push(SpeciesMove { from: *from, to, species: 1 });
                }
            }
            let mut actions: Vec<Action> = moves
                .iter()
                .map(|&m| Action::Migration { moves: vec![m] })
                .collect();
            actions.push(Action::Migration { moves });
            actions.push(Action::Migration { moves: Vec::new() });
            actions
        }

        ActionKind::Competition => {
            let tiles = game.competition_tiles().unwrap_or_default();
            let targets: Vec<(Hex, AnimalType)> = tiles
                .iter()
                .filter_map(|&h| first_opponent(game, h, animal).map(|a| (h, a)))
                .collect();
            let mut actions: Vec<Action> = targets
                .iter()
                .map(|&(h, a)| Action::Competition { tiles: vec![h], animals: vec![a] })
                .collect();
            actions.push(Action::Competition { tiles: Vec::new(), animals: Vec::new() });
            actions
        }

        ActionKind::Domination => board
            .tiles()
            .keys()
            .filter(|h| !game.scored_tiles.contains(*h))
            .map(|&hex| Action::Domination { hex })
            .collect(),

        ActionKind::DominanceCard => game
            .available_cards
            .iter()
            .map(|&card| Action::DominanceCard { card })
            .collect(),

        ActionKind::RemoveElement => game
            .animal(animal)
            .map(|a| {
                a.removable_element_types()
                    .into_iter()
                    .map(|element| Action::RemoveElement { element })
                    .collect()
            })
            .unwrap_or_default(),

        ActionKind::RemoveActionPawn => vec![Action::RemoveActionPawn],

        ActionKind::RemoveAllBut1SpeciesOnEachTile => vec![Action::RemoveAllBut1SpeciesOnEachTile],

        ActionKind::Aquatic => {
            let corners: Vec<Corner> = board
                .vacant_corners()
                .into_iter()
                .filter(|&c| board.corner_tiles(c).any(|(_, t)| t.tile_type().is_aquatic()))
                .collect();
            let bag = bag_types(game);
            element_placements(&bag, &corners)
                .map(|(element, corner)| Action::Aquatic { element, corner, tile: None, species: 0 })
                .collect()
        }

        ActionKind::Biomass => {
            let tiles = game.biomass_tiles();
            let animals: Vec<AnimalType> = tiles
                .iter()
                .filter_map(|&h| board.tile(h).and_then(|t| t.animals().next()))
                .collect();
            vec![Action::Biomass { tiles, animals }]
        }

        ActionKind::Blight => board
            .tiles()
            .keys()
            .map(|&hex| {
                let corners: Vec<Corner> = board.adjacent_elements(hex).skip(1).map(|(c, _)| c).collect();
                Action::Blight { hex, corners }
            })
            .collect(),

        ActionKind::Catastrophe => board
            .tiles()
            .iter()
            .map(|(&hex, tile)| {
                let adjacent = board
                    .adjacent_tiles(hex)
                    .map(|(h, t)| (h, t.animals().next()))
                    .collect();
                Action::Catastrophe { hex, keep: tile.animals().next(), adjacent }
            })
            .collect(),

        ActionKind::Evolution => {
            let mut actions: Vec<Action> = board
                .tiles()
                .iter()
                .filter_map(|(&h, _)| first_opponent(game, h, animal).map(|a| (h, a)))
                .map(|(h, a)| Action::Evolution { tiles: vec![h], animals: vec![a] })
                .collect();
            actions.push(Action::Evolution { tiles: Vec::new(), animals: Vec::new() });
            actions
        }

        ActionKind::Fecundity => {
            let tiles = board.tiles_with_species(animal);
            vec![Action::Fecundity { tiles }, Action::Fecundity { tiles: Vec::new() }]
        }

        ActionKind::Fertile => board
            .tiles_with_species(animal)
            .into_iter()
            .map(|hex| Action::Fertile { hex })
            .collect(),

        ActionKind::Habitat => {
            let bag = bag_types(game);
            let corners = board.vacant_corners();
            element_placements(&bag, &corners)
                .map(|(element, corner)| Action::Habitat { element, corner })
                .collect()
        }

        ActionKind::Hibernation => {
            let species = game
                .animal(animal)
                .map_or(0, |a| a.eliminated_species().min(HIBERNATION_MAX_SPECIES));
            board
                .tiles()
                .keys()
                .map(|&hex| Action::Hibernation { hex, species })
                .collect()
        }

        ActionKind::MassExodus => board
            .tiles()
            .iter()
            .filter_map(|(&from, tile)| {
                let (to, _) = board.adjacent_tiles(from).next()?;
                let moves = tile
                    .animals()
                    .map(|a| ExodusMove { to, animal: a, species: tile.species(a) })
                    .collect();
                Some(Action::MassExodus { from, moves })
            })
            .collect(),

        ActionKind::Metamorphosis => {
            let removable = game
                .animal(animal)
                .map(|a| a.removable_element_types())
                .unwrap_or_default();
            let bag = bag_types(game);
            removable
                .iter()
                .flat_map(|&from| bag.iter().map(move |&to| Action::Metamorphosis { from, to }))
                .collect()
        }

        ActionKind::Predator => {
            let tiles = game.predator_tiles();
            let animals: Vec<AnimalType> = tiles
                .iter()
                .filter_map(|&h| first_opponent(game, h, animal))
                .collect();
            vec![Action::Predator { tiles, animals }]
        }

        ActionKind::SaveFromExtinction => game
            .endangered_mammal_tiles()
            .into_iter()
            .map(|hex| Action::SaveFromExtinction { hex })
            .collect(),
    }
}

fn speciation_candidates(game: &Game) -> Vec<Action> {
    let animal = game.current;
    let board = &game.board;
    let Some(pawn) = game
        .display
        .current_action_pawn()
        .filter(|p| p.animal == animal && p.action_type == ActionType::Speciation)
    else {
        return Vec::new();
    };

    if pawn.is_free() && animal == AnimalType::Insects {
        return board
            .tiles()
            .keys()
            .map(|&hex| Action::Speciation { corner: None, tiles: vec![hex], species: vec![1] })
            .collect();
    }

    let Some(element) = speciation_element(pawn.index) else {
        return Vec::new();
    };
    let mut actions = Vec::new();
    for (&corner, _) in board.elements().iter().filter(|(_, e)| **e == element) {
        let tiles: Vec<Hex> = board.corner_tiles(corner).map(|(h, _)| h).collect();
        for &hex in &tiles {
            actions.push(Action::Speciation { corner: Some(corner), tiles: vec![hex], species: vec![1] });
        }
        let species = vec![1; tiles.len()];
        actions.push(Action::Speciation { corner: Some(corner), tiles, species });
    }
    actions
}

/// Element types in the draw bag.
fn bag_types(game: &Game) -> Vec<ElementType> {
    ElementType::ALL
        .iter()
        .copied()
        .filter(|&e| game.bag.contains(e))
        .collect()
}

fn element_placements<'a>(
    elements: &'a [ElementType],
    corners: &'a [Corner],
) -> impl Iterator<Item = (ElementType, Corner)> + 'a {
    distinct_elements(elements)
        .into_iter()
        .flat_map(move |e| corners.iter().map(move |&c| (e, c)))
}

/// First animal other than `animal` with species on the tile.
fn first_opponent(game: &Game, hex: Hex, animal: AnimalType) -> Option<AnimalType> {
    game.board
        .tile(hex)
        .and_then(|t| t.animals().find(|&a| a != animal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, PlayerId};
    use crate::queue::PossibleAction;

    fn game(animals: &[AnimalType]) -> Game {
        let mut config = GameConfig::new();
        for (i, &animal) in animals.iter().enumerate() {
            config = config.with_animal(animal, PlayerId::new(i as u8));
        }
        Game::start(&config, &mut GameRng::new(21)).unwrap()
    }

    #[test]
    fn test_legal_placements_at_start() {
        let game = game(&[AnimalType::Mammals, AnimalType::Reptiles]);
        let actions = game.legal_actions();

        assert_eq!(actions.len(), game.display().possible_placements().len());
        assert!(actions.iter().all(|a| a.kind() == ActionKind::PlaceActionPawn));
    }

    #[test]
    fn test_choose_is_legal_and_deterministic() {
        let game = game(&[AnimalType::Birds, AnimalType::Insects]);

        let a = choose(&game, &mut GameRng::new(8)).unwrap();
        let b = choose(&game, &mut GameRng::new(8)).unwrap();
        assert_eq!(a, b);
        assert!(a.validate(&game).is_ok());
    }

    #[test]
    fn test_no_actions_for_other_animal_head() {
        let mut game = game(&[AnimalType::Mammals, AnimalType::Reptiles]);
        game.queue = crate::queue::ActionQueue::initial(PossibleAction::mandatory(
            AnimalType::Mammals,
            ActionKind::RemoveActionPawn,
        ));
        // Reptiles are current.
        assert!(game.legal_actions().is_empty());
    }

    #[test]
    fn test_habitat_candidates_use_bag() {
        let mut game = game(&[AnimalType::Mammals, AnimalType::Reptiles]);
        game.queue = crate::queue::ActionQueue::initial(PossibleAction::mandatory(
            AnimalType::Reptiles,
            ActionKind::Habitat,
        ));

        let actions = game.legal_actions();
        assert!(!actions.is_empty());
        for action in actions {
            let Action::Habitat { element, corner } = action else {
                panic!("unexpected action");
            };
            assert!(game.bag().contains(element));
            assert!(game.board().element(corner).is_none());
        }
    }
}

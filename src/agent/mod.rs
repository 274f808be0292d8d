//! Players for either side.
//!
//! A [`Player`] wraps one of three strategies chosen from its argument string:
//! uniformly random placement, a single reusable search tree, or the
//! root-parallel coordinator.

pub mod config;
pub mod episode;

pub use config::{AgentConfig, Strategy};
pub use episode::play_episode;

use crate::game::{Move, Position, Side};
use crate::mcts::{make_rng, SearchCoordinator, SearchTree};
use crate::Result;
use rand::prelude::*;
use rand::rngs::StdRng;

pub struct Player<P: Position> {
    config: AgentConfig,
    rng: StdRng,
    tree: Option<SearchTree<P>>,
    coordinator: Option<SearchCoordinator<P>>,
}

impl<P: Position> Player<P> {
    pub fn new(config: AgentConfig) -> Result<Self> {
        let coordinator = match config.strategy {
            Strategy::ParallelMcts => Some(SearchCoordinator::new(config.hyperparams.clone())?),
            _ => None,
        };
        Ok(Player {
            rng: make_rng(config.seed),
            config,
            tree: None,
            coordinator,
        })
    }

    pub fn from_args(args: &str) -> Result<Self> {
        Self::new(AgentConfig::parse(args)?)
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn role(&self) -> Side {
        self.config.role
    }

    pub fn strategy(&self) -> Strategy {
        self.config.strategy
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// The single-strategy tree, if one has been built this episode.
    pub fn tree(&self) -> Option<&SearchTree<P>> {
        self.tree.as_ref()
    }

    /// Search state from a previous game must not leak into the next one.
    pub fn open_episode(&mut self) {
        self.reset_search();
    }

    pub fn close_episode(&mut self) {
        self.reset_search();
    }

    fn reset_search(&mut self) {
        self.tree = None;
        if let Some(coordinator) = self.coordinator.as_mut() {
            coordinator.reset();
        }
    }

    /// Chooses a move for this player's side, or `None` when it has none.
    pub fn take_action(&mut self, state: &P) -> Result<Option<Move>> {
        match self.config.strategy {
            Strategy::Random => Ok(self.random_action(state)),
            Strategy::Mcts => self.mcts_action(state),
            Strategy::ParallelMcts => self.parallel_action(state),
        }
    }

    fn random_action(&mut self, state: &P) -> Option<Move> {
        let who = self.config.role;
        let mut space: Vec<Move> = (0..state.cell_count()).map(|cell| Move::new(cell, who)).collect();
        space.shuffle(&mut self.rng);
        space.into_iter().find(|&mv| state.clone().apply(mv).is_legal())
    }

    fn mcts_action(&mut self, state: &P) -> Result<Option<Move>> {
        let who = self.config.role;
        let params = &self.config.hyperparams;

        let tree = match self.tree.take() {
            Some(mut tree) if !state.is_empty() => {
                tree.advance(state.clone(), who);
                tree
            }
            _ => SearchTree::new(state.clone(), who, params.clone()),
        };
        let tree = self.tree.insert(tree);

        if tree.is_terminal() {
            return Ok(None);
        }

        let report = tree.grow(params.max_iterations, params.max_seconds)?;
        log::debug!(
            "{}: {} iterations in {:.2}s, {} nodes",
            self.config.name,
            report.iterations,
            report.seconds_used,
            tree.len()
        );

        let Some(mv) = tree.best_move() else {
            return Ok(None);
        };
        tree.play(mv)?;
        Ok(Some(mv))
    }

    fn parallel_action(&mut self, state: &P) -> Result<Option<Move>> {
        let who = self.config.role;
        match self.coordinator.as_mut() {
            Some(coordinator) => Ok(coordinator.decide(state, who)?.best_move),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Board;

    #[test]
    fn test_random_player_plays_legal_moves() {
        let mut player = Player::<Board>::from_args("role=black seed=3").unwrap();
        let board = Board::from_diagram(&["XO.", ".X.", "..."], Side::Black).unwrap();
        for _ in 0..20 {
            let mv = player.take_action(&board).unwrap().unwrap();
            assert_eq!(mv.side, Side::Black);
            assert!(board.clone().apply(mv).is_legal());
        }
    }

    #[test]
    fn test_random_player_without_moves() {
        let mut player = Player::<Board>::from_args("role=black").unwrap();
        assert_eq!(player.take_action(&Board::new(1, 1)).unwrap(), None);
    }

    #[test]
    fn test_mcts_player_reuses_tree() {
        let mut player =
            Player::<Board>::from_args("name=tree role=black mcts simu=300 time=10 seed=5").unwrap();
        assert_eq!(player.strategy(), Strategy::Mcts);

        let mut board = Board::new(3, 3);
        let mv = player.take_action(&board).unwrap().unwrap();
        assert_eq!(board.apply(mv), crate::game::PlaceOutcome::Legal);

        // After our move the tree is rooted at the resulting position.
        let tree = player.tree().unwrap();
        assert_eq!(tree.root_node().position(), &board);
        let reused = tree.root_node().stats().visits;
        assert!(reused > 0);

        let reply = crate::game::get_legal_moves::get_legal_moves(&board, Side::White)[0];
        board.apply(reply);
        let second = player.take_action(&board).unwrap().unwrap();
        assert_eq!(board.apply(second), crate::game::PlaceOutcome::Legal);
        assert_eq!(player.tree().unwrap().root_node().position(), &board);
    }

    #[test]
    fn test_opening_position_starts_fresh_tree() {
        let mut player =
            Player::<Board>::from_args("role=black mcts simu=40 time=10 seed=6").unwrap();
        let midgame = Board::from_diagram(&["X..", ".O.", "..."], Side::Black).unwrap();
        player.take_action(&midgame).unwrap().unwrap();

        let opening = Board::new(3, 3);
        let mv = player.take_action(&opening).unwrap().unwrap();
        let mut expected = opening.clone();
        expected.apply(mv);

        let tree = player.tree().unwrap();
        assert_eq!(tree.root_node().position(), &expected);
        assert!(tree.root_node().stats().visits <= 40);
    }

    #[test]
    fn test_mcts_player_on_dead_position() {
        let mut player = Player::<Board>::from_args("role=black mcts simu=50 seed=1").unwrap();
        assert_eq!(player.take_action(&Board::new(1, 1)).unwrap(), None);
    }

    #[test]
    fn test_close_episode_drops_tree() {
        let mut player = Player::<Board>::from_args("role=black mcts simu=20 seed=2").unwrap();
        player.take_action(&Board::new(3, 3)).unwrap();
        assert!(player.tree().is_some());
        player.close_episode();
        assert!(player.tree().is_none());
    }

    #[test]
    fn test_parallel_player_returns_move() {
        let mut player =
            Player::<Board>::from_args("role=black mcts parallel=2 simu=100 seed=9").unwrap();
        assert_eq!(player.strategy(), Strategy::ParallelMcts);
        let mv = player.take_action(&Board::new(3, 3)).unwrap().unwrap();
        assert_eq!(mv.side, Side::Black);
    }
}

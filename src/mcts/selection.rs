//! Selection policy: UCT with an optional RAVE-blended exploitation term.
//!
//! Score of a child `j` of parent `p`:
//!
//! ```text
//! β      = n_rave / (n + n_rave + 4·n·n_rave·b²)        (0 when RAVE is off)
//! value  = (1-β)·w/(n+1) + β·w_rave/(n_rave+1)
//! exploit = 1 - value   if j's side to move is the optimized side
//!           value       otherwise
//! explore = sqrt(c · ln(N_p + 1) / (n + 1))
//! score   = exploit + explore
//! ```
//!
//! When the optimized side is to move at `j`, the opponent chose `j`, and the
//! opponent prefers a low win rate for us; hence the complement.

use crate::game::{Position, Side};
use crate::mcts::hyperparameters::MCTSHyperparameters;
use crate::mcts::node::{NodeId, NodeStats};
use crate::mcts::tree::SearchTree;

/// Parameters of the scoring function, fixed for one tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringPolicy {
    pub exploration: f64,
    pub rave_enabled: bool,
    pub rave_bias: f64,
    /// Side the tree optimizes for
    pub perspective: Side,
}

impl ScoringPolicy {
    pub fn from_params(params: &MCTSHyperparameters, perspective: Side) -> Self {
        ScoringPolicy {
            exploration: params.exploration_constant,
            rave_enabled: params.rave_enabled,
            rave_bias: params.rave_bias,
            perspective,
        }
    }

    /// `c = 0`, RAVE off: pure exploitation, used to read off the final move.
    pub fn greedy(perspective: Side) -> Self {
        ScoringPolicy {
            exploration: 0.0,
            rave_enabled: false,
            rave_bias: 0.0,
            perspective,
        }
    }

    /// RAVE weight; decays to 0 as real visits accumulate.
    pub fn beta(&self, stats: &NodeStats) -> f64 {
        if !self.rave_enabled {
            return 0.0;
        }
        let n = stats.visits as f64;
        let n_rave = stats.rave_visits as f64;
        let denom = n + n_rave + 4.0 * n * n_rave * self.rave_bias * self.rave_bias;
        if denom > 0.0 {
            n_rave / denom
        } else {
            0.0
        }
    }

    pub fn exploitation(&self, stats: &NodeStats, child_to_move: Side) -> f64 {
        let beta = self.beta(stats);
        let blended = (1.0 - beta) * stats.winrate() + beta * stats.rave_winrate();
        if child_to_move == self.perspective {
            1.0 - blended
        } else {
            blended
        }
    }

    pub fn exploration_bonus(&self, parent_visits: u32, child_visits: u32) -> f64 {
        (self.exploration * (parent_visits as f64 + 1.0).ln() / (child_visits as f64 + 1.0)).sqrt()
    }

    pub fn score(&self, parent_visits: u32, stats: &NodeStats, child_to_move: Side) -> f64 {
        self.exploitation(stats, child_to_move) + self.exploration_bonus(parent_visits, stats.visits)
    }
}

/// Any unvisited child wins outright; otherwise the highest score, ties going
/// to the earliest child. `None` only when `node` has no children.
pub fn select_best_child<P: Position>(
    tree: &SearchTree<P>,
    node: NodeId,
    policy: &ScoringPolicy,
) -> Option<NodeId> {
    let parent = tree.node(node);
    let parent_visits = parent.stats().visits;
    let mut best = None;
    let mut best_score = f64::NEG_INFINITY;

    for &child_id in parent.children() {
        let child = tree.node(child_id);
        if child.stats().visits == 0 {
            return Some(child_id);
        }
        let score = policy.score(parent_visits, child.stats(), child.to_move());
        if score > best_score {
            best_score = score;
            best = Some(child_id);
        }
    }

    best
}

/// Walks down from the root through fully expanded nodes and returns the
/// first node with untried moves, or the terminal node the walk ends on.
pub fn select<P: Position>(tree: &SearchTree<P>, policy: &ScoringPolicy) -> NodeId {
    let mut current = tree.root();

    while !tree.node(current).is_terminal() {
        if !tree.node(current).is_fully_expanded() {
            return current;
        }
        match select_best_child(tree, current, policy) {
            Some(child) => current = child,
            None => break,
        }
    }

    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Board;

    fn stats(visits: u32, total_reward: f64, rave_visits: u32, rave_reward: f64) -> NodeStats {
        NodeStats {
            visits,
            total_reward,
            rave_visits,
            rave_reward,
        }
    }

    #[test]
    fn test_score_without_rave_is_plain_uct() {
        let policy = ScoringPolicy {
            exploration: 2.0,
            rave_enabled: false,
            rave_bias: 0.025,
            perspective: Side::Black,
        };
        let s = stats(9, 6.0, 40, 32.0);
        let explore = (2.0 * (101.0f64).ln() / 10.0).sqrt();

        // Opponent to move at the child: our win rate counts directly.
        let expected = 6.0 / 10.0 + explore;
        assert!((policy.score(100, &s, Side::White) - expected).abs() < 1e-12);

        // Optimized side to move at the child: the complement.
        let expected = 1.0 - 6.0 / 10.0 + explore;
        assert!((policy.score(100, &s, Side::Black) - expected).abs() < 1e-12);
        assert_eq!(policy.beta(&s), 0.0);
    }

    #[test]
    fn test_beta_formula_and_decay() {
        let policy = ScoringPolicy::from_params(&MCTSHyperparameters::default(), Side::Black);
        let fresh = stats(0, 0.0, 40, 32.0);
        assert!((policy.beta(&fresh) - 1.0).abs() < 1e-12);

        let s = stats(10, 5.0, 40, 32.0);
        let b2 = 0.025 * 0.025;
        let expected = 40.0 / (10.0 + 40.0 + 4.0 * 10.0 * 40.0 * b2);
        assert!((policy.beta(&s) - expected).abs() < 1e-12);

        let mature = stats(100_000, 50_000.0, 40, 32.0);
        assert!(policy.beta(&mature) < policy.beta(&s));
        assert!(policy.beta(&mature) < 0.01);
    }

    #[test]
    fn test_beta_guard_on_empty_stats() {
        let policy = ScoringPolicy::from_params(&MCTSHyperparameters::default(), Side::White);
        assert_eq!(policy.beta(&stats(0, 0.0, 0, 0.0)), 0.0);
    }

    #[test]
    fn test_rave_blend_in_exploitation() {
        let policy = ScoringPolicy::from_params(&MCTSHyperparameters::default(), Side::Black);
        let s = stats(4, 1.0, 40, 32.0);
        let beta = policy.beta(&s);
        let blended = (1.0 - beta) * (1.0 / 5.0) + beta * (32.0 / 41.0);
        assert!((policy.exploitation(&s, Side::White) - blended).abs() < 1e-12);
        assert!((policy.exploitation(&s, Side::Black) - (1.0 - blended)).abs() < 1e-12);
    }

    #[test]
    fn test_greedy_has_no_exploration() {
        let policy = ScoringPolicy::greedy(Side::Black);
        assert_eq!(policy.exploration_bonus(1000, 1), 0.0);
    }

    #[test]
    fn test_select_returns_root_until_fully_expanded() {
        let params = MCTSHyperparameters {
            seed: Some(1),
            rave_enabled: false,
            ..Default::default()
        };
        let mut tree = SearchTree::new(Board::new(3, 3), Side::Black, params.clone());
        let policy = ScoringPolicy::from_params(&params, Side::Black);

        for _ in 0..9 {
            assert_eq!(select(&tree, &policy), tree.root());
            tree.expand(tree.root()).unwrap();
        }
        assert!(tree.root_node().is_fully_expanded());
        assert_ne!(select(&tree, &policy), tree.root());
    }

    #[test]
    fn test_unvisited_child_selected_first() {
        let params = MCTSHyperparameters {
            seed: Some(4),
            ..Default::default()
        };
        let mut tree = SearchTree::new(Board::new(3, 3), Side::Black, params.clone());
        tree.expand(tree.root()).unwrap();
        tree.expand(tree.root()).unwrap();

        let second = tree.root_node().children()[1];
        tree.node_mut(second).stats.visits = 0;

        let policy = ScoringPolicy::from_params(&params, Side::Black);
        assert_eq!(select_best_child(&tree, tree.root(), &policy), Some(second));
    }

    #[test]
    fn test_best_child_picks_highest_score_first_on_ties() {
        let params = MCTSHyperparameters {
            seed: Some(9),
            rave_enabled: false,
            ..Default::default()
        };
        let mut tree = SearchTree::new(Board::new(3, 3), Side::Black, params.clone());
        for _ in 0..3 {
            tree.expand(tree.root()).unwrap();
        }
        let children = tree.root_node().children().to_vec();
        for &child in &children {
            tree.node_mut(child).stats = stats(5, 2.0, 40, 32.0);
        }
        let policy = ScoringPolicy::from_params(&params, Side::Black);
        assert_eq!(select_best_child(&tree, tree.root(), &policy), Some(children[0]));

        // Children have white to move; black wants the highest win rate.
        tree.node_mut(children[2]).stats = stats(5, 4.0, 40, 32.0);
        assert_eq!(select_best_child(&tree, tree.root(), &policy), Some(children[2]));
    }

    #[test]
    fn test_select_stops_at_terminal_root() {
        let tree = SearchTree::new(Board::new(1, 1), Side::Black, MCTSHyperparameters::default());
        let policy = ScoringPolicy::greedy(Side::Black);
        assert_eq!(select(&tree, &policy), tree.root());
        assert_eq!(select_best_child(&tree, tree.root(), &policy), None);
    }
}

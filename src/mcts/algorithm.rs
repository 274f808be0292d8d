//! Core growth loop: select, expand, simulate, backpropagate until the
//! iteration cap or the wall-clock budget runs out.
//!
//! The deadline is polled once per iteration, after the iteration finishes,
//! so a search can overrun its budget by the cost of one rollout.

use crate::game::Position;
use crate::mcts::selection::{select, ScoringPolicy};
use crate::mcts::tree::SearchTree;
use crate::{Error, Result};
use std::time::{Duration, Instant};

/// Bookkeeping returned by [`SearchTree::grow`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowReport {
    /// Select/expand cycles completed
    pub iterations: usize,
    /// Elapsed wall-clock time, capped at the configured budget
    pub seconds_used: f64,
    /// The time budget ran out before the iteration cap
    pub stopped_early: bool,
}

impl<P: Position> SearchTree<P> {
    /// Runs up to `max_iterations` search iterations within `max_seconds`.
    ///
    /// Each iteration selects a node; a node with untried moves is expanded
    /// (which simulates and backpropagates), a terminal node reached below
    /// the root has its known outcome backpropagated. A terminal root returns
    /// straight away with zero iterations.
    pub fn grow(&mut self, max_iterations: usize, max_seconds: f64) -> Result<GrowReport> {
        let budget = Duration::try_from_secs_f64(max_seconds).map_err(|_| {
            Error::InvalidConfig(format!("invalid time budget: {} seconds", max_seconds))
        })?;
        let start = Instant::now();

        if self.is_terminal() {
            return Ok(GrowReport {
                iterations: 0,
                seconds_used: 0.0,
                stopped_early: false,
            });
        }

        let policy = ScoringPolicy::from_params(&self.params, self.perspective());
        let mut iterations = 0;
        let mut stopped_early = false;

        for i in 0..max_iterations {
            let leaf = select(self, &policy);
            if self.node(leaf).is_terminal() {
                let outcome = self.simulate_from(leaf)?;
                self.backpropagate(leaf, outcome.reward, outcome.history);
            } else {
                self.expand(leaf)?;
            }
            iterations = i + 1;

            let elapsed = start.elapsed();
            if elapsed > budget {
                log::info!(
                    "Early stopping: made {} iterations in {:.2} seconds",
                    iterations,
                    elapsed.as_secs_f64()
                );
                stopped_early = true;
                break;
            }
        }

        Ok(GrowReport {
            iterations,
            seconds_used: start.elapsed().as_secs_f64().min(max_seconds),
            stopped_early,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, Side};
    use crate::mcts::hyperparameters::MCTSHyperparameters;
    use assert_matches::assert_matches;

    fn params(seed: u64, rave: bool) -> MCTSHyperparameters {
        MCTSHyperparameters {
            seed: Some(seed),
            rave_enabled: rave,
            ..Default::default()
        }
    }

    #[test]
    fn test_root_visits_equal_iterations() {
        let mut tree = SearchTree::new(Board::new(3, 3), Side::Black, params(1, true));
        let report = tree.grow(300, 10.0).unwrap();
        assert_eq!(report.iterations, 300);
        assert!(!report.stopped_early);
        assert_eq!(tree.root_node().stats().visits, 300);
    }

    #[test]
    fn test_child_visits_sum_to_parent_visits() {
        let mut tree = SearchTree::new(Board::new(3, 3), Side::Black, params(2, false));
        tree.grow(500, 10.0).unwrap();

        for id in tree.subtree(tree.root()) {
            let node = tree.node(id);
            if node.children().is_empty() {
                continue;
            }
            let from_children: u32 = node
                .children()
                .iter()
                .map(|&c| tree.node(c).stats().visits)
                .sum();
            // Every non-root node also carries the rollout from its own expansion.
            let own = if id == tree.root() { 0 } else { 1 };
            assert_eq!(node.stats().visits, from_children + own);
        }
    }

    #[test]
    fn test_terminal_root_grows_nothing() {
        let mut tree = SearchTree::new(Board::new(1, 1), Side::Black, params(3, true));
        let report = tree.grow(1000, 10.0).unwrap();
        assert_eq!(report.iterations, 0);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.best_move(), None);
    }

    #[test]
    fn test_zero_budget_stops_after_one_iteration() {
        let mut tree = SearchTree::new(Board::new(3, 3), Side::Black, params(4, true));
        let report = tree.grow(1000, 0.0).unwrap();
        assert_eq!(report.iterations, 1);
        assert!(report.stopped_early);
        assert_eq!(report.seconds_used, 0.0);
    }

    #[test]
    fn test_invalid_budget_rejected() {
        let mut tree = SearchTree::new(Board::new(3, 3), Side::Black, params(5, true));
        assert_matches!(tree.grow(10, -1.0), Err(Error::InvalidConfig(_)));
        assert_matches!(tree.grow(10, f64::NAN), Err(Error::InvalidConfig(_)));
    }

    #[test]
    fn test_same_seed_same_tree() {
        let mut a = SearchTree::new(Board::new(3, 3), Side::Black, params(6, true));
        let mut b = SearchTree::new(Board::new(3, 3), Side::Black, params(6, true));
        a.grow(200, 10.0).unwrap();
        b.grow(200, 10.0).unwrap();
        assert_eq!(a.visit_counts(), b.visit_counts());
        assert_eq!(a.best_move(), b.best_move());
    }

    #[test]
    fn test_inconsistent_position_aborts_growth() {
        use crate::mcts::testing::Flaky;

        let position = Flaky::new(Board::new(3, 3), 40);
        let mut tree = SearchTree::new(position, Side::Black, params(7, true));
        assert_matches!(tree.grow(100, 5.0), Err(Error::InvariantViolation { .. }));
    }
}

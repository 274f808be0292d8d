//! Root parallelization.
//!
//! The coordinator owns K independent trees, each with its own random stream.
//! A decision grows every tree on its own worker of a K-thread pool; once the
//! parallel iterator returns (the join barrier), per-cell visit counts are
//! summed and the cell with the most combined visits is played. Summation is
//! commutative, so worker completion order never affects the result.

use crate::game::{Move, Position, Side};
use crate::mcts::algorithm::GrowReport;
use crate::mcts::hyperparameters::MCTSHyperparameters;
use crate::mcts::mcts_result::SearchResult;
use crate::mcts::tree::SearchTree;
use crate::Result;
use rayon::prelude::*;

pub struct SearchCoordinator<P: Position> {
    trees: Vec<Option<SearchTree<P>>>,
    params: MCTSHyperparameters,
    pool: rayon::ThreadPool,
}

impl<P: Position> SearchCoordinator<P> {
    /// One tree and one worker thread per `params.workers`.
    pub fn new(params: MCTSHyperparameters) -> Result<Self> {
        params.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(params.workers)
            .thread_name(|i| format!("mcts-worker-{}", i))
            .build()?;
        let trees = (0..params.workers).map(|_| None).collect();
        Ok(SearchCoordinator {
            trees,
            params,
            pool,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.trees.len()
    }

    pub fn params(&self) -> &MCTSHyperparameters {
        &self.params
    }

    /// Trees built so far; empty before the first decision.
    pub fn trees(&self) -> impl Iterator<Item = &SearchTree<P>> {
        self.trees.iter().flatten()
    }

    /// Drops every tree; the next decision starts from scratch.
    pub fn reset(&mut self) {
        self.trees.iter_mut().for_each(|slot| *slot = None);
    }

    /// Grows every tree from `position` with `side` to move, votes by
    /// summed visit counts, then advances every tree onto the chosen move.
    /// `best_move` is `None` when the position has no legal move.
    pub fn decide(&mut self, position: &P, side: Side) -> Result<SearchResult> {
        let SearchCoordinator {
            trees,
            params,
            pool,
        } = self;
        let params: &MCTSHyperparameters = params;

        let reports: Vec<Result<GrowReport>> = pool.install(|| {
            trees
                .par_iter_mut()
                .enumerate()
                .map(|(index, slot)| grow_worker(slot, position, side, params, index))
                .collect()
        });
        let reports = reports.into_iter().collect::<Result<Vec<_>>>()?;

        let cell_count = position.cell_count();
        let tree_visits: Vec<Vec<u32>> = trees.iter().flatten().map(|t| t.visit_counts()).collect();
        let mut combined_visits = vec![0u32; cell_count];
        for visits in &tree_visits {
            for (total, v) in combined_visits.iter_mut().zip(visits) {
                *total += v;
            }
        }

        let mut best_cell = 0;
        let mut best_visits = 0;
        for (cell, &visits) in combined_visits.iter().enumerate() {
            if visits > best_visits {
                best_visits = visits;
                best_cell = cell;
            }
        }
        let best_move = (best_visits > 0).then(|| Move::new(best_cell, side));

        for (index, report) in reports.iter().enumerate() {
            log::debug!(
                "tree {}: {} iterations in {:.2}s",
                index,
                report.iterations,
                report.seconds_used
            );
        }

        match best_move {
            Some(mv) => {
                log::debug!("coordinator chose {} with {} combined visits", mv, best_visits);
                pool.install(|| trees.par_iter_mut().flatten().try_for_each(|tree| tree.play(mv)))?;
            }
            None => log::warn!("no legal move for {}: every tree found the position terminal", side),
        }

        Ok(SearchResult {
            best_move,
            combined_visits,
            tree_visits,
            reports,
        })
    }
}

/// Brings one tree to `position` (advancing it, or building it on first use
/// or when the side changed) and grows it with the configured budget.
fn grow_worker<P: Position>(
    slot: &mut Option<SearchTree<P>>,
    position: &P,
    side: Side,
    params: &MCTSHyperparameters,
    index: usize,
) -> Result<GrowReport> {
    let tree = match slot.take() {
        Some(mut tree) if tree.perspective() == side => {
            tree.advance(position.clone(), side);
            tree
        }
        _ => SearchTree::with_seed(position.clone(), side, params.clone(), params.seed_for(index)),
    };
    let tree = slot.insert(tree);
    tree.grow(params.max_iterations, params.max_seconds)
}

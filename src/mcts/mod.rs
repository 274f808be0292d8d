pub mod algorithm;
pub mod hyperparameters;
pub mod mcts_result;
pub mod node;
pub mod parallel;
pub mod rollout;
pub mod selection;
pub mod tree;

#[cfg(test)]
pub(crate) mod testing;

pub use algorithm::GrowReport;
pub use hyperparameters::MCTSHyperparameters;
pub use mcts_result::SearchResult;
pub use node::{NodeId, NodeStats, SearchNode};
pub use parallel::SearchCoordinator;
pub use selection::ScoringPolicy;
pub use tree::SearchTree;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Seeded generator, or one seeded from OS entropy when `seed` is `None`.
pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::seed_from_u64(rand::random()),
    }
}

use crate::game::Move;
use crate::mcts::algorithm::GrowReport;

/// Outcome of one coordinated decision.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Cell with the most combined visits; `None` when no tree visited anything
    pub best_move: Option<Move>,
    /// Per-cell visit counts summed over all trees
    pub combined_visits: Vec<u32>,
    /// Per-tree, per-cell visit counts read at the join barrier
    pub tree_visits: Vec<Vec<u32>>,
    pub reports: Vec<GrowReport>,
}

impl SearchResult {
    pub fn total_iterations(&self) -> usize {
        self.reports.iter().map(|r| r.iterations).sum()
    }

    pub fn visits_for(&self, cell: usize) -> u32 {
        self.combined_visits.get(cell).copied().unwrap_or(0)
    }
}

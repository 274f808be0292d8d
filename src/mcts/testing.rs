//! Positions with deliberately broken legality, for exercising the
//! invariant-violation paths.

use crate::game::{Board, Move, PlaceOutcome, Position, Violation};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Board that rejects every placement once `budget` applies have been made
/// across all of its copies.
#[derive(Debug, Clone)]
pub(crate) struct Flaky {
    board: Board,
    calls: Arc<AtomicUsize>,
    budget: usize,
}

impl Flaky {
    pub(crate) fn new(board: Board, budget: usize) -> Self {
        Flaky {
            board,
            calls: Arc::new(AtomicUsize::new(0)),
            budget,
        }
    }
}

impl PartialEq for Flaky {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
    }
}

impl Position for Flaky {
    fn cell_count(&self) -> usize {
        self.board.cell_count()
    }

    fn apply(&mut self, mv: Move) -> PlaceOutcome {
        if self.calls.fetch_add(1, Ordering::SeqCst) >= self.budget {
            return PlaceOutcome::Illegal(Violation::Occupied);
        }
        self.board.apply(mv)
    }
}

use crate::game::action::Move;
use std::fmt::Debug;

/// Why a placement was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// The move's side is not the side to move.
    Turn,
    OutOfRange,
    Occupied,
    /// The placement would leave an opponent group without liberties.
    Capture,
    /// The placement would leave its own group without liberties.
    Suicide,
}

/// Result of applying a move to a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    Legal,
    /// Legal, and the game is over afterwards.
    Terminal,
    Illegal(Violation),
}

impl PlaceOutcome {
    /// `Terminal` counts as a legal continuation.
    pub fn is_legal(self) -> bool {
        !matches!(self, PlaceOutcome::Illegal(_))
    }
}

/// Capability set the search engine consumes from a game.
///
/// `apply` must leave `self` untouched when it reports `Illegal`; the engine
/// still only ever tests legality on clones.
pub trait Position: Clone + PartialEq + Send + Sync + Debug {
    /// Number of cells; every move addresses a cell in `0..cell_count()`.
    fn cell_count(&self) -> usize;

    /// True for an opening position with nothing played yet. Players start a
    /// fresh search tree there instead of reusing the last one.
    fn is_empty(&self) -> bool {
        false
    }

    fn apply(&mut self, mv: Move) -> PlaceOutcome;
}

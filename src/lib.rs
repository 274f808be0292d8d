//! # NoGo MCTS Library
//!
//! A decision-time Monte Carlo Tree Search engine for two-player, alternating-turn
//! placement games, shipped with a reference NoGo board and an agent harness.
//!
//! ## Features
//!
//! - **Search Engine**: UCT selection blended with RAVE, random rollouts,
//!   tree reuse between moves
//! - **Root Parallelization**: independent trees grown on a worker pool and
//!   merged by visit-count voting
//! - **Game Adapter**: a `Position` trait plus a NoGo board implementing it
//! - **Agents**: random and tree-search players, episode loop, CSV recording
//!
//! ## Usage
//!
//! ```rust
//! use nogo_mcts::{Board, MCTSHyperparameters, SearchTree, Side};
//!
//! let params = MCTSHyperparameters {
//!     max_iterations: 200,
//!     max_seconds: 1.0,
//!     seed: Some(7),
//!     ..Default::default()
//! };
//! let mut tree = SearchTree::new(Board::new(3, 3), Side::Black, params);
//! tree.grow(200, 1.0).unwrap();
//! assert!(tree.best_move().is_some());
//! ```

// ============================================================================
// PUBLIC API MODULES
// ============================================================================

/// Game adapter contract and the reference NoGo board
pub mod game;

/// Monte Carlo Tree Search engine
pub mod mcts;

/// Players, argument parsing and the episode loop
pub mod agent;

/// Episode records and CSV persistence
pub mod recording;

/// Logger setup for binaries
pub mod logging;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use game::{Board, Move, PlaceOutcome, Position, Side, Violation};

pub use mcts::{
    GrowReport, MCTSHyperparameters, NodeId, NodeStats, SearchCoordinator, SearchNode,
    SearchResult, SearchTree,
};

pub use agent::{AgentConfig, Player, Strategy};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Main error type for the library
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An untried move that was legal at node construction failed to apply.
    #[error("invariant violation at cell {cell}: {reason}")]
    InvariantViolation { cell: usize, reason: String },

    #[error("illegal move {0}")]
    IllegalMove(Move),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid value for '{key}': {value}")]
    InvalidArgument { key: String, value: String },

    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

// ============================================================================
// LIBRARY VERSION INFO
// ============================================================================

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

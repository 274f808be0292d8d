//! Game adapter layer.
//!
//! The search engine only needs a small capability set from a game:
//! apply a move and learn whether it was legal, enumerate the cells, and
//! compare positions. [`Position`] captures that contract; [`Board`] is the
//! NoGo implementation used by the harness and the tests.

pub mod action;
pub mod board;
pub mod get_legal_moves;
pub mod position;
pub mod side;

pub use action::Move;
pub use board::Board;
pub use position::{PlaceOutcome, Position, Violation};
pub use side::Side;

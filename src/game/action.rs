use crate::game::side::Side;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A placement: a cell index plus the side placing the stone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub cell: usize,
    pub side: Side,
}

impl Move {
    pub fn new(cell: usize, side: Side) -> Self {
        Move { cell, side }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.side, self.cell)
    }
}

//! NoGo board.
//!
//! Stones are placed alternately, black first. A placement is illegal when it
//! captures an opponent group or leaves its own group without liberties, so
//! the board only ever fills up. The side left without a legal placement loses.

use crate::game::action::Move;
use crate::game::position::{PlaceOutcome, Position, Violation};
use crate::game::side::Side;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_SIZE: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size_x: usize,
    size_y: usize,
    cells: Vec<Option<Side>>,
    to_move: Side,
}

impl Default for Board {
    fn default() -> Self {
        Board::new(DEFAULT_SIZE, DEFAULT_SIZE)
    }
}

impl Board {
    /// Empty `size_x × size_y` board with black to move.
    pub fn new(size_x: usize, size_y: usize) -> Self {
        Board {
            size_x,
            size_y,
            cells: vec![None; size_x * size_y],
            to_move: Side::Black,
        }
    }

    /// Builds a board from rows of `.`, `X` (black) and `O` (white).
    /// Returns `None` for ragged rows or unknown characters. No legality
    /// check is made on the resulting arrangement.
    pub fn from_diagram(rows: &[&str], to_move: Side) -> Option<Self> {
        let size_y = rows.len();
        let size_x = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        let mut cells = Vec::with_capacity(size_x * size_y);
        for row in rows {
            if row.chars().count() != size_x {
                return None;
            }
            for c in row.chars() {
                cells.push(match c {
                    '.' => None,
                    'X' => Some(Side::Black),
                    'O' => Some(Side::White),
                    _ => return None,
                });
            }
        }
        Some(Board {
            size_x,
            size_y,
            cells,
            to_move,
        })
    }

    pub fn size_x(&self) -> usize {
        self.size_x
    }

    pub fn size_y(&self) -> usize {
        self.size_y
    }

    pub fn side_to_move(&self) -> Side {
        self.to_move
    }

    pub fn stone_at(&self, cell: usize) -> Option<Side> {
        self.cells.get(cell).copied().flatten()
    }

    fn neighbors(&self, cell: usize) -> impl Iterator<Item = usize> {
        let (x, y) = (cell % self.size_x, cell / self.size_x);
        let sx = self.size_x;
        let up = (y > 0).then(|| cell - sx);
        let down = (y + 1 < self.size_y).then(|| cell + sx);
        let left = (x > 0).then(|| cell - 1);
        let right = (x + 1 < sx).then(|| cell + 1);
        [up, down, left, right].into_iter().flatten()
    }

    /// Flood fill over the group containing `start`, stopping at the first
    /// empty neighbor found.
    fn group_has_liberty(&self, start: usize) -> bool {
        let Some(color) = self.cells[start] else {
            return true;
        };
        let mut visited = vec![false; self.cells.len()];
        let mut stack = vec![start];
        visited[start] = true;

        while let Some(cell) = stack.pop() {
            for n in self.neighbors(cell) {
                match self.cells[n] {
                    None => return true,
                    Some(c) if c == color && !visited[n] => {
                        visited[n] = true;
                        stack.push(n);
                    }
                    _ => {}
                }
            }
        }
        false
    }

    fn check_placement(&self, cell: usize, side: Side) -> Option<Violation> {
        let opponent = side.opponent();
        let captures = self
            .neighbors(cell)
            .any(|n| self.cells[n] == Some(opponent) && !self.group_has_liberty(n));
        if captures {
            return Some(Violation::Capture);
        }
        if !self.group_has_liberty(cell) {
            return Some(Violation::Suicide);
        }
        None
    }
}

impl Position for Board {
    fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    fn apply(&mut self, mv: Move) -> PlaceOutcome {
        if mv.side != self.to_move {
            return PlaceOutcome::Illegal(Violation::Turn);
        }
        if mv.cell >= self.cells.len() {
            return PlaceOutcome::Illegal(Violation::OutOfRange);
        }
        if self.cells[mv.cell].is_some() {
            return PlaceOutcome::Illegal(Violation::Occupied);
        }

        self.cells[mv.cell] = Some(mv.side);
        if let Some(violation) = self.check_placement(mv.cell, mv.side) {
            self.cells[mv.cell] = None;
            return PlaceOutcome::Illegal(violation);
        }

        self.to_move = mv.side.opponent();
        PlaceOutcome::Legal
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size_x.max(1)) {
            let line: String = row
                .iter()
                .map(|c| match c {
                    None => '.',
                    Some(Side::Black) => 'X',
                    Some(Side::White) => 'O',
                })
                .collect();
            writeln!(f, "{}", line)?;
        }
        write!(f, "({} to move)", self.to_move)
    }
}

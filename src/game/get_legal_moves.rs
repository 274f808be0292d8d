use crate::game::action::Move;
use crate::game::position::Position;
use crate::game::side::Side;

/// Returns every move `side` could legally play on `position`, in cell order.
/// Legality is checked on a copy so `position` is never touched.
pub fn get_legal_moves<P: Position>(position: &P, side: Side) -> Vec<Move> {
    (0..position.cell_count())
        .map(|cell| Move::new(cell, side))
        .filter(|&mv| position.clone().apply(mv).is_legal())
        .collect()
}

/// Cheaper check than collecting the full list.
pub fn has_legal_move<P: Position>(position: &P, side: Side) -> bool {
    (0..position.cell_count()).any(|cell| position.clone().apply(Move::new(cell, side)).is_legal())
}

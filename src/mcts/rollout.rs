//! Uniformly random playouts.

use crate::game::get_legal_moves::get_legal_moves;
use crate::game::{Move, PlaceOutcome, Position, Side};
use crate::{Error, Result};
use rand::prelude::*;
use rand::rngs::StdRng;

/// Result of one playout.
#[derive(Debug, Clone, PartialEq)]
pub struct RolloutOutcome {
    /// 1.0 when the optimized side won, else 0.0
    pub reward: f64,
    pub plies: usize,
    /// Moves played, in order; fed to RAVE during backpropagation
    pub history: Vec<Move>,
}

/// Picks a uniformly random legal move for `side`, or `None` if it has none.
pub fn get_random_move<P: Position>(position: &P, side: Side, rng: &mut StdRng) -> Option<Move> {
    let mut moves = get_legal_moves(position, side);
    moves.shuffle(rng);
    moves.into_iter().next()
}

/// Plays random legal moves for both sides, starting with `to_move`, until
/// the side to move has none. That side loses; the reward is 1.0 when it is
/// not `perspective`.
///
/// A move that tested legal but then fails to apply aborts the playout with
/// [`Error::InvariantViolation`].
pub fn simulate<P: Position>(
    mut position: P,
    mut to_move: Side,
    perspective: Side,
    rng: &mut StdRng,
) -> Result<RolloutOutcome> {
    let mut history = Vec::new();

    while let Some(mv) = get_random_move(&position, to_move, rng) {
        let outcome = position.apply(mv);
        if !outcome.is_legal() {
            log::error!("legal rollout move {} rejected: {:?}", mv, outcome);
            return Err(Error::InvariantViolation {
                cell: mv.cell,
                reason: format!("legal rollout move rejected with {:?}", outcome),
            });
        }
        history.push(mv);
        to_move = to_move.opponent();
        if outcome == PlaceOutcome::Terminal {
            break;
        }
    }

    Ok(RolloutOutcome {
        reward: if to_move != perspective { 1.0 } else { 0.0 },
        plies: history.len(),
        history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Board;
    use crate::mcts::testing::Flaky;
    use assert_matches::assert_matches;

    #[test]
    fn test_rejected_rollout_move_is_an_invariant_violation() {
        // The nine legality checks succeed, the placement itself is refused.
        let flaky = Flaky::new(Board::new(3, 3), 9);
        let mut rng = StdRng::seed_from_u64(7);
        assert_matches!(
            simulate(flaky, Side::Black, Side::Black, &mut rng),
            Err(Error::InvariantViolation { .. })
        );
    }

    #[test]
    fn test_rollout_terminates_within_board_size() {
        let mut rng = StdRng::seed_from_u64(2025);
        for _ in 0..200 {
            let outcome = simulate(Board::new(3, 3), Side::Black, Side::Black, &mut rng).unwrap();
            assert!(outcome.plies <= 9);
            assert_eq!(outcome.history.len(), outcome.plies);
            assert!(outcome.reward == 0.0 || outcome.reward == 1.0);
        }
    }

    #[test]
    fn test_rollout_alternates_sides() {
        let mut rng = StdRng::seed_from_u64(3);
        let outcome = simulate(Board::new(3, 3), Side::Black, Side::White, &mut rng).unwrap();
        for (i, mv) in outcome.history.iter().enumerate() {
            let expected = if i % 2 == 0 { Side::Black } else { Side::White };
            assert_eq!(mv.side, expected);
        }
    }

    #[test]
    fn test_reward_follows_last_mover() {
        let mut rng = StdRng::seed_from_u64(11);
        let outcome = simulate(Board::new(3, 3), Side::Black, Side::Black, &mut rng).unwrap();
        // An odd ply count leaves white unable to move, so black wins.
        let black_won = outcome.plies % 2 == 1;
        assert_eq!(outcome.reward, if black_won { 1.0 } else { 0.0 });
    }

    #[test]
    fn test_rollout_from_dead_position_is_immediate() {
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = simulate(Board::new(1, 1), Side::Black, Side::Black, &mut rng).unwrap();
        assert_eq!(outcome.plies, 0);
        assert_eq!(outcome.reward, 0.0);

        let outcome = simulate(Board::new(1, 1), Side::Black, Side::White, &mut rng).unwrap();
        assert_eq!(outcome.reward, 1.0);
    }

    #[test]
    fn test_random_move_is_legal() {
        let mut rng = StdRng::seed_from_u64(5);
        let board = Board::from_diagram(&["XO.", ".X.", "..."], Side::Black).unwrap();
        for _ in 0..50 {
            let mv = get_random_move(&board, Side::Black, &mut rng).unwrap();
            assert!(board.clone().apply(mv).is_legal());
            assert_ne!(mv.cell, 2);
        }
    }
}

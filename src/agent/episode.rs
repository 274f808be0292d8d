//! Alternating-turn episode loop.

use crate::agent::Player;
use crate::game::get_legal_moves::has_legal_move;
use crate::game::{PlaceOutcome, Position, Side};
use crate::recording::{EpisodeRecord, MoveRecord};
use crate::{Error, Result};
use std::time::Instant;

/// Plays one game from `start`, black moving first, until the side to move
/// has no move; that side loses. An illegal move forfeits the game.
pub fn play_episode<P: Position>(
    black: &mut Player<P>,
    white: &mut Player<P>,
    start: P,
) -> Result<EpisodeRecord> {
    if black.role() != Side::Black || white.role() != Side::White {
        return Err(Error::InvalidConfig(format!(
            "players must be black and white, got {} and {}",
            black.role(),
            white.role()
        )));
    }

    let mut record = EpisodeRecord::new(black.name().to_string(), white.name().to_string());
    let mut position = start;
    let mut to_move = Side::Black;

    black.open_episode();
    white.open_episode();

    let winner = loop {
        let player = match to_move {
            Side::Black => &mut *black,
            Side::White => &mut *white,
        };

        if !has_legal_move(&position, to_move) {
            log::info!("{} ({}) has no legal move", player.name(), to_move);
            break to_move.opponent();
        }

        let started = Instant::now();
        let Some(mv) = player.take_action(&position)? else {
            log::warn!("{} ({}) returned no move with legal moves left", player.name(), to_move);
            break to_move.opponent();
        };

        let outcome = position.apply(mv);
        record.record_move(MoveRecord {
            ply: record.moves.len(),
            side: to_move,
            cell: mv.cell,
            elapsed_ms: started.elapsed().as_millis() as u64,
        });

        match outcome {
            PlaceOutcome::Legal => {
                log::debug!("{} played {}", player.name(), mv);
                to_move = to_move.opponent();
            }
            PlaceOutcome::Terminal => break to_move,
            PlaceOutcome::Illegal(violation) => {
                log::warn!("{} played illegal move {} ({:?})", player.name(), mv, violation);
                break to_move.opponent();
            }
        }
    };

    black.close_episode();
    white.close_episode();

    record.finalize(winner);
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Board;

    #[test]
    fn test_random_episode_completes() {
        let mut black = Player::from_args("name=b role=black seed=1").unwrap();
        let mut white = Player::from_args("name=w role=white seed=2").unwrap();
        let record = play_episode(&mut black, &mut white, Board::new(3, 3)).unwrap();

        assert!(record.moves.len() <= 9);
        // Whoever made the last move wins.
        let expected = if record.moves.len() % 2 == 1 { Side::Black } else { Side::White };
        assert_eq!(record.winner, Some(expected));
    }

    #[test]
    fn test_roles_must_match_seats() {
        let mut a = Player::<Board>::from_args("role=white").unwrap();
        let mut b = Player::<Board>::from_args("role=white").unwrap();
        assert!(play_episode(&mut a, &mut b, Board::new(3, 3)).is_err());
    }

    #[test]
    fn test_dead_start_black_loses() {
        let mut black = Player::from_args("role=black mcts simu=10").unwrap();
        let mut white = Player::from_args("role=white").unwrap();
        let record = play_episode(&mut black, &mut white, Board::new(1, 1)).unwrap();
        assert!(record.moves.is_empty());
        assert_eq!(record.winner, Some(Side::White));
    }
}

//! Data structures for recorded games.

use crate::game::Side;
use serde::{Deserialize, Serialize};

/// Record of a single placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Ply number, starting at 0
    pub ply: usize,
    pub side: Side,
    pub cell: usize,
    /// Thinking time of the mover
    pub elapsed_ms: u64,
}

/// Complete record of a game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub episode_id: String,
    /// Unix timestamps, seconds
    pub started_at: i64,
    pub finished_at: Option<i64>,
    pub black: String,
    pub white: String,
    pub moves: Vec<MoveRecord>,
    pub winner: Option<Side>,
}

/// Flat row written to CSV, one per game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode_id: String,
    pub started_at: i64,
    pub finished_at: i64,
    pub black: String,
    pub white: String,
    pub plies: usize,
    pub winner: String,
}

impl EpisodeRecord {
    pub fn new(black: String, white: String) -> Self {
        Self {
            episode_id: uuid::Uuid::new_v4().to_string(),
            started_at: chrono::Utc::now().timestamp(),
            finished_at: None,
            black,
            white,
            moves: Vec::new(),
            winner: None,
        }
    }

    pub fn record_move(&mut self, move_record: MoveRecord) {
        self.moves.push(move_record);
    }

    pub fn finalize(&mut self, winner: Side) {
        self.winner = Some(winner);
        self.finished_at = Some(chrono::Utc::now().timestamp());
    }

    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    /// Name of the winning player, if the game is over.
    pub fn winner_name(&self) -> Option<&str> {
        self.winner.map(|side| match side {
            Side::Black => self.black.as_str(),
            Side::White => self.white.as_str(),
        })
    }

    pub fn summary(&self) -> EpisodeSummary {
        EpisodeSummary {
            episode_id: self.episode_id.clone(),
            started_at: self.started_at,
            finished_at: self.finished_at.unwrap_or(self.started_at),
            black: self.black.clone(),
            white: self.white.clone(),
            plies: self.moves.len(),
            winner: self
                .winner
                .map(|side| side.to_string())
                .unwrap_or_else(|| "none".to_string()),
        }
    }
}

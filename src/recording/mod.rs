//! Episode recording.
//!
//! - `episode_record`: moves and outcome of one game
//! - `csv_writer`: one summary row per game, appended to a daily CSV file

pub mod csv_writer;
pub mod episode_record;

pub use csv_writer::{load_summaries, CsvWriter};
pub use episode_record::{EpisodeRecord, EpisodeSummary, MoveRecord};

use clap::Parser;
use std::error::Error;

use nogo_mcts::agent::{play_episode, Player};
use nogo_mcts::game::board::DEFAULT_SIZE;
use nogo_mcts::game::{Board, Side};
use nogo_mcts::logging::setup_logging;
use nogo_mcts::recording::CsvWriter;

#[derive(Parser, Debug)]
#[command(name = "nogo_mcts", about = "Play NoGo games between two agents")]
struct Config {
    /// Board edge length
    #[arg(short, long, default_value_t = DEFAULT_SIZE)]
    size: usize,

    /// Agent playing black, as key=value pairs
    #[arg(short, long, default_value = "name=mcts role=black mcts simu=1000 time=5")]
    black: String,

    /// Agent playing white, as key=value pairs
    #[arg(short, long, default_value = "name=random role=white")]
    white: String,

    /// Number of games to play
    #[arg(short, long, default_value_t = 1)]
    games: usize,

    /// Directory receiving one CSV row per finished game
    #[arg(long)]
    log_path: Option<String>,

    /// Directory for rotated log files (stderr only when absent)
    #[arg(long)]
    log_dir: Option<String>,

    /// Default log level, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::parse();
    let _logger = setup_logging(&config.log_level, config.log_dir.as_deref())?;

    if config.size == 0 {
        return Err("board size must be at least 1".into());
    }

    let mut black = Player::<Board>::from_args(&config.black)?;
    let mut white = Player::<Board>::from_args(&config.white)?;
    log::info!(
        "{} ({:?}) vs {} ({:?}) on {}x{}, {} games",
        black.name(),
        black.strategy(),
        white.name(),
        white.strategy(),
        config.size,
        config.size,
        config.games
    );
    log::debug!("black search: {}", black.config().hyperparams.to_config_string());
    log::debug!("white search: {}", white.config().hyperparams.to_config_string());

    let mut writer = match &config.log_path {
        Some(dir) => Some(CsvWriter::new(dir)?),
        None => None,
    };

    let mut black_wins = 0usize;
    let mut white_wins = 0usize;
    for game in 0..config.games {
        let board = Board::new(config.size, config.size);
        let record = play_episode(&mut black, &mut white, board)?;

        match record.winner {
            Some(Side::Black) => black_wins += 1,
            Some(Side::White) => white_wins += 1,
            None => {}
        }
        log::info!(
            "game {}/{}: {} wins after {} plies",
            game + 1,
            config.games,
            record.winner_name().unwrap_or("nobody"),
            record.ply_count()
        );

        if let Some(writer) = writer.as_mut() {
            writer.write_episode(&record)?;
        }
    }

    log::info!(
        "final tally: {} {} - {} {}",
        black.name(),
        black_wins,
        white_wins,
        white.name()
    );
    println!("{} {} - {} {}", black.name(), black_wins, white_wins, white.name());
    Ok(())
}

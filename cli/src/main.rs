mod commands;
mod game_loop;
mod render;

use clap::Parser;
use common::config::{CONFIG_FILE, GameConfig, get_config_manager};
use common::games::SessionRng;
use common::games::tictactoe::{Difficulty, Mark, TicTacToeGame, TicTacToeGameSettings, load_game};
use common::logger::{ConsoleSink, FileSink, LogLevel, Logger};
use common::{log_debug, log_error, log_info, log_warn};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "tictactoe", about = "Play tic-tac-toe against the computer")]
struct Args {
    /// YAML config file; created with defaults when missing
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Overrides the configured difficulty (easy, medium or hard)
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// Seed for the engine's random choices
    #[arg(long)]
    seed: Option<u64>,

    /// Let the computer play X and move first
    #[arg(long)]
    computer_first: bool,

    #[arg(long, default_value = "logs/game.log")]
    log_file: PathBuf,

    #[arg(long)]
    no_log_file: bool,

    #[arg(long)]
    use_log_prefix: bool,

    /// Print debug logging to the console
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let logger = Arc::new(build_logger(&args));

    let config = match get_config_manager(&args.config).get_or_create_config() {
        Ok(config) => config,
        Err(e) => {
            log_error!(logger, "Error loading config {}: {}", args.config.display(), e);
            GameConfig::default()
        }
    };

    let mut settings = TicTacToeGameSettings::from(&config);
    if let Some(difficulty) = args.difficulty {
        settings.difficulty = difficulty;
    }
    if args.computer_first {
        settings.engine_mark = Mark::X;
    }

    let rng = args.seed.map_or_else(SessionRng::from_random, SessionRng::new);
    log_debug!(logger, "Session seed {}", rng.seed());

    let mut game = TicTacToeGame::new(settings, rng, logger.clone());

    let save_path = config
        .game
        .save_games
        .then(|| PathBuf::from(&config.game.save_path));

    if let Some(path) = &save_path {
        match load_game(path) {
            Ok(Some(saved)) => {
                if let Err(e) = game.restore(saved) {
                    log_warn!(logger, "Ignoring saved game state: {}", e);
                }
            }
            Ok(None) => log_info!(logger, "No saved game state found"),
            Err(e) => log_error!(logger, "Error loading game state: {}", e),
        }
    }

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    game_loop::run(&mut game, stdin.lock(), &mut stdout, save_path.as_deref(), &logger)?;

    Ok(())
}

fn build_logger(args: &Args) -> Logger {
    let prefix = if args.use_log_prefix {
        Some("TicTacToe".to_string())
    } else {
        None
    };
    let console_level = if args.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Warning
    };

    let logger = Logger::new(prefix).with_sink(ConsoleSink::new(console_level));
    if args.no_log_file {
        return logger;
    }

    match FileSink::create(&args.log_file, LogLevel::Debug) {
        Ok(sink) => logger.with_sink(sink),
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", args.log_file.display(), e);
            logger
        }
    }
}

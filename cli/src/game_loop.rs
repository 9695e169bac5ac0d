use std::io::{self, BufRead, Write};
use std::path::Path;

use common::games::tictactoe::{GameStatus, TicTacToeGame, save_game};
use common::logger::Logger;
use common::{log_debug, log_error};

use crate::commands::{Command, HELP, parse_command};
use crate::render::{render_board, render_scores, render_status};

/// Reads commands from `input` until `quit` or end of input. The game is
/// saved to `save_path` after every finished game and on exit.
pub fn run<R: BufRead, W: Write>(
    game: &mut TicTacToeGame,
    input: R,
    output: &mut W,
    save_path: Option<&Path>,
    logger: &Logger,
) -> io::Result<()> {
    writeln!(
        output,
        "Tic-tac-toe against the computer ({}). Type 'help' for commands.",
        game.difficulty()
    )?;
    print_board(game, output)?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(output, "{}", e)?;
                continue;
            }
        };
        log_debug!(logger, "Command {:?}", command);

        match command {
            Command::Place(index) => match game.handle_move(index) {
                Ok(report) => {
                    if let Some(engine_move) = report.engine_move {
                        writeln!(output, "Computer plays {}.", engine_move + 1)?;
                    }
                    print_board(game, output)?;
                    if report.status != GameStatus::InProgress {
                        save(game, save_path, logger);
                        writeln!(output, "{}", render_scores(&game.scores()))?;
                        writeln!(output, "Type 'new' to play again.")?;
                    }
                }
                Err(e) => writeln!(output, "{}", e)?,
            },
            Command::Undo => match game.undo() {
                Ok(()) => {
                    writeln!(output, "Move taken back, {} undo(s) left.", game.undos_left())?;
                    print_board(game, output)?;
                }
                Err(e) => writeln!(output, "{}", e)?,
            },
            Command::New => {
                game.reset();
                print_board(game, output)?;
            }
            Command::SetDifficulty(difficulty) => {
                game.set_difficulty(difficulty);
                writeln!(output, "Difficulty is now {}.", difficulty)?;
            }
            Command::Scores => {
                writeln!(output, "{}", render_scores(&game.scores()))?;
            }
            Command::Help => writeln!(output, "{}", HELP)?,
            Command::Quit => break,
        }
    }

    save(game, save_path, logger);
    writeln!(output, "Bye.")?;
    Ok(())
}

fn print_board<W: Write>(game: &TicTacToeGame, output: &mut W) -> io::Result<()> {
    writeln!(output, "{}", render_board(game.board(), game.winning_line()))?;
    writeln!(output, "{}", render_status(game.status(), game.human_mark()))
}

fn save(game: &TicTacToeGame, save_path: Option<&Path>, logger: &Logger) {
    let Some(path) = save_path else {
        return;
    };
    if let Err(e) = save_game(path, &game.to_saved_game()) {
        log_error!(logger, "Error saving game state: {}", e);
    }
}

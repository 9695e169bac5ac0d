use common::games::tictactoe::{CELL_COUNT, CellIndex, Difficulty};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Place(CellIndex),
    Undo,
    New,
    SetDifficulty(Difficulty),
    Scores,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  1-9                  place your mark (cells are numbered left to right, top to bottom)
  undo                 take back your last move
  new                  start a new game
  difficulty <level>   switch to easy, medium or hard
  scores               show the scoreboard
  help                 show this help
  quit                 save and exit";

/// Parses one input line. Cells are 1-based on input and 0-based in the result.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return Err("Empty input, type 'help' for commands".to_string());
    };

    let command = match first.to_ascii_lowercase().as_str() {
        "undo" | "u" => Command::Undo,
        "new" | "n" | "reset" => Command::New,
        "scores" | "s" => Command::Scores,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        "difficulty" | "d" => {
            let level = words
                .next()
                .ok_or_else(|| "Usage: difficulty <easy|medium|hard>".to_string())?;
            Command::SetDifficulty(level.parse()?)
        }
        other => match other.parse::<usize>() {
            Ok(cell @ 1..=CELL_COUNT) => Command::Place(cell - 1),
            Ok(cell) => return Err(format!("Cell {} is out of range, use 1-{}", cell, CELL_COUNT)),
            Err(_) => return Err(format!("Unknown command '{}', type 'help' for commands", other)),
        },
    };

    if words.next().is_some() {
        return Err(format!("Unexpected extra input after '{}'", first));
    }

    Ok(command)
}

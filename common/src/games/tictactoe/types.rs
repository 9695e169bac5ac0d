use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Index into the 9-cell board; row `i / 3`, column `i % 3`.
pub type CellIndex = usize;

pub const CELL_COUNT: usize = 9;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mark {
    #[default]
    Empty,
    X,
    O,
}

impl Mark {
    pub fn opponent(&self) -> Option<Mark> {
        match self {
            Mark::X => Some(Mark::O),
            Mark::O => Some(Mark::X),
            Mark::Empty => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Mark::Empty => '.',
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Mark> {
        match symbol {
            'X' | 'x' => Some(Mark::X),
            'O' | 'o' => Some(Mark::O),
            '.' | '_' | '-' => Some(Mark::Empty),
            _ => None,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Result of a terminal-state check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The game is still going.
    None,
    Win(Mark),
    Draw,
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::None)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Default search depth for the difficulty.
    pub fn max_depth(&self) -> usize {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 3,
            Difficulty::Hard => 9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!(
                "Unknown difficulty '{}', expected easy, medium or hard",
                other
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    XWon,
    OWon,
    Draw,
}

impl GameStatus {
    pub fn from_outcome(outcome: Outcome) -> Self {
        match outcome {
            Outcome::None | Outcome::Win(Mark::Empty) => GameStatus::InProgress,
            Outcome::Win(Mark::X) => GameStatus::XWon,
            Outcome::Win(Mark::O) => GameStatus::OWon,
            Outcome::Draw => GameStatus::Draw,
        }
    }

    pub fn winner(&self) -> Option<Mark> {
        match self {
            GameStatus::XWon => Some(Mark::X),
            GameStatus::OWon => Some(Mark::O),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WinningLine {
    pub mark: Mark,
    pub cells: [CellIndex; 3],
}

impl WinningLine {
    pub fn new(mark: Mark, cells: [CellIndex; 3]) -> Self {
        Self { mark, cells }
    }

    pub fn start(&self) -> CellIndex {
        self.cells[0]
    }

    pub fn end(&self) -> CellIndex {
        self.cells[2]
    }

    pub fn contains(&self, index: CellIndex) -> bool {
        self.cells.contains(&index)
    }
}

/// Running tally of finished games, kept per side so it survives the player
/// switching marks between sessions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub player: u32,
    pub computer: u32,
    pub draws: u32,
}

impl Scores {
    pub fn record(&mut self, status: GameStatus, engine_mark: Mark) {
        match status.winner() {
            Some(mark) if mark == engine_mark => self.computer += 1,
            Some(_) => self.player += 1,
            None if status == GameStatus::Draw => self.draws += 1,
            None => {}
        }
    }

    pub fn total(&self) -> u32 {
        self.player + self.computer + self.draws
    }
}

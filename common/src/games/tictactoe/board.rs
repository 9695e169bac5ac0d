use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::types::{CELL_COUNT, CellIndex, Mark};

/// Every winning triple: rows, then columns, then both diagonals.
pub const LINES: [[CellIndex; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A 3x3 board snapshot. Serializes as its 9-symbol text form, e.g. `"XO..X...O"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Board {
    cells: [Mark; CELL_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from per-cell symbols where `""` is an empty cell.
    pub fn from_symbols(symbols: [&str; CELL_COUNT]) -> Result<Self, String> {
        let mut cells = [Mark::Empty; CELL_COUNT];
        for (index, symbol) in symbols.iter().enumerate() {
            cells[index] = match symbol.trim() {
                "" => Mark::Empty,
                s => {
                    let mut chars = s.chars();
                    match (chars.next().and_then(Mark::from_symbol), chars.next()) {
                        (Some(mark), None) => mark,
                        _ => return Err(format!("Invalid symbol '{}' at cell {}", s, index)),
                    }
                }
            };
        }
        Ok(Self { cells })
    }

    pub fn get(&self, index: CellIndex) -> Mark {
        assert!(index < CELL_COUNT, "cell index {} out of range", index);
        self.cells[index]
    }

    pub fn set(&mut self, index: CellIndex, mark: Mark) {
        assert!(index < CELL_COUNT, "cell index {} out of range", index);
        self.cells[index] = mark;
    }

    pub fn is_empty_at(&self, index: CellIndex) -> bool {
        self.get(index) == Mark::Empty
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&cell| cell != Mark::Empty)
    }

    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|&&cell| cell == mark).count()
    }

    /// Mark whose turn it is assuming X moves first, or `None` when the mark
    /// counts cannot come from a legal game.
    pub fn next_mark(&self) -> Option<Mark> {
        let x_count = self.count(Mark::X);
        let o_count = self.count(Mark::O);
        if x_count == o_count {
            Some(Mark::X)
        } else if x_count == o_count + 1 {
            Some(Mark::O)
        } else {
            None
        }
    }

    pub fn row_col(index: CellIndex) -> (usize, usize) {
        (index / 3, index % 3)
    }
}

pub fn get_available_moves(board: &Board) -> Vec<CellIndex> {
    board
        .cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| **cell == Mark::Empty)
        .map(|(index, _)| index)
        .collect()
}

pub fn is_valid_move(board: &Board, index: CellIndex) -> bool {
    index < CELL_COUNT && board.cells[index] == Mark::Empty
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            write!(f, "{}", cell.symbol())?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = String;

    /// Accepts 9 cell symbols; whitespace and `/` row separators are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols: Vec<char> = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/')
            .collect();

        if symbols.len() != CELL_COUNT {
            return Err(format!(
                "Board must have {} cells, got {}",
                CELL_COUNT,
                symbols.len()
            ));
        }

        let mut cells = [Mark::Empty; CELL_COUNT];
        for (index, symbol) in symbols.into_iter().enumerate() {
            cells[index] = Mark::from_symbol(symbol)
                .ok_or_else(|| format!("Invalid symbol '{}' at cell {}", symbol, index))?;
        }
        Ok(Self { cells })
    }
}

impl From<Board> for String {
    fn from(board: Board) -> Self {
        board.to_string()
    }
}

impl TryFrom<String> for Board {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_cover_rows_columns_diagonals() {
        assert_eq!(LINES.len(), 8);
        for index in 0..CELL_COUNT {
            let containing = LINES.iter().filter(|line| line.contains(&index)).count();
            let expected = match index {
                4 => 4,
                0 | 2 | 6 | 8 => 3,
                _ => 2,
            };
            assert_eq!(containing, expected, "cell {}", index);
        }
    }

    #[test]
    fn test_from_symbols_and_display() {
        let board = Board::from_symbols(["X", "O", "X", "O", "X", "O", "X", "", "O"]).unwrap();
        assert_eq!(board.to_string(), "XOXOXOX.O");
        assert_eq!(board.get(7), Mark::Empty);
        assert_eq!(board.get(8), Mark::O);
    }

    #[test]
    fn test_from_symbols_rejects_garbage() {
        assert!(Board::from_symbols(["X", "Q", "", "", "", "", "", "", ""]).is_err());
        assert!(Board::from_symbols(["XO", "", "", "", "", "", "", "", ""]).is_err());
    }

    #[test]
    fn test_parse_with_row_separators() {
        let board: Board = "X.O/.X./O.X".parse().unwrap();
        assert_eq!(board.get(0), Mark::X);
        assert_eq!(board.get(2), Mark::O);
        assert_eq!(board.get(8), Mark::X);
        assert_eq!(board.count(Mark::Empty), 4);
    }

    #[test]
    fn test_parse_wrong_length() {
        let result = "XOX".parse::<Board>();
        assert!(matches!(result, Err(e) if e.contains("9 cells")));
    }

    #[test]
    fn test_available_moves_ascending() {
        let board: Board = "X...O...X".parse().unwrap();
        assert_eq!(get_available_moves(&board), vec![1, 2, 3, 5, 6, 7]);
        assert!(get_available_moves(&"XOXOXOOXO".parse().unwrap()).is_empty());
    }

    #[test]
    fn test_is_valid_move() {
        let board: Board = "X........".parse().unwrap();
        assert!(!is_valid_move(&board, 0));
        assert!(is_valid_move(&board, 1));
        assert!(!is_valid_move(&board, 9));
    }

    #[test]
    fn test_next_mark() {
        assert_eq!(Board::new().next_mark(), Some(Mark::X));
        assert_eq!("X........".parse::<Board>().unwrap().next_mark(), Some(Mark::O));
        assert_eq!("XX.......".parse::<Board>().unwrap().next_mark(), None);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_get_out_of_range_panics() {
        Board::new().get(9);
    }

    #[test]
    fn test_row_col() {
        assert_eq!(Board::row_col(0), (0, 0));
        assert_eq!(Board::row_col(5), (1, 2));
        assert_eq!(Board::row_col(7), (2, 1));
    }

    #[test]
    fn test_yaml_uses_text_form() {
        let board: Board = "XO.......".parse().unwrap();
        let yaml = serde_yaml_ng::to_string(&board).unwrap();
        assert_eq!(yaml.trim(), "XO.......");
        let back: Board = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(back, board);
    }
}

use super::board::{Board, LINES};
use super::types::{Mark, Outcome, WinningLine};

/// Classifies a board as won, drawn or still in play. Lines are checked in
/// `LINES` order, so the first completed line decides the winner.
pub fn check_terminal(board: &Board) -> Outcome {
    if let Some(line) = check_win_with_line(board) {
        return Outcome::Win(line.mark);
    }

    if board.is_full() {
        Outcome::Draw
    } else {
        Outcome::None
    }
}

pub fn check_win(board: &Board) -> Option<Mark> {
    check_win_with_line(board).map(|line| line.mark)
}

pub fn check_win_with_line(board: &Board) -> Option<WinningLine> {
    for line in LINES {
        let [a, b, c] = line;
        let mark = board.get(a);
        if mark != Mark::Empty && mark == board.get(b) && mark == board.get(c) {
            return Some(WinningLine::new(mark, line));
        }
    }
    None
}

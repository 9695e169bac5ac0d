use common::games::tictactoe::{Board, GameStatus, Mark, Scores, WinningLine};

/// Text grid; empty cells show the number to type, winning marks are bracketed.
pub fn render_board(board: &Board, winning_line: Option<WinningLine>) -> String {
    let mut rows = Vec::with_capacity(3);
    for row in 0..3 {
        let cells: Vec<String> = (0..3)
            .map(|col| {
                let index = row * 3 + col;
                match board.get(index) {
                    Mark::Empty => format!(" {} ", index + 1),
                    mark if winning_line.is_some_and(|line| line.contains(index)) => {
                        format!("[{}]", mark)
                    }
                    mark => format!(" {} ", mark),
                }
            })
            .collect();
        rows.push(cells.join("|"));
    }
    rows.join("\n---+---+---\n")
}

pub fn render_status(status: GameStatus, human_mark: Mark) -> String {
    match status {
        GameStatus::InProgress => format!("Your move ({}).", human_mark),
        GameStatus::Draw => "It's a draw.".to_string(),
        status if status.winner() == Some(human_mark) => "You win!".to_string(),
        _ => "The computer wins.".to_string(),
    }
}

pub fn render_scores(scores: &Scores) -> String {
    format!("You: {}  Computer: {}  Draws: {}", scores.player, scores.computer, scores.draws)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::games::tictactoe::check_win_with_line;

    #[test]
    fn test_empty_board_shows_numbers() {
        let text = render_board(&Board::new(), None);
        assert_eq!(
            text,
            " 1 | 2 | 3 \n---+---+---\n 4 | 5 | 6 \n---+---+---\n 7 | 8 | 9 "
        );
    }

    #[test]
    fn test_winning_line_bracketed() {
        let board: Board = "XXXOO....".parse().unwrap();
        let text = render_board(&board, check_win_with_line(&board));
        assert!(text.starts_with("[X]|[X]|[X]"));
        assert!(text.contains(" O | O | 6 "));
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(render_status(GameStatus::XWon, Mark::X), "You win!");
        assert_eq!(render_status(GameStatus::XWon, Mark::O), "The computer wins.");
        assert_eq!(render_status(GameStatus::Draw, Mark::X), "It's a draw.");
        assert_eq!(render_status(GameStatus::InProgress, Mark::O), "Your move (O).");
    }

    #[test]
    fn test_scores_line() {
        let scores = Scores { player: 1, computer: 4, draws: 2 };
        assert_eq!(render_scores(&scores), "You: 1  Computer: 4  Draws: 2");
    }
}

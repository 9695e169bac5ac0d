use crate::games::SessionRng;
use super::board::{Board, LINES, get_available_moves};
use super::types::{CellIndex, Difficulty, Mark, Outcome};
use super::win_detector::check_terminal;

const WIN_SCORE: i32 = 100;
const NEAR_WIN_SCORE: i32 = 5;

/// Greedy fallback order: center, corners, edges.
const PRIORITY_POSITIONS: [CellIndex; 9] = [4, 0, 2, 6, 8, 1, 3, 5, 7];

/// Immutable engine settings. Changing difficulty means building a new
/// config and a new [`Engine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    difficulty: Difficulty,
    max_depth: usize,
    engine_mark: Mark,
}

impl SearchConfig {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            max_depth: difficulty.max_depth(),
            engine_mark: Mark::O,
        }
    }

    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }

    pub fn with_engine_mark(self, engine_mark: Mark) -> Self {
        assert!(engine_mark != Mark::Empty, "engine mark must be X or O");
        Self { engine_mark, ..self }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn engine_mark(&self) -> Mark {
        self.engine_mark
    }

    pub fn opponent_mark(&self) -> Mark {
        match self.engine_mark {
            Mark::X => Mark::O,
            _ => Mark::X,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

pub struct Engine {
    config: SearchConfig,
}

impl Engine {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn choose_move(&self, board: &Board, rng: &mut SessionRng) -> Option<CellIndex> {
        choose_move(board, &self.config, rng)
    }
}

/// Picks the engine's next cell, or `None` when the board has no empty cell.
/// The caller's board is never modified; searches run on a private copy.
pub fn choose_move(
    board: &Board,
    config: &SearchConfig,
    rng: &mut SessionRng,
) -> Option<CellIndex> {
    match config.difficulty {
        Difficulty::Easy => calculate_random_move(board, rng),
        Difficulty::Medium => calculate_greedy_move(board, config.engine_mark),
        Difficulty::Hard => calculate_minimax_move(board, config.engine_mark, config.max_depth),
    }
}

pub fn calculate_random_move(board: &Board, rng: &mut SessionRng) -> Option<CellIndex> {
    let available_moves = get_available_moves(board);
    rng.choose(&available_moves).copied()
}

/// Win if possible, otherwise block, otherwise take the first free cell in
/// priority order. Looks exactly one ply ahead.
pub fn calculate_greedy_move(board: &Board, engine_mark: Mark) -> Option<CellIndex> {
    let opponent_mark = engine_mark.opponent()?;
    let available_moves = get_available_moves(board);

    if available_moves.is_empty() {
        return None;
    }

    let mut board = *board;

    if let Some(index) = find_winning_move(&mut board, engine_mark, &available_moves) {
        return Some(index);
    }

    if let Some(index) = find_winning_move(&mut board, opponent_mark, &available_moves) {
        return Some(index);
    }

    PRIORITY_POSITIONS
        .into_iter()
        .find(|&index| board.is_empty_at(index))
}

pub fn calculate_minimax_move(
    board: &Board,
    engine_mark: Mark,
    max_depth: usize,
) -> Option<CellIndex> {
    let available_moves = get_available_moves(board);

    if available_moves.is_empty() || engine_mark == Mark::Empty {
        return None;
    }

    let mut board = *board;

    let mut best_move = None;
    let mut best_score = i32::MIN;
    let mut alpha = i32::MIN;

    for index in available_moves {
        board.set(index, engine_mark);

        let score = minimax(&mut board, 0, max_depth, false, engine_mark, alpha, i32::MAX);

        board.set(index, Mark::Empty);

        if score > best_score {
            best_score = score;
            best_move = Some(index);
        }
        alpha = alpha.max(best_score);
    }

    best_move
}

fn find_winning_move(board: &mut Board, mark: Mark, moves: &[CellIndex]) -> Option<CellIndex> {
    for &index in moves {
        board.set(index, mark);
        let winner = check_win_at(board, index);
        board.set(index, Mark::Empty);

        if winner == Some(mark) {
            return Some(index);
        }
    }
    None
}

/// Winner among the lines passing through `index` only.
fn check_win_at(board: &Board, index: CellIndex) -> Option<Mark> {
    let mark = board.get(index);
    if mark == Mark::Empty {
        return None;
    }

    LINES
        .iter()
        .filter(|line| line.contains(&index))
        .any(|line| line.iter().all(|&cell| board.get(cell) == mark))
        .then_some(mark)
}

fn minimax(
    board: &mut Board,
    depth: usize,
    max_depth: usize,
    is_maximizing: bool,
    engine_mark: Mark,
    mut alpha: i32,
    mut beta: i32,
) -> i32 {
    match check_terminal(board) {
        Outcome::Win(winner) => {
            return if winner == engine_mark {
                WIN_SCORE - depth as i32
            } else {
                -WIN_SCORE + depth as i32
            };
        }
        Outcome::Draw => return 0,
        Outcome::None => {}
    }

    if depth >= max_depth {
        return evaluate_board(board, engine_mark);
    }

    if is_maximizing {
        let mut max_eval = i32::MIN;
        for index in get_available_moves(board) {
            board.set(index, engine_mark);
            let eval = minimax(board, depth + 1, max_depth, false, engine_mark, alpha, beta);
            board.set(index, Mark::Empty);

            max_eval = max_eval.max(eval);
            alpha = alpha.max(eval);
            if beta <= alpha {
                break;
            }
        }
        if max_eval == i32::MIN { 0 } else { max_eval }
    } else {
        let Some(opponent_mark) = engine_mark.opponent() else {
            return 0;
        };
        let mut min_eval = i32::MAX;
        for index in get_available_moves(board) {
            board.set(index, opponent_mark);
            let eval = minimax(board, depth + 1, max_depth, true, engine_mark, alpha, beta);
            board.set(index, Mark::Empty);

            min_eval = min_eval.min(eval);
            beta = beta.min(eval);
            if beta <= alpha {
                break;
            }
        }
        if min_eval == i32::MAX { 0 } else { min_eval }
    }
}

/// Static score of a non-terminal board from the engine's point of view.
/// Only reached when a search is cut off before the game ends.
pub fn evaluate_board(board: &Board, engine_mark: Mark) -> i32 {
    LINES
        .iter()
        .map(|line| evaluate_line(board, line, engine_mark))
        .sum()
}

fn evaluate_line(board: &Board, line: &[CellIndex; 3], engine_mark: Mark) -> i32 {
    let mut engine_count = 0;
    let mut opponent_count = 0;
    let mut empty_count = 0;

    for &index in line {
        match board.get(index) {
            Mark::Empty => empty_count += 1,
            mark if mark == engine_mark => engine_count += 1,
            _ => opponent_count += 1,
        }
    }

    if engine_count == 2 && empty_count == 1 {
        NEAR_WIN_SCORE
    } else if opponent_count == 2 && empty_count == 1 {
        -NEAR_WIN_SCORE
    } else {
        engine_count - opponent_count
    }
}

mod board;
mod bot_controller;
mod game_state;
mod saved_game;
mod types;
mod win_detector;

pub use board::{Board, LINES, get_available_moves, is_valid_move};
pub use bot_controller::{
    Engine, SearchConfig, calculate_greedy_move, calculate_minimax_move, calculate_random_move,
    choose_move, evaluate_board,
};
pub use game_state::{MoveReport, TicTacToeGame, TicTacToeGameSettings};
pub use saved_game::{GameStateError, SavedGame, load_game, save_game};
pub use types::{CELL_COUNT, CellIndex, Difficulty, GameStatus, Mark, Outcome, Scores, WinningLine};
pub use win_detector::{check_terminal, check_win, check_win_with_line};

use std::sync::Arc;

use crate::config::{AiSection, GameConfig};
use crate::games::SessionRng;
use crate::logger::Logger;
use crate::{log_debug, log_info};
use super::board::{Board, is_valid_move};
use super::bot_controller::Engine;
use super::saved_game::SavedGame;
use super::types::{CELL_COUNT, CellIndex, Difficulty, GameStatus, Mark, Scores, WinningLine};
use super::win_detector::{check_terminal, check_win_with_line};

pub struct TicTacToeGameSettings {
    pub difficulty: Difficulty,
    pub ai: AiSection,
    pub engine_mark: Mark,
    pub max_undo_steps: usize,
}

impl Default for TicTacToeGameSettings {
    fn default() -> Self {
        Self::from(&GameConfig::default())
    }
}

impl From<&GameConfig> for TicTacToeGameSettings {
    fn from(config: &GameConfig) -> Self {
        Self {
            difficulty: config.game.default_difficulty,
            ai: config.ai,
            engine_mark: Mark::O,
            max_undo_steps: config.game.max_undo_steps,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    pub engine_move: Option<CellIndex>,
    pub status: GameStatus,
}

/// Human-versus-engine game loop state. X always moves first; if the engine
/// holds X it opens as soon as a game starts.
pub struct TicTacToeGame {
    board: Board,
    current_mark: Mark,
    status: GameStatus,
    history: Vec<Board>,
    scores: Scores,
    engine: Engine,
    ai: AiSection,
    rng: SessionRng,
    logger: Arc<Logger>,
    max_undo_steps: usize,
    undos_used: usize,
}

impl TicTacToeGame {
    pub fn new(settings: TicTacToeGameSettings, rng: SessionRng, logger: Arc<Logger>) -> Self {
        let engine = Engine::new(
            settings
                .ai
                .search_config(settings.difficulty)
                .with_engine_mark(settings.engine_mark),
        );

        let mut game = Self {
            board: Board::new(),
            current_mark: Mark::X,
            status: GameStatus::InProgress,
            history: Vec::new(),
            scores: Scores::default(),
            engine,
            ai: settings.ai,
            rng,
            logger,
            max_undo_steps: settings.max_undo_steps,
            undos_used: 0,
        };
        log_info!(
            game.logger,
            "New game, difficulty {}, engine plays {}",
            game.difficulty(),
            game.engine_mark()
        );
        game.run_engine_turn_if_due();
        game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn current_mark(&self) -> Mark {
        self.current_mark
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    pub fn history(&self) -> &[Board] {
        &self.history
    }

    pub fn difficulty(&self) -> Difficulty {
        self.engine.config().difficulty()
    }

    pub fn engine_mark(&self) -> Mark {
        self.engine.config().engine_mark()
    }

    pub fn human_mark(&self) -> Mark {
        self.engine.config().opponent_mark()
    }

    pub fn undos_left(&self) -> usize {
        self.max_undo_steps.saturating_sub(self.undos_used)
    }

    pub fn winning_line(&self) -> Option<WinningLine> {
        check_win_with_line(&self.board)
    }

    /// Plays the human's mark at `index`, then lets the engine answer.
    pub fn handle_move(&mut self, index: CellIndex) -> Result<MoveReport, String> {
        if self.status != GameStatus::InProgress {
            return Err("Game is already over".to_string());
        }

        if self.current_mark != self.human_mark() {
            return Err("Not your turn".to_string());
        }

        if index >= CELL_COUNT {
            return Err(format!("Cell {} is out of range", index + 1));
        }

        if !is_valid_move(&self.board, index) {
            return Err(format!("Cell {} is already marked", index + 1));
        }

        self.make_move(index);
        let engine_move = self.run_engine_turn_if_due();

        Ok(MoveReport {
            engine_move,
            status: self.status,
        })
    }

    /// Starts a fresh game. Scores are kept.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.current_mark = Mark::X;
        self.status = GameStatus::InProgress;
        self.history.clear();
        self.undos_used = 0;
        log_info!(self.logger, "Game reset");
        self.run_engine_turn_if_due();
    }

    /// Swaps in a freshly built engine for `difficulty`; the old one is dropped.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        let config = self
            .ai
            .search_config(difficulty)
            .with_engine_mark(self.engine_mark());
        self.engine = Engine::new(config);
        log_info!(self.logger, "Difficulty set to {}", difficulty);
    }

    /// Takes back the last human move and the engine reply that followed it.
    pub fn undo(&mut self) -> Result<(), String> {
        if self.status != GameStatus::InProgress {
            return Err("Game is already over".to_string());
        }

        if self.undos_used >= self.max_undo_steps {
            return Err(format!("No undos left ({} per game)", self.max_undo_steps));
        }

        let human_mark = self.human_mark();
        let has_human_move = self
            .history
            .last()
            .is_some_and(|board| board.count(human_mark) > 0);
        if !has_human_move {
            return Err("Nothing to undo".to_string());
        }

        while let Some(last) = self.history.pop() {
            let previous = self.history.last().copied().unwrap_or_default();
            self.board = previous;
            if last.count(human_mark) > previous.count(human_mark) {
                break;
            }
        }

        self.current_mark = human_mark;
        self.undos_used += 1;
        log_debug!(self.logger, "Undo, board is now {}", self.board);
        Ok(())
    }

    pub fn to_saved_game(&self) -> SavedGame {
        SavedGame {
            scores: self.scores,
            engine_mark: self.engine_mark(),
            current_game: self.board,
            history: self.history.clone(),
        }
    }

    /// Restores scores and the unfinished game from a save. Finished games, and
    /// games played with the sides on the other marks, are not resumed; only
    /// their scores carry over.
    pub fn restore(&mut self, saved: SavedGame) -> Result<(), String> {
        let next_mark = saved
            .current_game
            .next_mark()
            .ok_or_else(|| format!("Saved board {} is not a legal position", saved.current_game))?;

        if saved.history.last().copied().unwrap_or_default() != saved.current_game {
            return Err("Saved history does not end with the saved board".to_string());
        }

        self.scores = saved.scores;
        self.undos_used = 0;

        let same_sides = saved.engine_mark == self.engine_mark();
        if !same_sides {
            log_info!(
                self.logger,
                "Saved game had the computer on {}, starting a new game",
                saved.engine_mark
            );
        }

        if !same_sides || check_terminal(&saved.current_game).is_terminal() {
            self.board = Board::new();
            self.history.clear();
            self.current_mark = Mark::X;
        } else {
            self.board = saved.current_game;
            self.history = saved.history;
            self.current_mark = next_mark;
        }
        self.status = GameStatus::InProgress;

        log_info!(
            self.logger,
            "Restored game {} with scores player {} / computer {} / draws {}",
            self.board,
            self.scores.player,
            self.scores.computer,
            self.scores.draws
        );
        self.run_engine_turn_if_due();
        Ok(())
    }

    fn make_move(&mut self, index: CellIndex) {
        let mark = self.current_mark;
        self.board.set(index, mark);
        self.history.push(self.board);
        log_debug!(self.logger, "{} placed at cell {}", mark, index + 1);

        self.check_game_over();

        if self.status == GameStatus::InProgress {
            self.switch_turn();
        }
    }

    fn run_engine_turn_if_due(&mut self) -> Option<CellIndex> {
        if self.status != GameStatus::InProgress || self.current_mark != self.engine_mark() {
            return None;
        }

        let index = self.engine.choose_move(&self.board, &mut self.rng)?;
        self.make_move(index);
        Some(index)
    }

    fn switch_turn(&mut self) {
        self.current_mark = match self.current_mark {
            Mark::X => Mark::O,
            _ => Mark::X,
        };
    }

    fn check_game_over(&mut self) {
        self.status = GameStatus::from_outcome(check_terminal(&self.board));
        if self.status == GameStatus::InProgress {
            return;
        }

        self.scores.record(self.status, self.engine_mark());
        match self.status.winner() {
            Some(mark) if mark == self.engine_mark() => {
                log_info!(self.logger, "Game ended. Winner: {} (engine)", mark)
            }
            Some(mark) => log_info!(self.logger, "Game ended. Winner: {} (player)", mark),
            None => log_info!(self.logger, "Game ended in a draw"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::{LogLevel, MemorySink};

    fn settings(difficulty: Difficulty) -> TicTacToeGameSettings {
        TicTacToeGameSettings {
            difficulty,
            ..TicTacToeGameSettings::default()
        }
    }

    fn game(difficulty: Difficulty) -> TicTacToeGame {
        TicTacToeGame::new(settings(difficulty), SessionRng::new(0), Arc::new(Logger::disabled()))
    }

    #[test]
    fn test_engine_replies_after_human_move() {
        let mut game = game(Difficulty::Medium);
        let report = game.handle_move(0).unwrap();

        assert_eq!(report.engine_move, Some(4));
        assert_eq!(report.status, GameStatus::InProgress);
        assert_eq!(game.board().get(0), Mark::X);
        assert_eq!(game.board().get(4), Mark::O);
        assert_eq!(game.current_mark(), Mark::X);
        assert_eq!(game.history().len(), 2);
    }

    #[test]
    fn test_invalid_moves_rejected() {
        let mut game = game(Difficulty::Medium);
        game.handle_move(0).unwrap();

        assert!(game.handle_move(0).unwrap_err().contains("already marked"));
        assert!(game.handle_move(4).unwrap_err().contains("already marked"));
        assert!(game.handle_move(9).unwrap_err().contains("out of range"));
        assert_eq!(game.history().len(), 2);
    }

    #[test]
    fn test_human_win_is_scored() {
        let mut game = game(Difficulty::Easy);
        // Force a board where X wins on the next move regardless of Easy's reply.
        game.restore(SavedGame {
            scores: Scores::default(),
            engine_mark: Mark::O,
            current_game: "XX.OO....".parse().unwrap(),
            history: vec!["XX.OO....".parse().unwrap()],
        })
        .unwrap();

        let report = game.handle_move(2).unwrap();
        assert_eq!(report.status, GameStatus::XWon);
        assert_eq!(report.engine_move, None);
        assert_eq!(game.scores(), Scores { player: 1, computer: 0, draws: 0 });
        assert_eq!(game.winning_line().map(|line| line.cells), Some([0, 1, 2]));
        assert!(game.handle_move(5).unwrap_err().contains("already over"));
    }

    #[test]
    fn test_hard_game_never_lost_to_scripted_player() {
        let mut game = game(Difficulty::Hard);
        for index in [0, 1, 2, 3, 5, 6, 7, 8, 4] {
            if game.status() != GameStatus::InProgress {
                break;
            }
            let _ = game.handle_move(index);
        }
        assert_ne!(game.status(), GameStatus::XWon);
        assert_ne!(game.status(), GameStatus::InProgress);
        assert_eq!(game.scores().total(), 1);
    }

    #[test]
    fn test_reset_keeps_scores() {
        let mut game = game(Difficulty::Hard);
        while game.status() == GameStatus::InProgress {
            let index = (0..CELL_COUNT).find(|&i| game.board().is_empty_at(i)).unwrap();
            game.handle_move(index).unwrap();
        }
        let scores = game.scores();

        game.reset();
        assert_eq!(*game.board(), Board::new());
        assert_eq!(game.status(), GameStatus::InProgress);
        assert!(game.history().is_empty());
        assert_eq!(game.scores(), scores);
    }

    #[test]
    fn test_engine_opens_when_holding_x() {
        let settings = TicTacToeGameSettings {
            engine_mark: Mark::X,
            ..settings(Difficulty::Medium)
        };
        let game = TicTacToeGame::new(settings, SessionRng::new(0), Arc::new(Logger::disabled()));

        assert_eq!(game.human_mark(), Mark::O);
        assert_eq!(game.board().get(4), Mark::X);
        assert_eq!(game.current_mark(), Mark::O);
    }

    #[test]
    fn test_set_difficulty_rebuilds_engine() {
        let mut game = game(Difficulty::Easy);
        game.set_difficulty(Difficulty::Hard);

        assert_eq!(game.difficulty(), Difficulty::Hard);
        assert_eq!(game.engine_mark(), Mark::O);
        // Hard answers a corner opening with the center.
        assert_eq!(game.handle_move(0).unwrap().engine_move, Some(4));
    }

    #[test]
    fn test_undo_reverts_human_and_engine_move() {
        let mut game = game(Difficulty::Medium);
        game.handle_move(0).unwrap();
        let after_first = *game.board();
        game.handle_move(8).unwrap();

        game.undo().unwrap();
        assert_eq!(*game.board(), after_first);
        assert_eq!(game.history().len(), 2);
        assert_eq!(game.current_mark(), Mark::X);

        game.undo().unwrap();
        assert_eq!(*game.board(), Board::new());
        assert!(game.undo().unwrap_err().contains("Nothing to undo"));
    }

    #[test]
    fn test_undo_limit() {
        let settings = TicTacToeGameSettings {
            max_undo_steps: 1,
            ..settings(Difficulty::Medium)
        };
        let mut game =
            TicTacToeGame::new(settings, SessionRng::new(0), Arc::new(Logger::disabled()));
        game.handle_move(0).unwrap();
        game.undo().unwrap();
        game.handle_move(0).unwrap();

        assert_eq!(game.undos_left(), 0);
        assert!(game.undo().unwrap_err().contains("No undos left"));
    }

    #[test]
    fn test_undo_keeps_engine_opening() {
        let settings = TicTacToeGameSettings {
            engine_mark: Mark::X,
            ..settings(Difficulty::Medium)
        };
        let mut game =
            TicTacToeGame::new(settings, SessionRng::new(0), Arc::new(Logger::disabled()));
        let opening = *game.board();
        game.handle_move(0).unwrap();

        game.undo().unwrap();
        assert_eq!(*game.board(), opening);
        assert_eq!(game.current_mark(), Mark::O);
    }

    #[test]
    fn test_saved_game_round_trip() {
        let mut game = game(Difficulty::Medium);
        game.handle_move(0).unwrap();
        let saved = game.to_saved_game();

        let mut restored = self::game(Difficulty::Medium);
        restored.restore(saved.clone()).unwrap();

        assert_eq!(restored.board(), game.board());
        assert_eq!(restored.history(), game.history());
        assert_eq!(restored.current_mark(), Mark::X);
        assert_eq!(restored.to_saved_game(), saved);
    }

    #[test]
    fn test_restore_with_sides_swapped() {
        let mut first = game(Difficulty::Medium);
        let unfinished: Board = "XX.OO....".parse().unwrap();
        first
            .restore(SavedGame {
                scores: Scores::default(),
                engine_mark: Mark::O,
                current_game: unfinished,
                history: vec![unfinished],
            })
            .unwrap();
        first.handle_move(2).unwrap();
        first.reset();
        first.handle_move(0).unwrap();
        let saved = first.to_saved_game();
        assert_eq!(saved.scores, Scores { player: 1, computer: 0, draws: 0 });

        let settings = TicTacToeGameSettings {
            engine_mark: Mark::X,
            ..settings(Difficulty::Medium)
        };
        let mut second =
            TicTacToeGame::new(settings, SessionRng::new(0), Arc::new(Logger::disabled()));
        second.restore(saved).unwrap();

        // The player's win stays theirs and the half-played board is dropped;
        // the computer opens a fresh game as X instead of moving for the player.
        assert_eq!(second.scores(), Scores { player: 1, computer: 0, draws: 0 });
        assert_eq!(second.board().count(Mark::X), 1);
        assert_eq!(second.board().count(Mark::O), 0);
        assert_eq!(second.current_mark(), Mark::O);
        assert_eq!(second.history().len(), 1);
    }

    #[test]
    fn test_restore_finished_game_keeps_scores_only() {
        let mut game = game(Difficulty::Medium);
        let finished: Board = "XXXOO....".parse().unwrap();
        game.restore(SavedGame {
            scores: Scores { player: 3, computer: 1, draws: 0 },
            engine_mark: Mark::O,
            current_game: finished,
            history: vec![finished],
        })
        .unwrap();

        assert_eq!(*game.board(), Board::new());
        assert_eq!(game.scores().player, 3);
    }

    #[test]
    fn test_restore_rejects_illegal_board() {
        let mut game = game(Difficulty::Medium);
        let illegal: Board = "XXX......".parse().unwrap();
        let result = game.restore(SavedGame {
            scores: Scores::default(),
            engine_mark: Mark::O,
            current_game: illegal,
            history: vec![illegal],
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_game_end_is_logged() {
        let sink = MemorySink::new(LogLevel::Info);
        let logger = Arc::new(Logger::new(None).with_sink(sink.clone()));
        let mut game = TicTacToeGame::new(settings(Difficulty::Medium), SessionRng::new(0), logger);
        game.restore(SavedGame {
            scores: Scores::default(),
            engine_mark: Mark::O,
            current_game: "XX.OO....".parse().unwrap(),
            history: vec!["XX.OO....".parse().unwrap()],
        })
        .unwrap();
        game.handle_move(2).unwrap();

        assert!(sink.lines().iter().any(|line| line.contains("Winner: X (player)")));
    }
}

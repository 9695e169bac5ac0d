use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;

use super::board::Board;
use super::types::{Mark, Scores};

/// Scores plus the game in progress, as written between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedGame {
    pub scores: Scores,
    /// Mark the computer held while `current_game` was played.
    #[serde(default = "default_engine_mark")]
    pub engine_mark: Mark,
    pub current_game: Board,
    pub history: Vec<Board>,
}

fn default_engine_mark() -> Mark {
    Mark::O
}

#[derive(Debug)]
pub enum GameStateError {
    IoError(std::io::Error),
    SerializeError(serde_yaml_ng::Error),
    DeserializeError(serde_yaml_ng::Error),
}

impl std::fmt::Display for GameStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStateError::IoError(e) => write!(f, "IO error: {}", e),
            GameStateError::SerializeError(e) => write!(f, "Failed to serialize game state: {}", e),
            GameStateError::DeserializeError(e) => {
                write!(f, "Failed to deserialize game state: {}", e)
            }
        }
    }
}

impl std::error::Error for GameStateError {}

impl From<std::io::Error> for GameStateError {
    fn from(e: std::io::Error) -> Self {
        GameStateError::IoError(e)
    }
}

pub fn save_game(path: &Path, saved: &SavedGame) -> Result<(), GameStateError> {
    let content = serde_yaml_ng::to_string(saved).map_err(GameStateError::SerializeError)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// `Ok(None)` when no save exists at `path`.
pub fn load_game(path: &Path) -> Result<Option<SavedGame>, GameStateError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    let saved = serde_yaml_ng::from_str(&content).map_err(GameStateError::DeserializeError)?;
    Ok(Some(saved))
}

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use crate::games::tictactoe::{Difficulty, SearchConfig};

pub const CONFIG_FILE: &str = "tictactoe_config.yaml";

const MAX_SEARCH_DEPTH: usize = 9;

pub fn get_config_manager(
    file_path: impl Into<PathBuf>,
) -> ConfigManager<FileContentConfigProvider, GameConfig, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(file_path)
}

/// Sections missing from the file fall back to their defaults field by field.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GameConfig {
    pub game: GameSection,
    pub ai: AiSection,
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<(), String> {
        self.game.validate()?;
        self.ai.validate()?;
        Ok(())
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GameSection {
    pub default_difficulty: Difficulty,
    pub save_games: bool,
    pub max_undo_steps: usize,
    pub save_path: String,
}

impl Default for GameSection {
    fn default() -> Self {
        Self {
            default_difficulty: Difficulty::Medium,
            save_games: true,
            max_undo_steps: 10,
            save_path: "game_state.yaml".to_string(),
        }
    }
}

impl Validate for GameSection {
    fn validate(&self) -> Result<(), String> {
        if self.save_path.trim().is_empty() {
            return Err("save_path must not be empty".to_string());
        }
        Ok(())
    }
}

/// Per-difficulty search depths. Only `hard_depth` changes play: Easy picks
/// at random and Medium looks one move ahead, so their depths are recorded in
/// the `SearchConfig` but never searched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSection {
    pub easy_depth: usize,
    pub medium_depth: usize,
    pub hard_depth: usize,
}

impl Default for AiSection {
    fn default() -> Self {
        Self {
            easy_depth: Difficulty::Easy.max_depth(),
            medium_depth: Difficulty::Medium.max_depth(),
            hard_depth: Difficulty::Hard.max_depth(),
        }
    }
}

impl AiSection {
    pub fn depth_for(&self, difficulty: Difficulty) -> usize {
        match difficulty {
            Difficulty::Easy => self.easy_depth,
            Difficulty::Medium => self.medium_depth,
            Difficulty::Hard => self.hard_depth,
        }
    }

    pub fn search_config(&self, difficulty: Difficulty) -> SearchConfig {
        SearchConfig::new(difficulty).with_max_depth(self.depth_for(difficulty))
    }
}

impl Validate for AiSection {
    fn validate(&self) -> Result<(), String> {
        for (name, depth) in [
            ("easy_depth", self.easy_depth),
            ("medium_depth", self.medium_depth),
            ("hard_depth", self.hard_depth),
        ] {
            if depth == 0 || depth > MAX_SEARCH_DEPTH {
                return Err(format!(
                    "{} must be between 1 and {}, got {}",
                    name, MAX_SEARCH_DEPTH, depth
                ));
            }
        }
        if self.easy_depth > self.medium_depth || self.medium_depth > self.hard_depth {
            return Err("depths must not decrease from easy to hard".to_string());
        }
        Ok(())
    }
}

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Board parameters shared by training and evaluation.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub rows: usize,
    pub cols: usize,
    pub bombs: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            rows: 5,
            cols: 5,
            bombs: 3,
        }
    }
}

impl BoardConfig {
    /// Length of the feature and label vectors.
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }
}

/// Self-play trainer configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub num_games: usize,
    pub log_interval: usize,
    pub hidden_size: usize,
    pub model_path: PathBuf,
    /// Fixed RNG seed for reproducible runs; `None` seeds from entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            num_games: 1_000_000,
            log_interval: 10_000,
            hidden_size: 128,
            model_path: PathBuf::from("minesweeper_model.nn"),
            seed: None,
        }
    }
}

/// Evaluation harness configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub num_games: usize,
    pub log_interval: usize,
    pub model_path: PathBuf,
    /// Output probability at or above which a cell gets flagged.
    pub flag_threshold: f64,
    /// Per-game iteration cap guaranteeing termination.
    pub max_turns: usize,
    /// Win rate the run must exceed to pass.
    pub target_win_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            num_games: 1_000,
            log_interval: 100,
            model_path: PathBuf::from("minesweeper_model.nn"),
            flag_threshold: 0.6,
            max_turns: 100,
            target_win_rate: 0.5,
            seed: None,
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub board: BoardConfig,
    pub training: TrainerConfig,
    pub evaluation: EvalConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.rows == 0 || self.board.cols == 0 {
            return Err(ConfigError::Validation(
                "board.rows and board.cols must be > 0".into(),
            ));
        }
        if self.board.bombs == 0 {
            return Err(ConfigError::Validation("board.bombs must be > 0".into()));
        }
        if self.board.bombs >= self.board.cell_count() {
            return Err(ConfigError::Validation(
                "board.bombs must be < board.rows * board.cols".into(),
            ));
        }
        if self.training.num_games == 0 {
            return Err(ConfigError::Validation(
                "training.num_games must be > 0".into(),
            ));
        }
        if self.training.log_interval == 0 {
            return Err(ConfigError::Validation(
                "training.log_interval must be > 0".into(),
            ));
        }
        if self.training.hidden_size == 0 {
            return Err(ConfigError::Validation(
                "training.hidden_size must be > 0".into(),
            ));
        }
        if self.evaluation.num_games == 0 {
            return Err(ConfigError::Validation(
                "evaluation.num_games must be > 0".into(),
            ));
        }
        if self.evaluation.log_interval == 0 {
            return Err(ConfigError::Validation(
                "evaluation.log_interval must be > 0".into(),
            ));
        }
        if self.evaluation.flag_threshold <= 0.0 || self.evaluation.flag_threshold >= 1.0 {
            return Err(ConfigError::Validation(
                "evaluation.flag_threshold must be in (0, 1)".into(),
            ));
        }
        if self.evaluation.max_turns == 0 {
            return Err(ConfigError::Validation(
                "evaluation.max_turns must be > 0".into(),
            ));
        }
        if self.evaluation.target_win_rate < 0.0 || self.evaluation.target_win_rate > 1.0 {
            return Err(ConfigError::Validation(
                "evaluation.target_win_rate must be in [0, 1]".into(),
            ));
        }
        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}

use std::path::PathBuf;

/// Errors raised by the network engine.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("{what} has length {actual}, network expects {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Errors that can occur while saving or loading a network model file.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to read model from {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write model to {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse model from {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("model file {path} is inconsistent: {field} has {actual} entries, expected {expected}")]
    ShapeMismatch {
        path: PathBuf,
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors that can occur during a self-play training run.
#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Errors that can occur during an evaluation run.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_display() {
        let err = NetworkError::DimensionMismatch {
            what: "input",
            expected: 25,
            actual: 24,
        };
        assert_eq!(err.to_string(), "input has length 24, network expects 25");
    }

    #[test]
    fn test_shape_mismatch_display() {
        let err = PersistenceError::ShapeMismatch {
            path: PathBuf::from("model.nn"),
            field: "biasHidden",
            expected: 128,
            actual: 64,
        };
        assert_eq!(
            err.to_string(),
            "model file model.nn is inconsistent: biasHidden has 64 entries, expected 128"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("board.bombs must be < board.rows * board.cols".into());
        assert_eq!(
            err.to_string(),
            "config validation error: board.bombs must be < board.rows * board.cols"
        );
    }
}

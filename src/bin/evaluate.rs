use std::path::Path;

use anyhow::{Context, Result};

use ml_minesweeper::config::AppConfig;
use ml_minesweeper::error::EvaluationError;
use ml_minesweeper::training::evaluator::Evaluator;

/// Batch entry point: load the persisted network, play the configured number
/// of games, and print a pass/fail verdict against the target win rate.
fn main() -> Result<()> {
    env_logger::init();

    let config_path = Path::new("config.toml");
    let config = AppConfig::load_or_default(config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    let mut evaluator = Evaluator::new(config.board, config.evaluation);
    let report = match evaluator.run() {
        Ok(report) => report,
        Err(EvaluationError::Persistence(e)) => {
            return Err(anyhow::Error::new(e)
                .context("could not load the trained network; run `train` first"));
        }
        Err(e) => return Err(e.into()),
    };

    if !report.passed {
        std::process::exit(1);
    }
    Ok(())
}

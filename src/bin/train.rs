use std::path::Path;

use anyhow::{Context, Result};

use ml_minesweeper::config::AppConfig;
use ml_minesweeper::training::trainer::Trainer;

/// Batch entry point: play the configured number of self-play games and
/// persist the trained network.
fn main() -> Result<()> {
    env_logger::init();

    let config_path = Path::new("config.toml");
    let config = AppConfig::load_or_default(config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    let mut trainer = Trainer::new(config.board, config.training);
    trainer.run().context("training run failed")?;
    Ok(())
}

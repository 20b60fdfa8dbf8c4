use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::ai::Network;
use crate::config::{BoardConfig, TrainerConfig};
use crate::error::TrainingError;
use crate::game::Board;
use crate::training::metrics::OutcomeTally;
use crate::training::reveal_random_cell;

/// Self-play trainer.
///
/// Plays games against the deterministic solver and trains the network to
/// reproduce the solver's flag deductions: each step the pre-deduction board
/// is the input and the post-`auto_flag` flag layout is the label.
pub struct Trainer {
    board: BoardConfig,
    config: TrainerConfig,
    rng: SmallRng,
}

impl Trainer {
    pub fn new(board: BoardConfig, config: TrainerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Trainer { board, config, rng }
    }

    /// Run the full training loop and persist the final network.
    pub fn run(&mut self) -> Result<OutcomeTally, TrainingError> {
        let cells = self.board.cell_count();
        let mut network = Network::new(cells, self.config.hidden_size, cells, &mut self.rng);

        println!(
            "Network created: {} input, {} hidden, {} output nodes",
            network.input_size(),
            network.hidden_size(),
            network.output_size()
        );
        println!("Starting training for {} games...", self.config.num_games);
        println!("-------------------------------------------");

        let mut tally = OutcomeTally::new();
        for game in 1..=self.config.num_games {
            let won = self.play_game(&mut network)?;
            tally.record(won);

            if game % self.config.log_interval == 0 {
                println!(
                    "Game {}/{} | win rate: {:.2}% ({} wins, {} losses)",
                    game,
                    self.config.num_games,
                    tally.win_rate() * 100.0,
                    tally.wins(),
                    tally.losses(),
                );
            }
        }

        println!("-------------------------------------------");
        println!("Training complete. Total games: {}", tally.total());
        println!(
            "Wins: {} | Losses: {} | Win rate: {:.2}%",
            tally.wins(),
            tally.losses(),
            tally.win_rate() * 100.0
        );

        network.save(&self.config.model_path)?;
        log::info!("model saved to {}", self.config.model_path.display());
        println!("Network saved to: {}", self.config.model_path.display());

        Ok(tally)
    }

    /// Play one self-play game, training the network on every solver step.
    /// Returns whether the game was won.
    fn play_game(&mut self, network: &mut Network) -> Result<bool, TrainingError> {
        let mut board = Board::new(self.board.rows, self.board.cols, self.board.bombs);

        // Seed the game with one random reveal.
        reveal_random_cell(&mut board, &mut self.rng);

        while !board.is_game_over() {
            let flags_before = board.flag_count();

            // Deduce on a snapshot so the pre-deduction state stays encodable.
            let mut deduced = board.clone();
            deduced.auto_flag();
            let flags_after = deduced.flag_count();

            let input = board.to_feature_vector();
            let target = deduced.to_flag_vector();
            network.train(&input, &target)?;

            board = deduced;

            if flags_after > flags_before {
                board.auto_reveal();
            } else if !reveal_random_cell(&mut board, &mut self.rng) {
                // Every remaining cell is flagged; nothing left to probe.
                break;
            }
        }

        Ok(board.is_game_won())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_configs(dir: &std::path::Path, games: usize, seed: u64) -> (BoardConfig, TrainerConfig) {
        (
            BoardConfig::default(),
            TrainerConfig {
                num_games: games,
                log_interval: 1_000_000,
                hidden_size: 8,
                model_path: dir.join("model.nn"),
                seed: Some(seed),
            },
        )
    }

    #[test]
    fn test_every_game_terminates() {
        let dir = tempfile::tempdir().unwrap();
        let (board, config) = test_configs(dir.path(), 1, 3);
        let mut trainer = Trainer::new(board, config);
        let mut network = Network::new(25, 8, 25, &mut SmallRng::seed_from_u64(0));
        for _ in 0..200 {
            trainer.play_game(&mut network).unwrap();
        }
    }

    #[test]
    fn test_run_tallies_every_game() {
        let dir = tempfile::tempdir().unwrap();
        let (board, config) = test_configs(dir.path(), 50, 7);
        let mut trainer = Trainer::new(board, config);
        let tally = trainer.run().unwrap();
        assert_eq!(tally.total(), 50);
        assert_eq!(tally.wins() + tally.losses(), 50);
    }

    #[test]
    fn test_run_persists_the_network() {
        let dir = tempfile::tempdir().unwrap();
        let (board, config) = test_configs(dir.path(), 5, 11);
        let model_path: PathBuf = config.model_path.clone();
        Trainer::new(board, config).run().unwrap();

        let network = Network::load(&model_path).unwrap();
        assert_eq!(network.input_size(), 25);
        assert_eq!(network.hidden_size(), 8);
        assert_eq!(network.output_size(), 25);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        let (board, config) = test_configs(dir.path(), 30, 5);
        let a = Trainer::new(board.clone(), config.clone()).run().unwrap();
        let b = Trainer::new(board, config).run().unwrap();
        assert_eq!(a.wins(), b.wins());
        assert_eq!(a.losses(), b.losses());
    }
}

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::ai::Network;
use crate::config::{BoardConfig, EvalConfig};
use crate::error::EvaluationError;
use crate::game::Board;
use crate::training::metrics::OutcomeTally;
use crate::training::reveal_random_cell;

/// Outcome of an evaluation run.
#[derive(Debug, Clone, Copy)]
pub struct EvalReport {
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    /// Whether the win rate beat the configured target.
    pub passed: bool,
}

/// Evaluation harness: plays games by thresholding the network's per-cell
/// mine probabilities into flag decisions.
pub struct Evaluator {
    board: BoardConfig,
    config: EvalConfig,
    rng: SmallRng,
}

impl Evaluator {
    pub fn new(board: BoardConfig, config: EvalConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Evaluator { board, config, rng }
    }

    /// Load the persisted network and play the full evaluation batch.
    pub fn run(&mut self) -> Result<EvalReport, EvaluationError> {
        let network = Network::load(&self.config.model_path)?;
        println!(
            "Network loaded from: {}",
            self.config.model_path.display()
        );
        println!("Starting evaluation for {} games...", self.config.num_games);
        println!("-------------------------------------------");

        let mut tally = OutcomeTally::new();
        for game in 1..=self.config.num_games {
            let won = self.play_game(&network)?;
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
        println!("Evaluation complete. Total games: {}", tally.total());
        println!(
            "Wins: {} | Losses: {} | Win rate: {:.2}%",
            tally.wins(),
            tally.losses(),
            tally.win_rate() * 100.0
        );

        let passed = tally.win_rate() > self.config.target_win_rate;
        if passed {
            println!(
                "PASS: win rate is above {:.0}%",
                self.config.target_win_rate * 100.0
            );
        } else {
            println!(
                "FAIL: win rate is at or below {:.0}%. More training may be needed.",
                self.config.target_win_rate * 100.0
            );
        }

        Ok(EvalReport {
            wins: tally.wins(),
            losses: tally.losses(),
            win_rate: tally.win_rate(),
            passed,
        })
    }

    /// Play one game driven by network inference. Returns whether it was won.
    ///
    /// The turn cap is a circuit breaker against stalled play; hitting it
    /// counts as a loss unless the game was already won.
    fn play_game(&mut self, network: &Network) -> Result<bool, EvaluationError> {
        let mut board = Board::new(self.board.rows, self.board.cols, self.board.bombs);

        reveal_random_cell(&mut board, &mut self.rng);

        let mut turns = 0;
        while !board.is_game_over() {
            turns += 1;
            if turns > self.config.max_turns {
                break;
            }

            let input = board.to_feature_vector();
            let output = network.guess(&input)?;

            // Flag every hidden cell the network is confident about. Flags
            // placed here are never taken back.
            let flags_before = board.flag_count();
            for (idx, &probability) in output.iter().enumerate() {
                if probability < self.config.flag_threshold {
                    continue;
                }
                let (row, col) = (idx / self.board.cols, idx % self.board.cols);
                if let Some(cell) = board.cell(row, col) {
                    if !cell.revealed && !cell.flagged {
                        board.toggle_flag(row, col);
                    }
                }
            }

            if board.flag_count() > flags_before {
                board.auto_reveal();
            } else if !reveal_random_cell(&mut board, &mut self.rng) {
                break;
            }
        }

        Ok(board.is_game_won())
    }
}

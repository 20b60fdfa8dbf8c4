pub mod evaluator;
pub mod metrics;
pub mod trainer;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::game::Board;

/// Reveal one cell chosen uniformly among the hidden, unflagged cells.
///
/// Returns `false` when no such cell exists; callers treat that as the end
/// of the game rather than an error.
pub(crate) fn reveal_random_cell<R: Rng>(board: &mut Board, rng: &mut R) -> bool {
    let available = board.hidden_unflagged();
    match available.choose(rng) {
        Some(&(row, col)) => {
            board.reveal(row, col, rng);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_reveal_random_cell_makes_progress() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut board = Board::new(5, 5, 3);
        assert!(reveal_random_cell(&mut board, &mut rng));
        assert!(board.hidden_unflagged().len() < 25);
    }

    #[test]
    fn test_reveal_random_cell_with_no_candidates() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut board = Board::with_bombs(2, 2, &[(0, 0)]);
        board.toggle_flag(0, 0);
        board.toggle_flag(0, 1);
        board.toggle_flag(1, 0);
        board.toggle_flag(1, 1);
        assert!(!reveal_random_cell(&mut board, &mut rng));
    }
}

/// Win/loss counters for one training or evaluation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutcomeTally {
    wins: usize,
    losses: usize,
}

impl OutcomeTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, won: bool) {
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }

    pub fn wins(&self) -> usize {
        self.wins
    }

    pub fn losses(&self) -> usize {
        self.losses
    }

    pub fn total(&self) -> usize {
        self.wins + self.losses
    }

    /// Fraction of games won so far; 0.0 before any game is recorded.
    pub fn win_rate(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        self.wins as f64 / self.total() as f64
    }
}

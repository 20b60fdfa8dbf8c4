use std::collections::VecDeque;

use rand::Rng;

/// A single board cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    pub bomb: bool,
    pub adjacent_bombs: u8,
    pub revealed: bool,
    pub flagged: bool,
}

/// A Minesweeper board.
///
/// Bombs are placed lazily on the first reveal so that the first click can
/// never lose. `Clone` is a full deep copy: the clone shares no cell storage
/// with the original, so solver deductions can run on a snapshot while the
/// pre-deduction state stays readable.
#[derive(Debug, Clone)]
pub struct Board {
    cells: Vec<Cell>,
    rows: usize,
    cols: usize,
    num_bombs: usize,
    game_over: bool,
    game_won: bool,
    first_move: bool,
}

impl Board {
    /// Create a board with no bombs placed yet.
    ///
    /// `num_bombs` must be strictly less than `rows * cols` so that the
    /// excluded first-click cell always leaves room for every bomb.
    pub fn new(rows: usize, cols: usize, num_bombs: usize) -> Self {
        assert!(rows > 0 && cols > 0, "board must have at least one cell");
        assert!(
            num_bombs < rows * cols,
            "bomb count must leave at least one safe cell"
        );
        Board {
            cells: vec![Cell::default(); rows * cols],
            rows,
            cols,
            num_bombs,
            game_over: false,
            game_won: false,
            first_move: true,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn num_bombs(&self) -> usize {
        self.num_bombs
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_game_won(&self) -> bool {
        self.game_won
    }

    /// Get the cell at a position, or `None` if out of bounds.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if row < self.rows && col < self.cols {
            Some(&self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    fn cell_mut(&mut self, row: usize, col: usize) -> &mut Cell {
        &mut self.cells[row * self.cols + col]
    }

    /// Number of flags currently on the board.
    pub fn flag_count(&self) -> usize {
        self.cells.iter().filter(|c| c.flagged).count()
    }

    /// Row-major coordinates of every hidden, unflagged cell.
    pub fn hidden_unflagged(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                let cell = &self.cells[row * self.cols + col];
                if !cell.revealed && !cell.flagged {
                    out.push((row, col));
                }
            }
        }
        out
    }

    fn neighbors(&self, row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> {
        let (rows, cols) = (self.rows as i32, self.cols as i32);
        let (row, col) = (row as i32, col as i32);
        (-1..=1)
            .flat_map(move |dr| (-1..=1).map(move |dc| (row + dr, col + dc)))
            .filter(move |&(r, c)| {
                (r, c) != (row, col) && r >= 0 && r < rows && c >= 0 && c < cols
            })
            .map(|(r, c)| (r as usize, c as usize))
    }

    /// Place bombs by rejection sampling, never on the first-clicked cell,
    /// then compute adjacency counts for all non-bomb cells.
    fn place_bombs<R: Rng>(&mut self, safe_row: usize, safe_col: usize, rng: &mut R) {
        let mut placed = 0;
        while placed < self.num_bombs {
            let row = rng.gen_range(0..self.rows);
            let col = rng.gen_range(0..self.cols);
            let cell = self.cell_mut(row, col);
            if !cell.bomb && (row, col) != (safe_row, safe_col) {
                cell.bomb = true;
                placed += 1;
            }
        }

        for row in 0..self.rows {
            for col in 0..self.cols {
                if self.cells[row * self.cols + col].bomb {
                    continue;
                }
                let count = self
                    .neighbors(row, col)
                    .filter(|&(r, c)| self.cells[r * self.cols + c].bomb)
                    .count();
                self.cell_mut(row, col).adjacent_bombs = count as u8;
            }
        }
    }

    /// Reveal a cell.
    ///
    /// The first reveal of a session places the bombs (excluding the clicked
    /// cell). No-op when the game is over, the coordinate is out of bounds,
    /// or the cell is already revealed or flagged. Revealing a bomb loses the
    /// game and discloses all bombs; revealing a zero-adjacency cell
    /// flood-fills its region.
    pub fn reveal<R: Rng>(&mut self, row: usize, col: usize, rng: &mut R) {
        if self.first_move {
            self.place_bombs(row, col, rng);
            self.first_move = false;
        }
        self.reveal_placed(row, col);
    }

    /// Reveal once bombs exist. Flood fill is an explicit queue rather than
    /// recursion so large boards cannot overflow the stack.
    fn reveal_placed(&mut self, row: usize, col: usize) {
        if self.game_over || row >= self.rows || col >= self.cols {
            return;
        }

        let mut queue = VecDeque::new();
        queue.push_back((row, col));

        while let Some((r, c)) = queue.pop_front() {
            let cell = self.cell_mut(r, c);
            if cell.revealed || cell.flagged {
                continue;
            }
            cell.revealed = true;

            if cell.bomb {
                self.game_over = true;
                self.reveal_all_bombs();
                return;
            }

            // Neighbors of a zero cell are never bombs, so expanding them is safe.
            if cell.adjacent_bombs == 0 {
                queue.extend(self.neighbors(r, c));
            }
        }

        self.check_win();
    }

    fn reveal_all_bombs(&mut self) {
        for cell in &mut self.cells {
            if cell.bomb {
                cell.revealed = true;
            }
        }
    }

    fn check_win(&mut self) {
        if self.cells.iter().any(|c| !c.bomb && !c.revealed) {
            return;
        }
        self.game_over = true;
        self.game_won = true;
    }

    /// Toggle the flag on a hidden cell. No-op when the game is over, the
    /// coordinate is out of bounds, or the cell is already revealed.
    pub fn toggle_flag(&mut self, row: usize, col: usize) {
        if self.game_over || row >= self.rows || col >= self.cols {
            return;
        }
        let cell = self.cell_mut(row, col);
        if !cell.revealed {
            cell.flagged = !cell.flagged;
        }
    }

    /// One deterministic deduction pass: for every revealed numbered cell
    /// whose hidden-neighbor count plus flagged-neighbor count equals its
    /// adjacency number, flag all of its hidden neighbors.
    pub fn auto_flag(&mut self) {
        if self.game_over {
            return;
        }
        for row in 0..self.rows {
            for col in 0..self.cols {
                let cell = self.cells[row * self.cols + col];
                if !cell.revealed || cell.adjacent_bombs == 0 {
                    continue;
                }

                let mut hidden = Vec::new();
                let mut flagged = 0usize;
                for (r, c) in self.neighbors(row, col) {
                    let n = self.cells[r * self.cols + c];
                    if n.flagged {
                        flagged += 1;
                    } else if !n.revealed {
                        hidden.push((r, c));
                    }
                }

                if hidden.len() + flagged == cell.adjacent_bombs as usize {
                    for (r, c) in hidden {
                        self.cell_mut(r, c).flagged = true;
                    }
                }
            }
        }
    }

    /// One deterministic deduction pass: for every revealed numbered cell
    /// whose flagged-neighbor count equals its adjacency number, reveal its
    /// remaining hidden neighbors. A wrong flag can make this reveal a bomb,
    /// which ends the game as a loss.
    pub fn auto_reveal(&mut self) {
        if self.game_over || self.first_move {
            return;
        }
        for row in 0..self.rows {
            for col in 0..self.cols {
                let cell = self.cells[row * self.cols + col];
                if !cell.revealed || cell.adjacent_bombs == 0 {
                    continue;
                }

                let flagged = self
                    .neighbors(row, col)
                    .filter(|&(r, c)| self.cells[r * self.cols + c].flagged)
                    .count();
                if flagged != cell.adjacent_bombs as usize {
                    continue;
                }

                let hidden: Vec<_> = self
                    .neighbors(row, col)
                    .filter(|&(r, c)| {
                        let n = self.cells[r * self.cols + c];
                        !n.revealed && !n.flagged
                    })
                    .collect();
                for (r, c) in hidden {
                    self.reveal_placed(r, c);
                    if self.game_over {
                        return;
                    }
                }
            }
        }
    }

    /// Encode the board as a network input vector, row-major.
    ///
    /// Revealed cell with adjacency `n` → `(n + 1) * 0.1`, flagged → 1.0,
    /// hidden → 0.0.
    pub fn to_feature_vector(&self) -> Vec<f64> {
        self.cells
            .iter()
            .map(|cell| {
                if cell.revealed {
                    (cell.adjacent_bombs as f64 + 1.0) * 0.1
                } else if cell.flagged {
                    1.0
                } else {
                    0.0
                }
            })
            .collect()
    }

    /// Encode the flag placements as a label vector, row-major: 1.0 where
    /// flagged, else 0.0. This is the solver's deduction, not the true bomb
    /// layout.
    pub fn to_flag_vector(&self) -> Vec<f64> {
        self.cells
            .iter()
            .map(|cell| if cell.flagged { 1.0 } else { 0.0 })
            .collect()
    }

    /// Build a board with an explicit bomb layout and adjacency counts
    /// already computed, as if the first reveal had happened.
    #[cfg(test)]
    pub fn with_bombs(rows: usize, cols: usize, bombs: &[(usize, usize)]) -> Self {
        let mut board = Board::new(rows, cols, bombs.len());
        for &(row, col) in bombs {
            board.cell_mut(row, col).bomb = true;
        }
        for row in 0..rows {
            for col in 0..cols {
                if board.cells[row * cols + col].bomb {
                    continue;
                }
                let count = board
                    .neighbors(row, col)
                    .filter(|&(r, c)| board.cells[r * cols + c].bomb)
                    .count();
                board.cell_mut(row, col).adjacent_bombs = count as u8;
            }
        }
        board.first_move = false;
        board
    }
}

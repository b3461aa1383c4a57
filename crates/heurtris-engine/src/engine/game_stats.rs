/// Game statistics tracking rows cleared and pieces placed.
///
/// # Example
///
/// ```
/// use heurtris_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_move(0);
/// stats.complete_move(4);
///
/// assert_eq!(stats.completed_pieces(), 2);
/// assert_eq!(stats.total_cleared_rows(), 4);
/// assert_eq!(stats.cleared_rows_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    completed_pieces: usize,
    total_cleared_rows: usize,
    cleared_rows_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            completed_pieces: 0,
            total_cleared_rows: 0,
            cleared_rows_counter: [0; 5],
        }
    }

    /// Returns the number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Returns the number of rows cleared so far.
    #[must_use]
    pub const fn total_cleared_rows(&self) -> usize {
        self.total_cleared_rows
    }

    /// Returns a histogram of moves by rows cleared.
    ///
    /// Index `n` counts the moves that cleared exactly `n` rows (0 to 4).
    #[must_use]
    pub const fn cleared_rows_counter(&self) -> &[usize; 5] {
        &self.cleared_rows_counter
    }

    /// Records a completed (non-terminal) move.
    pub const fn complete_move(&mut self, cleared_rows: usize) {
        self.completed_pieces += 1;
        self.total_cleared_rows += cleared_rows;
        if cleared_rows < self.cleared_rows_counter.len() {
            self.cleared_rows_counter[cleared_rows] += 1;
        }
    }
}

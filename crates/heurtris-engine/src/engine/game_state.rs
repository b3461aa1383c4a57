use crate::{
    ApplyMoveError,
    core::{
        board::Board,
        piece::{Move, PieceKind},
    },
};

use super::{GameStats, PieceGenerator, PieceSeed};

/// Authoritative state of a single game.
///
/// `GameState` applies chosen moves with the same physics as
/// [`Board::simulate`], tracks the loss flag and the cumulative number of
/// cleared rows, and draws the next piece after every move.
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    current_piece: PieceKind,
    generator: PieceGenerator,
    turn: u32,
    lost: bool,
    stats: GameStats,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Starts a game on an empty board with a random piece sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::from_generator(PieceGenerator::new())
    }

    /// Starts a game whose piece sequence is determined by `seed`.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::from_generator(PieceGenerator::with_seed(seed))
    }

    fn from_generator(mut generator: PieceGenerator) -> Self {
        let current_piece = generator.next_piece();
        Self {
            board: Board::EMPTY,
            current_piece,
            generator,
            turn: 0,
            lost: false,
            stats: GameStats::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The piece that the next move places.
    #[must_use]
    pub fn current_piece(&self) -> PieceKind {
        self.current_piece
    }

    /// Legal moves of the current piece, in enumeration order.
    #[must_use]
    pub fn legal_moves(&self) -> &'static [Move] {
        self.current_piece.legal_moves()
    }

    /// Number of moves attempted so far, including a final losing move.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    #[must_use]
    pub fn has_lost(&self) -> bool {
        self.lost
    }

    /// Total number of rows cleared in this game.
    #[must_use]
    pub fn rows_cleared(&self) -> usize {
        self.stats.total_cleared_rows()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Places the current piece with `mv` and advances the game.
    ///
    /// Returns the number of rows cleared by the move.
    ///
    /// # Errors
    ///
    /// - [`ApplyMoveError::IllegalMove`] if `mv` does not fit the current
    ///   piece; the state is left untouched.
    /// - [`ApplyMoveError::GameOver`] if the move overflows the board (the game
    ///   is lost from now on) or if the game was already lost.
    pub fn apply_move(&mut self, mv: Move) -> Result<usize, ApplyMoveError> {
        if self.lost {
            return Err(ApplyMoveError::GameOver);
        }
        if !self.current_piece.is_legal(mv) {
            return Err(ApplyMoveError::IllegalMove);
        }

        self.turn += 1;
        let placement = self.board.simulate(self.current_piece, mv, self.turn);
        if placement.is_terminal() {
            self.lost = true;
            return Err(ApplyMoveError::GameOver);
        }

        self.board = *placement.board();
        self.stats.complete_move(placement.cleared_rows());
        self.current_piece = self.generator.next_piece();
        Ok(placement.cleared_rows())
    }
}

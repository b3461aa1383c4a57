//! Board representation, piece geometry and drop physics.

pub use self::{board::*, piece::*};

pub(crate) mod board;
pub(crate) mod piece;

/// Number of columns of the board.
pub const BOARD_WIDTH: usize = 10;
/// Number of rows of the board, including the top row a piece may never reach.
pub const BOARD_HEIGHT: usize = 21;

//! Authoritative game runtime.
//!
//! This module owns the real game that the search plays against:
//!
//! - [`GameState`] - Board, current piece, loss flag and statistics
//! - [`GameStats`] - Pieces placed and rows cleared
//! - [`PieceGenerator`] - Uniform random piece sequence
//! - [`PieceSeed`] - Seed for deterministic piece generation
//!
//! # Game Flow
//!
//! 1. Create a [`GameState`] (optionally from a [`PieceSeed`])
//! 2. Choose one of [`GameState::legal_moves`] for [`GameState::current_piece`]
//! 3. Apply it with [`GameState::apply_move`]; rows are cleared and the next piece is drawn
//! 4. Repeat until the move overflows the board
//!
//! The runtime uses exactly the same physics as [`Board::simulate`](crate::Board::simulate),
//! so a search that simulates hypothetical moves predicts the real outcome.
//!
//! # Example
//!
//! ```
//! use heurtris_engine::GameState;
//!
//! let mut game = GameState::new();
//! while !game.has_lost() && game.turn() < 100 {
//!     let mv = game.legal_moves()[0];
//!     if game.apply_move(mv).is_err() {
//!         break;
//!     }
//! }
//! assert!(game.has_lost());
//! ```

pub use self::{game_state::*, game_stats::*, piece_generator::*};

mod game_state;
mod game_stats;
mod piece_generator;

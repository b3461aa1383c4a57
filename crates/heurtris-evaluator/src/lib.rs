//! Evaluator system for scoring Tetris moves and weight vectors.
//!
//! This crate implements a three-level evaluation architecture:
//!
//! 1. **Placement Evaluation** ([`placement_evaluator`]) - Scores a single simulated move
//!    as a weighted sum of board features.
//!
//! 2. **Turn Evaluation** ([`turn_evaluator`]) - Selects the move of the current piece,
//!    optionally looking one unknown piece ahead.
//!
//! 3. **Session Evaluation** ([`session_evaluator`]) - Plays full games with a weight
//!    vector and reduces them to a fitness score for training.
//!
//! # Architecture
//!
//! ```text
//! Session Evaluation (fitness for training)
//!     ↓ uses
//! Turn Evaluation (select best move)
//!     ↓ uses
//! Placement Evaluation (score single move)
//!     ↓ uses
//! Board Features (measure the resulting board)
//! ```
//!
//! # Supporting Modules
//!
//! - [`board_feature`] - The five board heuristics
//! - [`weights`] - Weight vectors, one signed coefficient per heuristic
//!
//! # Linear Evaluation Model
//!
//! Placement scores are a dot product of weights and raw feature values. Features
//! are not normalized or signed; the training algorithms learn the scale and sign
//! of every coefficient.

pub mod board_feature;
pub mod placement_evaluator;
pub mod session_evaluator;
pub mod turn_evaluator;
pub mod weights;

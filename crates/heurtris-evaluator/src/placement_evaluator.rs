//! Placement evaluation: scoring a single simulated move.
//!
//! This is the lowest level of the evaluator architecture. A move of the
//! current piece is simulated on a board snapshot and the resulting
//! [`SimulationNode`] carries a score under a [`PlacementEvaluator`].
//!
//! # Linear Weighted Sum
//!
//! [`LinearPlacementEvaluator`] scores a placement as
//!
//! ```text
//! score = w₀·complete_lines + w₁·aggregate_height + w₂·bumpiness + w₃·holes + w₄·well_sum
//! ```
//!
//! Weights are signed and learned; no sign is assumed for any feature.
//!
//! # Terminal Placements
//!
//! A move that overflows the board is never scored by the evaluator. Its node
//! gets [`TERMINAL_SCORE`], the lowest representable score, so it loses against
//! every non-terminal alternative. Non-terminal scores are kept strictly above
//! it, including scores that overflow to `-inf` or come out as NaN.

use std::fmt;

use heurtris_engine::{Board, Move, PieceKind, Placement};

use crate::{board_feature::BoardFeatures, weights::Weights};

/// Score of a move that ends the game.
pub const TERMINAL_SCORE: f64 = f64::MIN;

/// Evaluates non-terminal placements by assigning scores (higher is better).
pub trait PlacementEvaluator: fmt::Debug + Send + Sync {
    fn evaluate_placement(&self, placement: &Placement) -> f64;
}

/// Placement evaluator computing `weights · features`.
///
/// # Example
///
/// ```
/// use heurtris_engine::{Board, Move, PieceKind};
/// use heurtris_evaluator::{
///     placement_evaluator::{LinearPlacementEvaluator, PlacementEvaluator},
///     weights::Weights,
/// };
///
/// // penalize aggregate height only
/// let evaluator = LinearPlacementEvaluator::new(Weights::new([0.0, -1.0, 0.0, 0.0, 0.0]));
/// let placement = Board::EMPTY.simulate(PieceKind::O, Move::new(0, 4), 1);
/// assert_eq!(evaluator.evaluate_placement(&placement), -4.0);
/// ```
#[derive(Debug, Clone)]
pub struct LinearPlacementEvaluator {
    weights: Weights,
}

impl LinearPlacementEvaluator {
    #[must_use]
    pub fn new(weights: Weights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> &Weights {
        &self.weights
    }
}

impl PlacementEvaluator for LinearPlacementEvaluator {
    #[inline]
    fn evaluate_placement(&self, placement: &Placement) -> f64 {
        let features = BoardFeatures::from_board(placement.board(), placement.cleared_rows());
        self.weights.dot(&features)
    }
}

/// A simulated move together with its score.
#[derive(Debug, Clone, Copy)]
pub struct SimulationNode {
    placement: Placement,
    score: f64,
}

impl SimulationNode {
    /// Simulates `mv` of `kind` on `board` and scores the outcome.
    #[must_use]
    pub fn simulate<E>(board: &Board, kind: PieceKind, mv: Move, marker: u32, evaluator: &E) -> Self
    where
        E: PlacementEvaluator + ?Sized,
    {
        let placement = board.simulate(kind, mv, marker);
        let score = if placement.is_terminal() {
            TERMINAL_SCORE
        } else {
            // `max` also replaces NaN
            evaluator
                .evaluate_placement(&placement)
                .max(TERMINAL_SCORE.next_up())
        };
        Self { placement, score }
    }

    #[must_use]
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.placement.board()
    }

    #[must_use]
    pub fn cleared_rows(&self) -> usize {
        self.placement.cleared_rows()
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.placement.is_terminal()
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tall_left_column() -> Board {
        Board::from_ascii(&"#.........\n".repeat(18))
    }

    #[test]
    fn test_terminal_move_scores_minimum_and_keeps_board() {
        let board = tall_left_column();
        // every weight positive so any non-terminal score is large
        let evaluator = LinearPlacementEvaluator::new(Weights::new([1.0; 5]));

        let node = SimulationNode::simulate(&board, PieceKind::I, Move::new(0, 0), 7, &evaluator);
        assert!(node.is_terminal());
        assert_eq!(node.score(), TERMINAL_SCORE);
        assert_eq!(node.board(), &board);
        assert_eq!(node.cleared_rows(), 0);

        let node = SimulationNode::simulate(&board, PieceKind::O, Move::new(0, 4), 7, &evaluator);
        assert!(!node.is_terminal());
        assert!(node.score() > TERMINAL_SCORE);
    }

    #[test]
    fn test_terminal_loses_even_against_very_negative_weights() {
        let board = tall_left_column();
        let evaluator = LinearPlacementEvaluator::new(Weights::new([-1e300; 5]));
        let terminal = SimulationNode::simulate(&board, PieceKind::I, Move::new(0, 0), 1, &evaluator);
        let alive = SimulationNode::simulate(&board, PieceKind::I, Move::new(0, 5), 1, &evaluator);
        assert!(alive.score() > terminal.score());
    }

    #[test]
    fn test_overflowing_and_nan_scores_stay_above_terminal() {
        let board = tall_left_column();
        for weights in [
            Weights::new([0.0, -1e307, 0.0, 0.0, 0.0]),
            Weights::new([0.0, -f64::MAX, -f64::MAX, 0.0, 0.0]),
        ] {
            let evaluator = LinearPlacementEvaluator::new(weights);
            let alive = SimulationNode::simulate(&board, PieceKind::I, Move::new(0, 5), 1, &evaluator);
            assert_eq!(evaluator.evaluate_placement(alive.placement()), f64::NEG_INFINITY);
            assert!(!alive.is_terminal());
            assert!(alive.score() > TERMINAL_SCORE, "{weights:?}");
        }

        #[derive(Debug)]
        struct NanEvaluator;
        impl PlacementEvaluator for NanEvaluator {
            fn evaluate_placement(&self, _: &Placement) -> f64 {
                f64::NAN
            }
        }
        let alive = SimulationNode::simulate(&board, PieceKind::O, Move::new(0, 4), 1, &NanEvaluator);
        assert_eq!(alive.score(), TERMINAL_SCORE.next_up());
    }

    #[test]
    fn test_linear_score() {
        let evaluator = LinearPlacementEvaluator::new(Weights::new([10.0, -1.0, -0.5, -3.0, -0.25]));
        let board = Board::from_ascii(
            r"
            ##########
            ..........
            ",
        );
        // board has one full row that is not cleared by this move: the O piece
        // lands on top of it
        let node = SimulationNode::simulate(&board, PieceKind::O, Move::new(0, 0), 2, &evaluator);
        assert_eq!(node.cleared_rows(), 0);
        // tops [4, 4, 2, 2, ...]: height 4 + 4 + 8 * 2 = 24, bumpiness 2,
        // holes 10 (row 0), no wells
        let expected = -24.0 - 0.5 * 2.0 - 3.0 * 10.0;
        assert!((node.score() - expected).abs() < 1e-12);
    }
}

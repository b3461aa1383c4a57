//! Turn evaluation: selecting the move for the current piece.
//!
//! This module implements the second level of the evaluator architecture: every
//! legal move of the current piece is simulated, scored, and the highest-scoring
//! one is chosen.
//!
//! # Search Depth
//!
//! [`Lookahead::OnePly`] scores each move by its own [`SimulationNode`].
//!
//! [`Lookahead::TwoPly`] also considers the piece after the current one. Since it
//! is unknown when the decision is made, every candidate board is expanded with
//! each of the seven piece kinds; for each kind the best one-ply score over its
//! legal moves is kept, and the seven best scores are averaged uniformly:
//!
//! ```text
//! score(m) = Σₖ max_{m'} score(simulate(simulate(board, m), k, m')) / 7
//! ```
//!
//! This costs `moves × 7 × moves` simulations (up to about 7,000) per decision.
//!
//! # Determinism
//!
//! Moves are visited in enumeration order and a later move replaces the current
//! best only when its score is strictly greater, so ties go to the first move.
//!
//! # Usage
//!
//! ```
//! use heurtris_engine::GameState;
//! use heurtris_evaluator::{
//!     turn_evaluator::{Lookahead, TurnEvaluator},
//!     weights::Weights,
//! };
//!
//! let weights = Weights::new([0.76, -0.51, -0.18, -0.36, -0.1]);
//! let evaluator = TurnEvaluator::linear(weights, Lookahead::OnePly);
//!
//! let mut game = GameState::new();
//! let stats = evaluator.play_session(&mut game, 20);
//! assert!(stats.completed_pieces() <= 20);
//! ```

use heurtris_engine::{Board, GameState, GameStats, Move, PieceKind};
use serde::{Deserialize, Serialize};

use crate::{
    placement_evaluator::{
        LinearPlacementEvaluator, PlacementEvaluator, SimulationNode, TERMINAL_SCORE,
    },
    weights::Weights,
};

// Hypothetical cells only need to be distinguishable from empty ones.
const SIMULATED_CELL: u32 = u32::MAX;

/// Search depth of the move selector.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Lookahead {
    /// Score each move by the board it produces.
    #[display("one-ply")]
    OnePly,
    /// Average the best follow-up over all seven possible next pieces.
    #[default]
    #[display("two-ply")]
    TwoPly,
}

/// The move chosen for a turn and the score it was chosen with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveChoice {
    mv: Move,
    score: f64,
}

impl MoveChoice {
    #[must_use]
    pub fn mv(&self) -> Move {
        self.mv
    }

    /// One-ply or averaged two-ply score, depending on the search depth.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }
}

/// Evaluates and selects the best move for the current piece.
#[derive(Debug)]
pub struct TurnEvaluator<'a> {
    placement_evaluator: Box<dyn PlacementEvaluator + 'a>,
    lookahead: Lookahead,
}

impl<'a> TurnEvaluator<'a> {
    /// Creates a new turn evaluator with the given placement evaluator.
    #[must_use]
    pub fn new(placement_evaluator: Box<dyn PlacementEvaluator + 'a>, lookahead: Lookahead) -> Self {
        Self {
            placement_evaluator,
            lookahead,
        }
    }

    /// Creates a turn evaluator scoring boards with `weights · features`.
    #[must_use]
    pub fn linear(weights: Weights, lookahead: Lookahead) -> Self {
        Self::new(Box::new(LinearPlacementEvaluator::new(weights)), lookahead)
    }

    #[must_use]
    pub fn lookahead(&self) -> Lookahead {
        self.lookahead
    }

    /// Selects the best move of `kind` on `board`.
    ///
    /// Always returns a move. When every move ends the game, the first one is
    /// returned with [`TERMINAL_SCORE`].
    #[must_use]
    pub fn select_best_move(&self, board: &Board, kind: PieceKind) -> MoveChoice {
        let mut best: Option<MoveChoice> = None;
        for &mv in kind.legal_moves() {
            let node = self.simulate(board, kind, mv);
            let score = match self.lookahead {
                Lookahead::OnePly => node.score(),
                Lookahead::TwoPly => self.lookahead_score(&node),
            };
            if best.is_none_or(|b| score > b.score) {
                best = Some(MoveChoice { mv, score });
            }
        }
        // every piece kind has at least nine legal moves
        best.unwrap_or(MoveChoice {
            mv: kind.legal_moves()[0],
            score: TERMINAL_SCORE,
        })
    }

    /// Plays `game` until it is lost or `turn_limit` moves have been made.
    pub fn play_session(&self, game: &mut GameState, turn_limit: usize) -> GameStats {
        for _ in 0..turn_limit {
            let choice = self.select_best_move(game.board(), game.current_piece());
            if game.apply_move(choice.mv()).is_err() {
                break;
            }
        }
        game.stats().clone()
    }

    fn simulate(&self, board: &Board, kind: PieceKind, mv: Move) -> SimulationNode {
        SimulationNode::simulate(
            board,
            kind,
            mv,
            SIMULATED_CELL,
            self.placement_evaluator.as_ref(),
        )
    }

    /// Expected best one-ply score of the next piece on `node`'s board.
    fn lookahead_score(&self, node: &SimulationNode) -> f64 {
        if node.is_terminal() {
            return TERMINAL_SCORE;
        }
        #[expect(clippy::cast_precision_loss)]
        let kinds = PieceKind::LEN as f64;
        let average: f64 = PieceKind::ALL
            .iter()
            .map(|&kind| {
                let best = kind
                    .legal_moves()
                    .iter()
                    .map(|&mv| self.simulate(node.board(), kind, mv).score())
                    .fold(TERMINAL_SCORE, f64::max);
                best / kinds
            })
            .sum();
        // surviving this turn always beats losing now
        average.max(TERMINAL_SCORE.next_up())
    }
}

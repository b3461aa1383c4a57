//! Session evaluation: fitness of a weight vector.
//!
//! This module implements the third level of the evaluator architecture. A
//! weight vector is used to play several complete games, and its fitness is the
//! mean number of rows cleared per game:
//!
//! ```text
//! fitness = Σ rows_cleared(game) / games_per_trial
//! ```
//!
//! # Concurrency
//!
//! [`DefaultSessionEvaluator`] plays every game of a trial on its own scoped
//! thread. Each thread owns its [`GameState`] and hands its [`SessionOutcome`]
//! back through the join handle; the calling thread joins all handles and
//! reduces them. Nothing is shared mutably between games, so the result is the
//! same as playing the games one after another with the same seeds.
//!
//! # Move Cap
//!
//! Games stop after `turn_limit` moves even if they are not lost. Strong weight
//! vectors would otherwise play for a very long time. The rows cleared up to the
//! cap still count as fitness; the outcome is only flagged as truncated.
//!
//! # Usage
//!
//! ```
//! use heurtris_engine::PieceSeed;
//! use heurtris_evaluator::{
//!     session_evaluator::{DefaultSessionEvaluator, SessionEvaluator},
//!     turn_evaluator::Lookahead,
//!     weights::Weights,
//! };
//!
//! let evaluator = DefaultSessionEvaluator::new(4, 200, Lookahead::OnePly);
//! let weights = Weights::new([0.76, -0.51, -0.18, -0.36, -0.1]);
//!
//! let fitness = evaluator.evaluate_fitness(&weights);
//! assert!(fitness >= 0.0);
//!
//! // explicit seeds make a trial reproducible
//! let seeds = [PieceSeed::from(1), PieceSeed::from(2)];
//! assert_eq!(
//!     evaluator.evaluate_fitness_with_seeds(&weights, &seeds),
//!     evaluator.evaluate_fitness_with_seeds(&weights, &seeds),
//! );
//! ```

use std::{fmt, panic, thread};

use heurtris_engine::{GameState, PieceSeed};
use rand::Rng as _;
use serde::{Deserialize, Serialize};

use crate::{
    turn_evaluator::{Lookahead, TurnEvaluator},
    weights::Weights,
};

/// Evaluates weight vectors by playing games.
///
/// Used by the training algorithms as their objective function.
pub trait SessionEvaluator: fmt::Debug + Send + Sync {
    /// Returns the fitness of `weights` (higher is better).
    fn evaluate_fitness(&self, weights: &Weights) -> f64;
}

/// Result of a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    rows_cleared: usize,
    pieces_placed: usize,
    truncated: bool,
}

impl SessionOutcome {
    #[must_use]
    pub fn rows_cleared(&self) -> usize {
        self.rows_cleared
    }

    #[must_use]
    pub fn pieces_placed(&self) -> usize {
        self.pieces_placed
    }

    /// Whether the game was stopped by the move cap instead of being lost.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

/// Default session evaluator: mean rows cleared over concurrently played games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultSessionEvaluator {
    games_per_trial: usize,
    turn_limit: usize,
    lookahead: Lookahead,
}

impl Default for DefaultSessionEvaluator {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_GAMES_PER_TRIAL,
            Self::DEFAULT_TURN_LIMIT,
            Lookahead::default(),
        )
    }
}

impl DefaultSessionEvaluator {
    pub const DEFAULT_GAMES_PER_TRIAL: usize = 8;
    pub const DEFAULT_TURN_LIMIT: usize = 5_000;

    /// Creates a new session evaluator.
    ///
    /// # Arguments
    ///
    /// * `games_per_trial` - Number of games played per fitness evaluation
    /// * `turn_limit` - Maximum number of moves per game
    /// * `lookahead` - Search depth of the move selector
    ///
    /// # Panics
    ///
    /// Panics if `games_per_trial` is zero.
    #[must_use]
    pub fn new(games_per_trial: usize, turn_limit: usize, lookahead: Lookahead) -> Self {
        assert!(games_per_trial > 0, "at least one game per trial is required");
        Self {
            games_per_trial,
            turn_limit,
            lookahead,
        }
    }

    #[must_use]
    pub fn games_per_trial(&self) -> usize {
        self.games_per_trial
    }

    #[must_use]
    pub fn turn_limit(&self) -> usize {
        self.turn_limit
    }

    #[must_use]
    pub fn lookahead(&self) -> Lookahead {
        self.lookahead
    }

    /// Plays one game from `seed` with `weights`.
    #[must_use]
    pub fn play_session(&self, weights: &Weights, seed: PieceSeed) -> SessionOutcome {
        let turn_evaluator = TurnEvaluator::linear(*weights, self.lookahead);
        let mut game = GameState::with_seed(seed);
        let stats = turn_evaluator.play_session(&mut game, self.turn_limit);
        let outcome = SessionOutcome {
            rows_cleared: stats.total_cleared_rows(),
            pieces_placed: stats.completed_pieces(),
            truncated: !game.has_lost(),
        };
        if outcome.truncated {
            tracing::debug!(
                %seed,
                turn_limit = self.turn_limit,
                rows_cleared = outcome.rows_cleared,
                "game reached the move cap"
            );
        }
        outcome
    }

    /// Plays one game per seed, concurrently, and returns the outcomes in seed order.
    ///
    /// # Panics
    ///
    /// A panic in any game is propagated to the caller.
    #[must_use]
    pub fn play_sessions(&self, weights: &Weights, seeds: &[PieceSeed]) -> Vec<SessionOutcome> {
        thread::scope(|s| {
            let handles: Vec<_> = seeds
                .iter()
                .map(|&seed| s.spawn(move || self.play_session(weights, seed)))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|e| panic::resume_unwind(e)))
                .collect()
        })
    }

    /// Mean rows cleared over one game per seed.
    ///
    /// Returns 0.0 when `seeds` is empty.
    #[must_use]
    pub fn evaluate_fitness_with_seeds(&self, weights: &Weights, seeds: &[PieceSeed]) -> f64 {
        let outcomes = self.play_sessions(weights, seeds);
        mean_rows_cleared(&outcomes)
    }
}

impl SessionEvaluator for DefaultSessionEvaluator {
    fn evaluate_fitness(&self, weights: &Weights) -> f64 {
        let mut rng = rand::rng();
        let seeds: Vec<PieceSeed> = (0..self.games_per_trial).map(|_| rng.random()).collect();
        self.evaluate_fitness_with_seeds(weights, &seeds)
    }
}

#[expect(clippy::cast_precision_loss)]
fn mean_rows_cleared(outcomes: &[SessionOutcome]) -> f64 {
    if outcomes.is_empty() {
        return 0.0;
    }
    let total: usize = outcomes.iter().map(SessionOutcome::rows_cleared).sum();
    total as f64 / outcomes.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_WEIGHTS: Weights = Weights::new([0.760_666, -0.510_066, -0.184_483, -0.356_630, -0.1]);
    const TALL_WEIGHTS: Weights = Weights::new([-1.0, 1.0, 0.0, 0.0, 0.0]);

    fn seeds(n: u128) -> Vec<PieceSeed> {
        (0..n).map(PieceSeed::from).collect()
    }

    #[test]
    fn test_concurrent_trial_matches_sequential_games() {
        let evaluator = DefaultSessionEvaluator::new(4, 300, Lookahead::OnePly);
        let seeds = seeds(4);
        let concurrent = evaluator.play_sessions(&GOOD_WEIGHTS, &seeds);
        let sequential: Vec<_> = seeds
            .iter()
            .map(|&seed| evaluator.play_session(&GOOD_WEIGHTS, seed))
            .collect();
        assert_eq!(concurrent, sequential);
    }

    #[test]
    fn test_fitness_is_mean_rows_cleared() {
        let evaluator = DefaultSessionEvaluator::new(3, 200, Lookahead::OnePly);
        let seeds = seeds(3);
        let outcomes = evaluator.play_sessions(&GOOD_WEIGHTS, &seeds);
        let total: usize = outcomes.iter().map(SessionOutcome::rows_cleared).sum();
        #[expect(clippy::cast_precision_loss)]
        let expected = total as f64 / 3.0;
        let fitness = evaluator.evaluate_fitness_with_seeds(&GOOD_WEIGHTS, &seeds);
        assert!((fitness - expected).abs() < 1e-12);
        assert!(fitness > 0.0, "good weights should clear rows in 200 moves");
    }

    #[test]
    fn test_move_cap_truncates_games() {
        let evaluator = DefaultSessionEvaluator::new(2, 40, Lookahead::OnePly);
        for outcome in evaluator.play_sessions(&GOOD_WEIGHTS, &seeds(2)) {
            assert!(outcome.is_truncated());
            assert_eq!(outcome.pieces_placed(), 40);
        }
    }

    #[test]
    fn test_lost_games_are_not_truncated() {
        let evaluator = DefaultSessionEvaluator::new(2, 10_000, Lookahead::OnePly);
        for outcome in evaluator.play_sessions(&TALL_WEIGHTS, &seeds(2)) {
            assert!(!outcome.is_truncated());
            assert!(outcome.pieces_placed() < 10_000);
        }
    }

    #[test]
    fn test_empty_trial_has_zero_fitness() {
        let evaluator = DefaultSessionEvaluator::default();
        assert_eq!(evaluator.evaluate_fitness_with_seeds(&GOOD_WEIGHTS, &[]), 0.0);
    }

    #[test]
    fn test_evaluate_fitness_uses_fresh_games() {
        let evaluator = DefaultSessionEvaluator::new(2, 30, Lookahead::OnePly);
        let fitness = evaluator.evaluate_fitness(&GOOD_WEIGHTS);
        assert!(fitness.is_finite());
        assert!(fitness >= 0.0);
    }
}

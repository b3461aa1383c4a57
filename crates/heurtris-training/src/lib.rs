//! Training system for tuning evaluator weight vectors.
//!
//! This crate searches the space of weight vectors used by the linear board
//! evaluation (`heurtris-evaluator`). Both algorithms treat a
//! [`SessionEvaluator`](heurtris_evaluator::session_evaluator::SessionEvaluator)
//! as a black-box objective: a weight vector goes in, its fitness (mean rows
//! cleared over several games) comes out.
//!
//! # Algorithms
//!
//! - [`genetic`] - Steady-state genetic algorithm: offspring are bred from the
//!   two fittest members of a random sample and compete with the existing
//!   population until a purge truncates it back to its target size.
//! - [`hill_climbing`] - Coordinate ascent: try `±delta` on every coefficient,
//!   move on improvement, otherwise shrink `delta`.
//!
//! # Architecture
//!
//! ```text
//! Genetic Algorithm / Hill Climber
//!     ↓ evolves
//! Weights (one coefficient per board feature)
//!     ↓ scored by
//! Session Evaluator (plays games concurrently)
//!     ↓ produces
//! Fitness (mean rows cleared)
//!     ↓ guides
//! Selection
//! ```
//!
//! Weight operations shared by the algorithms live in [`weights`].

pub mod genetic;
pub mod hill_climbing;
pub mod weights;

/// Invalid training configuration, detected before any game is played.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum InvalidParamsError {
    #[display("population size must be at least 2, got {size}")]
    PopulationTooSmall { size: usize },
    #[display("{name} must be in (0, 1], got {value}")]
    FractionOutOfRange { name: &'static str, value: f64 },
    #[display("sample of {size} individuals cannot provide two parents")]
    SampleTooSmall { size: usize },
    #[display("mutation chance must be in [0, 1], got {value}")]
    MutationChanceOutOfRange { value: f64 },
    #[display("{name} must be finite and non-negative, got {value}")]
    NegativeOrNonFinite { name: &'static str, value: f64 },
    #[display("minimum delta must be positive, got {value}")]
    MinDeltaNotPositive { value: f64 },
    #[display("delta decay must be in (0, 1), got {value}")]
    DeltaDecayOutOfRange { value: f64 },
}

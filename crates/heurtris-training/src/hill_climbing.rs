//! Coordinate ascent over weight vectors.
//!
//! Starting from a random vector, every step evaluates the `2 × LEN`
//! neighbours obtained by adding `+delta` to each coefficient and then `-delta`
//! to each coefficient. The climber moves to the best neighbour if it is
//! strictly fitter than the current vector; otherwise `delta` is scaled by
//! `delta_decay`. The search ends after `iteration_limit` steps or once `delta`
//! falls below `min_delta`.
//!
//! All mutable search state lives in [`HillClimbState`], which the caller owns
//! and passes to [`HillClimber::step`].

use heurtris_evaluator::{session_evaluator::SessionEvaluator, weights::Weights};
use rand::Rng;
use rand_distr::Uniform;
use serde::{Deserialize, Serialize};

use crate::{InvalidParamsError, weights};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HillClimbParams {
    /// Number of steps to run; `None` runs until `delta` drops below `min_delta`.
    pub iteration_limit: Option<usize>,
    pub initial_delta: f64,
    /// Factor applied to `delta` after a step without improvement.
    pub delta_decay: f64,
    pub min_delta: f64,
}

impl Default for HillClimbParams {
    fn default() -> Self {
        Self {
            iteration_limit: Some(100),
            initial_delta: 0.1,
            delta_decay: 0.5,
            min_delta: 1e-4,
        }
    }
}

impl HillClimbParams {
    /// Checks that the parameters describe a terminating search step.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidParamsError`] if a delta is negative or not finite,
    /// if `min_delta` is zero, or if `delta_decay` is outside `(0, 1)`.
    pub fn validate(&self) -> Result<(), InvalidParamsError> {
        for (name, value) in [
            ("initial delta", self.initial_delta),
            ("minimum delta", self.min_delta),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(InvalidParamsError::NegativeOrNonFinite { name, value });
            }
        }
        // a decaying delta never drops below zero
        if self.min_delta <= 0.0 {
            return Err(InvalidParamsError::MinDeltaNotPositive {
                value: self.min_delta,
            });
        }
        if !(self.delta_decay > 0.0 && self.delta_decay < 1.0) {
            return Err(InvalidParamsError::DeltaDecayOutOfRange {
                value: self.delta_decay,
            });
        }
        Ok(())
    }
}

/// Position of the climber.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HillClimbState {
    current: Weights,
    fitness: f64,
    delta: f64,
    iteration: usize,
}

impl HillClimbState {
    #[must_use]
    pub fn current(&self) -> &Weights {
        &self.current
    }

    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    #[must_use]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Number of completed steps.
    #[must_use]
    pub fn iteration(&self) -> usize {
        self.iteration
    }
}

/// What a single [`HillClimber::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::IsVariant)]
pub enum ClimbEvent {
    /// Moved to the neighbour at `neighbour` (index into [`neighbours`]).
    Moved { neighbour: usize, fitness: f64 },
    /// No neighbour was fitter; `delta` shrank.
    DeltaReduced { delta: f64 },
}

/// Vectors differing from `current` by `delta` in one coefficient.
///
/// The first `LEN` entries add `delta` to coefficient 0, 1, ...; the remaining
/// entries subtract it in the same order.
///
/// ```
/// use heurtris_evaluator::weights::Weights;
/// use heurtris_training::hill_climbing::neighbours;
///
/// let n = neighbours(&Weights::default(), 0.5);
/// assert_eq!(n[1], Weights::new([0.0, 0.5, 0.0, 0.0, 0.0]));
/// assert_eq!(n[Weights::LEN + 1], Weights::new([0.0, -0.5, 0.0, 0.0, 0.0]));
/// ```
#[must_use]
pub fn neighbours(current: &Weights, delta: f64) -> [Weights; 2 * Weights::LEN] {
    std::array::from_fn(|i| {
        let mut neighbour = *current;
        let step = if i < Weights::LEN { delta } else { -delta };
        neighbour.as_mut_array()[i % Weights::LEN] += step;
        neighbour
    })
}

/// Coordinate-ascent search driving a [`SessionEvaluator`].
#[derive(Debug)]
pub struct HillClimber<'a, E: ?Sized> {
    params: HillClimbParams,
    evaluator: &'a E,
    coefficient: Uniform<f64>,
}

impl<'a, E> HillClimber<'a, E>
where
    E: SessionEvaluator + ?Sized,
{
    /// # Errors
    ///
    /// Returns an [`InvalidParamsError`] if `params` fail [`HillClimbParams::validate`].
    pub fn new(params: HillClimbParams, evaluator: &'a E) -> Result<Self, InvalidParamsError> {
        params.validate()?;
        let coefficient =
            Uniform::new_inclusive(-1.0, 1.0).expect("constant coefficient range is valid");
        Ok(Self {
            params,
            evaluator,
            coefficient,
        })
    }

    #[must_use]
    pub fn params(&self) -> &HillClimbParams {
        &self.params
    }

    /// Starts from a vector with coefficients uniform in `[-1, 1]`.
    pub fn init<R>(&self, rng: &mut R) -> HillClimbState
    where
        R: Rng + ?Sized,
    {
        self.start_at(weights::random(rng, &self.coefficient))
    }

    /// Starts from `weights`, evaluating it once.
    #[must_use]
    pub fn start_at(&self, weights: Weights) -> HillClimbState {
        HillClimbState {
            current: weights,
            fitness: self.evaluator.evaluate_fitness(&weights),
            delta: self.params.initial_delta,
            iteration: 0,
        }
    }

    #[must_use]
    pub fn is_finished(&self, state: &HillClimbState) -> bool {
        state.delta < self.params.min_delta
            || self
                .params
                .iteration_limit
                .is_some_and(|limit| state.iteration >= limit)
    }

    /// Evaluates every neighbour of `state` and moves or shrinks `delta`.
    ///
    /// Among equally fit neighbours the first one wins.
    pub fn step(&self, state: &mut HillClimbState) -> ClimbEvent {
        let mut best: Option<(usize, Weights, f64)> = None;
        for (i, neighbour) in neighbours(&state.current, state.delta)
            .into_iter()
            .enumerate()
        {
            let fitness = self.evaluator.evaluate_fitness(&neighbour);
            if best.is_none_or(|(_, _, best_fitness)| fitness > best_fitness) {
                best = Some((i, neighbour, fitness));
            }
        }

        state.iteration += 1;
        let event = match best {
            Some((neighbour, weights, fitness)) if fitness > state.fitness => {
                state.current = weights;
                state.fitness = fitness;
                ClimbEvent::Moved { neighbour, fitness }
            }
            _ => {
                state.delta *= self.params.delta_decay;
                ClimbEvent::DeltaReduced { delta: state.delta }
            }
        };
        tracing::info!(
            iteration = state.iteration,
            fitness = state.fitness,
            delta = state.delta,
            moved = event.is_moved(),
            weights = ?state.current.as_array(),
            "hill climb step"
        );
        event
    }

    /// Steps from `state` until [`is_finished`](Self::is_finished).
    pub fn climb<F>(&self, mut state: HillClimbState, mut on_step: F) -> HillClimbState
    where
        F: FnMut(&HillClimbState, &ClimbEvent),
    {
        while !self.is_finished(&state) {
            let event = self.step(&mut state);
            on_step(&state, &event);
        }
        state
    }

    /// Starts from a random vector and climbs until finished.
    pub fn run<R, F>(&self, rng: &mut R, on_step: F) -> HillClimbState
    where
        R: Rng + ?Sized,
        F: FnMut(&HillClimbState, &ClimbEvent),
    {
        let state = self.init(rng);
        self.climb(state, on_step)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    /// Fitness is the negated squared distance to `target`.
    #[derive(Debug)]
    struct DistanceEvaluator {
        target: Weights,
        calls: AtomicUsize,
    }

    impl DistanceEvaluator {
        fn new(target: [f64; Weights::LEN]) -> Self {
            Self {
                target: Weights::new(target),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl SessionEvaluator for DistanceEvaluator {
        fn evaluate_fitness(&self, weights: &Weights) -> f64 {
            self.calls.fetch_add(1, Ordering::Relaxed);
            -self
                .target
                .as_array()
                .iter()
                .zip(weights.as_array())
                .map(|(t, w)| (t - w).powi(2))
                .sum::<f64>()
        }
    }

    #[test]
    fn test_neighbour_order() {
        let current = Weights::new([1.0, 2.0, 3.0, 4.0, 5.0]);
        let n = neighbours(&current, 0.5);
        assert_eq!(n.len(), 10);
        assert_eq!(n[0], Weights::new([1.5, 2.0, 3.0, 4.0, 5.0]));
        assert_eq!(n[4], Weights::new([1.0, 2.0, 3.0, 4.0, 5.5]));
        assert_eq!(n[5], Weights::new([0.5, 2.0, 3.0, 4.0, 5.0]));
        assert_eq!(n[9], Weights::new([1.0, 2.0, 3.0, 4.0, 4.5]));
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        let base = HillClimbParams::default();
        assert_eq!(base.validate(), Ok(()));
        let cases = [
            HillClimbParams {
                initial_delta: -0.1,
                ..base
            },
            HillClimbParams {
                min_delta: f64::NAN,
                ..base
            },
            HillClimbParams {
                iteration_limit: None,
                min_delta: 0.0,
                ..base
            },
            HillClimbParams {
                min_delta: -0.0,
                ..base
            },
            HillClimbParams {
                delta_decay: 1.0,
                ..base
            },
            HillClimbParams {
                delta_decay: 0.0,
                ..base
            },
        ];
        let evaluator = DistanceEvaluator::new([0.0; 5]);
        for params in cases {
            assert!(params.validate().is_err(), "{params:?} must be rejected");
            assert!(HillClimber::new(params, &evaluator).is_err());
        }
        assert_eq!(evaluator.calls.load(Ordering::Relaxed), 0);
        assert_eq!(
            HillClimbParams {
                min_delta: 0.0,
                ..base
            }
            .validate(),
            Err(InvalidParamsError::MinDeltaNotPositive { value: 0.0 })
        );
    }

    #[test]
    fn test_step_moves_on_improvement() {
        let evaluator = DistanceEvaluator::new([1.0, 0.0, 0.0, 0.0, 0.0]);
        let climber = HillClimber::new(HillClimbParams::default(), &evaluator).unwrap();
        let mut state = climber.start_at(Weights::default());
        assert_eq!(state.fitness(), -1.0);

        let event = climber.step(&mut state);
        assert_eq!(
            event,
            ClimbEvent::Moved {
                neighbour: 0,
                fitness: state.fitness()
            }
        );
        assert_eq!(state.current(), &Weights::new([0.1, 0.0, 0.0, 0.0, 0.0]));
        assert!(state.fitness() > -1.0);
        assert_eq!(state.delta(), 0.1);
        assert_eq!(state.iteration(), 1);
        assert_eq!(evaluator.calls.load(Ordering::Relaxed), 11);
    }

    #[test]
    fn test_step_shrinks_delta_at_optimum() {
        let target = [0.5, -0.5, 0.25, -0.25, 0.0];
        let evaluator = DistanceEvaluator::new(target);
        let climber = HillClimber::new(HillClimbParams::default(), &evaluator).unwrap();
        let mut state = climber.start_at(Weights::new(target));

        let event = climber.step(&mut state);
        assert_eq!(event, ClimbEvent::DeltaReduced { delta: 0.05 });
        assert_eq!(state.current(), &Weights::new(target));
        assert_eq!(state.fitness(), 0.0);
        assert_eq!(state.iteration(), 1);
    }

    #[test]
    fn test_climb_stops_below_min_delta() {
        let target = [0.5, -0.5, 0.25, -0.25, 0.0];
        let evaluator = DistanceEvaluator::new(target);
        let params = HillClimbParams {
            iteration_limit: None,
            initial_delta: 0.1,
            delta_decay: 0.5,
            min_delta: 0.01,
        };
        let climber = HillClimber::new(params, &evaluator).unwrap();
        let mut deltas = vec![];
        let state = climber.climb(climber.start_at(Weights::new(target)), |state, event| {
            assert!(event.is_delta_reduced());
            deltas.push(state.delta());
        });
        assert_eq!(deltas, [0.05, 0.025, 0.0125, 0.00625]);
        assert_eq!(state.iteration(), 4);
        assert!(climber.is_finished(&state));
    }

    #[test]
    fn test_run_respects_iteration_limit() {
        let evaluator = DistanceEvaluator::new([0.3, -0.7, 0.1, -0.2, 0.4]);
        let params = HillClimbParams {
            iteration_limit: Some(5),
            ..HillClimbParams::default()
        };
        let climber = HillClimber::new(params, &evaluator).unwrap();
        let mut rng = Pcg32::seed_from_u64(1);

        let mut fitness = vec![];
        let state = climber.run(&mut rng, |state, _| fitness.push(state.fitness()));
        assert_eq!(state.iteration(), 5);
        assert_eq!(fitness.len(), 5);
        assert!(fitness.is_sorted(), "fitness never decreases");
        assert_eq!(evaluator.calls.load(Ordering::Relaxed), 1 + 5 * 10);
    }

    #[test]
    fn test_initial_vector_in_range() {
        let evaluator = DistanceEvaluator::new([0.0; 5]);
        let climber = HillClimber::new(HillClimbParams::default(), &evaluator).unwrap();
        let mut rng = Pcg32::seed_from_u64(2);
        for _ in 0..20 {
            let state = climber.init(&mut rng);
            assert!(state.current().as_array().iter().all(|w| (-1.0..=1.0).contains(w)));
            assert_eq!(state.delta(), 0.1);
            assert_eq!(state.iteration(), 0);
        }
    }
}

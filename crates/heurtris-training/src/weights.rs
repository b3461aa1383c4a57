//! Weight vector operations for the training algorithms.
//!
//! - **Initialization**: [`random`] and [`random_unit`] draw coefficients uniformly
//! - **Crossover**: [`crossover`] combines two parents weighted by their fitness
//! - **Mutation**: [`mutate`] perturbs a single coefficient
//! - **Normalization**: [`normalize_l2`] scales a vector to unit length
//!
//! # Fitness-Weighted Crossover
//!
//! A child is the sum of both parents' vectors, each scaled by that parent's
//! fitness:
//!
//! ```text
//! child[i] = a.weights[i] × a.fitness + b.weights[i] × b.fitness
//! ```
//!
//! The fitter parent dominates the direction of the child. Only the direction
//! matters for move selection, so the child is normalized afterwards.
//!
//! # L2 Normalization
//!
//! Scaling a weight vector by a positive constant does not change which move
//! scores highest. Keeping every genome at unit length removes that redundancy
//! and keeps crossover sums comparable across generations.

use heurtris_evaluator::weights::Weights;
use rand::Rng;
use rand_distr::Uniform;

/// Generates a weight vector with each coefficient drawn from `coefficient`.
pub fn random<R>(rng: &mut R, coefficient: &Uniform<f64>) -> Weights
where
    R: Rng + ?Sized,
{
    Weights::new(std::array::from_fn(|_| rng.sample(coefficient)))
}

/// Generates a random weight vector of unit length.
///
/// Vectors that cannot be normalized (all coefficients zero) are redrawn.
pub fn random_unit<R>(rng: &mut R, coefficient: &Uniform<f64>) -> Weights
where
    R: Rng + ?Sized,
{
    loop {
        let mut weights = random(rng, coefficient);
        if normalize_l2(&mut weights) {
            return weights;
        }
    }
}

/// Scales `weights` to unit Euclidean length.
///
/// Returns `false` and leaves the vector unchanged if its length is zero or
/// not finite.
pub fn normalize_l2(weights: &mut Weights) -> bool {
    let norm = weights.norm();
    if norm == 0.0 || !norm.is_finite() {
        return false;
    }
    for w in weights.as_mut_array() {
        *w /= norm;
    }
    true
}

/// Fitness-weighted combination of two parents, normalized to unit length.
///
/// If the weighted sum has zero length (for example when both parents have
/// zero fitness), the unweighted sum is used instead, and if that is zero too
/// the child is a copy of parent `a`.
///
/// # Example
///
/// ```
/// use heurtris_evaluator::weights::Weights;
/// use heurtris_training::weights;
///
/// let a = Weights::new([1.0, 0.0, 0.0, 0.0, 0.0]);
/// let b = Weights::new([0.0, 1.0, 0.0, 0.0, 0.0]);
/// let child = weights::crossover((&a, 10.0), (&b, 5.0));
///
/// let norm = 125.0_f64.sqrt();
/// assert!((child.as_array()[0] - 10.0 / norm).abs() < 1e-12);
/// assert!((child.as_array()[1] - 5.0 / norm).abs() < 1e-12);
/// ```
#[must_use]
pub fn crossover((a, a_fitness): (&Weights, f64), (b, b_fitness): (&Weights, f64)) -> Weights {
    let mut child = weighted_sum((a, a_fitness), (b, b_fitness));
    if normalize_l2(&mut child) {
        return child;
    }

    tracing::warn!(a_fitness, b_fitness, "degenerate crossover, using unweighted parent sum");
    let mut child = weighted_sum((a, 1.0), (b, 1.0));
    if normalize_l2(&mut child) {
        return child;
    }
    let mut child = *a;
    normalize_l2(&mut child);
    child
}

/// Un-normalized `a × a_factor + b × b_factor`.
#[must_use]
pub fn weighted_sum((a, a_factor): (&Weights, f64), (b, b_factor): (&Weights, f64)) -> Weights {
    let (a, b) = (a.as_array(), b.as_array());
    Weights::new(std::array::from_fn(|i| a[i] * a_factor + b[i] * b_factor))
}

/// With probability `chance`, adds an amount drawn from `amount` to one randomly
/// chosen coefficient.
///
/// Returns whether the vector was changed. The caller re-normalizes.
pub fn mutate<R>(rng: &mut R, weights: &mut Weights, chance: f64, amount: &Uniform<f64>) -> bool
where
    R: Rng + ?Sized,
{
    if !rng.random_bool(chance) {
        return false;
    }
    let index = rng.random_range(0..Weights::LEN);
    weights.as_mut_array()[index] += rng.sample(amount);
    true
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn assert_unit(weights: &Weights) {
        assert!(
            (weights.norm() - 1.0).abs() < 1e-9,
            "{weights:?} has norm {}",
            weights.norm()
        );
    }

    #[test]
    fn test_random_unit_vectors() {
        let mut rng = Pcg32::seed_from_u64(1);
        let coefficient = Uniform::new_inclusive(-1.0, 1.0).unwrap();
        for _ in 0..100 {
            let weights = random_unit(&mut rng, &coefficient);
            assert_unit(&weights);
        }
    }

    #[test]
    fn test_random_coefficients_in_range() {
        let mut rng = Pcg32::seed_from_u64(2);
        let coefficient = Uniform::new_inclusive(-1.0, 1.0).unwrap();
        for _ in 0..100 {
            let weights = random(&mut rng, &coefficient);
            assert!(weights.as_array().iter().all(|w| (-1.0..=1.0).contains(w)));
        }
    }

    #[test]
    fn test_breeding_scenario() {
        let a = Weights::new([1.0, 0.0, 0.0, 0.0, 0.0]);
        let b = Weights::new([0.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(
            weighted_sum((&a, 10.0), (&b, 5.0)),
            Weights::new([10.0, 5.0, 0.0, 0.0, 0.0])
        );

        let child = crossover((&a, 10.0), (&b, 5.0));
        let norm = 125.0_f64.sqrt();
        let expected = [10.0 / norm, 5.0 / norm, 0.0, 0.0, 0.0];
        for (c, e) in child.as_array().iter().zip(expected) {
            assert!((c - e).abs() < 1e-12);
        }
        assert_unit(&child);
    }

    #[test]
    fn test_degenerate_crossover_falls_back() {
        let a = Weights::new([0.6, 0.8, 0.0, 0.0, 0.0]);
        let b = Weights::new([0.0, 0.0, 1.0, 0.0, 0.0]);
        // zero fitness on both sides: unweighted sum
        let child = crossover((&a, 0.0), (&b, 0.0));
        assert_unit(&child);
        assert!(child.as_array().iter().all(|w| *w >= 0.0));
        assert!(child.as_array()[2] > 0.0);

        // opposite parents cancel out: copy of parent a
        let unit = Weights::new([1.0, 0.0, 0.0, 0.0, 0.0]);
        let opposite = Weights::new([-1.0, 0.0, 0.0, 0.0, 0.0]);
        let child = crossover((&unit, 0.0), (&opposite, 0.0));
        assert_eq!(child, unit);
    }

    #[test]
    fn test_mutation_touches_one_coefficient() {
        let mut rng = Pcg32::seed_from_u64(3);
        let amount = Uniform::new_inclusive(-0.2, 0.2).unwrap();
        let original = Weights::new([0.2, 0.4, 0.4, 0.4, 0.7]);
        for _ in 0..100 {
            let mut weights = original;
            assert!(mutate(&mut rng, &mut weights, 1.0, &amount));
            let changed: Vec<_> = original
                .as_array()
                .iter()
                .zip(weights.as_array())
                .filter(|(o, w)| o != w)
                .map(|(o, w)| (w - o).abs())
                .collect();
            assert!(changed.len() <= 1);
            assert!(changed.iter().all(|d| *d <= 0.2 + 1e-12));
        }

        let mut weights = original;
        assert!(!mutate(&mut rng, &mut weights, 0.0, &amount));
        assert_eq!(weights, original);
    }

    #[test]
    fn test_normalize_rejects_zero() {
        let mut zero = Weights::default();
        assert!(!normalize_l2(&mut zero));
        assert_eq!(zero, Weights::default());

        let mut weights = Weights::new([3.0, 0.0, 4.0, 0.0, 0.0]);
        assert!(normalize_l2(&mut weights));
        assert_eq!(weights.as_array(), &[0.6, 0.0, 0.8, 0.0, 0.0]);
    }
}

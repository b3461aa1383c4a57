//! Steady-state genetic algorithm for evolving weight vectors.
//!
//! The optimizer keeps a population ranked by fitness and advances through a
//! small state machine:
//!
//! ```text
//! Initializing → GeneratingOffspring → Purging ─┬→ GeneratingOffspring
//!                                               └→ Terminated
//! ```
//!
//! - **Initializing** - `population_size` random unit vectors are evaluated and
//!   inserted into the ranked population.
//! - **GeneratingOffspring** - each round samples `population_size × sample_fraction`
//!   distinct individuals, breeds the two fittest of the sample with
//!   [`weights::crossover`], mutates the child with probability
//!   `mutation_chance`, evaluates it and inserts it. The population grows until
//!   `ceil(population_size × offspring_fraction)` children have been added.
//! - **Purging** - the population is truncated back to its `population_size`
//!   fittest members and the generation is reported.
//! - **Terminated** - reached after `generation_limit` purges; without a limit
//!   the optimizer runs indefinitely.
//!
//! Offspring compete with their parents before anything is removed, so a
//! generation never loses an individual fitter than every newcomer.
//!
//! # Population Ranking
//!
//! [`Population`] is a vector sorted by fitness, best first. Insertion is
//! stable (a newcomer goes after existing individuals of equal fitness), so a
//! purge is a plain truncation and the sample's two fittest members are its two
//! smallest indices.
//!
//! # Example
//!
//! ```
//! use heurtris_evaluator::{
//!     session_evaluator::DefaultSessionEvaluator, turn_evaluator::Lookahead,
//! };
//! use heurtris_training::genetic::{GeneticOptimizer, GeneticParams};
//!
//! let evaluator = DefaultSessionEvaluator::new(1, 20, Lookahead::OnePly);
//! let params = GeneticParams {
//!     population_size: 6,
//!     sample_fraction: 0.5,
//!     generation_limit: Some(1),
//!     ..GeneticParams::default()
//! };
//! let mut optimizer = GeneticOptimizer::new(params, &evaluator).unwrap();
//! let best = optimizer.run(&mut rand::rng(), |report| {
//!     assert_eq!(report.generation, 1);
//! });
//! assert!(best.is_some());
//! ```

use heurtris_evaluator::{session_evaluator::SessionEvaluator, weights::Weights};
use heurtris_stats::descriptive::DescriptiveStats;
use rand::{Rng, seq::SliceRandom as _};
use rand_distr::Uniform;
use serde::{Deserialize, Serialize};

use crate::{InvalidParamsError, weights};

/// Parameters of the genetic algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticParams {
    /// Number of individuals kept after every purge.
    pub population_size: usize,
    /// Share of the population drawn as a breeding sample.
    pub sample_fraction: f64,
    /// Offspring bred per generation, as a share of the population size.
    pub offspring_fraction: f64,
    /// Probability that a child is mutated.
    pub mutation_chance: f64,
    /// Largest absolute change a mutation applies to a coefficient.
    pub mutation_threshold: f64,
    /// Number of generations to run; `None` runs indefinitely.
    pub generation_limit: Option<usize>,
}

impl Default for GeneticParams {
    fn default() -> Self {
        Self {
            population_size: 1000,
            sample_fraction: 0.1,
            offspring_fraction: 0.3,
            mutation_chance: 0.05,
            mutation_threshold: 0.2,
            generation_limit: Some(50),
        }
    }
}

impl GeneticParams {
    /// Number of individuals drawn per breeding round, `floor(size × sample_fraction)`.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    #[must_use]
    pub fn sample_size(&self) -> usize {
        (self.population_size as f64 * self.sample_fraction).floor() as usize
    }

    /// Offspring bred per generation, `ceil(size × offspring_fraction)`.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    #[must_use]
    pub fn offspring_quota(&self) -> usize {
        (self.population_size as f64 * self.offspring_fraction).ceil() as usize
    }

    /// Checks that the parameters describe a runnable optimizer.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidParamsError`] for a population smaller than 2,
    /// fractions outside `(0, 1]`, a sample that cannot hold two parents, a
    /// mutation chance outside `[0, 1]`, or a negative or non-finite mutation
    /// threshold.
    pub fn validate(&self) -> Result<(), InvalidParamsError> {
        if self.population_size < 2 {
            return Err(InvalidParamsError::PopulationTooSmall {
                size: self.population_size,
            });
        }
        for (name, value) in [
            ("sample fraction", self.sample_fraction),
            ("offspring fraction", self.offspring_fraction),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(InvalidParamsError::FractionOutOfRange { name, value });
            }
        }
        if self.sample_size() < 2 {
            return Err(InvalidParamsError::SampleTooSmall {
                size: self.sample_size(),
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_chance) {
            return Err(InvalidParamsError::MutationChanceOutOfRange {
                value: self.mutation_chance,
            });
        }
        if !(self.mutation_threshold.is_finite() && self.mutation_threshold >= 0.0) {
            return Err(InvalidParamsError::NegativeOrNonFinite {
                name: "mutation threshold",
                value: self.mutation_threshold,
            });
        }
        Ok(())
    }
}

/// A candidate weight vector and its fitness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    weights: Weights,
    fitness: f64,
}

impl Individual {
    #[must_use]
    pub fn new(weights: Weights, fitness: f64) -> Self {
        Self { weights, fitness }
    }

    #[must_use]
    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Mean rows cleared per game; higher is better.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }
}

/// Individuals ranked by fitness, best first.
#[derive(Debug, Clone, Default)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Individuals in rank order.
    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    /// Inserts `individual` after every individual at least as fit.
    pub fn insert(&mut self, individual: Individual) {
        let index = self
            .individuals
            .partition_point(|ind| ind.fitness >= individual.fitness);
        self.individuals.insert(index, individual);
    }

    /// Keeps the `size` fittest individuals and returns the discarded ones.
    pub fn truncate(&mut self, size: usize) -> Vec<Individual> {
        self.individuals.split_off(size.min(self.individuals.len()))
    }

    /// Statistics of the fitness distribution, or `None` if empty.
    #[must_use]
    pub fn fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.individuals.iter().map(Individual::fitness))
    }

    /// Statistics of each coefficient across the population, in weight order.
    #[must_use]
    pub fn weight_stats(&self) -> Vec<DescriptiveStats> {
        (0..Weights::LEN)
            .filter_map(|i| {
                DescriptiveStats::new(self.individuals.iter().map(|ind| ind.weights.as_array()[i]))
            })
            .collect()
    }
}

/// State of the genetic algorithm.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display, derive_more::IsVariant,
)]
pub enum OptimizerPhase {
    Initializing,
    GeneratingOffspring,
    Purging,
    Terminated,
}

/// Summary of a completed generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Number of completed generations, starting at 1.
    pub generation: usize,
    pub best: Individual,
    pub fitness: DescriptiveStats,
    /// Spread of each coefficient, in weight order.
    pub weights: Vec<DescriptiveStats>,
}

/// What a single [`GeneticOptimizer::step`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum StepEvent {
    Initialized { population_size: usize },
    OffspringAdded { offspring: usize, child: Individual },
    RoundSkipped,
    Purged(GenerationReport),
    Terminated,
}

/// Genetic algorithm driving a [`SessionEvaluator`].
#[derive(Debug)]
pub struct GeneticOptimizer<'a, E: ?Sized> {
    params: GeneticParams,
    evaluator: &'a E,
    population: Population,
    phase: OptimizerPhase,
    offspring: usize,
    generation: usize,
    coefficient: Uniform<f64>,
    mutation_amount: Uniform<f64>,
}

impl<'a, E> GeneticOptimizer<'a, E>
where
    E: SessionEvaluator + ?Sized,
{
    /// Creates an optimizer in the [`OptimizerPhase::Initializing`] phase.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidParamsError`] if `params` fail [`GeneticParams::validate`].
    pub fn new(params: GeneticParams, evaluator: &'a E) -> Result<Self, InvalidParamsError> {
        params.validate()?;
        let threshold = params.mutation_threshold;
        let mutation_amount = Uniform::new_inclusive(-threshold, threshold).map_err(|_| {
            InvalidParamsError::NegativeOrNonFinite {
                name: "mutation threshold",
                value: threshold,
            }
        })?;
        let coefficient =
            Uniform::new_inclusive(-1.0, 1.0).expect("constant coefficient range is valid");
        Ok(Self {
            params,
            evaluator,
            population: Population::new(),
            phase: OptimizerPhase::Initializing,
            offspring: 0,
            generation: 0,
            coefficient,
            mutation_amount,
        })
    }

    #[must_use]
    pub fn params(&self) -> &GeneticParams {
        &self.params
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    #[must_use]
    pub fn phase(&self) -> OptimizerPhase {
        self.phase
    }

    /// Number of completed generations.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Offspring bred in the current generation.
    #[must_use]
    pub fn offspring(&self) -> usize {
        self.offspring
    }

    /// Performs the work of the current phase and moves to the next one.
    pub fn step<R>(&mut self, rng: &mut R) -> StepEvent
    where
        R: Rng + ?Sized,
    {
        match self.phase {
            OptimizerPhase::Initializing => {
                self.initialize(rng);
                self.phase = self.phase_after_generation();
                StepEvent::Initialized {
                    population_size: self.population.len(),
                }
            }
            OptimizerPhase::GeneratingOffspring => {
                let event = match self.breed(rng) {
                    Some(child) => {
                        self.offspring += 1;
                        StepEvent::OffspringAdded {
                            offspring: self.offspring,
                            child,
                        }
                    }
                    None => StepEvent::RoundSkipped,
                };
                if self.offspring >= self.params.offspring_quota() {
                    self.phase = OptimizerPhase::Purging;
                }
                event
            }
            OptimizerPhase::Purging => {
                let report = self.purge();
                self.phase = self.phase_after_generation();
                StepEvent::Purged(report)
            }
            OptimizerPhase::Terminated => StepEvent::Terminated,
        }
    }

    /// Steps until the next purge; `None` once the optimizer has terminated.
    pub fn run_generation<R>(&mut self, rng: &mut R) -> Option<GenerationReport>
    where
        R: Rng + ?Sized,
    {
        loop {
            match self.step(rng) {
                StepEvent::Purged(report) => return Some(report),
                StepEvent::Terminated => return None,
                StepEvent::Initialized { .. }
                | StepEvent::OffspringAdded { .. }
                | StepEvent::RoundSkipped => {}
            }
        }
    }

    /// Runs until termination, calling `on_generation` after every purge.
    ///
    /// Returns the best individual found. Without a generation limit this
    /// never returns.
    pub fn run<R, F>(&mut self, rng: &mut R, mut on_generation: F) -> Option<Individual>
    where
        R: Rng + ?Sized,
        F: FnMut(&GenerationReport),
    {
        while let Some(report) = self.run_generation(rng) {
            on_generation(&report);
        }
        self.population.best().copied()
    }

    fn phase_after_generation(&self) -> OptimizerPhase {
        if self
            .params
            .generation_limit
            .is_some_and(|limit| self.generation >= limit)
        {
            OptimizerPhase::Terminated
        } else {
            OptimizerPhase::GeneratingOffspring
        }
    }

    fn initialize<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for _ in 0..self.params.population_size {
            let weights = weights::random_unit(rng, &self.coefficient);
            let fitness = self.evaluator.evaluate_fitness(&weights);
            self.population.insert(Individual::new(weights, fitness));
        }
        tracing::info!(
            population_size = self.population.len(),
            best_fitness = ?self.population.best().map(Individual::fitness),
            "initial population created"
        );
    }

    /// Indices of the two fittest members of a random sample.
    fn sample_parents<R>(&self, rng: &mut R) -> Option<(usize, usize)>
    where
        R: Rng + ?Sized,
    {
        let sample_size = self.params.sample_size().min(self.population.len());
        if sample_size < 2 {
            return None;
        }
        let mut indices: Vec<usize> = (0..self.population.len()).collect();
        let (sample, _) = indices.partial_shuffle(rng, sample_size);
        sample.sort_unstable();
        Some((sample[0], sample[1]))
    }

    fn breed<R>(&mut self, rng: &mut R) -> Option<Individual>
    where
        R: Rng + ?Sized,
    {
        let (a, b) = self.sample_parents(rng)?;
        let (a, b) = (
            self.population.individuals[a],
            self.population.individuals[b],
        );

        let mut child = weights::crossover((&a.weights, a.fitness), (&b.weights, b.fitness));
        let mut mutated = child;
        if weights::mutate(
            rng,
            &mut mutated,
            self.params.mutation_chance,
            &self.mutation_amount,
        ) && weights::normalize_l2(&mut mutated)
        {
            child = mutated;
        }

        let child = Individual::new(child, self.evaluator.evaluate_fitness(&child));
        self.population.insert(child);
        tracing::debug!(
            generation = self.generation + 1,
            offspring = self.offspring + 1,
            parent_fitness = ?(a.fitness, b.fitness),
            fitness = child.fitness,
            "offspring added"
        );
        Some(child)
    }

    fn purge(&mut self) -> GenerationReport {
        let discarded = self.population.truncate(self.params.population_size);
        self.offspring = 0;
        self.generation += 1;

        let best = *self
            .population
            .best()
            .expect("population is never empty after initialization");
        let fitness = self
            .population
            .fitness_stats()
            .expect("population is never empty after initialization");
        tracing::info!(
            generation = self.generation,
            best_fitness = best.fitness,
            mean_fitness = fitness.mean,
            discarded = discarded.len(),
            weights = ?best.weights.as_array(),
            "generation completed"
        );
        GenerationReport {
            generation: self.generation,
            best,
            fitness,
            weights: self.population.weight_stats(),
        }
    }
}

use heurtris_evaluator::session_evaluator::DefaultSessionEvaluator;
use heurtris_training::genetic::{GenerationReport, GeneticOptimizer, GeneticParams};
use serde::Serialize;

use super::SessionArg;
use crate::{model::WeightsModel, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainGeneticArg {
    /// Individuals kept after every generation
    #[arg(long, default_value_t = GeneticParams::default().population_size)]
    population_size: usize,
    /// Share of the population sampled to pick two parents
    #[arg(long, default_value_t = GeneticParams::default().sample_fraction)]
    sample_fraction: f64,
    /// Offspring per generation, as a share of the population
    #[arg(long, default_value_t = GeneticParams::default().offspring_fraction)]
    offspring_fraction: f64,
    /// Probability that a child is mutated
    #[arg(long, default_value_t = GeneticParams::default().mutation_chance)]
    mutation_chance: f64,
    /// Largest change a mutation applies to one coefficient
    #[arg(long, default_value_t = GeneticParams::default().mutation_threshold)]
    mutation_threshold: f64,
    /// Number of generations (0 runs until interrupted)
    #[arg(long, default_value_t = 50)]
    generations: usize,
    #[command(flatten)]
    pub(super) session: SessionArg,
}

impl TrainGeneticArg {
    fn params(&self) -> GeneticParams {
        GeneticParams {
            population_size: self.population_size,
            sample_fraction: self.sample_fraction,
            offspring_fraction: self.offspring_fraction,
            mutation_chance: self.mutation_chance,
            mutation_threshold: self.mutation_threshold,
            generation_limit: (self.generations > 0).then_some(self.generations),
        }
    }
}

#[derive(Debug, Serialize)]
struct GeneticTrainingReport {
    params: GeneticParams,
    evaluator: DefaultSessionEvaluator,
    generations: Vec<GenerationReport>,
    model: WeightsModel,
}

pub(crate) fn run(arg: &TrainGeneticArg) -> anyhow::Result<()> {
    let params = arg.params();
    let evaluator = arg.session.evaluator()?;
    let mut optimizer = GeneticOptimizer::new(params, &evaluator)?;

    tracing::info!(
        population_size = params.population_size,
        sample_size = params.sample_size(),
        offspring_quota = params.offspring_quota(),
        generation_limit = ?params.generation_limit,
        games_per_trial = evaluator.games_per_trial(),
        lookahead = %evaluator.lookahead(),
        "genetic training started"
    );

    let mut generations = vec![];
    let best = optimizer
        .run(&mut rand::rng(), |report| generations.push(report.clone()))
        .ok_or_else(|| anyhow::anyhow!("Training finished with an empty population"))?;

    tracing::info!(
        generations = optimizer.generation(),
        fitness = best.fitness(),
        weights = ?best.weights().as_array(),
        "genetic training completed"
    );

    let report = GeneticTrainingReport {
        params,
        evaluator,
        generations,
        model: WeightsModel::new("genetic", best.fitness(), best.weights()),
    };
    util::print_json(&report)
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;
    use crate::command::{CommandArgs, Mode};

    fn parse(args: &[&str]) -> TrainGeneticArg {
        let args =
            CommandArgs::try_parse_from(["heurtris", "train-genetic"].iter().chain(args)).unwrap();
        let Mode::TrainGenetic(arg) = args.mode else {
            panic!("expected train-genetic");
        };
        arg
    }

    #[test]
    fn test_defaults_match_library_defaults() {
        let arg = parse(&[]);
        assert_eq!(arg.params(), GeneticParams::default());
        assert_eq!(arg.session.evaluator().unwrap(), DefaultSessionEvaluator::default());
    }

    #[test]
    fn test_zero_generations_is_unbounded() {
        let arg = parse(&["--generations", "0", "--population-size", "40"]);
        let params = arg.params();
        assert_eq!(params.generation_limit, None);
        assert_eq!(params.population_size, 40);
    }
}

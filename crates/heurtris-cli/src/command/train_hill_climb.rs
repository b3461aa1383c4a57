use heurtris_evaluator::session_evaluator::DefaultSessionEvaluator;
use heurtris_training::hill_climbing::{HillClimbParams, HillClimbState, HillClimber};
use serde::Serialize;

use super::SessionArg;
use crate::{model::WeightsModel, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainHillClimbArg {
    /// Number of steps (0 runs until delta drops below --min-delta)
    #[arg(long, default_value_t = 100)]
    iterations: usize,
    /// Initial change applied to each coefficient
    #[arg(long, default_value_t = HillClimbParams::default().initial_delta)]
    delta: f64,
    /// Factor applied to delta after a step without improvement
    #[arg(long, default_value_t = HillClimbParams::default().delta_decay)]
    delta_decay: f64,
    /// Stop once delta falls below this value
    #[arg(long, default_value_t = HillClimbParams::default().min_delta)]
    min_delta: f64,
    #[command(flatten)]
    session: SessionArg,
}

impl TrainHillClimbArg {
    fn params(&self) -> HillClimbParams {
        HillClimbParams {
            iteration_limit: (self.iterations > 0).then_some(self.iterations),
            initial_delta: self.delta,
            delta_decay: self.delta_decay,
            min_delta: self.min_delta,
        }
    }
}

#[derive(Debug, Serialize)]
struct HillClimbReport {
    params: HillClimbParams,
    evaluator: DefaultSessionEvaluator,
    final_state: HillClimbState,
    model: WeightsModel,
}

pub(crate) fn run(arg: &TrainHillClimbArg) -> anyhow::Result<()> {
    let params = arg.params();
    let evaluator = arg.session.evaluator()?;
    let climber = HillClimber::new(params, &evaluator)?;

    let initial = climber.init(&mut rand::rng());
    tracing::info!(
        fitness = initial.fitness(),
        weights = ?initial.current().as_array(),
        "hill climbing started"
    );
    let state = climber.climb(initial, |_, _| {});
    tracing::info!(
        iterations = state.iteration(),
        fitness = state.fitness(),
        delta = state.delta(),
        "hill climbing completed"
    );

    let report = HillClimbReport {
        params,
        evaluator,
        final_state: state,
        model: WeightsModel::new("hill_climbing", state.fitness(), state.current()),
    };
    util::print_json(&report)
}

use heurtris_engine::{GameState, PieceSeed};
use heurtris_evaluator::{
    turn_evaluator::{Lookahead, TurnEvaluator},
    weights::Weights,
};
use rand::Rng as _;
use serde::Serialize;

use super::Search;
use crate::util;

/// Weights used when `--weights` is not given.
const DEFAULT_WEIGHTS: Weights = Weights::new([0.760_666, -0.510_066, -0.184_483, -0.356_630, -0.1]);

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Comma-separated weights: complete lines, aggregate height, bumpiness, holes, well sum
    #[arg(long, allow_hyphen_values = true)]
    weights: Option<Weights>,
    /// Move search: greedy or lookahead
    #[arg(long, default_value = "lookahead")]
    search: Search,
    /// Maximum number of moves
    #[arg(long, default_value_t = 100_000)]
    turn_limit: usize,
    /// Piece sequence seed (32 hex digits); random if omitted
    #[arg(long)]
    seed: Option<PieceSeed>,
}

#[derive(Debug, Serialize)]
struct PlayReport {
    seed: PieceSeed,
    lookahead: Lookahead,
    weights: Weights,
    turn_limit: usize,
    pieces_placed: usize,
    rows_cleared: usize,
    lost: bool,
    cleared_rows_counter: [usize; 5],
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        weights,
        search,
        turn_limit,
        seed,
    } = arg;

    let weights = weights.unwrap_or(DEFAULT_WEIGHTS);
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let lookahead = Lookahead::from(*search);

    tracing::info!(%seed, %lookahead, weights = ?weights.as_array(), "starting game");
    let turn_evaluator = TurnEvaluator::linear(weights, lookahead);
    let mut game = GameState::with_seed(seed);
    let stats = turn_evaluator.play_session(&mut game, *turn_limit);
    tracing::info!(
        pieces_placed = stats.completed_pieces(),
        rows_cleared = stats.total_cleared_rows(),
        lost = game.has_lost(),
        "game finished"
    );

    let report = PlayReport {
        seed,
        lookahead,
        weights,
        turn_limit: *turn_limit,
        pieces_placed: stats.completed_pieces(),
        rows_cleared: stats.total_cleared_rows(),
        lost: game.has_lost(),
        cleared_rows_counter: *stats.cleared_rows_counter(),
    };
    util::print_json(&report)
}

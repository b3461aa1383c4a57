use clap::{Parser, Subcommand};
use heurtris_evaluator::{session_evaluator::DefaultSessionEvaluator, turn_evaluator::Lookahead};

use self::{
    play::PlayArg, train_genetic::TrainGeneticArg, train_hill_climb::TrainHillClimbArg,
};

mod play;
mod train_genetic;
mod train_hill_climb;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play one game with a fixed weight vector
    Play(#[clap(flatten)] PlayArg),
    /// Train weights using the genetic algorithm
    TrainGenetic(#[clap(flatten)] TrainGeneticArg),
    /// Train weights using coordinate-ascent hill climbing
    TrainHillClimb(#[clap(flatten)] TrainHillClimbArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::TrainGenetic(arg) => train_genetic::run(&arg)?,
        Mode::TrainHillClimb(arg) => train_hill_climb::run(&arg)?,
    }
    Ok(())
}

/// Move search used by the player.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr, derive_more::Display)]
pub enum Search {
    /// Score each placement of the current piece
    Greedy,
    /// Also average over the seven possible next pieces
    #[default]
    Lookahead,
}

impl From<Search> for Lookahead {
    fn from(search: Search) -> Self {
        match search {
            Search::Greedy => Lookahead::OnePly,
            Search::Lookahead => Lookahead::TwoPly,
        }
    }
}

/// How each weight vector is scored during training.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SessionArg {
    /// Games played per fitness evaluation
    #[arg(long, default_value_t = DefaultSessionEvaluator::DEFAULT_GAMES_PER_TRIAL)]
    games_per_trial: usize,
    /// Maximum number of moves per game
    #[arg(long, default_value_t = DefaultSessionEvaluator::DEFAULT_TURN_LIMIT)]
    turn_limit: usize,
    /// Move search: greedy or lookahead
    #[arg(long, default_value = "lookahead")]
    search: Search,
}

impl SessionArg {
    pub(crate) fn evaluator(&self) -> anyhow::Result<DefaultSessionEvaluator> {
        anyhow::ensure!(
            self.games_per_trial > 0,
            "--games-per-trial must be at least 1"
        );
        Ok(DefaultSessionEvaluator::new(
            self.games_per_trial,
            self.turn_limit,
            self.search.into(),
        ))
    }
}

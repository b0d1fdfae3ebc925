//! Subcommands of the `ttt-td` binary

pub mod baseline;
pub mod play;
pub mod train;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use crate::{cli::config::RunConfig, pipeline::FirstMover};

/// Who opens each game
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FirstMoverArg {
    /// The learner always opens
    Learner,
    /// The opponent always opens
    Opponent,
    /// Learner and opponent take turns opening
    Alternate,
    /// A fair coin decides every game
    Coin,
}

impl From<FirstMoverArg> for FirstMover {
    fn from(arg: FirstMoverArg) -> Self {
        match arg {
            FirstMoverArg::Learner => FirstMover::Learner,
            FirstMoverArg::Opponent => FirstMover::Opponent,
            FirstMoverArg::Alternate => FirstMover::Alternate,
            FirstMoverArg::Coin => FirstMover::CoinFlip,
        }
    }
}

/// Training plan flags shared by `train` and `play`
#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// JSON run configuration; flags below override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Number of epochs
    #[arg(long, short = 'e')]
    pub epochs: Option<usize>,

    /// Games per epoch
    #[arg(long, short = 'g')]
    pub games_per_epoch: Option<usize>,

    /// Exploration rate during training (0.0-1.0)
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Initial learning rate (0.0-1.0)
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Keep alpha fixed instead of annealing it toward zero
    #[arg(long, default_value_t = false)]
    pub constant_alpha: bool,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Who opens each game
    #[arg(long, value_enum)]
    pub first_mover: Option<FirstMoverArg>,
}

impl PlanArgs {
    /// Merge the configuration file (if any) with command-line overrides
    pub fn resolve(&self) -> Result<RunConfig> {
        let mut run = match &self.config {
            Some(path) => RunConfig::load(path)
                .with_context(|| format!("loading run configuration {}", path.display()))?,
            None => RunConfig::default(),
        };

        if let Some(seed) = self.seed {
            run.seed = Some(seed);
        }
        if let Some(first_mover) = self.first_mover {
            run.first_mover = first_mover.into();
        }
        if let Some(epochs) = self.epochs {
            run.set_epochs(epochs);
        }
        if let Some(games) = self.games_per_epoch {
            run.plan.games_per_epoch = games;
        }
        if let Some(epsilon) = self.epsilon {
            run.plan.epsilon = epsilon;
        }
        if let Some(alpha) = self.alpha {
            run.set_initial_alpha(alpha);
        }
        if self.constant_alpha {
            run.plan.alpha = crate::pipeline::AlphaSchedule::constant(run.initial_alpha());
        }

        run.validate()?;
        Ok(run)
    }
}

//! Run configuration shared across commands
//!
//! A run can be described in a JSON file and refined by command-line flags;
//! flags always win over file values.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    pipeline::{AlphaSchedule, EpochPlan, FirstMover, TrainingConfig},
};

/// Everything needed to train and evaluate one learner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Random seed for reproducibility
    pub seed: Option<u64>,

    /// Who opens each game
    pub first_mover: FirstMover,

    /// Epochs, games per epoch, epsilon and alpha schedule
    pub plan: EpochPlan,

    /// Games played after training to measure the learned policy
    pub eval_games: usize,

    /// Exploration rate during evaluation
    pub eval_epsilon: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: None,
            first_mover: FirstMover::default(),
            plan: EpochPlan::default(),
            eval_games: 0,
            eval_epsilon: 0.0,
        }
    }
}

impl RunConfig {
    /// Load a run configuration from a JSON file; missing fields take defaults
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| crate::Error::Io {
            operation: format!("read run configuration {}", path.display()),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Library configuration for the trainer
    pub fn training_config(&self) -> TrainingConfig {
        TrainingConfig {
            seed: self.seed,
            first_mover: self.first_mover,
            epsilon: self.plan.epsilon,
        }
    }

    /// Initial (or constant) learning rate of the plan
    pub fn initial_alpha(&self) -> f64 {
        match self.plan.alpha {
            AlphaSchedule::Constant { alpha } => alpha,
            AlphaSchedule::LinearAnneal { initial, .. } => initial,
        }
    }

    /// Change the epoch count, keeping a linear anneal spread over all epochs
    pub fn set_epochs(&mut self, epochs: usize) {
        self.plan.epochs = epochs;
        if let AlphaSchedule::LinearAnneal { initial, .. } = self.plan.alpha {
            self.plan.alpha = AlphaSchedule::linear(initial, epochs);
        }
    }

    /// Change the initial learning rate, keeping the schedule kind
    pub fn set_initial_alpha(&mut self, alpha: f64) {
        self.plan.alpha = match self.plan.alpha {
            AlphaSchedule::Constant { .. } => AlphaSchedule::constant(alpha),
            AlphaSchedule::LinearAnneal { epochs, .. } => AlphaSchedule::linear(alpha, epochs),
        };
    }

    pub fn validate(&self) -> Result<()> {
        self.plan.validate()?;
        crate::error::ensure_unit_interval("evaluation epsilon", self.eval_epsilon)
    }
}

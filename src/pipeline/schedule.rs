//! Epoch plans and learning-rate schedules
//!
//! Training is organized into epochs: blocks of games played at one learning
//! rate and reported as one line. The learning rate per epoch comes from an
//! [`AlphaSchedule`].

use serde::{Deserialize, Serialize};

use super::training::TrainingResult;
use crate::{Error, Result, error::ensure_unit_interval};

/// Learning rate as a function of the (1-based) epoch number
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlphaSchedule {
    /// Same alpha for every epoch
    Constant { alpha: f64 },
    /// `initial * (1 - epoch / (epochs + 1))`, decreasing toward zero over
    /// `epochs` epochs without reaching it
    LinearAnneal { initial: f64, epochs: usize },
}

impl AlphaSchedule {
    pub fn constant(alpha: f64) -> Self {
        AlphaSchedule::Constant { alpha }
    }

    pub fn linear(initial: f64, epochs: usize) -> Self {
        AlphaSchedule::LinearAnneal { initial, epochs }
    }

    /// Alpha for `epoch`, counting from 1
    pub fn alpha_for_epoch(&self, epoch: usize) -> f64 {
        match *self {
            AlphaSchedule::Constant { alpha } => alpha,
            AlphaSchedule::LinearAnneal { initial, epochs } => {
                let fraction = epoch.min(epochs) as f64 / (epochs + 1) as f64;
                initial * (1.0 - fraction)
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            AlphaSchedule::Constant { alpha } => ensure_unit_interval("alpha", alpha),
            AlphaSchedule::LinearAnneal { initial, .. } => {
                ensure_unit_interval("initial alpha", initial)
            }
        }
    }

    /// Short human-readable label
    pub fn label(&self) -> String {
        match *self {
            AlphaSchedule::Constant { alpha } => format!("constant({alpha})"),
            AlphaSchedule::LinearAnneal { initial, epochs } => {
                format!("linear({initial} over {epochs} epochs)")
            }
        }
    }
}

/// A full training run: `epochs` blocks of `games_per_epoch` games
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochPlan {
    pub epochs: usize,
    pub games_per_epoch: usize,
    /// Exploration rate, fixed for the whole run
    pub epsilon: f64,
    pub alpha: AlphaSchedule,
}

impl EpochPlan {
    /// Plan with a linear anneal spanning all epochs
    pub fn annealed(epochs: usize, games_per_epoch: usize, epsilon: f64, initial_alpha: f64) -> Self {
        Self {
            epochs,
            games_per_epoch,
            epsilon,
            alpha: AlphaSchedule::linear(initial_alpha, epochs),
        }
    }

    pub fn total_games(&self) -> usize {
        self.epochs * self.games_per_epoch
    }

    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 || self.games_per_epoch == 0 {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "epoch plan needs at least one epoch and one game per epoch (got {} x {})",
                    self.epochs, self.games_per_epoch
                ),
            });
        }
        ensure_unit_interval("epsilon", self.epsilon)?;
        self.alpha.validate()
    }
}

impl Default for EpochPlan {
    fn default() -> Self {
        Self::annealed(199, 1000, 0.001, 1.0)
    }
}

/// Outcome of one epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochReport {
    /// Epoch number, counting from 1
    pub epoch: usize,
    pub alpha: f64,
    pub result: TrainingResult,
}

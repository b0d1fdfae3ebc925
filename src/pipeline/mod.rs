//! Training and evaluation pipeline
//!
//! This module provides:
//! - The game loop that trains the learner against an opponent
//! - Epoch plans with learning-rate schedules
//! - Built-in opponents and the random-vs-random baseline
//! - Observers recording what happens during training

pub mod baseline;
pub mod observers;
pub mod opponents;
pub mod schedule;
pub mod training;

pub use baseline::estimate_random_baseline;
// Re-export observer implementations (adapters)
pub use observers::{
    ConsoleObserver, JsonlObserver, MetricsObserver, MetricsSummary, Observation,
    ProgressObserver, StepObservation,
};
pub use opponents::{RandomActor, ScriptedActor};
pub use schedule::{AlphaSchedule, EpochPlan, EpochReport};
pub use training::{
    FirstMover, GameRecord, MoveRecord, Side, Trainer, TrainingConfig, TrainingResult,
};

pub use crate::ports::{Actor, Observer};

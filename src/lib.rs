//! Afterstate TD(0) value learning for tic-tac-toe
//!
//! This crate provides:
//! - Board representation, rules and the base-3 state index codec
//! - A dense value table of winning-probability estimates for every index
//! - The epsilon-greedy learner with its TD(0) afterstate update
//! - Training, evaluation and epoch plans against a random opponent
//! - Observers for progress bars, metrics, JSONL logs and game narration
//! - A command-line shell for training and interactive play

pub mod cli;
pub mod codec;
pub mod error;
pub mod pipeline;
pub mod policy;
pub mod ports;
pub mod tictactoe;
pub mod value_table;

pub use codec::StateIndex;
pub use error::{Error, Result};
pub use value_table::ValueTable;

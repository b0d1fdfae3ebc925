//! CLI infrastructure for the tic-tac-toe value learner
//!
//! This module provides the command-line interface for training the learner,
//! measuring the random baseline and playing against the trained table.

pub mod commands;
pub mod config;
pub mod human;
pub mod output;

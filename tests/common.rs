//! Common test utilities for the ttt-td test suite.
//!
//! Board construction shorthands and a uniformity check used by the
//! distributional tests.

#![allow(dead_code)]

use ttt_td::{
    pipeline::{FirstMover, Trainer, TrainingConfig},
    tictactoe::Board,
};

/// Parse a board written as rows, e.g. `"XO. .X. ..O"`.
pub fn board(rows: &str) -> Board {
    Board::from_string(rows).unwrap_or_else(|err| panic!("bad test board {rows:?}: {err}"))
}

/// Trainer with a fixed seed and opening rule.
pub fn seeded_trainer(seed: u64, first_mover: FirstMover) -> Trainer {
    Trainer::new(
        TrainingConfig::default()
            .with_seed(seed)
            .with_first_mover(first_mover),
    )
    .unwrap()
}

/// Pearson chi-square statistic of `counts` against a uniform distribution.
pub fn chi_square_uniform(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    let expected = total as f64 / counts.len() as f64;
    counts
        .iter()
        .map(|&observed| {
            let diff = observed as f64 - expected;
            diff * diff / expected
        })
        .sum()
}

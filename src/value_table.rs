//! Dense table of winning-probability estimates, one per board index

use serde::Serialize;

use crate::{
    Error, Result,
    codec::{self, STATE_COUNT, StateIndex},
    tictactoe::GameResult,
};

/// Value every entry starts from before initialization and training
pub const PRIOR: f64 = 0.5;

/// Value of an index whose board breaks the rules
pub const INVALID_VALUE: f64 = 0.0;

/// Value of a board already won by the first mark
pub const WIN_VALUE: f64 = 1.0;

/// Value of a board already won by the second mark
pub const LOSS_VALUE: f64 = 0.0;

/// Counts produced by the terminal initialization pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TerminalSummary {
    pub invalid: usize,
    pub first_wins: usize,
    pub second_wins: usize,
}

/// Estimated probability that the first mark wins, for each of the 3^9 indices.
///
/// Only the learner's in-progress afterstates change after initialization;
/// terminal and invalid entries keep their pinned constants.
#[derive(Debug, Clone)]
pub struct ValueTable {
    values: Vec<f64>,
    initialized: bool,
}

impl ValueTable {
    /// Allocate a table holding the prior everywhere
    pub fn new() -> Self {
        Self {
            values: vec![PRIOR; STATE_COUNT],
            initialized: false,
        }
    }

    /// Allocate a table and run the terminal initialization pass
    pub fn with_terminal_values() -> Self {
        let mut table = Self::new();
        table.pin_terminal_values();
        table.initialized = true;
        table
    }

    /// Pin invalid, won and lost boards to their fixed values.
    ///
    /// Every index is decoded; invalid boards get 0.0, first-mark wins 1.0 and
    /// second-mark wins 0.0. Everything else keeps the prior. Must run once,
    /// before any training game.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableAlreadyInitialized`] on a second call.
    pub fn initialize_terminal_values(&mut self) -> Result<TerminalSummary> {
        if self.initialized {
            return Err(Error::TableAlreadyInitialized);
        }
        let summary = self.pin_terminal_values();
        self.initialized = true;
        Ok(summary)
    }

    fn pin_terminal_values(&mut self) -> TerminalSummary {
        let mut summary = TerminalSummary::default();
        for index in StateIndex::all() {
            let board = codec::decode(index);
            let pinned = if !board.is_valid() {
                summary.invalid += 1;
                Some(INVALID_VALUE)
            } else {
                match board.outcome() {
                    GameResult::FirstWins => {
                        summary.first_wins += 1;
                        Some(WIN_VALUE)
                    }
                    GameResult::SecondWins => {
                        summary.second_wins += 1;
                        Some(LOSS_VALUE)
                    }
                    GameResult::Draw | GameResult::InProgress => None,
                }
            };
            if let Some(value) = pinned {
                self.values[index.get()] = value;
            }
        }
        summary
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn get(&self, index: StateIndex) -> f64 {
        self.values[index.get()]
    }

    pub fn set(&mut self, index: StateIndex, probability: f64) {
        debug_assert!(
            (0.0..=1.0).contains(&probability),
            "probability {probability} outside [0, 1]"
        );
        self.values[index.get()] = probability;
    }

    /// TD(0) step: move `V(last)` a fraction `alpha` of the way toward `V(target)`.
    ///
    /// With `alpha` in `[0, 1]` the new value is a convex combination of two
    /// values in `[0, 1]`, so the table stays bounded. Returns the new value.
    pub fn bootstrap(&mut self, last: StateIndex, target: StateIndex, alpha: f64) -> f64 {
        let current = self.get(last);
        let updated = current + alpha * (self.get(target) - current);
        self.set(last, updated);
        updated
    }

    /// Fraction of entries whose value has moved away from the prior
    pub fn coverage(&self) -> f64 {
        let touched = self.values.iter().filter(|&&v| v != PRIOR).count();
        touched as f64 / self.values.len() as f64
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All values in index order
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl Default for ValueTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::Board;

    #[test]
    fn test_new_table_holds_prior() {
        let table = ValueTable::new();
        assert_eq!(table.len(), STATE_COUNT);
        assert!(table.values().iter().all(|&v| v == PRIOR));
        assert_eq!(table.coverage(), 0.0);
        assert!(!table.is_initialized());
    }

    #[test]
    fn test_initialize_twice_fails() {
        let mut table = ValueTable::new();
        let summary = table.initialize_terminal_values().unwrap();
        assert!(summary.invalid > 0);
        assert!(summary.first_wins > 0);
        assert!(summary.second_wins > 0);
        assert!(matches!(
            table.initialize_terminal_values(),
            Err(Error::TableAlreadyInitialized)
        ));
    }

    #[test]
    fn test_with_terminal_values_matches_explicit_pass() {
        let mut explicit = ValueTable::new();
        explicit.initialize_terminal_values().unwrap();
        let direct = ValueTable::with_terminal_values();
        assert_eq!(explicit.values(), direct.values());
        assert!(direct.is_initialized());
    }

    #[test]
    fn test_empty_board_keeps_prior() {
        let table = ValueTable::with_terminal_values();
        assert_eq!(table.get(StateIndex::EMPTY), PRIOR);
    }

    #[test]
    fn test_bootstrap_interpolates() {
        let mut table = ValueTable::with_terminal_values();
        let last = Board::from_string("X........").unwrap().index();
        let win = Board::from_string("XXX OO. ...").unwrap().index();
        assert_eq!(table.get(win), WIN_VALUE);

        let updated = table.bootstrap(last, win, 0.5);
        assert!((updated - 0.75).abs() < 1e-12);
        assert_eq!(table.get(last), updated);

        // alpha = 0 leaves the entry untouched
        assert_eq!(table.bootstrap(last, win, 0.0), updated);
    }
}

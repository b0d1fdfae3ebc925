//! Observer port - abstraction for training observation and event logging
//!
//! This port defines the interface for observing training events,
//! allowing composable data collection without coupling training
//! logic to specific output formats or metrics.

use crate::{
    Result,
    pipeline::{EpochReport, GameRecord, MoveRecord},
};

/// Observer trait for monitoring training
///
/// Observers can be composed to collect different types of data during training:
/// - Progress bars for user feedback
/// - JSONL export for analysis
/// - Metrics tracking for evaluation
/// - Console narration of individual games
///
/// # Event Sequence
///
/// The observer methods are called in the following order:
/// 1. `on_training_start(total_games)` - Once per training call
/// 2. For each game:
///    - `on_game_start(game_num, learner_first)`
///    - `on_move(game_num, record)` - For each move in the game
///    - `on_game_end(game_num, record)`
/// 3. `on_epoch_end(report)` - After each epoch when running an epoch plan
/// 4. `on_training_end()` - Once at the end
///
/// Games played outside a training call (interactive play) only produce the
/// per-game events.
///
/// # Examples
///
/// ```no_run
/// use ttt_td::{pipeline::GameRecord, ports::Observer};
///
/// struct CountingObserver {
///     game_count: usize,
/// }
///
/// impl Observer for CountingObserver {
///     fn on_game_end(&mut self, _game_num: usize, _record: &GameRecord) -> ttt_td::Result<()> {
///         self.game_count += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when a training run starts with the number of games it will play.
    fn on_training_start(&mut self, _total_games: usize) -> Result<()> {
        Ok(())
    }

    /// Called when a game starts.
    ///
    /// * `game_num` - Index of the game across the trainer's lifetime (0-based)
    /// * `learner_first` - Whether the learner makes the opening move
    fn on_game_start(&mut self, _game_num: usize, _learner_first: bool) -> Result<()> {
        Ok(())
    }

    /// Called after every placed mark, once any TD update for it is applied.
    fn on_move(&mut self, _game_num: usize, _record: &MoveRecord) -> Result<()> {
        Ok(())
    }

    /// Called when a game reaches a terminal board.
    fn on_game_end(&mut self, _game_num: usize, _record: &GameRecord) -> Result<()> {
        Ok(())
    }

    /// Called after each epoch of an epoch plan.
    fn on_epoch_end(&mut self, _report: &EpochReport) -> Result<()> {
        Ok(())
    }

    /// Called when a training run completes. Finalize outputs here.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}

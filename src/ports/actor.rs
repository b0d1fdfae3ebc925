//! Actor port - the opponent-move provider consumed by the game loop

use crate::{Result, tictactoe::Board};

/// An opponent of the learner: random play, a human at the keyboard, or a
/// scripted sequence in tests.
///
/// The game loop asks for a position, places the second mark there and keeps
/// the pre-move board index as the learner's pending state. Actors never see
/// or touch the value table.
///
/// # Examples
///
/// ```no_run
/// use ttt_td::{ports::Actor, tictactoe::Board};
///
/// struct FirstEmpty;
///
/// impl Actor for FirstEmpty {
///     fn select_move(&mut self, board: &Board) -> ttt_td::Result<usize> {
///         board
///             .empty_positions()
///             .first()
///             .copied()
///             .ok_or(ttt_td::Error::NoValidMoves)
///     }
///
///     fn name(&self) -> &str {
///         "first-empty"
///     }
/// }
/// ```
pub trait Actor: Send {
    /// Select an empty position (0-8) on a non-terminal board.
    ///
    /// # Errors
    ///
    /// Returns an error if no move can be produced, e.g. the board is full or
    /// the input source is exhausted.
    fn select_move(&mut self, board: &Board) -> Result<usize>;

    /// Get the actor's name, used in logs and summaries.
    fn name(&self) -> &str;

    /// Seed the actor's random number generator, if it has one.
    ///
    /// # Default Implementation
    ///
    /// Does nothing and returns `Ok(())`.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }
}

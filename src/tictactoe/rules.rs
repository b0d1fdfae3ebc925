//! Rule checks: validity, terminal outcome and fullness

use serde::{Deserialize, Serialize};

use super::{
    board::{Board, Cell, Player},
    lines::LineAnalyzer,
};

/// Classification of a board, always from the first mark's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    FirstWins,
    SecondWins,
    Draw,
    InProgress,
}

impl GameResult {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameResult::InProgress)
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            GameResult::FirstWins => Some(Player::First),
            GameResult::SecondWins => Some(Player::Second),
            GameResult::Draw | GameResult::InProgress => None,
        }
    }
}

impl Board {
    /// Check that the marks could have come from alternating turns.
    ///
    /// Mark counts may differ by at most one. A board on which both players
    /// hold a completed line is also rejected: a game stops at the first
    /// completed line, so such a board is unreachable whatever the line order.
    pub fn is_valid(&self) -> bool {
        let first = self.count(Player::First);
        let second = self.count(Player::Second);
        if first.abs_diff(second) > 1 {
            return false;
        }

        !(self.has_won(Player::First) && self.has_won(Player::Second))
    }

    /// Check if a player has three in a row
    pub fn has_won(&self, player: Player) -> bool {
        LineAnalyzer::has_won(self.cells(), player)
    }

    /// Owner of the first completed line in row, column, diagonal order.
    ///
    /// Only meaningful on valid boards, where at most one player has a line.
    pub fn winner(&self) -> Option<Player> {
        LineAnalyzer::first_completed_line(self.cells())
    }

    /// True iff no cell is empty. Consult after checking for a winner.
    pub fn is_full(&self) -> bool {
        !self.cells().contains(&Cell::Empty)
    }

    /// Classify the board: a completed line wins, otherwise a full board is a
    /// draw and anything else is still in progress.
    pub fn outcome(&self) -> GameResult {
        match self.winner() {
            Some(Player::First) => GameResult::FirstWins,
            Some(Player::Second) => GameResult::SecondWins,
            None if self.is_full() => GameResult::Draw,
            None => GameResult::InProgress,
        }
    }
}

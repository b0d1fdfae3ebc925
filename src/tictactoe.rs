//! Tic-Tac-Toe board, winning lines and rules

pub mod board;
pub mod lines;
pub mod rules;

pub use board::{BOARD_CELLS, Board, Cell, Player, position};
pub use lines::{LineAnalyzer, WINNING_LINES};
pub use rules::GameResult;

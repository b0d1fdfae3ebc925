//! Board representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of cells on the 3x3 board
pub const BOARD_CELLS: usize = 9;

/// A cell on the Tic-Tac-Toe board
///
/// The discriminants are the base-3 digits used by the state codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    First,
    Second,
}

impl Cell {
    /// Base-3 digit of this cell (0, 1 or 2)
    pub fn digit(self) -> usize {
        match self {
            Cell::Empty => 0,
            Cell::First => 1,
            Cell::Second => 2,
        }
    }

    pub fn from_digit(digit: usize) -> Option<Cell> {
        match digit {
            0 => Some(Cell::Empty),
            1 => Some(Cell::First),
            2 => Some(Cell::Second),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::First => 'X',
            Cell::Second => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' | '_' => Some(Cell::Empty),
            'X' | 'x' | '1' => Some(Cell::First),
            'O' | 'o' | '2' => Some(Cell::Second),
            _ => None,
        }
    }
}

/// Owner of a mark.
///
/// The learner always plays the `First` mark (rendered `X`). Which side moves
/// first in a game is decided separately by the game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    First,
    Second,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::First => Cell::First,
            Player::Second => Cell::Second,
        }
    }

    pub fn digit(self) -> usize {
        self.to_cell().digit()
    }
}

/// A 3x3 board, cells stored in row-major order (position = 3 * row + column).
///
/// Boards are `Copy`; the only mutation is a single-cell [`Board::place`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; BOARD_CELLS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [Cell::Empty; BOARD_CELLS],
        }
    }

    /// Build a board from raw cells. No rule checks are applied.
    pub fn from_cells(cells: [Cell; BOARD_CELLS]) -> Self {
        Board { cells }
    }

    /// Parse a board from 9 cell characters, whitespace and `|` ignored.
    ///
    /// `X`/`x`/`1` is the first mark, `O`/`o`/`2` the second, `.`/`_` empty.
    /// The result is not checked against the rules, so invalid boards can be
    /// expressed (they occur in the full index domain).
    ///
    /// # Errors
    ///
    /// Returns error if fewer than 9 cells are present or a character is not a
    /// cell representation.
    pub fn from_string(s: &str) -> Result<Self, crate::Error> {
        let chars: Vec<char> = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '|')
            .collect();
        if chars.len() < BOARD_CELLS {
            return Err(crate::Error::InvalidBoardLength {
                expected: BOARD_CELLS,
                got: chars.len(),
                context: s.to_string(),
            });
        }

        let mut cells = [Cell::Empty; BOARD_CELLS];
        for (i, &c) in chars.iter().take(BOARD_CELLS).enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| crate::Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: s.to_string(),
            })?;
        }
        Ok(Board { cells })
    }

    pub fn cells(&self) -> &[Cell; BOARD_CELLS] {
        &self.cells
    }

    /// Get cell at position (0-8)
    pub fn get(&self, pos: usize) -> Cell {
        self.cells[pos]
    }

    /// Get cell at (row, column)
    pub fn get_at(&self, row: usize, col: usize) -> Cell {
        self.cells[position(row, col)]
    }

    /// Check if a position is empty
    pub fn is_empty(&self, pos: usize) -> bool {
        self.cells[pos] == Cell::Empty
    }

    /// Get all empty positions in ascending order
    pub fn empty_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of marks owned by `player`
    pub fn count(&self, player: Player) -> usize {
        let target = player.to_cell();
        self.cells.iter().filter(|&&c| c == target).count()
    }

    /// Place `player`'s mark on an empty cell.
    pub fn place(&mut self, pos: usize, player: Player) -> Result<(), crate::Error> {
        if pos >= BOARD_CELLS || !self.is_empty(pos) {
            return Err(crate::Error::InvalidMove { position: pos });
        }
        self.cells[pos] = player.to_cell();
        Ok(())
    }

    /// Copying variant of [`Board::place`]
    #[must_use = "with_move returns a new board; the original is unchanged"]
    pub fn with_move(&self, pos: usize, player: Player) -> Result<Board, crate::Error> {
        let mut next = *self;
        next.place(pos, player)?;
        Ok(next)
    }

    /// Compact 9-character encoding (`.` for empty), used in logs
    pub fn encode(&self) -> String {
        self.cells
            .iter()
            .map(|&c| match c {
                Cell::Empty => '.',
                other => other.to_char(),
            })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Row-major position of (row, column)
pub fn position(row: usize, col: usize) -> usize {
    row * 3 + col
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            if row > 0 {
                writeln!(f)?;
                writeln!(f, "-+-+-")?;
            }
            write!(
                f,
                "{}|{}|{}",
                self.get_at(row, 0).to_char(),
                self.get_at(row, 1).to_char(),
                self.get_at(row, 2).to_char()
            )?;
        }
        Ok(())
    }
}

//! Bijective base-3 encoding between boards and value-table indices
//!
//! Cell `p` (row-major) contributes `digit * 3^p`, with digits 0, 1, 2 for
//! empty, first and second marks. Every integer in `[0, 3^9)` therefore names
//! exactly one board, including boards that cannot arise in play.

use serde::{Deserialize, Serialize};

use crate::tictactoe::{BOARD_CELLS, Board, Cell, Player};

/// Number of distinct indices, 3^9
pub const STATE_COUNT: usize = 19_683;

/// 3^p for each board position
const PLACE_VALUES: [usize; BOARD_CELLS] = [1, 3, 9, 27, 81, 243, 729, 2187, 6561];

/// Index of a board in the value table, always within `[0, 3^9)`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct StateIndex(usize);

impl StateIndex {
    /// Index of the empty board
    pub const EMPTY: StateIndex = StateIndex(0);

    /// Wrap a raw integer, rejecting values outside the index domain
    pub fn new(raw: usize) -> Option<Self> {
        (raw < STATE_COUNT).then_some(StateIndex(raw))
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Every index in ascending order
    pub fn all() -> impl Iterator<Item = StateIndex> {
        (0..STATE_COUNT).map(StateIndex)
    }

    /// Index of the afterstate reached by placing `player`'s mark on the
    /// empty cell `pos`.
    ///
    /// Placing a mark only adds its digit term, so no re-encoding is needed.
    /// The caller guarantees `pos` is empty on the board this index names.
    pub fn after_placing(self, pos: usize, player: Player) -> StateIndex {
        debug_assert!(
            (self.0 / PLACE_VALUES[pos]) % 3 == 0,
            "position {pos} is occupied in state {}",
            self.0
        );
        StateIndex(self.0 + player.digit() * PLACE_VALUES[pos])
    }
}

impl From<&Board> for StateIndex {
    fn from(board: &Board) -> Self {
        encode(board)
    }
}

/// Encode a board as its table index
pub fn encode(board: &Board) -> StateIndex {
    let raw = board
        .cells()
        .iter()
        .zip(PLACE_VALUES)
        .map(|(cell, place)| cell.digit() * place)
        .sum();
    StateIndex(raw)
}

/// Decode a table index back into its board
pub fn decode(index: StateIndex) -> Board {
    let mut cells = [Cell::Empty; BOARD_CELLS];
    let mut rest = index.0;
    for cell in &mut cells {
        // rest % 3 is always a valid digit
        *cell = Cell::from_digit(rest % 3).unwrap_or(Cell::Empty);
        rest /= 3;
    }
    Board::from_cells(cells)
}

impl Board {
    /// Table index of this board
    pub fn index(&self) -> StateIndex {
        encode(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_is_zero() {
        assert_eq!(encode(&Board::new()), StateIndex::EMPTY);
        assert_eq!(decode(StateIndex::EMPTY), Board::new());
    }

    #[test]
    fn test_place_values_are_powers_of_three() {
        for (pos, &place) in PLACE_VALUES.iter().enumerate() {
            assert_eq!(place, 3usize.pow(pos as u32));
        }
        assert_eq!(STATE_COUNT, 3usize.pow(9));
    }

    #[test]
    fn test_known_encodings() {
        // First at position 0 contributes 1, Second at position 8 contributes 2 * 6561
        let board = Board::from_string("X.. ... ..O").unwrap();
        assert_eq!(encode(&board).get(), 1 + 2 * 6561);

        let last = StateIndex::new(STATE_COUNT - 1).unwrap();
        assert_eq!(decode(last).encode(), "OOOOOOOOO");
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(StateIndex::new(STATE_COUNT).is_none());
        assert!(StateIndex::new(STATE_COUNT - 1).is_some());
    }

    #[test]
    fn test_after_placing_matches_encode() {
        let board = Board::from_string("X.. .O. ...").unwrap();
        let index = encode(&board);
        for pos in board.empty_positions() {
            for player in [Player::First, Player::Second] {
                let next = board.with_move(pos, player).unwrap();
                assert_eq!(index.after_placing(pos, player), encode(&next));
            }
        }
    }
}

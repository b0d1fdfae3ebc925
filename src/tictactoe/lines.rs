//! Winning line analysis for Tic-Tac-Toe

use super::{Cell, Player};

/// Winning line indices on the 3x3 board, scanned in this order
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Product of three first-mark digits
const FIRST_LINE_PRODUCT: usize = 1;
/// Product of three second-mark digits
const SECOND_LINE_PRODUCT: usize = 8;

/// Utility for analyzing winning lines in Tic-Tac-Toe
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// Product of the cell digits along a line.
    ///
    /// Any empty cell makes the product 0; only three first marks give 1 and
    /// only three second marks give 8.
    pub fn line_product(cells: &[Cell; 9], line: &[usize; 3]) -> usize {
        line.iter().map(|&idx| cells[idx].digit()).product()
    }

    /// Owner of the first completed line in scan order
    pub fn first_completed_line(cells: &[Cell; 9]) -> Option<Player> {
        WINNING_LINES
            .iter()
            .find_map(|line| match Self::line_product(cells, line) {
                FIRST_LINE_PRODUCT => Some(Player::First),
                SECOND_LINE_PRODUCT => Some(Player::Second),
                _ => None,
            })
    }

    /// Check if a player has three in a row
    pub fn has_won(cells: &[Cell; 9], player: Player) -> bool {
        let target = match player {
            Player::First => FIRST_LINE_PRODUCT,
            Player::Second => SECOND_LINE_PRODUCT,
        };
        WINNING_LINES
            .iter()
            .any(|line| Self::line_product(cells, line) == target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_won_horizontal() {
        let mut cells = [Cell::Empty; 9];
        cells[0] = Cell::First;
        cells[1] = Cell::First;
        cells[2] = Cell::First;

        assert!(LineAnalyzer::has_won(&cells, Player::First));
        assert!(!LineAnalyzer::has_won(&cells, Player::Second));
    }

    #[test]
    fn test_has_won_vertical() {
        let mut cells = [Cell::Empty; 9];
        cells[0] = Cell::Second;
        cells[3] = Cell::Second;
        cells[6] = Cell::Second;

        assert!(LineAnalyzer::has_won(&cells, Player::Second));
        assert!(!LineAnalyzer::has_won(&cells, Player::First));
    }

    #[test]
    fn test_has_won_anti_diagonal() {
        let mut cells = [Cell::Empty; 9];
        cells[2] = Cell::First;
        cells[4] = Cell::First;
        cells[6] = Cell::First;

        assert_eq!(
            LineAnalyzer::first_completed_line(&cells),
            Some(Player::First)
        );
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        // X O X along the top row: product 2
        let mut cells = [Cell::Empty; 9];
        cells[0] = Cell::First;
        cells[1] = Cell::Second;
        cells[2] = Cell::First;

        assert_eq!(LineAnalyzer::line_product(&cells, &WINNING_LINES[0]), 2);
        assert_eq!(LineAnalyzer::first_completed_line(&cells), None);
    }

    #[test]
    fn test_scan_order_prefers_earlier_line() {
        // O X X / O X . / O X . : Second's left column and First's middle
        // column are both complete; columns are scanned left to right
        let cells = [
            Cell::Second,
            Cell::First,
            Cell::First,
            Cell::Second,
            Cell::First,
            Cell::Empty,
            Cell::Second,
            Cell::First,
            Cell::Empty,
        ];

        assert!(LineAnalyzer::has_won(&cells, Player::First));
        assert!(LineAnalyzer::has_won(&cells, Player::Second));
        assert_eq!(
            LineAnalyzer::first_completed_line(&cells),
            Some(Player::Second)
        );
    }
}

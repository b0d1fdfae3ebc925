//! Keyboard player for interactive games
//!
//! Moves are entered as a column letter followed by a row digit: `A1` is the
//! top-left cell, `C3` the bottom-right.

use std::io::{BufRead, Write};

use crate::{
    Error, Result,
    ports::Actor,
    tictactoe::{Board, position},
};

/// Parse an `A1`-style coordinate into `(row, column)`.
///
/// The letter selects the column (`A`..`C`, case-insensitive), the digit the
/// row (`1`..`3`). Surrounding whitespace is ignored; anything else is rejected.
pub fn parse_coordinate(input: &str) -> Result<(usize, usize)> {
    let malformed = || Error::MalformedCoordinate {
        input: input.trim().to_string(),
    };
    let mut chars = input.trim().chars();
    let (Some(letter), Some(digit), None) = (chars.next(), chars.next(), chars.next()) else {
        return Err(malformed());
    };

    let col = match letter.to_ascii_uppercase() {
        'A' => 0,
        'B' => 1,
        'C' => 2,
        _ => return Err(malformed()),
    };
    let row = match digit {
        '1' => 0,
        '2' => 1,
        '3' => 2,
        _ => return Err(malformed()),
    };
    Ok((row, col))
}

/// Inverse of [`parse_coordinate`] for a row-major position
pub fn format_coordinate(pos: usize) -> String {
    let letter = char::from(b'A' + (pos % 3) as u8);
    format!("{letter}{}", pos / 3 + 1)
}

/// Human opponent reading coordinates from `input` and prompting on `output`
pub struct HumanActor<R, W> {
    name: String,
    input: R,
    output: W,
}

impl<R: BufRead + Send, W: Write + Send> HumanActor<R, W> {
    pub fn new(name: String, input: R, output: W) -> Self {
        Self {
            name,
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Show `prompt` and read one line from the same input the moves come
    /// from; `None` once the input is closed
    pub fn read_command(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead + Send, W: Write + Send> Actor for HumanActor<R, W> {
    /// Prompt until a well-formed coordinate of an empty cell is entered.
    ///
    /// Returns [`Error::InputClosed`] if the input ends first.
    fn select_move(&mut self, board: &Board) -> Result<usize> {
        loop {
            write!(self.output, "Your move (e.g. A1): ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(Error::InputClosed);
            }

            let (row, col) = match parse_coordinate(&line) {
                Ok(coordinate) => coordinate,
                Err(err) => {
                    writeln!(self.output, "{err}")?;
                    continue;
                }
            };
            let pos = position(row, col);
            if !board.is_empty(pos) {
                let err = Error::CellOccupied {
                    coordinate: format_coordinate(pos),
                };
                writeln!(self.output, "{err}")?;
                continue;
            }
            return Ok(pos);
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

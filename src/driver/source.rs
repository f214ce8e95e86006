//! Bit-level input: where card lines come from.

use crate::bits::ChannelWord;
use crate::bytecode::deck::Deck;
use crate::driver::driver_error::DriverError;

/// A line-oriented reader of printed bits, such as a colour sensor moving
/// across a card.
pub trait BitSource {
    /// Next bit of the current line. `Ok(None)` is a bit that could not be
    /// read; `Err(SourceExhausted)` means there are no more lines.
    fn read_bit(&mut self) -> Result<Option<u8>, DriverError>;

    /// Moves back to the first bit of the current line.
    fn rewind_line(&mut self) {}

    /// Moves to the first bit of the next line.
    fn advance_line(&mut self) {}
}

/// Reads a [`Deck`] bit by bit. Reading past the end of a line yields
/// unreadable bits.
#[derive(Debug, Clone)]
pub struct DeckReader {
    deck: Deck,
    line: usize,
    bit: usize,
}

impl DeckReader {
    pub fn new(deck: Deck) -> Self {
        Self {
            deck,
            line: 0,
            bit: 0,
        }
    }

    /// Current line, 0-based.
    pub fn line(&self) -> usize {
        self.line
    }
}

impl BitSource for DeckReader {
    fn read_bit(&mut self) -> Result<Option<u8>, DriverError> {
        let word = self.deck.lines.get(self.line).ok_or(DriverError::SourceExhausted)?;
        if self.bit >= ChannelWord::WIDTH {
            return Ok(None);
        }
        let bit = word.get(self.bit);
        self.bit += 1;
        Ok(Some(bit))
    }

    fn rewind_line(&mut self) {
        self.bit = 0;
    }

    fn advance_line(&mut self) {
        self.line += 1;
        self.bit = 0;
    }
}

//! Card decks: the encoded form of a program.
//!
//! A deck is stored either as text (one 11-character `0`/`1` line per card
//! line, `#` comments allowed) or as a postcard-encoded [`DeckFile`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bits::{BitsError, ChannelWord, DataWord};
use crate::codec::{Decoded, HammingCode};

const DECK_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("line {line}: {source}")]
    Bits { line: usize, source: BitsError },

    #[error("unsupported deck version {0}")]
    UnsupportedVersion(u32),

    #[error("line {line}: stored word {value:#06x} does not fit in 11 bits")]
    WordTooWide { line: usize, value: u16 },

    #[error("bit {bit} of line {line} is outside the deck ({lines} lines of 11 bits)")]
    OutOfRange { line: usize, bit: usize, lines: usize },

    #[error("malformed binary deck: {0}")]
    Encoding(postcard::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// On-disk binary layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckFile {
    pub version: u32,
    /// Channel words, big-endian in the low 11 bits.
    pub lines: Vec<u16>,
}

/// The printed channel words of a program, one per card line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    pub lines: Vec<ChannelWord>,
}

impl Deck {
    pub fn new(lines: Vec<ChannelWord>) -> Self {
        Self { lines }
    }

    pub fn from_program(program: &[DataWord], code: &HammingCode) -> Self {
        Self {
            lines: program.iter().map(|word| code.encode(*word)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn decode_all(&self, code: &HammingCode) -> Vec<Decoded> {
        self.lines.iter().map(|line| code.decode(*line)).collect()
    }

    /// Inverts one printed bit, simulating a smudged card.
    pub fn flip(&mut self, line: usize, bit: usize) -> Result<(), DeckError> {
        let lines = self.lines.len();
        match self.lines.get_mut(line) {
            Some(word) if bit < ChannelWord::WIDTH => {
                word.flip(bit);
                Ok(())
            }
            _ => Err(DeckError::OutOfRange { line, bit, lines }),
        }
    }

    pub fn parse_text(text: &str) -> Result<Self, DeckError> {
        let mut lines = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let content = raw.split('#').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }
            let word = content.parse::<ChannelWord>().map_err(|source| DeckError::Bits {
                line: index + 1,
                source,
            })?;
            lines.push(word);
        }

        Ok(Self { lines })
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.to_string());
            out.push('\n');
        }
        out
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DeckError> {
        let file = DeckFile {
            version: DECK_VERSION,
            lines: self.lines.iter().map(|line| line.value()).collect(),
        };
        postcard::to_allocvec(&file).map_err(DeckError::Encoding)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DeckError> {
        let file: DeckFile = postcard::from_bytes(bytes).map_err(DeckError::Encoding)?;
        if file.version != DECK_VERSION {
            return Err(DeckError::UnsupportedVersion(file.version));
        }
        let lines = file
            .lines
            .into_iter()
            .enumerate()
            .map(|(line, value)| {
                if value >> ChannelWord::WIDTH != 0 {
                    return Err(DeckError::WordTooWide { line, value });
                }
                Ok(ChannelWord::from_value(value))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { lines })
    }

    /// Reads a deck; `.txt` files use the text format, anything else binary.
    pub fn load(path: &Path) -> Result<Self, DeckError> {
        if is_text_path(path) {
            Self::parse_text(&fs::read_to_string(path)?)
        } else {
            Self::from_bytes(&fs::read(path)?)
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), DeckError> {
        if is_text_path(path) {
            fs::write(path, self.to_text())?;
        } else {
            fs::write(path, self.to_bytes()?)?;
        }
        Ok(())
    }
}

fn is_text_path(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("txt")
}

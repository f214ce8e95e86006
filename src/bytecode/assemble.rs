//! Mnemonic assembler for card programs.
//!
//! Source is a whitespace-separated token stream; `#` comments run to the
//! end of the line.
//!
//! | token            | emits                                   |
//! |------------------|-----------------------------------------|
//! | `0`..`15`        | operand word                            |
//! | `ADD`, `speak`…  | instruction word (case-insensitive)     |
//! | `NOP`            | `100000`                                |
//! | `'A'`, `' '`     | character word                          |
//! | `SPACE`          | `100010`                                |
//! | `"RES "`         | one character word per character        |
//!
//! SPEAK pops the text top first, so a string literal pushes its characters
//! last-to-first: `"HI" 2 SPEAK` announces `HI`.

use crate::bits::DataWord;
use crate::bytecode::assemble_error::{AsmError, AsmErrorKind};
use crate::bytecode::op::{Instruction, Op};

pub struct Assembler {
    /// Output words, in card order
    words: Vec<DataWord>,
}

impl Assembler {
    pub fn new() -> Self {
        Self { words: Vec::new() }
    }

    pub fn assemble(mut self, source: &str) -> Result<Vec<DataWord>, AsmError> {
        for (index, line) in source.lines().enumerate() {
            self.assemble_line(line, index + 1)?;
        }
        Ok(self.words)
    }

    fn assemble_line(&mut self, line: &str, line_no: usize) -> Result<(), AsmError> {
        let chars: Vec<char> = line.chars().collect();
        let mut pos = 0;

        while pos < chars.len() {
            let c = chars[pos];
            if c.is_whitespace() {
                pos += 1;
                continue;
            }
            if c == '#' {
                break;
            }

            let col = pos + 1;
            let at = |kind| AsmError::new(kind, line_no, col);

            match c {
                '\'' | '"' => {
                    let what = if c == '\'' { "character" } else { "string" };
                    let close = chars[pos + 1..]
                        .iter()
                        .position(|d| *d == c)
                        .ok_or_else(|| at(AsmErrorKind::Unterminated(what)))?;
                    let body: String = chars[pos + 1..pos + 1 + close].iter().collect();
                    pos += close + 2;

                    if c == '\'' {
                        self.char_literal(&body).map_err(at)?;
                    } else {
                        self.string_literal(&body).map_err(at)?;
                    }
                }
                _ => {
                    let end = chars[pos..]
                        .iter()
                        .position(|d| d.is_whitespace() || *d == '#')
                        .map_or(chars.len(), |n| pos + n);
                    let token: String = chars[pos..end].iter().collect();
                    pos = end;

                    self.word_token(&token).map_err(at)?;
                }
            }
        }

        Ok(())
    }

    fn word_token(&mut self, token: &str) -> Result<(), AsmErrorKind> {
        if token.chars().all(|c| c.is_ascii_digit()) {
            // Too many digits for u64 is still just out of range
            let n = token.parse::<u64>().unwrap_or(u64::MAX);
            let word = u8::try_from(n)
                .ok()
                .and_then(|n| Instruction::Operand(n).word())
                .ok_or(AsmErrorKind::LiteralOutOfRange(n))?;
            self.words.push(word);
            return Ok(());
        }

        if token.eq_ignore_ascii_case("SPACE") {
            return self.push_char(' ');
        }

        let op = Op::from_mnemonic(token)
            .ok_or_else(|| AsmErrorKind::UnknownMnemonic(token.to_string()))?;
        self.words.push(DataWord::from_value(op.code().into()));
        Ok(())
    }

    fn char_literal(&mut self, body: &str) -> Result<(), AsmErrorKind> {
        let mut chars = body.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.push_char(c),
            _ => Err(AsmErrorKind::BadCharLiteral(body.to_string())),
        }
    }

    fn string_literal(&mut self, body: &str) -> Result<(), AsmErrorKind> {
        for c in body.chars().rev() {
            self.push_char(c)?;
        }
        Ok(())
    }

    fn push_char(&mut self, c: char) -> Result<(), AsmErrorKind> {
        let word = Instruction::Char(c.to_ascii_uppercase())
            .word()
            .ok_or(AsmErrorKind::InvalidChar(c))?;
        self.words.push(word);
        Ok(())
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Assembles `source` into 6-bit program words.
pub fn assemble(source: &str) -> Result<Vec<DataWord>, AsmError> {
    Assembler::new().assemble(source)
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bits::DataWord;

// =============================================================================
// OP - Stack machine instructions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    // control
    Stp,
    Nop,

    // stack ops
    Dup,
    Del,
    Swp,

    // arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Exp,
    Mod,

    // shifts & bitwise
    Shl,
    Shr,
    Not,
    Xor,

    // conversion / comparison
    Hex,
    Ieq,

    // I/O
    Speak,
}

impl Op {
    pub const ALL: [Op; 18] = [
        Op::Stp,
        Op::Nop,
        Op::Dup,
        Op::Del,
        Op::Swp,
        Op::Add,
        Op::Sub,
        Op::Mul,
        Op::Div,
        Op::Exp,
        Op::Mod,
        Op::Shl,
        Op::Shr,
        Op::Not,
        Op::Xor,
        Op::Hex,
        Op::Ieq,
        Op::Speak,
    ];

    pub fn mnemonic(self) -> &'static str {
        match self {
            Op::Stp => "STP",
            Op::Nop => "NOP",
            Op::Dup => "DUP",
            Op::Del => "DEL",
            Op::Swp => "SWP",
            Op::Add => "ADD",
            Op::Sub => "SUB",
            Op::Mul => "MUL",
            Op::Div => "DIV",
            Op::Exp => "EXP",
            Op::Mod => "MOD",
            Op::Shl => "SHL",
            Op::Shr => "SHR",
            Op::Not => "NOT",
            Op::Xor => "XOR",
            Op::Hex => "HEX",
            Op::Ieq => "IEQ",
            Op::Speak => "SPEAK",
        }
    }

    /// Case-insensitive mnemonic lookup.
    pub fn from_mnemonic(s: &str) -> Option<Op> {
        Op::ALL
            .into_iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(s))
    }

    /// Canonical 6-bit pattern. NOP has four patterns; this returns `100000`.
    pub fn code(self) -> u8 {
        match self {
            Op::Stp => 0b010000,
            Op::Dup => 0b010001,
            Op::Del => 0b010010,
            Op::Swp => 0b010011,
            Op::Add => 0b010100,
            Op::Sub => 0b010101,
            Op::Mul => 0b010110,
            Op::Div => 0b010111,
            Op::Exp => 0b011000,
            Op::Mod => 0b011001,
            Op::Shl => 0b011010,
            Op::Shr => 0b011011,
            Op::Hex => 0b011100,
            Op::Ieq => 0b011101,
            Op::Not => 0b011110,
            Op::Xor => 0b011111,
            Op::Nop => 0b100000,
            Op::Speak => 0b100001,
        }
    }

    /// Returns (pops, pushes), or None if the effect depends on stack contents.
    pub fn effect(self) -> Option<(usize, usize)> {
        use Op::*;
        Some(match self {
            Stp | Nop => (0, 0),

            Dup => (1, 2),
            Del => (1, 0),
            Swp => (2, 2),

            Add | Sub | Mul | Div | Exp | Mod => (2, 1),
            Shl | Shr | Xor => (2, 1),
            Not => (1, 1),

            Hex | Ieq => (2, 1),

            // count + count values
            Speak => return None,
        })
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// First letter pattern; `A`..`Z` occupy `100100..=111101` in order.
const LETTER_BASE: u8 = 0b100100;
const SPACE: u8 = 0b100010;

/// A classified 6-bit code word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instruction {
    /// `00xxxx`: literal pushed as a byte.
    Operand(u8),
    /// `01xxxx` plus the reserved NOP/SPEAK patterns of the character space.
    Op(Op),
    /// `1xxxxx`: letter or space token.
    Char(char),
}

impl Instruction {
    /// Classifies a word by its two leading bits. Returns `None` for
    /// anything outside the 6-bit space.
    pub fn decode(word: u8) -> Option<Instruction> {
        let instr = match word {
            0b000000..=0b001111 => Instruction::Operand(word),

            0b010000 => Instruction::Op(Op::Stp),
            0b010001 => Instruction::Op(Op::Dup),
            0b010010 => Instruction::Op(Op::Del),
            0b010011 => Instruction::Op(Op::Swp),
            0b010100 => Instruction::Op(Op::Add),
            0b010101 => Instruction::Op(Op::Sub),
            0b010110 => Instruction::Op(Op::Mul),
            0b010111 => Instruction::Op(Op::Div),
            0b011000 => Instruction::Op(Op::Exp),
            0b011001 => Instruction::Op(Op::Mod),
            0b011010 => Instruction::Op(Op::Shl),
            0b011011 => Instruction::Op(Op::Shr),
            0b011100 => Instruction::Op(Op::Hex),
            0b011101 => Instruction::Op(Op::Ieq),
            0b011110 => Instruction::Op(Op::Not),
            0b011111 => Instruction::Op(Op::Xor),

            0b100000 | 0b100011 | 0b111110 | 0b111111 => Instruction::Op(Op::Nop),
            0b100001 => Instruction::Op(Op::Speak),
            SPACE => Instruction::Char(' '),
            LETTER_BASE..=0b111101 => Instruction::Char(char::from(b'A' + (word - LETTER_BASE))),

            _ => return None,
        };
        Some(instr)
    }

    pub fn from_word(word: DataWord) -> Option<Instruction> {
        Instruction::decode(word.value() as u8)
    }

    /// Inverse of [`Instruction::decode`]; `None` for operands above 15 or
    /// characters outside the card alphabet.
    pub fn code(&self) -> Option<u8> {
        match *self {
            Instruction::Operand(n) if n <= 0b001111 => Some(n),
            Instruction::Operand(_) => None,
            Instruction::Op(op) => Some(op.code()),
            Instruction::Char(' ') => Some(SPACE),
            Instruction::Char(c @ 'A'..='Z') => Some(LETTER_BASE + (c as u8 - b'A')),
            Instruction::Char(_) => None,
        }
    }

    pub fn word(&self) -> Option<DataWord> {
        self.code().map(|code| DataWord::from_value(code.into()))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Operand(n) => write!(f, "{}", n),
            Instruction::Op(op) => write!(f, "{}", op),
            Instruction::Char(' ') => write!(f, "' '"),
            Instruction::Char(c) => write!(f, "'{}'", c),
        }
    }
}

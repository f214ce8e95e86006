use serde::{Deserialize, Serialize};

/// A value on the operand stack.
///
/// The two kinds never coerce into each other; every instruction matches on
/// both explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    /// Unsigned 8-bit integer.
    Byte(u8),

    /// Character token: `A`..`Z` or space.
    Char(char),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Byte(_) => "byte",
            Value::Char(' ') => "space",
            Value::Char(_) => "char",
        }
    }

    /// Nibble value of a `0`-`9` / `A`-`F` character token.
    pub fn hex_digit(&self) -> Option<u8> {
        match *self {
            Value::Char(c @ ('0'..='9' | 'A'..='F')) => c.to_digit(16).map(|d| d as u8),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    /// Text form used by SPEAK: bytes in decimal, characters as-is.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Byte(n) => write!(f, "{}", n),
            Value::Char(c) => write!(f, "{}", c),
        }
    }
}

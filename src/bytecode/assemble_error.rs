use thiserror::Error;

/// What went wrong in an assembler token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AsmErrorKind {
    #[error("unknown mnemonic '{0}'")]
    UnknownMnemonic(String),

    #[error("literal {0} does not fit in an operand word (0..=15)")]
    LiteralOutOfRange(u64),

    #[error("{0:?} is not a card character (A-Z or space)")]
    InvalidChar(char),

    #[error("character literal must hold exactly one character, got '{0}'")]
    BadCharLiteral(String),

    #[error("unterminated {0} literal")]
    Unterminated(&'static str),
}

/// An assembler error with source location.
///
/// `line` and `col` are 1-based and point at the start of the offending token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{col}: {kind}")]
pub struct AsmError {
    pub kind: AsmErrorKind,
    pub line: usize,
    pub col: usize,
}

impl AsmError {
    pub fn new(kind: AsmErrorKind, line: usize, col: usize) -> Self {
        Self { kind, line, col }
    }
}

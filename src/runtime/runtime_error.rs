use thiserror::Error;

use crate::lang::value::Value;

/// Why an instruction failed.
///
/// These never cross the machine boundary as errors: `execute_one` turns
/// every one of them into `MachineState::Error` and keeps the cause for
/// `last_error()`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The stack ran out of operands.
    #[error("stack underflow in {op}")]
    Underflow { op: &'static str },

    #[error("type error in {op}: expected {expected}, got {got}")]
    TypeMismatch {
        op: &'static str,
        expected: &'static str,
        got: &'static str,
    },

    #[error("{op}: division by zero")]
    DivisionByZero { op: &'static str },

    #[error("HEX: '{0}' is not a hexadecimal digit")]
    NotHexDigit(Value),

    #[error("SPEAK: expected {expected} value(s) but the stack ran out (partial text {partial:?})")]
    IncompleteSpeech { expected: u8, partial: String },

    #[error("unrecognized code word {0:06b}")]
    UnknownWord(u8),
}

impl RuntimeError {
    pub fn is_underflow(&self) -> bool {
        matches!(
            self,
            RuntimeError::Underflow { .. } | RuntimeError::IncompleteSpeech { .. }
        )
    }
}

pub(crate) fn stack_underflow(op: &'static str) -> RuntimeError {
    RuntimeError::Underflow { op }
}

pub(crate) fn type_error(op: &'static str, expected: &'static str, got: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch {
        op,
        expected,
        got: got.type_name(),
    }
}

pub(crate) fn division_by_zero(op: &'static str) -> RuntimeError {
    RuntimeError::DivisionByZero { op }
}

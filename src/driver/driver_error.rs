use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// No more card lines; ends a run normally.
    #[error("bit source exhausted")]
    SourceExhausted,

    #[error("line {line}: bit still unreadable after {attempts} attempt(s)")]
    Unreadable { line: usize, attempts: u32 },

    #[error("line {line}: uncorrectable channel word after {attempts} attempt(s)")]
    Uncorrectable { line: usize, attempts: u32 },
}

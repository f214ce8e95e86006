//! Channel codec for card lines.
//!
//! Each card line carries an 11-bit channel word: a (10,6) systematic
//! codeword followed by one overall parity bit, giving single-error
//! correction and double-error detection (SEC-DED).

pub mod hamming;
pub mod matrix;

pub use hamming::{DecodeOutcome, Decoded, HammingCode};

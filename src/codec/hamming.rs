use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::matrix::{
    self, GENERATOR, GeneratorMatrix, K, N, PARITY_CHECK, PARITY_CHECK_T, ParityCheckMatrix,
    ParityCheckTranspose,
};
use crate::bits::{ChannelWord, DataWord, Syndrome};

/// Confidence level of a decoded word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecodeOutcome {
    /// No error detected.
    Valid,
    /// A single error was located and fixed (data, parity or overall parity bit).
    Corrected,
    /// Two errors detected; the returned data must not be trusted.
    Uncorrectable,
}

impl DecodeOutcome {
    pub fn is_trusted(self) -> bool {
        !matches!(self, DecodeOutcome::Uncorrectable)
    }
}

impl fmt::Display for DecodeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DecodeOutcome::Valid => "valid",
            DecodeOutcome::Corrected => "corrected",
            DecodeOutcome::Uncorrectable => "uncorrectable",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub data: DataWord,
    pub outcome: DecodeOutcome,
    /// Channel position of the corrected bit; 10 is the overall parity bit.
    pub error_position: Option<usize>,
}

/// SEC-DED codec for the (10,6) code extended with an overall parity bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HammingCode {
    generator: GeneratorMatrix,
    parity_check: ParityCheckMatrix,
    parity_check_t: ParityCheckTranspose,
}

impl HammingCode {
    /// Channel position of the overall parity bit.
    pub const OVERALL_PARITY_BIT: usize = N;

    pub fn new() -> Self {
        Self {
            generator: GENERATOR,
            parity_check: PARITY_CHECK,
            parity_check_t: PARITY_CHECK_T,
        }
    }

    pub fn generator(&self) -> &GeneratorMatrix {
        &self.generator
    }

    pub fn parity_check(&self) -> &ParityCheckMatrix {
        &self.parity_check
    }

    pub fn parity_check_transpose(&self) -> &ParityCheckTranspose {
        &self.parity_check_t
    }

    pub fn encode(&self, data: DataWord) -> ChannelWord {
        let codeword = matrix::multiply(data.as_array(), &self.generator);

        let mut channel = [0u8; N + 1];
        channel[..N].copy_from_slice(&codeword);
        channel[N] = codeword.iter().fold(0, |acc, bit| acc ^ bit);

        ChannelWord::from_raw(channel)
    }

    /// Syndrome of the 10-bit codeword part; the overall parity bit is ignored.
    pub fn syndrome(&self, word: &ChannelWord) -> Syndrome {
        let codeword: [u8; N] = word.prefix::<N>().into();
        Syndrome::from_raw(matrix::multiply(&codeword, &self.parity_check_t))
    }

    pub fn decode(&self, word: ChannelWord) -> Decoded {
        let overall_parity = word.parity() == 1;
        let syndrome = self.syndrome(&word);
        let syndrome_nonzero = syndrome.weight() > 0;
        let mut data: DataWord = word.prefix::<K>();

        let (outcome, error_position) = match (overall_parity, syndrome_nonzero) {
            (false, false) => (DecodeOutcome::Valid, None),
            // Lone error in the overall parity bit.
            (true, false) => (DecodeOutcome::Corrected, Some(Self::OVERALL_PARITY_BIT)),
            (true, true) => match self.locate(&syndrome) {
                Some(position) => {
                    if position < K {
                        data.flip(position);
                    }
                    (DecodeOutcome::Corrected, Some(position))
                }
                // Odd number of errors (three or more) that aliases no single position.
                None => (DecodeOutcome::Uncorrectable, None),
            },
            (false, true) => (DecodeOutcome::Uncorrectable, None),
        };

        match outcome {
            DecodeOutcome::Valid => trace!(%word, %data, "decoded"),
            DecodeOutcome::Corrected => {
                debug!(%word, %data, position = ?error_position, "corrected single-bit error")
            }
            DecodeOutcome::Uncorrectable => {
                debug!(%word, %syndrome, "uncorrectable channel word")
            }
        }

        Decoded {
            data,
            outcome,
            error_position,
        }
    }

    /// Codeword position whose single-bit error yields `syndrome`.
    fn locate(&self, syndrome: &Syndrome) -> Option<usize> {
        self.parity_check_t
            .iter()
            .position(|row| row == syndrome.as_array())
    }
}

impl Default for HammingCode {
    fn default() -> Self {
        Self::new()
    }
}

//! Fixed-width bit vectors.
//!
//! Every word that crosses a component boundary is a [`Bits`] value: 6-bit
//! data words, 11-bit channel words, 4-bit syndromes and the 8-bit view of
//! the stack top. Index 0 is the first bit on the card line and the most
//! significant bit when a vector is read as an integer.

use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use thiserror::Error;

/// 6-bit operand/opcode word fed to the stack machine.
pub type DataWord = Bits<6>;

/// 11-bit word as printed on a card line: 10 codeword bits plus overall parity.
pub type ChannelWord = Bits<11>;

/// 4-bit decoder syndrome.
pub type Syndrome = Bits<4>;

/// 8-bit big-endian view of a stack byte.
pub type Byte = Bits<8>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitsError {
    #[error("bit {index} has value {value}, expected 0 or 1")]
    InvalidBit { index: usize, value: u8 },

    #[error("unexpected character {ch:?} at position {index}, expected '0' or '1'")]
    InvalidChar { index: usize, ch: char },

    #[error("expected {expected} bits, found {found}")]
    WrongLength { expected: usize, found: usize },
}

/// An ordered vector of exactly `N` bits, each 0 or 1.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bits<const N: usize>([u8; N]);

impl<const N: usize> Bits<N> {
    pub const WIDTH: usize = N;

    pub const fn zero() -> Self {
        Bits([0; N])
    }

    /// Builds a vector from raw bits, rejecting anything other than 0 or 1.
    pub fn new(bits: [u8; N]) -> Result<Self, BitsError> {
        if let Some((index, &value)) = bits.iter().enumerate().find(|(_, b)| **b > 1) {
            return Err(BitsError::InvalidBit { index, value });
        }
        Ok(Bits(bits))
    }

    /// Caller guarantees every element is 0 or 1.
    pub(crate) fn from_raw(bits: [u8; N]) -> Self {
        debug_assert!(bits.iter().all(|b| *b <= 1), "non-binary element in {bits:?}");
        Bits(bits)
    }

    /// Big-endian: the last bit is the least significant. Bits of `value`
    /// above position `N` are dropped.
    pub fn from_value(value: u16) -> Self {
        let mut bits = [0u8; N];
        for (i, bit) in bits.iter_mut().enumerate() {
            let shift = (N - 1 - i) as u32;
            *bit = (value.checked_shr(shift).unwrap_or(0) & 1) as u8;
        }
        Bits(bits)
    }

    pub fn value(&self) -> u16 {
        self.0
            .iter()
            .fold(0u16, |acc, bit| (acc << 1) | u16::from(*bit))
    }

    /// # Panics
    ///
    /// Panics if `index >= N`.
    pub fn get(&self, index: usize) -> u8 {
        self.0[index]
    }

    /// Toggles one bit in place.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`.
    pub fn flip(&mut self, index: usize) {
        self.0[index] ^= 1;
    }

    pub fn flipped(mut self, index: usize) -> Self {
        self.flip(index);
        self
    }

    /// XOR of all bits.
    pub fn parity(&self) -> u8 {
        self.0.iter().fold(0, |acc, bit| acc ^ bit)
    }

    /// Number of set bits.
    pub fn weight(&self) -> usize {
        self.0.iter().filter(|bit| **bit == 1).count()
    }

    pub fn as_array(&self) -> &[u8; N] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    /// The leading `M` bits.
    ///
    /// # Panics
    ///
    /// Panics if `M > N`.
    pub fn prefix<const M: usize>(&self) -> Bits<M> {
        assert!(M <= N, "prefix of {M} bits from a {N}-bit vector");
        let mut out = [0u8; M];
        out.copy_from_slice(&self.0[..M]);
        Bits(out)
    }
}

impl<const N: usize> Default for Bits<N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const N: usize> Index<usize> for Bits<N> {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        &self.0[index]
    }
}

impl<const N: usize> TryFrom<[u8; N]> for Bits<N> {
    type Error = BitsError;

    fn try_from(bits: [u8; N]) -> Result<Self, BitsError> {
        Bits::new(bits)
    }
}

impl<const N: usize> From<Bits<N>> for [u8; N] {
    fn from(bits: Bits<N>) -> Self {
        bits.0
    }
}

impl<const N: usize> FromStr for Bits<N> {
    type Err = BitsError;

    /// Parses `N` characters of `0`/`1`. Underscores and whitespace are
    /// accepted as visual separators (`"01_0110"`).
    fn from_str(s: &str) -> Result<Self, BitsError> {
        let mut bits = [0u8; N];
        let mut found = 0;

        for (index, ch) in s.chars().enumerate() {
            let bit = match ch {
                '0' => 0,
                '1' => 1,
                '_' => continue,
                c if c.is_whitespace() => continue,
                ch => return Err(BitsError::InvalidChar { index, ch }),
            };
            if found < N {
                bits[found] = bit;
            }
            found += 1;
        }

        if found != N {
            return Err(BitsError::WrongLength { expected: N, found });
        }
        Ok(Bits(bits))
    }
}

impl<const N: usize> fmt::Display for Bits<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.0 {
            write!(f, "{}", bit)?;
        }
        Ok(())
    }
}

impl<const N: usize> fmt::Debug for Bits<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bits<{}>({})", N, self)
    }
}

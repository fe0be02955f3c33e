//! Owned bit sequence consumed by the test battery.

use crate::error::{RandomnessError, Result};
use std::fmt;
use std::str::FromStr;

/// An ordered, finite sequence of binary digits.
///
/// Each element of the backing buffer is exactly `0` or `1`; every
/// constructor upholds this, so the tests never re-validate their input.
/// The sequence is immutable once built.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct BitSequence {
    bits: Vec<u8>,
}

impl BitSequence {
    /// Unpacks bytes into bits, most significant bit first.
    pub fn from_bytes_msb(data: &[u8]) -> Self {
        let mut bits = Vec::with_capacity(data.len() * 8);
        for &byte in data {
            for shift in (0..8).rev() {
                bits.push((byte >> shift) & 1);
            }
        }
        Self { bits }
    }

    /// Returns the bits, one `0`/`1` per element.
    #[inline]
    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    /// Returns the number of bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns true if the sequence holds no bits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Counts the set bits.
    pub fn ones(&self) -> usize {
        self.bits.iter().map(|&b| b as usize).sum()
    }

    /// Counts the clear bits.
    pub fn zeros(&self) -> usize {
        self.len() - self.ones()
    }

    /// Iterates over the bits as booleans.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().map(|&b| b == 1)
    }
}

impl FromStr for BitSequence {
    type Err = RandomnessError;

    /// Parses a string of `'0'` and `'1'` characters.
    fn from_str(s: &str) -> Result<Self> {
        let bits = s
            .chars()
            .enumerate()
            .map(|(position, c)| match c {
                '0' => Ok(0),
                '1' => Ok(1),
                found => Err(RandomnessError::MalformedSequence { position, found }),
            })
            .collect::<Result<Vec<u8>>>()?;
        Ok(Self { bits })
    }
}

impl FromIterator<bool> for BitSequence {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().map(u8::from).collect(),
        }
    }
}

impl fmt::Display for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.bits {
            f.write_str(if b == 1 { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitSequence")
            .field("len", &self.bits.len())
            .field("ones", &self.ones())
            .finish()
    }
}

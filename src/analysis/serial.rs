//! Serial (overlapping pattern) test, NIST SP 800-22 section 2.11.
//!
//! The sequence is treated as cyclic: the window starting at position `i`
//! reads bits `i, i+1, ..., i+L-1` modulo `n`. For `L-1 <= n` this is the
//! same as appending the first `L-1` bits to the end; for longer patterns
//! the window keeps wrapping around the sequence rather than being cut
//! short, so every window still holds `L` bits. Only the `m`-bit histogram is
//! built from the data; the `(m-1)`- and `(m-2)`-bit histograms are folded
//! from it, since every shorter window is a prefix of the `m`-bit window at
//! the same position.
//!
//! Memory grows as `2^m` counters, so `m` is capped at
//! [`MAX_PATTERN_LENGTH`]. The test is only statistically meaningful when
//! `n` is much larger than `2^m`; smaller inputs still produce valid
//! p-values and are logged.

use super::special::{p_value, SpecialFunctions, Statrs};
use crate::error::{RandomnessError, Result};
use crate::sequence::BitSequence;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pattern length used when the caller has no preference.
pub const DEFAULT_PATTERN_LENGTH: u32 = 16;

/// Largest accepted pattern length (`2^24` histogram buckets).
pub const MAX_PATTERN_LENGTH: u32 = 24;

/// Which p-value [`serial`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerialMode {
    /// `p1`, from the first difference.
    #[default]
    First,
    /// `min(p1, p2)`. Unverified convention, not a NIST combination rule.
    Both,
}

impl FromStr for SerialMode {
    type Err = RandomnessError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "first" => Ok(SerialMode::First),
            "both" => Ok(SerialMode::Both),
            other => Err(RandomnessError::invalid(format!(
                "unknown serial mode {other:?} (expected \"first\" or \"both\")"
            ))),
        }
    }
}

impl fmt::Display for SerialMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerialMode::First => f.write_str("first"),
            SerialMode::Both => f.write_str("both"),
        }
    }
}

/// Intermediate and final values of one serial test run.
#[derive(Debug, Clone, PartialEq)]
pub struct SerialStatistics {
    /// Pattern length `m`.
    pub pattern_length: u32,
    /// `psi^2` for window lengths `m`, `m-1`, `m-2`.
    pub psi_squared: [f64; 3],
    /// `psi^2_m - psi^2_{m-1}`.
    pub delta1: f64,
    /// `psi^2_m - 2 psi^2_{m-1} + psi^2_{m-2}`.
    pub delta2: f64,
    /// `Q(2^(m-1) / 2, delta1 / 2)`.
    pub p_value1: f64,
    /// `Q(2^(m-2) / 2, delta2 / 2)`.
    pub p_value2: f64,
}

impl SerialStatistics {
    /// Selects the reported p-value.
    pub fn p_value(&self, mode: SerialMode) -> f64 {
        match mode {
            SerialMode::First => self.p_value1,
            SerialMode::Both => self.p_value1.min(self.p_value2),
        }
    }
}

/// Serial test, returning `p1` or `min(p1, p2)` depending on `mode`.
pub fn serial(bits: &BitSequence, pattern_length: u32, mode: SerialMode) -> Result<f64> {
    serial_with(&Statrs, bits, pattern_length, mode)
}

/// Serial test with an explicit special-function provider.
pub fn serial_with(
    special: &impl SpecialFunctions,
    bits: &BitSequence,
    pattern_length: u32,
    mode: SerialMode,
) -> Result<f64> {
    Ok(serial_statistics_with(special, bits, pattern_length)?.p_value(mode))
}

/// Computes every serial statistic for pattern length `m`.
pub fn serial_statistics(bits: &BitSequence, pattern_length: u32) -> Result<SerialStatistics> {
    serial_statistics_with(&Statrs, bits, pattern_length)
}

/// Computes every serial statistic with an explicit special-function provider.
pub fn serial_statistics_with(
    special: &impl SpecialFunctions,
    bits: &BitSequence,
    pattern_length: u32,
) -> Result<SerialStatistics> {
    let m = pattern_length;
    if bits.is_empty() {
        return Err(RandomnessError::EmptyInput);
    }
    if m < 2 {
        return Err(RandomnessError::invalid(format!(
            "pattern length {m} below 2"
        )));
    }
    check_pattern_length(m)?;

    let n = bits.len();
    if (1u64 << m) > n as u64 {
        tracing::warn!(
            pattern_length = m,
            n,
            "Sequence shorter than 2^m, serial p-values are not meaningful"
        );
    }

    let counts_m = pattern_counts(bits.bits(), m);
    let counts_m1 = fold(&counts_m);
    let counts_m2 = fold(&counts_m1);
    let sums = [
        sum_of_squares(&counts_m),
        sum_of_squares(&counts_m1),
        sum_of_squares(&counts_m2),
    ];

    let n_sq = (n as i128) * (n as i128);
    let psi_squared = [
        psi_from_sum(sums[0], m, n_sq, n),
        psi_from_sum(sums[1], m - 1, n_sq, n),
        psi_from_sum(sums[2], m - 2, n_sq, n),
    ];

    // The n terms cancel in both differences, leaving integer numerators
    let scaled_m = sums[0] << m;
    let scaled_m1 = sums[1] << (m - 1);
    let scaled_m2 = sums[2] << (m - 2);
    let delta1 = (scaled_m - scaled_m1) as f64 / n as f64;
    let mut delta2 = (scaled_m - 2 * scaled_m1 + scaled_m2) as f64 / n as f64;
    if delta2 < 0.0 {
        tracing::warn!(delta2, "Negative second difference clamped to zero");
        delta2 = 0.0;
    }

    let p_value1 = p_value(special.gamma_q(pow2(m - 1) / 2.0, delta1 / 2.0));
    let p_value2 = p_value(special.gamma_q(pow2(m - 2) / 2.0, delta2 / 2.0));

    tracing::trace!(
        pattern_length = m,
        n,
        delta1,
        delta2,
        p_value1,
        p_value2,
        "Serial"
    );

    Ok(SerialStatistics {
        pattern_length: m,
        psi_squared,
        delta1,
        delta2,
        p_value1,
        p_value2,
    })
}

/// `psi^2_L = (2^L / n) * sum(count^2) - n` over cyclic `L`-bit windows.
///
/// Defined for any `L` up to [`MAX_PATTERN_LENGTH`]; `psi^2_0` is 0. At
/// `L = 1` this equals `S^2 / n`, the square of the monobit statistic.
pub fn psi_squared(bits: &BitSequence, len: u32) -> Result<f64> {
    if bits.is_empty() {
        return Err(RandomnessError::EmptyInput);
    }
    check_pattern_length(len)?;

    let n = bits.len();
    let sum = sum_of_squares(&pattern_counts(bits.bits(), len));
    Ok(psi_from_sum(sum, len, (n as i128) * (n as i128), n))
}

fn check_pattern_length(len: u32) -> Result<()> {
    if len > MAX_PATTERN_LENGTH {
        return Err(RandomnessError::invalid(format!(
            "pattern length {len} above {MAX_PATTERN_LENGTH}"
        )));
    }
    Ok(())
}

/// Counts every cyclic overlapping window of `len` bits.
fn pattern_counts(bits: &[u8], len: u32) -> Vec<u64> {
    let n = bits.len();
    let len = len as usize;
    let mut counts = vec![0u64; 1 << len];
    if len == 0 {
        counts[0] = n as u64;
        return counts;
    }

    let mask = (1usize << len) - 1;
    let mut window = 0usize;
    for j in 0..len {
        window = (window << 1) | bits[j % n] as usize;
    }
    counts[window] += 1;

    for i in 1..n {
        window = ((window << 1) | bits[(i + len - 1) % n] as usize) & mask;
        counts[window] += 1;
    }
    counts
}

/// Folds `L`-bit counts into `(L-1)`-bit counts by dropping the last bit.
fn fold(counts: &[u64]) -> Vec<u64> {
    counts.chunks_exact(2).map(|pair| pair[0] + pair[1]).collect()
}

// Exact while 2^L * n^2 fits in i128.
fn sum_of_squares(counts: &[u64]) -> i128 {
    counts.iter().map(|&c| (c as i128) * (c as i128)).sum()
}

fn psi_from_sum(sum: i128, len: u32, n_sq: i128, n: usize) -> f64 {
    ((sum << len) - n_sq) as f64 / n as f64
}

fn pow2(exp: u32) -> f64 {
    (1u64 << exp) as f64
}

//! Frequency tests: monobit and block frequency.
//!
//! Both follow NIST SP 800-22 sections 2.1 and 2.2. The block statistic is
//! accumulated over integer counts so that no cancellation happens before
//! the final division.

use super::special::{p_value, SpecialFunctions, Statrs};
use crate::error::{RandomnessError, Result};
use crate::sequence::BitSequence;

/// Block size used when the caller has no preference.
pub const DEFAULT_BLOCK_SIZE: usize = 128;

/// Monobit frequency test.
///
/// `S = ones - zeros`, `s_obs = |S| / sqrt(n)`, `p = erfc(s_obs / sqrt(2))`.
pub fn monobit(bits: &BitSequence) -> Result<f64> {
    monobit_with(&Statrs, bits)
}

/// Monobit frequency test with an explicit special-function provider.
pub fn monobit_with(special: &impl SpecialFunctions, bits: &BitSequence) -> Result<f64> {
    let n = bits.len();
    if n == 0 {
        return Err(RandomnessError::EmptyInput);
    }

    let s = 2 * bits.ones() as i64 - n as i64;
    let s_obs = (s as f64).abs() / (n as f64).sqrt();
    let p = special.erfc(s_obs / std::f64::consts::SQRT_2);

    tracing::trace!(n, s, s_obs, p, "Monobit");
    Ok(p_value(p))
}

/// Block frequency test.
///
/// Splits the sequence into `floor(n / M)` blocks, discarding the tail,
/// and returns `Q(k / 2, chi^2 / 2)` with
/// `chi^2 = 4M * sum((ones_i / M - 1/2)^2)`.
pub fn block_frequency(bits: &BitSequence, block_size: usize) -> Result<f64> {
    block_frequency_with(&Statrs, bits, block_size)
}

/// Block frequency test with an explicit special-function provider.
pub fn block_frequency_with(
    special: &impl SpecialFunctions,
    bits: &BitSequence,
    block_size: usize,
) -> Result<f64> {
    if bits.is_empty() {
        return Err(RandomnessError::EmptyInput);
    }
    if block_size == 0 {
        return Err(RandomnessError::invalid("block size must be positive"));
    }
    let num_blocks = bits.len() / block_size;
    if num_blocks == 0 {
        return Err(RandomnessError::invalid(format!(
            "sequence of {} bits is shorter than one {block_size}-bit block",
            bits.len()
        )));
    }

    // 4M * (ones/M - 1/2)^2 == (2 * ones - M)^2 / M
    let numerator: u128 = bits
        .bits()
        .chunks_exact(block_size)
        .map(|block| {
            let ones: usize = block.iter().map(|&b| b as usize).sum();
            let diff = (2 * ones).abs_diff(block_size) as u128;
            diff * diff
        })
        .sum();
    let chi_squared = numerator as f64 / block_size as f64;
    let p = special.gamma_q(num_blocks as f64 / 2.0, chi_squared / 2.0);

    tracing::trace!(
        block_size,
        num_blocks,
        discarded = bits.len() % block_size,
        chi_squared,
        p,
        "Block frequency"
    );
    Ok(p_value(p))
}

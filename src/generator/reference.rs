//! ChaCha20 reference bit source.
//!
//! A known-good baseline for the test battery: a healthy battery run on
//! this source should pass, so a failing LFSR run can be attributed to the
//! register rather than to the test parameters.

use crate::sequence::BitSequence;
use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

/// Deterministic ChaCha20-backed bit source.
pub struct ReferenceSource {
    inner: ChaCha20Rng,
    bits_emitted: u64,
}

impl ReferenceSource {
    /// Creates a source from a 64-bit seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: ChaCha20Rng::seed_from_u64(seed),
            bits_emitted: 0,
        }
    }

    /// Draws the next `len` bits.
    pub fn bits(&mut self, len: usize) -> BitSequence {
        let mut bytes = vec![0u8; len.div_ceil(8)];
        self.inner.fill_bytes(&mut bytes);
        self.bits_emitted += len as u64;

        tracing::trace!(len, total = self.bits_emitted, "Drew reference bits");

        BitSequence::from_bytes_msb(&bytes).iter().take(len).collect()
    }

    /// Returns the total number of bits drawn.
    pub fn bits_emitted(&self) -> u64 {
        self.bits_emitted
    }
}

impl std::fmt::Debug for ReferenceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceSource")
            .field("bits_emitted", &self.bits_emitted)
            .finish_non_exhaustive()
    }
}

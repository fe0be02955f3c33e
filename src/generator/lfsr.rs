//! Linear-feedback shift register bit generator.
//!
//! # Feedback rule
//!
//! Each step starts an accumulator at 1 and toggles it once for every tap
//! whose register bit is set. The accumulator is the feedback bit: it is
//! shifted in at the most significant position while the register shifts
//! right by one. Because the accumulator starts at 1, a register with an
//! even number of set tapped bits (including none) feeds back 1. This is
//! the complement of the textbook XOR-of-taps register and is kept as is,
//! since every downstream p-value depends on the exact output sequence.
//!
//! # Termination
//!
//! A run stops as soon as the register returns to the seed. When tap 1 is
//! absent the step map is not injective and the seed may never recur, so a
//! run is also cut off after `2^nbits` steps, by which point some state has
//! necessarily repeated.

use crate::error::{RandomnessError, Result};
use crate::sequence::BitSequence;
use std::iter::FusedIterator;

/// Widest supported register.
pub const MAX_NBITS: u32 = 63;

/// One generator step: the emitted feedback bit and the register after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Feedback bit, `0` or `1`.
    pub bit: u8,
    /// Register contents after the shift.
    pub state: u64,
}

/// Validated generator parameters.
///
/// An `Lfsr` holds no running state; every call to [`Lfsr::steps`] starts
/// a fresh run from the seed, so identical parameters always yield
/// identical sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lfsr {
    seed: u64,
    taps: Vec<u32>,
    tap_mask: u64,
    nbits: u32,
}

impl Lfsr {
    /// Validates the parameters and builds a generator.
    ///
    /// `taps` are 1-indexed register positions; they must be distinct and
    /// lie in `[1, nbits]`. The seed must fit in `nbits` bits.
    pub fn new(seed: u64, taps: &[u32], nbits: u32) -> Result<Self> {
        if nbits == 0 || nbits > MAX_NBITS {
            return Err(RandomnessError::invalid(format!(
                "register width {nbits} outside 1..={MAX_NBITS}"
            )));
        }

        let mut tap_mask = 0u64;
        for &tap in taps {
            if tap == 0 || tap > nbits {
                return Err(RandomnessError::invalid(format!(
                    "tap position {tap} outside 1..={nbits}"
                )));
            }
            let bit = 1u64 << (tap - 1);
            if tap_mask & bit != 0 {
                return Err(RandomnessError::invalid(format!(
                    "tap position {tap} listed more than once"
                )));
            }
            tap_mask |= bit;
        }

        if seed >> nbits != 0 {
            return Err(RandomnessError::invalid(format!(
                "seed {seed:#b} does not fit in {nbits} bits"
            )));
        }

        Ok(Self {
            seed,
            taps: taps.to_vec(),
            tap_mask,
            nbits,
        })
    }

    /// Returns the seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the tap positions in the order given.
    #[inline]
    pub fn taps(&self) -> &[u32] {
        &self.taps
    }

    /// Returns the register width.
    #[inline]
    pub fn nbits(&self) -> u32 {
        self.nbits
    }

    /// Starts a new run from the seed.
    pub fn steps(&self) -> Steps {
        Steps {
            seed: self.seed,
            state: self.seed,
            tap_mask: self.tap_mask,
            nbits: self.nbits,
            emitted: 0,
            limit: 1u64 << self.nbits,
            closed: false,
            finished: false,
        }
    }

    /// Materializes one full period as a bit sequence.
    ///
    /// Fails with `InvalidParameter` if the seed is not on a cycle of the
    /// feedback map.
    pub fn generate(&self) -> Result<BitSequence> {
        let mut steps = self.steps();
        let bits: BitSequence = steps.by_ref().map(|step| step.bit == 1).collect();
        self.check_closed(&steps)?;

        if bits.len() == 1 {
            tracing::warn!(
                seed = self.seed,
                "Seed is a fixed point of the feedback map, cycle has a single step"
            );
        }
        tracing::debug!(
            seed = self.seed,
            nbits = self.nbits,
            period = bits.len(),
            "Generated LFSR cycle"
        );

        Ok(bits)
    }

    /// Counts the steps until the register returns to the seed.
    pub fn period(&self) -> Result<u64> {
        let mut steps = self.steps();
        let period = steps.by_ref().count() as u64;
        self.check_closed(&steps)?;
        Ok(period)
    }

    fn check_closed(&self, steps: &Steps) -> Result<()> {
        if steps.is_closed() {
            return Ok(());
        }
        Err(RandomnessError::invalid(format!(
            "seed {:#b} never recurs under taps {:?} (width {})",
            self.seed, self.taps, self.nbits
        )))
    }
}

/// Iterator over the steps of one generator run.
///
/// Finite: yields at most `2^nbits` steps.
#[derive(Debug, Clone)]
pub struct Steps {
    seed: u64,
    state: u64,
    tap_mask: u64,
    nbits: u32,
    emitted: u64,
    limit: u64,
    closed: bool,
    finished: bool,
}

impl Steps {
    /// Returns true once the register has returned to the seed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns the number of steps emitted so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl Iterator for Steps {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        if self.finished {
            return None;
        }

        let bit = feedback(self.state, self.tap_mask);
        self.state = (u64::from(bit) << (self.nbits - 1)) | (self.state >> 1);
        self.emitted += 1;

        if self.state == self.seed {
            self.closed = true;
            self.finished = true;
        } else if self.emitted >= self.limit {
            self.finished = true;
            tracing::debug!(
                seed = self.seed,
                steps = self.emitted,
                "Seed did not recur, run cut off"
            );
        }

        Some(Step {
            bit,
            state: self.state,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            return (0, Some(0));
        }
        let remaining = usize::try_from(self.limit - self.emitted).ok();
        (1, remaining)
    }
}

impl FusedIterator for Steps {}

/// Starts a generator run for the given seed, taps and register width.
pub fn generate(seed: u64, taps: &[u32], nbits: u32) -> Result<Steps> {
    Ok(Lfsr::new(seed, taps, nbits)?.steps())
}

/// Accumulator starts at 1 and toggles per set tapped bit.
#[inline]
fn feedback(state: u64, tap_mask: u64) -> u8 {
    1 ^ ((state & tap_mask).count_ones() & 1) as u8
}

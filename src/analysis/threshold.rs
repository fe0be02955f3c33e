//! Significance level and pass/fail verdicts.
//!
//! The tests themselves only return p-values. Interpreting them against
//! a significance level happens here, outside the core computations.

use super::battery::TestKind;
use crate::error::{RandomnessError, Result};
use serde::{Deserialize, Serialize};

/// Significance level `alpha`: a p-value at or above it is consistent
/// with randomness.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Significance(f64);

impl Default for Significance {
    fn default() -> Self {
        Self(0.01)
    }
}

impl Significance {
    /// Creates a significance level, which must lie strictly inside (0, 1).
    pub fn new(alpha: f64) -> Result<Self> {
        let level = Self(alpha);
        level.validate()?;
        Ok(level)
    }

    /// Stricter level for long sequences.
    pub fn strict() -> Self {
        Self(0.001)
    }

    /// Returns `alpha`.
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.0
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.0 > 0.0 && self.0 < 1.0) {
            return Err(RandomnessError::invalid(format!(
                "significance level {} outside (0, 1)",
                self.0
            )));
        }
        Ok(())
    }

    /// Checks a p-value against this level.
    pub fn check(&self, test: TestKind, p_value: f64) -> std::result::Result<(), ThresholdViolation> {
        if p_value >= self.0 {
            return Ok(());
        }
        Err(ThresholdViolation {
            test,
            p_value,
            alpha: self.0,
        })
    }
}

/// A test whose p-value fell below the significance level.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{test} p-value {p_value:.6} below significance level {alpha}")]
pub struct ThresholdViolation {
    /// The failing test.
    pub test: TestKind,
    /// Its p-value.
    pub p_value: f64,
    /// The level it was checked against.
    pub alpha: f64,
}

//! Battery runner.
//!
//! Runs the three tests on one sequence with a fixed configuration and
//! collects the p-values into a report. A test that cannot run aborts the
//! whole battery; there is no partial report.

use super::{
    frequency::{block_frequency_with, monobit_with, DEFAULT_BLOCK_SIZE},
    serial::{serial_statistics_with, SerialMode, DEFAULT_PATTERN_LENGTH, MAX_PATTERN_LENGTH},
    special::{SpecialFunctions, Statrs},
    threshold::{Significance, ThresholdViolation},
};
use crate::error::{RandomnessError, Result};
use crate::sequence::BitSequence;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a test in the battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestKind {
    /// Frequency (monobit) test.
    Monobit,
    /// Frequency test within blocks.
    BlockFrequency,
    /// Serial test, in the configured [`SerialMode`].
    Serial,
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TestKind::Monobit => "monobit",
            TestKind::BlockFrequency => "block frequency",
            TestKind::Serial => "serial",
        };
        f.write_str(name)
    }
}

/// Test parameters for a battery run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryConfig {
    /// Block size `M` for the block frequency test.
    pub block_size: usize,
    /// Pattern length `m` for the serial test.
    pub pattern_length: u32,
    /// Which serial p-value to report.
    pub serial_mode: SerialMode,
    /// Significance level for pass/fail.
    pub significance: Significance,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            pattern_length: DEFAULT_PATTERN_LENGTH,
            serial_mode: SerialMode::First,
            significance: Significance::default(),
        }
    }
}

impl BatteryConfig {
    /// Validates the parameters that do not depend on the input length.
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(RandomnessError::invalid("block size must be positive"));
        }
        if !(2..=MAX_PATTERN_LENGTH).contains(&self.pattern_length) {
            return Err(RandomnessError::invalid(format!(
                "pattern length {} outside 2..={MAX_PATTERN_LENGTH}",
                self.pattern_length
            )));
        }
        self.significance.validate()
    }
}

/// The p-value of one test and its verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct TestOutcome {
    /// Which test ran.
    pub kind: TestKind,
    /// Its p-value, in `[0, 1]`.
    pub p_value: f64,
    /// Whether `p_value` reached the significance level.
    pub passed: bool,
}

/// Results of a full battery run.
#[derive(Debug, Clone)]
pub struct BatteryReport {
    /// One outcome per test, in battery order.
    pub outcomes: Vec<TestOutcome>,
    /// Level the verdicts were computed against.
    pub significance: Significance,
    /// Number of bits tested.
    pub sequence_len: usize,
}

impl BatteryReport {
    /// Returns true if every test passed.
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    /// Returns the outcome of one test.
    pub fn outcome(&self, kind: TestKind) -> Option<&TestOutcome> {
        self.outcomes.iter().find(|o| o.kind == kind)
    }

    /// Lists the tests that fell below the significance level.
    pub fn violations(&self) -> Vec<ThresholdViolation> {
        self.outcomes
            .iter()
            .filter_map(|o| self.significance.check(o.kind, o.p_value).err())
            .collect()
    }
}

/// Runs the monobit, block frequency and serial tests.
pub struct Battery<S = Statrs> {
    config: BatteryConfig,
    special: S,
}

impl Battery {
    /// Creates a battery backed by the default special functions.
    pub fn new(config: BatteryConfig) -> Result<Self> {
        Self::with_special(config, Statrs)
    }
}

impl<S: SpecialFunctions> Battery<S> {
    /// Creates a battery backed by the given special functions.
    pub fn with_special(config: BatteryConfig, special: S) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, special })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BatteryConfig {
        &self.config
    }

    /// Runs every test on `bits`.
    pub fn run(&self, bits: &BitSequence) -> Result<BatteryReport> {
        let cfg = &self.config;
        let p_values = [
            (TestKind::Monobit, monobit_with(&self.special, bits)?),
            (
                TestKind::BlockFrequency,
                block_frequency_with(&self.special, bits, cfg.block_size)?,
            ),
            (
                TestKind::Serial,
                serial_statistics_with(&self.special, bits, cfg.pattern_length)?
                    .p_value(cfg.serial_mode),
            ),
        ];

        let outcomes: Vec<TestOutcome> = p_values
            .into_iter()
            .map(|(kind, p_value)| {
                let passed = match cfg.significance.check(kind, p_value) {
                    Ok(()) => true,
                    Err(violation) => {
                        tracing::warn!(violation = %violation, "Test failed");
                        false
                    }
                };
                TestOutcome {
                    kind,
                    p_value,
                    passed,
                }
            })
            .collect();

        let report = BatteryReport {
            outcomes,
            significance: cfg.significance,
            sequence_len: bits.len(),
        };

        tracing::debug!(
            n = bits.len(),
            passed = report.outcomes.iter().filter(|o| o.passed).count(),
            total = report.outcomes.len(),
            "Battery complete"
        );
        Ok(report)
    }
}

impl Default for Battery {
    fn default() -> Self {
        Self {
            config: BatteryConfig::default(),
            special: Statrs,
        }
    }
}

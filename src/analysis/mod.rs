//! Statistical test battery.
//!
//! Three tests from NIST SP 800-22, each reducing a bit sequence to a
//! p-value: monobit frequency, block frequency and serial. They are pure
//! functions of their input. The [`Battery`] runner and [`Significance`]
//! level add pass/fail interpretation on top.

mod battery;
mod frequency;
mod serial;
mod special;
mod threshold;

pub use battery::{Battery, BatteryConfig, BatteryReport, TestKind, TestOutcome};
pub use frequency::{
    block_frequency, block_frequency_with, monobit, monobit_with, DEFAULT_BLOCK_SIZE,
};
pub use serial::{
    psi_squared, serial, serial_statistics, serial_statistics_with, serial_with, SerialMode,
    SerialStatistics, DEFAULT_PATTERN_LENGTH, MAX_PATTERN_LENGTH,
};
pub use special::{SpecialFunctions, Statrs};
pub use threshold::{Significance, ThresholdViolation};

//! LFSR Randomness Battery
//!
//! A linear-feedback bit generator and a statistical test battery that
//! checks whether its output looks like a true random source.
//!
//! # Architecture
//!
//! ```text
//! generator → BitSequence → analysis (monobit, block frequency, serial)
//!                                 ↓
//!                       p-values → Significance verdict
//! ```
//!
//! # Design Principles
//!
//! - **Pure**: every test is a function of its input, with no shared state
//! - **Deterministic**: identical generator parameters give identical bits
//! - **Explicit errors**: degenerate sizing is reported, never computed through
//! - **No cryptographic claims**: passing three tests is not proof of randomness
//!
//! # Example
//!
//! ```no_run
//! use lfsr_battery::{
//!     analysis::{block_frequency, monobit, serial, SerialMode},
//!     generator::Lfsr,
//! };
//!
//! let lfsr = Lfsr::new(0b1001_1011, &[8, 7, 6, 1], 8).unwrap();
//! let bits = lfsr.generate().unwrap();
//!
//! println!("monobit:         {:.6}", monobit(&bits).unwrap());
//! println!("block frequency: {:.6}", block_frequency(&bits, 128).unwrap());
//! println!("serial:          {:.6}", serial(&bits, 16, SerialMode::First).unwrap());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod generator;
pub mod sequence;

// Re-export commonly used types at crate root
pub use analysis::{Battery, BatteryConfig, BatteryReport, SerialMode, Significance, TestKind};
pub use config::{ConfigError, FileConfig, GeneratorConfig};
pub use error::{RandomnessError, Result};
pub use generator::{Lfsr, ReferenceSource};
pub use sequence::BitSequence;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

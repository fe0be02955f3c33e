//! Bit generators.
//!
//! The [`Lfsr`] is the generator under test. [`ReferenceSource`] is a
//! ChaCha20 stream used as a baseline when calibrating the battery.

mod lfsr;
mod reference;

pub use lfsr::{generate, Lfsr, Step, Steps, MAX_NBITS};
pub use reference::ReferenceSource;

//! Bit sequences.
//!
//! The generator produces a [`BitSequence`] and every test in the
//! battery reads one. Sequences are immutable after construction.

mod bitstream;

pub use bitstream::BitSequence;

//! Error types shared by the generator and the test battery.

use thiserror::Error;

/// Errors reported by the generator, the bit sequence parser and the tests.
///
/// Every error is raised synchronously at the point of detection. The
/// computations are pure, so retrying with the same inputs is pointless.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RandomnessError {
    /// A generator or test parameter is out of range for the input.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A test was given a zero-length sequence.
    #[error("empty input: the bit sequence contains no bits")]
    EmptyInput,

    /// Text input contained a character other than `0` or `1`.
    #[error("malformed sequence: {found:?} at position {position} is not a binary digit")]
    MalformedSequence {
        /// Zero-based character index.
        position: usize,
        /// The offending character.
        found: char,
    },
}

impl RandomnessError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        RandomnessError::InvalidParameter(msg.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RandomnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_parameter() {
        let err = RandomnessError::invalid("block size must be positive");
        assert_eq!(
            err.to_string(),
            "invalid parameter: block size must be positive"
        );
    }

    #[test]
    fn test_display_malformed_sequence() {
        let err = RandomnessError::MalformedSequence {
            position: 3,
            found: 'x',
        };
        assert_eq!(
            err.to_string(),
            "malformed sequence: 'x' at position 3 is not a binary digit"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(RandomnessError::EmptyInput, RandomnessError::EmptyInput);
        assert_ne!(
            RandomnessError::EmptyInput,
            RandomnessError::invalid("x")
        );
    }
}

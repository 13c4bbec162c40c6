//! Error type shared by units, bandits and the trainer.

use thiserror::Error;

/// Errors surfaced by construction and by the training loop.
///
/// Nothing is retried: an error aborts whatever produced it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A constructor or config argument is malformed or out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An input batch (or reward batch) does not match the configured shape.
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// A pulled arm index is not one of the bandit's arms.
    #[error("arm {arm} out of range for bandit with {num_arms} arms")]
    ArmOutOfRange { arm: usize, num_arms: usize },
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

//! Construction and configuration errors.
//!
//! Runtime problems inside a phase (a video failing to load, a play request
//! being rejected) are states of that phase, not errors. Everything here is
//! raised while building things.

use thiserror::Error;

/// A show script could not be loaded or is inconsistent.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The script JSON failed to parse.
    #[error("invalid show script: {0}")]
    Parse(#[from] serde_json::Error),

    /// An act lists no phases.
    #[error("act {act} has no phases")]
    EmptyAct { act: u32 },

    /// A cipher word does not have the configured length.
    #[error("cipher word {word:?} has length {actual}, expected {expected}")]
    CipherWordLength {
        word: String,
        actual: usize,
        expected: usize,
    },

    /// A repeating sub-timeline was configured with a zero interval.
    #[error("{field} must be greater than zero")]
    ZeroInterval { field: &'static str },
}

/// A navigator was built for an act it cannot index.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("cannot navigate an act with no phases")]
    EmptyAct,

    #[error("the script has no act at index {index}")]
    NoSuchAct { index: usize },
}

/// Guess evaluation failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    #[error("guess has {guess} letters but the target has {target}")]
    LengthMismatch { guess: usize, target: usize },
}

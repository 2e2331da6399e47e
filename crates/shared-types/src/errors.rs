//! # Error Types
//!
//! Errors raised while constructing primitive values from untrusted input.

use thiserror::Error;

/// Errors from parsing or validating primitive values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypesError {
    /// Input was not valid hexadecimal.
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    /// Decoded byte string had the wrong length.
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Network type byte is not one of the known networks.
    #[error("Unknown network type: {0:#04x}")]
    UnknownNetworkType(u8),
}

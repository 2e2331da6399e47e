//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Signature verification failed
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Invalid public key
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Invalid private key or key material
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Invalid signature encoding
    #[error("Invalid signature")]
    InvalidSignature,

    /// BLS aggregation failed
    #[error("BLS aggregation failed")]
    AggregationFailed,

    /// Aggregation over an empty set
    #[error("Empty aggregation")]
    EmptyAggregation,
}

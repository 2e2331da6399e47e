//! Transaction error types.

use shared_crypto::CryptoError;
use sm_01_domain_model::ModelError;
use sm_02_wire_codec::CodecError;
use thiserror::Error;

/// Errors from building, encoding, decoding or signing transactions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransactionError {
    /// Wire-level failure (malformed buffer, schema mismatch).
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Body failed a model rule.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Signing or signature verification failed.
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Configuration rejected by `validate`.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TransactionError {
    pub(crate) fn schema(detail: impl Into<String>) -> Self {
        Self::Codec(CodecError::SchemaMismatch(detail.into()))
    }
}

//! Cosigning error types.

use shared_crypto::CryptoError;
use shared_types::{to_hex, EntityType, Hash, PublicKey};
use sm_03_transactions::TransactionError;
use thiserror::Error;

/// Errors raised while building or cosigning an aggregate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CosignError {
    #[error("Not an aggregate transaction: {0:?}")]
    NotAggregate(EntityType),

    #[error("Empty aggregate: no inner transactions")]
    EmptyAggregate,

    /// Cosignatures only bind to a hash computed from a signed aggregate.
    #[error("Aggregate is not signed by its initiator")]
    Unsigned,

    #[error("Unexpected cosigner: {}", to_hex(.0))]
    UnexpectedSigner(PublicKey),

    #[error("Invalid cosignature from {}", to_hex(.0))]
    InvalidCosignature(PublicKey),

    /// Two accumulators for different aggregates cannot be merged.
    #[error("Aggregate hash mismatch: expected {}, got {}", to_hex(.expected), to_hex(.actual))]
    HashMismatch {
        expected: Hash,
        actual: Hash,
    },

    /// Some inner signers have not cosigned yet.
    #[error("Incomplete cosignatures: {} signer(s) missing", .missing.len())]
    IncompleteCosignatures { missing: Vec<PublicKey> },

    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

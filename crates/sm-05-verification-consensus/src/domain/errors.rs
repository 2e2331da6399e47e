//! Verification consensus error types.

use shared_crypto::CryptoError;
use sm_01_domain_model::ModelError;
use sm_03_transactions::TransactionError;
use thiserror::Error;

/// Errors raised while collecting or packaging opinions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VerificationError {
    /// Opinion shapes do not line up with the provers.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),

    /// The verifier index is not a position in the prover list.
    #[error("Verifier out of range: {verifier} (provers: {provers})")]
    VerifierOutOfRange { verifier: u16, provers: usize },

    /// Result at `index` names a different prover.
    #[error("Result out of order: verifier {verifier}, index {index} names prover {prover}")]
    ResultOutOfOrder {
        verifier: u16,
        index: usize,
        prover: u16,
    },

    /// The verifier already submitted a different opinion.
    #[error("Conflicting opinion from verifier {verifier}")]
    ConflictingOpinion { verifier: u16 },

    /// BLS key list does not cover every prover.
    #[error("BLS key count mismatch: expected {expected}, got {actual}")]
    KeyCountMismatch { expected: usize, actual: usize },

    /// An opinion's BLS signature does not verify.
    #[error("Invalid opinion signature from verifier {verifier}")]
    InvalidOpinionSignature { verifier: u16 },

    /// The aggregate check over opinions sharing the same results failed.
    #[error("Aggregate opinion signature invalid ({signers} signers)")]
    AggregateSignatureInvalid { signers: usize },
}

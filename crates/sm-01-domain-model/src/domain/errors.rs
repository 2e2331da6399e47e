//! Domain model error types.

use shared_types::{to_hex, Hash, PublicKey};
use thiserror::Error;

/// Errors raised by domain record operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    /// A record was asked to move to a state it cannot reach.
    #[error("Invalid state transition for {subject}: {from} -> {to}")]
    InvalidStateTransition {
        subject: String,
        from: &'static str,
        to: &'static str,
    },

    /// The modification id is already in the active set.
    #[error("Duplicate modification: {}", to_hex(.0))]
    DuplicateModification(Hash),

    /// The modification id is neither active nor completed.
    #[error("Modification not found: {}", to_hex(.0))]
    ModificationNotFound(Hash),

    /// The replicator already serves this drive.
    #[error("Duplicate drive: {}", to_hex(.0))]
    DuplicateDrive(PublicKey),

    /// Opinions and provers do not line up.
    #[error("Consensus shape mismatch: {context} (expected {expected}, got {actual})")]
    ConsensusShapeMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A verification round needs at least one prover.
    #[error("Empty prover list")]
    EmptyProverList,
}

impl ModelError {
    pub(crate) fn modification_completed(id: &Hash, to: &'static str) -> Self {
        Self::InvalidStateTransition {
            subject: format!("modification {}", to_hex(id)),
            from: "Completed",
            to,
        }
    }
}

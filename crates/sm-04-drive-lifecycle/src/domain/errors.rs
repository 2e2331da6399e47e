//! Lifecycle error types.

use shared_types::{to_hex, Hash, PublicKey};
use sm_01_domain_model::ModelError;
use thiserror::Error;

/// Errors raised while applying observed drive events.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LifecycleError {
    /// The event cannot happen in the drive's current status.
    #[error("Invalid state transition for drive {}: {event} in {from}", to_hex(.drive))]
    InvalidStateTransition {
        drive: PublicKey,
        from: &'static str,
        event: &'static str,
    },

    /// The replicator is already serving the drive.
    #[error("Duplicate replicator: {}", to_hex(.0))]
    DuplicateReplicator(PublicKey),

    /// The end of a verification round names a different trigger than the
    /// running round.
    #[error(
        "Verification trigger mismatch: expected {}, got {}",
        to_hex(.expected),
        to_hex(.actual)
    )]
    TriggerMismatch { expected: Hash, actual: Hash },

    /// The event belongs to a different drive.
    #[error("Event for another drive: {}", to_hex(.0))]
    WrongDrive(PublicKey),

    /// The drive record rejected a modification change.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

//! # Observed Drive Events
//!
//! What the ledger reports about a drive, in the order it reports it.

use shared_types::{Hash, PublicKey, StorageSize};
use sm_01_domain_model::ActiveDataModification;
use sm_03_transactions::{Transaction, TransactionBody};

/// A change the ledger has accepted for one drive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DriveEvent {
    /// A replicator started serving the drive.
    ReplicatorJoined { replicator: PublicKey },
    /// The owner submitted a filesystem change.
    ModificationSubmitted(ActiveDataModification),
    /// Replicators approved a modification and reported the new content root.
    ModificationApproved {
        id: Hash,
        root_hash: Hash,
        used_size: StorageSize,
        meta_files_size: StorageSize,
    },
    /// The owner cancelled a modification.
    ModificationCancelled { id: Hash },
    /// A verification round started with the given trigger.
    VerificationStarted { trigger: Hash },
    /// The round `trigger` ended; `failed` replicators were removed from the
    /// drive.
    VerificationEnded {
        trigger: Hash,
        failed: Vec<PublicKey>,
    },
    ClosureRequested,
    ClosureFinalized,
}

impl DriveEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReplicatorJoined { .. } => "ReplicatorJoined",
            Self::ModificationSubmitted(_) => "ModificationSubmitted",
            Self::ModificationApproved { .. } => "ModificationApproved",
            Self::ModificationCancelled { .. } => "ModificationCancelled",
            Self::VerificationStarted { .. } => "VerificationStarted",
            Self::VerificationEnded { .. } => "VerificationEnded",
            Self::ClosureRequested => "ClosureRequested",
            Self::ClosureFinalized => "ClosureFinalized",
        }
    }

    /// The drive event implied by an accepted owner transaction, with the
    /// drive it targets.
    ///
    /// `hash` is the transaction hash; a `DataModification` uses it as the
    /// new modification id. An `EndDriveVerificationV2` ends its round with
    /// no failed replicators, since adjudication happens on the ledger. Other
    /// transaction types yield `None`.
    pub fn from_transaction(tx: &Transaction, hash: &Hash) -> Option<(PublicKey, Self)> {
        match &tx.body {
            TransactionBody::DataModification(body) => Some((
                body.drive_key,
                Self::ModificationSubmitted(ActiveDataModification::new(
                    *hash,
                    tx.header.signer,
                    body.download_data_cdi,
                    body.upload_size,
                )),
            )),
            TransactionBody::DataModificationCancel(body) => Some((
                body.drive_key,
                Self::ModificationCancelled {
                    id: body.data_modification_id,
                },
            )),
            TransactionBody::DriveClosure(body) => Some((body.drive_key, Self::ClosureRequested)),
            TransactionBody::EndDriveVerificationV2(body) => Some((
                *body.drive_key(),
                Self::VerificationEnded {
                    trigger: *body.verification_trigger(),
                    failed: Vec::new(),
                },
            )),
            _ => None,
        }
    }
}

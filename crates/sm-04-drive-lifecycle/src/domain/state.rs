//! # Drive-State Record
//!
//! The snapshot delivered to subscribers after every accepted event.
//! `sequence` grows by one per event on the same drive.

use crate::domain::status::{DriveStatus, VerificationStatus};
use serde::{Deserialize, Serialize};
use shared_bus::BusEvent;
use shared_types::{Hash, PublicKey, StorageSize};
use sm_01_domain_model::{
    ActiveDataModification, BcDrive, CompletedDataModification, DataModificationState,
};

/// Topic name carried by every drive-state event.
pub const DRIVE_STATE_TOPIC: &str = "drive-state";

/// One modification as seen in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModificationSummary {
    pub id: Hash,
    pub upload_size: StorageSize,
    /// `None` while active.
    pub state: Option<DataModificationState>,
}

impl From<&ActiveDataModification> for ModificationSummary {
    fn from(modification: &ActiveDataModification) -> Self {
        Self {
            id: modification.id,
            upload_size: modification.upload_size,
            state: None,
        }
    }
}

impl From<&CompletedDataModification> for ModificationSummary {
    fn from(completed: &CompletedDataModification) -> Self {
        Self {
            id: *completed.id(),
            upload_size: completed.modification().upload_size,
            state: Some(completed.state()),
        }
    }
}

/// Drive status plus modification summaries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveState {
    pub drive_key: PublicKey,
    pub sequence: u64,
    pub status: DriveStatus,
    pub verification: VerificationStatus,
    pub root_hash: Hash,
    pub used_size: StorageSize,
    pub meta_files_size: StorageSize,
    pub replicators: Vec<PublicKey>,
    pub active_modifications: Vec<ModificationSummary>,
    pub completed_modifications: Vec<ModificationSummary>,
}

impl DriveState {
    pub fn snapshot(
        drive: &BcDrive,
        status: DriveStatus,
        verification: VerificationStatus,
        replicators: Vec<PublicKey>,
        sequence: u64,
    ) -> Self {
        Self {
            drive_key: drive.drive_key,
            sequence,
            status,
            verification,
            root_hash: drive.root_hash,
            used_size: drive.used_size,
            meta_files_size: drive.meta_files_size,
            replicators,
            active_modifications: drive.active_modifications().iter().map(Into::into).collect(),
            completed_modifications: drive
                .completed_modifications()
                .iter()
                .map(Into::into)
                .collect(),
        }
    }
}

impl BusEvent for DriveState {
    fn key(&self) -> PublicKey {
        self.drive_key
    }

    fn topic(&self) -> &'static str {
        DRIVE_STATE_TOPIC
    }
}

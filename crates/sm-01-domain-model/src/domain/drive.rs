//! # Drives and Data Modifications
//!
//! A `BcDrive` is a rented storage allocation. Owners change its content
//! through data modifications, each of which moves through a one-way
//! sub-machine:
//!
//! ```text
//! [Active] ──complete(Succeeded | Cancelled)──→ [Completed]
//! ```
//!
//! `ActiveDataModification::complete` consumes the active record, so a
//! completed modification can only be built from an active one. The drive
//! enforces that a completed id never appears in its active list again.

use crate::domain::errors::ModelError;
use serde::{Deserialize, Serialize};
use shared_types::{to_hex, Hash, PublicKey, StorageSize, ZERO_HASH};
use tracing::debug;

/// Terminal outcome of a data modification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DataModificationState {
    Succeeded = 0,
    Cancelled = 1,
}

impl DataModificationState {
    /// Parse the wire byte.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Succeeded),
            1 => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// A requested content change awaiting replicator approval.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveDataModification {
    /// Modification id (hash of the submitting transaction).
    pub id: Hash,
    /// Drive owner that requested the change.
    pub owner: PublicKey,
    /// Content digest of the uploaded payload.
    pub download_data_cdi: Hash,
    /// Declared upload size.
    pub upload_size: StorageSize,
}

impl ActiveDataModification {
    pub fn new(
        id: Hash,
        owner: PublicKey,
        download_data_cdi: Hash,
        upload_size: StorageSize,
    ) -> Self {
        Self {
            id,
            owner,
            download_data_cdi,
            upload_size,
        }
    }

    /// Resolve this modification. Consumes the active record.
    pub fn complete(self, state: DataModificationState) -> CompletedDataModification {
        CompletedDataModification {
            modification: self,
            state,
        }
    }
}

/// A resolved data modification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedDataModification {
    modification: ActiveDataModification,
    state: DataModificationState,
}

impl CompletedDataModification {
    /// The modification as it was while active.
    pub fn modification(&self) -> &ActiveDataModification {
        &self.modification
    }

    pub fn id(&self) -> &Hash {
        &self.modification.id
    }

    pub fn state(&self) -> DataModificationState {
        self.state
    }
}

/// A rented drive.
///
/// `used_size + meta_files_size <= drive_size` is the ledger's rule; the
/// record only carries the values. Deserialization goes through
/// [`BcDrive::with_modifications`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BcDriveRecord")]
pub struct BcDrive {
    /// Drive account key.
    pub drive_key: PublicKey,
    /// Owner account key.
    pub owner: PublicKey,
    /// Content root digest.
    pub root_hash: Hash,
    /// Declared capacity.
    pub drive_size: StorageSize,
    /// Capacity used by content.
    pub used_size: StorageSize,
    /// Capacity used by metadata files.
    pub meta_files_size: StorageSize,
    /// Replicators required to serve the drive.
    pub replicator_count: u16,
    active_data_modifications: Vec<ActiveDataModification>,
    completed_data_modifications: Vec<CompletedDataModification>,
}

/// Unchecked serialized form of [`BcDrive`].
#[derive(Deserialize)]
struct BcDriveRecord {
    drive_key: PublicKey,
    owner: PublicKey,
    root_hash: Hash,
    drive_size: StorageSize,
    used_size: StorageSize,
    meta_files_size: StorageSize,
    replicator_count: u16,
    active_data_modifications: Vec<ActiveDataModification>,
    completed_data_modifications: Vec<CompletedDataModification>,
}

impl TryFrom<BcDriveRecord> for BcDrive {
    type Error = ModelError;

    fn try_from(record: BcDriveRecord) -> Result<Self, Self::Error> {
        let mut drive = Self::new(
            record.drive_key,
            record.owner,
            record.drive_size,
            record.replicator_count,
        );
        drive.root_hash = record.root_hash;
        drive.used_size = record.used_size;
        drive.meta_files_size = record.meta_files_size;
        drive.with_modifications(
            record.active_data_modifications,
            record.completed_data_modifications,
        )
    }
}

impl BcDrive {
    /// A freshly prepared drive with no content.
    pub fn new(
        drive_key: PublicKey,
        owner: PublicKey,
        drive_size: StorageSize,
        replicator_count: u16,
    ) -> Self {
        Self {
            drive_key,
            owner,
            root_hash: ZERO_HASH,
            drive_size,
            used_size: StorageSize(0),
            meta_files_size: StorageSize(0),
            replicator_count,
            active_data_modifications: Vec::new(),
            completed_data_modifications: Vec::new(),
        }
    }

    /// Attach modification lists to a drive record, e.g. one decoded from a
    /// query response. Rejects lists that break the completion invariant.
    pub fn with_modifications(
        mut self,
        active: Vec<ActiveDataModification>,
        completed: Vec<CompletedDataModification>,
    ) -> Result<Self, ModelError> {
        self.active_data_modifications.clear();
        self.completed_data_modifications = completed;
        for modification in active {
            self.add_modification(modification)?;
        }
        Ok(self)
    }

    pub fn active_modifications(&self) -> &[ActiveDataModification] {
        &self.active_data_modifications
    }

    pub fn completed_modifications(&self) -> &[CompletedDataModification] {
        &self.completed_data_modifications
    }

    pub fn find_active(&self, id: &Hash) -> Option<&ActiveDataModification> {
        self.active_data_modifications.iter().find(|m| &m.id == id)
    }

    pub fn find_completed(&self, id: &Hash) -> Option<&CompletedDataModification> {
        self.completed_data_modifications
            .iter()
            .find(|m| m.id() == id)
    }

    pub fn is_completed(&self, id: &Hash) -> bool {
        self.find_completed(id).is_some()
    }

    /// Append a new active modification.
    pub fn add_modification(
        &mut self,
        modification: ActiveDataModification,
    ) -> Result<(), ModelError> {
        if self.is_completed(&modification.id) {
            return Err(ModelError::modification_completed(&modification.id, "Active"));
        }
        if self.find_active(&modification.id).is_some() {
            return Err(ModelError::DuplicateModification(modification.id));
        }

        debug!(
            drive = %to_hex(&self.drive_key),
            id = %to_hex(&modification.id),
            upload_size = modification.upload_size.value(),
            "Data modification added"
        );
        self.active_data_modifications.push(modification);
        Ok(())
    }

    /// Move an active modification to the completed list.
    ///
    /// The remaining active modifications keep their order.
    pub fn complete_modification(
        &mut self,
        id: &Hash,
        state: DataModificationState,
    ) -> Result<&CompletedDataModification, ModelError> {
        let Some(position) = self
            .active_data_modifications
            .iter()
            .position(|m| &m.id == id)
        else {
            if self.is_completed(id) {
                return Err(ModelError::modification_completed(id, "Completed"));
            }
            return Err(ModelError::ModificationNotFound(*id));
        };

        let completed = self.active_data_modifications.remove(position).complete(state);
        debug!(
            drive = %to_hex(&self.drive_key),
            id = %to_hex(id),
            ?state,
            "Data modification completed"
        );
        self.completed_data_modifications.push(completed);

        let last = self.completed_data_modifications.len() - 1;
        Ok(&self.completed_data_modifications[last])
    }

    /// Capacity not yet used by content or metadata.
    pub fn free_size(&self) -> StorageSize {
        StorageSize(
            self.drive_size
                .value()
                .saturating_sub(self.used_size.value())
                .saturating_sub(self.meta_files_size.value()),
        )
    }
}

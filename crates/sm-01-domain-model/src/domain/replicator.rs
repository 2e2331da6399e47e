//! # Replicators
//!
//! A replicator pledges capacity and serves any number of drives. Its
//! per-drive bookkeeping lives in a map keyed by drive key.
//!
//! Older replicator versions do not report a BLS key, so the key is an
//! explicit `Option` rather than an all-zero placeholder.

use crate::domain::errors::ModelError;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use shared_types::{Amount, BlsPublicKey, Hash, PublicKey, ZERO_HASH};
use std::collections::BTreeMap;

/// A replicator's view of one drive it serves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveInfo {
    /// Last data modification this replicator approved.
    pub last_approved_data_modification_id: Hash,
    /// Whether `last_approved_data_modification_id` is meaningful.
    pub data_modification_id_is_valid: bool,
    /// Download work owed when the replicator joined.
    pub initial_download_work: u64,
    /// Position of the drive in the replicator's insertion order.
    pub index: u32,
}

impl DriveInfo {
    /// Bookkeeping for a drive the replicator has just joined.
    pub fn joined(index: u32, initial_download_work: u64) -> Self {
        Self {
            last_approved_data_modification_id: ZERO_HASH,
            data_modification_id_is_valid: false,
            initial_download_work,
            index,
        }
    }

    /// Record an approved modification.
    pub fn approve(&mut self, id: Hash) {
        self.last_approved_data_modification_id = id;
        self.data_modification_id_is_valid = true;
    }

    /// The last approved modification, if one has been recorded.
    pub fn last_approved(&self) -> Option<&Hash> {
        self.data_modification_id_is_valid
            .then_some(&self.last_approved_data_modification_id)
    }
}

/// A storage provider node.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replicator {
    /// Replicator account key.
    pub key: PublicKey,
    /// Protocol version reported by the node.
    pub version: i32,
    /// Pledged capacity.
    pub capacity: Amount,
    /// BLS key for verification opinions, when reported.
    pub bls_key: Option<BlsPublicKey>,
    #[serde_as(as = "Vec<(_, _)>")]
    drives: BTreeMap<PublicKey, DriveInfo>,
}

impl Replicator {
    pub fn new(
        key: PublicKey,
        version: i32,
        capacity: Amount,
        bls_key: Option<BlsPublicKey>,
    ) -> Self {
        Self {
            key,
            version,
            capacity,
            bls_key,
            drives: BTreeMap::new(),
        }
    }

    /// Start serving a drive.
    pub fn add_drive(&mut self, drive_key: PublicKey, info: DriveInfo) -> Result<(), ModelError> {
        if self.drives.contains_key(&drive_key) {
            return Err(ModelError::DuplicateDrive(drive_key));
        }
        self.drives.insert(drive_key, info);
        Ok(())
    }

    /// Join a drive at the next insertion index. Returns that index.
    pub fn join_drive(
        &mut self,
        drive_key: PublicKey,
        initial_download_work: u64,
    ) -> Result<u32, ModelError> {
        let index = self.next_index();
        self.add_drive(drive_key, DriveInfo::joined(index, initial_download_work))?;
        Ok(index)
    }

    /// Stop serving a drive.
    pub fn remove_drive(&mut self, drive_key: &PublicKey) -> Option<DriveInfo> {
        self.drives.remove(drive_key)
    }

    pub fn drive_info(&self, drive_key: &PublicKey) -> Option<&DriveInfo> {
        self.drives.get(drive_key)
    }

    pub fn drive_info_mut(&mut self, drive_key: &PublicKey) -> Option<&mut DriveInfo> {
        self.drives.get_mut(drive_key)
    }

    pub fn serves(&self, drive_key: &PublicKey) -> bool {
        self.drives.contains_key(drive_key)
    }

    /// Served drives, ordered by drive key.
    pub fn drives(&self) -> impl Iterator<Item = (&PublicKey, &DriveInfo)> {
        self.drives.iter()
    }

    pub fn drive_count(&self) -> usize {
        self.drives.len()
    }

    fn next_index(&self) -> u32 {
        self.drives
            .values()
            .map(|info| info.index.saturating_add(1))
            .max()
            .unwrap_or(0)
    }
}

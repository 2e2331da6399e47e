//! # Drive Tracker
//!
//! Mirrors one drive. Each `apply` either rejects the event and leaves the
//! tracker untouched, or accepts it, bumps the sequence and publishes the
//! new `DriveState`.

use crate::domain::errors::LifecycleError;
use crate::domain::events::DriveEvent;
use crate::domain::state::DriveState;
use crate::domain::status::{DriveStatus, VerificationStatus};
use shared_bus::InMemoryEventBus;
use shared_types::{to_hex, Hash, PublicKey};
use sm_01_domain_model::{BcDrive, DataModificationState};
use sm_03_transactions::Transaction;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

pub struct DriveTracker {
    drive: BcDrive,
    status: DriveStatus,
    verification: VerificationStatus,
    replicators: BTreeSet<PublicKey>,
    verification_trigger: Option<Hash>,
    sequence: u64,
    bus: Option<Arc<InMemoryEventBus<DriveState>>>,
}

impl DriveTracker {
    /// Track a freshly prepared drive.
    pub fn new(drive: BcDrive) -> Self {
        Self::resume(drive, DriveStatus::Preparing, VerificationStatus::IDLE, [])
    }

    /// Resume tracking from a status read back from the ledger.
    pub fn resume(
        drive: BcDrive,
        status: DriveStatus,
        verification: VerificationStatus,
        replicators: impl IntoIterator<Item = PublicKey>,
    ) -> Self {
        Self {
            drive,
            status,
            verification,
            replicators: replicators.into_iter().collect(),
            verification_trigger: None,
            sequence: 0,
            bus: None,
        }
    }

    /// Publish a snapshot on `bus` after every accepted event.
    pub fn with_bus(mut self, bus: Arc<InMemoryEventBus<DriveState>>) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn drive(&self) -> &BcDrive {
        &self.drive
    }

    pub fn drive_key(&self) -> &PublicKey {
        &self.drive.drive_key
    }

    pub fn status(&self) -> DriveStatus {
        self.status
    }

    pub fn verification(&self) -> VerificationStatus {
        self.verification
    }

    /// Trigger of the running verification round.
    pub fn verification_trigger(&self) -> Option<&Hash> {
        self.verification_trigger.as_ref()
    }

    pub fn replicators(&self) -> impl Iterator<Item = &PublicKey> {
        self.replicators.iter()
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Current snapshot.
    pub fn state(&self) -> DriveState {
        DriveState::snapshot(
            &self.drive,
            self.status,
            self.verification,
            self.replicators.iter().copied().collect(),
            self.sequence,
        )
    }

    /// Apply an accepted transaction for this drive.
    ///
    /// Transactions for other drives, or types with no drive effect, return
    /// `Ok(None)`.
    pub fn apply_transaction(
        &mut self,
        tx: &Transaction,
        hash: &Hash,
    ) -> Result<Option<DriveState>, LifecycleError> {
        match DriveEvent::from_transaction(tx, hash) {
            Some((drive_key, event)) if drive_key == self.drive.drive_key => {
                self.apply(event).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Apply an accepted `EndDriveVerificationV2` together with the
    /// replicators the ledger removed in that round.
    ///
    /// Transactions for other drives, or of any other type, return
    /// `Ok(None)`.
    pub fn apply_verification_end(
        &mut self,
        tx: &Transaction,
        hash: &Hash,
        failed: Vec<PublicKey>,
    ) -> Result<Option<DriveState>, LifecycleError> {
        match DriveEvent::from_transaction(tx, hash) {
            Some((drive_key, DriveEvent::VerificationEnded { trigger, .. }))
                if drive_key == self.drive.drive_key =>
            {
                self.apply(DriveEvent::VerificationEnded { trigger, failed })
                    .map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Apply an event for `drive_key`.
    pub fn apply_for(
        &mut self,
        drive_key: &PublicKey,
        event: DriveEvent,
    ) -> Result<DriveState, LifecycleError> {
        if drive_key != &self.drive.drive_key {
            return Err(LifecycleError::WrongDrive(*drive_key));
        }
        self.apply(event)
    }

    /// Apply one observed event.
    pub fn apply(&mut self, event: DriveEvent) -> Result<DriveState, LifecycleError> {
        let from = self.status;
        let name = event.name();

        match event {
            DriveEvent::ReplicatorJoined { replicator } => {
                if self.status.is_closed() || self.status == DriveStatus::Closing {
                    return Err(self.rejected(name));
                }
                if self.replicators.contains(&replicator) {
                    return Err(LifecycleError::DuplicateReplicator(replicator));
                }
                self.replicators.insert(replicator);
                if self.status == DriveStatus::Preparing
                    && self.replicators.len() >= usize::from(self.drive.replicator_count)
                {
                    self.status = DriveStatus::Active;
                }
            }
            DriveEvent::ModificationSubmitted(modification) => {
                if !self.status.accepts_modifications() {
                    return Err(self.rejected(name));
                }
                self.drive.add_modification(modification)?;
            }
            DriveEvent::ModificationApproved {
                id,
                root_hash,
                used_size,
                meta_files_size,
            } => {
                if !self.status.resolves_modifications() {
                    return Err(self.rejected(name));
                }
                self.drive
                    .complete_modification(&id, DataModificationState::Succeeded)?;
                self.drive.root_hash = root_hash;
                self.drive.used_size = used_size;
                self.drive.meta_files_size = meta_files_size;
            }
            DriveEvent::ModificationCancelled { id } => {
                if !self.status.resolves_modifications() {
                    return Err(self.rejected(name));
                }
                self.drive
                    .complete_modification(&id, DataModificationState::Cancelled)?;
            }
            DriveEvent::VerificationStarted { trigger } => {
                if self.status != DriveStatus::Active || !self.verification.available {
                    return Err(self.rejected(name));
                }
                self.status = DriveStatus::VerificationPending;
                self.verification = VerificationStatus::RUNNING;
                self.verification_trigger = Some(trigger);
            }
            DriveEvent::VerificationEnded { trigger, failed } => {
                if self.status != DriveStatus::VerificationPending {
                    return Err(self.rejected(name));
                }
                // A tracker resumed mid-round has no trigger to compare.
                if let Some(expected) = self.verification_trigger {
                    if expected != trigger {
                        return Err(LifecycleError::TriggerMismatch {
                            expected,
                            actual: trigger,
                        });
                    }
                }
                for replicator in &failed {
                    self.replicators.remove(replicator);
                }
                self.status = DriveStatus::Active;
                self.verification = VerificationStatus::IDLE;
                self.verification_trigger = None;
                if !failed.is_empty() {
                    info!(
                        drive = %to_hex(&self.drive.drive_key),
                        failed = failed.len(),
                        "Replicators removed after verification"
                    );
                }
            }
            DriveEvent::ClosureRequested => {
                if self.status != DriveStatus::Active {
                    return Err(self.rejected(name));
                }
                self.status = DriveStatus::Closing;
                self.verification = VerificationStatus::UNAVAILABLE;
            }
            DriveEvent::ClosureFinalized => {
                if self.status != DriveStatus::Closing {
                    return Err(self.rejected(name));
                }
                let pending: Vec<Hash> = self
                    .drive
                    .active_modifications()
                    .iter()
                    .map(|m| m.id)
                    .collect();
                for id in &pending {
                    self.drive
                        .complete_modification(id, DataModificationState::Cancelled)?;
                }
                self.status = DriveStatus::Closed;
            }
        }

        self.sequence += 1;
        if from != self.status {
            info!(
                drive = %to_hex(&self.drive.drive_key),
                from = from.as_str(),
                to = self.status.as_str(),
                "Drive status changed"
            );
        }
        debug!(
            drive = %to_hex(&self.drive.drive_key),
            event = name,
            sequence = self.sequence,
            "Drive event applied"
        );

        let state = self.state();
        if let Some(bus) = &self.bus {
            bus.publish_now(state.clone());
        }
        Ok(state)
    }

    fn rejected(&self, event: &'static str) -> LifecycleError {
        LifecycleError::InvalidStateTransition {
            drive: self.drive.drive_key,
            from: self.status.as_str(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_bus::{spawn_dispatcher, EventFilter, HandlerRegistry};
    use shared_types::{Amount, BlsSignature, Deadline, NetworkType, StorageSize};
    use sm_01_domain_model::{
        ActiveDataModification, ModelError, VerificationOpinion, VerificationResult,
    };
    use sm_03_transactions::{EndDriveVerificationV2, TransactionBody, TransactionHeader};
    use std::sync::Mutex;
    use std::time::Duration;

    const DRIVE: PublicKey = [1; 32];
    const OWNER: PublicKey = [2; 32];

    fn modification(id: u8, size: u64) -> ActiveDataModification {
        ActiveDataModification::new([id; 32], OWNER, [0xCD; 32], StorageSize(size))
    }

    fn active_tracker() -> DriveTracker {
        let mut tracker = DriveTracker::new(BcDrive::new(DRIVE, OWNER, StorageSize(1000), 2));
        tracker
            .apply(DriveEvent::ReplicatorJoined { replicator: [10; 32] })
            .unwrap();
        tracker
            .apply(DriveEvent::ReplicatorJoined { replicator: [11; 32] })
            .unwrap();
        tracker
    }

    #[test]
    fn test_activates_when_replicators_joined() {
        let mut tracker = DriveTracker::new(BcDrive::new(DRIVE, OWNER, StorageSize(1000), 2));
        let state = tracker
            .apply(DriveEvent::ReplicatorJoined { replicator: [10; 32] })
            .unwrap();
        assert_eq!(state.status, DriveStatus::Preparing);

        let state = tracker
            .apply(DriveEvent::ReplicatorJoined { replicator: [11; 32] })
            .unwrap();
        assert_eq!(state.status, DriveStatus::Active);
        assert_eq!(state.replicators.len(), 2);
        assert_eq!(state.sequence, 2);
    }

    #[test]
    fn test_duplicate_replicator_rejected() {
        let mut tracker = active_tracker();
        assert_eq!(
            tracker.apply(DriveEvent::ReplicatorJoined { replicator: [10; 32] }),
            Err(LifecycleError::DuplicateReplicator([10; 32]))
        );
        assert_eq!(tracker.sequence(), 2);
    }

    #[test]
    fn test_modifications_rejected_while_preparing() {
        let mut tracker = DriveTracker::new(BcDrive::new(DRIVE, OWNER, StorageSize(1000), 2));
        assert!(matches!(
            tracker.apply(DriveEvent::ModificationSubmitted(modification(1, 100))),
            Err(LifecycleError::InvalidStateTransition {
                from: "Preparing",
                event: "ModificationSubmitted",
                ..
            })
        ));
    }

    #[test]
    fn test_approval_completes_modification() {
        let mut tracker = active_tracker();
        tracker
            .apply(DriveEvent::ModificationSubmitted(modification(1, 100)))
            .unwrap();
        let state = tracker
            .apply(DriveEvent::ModificationApproved {
                id: [1; 32],
                root_hash: [0xAA; 32],
                used_size: StorageSize(100),
                meta_files_size: StorageSize(4),
            })
            .unwrap();

        assert!(state.active_modifications.is_empty());
        assert_eq!(state.completed_modifications.len(), 1);
        assert_eq!(
            state.completed_modifications[0].state,
            Some(DataModificationState::Succeeded)
        );
        assert_eq!(state.root_hash, [0xAA; 32]);
        assert_eq!(tracker.drive().free_size(), StorageSize(896));
    }

    #[test]
    fn test_completed_id_cannot_resubmit() {
        let mut tracker = active_tracker();
        tracker
            .apply(DriveEvent::ModificationSubmitted(modification(1, 100)))
            .unwrap();
        tracker
            .apply(DriveEvent::ModificationCancelled { id: [1; 32] })
            .unwrap();

        let result = tracker.apply(DriveEvent::ModificationSubmitted(modification(1, 100)));
        assert!(matches!(
            result,
            Err(LifecycleError::Model(ModelError::InvalidStateTransition { .. }))
        ));
    }

    #[test]
    fn test_verification_round() {
        let mut tracker = active_tracker();
        let state = tracker
            .apply(DriveEvent::VerificationStarted { trigger: [5; 32] })
            .unwrap();
        assert_eq!(state.status, DriveStatus::VerificationPending);
        assert_eq!(state.verification, VerificationStatus::RUNNING);
        assert_eq!(tracker.verification_trigger(), Some(&[5; 32]));

        assert!(tracker
            .apply(DriveEvent::VerificationStarted { trigger: [6; 32] })
            .is_err());

        let state = tracker
            .apply(DriveEvent::VerificationEnded {
                trigger: [5; 32],
                failed: vec![[11; 32]],
            })
            .unwrap();
        assert_eq!(state.status, DriveStatus::Active);
        assert_eq!(state.verification, VerificationStatus::IDLE);
        assert_eq!(state.replicators, vec![[10; 32]]);
        assert_eq!(tracker.verification_trigger(), None);
    }

    fn end_verification(drive: PublicKey, trigger: Hash) -> Transaction {
        let opinion = VerificationOpinion {
            verifier: 0,
            bls_signature: BlsSignature::default(),
            results: vec![VerificationResult {
                prover: 0,
                result: true,
            }],
        };
        let body = EndDriveVerificationV2::new(drive, trigger, vec![[10; 32]], vec![opinion])
            .unwrap();
        Transaction::new(
            TransactionHeader::new(NetworkType::MijinTest, Amount(0), Deadline(0)),
            TransactionBody::EndDriveVerificationV2(body),
        )
    }

    #[test]
    fn test_end_verification_transaction_reactivates_drive() {
        let mut tracker = DriveTracker::new(BcDrive::new(DRIVE, OWNER, StorageSize(1000), 1));
        tracker
            .apply(DriveEvent::ReplicatorJoined { replicator: [10; 32] })
            .unwrap();
        tracker
            .apply(DriveEvent::VerificationStarted { trigger: [5; 32] })
            .unwrap();

        let state = tracker
            .apply_transaction(&end_verification(DRIVE, [5; 32]), &[0; 32])
            .unwrap()
            .unwrap();
        assert_eq!(state.status, DriveStatus::Active);
        assert_eq!(state.verification, VerificationStatus::IDLE);
        assert_eq!(state.replicators, vec![[10; 32]]);
    }

    #[test]
    fn test_end_verification_for_other_round_rejected() {
        let mut tracker = active_tracker();
        tracker
            .apply(DriveEvent::VerificationStarted { trigger: [5; 32] })
            .unwrap();

        assert_eq!(
            tracker.apply_transaction(&end_verification(DRIVE, [6; 32]), &[0; 32]),
            Err(LifecycleError::TriggerMismatch {
                expected: [5; 32],
                actual: [6; 32],
            })
        );
        assert_eq!(tracker.status(), DriveStatus::VerificationPending);
        assert_eq!(tracker.sequence(), 3);
        assert_eq!(
            tracker.apply_transaction(&end_verification([9; 32], [5; 32]), &[0; 32]),
            Ok(None)
        );
    }

    #[test]
    fn test_verification_end_with_ledger_verdict() {
        let mut tracker = active_tracker();
        tracker
            .apply(DriveEvent::VerificationStarted { trigger: [5; 32] })
            .unwrap();

        let state = tracker
            .apply_verification_end(&end_verification(DRIVE, [5; 32]), &[0; 32], vec![[11; 32]])
            .unwrap()
            .unwrap();
        assert_eq!(state.status, DriveStatus::Active);
        assert_eq!(state.replicators, vec![[10; 32]]);
    }

    #[test]
    fn test_closure_cancels_pending_and_blocks_changes() {
        let mut tracker = active_tracker();
        tracker
            .apply(DriveEvent::ModificationSubmitted(modification(1, 100)))
            .unwrap();
        tracker
            .apply(DriveEvent::ModificationSubmitted(modification(2, 50)))
            .unwrap();
        tracker.apply(DriveEvent::ClosureRequested).unwrap();

        assert!(tracker
            .apply(DriveEvent::ModificationSubmitted(modification(3, 10)))
            .is_err());
        tracker
            .apply(DriveEvent::ModificationApproved {
                id: [1; 32],
                root_hash: [0xAB; 32],
                used_size: StorageSize(100),
                meta_files_size: StorageSize(0),
            })
            .unwrap();

        let state = tracker.apply(DriveEvent::ClosureFinalized).unwrap();
        assert_eq!(state.status, DriveStatus::Closed);
        assert!(state.active_modifications.is_empty());
        assert_eq!(
            state.completed_modifications[1].state,
            Some(DataModificationState::Cancelled)
        );
        assert!(tracker.apply(DriveEvent::ClosureRequested).is_err());
        assert!(tracker
            .apply(DriveEvent::ReplicatorJoined { replicator: [12; 32] })
            .is_err());
    }

    #[test]
    fn test_rejected_event_leaves_state() {
        let mut tracker = active_tracker();
        let before = tracker.state();
        assert!(tracker.apply(DriveEvent::ClosureFinalized).is_err());
        assert!(tracker
            .apply(DriveEvent::ModificationCancelled { id: [9; 32] })
            .is_err());
        assert_eq!(tracker.state(), before);
    }

    #[test]
    fn test_wrong_drive_rejected() {
        let mut tracker = active_tracker();
        assert_eq!(
            tracker.apply_for(&[9; 32], DriveEvent::ClosureRequested),
            Err(LifecycleError::WrongDrive([9; 32]))
        );
    }

    #[tokio::test]
    async fn test_snapshots_published_in_order() {
        let bus = Arc::new(InMemoryEventBus::<DriveState>::new());
        let mut subscription = bus.subscribe(EventFilter::keys(vec![DRIVE]));
        let mut tracker = active_tracker().with_bus(Arc::clone(&bus));

        tracker
            .apply(DriveEvent::ModificationSubmitted(modification(1, 100)))
            .unwrap();
        tracker
            .apply(DriveEvent::VerificationStarted { trigger: [5; 32] })
            .unwrap();

        let first = subscription.recv().await.unwrap();
        let second = subscription.recv().await.unwrap();
        assert_eq!(first.sequence, 3);
        assert_eq!(first.active_modifications.len(), 1);
        assert_eq!(second.sequence, 4);
        assert_eq!(second.status, DriveStatus::VerificationPending);
    }

    #[tokio::test]
    async fn test_predicate_handler_removed_on_true() {
        let bus = Arc::new(InMemoryEventBus::<DriveState>::new());
        let registry = Arc::new(HandlerRegistry::<DriveState>::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        registry.add_handler(DRIVE, move |state: &DriveState| {
            sink.lock().unwrap().push(state.status);
            state.status == DriveStatus::VerificationPending
        });
        let dispatcher = spawn_dispatcher(&bus, Arc::clone(&registry));

        let mut tracker = active_tracker().with_bus(Arc::clone(&bus));
        tracker
            .apply(DriveEvent::VerificationStarted { trigger: [5; 32] })
            .unwrap();
        tracker
            .apply(DriveEvent::VerificationEnded {
                trigger: [5; 32],
                failed: vec![],
            })
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(*seen.lock().unwrap(), vec![DriveStatus::VerificationPending]);
        assert_eq!(registry.handler_count(&DRIVE), 0);
        dispatcher.abort();
    }
}

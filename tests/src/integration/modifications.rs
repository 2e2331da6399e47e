//! # Modification and Closure Flow
//!
//! Owner transactions are signed, announced as bytes, decoded on the other
//! side and applied to the tracker, with snapshots delivered to predicate
//! handlers in order.

#[cfg(test)]
mod tests {
    use crate::support::{factory, init_tracing};
    use parking_lot::Mutex;
    use shared_bus::{spawn_dispatcher, HandlerRegistry, InMemoryEventBus};
    use shared_crypto::Ed25519KeyPair;
    use shared_types::{Amount, StorageSize};
    use sm_01_domain_model::{BcDrive, DataModificationState, ModelError};
    use sm_03_transactions::{decode, SignedTransaction, Transaction, TransactionFactory};
    use sm_04_drive_lifecycle::{
        DriveEvent, DriveState, DriveStatus, DriveTracker, LifecycleError, VerificationStatus,
    };
    use std::sync::Arc;
    use std::time::Duration;

    const DRIVE_KEY: [u8; 32] = [0xD2; 32];

    fn active_tracker(owner: &Ed25519KeyPair) -> DriveTracker {
        DriveTracker::resume(
            BcDrive::new(DRIVE_KEY, owner.public_key(), StorageSize(1 << 30), 2),
            DriveStatus::Active,
            VerificationStatus::IDLE,
            [[0x01; 32], [0x02; 32]],
        )
    }

    /// Sign, announce and decode, as the tracker would observe it.
    fn observe(
        f: &TransactionFactory,
        owner: &Ed25519KeyPair,
        tx: Transaction,
    ) -> anyhow::Result<(Transaction, SignedTransaction)> {
        let signed = f.sign(tx, owner)?;
        Ok((decode(&signed.payload)?, signed))
    }

    #[test]
    fn test_modification_lifecycle_through_wire() -> anyhow::Result<()> {
        init_tracing();
        let f = factory()?;
        let owner = Ed25519KeyPair::from_seed([0xB0; 32]);
        let mut tracker = active_tracker(&owner);

        let (upload, signed) = observe(
            &f,
            &owner,
            f.data_modification(DRIVE_KEY, [0xC1; 32], StorageSize(4096), Amount(10)),
        )?;
        let state = tracker
            .apply_transaction(&upload, &signed.hash)?
            .ok_or_else(|| anyhow::anyhow!("modification ignored"))?;
        assert_eq!(state.active_modifications.len(), 1);
        assert_eq!(state.active_modifications[0].id, signed.hash);
        assert_eq!(tracker.drive().active_modifications()[0].owner, owner.public_key());

        let state = tracker.apply(DriveEvent::ModificationApproved {
            id: signed.hash,
            root_hash: [0xEE; 32],
            used_size: StorageSize(4096),
            meta_files_size: StorageSize(64),
        })?;
        assert!(state.active_modifications.is_empty());
        assert_eq!(
            state.completed_modifications[0].state,
            Some(DataModificationState::Succeeded)
        );
        assert_eq!(state.root_hash, [0xEE; 32]);
        assert_eq!(tracker.drive().free_size(), StorageSize((1 << 30) - 4096 - 64));

        // A completed modification cannot be cancelled afterwards.
        let (cancel, cancel_signed) =
            observe(&f, &owner, f.data_modification_cancel(DRIVE_KEY, signed.hash))?;
        assert!(matches!(
            tracker.apply_transaction(&cancel, &cancel_signed.hash),
            Err(LifecycleError::Model(ModelError::InvalidStateTransition { .. }))
        ));
        Ok(())
    }

    #[test]
    fn test_other_drive_transactions_ignored() -> anyhow::Result<()> {
        let f = factory()?;
        let owner = Ed25519KeyPair::from_seed([0xB0; 32]);
        let mut tracker = active_tracker(&owner);

        let (closure, signed) = observe(&f, &owner, f.drive_closure([0x99; 32]))?;
        assert_eq!(tracker.apply_transaction(&closure, &signed.hash)?, None);
        assert_eq!(tracker.sequence(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_closure_notifies_handlers_in_order() -> anyhow::Result<()> {
        init_tracing();
        let f = factory()?;
        let owner = Ed25519KeyPair::from_seed([0xB0; 32]);

        let bus = Arc::new(InMemoryEventBus::<DriveState>::new());
        let registry = Arc::new(HandlerRegistry::<DriveState>::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();
        registry.add_handler(DRIVE_KEY, move |state: &DriveState| {
            recorder.lock().push((state.sequence, state.status));
            state.status == DriveStatus::Closed
        });
        let dispatcher = spawn_dispatcher(&bus, registry.clone());

        let mut tracker = active_tracker(&owner).with_bus(bus.clone());
        let mut pending = Vec::new();
        for size in [100u64, 200] {
            let (upload, signed) = observe(
                &f,
                &owner,
                f.data_modification(DRIVE_KEY, [size as u8; 32], StorageSize(size), Amount(1)),
            )?;
            tracker.apply_transaction(&upload, &signed.hash)?;
            pending.push(signed.hash);
        }
        let (cancel, cancel_signed) =
            observe(&f, &owner, f.data_modification_cancel(DRIVE_KEY, pending[0]))?;
        tracker.apply_transaction(&cancel, &cancel_signed.hash)?;

        let (closure, closure_signed) = observe(&f, &owner, f.drive_closure(DRIVE_KEY))?;
        tracker.apply_transaction(&closure, &closure_signed.hash)?;
        assert_eq!(tracker.status(), DriveStatus::Closing);
        assert!(matches!(
            tracker.apply(DriveEvent::VerificationStarted { trigger: [1; 32] }),
            Err(LifecycleError::InvalidStateTransition { .. })
        ));

        let closed = tracker.apply(DriveEvent::ClosureFinalized)?;
        assert!(closed.active_modifications.is_empty());
        assert_eq!(
            closed.completed_modifications.iter().map(|m| m.state).collect::<Vec<_>>(),
            vec![
                Some(DataModificationState::Cancelled),
                Some(DataModificationState::Cancelled)
            ]
        );

        tokio::time::timeout(Duration::from_secs(5), async {
            while registry.handler_count(&DRIVE_KEY) > 0 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await?;

        let sequences: Vec<u64> = seen.lock().iter().map(|(sequence, _)| *sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3, 4, 5]);
        assert_eq!(seen.lock().last().map(|(_, status)| *status), Some(DriveStatus::Closed));

        dispatcher.abort();
        Ok(())
    }
}

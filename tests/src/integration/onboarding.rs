//! # Onboarding Flow
//!
//! A drive owner prepares a drive and its replicators join it in one
//! aggregate. The owner initiates, every replicator cosigns from relayed
//! bytes, and the completed aggregate activates the tracked drive.

#[cfg(test)]
mod tests {
    use crate::support::{factory, init_tracing, replicators, ReplicatorKeys, GENERATION_HASH};
    use shared_bus::{EventFilter, InMemoryEventBus};
    use shared_crypto::{verify_ed25519, Ed25519KeyPair};
    use shared_types::{Amount, StorageSize};
    use sm_01_domain_model::BcDrive;
    use sm_03_transactions::{
        decode, hash_transaction, verify_transaction_signature, EmbeddedTransaction,
        TransactionBody, TransactionFactory,
    };
    use sm_04_drive_lifecycle::{DriveEvent, DriveState, DriveStatus, DriveTracker};
    use sm_06_aggregate_cosigning::{cosign_transaction, AggregateBuilder, CosignError};
    use std::sync::Arc;

    const DRIVE_SIZE: StorageSize = StorageSize(1 << 30);

    fn onboarding_inner(
        f: &TransactionFactory,
        owner: &Ed25519KeyPair,
        joining: &[ReplicatorKeys],
    ) -> Vec<EmbeddedTransaction> {
        let mut inner = vec![f.embedded(
            owner.public_key(),
            f.prepare_bc_drive(DRIVE_SIZE, Amount(50), joining.len() as u16).body,
        )];
        inner.extend(joining.iter().map(|r| {
            f.embedded(
                r.account.public_key(),
                f.replicator_onboarding(Amount(1 << 31), r.bls.public_key()).body,
            )
        }));
        inner
    }

    #[test]
    fn test_aggregate_onboarding_collects_every_cosignature() -> anyhow::Result<()> {
        init_tracing();
        let f = factory()?;
        let owner = Ed25519KeyPair::from_seed([0xA0; 32]);
        let joining = replicators(1, 3)?;

        let mut pending = AggregateBuilder::complete()
            .add_all(onboarding_inner(&f, &owner, &joining))
            .sign(&f, &owner)?;
        let hash = *pending.hash();
        let relayed = decode(&pending.encode_partial()?)?;

        // Cosignatures arrive in reverse order.
        for replicator in joining.iter().rev() {
            let cosignature = cosign_transaction(&relayed, &replicator.account, &GENERATION_HASH)?;
            assert!(pending.attach(cosignature)?);
            assert_eq!(pending.hash(), &hash);
        }

        let announced = pending.finalize()?;
        let decoded = decode(&announced.payload)?;
        verify_transaction_signature(&decoded, &GENERATION_HASH)?;
        assert_eq!(hash_transaction(&decoded, &GENERATION_HASH)?, hash);

        let TransactionBody::AggregateComplete(aggregate) = &decoded.body else {
            anyhow::bail!("expected a complete aggregate");
        };
        assert_eq!(aggregate.transactions.len(), 4);
        assert_eq!(aggregate.cosignatures.len(), 3);
        let signers: Vec<_> = aggregate.cosignatures.iter().map(|c| c.signer).collect();
        let mut sorted = signers.clone();
        sorted.sort();
        assert_eq!(signers, sorted);
        for cosignature in &aggregate.cosignatures {
            verify_ed25519(&cosignature.signer, &hash, &cosignature.signature)?;
        }
        Ok(())
    }

    #[test]
    fn test_partial_onboarding_is_not_announceable() -> anyhow::Result<()> {
        let f = factory()?;
        let owner = Ed25519KeyPair::from_seed([0xA0; 32]);
        let joining = replicators(1, 2)?;

        let mut pending = AggregateBuilder::bonded()
            .add_all(onboarding_inner(&f, &owner, &joining))
            .sign(&f, &owner)?;
        let relayed = decode(&pending.encode_partial()?)?;
        pending.attach(cosign_transaction(&relayed, &joining[0].account, &GENERATION_HASH)?)?;

        assert_eq!(
            pending.finalize(),
            Err(CosignError::IncompleteCosignatures {
                missing: vec![joining[1].account.public_key()]
            })
        );
        Ok(())
    }

    #[test]
    fn test_split_collection_merges() -> anyhow::Result<()> {
        let f = factory()?;
        let owner = Ed25519KeyPair::from_seed([0xA0; 32]);
        let joining = replicators(1, 4)?;

        let mut left = AggregateBuilder::complete()
            .add_all(onboarding_inner(&f, &owner, &joining))
            .sign(&f, &owner)?;
        let mut right = left.clone();
        let relayed = decode(&left.encode_partial()?)?;

        for (i, replicator) in joining.iter().enumerate() {
            let cosignature = cosign_transaction(&relayed, &replicator.account, &GENERATION_HASH)?;
            if i % 2 == 0 {
                left.attach(cosignature)?;
            } else {
                right.attach(cosignature)?;
            }
        }
        // One cosigner reached both sides.
        right.attach(cosign_transaction(&relayed, &joining[0].account, &GENERATION_HASH)?)?;

        assert_eq!(left.merge(&right)?, 2);
        assert_eq!(left.merge(&right)?, 0);
        assert!(left.is_complete());
        Ok(())
    }

    #[tokio::test]
    async fn test_joined_replicators_activate_drive() -> anyhow::Result<()> {
        init_tracing();
        let owner = Ed25519KeyPair::from_seed([0xA0; 32]);
        let joining = replicators(1, 2)?;
        let drive_key = [0xD1; 32];

        let bus = Arc::new(InMemoryEventBus::<DriveState>::new());
        let mut subscription = bus.subscribe(EventFilter::keys(vec![drive_key]));
        let mut tracker = DriveTracker::new(BcDrive::new(
            drive_key,
            owner.public_key(),
            DRIVE_SIZE,
            2,
        ))
        .with_bus(bus.clone());

        for replicator in &joining {
            tracker.apply(DriveEvent::ReplicatorJoined {
                replicator: replicator.account.public_key(),
            })?;
        }
        assert_eq!(tracker.status(), DriveStatus::Active);

        let first = subscription.recv().await;
        let second = subscription.recv().await;
        assert_eq!(first.map(|s| s.status), Some(DriveStatus::Preparing));
        let second = second.ok_or_else(|| anyhow::anyhow!("missing second snapshot"))?;
        assert_eq!(second.status, DriveStatus::Active);
        assert_eq!(second.replicators.len(), 2);
        assert_eq!(second.sequence, 2);
        Ok(())
    }
}

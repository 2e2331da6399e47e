//! # Reference Scenarios
//!
//! Fixed-input cases pinned end to end across the model, codec and
//! signing crates.

#[cfg(test)]
mod tests {
    use crate::support::{factory, GENERATION_HASH};
    use shared_crypto::{BlsKeyPair, Ed25519KeyPair};
    use shared_types::{Amount, BlsPublicKey, StorageSize};
    use sm_01_domain_model::{
        ActiveDataModification, BcDrive, DataModificationState, ModelError, VerificationOpinion,
    };
    use sm_03_transactions::{
        decode, encode, hash_transaction, DriveClosure, ReplicatorOnboarding, TransactionBody,
        TransactionError,
    };
    use sm_06_aggregate_cosigning::{cosign, AggregateBuilder};

    #[test]
    fn test_completing_modification_moves_it_to_completed() -> anyhow::Result<()> {
        let mut drive = BcDrive::new([0x0D; 32], [0x0E; 32], StorageSize(1 << 20), 2);
        let modification =
            ActiveDataModification::new([0x01; 32], [0x0E; 32], [0xCD; 32], StorageSize(100));
        drive.add_modification(modification.clone())?;

        let completed = drive
            .complete_modification(&[0x01; 32], DataModificationState::Succeeded)?
            .clone();
        assert!(drive.active_modifications().is_empty());
        assert_eq!(drive.completed_modifications().len(), 1);
        assert_eq!(completed.state(), DataModificationState::Succeeded);
        assert_eq!(completed.modification(), &modification);

        // Once completed, the id cannot become active again.
        assert!(matches!(
            drive.add_modification(modification),
            Err(ModelError::InvalidStateTransition { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_onboarding_bls_key_survives_round_trip() -> anyhow::Result<()> {
        let f = factory()?;
        let bls = BlsKeyPair::from_ikm(&[0x08; 32])?.public_key();
        let tx = f.replicator_onboarding(Amount(1000), bls);

        let decoded = decode(&encode(&tx)?)?;
        let TransactionBody::ReplicatorOnboarding(ReplicatorOnboarding {
            capacity,
            bls_public_key,
        }) = decoded.body
        else {
            anyhow::bail!("expected ReplicatorOnboarding");
        };
        assert_eq!(capacity, Amount(1000));
        assert_eq!(bls_public_key, bls);
        assert_eq!(bls_public_key, BlsPublicKey::new(bls.bytes));
        Ok(())
    }

    #[test]
    fn test_mismatched_opinion_count_rejected() -> anyhow::Result<()> {
        let f = factory()?;
        let opinion = VerificationOpinion {
            verifier: 0,
            bls_signature: Default::default(),
            results: vec![],
        };
        let result = f.end_drive_verification_v2(
            [1; 32],
            [2; 32],
            vec![[3; 32], [4; 32]],
            vec![opinion],
        );
        assert!(matches!(
            result,
            Err(TransactionError::Model(ModelError::ConsensusShapeMismatch {
                context: "opinion count",
                expected: 2,
                actual: 1,
            }))
        ));
        Ok(())
    }

    #[test]
    fn test_aggregate_hash_fixed_across_cosignatures() -> anyhow::Result<()> {
        let f = factory()?;
        let initiator = Ed25519KeyPair::from_seed([0x10; 32]);
        let cosigners: Vec<_> = (0x11..0x15u8)
            .map(|seed| Ed25519KeyPair::from_seed([seed; 32]))
            .collect();

        let inner = std::iter::once(&initiator)
            .chain(cosigners.iter())
            .map(|k| {
                f.embedded(
                    k.public_key(),
                    TransactionBody::DriveClosure(DriveClosure { drive_key: [0x44; 32] }),
                )
            });
        let mut pending = AggregateBuilder::bonded().add_all(inner).sign(&f, &initiator)?;
        let hash = *pending.hash();

        for keypair in &cosigners {
            let cosignature = cosign(keypair, &hash);
            pending.attach(cosignature)?;
            assert!(!pending.attach(cosignature)?);
            assert_eq!(hash_transaction(&pending.transaction(), &GENERATION_HASH)?, hash);
        }
        assert_eq!(pending.cosignatures().len(), cosigners.len());
        assert_eq!(pending.finalize()?.hash, hash);
        Ok(())
    }
}

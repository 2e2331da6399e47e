//! # Verification Flow
//!
//! A verification round on an active drive: every replicator signs its
//! results with BLS, the session checks and packages them, the packaged
//! transaction crosses the wire, and the failed prover leaves the drive.

#[cfg(test)]
mod tests {
    use crate::support::{factory, init_tracing, replicators, ReplicatorKeys};
    use shared_types::{BlsPublicKey, PublicKey, StorageSize};
    use sm_01_domain_model::{BcDrive, ModelError, VerificationOpinion, VerificationResult};
    use sm_03_transactions::{decode, verify_transaction_signature, TransactionBody};
    use sm_04_drive_lifecycle::{DriveEvent, DriveStatus, DriveTracker, VerificationStatus};
    use sm_05_verification_consensus::{sign_opinion, VerificationError, VerificationSession};

    const DRIVE_KEY: [u8; 32] = [0xD3; 32];
    const TRIGGER: [u8; 32] = [0x7E; 32];

    fn results(values: &[bool]) -> Vec<VerificationResult> {
        values
            .iter()
            .enumerate()
            .map(|(i, result)| VerificationResult {
                prover: i as u16,
                result: *result,
            })
            .collect()
    }

    fn accounts(keys: &[ReplicatorKeys]) -> Vec<PublicKey> {
        keys.iter().map(|k| k.account.public_key()).collect()
    }

    fn bls_keys(keys: &[ReplicatorKeys]) -> Vec<BlsPublicKey> {
        keys.iter().map(|k| k.bls.public_key()).collect()
    }

    /// Provers failed by a strict majority of verifiers.
    fn majority_failed(provers: &[PublicKey], opinions: &[VerificationOpinion]) -> Vec<PublicKey> {
        provers
            .iter()
            .enumerate()
            .filter(|(i, _)| {
                let votes = opinions
                    .iter()
                    .filter(|o| o.failed_provers().any(|p| usize::from(p) == *i))
                    .count();
                votes * 2 > opinions.len()
            })
            .map(|(_, prover)| *prover)
            .collect()
    }

    #[test]
    fn test_round_removes_failed_replicator() -> anyhow::Result<()> {
        init_tracing();
        let f = factory()?;
        let keys = replicators(0x21, 4)?;
        let provers = accounts(&keys);

        let mut tracker = DriveTracker::resume(
            BcDrive::new(DRIVE_KEY, [0xAA; 32], StorageSize(1 << 30), 4),
            DriveStatus::Active,
            VerificationStatus::IDLE,
            provers.clone(),
        );
        tracker.apply(DriveEvent::VerificationStarted { trigger: TRIGGER })?;
        assert_eq!(tracker.verification(), VerificationStatus::RUNNING);

        // Prover 3 is offline: the others fail it, it passes everyone.
        let mut session = VerificationSession::new(DRIVE_KEY, TRIGGER, provers.clone())?;
        let opinions = [
            [true, true, true, false],
            [true, true, true, false],
            [true, true, true, false],
            [true, true, true, true],
        ];
        for (verifier, row) in opinions.iter().enumerate().rev() {
            let opinion = sign_opinion(&keys[verifier].bls, verifier as u16, results(row));
            assert!(session.add_signed_opinion(opinion, &bls_keys(&keys))?);
        }
        assert!(session.is_complete());
        session.verify_signatures(&bls_keys(&keys))?;

        let signed = f.sign(session.into_transaction(&f)?, &keys[0].account)?;
        let observed = decode(&signed.payload)?;
        verify_transaction_signature(&observed, &f.config().generation_hash)?;

        let TransactionBody::EndDriveVerificationV2(body) = &observed.body else {
            anyhow::bail!("expected EndDriveVerificationV2");
        };
        body.validate()?;
        assert_eq!(body.verification_trigger(), &TRIGGER);
        let failed = majority_failed(body.provers(), body.opinions());
        assert_eq!(failed, vec![provers[3]]);

        let state = tracker
            .apply_verification_end(&observed, &signed.hash, failed)?
            .ok_or_else(|| anyhow::anyhow!("round end ignored by tracker"))?;
        assert_eq!(state.status, DriveStatus::Active);
        assert_eq!(state.verification, VerificationStatus::IDLE);
        assert_eq!(state.replicators.len(), 3);
        assert!(!state.replicators.contains(&provers[3]));
        Ok(())
    }

    #[test]
    fn test_disagreeing_lengths_rejected() -> anyhow::Result<()> {
        let keys = replicators(0x31, 3)?;
        let mut session = VerificationSession::new(DRIVE_KEY, TRIGGER, accounts(&keys))?;
        session.add_opinion(sign_opinion(&keys[0].bls, 0, results(&[true, true, true])))?;

        let short = sign_opinion(&keys[1].bls, 1, results(&[true, true]));
        assert!(matches!(
            session.add_opinion(short),
            Err(VerificationError::Model(ModelError::ConsensusShapeMismatch { .. }))
        ));
        assert_eq!(session.opinion_count(), 1);
        Ok(())
    }

    #[test]
    fn test_forged_opinion_rejected() -> anyhow::Result<()> {
        let keys = replicators(0x41, 2)?;
        let mut session = VerificationSession::new(DRIVE_KEY, TRIGGER, accounts(&keys))?;

        // Verifier 1 signs in the name of verifier 0.
        let forged = sign_opinion(&keys[1].bls, 0, results(&[false, true]));
        assert_eq!(
            session.add_signed_opinion(forged, &bls_keys(&keys)),
            Err(VerificationError::InvalidOpinionSignature { verifier: 0 })
        );
        assert_eq!(session.missing_verifiers(), vec![0, 1]);
        Ok(())
    }
}

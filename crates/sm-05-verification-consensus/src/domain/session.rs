//! # Verification Session
//!
//! Accumulates the opinions of one verification round. Opinions may arrive
//! in any order; resubmitting an identical opinion is a no-op.

use crate::domain::errors::VerificationError;
use crate::domain::message::{opinion_message, verify_opinion};
use shared_crypto::{aggregate_bls_signatures, verify_bls_aggregate};
use shared_types::{to_hex, BlsPublicKey, BlsSignature, Hash, PublicKey};
use sm_01_domain_model::{ModelError, VerificationOpinion};
use sm_03_transactions::{
    EndDriveVerificationV2, Transaction, TransactionBody, TransactionFactory,
};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Opinions collected for one round on one drive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationSession {
    drive_key: PublicKey,
    verification_trigger: Hash,
    provers: Vec<PublicKey>,
    opinions: BTreeMap<u16, VerificationOpinion>,
}

impl VerificationSession {
    /// Open a round. The prover list fixes the expected result length.
    pub fn new(
        drive_key: PublicKey,
        verification_trigger: Hash,
        provers: Vec<PublicKey>,
    ) -> Result<Self, VerificationError> {
        if provers.is_empty() {
            return Err(ModelError::EmptyProverList.into());
        }
        if provers.len() > usize::from(u16::MAX) {
            return Err(ModelError::ConsensusShapeMismatch {
                context: "prover count",
                expected: usize::from(u16::MAX),
                actual: provers.len(),
            }
            .into());
        }
        Ok(Self {
            drive_key,
            verification_trigger,
            provers,
            opinions: BTreeMap::new(),
        })
    }

    pub fn drive_key(&self) -> &PublicKey {
        &self.drive_key
    }

    pub fn verification_trigger(&self) -> &Hash {
        &self.verification_trigger
    }

    pub fn provers(&self) -> &[PublicKey] {
        &self.provers
    }

    /// Accepted opinions, ordered by verifier.
    pub fn opinions(&self) -> impl Iterator<Item = &VerificationOpinion> {
        self.opinions.values()
    }

    pub fn opinion_count(&self) -> usize {
        self.opinions.len()
    }

    /// Every prover has submitted its opinion.
    pub fn is_complete(&self) -> bool {
        self.opinions.len() == self.provers.len()
    }

    /// Verifier indices still missing an opinion.
    pub fn missing_verifiers(&self) -> Vec<u16> {
        (0..self.provers.len() as u16)
            .filter(|v| !self.opinions.contains_key(v))
            .collect()
    }

    /// Add an opinion.
    ///
    /// Returns `Ok(true)` if it was new and `Ok(false)` for an identical
    /// resubmission. A different opinion from the same verifier is rejected.
    pub fn add_opinion(&mut self, opinion: VerificationOpinion) -> Result<bool, VerificationError> {
        self.check_opinion(&opinion)?;

        if let Some(existing) = self.opinions.get(&opinion.verifier) {
            if existing == &opinion {
                return Ok(false);
            }
            warn!(
                drive = %to_hex(&self.drive_key),
                verifier = opinion.verifier,
                "Conflicting opinion rejected"
            );
            return Err(VerificationError::ConflictingOpinion {
                verifier: opinion.verifier,
            });
        }

        debug!(
            drive = %to_hex(&self.drive_key),
            verifier = opinion.verifier,
            failed = opinion.failed_provers().count(),
            "Opinion accepted"
        );
        self.opinions.insert(opinion.verifier, opinion);
        Ok(true)
    }

    /// Add an opinion after checking its signature against the verifier's key.
    ///
    /// `bls_keys[i]` is the BLS key of prover `i`.
    pub fn add_signed_opinion(
        &mut self,
        opinion: VerificationOpinion,
        bls_keys: &[BlsPublicKey],
    ) -> Result<bool, VerificationError> {
        self.check_opinion(&opinion)?;
        self.check_key_count(bls_keys)?;
        if !verify_opinion(&opinion, &bls_keys[usize::from(opinion.verifier)]) {
            return Err(VerificationError::InvalidOpinionSignature {
                verifier: opinion.verifier,
            });
        }
        self.add_opinion(opinion)
    }

    /// Check every accepted signature: first one aggregate check per group
    /// of opinions with identical results, then each opinion on its own so
    /// a failure names the verifier.
    pub fn verify_signatures(&self, bls_keys: &[BlsPublicKey]) -> Result<(), VerificationError> {
        self.check_key_count(bls_keys)?;

        let mut groups: BTreeMap<Vec<u8>, (Vec<BlsSignature>, Vec<BlsPublicKey>)> =
            BTreeMap::new();
        for opinion in self.opinions.values() {
            let (signatures, keys) = groups.entry(opinion_message(&opinion.results)).or_default();
            signatures.push(opinion.bls_signature);
            keys.push(bls_keys[usize::from(opinion.verifier)]);
        }

        // A signature that does not decode fails aggregation; the per-opinion
        // pass below names its verifier.
        let aggregate_ok = groups.iter().all(|(message, (signatures, keys))| {
            aggregate_bls_signatures(signatures)
                .map(|aggregate| verify_bls_aggregate(message, &aggregate, keys))
                .unwrap_or(false)
        });
        if aggregate_ok {
            debug!(groups = groups.len(), "Opinion signatures verified");
            return Ok(());
        }

        for opinion in self.opinions.values() {
            if !verify_opinion(opinion, &bls_keys[usize::from(opinion.verifier)]) {
                return Err(VerificationError::InvalidOpinionSignature {
                    verifier: opinion.verifier,
                });
            }
        }
        Err(VerificationError::AggregateSignatureInvalid {
            signers: self.opinions.len(),
        })
    }

    /// Package the round. Requires one opinion per prover.
    pub fn into_body(self) -> Result<EndDriveVerificationV2, VerificationError> {
        let opinions: Vec<VerificationOpinion> = self.opinions.into_values().collect();
        Ok(EndDriveVerificationV2::new(
            self.drive_key,
            self.verification_trigger,
            self.provers,
            opinions,
        )?)
    }

    /// Package the round as an unsigned transaction stamped by `factory`.
    pub fn into_transaction(
        self,
        factory: &TransactionFactory,
    ) -> Result<Transaction, VerificationError> {
        let body = self.into_body()?;
        Ok(factory.transaction(TransactionBody::EndDriveVerificationV2(body)))
    }

    fn check_opinion(&self, opinion: &VerificationOpinion) -> Result<(), VerificationError> {
        if usize::from(opinion.verifier) >= self.provers.len() {
            return Err(VerificationError::VerifierOutOfRange {
                verifier: opinion.verifier,
                provers: self.provers.len(),
            });
        }
        if opinion.results.len() != self.provers.len() {
            return Err(ModelError::ConsensusShapeMismatch {
                context: "results length",
                expected: self.provers.len(),
                actual: opinion.results.len(),
            }
            .into());
        }
        if let Some((index, result)) = opinion
            .results
            .iter()
            .enumerate()
            .find(|(i, r)| usize::from(r.prover) != *i)
        {
            return Err(VerificationError::ResultOutOfOrder {
                verifier: opinion.verifier,
                index,
                prover: result.prover,
            });
        }
        Ok(())
    }

    fn check_key_count(&self, bls_keys: &[BlsPublicKey]) -> Result<(), VerificationError> {
        if bls_keys.len() != self.provers.len() {
            return Err(VerificationError::KeyCountMismatch {
                expected: self.provers.len(),
                actual: bls_keys.len(),
            });
        }
        Ok(())
    }
}

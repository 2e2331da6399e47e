//! # Pending Aggregate
//!
//! Cosignature accumulator for one initiator-signed aggregate.
//!
//! ```text
//! initiator ──sign──→ PendingAggregate{hash fixed}
//!                          │
//!     cosigner A ──cosign(hash)──→ attach ─┐
//!     cosigner B ──cosign(hash)──→ attach ─┼──→ is_complete? ──→ finalize ──→ announce bytes
//!     other accumulator ─────────→ merge  ─┘
//! ```
//!
//! Cosignatures are keyed by signer, so arrival order and duplicates do not
//! matter. The announce bytes list cosignatures sorted by signer key.

use crate::domain::errors::CosignError;
use shared_crypto::{verify_ed25519, Ed25519KeyPair};
use shared_types::{to_hex, Hash, PublicKey, Signature};
use sm_03_transactions::{
    encode, hash_transaction, verify_transaction_signature, Cosignature, SignedTransaction,
    Transaction,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// Cosign an aggregate hash.
pub fn cosign(keypair: &Ed25519KeyPair, aggregate_hash: &Hash) -> Cosignature {
    Cosignature {
        signer: keypair.public_key(),
        signature: keypair.sign(aggregate_hash),
    }
}

/// Cosign a received aggregate, computing its hash locally.
///
/// The initiator signature is checked first so a cosigner never signs a hash
/// it cannot attribute.
pub fn cosign_transaction(
    tx: &Transaction,
    keypair: &Ed25519KeyPair,
    generation_hash: &Hash,
) -> Result<Cosignature, CosignError> {
    let entity = tx.entity_type();
    if !entity.is_aggregate() {
        return Err(CosignError::NotAggregate(entity));
    }
    if !tx.header.is_signed() {
        return Err(CosignError::Unsigned);
    }
    verify_transaction_signature(tx, generation_hash)?;
    let hash = hash_transaction(tx, generation_hash)?;
    Ok(cosign(keypair, &hash))
}

/// Distinct inner signers other than the initiator.
pub fn required_cosigners(tx: &Transaction) -> Result<BTreeSet<PublicKey>, CosignError> {
    let aggregate = tx
        .body
        .as_aggregate()
        .ok_or(CosignError::NotAggregate(tx.entity_type()))?;
    Ok(aggregate
        .transactions
        .iter()
        .map(|inner| inner.signer)
        .filter(|signer| signer != &tx.header.signer)
        .collect())
}

/// An initiator-signed aggregate collecting cosignatures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingAggregate {
    transaction: Transaction,
    hash: Hash,
    required: BTreeSet<PublicKey>,
    cosignatures: BTreeMap<PublicKey, Signature>,
}

impl PendingAggregate {
    /// Open collection for a signed aggregate.
    ///
    /// Cosignatures already carried by the transaction are verified and
    /// absorbed, so a partially cosigned announcement can be resumed.
    pub fn from_signed(
        signed: SignedTransaction,
        generation_hash: Hash,
    ) -> Result<Self, CosignError> {
        Self::from_transaction(signed.transaction, &generation_hash)
    }

    /// Open collection for a decoded aggregate.
    pub fn from_transaction(
        mut transaction: Transaction,
        generation_hash: &Hash,
    ) -> Result<Self, CosignError> {
        let entity = transaction.entity_type();
        let aggregate = transaction
            .body
            .as_aggregate_mut()
            .ok_or(CosignError::NotAggregate(entity))?;
        if aggregate.transactions.is_empty() {
            return Err(CosignError::EmptyAggregate);
        }
        let carried = std::mem::take(&mut aggregate.cosignatures);

        if !transaction.header.is_signed() {
            return Err(CosignError::Unsigned);
        }
        verify_transaction_signature(&transaction, generation_hash)?;

        let hash = hash_transaction(&transaction, generation_hash)?;
        let required = required_cosigners(&transaction)?;
        let mut pending = Self {
            transaction,
            hash,
            required,
            cosignatures: BTreeMap::new(),
        };
        for cosignature in carried {
            pending.attach(cosignature)?;
        }

        info!(
            hash = %to_hex(&pending.hash),
            required = pending.required.len(),
            attached = pending.cosignatures.len(),
            "Aggregate opened for cosigning"
        );
        Ok(pending)
    }

    /// Aggregate hash. Unchanged by cosignatures.
    pub fn hash(&self) -> &Hash {
        &self.hash
    }

    pub fn initiator(&self) -> &PublicKey {
        &self.transaction.header.signer
    }

    pub fn required_signers(&self) -> &BTreeSet<PublicKey> {
        &self.required
    }

    /// Attached cosignatures, sorted by signer.
    pub fn cosignatures(&self) -> Vec<Cosignature> {
        self.cosignatures
            .iter()
            .map(|(signer, signature)| Cosignature {
                signer: *signer,
                signature: *signature,
            })
            .collect()
    }

    /// Required signers that have not cosigned yet, sorted.
    pub fn missing_signers(&self) -> Vec<PublicKey> {
        self.required
            .iter()
            .filter(|signer| !self.cosignatures.contains_key(*signer))
            .copied()
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.cosignatures.len() == self.required.len()
    }

    /// Attach a cosignature.
    ///
    /// Returns `Ok(false)` when the signer already has one attached.
    pub fn attach(&mut self, cosignature: Cosignature) -> Result<bool, CosignError> {
        if !self.required.contains(&cosignature.signer) {
            warn!(
                hash = %to_hex(&self.hash),
                signer = %to_hex(&cosignature.signer),
                "Cosignature from a signer outside the aggregate"
            );
            return Err(CosignError::UnexpectedSigner(cosignature.signer));
        }
        verify_ed25519(&cosignature.signer, &self.hash, &cosignature.signature)
            .map_err(|_| CosignError::InvalidCosignature(cosignature.signer))?;

        if self.cosignatures.contains_key(&cosignature.signer) {
            return Ok(false);
        }
        self.cosignatures
            .insert(cosignature.signer, cosignature.signature);

        debug!(
            hash = %to_hex(&self.hash),
            signer = %to_hex(&cosignature.signer),
            remaining = self.required.len() - self.cosignatures.len(),
            "Cosignature attached"
        );
        Ok(true)
    }

    /// Attach several cosignatures; returns how many were new.
    pub fn attach_all(
        &mut self,
        cosignatures: impl IntoIterator<Item = Cosignature>,
    ) -> Result<usize, CosignError> {
        let mut added = 0;
        for cosignature in cosignatures {
            if self.attach(cosignature)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Merge cosignatures collected by another accumulator for the same
    /// aggregate; returns how many were new.
    pub fn merge(&mut self, other: &PendingAggregate) -> Result<usize, CosignError> {
        if other.hash != self.hash {
            return Err(CosignError::HashMismatch {
                expected: self.hash,
                actual: other.hash,
            });
        }
        self.attach_all(other.cosignatures())
    }

    /// Current state as a transaction, cosignatures sorted by signer.
    pub fn transaction(&self) -> Transaction {
        let mut tx = self.transaction.clone();
        if let Some(aggregate) = tx.body.as_aggregate_mut() {
            aggregate.cosignatures = self.cosignatures();
        }
        tx
    }

    /// Encoding of the current, possibly partial, state for relaying to
    /// other cosigners.
    pub fn encode_partial(&self) -> Result<Vec<u8>, CosignError> {
        Ok(encode(&self.transaction())?)
    }

    /// Close collection. Fails until every required signer has cosigned.
    pub fn finalize(self) -> Result<SignedTransaction, CosignError> {
        let missing = self.missing_signers();
        if !missing.is_empty() {
            return Err(CosignError::IncompleteCosignatures { missing });
        }
        let transaction = self.transaction();
        let payload = encode(&transaction)?;
        info!(
            hash = %to_hex(&self.hash),
            cosignatures = self.cosignatures.len(),
            size = payload.len(),
            "Aggregate ready to announce"
        );
        Ok(SignedTransaction {
            transaction,
            payload,
            hash: self.hash,
        })
    }
}

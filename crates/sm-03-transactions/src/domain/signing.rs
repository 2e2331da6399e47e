//! # Signing and Hashing
//!
//! ```text
//! payload   = encoded[100..end]       (aggregates: end = cosignatures offset)
//! signature = Ed25519(generationHash ‖ payload)
//! hash      = SHA3-256(signature[0..32] ‖ signer ‖ generationHash ‖ payload)
//! ```
//!
//! The payload excludes the size prefix, signature, signer and, for
//! aggregates, the cosignature list, so attaching cosignatures never changes
//! the hash.

use crate::domain::codec::encode_table;
use crate::domain::errors::TransactionError;
use crate::domain::header::Transaction;
use crate::domain::layouts::{layout, AGGREGATE_COSIGNATURES, SIGNING_PAYLOAD_OFFSET};
use shared_crypto::{verify_ed25519, Ed25519KeyPair, Sha3Hasher};
use shared_types::{to_hex, Hash, PublicKey, Signature};
use sm_02_wire_codec::EncodedTable;
use tracing::debug;

/// A signed transaction with its announce bytes and hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    /// Encoded bytes, ready to announce.
    pub payload: Vec<u8>,
    pub hash: Hash,
}

impl SignedTransaction {
    /// Upper-case hex of the hash.
    pub fn hash_hex(&self) -> String {
        to_hex(&self.hash)
    }
}

/// Bytes covered by the signature.
pub fn signing_payload(tx: &Transaction) -> Result<Vec<u8>, TransactionError> {
    let table = encode_table(tx)?;
    Ok(payload_of(tx, &table)?.to_vec())
}

fn payload_of<'a>(
    tx: &Transaction,
    table: &'a EncodedTable,
) -> Result<&'a [u8], TransactionError> {
    let entity = tx.entity_type();
    let end = if entity.is_aggregate() {
        let slot = layout(entity).body_start() + AGGREGATE_COSIGNATURES;
        table
            .offset(slot)
            .ok_or_else(|| TransactionError::schema("aggregate without cosignature field"))?
    } else {
        table.bytes.len()
    };
    table
        .bytes
        .get(SIGNING_PAYLOAD_OFFSET..end)
        .ok_or_else(|| TransactionError::schema("table shorter than its header"))
}

/// Transaction hash from its parts.
pub fn transaction_hash(
    signature: &Signature,
    signer: &PublicKey,
    generation_hash: &Hash,
    payload: &[u8],
) -> Hash {
    let mut hasher = Sha3Hasher::new();
    hasher
        .update(&signature[..32])
        .update(signer)
        .update(generation_hash)
        .update(payload);
    hasher.finalize()
}

/// Hash of a transaction as currently signed.
pub fn hash_transaction(
    tx: &Transaction,
    generation_hash: &Hash,
) -> Result<Hash, TransactionError> {
    let payload = signing_payload(tx)?;
    Ok(transaction_hash(
        &tx.header.signature,
        &tx.header.signer,
        generation_hash,
        &payload,
    ))
}

/// Sign as `keypair`, replacing any signer and signature already set.
pub fn sign_transaction(
    mut tx: Transaction,
    keypair: &Ed25519KeyPair,
    generation_hash: &Hash,
) -> Result<SignedTransaction, TransactionError> {
    tx.header.signer = keypair.public_key();

    let payload = signing_payload(&tx)?;
    let signature = keypair.sign(&signed_message(generation_hash, &payload));
    tx.header.signature = signature;

    let hash = transaction_hash(&signature, &tx.header.signer, generation_hash, &payload);
    let bytes = encode_table(&tx)?.into_bytes();
    debug!(
        entity = ?tx.entity_type(),
        hash = %to_hex(&hash),
        "Transaction signed"
    );

    Ok(SignedTransaction {
        transaction: tx,
        payload: bytes,
        hash,
    })
}

/// Check the header signature against the header signer.
pub fn verify_transaction_signature(
    tx: &Transaction,
    generation_hash: &Hash,
) -> Result<(), TransactionError> {
    let payload = signing_payload(tx)?;
    verify_ed25519(
        &tx.header.signer,
        &signed_message(generation_hash, &payload),
        &tx.header.signature,
    )?;
    Ok(())
}

fn signed_message(generation_hash: &Hash, payload: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(generation_hash.len() + payload.len());
    message.extend_from_slice(generation_hash);
    message.extend_from_slice(payload);
    message
}

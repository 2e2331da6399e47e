//! # BLS12-381 Signatures
//!
//! Replicators sign verification opinions with BLS so that opinions over the
//! same result vector can be aggregated and checked with one pairing.
//!
//! Uses blst's `min_pk` variant:
//! - Public keys on G1 (48 bytes compressed)
//! - Signatures on G2 (96 bytes compressed)

use blst::min_pk::{AggregatePublicKey, AggregateSignature, PublicKey, SecretKey, Signature};
use blst::BLST_ERROR;
use rand::RngCore;
use shared_types::{BlsPublicKey, BlsSignature};
use zeroize::Zeroize;

use crate::CryptoError;

/// Domain separation tag (proof-of-possession ciphersuite).
const DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

/// BLS key pair for signing opinions.
pub struct BlsKeyPair {
    secret: SecretKey,
    public: BlsPublicKey,
}

impl BlsKeyPair {
    /// Generate a new random key pair.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut ikm = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut ikm);
        let result = Self::from_ikm(&ikm);
        ikm.zeroize();
        result
    }

    /// Derive a key pair from input key material (at least 32 bytes).
    pub fn from_ikm(ikm: &[u8]) -> Result<Self, CryptoError> {
        let secret = SecretKey::key_gen(ikm, &[]).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self::from_secret(secret))
    }

    /// Restore from existing secret key bytes.
    pub fn from_secret_bytes(bytes: &[u8; 32]) -> Result<Self, CryptoError> {
        let secret = SecretKey::from_bytes(bytes).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self::from_secret(secret))
    }

    fn from_secret(secret: SecretKey) -> Self {
        let public = BlsPublicKey::new(secret.sk_to_pk().to_bytes());
        Self { secret, public }
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> BlsSignature {
        BlsSignature::new(self.secret.sign(message, DST, &[]).to_bytes())
    }

    /// Get the public key.
    pub fn public_key(&self) -> BlsPublicKey {
        self.public
    }

    /// Get the secret key bytes.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.secret.to_bytes()
    }
}

/// Verify a single BLS signature.
///
/// Returns `false` for malformed keys or signatures as well as for a failed
/// pairing check.
pub fn verify_bls(message: &[u8], signature: &BlsSignature, public_key: &BlsPublicKey) -> bool {
    let Ok(sig) = Signature::from_bytes(&signature.bytes) else {
        return false;
    };
    let Ok(pk) = PublicKey::from_bytes(&public_key.bytes) else {
        return false;
    };

    sig.verify(true, message, DST, &[], &pk, true) == BLST_ERROR::BLST_SUCCESS
}

/// Verify an aggregate signature where every signer signed `message`.
pub fn verify_bls_aggregate(
    message: &[u8],
    aggregate_signature: &BlsSignature,
    public_keys: &[BlsPublicKey],
) -> bool {
    if public_keys.is_empty() {
        return false;
    }

    let Ok(sig) = Signature::from_bytes(&aggregate_signature.bytes) else {
        return false;
    };

    let pks: Vec<PublicKey> = public_keys
        .iter()
        .filter_map(|pk| PublicKey::from_bytes(&pk.bytes).ok())
        .collect();
    if pks.len() != public_keys.len() {
        return false;
    }
    if pks.iter().any(|pk| pk.validate().is_err()) {
        return false;
    }

    let pk_refs: Vec<&PublicKey> = pks.iter().collect();
    sig.fast_aggregate_verify(true, message, DST, &pk_refs) == BLST_ERROR::BLST_SUCCESS
}

/// Aggregate multiple BLS signatures into one.
pub fn aggregate_bls_signatures(signatures: &[BlsSignature]) -> Result<BlsSignature, CryptoError> {
    if signatures.is_empty() {
        return Err(CryptoError::EmptyAggregation);
    }

    let parsed: Vec<Signature> = signatures
        .iter()
        .map(|s| Signature::from_bytes(&s.bytes).map_err(|_| CryptoError::InvalidSignature))
        .collect::<Result<_, _>>()?;
    let refs: Vec<&Signature> = parsed.iter().collect();

    AggregateSignature::aggregate(&refs, true)
        .map(|agg| BlsSignature::new(agg.to_signature().to_bytes()))
        .map_err(|_| CryptoError::AggregationFailed)
}

/// Aggregate multiple BLS public keys into one.
pub fn aggregate_bls_public_keys(
    public_keys: &[BlsPublicKey],
) -> Result<BlsPublicKey, CryptoError> {
    if public_keys.is_empty() {
        return Err(CryptoError::EmptyAggregation);
    }

    let parsed: Vec<PublicKey> = public_keys
        .iter()
        .map(|pk| PublicKey::from_bytes(&pk.bytes).map_err(|_| CryptoError::InvalidPublicKey))
        .collect::<Result<_, _>>()?;
    let refs: Vec<&PublicKey> = parsed.iter().collect();

    AggregatePublicKey::aggregate(&refs, true)
        .map(|agg| BlsPublicKey::new(agg.to_public_key().to_bytes()))
        .map_err(|_| CryptoError::AggregationFailed)
}

//! # Core Identities
//!
//! Fixed-width byte identities used by drives, replicators and transactions.
//!
//! ## Sizes
//!
//! | Type | Width | Meaning |
//! |------|-------|---------|
//! | `Hash` | 32 | SHA3-256 digest (content roots, modification ids, tx hashes) |
//! | `PublicKey` | 32 | Ed25519 account key (drives, owners, replicators) |
//! | `Signature` | 64 | Ed25519 transaction signature |
//! | `BlsPublicKey` | 48 | BLS12-381 G1 point, compressed |
//! | `BlsSignature` | 96 | BLS12-381 G2 point, compressed |

use crate::errors::TypesError;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use std::fmt;

/// A 32-byte SHA3-256 digest.
pub type Hash = [u8; 32];

/// A 64-byte Ed25519 signature.
pub type Signature = [u8; 64];

/// A 32-byte Ed25519 public key.
pub type PublicKey = [u8; 32];

/// Width of a compressed BLS public key.
pub const BLS_PUBLIC_KEY_SIZE: usize = 48;

/// Width of a compressed BLS signature.
pub const BLS_SIGNATURE_SIZE: usize = 96;

/// All-zero digest, the wire default for an absent hash field.
pub const ZERO_HASH: Hash = [0u8; 32];

/// Render bytes as upper-case hex, the form used by query payloads.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Parse a hex string into a fixed-width array.
pub fn from_hex<const N: usize>(input: &str) -> Result<[u8; N], TypesError> {
    let bytes = hex::decode(input).map_err(|e| TypesError::InvalidHex(e.to_string()))?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| TypesError::InvalidLength {
        expected: N,
        actual: bytes.len(),
    })
}

/// BLS public key (G1 point, 48 bytes compressed).
///
/// Byte form only. Parsing into a curve point happens in `shared-crypto`.
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlsPublicKey {
    /// Compressed G1 point.
    #[serde_as(as = "Bytes")]
    pub bytes: [u8; BLS_PUBLIC_KEY_SIZE],
}

impl BlsPublicKey {
    /// Wrap raw key bytes.
    pub const fn new(bytes: [u8; BLS_PUBLIC_KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Parse the 96-character hex form reported by replicators.
    pub fn from_hex(input: &str) -> Result<Self, TypesError> {
        from_hex::<BLS_PUBLIC_KEY_SIZE>(input).map(Self::new)
    }

    /// True when every byte is zero (the wire default).
    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|b| *b == 0)
    }
}

impl Default for BlsPublicKey {
    fn default() -> Self {
        Self {
            bytes: [0u8; BLS_PUBLIC_KEY_SIZE],
        }
    }
}

impl fmt::Debug for BlsPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlsPublicKey({})", to_hex(&self.bytes))
    }
}

impl fmt::Display for BlsPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_hex(&self.bytes))
    }
}

/// BLS signature (G2 point, 96 bytes compressed).
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlsSignature {
    /// Compressed G2 point.
    #[serde_as(as = "Bytes")]
    pub bytes: [u8; BLS_SIGNATURE_SIZE],
}

impl BlsSignature {
    /// Wrap raw signature bytes.
    pub const fn new(bytes: [u8; BLS_SIGNATURE_SIZE]) -> Self {
        Self { bytes }
    }
}

impl Default for BlsSignature {
    fn default() -> Self {
        Self {
            bytes: [0u8; BLS_SIGNATURE_SIZE],
        }
    }
}

impl fmt::Debug for BlsSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlsSignature({}..)", to_hex(&self.bytes[..8]))
    }
}

//! # Shared Crypto - Signing and Hashing Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA3-256 | Transaction hashes, content digests |
//! | `signatures` | Ed25519 | Transaction signatures, cosignatures |
//! | `bls` | BLS12-381 (`min_pk`) | Replicator verification opinions |
//!
//! ## Security Properties
//!
//! - **Ed25519**: Deterministic nonces, no RNG dependency
//! - **BLS**: Public keys on G1 (48 bytes), signatures on G2 (96 bytes),
//!   proof-of-possession ciphersuite so same-message aggregation is sound
//!
//! All functions take and return the byte types from `shared-types`; curve
//! points never leak out of this crate.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bls;
pub mod errors;
pub mod hashing;
pub mod signatures;

// Re-exports
pub use bls::{
    aggregate_bls_public_keys, aggregate_bls_signatures, verify_bls, verify_bls_aggregate,
    BlsKeyPair,
};
pub use errors::CryptoError;
pub use hashing::{sha3_256, sha3_256_many, Sha3Hasher};
pub use signatures::{verify_ed25519, Ed25519KeyPair};

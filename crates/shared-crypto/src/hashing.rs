//! # SHA3-256 Hashing
//!
//! Transaction hashes and content digests.

use sha3::{Digest, Sha3_256};
use shared_types::Hash;

/// Stateful SHA3-256 hasher.
#[derive(Clone, Default)]
pub struct Sha3Hasher {
    inner: Sha3_256,
}

impl Sha3Hasher {
    /// Create new hasher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update with data.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update(data);
        self
    }

    /// Finalize and return hash.
    pub fn finalize(self) -> Hash {
        self.inner.finalize().into()
    }
}

/// Hash data with SHA3-256 (one-shot).
pub fn sha3_256(data: &[u8]) -> Hash {
    Sha3_256::digest(data).into()
}

/// Hash the concatenation of multiple inputs.
pub fn sha3_256_many(inputs: &[&[u8]]) -> Hash {
    let mut hasher = Sha3Hasher::new();
    for input in inputs {
        hasher.update(input);
    }
    hasher.finalize()
}

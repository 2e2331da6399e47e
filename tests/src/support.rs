//! Shared fixtures for the flows and benchmarks.

use shared_crypto::{BlsKeyPair, CryptoError, Ed25519KeyPair};
use shared_types::{Hash, NetworkType};
use sm_03_transactions::{TransactionConfig, TransactionError, TransactionFactory};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Generation hash used by every fixture network.
pub const GENERATION_HASH: Hash = [0x5A; 32];

static TRACING: Once = Once::new();

/// Install a `RUST_LOG`-filtered subscriber once per test binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_target(true)
            .with_test_writer()
            .try_init();
    });
}

pub fn factory() -> Result<TransactionFactory, TransactionError> {
    TransactionFactory::new(TransactionConfig::new(NetworkType::MijinTest, GENERATION_HASH))
}

/// A replicator's account key and BLS key, derived from one seed byte.
pub struct ReplicatorKeys {
    pub account: Ed25519KeyPair,
    pub bls: BlsKeyPair,
}

impl ReplicatorKeys {
    pub fn from_seed(seed: u8) -> Result<Self, CryptoError> {
        Ok(Self {
            account: Ed25519KeyPair::from_seed([seed; 32]),
            bls: BlsKeyPair::from_ikm(&[seed; 32])?,
        })
    }
}

/// `count` replicators with seeds starting at `first_seed`.
pub fn replicators(first_seed: u8, count: u8) -> Result<Vec<ReplicatorKeys>, CryptoError> {
    (first_seed..first_seed + count)
        .map(ReplicatorKeys::from_seed)
        .collect()
}

//! # Transaction Configuration
//!
//! Values stamped onto every transaction header, plus the generation hash
//! signatures are bound to.
//!
//! ## Environment Overrides
//!
//! | Variable | Field | Format |
//! |----------|-------|--------|
//! | `SM_NETWORK_TYPE` | `network_type` | network byte, decimal or `0x` hex |
//! | `SM_GENERATION_HASH` | `generation_hash` | 64 hex chars |
//! | `SM_MAX_FEE` | `max_fee` | decimal |
//! | `SM_DEADLINE_SECS` | `deadline_window` | decimal seconds |
//!
//! ## Security Requirements
//!
//! - `generation_hash` MUST NOT be the default zero value: signatures made
//!   against it are valid on no network.

use crate::domain::errors::TransactionError;
use shared_types::{Amount, Hash, NetworkType, ZERO_HASH};
use std::time::Duration;
use tracing::{info, warn};

/// Default deadline window.
pub const DEFAULT_DEADLINE_WINDOW: Duration = Duration::from_secs(60 * 60);

/// Transaction header defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionConfig {
    pub network_type: NetworkType,
    /// Hash of the network's first block.
    pub generation_hash: Hash,
    pub max_fee: Amount,
    /// Deadline distance from the moment a header is stamped.
    pub deadline_window: Duration,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            network_type: NetworkType::MijinTest,
            generation_hash: ZERO_HASH,
            max_fee: Amount(0),
            deadline_window: DEFAULT_DEADLINE_WINDOW,
        }
    }
}

impl TransactionConfig {
    pub fn new(network_type: NetworkType, generation_hash: Hash) -> Self {
        Self {
            network_type,
            generation_hash,
            ..Self::default()
        }
    }

    pub fn with_max_fee(mut self, max_fee: Amount) -> Self {
        self.max_fee = max_fee;
        self
    }

    pub fn with_deadline_window(mut self, window: Duration) -> Self {
        self.deadline_window = window;
        self
    }

    /// Reject configurations that cannot produce valid transactions.
    pub fn validate(&self) -> Result<(), TransactionError> {
        if self.generation_hash == ZERO_HASH {
            return Err(TransactionError::InvalidConfig(
                "generation hash is the default zero value; set SM_GENERATION_HASH".into(),
            ));
        }
        if self.deadline_window.is_zero() {
            return Err(TransactionError::InvalidConfig(
                "deadline window must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Defaults overridden from `SM_*` environment variables.
    ///
    /// Unparseable values are logged and skipped.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup("SM_NETWORK_TYPE") {
            match parse_u8(&raw).map(NetworkType::try_from) {
                Some(Ok(network)) => config.network_type = network,
                _ => warn!(value = %raw, "SM_NETWORK_TYPE is not a known network byte"),
            }
        }

        if let Some(raw) = lookup("SM_GENERATION_HASH") {
            match hex::decode(raw.trim()) {
                Ok(bytes) if bytes.len() == 32 => {
                    config.generation_hash.copy_from_slice(&bytes);
                    info!("Loaded generation hash from environment");
                }
                _ => warn!("SM_GENERATION_HASH must be 32 bytes (64 hex chars)"),
            }
        }

        if let Some(raw) = lookup("SM_MAX_FEE") {
            match raw.trim().parse::<u64>() {
                Ok(fee) => config.max_fee = Amount(fee),
                Err(_) => warn!(value = %raw, "SM_MAX_FEE is not an unsigned integer"),
            }
        }

        if let Some(raw) = lookup("SM_DEADLINE_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) => config.deadline_window = Duration::from_secs(secs),
                Err(_) => warn!(value = %raw, "SM_DEADLINE_SECS is not an unsigned integer"),
            }
        }

        config
    }
}

fn parse_u8(raw: &str) -> Option<u8> {
    let raw = raw.trim();
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}

//! # Aggregate Cosigning Subsystem (SM-06)
//!
//! An aggregate bundles inner transactions from several signers. It may be
//! announced only once every distinct inner signer other than the initiator
//! has cosigned the aggregate hash.
//!
//! ## Protocol
//!
//! | Step | Party | Operation |
//! |------|-------|-----------|
//! | 1 | Initiator | `AggregateBuilder::sign` fixes the hash |
//! | 2 | Initiator | `PendingAggregate::encode_partial` relays the bytes |
//! | 3 | Cosigner | `cosign_transaction` checks the initiator and signs the hash |
//! | 4 | Anyone | `attach` / `merge` collect cosignatures, in any order |
//! | 5 | Initiator | `finalize` yields the announce bytes |
//!
//! Partial collections are a normal state; `finalize` fails with
//! `CosignError::IncompleteCosignatures` until the set is complete. Nothing
//! here expires a collection: the transaction deadline does.

pub mod domain;

// Re-export public API
pub use domain::builder::{AggregateBuilder, AggregateKind};
pub use domain::errors::CosignError;
pub use domain::pending::{cosign, cosign_transaction, required_cosigners, PendingAggregate};

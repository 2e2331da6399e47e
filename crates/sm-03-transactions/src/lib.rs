//! # Transactions Subsystem (SM-03)
//!
//! Typed transaction model for the storage market, the wire layout of every
//! transaction type, and signing.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Header and body model, layouts, codec,
//!   signing
//! - **Config** (`config.rs`): Network, generation hash, fee and deadline
//!   defaults
//! - **Factory** (`factory.rs`): Stamps headers from config
//!
//! ## Transaction Catalogue
//!
//! | Body | Type | Version |
//! |------|------|---------|
//! | `ReplicatorOnboarding` | `0x4662` | 1 |
//! | `PrepareBcDrive` | `0x4162` | 1 |
//! | `DataModification` | `0x4262` | 1 |
//! | `DataModificationCancel` | `0x4562` | 1 |
//! | `DriveClosure` | `0x4E62` | 1 |
//! | `EndDriveVerificationV2` | `0x4F62` | 1 |
//! | `Deploy` | `0x415E` | 1 |
//! | `StartExecute` | `0x425E` | 1 |
//! | `AggregateComplete` / `AggregateBonded` | `0x4141` / `0x4241` | 3 |
//!
//! Type and version are never stored: both derive from the body variant.

pub mod config;
pub mod domain;
pub mod factory;

// Re-export public API
pub use config::TransactionConfig;
pub use domain::body::{
    AggregateTransaction, Cosignature, DataModification, DataModificationCancel, Deploy,
    DriveClosure, EndDriveVerificationV2, Mosaic, PrepareBcDrive, ReplicatorOnboarding,
    StartExecute, TransactionBody,
};
pub use domain::codec::{decode, decode_embedded, encode, encode_embedded, encode_table};
pub use domain::errors::TransactionError;
pub use domain::header::{EmbeddedTransaction, Transaction, TransactionHeader};
pub use domain::layouts::{
    embedded_layout, layout, EMBEDDED_HEADER_SIZE, HEADER_SIZE, SIGNING_PAYLOAD_OFFSET,
};
pub use domain::signing::{
    hash_transaction, sign_transaction, signing_payload, transaction_hash,
    verify_transaction_signature, SignedTransaction,
};
pub use factory::TransactionFactory;

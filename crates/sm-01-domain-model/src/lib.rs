//! # Storage Market Domain Model (SM-01)
//!
//! Records describing rented drives, the replicators that host them and the
//! verification rounds that audit them.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure records and lifecycle rules, no I/O
//!
//! ## Ownership
//!
//! A `BcDrive` exclusively owns its modification lists, and a `Replicator`
//! exclusively owns its `DriveInfo` map keyed by drive key. Nothing points
//! back from a drive to its replicators.
//!
//! ## Invariants
//!
//! - A completed modification id never re-enters the active set.
//! - `CompletedDataModification` only comes from consuming an
//!   `ActiveDataModification`.

pub mod domain;

// Re-export public API
pub use domain::drive::{
    ActiveDataModification, BcDrive, CompletedDataModification, DataModificationState,
};
pub use domain::errors::ModelError;
pub use domain::replicator::{DriveInfo, Replicator};
pub use domain::verification::{check_opinion_shapes, VerificationOpinion, VerificationResult};

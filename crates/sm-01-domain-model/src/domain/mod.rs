//! # Domain Layer - Storage Market Records
//!
//! ## Components
//!
//! - `drive`: BcDrive and the data-modification sub-machine
//! - `replicator`: Replicator and per-drive DriveInfo
//! - `verification`: Verification results and opinions, shape checks
//! - `errors`: ModelError enumeration

pub mod drive;
pub mod errors;
pub mod replicator;
pub mod verification;

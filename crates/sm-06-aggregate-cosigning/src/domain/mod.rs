//! # Domain Layer - Aggregate Cosigning
//!
//! - `builder`: Assembles and initiator-signs an aggregate
//! - `pending`: Cosignature accumulator and submission gate
//! - `errors`: CosignError enumeration

pub mod builder;
pub mod errors;
pub mod pending;

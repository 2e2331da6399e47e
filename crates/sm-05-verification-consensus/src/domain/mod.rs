//! # Domain Layer - Verification Consensus
//!
//! - `message`: Signed bytes of an opinion, signing and checking
//! - `session`: Opinion accumulator for one round
//! - `errors`: VerificationError enumeration

pub mod errors;
pub mod message;
pub mod session;

//! # Cross-Crate Flows
//!
//! Each module drives several subsystems together the way a client would:
//! build and sign transactions, round-trip them through the wire codec, and
//! feed the accepted result into the drive tracker.

pub mod modifications;
pub mod onboarding;
pub mod scenarios;
pub mod verification;

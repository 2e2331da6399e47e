//! # Storage Market Benchmarks
//!
//! Criterion groups per subsystem, registered from `benches/sm_benchmarks.rs`.

pub mod consensus;
pub mod signing;
pub mod wire_codec;

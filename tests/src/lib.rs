//! # Storage Market Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── benchmarks/       # Criterion groups, wired up in benches/
//! │   ├── wire_codec.rs
//! │   ├── signing.rs
//! │   └── consensus.rs
//! │
//! ├── integration/      # Cross-crate flows
//! │   ├── onboarding.rs
//! │   ├── modifications.rs
//! │   ├── verification.rs
//! │   └── scenarios.rs
//! │
//! └── support.rs        # Fixtures and tracing setup
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p sm-tests
//!
//! # With logs
//! RUST_LOG=debug cargo test -p sm-tests integration:: -- --nocapture
//!
//! # Benchmarks
//! cargo bench -p sm-tests
//! ```

pub mod benchmarks;
pub mod integration;
pub mod support;

//! # Verification Consensus Subsystem (SM-05)
//!
//! Replicators of a drive periodically check each other's storage. Every
//! verifier signs a pass/fail result for every prover with its BLS key; the
//! opinions are collected and packaged into an `EndDriveVerificationV2`
//! transaction. Majority decisions are made by the ledger, not here.
//!
//! ## Flow
//!
//! ```text
//! verifier i: results ──opinion_message──→ bytes ──BLS sign──→ VerificationOpinion
//!                                                                    │
//!                     VerificationSession ◄────── add_opinion ───────┘
//!                             │
//!                             ├── verify_signatures (one aggregate per result group)
//!                             └── into_body / into_transaction
//! ```
//!
//! ## Session Rules
//!
//! | Rule | Error |
//! |------|-------|
//! | At least one prover | `ModelError::EmptyProverList` |
//! | Results length equals prover count | `ModelError::ConsensusShapeMismatch` |
//! | Result `i` names prover `i` | `VerificationError::ResultOutOfOrder` |
//! | Verifier index names a prover | `VerificationError::VerifierOutOfRange` |
//! | One opinion per verifier | `VerificationError::ConflictingOpinion` |
//! | One opinion per prover before packaging | `ModelError::ConsensusShapeMismatch` |

pub mod domain;

// Re-export public API
pub use domain::errors::VerificationError;
pub use domain::message::{opinion_message, sign_opinion, verify_opinion};
pub use domain::session::VerificationSession;

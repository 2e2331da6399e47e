//! # Drive Lifecycle Subsystem (SM-04)
//!
//! Follows a drive through the states the ledger reports for it and
//! publishes a `DriveState` snapshot after every accepted change.
//!
//! ## State Machine
//!
//! ```text
//! [Preparing] ──replicators joined──→ [Active] ──start──→ [VerificationPending]
//!                                       │   ↑                     │
//!                                       │   └──────── end ────────┘
//!                                       │
//!                                       └──closure──→ [Closing] ──finalized──→ [Closed]
//! ```
//!
//! The ledger is authoritative. The tracker only mirrors what it observes
//! and rejects sequences the ledger could never produce.
//!
//! ## Notifications
//!
//! ```text
//! DriveTracker ──publish_now──→ InMemoryEventBus<DriveState> ──→ HandlerRegistry
//! ```

pub mod domain;
pub mod tracker;

// Re-export public API
pub use domain::errors::LifecycleError;
pub use domain::events::DriveEvent;
pub use domain::state::{DriveState, ModificationSummary, DRIVE_STATE_TOPIC};
pub use domain::status::{DriveStatus, VerificationStatus};
pub use tracker::DriveTracker;

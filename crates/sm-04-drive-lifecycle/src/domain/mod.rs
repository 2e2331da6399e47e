//! # Domain Layer - Drive Lifecycle
//!
//! - `status`: Drive status and the transition table
//! - `events`: Observed events that drive transitions
//! - `state`: The published drive-state record
//! - `errors`: LifecycleError enumeration

pub mod errors;
pub mod events;
pub mod state;
pub mod status;

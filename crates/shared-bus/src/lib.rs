//! # Shared Bus - Keyed Event Notifications
//!
//! Delivers state records (e.g. drive-state snapshots) from the component
//! that observes a change to any number of interested callers.
//!
//! ## Delivery Model
//!
//! ```text
//! ┌──────────────┐   publish()   ┌──────────────┐   recv()   ┌─────────────────┐
//! │ DriveTracker │ ────────────▶ │  Event Bus   │ ─────────▶ │ HandlerRegistry │
//! └──────────────┘               └──────────────┘            │  key → [pred]   │
//!                                                            └─────────────────┘
//! ```
//!
//! - Every event carries a 32-byte key (the drive key). Filters and handlers
//!   select on it.
//! - Events with the same key are delivered in publication order. No order
//!   is promised across keys.
//! - Handlers are predicates: returning `true` removes the handler.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod handlers;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{BusEvent, EventFilter};
pub use handlers::{spawn_dispatcher, HandlerId, HandlerRegistry};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before it starts lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

//! # Bus Events
//!
//! The contract an event type must meet to travel on the bus, and the
//! filter subscribers use to select events.

use shared_types::PublicKey;
use std::fmt::Debug;

/// An event that can be published on the bus.
pub trait BusEvent: Clone + Debug + Send + Sync + 'static {
    /// Key the event belongs to (drive key for drive-state records).
    fn key(&self) -> PublicKey;

    /// Short topic name used in log lines.
    fn topic(&self) -> &'static str;
}

/// Filter for subscribing to a subset of events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Keys to receive. Empty means all keys.
    pub keys: Vec<PublicKey>,
}

impl EventFilter {
    /// Receive every event.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Receive only events for the given keys.
    #[must_use]
    pub fn keys(keys: Vec<PublicKey>) -> Self {
        Self { keys }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches<E: BusEvent>(&self, event: &E) -> bool {
        self.keys.is_empty() || self.keys.contains(&event.key())
    }
}

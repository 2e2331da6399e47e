//! # Event Publisher
//!
//! Publishing side of the bus. The tracker publishes synchronously with
//! [`InMemoryEventBus::publish_now`]; async producers go through
//! [`EventPublisher`].

use crate::events::{BusEvent, EventFilter};
use crate::subscriber::{EventStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use shared_types::to_hex;
use tracing::{debug, trace};

/// Async publishing port.
#[async_trait]
pub trait EventPublisher<E: BusEvent>: Send + Sync {
    /// Returns how many subscribers were handed the event, before filtering.
    async fn publish(&self, event: E) -> usize;

    /// Events accepted since creation, delivered or not.
    fn events_published(&self) -> u64;
}

/// Broadcast-channel bus.
///
/// All keys share one channel, so events for one key keep their order.
pub struct InMemoryEventBus<E: BusEvent> {
    sender: broadcast::Sender<E>,
    events_published: AtomicU64,
    capacity: usize,
}

impl<E: BusEvent> InMemoryEventBus<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// `capacity` events may queue per subscriber before it lags.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe from now on. Earlier events are not replayed.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription<E> {
        debug!(keys = filter.keys.len(), "Subscription opened");
        Subscription::new(self.sender.subscribe(), filter)
    }

    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream<E> {
        EventStream::new(self.sender.subscribe(), filter)
    }

    /// Publish from synchronous code. An event nobody listens to is
    /// counted and dropped.
    pub fn publish_now(&self, event: E) -> usize {
        let topic = event.topic();
        let key = to_hex(&event.key());
        self.events_published.fetch_add(1, Ordering::Relaxed);

        let receivers = self.sender.send(event).unwrap_or(0);
        if receivers == 0 {
            trace!(topic, %key, "Event published with no subscribers");
        } else {
            debug!(topic, %key, receivers, "Event published");
        }
        receivers
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<E: BusEvent> Default for InMemoryEventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: BusEvent> EventPublisher<E> for InMemoryEventBus<E> {
    async fn publish(&self, event: E) -> usize {
        self.publish_now(event)
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

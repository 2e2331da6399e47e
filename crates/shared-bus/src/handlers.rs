//! # Predicate Handlers
//!
//! Callers register a predicate per key. Each matching event is passed to
//! every handler registered for its key, in registration order; a handler
//! that returns `true` is removed.

use crate::events::{BusEvent, EventFilter};
use crate::publisher::InMemoryEventBus;
use parking_lot::Mutex;
use shared_types::PublicKey;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Handler callback. Return `true` to unregister.
pub type Handler<E> = Box<dyn FnMut(&E) -> bool + Send>;

/// Identifies a registered handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

/// Handlers grouped by event key.
pub struct HandlerRegistry<E: BusEvent> {
    handlers: Mutex<HashMap<PublicKey, Vec<(HandlerId, Handler<E>)>>>,
    next_id: AtomicU64,
}

impl<E: BusEvent> HandlerRegistry<E> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register a handler for events with `key`.
    pub fn add_handler<F>(&self, key: PublicKey, handler: F) -> HandlerId
    where
        F: FnMut(&E) -> bool + Send + 'static,
    {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers
            .lock()
            .entry(key)
            .or_default()
            .push((id, Box::new(handler)));
        debug!(?id, "Handler registered");
        id
    }

    /// Remove a handler. Returns `false` if it was already gone.
    pub fn remove_handler(&self, key: &PublicKey, id: HandlerId) -> bool {
        let mut handlers = self.handlers.lock();
        let Some(list) = handlers.get_mut(key) else {
            return false;
        };
        let before = list.len();
        list.retain(|(existing, _)| *existing != id);
        let removed = list.len() != before;
        if list.is_empty() {
            handlers.remove(key);
        }
        removed
    }

    /// Number of handlers registered for `key`.
    #[must_use]
    pub fn handler_count(&self, key: &PublicKey) -> usize {
        self.handlers.lock().get(key).map_or(0, Vec::len)
    }

    /// Keys that currently have at least one handler.
    #[must_use]
    pub fn keys(&self) -> Vec<PublicKey> {
        self.handlers.lock().keys().copied().collect()
    }

    /// Run every handler registered for the event's key.
    ///
    /// Returns how many handlers were invoked.
    pub fn dispatch(&self, event: &E) -> usize {
        let key = event.key();
        let mut handlers = self.handlers.lock();
        let Some(list) = handlers.get_mut(&key) else {
            trace!(topic = event.topic(), "No handlers for event");
            return 0;
        };

        let invoked = list.len();
        list.retain_mut(|(id, handler)| {
            let done = handler(event);
            if done {
                debug!(?id, "Handler finished, removing");
            }
            !done
        });
        if list.is_empty() {
            handlers.remove(&key);
        }
        invoked
    }
}

impl<E: BusEvent> Default for HandlerRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward every bus event to `registry` until the bus closes.
///
/// A single task handles all keys, so events for one key reach handlers in
/// publication order.
pub fn spawn_dispatcher<E: BusEvent>(
    bus: &InMemoryEventBus<E>,
    registry: Arc<HandlerRegistry<E>>,
) -> JoinHandle<()> {
    let mut subscription = bus.subscribe(EventFilter::all());
    tokio::spawn(async move {
        while let Some(event) = subscription.recv().await {
            registry.dispatch(&event);
        }
        debug!("Event bus closed, dispatcher stopping");
    })
}

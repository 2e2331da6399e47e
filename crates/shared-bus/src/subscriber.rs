//! # Event Subscriber
//!
//! Receiving side of the bus. A subscriber that falls more than the channel
//! capacity behind loses the oldest events; the loss is counted so a caller
//! tracking snapshot sequences can tell a gap from a quiet drive.

use crate::events::{BusEvent, EventFilter};
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tracing::warn;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The event bus was closed.
    #[error("Event bus closed")]
    Closed,
}

/// Keyed subscription handle.
pub struct Subscription<E: BusEvent> {
    receiver: broadcast::Receiver<E>,
    filter: EventFilter,
    missed: u64,
}

impl<E: BusEvent> Subscription<E> {
    pub(crate) fn new(receiver: broadcast::Receiver<E>, filter: EventFilter) -> Self {
        Self {
            receiver,
            filter,
            missed: 0,
        }
    }

    /// Next event for a subscribed key, or `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<E> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(count)) => self.record_missed(count),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking [`recv`](Self::recv). `Ok(None)` means nothing is queued.
    pub fn try_recv(&mut self) -> Result<Option<E>, SubscriptionError> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.filter.matches(&event) => return Ok(Some(event)),
                Ok(_) => {}
                Err(TryRecvError::Lagged(count)) => self.record_missed(count),
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Closed) => return Err(SubscriptionError::Closed),
            }
        }
    }

    /// Events dropped because this subscriber fell behind, any key.
    pub fn missed(&self) -> u64 {
        self.missed
    }

    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    fn record_missed(&mut self, count: u64) {
        self.missed += count;
        warn!(count, total = self.missed, "Subscriber fell behind, events dropped");
    }
}

/// A keyed subscription as a `Stream`.
pub struct EventStream<E: BusEvent> {
    inner: BroadcastStream<E>,
    filter: EventFilter,
}

impl<E: BusEvent> EventStream<E> {
    pub(crate) fn new(receiver: broadcast::Receiver<E>, filter: EventFilter) -> Self {
        Self {
            inner: BroadcastStream::new(receiver),
            filter,
        }
    }

    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

impl<E: BusEvent> Stream for EventStream<E> {
    type Item = E;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<E>> {
        loop {
            let next = match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(next) => next,
            };
            match next {
                None => return Poll::Ready(None),
                Some(Ok(event)) if self.filter.matches(&event) => {
                    return Poll::Ready(Some(event))
                }
                Some(Ok(_)) => {}
                Some(Err(error)) => warn!(%error, "Event stream fell behind"),
            }
        }
    }
}

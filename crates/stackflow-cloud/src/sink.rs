//! Delivery of watched events to the caller
//!
//! Delivery is a synchronous handoff: the loop waits for `deliver` to return
//! before advancing its cursor, so a slow consumer delays the watch but
//! never loses an event.

use crate::error::{CloudError, Result};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Consumer of events emitted by a watch loop
#[async_trait]
pub trait EventSink<E: Sync>: Send {
    async fn deliver(&mut self, event: &E) -> Result<()>;
}

/// Closures are invoked directly on the watch task
#[async_trait]
impl<E, F> EventSink<E> for F
where
    E: Sync,
    F: FnMut(&E) + Send,
{
    async fn deliver(&mut self, event: &E) -> Result<()> {
        self(event);
        Ok(())
    }
}

/// Single-slot queue towards a consumer running on another task
///
/// The producer blocks until the slot is free, so at most one event is in
/// flight at any time.
pub struct HandoffSink<E> {
    tx: mpsc::Sender<E>,
}

impl<E> HandoffSink<E> {
    pub fn channel() -> (Self, mpsc::Receiver<E>) {
        let (tx, rx) = mpsc::channel(1);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl<E> EventSink<E> for HandoffSink<E>
where
    E: Clone + Send + Sync,
{
    async fn deliver(&mut self, event: &E) -> Result<()> {
        self.tx
            .send(event.clone())
            .await
            .map_err(|_| CloudError::SinkClosed)
    }
}

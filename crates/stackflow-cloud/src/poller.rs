//! Stack event poller
//!
//! Turns the newest-first, cursor-less "describe stack events" listing into
//! an ordered stream of new events, one fetch cycle per poll interval, until
//! a termination policy fires or the caller cancels.

use crate::cancel::{ensure_active, sleep_or_cancel};
use crate::cursor::Cursor;
use crate::error::{CloudError, Result};
use crate::model::StackEvent;
use crate::paging::walk_pages;
use crate::sink::EventSink;
use crate::source::StackSource;
use crate::termination::{TerminationOutcome, TerminationPolicy};
use chrono::{DateTime, Utc};
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Timing of the poll loop
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Pause between fetch cycles
    pub interval: Duration,

    /// Pause after a throttled fetch before the cycle is retried
    pub throttle_backoff: Duration,

    /// Only events after this instant are delivered. `None` replays the
    /// current operation from its start.
    pub since: Option<DateTime<Utc>>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            throttle_backoff: Duration::from_secs(5),
            since: None,
        }
    }
}

impl PollConfig {
    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }
}

/// Polls the lifecycle events of one stack
pub struct StackEventPoller {
    source: Arc<dyn StackSource>,
    stack_name: String,
    config: PollConfig,
}

impl StackEventPoller {
    pub fn new(
        source: Arc<dyn StackSource>,
        stack_name: impl Into<String>,
        config: PollConfig,
    ) -> Self {
        Self {
            source,
            stack_name: stack_name.into(),
            config,
        }
    }

    /// Deliver new events to `sink` until `policy` reports a terminal state.
    ///
    /// Returns `Ok(())` on `Done`, `StackFailed` on `DoneWithError`,
    /// `Cancelled` when `cancel` fires, and any non-transient fetch error
    /// unchanged.
    pub async fn poll<P, S>(
        &self,
        policy: &P,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        P: TerminationPolicy + ?Sized,
        S: EventSink<StackEvent> + ?Sized,
    {
        if self.stack_name.trim().is_empty() {
            return Err(CloudError::InvalidInput(
                "stack name must not be empty".to_string(),
            ));
        }

        let mut cursor = match self.config.since {
            Some(since) => Cursor::starting_at(since),
            None => Cursor::from_epoch(),
        };

        loop {
            ensure_active(cancel)?;

            let events = match self.events_after(&cursor).await {
                Ok(events) => events,
                Err(e) if e.is_transient() => {
                    tracing::debug!(
                        "Stack events for {} throttled, retrying in {:?}: {}",
                        self.stack_name,
                        self.config.throttle_backoff,
                        e
                    );
                    sleep_or_cancel(self.config.throttle_backoff, cancel).await?;
                    continue;
                }
                Err(e) => return Err(e),
            };

            tracing::debug!("{} new events for {}", events.len(), self.stack_name);

            for event in &events {
                sink.deliver(event).await?;
                cursor.advance(event.timestamp);
            }

            if let Some(latest) = events.last() {
                match policy.evaluate(&self.stack_name, latest) {
                    TerminationOutcome::Continue => {}
                    TerminationOutcome::Done => return Ok(()),
                    TerminationOutcome::DoneWithError(reason) => {
                        return Err(CloudError::StackFailed {
                            stack: self.stack_name.clone(),
                            reason,
                        });
                    }
                }
            }

            sleep_or_cancel(self.config.interval, cancel).await?;
        }
    }

    /// Events newer than `cursor`, oldest first.
    ///
    /// Walks newest-first pages and stops at the first event the cursor has
    /// already covered, or at the start of the current user action.
    async fn events_after(&self, cursor: &Cursor<DateTime<Utc>>) -> Result<Vec<StackEvent>> {
        let mut collected = Vec::new();

        walk_pages(
            |token| self.source.stack_events_page(&self.stack_name, token),
            |event: StackEvent| {
                if !cursor.admits(event.timestamp) {
                    return ControlFlow::Break(());
                }
                let boundary = event.is_operation_start();
                collected.push(event);
                if boundary {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            },
        )
        .await?;

        collected.reverse();
        collected.sort_by_key(|event| event.timestamp);
        Ok(collected)
    }
}

//! Watch orchestration for stack operations
//!
//! The event stream narrates what happened; the stack's own status decides
//! whether it worked. A create or update can end on a rollback event that
//! satisfies the poll policy without the stack being healthy, so a finished
//! poll is always confirmed with a status query.

use crate::error::{CloudError, Result};
use crate::model::{Outputs, StackEvent};
use crate::poller::{PollConfig, StackEventPoller};
use crate::sink::EventSink;
use crate::source::StackSource;
use crate::termination::{UntilCreatedOrUpdated, UntilDeleted};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Timestamp of the newest event recorded for `stack_name`, as reported by
/// the service. `None` when the stack does not exist.
///
/// Read before starting an operation, this is the `PollConfig::since` that
/// hides every earlier operation without relying on the local clock.
pub async fn latest_event_time(
    source: &dyn StackSource,
    stack_name: &str,
) -> Result<Option<DateTime<Utc>>> {
    match source.stack_events_page(stack_name, None).await {
        Ok(page) => Ok(page.items.iter().map(|event| event.timestamp).max()),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Watches stack operations through a shared `StackSource`
pub struct StackWatcher {
    source: Arc<dyn StackSource>,
    config: PollConfig,
}

impl StackWatcher {
    pub fn new(source: Arc<dyn StackSource>, config: PollConfig) -> Self {
        Self { source, config }
    }

    fn poller(&self, stack_name: &str) -> StackEventPoller {
        StackEventPoller::new(self.source.clone(), stack_name, self.config.clone())
    }

    /// Poll until a create or update reaches a terminal event
    pub async fn until_created_or_updated<S>(
        &self,
        stack_name: &str,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        S: EventSink<StackEvent> + ?Sized,
    {
        self.poller(stack_name)
            .poll(&UntilCreatedOrUpdated, sink, cancel)
            .await
    }

    /// Poll until the stack is deleted. A stack that no longer exists counts
    /// as deleted.
    pub async fn until_deleted<S>(
        &self,
        stack_name: &str,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        S: EventSink<StackEvent> + ?Sized,
    {
        match self.poller(stack_name).poll(&UntilDeleted, sink, cancel).await {
            Err(e) if e.is_not_found() => {
                tracing::debug!("Stack {} no longer exists: {}", stack_name, e);
                Ok(())
            }
            other => other,
        }
    }

    /// Watch a create or update to the end, confirm the stack's status and
    /// return its outputs.
    pub async fn watch_until_terminal<S>(
        &self,
        stack_name: &str,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> Result<Outputs>
    where
        S: EventSink<StackEvent> + ?Sized,
    {
        self.until_created_or_updated(stack_name, sink, cancel)
            .await?;

        let status = self.source.stack_status(stack_name).await?;
        if let Some(message) = status.failure_message() {
            return Err(CloudError::StackFailed {
                stack: stack_name.to_string(),
                reason: message.to_string(),
            });
        }

        self.source.stack_outputs(stack_name).await
    }
}

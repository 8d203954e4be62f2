//! Log tail watcher
//!
//! Reads a fixed set of log streams forever, one filtered query per cycle,
//! using the highest delivered timestamp as an exclusive lower bound.

use crate::cancel::{ensure_active, sleep_or_cancel};
use crate::cursor::Cursor;
use crate::discovery::{DiscoveryConfig, StreamSet, discover_streams};
use crate::error::Result;
use crate::model::LogRecord;
use crate::paging::Pages;
use crate::sink::EventSink;
use crate::source::{LogQuery, LogSource};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Where the first cycle starts reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TailStart {
    /// Include the backlog already stored in the streams
    #[default]
    Beginning,
    /// Only records written after the tail started
    Now,
}

/// Timing of the tail loop
#[derive(Debug, Clone)]
pub struct TailConfig {
    pub interval: Duration,
    pub throttle_backoff: Duration,
    pub start: TailStart,
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            throttle_backoff: Duration::from_secs(5),
            start: TailStart::Beginning,
        }
    }
}

/// Follows the records of one log group
pub struct LogTailer {
    source: Arc<dyn LogSource>,
    group: String,
    config: TailConfig,
}

impl LogTailer {
    pub fn new(source: Arc<dyn LogSource>, group: impl Into<String>, config: TailConfig) -> Self {
        Self {
            source,
            group: group.into(),
            config,
        }
    }

    /// Deliver new records from `streams` until `cancel` fires.
    ///
    /// Only ever returns an error: `Cancelled` on cancellation, or the first
    /// non-transient fetch error.
    pub async fn tail<S>(
        &self,
        streams: &StreamSet,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> Result<()>
    where
        S: EventSink<LogRecord> + ?Sized,
    {
        let mut cursor = Cursor::starting_at(match self.config.start {
            TailStart::Beginning => 0,
            TailStart::Now => Utc::now().timestamp_millis(),
        });

        loop {
            ensure_active(cancel)?;

            let delivered = self.read_cycle(streams, &mut cursor, sink, cancel).await?;
            tracing::debug!(
                "{} log records from {} (cursor {})",
                delivered,
                self.group,
                cursor.position()
            );

            sleep_or_cancel(self.config.interval, cancel).await?;
        }
    }

    /// One fetch cycle: every record after `cursor`, in the order the
    /// service returns them. Returns the number of records delivered.
    ///
    /// A throttled page is retried with the same continuation token after
    /// the backoff, so records of other streams older than those already
    /// delivered on earlier pages are still read.
    pub async fn read_cycle<S>(
        &self,
        streams: &StreamSet,
        cursor: &mut Cursor<i64>,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> Result<usize>
    where
        S: EventSink<LogRecord> + ?Sized,
    {
        let query = LogQuery {
            group: self.group.clone(),
            stream_names: streams.names().to_vec(),
            start_time: cursor.next_start_time(),
        };
        let floor = *cursor;
        let mut delivered = 0;

        let mut pages = Pages::new(|token| self.source.log_records_page(&query, token));
        loop {
            let record = match pages.next_item().await {
                Ok(Some(record)) => record,
                Ok(None) => break,
                Err(e) if e.is_transient() => {
                    tracing::debug!(
                        "Log records of {} throttled, retrying in {:?}: {}",
                        self.group,
                        self.config.throttle_backoff,
                        e
                    );
                    sleep_or_cancel(self.config.throttle_backoff, cancel).await?;
                    continue;
                }
                Err(e) => return Err(e),
            };

            // the start bound is the service's job; this only guards against
            // backends that ignore it
            if !floor.admits(record.timestamp) {
                continue;
            }
            sink.deliver(&record).await?;
            cursor.advance(record.timestamp);
            delivered += 1;
        }

        Ok(delivered)
    }
}

/// Discover the streams of `group` matching `prefix`, then tail them until
/// `cancel` fires.
pub async fn follow_logs<S>(
    source: Arc<dyn LogSource>,
    group: &str,
    prefix: &str,
    discovery: &DiscoveryConfig,
    tail: TailConfig,
    sink: &mut S,
    cancel: &CancellationToken,
) -> Result<()>
where
    S: EventSink<LogRecord> + ?Sized,
{
    let streams = discover_streams(source.as_ref(), group, prefix, discovery, cancel).await?;
    for stream in streams.iter() {
        tracing::debug!("Found stream {}", stream);
    }

    LogTailer::new(source, group, tail)
        .tail(&streams, sink, cancel)
        .await
}

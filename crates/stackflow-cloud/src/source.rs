//! Remote capabilities consumed by the watch engine
//!
//! The poller, the discovery loop and the tailer only need this narrow
//! surface of the remote services. Backends (AWS, test stubs) implement
//! these traits and are shared as `Arc<dyn ...>`.

use crate::error::Result;
use crate::model::{LogRecord, Outputs, ResourceStatus, StackEvent};
use crate::paging::Page;
use async_trait::async_trait;

/// Stack lifecycle capabilities
#[async_trait]
pub trait StackSource: Send + Sync {
    /// One page of the stack's events, newest first
    async fn stack_events_page(
        &self,
        stack_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<StackEvent>>;

    /// Authoritative current status of the stack
    async fn stack_status(&self, stack_name: &str) -> Result<ResourceStatus>;

    /// Key/value outputs of the stack
    async fn stack_outputs(&self, stack_name: &str) -> Result<Outputs>;
}

/// Log aggregation capabilities
#[async_trait]
pub trait LogSource: Send + Sync {
    /// One page of stream names starting with `prefix`, in descending order
    async fn log_streams_page(
        &self,
        group: &str,
        prefix: &str,
        next_token: Option<String>,
    ) -> Result<Page<String>>;

    /// One page of records across the queried streams
    async fn log_records_page(
        &self,
        query: &LogQuery,
        next_token: Option<String>,
    ) -> Result<Page<LogRecord>>;
}

/// Filter for a log record listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub group: String,
    pub stream_names: Vec<String>,

    /// Inclusive lower bound in milliseconds since the epoch
    pub start_time: i64,
}

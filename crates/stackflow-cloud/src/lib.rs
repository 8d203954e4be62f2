//! stackflow cloud watch engine
//!
//! This crate turns the paginated, eventually-consistent "list events"
//! APIs of a stack orchestration service and a log aggregation service into
//! ordered, terminating local event streams.
//!
//! # Components
//!
//! - **Stack Event Poller**: follows a stack operation until a termination
//!   policy reports a terminal state
//! - **Stream Discovery**: waits for log streams to become visible
//! - **Log Tail Watcher**: follows log records until cancelled
//! - **Stack Watcher**: poller + status confirmation + outputs
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  stackflow CLI                   │
//! │        (create / update / delete / logs)         │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               stackflow-cloud                    │
//! │  ┌──────────────┐  ┌──────────────┐             │
//! │  │ StackWatcher │  │  LogTailer   │             │
//! │  │   Poller     │  │  Discovery   │             │
//! │  └──────┬───────┘  └──────┬───────┘             │
//! │  ┌──────▼─────────────────▼───────┐             │
//! │  │ trait StackSource / LogSource  │             │
//! │  └────────────────────────────────┘             │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//!           ┌───────▼───────┐
//!           │ stackflow-    │
//!           │ cloud-aws     │
//!           └───────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use stackflow_cloud::{PollConfig, StackEvent, StackWatcher};
//! use tokio_util::sync::CancellationToken;
//!
//! let watcher = StackWatcher::new(source, PollConfig::default());
//! let mut print = |event: &StackEvent| println!("{} {}", event.status, event.logical_resource_id);
//!
//! let outputs = watcher
//!     .watch_until_terminal("my-stack", &mut print, &CancellationToken::new())
//!     .await?;
//! ```

pub mod cancel;
pub mod cursor;
pub mod discovery;
pub mod error;
pub mod model;
pub mod paging;
pub mod poller;
pub mod sink;
pub mod source;
pub mod stack;
pub mod tail;
pub mod termination;
pub mod watch;

// Re-exports
pub use cursor::Cursor;
pub use discovery::{DiscoveryConfig, StreamSet, discover_streams};
pub use error::{CloudError, Result};
pub use model::{LogRecord, Outputs, ResourceStatus, StackEvent, StackSummary, USER_INITIATED};
pub use paging::{Page, Pages, collect_all, walk_pages};
pub use poller::{PollConfig, StackEventPoller};
pub use sink::{EventSink, HandoffSink};
pub use source::{LogQuery, LogSource, StackSource};
pub use stack::{
    CreateStackRequest, StackParameter, UpdateStackRequest, parse_stack_params,
    plan_update_parameters, strip_default_parameters,
};
pub use tail::{LogTailer, TailConfig, TailStart, follow_logs};
pub use termination::{
    TerminationOutcome, TerminationPolicy, UntilCreatedOrUpdated, UntilDeleted,
};
pub use watch::{StackWatcher, latest_event_time};

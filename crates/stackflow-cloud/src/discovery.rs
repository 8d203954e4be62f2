//! Log stream discovery
//!
//! Streams of a freshly created resource show up in the listing only after
//! an unspecified delay, so discovery keeps asking until something is
//! visible or its own deadline passes.

use crate::cancel::{ensure_active, sleep_or_cancel};
use crate::error::{CloudError, Result};
use crate::paging::collect_all;
use crate::source::LogSource;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Timing of stream discovery
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Pause between listings while nothing is visible
    pub interval: Duration,

    /// Pause after a throttled listing
    pub throttle_backoff: Duration,

    /// Overall bound, independent of the caller's cancellation
    pub timeout: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            throttle_backoff: Duration::from_secs(5),
            timeout: Duration::from_secs(5),
        }
    }
}

/// Non-empty, ordered set of log stream names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSet {
    names: Vec<String>,
}

impl StreamSet {
    /// `None` when `names` is empty
    pub fn new(names: Vec<String>) -> Option<Self> {
        if names.is_empty() {
            None
        } else {
            Some(Self { names })
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.names.iter()
    }
}

/// Resolve the streams of `group` whose names start with `prefix`.
///
/// Lists immediately, then every `config.interval` until at least one
/// stream is visible. Fails with `Timeout` once `config.timeout` has elapsed.
pub async fn discover_streams(
    source: &dyn LogSource,
    group: &str,
    prefix: &str,
    config: &DiscoveryConfig,
    cancel: &CancellationToken,
) -> Result<StreamSet> {
    if group.trim().is_empty() {
        return Err(CloudError::InvalidInput(
            "log group must not be empty".to_string(),
        ));
    }

    let deadline = Instant::now() + config.timeout;

    loop {
        ensure_active(cancel)?;

        let wait = match collect_all(|token| source.log_streams_page(group, prefix, token)).await {
            Ok(names) => match StreamSet::new(names) {
                Some(streams) => return Ok(streams),
                None => config.interval,
            },
            Err(e) if e.is_transient() => {
                tracing::debug!(
                    "Listing streams of {} throttled, retrying in {:?}: {}",
                    group,
                    config.throttle_backoff,
                    e
                );
                config.throttle_backoff
            }
            Err(e) => return Err(e),
        };

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(CloudError::Timeout(format!(
                "no log streams matching {:?} in {} after {:?}",
                prefix, group, config.timeout
            )));
        }

        sleep_or_cancel(wait.min(remaining), cancel).await?;
    }
}

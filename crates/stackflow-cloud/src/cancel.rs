//! Cancellation helpers shared by the watch loops

use crate::error::{CloudError, Result};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Fail with `Cancelled` once the caller has given up
pub fn ensure_active(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        Err(CloudError::Cancelled)
    } else {
        Ok(())
    }
}

/// Sleep for `duration`, waking early with `Cancelled` if the token fires
pub async fn sleep_or_cancel(duration: Duration, cancel: &CancellationToken) -> Result<()> {
    tokio::select! {
        _ = cancel.cancelled() => Err(CloudError::Cancelled),
        _ = tokio::time::sleep(duration) => Ok(()),
    }
}

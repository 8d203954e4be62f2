//! Cloud error types
//!
//! Every remote failure is classified into one of these variants so the
//! polling loops can decide between retrying, succeeding and giving up.

use thiserror::Error;

/// Errors raised by the watch engine and its remote sources
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Request throttled: {0}")]
    Throttled(String),

    /// The watched stack reached a failure state. Displays as the reason
    /// reported by the remote service.
    #[error("{reason}")]
    StackFailed { stack: String, reason: String },

    #[error("No updates are to be performed")]
    NoUpdates,

    #[error("Cancelled")]
    Cancelled,

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Event sink closed")]
    SinkClosed,
}

impl CloudError {
    /// Rate limiting and similar rejections that succeed when retried later
    pub fn is_transient(&self) -> bool {
        matches!(self, CloudError::Throttled(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CloudError::ResourceNotFound(_))
    }

    /// "The caller gave up", as opposed to "the operation failed"
    pub fn is_cancellation(&self) -> bool {
        matches!(self, CloudError::Cancelled | CloudError::Timeout(_))
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_failed_displays_reason() {
        let err = CloudError::StackFailed {
            stack: "demo".to_string(),
            reason: "Resource X already exists".to_string(),
        };
        assert_eq!(err.to_string(), "Resource X already exists");
    }

    #[test]
    fn test_classification() {
        assert!(CloudError::Throttled("Rate exceeded".into()).is_transient());
        assert!(!CloudError::ApiError("boom".into()).is_transient());
        assert!(CloudError::ResourceNotFound("demo".into()).is_not_found());
        assert!(CloudError::Cancelled.is_cancellation());
        assert!(CloudError::Timeout("streams".into()).is_cancellation());
        assert!(
            !CloudError::StackFailed {
                stack: "demo".into(),
                reason: "x".into()
            }
            .is_cancellation()
        );
    }
}

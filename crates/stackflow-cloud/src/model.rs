//! Data model shared by the poller, the log tailer and the CLI

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Reason attached by CloudFormation to the first event of a user action
pub const USER_INITIATED: &str = "User Initiated";

/// Key/value outputs of a stack, ordered by key
pub type Outputs = BTreeMap<String, String>;

/// A lifecycle event reported for a stack or one of its resources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEvent {
    /// Logical ID of the resource (equals the stack name for stack events)
    pub logical_resource_id: String,

    /// Resource type (e.g., "AWS::CloudFormation::Stack")
    pub resource_type: String,

    pub status: ResourceStatus,

    pub status_reason: Option<String>,

    pub timestamp: DateTime<Utc>,
}

impl StackEvent {
    /// Whether this event marks the beginning of a user-initiated action.
    ///
    /// Events older than this one belong to a previous operation.
    pub fn is_operation_start(&self) -> bool {
        self.status_reason.as_deref() == Some(USER_INITIATED)
    }

    /// Whether the event is about the stack itself rather than a nested resource
    pub fn is_for_stack(&self, stack_name: &str) -> bool {
        self.logical_resource_id == stack_name
    }
}

/// A single log record read from a log stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub stream_name: String,

    /// Milliseconds since the Unix epoch
    pub timestamp: i64,

    pub message: String,
}

impl LogRecord {
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// Summary row used by stack listings
#[derive(Debug, Clone)]
pub struct StackSummary {
    pub name: String,
    pub status: ResourceStatus,

    /// Last update time, or creation time for stacks never updated
    pub last_updated: DateTime<Utc>,
}

/// Status of a stack or stack resource
///
/// Covers the statuses CloudFormation reports for both stacks and their
/// resources. Unknown values are preserved verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceStatus {
    CreateInProgress,
    CreateFailed,
    CreateComplete,
    DeleteInProgress,
    DeleteFailed,
    DeleteComplete,
    DeleteSkipped,
    UpdateInProgress,
    UpdateFailed,
    UpdateComplete,
    UpdateCompleteCleanupInProgress,
    RollbackInProgress,
    RollbackFailed,
    RollbackComplete,
    UpdateRollbackInProgress,
    UpdateRollbackFailed,
    UpdateRollbackCompleteCleanupInProgress,
    UpdateRollbackComplete,
    ImportInProgress,
    ImportComplete,
    ImportRollbackInProgress,
    ImportRollbackFailed,
    ImportRollbackComplete,
    ReviewInProgress,
    Other(String),
}

impl ResourceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ResourceStatus::CreateInProgress => "CREATE_IN_PROGRESS",
            ResourceStatus::CreateFailed => "CREATE_FAILED",
            ResourceStatus::CreateComplete => "CREATE_COMPLETE",
            ResourceStatus::DeleteInProgress => "DELETE_IN_PROGRESS",
            ResourceStatus::DeleteFailed => "DELETE_FAILED",
            ResourceStatus::DeleteComplete => "DELETE_COMPLETE",
            ResourceStatus::DeleteSkipped => "DELETE_SKIPPED",
            ResourceStatus::UpdateInProgress => "UPDATE_IN_PROGRESS",
            ResourceStatus::UpdateFailed => "UPDATE_FAILED",
            ResourceStatus::UpdateComplete => "UPDATE_COMPLETE",
            ResourceStatus::UpdateCompleteCleanupInProgress => {
                "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS"
            }
            ResourceStatus::RollbackInProgress => "ROLLBACK_IN_PROGRESS",
            ResourceStatus::RollbackFailed => "ROLLBACK_FAILED",
            ResourceStatus::RollbackComplete => "ROLLBACK_COMPLETE",
            ResourceStatus::UpdateRollbackInProgress => "UPDATE_ROLLBACK_IN_PROGRESS",
            ResourceStatus::UpdateRollbackFailed => "UPDATE_ROLLBACK_FAILED",
            ResourceStatus::UpdateRollbackCompleteCleanupInProgress => {
                "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS"
            }
            ResourceStatus::UpdateRollbackComplete => "UPDATE_ROLLBACK_COMPLETE",
            ResourceStatus::ImportInProgress => "IMPORT_IN_PROGRESS",
            ResourceStatus::ImportComplete => "IMPORT_COMPLETE",
            ResourceStatus::ImportRollbackInProgress => "IMPORT_ROLLBACK_IN_PROGRESS",
            ResourceStatus::ImportRollbackFailed => "IMPORT_ROLLBACK_FAILED",
            ResourceStatus::ImportRollbackComplete => "IMPORT_ROLLBACK_COMPLETE",
            ResourceStatus::ReviewInProgress => "REVIEW_IN_PROGRESS",
            ResourceStatus::Other(s) => s,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.as_str().ends_with("COMPLETE")
    }

    pub fn is_failed(&self) -> bool {
        self.as_str().contains("FAILED")
    }

    pub fn is_rollback(&self) -> bool {
        self.as_str().contains("ROLLBACK")
    }

    pub fn is_in_progress(&self) -> bool {
        self.as_str().ends_with("IN_PROGRESS")
    }

    pub fn is_delete(&self) -> bool {
        self.as_str().starts_with("DELETE")
    }

    /// Failure message for a stack whose authoritative status says the last
    /// operation did not succeed. `None` means the stack is healthy.
    pub fn failure_message(&self) -> Option<&'static str> {
        match self {
            ResourceStatus::UpdateFailed => Some("Stack failed to update"),
            ResourceStatus::CreateFailed => Some("Stack failed to create"),
            ResourceStatus::RollbackComplete => Some("Stack rollback succeeded"),
            ResourceStatus::RollbackFailed => Some("Stack rollback failed"),
            ResourceStatus::UpdateRollbackComplete => {
                Some("Stack update failed, rollback succeeded")
            }
            ResourceStatus::UpdateRollbackFailed => Some("Stack update failed, rollback failed"),
            ResourceStatus::DeleteFailed => Some("Stack failed to delete"),
            _ => None,
        }
    }
}

impl FromStr for ResourceStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s {
            "CREATE_IN_PROGRESS" => ResourceStatus::CreateInProgress,
            "CREATE_FAILED" => ResourceStatus::CreateFailed,
            "CREATE_COMPLETE" => ResourceStatus::CreateComplete,
            "DELETE_IN_PROGRESS" => ResourceStatus::DeleteInProgress,
            "DELETE_FAILED" => ResourceStatus::DeleteFailed,
            "DELETE_COMPLETE" => ResourceStatus::DeleteComplete,
            "DELETE_SKIPPED" => ResourceStatus::DeleteSkipped,
            "UPDATE_IN_PROGRESS" => ResourceStatus::UpdateInProgress,
            "UPDATE_FAILED" => ResourceStatus::UpdateFailed,
            "UPDATE_COMPLETE" => ResourceStatus::UpdateComplete,
            "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS" => {
                ResourceStatus::UpdateCompleteCleanupInProgress
            }
            "ROLLBACK_IN_PROGRESS" => ResourceStatus::RollbackInProgress,
            "ROLLBACK_FAILED" => ResourceStatus::RollbackFailed,
            "ROLLBACK_COMPLETE" => ResourceStatus::RollbackComplete,
            "UPDATE_ROLLBACK_IN_PROGRESS" => ResourceStatus::UpdateRollbackInProgress,
            "UPDATE_ROLLBACK_FAILED" => ResourceStatus::UpdateRollbackFailed,
            "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS" => {
                ResourceStatus::UpdateRollbackCompleteCleanupInProgress
            }
            "UPDATE_ROLLBACK_COMPLETE" => ResourceStatus::UpdateRollbackComplete,
            "IMPORT_IN_PROGRESS" => ResourceStatus::ImportInProgress,
            "IMPORT_COMPLETE" => ResourceStatus::ImportComplete,
            "IMPORT_ROLLBACK_IN_PROGRESS" => ResourceStatus::ImportRollbackInProgress,
            "IMPORT_ROLLBACK_FAILED" => ResourceStatus::ImportRollbackFailed,
            "IMPORT_ROLLBACK_COMPLETE" => ResourceStatus::ImportRollbackComplete,
            "REVIEW_IN_PROGRESS" => ResourceStatus::ReviewInProgress,
            other => ResourceStatus::Other(other.to_string()),
        };
        Ok(status)
    }
}

impl From<String> for ResourceStatus {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for ResourceStatus {
    fn from(s: &str) -> Self {
        ResourceStatus::from(s.to_string())
    }
}

impl std::fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Termination policies for stack lifecycle polling
//!
//! A policy looks at the newest event of a poll cycle and decides whether
//! the watched operation has finished. Only events about the stack itself
//! are considered; nested resource events are narrated but never end a watch.

use crate::model::{ResourceStatus, StackEvent};

/// Result of evaluating a policy against one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationOutcome {
    Continue,
    Done,
    DoneWithError(String),
}

/// Decides whether a watched stack operation has reached a terminal state
pub trait TerminationPolicy: Send + Sync {
    fn evaluate(&self, stack_name: &str, event: &StackEvent) -> TerminationOutcome;
}

impl<F> TerminationPolicy for F
where
    F: Fn(&str, &StackEvent) -> TerminationOutcome + Send + Sync,
{
    fn evaluate(&self, stack_name: &str, event: &StackEvent) -> TerminationOutcome {
        self(stack_name, event)
    }
}

/// Terminal on the end of a create or update, including rollbacks
#[derive(Debug, Clone, Copy, Default)]
pub struct UntilCreatedOrUpdated;

impl TerminationPolicy for UntilCreatedOrUpdated {
    fn evaluate(&self, stack_name: &str, event: &StackEvent) -> TerminationOutcome {
        if !event.is_for_stack(stack_name) {
            return TerminationOutcome::Continue;
        }

        match event.status {
            ResourceStatus::CreateComplete | ResourceStatus::UpdateComplete => {
                TerminationOutcome::Done
            }
            ResourceStatus::CreateFailed
            | ResourceStatus::UpdateFailed
            | ResourceStatus::RollbackComplete
            | ResourceStatus::RollbackFailed
            | ResourceStatus::UpdateRollbackComplete
            | ResourceStatus::UpdateRollbackFailed => failed(event),
            _ => TerminationOutcome::Continue,
        }
    }
}

/// Terminal on the end of a delete
#[derive(Debug, Clone, Copy, Default)]
pub struct UntilDeleted;

impl TerminationPolicy for UntilDeleted {
    fn evaluate(&self, stack_name: &str, event: &StackEvent) -> TerminationOutcome {
        if !event.is_for_stack(stack_name) {
            return TerminationOutcome::Continue;
        }

        match event.status {
            ResourceStatus::DeleteComplete => TerminationOutcome::Done,
            ResourceStatus::DeleteFailed => failed(event),
            _ => TerminationOutcome::Continue,
        }
    }
}

// A bare failure or rollback status still ends the watch with an error.
fn failed(event: &StackEvent) -> TerminationOutcome {
    let reason = match event.status_reason.as_deref() {
        Some(reason) if !reason.trim().is_empty() => reason.to_string(),
        _ => format!("stack reached {}", event.status),
    };
    TerminationOutcome::DoneWithError(reason)
}

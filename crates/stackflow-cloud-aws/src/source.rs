//! `StackSource` and `LogSource` over the AWS SDK clients

use crate::error::from_sdk;
use crate::services::AwsServices;
use async_trait::async_trait;
use aws_sdk_cloudformation::primitives::DateTime as AwsDateTime;
use chrono::{DateTime, TimeZone, Utc};
use stackflow_cloud::{
    CloudError, LogQuery, LogRecord, LogSource, Outputs, Page, ResourceStatus, Result,
    StackEvent, StackSource,
};

/// Convert an SDK timestamp
pub(crate) fn to_utc(time: &AwsDateTime) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(time.secs(), time.subsec_nanos()).single()
}

fn convert_event(event: &aws_sdk_cloudformation::types::StackEvent) -> Option<StackEvent> {
    let Some(timestamp) = event.timestamp().and_then(to_utc) else {
        tracing::debug!("Skipping stack event without timestamp: {:?}", event.event_id());
        return None;
    };

    Some(StackEvent {
        logical_resource_id: event.logical_resource_id().unwrap_or_default().to_string(),
        resource_type: event.resource_type().unwrap_or_default().to_string(),
        status: event
            .resource_status()
            .map(|s| ResourceStatus::from(s.as_str()))
            .unwrap_or_else(|| ResourceStatus::Other(String::new())),
        status_reason: event.resource_status_reason().map(str::to_string),
        timestamp,
    })
}

#[async_trait]
impl StackSource for AwsServices {
    async fn stack_events_page(
        &self,
        stack_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<StackEvent>> {
        let output = self
            .cloudformation
            .describe_stack_events()
            .stack_name(stack_name)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(from_sdk)?;

        Ok(Page {
            items: output.stack_events().iter().filter_map(convert_event).collect(),
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn stack_status(&self, stack_name: &str) -> Result<ResourceStatus> {
        let stack = self.describe_single_stack(stack_name).await?;
        stack
            .stack_status()
            .map(|s| ResourceStatus::from(s.as_str()))
            .ok_or_else(|| CloudError::ApiError(format!("Stack {} has no status", stack_name)))
    }

    async fn stack_outputs(&self, stack_name: &str) -> Result<Outputs> {
        let stack = self.describe_single_stack(stack_name).await?;
        Ok(stack
            .outputs()
            .iter()
            .filter_map(|o| Some((o.output_key()?.to_string(), o.output_value()?.to_string())))
            .collect())
    }
}

#[async_trait]
impl LogSource for AwsServices {
    async fn log_streams_page(
        &self,
        group: &str,
        prefix: &str,
        next_token: Option<String>,
    ) -> Result<Page<String>> {
        // the API rejects an empty prefix
        let prefix = (!prefix.is_empty()).then(|| prefix.to_string());

        let output = self
            .logs
            .describe_log_streams()
            .log_group_name(group)
            .set_log_stream_name_prefix(prefix)
            .descending(true)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(from_sdk)?;

        Ok(Page {
            items: output
                .log_streams()
                .iter()
                .filter_map(|s| s.log_stream_name().map(str::to_string))
                .collect(),
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn log_records_page(
        &self,
        query: &LogQuery,
        next_token: Option<String>,
    ) -> Result<Page<LogRecord>> {
        let output = self
            .logs
            .filter_log_events()
            .log_group_name(&query.group)
            .set_log_stream_names(Some(query.stream_names.clone()))
            .start_time(query.start_time)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(from_sdk)?;

        Ok(Page {
            items: output
                .events()
                .iter()
                .filter_map(|e| {
                    Some(LogRecord {
                        stream_name: e.log_stream_name()?.to_string(),
                        timestamp: e.timestamp()?,
                        message: e.message().unwrap_or_default().to_string(),
                    })
                })
                .collect(),
            next_token: output.next_token().map(str::to_string),
        })
    }
}

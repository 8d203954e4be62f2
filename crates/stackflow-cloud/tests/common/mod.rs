// 各テストバイナリは一部のヘルパーだけを使う
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use stackflow_cloud::{
    CloudError, LogQuery, LogRecord, LogSource, Outputs, Page, ResourceStatus, Result,
    StackEvent, StackSource, USER_INITIATED,
};
use std::sync::Mutex;

pub const STACK: &str = "demo";

/// Fixed base time plus `secs`
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

pub fn stack_event(status: ResourceStatus, reason: Option<&str>, secs: i64) -> StackEvent {
    resource_event(STACK, "AWS::CloudFormation::Stack", status, reason, secs)
}

pub fn resource_event(
    id: &str,
    resource_type: &str,
    status: ResourceStatus,
    reason: Option<&str>,
    secs: i64,
) -> StackEvent {
    StackEvent {
        logical_resource_id: id.to_string(),
        resource_type: resource_type.to_string(),
        status,
        status_reason: reason.map(str::to_string),
        timestamp: at(secs),
    }
}

pub fn user_initiated(status: ResourceStatus, secs: i64) -> StackEvent {
    stack_event(status, Some(USER_INITIATED), secs)
}

/// In-memory stack event source
///
/// Events are given oldest first and served newest first. Each new page
/// walk reveals `reveal_per_walk` more events, which simulates events
/// appearing between poll cycles.
pub struct StubStackSource {
    events: Vec<StackEvent>,
    visible: Mutex<usize>,
    reveal_per_walk: usize,
    page_size: usize,
    status: ResourceStatus,
    outputs: Outputs,
    missing: bool,
    throttles: Mutex<usize>,
    page_requests: Mutex<usize>,
}

impl StubStackSource {
    pub fn new(events: Vec<StackEvent>) -> Self {
        let reveal_per_walk = events.len();
        Self {
            events,
            visible: Mutex::new(0),
            reveal_per_walk,
            page_size: 100,
            status: ResourceStatus::CreateComplete,
            outputs: Outputs::new(),
            missing: false,
            throttles: Mutex::new(0),
            page_requests: Mutex::new(0),
        }
    }

    /// A stack that does not exist
    pub fn missing() -> Self {
        Self {
            missing: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn reveal_per_walk(mut self, n: usize) -> Self {
        self.reveal_per_walk = n;
        self
    }

    pub fn page_size(mut self, n: usize) -> Self {
        self.page_size = n;
        self
    }

    pub fn status(mut self, status: ResourceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn output(mut self, key: &str, value: &str) -> Self {
        self.outputs.insert(key.to_string(), value.to_string());
        self
    }

    pub fn throttle(self, n: usize) -> Self {
        *self.throttles.lock().unwrap() = n;
        self
    }

    pub fn page_requests(&self) -> usize {
        *self.page_requests.lock().unwrap()
    }
}

#[async_trait]
impl StackSource for StubStackSource {
    async fn stack_events_page(
        &self,
        stack_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<StackEvent>> {
        *self.page_requests.lock().unwrap() += 1;

        if self.missing {
            return Err(CloudError::ResourceNotFound(format!(
                "Stack with id {} does not exist",
                stack_name
            )));
        }

        {
            let mut throttles = self.throttles.lock().unwrap();
            if *throttles > 0 {
                *throttles -= 1;
                return Err(CloudError::Throttled("Rate exceeded".to_string()));
            }
        }

        let offset: usize = next_token.as_deref().map_or(0, |t| t.parse().unwrap());
        let visible = {
            let mut visible = self.visible.lock().unwrap();
            if next_token.is_none() {
                *visible = (*visible + self.reveal_per_walk).min(self.events.len());
            }
            *visible
        };

        let items: Vec<StackEvent> = self.events[..visible]
            .iter()
            .rev()
            .skip(offset)
            .take(self.page_size)
            .cloned()
            .collect();

        let end = offset + self.page_size;
        if end < visible {
            Ok(Page::with_next(items, end.to_string()))
        } else {
            Ok(Page::last(items))
        }
    }

    async fn stack_status(&self, stack_name: &str) -> Result<ResourceStatus> {
        if self.missing {
            return Err(CloudError::ResourceNotFound(stack_name.to_string()));
        }
        Ok(self.status.clone())
    }

    async fn stack_outputs(&self, stack_name: &str) -> Result<Outputs> {
        if self.missing {
            return Err(CloudError::ResourceNotFound(stack_name.to_string()));
        }
        Ok(self.outputs.clone())
    }
}

pub fn record(stream: &str, timestamp: i64, message: &str) -> LogRecord {
    LogRecord {
        stream_name: stream.to_string(),
        timestamp,
        message: message.to_string(),
    }
}

/// In-memory log source
pub struct StubLogSource {
    streams: Vec<String>,
    hidden_listings: Mutex<usize>,
    never_visible: bool,
    records: Mutex<Vec<LogRecord>>,
    page_size: usize,
    stream_throttles: Mutex<usize>,
    record_throttles: Mutex<usize>,
    throttled_page: Mutex<Option<String>>,
    ignores_start_time: bool,
    listings: Mutex<usize>,
    queries: Mutex<Vec<LogQuery>>,
}

impl StubLogSource {
    pub fn new(streams: &[&str], records: Vec<LogRecord>) -> Self {
        Self {
            streams: streams.iter().map(|s| s.to_string()).collect(),
            hidden_listings: Mutex::new(0),
            never_visible: false,
            records: Mutex::new(records),
            page_size: 100,
            stream_throttles: Mutex::new(0),
            record_throttles: Mutex::new(0),
            throttled_page: Mutex::new(None),
            ignores_start_time: false,
            listings: Mutex::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Streams never show up in listings
    pub fn without_streams() -> Self {
        Self {
            never_visible: true,
            ..Self::new(&[], Vec::new())
        }
    }

    /// The first `n` listings come back empty
    pub fn hidden_for(self, n: usize) -> Self {
        *self.hidden_listings.lock().unwrap() = n;
        self
    }

    pub fn page_size(mut self, n: usize) -> Self {
        self.page_size = n;
        self
    }

    pub fn throttle_streams(self, n: usize) -> Self {
        *self.stream_throttles.lock().unwrap() = n;
        self
    }

    pub fn throttle_records(self, n: usize) -> Self {
        *self.record_throttles.lock().unwrap() = n;
        self
    }

    /// The request for the page at `token` is throttled once
    pub fn throttle_page_once(self, token: &str) -> Self {
        *self.throttled_page.lock().unwrap() = Some(token.to_string());
        self
    }

    /// Serve every record regardless of the query's start bound
    pub fn ignoring_start_time(mut self) -> Self {
        self.ignores_start_time = true;
        self
    }

    pub fn push_record(&self, record: LogRecord) {
        self.records.lock().unwrap().push(record);
    }

    pub fn listings(&self) -> usize {
        *self.listings.lock().unwrap()
    }

    pub fn queries(&self) -> Vec<LogQuery> {
        self.queries.lock().unwrap().clone()
    }
}

fn take_throttle(counter: &Mutex<usize>) -> Result<()> {
    let mut remaining = counter.lock().unwrap();
    if *remaining > 0 {
        *remaining -= 1;
        return Err(CloudError::Throttled("Rate exceeded".to_string()));
    }
    Ok(())
}

#[async_trait]
impl LogSource for StubLogSource {
    async fn log_streams_page(
        &self,
        _group: &str,
        prefix: &str,
        _next_token: Option<String>,
    ) -> Result<Page<String>> {
        *self.listings.lock().unwrap() += 1;
        take_throttle(&self.stream_throttles)?;

        if self.never_visible {
            return Ok(Page::last(Vec::new()));
        }
        {
            let mut hidden = self.hidden_listings.lock().unwrap();
            if *hidden > 0 {
                *hidden -= 1;
                return Ok(Page::last(Vec::new()));
            }
        }

        Ok(Page::last(
            self.streams
                .iter()
                .filter(|s| s.starts_with(prefix))
                .cloned()
                .collect(),
        ))
    }

    async fn log_records_page(
        &self,
        query: &LogQuery,
        next_token: Option<String>,
    ) -> Result<Page<LogRecord>> {
        take_throttle(&self.record_throttles)?;
        {
            let mut throttled = self.throttled_page.lock().unwrap();
            if next_token.is_some() && *throttled == next_token {
                *throttled = None;
                return Err(CloudError::Throttled("Rate exceeded".to_string()));
            }
        }
        if next_token.is_none() {
            self.queries.lock().unwrap().push(query.clone());
        }

        let matching: Vec<LogRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| self.ignores_start_time || r.timestamp >= query.start_time)
            .filter(|r| query.stream_names.contains(&r.stream_name))
            .cloned()
            .collect();

        let offset: usize = next_token.as_deref().map_or(0, |t| t.parse().unwrap());
        let items: Vec<LogRecord> = matching
            .iter()
            .skip(offset)
            .take(self.page_size)
            .cloned()
            .collect();

        let end = offset + self.page_size;
        if end < matching.len() {
            Ok(Page::with_next(items, end.to_string()))
        } else {
            Ok(Page::last(items))
        }
    }
}

mod common;

use common::*;
use stackflow_cloud::{
    CloudError, PollConfig, ResourceStatus, StackEvent, StackSource, StackWatcher,
    latest_event_time,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn watcher(stub: StubStackSource) -> StackWatcher {
    let source: Arc<dyn StackSource> = Arc::new(stub);
    StackWatcher::new(source, PollConfig::default())
}

#[tokio::test(start_paused = true)]
async fn test_watch_create_returns_outputs() {
    let stub = StubStackSource::new(vec![
        user_initiated(ResourceStatus::CreateInProgress, 1),
        stack_event(ResourceStatus::CreateComplete, None, 2),
    ])
    .reveal_per_walk(1)
    .status(ResourceStatus::CreateComplete)
    .output("Endpoint", "https://example.com")
    .output("BucketName", "demo-bucket");
    let mut seen = Vec::new();

    let outputs = watcher(stub)
        .watch_until_terminal(
            STACK,
            &mut |e: &StackEvent| seen.push(e.status.clone()),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(
        seen,
        vec![ResourceStatus::CreateInProgress, ResourceStatus::CreateComplete]
    );
    assert_eq!(outputs.len(), 2);
    assert_eq!(
        outputs.get("Endpoint").map(String::as_str),
        Some("https://example.com")
    );
}

#[tokio::test(start_paused = true)]
async fn test_watch_failure_reports_event_reason() {
    let stub = StubStackSource::new(vec![
        user_initiated(ResourceStatus::CreateInProgress, 1),
        resource_event(
            "Bucket",
            "AWS::S3::Bucket",
            ResourceStatus::CreateFailed,
            Some("Resource X already exists"),
            2,
        ),
        stack_event(
            ResourceStatus::RollbackComplete,
            Some("Resource X already exists"),
            3,
        ),
    ])
    .status(ResourceStatus::RollbackComplete);

    let err = watcher(stub)
        .watch_until_terminal(STACK, &mut |_: &StackEvent| {}, &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        CloudError::StackFailed { stack, reason } => {
            assert_eq!(stack, STACK);
            assert_eq!(reason, "Resource X already exists");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

/// イベント上は完了でも、スタックのステータスが失敗なら失敗として扱う
#[tokio::test(start_paused = true)]
async fn test_watch_confirms_with_stack_status() {
    let stub = StubStackSource::new(vec![
        user_initiated(ResourceStatus::UpdateInProgress, 1),
        stack_event(ResourceStatus::UpdateComplete, None, 2),
    ])
    .status(ResourceStatus::UpdateRollbackComplete)
    .output("Unused", "value");

    let err = watcher(stub)
        .watch_until_terminal(STACK, &mut |_: &StackEvent| {}, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, CloudError::StackFailed { .. }));
    assert_eq!(err.to_string(), "Stack update failed, rollback succeeded");
}

#[tokio::test(start_paused = true)]
async fn test_delete_of_missing_stack_is_ok() {
    let mut seen = 0;

    let result = watcher(StubStackSource::missing())
        .until_deleted(STACK, &mut |_: &StackEvent| seen += 1, &CancellationToken::new())
        .await;

    assert!(result.is_ok());
    assert_eq!(seen, 0);
}

#[tokio::test(start_paused = true)]
async fn test_delete_complete() {
    let stub = StubStackSource::new(vec![
        user_initiated(ResourceStatus::DeleteInProgress, 1),
        resource_event(
            "Bucket",
            "AWS::S3::Bucket",
            ResourceStatus::DeleteComplete,
            None,
            2,
        ),
        stack_event(ResourceStatus::DeleteComplete, None, 3),
    ])
    .reveal_per_walk(2);
    let mut seen = Vec::new();

    watcher(stub)
        .until_deleted(
            STACK,
            &mut |e: &StackEvent| seen.push(e.logical_resource_id.clone()),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(seen, vec![STACK, "Bucket", STACK]);
}

#[tokio::test(start_paused = true)]
async fn test_delete_failed() {
    let stub = StubStackSource::new(vec![
        user_initiated(ResourceStatus::DeleteInProgress, 1),
        stack_event(
            ResourceStatus::DeleteFailed,
            Some("The bucket you tried to delete is not empty"),
            2,
        ),
    ]);

    let err = watcher(stub)
        .until_deleted(STACK, &mut |_: &StackEvent| {}, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("not empty"));
}

#[tokio::test(start_paused = true)]
async fn test_watch_cancelled() {
    let stub = StubStackSource::new(vec![user_initiated(ResourceStatus::CreateInProgress, 1)]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = watcher(stub)
        .watch_until_terminal(STACK, &mut |_: &StackEvent| {}, &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, CloudError::Cancelled));
}

/// 更新前の最新イベント以降だけを追跡し、前回の操作の完了では終わらない
#[tokio::test(start_paused = true)]
async fn test_watch_starts_after_latest_recorded_event() {
    let stub = Arc::new(
        StubStackSource::new(vec![
            user_initiated(ResourceStatus::UpdateInProgress, 1),
            stack_event(ResourceStatus::UpdateComplete, None, 2),
            user_initiated(ResourceStatus::UpdateInProgress, 10),
            resource_event(
                "Bucket",
                "AWS::S3::Bucket",
                ResourceStatus::UpdateComplete,
                None,
                11,
            ),
            stack_event(ResourceStatus::UpdateComplete, None, 12),
        ])
        .status(ResourceStatus::UpdateComplete)
        .reveal_per_walk(2),
    );

    // 新しい操作のイベントはまだ見えていない
    let since = latest_event_time(&*stub, STACK).await.unwrap();
    assert_eq!(since, Some(at(2)));

    let source: Arc<dyn StackSource> = stub.clone();
    let config = PollConfig {
        since,
        ..PollConfig::default()
    };
    let mut seen = Vec::new();
    StackWatcher::new(source, config)
        .watch_until_terminal(
            STACK,
            &mut |e: &StackEvent| seen.push(e.timestamp),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(seen, vec![at(10), at(11), at(12)]);
}

#[tokio::test]
async fn test_latest_event_time_of_missing_stack() {
    let stub = StubStackSource::missing();
    assert_eq!(latest_event_time(&stub, STACK).await.unwrap(), None);
}

use chrono::{DateTime, Utc};
use stackflow_cloud::{DiscoveryConfig, PollConfig, StackSource, StackWatcher, TailConfig, TailStart};
use stackflow_cloud_aws::{AwsServices, AwsSettings};
use stackflow_config::Settings;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// コマンド実行に共通する設定とキャンセルトークン
pub struct Context {
    pub settings: Settings,
    pub cancel: CancellationToken,
}

impl Context {
    pub fn new(settings: Settings, cancel: CancellationToken) -> Self {
        Self { settings, cancel }
    }

    /// AWSクライアントを作成
    pub async fn connect(&self) -> Arc<AwsServices> {
        let aws = AwsSettings {
            region: self.settings.region.clone(),
            profile: self.settings.profile.clone(),
            max_attempts: self.settings.max_attempts,
        };
        Arc::new(AwsServices::connect(&aws).await)
    }

    /// スタックイベントの追跡。`since` 以前のイベントは表示しない
    pub fn watcher(
        &self,
        services: &Arc<AwsServices>,
        since: Option<DateTime<Utc>>,
    ) -> StackWatcher {
        let config = PollConfig {
            interval: self.settings.poll_interval(),
            throttle_backoff: self.settings.throttle_backoff(),
            since,
        };

        let source: Arc<dyn StackSource> = services.clone();
        StackWatcher::new(source, config)
    }

    pub fn discovery_config(&self, timeout_secs: Option<u64>) -> DiscoveryConfig {
        DiscoveryConfig {
            interval: self.settings.discovery_interval(),
            throttle_backoff: self.settings.throttle_backoff(),
            timeout: timeout_secs
                .map(Duration::from_secs)
                .unwrap_or_else(|| self.settings.discovery_timeout()),
        }
    }

    pub fn tail_config(&self, new_only: bool) -> TailConfig {
        TailConfig {
            interval: self.settings.log_poll_interval(),
            throttle_backoff: self.settings.throttle_backoff(),
            start: if new_only {
                TailStart::Now
            } else {
                TailStart::Beginning
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> Context {
        let settings = Settings {
            discovery_timeout_secs: 9,
            log_poll_interval_secs: 3,
            ..Settings::default()
        };
        Context::new(settings, CancellationToken::new())
    }

    #[test]
    fn test_discovery_timeout_override() {
        let ctx = context();
        assert_eq!(ctx.discovery_config(None).timeout, Duration::from_secs(9));
        assert_eq!(ctx.discovery_config(Some(1)).timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_tail_config() {
        let ctx = context();
        let config = ctx.tail_config(true);
        assert_eq!(config.start, TailStart::Now);
        assert_eq!(config.interval, Duration::from_secs(3));
        assert_eq!(ctx.tail_config(false).start, TailStart::Beginning);
    }
}

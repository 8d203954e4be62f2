//! Shared AWS client handle

use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};

/// Retry budget of the SDK clients. The watch loops call the APIs once per
/// second for the whole duration of an operation, so this is well above the
/// SDK default.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 25;

/// Connection settings
#[derive(Debug, Clone)]
pub struct AwsSettings {
    /// Region override. `None` uses the provider chain.
    pub region: Option<String>,

    /// Named profile from the shared config files
    pub profile: Option<String>,

    pub max_attempts: u32,
}

impl Default for AwsSettings {
    fn default() -> Self {
        Self {
            region: None,
            profile: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// CloudFormation and CloudWatch Logs clients built from one SDK config
#[derive(Debug, Clone)]
pub struct AwsServices {
    pub(crate) cloudformation: aws_sdk_cloudformation::Client,
    pub(crate) logs: aws_sdk_cloudwatchlogs::Client,
}

impl AwsServices {
    /// Resolve credentials and region, then build the clients
    pub async fn connect(settings: &AwsSettings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .retry_config(RetryConfig::standard().with_max_attempts(settings.max_attempts));

        if let Some(region) = &settings.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(profile) = &settings.profile {
            loader = loader.profile_name(profile);
        }

        let config = loader.load().await;
        tracing::debug!(
            "AWS config loaded (region: {:?}, max attempts: {})",
            config.region(),
            settings.max_attempts
        );

        Self {
            cloudformation: aws_sdk_cloudformation::Client::new(&config),
            logs: aws_sdk_cloudwatchlogs::Client::new(&config),
        }
    }
}

//! Classification of AWS SDK errors
//!
//! Both SDKs report failures as a service error code plus a human-readable
//! message. The watch loops only care about a handful of outcomes, so the
//! code/message pair is folded into a `CloudError` here.

use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata};
use stackflow_cloud::CloudError;

const THROTTLING_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "TooManyRequestsException",
    "RequestLimitExceeded",
    "LimitExceededException",
];

const NO_UPDATES_MESSAGE: &str = "No updates are to be performed.";

/// Map an error code and message to a `CloudError`.
///
/// `context` is the full error chain, used when nothing more specific
/// applies.
pub fn classify_error(code: Option<&str>, message: Option<&str>, context: String) -> CloudError {
    let message = message.unwrap_or_default();

    match code {
        Some(code) if THROTTLING_CODES.contains(&code) => {
            CloudError::Throttled(format!("{}: {}", code, message))
        }
        Some("ResourceNotFoundException") => CloudError::ResourceNotFound(message.to_string()),
        Some("ValidationError") if message.contains("does not exist") => {
            CloudError::ResourceNotFound(message.to_string())
        }
        Some("ValidationError") if message == NO_UPDATES_MESSAGE => CloudError::NoUpdates,
        _ => CloudError::ApiError(context),
    }
}

/// Convert an SDK operation error
pub(crate) fn from_sdk<E>(err: E) -> CloudError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let context = DisplayErrorContext(&err).to_string();
    let classified = classify_error(err.code(), err.message(), context);
    tracing::debug!("AWS error classified as {:?}", classified);
    classified
}

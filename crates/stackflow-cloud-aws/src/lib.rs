//! AWS backend for stackflow
//!
//! This crate implements the `StackSource` and `LogSource` capabilities of
//! `stackflow-cloud` on top of CloudFormation and CloudWatch Logs, and adds
//! the stack operations the CLI starts before it begins watching.
//!
//! # Requirements
//!
//! - AWS credentials resolvable by the default provider chain
//!   (environment, shared config/credentials files, SSO, IMDS)
//! - A region, either from the settings or from the environment
//!
//! # Example
//!
//! ```ignore
//! use stackflow_cloud::{PollConfig, StackSource, StackWatcher};
//! use stackflow_cloud_aws::{AwsServices, AwsSettings};
//! use std::sync::Arc;
//!
//! let services = Arc::new(AwsServices::connect(&AwsSettings::default()).await);
//! services.delete_stack("my-stack").await?;
//!
//! let source: Arc<dyn StackSource> = services.clone();
//! StackWatcher::new(source, PollConfig::default())
//!     .until_deleted("my-stack", &mut |_: &_| {}, &cancel)
//!     .await?;
//! ```

pub mod error;
pub mod services;
pub mod source;
pub mod stacks;

pub use error::classify_error;
pub use services::{AwsServices, AwsSettings, DEFAULT_MAX_ATTEMPTS};

//! Stack parameter planning for create and update requests

use crate::error::{CloudError, Result};
use std::collections::BTreeMap;

/// Parameter sent with a create or update request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackParameter {
    /// Explicit value
    Value { key: String, value: String },
    /// Keep whatever value the stack currently has
    UsePrevious { key: String },
}

/// Input for a stack creation
#[derive(Debug, Clone, Default)]
pub struct CreateStackRequest {
    pub params: BTreeMap<String, String>,
    pub template_body: String,
    pub disable_rollback: bool,
}

impl CreateStackRequest {
    pub fn parameters(&self) -> Vec<StackParameter> {
        self.params
            .iter()
            .map(|(key, value)| StackParameter::Value {
                key: key.clone(),
                value: value.clone(),
            })
            .collect()
    }
}

/// Input for a stack update
#[derive(Debug, Clone, Default)]
pub struct UpdateStackRequest {
    pub params: BTreeMap<String, String>,

    /// New template. `None` reuses the stack's current template.
    pub template_body: Option<String>,
}

/// Parse `Key=Value` arguments
pub fn parse_stack_params<S: AsRef<str>>(raw: &[S]) -> Result<BTreeMap<String, String>> {
    let mut params = BTreeMap::new();
    for arg in raw {
        let arg = arg.as_ref();
        let parts: Vec<&str> = arg.split('=').collect();
        if parts.len() != 2 || parts[0].is_empty() {
            return Err(CloudError::InvalidInput(format!(
                "Failed to parse parameter {:?}",
                arg
            )));
        }
        params.insert(parts[0].to_string(), parts[1].to_string());
    }
    Ok(params)
}

/// Current stack parameters that differ from the template defaults
pub fn strip_default_parameters(
    defaults: &BTreeMap<String, String>,
    current: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    current
        .iter()
        .filter(|(key, value)| defaults.get(*key) != Some(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Parameters for an update request.
///
/// Explicit values win. Template parameters without an explicit value keep
/// their previous value when the stack had one; parameters the stack never
/// had are left to the template default.
pub fn plan_update_parameters(
    explicit: &BTreeMap<String, String>,
    template_keys: &[String],
    previous: &BTreeMap<String, String>,
) -> Vec<StackParameter> {
    let mut params: Vec<StackParameter> = explicit
        .iter()
        .map(|(key, value)| StackParameter::Value {
            key: key.clone(),
            value: value.clone(),
        })
        .collect();

    for key in template_keys {
        if explicit.contains_key(key) {
            continue;
        }
        if let Some(value) = previous.get(key) {
            tracing::info!("Using previous value {:?} for {}", value, key);
            params.push(StackParameter::UsePrevious { key: key.clone() });
        }
    }

    params
}

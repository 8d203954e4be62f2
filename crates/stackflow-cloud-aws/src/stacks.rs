//! Stack operations
//!
//! These only start an operation. Following it to a terminal state is the
//! job of `StackWatcher` in `stackflow-cloud`.

use crate::error::from_sdk;
use crate::services::AwsServices;
use crate::source::to_utc;
use aws_sdk_cloudformation::types::{Capability, Parameter, Stack};
use stackflow_cloud::{
    CloudError, CreateStackRequest, Page, ResourceStatus, Result, StackParameter, StackSummary,
    UpdateStackRequest, collect_all, plan_update_parameters, strip_default_parameters,
};
use std::collections::BTreeMap;

fn require_name(stack_name: &str) -> Result<()> {
    if stack_name.trim().is_empty() {
        return Err(CloudError::InvalidInput(
            "stack name must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn to_sdk_parameter(param: &StackParameter) -> Parameter {
    match param {
        StackParameter::Value { key, value } => Parameter::builder()
            .parameter_key(key)
            .parameter_value(value)
            .build(),
        StackParameter::UsePrevious { key } => Parameter::builder()
            .parameter_key(key)
            .use_previous_value(true)
            .build(),
    }
}

fn convert_summary(summary: &aws_sdk_cloudformation::types::StackSummary) -> Option<StackSummary> {
    let last_updated = summary
        .last_updated_time()
        .or(summary.creation_time())
        .and_then(to_utc)?;

    Some(StackSummary {
        name: summary.stack_name()?.to_string(),
        status: ResourceStatus::from(summary.stack_status()?.as_str()),
        last_updated,
    })
}

impl AwsServices {
    /// Start a stack creation
    pub async fn create_stack(&self, stack_name: &str, request: &CreateStackRequest) -> Result<()> {
        require_name(stack_name)?;
        tracing::debug!(
            "Creating stack {} with {} parameters",
            stack_name,
            request.params.len()
        );

        let parameters = request.parameters().iter().map(to_sdk_parameter).collect();
        self.cloudformation
            .create_stack()
            .stack_name(stack_name)
            .template_body(&request.template_body)
            .set_parameters(Some(parameters))
            .capabilities(Capability::CapabilityIam)
            .capabilities(Capability::CapabilityNamedIam)
            .disable_rollback(request.disable_rollback)
            .send()
            .await
            .map_err(from_sdk)?;

        Ok(())
    }

    /// Start a stack update.
    ///
    /// Without a template body the stack's current template is reused. Any
    /// template parameter not given explicitly keeps its previous value.
    /// Fails with `NoUpdates` when nothing would change.
    pub async fn update_stack(&self, stack_name: &str, request: &UpdateStackRequest) -> Result<()> {
        require_name(stack_name)?;

        let template_body = match &request.template_body {
            Some(body) => body.clone(),
            None => {
                tracing::info!("Reading previous template of {}", stack_name);
                self.previous_template(stack_name).await?
            }
        };

        let template_keys = self.template_parameter_keys(&template_body).await?;
        let previous = self.stack_parameters(stack_name).await?;
        let parameters = plan_update_parameters(&request.params, &template_keys, &previous)
            .iter()
            .map(to_sdk_parameter)
            .collect();

        tracing::debug!("Updating stack {}", stack_name);
        self.cloudformation
            .update_stack()
            .stack_name(stack_name)
            .template_body(template_body)
            .set_parameters(Some(parameters))
            .capabilities(Capability::CapabilityIam)
            .capabilities(Capability::CapabilityNamedIam)
            .send()
            .await
            .map_err(from_sdk)?;

        Ok(())
    }

    /// Start a stack deletion
    pub async fn delete_stack(&self, stack_name: &str) -> Result<()> {
        require_name(stack_name)?;
        tracing::debug!("Deleting stack {}", stack_name);

        self.cloudformation
            .delete_stack()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(from_sdk)?;

        Ok(())
    }

    /// All stacks of the account and region. Deleted stacks are only
    /// included when asked for.
    pub async fn list_stacks(&self, include_deleted: bool) -> Result<Vec<StackSummary>> {
        let summaries = collect_all(|token| async move {
            let output = self
                .cloudformation
                .list_stacks()
                .set_next_token(token)
                .send()
                .await
                .map_err(from_sdk)?;

            Ok::<_, CloudError>(Page {
                items: output
                    .stack_summaries()
                    .iter()
                    .filter_map(convert_summary)
                    .collect(),
                next_token: output.next_token().map(str::to_string),
            })
        })
        .await?;

        Ok(summaries
            .into_iter()
            .filter(|s| include_deleted || s.status != ResourceStatus::DeleteComplete)
            .collect())
    }

    /// Current parameters of a stack, minus those still at their template
    /// default
    pub async fn stack_parameters(&self, stack_name: &str) -> Result<BTreeMap<String, String>> {
        require_name(stack_name)?;

        let summary = self
            .cloudformation
            .get_template_summary()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(from_sdk)?;

        let defaults: BTreeMap<String, String> = summary
            .parameters()
            .iter()
            .filter_map(|p| Some((p.parameter_key()?.to_string(), p.default_value()?.to_string())))
            .collect();

        let stack = self.describe_single_stack(stack_name).await?;
        let current: BTreeMap<String, String> = stack
            .parameters()
            .iter()
            .filter_map(|p| {
                Some((
                    p.parameter_key()?.to_string(),
                    p.parameter_value()?.to_string(),
                ))
            })
            .collect();

        Ok(strip_default_parameters(&defaults, &current))
    }

    /// Describe exactly one stack
    pub async fn describe_single_stack(&self, stack_name: &str) -> Result<Stack> {
        require_name(stack_name)?;

        let output = self
            .cloudformation
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(from_sdk)?;

        match output.stacks() {
            [stack] => Ok(stack.clone()),
            stacks => Err(CloudError::ApiError(format!(
                "Expected 1 stack, got {}",
                stacks.len()
            ))),
        }
    }

    async fn previous_template(&self, stack_name: &str) -> Result<String> {
        let output = self
            .cloudformation
            .get_template()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(from_sdk)?;

        output
            .template_body()
            .map(str::to_string)
            .ok_or_else(|| CloudError::ApiError(format!("Stack {} has no template", stack_name)))
    }

    async fn template_parameter_keys(&self, template_body: &str) -> Result<Vec<String>> {
        let output = self
            .cloudformation
            .validate_template()
            .template_body(template_body)
            .send()
            .await
            .map_err(from_sdk)?;

        Ok(output
            .parameters()
            .iter()
            .filter_map(|p| p.parameter_key().map(str::to_string))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_name() {
        assert!(require_name("demo").is_ok());
        assert!(matches!(
            require_name(" "),
            Err(CloudError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_to_sdk_parameter() {
        let value = to_sdk_parameter(&StackParameter::Value {
            key: "Env".to_string(),
            value: "prod".to_string(),
        });
        assert_eq!(value.parameter_key(), Some("Env"));
        assert_eq!(value.parameter_value(), Some("prod"));
        assert_eq!(value.use_previous_value(), None);

        let previous = to_sdk_parameter(&StackParameter::UsePrevious {
            key: "Size".to_string(),
        });
        assert_eq!(previous.parameter_key(), Some("Size"));
        assert_eq!(previous.parameter_value(), None);
        assert_eq!(previous.use_previous_value(), Some(true));
    }
}

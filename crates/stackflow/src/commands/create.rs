use crate::TemplateArgs;
use crate::context::Context;
use colored::Colorize;
use stackflow_cloud::{CreateStackRequest, parse_stack_params};

pub async fn handle(
    ctx: &Context,
    name: &str,
    params: &[String],
    template: &TemplateArgs,
    disable_rollback: bool,
) -> anyhow::Result<()> {
    super::require_stack_name(name)?;
    let params = parse_stack_params(params)?;
    let source = template
        .source()?
        .ok_or_else(|| anyhow::anyhow!("--file または --url でテンプレートを指定してください"))?;
    let template_body = source.read().await?;

    let services = ctx.connect().await;

    println!("{}", format!("スタック {} を作成中...", name).blue());
    services
        .create_stack(
            name,
            &CreateStackRequest {
                params,
                template_body,
                disable_rollback,
            },
        )
        .await?;

    let outputs = ctx
        .watcher(&services, None)
        .watch_until_terminal(name, &mut super::print_event, &ctx.cancel)
        .await?;

    super::print_outputs(&outputs);
    println!();
    println!("{}", format!("✓ スタック {} を作成しました", name).green());

    Ok(())
}

use crate::TemplateArgs;
use crate::context::Context;
use colored::Colorize;
use stackflow_cloud::{CloudError, UpdateStackRequest, latest_event_time, parse_stack_params};

pub async fn handle(
    ctx: &Context,
    name: &str,
    params: &[String],
    template: &TemplateArgs,
) -> anyhow::Result<()> {
    super::require_stack_name(name)?;
    let params = parse_stack_params(params)?;
    // テンプレート未指定なら現在のテンプレートを再利用
    let template_body = match template.source()? {
        Some(source) => Some(source.read().await?),
        None => None,
    };

    let services = ctx.connect().await;

    println!("{}", format!("スタック {} を更新中...", name).blue());
    // 更新前に記録済みのイベント（前回の操作）は表示しない
    let since = latest_event_time(&*services, name).await?;
    let request = UpdateStackRequest {
        params,
        template_body,
    };
    match services.update_stack(name, &request).await {
        Ok(()) => {}
        Err(CloudError::NoUpdates) => {
            println!("{}", "変更はありません（No updates are to be performed）".yellow());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    let outputs = ctx
        .watcher(&services, since)
        .watch_until_terminal(name, &mut super::print_event, &ctx.cancel)
        .await?;

    super::print_outputs(&outputs);
    println!();
    println!("{}", format!("✓ スタック {} を更新しました", name).green());

    Ok(())
}

use crate::context::Context;
use colored::Colorize;
use stackflow_cloud::latest_event_time;

pub async fn handle(ctx: &Context, name: &str) -> anyhow::Result<()> {
    super::require_stack_name(name)?;

    let services = ctx.connect().await;

    println!("{}", format!("スタック {} を削除中...", name).blue());
    let since = latest_event_time(&*services, name).await?;
    services.delete_stack(name).await?;

    // 既に存在しないスタックは削除済みとして扱われる
    ctx.watcher(&services, since)
        .until_deleted(name, &mut super::print_event, &ctx.cancel)
        .await?;

    println!();
    println!("{}", format!("✓ スタック {} を削除しました", name).green());

    Ok(())
}

use crate::context::Context;
use colored::Colorize;

pub async fn handle(ctx: &Context, name: &str) -> anyhow::Result<()> {
    super::require_stack_name(name)?;

    let services = ctx.connect().await;

    // 直近の操作の開始から表示する
    let outputs = ctx
        .watcher(&services, None)
        .watch_until_terminal(name, &mut super::print_event, &ctx.cancel)
        .await?;

    super::print_outputs(&outputs);
    println!();
    println!("{}", format!("✓ スタック {} の操作が完了しました", name).green());

    Ok(())
}

use crate::context::Context;
use crate::format;
use colored::Colorize;
use stackflow_cloud::StackSource;

pub async fn handle(ctx: &Context, name: &str) -> anyhow::Result<()> {
    super::require_stack_name(name)?;

    let services = ctx.connect().await;
    let outputs = services.stack_outputs(name).await?;

    if outputs.is_empty() {
        println!("{}", "出力はありません".dimmed());
    } else {
        print!("{}", format::format_outputs(&outputs));
    }

    Ok(())
}

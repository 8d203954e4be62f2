use crate::context::Context;
use crate::format;
use colored::Colorize;

pub async fn handle(ctx: &Context, all: bool) -> anyhow::Result<()> {
    let services = ctx.connect().await;
    let stacks = services.list_stacks(all).await?;

    if stacks.is_empty() {
        println!("{}", "スタックはありません".dimmed());
    } else {
        print!("{}", format::format_stack_list(&stacks));
    }

    Ok(())
}

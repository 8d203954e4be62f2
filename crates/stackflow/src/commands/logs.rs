use crate::context::Context;
use crate::format;
use anyhow::Context as _;
use colored::Colorize;
use stackflow_cloud::{CloudError, LogRecord, LogSource, follow_logs};
use std::sync::Arc;

pub async fn handle(
    ctx: &Context,
    group: &str,
    prefix: &str,
    new_only: bool,
    discovery_timeout: Option<u64>,
) -> anyhow::Result<()> {
    if group.trim().is_empty() {
        return Err(anyhow::anyhow!("ロググループを指定してください (-g/--group)"));
    }
    if discovery_timeout == Some(0) {
        return Err(anyhow::anyhow!(
            "--discovery-timeout は 1 以上である必要があります"
        ));
    }

    let services = ctx.connect().await;
    let source: Arc<dyn LogSource> = services;

    eprintln!("{}", "Ctrl+C でログ追跡を終了".dimmed());

    let mut print = |record: &LogRecord| {
        println!("{}", format::format_log_record(record, prefix));
    };

    let result = follow_logs(
        source,
        group,
        prefix,
        &ctx.discovery_config(discovery_timeout),
        ctx.tail_config(new_only),
        &mut print,
        &ctx.cancel,
    )
    .await;

    match result {
        // Ctrl+C は通常の終了
        Ok(()) | Err(CloudError::Cancelled) => Ok(()),
        Err(e @ CloudError::Timeout(_)) => {
            Err(e).with_context(|| format!("{} にログストリームが見つかりませんでした", group))
        }
        Err(e) => Err(e.into()),
    }
}

use chrono::Local;
use colored::Colorize;
use stackflow_cloud::{LogRecord, Outputs, ResourceStatus, StackEvent, StackSummary};

const STREAM_NAME_WIDTH: usize = 50;

/// ステータスを色付きで表示（失敗・ロールバックは赤、完了は緑、進行中は黄）
pub fn format_status(status: &ResourceStatus) -> String {
    paint(status, status.as_str())
}

fn paint(status: &ResourceStatus, text: &str) -> String {
    if status.is_failed() || status.is_rollback() {
        text.red().to_string()
    } else if status.is_complete() && !status.is_delete() {
        text.green().to_string()
    } else if status.is_in_progress() {
        text.yellow().to_string()
    } else {
        text.to_string()
    }
}

/// `STATUS -> LogicalId [Type] => "reason"`
pub fn format_event(event: &StackEvent) -> String {
    let mut line = format!(
        "{} -> {} [{}]",
        format_status(&event.status),
        event.logical_resource_id,
        event.resource_type
    );
    if let Some(reason) = &event.status_reason {
        line.push_str(&format!(" => {:?}", reason));
    }
    line
}

/// ストリーム名からプレフィックスを除き、長すぎる場合は省略する
pub fn short_stream_name(stream_name: &str, prefix: &str) -> String {
    let name = stream_name.strip_prefix(prefix).unwrap_or(stream_name);
    if name.chars().count() > STREAM_NAME_WIDTH {
        let head: String = name.chars().take(STREAM_NAME_WIDTH - 3).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

/// `Mon DD HH:MM:SS  stream  message`
pub fn format_log_record(record: &LogRecord, prefix: &str) -> String {
    let time = record
        .time()
        .map(|t| t.with_timezone(&Local).format("%b %e %H:%M:%S").to_string())
        .unwrap_or_default();

    format!(
        "{} {} {}",
        format!("{:<20}", time).dimmed(),
        format!("{:<52}", short_stream_name(&record.stream_name, prefix)).cyan(),
        record.message.trim_end()
    )
}

/// `KEY` / `VALUE` の表
pub fn format_outputs(outputs: &Outputs) -> String {
    let width = outputs
        .keys()
        .map(|k| k.len())
        .max()
        .unwrap_or(0)
        .max("KEY".len());

    let mut table = format!(
        "{}  {}\n",
        format!("{:<width$}", "KEY", width = width).bold(),
        "VALUE".bold()
    );
    for (key, value) in outputs {
        table.push_str(&format!("{:<width$}  {}\n", key, value, width = width));
    }
    table
}

/// `NAME` / `STATUS` / `LAST UPDATED` の表
pub fn format_stack_list(stacks: &[StackSummary]) -> String {
    let name_width = stacks
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(0)
        .max("NAME".len());
    let status_width = stacks
        .iter()
        .map(|s| s.status.as_str().len())
        .max()
        .unwrap_or(0)
        .max("STATUS".len());

    let header = format!(
        "{:<nw$}  {:<sw$}  {}",
        "NAME",
        "STATUS",
        "LAST UPDATED",
        nw = name_width,
        sw = status_width
    );
    let mut table = format!("{}\n", header.bold());
    for stack in stacks {
        // エスケープシーケンスで桁がずれないよう、幅を揃えてから色を付ける
        let status = paint(
            &stack.status,
            &format!("{:<sw$}", stack.status.as_str(), sw = status_width),
        );
        table.push_str(&format!(
            "{:<nw$}  {}  {}\n",
            stack.name,
            status,
            stack
                .last_updated
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S"),
            nw = name_width
        ));
    }
    table
}

pub mod create;
pub mod delete;
pub mod list;
pub mod logs;
pub mod outputs;
pub mod update;
pub mod watch;

use crate::format;
use colored::Colorize;
use stackflow_cloud::{Outputs, StackEvent};

/// イベントを1行で表示
pub fn print_event(event: &StackEvent) {
    println!("{}", format::format_event(event));
}

pub fn print_outputs(outputs: &Outputs) {
    println!();
    if outputs.is_empty() {
        println!("{}", "出力はありません".dimmed());
    } else {
        print!("{}", format::format_outputs(outputs));
    }
}

/// スタック名の検証（リモート呼び出しの前に行う）
pub fn require_stack_name(name: &str) -> anyhow::Result<()> {
    if name.trim().is_empty() {
        return Err(anyhow::anyhow!("スタック名を指定してください"));
    }
    Ok(())
}

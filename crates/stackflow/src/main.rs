mod commands;
mod context;
mod format;
mod template;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use context::Context;
use stackflow_cloud::CloudError;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "stackflow")]
#[command(about = "CloudFormation スタックを操作し、完了まで見届ける", long_about = None)]
struct Cli {
    /// AWS リージョン
    #[arg(long, global = true, env = "AWS_REGION")]
    region: Option<String>,

    /// AWS プロファイル
    #[arg(long, global = true, env = "AWS_PROFILE")]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// テンプレートの取得元（ファイルまたはURLのどちらか一方）
#[derive(Args, Debug, Clone, Default)]
#[group(required = false, multiple = false)]
pub struct TemplateArgs {
    /// テンプレートファイルのパス
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// テンプレートのURL
    #[arg(short, long)]
    url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// スタックを作成し、完了まで追跡
    #[command(name = "create-stack", visible_alias = "create")]
    CreateStack {
        /// スタック名
        name: String,
        /// スタックパラメータ (Key=Value 形式)
        params: Vec<String>,
        #[command(flatten)]
        template: TemplateArgs,
        /// 失敗時にロールバックしない
        #[arg(long)]
        disable_rollback: bool,
    },
    /// スタックを更新し、完了まで追跡
    #[command(name = "update-stack", visible_alias = "update")]
    UpdateStack {
        /// スタック名
        name: String,
        /// スタックパラメータ (Key=Value 形式)。省略したパラメータは前回の値を使う
        params: Vec<String>,
        #[command(flatten)]
        template: TemplateArgs,
    },
    /// スタックを削除し、完了まで追跡
    #[command(
        name = "delete-stack",
        visible_aliases = ["delete", "del", "remove", "rm"]
    )]
    DeleteStack {
        /// スタック名
        name: String,
    },
    /// スタックの一覧を表示
    #[command(name = "list-stacks", visible_aliases = ["list", "ls"])]
    ListStacks {
        /// 削除済みのスタックも表示
        #[arg(short, long)]
        all: bool,
    },
    /// スタックの出力を表示
    #[command(name = "list-stack-outputs", visible_alias = "outputs")]
    ListStackOutputs {
        /// スタック名
        name: String,
    },
    /// 進行中のスタック操作を完了まで追跡
    #[command(name = "watch-stack", visible_aliases = ["watch", "w"])]
    WatchStack {
        /// スタック名
        name: String,
    },
    /// CloudWatch Logs のログを追跡
    #[command(name = "follow-logs", visible_alias = "logs")]
    FollowLogs {
        /// ロググループ名
        #[arg(short = 'g', long)]
        group: String,
        /// ログストリーム名のプレフィックス
        #[arg(short = 'p', long, default_value = "")]
        prefix: String,
        /// 追跡開始以降のログのみ表示
        #[arg(long)]
        new_only: bool,
        /// ログストリーム探索のタイムアウト (秒)
        #[arg(long)]
        discovery_timeout: Option<u64>,
    },
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // ログはstderrに出力（stdoutはイベントの表示に使う）
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);

        let cancelled = matches!(e.downcast_ref::<CloudError>(), Some(CloudError::Cancelled));
        std::process::exit(if cancelled { 130 } else { 1 });
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Versionコマンドは設定ファイル不要
    if matches!(cli.command, Commands::Version) {
        println!("stackflow {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut settings = stackflow_config::load_settings()?;
    // CLIフラグは設定ファイルより優先
    if cli.region.is_some() {
        settings.region = cli.region;
    }
    if cli.profile.is_some() {
        settings.profile = cli.profile;
    }

    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("Ctrl+C を受信");
            token.cancel();
        }
    });

    let ctx = Context::new(settings, cancel);

    // コマンドディスパッチ
    match cli.command {
        Commands::CreateStack {
            name,
            params,
            template,
            disable_rollback,
        } => {
            commands::create::handle(&ctx, &name, &params, &template, disable_rollback).await?;
        }
        Commands::UpdateStack {
            name,
            params,
            template,
        } => {
            commands::update::handle(&ctx, &name, &params, &template).await?;
        }
        Commands::DeleteStack { name } => {
            commands::delete::handle(&ctx, &name).await?;
        }
        Commands::ListStacks { all } => {
            commands::list::handle(&ctx, all).await?;
        }
        Commands::ListStackOutputs { name } => {
            commands::outputs::handle(&ctx, &name).await?;
        }
        Commands::WatchStack { name } => {
            commands::watch::handle(&ctx, &name).await?;
        }
        Commands::FollowLogs {
            group,
            prefix,
            new_only,
            discovery_timeout,
        } => {
            commands::logs::handle(&ctx, &group, &prefix, new_only, discovery_timeout).await?;
        }
        Commands::Version => {
            unreachable!("Version is handled before config loading");
        }
    }

    Ok(())
}

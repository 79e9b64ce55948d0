mod cli;
mod config;
mod editor;
mod service;
mod session;
mod store;
mod toast;
mod ui;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use config::AppConfig;
use memo_local::LocalHostClient;
use session::Session;
use ui::{Output, PromptPicker};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AppConfig::load(cli.config.as_deref())?;
    let host = Arc::new(LocalHostClient::new(
        config.get_fonts_dir(),
        Arc::new(PromptPicker),
    ));

    let session = Session::new(&config, host);
    session.start().await;

    let result = match cli.command {
        Commands::Folder { path } => service::folder::folder(&session, path).await,
        Commands::List => service::list::list(&session).await,
        Commands::Open { memo, raw } => service::open::open(&session, &memo, raw).await,
        Commands::New { name } => service::new::new(&session, name).await,
        Commands::Write { memo, file } => service::write::write(&session, &memo, file).await,
        Commands::Rename { memo, name } => service::rename::rename(&session, &memo, &name).await,
        Commands::Delete { memo, force } => service::delete::delete(&session, &memo, force).await,
        Commands::Status => service::status::status(&session).await,
        Commands::Font { command } => service::font::font(&session, command).await,
    };

    // 退出前写回未保存内容并保存会话
    let shutdown = session.shutdown().await;

    let output = Output::new();
    for toast in session.toasts().drain() {
        output.toast(&toast);
    }

    result?;
    shutdown?;
    // 已过期的错误提示同样计入退出码
    if session.toasts().error_count() > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// 初始化日志（输出到 stderr；RUST_LOG 优先于 -v）
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "memo=debug,memo_local=debug",
        _ => "memo=trace,memo_local=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

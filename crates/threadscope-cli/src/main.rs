//! Threadscope CLI: rebuild a reply thread and show who took part in it.
//!
//! Usage:
//!   threadscope <post-url-or-id> [--mode full_tree|main_thread_only] [--top N] [--json]

mod config;
mod report;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LoggingConfig};
use threadscope::{AssembleMode, CancellationToken, ThreadExplorer};

#[derive(Parser)]
#[command(
    name = "threadscope",
    version,
    about = "Reply-thread explorer with influence-cluster enrichment"
)]
struct Cli {
    /// Status URL or numeric id of any post in the conversation
    post: String,
    /// Reply walk: full_tree or main_thread_only (defaults to the configured mode)
    #[arg(long)]
    mode: Option<AssembleMode>,
    /// Number of communities shown in the distribution chart
    #[arg(long)]
    top: Option<usize>,
    /// Print the exploration as JSON instead of the text report
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::load().map_err(|e| anyhow::anyhow!("{}", e))?;

    init_logging(&config.logging);

    let mode = cli.mode.unwrap_or(config.report.mode);
    let top = cli.top.unwrap_or(config.report.top);
    tracing::info!(post = %cli.post, %mode, "Starting exploration");

    let explorer = ThreadExplorer::builder()
        .twitter(config.post_store_config())?
        .borg(config.borg_builder())?
        .enrich_config(config.enrich_config())
        .mode(mode)
        .build()?;

    // Ctrl-C stops enrichment early; the report still covers every account
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing with the lookups done so far");
            on_interrupt.cancel();
        }
    });

    let exploration = explorer.explore_with_cancel(&cli.post, &cancel).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&exploration.to_json())?);
    } else {
        print!("{}", report::render_report(&exploration, top));
    }

    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout carries the report, logs go to stderr
    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
}

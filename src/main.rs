use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fastchannel_monitor::config::{Config, TransportKind};
use fastchannel_monitor::fastchannel_client::build_client;
use fastchannel_monitor::monitor::{ScreenController, SyncOutcome};
use fastchannel_monitor::render::render_screen;

/// Fastchannel integration monitor
#[derive(Parser, Debug)]
#[command(name = "fastchannel-monitor", version)]
struct Cli {
    /// Path to config.json (defaults to the app directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// RPC path: proxy, invoker or http
    #[arg(long)]
    transport: Option<TransportKind>,

    /// ERP base URL, e.g. http://erp:8180
    #[arg(long)]
    base_url: Option<String>,

    /// Force a full sync after the initial load
    #[arg(long)]
    sync: bool,

    /// Keep running and redraw on every state change until Ctrl-C
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).await;
    if let Some(transport) = cli.transport {
        config.transport = transport;
    }
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    let rpc = build_client(&config).context("failed to prepare RPC client")?;
    let controller = ScreenController::from_config(rpc, &config);

    for handle in controller.initialize() {
        handle.await.context("initial load task panicked")?;
    }

    if cli.sync {
        let outcome = controller.force_sync().await;
        info!(?outcome, "Forced sync finished");
        if outcome == SyncOutcome::Failed && !cli.watch {
            println!("{}", render_screen(&controller.snapshot()));
            anyhow::bail!("sync request failed");
        }
    }

    let mut updates = controller.subscribe();
    println!("{}", render_screen(&controller.snapshot()));
    if !cli.watch {
        return Ok(());
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, leaving monitor");
                break;
            }
            update = updates.recv() => match update {
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "View updates lagged, redrawing from current state");
                }
                Err(RecvError::Closed) => break,
            }
        }
        println!("\n{}", render_screen(&controller.snapshot()));
    }

    Ok(())
}

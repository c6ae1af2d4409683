use anyhow::Context as _;
use clap::Parser;
use gifwall::api::{self, ApiState};
use gifwall::catalog::CatalogLoader;
use gifwall::config::ServerConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gifwall", version, about)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on. Overrides `PORT`.
    #[arg(long)]
    port: Option<u16>,

    /// Directory of gifs to serve. Overrides `GIFWALL_MEDIA_ROOT`.
    #[arg(long)]
    media_root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gifwall=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let result = run(cli).await;
    if let Err(error) = &result {
        tracing::error!(error = %format!("{error:#}"), "gifwall failed");
    }
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config =
        ServerConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(media_root) = cli.media_root {
        config.media_root = media_root;
    }

    let catalog = CatalogLoader::new(&config.media_root)
        .load()
        .context("failed to load gif catalog")?;
    if catalog.safe_count() == 0 {
        tracing::warn!("catalog has no safe gifs, default listings will be empty");
    }

    let bind = config.socket_addr()?;
    let state = Arc::new(ApiState::new(
        catalog,
        config.media_root.clone(),
        config.sampling,
    ));

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let server = api::start_http_server(
        bind,
        state,
        config.request_timeout(),
        config.read_timeout(),
        shutdown_rx,
    )
    .await?;
    tracing::info!("gif wall running on http://localhost:{}", config.port);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("shutting down");
                let _ = shutdown_tx.send(true);
            }
            Err(error) => tracing::error!(%error, "failed to listen for shutdown signal"),
        }
    });

    server.await.context("HTTP server task failed")?;
    Ok(())
}

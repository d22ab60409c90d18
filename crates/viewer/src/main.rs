mod adapter;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storesearch_core::{
    load_config, validate_config, CatalogClient, Config, FetchTaskRegistry, HttpFetcher,
    ImageFetcher, ItunesClient, SearchSession,
};

use adapter::GridAdapter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let term = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if term.trim().is_empty() {
        bail!("usage: storesearch <search term>");
    }

    // Determine config path
    let config_path = std::env::var("STORESEARCH_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    let config = if config_path.exists() {
        info!("Loading configuration from {:?}", config_path);
        load_config(&config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        info!("No configuration at {:?}, using defaults", config_path);
        Config::default()
    };

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;
    info!("Catalog: {}", config.catalog.base_url);
    info!(
        "Viewport: {}x{}",
        config.viewport.width, config.viewport.height
    );

    let client: Arc<dyn CatalogClient> = Arc::new(
        ItunesClient::new(&config.catalog).context("Failed to create catalog client")?,
    );
    let fetcher: Arc<dyn ImageFetcher> = Arc::new(
        HttpFetcher::new(&config.thumbnails).context("Failed to create thumbnail fetcher")?,
    );

    let session = SearchSession::new(client);
    session
        .perform_search(&term, config.catalog.category)
        .await
        .context("Search failed")?;

    let (registry, deliveries) = FetchTaskRegistry::new(fetcher);
    let adapter = GridAdapter::new(&config, registry, deliveries);
    adapter.show(&session.state()).await;

    Ok(())
}

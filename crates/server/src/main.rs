//! Storefront server binary.

use anyhow::{Context, Result};
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use std::net::SocketAddr;
use storefront_core::config::AppConfig;
use storefront_server::{AppState, create_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Storefront - product catalog API server
#[derive(Parser, Debug)]
#[command(name = "storefrontd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "STOREFRONT_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Storefront v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args.config)?;

    let storage = storefront_storage::from_config(&config.storage)
        .await
        .context("failed to initialize asset storage")?;
    storage
        .health_check()
        .await
        .context("asset storage health check failed")?;
    tracing::info!(backend = storage.backend_name(), "Asset storage initialized");

    let catalog = storefront_catalog::from_config(&config.catalog)
        .await
        .context("failed to initialize catalog store")?;
    tracing::info!(backend = catalog.backend_name(), "Catalog store initialized");

    let addr: SocketAddr = config
        .server
        .bind_addr()
        .parse()
        .context("invalid bind address")?;

    let state = AppState::new(config, storage, catalog).context("failed to register metrics")?;
    let app = create_router(state);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Merge the optional TOML file with `STOREFRONT_` environment variables.
/// Every setting has a default, so neither source is required.
fn load_config(path: &str) -> Result<AppConfig> {
    let mut figment = Figment::new();

    if std::path::Path::new(path).exists() {
        tracing::info!(config_path = %path, "Loading configuration from file");
        figment = figment.merge(Toml::file(path));
    } else {
        tracing::debug!("No config file found at {}, using defaults and environment", path);
    }

    figment
        .merge(Env::prefixed("STOREFRONT_").split("__"))
        .extract()
        .context("failed to load configuration")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

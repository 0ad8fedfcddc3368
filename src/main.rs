mod cli;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use jobly::{
    utils::toml_config::{ConfigError, JoblyConfig},
    AppState,
};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let (mut config, config_missing) = match JoblyConfig::load(&cli.config) {
        Ok(config) => (config, false),
        Err(ConfigError::FileNotFound(_)) => (JoblyConfig::default(), true),
        Err(e) => return Err(e).context("Failed to load configuration"),
    };

    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    init_tracing(&config, cli.verbose);

    if config_missing {
        tracing::warn!(
            path = %cli.config.display(),
            "Configuration file not found, using defaults"
        );
    }

    let secret = config.jwt_secret().context("Token signing secret is not configured")?;

    if config.database.turso_url_env.is_none() {
        ensure_parent_dir(&config.database.url)?;
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::from_config(config, &secret)
        .await
        .context("Failed to initialize application state")?;

    let app = jobly::api::routes::create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server started on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &JoblyConfig, verbose: bool) {
    let default_level = if verbose {
        "debug"
    } else {
        config.server.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", default_level)));

    let registry = tracing_subscriber::registry().with(filter);
    if config.server.log_format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn ensure_parent_dir(url: &str) -> anyhow::Result<()> {
    if url == ":memory:" {
        return Ok(());
    }

    if let Some(parent) = Path::new(url).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create database directory {}", parent.display()))?;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

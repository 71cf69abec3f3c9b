//! `textbin` server entry point.
//!
//! Loads configuration, opens (or creates) the backing file, loads it into
//! memory, then starts the Axum HTTP server with graceful shutdown.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use textbin_core::auth::{ApiToken, DEFAULT_TOKEN_LENGTH};
use textbin_core::document::Document;
use textbin_storage::FsDocumentFile;

use textbin_server::config::{LogFormat, ServerConfig};
use textbin_server::routes;
use textbin_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment.
    let config = ServerConfig::from_env().context("invalid configuration")?;

    init_tracing(&config);

    info!(
        storage = %config.storage_path.display(),
        theme = config.theme.as_str(),
        "textbin starting"
    );

    let api_token = match config.api_token.as_deref() {
        Some(token) => ApiToken::new(token),
        None => {
            let token = ApiToken::generate(DEFAULT_TOKEN_LENGTH)
                .context("failed to generate API token")?;
            info!(token = token.as_str(), "generated API token");
            token
        }
    };

    let file = Arc::new(FsDocumentFile::new(&config.storage_path));
    let document = Document::open(file)
        .await
        .with_context(|| format!("failed to load {}", config.storage_path.display()))?;
    info!(path = %document.location(), "document loaded");

    let state = Arc::new(AppState::new(document, api_token, config.theme));
    let app = routes::router(state);

    // Bind and serve.
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "textbin server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("textbin server stopped");
    Ok(())
}

/// Initialize structured logging. `RUST_LOG` wins over the configured level.
fn init_tracing(config: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).pretty().init(),
    }
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}

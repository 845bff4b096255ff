//! Mock admin API for local development.
//!
//! Serves the admin contract from memory so the console can be run and
//! tested without the production backend.

use anyhow::Result;
use oscode_admin::config::{load_mock_config, MockServerConfig};
use oscode_admin::mock_server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "oscode_admin=debug,tower_http=debug,axum::rejection=trace".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match load_mock_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Failed to load mock config, using defaults: {}", e);
            MockServerConfig::default()
        }
    };
    tracing::info!(
        "Starting mock admin API ({} accounts, {}s sessions)",
        config.credentials.len(),
        config.session_ttl_secs
    );

    mock_server::serve(config).await
}

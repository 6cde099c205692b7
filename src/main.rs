//! Mentions viewer - server entry point.
//!
//! The library is organized into the following modules:
//!
//! - `config`: Environment-driven runtime settings
//! - `models`: Knowledge-base JSON shapes
//! - `client`: HTTP client for the knowledge-base API
//! - `highlight`: Annotation highlighting inside mention snippets
//! - `paging`: Page position and pager bounds
//! - `view` / `render`: Page model and the per-row result renderer
//! - `metadata`: Entity panel and publication lines
//! - `panel`: Load flow and pager handlers
//! - `handlers`: HTTP route handlers

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mentions::{build_router, AppState, Config};

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let addr = config.addr;
    info!(kb = %config.kb_service_host, page_size = config.page_size, "configuration loaded");

    let state = Arc::new(AppState::new(config)?);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Mentions viewer running");

    axum::serve(listener, app).await?;
    Ok(())
}

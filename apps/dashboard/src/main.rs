mod backend_client;
mod config;
mod coordinators;
mod errors;
mod formatter;
mod models;
mod render;
mod routes;
mod state;
mod workflow;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::backend_client::HttpBackend;
use crate::config::Config;
use crate::coordinators::{BackendHandle, Coordinators};
use crate::routes::build_router;
use crate::state::AppState;
use crate::workflow::SessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting recruiter dashboard v{}", env!("CARGO_PKG_VERSION"));

    // The client timeout must not cut a match pass short; coordinators apply
    // the per-operation limits.
    let client_timeout = config.request_timeout.max(config.match_timeout);
    let backend = HttpBackend::new(&config.backend_url, client_timeout)?;
    info!("Backend client initialized ({})", config.backend_url);

    let handle = BackendHandle::new(
        Arc::new(backend),
        config.request_timeout,
        config.match_timeout,
        config.page_size,
    );
    let sessions = Arc::new(SessionStore::new(
        Coordinators::new(handle),
        config.session_idle_timeout,
    ));
    info!(
        "Request timeout {}s, match timeout {}s, page size {}, session idle {}s",
        config.request_timeout.as_secs(),
        config.match_timeout.as_secs(),
        config.page_size,
        config.session_idle_timeout.as_secs()
    );

    // Build app state
    let state = AppState {
        sessions,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

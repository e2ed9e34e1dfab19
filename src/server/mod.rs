//! HTTP host layer for the lookup service
//!
//! Maps paths to handlers, enforces the rate limiter, and renders the
//! lookup error taxonomy to status codes. All lookup and limiting logic
//! lives in the library; this layer only adapts it to HTTP.

pub mod handlers;

use crate::asn::resolver::Resolver;
use crate::config::Settings;
use crate::rate_limit::RateLimiter;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Shared state injected into every request handler
#[derive(Clone)]
pub struct AppState {
    /// ASN resolver shared by all requests
    pub resolver: Arc<Resolver>,
    /// Per-client admission gate, shared across all concurrent requests
    pub limiter: Arc<RateLimiter>,
}

/// Build the service router over the given state
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/v1/asn/lookup", get(handlers::lookup))
        .route("/v1/asn/lookup-batch", post(handlers::lookup_batch))
        .with_state(state)
}

/// Bind the configured address and serve until the process exits
pub async fn run(settings: &Settings) -> anyhow::Result<()> {
    let state = AppState {
        resolver: Arc::new(settings.resolver()),
        limiter: Arc::new(settings.rate_limiter()),
    };

    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("ASN lookup API listening on http://{addr}");

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

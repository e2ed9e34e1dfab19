//! Request handlers for the lookup API

use super::AppState;
use crate::asn::error::LookupError;
use crate::asn::types::AsnResult;
use crate::rate_limit::RateDecision;
use axum::extract::{ConnectInfo, Query, State};
use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tracing::debug;

/// Maximum number of addresses accepted by one batch request
pub const MAX_BATCH_SIZE: usize = 100;

/// Query parameters for the single-lookup route
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    /// IP address to resolve
    pub ip: Option<String>,
}

/// JSON body of a batch lookup request
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    /// Addresses to resolve, in order
    pub ips: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct BatchItem {
    ip: String,
    result: Option<AsnResult>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct BatchResponse {
    items: Vec<BatchItem>,
}

/// Liveness probe
pub async fn health(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    if let Some(denied) = enforce_rate_limit(&state, &headers, peer) {
        return denied;
    }
    Json(serde_json::json!({"status": "ok"})).into_response()
}

/// Single lookup: `GET /v1/asn/lookup?ip={ip}`
pub async fn lookup(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Query(query): Query<LookupQuery>,
) -> Response {
    if let Some(denied) = enforce_rate_limit(&state, &headers, peer) {
        return denied;
    }

    let Some(ip) = query.ip else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "query parameter 'ip' is required",
        );
    };

    match state.resolver.resolve(&ip).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => lookup_error_response(&err),
    }
}

/// Batch lookup: `POST /v1/asn/lookup-batch` with `{"ips": [...]}`
///
/// Addresses are resolved by simple sequential iteration; a failure for
/// one address is recorded in its item and does not fail the batch.
pub async fn lookup_batch(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(body): Json<BatchRequest>,
) -> Response {
    if let Some(denied) = enforce_rate_limit(&state, &headers, peer) {
        return denied;
    }

    if body.ips.is_empty() || body.ips.len() > MAX_BATCH_SIZE {
        return error_response(
            StatusCode::BAD_REQUEST,
            "ips must contain between 1 and 100 entries",
        );
    }

    let mut items = Vec::with_capacity(body.ips.len());
    for ip in body.ips {
        let item = match state.resolver.resolve(&ip).await {
            Ok(result) => BatchItem {
                ip,
                result: Some(result),
                error: None,
            },
            Err(err) => BatchItem {
                ip,
                result: None,
                error: Some(err.to_string()),
            },
        };
        items.push(item);
    }

    (StatusCode::OK, Json(BatchResponse { items })).into_response()
}

/// Client identity for rate limiting: the first `X-Forwarded-For` hop
/// when present, otherwise the peer address
fn client_key(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|first| first.trim().to_string())
        .filter(|first| !first.is_empty())
        .unwrap_or_else(|| peer.ip().to_string())
}

/// Consult the limiter; `Some` carries the ready-made 429 response
fn enforce_rate_limit(
    state: &AppState,
    headers: &HeaderMap,
    peer: SocketAddr,
) -> Option<Response> {
    let key = client_key(headers, peer);
    match state.limiter.check(&key) {
        RateDecision::Admitted => None,
        RateDecision::Limited { retry_after_secs } => {
            debug!("rate limit exceeded for {key}, retry in {retry_after_secs}s");
            let mut response =
                error_response(StatusCode::TOO_MANY_REQUESTS, "rate limit exceeded");
            response
                .headers_mut()
                .insert(RETRY_AFTER, retry_after_secs.into());
            Some(response)
        }
    }
}

/// Map a lookup failure onto its HTTP rendering
fn lookup_error_response(err: &LookupError) -> Response {
    let status = match err {
        LookupError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
        LookupError::UpstreamUnreachable(_) | LookupError::ResponseFormat(_) => {
            StatusCode::BAD_GATEWAY
        }
    };
    error_response(status, &err.to_string())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

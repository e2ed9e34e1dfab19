//! Integration tests for the HTTP host layer
//!
//! Each test spins the full axum service on an ephemeral port with its
//! own limiter, with the resolver pointed at closed local ports so no
//! test depends on the external network (invalid addresses never reach
//! an upstream at all).

#![allow(clippy::unwrap_used)]

use asnd::asn::{Resolver, RestClient, WhoisClient};
use asnd::rate_limit::RateLimiter;
use asnd::server::{router, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// A port with nothing listening on it
async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// Serve the app with the given limiter; upstreams refuse all connections
async fn spawn_app(limiter: RateLimiter) -> SocketAddr {
    let resolver = Resolver::with_endpoints(
        WhoisClient::with_port("127.0.0.1", closed_port().await),
        RestClient::new(format!("http://127.0.0.1:{}", closed_port().await)),
        Duration::from_millis(200),
    );
    let state = AppState {
        resolver: Arc::new(resolver),
        limiter: Arc::new(limiter),
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            router(state).into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    addr
}

#[tokio::test]
async fn test_health_endpoint() {
    let addr = spawn_app(RateLimiter::new(60, 60)).await;

    let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = serde_json::from_str(&response.text().await.unwrap()).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_missing_ip_parameter_is_400() {
    let addr = spawn_app(RateLimiter::new(60, 60)).await;

    let response = reqwest::get(format!("http://{addr}/v1/asn/lookup"))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = serde_json::from_str(&response.text().await.unwrap()).unwrap();
    assert_eq!(body["error"], "query parameter 'ip' is required");
}

#[tokio::test]
async fn test_invalid_ip_is_400() {
    let addr = spawn_app(RateLimiter::new(60, 60)).await;

    let response = reqwest::get(format!("http://{addr}/v1/asn/lookup?ip=not-an-ip"))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = serde_json::from_str(&response.text().await.unwrap()).unwrap();
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("invalid IP address"));
}

#[tokio::test]
async fn test_unreachable_upstreams_are_502() {
    let addr = spawn_app(RateLimiter::new(60, 60)).await;

    // TEST-NET-1 address; both stub upstreams refuse the connection
    let response = reqwest::get(format!("http://{addr}/v1/asn/lookup?ip=192.0.2.1"))
        .await
        .unwrap();
    assert_eq!(response.status(), 502);
}

#[tokio::test]
async fn test_rate_limit_rejection_carries_retry_after() {
    let addr = spawn_app(RateLimiter::new(1, 60)).await;

    let first = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(first.status(), 200);

    let second = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(second.status(), 429);

    let retry_after: u64 = second
        .headers()
        .get("retry-after")
        .unwrap()
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after >= 1);

    let body: serde_json::Value = serde_json::from_str(&second.text().await.unwrap()).unwrap();
    assert_eq!(body["error"], "rate limit exceeded");
}

#[tokio::test]
async fn test_forwarded_clients_are_limited_separately() {
    let addr = spawn_app(RateLimiter::new(1, 60)).await;
    let client = reqwest::Client::new();

    for forwarded in ["203.0.113.7", "203.0.113.8"] {
        let response = client
            .get(format!("http://{addr}/health"))
            .header("x-forwarded-for", forwarded)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200, "first request for {forwarded}");
    }

    let repeat = client
        .get(format!("http://{addr}/health"))
        .header("x-forwarded-for", "203.0.113.7")
        .send()
        .await
        .unwrap();
    assert_eq!(repeat.status(), 429);
}

#[tokio::test]
async fn test_batch_size_is_bounded() {
    let addr = spawn_app(RateLimiter::new(60, 60)).await;
    let client = reqwest::Client::new();
    let url = format!("http://{addr}/v1/asn/lookup-batch");

    let empty = client
        .post(&url)
        .json(&serde_json::json!({"ips": []}))
        .send()
        .await
        .unwrap();
    assert_eq!(empty.status(), 400);

    let oversized: Vec<String> = (0..101).map(|i| format!("10.0.0.{}", i % 256)).collect();
    let too_many = client
        .post(&url)
        .json(&serde_json::json!({"ips": oversized}))
        .send()
        .await
        .unwrap();
    assert_eq!(too_many.status(), 400);
}

#[tokio::test]
async fn test_batch_reports_per_item_errors() {
    let addr = spawn_app(RateLimiter::new(60, 60)).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{addr}/v1/asn/lookup-batch"))
        .json(&serde_json::json!({"ips": ["not-an-ip", "999.999.999.999"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = serde_json::from_str(&response.text().await.unwrap()).unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    for item in items {
        assert!(item["result"].is_null());
        assert!(item["error"].as_str().unwrap().contains("invalid IP address"));
    }
    assert_eq!(items[0]["ip"], "not-an-ip");
}

#[tokio::test]
async fn test_malformed_batch_body_is_rejected() {
    let addr = spawn_app(RateLimiter::new(60, 60)).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{addr}/v1/asn/lookup-batch"))
        .header("content-type", "application/json")
        .body("{\"ips\": \"not-a-list\"}")
        .send()
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let addr = spawn_app(RateLimiter::new(60, 60)).await;

    let response = reqwest::get(format!("http://{addr}/v1/nope")).await.unwrap();
    assert_eq!(response.status(), 404);
}

//! Lookup orchestration with primary-to-fallback failover
//!
//! The resolver validates the input address, queries the WHOIS primary,
//! and on any upstream failure queries the REST fallback once.
//! Validation failures never reach the network.

use super::error::LookupError;
use super::normalize::normalize_ip;
use super::rest::{RestClient, DEFAULT_REST_URL};
use super::types::AsnResult;
use super::whois::{WhoisClient, DEFAULT_WHOIS_HOST};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default timeout budget for a single upstream attempt
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(4);

/// A single upstream capable of resolving an IP address to ASN data
#[async_trait]
pub trait AsnSource: Send + Sync {
    /// Resolve a normalized IP address within the given timeout
    async fn lookup(&self, ip: &str, timeout: Duration) -> Result<AsnResult, LookupError>;
}

#[async_trait]
impl AsnSource for WhoisClient {
    async fn lookup(&self, ip: &str, timeout: Duration) -> Result<AsnResult, LookupError> {
        WhoisClient::lookup(self, ip, timeout).await
    }
}

#[async_trait]
impl AsnSource for RestClient {
    async fn lookup(&self, ip: &str, timeout: Duration) -> Result<AsnResult, LookupError> {
        RestClient::lookup(self, ip, timeout).await
    }
}

/// ASN resolver combining the WHOIS primary with the REST fallback
///
/// Each call attempts each upstream at most once and fails over at most
/// once; there is no retry, backoff, or health tracking across calls,
/// so every call independently re-attempts the primary first.
#[derive(Clone)]
pub struct Resolver {
    primary: Arc<dyn AsnSource>,
    fallback: Arc<dyn AsnSource>,
    timeout: Duration,
}

impl Resolver {
    /// Create a resolver against the default upstream endpoints
    pub fn new() -> Self {
        Self::with_endpoints(
            WhoisClient::new(DEFAULT_WHOIS_HOST),
            RestClient::new(DEFAULT_REST_URL),
            DEFAULT_LOOKUP_TIMEOUT,
        )
    }

    /// Create a resolver against specific endpoints with a timeout budget
    pub fn with_endpoints(whois: WhoisClient, rest: RestClient, timeout: Duration) -> Self {
        Self::with_sources(Arc::new(whois), Arc::new(rest), timeout)
    }

    /// Create a resolver from arbitrary upstream implementations
    pub fn with_sources(
        primary: Arc<dyn AsnSource>,
        fallback: Arc<dyn AsnSource>,
        timeout: Duration,
    ) -> Self {
        Self {
            primary,
            fallback,
            timeout,
        }
    }

    /// Resolve a raw IP string to its ASN attribution
    ///
    /// The address is validated first; invalid input fails with
    /// [`LookupError::InvalidAddress`] before any upstream is contacted.
    /// The primary is attempted once; on either upstream-category error
    /// the fallback is attempted once and its outcome, success or
    /// failure, is final.
    pub async fn resolve(&self, raw_ip: &str) -> Result<AsnResult, LookupError> {
        self.resolve_with_timeout(raw_ip, self.timeout).await
    }

    /// Resolve with an explicit per-upstream timeout budget
    pub async fn resolve_with_timeout(
        &self,
        raw_ip: &str,
        timeout: Duration,
    ) -> Result<AsnResult, LookupError> {
        let ip = normalize_ip(raw_ip)?;

        match self.primary.lookup(&ip, timeout).await {
            Ok(result) => Ok(result),
            Err(primary_err) => {
                debug!("primary lookup for {ip} failed ({primary_err}), trying fallback");
                self.fallback.lookup(&ip, timeout).await
            }
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

//! Runtime configuration with compile-time defaults and environment
//! overrides
//!
//! Settings are resolved from the process environment; unset or
//! unparseable variables fall back to the defaults below. CLI flags can
//! override individual fields on top of that.

use crate::asn::resolver::{Resolver, DEFAULT_LOOKUP_TIMEOUT};
use crate::asn::rest::{RestClient, DEFAULT_REST_URL};
use crate::asn::whois::{WhoisClient, DEFAULT_WHOIS_HOST};
use crate::rate_limit::RateLimiter;
use std::time::Duration;

/// Default listen interface
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default listen port
pub const DEFAULT_PORT: u16 = 8000;
/// Default requests admitted per client identity per window
pub const DEFAULT_RATE_LIMIT_REQUESTS: i64 = 60;
/// Default rate limit window in seconds
pub const DEFAULT_RATE_LIMIT_WINDOW_SEC: i64 = 60;

/// Resolved runtime settings for the service
#[derive(Debug, Clone)]
pub struct Settings {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Requests admitted per client per window; zero or negative disables
    /// rate limiting
    pub rate_limit_requests: i64,
    /// Rate limit window length in seconds; zero or negative disables
    /// rate limiting
    pub rate_limit_window_sec: i64,
    /// Timeout budget for each upstream lookup attempt
    pub lookup_timeout: Duration,
    /// WHOIS resolver host for the primary lookup
    pub whois_host: String,
    /// Base URL of the REST fallback API
    pub rest_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            rate_limit_requests: DEFAULT_RATE_LIMIT_REQUESTS,
            rate_limit_window_sec: DEFAULT_RATE_LIMIT_WINDOW_SEC,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            whois_host: DEFAULT_WHOIS_HOST.to_string(),
            rest_url: DEFAULT_REST_URL.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the process environment
    ///
    /// Recognized variables: `HOST`, `PORT`, `RATE_LIMIT_REQUESTS`,
    /// `RATE_LIMIT_WINDOW_SEC`, `LOOKUP_TIMEOUT_MS`, `WHOIS_HOST`,
    /// `FALLBACK_API_URL`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_or("HOST", defaults.host),
            port: parse_env("PORT", defaults.port),
            rate_limit_requests: parse_env("RATE_LIMIT_REQUESTS", defaults.rate_limit_requests),
            rate_limit_window_sec: parse_env(
                "RATE_LIMIT_WINDOW_SEC",
                defaults.rate_limit_window_sec,
            ),
            lookup_timeout: Duration::from_millis(parse_env(
                "LOOKUP_TIMEOUT_MS",
                defaults.lookup_timeout.as_millis() as u64,
            )),
            whois_host: env_or("WHOIS_HOST", defaults.whois_host),
            rest_url: env_or("FALLBACK_API_URL", defaults.rest_url),
        }
    }

    /// Build the rate limiter these settings describe
    ///
    /// Negative limits clamp to zero, which the limiter treats as
    /// "disabled".
    pub fn rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(
            self.rate_limit_requests.max(0) as usize,
            self.rate_limit_window_sec.max(0) as u64,
        )
    }

    /// Build the resolver these settings describe
    pub fn resolver(&self) -> Resolver {
        Resolver::with_endpoints(
            WhoisClient::new(self.whois_host.clone()),
            RestClient::new(self.rest_url.clone()),
            self.lookup_timeout,
        )
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).ok().filter(|v| !v.is_empty()).unwrap_or(default)
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

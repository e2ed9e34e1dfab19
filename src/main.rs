//! asnd - ASN lookup service with WHOIS-to-REST failover and per-client
//! rate limiting.
//!
//! This is the server binary for the asnd library.

use anyhow::Result;
use asnd::config::Settings;
use asnd::server;
use clap::Parser;
use std::time::Duration;
use tracing::info;

/// Command-line arguments for the lookup service
///
/// Every flag overrides the corresponding environment variable; unset
/// flags leave the environment (or the built-in default) in effect.
#[derive(Parser, Debug)]
#[clap(author, version, about = "Fast IP-to-ASN lookup API with WHOIS-to-REST failover", long_about = None)]
struct Args {
    /// Interface to bind (overrides HOST)
    #[clap(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[clap(short, long)]
    port: Option<u16>,

    /// Requests admitted per client per window, 0 disables limiting
    /// (overrides RATE_LIMIT_REQUESTS)
    #[clap(long)]
    rate_limit_requests: Option<i64>,

    /// Rate limit window in seconds (overrides RATE_LIMIT_WINDOW_SEC)
    #[clap(long)]
    rate_limit_window_sec: Option<i64>,

    /// Upstream lookup timeout in milliseconds (overrides LOOKUP_TIMEOUT_MS)
    #[clap(long)]
    lookup_timeout_ms: Option<u64>,

    /// WHOIS resolver host for the primary lookup (overrides WHOIS_HOST)
    #[clap(long)]
    whois_host: Option<String>,

    /// Base URL of the REST fallback API (overrides FALLBACK_API_URL)
    #[clap(long)]
    rest_url: Option<String>,
}

impl Args {
    /// Fold the given flags over environment-derived settings
    fn apply(self, settings: &mut Settings) {
        if let Some(host) = self.host {
            settings.host = host;
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if let Some(requests) = self.rate_limit_requests {
            settings.rate_limit_requests = requests;
        }
        if let Some(window) = self.rate_limit_window_sec {
            settings.rate_limit_window_sec = window;
        }
        if let Some(timeout_ms) = self.lookup_timeout_ms {
            settings.lookup_timeout = Duration::from_millis(timeout_ms);
        }
        if let Some(whois_host) = self.whois_host {
            settings.whois_host = whois_host;
        }
        if let Some(rest_url) = self.rest_url {
            settings.rest_url = rest_url;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("asnd=info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let mut settings = Settings::from_env();
    args.apply(&mut settings);

    if settings.rate_limit_requests > 0 && settings.rate_limit_window_sec > 0 {
        info!(
            "rate limit: {} requests / {}s per client",
            settings.rate_limit_requests, settings.rate_limit_window_sec
        );
    } else {
        info!("rate limiting disabled");
    }
    info!(
        "upstreams: whois {}:43, fallback {}",
        settings.whois_host, settings.rest_url
    );

    server::run(&settings).await
}

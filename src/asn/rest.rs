//! Fallback ASN lookup over a bgpview.io-style JSON REST API
//!
//! Used only after the WHOIS primary has failed. There is no further
//! fallback behind this client, so its failures are terminal.

use super::error::LookupError;
use super::types::{AsnResult, Source};
use serde::Deserialize;
use std::time::Duration;

/// Default base URL of the REST fallback API
pub const DEFAULT_REST_URL: &str = "https://api.bgpview.io";

/// Client for the JSON REST fallback API
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
}

impl RestClient {
    /// Create a client for the given API base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Resolve an already-normalized IP address via `GET {base}/ip/{ip}`
    ///
    /// Transport failures, timeouts, non-2xx statuses, and bodies that
    /// are not JSON at all are [`LookupError::UpstreamUnreachable`];
    /// JSON that parses but does not carry usable prefix data is
    /// [`LookupError::ResponseFormat`].
    pub async fn lookup(&self, ip: &str, timeout: Duration) -> Result<AsnResult, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                LookupError::UpstreamUnreachable(format!("failed to build HTTP client: {e}"))
            })?;

        let url = format!("{}/ip/{ip}", self.base_url);
        let response = client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                LookupError::UpstreamUnreachable(format!("fallback request to {url} timed out"))
            } else {
                LookupError::UpstreamUnreachable(format!("fallback request failed: {e}"))
            }
        })?;

        if !response.status().is_success() {
            return Err(LookupError::UpstreamUnreachable(format!(
                "fallback returned HTTP {}",
                response.status()
            )));
        }

        let body = response.text().await.map_err(|e| {
            LookupError::UpstreamUnreachable(format!("fallback body read failed: {e}"))
        })?;

        parse_rest_payload(ip, &body)
    }
}

#[derive(Debug, Deserialize)]
struct RestPayload {
    #[serde(default)]
    data: RestData,
}

#[derive(Debug, Default, Deserialize)]
struct RestData {
    #[serde(default)]
    prefixes: Vec<RestPrefix>,
    rir_allocation: Option<RirAllocation>,
}

#[derive(Debug, Deserialize)]
struct RestPrefix {
    #[serde(default)]
    prefix: String,
    asn: Option<RestAsn>,
}

#[derive(Debug, Deserialize)]
struct RestAsn {
    asn: Option<serde_json::Value>,
    description_short: Option<String>,
    name: Option<String>,
    country_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RirAllocation {
    rir_name: Option<String>,
    date_allocated: Option<String>,
}

/// Parse a REST API response body into a result for `ip`
///
/// Only the FIRST entry of `data.prefixes` is considered; no attempt is
/// made to rank candidates by specificity. Registry and allocation date
/// come from `data.rir_allocation` and default to empty when absent.
pub fn parse_rest_payload(ip: &str, body: &str) -> Result<AsnResult, LookupError> {
    // A body that is not JSON at all counts as a transport-level failure;
    // only shape problems inside valid JSON are format errors.
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        LookupError::UpstreamUnreachable(format!("fallback returned non-JSON body: {e}"))
    })?;
    let payload: RestPayload = serde_json::from_value(value).map_err(|e| {
        LookupError::ResponseFormat(format!("unexpected fallback payload shape: {e}"))
    })?;

    let first = payload.data.prefixes.into_iter().next().ok_or_else(|| {
        LookupError::ResponseFormat("fallback returned no prefixes".to_string())
    })?;
    let asn_entry = first.asn.ok_or_else(|| {
        LookupError::ResponseFormat("fallback prefix entry has no ASN object".to_string())
    })?;

    let rir = payload.data.rir_allocation;
    let registry = rir
        .as_ref()
        .and_then(|r| r.rir_name.clone())
        .unwrap_or_default()
        .to_lowercase();
    let allocated_date = rir.and_then(|r| r.date_allocated).unwrap_or_default();

    // Prefer the short description; an empty value falls through to the
    // long name the same way an absent one does
    let as_name = asn_entry
        .description_short
        .filter(|s| !s.is_empty())
        .or(asn_entry.name)
        .unwrap_or_default();

    Ok(AsnResult {
        ip: ip.to_string(),
        asn: coerce_asn(asn_entry.asn.as_ref())?,
        bgp_prefix: first.prefix,
        country_code: asn_entry.country_code.unwrap_or_default(),
        registry,
        allocated_date,
        as_name,
        source: Source::Rest,
    })
}

/// Coerce the upstream `asn` value to a positive integer
///
/// The API serves the ASN as a JSON number; numeric strings are
/// tolerated as well.
fn coerce_asn(value: Option<&serde_json::Value>) -> Result<u32, LookupError> {
    let parsed = match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Some(serde_json::Value::String(s)) => s.trim().parse::<u32>().ok(),
        _ => None,
    };

    match parsed {
        Some(asn) if asn > 0 => Ok(asn),
        _ => Err(LookupError::ResponseFormat(
            "invalid ASN value from fallback service".to_string(),
        )),
    }
}

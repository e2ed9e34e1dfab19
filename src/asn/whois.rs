//! Primary ASN lookup over the Team Cymru-style WHOIS protocol
//!
//! The exchange is a single verbose query line over a TCP connection to
//! port 43, answered with a pipe-delimited plaintext table.

use super::error::LookupError;
use super::types::{AsnResult, Source};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Default WHOIS resolver host
pub const DEFAULT_WHOIS_HOST: &str = "whois.cymru.com";

/// Well-known WHOIS service port
pub const WHOIS_PORT: u16 = 43;

/// Client for the line-oriented WHOIS resolver
#[derive(Debug, Clone)]
pub struct WhoisClient {
    host: String,
    port: u16,
}

impl WhoisClient {
    /// Create a client for the given resolver host on the standard port
    pub fn new(host: impl Into<String>) -> Self {
        Self::with_port(host, WHOIS_PORT)
    }

    /// Create a client for a specific host and port
    pub fn with_port(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Resolve an already-normalized IP address
    ///
    /// The timeout bounds the whole exchange as one budget: connect,
    /// write, and the read loop. Expiry is reported as
    /// [`LookupError::UpstreamUnreachable`], the same as any other
    /// network failure, so the caller's failover policy does not need to
    /// distinguish them.
    pub async fn lookup(&self, ip: &str, timeout: Duration) -> Result<AsnResult, LookupError> {
        let raw = tokio::time::timeout(timeout, self.exchange(ip))
            .await
            .map_err(|_| {
                LookupError::UpstreamUnreachable(format!(
                    "whois query to {}:{} timed out",
                    self.host, self.port
                ))
            })??;
        parse_verbose_response(ip, &raw)
    }

    async fn exchange(&self, ip: &str) -> Result<String, LookupError> {
        let mut stream = TcpStream::connect((self.host.as_str(), self.port))
            .await
            .map_err(|e| {
                LookupError::UpstreamUnreachable(format!(
                    "connect to {}:{} failed: {e}",
                    self.host, self.port
                ))
            })?;

        let query = format!(" -v {ip}\n");
        stream
            .write_all(query.as_bytes())
            .await
            .map_err(|e| LookupError::UpstreamUnreachable(format!("whois send failed: {e}")))?;
        // Half-close the write side so the server knows the query is complete
        stream
            .shutdown()
            .await
            .map_err(|e| LookupError::UpstreamUnreachable(format!("whois shutdown failed: {e}")))?;

        let mut body = Vec::new();
        stream
            .read_to_end(&mut body)
            .await
            .map_err(|e| LookupError::UpstreamUnreachable(format!("whois read failed: {e}")))?;

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Parse a verbose WHOIS response body into a result for `ip`
///
/// The response carries a header line followed by one or more data
/// lines. The last non-empty line is parsed: by protocol convention it
/// is the most specific match.
pub fn parse_verbose_response(ip: &str, raw: &str) -> Result<AsnResult, LookupError> {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    match lines.last() {
        Some(line) if lines.len() >= 2 => parse_verbose_line(ip, line),
        _ => Err(LookupError::ResponseFormat(
            "whois response has no data lines".to_string(),
        )),
    }
}

/// Parse one pipe-delimited verbose data line:
/// `ASN | IP | BGP Prefix | CC | Registry | Allocated | AS Name`
fn parse_verbose_line(ip: &str, line: &str) -> Result<AsnResult, LookupError> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    if fields.len() < 7 {
        return Err(LookupError::ResponseFormat(format!(
            "expected 7 whois fields, got {}",
            fields.len()
        )));
    }

    Ok(AsnResult {
        ip: ip.to_string(),
        asn: parse_asn_field(fields[0])?,
        bgp_prefix: fields[2].to_string(),
        country_code: fields[3].to_string(),
        registry: fields[4].to_lowercase(),
        allocated_date: fields[5].to_string(),
        as_name: fields[6].to_string(),
        source: Source::Whois,
    })
}

/// Parse an ASN field, tolerating an optional case-insensitive "AS" prefix
fn parse_asn_field(field: &str) -> Result<u32, LookupError> {
    let digits = match field.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("as") => &field[2..],
        _ => field,
    };

    match digits.trim().parse::<u32>() {
        Ok(asn) if asn > 0 => Ok(asn),
        _ => Err(LookupError::ResponseFormat(format!(
            "invalid ASN value from whois: {field:?}"
        ))),
    }
}

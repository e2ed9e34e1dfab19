//! Error types for ASN lookup operations

use thiserror::Error;

/// Errors that can occur while resolving an IP address to its ASN
#[derive(Debug, Error)]
pub enum LookupError {
    /// The input is not a syntactically valid IPv4 or IPv6 literal
    ///
    /// Carries the original raw input. Never retried and never failed
    /// over; the orchestrator returns it before any upstream is
    /// contacted.
    #[error("invalid IP address: {0}")]
    InvalidAddress(String),

    /// A network-level failure reaching an upstream
    ///
    /// Covers connect refusal, DNS failure, resets, transport errors,
    /// and an expired timeout anywhere in the exchange.
    #[error("unable to reach upstream ASN service: {0}")]
    UpstreamUnreachable(String),

    /// The upstream was reachable but returned nonconforming data
    ///
    /// Too few lines or fields, a non-numeric ASN, an empty prefix list.
    #[error("unexpected upstream response format: {0}")]
    ResponseFormat(String),
}

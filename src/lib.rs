//! asnd - IP-to-ASN resolution with two-tier upstream failover
//!
//! This library provides the core functionality for resolving an IP
//! address to its Autonomous System attribution, along with the
//! sliding-window rate limiter and HTTP host layer of the bundled service.

pub mod asn;
pub mod config;
pub mod rate_limit;
pub mod server;

// Re-export core types for library users
pub use asn::{AsnResult, LookupError, Resolver, Source};
pub use config::Settings;
pub use rate_limit::{RateDecision, RateLimiter};

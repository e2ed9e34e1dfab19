//! ASN (Autonomous System Number) resolution functionality

pub mod error;
pub mod normalize;
pub mod resolver;
pub mod rest;
pub mod types;
pub mod whois;

pub use error::LookupError;
pub use normalize::normalize_ip;
pub use resolver::{AsnSource, Resolver, DEFAULT_LOOKUP_TIMEOUT};
pub use rest::RestClient;
pub use types::{AsnResult, Source};
pub use whois::WhoisClient;

//! IP address validation and canonicalization

use super::error::LookupError;
use std::net::IpAddr;

/// Validate `raw` as an IPv4 or IPv6 literal and return its canonical
/// text form
///
/// Accepts dotted-quad IPv4 and compressed, zone-free IPv6. The output
/// is the standard library's canonical rendering (IPv6 compressed with
/// hextet leading zeros stripped), so normalizing an already-normalized
/// address is a no-op. Anything that is not an address literal fails
/// with [`LookupError::InvalidAddress`] carrying the raw input.
pub fn normalize_ip(raw: &str) -> Result<String, LookupError> {
    raw.parse::<IpAddr>()
        .map(|addr| addr.to_string())
        .map_err(|_| LookupError::InvalidAddress(raw.to_string()))
}

//! Core value types for ASN resolution

use serde::{Deserialize, Serialize};

/// Which upstream produced a resolution result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    /// The line-oriented WHOIS protocol on port 43
    Whois,
    /// The JSON REST fallback API
    Rest,
}

/// A resolved IP-to-ASN mapping
///
/// Built fresh by one of the upstream clients on every lookup and handed
/// to the caller by value; never cached or mutated. The ASN is always
/// positive — a response without a resolvable ASN becomes an error
/// instead of a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsnResult {
    /// Canonical text form of the queried IP address
    pub ip: String,
    /// Autonomous System Number (e.g., 13335)
    pub asn: u32,
    /// Announced BGP prefix containing the IP, in CIDR notation
    pub bgp_prefix: String,
    /// Two-letter country code, may be empty
    pub country_code: String,
    /// Regional Internet Registry name, lower-cased, may be empty
    pub registry: String,
    /// Allocation date in the upstream's native format, not reparsed
    pub allocated_date: String,
    /// AS holder/organization name, may be empty
    pub as_name: String,
    /// Upstream that produced this result
    pub source: Source,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_serialization() {
        assert_eq!(
            serde_json::to_string(&Source::Whois).unwrap(),
            "\"whois\""
        );
        assert_eq!(serde_json::to_string(&Source::Rest).unwrap(), "\"rest\"");
    }

    #[test]
    fn test_result_json_shape() {
        let result = AsnResult {
            ip: "1.1.1.1".to_string(),
            asn: 13335,
            bgp_prefix: "1.1.1.0/24".to_string(),
            country_code: "AU".to_string(),
            registry: "apnic".to_string(),
            allocated_date: "2011-08-11".to_string(),
            as_name: "CLOUDFLARENET".to_string(),
            source: Source::Whois,
        };

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&result).unwrap()).unwrap();
        assert_eq!(json["ip"], "1.1.1.1");
        assert_eq!(json["asn"], 13335);
        assert_eq!(json["bgp_prefix"], "1.1.1.0/24");
        assert_eq!(json["source"], "whois");
    }
}

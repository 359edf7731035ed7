//! Target address validation.
//!
//! A target is a literal IPv4 or IPv6 address. Hostnames are never resolved
//! and reachability is never checked here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// Check that a string is a well-formed IPv4 or IPv6 literal.
///
/// Rejects the empty string, partial or out-of-range octets, malformed IPv6
/// groups and surrounding whitespace.
pub fn is_valid_address(candidate: &str) -> bool {
    candidate.parse::<IpAddr>().is_ok()
}

/// A validated scan target.
///
/// Keeps the text exactly as entered next to the parsed address, so
/// `::0001` stays `::0001` in the list file and in reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetAddress {
    raw: String,
    ip: IpAddr,
}

/// Error type for target parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("{0} is not a valid IP address")]
    InvalidAddress(String),
}

impl TargetAddress {
    /// Parse a target, keeping its original spelling.
    pub fn parse(s: &str) -> Result<Self, TargetError> {
        let ip = s
            .parse::<IpAddr>()
            .map_err(|_| TargetError::InvalidAddress(s.to_string()))?;
        Ok(Self {
            raw: s.to_string(),
            ip,
        })
    }

    /// The address as it was entered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed address.
    pub fn ip(&self) -> IpAddr {
        self.ip
    }
}

impl FromStr for TargetAddress {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TargetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_known_literals() {
        let cases = [
            ("192.168.1.1", true),
            ("10.0.0.255", true),
            ("0.0.0.0", true),
            ("::1", true),
            ("fe80::1", true),
            ("2001:db8::8a2e:370:7334", true),
            ("::ffff:192.0.2.1", true),
            ("256.1.1.1", false),
            ("192.168.1", false),
            ("192.168.1.", false),
            ("1.2.3.4.5", false),
            ("not-an-ip", false),
            ("example.com", false),
            ("", false),
            (" 10.0.0.1", false),
            ("2001:db8:::1", false),
            ("12345::1", false),
            ("gggg::1", false),
            ("192.168.1.1/24", false),
        ];

        for (input, expected) in cases {
            assert_eq!(is_valid_address(input), expected, "input: {input:?}");
        }
    }

    #[test]
    fn test_target_keeps_original_spelling() {
        let target = TargetAddress::parse("::0001").unwrap();
        assert_eq!(target.as_str(), "::0001");
        assert_eq!(target.ip(), "::1".parse::<IpAddr>().unwrap());
        assert!(target.ip().is_ipv6());
    }

    #[test]
    fn test_target_rejects_invalid() {
        let err = "300.0.0.1".parse::<TargetAddress>().unwrap_err();
        assert_eq!(err, TargetError::InvalidAddress("300.0.0.1".to_string()));
        assert_eq!(err.to_string(), "300.0.0.1 is not a valid IP address");
    }
}

//! Port scan service abstraction.
//!
//! The orchestrator never probes anything itself. It hands each address to a
//! [`PortScanService`] and reads back reachability and per-port states, which
//! keeps the engine swappable and lets tests run without network access.

use crate::error::ScanResult;
use crate::types::{Port, PortSpec};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// Transport protocol of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "tcp"),
            Self::Udp => write!(f, "udp"),
        }
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tcp" => Ok(Self::Tcp),
            "udp" => Ok(Self::Udp),
            _ => Err(format!("unknown protocol: {}", s)),
        }
    }
}

/// State of a scanned port, as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortState {
    /// Port is open (service listening).
    Open,
    /// Port is closed (no service, RST received).
    Closed,
    /// Port is filtered (no response, possibly by firewall).
    Filtered,
    /// Port is reachable but open/closed could not be told apart.
    Unfiltered,
    /// Port is either open or filtered (UDP-specific ambiguity).
    #[serde(rename = "open|filtered")]
    OpenFiltered,
    /// Port is either closed or filtered.
    #[serde(rename = "closed|filtered")]
    ClosedFiltered,
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Filtered => write!(f, "filtered"),
            Self::Unfiltered => write!(f, "unfiltered"),
            Self::OpenFiltered => write!(f, "open|filtered"),
            Self::ClosedFiltered => write!(f, "closed|filtered"),
        }
    }
}

impl FromStr for PortState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            "filtered" => Ok(Self::Filtered),
            "unfiltered" => Ok(Self::Unfiltered),
            "open|filtered" => Ok(Self::OpenFiltered),
            "closed|filtered" => Ok(Self::ClosedFiltered),
            _ => Err(format!("unknown port state: {}", s)),
        }
    }
}

/// One port line under a protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortEntry {
    pub port: Port,
    pub state: PortState,
    /// Service name guessed by the engine, if it gave one.
    pub service: Option<String>,
}

impl PortEntry {
    /// Create an entry without a service name.
    pub fn new(port: Port, state: PortState) -> Self {
        Self {
            port,
            state,
            service: None,
        }
    }

    /// Set the service name.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }
}

/// All ports the engine reported for one protocol, in reported order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolReport {
    pub protocol: Protocol,
    pub ports: Vec<PortEntry>,
}

impl ProtocolReport {
    pub fn new(protocol: Protocol, ports: Vec<PortEntry>) -> Self {
        Self { protocol, ports }
    }
}

/// What the engine learned about one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostScan {
    /// The host did not answer host discovery.
    Down,
    /// The host is up; protocols in reported order.
    Up(Vec<ProtocolReport>),
}

/// Trait for port scan engines.
///
/// Implementations are free to block for as long as their own timeouts
/// allow. Errors are per host; the orchestrator keeps going after one.
///
/// # Example
///
/// ```ignore
/// use scout::scanner::{HostScan, PortScanService};
///
/// async fn is_up<S: PortScanService>(service: &S, addr: IpAddr, ports: &PortSpec) -> bool {
///     matches!(service.scan_host(addr, ports).await, Ok(HostScan::Up(_)))
/// }
/// ```
#[async_trait]
pub trait PortScanService: Send + Sync {
    /// Short engine name for messages.
    fn name(&self) -> &str;

    /// Scan one host over the given ports.
    async fn scan_host(&self, addr: IpAddr, ports: &PortSpec) -> ScanResult<HostScan>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_state_parses_engine_states() {
        assert_eq!("open".parse::<PortState>().unwrap(), PortState::Open);
        assert_eq!("Filtered".parse::<PortState>().unwrap(), PortState::Filtered);
        assert_eq!(
            "closed|filtered".parse::<PortState>().unwrap(),
            PortState::ClosedFiltered
        );
        assert!("weird".parse::<PortState>().is_err());
    }

    #[test]
    fn test_protocol_from_str() {
        assert_eq!("tcp".parse::<Protocol>().unwrap(), Protocol::Tcp);
        assert_eq!("UDP".parse::<Protocol>().unwrap(), Protocol::Udp);
        assert!("sctp".parse::<Protocol>().is_err());
    }

    #[test]
    fn test_port_state_serializes_like_engine() {
        let json = serde_json::to_string(&PortState::OpenFiltered).unwrap();
        assert_eq!(json, "\"open|filtered\"");
    }
}

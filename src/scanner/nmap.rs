//! nmap-backed port scan service.
//!
//! Runs the `nmap` binary once per host with grepable output (`-oG -`) on
//! stdout and turns its `Host:` lines into a [`HostScan`].
//!
//! # Output format
//!
//! ```text
//! # Nmap 7.94 scan initiated ... as: nmap -p 1-1024 -oG - 192.168.1.1
//! Host: 192.168.1.1 ()	Status: Up
//! Host: 192.168.1.1 ()	Ports: 22/open/tcp//ssh///, 80/closed/tcp//http///	Ignored State: filtered (1022)
//! # Nmap done at ... -- 1 IP address (1 host up) scanned in 2.10 seconds
//! ```
//!
//! Hosts that fail discovery produce no `Host:` line at all.
//!
//! # Privileges
//!
//! UDP scanning (`-sU`, paired with `-sS` for TCP) requires root. nmap
//! refuses both without it, so an unprivileged run drops back to its
//! default TCP connect scan.

use crate::error::{ScanError, ScanResult};
use crate::scanner::traits::{HostScan, PortEntry, PortScanService, PortState, Protocol, ProtocolReport};
use crate::types::{Port, PortSpec};
use async_trait::async_trait;
use std::io;
use std::net::IpAddr;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, warn};

/// Port scan service driving the nmap binary.
#[derive(Debug, Clone)]
pub struct NmapService {
    binary: PathBuf,
    extra_args: Vec<String>,
    udp: bool,
}

impl NmapService {
    /// Binary looked up on `PATH` when nothing else is configured.
    pub const DEFAULT_BINARY: &'static str = "nmap";

    /// Create a service using the given nmap binary.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            extra_args: Vec::new(),
            udp: false,
        }
    }

    /// Extra arguments placed before the generated ones.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// Also scan UDP (SYN + UDP scan).
    pub fn with_udp(mut self, udp: bool) -> Self {
        self.udp = udp;
        self
    }

    /// Check if the configured scan needs elevated privileges.
    pub fn requires_privileges(&self) -> bool {
        self.udp
    }

    /// Drop the privileged scan types when running without root.
    pub fn for_privileges(self, privileged: bool) -> Self {
        if privileged || !self.udp {
            return self;
        }
        warn!("UDP scanning requires root, falling back to TCP connect scan");
        self.with_udp(false)
    }

    /// Build the argument list for one host.
    pub fn command_args(&self, addr: IpAddr, ports: &PortSpec) -> Vec<String> {
        let mut args = self.extra_args.clone();
        if self.udp {
            args.extend(["-sS".to_string(), "-sU".to_string()]);
        }
        if addr.is_ipv6() {
            args.push("-6".to_string());
        }
        args.extend([
            "-p".to_string(),
            ports.to_string(),
            "-oG".to_string(),
            "-".to_string(),
            addr.to_string(),
        ]);
        args
    }
}

impl Default for NmapService {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BINARY)
    }
}

#[async_trait]
impl PortScanService for NmapService {
    fn name(&self) -> &str {
        "nmap"
    }

    async fn scan_host(&self, addr: IpAddr, ports: &PortSpec) -> ScanResult<HostScan> {
        let args = self.command_args(addr, ports);
        debug!(engine = %self.binary.display(), ?args, "running scan engine");

        let output = Command::new(&self.binary)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => ScanError::EngineNotFound(self.binary.clone()),
                _ => ScanError::Io(e),
            })?;

        if !output.status.success() {
            return Err(ScanError::EngineFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_grepable(&String::from_utf8_lossy(&output.stdout), addr)
    }
}

/// Parse nmap grepable output for one host.
///
/// Lines about other hosts are ignored. A host with neither `Status: Up`
/// nor a `Ports:` field is reported as down.
pub fn parse_grepable(output: &str, addr: IpAddr) -> ScanResult<HostScan> {
    let mut up = false;
    let mut protocols: Vec<ProtocolReport> = Vec::new();

    for line in output.lines() {
        let Some(rest) = line.strip_prefix("Host: ") else {
            continue;
        };

        let mut fields = rest.split('\t');
        let host = fields.next().and_then(|f| f.split_whitespace().next());
        if host.and_then(|h| h.parse::<IpAddr>().ok()) != Some(addr) {
            continue;
        }

        for field in fields {
            if let Some(status) = field.strip_prefix("Status: ") {
                up |= status.trim().eq_ignore_ascii_case("up");
            } else if let Some(ports) = field.strip_prefix("Ports:") {
                up = true;
                for entry in ports.split(", ").map(str::trim).filter(|e| !e.is_empty()) {
                    if let Some((protocol, port)) = parse_port_entry(entry)? {
                        push_entry(&mut protocols, protocol, port);
                    }
                }
            }
        }
    }

    if up {
        Ok(HostScan::Up(protocols))
    } else {
        Ok(HostScan::Down)
    }
}

/// Parse `port/state/protocol/owner/service/rpc/version/`.
///
/// Returns `None` for protocols or states this crate does not model.
fn parse_port_entry(entry: &str) -> ScanResult<Option<(Protocol, PortEntry)>> {
    let parts: Vec<&str> = entry.split('/').collect();
    if parts.len() < 3 {
        return Err(ScanError::InvalidOutput(format!("malformed port entry '{}'", entry)));
    }

    let port: Port = parts[0]
        .parse()
        .map_err(|e| ScanError::InvalidOutput(format!("{} in '{}'", e, entry)))?;

    let protocol = match parts[2].parse::<Protocol>() {
        Ok(protocol) => protocol,
        Err(e) => {
            debug!(entry, "skipping port entry: {}", e);
            return Ok(None);
        }
    };

    let state = match parts[1].parse::<PortState>() {
        Ok(state) => state,
        Err(e) => {
            warn!(entry, "skipping port entry: {}", e);
            return Ok(None);
        }
    };

    let mut port_entry = PortEntry::new(port, state);
    if let Some(service) = parts.get(4).filter(|s| !s.is_empty()) {
        port_entry = port_entry.with_service(*service);
    }

    Ok(Some((protocol, port_entry)))
}

fn push_entry(protocols: &mut Vec<ProtocolReport>, protocol: Protocol, entry: PortEntry) {
    match protocols.iter_mut().find(|p| p.protocol == protocol) {
        Some(report) => report.ports.push(entry),
        None => protocols.push(ProtocolReport::new(protocol, vec![entry])),
    }
}

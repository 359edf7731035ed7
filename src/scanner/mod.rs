//! Scan orchestration.
//!
//! Walks the target list in order, hands each valid address to a
//! [`PortScanService`] and flattens what comes back into [`ScanFinding`]s.
//! Hosts are scanned one at a time so output order is deterministic and a
//! failing host never takes the rest of the batch down with it.

pub mod nmap;
pub mod traits;

pub use nmap::NmapService;
pub use traits::{HostScan, PortEntry, PortScanService, PortState, Protocol, ProtocolReport};

use crate::error::ScanError;
use crate::types::{Port, PortSpec, TargetAddress};
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

/// One (protocol, port, state) observation for a reachable host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanFinding {
    /// The address as written in the target list.
    pub address: String,
    pub protocol: Protocol,
    pub port: Port,
    pub state: PortState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

/// Progress notifications emitted while a batch runs.
#[derive(Debug)]
pub enum ScanEvent<'a> {
    /// An entry was not a valid address and was not scanned.
    Skipped(&'a str),
    /// The engine is about to scan this host.
    Started(&'a TargetAddress),
    /// The host is up; `findings` rows were produced for it.
    Completed {
        target: &'a TargetAddress,
        findings: usize,
    },
    /// The host did not respond.
    HostDown(&'a TargetAddress),
    /// The engine failed for this host.
    Failed {
        target: &'a TargetAddress,
        error: &'a ScanError,
    },
}

/// Result of scanning a batch of addresses.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    /// Findings in address, protocol, then port order.
    pub findings: Vec<ScanFinding>,
    pub hosts_up: usize,
    pub hosts_down: usize,
    pub hosts_failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
}

impl ScanOutcome {
    /// Number of hosts handed to the engine.
    pub fn hosts_scanned(&self) -> usize {
        self.hosts_up + self.hosts_down + self.hosts_failed
    }

    /// Get a short summary of the scan.
    pub fn summary(&self) -> String {
        format!(
            "{} host(s) scanned - {} up, {} down, {} failed, {} skipped - {} finding(s) [{:.2}s]",
            self.hosts_scanned(),
            self.hosts_up,
            self.hosts_down,
            self.hosts_failed,
            self.skipped,
            self.findings.len(),
            self.duration_ms as f64 / 1000.0
        )
    }
}

/// Scan every address in order.
///
/// Invalid entries are reported through `on_event` and never reach the
/// service. Engine errors are reported and the batch moves on.
pub async fn run_scan<S, F>(
    service: &S,
    addresses: &[String],
    ports: &PortSpec,
    mut on_event: F,
) -> ScanOutcome
where
    S: PortScanService + ?Sized,
    F: FnMut(ScanEvent<'_>),
{
    let start_time = Instant::now();
    let mut outcome = ScanOutcome::default();

    for raw in addresses {
        let Ok(target) = TargetAddress::parse(raw) else {
            warn!(entry = %raw, "skipping invalid address");
            outcome.skipped += 1;
            on_event(ScanEvent::Skipped(raw));
            continue;
        };

        on_event(ScanEvent::Started(&target));

        match service.scan_host(target.ip(), ports).await {
            Ok(HostScan::Down) => {
                info!(address = %target, "host is down or unresponsive");
                outcome.hosts_down += 1;
                on_event(ScanEvent::HostDown(&target));
            }
            Ok(HostScan::Up(protocols)) => {
                let before = outcome.findings.len();
                outcome.findings.extend(flatten(&target, protocols));
                let findings = outcome.findings.len() - before;

                info!(address = %target, findings, "host scanned");
                outcome.hosts_up += 1;
                on_event(ScanEvent::Completed {
                    target: &target,
                    findings,
                });
            }
            Err(error) => {
                warn!(address = %target, engine = service.name(), "scan failed: {}", error);
                outcome.hosts_failed += 1;
                on_event(ScanEvent::Failed {
                    target: &target,
                    error: &error,
                });
            }
        }
    }

    outcome.duration_ms = start_time.elapsed().as_millis() as u64;
    info!("{}", outcome.summary());
    outcome
}

fn flatten(
    target: &TargetAddress,
    protocols: Vec<ProtocolReport>,
) -> impl Iterator<Item = ScanFinding> + '_ {
    protocols.into_iter().flat_map(move |report| {
        report.ports.into_iter().map(move |entry| ScanFinding {
            address: target.to_string(),
            protocol: report.protocol,
            port: entry.port,
            state: entry.state,
            service: entry.service,
        })
    })
}

/// Check if running with root/admin privileges.
pub fn is_root() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}

//! # Scout - Menu-Driven Network Reconnaissance
//!
//! Scout keeps a list of target IP addresses in a plain text file, runs a
//! port scan engine (nmap) against each of them over ports 1-1024 and
//! renders the findings as a table that can be saved to a file.
//!
//! ## Features
//!
//! - **Target List**: add, remove, view and clear addresses in a flat file
//! - **Validation**: only IPv4/IPv6 literals are stored or scanned
//! - **Engine Abstraction**: probing is delegated to a `PortScanService`
//! - **Failure Isolation**: one unreachable or failing host never stops the batch
//! - **Reports**: on-screen table, saved as table, CSV or JSON
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use scout::scanner::{run_scan, NmapService};
//! use scout::storage::{AddressRepository, TextFileStore};
//! use scout::types::PortSpec;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = TextFileStore::default();
//!     let addresses = store.list().unwrap().into_entries();
//!
//!     let outcome = run_scan(&NmapService::default(), &addresses, &PortSpec::default(), |_| {}).await;
//!     println!("{}", scout::output::render_table(&outcome.findings));
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Validated addresses and port specifications
//! - [`storage`] - Target list persistence behind `AddressRepository`
//! - [`scanner`] - Scan orchestration and the nmap engine
//! - [`output`] - Report rendering and saving
//! - [`config`] - Settings file handling
//! - [`cli`] - Startup flags and the interactive menu
//! - [`error`] - Error types

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ConfigError, ReportError, ScanError, StoreError};
pub use scanner::{HostScan, PortScanService, PortState, Protocol, ScanFinding};
pub use storage::{AddressRepository, TextFileStore};
pub use types::{is_valid_address, Port, PortSpec, TargetAddress};

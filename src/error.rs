//! Error types for Scout.
//!
//! Uses `thiserror` for ergonomic error definitions. Each concern gets its
//! own enum so callers can decide what is recoverable.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

use crate::types::PortError;

/// Errors raised by the address store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0} is not a valid IP address")]
    InvalidAddress(String),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while talking to the port scan engine.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("scan engine not found: {}", .0.display())]
    EngineNotFound(PathBuf),

    #[error("scan engine exited with {status}: {stderr}")]
    EngineFailed { status: ExitStatus, stderr: String },

    #[error("unreadable scan engine output: {0}")]
    InvalidOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while rendering or saving a report.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while loading settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {}: {reason}", path.display())]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings file: {0}")]
    InvalidFormat(String),

    #[error("invalid port specification: {0}")]
    InvalidPorts(#[from] PortError),
}

/// Errors that end the interactive session.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("console I/O failed: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Result type alias for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for the interactive session.
pub type CliResult<T> = Result<T, CliError>;

//! Application settings and paths.
//!
//! Settings live in an optional JSON file in the XDG config directory
//! (`~/.config/scout/settings.json` on Linux). Missing keys take defaults.

use crate::error::{ConfigError, ConfigResult};
use crate::output::ReportFormat;
use crate::scanner::NmapService;
use crate::storage::TextFileStore;
use crate::types::PortSpec;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application directory paths following XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/scout)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the platform directories. Nothing is created.
    pub fn discover() -> ConfigResult<Self> {
        let project =
            ProjectDirs::from("com", "scout", "scout").ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// File holding the target list.
    pub list_file: PathBuf,
    /// Ports handed to the scan engine.
    pub ports: String,
    /// nmap binary, looked up on PATH when relative.
    pub nmap_path: PathBuf,
    /// Extra nmap arguments, e.g. `["-T4"]`.
    pub nmap_args: Vec<String>,
    /// Scan UDP as well as TCP (needs root).
    pub scan_udp: bool,
    /// Format used when saving reports.
    pub report_format: ReportFormat,
    /// Show a spinner while a host is being scanned.
    pub show_progress: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            list_file: PathBuf::from(TextFileStore::DEFAULT_FILE),
            ports: PortSpec::DEFAULT.to_string(),
            nmap_path: PathBuf::from(NmapService::DEFAULT_BINARY),
            nmap_args: Vec::new(),
            scan_udp: false,
            report_format: ReportFormat::Table,
            show_progress: true,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location.
    ///
    /// Falls back to defaults when there is no config directory or no file.
    pub fn load() -> ConfigResult<Self> {
        let file = match Paths::discover() {
            Ok(paths) => paths.settings_file(),
            Err(e) => {
                debug!("using default settings: {}", e);
                return Ok(Self::default());
            }
        };

        if !file.exists() {
            debug!(path = %file.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        settings.port_spec()?;

        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Parse the configured ports.
    pub fn port_spec(&self) -> ConfigResult<PortSpec> {
        Ok(self.ports.parse()?)
    }
}

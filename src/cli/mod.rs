//! Command-line arguments and the interactive session.
//!
//! Uses `clap` derive macros for the few startup flags; everything else
//! happens in the [`Menu`] loop.

mod menu;
mod terminal;

pub use menu::{transition, Menu, MenuChoice, MenuState};
pub use terminal::{print_error, Terminal};

use crate::config::AppSettings;
use crate::error::ConfigResult;
use clap::Parser;
use std::path::PathBuf;

/// Scout - keep a list of targets and scan them with nmap.
///
/// Starts an interactive menu for adding, removing and scanning target
/// addresses. Results can be saved as a table, CSV or JSON.
#[derive(Parser, Debug)]
#[command(name = "scout")]
#[command(author = "HueCodes <huecodes@proton.me>")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Menu-driven network reconnaissance", long_about = None)]
pub struct Cli {
    /// File holding the target list
    #[arg(short, long, value_name = "PATH")]
    pub list: Option<PathBuf>,

    /// Path to custom configuration file
    #[arg(long, env = "SCOUT_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// nmap binary to run
    #[arg(long, value_name = "PATH")]
    pub nmap: Option<PathBuf>,

    /// Scan UDP ports as well as TCP (requires root)
    #[arg(long)]
    pub udp: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Load settings and apply command-line overrides.
    pub fn settings(&self) -> ConfigResult<AppSettings> {
        let mut settings = match &self.config {
            Some(path) => AppSettings::load_from(path)?,
            None => AppSettings::load()?,
        };

        if let Some(list) = &self.list {
            settings.list_file = list.clone();
        }
        if let Some(nmap) = &self.nmap {
            settings.nmap_path = nmap.clone();
        }
        if self.udp {
            settings.scan_udp = true;
        }

        Ok(settings)
    }

    /// Default log filter for the requested verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_flags_override_settings_file() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("settings.json");
        fs::write(&config, r#"{ "list_file": "from-file.txt", "nmap_path": "/opt/nmap" }"#).unwrap();

        let cli = Cli::parse_from([
            "scout",
            "--config",
            config.to_str().unwrap(),
            "--list",
            "targets.txt",
            "--udp",
            "-vv",
        ]);
        let settings = cli.settings().unwrap();

        assert_eq!(settings.list_file, PathBuf::from("targets.txt"));
        assert_eq!(settings.nmap_path, PathBuf::from("/opt/nmap"));
        assert!(settings.scan_udp);
        assert_eq!(cli.log_filter(), "debug");
    }

    #[test]
    fn test_default_verbosity() {
        let cli = Cli::parse_from(["scout"]);
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.log_filter(), "warn");
    }
}

//! Report rendering and persistence.
//!
//! The screen always shows the bordered table. Saved reports use the
//! configured [`ReportFormat`], which defaults to the same table.

mod csv_format;
mod json_format;
mod table;

pub use csv_format::render_csv;
pub use json_format::render_json;
pub use table::{render_table, HEADERS};

use crate::error::{ReportError, ReportResult};
use crate::scanner::ScanFinding;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Format used for saved reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Same table as shown on screen
    #[default]
    Table,
    /// CSV format for data analysis
    Csv,
    /// JSON structured output
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Render findings in the given format.
pub fn render(findings: &[ScanFinding], format: ReportFormat) -> ReportResult<String> {
    match format {
        ReportFormat::Table => Ok(render_table(findings)),
        ReportFormat::Csv => render_csv(findings),
        ReportFormat::Json => render_json(findings),
    }
}

/// Write a rendered report, replacing any existing file.
///
/// The block is written verbatim followed by a newline.
pub fn save_report(block: &str, path: &Path) -> ReportResult<()> {
    let mut content = String::with_capacity(block.len() + 1);
    content.push_str(block);
    if !content.ends_with('\n') {
        content.push('\n');
    }

    fs::write(path, content).map_err(|source| ReportError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), "saved scan report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{PortState, Protocol};
    use crate::types::Port;
    use tempfile::tempdir;

    fn finding() -> ScanFinding {
        ScanFinding {
            address: "10.0.0.1".to_string(),
            protocol: Protocol::Tcp,
            port: Port::new(22).unwrap(),
            state: PortState::Open,
            service: Some("ssh".to_string()),
        }
    }

    #[test]
    fn test_save_overwrites_with_trailing_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scan_results.txt");
        std::fs::write(&path, "old contents that are longer than the block\n").unwrap();

        let block = render_table(&[finding()]);
        save_report(&block, &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), format!("{}\n", block));
    }

    #[test]
    fn test_save_surfaces_filesystem_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("report.txt");

        let err = save_report("x", &path).unwrap_err();
        assert!(matches!(err, ReportError::WriteFailed { .. }));
        assert!(err.to_string().contains("report.txt"));
    }

    #[test]
    fn test_render_dispatches_on_format() {
        let findings = [finding()];
        assert_eq!(render(&findings, ReportFormat::Table).unwrap(), render_table(&findings));
        assert!(render(&findings, ReportFormat::Csv).unwrap().starts_with("address,"));
        assert!(render(&findings, ReportFormat::Json).unwrap().starts_with('['));
    }

    #[test]
    fn test_report_format_from_settings_text() {
        let format: ReportFormat = serde_json::from_str("\"csv\"").unwrap();
        assert_eq!(format, ReportFormat::Csv);
        assert_eq!(ReportFormat::default(), ReportFormat::Table);
    }
}

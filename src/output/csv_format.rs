//! CSV report formatting.

use crate::error::ReportResult;
use crate::scanner::ScanFinding;

/// Render findings as CSV with a header row.
pub fn render_csv(findings: &[ScanFinding]) -> ReportResult<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["address", "protocol", "port", "state", "service"])?;

    for finding in findings {
        let protocol = finding.protocol.to_string();
        let port = finding.port.to_string();
        let state = finding.state.to_string();
        wtr.write_record([
            finding.address.as_str(),
            protocol.as_str(),
            port.as_str(),
            state.as_str(),
            finding.service.as_deref().unwrap_or(""),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

//! Plain bordered table.

use crate::scanner::ScanFinding;
use comfy_table::presets::ASCII_FULL_CONDENSED;
use comfy_table::{Cell, ContentArrangement, Table, TableComponent};

/// Column headers, in display order.
pub const HEADERS: [&str; 4] = ["IP Address", "Protocol", "Port", "State"];

/// Render findings as a bordered table.
///
/// The header row is always present. Column widths fit the widest cell and
/// there is no trailing newline.
pub fn render_table(findings: &[ScanFinding]) -> String {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL_CONDENSED)
        .set_style(TableComponent::HeaderLines, '-')
        .set_style(TableComponent::MiddleHeaderIntersections, '+')
        .set_content_arrangement(ContentArrangement::Disabled)
        .force_no_tty()
        .set_header(HEADERS);

    for finding in findings {
        table.add_row(vec![
            Cell::new(&finding.address),
            Cell::new(finding.protocol),
            Cell::new(finding.port),
            Cell::new(finding.state),
        ]);
    }

    table.to_string()
}

//! JSON report formatting.

use crate::error::ReportResult;
use crate::scanner::ScanFinding;

/// Render findings as a pretty-printed JSON array.
pub fn render_json(findings: &[ScanFinding]) -> ReportResult<String> {
    Ok(serde_json::to_string_pretty(findings)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{PortState, Protocol};
    use crate::types::Port;

    #[test]
    fn test_json_fields() {
        let findings = [ScanFinding {
            address: "10.0.0.1".to_string(),
            protocol: Protocol::Tcp,
            port: Port::new(22).unwrap(),
            state: PortState::Open,
            service: None,
        }];

        let value: serde_json::Value = serde_json::from_str(&render_json(&findings).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "address": "10.0.0.1",
                "protocol": "tcp",
                "port": 22,
                "state": "open"
            }])
        );
    }
}

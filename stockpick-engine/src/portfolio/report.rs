//! Alert report rendering.

use super::types::{Alert, AlertKind, AlertSummary};
use crate::screener::ReportFormat;

/// Render alerts grouped by kind, most urgent first.
pub fn render_alerts(alerts: &[Alert], format: ReportFormat) -> String {
    match format {
        ReportFormat::Json => {
            serde_json::to_string_pretty(alerts).unwrap_or_else(|_| "[]".to_string())
        }
        ReportFormat::Markdown => alerts_markdown(alerts),
    }
}

fn alerts_markdown(alerts: &[Alert]) -> String {
    let summary = AlertSummary::from_alerts(alerts);
    let mut md = String::from("# Position Alerts\n\n");

    if alerts.is_empty() {
        md.push_str("_No evaluable holdings._\n");
        return md;
    }

    md.push_str(&format!(
        "{} holdings, {} need action\n\n",
        summary.total(),
        summary.actionable()
    ));

    for kind in [
        AlertKind::StopLoss,
        AlertKind::TakeProfit,
        AlertKind::Review,
        AlertKind::Hold,
    ] {
        let group: Vec<&Alert> = alerts.iter().filter(|a| a.kind == kind).collect();
        if group.is_empty() {
            continue;
        }
        md.push_str(&format!("## {} ({})\n\n", kind, group.len()));
        for alert in group {
            md.push_str(&format!(
                "- **{}** {:+.1}%: {}\n",
                alert.ticker,
                alert.gain * 100.0,
                alert.message
            ));
        }
        md.push('\n');
    }

    md
}

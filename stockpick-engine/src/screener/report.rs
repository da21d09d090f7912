//! Report generation for screening results.
//!
//! - Markdown (human-readable, with per-candidate justification)
//! - JSON (machine-readable)

use serde::{Deserialize, Serialize};

use super::engine::{ScreeningResult, ScreeningStatus};
use super::strategy::Conditions;

// ============================================================================
// Report Format
// ============================================================================

/// Supported report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    /// Markdown format (human-readable)
    Markdown,
    /// JSON format (machine-readable)
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}

// ============================================================================
// Screener Report
// ============================================================================

/// Report generator for a screening result.
pub struct ScreenerReport<'r, 'a> {
    result: &'r ScreeningResult<'a>,
}

impl<'r, 'a> ScreenerReport<'r, 'a> {
    pub fn new(result: &'r ScreeningResult<'a>) -> Self {
        Self { result }
    }

    /// Generate report in the specified format.
    pub fn generate(&self, format: ReportFormat) -> String {
        match format {
            ReportFormat::Markdown => self.to_markdown(),
            ReportFormat::Json => self.to_json(),
        }
    }

    /// Generate markdown report.
    pub fn to_markdown(&self) -> String {
        let result = self.result;
        let mut md = String::new();

        md.push_str(&format!("# Screening Report: {}\n\n", result.strategy));
        md.push_str(&format!("- **Scanned**: {} stocks\n", result.total_scanned));
        md.push_str(&format!("- **Ranked**: {} stocks\n", result.candidates.len()));
        if let Some(threshold) = result.threshold_used {
            md.push_str(&format!(
                "- **Condition threshold**: {:.0}%{}\n",
                threshold * 100.0,
                if result.relaxed { " (relaxed)" } else { "" }
            ));
        }
        md.push('\n');

        md.push_str("## Funnel\n\n");
        md.push_str("| Stage | Passed | Eliminated | Rate |\n");
        md.push_str("|-------|--------|------------|------|\n");
        for fr in &result.stages {
            md.push_str(&format!(
                "| {} | {} | {} | {:.1}% |\n",
                fr.stage, fr.passed, fr.eliminated, fr.elimination_rate
            ));
        }
        md.push('\n');

        match result.status {
            ScreeningStatus::NoQualityPassers => {
                md.push_str("_No stock passed the quality gate._\n");
                return md;
            }
            ScreeningStatus::NoStrategyMatches => {
                md.push_str("_No candidate met the strategy conditions, even after relaxation._\n");
                return md;
            }
            ScreeningStatus::Ranked => {}
        }

        md.push_str("## Candidates\n\n");
        md.push_str("| # | Ticker | Name | Score | Quality | Conditions |\n");
        md.push_str("|---|--------|------|-------|---------|------------|\n");
        for (i, c) in result.candidates.iter().enumerate() {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {}/{} |\n",
                i + 1,
                c.snapshot.ticker,
                c.snapshot.name,
                c.score,
                c.quality_score,
                c.breakdown.met(),
                c.breakdown.total()
            ));
        }
        md.push('\n');

        for c in &result.candidates {
            md.push_str(&format!("### {} {}\n\n", c.snapshot.ticker, c.snapshot.name));
            for (name, held) in c.breakdown.conditions() {
                md.push_str(&format!("- {} {}\n", if held { "✅" } else { "❌" }, name));
            }
            if !c.quality_reasons.is_empty() {
                let reasons: Vec<String> = c
                    .quality_reasons
                    .iter()
                    .map(|r| format!("{} ({:+})", r.reason, r.delta))
                    .collect();
                md.push_str(&format!("- Quality: {}\n", reasons.join("; ")));
            }
            md.push('\n');
        }

        md
    }

    /// Generate JSON report.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self.result).unwrap_or_else(|_| "{}".to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================

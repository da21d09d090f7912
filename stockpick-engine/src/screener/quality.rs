//! Quality gate for the screener.
//!
//! First stage of the funnel: an additive, uncapped point system over
//! fundamentals, liquidity and data completeness. Suspended issuers are
//! disqualified outright.

use serde::Serialize;

use super::config::QualityGateConfig;
use crate::data::{ReferenceSets, StockSnapshot};
use crate::metrics::volume_ratio;

/// Score forced onto suspended issuers.
pub const SUSPENDED_SCORE: i32 = -999;

/// Trade value above which the liquidity point is awarded.
const LIQUID_TRADE_VALUE: f64 = 50_000_000.0;

/// Volume spike multiple against the preceding 20-day average.
const VOLUME_SPIKE_MULTIPLE: f64 = 1.5;

// ============================================================================
// Gate Result
// ============================================================================

/// One scoring rule that fired.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateReason {
    pub reason: String,
    pub delta: i32,
}

/// Outcome of scoring one snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct QualityGateResult<'a> {
    pub snapshot: &'a StockSnapshot,
    pub score: i32,
    /// Fired rules in evaluation order
    pub reasons: Vec<GateReason>,
    /// Resolved margin eligibility, reused by the strategy stage
    pub margin_eligible: bool,
}

impl QualityGateResult<'_> {
    pub fn passes(&self, threshold: i32) -> bool {
        self.score >= threshold
    }

    pub fn is_suspended(&self) -> bool {
        self.score == SUSPENDED_SCORE
    }
}

// ============================================================================
// Quality Gate
// ============================================================================

/// Quality gate scorer.
pub struct QualityGate {
    config: QualityGateConfig,
}

impl QualityGate {
    pub fn new(config: QualityGateConfig) -> Self {
        Self { config }
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(QualityGateConfig::default())
    }

    pub fn threshold(&self) -> i32 {
        self.config.threshold
    }

    /// Score a snapshot. Every rule is independent except suspension, which
    /// short-circuits.
    pub fn score<'a>(&self, snapshot: &'a StockSnapshot, refs: &ReferenceSets) -> QualityGateResult<'a> {
        let margin_eligible = refs.margin_tradable(snapshot);

        if refs.is_suspended(&snapshot.ticker) {
            return QualityGateResult {
                snapshot,
                score: SUSPENDED_SCORE,
                margin_eligible,
                reasons: vec![GateReason {
                    reason: "Trading suspended".to_string(),
                    delta: SUSPENDED_SCORE,
                }],
            };
        }

        let mut reasons = Vec::new();
        let mut add = |reason: String, delta: i32| reasons.push(GateReason { reason, delta });

        // Revenue momentum
        if let Some(growth) = snapshot.revenue_growth {
            if growth > 30.0 {
                add(format!("Revenue growth {:.1}% > 30%", growth), 2);
            } else if growth > 10.0 {
                add(format!("Revenue growth {:.1}% > 10%", growth), 1);
            }
        }
        if snapshot.revenue_growth_months >= 3 {
            add(
                format!("Revenue grew {} consecutive months", snapshot.revenue_growth_months),
                1,
            );
        }

        // Liquidity
        if snapshot.trade_value > LIQUID_TRADE_VALUE {
            add("Trade value above 50M".to_string(), 1);
        }
        let ratio = volume_ratio(&snapshot.volume_history, 20);
        if ratio > VOLUME_SPIKE_MULTIPLE {
            add(format!("Volume {:.1}x the 20-day average", ratio), 1);
        }

        // Earnings
        if let Some(pe) = snapshot.pe.filter(|pe| *pe > 0.0) {
            add(format!("Profitable (P/E {:.1})", pe), 1);
        }
        if let Some(eps) = snapshot.implied_eps().filter(|eps| *eps > 2.0) {
            add(format!("Implied EPS {:.2} > 2", eps), 2);
        }

        // Sector focus
        if let Some(industry) = refs.industry_of(&snapshot.ticker) {
            if self.config.focus_industries.iter().any(|f| f == industry) {
                add(format!("Focus industry: {}", industry), 1);
            }
        }

        // Returns and leverage
        if let Some(roe) = snapshot.roe {
            if roe > 15.0 {
                add(format!("ROE {:.1}% > 15%", roe), 2);
            } else if roe > 10.0 {
                add(format!("ROE {:.1}% > 10%", roe), 1);
            }
        }
        if let Some(debt) = snapshot.debt_ratio.filter(|d| *d < 50.0) {
            add(format!("Debt ratio {:.1}% < 50%", debt), 1);
        }

        // Income and valuation
        if let Some(dy) = snapshot.dividend_yield {
            if dy > 6.0 {
                add(format!("Dividend yield {:.1}% > 6%", dy), 2);
            } else if dy > 4.0 {
                add(format!("Dividend yield {:.1}% > 4%", dy), 1);
            }
        }
        if let Some(pe) = snapshot.pe.filter(|pe| *pe > 0.0 && *pe < 20.0) {
            add(format!("P/E {:.1} under 20", pe), 1);
        }

        if margin_eligible {
            add("Margin trading eligible".to_string(), 1);
        }

        // Data completeness
        if snapshot.roe.is_some() {
            add("ROE reported".to_string(), 1);
        }
        if snapshot.dividend_yield.is_some() {
            add("Dividend yield reported".to_string(), 1);
        }

        let score = reasons.iter().map(|r| r.delta).sum();
        QualityGateResult {
            snapshot,
            score,
            reasons,
            margin_eligible,
        }
    }

    /// Score every snapshot and keep those at or above the threshold.
    pub fn filter<'a>(
        &self,
        snapshots: &[&'a StockSnapshot],
        refs: &ReferenceSets,
    ) -> Vec<QualityGateResult<'a>> {
        snapshots
            .iter()
            .map(|s| self.score(s, refs))
            .filter(|r| r.passes(self.config.threshold))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn strong_snapshot() -> StockSnapshot {
        let mut snap = StockSnapshot::new("2330", "TSMC", 600.0);
        snap.revenue_growth = Some(35.0);
        snap.revenue_growth_months = 4;
        snap.trade_value = 80_000_000.0;
        snap.pe = Some(18.0);
        snap.roe = Some(25.0);
        snap.debt_ratio = Some(30.0);
        snap.dividend_yield = Some(2.0);
        snap.margin_eligible = true;
        snap
    }

    fn delta_for(result: &QualityGateResult<'_>, prefix: &str) -> Option<i32> {
        result
            .reasons
            .iter()
            .find(|r| r.reason.starts_with(prefix))
            .map(|r| r.delta)
    }

    #[test]
    fn test_suspended_short_circuits() {
        let gate = QualityGate::with_defaults();
        let snap = strong_snapshot();
        let mut refs = ReferenceSets::default();
        refs.suspended.insert("2330".into());

        let result = gate.score(&snap, &refs);
        assert_eq!(result.score, SUSPENDED_SCORE);
        assert!(result.is_suspended());
        assert!(!result.passes(gate.threshold()));
        assert_eq!(result.reasons.len(), 1);
    }

    #[test]
    fn test_strong_snapshot_scores_every_rule() {
        let gate = QualityGate::with_defaults();
        let snap = strong_snapshot();
        let mut refs = ReferenceSets::default();
        refs.industries.insert("2330".into(), "半導體業".into());

        let result = gate.score(&snap, &refs);
        // growth 2 + months 1 + value 1 + pe>0 1 + eps(33.3) 2 + industry 1
        // + roe 2 + debt 1 + pe<20 1 + margin 1 + roe present 1 + yield present 1
        assert_eq!(result.score, 15);
        assert_eq!(delta_for(&result, "Implied EPS"), Some(2));
        assert_eq!(delta_for(&result, "Dividend yield 2"), None);
        assert!(result.passes(5));
    }

    #[test]
    fn test_tiers_are_mutually_exclusive() {
        let gate = QualityGate::with_defaults();
        let refs = ReferenceSets::default();

        let mut snap = StockSnapshot::new("1101", "Cement", 40.0);
        snap.revenue_growth = Some(15.0);
        snap.roe = Some(12.0);
        snap.dividend_yield = Some(5.0);

        let result = gate.score(&snap, &refs);
        assert_eq!(delta_for(&result, "Revenue growth"), Some(1));
        assert_eq!(delta_for(&result, "ROE 12"), Some(1));
        assert_eq!(delta_for(&result, "Dividend yield 5"), Some(1));
        // three tier points + two completeness points
        assert_eq!(result.score, 5);
    }

    #[test]
    fn test_volume_spike_needs_full_baseline() {
        let gate = QualityGate::with_defaults();
        let refs = ReferenceSets::default();

        let mut snap = StockSnapshot::new("3008", "Largan", 2000.0);
        snap.volume_history = vec![1000.0; 20];
        snap.volume_history.push(2000.0);
        assert!(delta_for(&gate.score(&snap, &refs), "Volume").is_some());

        snap.volume_history.remove(0);
        assert!(delta_for(&gate.score(&snap, &refs), "Volume").is_none());
    }

    #[test]
    fn test_margin_from_reference_set() {
        let gate = QualityGate::with_defaults();
        let snap = StockSnapshot::new("2603", "Evergreen", 150.0);
        let mut refs = ReferenceSets::default();
        assert_eq!(gate.score(&snap, &refs).score, 0);

        refs.margin_eligible.insert("2603".into());
        assert_eq!(gate.score(&snap, &refs).score, 1);
    }

    #[test]
    fn test_non_focus_industry_gets_nothing() {
        let gate = QualityGate::with_defaults();
        let snap = StockSnapshot::new("2882", "Cathay", 50.0);
        let mut refs = ReferenceSets::default();
        refs.industries.insert("2882".into(), "金融保險業".into());
        assert_eq!(gate.score(&snap, &refs).score, 0);
    }

    #[test]
    fn test_filter_keeps_passers() {
        let gate = QualityGate::with_defaults();
        let strong = strong_snapshot();
        let weak = StockSnapshot::new("9999", "Shell", 5.0);
        let refs = ReferenceSets::default();

        let passed = gate.filter(&[&strong, &weak], &refs);
        assert_eq!(passed.len(), 1);
        assert_eq!(passed[0].snapshot.ticker, "2330");
    }

    #[test]
    fn test_rule_boundaries() {
        let gate = QualityGate::with_defaults();
        let refs = ReferenceSets::default();
        let cases: &[(&str, fn(&mut StockSnapshot), &str, Option<i32>)] = &[
            ("growth 30 is the lower tier", |s: &mut StockSnapshot| s.revenue_growth = Some(30.0), "Revenue growth", Some(1)),
            ("growth 10 earns nothing", |s: &mut StockSnapshot| s.revenue_growth = Some(10.0), "Revenue growth", None),
            ("two growth months", |s: &mut StockSnapshot| s.revenue_growth_months = 2, "Revenue grew", None),
            ("three growth months", |s: &mut StockSnapshot| s.revenue_growth_months = 3, "Revenue grew", Some(1)),
            ("trade value 50M", |s: &mut StockSnapshot| s.trade_value = 50_000_000.0, "Trade value", None),
            ("roe 15 is the lower tier", |s: &mut StockSnapshot| s.roe = Some(15.0), "ROE 15", Some(1)),
            ("roe 10 earns nothing", |s: &mut StockSnapshot| s.roe = Some(10.0), "ROE 10", None),
            ("yield 6 is the lower tier", |s: &mut StockSnapshot| s.dividend_yield = Some(6.0), "Dividend yield 6", Some(1)),
            ("yield 4 earns nothing", |s: &mut StockSnapshot| s.dividend_yield = Some(4.0), "Dividend yield 4", None),
            ("pe 20 is not under 20", |s: &mut StockSnapshot| s.pe = Some(20.0), "P/E", None),
            ("pe 19.9 is under 20", |s: &mut StockSnapshot| s.pe = Some(19.9), "P/E", Some(1)),
            ("pe 0 is not profitable", |s: &mut StockSnapshot| s.pe = Some(0.0), "Profitable", None),
            ("debt 50", |s: &mut StockSnapshot| s.debt_ratio = Some(50.0), "Debt ratio", None),
            ("debt 49.9", |s: &mut StockSnapshot| s.debt_ratio = Some(49.9), "Debt ratio", Some(1)),
            ("implied eps exactly 2", |s: &mut StockSnapshot| { s.price = 40.0; s.pe = Some(20.0) }, "Implied EPS", None),
        ];

        for &(label, setup, prefix, expected) in cases {
            let mut snap = StockSnapshot::new("1234", "Boundary", 100.0);
            setup(&mut snap);
            let result = gate.score(&snap, &refs);
            assert_eq!(delta_for(&result, prefix), expected, "{}", label);
        }
    }
}


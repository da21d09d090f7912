//! Screener configuration module.
//!
//! Defines the per-run settings handed to the engine. Nothing here is
//! process-wide state: every value is passed in explicitly.

use serde::{Deserialize, Serialize};
use stockpick_common::validation::{check_range, collect_errors, Validate, ValidationError, ValidationResult};

// ============================================================================
// Strategy Settings
// ============================================================================

/// Settings supplied by the caller for one run; never mutated by the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategySettings {
    /// Per-axis weights for layer scores
    #[serde(default)]
    pub weights: ScoringWeights,

    /// Screener thresholds
    #[serde(default)]
    pub screener: ScreenerThresholds,

    /// Portfolio alert thresholds
    #[serde(default)]
    pub portfolio: PortfolioThresholds,
}

impl Validate for StrategySettings {
    fn validate(&self) -> ValidationResult<()> {
        collect_errors(vec![
            self.weights.validate(),
            self.screener.validate(),
            self.portfolio.validate(),
        ])
    }
}

/// Weights for the four layer-score axes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    #[serde(default = "default_fundamentals_weight")]
    pub fundamentals: f64,
    #[serde(default = "default_technicals_weight")]
    pub technicals: f64,
    #[serde(default = "default_momentum_weight")]
    pub momentum: f64,
    #[serde(default = "default_risk_weight")]
    pub risk: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            fundamentals: default_fundamentals_weight(),
            technicals: default_technicals_weight(),
            momentum: default_momentum_weight(),
            risk: default_risk_weight(),
        }
    }
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.fundamentals + self.technicals + self.momentum + self.risk
    }
}

impl Validate for ScoringWeights {
    fn validate(&self) -> ValidationResult<()> {
        let mut results = vec![
            check_range("weights.fundamentals", self.fundamentals, 0.0, 1.0),
            check_range("weights.technicals", self.technicals, 0.0, 1.0),
            check_range("weights.momentum", self.momentum, 0.0, 1.0),
            check_range("weights.risk", self.risk, 0.0, 1.0),
        ];
        if self.total() <= 0.0 {
            results.push(Err(ValidationError::InvalidValue {
                field: "weights".into(),
                reason: "at least one weight must be positive".into(),
            }));
        }
        collect_errors(results)
    }
}

fn default_fundamentals_weight() -> f64 {
    0.3
}

fn default_technicals_weight() -> f64 {
    0.3
}

fn default_momentum_weight() -> f64 {
    0.2
}

fn default_risk_weight() -> f64 {
    0.2
}

/// Screener thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerThresholds {
    /// Minimum revenue growth (%) for the Growth strategy
    #[serde(default = "default_min_revenue_growth")]
    pub min_revenue_growth: f64,

    /// Today's volume must exceed the 20-day average by this multiple (Breakout)
    #[serde(default = "default_volume_spike_multiplier")]
    pub volume_spike_multiplier: f64,

    /// Minimum composite score, consumed by callers ranking layer scores
    #[serde(default = "default_min_composite_score")]
    pub min_composite_score: f64,

    /// Minimum odd-lot volume, consumed by callers filtering odd-lot quotes
    #[serde(default = "default_min_odd_lot_volume")]
    pub min_odd_lot_volume: f64,
}

impl Default for ScreenerThresholds {
    fn default() -> Self {
        Self {
            min_revenue_growth: default_min_revenue_growth(),
            volume_spike_multiplier: default_volume_spike_multiplier(),
            min_composite_score: default_min_composite_score(),
            min_odd_lot_volume: default_min_odd_lot_volume(),
        }
    }
}

impl Validate for ScreenerThresholds {
    fn validate(&self) -> ValidationResult<()> {
        collect_errors(vec![
            check_range("screener.min_revenue_growth", self.min_revenue_growth, -100.0, 1000.0),
            check_range("screener.volume_spike_multiplier", self.volume_spike_multiplier, 0.0, 100.0),
            check_range("screener.min_composite_score", self.min_composite_score, 0.0, 100.0),
            check_range("screener.min_odd_lot_volume", self.min_odd_lot_volume, 0.0, f64::MAX),
        ])
    }
}

fn default_min_revenue_growth() -> f64 {
    20.0
}

fn default_volume_spike_multiplier() -> f64 {
    1.5
}

fn default_min_composite_score() -> f64 {
    60.0
}

fn default_min_odd_lot_volume() -> f64 {
    1000.0
}

/// Portfolio alert thresholds, as fractions (0.08 = 8%).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioThresholds {
    #[serde(default = "default_stop_loss")]
    pub stop_loss: f64,
    #[serde(default = "default_take_profit")]
    pub take_profit: f64,
}

impl Default for PortfolioThresholds {
    fn default() -> Self {
        Self {
            stop_loss: default_stop_loss(),
            take_profit: default_take_profit(),
        }
    }
}

impl Validate for PortfolioThresholds {
    fn validate(&self) -> ValidationResult<()> {
        collect_errors(vec![
            check_range("portfolio.stop_loss", self.stop_loss, 0.0, 1.0),
            check_range("portfolio.take_profit", self.take_profit, 0.0, 10.0),
        ])
    }
}

fn default_stop_loss() -> f64 {
    0.08
}

fn default_take_profit() -> f64 {
    0.2
}

// ============================================================================
// Screening Parameters
// ============================================================================

/// Pipeline constants made explicit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningParams {
    /// Condition-satisfaction ratio for the primary pass
    #[serde(default = "default_primary_threshold")]
    pub primary_threshold: f64,

    /// Ratio for the single relaxation retry
    #[serde(default = "default_relaxed_threshold")]
    pub relaxed_threshold: f64,

    /// Maximum number of ranked candidates returned
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for ScreeningParams {
    fn default() -> Self {
        Self {
            primary_threshold: default_primary_threshold(),
            relaxed_threshold: default_relaxed_threshold(),
            top_n: default_top_n(),
        }
    }
}

impl Validate for ScreeningParams {
    fn validate(&self) -> ValidationResult<()> {
        let mut results = vec![
            check_range("screening.primary_threshold", self.primary_threshold, 0.0, 1.0),
            check_range("screening.relaxed_threshold", self.relaxed_threshold, 0.0, 1.0),
        ];
        if self.relaxed_threshold > self.primary_threshold {
            results.push(Err(ValidationError::Conflict {
                reason: format!(
                    "relaxed_threshold {} exceeds primary_threshold {}",
                    self.relaxed_threshold, self.primary_threshold
                ),
            }));
        }
        if self.top_n == 0 {
            results.push(Err(ValidationError::InvalidValue {
                field: "screening.top_n".into(),
                reason: "must be at least 1".into(),
            }));
        }
        collect_errors(results)
    }
}

fn default_primary_threshold() -> f64 {
    0.8
}

fn default_relaxed_threshold() -> f64 {
    0.6
}

fn default_top_n() -> usize {
    10
}

// ============================================================================
// Quality Gate Configuration
// ============================================================================

/// Quality gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityGateConfig {
    /// Minimum score to pass the gate
    #[serde(default = "default_quality_threshold")]
    pub threshold: i32,

    /// Industries earning the focus bonus (exact names from the classification)
    #[serde(default = "default_focus_industries")]
    pub focus_industries: Vec<String>,
}

impl Default for QualityGateConfig {
    fn default() -> Self {
        Self {
            threshold: default_quality_threshold(),
            focus_industries: default_focus_industries(),
        }
    }
}

impl Validate for QualityGateConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.focus_industries.iter().any(|i| i.trim().is_empty()) {
            return Err(ValidationError::InvalidValue {
                field: "quality_gate.focus_industries".into(),
                reason: "industry names must not be blank".into(),
            });
        }
        Ok(())
    }
}

fn default_quality_threshold() -> i32 {
    5
}

fn default_focus_industries() -> Vec<String> {
    [
        "半導體業",
        "電子零組件業",
        "電腦及週邊設備業",
        "光電業",
        "通信網路業",
        "其他電子業",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

// ============================================================================
// Tests
// ============================================================================

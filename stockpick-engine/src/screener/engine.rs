//! Screener engine module.
//!
//! The orchestrator for a screening run: quality gate, strategy scoring with
//! a single relaxation retry, then ranking.

use std::collections::HashSet;

use serde::Serialize;
use stockpick_common::logging::generate_run_id;
use tracing::{debug, info, warn};

use super::config::{QualityGateConfig, ScoringWeights, ScreeningParams, StrategySettings};
use super::quality::{GateReason, QualityGate, QualityGateResult};
use super::strategy::{ScoreBreakdown, Strategy};
use crate::data::{ReferenceSets, StockSnapshot};

// ============================================================================
// Filter Stage
// ============================================================================

/// Filter stage identifier for tracking where stocks are eliminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FilterStage {
    /// Input stage (all stocks)
    Input,
    /// External allow-list
    PreFilter,
    /// Quality gate
    QualityGate,
    /// Strategy scoring
    Strategy,
    /// Top-N truncation
    Final,
}

impl std::fmt::Display for FilterStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => write!(f, "Input"),
            Self::PreFilter => write!(f, "Pre-filter"),
            Self::QualityGate => write!(f, "Quality gate"),
            Self::Strategy => write!(f, "Strategy"),
            Self::Final => write!(f, "Final"),
        }
    }
}

/// Result of a filtering stage.
#[derive(Debug, Clone, Serialize)]
pub struct FilterResult {
    /// Stage name
    pub stage: FilterStage,
    /// Number of stocks that passed this stage
    pub passed: usize,
    /// Number of stocks eliminated at this stage
    pub eliminated: usize,
    /// Elimination rate (%)
    pub elimination_rate: f64,
}

impl FilterResult {
    pub fn new(stage: FilterStage, input_count: usize, passed_count: usize) -> Self {
        let eliminated = input_count.saturating_sub(passed_count);
        let elimination_rate = if input_count > 0 {
            (eliminated as f64 / input_count as f64) * 100.0
        } else {
            0.0
        };

        Self {
            stage,
            passed: passed_count,
            eliminated,
            elimination_rate,
        }
    }
}

// ============================================================================
// Scored Candidate
// ============================================================================

/// Four-axis score populated by the caller, not by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LayerScore {
    pub fundamentals: f64,
    pub technicals: f64,
    pub momentum: f64,
    pub risk: f64,
}

impl LayerScore {
    /// Weighted mean of the four axes; 0 when all weights are 0.
    pub fn composite(&self, weights: &ScoringWeights) -> f64 {
        let total = weights.total();
        if total <= 0.0 {
            return 0.0;
        }
        (self.fundamentals * weights.fundamentals
            + self.technicals * weights.technicals
            + self.momentum * weights.momentum
            + self.risk * weights.risk)
            / total
    }
}

/// A stock that made the ranked list.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate<'a> {
    pub snapshot: &'a StockSnapshot,
    /// Unrounded strategy score used for ranking
    pub raw_score: f64,
    /// Rounded score for presentation
    pub score: i64,
    pub breakdown: ScoreBreakdown,
    /// Quality gate score and the rules behind it
    pub quality_score: i32,
    pub quality_reasons: Vec<GateReason>,
    /// Left for the caller to fill
    pub layer_score: Option<LayerScore>,
}

// ============================================================================
// Screening Result
// ============================================================================

/// How a screening run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScreeningStatus {
    /// At least one candidate ranked
    Ranked,
    /// Nothing passed the quality gate
    NoQualityPassers,
    /// No candidate fired even after relaxation
    NoStrategyMatches,
}

/// Result of a screening run.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningResult<'a> {
    pub strategy: Strategy,
    pub status: ScreeningStatus,
    /// Ranked candidates, best first
    pub candidates: Vec<ScoredCandidate<'a>>,
    /// Per-stage counts
    pub stages: Vec<FilterResult>,
    /// Condition threshold that produced the candidates
    pub threshold_used: Option<f64>,
    /// Whether the relaxation retry ran
    pub relaxed: bool,
    pub total_scanned: usize,
}

impl ScreeningResult<'_> {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Summary string for logging.
    pub fn summary(&self) -> String {
        match self.status {
            ScreeningStatus::Ranked => format!(
                "{} screen of {} stocks: {} ranked at threshold {:.1}{}",
                self.strategy,
                self.total_scanned,
                self.candidates.len(),
                self.threshold_used.unwrap_or_default(),
                if self.relaxed { " (relaxed)" } else { "" }
            ),
            ScreeningStatus::NoQualityPassers => format!(
                "{} screen of {} stocks: none passed the quality gate",
                self.strategy, self.total_scanned
            ),
            ScreeningStatus::NoStrategyMatches => format!(
                "{} screen of {} stocks: no candidates after relaxation",
                self.strategy, self.total_scanned
            ),
        }
    }
}

// ============================================================================
// Screener Engine
// ============================================================================

/// The screener engine.
///
/// Stateless between calls; one instance can serve any number of runs.
pub struct ScreenerEngine {
    params: ScreeningParams,
    quality_gate: QualityGate,
}

impl ScreenerEngine {
    pub fn new(params: ScreeningParams, gate_config: QualityGateConfig) -> Self {
        Self {
            params,
            quality_gate: QualityGate::new(gate_config),
        }
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ScreeningParams::default(), QualityGateConfig::default())
    }

    pub fn params(&self) -> &ScreeningParams {
        &self.params
    }

    /// Screen the full candidate set.
    pub fn screen<'a>(
        &self,
        snapshots: &'a [StockSnapshot],
        refs: &ReferenceSets,
        strategy: Strategy,
        settings: &StrategySettings,
    ) -> ScreeningResult<'a> {
        self.screen_filtered(snapshots, refs, strategy, settings, None)
    }

    /// Screen with an optional allow-list of tickers from an upstream stage.
    ///
    /// 1. Allow-list (if any)
    /// 2. Quality gate
    /// 3. Strategy at the primary threshold, retried once at the relaxed
    ///    threshold when nothing fires
    /// 4. Rank, truncate, round
    pub fn screen_filtered<'a>(
        &self,
        snapshots: &'a [StockSnapshot],
        refs: &ReferenceSets,
        strategy: Strategy,
        settings: &StrategySettings,
        allow_list: Option<&HashSet<String>>,
    ) -> ScreeningResult<'a> {
        let run_id = generate_run_id();
        let total = snapshots.len();
        let mut stages = vec![FilterResult::new(FilterStage::Input, total, total)];

        info!(run_id = %run_id, %strategy, total, "Starting screening run");

        // Stage 0: upstream allow-list
        let universe: Vec<&StockSnapshot> = match allow_list {
            Some(allowed) => {
                let kept: Vec<&StockSnapshot> = snapshots
                    .iter()
                    .filter(|s| allowed.contains(&s.ticker))
                    .collect();
                stages.push(FilterResult::new(FilterStage::PreFilter, total, kept.len()));
                debug!(run_id = %run_id, kept = kept.len(), "Applied allow-list");
                kept
            }
            None => snapshots.iter().collect(),
        };

        // Stage 1: quality gate
        let gate_passed = self.quality_gate.filter(&universe, refs);
        stages.push(FilterResult::new(
            FilterStage::QualityGate,
            universe.len(),
            gate_passed.len(),
        ));
        info!(
            run_id = %run_id,
            passed = gate_passed.len(),
            threshold = self.quality_gate.threshold(),
            "Quality gate complete"
        );

        if gate_passed.is_empty() {
            warn!(run_id = %run_id, "No stock passed the quality gate");
            return ScreeningResult {
                strategy,
                status: ScreeningStatus::NoQualityPassers,
                candidates: Vec::new(),
                stages,
                threshold_used: None,
                relaxed: false,
                total_scanned: total,
            };
        }

        // Stage 2: strategy, with one relaxation over the same set
        let mut threshold = self.params.primary_threshold;
        let mut scored = score_all(&gate_passed, strategy, threshold, settings);
        let mut relaxed = false;

        if scored.is_empty() {
            threshold = self.params.relaxed_threshold;
            relaxed = true;
            info!(
                run_id = %run_id,
                primary = self.params.primary_threshold,
                relaxed = threshold,
                "No candidate fired, relaxing condition threshold"
            );
            scored = score_all(&gate_passed, strategy, threshold, settings);
        }

        stages.push(FilterResult::new(
            FilterStage::Strategy,
            gate_passed.len(),
            scored.len(),
        ));

        if scored.is_empty() {
            warn!(run_id = %run_id, %strategy, "No candidate fired after relaxation");
            return ScreeningResult {
                strategy,
                status: ScreeningStatus::NoStrategyMatches,
                candidates: Vec::new(),
                stages,
                threshold_used: None,
                relaxed,
                total_scanned: total,
            };
        }

        // Stage 3: rank
        scored.sort_by(|a, b| {
            b.raw_score
                .partial_cmp(&a.raw_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let before_cut = scored.len();
        scored.truncate(self.params.top_n);
        stages.push(FilterResult::new(FilterStage::Final, before_cut, scored.len()));

        info!(
            run_id = %run_id,
            ranked = scored.len(),
            threshold,
            relaxed,
            "Screening run complete"
        );

        ScreeningResult {
            strategy,
            status: ScreeningStatus::Ranked,
            candidates: scored,
            stages,
            threshold_used: Some(threshold),
            relaxed,
            total_scanned: total,
        }
    }
}

/// Score every gate-passer and keep the positive scores.
fn score_all<'a>(
    gate_passed: &[QualityGateResult<'a>],
    strategy: Strategy,
    threshold: f64,
    settings: &StrategySettings,
) -> Vec<ScoredCandidate<'a>> {
    gate_passed
        .iter()
        .filter_map(|gate| {
            let result =
                strategy.evaluate_resolved(gate.snapshot, gate.margin_eligible, threshold, settings);
            if !result.fired() {
                return None;
            }
            Some(ScoredCandidate {
                snapshot: gate.snapshot,
                raw_score: result.score,
                score: result.score.round() as i64,
                breakdown: result.breakdown,
                quality_score: gate.score,
                quality_reasons: gate.reasons.clone(),
                layer_score: None,
            })
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

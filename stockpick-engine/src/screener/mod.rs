//! Two-stage stock screener.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐     ┌──────────────┐     ┌──────────────┐     ┌──────────┐
//! │ Snapshots  │────▶│ Quality Gate │────▶│   Strategy   │────▶│  Rank &  │
//! │ (+ allow)  │     │  (score ≥ 5) │     │ 0.8 → 0.6    │     │  Top 10  │
//! └────────────┘     └──────────────┘     └──────────────┘     └──────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use stockpick_engine::screener::{ScreenerEngine, Strategy, StrategySettings};
//!
//! let engine = ScreenerEngine::with_defaults();
//! let result = engine.screen(&snapshots, &refs, Strategy::Growth, &StrategySettings::default());
//! for c in &result.candidates {
//!     println!("{} {}", c.snapshot.ticker, c.score);
//! }
//! ```

pub mod config;
pub mod engine;
pub mod quality;
pub mod report;
pub mod strategy;

pub use config::{
    PortfolioThresholds, QualityGateConfig, ScoringWeights, ScreenerThresholds, ScreeningParams,
    StrategySettings,
};
pub use engine::{
    FilterResult, FilterStage, LayerScore, ScoredCandidate, ScreenerEngine, ScreeningResult,
    ScreeningStatus,
};
pub use quality::{GateReason, QualityGate, QualityGateResult, SUSPENDED_SCORE};
pub use report::{ReportFormat, ScreenerReport};
pub use strategy::{
    BreakoutBreakdown, Conditions, DayTradeBreakdown, GrowthBreakdown, LongTermBreakdown,
    ParseStrategyError, ScoreBreakdown, Strategy, StrategyScore, ValueBreakdown,
};

//! Stockpick Engine
//!
//! Deterministic equity screening and position alerting.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         stockpick-engine                            │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────┐     │
//! │  │  Quality Gate   │─▶│ Strategy Scorer │─▶│  Orchestrator   │     │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────┘     │
//! │           ▲                    ▲                                    │
//! │           └──── Metrics ───────┘          ┌─────────────────┐      │
//! │                                           │  Alert Engine   │      │
//! │                                           └─────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Concepts
//!
//! ## Screening
//! - **Quality gate**: additive fundamentals/liquidity score, suspended issues
//!   pinned at −999
//! - **Strategy**: fixed boolean conditions per strategy; fires when the met
//!   fraction reaches the threshold
//! - **Relaxation**: one retry at a lower threshold when nothing fires
//!
//! ## Alerts
//! - Ordered cascade per holding, hard stops first
//! - Friday turns everything but hard stops into a review
//!
//! All engine entry points are pure and synchronous. Data fetching,
//! persistence and transport belong to the caller.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod data;
pub mod input;
pub mod metrics;
pub mod portfolio;
pub mod screener;

pub use config::{ConfigSource, EngineConfig};
pub use data::{PricePoint, ReferenceSets, StockSnapshot};
pub use input::InputBundle;
pub use portfolio::{classify, Alert, AlertEngine, AlertKind, PortfolioHolding, PositionSide};
pub use screener::{
    ReportFormat, ScoredCandidate, ScreenerEngine, ScreeningParams, ScreeningResult,
    ScreeningStatus, Strategy, StrategySettings,
};

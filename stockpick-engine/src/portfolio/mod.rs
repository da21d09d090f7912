//! Portfolio monitoring.
//!
//! Turns open holdings plus fresh snapshots into one alert each. The engine
//! is stateless: deduplication and notification belong to the caller.
//!
//! # Usage
//!
//! ```ignore
//! use stockpick_engine::portfolio::AlertEngine;
//!
//! let alerts = AlertEngine::default().evaluate_all(&holdings, &snapshots, &settings, today);
//! ```

pub mod alerts;
pub mod report;
pub mod types;

pub use alerts::{classify, AlertEngine, MIN_ALERT_HISTORY};
pub use report::render_alerts;
pub use types::{Alert, AlertKind, AlertRule, AlertSummary, PortfolioHolding, PositionSide};

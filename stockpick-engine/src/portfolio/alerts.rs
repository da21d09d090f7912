//! Position alert engine.
//!
//! Classifies each holding into one alert through an ordered cascade; the
//! first rule that matches wins.
//!
//! # Cascade
//!
//! 1. Price below MA5 → stop loss
//! 2. Loss at or beyond the stop → stop loss
//! 3. Review day → review (four variants by gain and trend)
//! 4. Loss inside 60% of the stop → stop-loss warning
//! 5. Target reached → hold if MA5 > MA20, else take profit
//! 6. Otherwise hold
//!
//! Hard stops always come first. On the review day everything else turns
//! into a review recommendation instead of an immediate action.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};
use tracing::debug;

use super::types::{Alert, AlertRule, PortfolioHolding};
use crate::data::StockSnapshot;
use crate::metrics::MovingAverages;
use crate::screener::StrategySettings;

/// Holdings with less history than this are skipped.
pub const MIN_ALERT_HISTORY: usize = 20;

/// Fraction of the stop-loss at which the warning band starts.
const WARNING_BAND: f64 = 0.6;

/// Alert engine.
#[derive(Debug, Clone)]
pub struct AlertEngine {
    review_day: Weekday,
    min_history: usize,
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self {
            review_day: Weekday::Fri,
            min_history: MIN_ALERT_HISTORY,
        }
    }
}

impl AlertEngine {
    pub fn new(review_day: Weekday, min_history: usize) -> Self {
        Self {
            review_day,
            min_history,
        }
    }

    /// Classify one holding on the given weekday.
    pub fn classify(
        &self,
        holding: &PortfolioHolding,
        snapshot: &StockSnapshot,
        settings: &StrategySettings,
        weekday: Weekday,
    ) -> Alert {
        let gain = holding.gain();
        let mas = MovingAverages::of(snapshot);
        let strong_trend = mas.ma5 > mas.ma20;
        let stop = settings.portfolio.stop_loss;
        let target = settings.portfolio.take_profit;
        let price = holding.current_price;
        let pct = gain * 100.0;

        let (rule, message) = if price < mas.ma5 {
            (
                AlertRule::BrokeMa5,
                format!(
                    "Price {:.2} broke below the 5-day average {:.2} ({:+.1}%), exit the position",
                    price, mas.ma5, pct
                ),
            )
        } else if gain <= -stop {
            (
                AlertRule::FixedStop,
                format!(
                    "Loss {:.1}% hit the {:.0}% stop, exit the position",
                    pct,
                    stop * 100.0
                ),
            )
        } else if weekday == self.review_day {
            if gain >= target && strong_trend {
                (
                    AlertRule::ReviewStrongProfit,
                    format!(
                        "Weekly review: up {:.1}% with MA5 above MA20, consider holding over the weekend or taking partial profit",
                        pct
                    ),
                )
            } else if gain >= target {
                (
                    AlertRule::ReviewWeakProfit,
                    format!(
                        "Weekly review: up {:.1}% but the trend is fading, consider closing before the weekend",
                        pct
                    ),
                )
            } else if gain > 0.0 {
                (
                    AlertRule::ReviewInProfit,
                    format!(
                        "Weekly review: up {:.1}%, hold or tighten the trailing stop",
                        pct
                    ),
                )
            } else {
                (
                    AlertRule::ReviewAtLoss,
                    format!(
                        "Weekly review: {:+.1}%, re-check the chart and decide whether to stop out or hold into next week",
                        pct
                    ),
                )
            }
        } else if gain <= -stop * WARNING_BAND {
            (
                AlertRule::StopWarning,
                format!(
                    "Loss {:.1}% is approaching the {:.0}% stop, prepare to exit",
                    pct,
                    stop * 100.0
                ),
            )
        } else if gain >= target {
            if strong_trend {
                (
                    AlertRule::RideTrend,
                    format!(
                        "Up {:.1}% and still trending above the 20-day average, keep riding and review Friday",
                        pct
                    ),
                )
            } else {
                (
                    AlertRule::TargetHit,
                    format!(
                        "Up {:.1}%, target of {:.0}% reached while the trend weakens, take profit",
                        pct,
                        target * 100.0
                    ),
                )
            }
        } else {
            (
                AlertRule::Monitor,
                format!("{:+.1}%, no trigger, keep monitoring intraday", pct),
            )
        };

        Alert::new(&holding.ticker, rule, gain, message)
    }

    /// Evaluate every holding for the given date.
    ///
    /// Holdings without a snapshot, or whose snapshot has too little history,
    /// are skipped without an alert.
    pub fn evaluate_all(
        &self,
        holdings: &[PortfolioHolding],
        snapshots: &[StockSnapshot],
        settings: &StrategySettings,
        as_of: NaiveDate,
    ) -> Vec<Alert> {
        let by_ticker: HashMap<&str, &StockSnapshot> =
            snapshots.iter().map(|s| (s.ticker.as_str(), s)).collect();
        let weekday = as_of.weekday();

        holdings
            .iter()
            .filter_map(|holding| {
                let Some(snapshot) = by_ticker.get(holding.ticker.as_str()) else {
                    debug!(ticker = %holding.ticker, "No snapshot for holding, skipping");
                    return None;
                };
                if snapshot.history_len() < self.min_history {
                    debug!(
                        ticker = %holding.ticker,
                        history = snapshot.history_len(),
                        required = self.min_history,
                        "Insufficient history for holding, skipping"
                    );
                    return None;
                }
                Some(self.classify(holding, snapshot, settings, weekday))
            })
            .collect()
    }
}

/// Classify a holding with the default Friday review day.
pub fn classify(
    holding: &PortfolioHolding,
    snapshot: &StockSnapshot,
    settings: &StrategySettings,
    weekday: Weekday,
) -> Alert {
    AlertEngine::default().classify(holding, snapshot, settings, weekday)
}

// ============================================================================
// Tests
// ============================================================================

//! Strategy scorers for the second screening stage.
//!
//! Each strategy checks a fixed set of boolean conditions. A strategy fires
//! when the fraction of conditions met reaches the caller's threshold; only
//! then is a continuous score computed. Every condition is recorded in the
//! breakdown whether or not the strategy fired.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::config::StrategySettings;
use crate::data::StockSnapshot;
use crate::metrics::{average_volume, volume_ratio, MovingAverages};

/// MA5 and MA60 must sit within this fraction of MA20 for a breakout setup.
const MA_CONVERGENCE_TOLERANCE: f64 = 0.03;

/// Breakout candidates need at least this much trade value.
const BREAKOUT_MIN_TRADE_VALUE: f64 = 30_000_000.0;

/// Growth candidates need at least this much trade value.
const GROWTH_MIN_TRADE_VALUE: f64 = 20_000_000.0;

// ============================================================================
// Strategy Selector
// ============================================================================

/// The five screening strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Moving-average squeeze released on volume
    Breakout,
    /// Quality compounders with dividends
    LongTerm,
    /// Liquid, volatile, margin-tradable names
    DayTrade,
    /// Cheap on earnings and book with yield
    Value,
    /// Fast revenue growth with healthy margins
    Growth,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Self::Breakout,
        Self::LongTerm,
        Self::DayTrade,
        Self::Value,
        Self::Growth,
    ];

    /// Evaluate this strategy against a snapshot.
    ///
    /// Margin eligibility comes from the snapshot's own flag; use
    /// [`Strategy::evaluate_resolved`] when a reference set also applies.
    pub fn evaluate(
        &self,
        snapshot: &StockSnapshot,
        condition_threshold: f64,
        settings: &StrategySettings,
    ) -> StrategyScore {
        self.evaluate_resolved(
            snapshot,
            snapshot.margin_eligible,
            condition_threshold,
            settings,
        )
    }

    /// Evaluate with margin eligibility already resolved by the caller.
    pub fn evaluate_resolved(
        &self,
        snapshot: &StockSnapshot,
        margin_eligible: bool,
        condition_threshold: f64,
        settings: &StrategySettings,
    ) -> StrategyScore {
        match self {
            Self::Breakout => evaluate_breakout(snapshot, condition_threshold, settings),
            Self::LongTerm => evaluate_long_term(snapshot, condition_threshold, settings),
            Self::DayTrade => score_day_trade(snapshot, margin_eligible, condition_threshold),
            Self::Value => evaluate_value(snapshot, condition_threshold, settings),
            Self::Growth => evaluate_growth(snapshot, condition_threshold, settings),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Breakout => write!(f, "breakout"),
            Self::LongTerm => write!(f, "long_term"),
            Self::DayTrade => write!(f, "day_trade"),
            Self::Value => write!(f, "value"),
            Self::Growth => write!(f, "growth"),
        }
    }
}

/// Unknown strategy name.
#[derive(Debug, Error)]
#[error("unknown strategy '{0}' (expected breakout, long_term, day_trade, value or growth)")]
pub struct ParseStrategyError(String);

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "breakout" => Ok(Self::Breakout),
            "long_term" | "longterm" => Ok(Self::LongTerm),
            "day_trade" | "daytrade" => Ok(Self::DayTrade),
            "value" => Ok(Self::Value),
            "growth" => Ok(Self::Growth),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}

// ============================================================================
// Breakdowns
// ============================================================================

/// A fixed set of named boolean conditions.
pub trait Conditions {
    /// Conditions in evaluation order.
    fn conditions(&self) -> Vec<(&'static str, bool)>;

    fn met(&self) -> usize {
        self.conditions().iter().filter(|(_, held)| *held).count()
    }

    fn total(&self) -> usize {
        self.conditions().len()
    }

    fn ratio(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.met() as f64 / total as f64
        }
    }

    fn fires(&self, threshold: f64) -> bool {
        self.ratio() >= threshold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakoutBreakdown {
    pub ma_converged: bool,
    pub volume_surge: bool,
    pub above_all_mas: bool,
}

impl Conditions for BreakoutBreakdown {
    fn conditions(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("MA5/MA20/MA60 within 3%", self.ma_converged),
            ("Volume surge over 20-day average", self.volume_surge),
            ("Close above all moving averages", self.above_all_mas),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongTermBreakdown {
    pub roe_high: bool,
    pub eps_rising: bool,
    pub yield_ok: bool,
    pub debt_low: bool,
}

impl Conditions for LongTermBreakdown {
    fn conditions(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("ROE >= 12%", self.roe_high),
            ("EPS non-decreasing over 3 periods", self.eps_rising),
            ("Dividend yield >= 3%", self.yield_ok),
            ("Debt ratio <= 50%", self.debt_low),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTradeBreakdown {
    pub high_trade_value: bool,
    pub wide_amplitude: bool,
    pub margin_eligible: bool,
    pub price_in_band: bool,
}

impl Conditions for DayTradeBreakdown {
    fn conditions(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("Trade value >= 500M", self.high_trade_value),
            ("Amplitude >= 3%", self.wide_amplitude),
            ("Margin trading eligible", self.margin_eligible),
            ("Price between 20 and 150", self.price_in_band),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueBreakdown {
    pub pe_low: bool,
    pub pb_low: bool,
    pub yield_high: bool,
    pub revenue_growing: bool,
}

impl Conditions for ValueBreakdown {
    fn conditions(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("P/E in (0, 15]", self.pe_low),
            ("P/B in (0, 1.2]", self.pb_low),
            ("Dividend yield >= 4%", self.yield_high),
            ("Revenue growing", self.revenue_growing),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthBreakdown {
    pub revenue_growth: bool,
    pub margin_healthy: bool,
    pub above_ma60: bool,
}

impl Conditions for GrowthBreakdown {
    fn conditions(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("Revenue growth above minimum", self.revenue_growth),
            ("Gross margin >= 25%", self.margin_healthy),
            ("Close above MA60", self.above_ma60),
        ]
    }
}

/// Per-strategy breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ScoreBreakdown {
    Breakout(BreakoutBreakdown),
    LongTerm(LongTermBreakdown),
    DayTrade(DayTradeBreakdown),
    Value(ValueBreakdown),
    Growth(GrowthBreakdown),
}

impl ScoreBreakdown {
    pub fn strategy(&self) -> Strategy {
        match self {
            Self::Breakout(_) => Strategy::Breakout,
            Self::LongTerm(_) => Strategy::LongTerm,
            Self::DayTrade(_) => Strategy::DayTrade,
            Self::Value(_) => Strategy::Value,
            Self::Growth(_) => Strategy::Growth,
        }
    }
}

impl Conditions for ScoreBreakdown {
    fn conditions(&self) -> Vec<(&'static str, bool)> {
        match self {
            Self::Breakout(b) => b.conditions(),
            Self::LongTerm(b) => b.conditions(),
            Self::DayTrade(b) => b.conditions(),
            Self::Value(b) => b.conditions(),
            Self::Growth(b) => b.conditions(),
        }
    }
}

/// Score plus the conditions behind it. `score` is 0 unless the strategy fired.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyScore {
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

impl StrategyScore {
    pub fn fired(&self) -> bool {
        self.score > 0.0
    }
}

// ============================================================================
// Strategy Functions
// ============================================================================

/// MA squeeze with a volume-backed break above all averages.
pub fn evaluate_breakout(
    snapshot: &StockSnapshot,
    condition_threshold: f64,
    settings: &StrategySettings,
) -> StrategyScore {
    let mas = MovingAverages::of(snapshot);
    let today = snapshot.latest_volume();
    let avg20 = average_volume(&snapshot.volume_history, 20);

    let breakdown = BreakoutBreakdown {
        ma_converged: mas.converged_within(MA_CONVERGENCE_TOLERANCE),
        volume_surge: avg20 > 0.0
            && today > avg20 * settings.screener.volume_spike_multiplier,
        above_all_mas: mas.all_defined() && snapshot.price > mas.max(),
    };

    let mut score = 0.0;
    if breakdown.fires(condition_threshold) {
        score = if avg20 > 0.0 {
            volume_ratio(&snapshot.volume_history, 20) * 50.0
        } else {
            50.0
        };
    }
    // Liquidity floor applies after firing, independent of the ratio.
    if snapshot.trade_value <= BREAKOUT_MIN_TRADE_VALUE {
        score = 0.0;
    }

    StrategyScore {
        score,
        breakdown: ScoreBreakdown::Breakout(breakdown),
    }
}

/// Profitable, steadily growing, dividend-paying, low leverage.
pub fn evaluate_long_term(
    snapshot: &StockSnapshot,
    condition_threshold: f64,
    _settings: &StrategySettings,
) -> StrategyScore {
    let roe = snapshot.roe.unwrap_or(0.0);
    let dy = snapshot.dividend_yield.unwrap_or(0.0);

    let breakdown = LongTermBreakdown {
        roe_high: roe >= 12.0,
        eps_rising: eps_non_decreasing(&snapshot.eps_history, 3),
        yield_ok: dy >= 3.0,
        debt_low: snapshot.debt_ratio.is_some_and(|d| d <= 50.0),
    };

    let score = if breakdown.fires(condition_threshold) {
        roe * 5.0 + dy * 10.0
    } else {
        0.0
    };

    StrategyScore {
        score,
        breakdown: ScoreBreakdown::LongTerm(breakdown),
    }
}

/// Liquid, volatile, margin-tradable, mid-priced.
pub fn evaluate_day_trade(
    snapshot: &StockSnapshot,
    condition_threshold: f64,
    _settings: &StrategySettings,
) -> StrategyScore {
    score_day_trade(snapshot, snapshot.margin_eligible, condition_threshold)
}

fn score_day_trade(
    snapshot: &StockSnapshot,
    margin_eligible: bool,
    condition_threshold: f64,
) -> StrategyScore {
    let amplitude = snapshot.amplitude.unwrap_or(0.0);

    let breakdown = DayTradeBreakdown {
        high_trade_value: snapshot.trade_value >= 500_000_000.0,
        wide_amplitude: amplitude >= 3.0,
        margin_eligible,
        price_in_band: (20.0..=150.0).contains(&snapshot.price),
    };

    let score = if breakdown.fires(condition_threshold) {
        amplitude * 20.0 + snapshot.trade_value / 10_000_000.0
    } else {
        0.0
    };

    StrategyScore {
        score,
        breakdown: ScoreBreakdown::DayTrade(breakdown),
    }
}

/// Cheap on P/E and P/B, high yield, still growing.
pub fn evaluate_value(
    snapshot: &StockSnapshot,
    condition_threshold: f64,
    _settings: &StrategySettings,
) -> StrategyScore {
    let breakdown = ValueBreakdown {
        pe_low: snapshot.pe.is_some_and(|pe| pe > 0.0 && pe <= 15.0),
        pb_low: snapshot.pb.is_some_and(|pb| pb > 0.0 && pb <= 1.2),
        yield_high: snapshot.dividend_yield.is_some_and(|dy| dy >= 4.0),
        revenue_growing: snapshot.revenue_growth.is_some_and(|g| g > 0.0),
    };

    let score = if breakdown.fires(condition_threshold) {
        // Missing inputs contribute nothing rather than a phantom discount.
        let pe_term = snapshot.pe.map_or(0.0, |pe| (15.0 - pe) * 4.0);
        let pb_term = snapshot.pb.map_or(0.0, |pb| (1.2 - pb) * 30.0);
        let dy_term = snapshot.dividend_yield.unwrap_or(0.0) * 10.0;
        pe_term + pb_term + dy_term
    } else {
        0.0
    };

    StrategyScore {
        score,
        breakdown: ScoreBreakdown::Value(breakdown),
    }
}

/// Revenue growth above the configured minimum with margin and trend.
pub fn evaluate_growth(
    snapshot: &StockSnapshot,
    condition_threshold: f64,
    settings: &StrategySettings,
) -> StrategyScore {
    let growth = snapshot.revenue_growth.unwrap_or(0.0);
    let margin = snapshot.gross_margin.unwrap_or(0.0);
    let mas = MovingAverages::of(snapshot);

    let breakdown = GrowthBreakdown {
        revenue_growth: snapshot
            .revenue_growth
            .is_some_and(|g| g >= settings.screener.min_revenue_growth),
        margin_healthy: margin >= 25.0,
        above_ma60: mas.ma60 > 0.0 && snapshot.price > mas.ma60,
    };

    let mut score = 0.0;
    if breakdown.fires(condition_threshold) {
        score = growth * 2.0 + margin * 1.5;
    }
    if snapshot.trade_value <= GROWTH_MIN_TRADE_VALUE {
        score = 0.0;
    }

    StrategyScore {
        score,
        breakdown: ScoreBreakdown::Growth(breakdown),
    }
}

/// The last `points` values never decrease walking forward.
fn eps_non_decreasing(eps: &[f64], points: usize) -> bool {
    if points == 0 || eps.len() < points {
        return false;
    }
    eps[eps.len() - points..].windows(2).all(|w| w[0] <= w[1])
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PricePoint;
    use chrono::{Duration, NaiveDate};

    fn with_history(mut snap: StockSnapshot, closes: &[f64], volumes: &[f64]) -> StockSnapshot {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        snap.price_history = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint {
                date: start + Duration::days(i as i64),
                open: c,
                high: c,
                low: c,
                close: c,
            })
            .collect();
        snap.volume_history = volumes.to_vec();
        snap
    }

    /// 60 flat closes at 100, then today's close at `price` with a 3x volume spike.
    fn breakout_snapshot(trade_value: f64) -> StockSnapshot {
        let mut closes = vec![100.0; 59];
        closes.push(101.0);
        let mut volumes = vec![1000.0; 59];
        volumes.push(3000.0);
        let mut snap = StockSnapshot::new("2454", "MediaTek", 103.0);
        snap.trade_value = trade_value;
        with_history(snap, &closes, &volumes)
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!("breakout".parse::<Strategy>().unwrap(), Strategy::Breakout);
        assert_eq!("Long-Term".parse::<Strategy>().unwrap(), Strategy::LongTerm);
        assert_eq!("daytrade".parse::<Strategy>().unwrap(), Strategy::DayTrade);
        assert!("momentum".parse::<Strategy>().is_err());
        for s in Strategy::ALL {
            assert_eq!(s.to_string().parse::<Strategy>().unwrap(), s);
        }
    }

    #[test]
    fn test_breakout_fires_with_all_conditions() {
        let settings = StrategySettings::default();
        let snap = breakout_snapshot(40_000_000.0);
        let result = evaluate_breakout(&snap, 0.8, &settings);

        assert_eq!(result.breakdown.met(), 3);
        // volume ratio 3.0 * 50
        assert!((result.score - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_breakout_trade_value_floor() {
        let settings = StrategySettings::default();
        let snap = breakout_snapshot(25_000_000.0);
        let result = evaluate_breakout(&snap, 0.8, &settings);

        assert_eq!(result.breakdown.met(), 3);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_breakout_short_history_never_fires() {
        let settings = StrategySettings::default();
        let mut snap = StockSnapshot::new("6669", "Wiwynn", 2000.0);
        snap.trade_value = 90_000_000.0;
        let result = evaluate_breakout(&snap, 0.6, &settings);

        assert_eq!(result.breakdown.met(), 0);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_long_term_scores_only_when_fired() {
        let settings = StrategySettings::default();
        let mut snap = StockSnapshot::new("2412", "Chunghwa", 120.0);
        snap.roe = Some(14.0);
        snap.eps_history = vec![4.0, 4.5, 4.5, 4.8];
        snap.dividend_yield = Some(4.0);
        snap.debt_ratio = Some(60.0);

        // 3 of 4 conditions: below 0.8, at or above 0.6
        let strict = evaluate_long_term(&snap, 0.8, &settings);
        assert_eq!(strict.breakdown.met(), 3);
        assert_eq!(strict.score, 0.0);

        let relaxed = evaluate_long_term(&snap, 0.6, &settings);
        assert!((relaxed.score - (14.0 * 5.0 + 4.0 * 10.0)).abs() < 1e-9);
    }

    #[test]
    fn test_eps_trend_uses_last_three_points() {
        assert!(eps_non_decreasing(&[9.0, 1.0, 2.0, 3.0], 3));
        assert!(!eps_non_decreasing(&[1.0, 3.0, 2.0], 3));
        assert!(!eps_non_decreasing(&[1.0, 2.0], 3));
    }

    #[test]
    fn test_day_trade() {
        let settings = StrategySettings::default();
        let mut snap = StockSnapshot::new("2603", "Evergreen", 140.0);
        snap.trade_value = 600_000_000.0;
        snap.amplitude = Some(4.0);
        snap.margin_eligible = true;

        let result = evaluate_day_trade(&snap, 0.8, &settings);
        assert_eq!(result.breakdown.met(), 4);
        assert!((result.score - (80.0 + 60.0)).abs() < 1e-9);

        snap.price = 151.0;
        assert_eq!(evaluate_day_trade(&snap, 0.8, &settings).score, 0.0);
    }

    #[test]
    fn test_value() {
        let settings = StrategySettings::default();
        let mut snap = StockSnapshot::new("2886", "Mega", 35.0);
        snap.pe = Some(10.0);
        snap.pb = Some(1.0);
        snap.dividend_yield = Some(5.0);
        snap.revenue_growth = Some(3.0);

        let result = evaluate_value(&snap, 0.8, &settings);
        assert_eq!(result.breakdown.met(), 4);
        assert!((result.score - (20.0 + 6.0 + 50.0)).abs() < 1e-9);
    }

    #[test]
    fn test_growth_floor_and_settings() {
        let mut settings = StrategySettings::default();
        let mut closes = vec![100.0; 60];
        closes[59] = 110.0;
        let mut snap = with_history(StockSnapshot::new("3661", "Alchip", 120.0), &closes, &[]);
        snap.revenue_growth = Some(40.0);
        snap.gross_margin = Some(30.0);
        snap.trade_value = 50_000_000.0;

        let result = evaluate_growth(&snap, 0.8, &settings);
        assert!((result.score - (80.0 + 45.0)).abs() < 1e-9);

        settings.screener.min_revenue_growth = 50.0;
        let result = evaluate_growth(&snap, 0.8, &settings);
        assert!(!result.fired());
        assert!(!matches!(
            result.breakdown,
            ScoreBreakdown::Growth(GrowthBreakdown { revenue_growth: true, .. })
        ));

        settings.screener.min_revenue_growth = 20.0;
        snap.trade_value = 15_000_000.0;
        assert_eq!(evaluate_growth(&snap, 0.8, &settings).score, 0.0);
    }

    #[test]
    fn test_score_zero_below_threshold_positive_above() {
        let settings = StrategySettings::default();
        let mut snap = StockSnapshot::new("2886", "Mega", 35.0);
        snap.pe = Some(10.0);
        snap.pb = Some(1.0);

        // 2 of 4 = 0.5
        for threshold in [0.6, 0.8] {
            assert_eq!(evaluate_value(&snap, threshold, &settings).score, 0.0);
        }
        assert!(evaluate_value(&snap, 0.5, &settings).score > 0.0);
    }

    #[test]
    fn test_dispatch_matches_breakdown_kind() {
        let settings = StrategySettings::default();
        let snap = StockSnapshot::new("0050", "ETF", 150.0);
        for s in Strategy::ALL {
            assert_eq!(s.evaluate(&snap, 0.8, &settings).breakdown.strategy(), s);
        }
    }

    fn held(result: &StrategyScore, name: &str) -> bool {
        result
            .breakdown
            .conditions()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, h)| h)
            .unwrap_or_else(|| panic!("no condition named {}", name))
    }

    #[test]
    fn test_condition_boundaries() {
        let settings = StrategySettings::default();
        let cases: &[(Strategy, fn(&mut StockSnapshot), &str, bool)] = &[
            (Strategy::LongTerm, |s: &mut StockSnapshot| s.roe = Some(12.0), "ROE >= 12%", true),
            (Strategy::LongTerm, |s: &mut StockSnapshot| s.roe = Some(11.99), "ROE >= 12%", false),
            (Strategy::LongTerm, |s: &mut StockSnapshot| s.dividend_yield = Some(3.0), "Dividend yield >= 3%", true),
            (Strategy::LongTerm, |s: &mut StockSnapshot| s.debt_ratio = Some(50.0), "Debt ratio <= 50%", true),
            (Strategy::LongTerm, |s: &mut StockSnapshot| s.debt_ratio = Some(50.01), "Debt ratio <= 50%", false),
            (Strategy::DayTrade, |s: &mut StockSnapshot| s.trade_value = 500_000_000.0, "Trade value >= 500M", true),
            (Strategy::DayTrade, |s: &mut StockSnapshot| s.amplitude = Some(3.0), "Amplitude >= 3%", true),
            (Strategy::DayTrade, |s: &mut StockSnapshot| s.price = 20.0, "Price between 20 and 150", true),
            (Strategy::DayTrade, |s: &mut StockSnapshot| s.price = 150.0, "Price between 20 and 150", true),
            (Strategy::DayTrade, |s: &mut StockSnapshot| s.price = 19.99, "Price between 20 and 150", false),
            (Strategy::DayTrade, |s: &mut StockSnapshot| s.price = 150.01, "Price between 20 and 150", false),
            (Strategy::Value, |s: &mut StockSnapshot| s.pe = Some(15.0), "P/E in (0, 15]", true),
            (Strategy::Value, |s: &mut StockSnapshot| s.pe = Some(0.0), "P/E in (0, 15]", false),
            (Strategy::Value, |s: &mut StockSnapshot| s.pb = Some(1.2), "P/B in (0, 1.2]", true),
            (Strategy::Value, |s: &mut StockSnapshot| s.pb = Some(1.21), "P/B in (0, 1.2]", false),
            (Strategy::Value, |s: &mut StockSnapshot| s.dividend_yield = Some(4.0), "Dividend yield >= 4%", true),
            (Strategy::Value, |s: &mut StockSnapshot| s.revenue_growth = Some(0.0), "Revenue growing", false),
            (Strategy::Growth, |s: &mut StockSnapshot| s.revenue_growth = Some(20.0), "Revenue growth above minimum", true),
            (Strategy::Growth, |s: &mut StockSnapshot| s.gross_margin = Some(25.0), "Gross margin >= 25%", true),
            (Strategy::Growth, |s: &mut StockSnapshot| s.gross_margin = Some(24.99), "Gross margin >= 25%", false),
        ];

        for &(strategy, setup, name, expected) in cases {
            let mut snap = StockSnapshot::new("1234", "Boundary", 100.0);
            setup(&mut snap);
            let result = strategy.evaluate(&snap, 0.8, &settings);
            assert_eq!(held(&result, name), expected, "{} / {}", strategy, name);
        }
    }

    #[test]
    fn test_trade_value_floors_are_exclusive() {
        let settings = StrategySettings::default();

        let at_floor = evaluate_breakout(&breakout_snapshot(30_000_000.0), 0.8, &settings);
        assert_eq!(at_floor.breakdown.met(), 3);
        assert_eq!(at_floor.score, 0.0);
        assert!(evaluate_breakout(&breakout_snapshot(30_000_001.0), 0.8, &settings).fired());

        let mut closes = vec![100.0; 60];
        closes[59] = 110.0;
        let mut snap = with_history(StockSnapshot::new("3661", "Alchip", 120.0), &closes, &[]);
        snap.revenue_growth = Some(40.0);
        snap.gross_margin = Some(30.0);

        snap.trade_value = 20_000_000.0;
        let at_floor = evaluate_growth(&snap, 0.8, &settings);
        assert_eq!(at_floor.breakdown.met(), 3);
        assert_eq!(at_floor.score, 0.0);

        snap.trade_value = 20_000_001.0;
        assert!(evaluate_growth(&snap, 0.8, &settings).fired());
    }

    #[test]
    fn test_day_trade_resolved_margin_eligibility() {
        let settings = StrategySettings::default();
        let mut snap = StockSnapshot::new("2603", "Evergreen", 100.0);
        snap.trade_value = 600_000_000.0;
        snap.amplitude = Some(4.0);

        let own_flag = Strategy::DayTrade.evaluate(&snap, 0.8, &settings);
        assert_eq!(own_flag.breakdown.met(), 3);
        assert!(!own_flag.fired());

        let resolved = Strategy::DayTrade.evaluate_resolved(&snap, true, 0.8, &settings);
        assert!(held(&resolved, "Margin trading eligible"));
        assert!((resolved.score - 140.0).abs() < 1e-9);
    }
}


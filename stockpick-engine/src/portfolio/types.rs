//! Portfolio types: holdings and the alerts produced for them.

use serde::{Deserialize, Serialize};

use crate::screener::ScoreBreakdown;

// ============================================================================
// Holdings
// ============================================================================

/// Position direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    #[default]
    Long,
    Short,
}

impl std::fmt::Display for PositionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Long => write!(f, "long"),
            Self::Short => write!(f, "short"),
        }
    }
}

/// An open position. The engine only reads it; prices are refreshed by the
/// caller between evaluations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioHolding {
    /// Ticker symbol
    pub ticker: String,
    /// Company name
    #[serde(default)]
    pub name: String,
    /// Long or short
    #[serde(default)]
    pub side: PositionSide,
    /// Number of shares
    pub shares: f64,
    /// Entry price per share
    pub entry_price: f64,
    /// Current price per share
    pub current_price: f64,
    /// Strategy score when the position was opened
    #[serde(default)]
    pub initial_score: Option<f64>,
    /// Conditions behind the initial score
    #[serde(default)]
    pub initial_breakdown: Option<ScoreBreakdown>,
}

impl PortfolioHolding {
    pub fn new(ticker: impl Into<String>, shares: f64, entry_price: f64, current_price: f64) -> Self {
        Self {
            ticker: ticker.into(),
            name: String::new(),
            side: PositionSide::Long,
            shares,
            entry_price,
            current_price,
            initial_score: None,
            initial_breakdown: None,
        }
    }

    /// Return as a fraction where positive is always favourable.
    ///
    /// Short positions gain when the price falls. 0 without a valid entry.
    pub fn gain(&self) -> f64 {
        if self.entry_price <= 0.0 {
            return 0.0;
        }
        let raw = (self.current_price - self.entry_price) / self.entry_price;
        match self.side {
            PositionSide::Long => raw,
            PositionSide::Short => -raw,
        }
    }

    /// Unrealized P&L in currency units.
    pub fn unrealized_pnl(&self) -> f64 {
        self.gain() * self.entry_price * self.shares
    }

    /// Current market value.
    pub fn market_value(&self) -> f64 {
        self.current_price * self.shares
    }
}

// ============================================================================
// Alerts
// ============================================================================

/// Recommended action for a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertKind {
    StopLoss,
    TakeProfit,
    Hold,
    Review,
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StopLoss => write!(f, "Stop loss"),
            Self::TakeProfit => write!(f, "Take profit"),
            Self::Hold => write!(f, "Hold"),
            Self::Review => write!(f, "Review"),
        }
    }
}

/// Which rule of the cascade produced an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertRule {
    /// Price closed below MA5
    BrokeMa5,
    /// Loss reached the stop-loss fraction
    FixedStop,
    /// Review day, target reached, trend strong
    ReviewStrongProfit,
    /// Review day, target reached, trend weak
    ReviewWeakProfit,
    /// Review day, in profit below target
    ReviewInProfit,
    /// Review day, flat or losing
    ReviewAtLoss,
    /// Loss inside the warning band before the stop
    StopWarning,
    /// Target reached and trend strong
    RideTrend,
    /// Target reached and trend weakening
    TargetHit,
    /// Nothing triggered
    Monitor,
}

impl AlertRule {
    pub fn kind(&self) -> AlertKind {
        match self {
            Self::BrokeMa5 | Self::FixedStop | Self::StopWarning => AlertKind::StopLoss,
            Self::ReviewStrongProfit
            | Self::ReviewWeakProfit
            | Self::ReviewInProfit
            | Self::ReviewAtLoss => AlertKind::Review,
            Self::RideTrend | Self::Monitor => AlertKind::Hold,
            Self::TargetHit => AlertKind::TakeProfit,
        }
    }
}

/// One alert for one holding. Carries no identity across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub ticker: String,
    pub kind: AlertKind,
    pub rule: AlertRule,
    pub message: String,
    /// Direction-adjusted gain at evaluation time
    pub gain: f64,
}

impl Alert {
    pub fn new(ticker: &str, rule: AlertRule, gain: f64, message: String) -> Self {
        Self {
            ticker: ticker.to_string(),
            kind: rule.kind(),
            rule,
            message,
            gain,
        }
    }

    /// Whether the alert calls for a trade now.
    pub fn requires_action(&self) -> bool {
        matches!(self.kind, AlertKind::StopLoss | AlertKind::TakeProfit)
    }
}

/// Count of alerts per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlertSummary {
    pub stop_loss: usize,
    pub take_profit: usize,
    pub hold: usize,
    pub review: usize,
}

impl AlertSummary {
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        let mut summary = Self::default();
        for alert in alerts {
            match alert.kind {
                AlertKind::StopLoss => summary.stop_loss += 1,
                AlertKind::TakeProfit => summary.take_profit += 1,
                AlertKind::Hold => summary.hold += 1,
                AlertKind::Review => summary.review += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.stop_loss + self.take_profit + self.hold + self.review
    }

    pub fn actionable(&self) -> usize {
        self.stop_loss + self.take_profit
    }
}

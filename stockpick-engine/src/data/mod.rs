//! Market data shapes consumed by the engine.
//!
//! Everything here is supplied by the calling application already
//! materialized; the engine never fetches or caches data itself.
//!
//! # Inputs
//! - **StockSnapshot**: one issuer's price/volume history plus fundamentals
//! - **ReferenceSets**: suspended issuers, margin-eligible issuers and the
//!   industry classification, keyed by ticker

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Price History
// ============================================================================

/// One daily bar of the price history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date
    pub date: NaiveDate,
    /// Open price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Close price
    pub close: f64,
}

impl PricePoint {
    /// Get the full range (high - low)
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// True range against the previous close.
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let tr1 = self.range();
        let tr2 = (self.high - prev_close).abs();
        let tr3 = (self.low - prev_close).abs();
        tr1.max(tr2).max(tr3)
    }
}

// ============================================================================
// Stock Snapshot
// ============================================================================

/// Immutable per-run view of one issuer.
///
/// `price_history` and `volume_history` are time-aligned and in chronological
/// order (oldest first). Missing fundamentals are `None` and score neutrally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSnapshot {
    /// Internal identifier
    pub id: String,
    /// Ticker symbol (e.g., "2330")
    pub ticker: String,
    /// Company name
    pub name: String,

    /// Latest price
    pub price: f64,
    /// Today's open
    #[serde(default)]
    pub open: f64,
    /// Today's high
    #[serde(default)]
    pub high: f64,
    /// Today's low
    #[serde(default)]
    pub low: f64,

    /// Daily bars, oldest first
    #[serde(default)]
    pub price_history: Vec<PricePoint>,
    /// Daily volumes aligned with `price_history`
    #[serde(default)]
    pub volume_history: Vec<f64>,

    /// Year-over-year revenue growth (%)
    #[serde(default)]
    pub revenue_growth: Option<f64>,
    /// Consecutive months of revenue growth
    #[serde(default)]
    pub revenue_growth_months: u32,
    /// Return on equity (%)
    #[serde(default)]
    pub roe: Option<f64>,
    /// Debt ratio (%)
    #[serde(default)]
    pub debt_ratio: Option<f64>,
    /// Dividend yield (%)
    #[serde(default)]
    pub dividend_yield: Option<f64>,
    /// Price/earnings ratio
    #[serde(default)]
    pub pe: Option<f64>,
    /// Price/book ratio
    #[serde(default)]
    pub pb: Option<f64>,
    /// Gross margin (%)
    #[serde(default)]
    pub gross_margin: Option<f64>,
    /// Today's trade value in currency units
    #[serde(default)]
    pub trade_value: f64,
    /// Today's amplitude (%)
    #[serde(default)]
    pub amplitude: Option<f64>,
    /// Eligible for margin trading
    #[serde(default)]
    pub margin_eligible: bool,
    /// Historical EPS, oldest first
    #[serde(default)]
    pub eps_history: Vec<f64>,
}

impl StockSnapshot {
    /// Create a snapshot with identity and price only.
    pub fn new(ticker: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        let ticker = ticker.into();
        Self {
            id: ticker.clone(),
            ticker,
            name: name.into(),
            price,
            open: price,
            high: price,
            low: price,
            price_history: Vec::new(),
            volume_history: Vec::new(),
            revenue_growth: None,
            revenue_growth_months: 0,
            roe: None,
            debt_ratio: None,
            dividend_yield: None,
            pe: None,
            pb: None,
            gross_margin: None,
            trade_value: 0.0,
            amplitude: None,
            margin_eligible: false,
            eps_history: Vec::new(),
        }
    }

    /// Close prices in chronological order.
    pub fn closes(&self) -> Vec<f64> {
        self.price_history.iter().map(|p| p.close).collect()
    }

    /// Most recent volume, or 0 with no history.
    pub fn latest_volume(&self) -> f64 {
        self.volume_history.last().copied().unwrap_or(0.0)
    }

    /// Number of history points available.
    pub fn history_len(&self) -> usize {
        self.price_history.len()
    }

    /// Implied EPS (price / P/E), `None` unless P/E is positive.
    pub fn implied_eps(&self) -> Option<f64> {
        match self.pe {
            Some(pe) if pe > 0.0 => Some(self.price / pe),
            _ => None,
        }
    }
}

// ============================================================================
// Reference Sets
// ============================================================================

/// External lookups keyed by ticker.
///
/// Any of them may be empty when the collaborator could not supply it; an
/// empty set simply never matches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceSets {
    /// Issuers whose trading is suspended
    #[serde(default)]
    pub suspended: HashSet<String>,
    /// Issuers eligible for margin trading
    #[serde(default)]
    pub margin_eligible: HashSet<String>,
    /// Industry name by ticker
    #[serde(default)]
    pub industries: HashMap<String, String>,
}

impl ReferenceSets {
    pub fn is_suspended(&self, ticker: &str) -> bool {
        self.suspended.contains(ticker)
    }

    pub fn is_margin_eligible(&self, ticker: &str) -> bool {
        self.margin_eligible.contains(ticker)
    }

    /// Margin-tradable by the snapshot's own flag or by the reference set.
    pub fn margin_tradable(&self, snapshot: &StockSnapshot) -> bool {
        snapshot.margin_eligible || self.is_margin_eligible(&snapshot.ticker)
    }

    pub fn industry_of(&self, ticker: &str) -> Option<&str> {
        self.industries.get(ticker).map(String::as_str)
    }
}

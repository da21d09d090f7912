//! Input bundle for the runner binary.
//!
//! The calling application normally hands data to the engine directly; the
//! runner instead reads one JSON file holding everything a run needs.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use stockpick_common::error::{Error, Result, ResultExt};

use crate::data::{ReferenceSets, StockSnapshot};
use crate::portfolio::PortfolioHolding;

/// Everything one run reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputBundle {
    #[serde(default)]
    pub snapshots: Vec<StockSnapshot>,

    #[serde(default)]
    pub references: ReferenceSets,

    #[serde(default)]
    pub holdings: Vec<PortfolioHolding>,

    /// Tickers kept by an upstream selection stage
    #[serde(default)]
    pub allow_list: Option<HashSet<String>>,
}

impl InputBundle {
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)
            .context(format!("reading input {}", path.display()))?;
        Self::from_json(&content).context(format!("parsing input {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let bundle: Self = serde_json::from_str(content)?;
        if let Some(dup) = first_duplicate(&bundle.snapshots) {
            return Err(Error::InvalidInput(format!("duplicate snapshot for ticker {}", dup)));
        }
        Ok(bundle)
    }
}

fn first_duplicate(snapshots: &[StockSnapshot]) -> Option<&str> {
    let mut seen = HashSet::new();
    snapshots
        .iter()
        .map(|s| s.ticker.as_str())
        .find(|t| !seen.insert(*t))
}

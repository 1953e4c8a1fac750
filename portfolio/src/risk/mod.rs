//! Risk & diversification engine
//!
//! Works on a snapshot holdings list. Concentration, sector exposure and the
//! Herfindahl-Hirschman Index come straight from market values; volatility
//! and VaR figures come from a [`VolatilitySource`], by default the fixed
//! placeholders in [`RiskConfig`].
//!
//! An empty holdings list yields [`Unavailable::NoHoldings`] from every entry
//! point. Holdings whose market value cannot be resolved are errors.

mod diversification;
mod holdings;
mod portfolio;
pub mod var;

pub use diversification::{DiversificationAnalysis, Recommendation, StockConcentration};
pub use holdings::{HoldingsRiskMetrics, RiskConcentration, StockRisk, TailRisk};
pub use portfolio::{ConcentrationRisk, PortfolioRiskAnalysis, SectorRisk, VolatilityAnalysis};

use crate::config::RiskConfig;
use crate::error::{PortfolioError, Result};
use crate::result::Unavailable;
use crate::stats;
use crate::types::{value_holdings, Holding, ValuedHolding};
use crate::volatility::{PlaceholderVolatility, VolatilitySource};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Three-step risk classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// High above `high`, Medium above `medium`, Low otherwise
    pub fn classify(value: f64, high: f64, medium: f64) -> Self {
        if value > high {
            RiskLevel::High
        } else if value > medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

/// Exposure to one sector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorConcentration {
    /// Share of total portfolio value (0-100)
    pub percentage: f64,

    /// Number of holdings in the sector
    pub count: usize,

    /// Summed market value
    pub total_value: f64,
}

/// Risk analyzer over snapshot holdings
pub struct RiskAnalyzer {
    config: RiskConfig,
    volatility: Box<dyn VolatilitySource>,
}

impl fmt::Debug for RiskAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RiskAnalyzer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for RiskAnalyzer {
    fn default() -> Self {
        let config = RiskConfig::default();
        Self {
            volatility: Box::new(PlaceholderVolatility::from_config(&config)),
            config,
        }
    }
}

impl RiskAnalyzer {
    /// Create an analyzer with placeholder volatility from `config`
    pub fn new(config: RiskConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            volatility: Box::new(PlaceholderVolatility::from_config(&config)),
            config,
        })
    }

    /// Replace the volatility source
    pub fn with_volatility_source(mut self, source: impl VolatilitySource + 'static) -> Self {
        self.volatility = Box::new(source);
        self
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Volatility of one holding, rejected unless finite and non-negative
    fn stock_volatility(&self, holding: &Holding) -> Result<f64> {
        checked_volatility(
            self.volatility.stock_volatility(holding),
            &format!("stock volatility of {}", holding.symbol),
        )
    }

    fn portfolio_volatility(&self, holdings: &[Holding]) -> Result<f64> {
        checked_volatility(self.volatility.portfolio_volatility(holdings), "portfolio volatility")
    }

    /// Resolve market values, or report that there is nothing to analyze
    fn resolve<'a>(
        &self,
        holdings: &'a [Holding],
    ) -> Result<std::result::Result<Vec<ValuedHolding<'a>>, Unavailable>> {
        if holdings.is_empty() {
            debug!("No holdings to analyze");
            return Ok(Err(Unavailable::NoHoldings));
        }
        Ok(Ok(value_holdings(holdings)?))
    }
}

fn checked_volatility(value: f64, what: &str) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(PortfolioError::InvalidParameter(format!(
            "{} must be finite and non-negative, got {}",
            what, value
        )))
    }
}

/// Per-sector exposure in first-appearance order
pub(crate) fn sector_breakdown(
    valued: &[ValuedHolding<'_>],
    total_value: f64,
) -> IndexMap<String, SectorConcentration> {
    let mut sectors: IndexMap<String, SectorConcentration> = IndexMap::new();

    for v in valued {
        let entry = sectors
            .entry(v.holding.sector().to_string())
            .or_insert(SectorConcentration {
                percentage: 0.0,
                count: 0,
                total_value: 0.0,
            });
        entry.count += 1;
        entry.total_value += v.market_value;
    }

    for sector in sectors.values_mut() {
        sector.percentage = stats::percentage(sector.total_value, total_value);
    }

    sectors
}

/// Share of total value held by the `n` largest holdings
pub(crate) fn top_n_concentration(
    ranked: &[&ValuedHolding<'_>],
    n: usize,
    total_value: f64,
) -> f64 {
    let top: f64 = ranked.iter().take(n).map(|v| v.market_value).sum();
    stats::percentage(top, total_value)
}

//! Portfolio composition summary
//!
//! Totals, sector allocation, largest positions and P&L distribution of a
//! holdings list. Unlike the analyzers, an empty list is summarized as all
//! zeros rather than reported as unavailable.

use crate::error::Result;
use crate::stats;
use crate::types::{rank_by_value, total_value, value_holdings, Holding};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of positions listed in `top_holdings`
pub const TOP_HOLDINGS: usize = 10;

/// Composition summary of a holdings list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_value: f64,

    pub total_pnl: f64,

    /// Total P&L relative to total value (0-100)
    pub total_pnl_percentage: f64,

    pub number_of_holdings: usize,

    /// Per-sector allocation in first-appearance order
    pub sector_analysis: IndexMap<String, SectorSummary>,

    /// Largest positions by market value, ties in input order
    pub top_holdings: Vec<PositionSummary>,

    pub pnl_analysis: PnlAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorSummary {
    pub total_value: f64,

    pub count: usize,

    pub percentage: f64,

    /// Member symbols in input order
    pub holdings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSummary {
    pub symbol: String,
    pub sector: String,
    pub market_value: f64,
    pub pnl: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlAnalysis {
    /// Holdings with P&L above zero
    pub positive_count: usize,

    /// Holdings with P&L below zero
    pub negative_count: usize,

    pub total_positive_pnl: f64,

    pub total_negative_pnl: f64,

    /// Highest P&L, first one on ties
    pub best_performer: Option<PositionSummary>,

    /// Lowest P&L, first one on ties
    pub worst_performer: Option<PositionSummary>,
}

impl PortfolioSummary {
    /// Summarize `holdings`
    ///
    /// Fails only when a market value cannot be resolved.
    pub fn from_holdings(holdings: &[Holding]) -> Result<Self> {
        let valued = value_holdings(holdings)?;
        let total = total_value(&valued);
        let total_pnl: f64 = holdings.iter().map(|h| h.pnl).sum();

        let position = |holding: &Holding, market_value: f64| PositionSummary {
            symbol: holding.symbol.clone(),
            sector: holding.sector().to_string(),
            market_value,
            pnl: holding.pnl,
        };

        let mut sector_analysis: IndexMap<String, SectorSummary> = IndexMap::new();
        for v in &valued {
            let sector = sector_analysis
                .entry(v.holding.sector().to_string())
                .or_insert_with(|| SectorSummary {
                    total_value: 0.0,
                    count: 0,
                    percentage: 0.0,
                    holdings: Vec::new(),
                });
            sector.total_value += v.market_value;
            sector.count += 1;
            sector.holdings.push(v.holding.symbol.clone());
        }
        for sector in sector_analysis.values_mut() {
            sector.percentage = stats::percentage(sector.total_value, total);
        }

        let top_holdings = rank_by_value(&valued)
            .into_iter()
            .take(TOP_HOLDINGS)
            .map(|v| position(v.holding, v.market_value))
            .collect();

        let mut best: Option<usize> = None;
        let mut worst: Option<usize> = None;
        for (i, v) in valued.iter().enumerate() {
            let pnl = v.holding.pnl;
            if best.map_or(true, |b| pnl > valued[b].holding.pnl) {
                best = Some(i);
            }
            if worst.map_or(true, |w| pnl < valued[w].holding.pnl) {
                worst = Some(i);
            }
        }

        let pnl_analysis = PnlAnalysis {
            positive_count: holdings.iter().filter(|h| h.pnl > 0.0).count(),
            negative_count: holdings.iter().filter(|h| h.pnl < 0.0).count(),
            total_positive_pnl: holdings.iter().map(|h| h.pnl).filter(|p| *p > 0.0).sum(),
            total_negative_pnl: holdings.iter().map(|h| h.pnl).filter(|p| *p < 0.0).sum(),
            best_performer: best.map(|i| position(valued[i].holding, valued[i].market_value)),
            worst_performer: worst.map(|i| position(valued[i].holding, valued[i].market_value)),
        };

        debug!(
            "Summarized {} holdings across {} sectors",
            holdings.len(),
            sector_analysis.len()
        );

        Ok(Self {
            total_value: total,
            total_pnl,
            total_pnl_percentage: stats::percentage(total_pnl, total),
            number_of_holdings: holdings.len(),
            sector_analysis,
            top_holdings,
            pnl_analysis,
        })
    }

    /// The `n` largest sectors by value
    pub fn top_sectors(&self, n: usize) -> Vec<(&str, &SectorSummary)> {
        let mut sectors: Vec<_> = self
            .sector_analysis
            .iter()
            .map(|(name, sector)| (name.as_str(), sector))
            .collect();
        sectors.sort_by(|a, b| b.1.total_value.total_cmp(&a.1.total_value));
        sectors.truncate(n);
        sectors
    }
}

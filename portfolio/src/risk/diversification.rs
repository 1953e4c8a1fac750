//! Diversification analysis and recommendations

use super::portfolio::diversification_score;
use super::{sector_breakdown, top_n_concentration, RiskAnalyzer, SectorConcentration};
use crate::error::Result;
use crate::result::MetricResult;
use crate::stats;
use crate::types::{rank_by_value, total_value, Holding};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Top-5 share above which concentration is flagged
const TOP_5_LIMIT: f64 = 70.0;

/// Sector share above which sector exposure is flagged
const SECTOR_LIMIT: f64 = 40.0;

/// Holding count below which breadth is flagged
const MIN_STOCKS: usize = 10;

/// HHI above which the portfolio counts as highly concentrated
const HHI_LIMIT: f64 = 0.25;

/// Diversification picture of a holdings list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiversificationAnalysis {
    pub sector_diversification: IndexMap<String, SectorConcentration>,

    pub stock_concentration: StockConcentration,

    /// Σ w², 1.0 for an empty or valueless portfolio
    pub herfindahl_hirschman_index: f64,

    /// 1 / HHI
    pub effective_number_of_stocks: f64,

    /// Every applicable recommendation, in check order
    pub diversification_recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockConcentration {
    pub top_1_concentration: f64,

    pub top_3_concentration: f64,

    pub top_5_concentration: f64,

    pub number_of_stocks: usize,
}

/// Diversification advice; serializes as its message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Consider reducing concentration in top 5 holdings")]
    ReduceTopHoldings,

    #[serde(rename = "Consider diversifying across more sectors")]
    DiversifySectors,

    #[serde(rename = "Consider increasing the number of stocks for better diversification")]
    AddHoldings,

    #[serde(rename = "Portfolio is highly concentrated - consider more diversification")]
    ReduceConcentration,

    #[serde(rename = "Portfolio appears well-diversified")]
    WellDiversified,
}

impl Recommendation {
    pub fn message(&self) -> &'static str {
        match self {
            Recommendation::ReduceTopHoldings => {
                "Consider reducing concentration in top 5 holdings"
            }
            Recommendation::DiversifySectors => "Consider diversifying across more sectors",
            Recommendation::AddHoldings => {
                "Consider increasing the number of stocks for better diversification"
            }
            Recommendation::ReduceConcentration => {
                "Portfolio is highly concentrated - consider more diversification"
            }
            Recommendation::WellDiversified => "Portfolio appears well-diversified",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl DiversificationAnalysis {
    /// Score on 0-10, higher is more diversified
    pub fn diversification_score(&self) -> f64 {
        diversification_score(self.herfindahl_hirschman_index)
    }
}

impl RiskAnalyzer {
    /// Analyze sector spread, stock concentration and HHI of `holdings`
    pub fn analyze_diversification(
        &self,
        holdings: &[Holding],
    ) -> Result<MetricResult<DiversificationAnalysis>> {
        let valued = match self.resolve(holdings)? {
            Ok(valued) => valued,
            Err(reason) => return Ok(reason.into()),
        };
        info!("Analyzing diversification of {} holdings", valued.len());

        let total = total_value(&valued);
        let ranked = rank_by_value(&valued);

        let stock_concentration = StockConcentration {
            top_1_concentration: top_n_concentration(&ranked, 1, total),
            top_3_concentration: top_n_concentration(&ranked, 3, total),
            top_5_concentration: top_n_concentration(&ranked, 5, total),
            number_of_stocks: valued.len(),
        };

        let sector_diversification = sector_breakdown(&valued, total);
        let max_sector = sector_diversification
            .values()
            .map(|s| s.percentage)
            .fold(0.0, f64::max);

        let market_values: Vec<f64> = valued.iter().map(|v| v.market_value).collect();
        let hhi = stats::herfindahl_index(&market_values);

        let diversification_recommendations =
            recommendations(&stock_concentration, max_sector, hhi);

        Ok(MetricResult::Computed(DiversificationAnalysis {
            sector_diversification,
            stock_concentration,
            herfindahl_hirschman_index: hhi,
            effective_number_of_stocks: stats::effective_count(hhi),
            diversification_recommendations,
        }))
    }
}

fn recommendations(
    concentration: &StockConcentration,
    max_sector: f64,
    hhi: f64,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if concentration.top_5_concentration > TOP_5_LIMIT {
        recommendations.push(Recommendation::ReduceTopHoldings);
    }
    if max_sector > SECTOR_LIMIT {
        recommendations.push(Recommendation::DiversifySectors);
    }
    if concentration.number_of_stocks < MIN_STOCKS {
        recommendations.push(Recommendation::AddHoldings);
    }
    if hhi > HHI_LIMIT {
        recommendations.push(Recommendation::ReduceConcentration);
    }

    if recommendations.is_empty() {
        recommendations.push(Recommendation::WellDiversified);
    }
    recommendations
}

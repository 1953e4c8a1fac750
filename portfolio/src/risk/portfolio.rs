//! Portfolio-level risk analysis

use super::var::parametric_var;
use super::{sector_breakdown, top_n_concentration, RiskAnalyzer, RiskLevel, SectorConcentration};
use crate::error::Result;
use crate::result::MetricResult;
use crate::stats;
use crate::types::{rank_by_value, total_value, Holding, ValuedHolding};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const CONCENTRATION_WEIGHT: f64 = 0.3;
const SECTOR_WEIGHT: f64 = 0.3;
const VOLATILITY_WEIGHT: f64 = 0.4;

/// Volatility that maps to the maximum volatility score
const VOLATILITY_SCORE_SCALE: f64 = 40.0;

/// Complete risk picture of a holdings list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioRiskAnalysis {
    pub concentration_risk: ConcentrationRisk,

    pub sector_risk: SectorRisk,

    pub volatility_analysis: VolatilityAnalysis,

    pub total_portfolio_value: f64,

    pub total_pnl: f64,

    /// Annualized portfolio volatility from the volatility source
    pub portfolio_volatility: f64,

    /// Parametric VaR at the primary confidence level (negative = loss)
    pub var_95: f64,

    /// Parametric VaR at the tail confidence level (negative = loss)
    pub var_99: f64,

    /// Configured drawdown estimate
    pub max_drawdown_risk: f64,

    /// 10 − 10·HHI, floored at 0
    pub diversification_score: f64,

    /// Composite 0-10 score, higher is riskier
    pub risk_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationRisk {
    /// Share of value in the five largest holdings (0-100)
    pub top_5_concentration: f64,

    /// Share of value in the largest holding (0-100)
    pub max_single_stock_concentration: f64,

    /// High above 80, Medium above 60
    pub concentration_risk_level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorRisk {
    pub sector_concentrations: IndexMap<String, SectorConcentration>,

    pub max_sector_concentration: f64,

    /// High above 50, Medium above 30
    pub sector_risk_level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityAnalysis {
    /// Value-weighted stock volatility
    pub portfolio_volatility: f64,

    /// High above 0.30, Medium above 0.20
    pub volatility_risk_level: RiskLevel,
}

impl RiskAnalyzer {
    /// Analyze concentration, sector, volatility and VaR risk of `holdings`
    ///
    /// # Example
    ///
    /// ```
    /// use ag_portfolio::{sample_holdings, RiskAnalyzer, RiskLevel};
    ///
    /// let analyzer = RiskAnalyzer::default();
    /// let analysis = analyzer
    ///     .analyze_portfolio_risk(&sample_holdings())
    ///     .unwrap()
    ///     .into_result()
    ///     .unwrap();
    ///
    /// assert_eq!(analysis.total_portfolio_value, 79_000.0);
    /// assert_eq!(analysis.concentration_risk.concentration_risk_level, RiskLevel::High);
    /// ```
    pub fn analyze_portfolio_risk(
        &self,
        holdings: &[Holding],
    ) -> Result<MetricResult<PortfolioRiskAnalysis>> {
        let valued = match self.resolve(holdings)? {
            Ok(valued) => valued,
            Err(reason) => return Ok(reason.into()),
        };
        info!("Analyzing portfolio risk for {} holdings", valued.len());

        let total = total_value(&valued);
        let total_pnl: f64 = holdings.iter().map(|h| h.pnl).sum();

        let concentration_risk = concentration_risk(&valued, total);
        let sector_risk = sector_risk(&valued, total);
        let volatility_analysis = self.volatility_analysis(&valued, total)?;

        let portfolio_volatility = self.portfolio_volatility(holdings)?;
        let var_95 = parametric_var(portfolio_volatility, self.config.var_confidence)?;
        let var_99 = parametric_var(portfolio_volatility, self.config.tail_var_confidence)?;

        let market_values: Vec<f64> = valued.iter().map(|v| v.market_value).collect();
        let diversification_score = diversification_score(stats::herfindahl_index(&market_values));

        let risk_score = risk_score(
            concentration_risk.top_5_concentration,
            sector_risk.max_sector_concentration,
            volatility_analysis.portfolio_volatility,
        );
        debug!(
            "Risk score {:.3}, diversification score {:.3}",
            risk_score, diversification_score
        );

        Ok(MetricResult::Computed(PortfolioRiskAnalysis {
            concentration_risk,
            sector_risk,
            volatility_analysis,
            total_portfolio_value: total,
            total_pnl,
            portfolio_volatility,
            var_95,
            var_99,
            max_drawdown_risk: self.config.max_drawdown_estimate,
            diversification_score,
            risk_score,
        }))
    }

    fn volatility_analysis(
        &self,
        valued: &[ValuedHolding<'_>],
        total: f64,
    ) -> Result<VolatilityAnalysis> {
        let mut weighted = 0.0;
        for v in valued {
            let weight = if total > 0.0 { v.market_value / total } else { 0.0 };
            weighted += weight * self.stock_volatility(v.holding)?;
        }

        Ok(VolatilityAnalysis {
            portfolio_volatility: weighted,
            volatility_risk_level: RiskLevel::classify(weighted, 0.30, 0.20),
        })
    }
}

fn concentration_risk(valued: &[ValuedHolding<'_>], total: f64) -> ConcentrationRisk {
    let ranked = rank_by_value(valued);
    let top_5_concentration = top_n_concentration(&ranked, 5, total);

    ConcentrationRisk {
        top_5_concentration,
        max_single_stock_concentration: top_n_concentration(&ranked, 1, total),
        concentration_risk_level: RiskLevel::classify(top_5_concentration, 80.0, 60.0),
    }
}

fn sector_risk(valued: &[ValuedHolding<'_>], total: f64) -> SectorRisk {
    let sector_concentrations = sector_breakdown(valued, total);
    let max_sector_concentration = sector_concentrations
        .values()
        .map(|s| s.percentage)
        .fold(0.0, f64::max);

    SectorRisk {
        sector_concentrations,
        max_sector_concentration,
        sector_risk_level: RiskLevel::classify(max_sector_concentration, 50.0, 30.0),
    }
}

/// Map an HHI onto a 0-10 score, higher is more diversified
pub(crate) fn diversification_score(hhi: f64) -> f64 {
    (10.0 - hhi * 10.0).max(0.0)
}

/// Weighted blend of concentration, sector and volatility sub-scores, each capped at 10
fn risk_score(
    top_5_concentration: f64,
    max_sector_concentration: f64,
    weighted_volatility: f64,
) -> f64 {
    let concentration_score = (top_5_concentration / 10.0).min(10.0);
    let sector_score = (max_sector_concentration / 10.0).min(10.0);
    let volatility_score = (weighted_volatility * VOLATILITY_SCORE_SCALE).min(10.0);

    let score = CONCENTRATION_WEIGHT * concentration_score
        + SECTOR_WEIGHT * sector_score
        + VOLATILITY_WEIGHT * volatility_score;

    score.clamp(0.0, 10.0)
}

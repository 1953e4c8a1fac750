//! Per-holding risk metrics

use super::var::parametric_var;
use super::{RiskAnalyzer, RiskLevel};
use crate::error::Result;
use crate::result::MetricResult;
use crate::types::{total_value, Holding};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Risk metrics of every holding plus portfolio aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingsRiskMetrics {
    pub total_portfolio_value: f64,

    pub total_pnl: f64,

    /// Value-weighted stock volatility
    pub portfolio_volatility: f64,

    /// Value-weighted stock VaR at the primary confidence level
    pub portfolio_var_95: f64,

    /// Value-weighted stock VaR at the tail confidence level
    pub portfolio_var_99: f64,

    /// One entry per holding, in input order
    pub stock_risks: Vec<StockRisk>,

    pub risk_concentration: RiskConcentration,

    pub tail_risk: TailRisk,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRisk {
    pub symbol: String,

    pub market_value: f64,

    pub pnl: f64,

    /// P&L relative to market value (0-100), 0 for a valueless holding
    pub pnl_percentage: f64,

    /// Share of total portfolio value (0-1)
    pub weight: f64,

    pub volatility: f64,

    pub var_95: f64,

    pub var_99: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConcentration {
    /// Σ weight × volatility
    pub total_risk: f64,

    /// Σ weight²
    pub risk_concentration_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailRisk {
    pub portfolio_var_99: f64,

    /// Graded on loss magnitude: High above 5%, Medium above 3%
    pub tail_risk_level: RiskLevel,
}

impl RiskAnalyzer {
    /// Calculate risk metrics for each holding and their weighted aggregates
    pub fn calculate_holdings_risk(
        &self,
        holdings: &[Holding],
    ) -> Result<MetricResult<HoldingsRiskMetrics>> {
        let valued = match self.resolve(holdings)? {
            Ok(valued) => valued,
            Err(reason) => return Ok(reason.into()),
        };
        info!("Calculating risk metrics for {} holdings", valued.len());

        let total = total_value(&valued);
        let total_pnl: f64 = holdings.iter().map(|h| h.pnl).sum();

        let stock_risks = valued
            .iter()
            .map(|v| -> Result<StockRisk> {
                let volatility = self.stock_volatility(v.holding)?;
                let pnl_percentage = if v.market_value > 0.0 {
                    v.holding.pnl / v.market_value * 100.0
                } else {
                    0.0
                };

                Ok(StockRisk {
                    symbol: v.holding.symbol.clone(),
                    market_value: v.market_value,
                    pnl: v.holding.pnl,
                    pnl_percentage,
                    weight: if total > 0.0 { v.market_value / total } else { 0.0 },
                    volatility,
                    var_95: parametric_var(volatility, self.config.var_confidence)?,
                    var_99: parametric_var(volatility, self.config.tail_var_confidence)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let weighted = |field: fn(&StockRisk) -> f64| -> f64 {
            stock_risks.iter().map(|s| s.weight * field(s)).sum()
        };

        let portfolio_volatility = weighted(|s: &StockRisk| s.volatility);
        let portfolio_var_95 = weighted(|s: &StockRisk| s.var_95);
        let portfolio_var_99 = weighted(|s: &StockRisk| s.var_99);

        let risk_concentration = RiskConcentration {
            total_risk: portfolio_volatility,
            risk_concentration_score: stock_risks.iter().map(|s| s.weight * s.weight).sum(),
        };

        let tail_risk = TailRisk {
            portfolio_var_99,
            tail_risk_level: RiskLevel::classify(portfolio_var_99.abs(), 0.05, 0.03),
        };

        Ok(MetricResult::Computed(HoldingsRiskMetrics {
            total_portfolio_value: total,
            total_pnl,
            portfolio_volatility,
            portfolio_var_95,
            portfolio_var_99,
            stock_risks,
            risk_concentration,
            tail_risk,
        }))
    }
}

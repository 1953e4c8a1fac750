//! Tail-risk and distribution metrics of a return series

use super::{return_values, PerformanceAnalyzer};
use crate::result::MetricResult;
use crate::stats;
use crate::types::ValueSeries;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Risk metrics of a value series
///
/// VaR figures are signed return quantiles: a loss shows up as a negative
/// number. `var_95`/`cvar_95` use the primary confidence level and
/// `var_99`/`cvar_99` the tail level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRiskMetrics {
    /// Annualized sample standard deviation of returns
    pub volatility: f64,

    pub var_95: f64,

    /// Mean of returns at or below `var_95`
    pub cvar_95: f64,

    pub var_99: f64,

    /// Mean of returns at or below `var_99`
    pub cvar_99: f64,

    /// Annualized standard deviation of negative returns
    pub downside_deviation: f64,

    /// Sensitivity to the market series, 1.0 without one
    pub beta: f64,

    pub skewness: f64,

    /// Excess kurtosis (normal = 0)
    pub kurtosis: f64,
}

impl PerformanceAnalyzer {
    /// Calculate risk metrics, optionally against a market series for beta
    pub fn calculate_risk_metrics(
        &self,
        series: &ValueSeries,
        market: Option<&ValueSeries>,
    ) -> MetricResult<SeriesRiskMetrics> {
        let returns = match self.prepare(series) {
            Ok(returns) => returns,
            Err(reason) => return reason.into(),
        };

        let beta = match market {
            Some(market) => {
                let aligned = stats::align_returns(&returns, &market.returns());
                debug!("Beta over {} aligned returns", aligned.len());
                stats::beta(&aligned)
            }
            None => 1.0,
        };

        let mut metrics = self.series_risk_metrics(&return_values(&returns));
        metrics.beta = beta;

        MetricResult::Computed(metrics)
    }

    /// Risk metrics with a neutral beta of 1.0
    pub(super) fn series_risk_metrics(&self, returns: &[f64]) -> SeriesRiskMetrics {
        let var_95 = stats::quantile(returns, 1.0 - self.config.var_confidence);
        let var_99 = stats::quantile(returns, 1.0 - self.config.tail_var_confidence);

        let negative: Vec<f64> = returns.iter().copied().filter(|&r| r < 0.0).collect();
        let downside_deviation = if negative.len() < 2 {
            0.0
        } else {
            self.annualize_volatility(stats::sample_std_dev(&negative))
        };

        SeriesRiskMetrics {
            volatility: self.annualize_volatility(stats::sample_std_dev(returns)),
            var_95,
            cvar_95: stats::tail_mean(returns, var_95),
            var_99,
            cvar_99: stats::tail_mean(returns, var_99),
            downside_deviation,
            beta: 1.0,
            skewness: stats::skewness(returns),
            kurtosis: stats::excess_kurtosis(returns),
        }
    }
}

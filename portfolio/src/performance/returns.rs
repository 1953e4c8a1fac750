//! Return, Sharpe, drawdown and Calmar metrics

use super::{finite_or_zero, return_values, PerformanceAnalyzer};
use crate::result::MetricResult;
use crate::stats;
use crate::types::ValueSeries;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Return metrics of a value series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnMetrics {
    /// Last value over first value, minus one
    pub total_return: f64,

    /// Mean per-period return
    pub avg_daily_return: f64,

    /// (1 + mean)^periods_per_year - 1
    pub annualized_return: f64,

    /// Change over the short lookback, None when the series is too short
    pub rolling_30d_return: Option<f64>,

    /// Change over the long lookback, None when the series is too short
    pub rolling_90d_return: Option<f64>,

    /// Annualized sample standard deviation of returns
    pub volatility: f64,

    pub sharpe_ratio: f64,

    /// Worst peak-to-trough decline (<= 0)
    pub max_drawdown: f64,

    pub calmar_ratio: f64,
}

impl PerformanceAnalyzer {
    /// Calculate return metrics for a value series
    ///
    /// # Example
    ///
    /// ```
    /// use ag_portfolio::{PerformanceAnalyzer, ValueSeries};
    /// use chrono::{TimeZone, Utc};
    ///
    /// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    /// let series = ValueSeries::from_daily_values(start, &[100.0, 110.0, 99.0, 121.0]).unwrap();
    ///
    /// let analyzer = PerformanceAnalyzer::default();
    /// let metrics = analyzer.calculate_returns(&series).into_result().unwrap();
    /// assert!((metrics.total_return - 0.21).abs() < 1e-9);
    /// assert!(metrics.max_drawdown < 0.0);
    /// ```
    pub fn calculate_returns(&self, series: &ValueSeries) -> MetricResult<ReturnMetrics> {
        let returns = match self.prepare(series) {
            Ok(returns) => returns,
            Err(reason) => return reason.into(),
        };

        let metrics = self.return_metrics(&series.values(), &return_values(&returns));
        debug!(
            "Return metrics over {} samples: total={:.4}, sharpe={:.3}",
            series.len(),
            metrics.total_return,
            metrics.sharpe_ratio
        );

        MetricResult::Computed(metrics)
    }

    pub(super) fn return_metrics(&self, values: &[f64], returns: &[f64]) -> ReturnMetrics {
        let factor = self.config.annualization_factor;

        let first = values[0];
        let last = values[values.len() - 1];
        let total_return = if first == 0.0 { 0.0 } else { last / first - 1.0 };

        let avg_daily_return = stats::mean(returns);
        let annualized_return = finite_or_zero((1.0 + avg_daily_return).powf(factor) - 1.0);

        let std_dev = stats::sample_std_dev(returns);
        let volatility = self.annualize_volatility(std_dev);

        let sharpe_ratio = if std_dev == 0.0 {
            0.0
        } else {
            let excess = avg_daily_return - self.config.periodic_risk_free_rate();
            finite_or_zero(excess / std_dev * factor.sqrt())
        };

        let max_drawdown = stats::max_drawdown(values);
        let calmar_ratio = if max_drawdown == 0.0 {
            0.0
        } else {
            finite_or_zero(annualized_return / max_drawdown.abs())
        };

        ReturnMetrics {
            total_return,
            avg_daily_return,
            annualized_return,
            rolling_30d_return: stats::lookback_change(values, self.config.short_lookback),
            rolling_90d_return: stats::lookback_change(values, self.config.long_lookback),
            volatility,
            sharpe_ratio,
            max_drawdown,
            calmar_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Unavailable;
    use approx::assert_relative_eq;
    use chrono::{DateTime, TimeZone, Utc};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn series(values: &[f64]) -> ValueSeries {
        ValueSeries::from_daily_values(start(), values).unwrap()
    }

    #[test]
    fn test_reference_series() {
        let analyzer = PerformanceAnalyzer::default();
        let metrics = analyzer
            .calculate_returns(&series(&[100.0, 110.0, 99.0, 121.0]))
            .into_result()
            .unwrap();

        assert_relative_eq!(metrics.total_return, 0.21, epsilon = 1e-12);
        assert_relative_eq!(metrics.max_drawdown, -0.1, epsilon = 1e-12);

        let avg = (0.1 - 0.1 + 22.0 / 99.0) / 3.0;
        assert_relative_eq!(metrics.avg_daily_return, avg, epsilon = 1e-12);
        assert_relative_eq!(
            metrics.annualized_return,
            (1.0 + avg).powf(252.0) - 1.0,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            metrics.calmar_ratio,
            metrics.annualized_return / 0.1,
            max_relative = 1e-9
        );
        assert!(metrics.volatility > 0.0);

        // Too short for either lookback
        assert!(metrics.rolling_30d_return.is_none());
        assert!(metrics.rolling_90d_return.is_none());
    }

    #[test]
    fn test_monotone_and_flat_series() {
        let values: Vec<f64> = (0..40).map(|i| 100.0 * 1.001_f64.powi(i)).collect();
        let analyzer = PerformanceAnalyzer::default();
        let metrics = analyzer.calculate_returns(&series(&values)).into_result().unwrap();

        assert_eq!(metrics.max_drawdown, 0.0);
        assert_eq!(metrics.calmar_ratio, 0.0);
        // Compounded returns are equal up to rounding only, so check a flat series too
        let flat = analyzer
            .calculate_returns(&series(&[100.0; 10]))
            .into_result()
            .unwrap();
        assert_eq!(flat.sharpe_ratio, 0.0);
        assert_eq!(flat.volatility, 0.0);
        assert_eq!(flat.total_return, 0.0);
    }

    #[test]
    fn test_lookback_returns_present_on_long_series() {
        let values: Vec<f64> = (0..100).map(|i| 100.0 + i as f64).collect();
        let analyzer = PerformanceAnalyzer::default();
        let metrics = analyzer.calculate_returns(&series(&values)).into_result().unwrap();

        assert_relative_eq!(
            metrics.rolling_30d_return.unwrap(),
            199.0 / 169.0 - 1.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            metrics.rolling_90d_return.unwrap(),
            199.0 / 109.0 - 1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_lookback_of_exactly_k_samples() {
        // 31 samples: value 30 steps before the last exists
        let values: Vec<f64> = (0..31).map(|i| 100.0 + i as f64).collect();
        let analyzer = PerformanceAnalyzer::default();
        let metrics = analyzer.calculate_returns(&series(&values)).into_result().unwrap();

        assert_relative_eq!(metrics.rolling_30d_return.unwrap(), 0.30, epsilon = 1e-12);

        let shorter = analyzer
            .calculate_returns(&series(&values[..30]))
            .into_result()
            .unwrap();
        assert!(shorter.rolling_30d_return.is_none());
    }

    #[test]
    fn test_zero_first_value() {
        let analyzer = PerformanceAnalyzer::default();
        let metrics = analyzer
            .calculate_returns(&series(&[0.0, 100.0, 110.0]))
            .into_result()
            .unwrap();

        assert_eq!(metrics.total_return, 0.0);
        assert_relative_eq!(metrics.avg_daily_return, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_insufficient_data() {
        let analyzer = PerformanceAnalyzer::default();
        let result = analyzer.calculate_returns(&series(&[100.0]));
        assert!(result.unavailable().unwrap().is_insufficient_data());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 1);
        assert!(json["error"].as_str().unwrap().starts_with("Insufficient data"));

        let empty = analyzer.calculate_returns(&series(&[]));
        assert_eq!(
            empty.unavailable(),
            Some(Unavailable::InsufficientData { required: 2, available: 0 })
        );
    }

    #[test]
    fn test_null_lookbacks_serialize() {
        let analyzer = PerformanceAnalyzer::default();
        let result = analyzer.calculate_returns(&series(&[100.0, 101.0]));
        let json = serde_json::to_value(&result).unwrap();

        assert!(json["rolling_30d_return"].is_null());
        assert!(json["total_return"].is_number());
    }
}

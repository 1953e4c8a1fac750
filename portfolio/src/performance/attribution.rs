//! Performance attribution against an optional benchmark

use super::{finite_or_zero, return_values, PerformanceAnalyzer, ReturnMetrics, SeriesRiskMetrics};
use crate::result::MetricResult;
use crate::stats;
use crate::types::ValueSeries;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Portfolio metrics with an optional benchmark comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceAttribution {
    pub portfolio_metrics: ReturnMetrics,

    /// Beta is the benchmark beta when a comparison is present, 1.0 otherwise
    pub risk_metrics: SeriesRiskMetrics,

    /// Present when a benchmark overlapping the portfolio was supplied
    pub benchmark_comparison: Option<BenchmarkComparison>,
}

/// Portfolio returns relative to a benchmark over their common timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    /// Annualized mean excess return
    pub excess_return: f64,

    /// Annualized standard deviation of excess returns
    pub tracking_error: f64,

    /// Excess return per unit of tracking error
    pub information_ratio: f64,

    pub correlation: f64,

    pub beta: f64,

    /// Number of timestamps both return series share
    pub aligned_observations: usize,
}

impl PerformanceAnalyzer {
    /// Calculate return and risk metrics, plus a benchmark comparison when
    /// `benchmark` has more than one sample and overlaps the portfolio
    pub fn calculate_performance_attribution(
        &self,
        series: &ValueSeries,
        benchmark: Option<&ValueSeries>,
    ) -> MetricResult<PerformanceAttribution> {
        let returns = match self.prepare(series) {
            Ok(returns) => returns,
            Err(reason) => return reason.into(),
        };
        let values = return_values(&returns);

        let benchmark_comparison = benchmark
            .filter(|b| b.len() > 1)
            .and_then(|b| {
                let aligned = stats::align_returns(&returns, &b.returns());
                if aligned.is_empty() {
                    warn!("Benchmark shares no timestamps with the portfolio series");
                    None
                } else {
                    Some(self.compare(&aligned))
                }
            });

        let mut risk_metrics = self.series_risk_metrics(&values);
        if let Some(comparison) = &benchmark_comparison {
            risk_metrics.beta = comparison.beta;
        }

        MetricResult::Computed(PerformanceAttribution {
            portfolio_metrics: self.return_metrics(&series.values(), &values),
            risk_metrics,
            benchmark_comparison,
        })
    }

    fn compare(&self, aligned: &[(f64, f64)]) -> BenchmarkComparison {
        let factor = self.config.annualization_factor;
        let excess: Vec<f64> = aligned.iter().map(|(p, b)| p - b).collect();

        let excess_return = stats::mean(&excess) * factor;
        let tracking_error = self.annualize_volatility(stats::sample_std_dev(&excess));
        let information_ratio = if tracking_error == 0.0 {
            0.0
        } else {
            finite_or_zero(excess_return / tracking_error)
        };

        debug!(
            "Benchmark comparison over {} observations: excess={:.4}, te={:.4}",
            aligned.len(),
            excess_return,
            tracking_error
        );

        BenchmarkComparison {
            excess_return,
            tracking_error,
            information_ratio,
            correlation: stats::correlation(aligned),
            beta: stats::beta(aligned),
            aligned_observations: aligned.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{DateTime, TimeZone, Utc};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn series(values: &[f64]) -> ValueSeries {
        ValueSeries::from_daily_values(start(), values).unwrap()
    }

    #[test]
    fn test_without_benchmark() {
        let analyzer = PerformanceAnalyzer::default();
        let attribution = analyzer
            .calculate_performance_attribution(&series(&[100.0, 110.0, 99.0, 121.0]), None)
            .into_result()
            .unwrap();

        assert!(attribution.benchmark_comparison.is_none());
        assert_relative_eq!(attribution.portfolio_metrics.total_return, 0.21, epsilon = 1e-12);
        assert_eq!(attribution.risk_metrics.beta, 1.0);
    }

    #[test]
    fn test_identical_benchmark() {
        let values = [100.0, 102.0, 101.0, 104.0, 103.0];
        let analyzer = PerformanceAnalyzer::default();
        let attribution = analyzer
            .calculate_performance_attribution(&series(&values), Some(&series(&values)))
            .into_result()
            .unwrap();

        let comparison = attribution.benchmark_comparison.unwrap();
        assert_eq!(comparison.aligned_observations, 4);
        assert_eq!(comparison.excess_return, 0.0);
        assert_eq!(comparison.tracking_error, 0.0);
        assert_eq!(comparison.information_ratio, 0.0);
        assert_relative_eq!(comparison.correlation, 1.0, epsilon = 1e-9);
        assert_relative_eq!(comparison.beta, 4.0 / 3.0, epsilon = 1e-9);
        assert_eq!(attribution.risk_metrics.beta, comparison.beta);
    }

    #[test]
    fn test_outperforming_benchmark() {
        let portfolio = series(&[100.0, 103.0, 102.0, 106.0, 107.0]);
        let benchmark = series(&[100.0, 101.0, 101.5, 102.0, 103.0]);

        let analyzer = PerformanceAnalyzer::default();
        let comparison = analyzer
            .calculate_performance_attribution(&portfolio, Some(&benchmark))
            .into_result()
            .unwrap()
            .benchmark_comparison
            .unwrap();

        assert!(comparison.excess_return > 0.0);
        assert!(comparison.tracking_error > 0.0);
        assert!(comparison.information_ratio > 0.0);
        assert!(comparison.correlation.abs() <= 1.0 + 1e-12);
    }

    #[test]
    fn test_short_or_disjoint_benchmark_is_omitted() {
        let portfolio = series(&[100.0, 101.0, 102.0]);
        let analyzer = PerformanceAnalyzer::default();

        let single = series(&[100.0]);
        let attribution = analyzer
            .calculate_performance_attribution(&portfolio, Some(&single))
            .into_result()
            .unwrap();
        assert!(attribution.benchmark_comparison.is_none());

        let later = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let disjoint = ValueSeries::from_daily_values(later, &[1.0, 2.0, 3.0]).unwrap();
        let attribution = analyzer
            .calculate_performance_attribution(&portfolio, Some(&disjoint))
            .into_result()
            .unwrap();
        assert!(attribution.benchmark_comparison.is_none());

        let json = serde_json::to_value(&attribution).unwrap();
        assert!(json["benchmark_comparison"].is_null());
    }

    #[test]
    fn test_insufficient_portfolio() {
        let analyzer = PerformanceAnalyzer::default();
        let result = analyzer.calculate_performance_attribution(&series(&[100.0]), None);
        assert!(!result.is_computed());
    }
}

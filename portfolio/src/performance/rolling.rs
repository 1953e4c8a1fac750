//! Rolling-window metrics

use super::{finite_or_zero, PerformanceAnalyzer};
use crate::error::{PortfolioError, Result};
use crate::result::MetricResult;
use crate::stats;
use crate::types::{PeriodReturn, ValueSeries};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Metrics over each full window of returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingMetrics {
    /// Window length in returns
    pub window: usize,

    /// One point per return that closes a full window
    pub points: Vec<RollingPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingPoint {
    pub timestamp: DateTime<Utc>,

    /// Annualized mean return over the window
    pub rolling_return: f64,

    /// Annualized standard deviation over the window
    pub rolling_volatility: f64,

    /// `rolling_return / rolling_volatility`, no risk-free adjustment
    pub rolling_sharpe: f64,

    /// Drawdown of the closing value from the window's peak value
    pub rolling_drawdown: f64,
}

impl PerformanceAnalyzer {
    /// Rolling metrics with the configured window
    pub fn calculate_rolling_metrics(&self, series: &ValueSeries) -> MetricResult<RollingMetrics> {
        self.rolling(series, self.config.rolling_window)
    }

    /// Rolling metrics with an explicit window
    pub fn calculate_rolling_metrics_with_window(
        &self,
        series: &ValueSeries,
        window: usize,
    ) -> Result<MetricResult<RollingMetrics>> {
        if window == 0 {
            return Err(PortfolioError::InvalidParameter(
                "Rolling window must be at least 1".to_string(),
            ));
        }
        Ok(self.rolling(series, window))
    }

    fn rolling(&self, series: &ValueSeries, window: usize) -> MetricResult<RollingMetrics> {
        let returns = match self.prepare(series) {
            Ok(returns) => returns,
            Err(reason) => return reason.into(),
        };
        let values = series.values();

        let points: Vec<RollingPoint> = returns
            .windows(window)
            .map(|slice| self.rolling_point(slice, &values, window))
            .collect();

        debug!(
            "Rolling metrics: window={}, {} points from {} returns",
            window,
            points.len(),
            returns.len()
        );

        MetricResult::Computed(RollingMetrics { window, points })
    }

    fn rolling_point(&self, slice: &[PeriodReturn], values: &[f64], window: usize) -> RollingPoint {
        let factor = self.config.annualization_factor;
        let window_returns: Vec<f64> = slice.iter().map(|r| r.value).collect();

        let rolling_return = stats::mean(&window_returns) * factor;
        let rolling_volatility = self.annualize_volatility(stats::sample_std_dev(&window_returns));
        let rolling_sharpe = if rolling_volatility == 0.0 {
            0.0
        } else {
            finite_or_zero(rolling_return / rolling_volatility)
        };

        // The closing return's sample index is at least `window`
        let closing = slice[slice.len() - 1];
        let end = closing.index + 1;
        let rolling_drawdown = stats::drawdown_from_peak(&values[end.saturating_sub(window)..end]);

        RollingPoint {
            timestamp: closing.timestamp,
            rolling_return,
            rolling_volatility,
            rolling_sharpe,
            rolling_drawdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Unavailable;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    fn series(values: &[f64]) -> ValueSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        ValueSeries::from_daily_values(start, values).unwrap()
    }

    #[test]
    fn test_points_only_for_full_windows() {
        let values: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let analyzer = PerformanceAnalyzer::default();
        let rolling = analyzer
            .calculate_rolling_metrics_with_window(&series(&values), 3)
            .unwrap()
            .into_result()
            .unwrap();

        // 9 returns, windows of 3
        assert_eq!(rolling.window, 3);
        assert_eq!(rolling.points.len(), 7);
        assert_eq!(rolling.points[0].timestamp, series(&values).samples()[3].timestamp);

        // Rising series never draws down
        assert!(rolling.points.iter().all(|p| p.rolling_drawdown == 0.0));
        assert!(rolling.points.iter().all(|p| p.rolling_return > 0.0));
    }

    #[test]
    fn test_window_values() {
        let analyzer = PerformanceAnalyzer::default();
        let rolling = analyzer
            .calculate_rolling_metrics_with_window(&series(&[100.0, 110.0, 99.0, 121.0]), 2)
            .unwrap()
            .into_result()
            .unwrap();

        assert_eq!(rolling.points.len(), 2);

        let first = rolling.points[0];
        // Returns 0.10 and -0.10
        assert_relative_eq!(first.rolling_return, 0.0, epsilon = 1e-12);
        assert_relative_eq!(first.rolling_sharpe, 0.0, epsilon = 1e-9);
        assert_relative_eq!(first.rolling_drawdown, (99.0 - 110.0) / 110.0, epsilon = 1e-12);
        assert!(first.rolling_volatility > 0.0);

        // Window of values [99, 121] closes at its peak
        assert_eq!(rolling.points[1].rolling_drawdown, 0.0);
    }

    #[test]
    fn test_series_not_longer_than_window() {
        let analyzer = PerformanceAnalyzer::default();
        let values: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();

        let rolling = analyzer
            .calculate_rolling_metrics(&series(&values))
            .into_result()
            .unwrap();
        assert_eq!(rolling.window, 30);
        assert!(rolling.points.is_empty());

        let values: Vec<f64> = (0..31).map(|i| 100.0 + i as f64).collect();
        let rolling = analyzer
            .calculate_rolling_metrics(&series(&values))
            .into_result()
            .unwrap();
        assert_eq!(rolling.points.len(), 1);
    }

    #[test]
    fn test_flat_window_has_zero_sharpe() {
        let analyzer = PerformanceAnalyzer::default();
        let rolling = analyzer
            .calculate_rolling_metrics_with_window(&series(&[50.0; 6]), 3)
            .unwrap()
            .into_result()
            .unwrap();

        for point in &rolling.points {
            assert_eq!(point.rolling_volatility, 0.0);
            assert_eq!(point.rolling_sharpe, 0.0);
        }
    }

    #[test]
    fn test_zero_window_rejected() {
        let analyzer = PerformanceAnalyzer::default();
        let result = analyzer.calculate_rolling_metrics_with_window(&series(&[1.0, 2.0]), 0);
        assert!(matches!(result, Err(PortfolioError::InvalidParameter(_))));
    }

    #[test]
    fn test_single_sample_marker() {
        let analyzer = PerformanceAnalyzer::default();
        let result = analyzer
            .calculate_rolling_metrics_with_window(&series(&[1.0]), 5)
            .unwrap();
        assert_eq!(
            result.unavailable(),
            Some(Unavailable::InsufficientData { required: 2, available: 1 })
        );
    }
}

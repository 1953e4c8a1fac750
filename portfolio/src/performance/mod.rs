//! Returns/performance engine
//!
//! Turns a historical value series into return, volatility, drawdown,
//! tail-risk, benchmark and rolling-window metrics:
//! - [`PerformanceAnalyzer::calculate_returns`]: total/annualized return, Sharpe, Calmar
//! - [`PerformanceAnalyzer::calculate_risk_metrics`]: VaR/CVaR, downside deviation, beta, moments
//! - [`PerformanceAnalyzer::calculate_performance_attribution`]: both of the above plus a
//!   benchmark comparison
//! - [`PerformanceAnalyzer::calculate_rolling_metrics`]: windowed return, volatility, Sharpe
//!   and drawdown
//!
//! Series with fewer than two samples, or with no defined return, produce an
//! [`Unavailable`] marker rather than an error.

mod attribution;
mod returns;
mod risk;
mod rolling;

pub use attribution::{BenchmarkComparison, PerformanceAttribution};
pub use returns::ReturnMetrics;
pub use risk::SeriesRiskMetrics;
pub use rolling::{RollingMetrics, RollingPoint};

use crate::config::PerformanceConfig;
use crate::error::Result;
use crate::result::Unavailable;
use crate::types::{PeriodReturn, ValueSeries};
use tracing::debug;

/// Minimum number of samples any performance metric needs
pub const MIN_SAMPLES: usize = 2;

/// Performance analyzer over historical value series
#[derive(Debug, Clone, Default)]
pub struct PerformanceAnalyzer {
    config: PerformanceConfig,
}

impl PerformanceAnalyzer {
    /// Create an analyzer, validating the configuration
    pub fn new(config: PerformanceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PerformanceConfig {
        &self.config
    }

    /// Check the sample count and derive the return series
    fn prepare(&self, series: &ValueSeries) -> std::result::Result<Vec<PeriodReturn>, Unavailable> {
        if series.len() < MIN_SAMPLES {
            debug!("Series has {} samples, need {}", series.len(), MIN_SAMPLES);
            return Err(Unavailable::InsufficientData {
                required: MIN_SAMPLES,
                available: series.len(),
            });
        }

        let returns = series.returns();
        if returns.is_empty() {
            debug!("No defined returns in series of {} samples", series.len());
            return Err(Unavailable::NoValidReturns);
        }

        Ok(returns)
    }

    fn annualize_volatility(&self, std_dev: f64) -> f64 {
        std_dev * self.config.annualization_factor.sqrt()
    }
}

fn return_values(returns: &[PeriodReturn]) -> Vec<f64> {
    returns.iter().map(|r| r.value).collect()
}

/// Replace overflowed or undefined results with 0.0
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

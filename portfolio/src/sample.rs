//! Sample data for demos, tests and benchmarks
//!
//! A fixed five-stock NSE portfolio and a geometric Brownian motion
//! generator for synthetic daily value series.

use crate::error::{PortfolioError, Result};
use crate::types::{Holding, PortfolioSnapshot, ValueSample, ValueSeries};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Five NSE holdings worth 79,000 in total with 4,700 of P&L
pub fn sample_holdings() -> Vec<Holding> {
    vec![
        Holding::new("RELIANCE", "NSE", 100, 25_000.0, 2_500.0).with_sector("Oil & Gas"),
        Holding::new("TCS", "NSE", 50, 15_000.0, -500.0).with_sector("IT"),
        Holding::new("HDFCBANK", "NSE", 75, 12_000.0, 1_200.0).with_sector("Banking"),
        Holding::new("INFY", "NSE", 200, 18_000.0, 1_800.0).with_sector("IT"),
        Holding::new("ITC", "NSE", 300, 9_000.0, -300.0).with_sector("FMCG"),
    ]
}

/// The sample holdings as a snapshot taken at `timestamp`
pub fn sample_snapshot(timestamp: DateTime<Utc>) -> Result<PortfolioSnapshot> {
    PortfolioSnapshot::new(sample_holdings(), timestamp)
}

/// Synthetic daily value series generator
///
/// Each day the value moves by `exp(μ - σ²/2 + σ·z)` with z ~ N(0, 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesGenerator {
    /// Number of samples to generate
    pub days: usize,

    /// Value of the first sample
    pub initial_value: f64,

    /// Mean daily log drift (μ)
    pub daily_drift: f64,

    /// Daily volatility (σ)
    pub daily_volatility: f64,

    /// Holdings count stamped on every sample
    pub holding_count: u32,

    /// Random seed for reproducible series (None = random)
    pub random_seed: Option<u64>,
}

impl Default for SeriesGenerator {
    fn default() -> Self {
        Self {
            days: 252,
            initial_value: 79_000.0,
            daily_drift: 0.0004,
            daily_volatility: 0.012,
            holding_count: 5,
            random_seed: Some(42),
        }
    }
}

impl SeriesGenerator {
    pub fn with_days(mut self, days: usize) -> Self {
        self.days = days;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Generate a daily series starting at `start`
    ///
    /// `total_pnl` of each sample is its value minus the initial value.
    pub fn generate(&self, start: DateTime<Utc>) -> Result<ValueSeries> {
        if !(self.initial_value.is_finite() && self.daily_drift.is_finite()) {
            return Err(PortfolioError::InvalidParameter(
                "initial_value and daily_drift must be finite".to_string(),
            ));
        }

        if !(self.daily_volatility.is_finite() && self.daily_volatility >= 0.0) {
            return Err(PortfolioError::InvalidParameter(format!(
                "daily_volatility must be finite and non-negative, got {}",
                self.daily_volatility
            )));
        }

        let normal = Normal::new(0.0, self.daily_volatility)
            .map_err(|e| PortfolioError::InvalidParameter(format!("daily_volatility: {}", e)))?;

        let mut rng = match self.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let drift = self.daily_drift - 0.5 * self.daily_volatility * self.daily_volatility;
        let mut value = self.initial_value;
        let mut samples = Vec::with_capacity(self.days);

        for day in 0..self.days {
            if day > 0 {
                value *= (drift + normal.sample(&mut rng)).exp();
            }
            samples.push(ValueSample {
                timestamp: start + Duration::days(day as i64),
                total_value: value,
                total_pnl: value - self.initial_value,
                holding_count: self.holding_count,
            });
        }

        ValueSeries::new(samples)
    }
}

//! Volatility sources for the risk engine
//!
//! The risk engine never estimates volatility itself; it asks a
//! [`VolatilitySource`]. The default [`PlaceholderVolatility`] hands out the
//! fixed figures from [`RiskConfig`].

use crate::config::RiskConfig;
use crate::types::Holding;

/// Supplies annualized volatility figures to the risk engine
pub trait VolatilitySource: Send + Sync {
    /// Annualized volatility of a single holding
    fn stock_volatility(&self, holding: &Holding) -> f64;

    /// Annualized volatility of the portfolio as a whole
    fn portfolio_volatility(&self, holdings: &[Holding]) -> f64;
}

/// Fixed volatility for every stock and for the portfolio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceholderVolatility {
    pub stock: f64,
    pub portfolio: f64,
}

impl PlaceholderVolatility {
    pub fn new(stock: f64, portfolio: f64) -> Self {
        Self { stock, portfolio }
    }

    pub fn from_config(config: &RiskConfig) -> Self {
        Self::new(config.stock_volatility, config.portfolio_volatility)
    }
}

impl Default for PlaceholderVolatility {
    fn default() -> Self {
        Self::from_config(&RiskConfig::default())
    }
}

impl VolatilitySource for PlaceholderVolatility {
    fn stock_volatility(&self, _holding: &Holding) -> f64 {
        self.stock
    }

    fn portfolio_volatility(&self, _holdings: &[Holding]) -> f64 {
        self.portfolio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_defaults() {
        let source = PlaceholderVolatility::default();
        let holding = Holding::new("TCS", "NSE", 50, 15_000.0, -500.0);

        assert_eq!(source.stock_volatility(&holding), 0.25);
        assert_eq!(source.portfolio_volatility(&[holding]), 0.20);
    }

    #[test]
    fn test_from_config() {
        let config = RiskConfig {
            stock_volatility: 0.4,
            portfolio_volatility: 0.3,
            ..Default::default()
        };
        let source = PlaceholderVolatility::from_config(&config);
        assert_eq!(source, PlaceholderVolatility::new(0.4, 0.3));
    }
}

//! Parametric Value at Risk
//!
//! VaR = σ × Φ⁻¹(1 − confidence), a signed return quantile under a normal
//! distribution. Losses are negative: at 95% confidence and σ = 0.20 the
//! result is about −0.329.

use crate::config::validate_confidence;
use crate::error::{PortfolioError, Result};
use statrs::distribution::{ContinuousCDF, Normal};

/// Inverse CDF of the standard normal distribution
pub fn normal_quantile(probability: f64) -> Result<f64> {
    if !(probability > 0.0 && probability < 1.0) {
        return Err(PortfolioError::InvalidParameter(format!(
            "Probability must be in (0, 1), got {}",
            probability
        )));
    }

    let normal = Normal::new(0.0, 1.0).map_err(|e| {
        PortfolioError::CalculationError(format!("Failed to create normal distribution: {}", e))
    })?;

    Ok(normal.inverse_cdf(probability))
}

/// Parametric VaR of an annualized volatility at `confidence`
pub fn parametric_var(volatility: f64, confidence: f64) -> Result<f64> {
    validate_confidence(confidence)?;
    Ok(volatility * normal_quantile(1.0 - confidence)?)
}

//! Analytics configuration
//!
//! Loaded from YAML or JSON, or built from defaults. Every analyzer takes
//! its section explicitly; there is no global configuration.

use crate::error::{PortfolioError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for both analytics engines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Returns/performance engine settings
    #[serde(default)]
    pub performance: PerformanceConfig,

    /// Risk & diversification engine settings
    #[serde(default)]
    pub risk: RiskConfig,
}

/// Returns/performance engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceConfig {
    /// Trading periods per year
    #[serde(default = "default_annualization_factor")]
    pub annualization_factor: f64,

    /// Annual risk-free rate used by the Sharpe ratio
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,

    /// Window (in returns) for rolling metrics
    #[serde(default = "default_rolling_window")]
    pub rolling_window: usize,

    /// Short lookback (in samples) for the rolling period return
    #[serde(default = "default_short_lookback")]
    pub short_lookback: usize,

    /// Long lookback (in samples) for the rolling period return
    #[serde(default = "default_long_lookback")]
    pub long_lookback: usize,

    /// Confidence level of the primary VaR/CVaR pair
    #[serde(default = "default_var_confidence")]
    pub var_confidence: f64,

    /// Confidence level of the tail VaR/CVaR pair
    #[serde(default = "default_tail_var_confidence")]
    pub tail_var_confidence: f64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            annualization_factor: default_annualization_factor(),
            risk_free_rate: default_risk_free_rate(),
            rolling_window: default_rolling_window(),
            short_lookback: default_short_lookback(),
            long_lookback: default_long_lookback(),
            var_confidence: default_var_confidence(),
            tail_var_confidence: default_tail_var_confidence(),
        }
    }
}

impl PerformanceConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.annualization_factor > 0.0 && self.annualization_factor.is_finite()) {
            return Err(PortfolioError::ConfigError(format!(
                "annualization_factor must be positive, got {}",
                self.annualization_factor
            )));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(PortfolioError::ConfigError(
                "risk_free_rate must be finite".to_string(),
            ));
        }
        for (name, value) in [
            ("rolling_window", self.rolling_window),
            ("short_lookback", self.short_lookback),
            ("long_lookback", self.long_lookback),
        ] {
            if value == 0 {
                return Err(PortfolioError::ConfigError(format!(
                    "{} must be at least 1",
                    name
                )));
            }
        }
        validate_confidence(self.var_confidence)?;
        validate_confidence(self.tail_var_confidence)?;
        Ok(())
    }

    /// Per-period risk-free rate
    pub fn periodic_risk_free_rate(&self) -> f64 {
        self.risk_free_rate / self.annualization_factor
    }
}

/// Risk & diversification engine configuration
///
/// The volatility and drawdown figures are placeholders: the engine has no
/// per-instrument history, so every stock gets the same volatility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Annualized volatility assumed for every stock
    #[serde(default = "default_stock_volatility")]
    pub stock_volatility: f64,

    /// Annualized volatility assumed for the whole portfolio
    #[serde(default = "default_portfolio_volatility")]
    pub portfolio_volatility: f64,

    /// Reported maximum drawdown estimate
    #[serde(default = "default_max_drawdown_estimate")]
    pub max_drawdown_estimate: f64,

    /// Confidence level of `var_95`
    #[serde(default = "default_var_confidence")]
    pub var_confidence: f64,

    /// Confidence level of `var_99`
    #[serde(default = "default_tail_var_confidence")]
    pub tail_var_confidence: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            stock_volatility: default_stock_volatility(),
            portfolio_volatility: default_portfolio_volatility(),
            max_drawdown_estimate: default_max_drawdown_estimate(),
            var_confidence: default_var_confidence(),
            tail_var_confidence: default_tail_var_confidence(),
        }
    }
}

impl RiskConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("stock_volatility", self.stock_volatility),
            ("portfolio_volatility", self.portfolio_volatility),
            ("max_drawdown_estimate", self.max_drawdown_estimate),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(PortfolioError::ConfigError(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        validate_confidence(self.var_confidence)?;
        validate_confidence(self.tail_var_confidence)?;
        Ok(())
    }
}

impl AnalyticsConfig {
    pub fn validate(&self) -> Result<()> {
        self.performance.validate()?;
        self.risk.validate()
    }

    /// Parse and validate a YAML document
    ///
    /// # Example
    ///
    /// ```
    /// use ag_portfolio::AnalyticsConfig;
    ///
    /// let yaml = r#"
    /// performance:
    ///   risk_free_rate: 0.065
    /// "#;
    ///
    /// let config = AnalyticsConfig::from_yaml(yaml).unwrap();
    /// assert_eq!(config.performance.risk_free_rate, 0.065);
    /// assert_eq!(config.performance.annualization_factor, 252.0);
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }
}

pub(crate) fn validate_confidence(confidence: f64) -> Result<()> {
    if confidence > 0.0 && confidence < 1.0 {
        Ok(())
    } else {
        Err(PortfolioError::InvalidConfidenceLevel(confidence))
    }
}

// Default value functions
fn default_annualization_factor() -> f64 {
    252.0
}

fn default_risk_free_rate() -> f64 {
    0.02
}

fn default_rolling_window() -> usize {
    30
}

fn default_short_lookback() -> usize {
    30
}

fn default_long_lookback() -> usize {
    90
}

fn default_var_confidence() -> f64 {
    0.95
}

fn default_tail_var_confidence() -> f64 {
    0.99
}

fn default_stock_volatility() -> f64 {
    0.25
}

fn default_portfolio_volatility() -> f64 {
    0.20
}

fn default_max_drawdown_estimate() -> f64 {
    0.15
}

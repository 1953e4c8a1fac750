//! # ag-portfolio: Portfolio Returns, Risk & Diversification Analytics
//!
//! This library computes analytics over equity portfolios: a snapshot of
//! holdings (market value and P&L per stock) and a history of portfolio
//! valuations.
//!
//! ## Core Components
//!
//! - **PerformanceAnalyzer**: returns, volatility, Sharpe/Calmar, drawdown,
//!   VaR/CVaR, benchmark attribution and rolling-window metrics
//! - **RiskAnalyzer**: concentration, sector exposure, HHI, composite risk
//!   score, parametric VaR and diversification recommendations
//! - **PortfolioSummary**: totals, sector allocation, top holdings and P&L split
//!
//! Each analysis returns a [`MetricResult`]: either the computed metrics or an
//! [`Unavailable`] marker when the input holds too little data. Malformed
//! input is a [`PortfolioError`].
//!
//! ## Example Usage
//!
//! ```rust
//! use ag_portfolio::{sample_holdings, RiskAnalyzer, PerformanceAnalyzer, SeriesGenerator};
//! use chrono::{TimeZone, Utc};
//!
//! let risk = RiskAnalyzer::default();
//! let analysis = risk
//!     .analyze_portfolio_risk(&sample_holdings())
//!     .unwrap()
//!     .into_result()
//!     .unwrap();
//! assert!(analysis.risk_score > 8.0);
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let series = SeriesGenerator::default().generate(start).unwrap();
//!
//! let performance = PerformanceAnalyzer::default();
//! let metrics = performance.calculate_returns(&series).into_result().unwrap();
//! assert!(metrics.max_drawdown <= 0.0);
//! ```

pub mod config;
pub mod error;
pub mod performance;
pub mod result;
pub mod risk;
pub mod sample;
pub mod stats;
pub mod summary;
pub mod types;
pub mod volatility;

pub use config::{AnalyticsConfig, PerformanceConfig, RiskConfig};
pub use error::{PortfolioError, Result};
pub use performance::{
    BenchmarkComparison, PerformanceAnalyzer, PerformanceAttribution, ReturnMetrics,
    RollingMetrics, RollingPoint, SeriesRiskMetrics,
};
pub use result::{MetricResult, Unavailable};
pub use risk::{
    ConcentrationRisk, DiversificationAnalysis, HoldingsRiskMetrics, PortfolioRiskAnalysis,
    Recommendation, RiskAnalyzer, RiskConcentration, RiskLevel, SectorConcentration, SectorRisk,
    StockConcentration, StockRisk, TailRisk, VolatilityAnalysis,
};
pub use sample::{sample_holdings, sample_snapshot, SeriesGenerator};
pub use summary::{PnlAnalysis, PortfolioSummary, PositionSummary, SectorSummary};
pub use types::{Holding, PeriodReturn, PortfolioSnapshot, ValueSample, ValueSeries};
pub use volatility::{PlaceholderVolatility, VolatilitySource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing subscriber (for examples and tests)
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ag_portfolio=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

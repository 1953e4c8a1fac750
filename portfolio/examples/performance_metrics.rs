//! Performance metrics example
//!
//! Generates a year of synthetic daily valuations for a portfolio and a
//! benchmark, then runs the returns/performance engine over them.
//!
//! Run with: cargo run --example performance_metrics

use ag_portfolio::{AnalyticsConfig, PerformanceAnalyzer, SeriesGenerator};
use chrono::{TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    ag_portfolio::init_tracing();

    println!("=== Performance Metrics Example ===\n");

    // 1. Synthetic history
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().ok_or("invalid start date")?;
    let portfolio = SeriesGenerator::default().generate(start)?;
    let benchmark = SeriesGenerator {
        initial_value: 100.0,
        daily_drift: 0.0003,
        daily_volatility: 0.010,
        ..Default::default()
    }
    .with_seed(7)
    .generate(start)?;

    println!("Portfolio samples: {}", portfolio.len());
    println!("Benchmark samples: {}\n", benchmark.len());

    let analyzer = PerformanceAnalyzer::new(AnalyticsConfig::default().performance)?;

    // 2. Returns
    println!("--- Returns ---");
    let returns = analyzer.calculate_returns(&portfolio).into_result()?;
    println!("Total return: {:.2}%", returns.total_return * 100.0);
    println!("Annualized return: {:.2}%", returns.annualized_return * 100.0);
    println!("Volatility: {:.2}%", returns.volatility * 100.0);
    println!("Sharpe ratio: {:.3}", returns.sharpe_ratio);
    println!("Max drawdown: {:.2}%", returns.max_drawdown * 100.0);
    println!("Calmar ratio: {:.3}", returns.calmar_ratio);
    match returns.rolling_30d_return {
        Some(r) => println!("30-day return: {:.2}%", r * 100.0),
        None => println!("30-day return: n/a"),
    }
    println!();

    // 3. Risk against the benchmark
    println!("--- Risk ---");
    let risk = analyzer
        .calculate_risk_metrics(&portfolio, Some(&benchmark))
        .into_result()?;
    println!("VaR 95%: {:.2}%  CVaR 95%: {:.2}%", risk.var_95 * 100.0, risk.cvar_95 * 100.0);
    println!("VaR 99%: {:.2}%  CVaR 99%: {:.2}%", risk.var_99 * 100.0, risk.cvar_99 * 100.0);
    println!("Downside deviation: {:.2}%", risk.downside_deviation * 100.0);
    println!("Beta: {:.3}", risk.beta);
    println!("Skewness: {:.3}, excess kurtosis: {:.3}", risk.skewness, risk.kurtosis);
    println!();

    // 4. Attribution
    println!("--- Benchmark Comparison ---");
    let attribution = analyzer
        .calculate_performance_attribution(&portfolio, Some(&benchmark))
        .into_result()?;
    if let Some(comparison) = attribution.benchmark_comparison {
        println!("Excess return: {:.2}%", comparison.excess_return * 100.0);
        println!("Tracking error: {:.2}%", comparison.tracking_error * 100.0);
        println!("Information ratio: {:.3}", comparison.information_ratio);
        println!("Correlation: {:.3}", comparison.correlation);
    }
    println!();

    // 5. Rolling metrics
    println!("--- Rolling Metrics (last 5 windows) ---");
    let rolling = analyzer.calculate_rolling_metrics(&portfolio).into_result()?;
    for point in rolling.points.iter().rev().take(5).rev() {
        println!(
            "{}  return {:>7.2}%  vol {:>6.2}%  sharpe {:>6.2}  drawdown {:>6.2}%",
            point.timestamp.format("%Y-%m-%d"),
            point.rolling_return * 100.0,
            point.rolling_volatility * 100.0,
            point.rolling_sharpe,
            point.rolling_drawdown * 100.0
        );
    }

    println!("\n=== Example Complete ===");

    Ok(())
}

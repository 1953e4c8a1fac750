//! Portfolio risk analysis example
//!
//! Runs the risk & diversification engine and the composition summary over
//! the five-stock sample portfolio.
//!
//! Run with: cargo run --example portfolio_risk

use ag_portfolio::{sample_snapshot, AnalyticsConfig, PortfolioSummary, RiskAnalyzer};
use chrono::Utc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    ag_portfolio::init_tracing();

    println!("=== Portfolio Risk Analysis Example ===\n");

    // 1. Load the sample portfolio
    let snapshot = sample_snapshot(Utc::now())?;
    let holdings = snapshot.holdings();

    println!("Holdings:");
    for holding in holdings {
        println!(
            "  {:<10} {:<10} {:>10.2}  P&L {:>9.2}",
            holding.symbol,
            holding.sector(),
            holding.market_value()?,
            holding.pnl
        );
    }
    println!();

    // 2. Composition summary
    println!("--- Portfolio Summary ---");
    let summary = PortfolioSummary::from_holdings(holdings)?;
    println!("Total Value: {:.2}", summary.total_value);
    println!(
        "Total P&L: {:.2} ({:.2}%)",
        summary.total_pnl, summary.total_pnl_percentage
    );
    println!("Top sectors:");
    for (sector, data) in summary.top_sectors(5) {
        println!("  - {}: {:.1}% ({:.2})", sector, data.percentage, data.total_value);
    }
    println!(
        "Positive P&L stocks: {}, negative: {}",
        summary.pnl_analysis.positive_count, summary.pnl_analysis.negative_count
    );
    println!();

    // 3. Risk analysis with the default configuration
    let config = AnalyticsConfig::default();
    let analyzer = RiskAnalyzer::new(config.risk)?;

    println!("--- Portfolio Risk ---");
    match analyzer.analyze_portfolio_risk(holdings)?.into_result() {
        Ok(risk) => {
            println!(
                "Top 5 concentration: {:.1}% ({})",
                risk.concentration_risk.top_5_concentration,
                risk.concentration_risk.concentration_risk_level
            );
            println!(
                "Max sector concentration: {:.1}% ({})",
                risk.sector_risk.max_sector_concentration, risk.sector_risk.sector_risk_level
            );
            println!("Portfolio volatility: {:.2}%", risk.portfolio_volatility * 100.0);
            println!("95% VaR: {:.2}%", risk.var_95 * 100.0);
            println!("99% VaR: {:.2}%", risk.var_99 * 100.0);
            println!("Risk score: {:.2}/10", risk.risk_score);
            println!("Diversification score: {:.2}/10", risk.diversification_score);
        }
        Err(reason) => println!("Error: {}", reason),
    }
    println!();

    // 4. Diversification
    println!("--- Diversification ---");
    if let Some(diversification) = analyzer.analyze_diversification(holdings)?.computed() {
        println!(
            "Herfindahl-Hirschman Index: {:.3}",
            diversification.herfindahl_hirschman_index
        );
        println!(
            "Effective number of stocks: {:.1}",
            diversification.effective_number_of_stocks
        );
        println!("Recommendations:");
        for recommendation in &diversification.diversification_recommendations {
            println!("  - {}", recommendation);
        }
    }
    println!();

    // 5. Per-stock risk as JSON
    println!("--- Holdings Risk (JSON) ---");
    let holdings_risk = analyzer.calculate_holdings_risk(holdings)?;
    println!("{}", serde_json::to_string_pretty(&holdings_risk)?);

    println!("\n=== Example Complete ===");

    Ok(())
}

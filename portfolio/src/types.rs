//! Portfolio data model
//!
//! Holdings and snapshots for the risk engine, value series for the
//! performance engine. Both are validated once at construction (or
//! deserialization) and never mutated by the analyzers.

use crate::error::{PortfolioError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Sector assigned to holdings that carry none
pub const UNKNOWN_SECTOR: &str = "Unknown";

/// One equity position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Trading symbol, unique within a snapshot
    #[serde(alias = "tradingsymbol")]
    pub symbol: String,

    /// Listing exchange (e.g., "NSE")
    #[serde(default)]
    pub exchange: String,

    /// Number of shares held
    #[serde(default)]
    pub quantity: u64,

    /// Market value as reported by the broker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_value: Option<f64>,

    /// Last close, used when no market value is reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_price: Option<f64>,

    /// Unrealized profit/loss
    pub pnl: f64,

    /// Industry sector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
}

impl Holding {
    /// Create a holding with a reported market value
    pub fn new(
        symbol: impl Into<String>,
        exchange: impl Into<String>,
        quantity: u64,
        market_value: f64,
        pnl: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            exchange: exchange.into(),
            quantity,
            market_value: Some(market_value),
            close_price: None,
            pnl,
            sector: None,
        }
    }

    /// Create a holding valued from quantity and close price
    pub fn priced(
        symbol: impl Into<String>,
        exchange: impl Into<String>,
        quantity: u64,
        close_price: f64,
        pnl: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            exchange: exchange.into(),
            quantity,
            market_value: None,
            close_price: Some(close_price),
            pnl,
            sector: None,
        }
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    /// Sector name, "Unknown" when absent
    pub fn sector(&self) -> &str {
        self.sector.as_deref().unwrap_or(UNKNOWN_SECTOR)
    }

    /// Resolve the market value of this holding
    ///
    /// Uses `market_value` when present, otherwise `quantity * close_price`.
    /// This is the only place a market value is derived.
    pub fn market_value(&self) -> Result<f64> {
        let value = match (self.market_value, self.close_price) {
            (Some(value), _) => value,
            (None, Some(price)) => self.quantity as f64 * price,
            (None, None) => {
                return Err(self.invalid("neither market_value nor close_price is set"));
            }
        };

        if !value.is_finite() {
            return Err(self.invalid("market value is not finite"));
        }
        if value < 0.0 {
            return Err(self.invalid(&format!("negative market value {}", value)));
        }

        Ok(value)
    }

    fn invalid(&self, reason: &str) -> PortfolioError {
        PortfolioError::InvalidHolding {
            symbol: self.symbol.clone(),
            reason: reason.to_string(),
        }
    }
}

/// A holding paired with its resolved market value
#[derive(Debug, Clone, Copy)]
pub struct ValuedHolding<'a> {
    pub holding: &'a Holding,
    pub market_value: f64,
}

/// Resolve market values for a whole holdings list
///
/// Fails on the first holding whose value cannot be resolved or whose P&L
/// is not finite.
pub fn value_holdings(holdings: &[Holding]) -> Result<Vec<ValuedHolding<'_>>> {
    holdings
        .iter()
        .map(|holding| {
            if !holding.pnl.is_finite() {
                return Err(holding.invalid("pnl is not finite"));
            }
            Ok(ValuedHolding {
                holding,
                market_value: holding.market_value()?,
            })
        })
        .collect()
}

/// Sum of resolved market values
pub fn total_value(valued: &[ValuedHolding<'_>]) -> f64 {
    valued.iter().map(|v| v.market_value).sum()
}

/// Holdings ordered by descending market value
///
/// The sort is stable, so equal values keep their input order.
pub fn rank_by_value<'a, 'b>(valued: &'b [ValuedHolding<'a>]) -> Vec<&'b ValuedHolding<'a>> {
    let mut ranked: Vec<_> = valued.iter().collect();
    ranked.sort_by(|a, b| b.market_value.total_cmp(&a.market_value));
    ranked
}

/// Validated set of holdings at a point in time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SnapshotRecord")]
pub struct PortfolioSnapshot {
    /// When the holdings were captured
    pub timestamp: DateTime<Utc>,

    holdings: Vec<Holding>,

    #[serde(skip_serializing)]
    total_value: f64,
}

#[derive(Deserialize)]
struct SnapshotRecord {
    timestamp: DateTime<Utc>,
    #[serde(default)]
    holdings: Vec<Holding>,
}

impl TryFrom<SnapshotRecord> for PortfolioSnapshot {
    type Error = PortfolioError;

    fn try_from(record: SnapshotRecord) -> Result<Self> {
        Self::new(record.holdings, record.timestamp)
    }
}

impl PortfolioSnapshot {
    /// Build a snapshot, rejecting duplicate symbols and unresolvable values
    pub fn new(holdings: Vec<Holding>, timestamp: DateTime<Utc>) -> Result<Self> {
        let mut seen = HashSet::new();
        for holding in &holdings {
            if !seen.insert(holding.symbol.as_str()) {
                return Err(PortfolioError::DuplicateSymbol(holding.symbol.clone()));
            }
        }

        let total_value = total_value(&value_holdings(&holdings)?);

        Ok(Self {
            timestamp,
            holdings,
            total_value,
        })
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    /// Sum of resolved market values
    pub fn total_value(&self) -> f64 {
        self.total_value
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }
}

/// One historical valuation of the portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSample {
    pub timestamp: DateTime<Utc>,

    /// Total portfolio value
    pub total_value: f64,

    /// Total unrealized P&L
    #[serde(default)]
    pub total_pnl: f64,

    /// Number of holdings at this time
    #[serde(default, alias = "num_holdings")]
    pub holding_count: u32,
}

impl ValueSample {
    pub fn new(timestamp: DateTime<Utc>, total_value: f64) -> Self {
        Self {
            timestamp,
            total_value,
            total_pnl: 0.0,
            holding_count: 0,
        }
    }
}

/// Return over one sample interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodReturn {
    /// Timestamp of the sample closing the interval
    pub timestamp: DateTime<Utc>,

    /// Index of the closing sample in the series
    pub index: usize,

    /// Relative change `value[index] / value[index - 1] - 1`
    pub value: f64,
}

/// Time-ordered portfolio valuations
///
/// Timestamps are strictly increasing and all values are finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ValueSample>", into = "Vec<ValueSample>")]
pub struct ValueSeries {
    samples: Vec<ValueSample>,
}

impl TryFrom<Vec<ValueSample>> for ValueSeries {
    type Error = PortfolioError;

    fn try_from(samples: Vec<ValueSample>) -> Result<Self> {
        Self::new(samples)
    }
}

impl From<ValueSeries> for Vec<ValueSample> {
    fn from(series: ValueSeries) -> Self {
        series.samples
    }
}

impl ValueSeries {
    pub fn new(samples: Vec<ValueSample>) -> Result<Self> {
        for (index, sample) in samples.iter().enumerate() {
            if !sample.total_value.is_finite() || !sample.total_pnl.is_finite() {
                return Err(PortfolioError::NonFiniteValue(index));
            }
            if index > 0 && sample.timestamp <= samples[index - 1].timestamp {
                return Err(PortfolioError::NonIncreasingTimestamp {
                    index,
                    timestamp: sample.timestamp.to_rfc3339(),
                });
            }
        }

        Ok(Self { samples })
    }

    /// Build a daily series from bare values, starting at `start`
    pub fn from_daily_values(start: DateTime<Utc>, values: &[f64]) -> Result<Self> {
        let samples = values
            .iter()
            .enumerate()
            .map(|(day, &value)| ValueSample::new(start + Duration::days(day as i64), value))
            .collect();
        Self::new(samples)
    }

    pub fn samples(&self) -> &[ValueSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.total_value).collect()
    }

    /// Pairwise relative changes
    ///
    /// Intervals starting from a zero value have no defined ratio and are
    /// skipped, so the result may be shorter than `len() - 1`.
    pub fn returns(&self) -> Vec<PeriodReturn> {
        self.samples
            .windows(2)
            .enumerate()
            .filter_map(|(i, pair)| {
                let previous = pair[0].total_value;
                if previous == 0.0 {
                    return None;
                }
                let value = pair[1].total_value / previous - 1.0;
                value.is_finite().then_some(PeriodReturn {
                    timestamp: pair[1].timestamp,
                    index: i + 1,
                    value,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_market_value_resolution() {
        let reported = Holding::new("RELIANCE", "NSE", 100, 25_000.0, 2_500.0);
        assert_eq!(reported.market_value().unwrap(), 25_000.0);

        let priced = Holding::priced("TEST", "NSE", 100, 50.0, 1_000.0);
        assert_eq!(priced.market_value().unwrap(), 5_000.0);

        // Reported value wins over quantity * close
        let mut both = Holding::new("BOTH", "NSE", 10, 1_000.0, 0.0);
        both.close_price = Some(5.0);
        assert_eq!(both.market_value().unwrap(), 1_000.0);
    }

    #[test]
    fn test_market_value_missing_fields() {
        let mut holding = Holding::new("X", "NSE", 10, 0.0, 0.0);
        holding.market_value = None;

        let err = holding.market_value().unwrap_err();
        assert!(matches!(err, PortfolioError::InvalidHolding { .. }));
    }

    #[test]
    fn test_negative_market_value_rejected() {
        let holding = Holding::new("X", "NSE", 10, -5.0, 0.0);
        assert!(holding.market_value().is_err());
    }

    #[test]
    fn test_sector_defaults_to_unknown() {
        let holding = Holding::new("X", "NSE", 1, 1.0, 0.0);
        assert_eq!(holding.sector(), UNKNOWN_SECTOR);
        assert_eq!(holding.with_sector("IT").sector(), "IT");
    }

    #[test]
    fn test_deserialize_broker_holding() {
        let json = r#"{
            "tradingsymbol": "TEST",
            "exchange": "NSE",
            "quantity": 100,
            "close_price": 50,
            "pnl": 1000
        }"#;

        let holding: Holding = serde_json::from_str(json).unwrap();
        assert_eq!(holding.symbol, "TEST");
        assert_eq!(holding.market_value().unwrap(), 5_000.0);
        assert_eq!(holding.sector(), "Unknown");
    }

    #[test]
    fn test_rank_by_value_is_stable() {
        let holdings = vec![
            Holding::new("A", "NSE", 1, 100.0, 0.0),
            Holding::new("B", "NSE", 1, 300.0, 0.0),
            Holding::new("C", "NSE", 1, 100.0, 0.0),
        ];
        let valued = value_holdings(&holdings).unwrap();
        let ranked: Vec<&str> = rank_by_value(&valued)
            .iter()
            .map(|v| v.holding.symbol.as_str())
            .collect();

        assert_eq!(ranked, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_snapshot_rejects_duplicates() {
        let holdings = vec![
            Holding::new("A", "NSE", 1, 100.0, 0.0),
            Holding::new("A", "BSE", 1, 100.0, 0.0),
        ];

        let result = PortfolioSnapshot::new(holdings, start());
        assert!(matches!(result, Err(PortfolioError::DuplicateSymbol(s)) if s == "A"));
    }

    #[test]
    fn test_snapshot_total_value() {
        let holdings = vec![
            Holding::new("A", "NSE", 1, 100.0, 0.0),
            Holding::priced("B", "NSE", 4, 25.0, 0.0),
        ];

        let snapshot = PortfolioSnapshot::new(holdings, start()).unwrap();
        assert_eq!(snapshot.total_value(), 200.0);
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_empty_snapshot_is_valid() {
        let snapshot = PortfolioSnapshot::new(Vec::new(), start()).unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.total_value(), 0.0);
    }

    #[test]
    fn test_series_rejects_unordered_timestamps() {
        let samples = vec![
            ValueSample::new(start(), 100.0),
            ValueSample::new(start(), 101.0),
        ];

        let result = ValueSeries::new(samples);
        assert!(matches!(
            result,
            Err(PortfolioError::NonIncreasingTimestamp { index: 1, .. })
        ));
    }

    #[test]
    fn test_series_rejects_non_finite() {
        let result = ValueSeries::from_daily_values(start(), &[100.0, f64::NAN]);
        assert!(matches!(result, Err(PortfolioError::NonFiniteValue(1))));
    }

    #[test]
    fn test_returns() {
        let series = ValueSeries::from_daily_values(start(), &[100.0, 110.0, 99.0, 121.0]).unwrap();
        let returns: Vec<f64> = series.returns().iter().map(|r| r.value).collect();

        assert_eq!(returns.len(), 3);
        assert!((returns[0] - 0.10).abs() < 1e-12);
        assert!((returns[1] + 0.10).abs() < 1e-12);
        assert!((returns[2] - 0.2222).abs() < 1e-4);
    }

    #[test]
    fn test_returns_skip_zero_base() {
        let series = ValueSeries::from_daily_values(start(), &[0.0, 100.0, 120.0]).unwrap();
        let returns = series.returns();

        assert_eq!(returns.len(), 1);
        assert_eq!(returns[0].index, 2);
        assert!((returns[0].value - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_series_deserialization_validates() {
        let json = r#"[
            {"timestamp": "2024-01-02T00:00:00Z", "total_value": 100.0},
            {"timestamp": "2024-01-01T00:00:00Z", "total_value": 101.0}
        ]"#;

        assert!(serde_json::from_str::<ValueSeries>(json).is_err());

        let json = r#"[
            {"timestamp": "2024-01-01T00:00:00Z", "total_value": 100.0, "num_holdings": 5},
            {"timestamp": "2024-01-02T00:00:00Z", "total_value": 101.0, "total_pnl": 1.0}
        ]"#;
        let series: ValueSeries = serde_json::from_str(json).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.samples()[0].holding_count, 5);
    }
}

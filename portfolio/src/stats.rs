//! Shared numeric helpers
//!
//! Small statistics used by both engines. Every helper is total: empty or
//! degenerate inputs map to a documented sentinel instead of NaN.

use crate::types::PeriodReturn;
use statrs::statistics::Statistics;
use std::cmp::Ordering;

/// Arithmetic mean, 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().mean()
}

/// Sample standard deviation (n - 1 denominator)
///
/// Returns 0.0 with fewer than two values or when all values are equal.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 || is_constant(values) {
        return 0.0;
    }
    let std_dev = values.iter().std_dev();
    if std_dev.is_finite() {
        std_dev
    } else {
        0.0
    }
}

/// Sample covariance of paired observations, 0.0 below two pairs
pub fn sample_covariance(pairs: &[(f64, f64)]) -> f64 {
    if pairs.len() < 2 {
        return 0.0;
    }
    let left: Vec<f64> = pairs.iter().map(|p| p.0).collect();
    let right: Vec<f64> = pairs.iter().map(|p| p.1).collect();
    let covariance = left.iter().covariance(right.iter());
    if covariance.is_finite() {
        covariance
    } else {
        0.0
    }
}

/// Pearson correlation of paired observations
///
/// 0.0 when either side has zero variance.
pub fn correlation(pairs: &[(f64, f64)]) -> f64 {
    let left: Vec<f64> = pairs.iter().map(|p| p.0).collect();
    let right: Vec<f64> = pairs.iter().map(|p| p.1).collect();
    let std_left = sample_std_dev(&left);
    let std_right = sample_std_dev(&right);

    if std_left == 0.0 || std_right == 0.0 {
        return 0.0;
    }
    sample_covariance(pairs) / (std_left * std_right)
}

/// Beta of the first series against the second
///
/// Sample covariance over the population variance of the market. Falls back
/// to 1.0 (market neutral) with fewer than two pairs or a flat market.
pub fn beta(pairs: &[(f64, f64)]) -> f64 {
    if pairs.len() < 2 {
        return 1.0;
    }
    let market: Vec<f64> = pairs.iter().map(|p| p.1).collect();
    if is_constant(&market) {
        return 1.0;
    }
    let market_variance = market.iter().population_variance();
    if !(market_variance.is_finite() && market_variance > 0.0) {
        return 1.0;
    }
    sample_covariance(pairs) / market_variance
}

/// Linear-interpolated quantile, `q` in [0, 1]
///
/// Matches the default interpolation of numpy's `percentile`. 0.0 for an
/// empty slice.
pub fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Mean of the values at or below `threshold`
///
/// Returns `threshold` itself when no value qualifies.
pub fn tail_mean(values: &[f64], threshold: f64) -> f64 {
    let tail: Vec<f64> = values.iter().copied().filter(|&v| v <= threshold).collect();
    if tail.is_empty() {
        threshold
    } else {
        mean(&tail)
    }
}

/// Biased sample skewness (third standardized moment)
pub fn skewness(values: &[f64]) -> f64 {
    let (m2, m3, _) = central_moments(values);
    if m2 == 0.0 {
        return 0.0;
    }
    m3 / m2.powf(1.5)
}

/// Excess kurtosis (fourth standardized moment minus 3, Fisher definition)
pub fn excess_kurtosis(values: &[f64]) -> f64 {
    let (m2, _, m4) = central_moments(values);
    if m2 == 0.0 {
        return 0.0;
    }
    m4 / (m2 * m2) - 3.0
}

fn central_moments(values: &[f64]) -> (f64, f64, f64) {
    if values.is_empty() || is_constant(values) {
        return (0.0, 0.0, 0.0);
    }
    let n = values.len() as f64;
    let m = mean(values);

    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for &v in values {
        let d = v - m;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    (m2 / n, m3 / n, m4 / n)
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Maximum drawdown of a value path
///
/// Max DD = min over t of (value_t - running_peak_t) / running_peak_t.
/// Always <= 0; points whose running peak is not positive contribute 0.
pub fn max_drawdown(values: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0;

    for &value in values {
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            let drawdown = (value - peak) / peak;
            if drawdown < worst {
                worst = drawdown;
            }
        }
    }

    worst
}

/// Drawdown of the last value from the peak of the slice
pub fn drawdown_from_peak(window: &[f64]) -> f64 {
    let Some(&last) = window.last() else {
        return 0.0;
    };
    let peak = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if peak > 0.0 {
        (last - peak) / peak
    } else {
        0.0
    }
}

/// Relative change between the last value and the value `lookback` steps earlier
///
/// None when the path is too short or the base value is zero.
pub fn lookback_change(values: &[f64], lookback: usize) -> Option<f64> {
    if lookback == 0 || values.len() <= lookback {
        return None;
    }
    let last = values[values.len() - 1];
    let base = values[values.len() - 1 - lookback];
    if base == 0.0 {
        return None;
    }
    Some(last / base - 1.0)
}

/// Herfindahl-Hirschman Index of a set of position values
///
/// HHI = Σ w_i^2 with w_i = value_i / Σ value. An empty set or zero total is
/// treated as maximal concentration (1.0).
pub fn herfindahl_index(values: &[f64]) -> f64 {
    let total: f64 = values.iter().sum();
    if values.is_empty() || total <= 0.0 {
        return 1.0;
    }
    values.iter().map(|v| (v / total).powi(2)).sum()
}

/// Effective number of positions, 1 / HHI (0 when HHI is 0)
pub fn effective_count(hhi: f64) -> f64 {
    if hhi > 0.0 {
        1.0 / hhi
    } else {
        0.0
    }
}

/// Percentage of `part` in `total`, 0 when the total is not positive
pub fn percentage(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}

/// Inner join of two return series on timestamp
///
/// Both inputs must be ordered by timestamp; unmatched points are dropped.
pub fn align_returns(left: &[PeriodReturn], right: &[PeriodReturn]) -> Vec<(f64, f64)> {
    let mut aligned = Vec::with_capacity(left.len().min(right.len()));
    let (mut i, mut j) = (0, 0);

    while i < left.len() && j < right.len() {
        match left[i].timestamp.cmp(&right[j].timestamp) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                aligned.push((left[i].value, right[j].value));
                i += 1;
                j += 1;
            }
        }
    }

    aligned
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone, Utc};

    fn period_returns(days: &[i64], values: &[f64]) -> Vec<PeriodReturn> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        days.iter()
            .zip(values)
            .enumerate()
            .map(|(index, (&day, &value))| PeriodReturn {
                timestamp: start + Duration::days(day),
                index,
                value,
            })
            .collect()
    }

    #[test]
    fn test_mean_and_std_dev() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&values), 5.0, epsilon = 1e-12);
        // Sample variance = 32 / 7
        assert_relative_eq!(sample_std_dev(&values), (32.0_f64 / 7.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_std_dev_degenerate() {
        assert_eq!(sample_std_dev(&[]), 0.0);
        assert_eq!(sample_std_dev(&[0.5]), 0.0);
        assert_eq!(sample_std_dev(&[0.001; 50]), 0.0);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_quantile_linear_interpolation() {
        let values = vec![0.10, -0.10, 0.2222];
        // rank = 0.05 * 2 = 0.1 -> -0.10 + 0.1 * 0.20
        assert_relative_eq!(quantile(&values, 0.05), -0.08, epsilon = 1e-12);
        assert_relative_eq!(quantile(&values, 0.5), 0.10, epsilon = 1e-12);
        assert_relative_eq!(quantile(&values, 1.0), 0.2222, epsilon = 1e-12);
        assert_eq!(quantile(&[], 0.05), 0.0);
    }

    #[test]
    fn test_tail_mean_inclusive() {
        let values = vec![-0.03, -0.02, 0.01, 0.02];
        assert_relative_eq!(tail_mean(&values, -0.02), -0.025, epsilon = 1e-12);
        // Nothing at or below threshold
        assert_eq!(tail_mean(&values, -0.05), -0.05);
    }

    #[test]
    fn test_max_drawdown() {
        assert_relative_eq!(
            max_drawdown(&[100.0, 110.0, 99.0, 121.0]),
            (99.0 - 110.0) / 110.0,
            epsilon = 1e-12
        );
        assert_eq!(max_drawdown(&[1.0, 2.0, 2.0, 3.0]), 0.0);
        assert_eq!(max_drawdown(&[]), 0.0);
        assert_eq!(max_drawdown(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_drawdown_from_peak() {
        assert_relative_eq!(drawdown_from_peak(&[100.0, 120.0, 90.0]), -0.25);
        assert_eq!(drawdown_from_peak(&[100.0, 120.0]), 0.0);
        assert_eq!(drawdown_from_peak(&[]), 0.0);
    }

    #[test]
    fn test_lookback_change() {
        let values = vec![100.0, 105.0, 110.0, 121.0];
        assert_relative_eq!(lookback_change(&values, 2).unwrap(), 121.0 / 105.0 - 1.0);
        assert_relative_eq!(lookback_change(&values, 3).unwrap(), 0.21, epsilon = 1e-12);
        assert!(lookback_change(&values, 4).is_none());
        assert!(lookback_change(&[0.0, 1.0], 1).is_none());
    }

    #[test]
    fn test_moments() {
        let symmetric = vec![-2.0, -1.0, 0.0, 1.0, 2.0];
        assert_relative_eq!(skewness(&symmetric), 0.0, epsilon = 1e-12);
        // m2 = 2, m4 = 6.8 -> 6.8 / 4 - 3
        assert_relative_eq!(excess_kurtosis(&symmetric), -1.3, epsilon = 1e-12);

        let right_tailed = vec![0.0, 0.0, 0.0, 10.0];
        assert!(skewness(&right_tailed) > 0.0);

        assert_eq!(skewness(&[1.0, 1.0]), 0.0);
        assert_eq!(excess_kurtosis(&[]), 0.0);
    }

    #[test]
    fn test_beta_and_correlation() {
        // Portfolio moves exactly twice the market: 2 scaled by n / (n - 1)
        let pairs: Vec<(f64, f64)> = vec![(0.02, 0.01), (-0.04, -0.02), (0.06, 0.03)];
        assert_relative_eq!(beta(&pairs), 3.0, epsilon = 1e-9);
        assert_relative_eq!(correlation(&pairs), 1.0, epsilon = 1e-9);

        // Flat market falls back to 1.0
        let flat = vec![(0.01, 0.0), (0.02, 0.0)];
        assert_eq!(beta(&flat), 1.0);
        assert_eq!(correlation(&flat), 0.0);
        assert_eq!(beta(&[(0.01, 0.02)]), 1.0);
    }

    #[test]
    fn test_herfindahl_index() {
        assert_eq!(herfindahl_index(&[]), 1.0);
        assert_eq!(herfindahl_index(&[0.0, 0.0]), 1.0);
        assert_relative_eq!(herfindahl_index(&[500.0]), 1.0);
        assert_relative_eq!(herfindahl_index(&[1.0, 1.0, 1.0, 1.0]), 0.25);

        assert_relative_eq!(effective_count(0.25), 4.0);
        assert_eq!(effective_count(0.0), 0.0);
    }

    #[test]
    fn test_percentage_guard() {
        assert_eq!(percentage(10.0, 0.0), 0.0);
        assert_relative_eq!(percentage(25.0, 200.0), 12.5);
    }

    #[test]
    fn test_align_returns_inner_join() {
        let left = period_returns(&[1, 2, 3, 5], &[0.1, 0.2, 0.3, 0.5]);
        let right = period_returns(&[2, 3, 4, 5], &[1.2, 1.3, 1.4, 1.5]);

        let aligned = align_returns(&left, &right);
        assert_eq!(aligned, vec![(0.2, 1.2), (0.3, 1.3), (0.5, 1.5)]);

        let disjoint = period_returns(&[10], &[0.0]);
        assert!(align_returns(&left, &disjoint).is_empty());
    }
}

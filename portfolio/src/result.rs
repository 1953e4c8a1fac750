//! Metric result envelope
//!
//! Every analysis entry point returns either a complete, typed result set or
//! an explicit marker saying why no result exists. Serialized, a marker is a
//! single `{"error": "..."}` object so report layers can branch on the key.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Reason a metric result could not be produced
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailable {
    /// Fewer samples than the computation needs
    #[error("Insufficient data: need at least {required} samples, got {available}")]
    InsufficientData { required: usize, available: usize },

    /// Every return pair was undefined (e.g. all previous values were zero)
    #[error("No valid return data available")]
    NoValidReturns,

    /// Empty holdings list
    #[error("No holdings data available")]
    NoHoldings,
}

impl Unavailable {
    /// True for both insufficient-data flavours
    pub fn is_insufficient_data(&self) -> bool {
        matches!(
            self,
            Unavailable::InsufficientData { .. } | Unavailable::NoValidReturns
        )
    }
}

/// Result of one analysis call
#[derive(Debug, Clone, PartialEq)]
pub enum MetricResult<T> {
    /// All metrics were computed
    Computed(T),

    /// No metrics; the reason is reported instead
    Unavailable(Unavailable),
}

impl<T> MetricResult<T> {
    pub fn is_computed(&self) -> bool {
        matches!(self, MetricResult::Computed(_))
    }

    /// Borrow the computed value, if any
    pub fn computed(&self) -> Option<&T> {
        match self {
            MetricResult::Computed(value) => Some(value),
            MetricResult::Unavailable(_) => None,
        }
    }

    /// The unavailability reason, if any
    pub fn unavailable(&self) -> Option<Unavailable> {
        match self {
            MetricResult::Computed(_) => None,
            MetricResult::Unavailable(reason) => Some(*reason),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> MetricResult<U> {
        match self {
            MetricResult::Computed(value) => MetricResult::Computed(f(value)),
            MetricResult::Unavailable(reason) => MetricResult::Unavailable(reason),
        }
    }

    pub fn into_result(self) -> std::result::Result<T, Unavailable> {
        match self {
            MetricResult::Computed(value) => Ok(value),
            MetricResult::Unavailable(reason) => Err(reason),
        }
    }
}

impl<T> From<Unavailable> for MetricResult<T> {
    fn from(reason: Unavailable) -> Self {
        MetricResult::Unavailable(reason)
    }
}

impl<T: Serialize> Serialize for MetricResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            MetricResult::Computed(value) => value.serialize(serializer),
            MetricResult::Unavailable(reason) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", &reason.to_string())?;
                map.end()
            }
        }
    }
}

//! Index-aligned indicator columns keyed by name.

use super::error::IndicatorError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One indicator value. `None` marks a position where the window is not yet
/// deep enough (or the input was degenerate).
pub type Value = Option<f64>;

pub const BOLL_MID: &str = "BOLL_MID";
pub const BOLL_UPPER: &str = "BOLL_UPPER";
pub const BOLL_LOWER: &str = "BOLL_LOWER";
pub const KDJ_K: &str = "K";
pub const KDJ_D: &str = "D";
pub const KDJ_J: &str = "J";
pub const MACD_DIF: &str = "MACD_DIF";
pub const MACD_DEA: &str = "MACD_DEA";
pub const MACD_HIST: &str = "MACD_HIST";
pub const OBV: &str = "OBV";

pub fn ma_key(period: usize) -> String {
    format!("MA{period}")
}

pub fn ema_key(span: usize) -> String {
    format!("EMA{span}")
}

pub fn rsi_key(period: usize) -> String {
    format!("RSI{period}")
}

pub fn volume_ma_key(period: usize) -> String {
    format!("VOL_MA{period}")
}

/// True for `MA5`, `MA250`, ...; false for `MACD_DIF` and friends.
pub fn is_ma_key(name: &str) -> bool {
    name.strip_prefix("MA")
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

pub fn is_rsi_key(name: &str) -> bool {
    name.strip_prefix("RSI")
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Indicator columns in insertion order. Every column has the length of the
/// series it was computed from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorSet {
    columns: IndexMap<String, Vec<Value>>,
}

impl IndicatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(name: impl Into<String>, values: Vec<Value>) -> Self {
        let mut set = Self::new();
        set.insert(name, values);
        set
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<Value>) {
        self.columns.insert(name.into(), values);
    }

    /// Moves every column of `other` into `self`, replacing same-named ones.
    pub fn merge(&mut self, other: IndicatorSet) {
        self.columns.extend(other.columns);
    }

    pub fn get(&self, name: &str) -> Option<&[Value]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Value of `name` at `index`, if the column exists and is defined there.
    pub fn at(&self, name: &str, index: usize) -> Option<f64> {
        self.columns.get(name).and_then(|col| col.get(index).copied().flatten())
    }

    /// Value of `name` at the last position.
    pub fn latest(&self, name: &str) -> Option<f64> {
        self.columns.get(name).and_then(|col| col.last().copied().flatten())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of indicator columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Turns a failed indicator into an empty overlay so the caller keeps going.
pub(crate) fn isolate(indicator: &str, result: Result<IndicatorSet, IndicatorError>) -> IndicatorSet {
    match result {
        Ok(set) => set,
        Err(e @ IndicatorError::InsufficientData { .. }) => {
            debug!("Skipping {}: {}", indicator, e);
            IndicatorSet::new()
        }
        Err(e) => {
            warn!("Skipping {}: {}", indicator, e);
            IndicatorSet::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ma_keys_exclude_macd_columns() {
        assert!(is_ma_key("MA5"));
        assert!(is_ma_key("MA250"));
        assert!(!is_ma_key("MACD_DIF"));
        assert!(!is_ma_key("MA"));
        assert!(!is_ma_key("VOL_MA5"));
        assert!(is_rsi_key("RSI6"));
        assert!(!is_rsi_key("RSI"));
    }

    #[test]
    fn latest_skips_undefined_tail() {
        let mut set = IndicatorSet::new();
        set.insert("A", vec![Some(1.0), None]);
        set.insert("B", vec![None, Some(2.0)]);
        assert_eq!(set.latest("A"), None);
        assert_eq!(set.latest("B"), Some(2.0));
        assert_eq!(set.at("A", 0), Some(1.0));
        assert_eq!(set.latest("missing"), None);
    }

    #[test]
    fn isolate_swallows_errors_into_empty_set() {
        let set = isolate("MA0", Err(IndicatorError::invalid_params("period must be positive")));
        assert!(set.is_empty());
    }

    #[test]
    fn merge_keeps_insertion_order() {
        let mut set = IndicatorSet::single("MA5", vec![None]);
        set.merge(IndicatorSet::single("EMA12", vec![Some(1.0)]));
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["MA5", "EMA12"]);
    }
}

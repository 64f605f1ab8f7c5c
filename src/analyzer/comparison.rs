// Cross-series analysis: index comparison and close-price correlation
use crate::model::Series;
use crate::utils::{mean, pearson};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub symbol: String,
    pub current: f64,
    pub change: f64,
    pub pct_change: f64,
    pub high: f64,
    pub low: f64,
    pub avg_volume: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Input order.
    pub comparison: Vec<IndexSnapshot>,
    /// Descending by `pct_change`; ties keep input order.
    pub ranking: Vec<IndexSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationEntry {
    pub left: String,
    pub right: String,
    pub value: f64,
}

pub struct MarketAnalyzer;

impl MarketAnalyzer {
    fn snapshot(series: &Series) -> Option<IndexSnapshot> {
        let first = series.first()?;
        let last = series.last()?;
        let bars = series.bars();
        Some(IndexSnapshot {
            symbol: series.symbol().to_string(),
            current: last.close,
            change: last.close - first.close,
            pct_change: if first.close != 0.0 {
                (last.close / first.close - 1.0) * 100.0
            } else {
                0.0
            },
            high: bars.iter().map(|b| b.high).fold(f64::MIN, f64::max),
            low: bars.iter().map(|b| b.low).fold(f64::MAX, f64::min),
            avg_volume: mean(&series.volumes()).unwrap_or(0.0),
        })
    }

    /// Per-index performance over each series, ranked by % change.
    /// Empty series are skipped.
    pub fn compare_indices(series: &[&Series]) -> Comparison {
        let comparison: Vec<IndexSnapshot> = series.iter().filter_map(|s| Self::snapshot(s)).collect();
        let mut ranking = comparison.clone();
        // sort_by is stable
        ranking.sort_by(|a, b| b.pct_change.total_cmp(&a.pct_change));
        Comparison { comparison, ranking }
    }

    /// Pearson correlation of closes on the dates both series share.
    ///
    /// Fewer than two shared dates, or a side without variance, gives 0.0.
    pub fn correlation(left: &Series, right: &Series) -> f64 {
        let right_closes: HashMap<NaiveDate, f64> = right.bars().iter().map(|b| (b.date, b.close)).collect();
        let (x, y): (Vec<f64>, Vec<f64>) = left
            .bars()
            .iter()
            .filter_map(|b| right_closes.get(&b.date).map(|&r| (b.close, r)))
            .unzip();
        if x.len() < 2 {
            return 0.0;
        }
        pearson(&x, &y).unwrap_or(0.0)
    }

    /// Correlation of every unordered pair, in input order.
    pub fn correlation_matrix(series: &[&Series]) -> Vec<CorrelationEntry> {
        let mut entries = Vec::new();
        for (i, left) in series.iter().enumerate() {
            for right in &series[i + 1..] {
                entries.push(CorrelationEntry {
                    left: left.symbol().to_string(),
                    right: right.symbol().to_string(),
                    value: Self::correlation(left, right),
                });
            }
        }
        entries
    }
}

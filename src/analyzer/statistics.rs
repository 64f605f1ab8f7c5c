use crate::model::Series;
use crate::utils::{mean, sample_std};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceStats {
    pub current: f64,
    /// Highest high.
    pub max: f64,
    /// Lowest low.
    pub min: f64,
    pub avg: f64,
    pub std: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeStats {
    pub total: f64,
    pub total_pct: f64,
    pub avg_daily: f64,
    pub max_gain: f64,
    pub max_loss: f64,
    pub up_days: usize,
    pub down_days: usize,
    /// Up days over the record count (the first bar counts as a day).
    pub up_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeStats {
    pub total: f64,
    pub avg: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_records: usize,
    pub date_range: DateRange,
    pub price: PriceStats,
    pub change: ChangeStats,
    pub volume: VolumeStats,
}

fn max_of(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.reduce(f64::max)
}

fn min_of(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.reduce(f64::min)
}

/// Descriptive statistics of a series. `None` for an empty series.
pub fn calculate_statistics(series: &Series) -> Option<Statistics> {
    let first = series.first()?;
    let last = series.last()?;
    let bars = series.bars();
    let closes = series.closes();
    let volumes = series.volumes();
    let daily: Vec<f64> = bars.iter().filter_map(|b| b.pct_change).collect();

    let up_days = daily.iter().filter(|p| **p > 0.0).count();
    let down_days = daily.iter().filter(|p| **p < 0.0).count();
    let total_pct = if first.close != 0.0 {
        (last.close / first.close - 1.0) * 100.0
    } else {
        0.0
    };

    Some(Statistics {
        total_records: bars.len(),
        date_range: DateRange {
            start: first.date,
            end: last.date,
        },
        price: PriceStats {
            current: last.close,
            max: max_of(bars.iter().map(|b| b.high))?,
            min: min_of(bars.iter().map(|b| b.low))?,
            avg: mean(&closes)?,
            std: sample_std(&closes).unwrap_or(0.0),
        },
        change: ChangeStats {
            total: last.close - first.close,
            total_pct,
            avg_daily: mean(&daily).unwrap_or(0.0),
            max_gain: max_of(daily.iter().copied()).unwrap_or(0.0),
            max_loss: min_of(daily.iter().copied()).unwrap_or(0.0),
            up_days,
            down_days,
            up_ratio: up_days as f64 / bars.len() as f64,
        },
        volume: VolumeStats {
            total: volumes.iter().sum(),
            avg: mean(&volumes)?,
            max: max_of(volumes.iter().copied())?,
        },
    })
}

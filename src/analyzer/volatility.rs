use crate::utils::{mean, sample_std};
use crate::model::Series;
use serde::{Deserialize, Serialize};

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingVolatility {
    pub current: f64,
    pub max: f64,
    pub min: f64,
    pub avg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volatility {
    /// Annualized volatility of all daily returns, in percent.
    pub historical: f64,
    /// `None` until one full window of returns exists.
    pub rolling: Option<RollingVolatility>,
}

fn annualized(std: f64) -> f64 {
    std * TRADING_DAYS_PER_YEAR.sqrt() * 100.0
}

/// Simple returns `close[i] / close[i-1] - 1`, one shorter than the series.
pub fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Historical and rolling annualized volatility.
///
/// Series shorter than `window` get `None`; partial windows are never reported.
pub fn calculate_volatility(series: &Series, window: usize) -> Option<Volatility> {
    if window == 0 || series.len() < window {
        return None;
    }
    let returns = daily_returns(&series.closes());
    let historical = annualized(sample_std(&returns)?);

    let rolling_series: Vec<f64> = returns
        .windows(window)
        .filter_map(|w| sample_std(w).map(annualized))
        .collect();
    let rolling = match rolling_series.last() {
        Some(&current) => Some(RollingVolatility {
            current,
            max: rolling_series.iter().copied().fold(f64::MIN, f64::max),
            min: rolling_series.iter().copied().fold(f64::MAX, f64::min),
            avg: mean(&rolling_series)?,
        }),
        None => None,
    };

    Some(Volatility { historical, rolling })
}

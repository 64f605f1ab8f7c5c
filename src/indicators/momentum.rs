//! Momentum oscillators: RSI, KDJ and MACD.

use super::error::IndicatorError;
use super::set::{
    IndicatorSet, KDJ_D, KDJ_J, KDJ_K, MACD_DEA, MACD_DIF, MACD_HIST, Value, isolate, rsi_key,
};
use super::trend::check_period;
use super::window::{self, rolling_max, rolling_min, smooth};
use crate::model::Series;

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    // No losses in the window: RS is unbounded and RSI saturates.
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

fn rsi_column(closes: &[f64], period: usize) -> Result<Vec<Value>, IndicatorError> {
    check_period("RSI", period)?;
    IndicatorError::require(period + 1, closes.len())?;

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let mut out = vec![None; closes.len()];
    // deltas[j] is the move into bar j + 1
    for (offset, window) in deltas.windows(period).enumerate() {
        let gain = window.iter().filter(|d| **d > 0.0).sum::<f64>() / period as f64;
        let loss = -window.iter().filter(|d| **d < 0.0).sum::<f64>() / period as f64;
        out[offset + period] = Some(rsi_value(gain, loss));
    }
    Ok(out)
}

fn kdj_columns(series: &Series, fast_k: usize, slow_k: usize, slow_d: usize) -> Result<IndicatorSet, IndicatorError> {
    check_period("KDJ fastK", fast_k)?;
    check_period("KDJ slowK", slow_k)?;
    check_period("KDJ slowD", slow_d)?;
    IndicatorError::require(fast_k, series.len())?;

    let lows = rolling_min(&series.lows(), fast_k);
    let highs = rolling_max(&series.highs(), fast_k);
    let rsv: Vec<Value> = series
        .bars()
        .iter()
        .zip(lows.iter().zip(&highs))
        .map(|(bar, (low, high))| {
            let (low, high) = ((*low)?, (*high)?);
            let range = high - low;
            // flat window: the stochastic is undefined, not zero
            if range == 0.0 {
                return None;
            }
            Some((bar.close - low) / range * 100.0)
        })
        .collect();

    let k = smooth(&rsv, 1.0 / slow_k as f64);
    let d = smooth(&k, 1.0 / slow_d as f64);
    let j = k.iter().zip(&d).map(|(k, d)| Some(3.0 * (*k)? - 2.0 * (*d)?)).collect();

    let mut set = IndicatorSet::new();
    set.insert(KDJ_K, k);
    set.insert(KDJ_D, d);
    set.insert(KDJ_J, j);
    Ok(set)
}

fn macd_columns(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Result<IndicatorSet, IndicatorError> {
    check_period("MACD fast", fast)?;
    check_period("MACD slow", slow)?;
    check_period("MACD signal", signal)?;
    if fast >= slow {
        return Err(IndicatorError::invalid_params(format!(
            "MACD fast span {fast} must be shorter than slow span {slow}"
        )));
    }
    IndicatorError::require(slow, closes.len())?;

    let fast_ema = window::ema(closes, fast);
    let slow_ema = window::ema(closes, slow);
    let dif: Vec<f64> = fast_ema.iter().zip(&slow_ema).map(|(f, s)| f - s).collect();
    let dea = window::ema(&dif, signal);
    let hist: Vec<Value> = dif.iter().zip(&dea).map(|(d, e)| Some(2.0 * (d - e))).collect();

    let mut set = IndicatorSet::new();
    set.insert(MACD_DIF, dif.into_iter().map(Some).collect());
    set.insert(MACD_DEA, dea.into_iter().map(Some).collect());
    set.insert(MACD_HIST, hist);
    Ok(set)
}

/// Relative strength index, one `RSI{p}` column per period.
///
/// Average gain and loss are plain rolling means over the last `p` close
/// deltas, so the first defined value sits at index `p`.
pub fn rsi(series: &Series, periods: &[usize]) -> IndicatorSet {
    let closes = series.closes();
    let mut set = IndicatorSet::new();
    for &period in periods {
        let key = rsi_key(period);
        let column = rsi_column(&closes, period).map(|v| IndicatorSet::single(&key, v));
        set.merge(isolate(&key, column));
    }
    set
}

/// Stochastic KDJ. `J` is not clamped and may leave `[0, 100]`.
pub fn kdj(series: &Series, fast_k: usize, slow_k: usize, slow_d: usize) -> IndicatorSet {
    isolate("KDJ", kdj_columns(series, fast_k, slow_k, slow_d))
}

/// MACD with DIF, DEA (signal line) and the doubled histogram.
pub fn macd(series: &Series, fast: usize, slow: usize, signal: usize) -> IndicatorSet {
    isolate("MACD", macd_columns(&series.closes(), fast, slow, signal))
}

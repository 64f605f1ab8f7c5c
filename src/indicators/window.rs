//! Rolling-window and recursive smoothing primitives.
//!
//! All functions return a vector with the input's length. Positions the
//! window cannot cover yet are `None`.

use super::set::Value;
use crate::utils::{mean, sample_std};

fn rolling(values: &[f64], period: usize, f: impl Fn(&[f64]) -> Option<f64>) -> Vec<Value> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    for (offset, window) in values.windows(period).enumerate() {
        out[offset + period - 1] = f(window);
    }
    out
}

/// Trailing arithmetic mean.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<Value> {
    rolling(values, period, mean)
}

/// Trailing sample standard deviation. Needs `period >= 2`.
pub fn rolling_std(values: &[f64], period: usize) -> Vec<Value> {
    rolling(values, period, sample_std)
}

pub fn rolling_min(values: &[f64], period: usize) -> Vec<Value> {
    rolling(values, period, |w| w.iter().copied().reduce(f64::min))
}

pub fn rolling_max(values: &[f64], period: usize) -> Vec<Value> {
    rolling(values, period, |w| w.iter().copied().reduce(f64::max))
}

/// Recursive smoothing `s[i] = alpha * x[i] + (1 - alpha) * s[i-1]`.
///
/// Seeded with the first defined input. An undefined input after the seed
/// holds the previous smoothed value.
pub fn smooth(values: &[Value], alpha: f64) -> Vec<Value> {
    let mut out = Vec::with_capacity(values.len());
    let mut state: Option<f64> = None;
    for value in values {
        state = match (state, value) {
            (None, x) => *x,
            (Some(prev), Some(x)) => Some(alpha * x + (1.0 - alpha) * prev),
            (Some(prev), None) => Some(prev),
        };
        out.push(state);
    }
    out
}

/// Exponential moving average with `alpha = 2 / (span + 1)`, seeded with
/// the first value and defined from index 0.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    for (i, &x) in values.iter().enumerate() {
        let next = if i == 0 { x } else { alpha * x + (1.0 - alpha) * out[i - 1] };
        out.push(next);
    }
    out
}

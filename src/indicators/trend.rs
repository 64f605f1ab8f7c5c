//! Trend-following overlays: moving averages and Bollinger bands.

use super::error::IndicatorError;
use super::set::{BOLL_LOWER, BOLL_MID, BOLL_UPPER, IndicatorSet, Value, ema_key, isolate, ma_key};
use super::window::{self, rolling_mean, rolling_std};
use crate::model::Series;

pub(crate) fn check_period(name: &str, period: usize) -> Result<(), IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::invalid_params(format!("{name} period must be positive")));
    }
    Ok(())
}

pub(crate) fn ma_column(values: &[f64], period: usize) -> Result<Vec<Value>, IndicatorError> {
    check_period("MA", period)?;
    IndicatorError::require(period, values.len())?;
    Ok(rolling_mean(values, period))
}

fn ema_column(values: &[f64], span: usize) -> Result<Vec<Value>, IndicatorError> {
    check_period("EMA", span)?;
    IndicatorError::require(span, values.len())?;
    Ok(window::ema(values, span).into_iter().map(Some).collect())
}

fn boll_columns(values: &[f64], period: usize, k: f64) -> Result<IndicatorSet, IndicatorError> {
    if period < 2 {
        return Err(IndicatorError::invalid_params("BOLL period must be at least 2"));
    }
    if !k.is_finite() || k < 0.0 {
        return Err(IndicatorError::invalid_params(format!("BOLL multiplier {k} is not a non-negative number")));
    }
    IndicatorError::require(period, values.len())?;

    let mid = rolling_mean(values, period);
    let std = rolling_std(values, period);
    let band = |sign: f64| -> Vec<Value> {
        mid.iter()
            .zip(&std)
            .map(|(m, s)| Some(m.as_ref()? + sign * k * s.as_ref()?))
            .collect()
    };
    let upper = band(1.0);
    let lower = band(-1.0);

    let mut set = IndicatorSet::new();
    set.insert(BOLL_MID, mid);
    set.insert(BOLL_UPPER, upper);
    set.insert(BOLL_LOWER, lower);
    Ok(set)
}

/// Simple moving averages of the close, one `MA{p}` column per period.
pub fn ma(series: &Series, periods: &[usize]) -> IndicatorSet {
    let closes = series.closes();
    let mut set = IndicatorSet::new();
    for &period in periods {
        let key = ma_key(period);
        let column = ma_column(&closes, period).map(|v| IndicatorSet::single(&key, v));
        set.merge(isolate(&key, column));
    }
    set
}

/// Exponential moving averages of the close, one `EMA{span}` column per span.
pub fn ema(series: &Series, spans: &[usize]) -> IndicatorSet {
    let closes = series.closes();
    let mut set = IndicatorSet::new();
    for &span in spans {
        let key = ema_key(span);
        let column = ema_column(&closes, span).map(|v| IndicatorSet::single(&key, v));
        set.merge(isolate(&key, column));
    }
    set
}

/// Bollinger bands: `MA(period)` plus/minus `k` rolling sample deviations.
pub fn boll(series: &Series, period: usize, k: f64) -> IndicatorSet {
    isolate("BOLL", boll_columns(&series.closes(), period, k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::series_from_closes;
    use approx::assert_relative_eq;

    #[test]
    fn ma3_over_one_to_five() {
        let series = series_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let set = ma(&series, &[3]);
        assert_eq!(set.get("MA3").unwrap(), &[None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn ma_omits_periods_longer_than_history() {
        let series = series_from_closes(&[1.0, 2.0, 3.0]);
        let set = ma(&series, &[2, 5, 0]);
        assert!(set.contains("MA2"));
        assert!(!set.contains("MA5"));
        assert!(!set.contains("MA0"));
    }

    #[test]
    fn ema_is_defined_from_first_bar() {
        let series = series_from_closes(&[10.0, 20.0, 30.0]);
        let set = ema(&series, &[3]);
        let col = set.get("EMA3").unwrap();
        assert_eq!(col[0], Some(10.0));
        assert!(col.iter().all(Option::is_some));
    }

    #[test]
    fn boll_bands_are_symmetric_around_mid() {
        let series = series_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let set = boll(&series, 3, 2.0);
        assert_eq!(set.get(BOLL_UPPER).unwrap()[1], None);
        // window [3, 4, 5]: mean 4, sample std 1
        assert_relative_eq!(set.latest(BOLL_MID).unwrap(), 4.0);
        assert_relative_eq!(set.latest(BOLL_UPPER).unwrap(), 6.0);
        assert_relative_eq!(set.latest(BOLL_LOWER).unwrap(), 2.0);
    }

    #[test]
    fn boll_rejects_single_bar_window() {
        let series = series_from_closes(&[1.0, 2.0, 3.0]);
        assert!(boll(&series, 1, 2.0).is_empty());
        assert!(boll(&series, 3, f64::NAN).is_empty());
    }
}

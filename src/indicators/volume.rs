use super::error::IndicatorError;
use super::set::{IndicatorSet, OBV, Value, isolate, volume_ma_key};
use super::trend::ma_column;
use crate::model::Series;
use std::cmp::Ordering;

/// Moving averages of volume, one `VOL_MA{p}` column per period.
pub fn volume_ma(series: &Series, periods: &[usize]) -> IndicatorSet {
    let volumes = series.volumes();
    let mut set = IndicatorSet::new();
    for &period in periods {
        let key = volume_ma_key(period);
        let column = ma_column(&volumes, period).map(|v| IndicatorSet::single(&key, v));
        set.merge(isolate(&key, column));
    }
    set
}

fn obv_column(series: &Series) -> Result<Vec<Value>, IndicatorError> {
    IndicatorError::require(1, series.len())?;
    let bars = series.bars();
    let mut out = Vec::with_capacity(bars.len());
    let mut running = bars[0].volume;
    out.push(Some(running));
    for pair in bars.windows(2) {
        match pair[1].close.partial_cmp(&pair[0].close) {
            Some(Ordering::Greater) => running += pair[1].volume,
            Some(Ordering::Less) => running -= pair[1].volume,
            _ => {}
        }
        out.push(Some(running));
    }
    Ok(out)
}

/// On-balance volume, starting from the first bar's volume.
pub fn obv(series: &Series) -> IndicatorSet {
    isolate(OBV, obv_column(series).map(|v| IndicatorSet::single(OBV, v)))
}

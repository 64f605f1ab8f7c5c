use super::momentum::{kdj, macd, rsi};
use super::set::IndicatorSet;
use super::trend::{boll, ema, ma};
use super::volume::{obv, volume_ma};
use crate::model::Series;
use serde::Deserialize;
use tracing::debug;

/// Parameters of the canonical indicator set.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub ma_periods: Vec<usize>,
    pub ema_periods: Vec<usize>,
    pub boll_period: usize,
    pub boll_k: f64,
    pub rsi_periods: Vec<usize>,
    pub kdj_fast_k: usize,
    pub kdj_slow_k: usize,
    pub kdj_slow_d: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub volume_ma_periods: Vec<usize>,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            ma_periods: vec![5, 10, 20, 30, 60, 120, 250],
            ema_periods: vec![12, 26],
            boll_period: 20,
            boll_k: 2.0,
            rsi_periods: vec![6, 12, 24],
            kdj_fast_k: 9,
            kdj_slow_k: 3,
            kdj_slow_d: 3,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            volume_ma_periods: vec![5, 10, 20],
        }
    }
}

/// Stateless indicator engine; holds nothing but its parameters.
#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    params: IndicatorParams,
}

impl IndicatorEngine {
    pub fn new(params: IndicatorParams) -> Self {
        Self { params }
    }

    /// Computes the full canonical set. An indicator that cannot be computed
    /// is missing from the result; the others are unaffected.
    pub fn compose_all(&self, series: &Series) -> IndicatorSet {
        let p = &self.params;
        let mut set = IndicatorSet::new();
        set.merge(ma(series, &p.ma_periods));
        set.merge(ema(series, &p.ema_periods));
        set.merge(boll(series, p.boll_period, p.boll_k));
        set.merge(rsi(series, &p.rsi_periods));
        set.merge(kdj(series, p.kdj_fast_k, p.kdj_slow_k, p.kdj_slow_d));
        set.merge(macd(series, p.macd_fast, p.macd_slow, p.macd_signal));
        set.merge(volume_ma(series, &p.volume_ma_periods));
        set.merge(obv(series));
        debug!(
            "Computed {} indicator columns for {} ({} bars)",
            set.len(),
            series.symbol(),
            series.len()
        );
        set
    }
}

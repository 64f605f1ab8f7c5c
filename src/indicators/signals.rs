//! Latest-bar signal bundle read off a composed indicator set.

use super::set::{IndicatorSet, KDJ_D, KDJ_J, KDJ_K, MACD_DEA, MACD_DIF, MACD_HIST, is_ma_key, is_rsi_key};
use crate::model::Series;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const KDJ_OVERBOUGHT: f64 = 80.0;
pub const KDJ_OVERSOLD: f64 = 20.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub current: f64,
    pub change: Option<f64>,
    pub pct_change: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricePosition {
    Above,
    Below,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaSignal {
    pub value: f64,
    pub position: PricePosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdSignal {
    pub dif: f64,
    pub dea: f64,
    pub hist: f64,
    pub golden_cross: bool,
    pub death_cross: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KdjSignal {
    pub k: f64,
    pub d: f64,
    pub j: f64,
    pub overbought: bool,
    pub oversold: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiSignal {
    pub value: f64,
    pub overbought: bool,
    pub oversold: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signals {
    pub price: PriceSnapshot,
    pub ma: IndexMap<String, MaSignal>,
    pub macd: Option<MacdSignal>,
    pub kdj: Option<KdjSignal>,
    pub rsi: IndexMap<String, RsiSignal>,
}

fn macd_signal(set: &IndicatorSet, last: usize) -> Option<MacdSignal> {
    let prev = last.checked_sub(1)?;
    let dif = set.at(MACD_DIF, last)?;
    let dea = set.at(MACD_DEA, last)?;
    let hist = set.at(MACD_HIST, last)?;
    let prev_dif = set.at(MACD_DIF, prev)?;
    let prev_dea = set.at(MACD_DEA, prev)?;
    Some(MacdSignal {
        dif,
        dea,
        hist,
        // a tie on the current bar has not crossed yet
        golden_cross: prev_dif <= prev_dea && dif > dea,
        death_cross: prev_dif >= prev_dea && dif < dea,
    })
}

fn kdj_signal(set: &IndicatorSet, last: usize) -> Option<KdjSignal> {
    let k = set.at(KDJ_K, last)?;
    let d = set.at(KDJ_D, last)?;
    let j = set.at(KDJ_J, last)?;
    Some(KdjSignal {
        k,
        d,
        j,
        overbought: k > KDJ_OVERBOUGHT && d > KDJ_OVERBOUGHT,
        oversold: k < KDJ_OVERSOLD && d < KDJ_OVERSOLD,
    })
}

/// Reads the last bar (and the one before it for MACD crosses).
///
/// A signal whose inputs are not all defined is left out. Returns `None` for
/// an empty series.
pub fn derive_latest_signals(series: &Series, set: &IndicatorSet) -> Option<Signals> {
    let bar = series.last()?;
    let last = series.len() - 1;

    let ma = set
        .names()
        .filter(|name| is_ma_key(name))
        .filter_map(|name| {
            let value = set.at(name, last)?;
            let position = if bar.close > value { PricePosition::Above } else { PricePosition::Below };
            Some((name.to_string(), MaSignal { value, position }))
        })
        .collect();

    let rsi = set
        .names()
        .filter(|name| is_rsi_key(name))
        .filter_map(|name| {
            let value = set.at(name, last)?;
            Some((
                name.to_string(),
                RsiSignal {
                    value,
                    overbought: value > RSI_OVERBOUGHT,
                    oversold: value < RSI_OVERSOLD,
                },
            ))
        })
        .collect();

    Some(Signals {
        price: PriceSnapshot {
            current: bar.close,
            change: bar.change,
            pct_change: bar.pct_change,
        },
        ma,
        macd: macd_signal(set, last),
        kdj: kdj_signal(set, last),
        rsi,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::series_from_closes;

    fn macd_set(dif: [f64; 2], dea: [f64; 2]) -> IndicatorSet {
        let mut set = IndicatorSet::new();
        set.insert(MACD_DIF, dif.iter().copied().map(Some).collect());
        set.insert(MACD_DEA, dea.iter().copied().map(Some).collect());
        set.insert(MACD_HIST, dif.iter().zip(&dea).map(|(a, b)| Some(2.0 * (a - b))).collect());
        set
    }

    #[test]
    fn golden_cross_from_tie() {
        let series = series_from_closes(&[1.0, 2.0]);
        let signals = derive_latest_signals(&series, &macd_set([1.0, 2.0], [1.0, 1.5])).unwrap();
        let macd = signals.macd.unwrap();
        assert!(macd.golden_cross);
        assert!(!macd.death_cross);
    }

    #[test]
    fn current_tie_is_not_a_cross() {
        let series = series_from_closes(&[1.0, 2.0]);
        let macd = derive_latest_signals(&series, &macd_set([0.5, 1.0], [1.0, 1.0])).unwrap().macd.unwrap();
        assert!(!macd.golden_cross);
        assert!(!macd.death_cross);
    }

    #[test]
    fn death_cross() {
        let series = series_from_closes(&[1.0, 2.0]);
        let macd = derive_latest_signals(&series, &macd_set([2.0, 0.5], [1.0, 1.0])).unwrap().macd.unwrap();
        assert!(macd.death_cross);
    }

    #[test]
    fn macd_needs_two_bars() {
        let series = series_from_closes(&[1.0]);
        let mut set = IndicatorSet::new();
        set.insert(MACD_DIF, vec![Some(0.0)]);
        set.insert(MACD_DEA, vec![Some(0.0)]);
        set.insert(MACD_HIST, vec![Some(0.0)]);
        assert!(derive_latest_signals(&series, &set).unwrap().macd.is_none());
    }

    #[test]
    fn undefined_inputs_omit_signals() {
        let series = series_from_closes(&[10.0, 11.0]);
        let mut set = IndicatorSet::new();
        set.insert("MA5", vec![None, None]);
        set.insert("MA2", vec![None, Some(10.5)]);
        set.insert("RSI6", vec![None, None]);
        set.insert(KDJ_K, vec![None, Some(85.0)]);
        set.insert(KDJ_D, vec![None, None]);
        set.insert(KDJ_J, vec![None, None]);
        let signals = derive_latest_signals(&series, &set).unwrap();
        assert_eq!(signals.ma.len(), 1);
        assert_eq!(signals.ma["MA2"].position, PricePosition::Above);
        assert!(signals.rsi.is_empty());
        assert!(signals.kdj.is_none());
    }

    #[test]
    fn kdj_and_rsi_thresholds() {
        let series = series_from_closes(&[10.0]);
        let mut set = IndicatorSet::new();
        set.insert(KDJ_K, vec![Some(85.0)]);
        set.insert(KDJ_D, vec![Some(81.0)]);
        set.insert(KDJ_J, vec![Some(93.0)]);
        set.insert("RSI6", vec![Some(25.0)]);
        set.insert("RSI12", vec![Some(70.0)]);
        let signals = derive_latest_signals(&series, &set).unwrap();
        let kdj = signals.kdj.unwrap();
        assert!(kdj.overbought && !kdj.oversold);
        assert!(signals.rsi["RSI6"].oversold);
        assert!(!signals.rsi["RSI12"].overbought);
    }

    #[test]
    fn price_equal_to_ma_is_below() {
        let series = series_from_closes(&[10.0]);
        let set = IndicatorSet::single("MA1", vec![Some(10.0)]);
        let signals = derive_latest_signals(&series, &set).unwrap();
        assert_eq!(signals.ma["MA1"].position, PricePosition::Below);
    }
}

use super::levels::{SupportResistance, detect_support_resistance};
use super::statistics::{Statistics, calculate_statistics};
use super::streak::{ConsecutiveDays, find_consecutive_days};
use super::volatility::{Volatility, calculate_volatility};
use super::volume_price::{VolumePrice, analyze_volume_price};
use crate::indicators::{IndicatorSet, Signals, derive_latest_signals};
use crate::model::{Period, Series};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Tunables of the single-series analytics.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    /// Half-width of the neighbourhood a bar must dominate to be a level.
    pub support_window: usize,
    pub num_levels: usize,
    /// Relative distance below which levels merge into one cluster.
    pub tolerance: f64,
    pub volatility_window: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            support_window: 20,
            num_levels: 3,
            tolerance: 0.02,
            volatility_window: 20,
        }
    }
}

/// Everything known about one series at one point in time.
///
/// A section that could not be computed is `None`; the others are still filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub symbol: String,
    pub period: Period,
    pub statistics: Option<Statistics>,
    pub volatility: Option<Volatility>,
    pub consecutive_days: Option<ConsecutiveDays>,
    pub support_resistance: SupportResistance,
    pub volume_price: Option<VolumePrice>,
    pub signals: Option<Signals>,
    pub generated_at: DateTime<Utc>,
}

/// Trait defining the interface for a single-series analyzer.
pub trait Analyzer {
    fn calculate_statistics(&self, series: &Series) -> Option<Statistics>;
    fn calculate_volatility(&self, series: &Series) -> Option<Volatility>;
    fn find_consecutive_days(&self, series: &Series) -> Option<ConsecutiveDays>;
    fn detect_support_resistance(&self, series: &Series) -> SupportResistance;
    fn analyze_volume_price(&self, series: &Series) -> Option<VolumePrice>;
    /// Runs every analysis plus the latest-bar signals of `indicators`.
    fn generate_summary(&self, series: &Series, indicators: &IndicatorSet) -> AnalysisSummary;
}

/// Implementation of the analyzer; stateless apart from its parameters.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerImpl {
    params: AnalysisParams,
}

impl AnalyzerImpl {
    pub fn new(params: AnalysisParams) -> Self {
        Self { params }
    }

}

fn note_missing<T>(section: &str, symbol: &str, value: &Option<T>) {
    if value.is_none() {
        debug!("{} unavailable for {}", section, symbol);
    }
}

impl Analyzer for AnalyzerImpl {
    fn calculate_statistics(&self, series: &Series) -> Option<Statistics> {
        calculate_statistics(series)
    }

    fn calculate_volatility(&self, series: &Series) -> Option<Volatility> {
        calculate_volatility(series, self.params.volatility_window)
    }

    fn find_consecutive_days(&self, series: &Series) -> Option<ConsecutiveDays> {
        find_consecutive_days(series)
    }

    fn detect_support_resistance(&self, series: &Series) -> SupportResistance {
        detect_support_resistance(
            series,
            self.params.support_window,
            self.params.num_levels,
            self.params.tolerance,
        )
    }

    fn analyze_volume_price(&self, series: &Series) -> Option<VolumePrice> {
        analyze_volume_price(series)
    }

    fn generate_summary(&self, series: &Series, indicators: &IndicatorSet) -> AnalysisSummary {
        let symbol = series.symbol();

        let statistics = self.calculate_statistics(series);
        note_missing("statistics", symbol, &statistics);
        let volatility = self.calculate_volatility(series);
        note_missing("volatility", symbol, &volatility);
        let consecutive_days = self.find_consecutive_days(series);
        note_missing("consecutive days", symbol, &consecutive_days);
        let volume_price = self.analyze_volume_price(series);
        note_missing("volume-price", symbol, &volume_price);
        let signals = derive_latest_signals(series, indicators);
        note_missing("signals", symbol, &signals);
        let support_resistance = self.detect_support_resistance(series);

        info!(
            "Generated summary for {} ({}, {} bars)",
            symbol,
            series.period(),
            series.len()
        );

        AnalysisSummary {
            symbol: symbol.to_string(),
            period: series.period(),
            statistics,
            volatility,
            consecutive_days,
            support_resistance,
            volume_price,
            signals,
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::IndicatorEngine;
    use crate::indicators::test_support::series_from_closes;

    #[test]
    fn short_series_still_gets_partial_summary() {
        let series = series_from_closes(&[10.0, 10.5, 10.2, 10.8, 11.0]);
        let indicators = IndicatorEngine::default().compose_all(&series);
        let summary = AnalyzerImpl::default().generate_summary(&series, &indicators);
        assert!(summary.volatility.is_none());
        assert!(summary.support_resistance.support.is_empty());
        assert_eq!(summary.statistics.unwrap().total_records, 5);
        assert!(summary.consecutive_days.is_some());
        assert!(summary.volume_price.is_some());
        let signals = summary.signals.unwrap();
        assert!(signals.ma.contains_key("MA5"));
        assert!(signals.macd.is_none());
    }

    #[test]
    fn empty_series_summary_is_all_empty() {
        let series = series_from_closes(&[]);
        let summary = AnalyzerImpl::default().generate_summary(&series, &IndicatorSet::new());
        assert!(summary.statistics.is_none());
        assert!(summary.consecutive_days.is_none());
        assert!(summary.volume_price.is_none());
        assert!(summary.signals.is_none());
        assert_eq!(summary.symbol, "sh000001");
    }

    #[test]
    fn params_reach_the_analyses() {
        let closes: Vec<f64> = (0..12).map(|i| 100.0 + (i % 3) as f64).collect();
        let series = series_from_closes(&closes);
        let narrow = AnalyzerImpl::new(AnalysisParams {
            volatility_window: 5,
            ..AnalysisParams::default()
        });
        assert!(narrow.calculate_volatility(&series).is_some());
        assert!(AnalyzerImpl::default().calculate_volatility(&series).is_none());
    }
}

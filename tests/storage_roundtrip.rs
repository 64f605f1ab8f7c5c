mod common;

use chrono::NaiveDate;
use common::random_walk;
use index_analyzer::analyzer::{AnalysisParams, Analyzer, AnalyzerImpl};
use index_analyzer::indicators::{IndicatorEngine, IndicatorParams};
use index_analyzer::model::Period;
use index_analyzer::storage::SqliteStorage;
use tempfile::tempdir;

#[test]
fn series_and_summary_survive_reopening() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index_data.db");
    let path = path.to_str().unwrap();

    let series = random_walk("sh000016", 80, 5);
    let set = IndicatorEngine::new(IndicatorParams::default()).compose_all(&series);
    let summary = AnalyzerImpl::new(AnalysisParams::default()).generate_summary(&series, &set);

    {
        let mut storage = SqliteStorage::new(path).unwrap();
        assert_eq!(storage.save_series(&series).unwrap(), 80);
        storage.save_summary(&summary).unwrap();
    }

    let storage = SqliteStorage::new(path).unwrap();
    let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2100, 1, 1).unwrap();
    let stored = storage.get_series("sh000016", Period::Daily, start, end).unwrap().unwrap();
    assert_eq!(stored.bars(), series.bars());

    let latest = storage.get_latest_summary("sh000016", Period::Daily).unwrap().unwrap();
    assert_eq!(latest.symbol, summary.symbol);
    assert_eq!(latest.generated_at, summary.generated_at);
    assert_eq!(latest.statistics, summary.statistics);
    assert_eq!(latest.signals, summary.signals);
}

#[test]
fn other_periods_are_kept_apart() {
    let mut storage = SqliteStorage::in_memory().unwrap();
    storage.save_series(&random_walk("sh000001", 10, 9)).unwrap();

    let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2100, 1, 1).unwrap();
    assert!(storage.get_series("sh000001", Period::Weekly, start, end).unwrap().is_none());
    assert!(storage.get_series("sz399001", Period::Daily, start, end).unwrap().is_none());
}

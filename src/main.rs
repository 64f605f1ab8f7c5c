use chrono::{Days, Local};
use futures::future::join_all;
use index_analyzer::analyzer::{Analyzer, AnalyzerImpl, MarketAnalyzer};
use index_analyzer::config::{AppConfig, IndexConfig, load_config};
use index_analyzer::fetcher::{BarFetcher, HistoryRequest, YahooFetcher};
use index_analyzer::indicators::IndicatorEngine;
use index_analyzer::model::Series;
use index_analyzer::storage::SqliteStorage;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, sleep};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {:?}", panic_info);
    }));

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.json".to_string());
    let config: Arc<AppConfig> = match load_config(&config_path) {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    if let Some(parent) = Path::new(&config.database_path).parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                error!("Failed to create database directory {:?}: {}", parent, e);
                return;
            }
        }
    }

    let storage = match SqliteStorage::new(&config.database_path) {
        Ok(s) => Arc::new(Mutex::new(s)),
        Err(e) => {
            error!("Failed to initialize storage: {}", e);
            return;
        }
    };

    let fetcher = match YahooFetcher::new(Duration::from_secs(config.request_timeout_seconds)) {
        Ok(f) => f,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return;
        }
    };

    let engine = Arc::new(IndicatorEngine::new(config.indicators.clone()));
    let analyzer = Arc::new(AnalyzerImpl::new(config.analysis.clone()));

    loop {
        info!("Processing {} indices...", config.indices.len());

        let tasks: Vec<_> = config
            .indices
            .iter()
            .map(|index_cfg| {
                process_index(
                    index_cfg,
                    &fetcher,
                    engine.clone(),
                    analyzer.clone(),
                    storage.clone(),
                    config.clone(),
                )
            })
            .collect();
        let processed: Vec<Series> = join_all(tasks).await.into_iter().flatten().collect();

        report_market(&processed);

        if config.update_interval_seconds == 0 {
            info!("Single pass finished.");
            break;
        }

        info!("Waiting {}s for the next update...", config.update_interval_seconds);
        tokio::select! {
            _ = sleep(Duration::from_secs(config.update_interval_seconds)) => {
                info!("Timer triggered.");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested.");
                break;
            }
        }
    }
}

/// Fetches, stores and analyses one index. Falls back to the stored history
/// when the remote fetch fails. Returns the series that was analysed.
async fn process_index(
    index_cfg: &IndexConfig,
    fetcher: &dyn BarFetcher,
    engine: Arc<IndicatorEngine>,
    analyzer: Arc<AnalyzerImpl>,
    storage: Arc<Mutex<SqliteStorage>>,
    config: Arc<AppConfig>,
) -> Option<Series> {
    info!("Processing index: {} ({})", index_cfg.symbol, index_cfg.period);

    let end = Local::now().date_naive();
    let start = end
        .checked_sub_days(Days::new(config.history_days.max(0) as u64))
        .unwrap_or(end);
    let request = HistoryRequest {
        symbol: index_cfg.symbol.clone(),
        period: index_cfg.period,
        start,
        end,
    };

    let series = match fetcher.fetch_history(&request).await {
        Ok(series) => {
            let mut storage = storage.lock().await;
            if let Err(e) = storage.save_series(&series) {
                warn!("Failed to save bars for {}: {}", series.symbol(), e);
            }
            series
        }
        Err(e) => {
            warn!("Fetch failed for {}: {}. Falling back to stored data.", index_cfg.symbol, e);
            let storage = storage.lock().await;
            match storage.get_series(&request.symbol, request.period, start, end) {
                Ok(Some(series)) => series,
                Ok(None) => {
                    error!("No stored data for {}", index_cfg.symbol);
                    return None;
                }
                Err(e) => {
                    error!("Failed to load stored bars for {}: {}", index_cfg.symbol, e);
                    return None;
                }
            }
        }
    };

    let analysed = series.clone();
    let summary = match tokio::task::spawn_blocking(move || {
        let indicators = engine.compose_all(&analysed);
        analyzer.generate_summary(&analysed, &indicators)
    })
    .await
    {
        Ok(summary) => summary,
        Err(e) => {
            error!("Analysis task for {} failed: {}", index_cfg.symbol, e);
            return None;
        }
    };

    if let Err(e) = storage.lock().await.save_summary(&summary) {
        warn!("Failed to save summary for {}: {}", summary.symbol, e);
    }

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => info!("Summary for {}:\n{}", summary.symbol, json),
        Err(e) => warn!("Failed to render summary for {}: {}", summary.symbol, e),
    }

    Some(series)
}

fn report_market(processed: &[Series]) {
    if processed.len() < 2 {
        return;
    }
    let refs: Vec<&Series> = processed.iter().collect();

    let comparison = MarketAnalyzer::compare_indices(&refs);
    for (rank, snapshot) in comparison.ranking.iter().enumerate() {
        info!(
            "#{} {}: {:.2} ({:+.2}%)",
            rank + 1,
            snapshot.symbol,
            snapshot.current,
            snapshot.pct_change
        );
    }

    for entry in MarketAnalyzer::correlation_matrix(&refs) {
        info!("Correlation {} / {}: {:.4}", entry.left, entry.right, entry.value);
    }
}

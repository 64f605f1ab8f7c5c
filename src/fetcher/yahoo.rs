use crate::fetcher::traits::{BarFetcher, HistoryRequest};
use crate::indices;
use crate::model::{Bar, FetchError, Period, Series};
use chrono::{DateTime, Days, NaiveDate, NaiveTime};
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{info, warn};

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

fn interval(period: Period) -> &'static str {
    match period {
        Period::Daily => "1d",
        Period::Weekly => "1wk",
        Period::Monthly => "1mo",
    }
}

fn epoch_seconds(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

fn at<T: Copy>(values: &[Option<T>], i: usize) -> Option<T> {
    values.get(i).copied().flatten()
}

/// Turns a chart API body into a series.
///
/// Rows missing any OHLC value are dropped. Rows are keyed by exchange-local
/// date; when two rows land on the same date the later one wins.
pub fn parse_chart_response(symbol: &str, period: Period, body: &str) -> Result<Series, FetchError> {
    let response: ChartResponse =
        serde_json::from_str(body).map_err(|e| FetchError::InvalidResponse(e.to_string()))?;
    if let Some(err) = response.chart.error {
        return Err(FetchError::InvalidResponse(format!("{}: {}", err.code, err.description)));
    }
    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| FetchError::Empty(symbol.to_string()))?;
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut rows: BTreeMap<NaiveDate, Bar> = BTreeMap::new();
    let mut dropped = 0usize;
    for (i, ts) in result.timestamp.iter().enumerate() {
        let Some(date) = DateTime::from_timestamp(ts + result.meta.gmtoffset, 0).map(|dt| dt.date_naive()) else {
            dropped += 1;
            continue;
        };
        let (Some(open), Some(high), Some(low), Some(close)) =
            (at(&quote.open, i), at(&quote.high, i), at(&quote.low, i), at(&quote.close, i))
        else {
            dropped += 1;
            continue;
        };
        let volume = at(&quote.volume, i).unwrap_or(0.0);
        rows.insert(date, Bar::new(date, open, high, low, close, volume));
    }

    if dropped > 0 {
        warn!("Dropped {} incomplete rows for {}", dropped, symbol);
    }
    if rows.is_empty() {
        return Err(FetchError::Empty(symbol.to_string()));
    }
    Ok(Series::with_derived_changes(symbol, period, rows.into_values().collect())?)
}

pub struct YahooFetcher {
    client: Client,
}

impl YahooFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) IndexAnalyzer/0.1")
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl BarFetcher for YahooFetcher {
    async fn fetch_history(&self, req: &HistoryRequest) -> Result<Series, FetchError> {
        let info = indices::lookup(&req.symbol).ok_or_else(|| FetchError::UnsupportedSymbol(req.symbol.clone()))?;
        let url = format!("{}/{}", CHART_URL, info.yahoo_code);
        let end_exclusive = req.end.checked_add_days(Days::new(1)).unwrap_or(req.end);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", epoch_seconds(req.start).to_string()),
                ("period2", epoch_seconds(end_exclusive).to_string()),
                ("interval", interval(req.period).to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::InvalidResponse(format!("HTTP {}: {}", status, body)));
        }

        let series = parse_chart_response(&req.symbol, req.period, &body)?;
        info!("Fetched {} {} bars for {}", series.len(), req.period, req.symbol);
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // rows for 2024-01-03, 2024-01-02 and 2024-01-04 local time (UTC+8), out of order
    const BODY: &str = r#"{
        "chart": {
            "result": [{
                "meta": { "gmtoffset": 28800 },
                "timestamp": [1704245400, 1704159000, 1704331800],
                "indicators": { "quote": [{
                    "open":   [2960.0, 2970.0, null],
                    "high":   [2980.0, 2975.0, 2950.0],
                    "low":    [2950.0, 2955.0, 2930.0],
                    "close":  [2967.0, 2962.0, 2940.0],
                    "volume": [310000000, 290000000, null]
                }]}
            }],
            "error": null
        }
    }"#;

    #[test]
    fn parses_sorts_and_drops_incomplete_rows() {
        let series = parse_chart_response("sh000001", Period::Daily, BODY).unwrap();
        assert_eq!(series.len(), 2);
        let bars = series.bars();
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[0].close, 2962.0);
        assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(bars[1].change, Some(5.0));
        assert_eq!(bars[1].volume, 310000000.0);
    }

    #[test]
    fn api_error_is_reported() {
        let body = r#"{ "chart": { "result": null, "error": { "code": "Not Found", "description": "No data found" } } }"#;
        let err = parse_chart_response("sh000001", Period::Daily, body).unwrap_err();
        assert!(matches!(err, FetchError::InvalidResponse(msg) if msg.contains("Not Found")));
    }

    #[test]
    fn empty_result_is_empty_error() {
        let body = r#"{ "chart": { "result": [{ "timestamp": [], "indicators": { "quote": [{}] } }], "error": null } }"#;
        let err = parse_chart_response("sh000300", Period::Weekly, body).unwrap_err();
        assert!(matches!(err, FetchError::Empty(s) if s == "sh000300"));
    }

    #[test]
    fn interval_follows_period() {
        assert_eq!(interval(Period::Daily), "1d");
        assert_eq!(interval(Period::Weekly), "1wk");
        assert_eq!(interval(Period::Monthly), "1mo");
    }
}

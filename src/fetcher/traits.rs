use crate::model::{FetchError, Period, Series};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRequest {
    pub symbol: String,
    pub period: Period,
    pub start: NaiveDate,
    /// Inclusive.
    pub end: NaiveDate,
}

/// Source of historical bars. Implementations return a validated series with
/// `change`/`pct_change` already derived.
#[async_trait::async_trait]
pub trait BarFetcher: Send + Sync {
    async fn fetch_history(&self, req: &HistoryRequest) -> Result<Series, FetchError>;
}

// Core structs: Bar, Period, Series and the error enums shared across modules
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One trading session for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub amount: Option<f64>,
    /// Close minus previous close. `None` for the first bar of a series.
    pub change: Option<f64>,
    /// `change` in percent of the previous close.
    pub pct_change: Option<f64>,
}

impl Bar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            amount: None,
            change: None,
            pct_change: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered bars of one symbol and period.
///
/// Dates are strictly ascending; construction rejects anything else, so every
/// consumer can rely on the ordering without re-checking it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    symbol: String,
    period: Period,
    bars: Vec<Bar>,
}

impl Series {
    pub fn new(symbol: impl Into<String>, period: Period, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        for pair in bars.windows(2) {
            if pair[1].date == pair[0].date {
                return Err(SeriesError::DuplicateDate(pair[1].date));
            }
            if pair[1].date < pair[0].date {
                return Err(SeriesError::OutOfOrder {
                    previous: pair[0].date,
                    next: pair[1].date,
                });
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            period,
            bars,
        })
    }

    /// Builds a series and fills `change`/`pct_change` from consecutive closes.
    /// The first bar always ends up with both fields undefined.
    pub fn with_derived_changes(
        symbol: impl Into<String>,
        period: Period,
        mut bars: Vec<Bar>,
    ) -> Result<Self, SeriesError> {
        let mut prev_close: Option<f64> = None;
        for bar in bars.iter_mut() {
            match prev_close {
                Some(prev) => {
                    let change = bar.close - prev;
                    bar.change = Some(change);
                    bar.pct_change = (prev != 0.0).then(|| change / prev * 100.0);
                }
                None => {
                    bar.change = None;
                    bar.pct_change = None;
                }
            }
            prev_close = Some(bar.close);
        }
        Self::new(symbol, period, bars)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("bars out of order: {next} follows {previous}")]
    OutOfOrder { previous: NaiveDate, next: NaiveDate },
    #[error("duplicate bar date: {0}")]
    DuplicateDate(NaiveDate),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unsupported symbol: {0}")]
    UnsupportedSymbol(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("no data returned for {0}")]
    Empty(String),
    #[error(transparent)]
    Series(#[from] SeriesError),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("payload encoding error: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("invalid stored value: {0}")]
    InvalidValue(String),
    #[error(transparent)]
    Series(#[from] SeriesError),
}

use crate::analyzer::AnalysisSummary;
use crate::model::{Bar, Period, Series, StorageError};
use crate::utils::parse_date;
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, Row, params};
use tracing::debug;

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens the database and creates the tables if needed.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        Self::init(Connection::open(db_path)?)
    }

    pub fn in_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS index_data (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                symbol TEXT NOT NULL,
                period TEXT NOT NULL,
                date TEXT NOT NULL,
                open REAL NOT NULL,
                high REAL NOT NULL,
                low REAL NOT NULL,
                close REAL NOT NULL,
                volume REAL NOT NULL,
                amount REAL,
                change REAL,
                pct_change REAL,
                created_at TEXT NOT NULL,
                UNIQUE(symbol, period, date)
            );

            CREATE INDEX IF NOT EXISTS idx_index_data_symbol_date
                ON index_data (symbol, period, date);

            CREATE TABLE IF NOT EXISTS analysis_summary (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                symbol TEXT NOT NULL,
                period TEXT NOT NULL,
                generated_at TEXT NOT NULL,
                payload TEXT NOT NULL
            );
            ",
        )?;

        Ok(Self { conn })
    }

    /// Upserts every bar of `series`. Returns the number of rows written.
    pub fn save_series(&mut self, series: &Series) -> Result<usize, StorageError> {
        let created_at = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        let mut written = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO index_data
                    (symbol, period, date, open, high, low, close, volume, amount, change, pct_change, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                 ON CONFLICT(symbol, period, date) DO UPDATE SET
                    open = excluded.open,
                    high = excluded.high,
                    low = excluded.low,
                    close = excluded.close,
                    volume = excluded.volume,
                    amount = excluded.amount,
                    change = excluded.change,
                    pct_change = excluded.pct_change",
            )?;
            for bar in series.bars() {
                written += stmt.execute(params![
                    series.symbol(),
                    series.period().as_str(),
                    bar.date.format("%Y-%m-%d").to_string(),
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    bar.volume,
                    bar.amount,
                    bar.change,
                    bar.pct_change,
                    &created_at,
                ])?;
            }
        }
        tx.commit()?;

        debug!("Saved {} bars for {} ({})", written, series.symbol(), series.period());
        Ok(written)
    }

    /// Stored bars of one symbol/period with `start <= date <= end`, oldest first.
    /// `None` when nothing matches. Changes are re-derived within the range, so
    /// the first returned bar has none.
    pub fn get_series(
        &self,
        symbol: &str,
        period: Period,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<Series>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT date, open, high, low, close, volume, amount, change, pct_change
             FROM index_data
             WHERE symbol = ?1 AND period = ?2 AND date >= ?3 AND date <= ?4
             ORDER BY date ASC",
        )?;

        let rows = stmt.query_map(
            params![
                symbol,
                period.as_str(),
                start.format("%Y-%m-%d").to_string(),
                end.format("%Y-%m-%d").to_string(),
            ],
            Self::map_bar,
        )?;

        let mut bars = Vec::new();
        for bar in rows {
            bars.push(bar?);
        }
        if bars.is_empty() {
            return Ok(None);
        }

        Ok(Some(Series::with_derived_changes(symbol, period, bars)?))
    }

    pub fn save_summary(&self, summary: &AnalysisSummary) -> Result<(), StorageError> {
        let payload = serde_json::to_string(summary)?;
        self.conn.execute(
            "INSERT INTO analysis_summary (symbol, period, generated_at, payload)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                &summary.symbol,
                summary.period.as_str(),
                summary.generated_at.to_rfc3339(),
                payload,
            ],
        )?;
        Ok(())
    }

    /// Most recently stored summary of one symbol/period.
    pub fn get_latest_summary(&self, symbol: &str, period: Period) -> Result<Option<AnalysisSummary>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT payload FROM analysis_summary
             WHERE symbol = ?1 AND period = ?2
             ORDER BY generated_at DESC, id DESC LIMIT 1",
        )?;

        let mut rows = stmt.query(params![symbol, period.as_str()])?;
        if let Some(row) = rows.next()? {
            let payload: String = row.get(0)?;
            Ok(Some(serde_json::from_str(&payload)?))
        } else {
            Ok(None)
        }
    }

    fn map_bar(row: &Row) -> Result<Bar, rusqlite::Error> {
        let date_str: String = row.get(0)?;
        let date = parse_date(&date_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(StorageError::InvalidValue(date_str.clone())),
            )
        })?;

        Ok(Bar {
            date,
            open: row.get(1)?,
            high: row.get(2)?,
            low: row.get(3)?,
            close: row.get(4)?,
            volume: row.get(5)?,
            amount: row.get(6)?,
            change: row.get(7)?,
            pct_change: row.get(8)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::calculate_statistics;
    use crate::indicators::test_support::series_from_closes;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn series_filters_by_range() {
        let mut storage = SqliteStorage::in_memory().unwrap();
        let series = series_from_closes(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        assert_eq!(storage.save_series(&series).unwrap(), 5);

        let stored = storage
            .get_series("sh000001", Period::Daily, date(2024, 1, 2), date(2024, 1, 4))
            .unwrap()
            .unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored.first().unwrap().close, 11.0);
        assert_eq!(stored.last().unwrap().close, 13.0);
    }

    #[test]
    fn sub_range_starts_without_change() {
        let mut storage = SqliteStorage::in_memory().unwrap();
        storage.save_series(&series_from_closes(&[10.0, 11.0, 12.0, 13.0])).unwrap();

        let stored = storage
            .get_series("sh000001", Period::Daily, date(2024, 1, 2), date(2024, 1, 4))
            .unwrap()
            .unwrap();
        let bars = stored.bars();
        assert_eq!(bars[0].close, 11.0);
        assert_eq!(bars[0].change, None);
        assert_eq!(bars[0].pct_change, None);
        assert_eq!(bars[1].change, Some(1.0));

        let stats = calculate_statistics(&stored).unwrap();
        assert_eq!(stats.change.up_days, 2);
    }

    #[test]
    fn saving_twice_updates_in_place() {
        let mut storage = SqliteStorage::in_memory().unwrap();
        storage.save_series(&series_from_closes(&[10.0, 11.0])).unwrap();
        storage.save_series(&series_from_closes(&[10.0, 12.5])).unwrap();

        let stored = storage
            .get_series("sh000001", Period::Daily, date(2024, 1, 1), date(2024, 12, 31))
            .unwrap()
            .unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored.last().unwrap().close, 12.5);
    }

    #[test]
    fn missing_data_is_none() {
        let storage = SqliteStorage::in_memory().unwrap();
        let none = storage
            .get_series("sh000300", Period::Weekly, date(2024, 1, 1), date(2024, 12, 31))
            .unwrap();
        assert!(none.is_none());
        assert!(storage.get_latest_summary("sh000300", Period::Weekly).unwrap().is_none());
    }
}

use chrono::{Duration, NaiveDate};
use index_analyzer::model::{Bar, Period, Series};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded geometric random walk with a plausible OHLCV shape.
pub fn random_walk(symbol: &str, len: usize, seed: u64) -> Series {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let mut close = 3000.0_f64;
    let bars = (0..len)
        .map(|i| {
            let open = close;
            close = (close * (1.0 + rng.random_range(-0.02..0.02))).max(1.0);
            let high = open.max(close) * (1.0 + rng.random_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.random_range(0.0..0.01));
            let volume = rng.random_range(1.0e8..5.0e8);
            Bar::new(start + Duration::days(i as i64), open, high, low, close, volume)
        })
        .collect();
    Series::with_derived_changes(symbol, Period::Daily, bars).unwrap()
}

use crate::model::Series;
use crate::utils::{mean, sample_std};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Day counts of the four price/volume direction combinations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumePricePatterns {
    pub price_up_volume_up: usize,
    pub price_up_volume_down: usize,
    pub price_down_volume_up: usize,
    pub price_down_volume_down: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeStatus {
    ExtremelyHigh,
    High,
    Normal,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumePrice {
    pub patterns: VolumePricePatterns,
    pub volume_status: VolumeStatus,
    pub latest_volume: f64,
    pub avg_volume: f64,
    /// Latest volume over the average; 0 when the average is 0.
    pub volume_ratio: f64,
}

/// Sign of the relative move from `prev` to `next`; `None` when flat.
/// Values are non-negative, so a rise from zero still counts as up.
fn direction(prev: f64, next: f64) -> Option<Ordering> {
    match next.partial_cmp(&prev)? {
        Ordering::Equal => None,
        ord => Some(ord),
    }
}

/// Classifies `volume` against mean `mu` and sample deviation `sigma`.
/// Hitting a band edge exactly counts as inside the higher band.
pub fn classify_volume(volume: f64, mu: f64, sigma: f64) -> VolumeStatus {
    if sigma <= 0.0 {
        return VolumeStatus::Normal;
    }
    if volume >= mu + 2.0 * sigma {
        VolumeStatus::ExtremelyHigh
    } else if volume >= mu + sigma {
        VolumeStatus::High
    } else if volume < mu - sigma {
        VolumeStatus::Low
    } else {
        VolumeStatus::Normal
    }
}

/// Price/volume co-movement counts and the latest bar's volume status.
pub fn analyze_volume_price(series: &Series) -> Option<VolumePrice> {
    let latest_volume = series.last()?.volume;
    let mut patterns = VolumePricePatterns::default();

    for pair in series.bars().windows(2) {
        let (Some(price), Some(volume)) = (
            direction(pair[0].close, pair[1].close),
            direction(pair[0].volume, pair[1].volume),
        ) else {
            continue;
        };
        match (price, volume) {
            (Ordering::Greater, Ordering::Greater) => patterns.price_up_volume_up += 1,
            (Ordering::Greater, _) => patterns.price_up_volume_down += 1,
            (_, Ordering::Greater) => patterns.price_down_volume_up += 1,
            _ => patterns.price_down_volume_down += 1,
        }
    }

    let volumes = series.volumes();
    let avg_volume = mean(&volumes)?;
    let std_volume = sample_std(&volumes).unwrap_or(0.0);

    Some(VolumePrice {
        patterns,
        volume_status: classify_volume(latest_volume, avg_volume, std_volume),
        latest_volume,
        avg_volume,
        volume_ratio: if avg_volume > 0.0 { latest_volume / avg_volume } else { 0.0 },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::series_from_close_volume;

    #[test]
    fn band_edges_round_up() {
        assert_eq!(classify_volume(110.0, 100.0, 10.0), VolumeStatus::High);
        assert_eq!(classify_volume(120.0, 100.0, 10.0), VolumeStatus::ExtremelyHigh);
        assert_eq!(classify_volume(109.9, 100.0, 10.0), VolumeStatus::Normal);
        assert_eq!(classify_volume(90.0, 100.0, 10.0), VolumeStatus::Normal);
        assert_eq!(classify_volume(89.9, 100.0, 10.0), VolumeStatus::Low);
    }

    #[test]
    fn zero_variance_is_normal() {
        assert_eq!(classify_volume(100.0, 100.0, 0.0), VolumeStatus::Normal);
    }

    #[test]
    fn counts_each_combination() {
        let series = series_from_close_volume(&[
            (10.0, 100.0),
            (11.0, 150.0), // up/up
            (12.0, 120.0), // up/down
            (11.0, 130.0), // down/up
            (10.0, 90.0),  // down/down
            (10.0, 200.0), // flat price, not counted
            (11.0, 200.0), // flat volume, not counted
        ]);
        let vp = analyze_volume_price(&series).unwrap();
        assert_eq!(
            vp.patterns,
            VolumePricePatterns {
                price_up_volume_up: 1,
                price_up_volume_down: 1,
                price_down_volume_up: 1,
                price_down_volume_down: 1,
            }
        );
        assert_eq!(vp.latest_volume, 200.0);
    }

    #[test]
    fn volume_rising_from_zero_counts_as_up() {
        let series = series_from_close_volume(&[(10.0, 0.0), (11.0, 100.0), (10.5, 0.0), (10.0, 0.0)]);
        let vp = analyze_volume_price(&series).unwrap();
        assert_eq!(
            vp.patterns,
            VolumePricePatterns {
                price_up_volume_up: 1,
                price_up_volume_down: 0,
                price_down_volume_up: 0,
                price_down_volume_down: 1,
            }
        );
    }

    #[test]
    fn spike_on_last_bar_is_extreme() {
        let mut rows: Vec<(f64, f64)> = (0..20).map(|i| (10.0, 100.0 + (i % 2) as f64)).collect();
        rows.push((10.0, 1000.0));
        let vp = analyze_volume_price(&series_from_close_volume(&rows)).unwrap();
        assert_eq!(vp.volume_status, VolumeStatus::ExtremelyHigh);
    }
}

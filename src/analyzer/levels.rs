//! Support and resistance levels from clustered local extrema.

use crate::model::Series;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportResistance {
    /// Highest first.
    pub resistance: Vec<f64>,
    /// Highest first, ranked by price rather than distance to the close.
    pub support: Vec<f64>,
}

/// Greedy clustering of price levels.
///
/// Levels are sorted ascending; a level joins the current cluster while its
/// relative distance to the cluster's last member stays below `tolerance`.
/// Each cluster collapses to its mean.
pub fn cluster_levels(levels: &[f64], tolerance: f64) -> Vec<f64> {
    let mut sorted = levels.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut clusters: Vec<f64> = Vec::new();
    let mut current: Vec<f64> = Vec::new();
    for level in sorted {
        if let Some(&last) = current.last() {
            if (level - last) / last >= tolerance {
                clusters.push(current.iter().sum::<f64>() / current.len() as f64);
                current.clear();
            }
        }
        current.push(level);
    }
    if !current.is_empty() {
        clusters.push(current.iter().sum::<f64>() / current.len() as f64);
    }
    clusters
}

fn top_levels(mut levels: Vec<f64>, num_levels: usize) -> Vec<f64> {
    levels.sort_by(|a, b| b.total_cmp(a));
    levels.truncate(num_levels);
    levels
}

/// Bars whose high (low) is the extreme of the symmetric `window` around
/// them become resistance (support) candidates; candidates are clustered
/// with `tolerance` and the top `num_levels` of each side are returned.
pub fn detect_support_resistance(
    series: &Series,
    window: usize,
    num_levels: usize,
    tolerance: f64,
) -> SupportResistance {
    let bars = series.bars();
    if bars.len() < window {
        return SupportResistance::default();
    }

    let mut highs = Vec::new();
    let mut lows = Vec::new();
    for i in window..bars.len().saturating_sub(window) {
        let neighbourhood = &bars[i - window..=i + window];
        let max_high = neighbourhood.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let min_low = neighbourhood.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        if bars[i].high == max_high {
            highs.push(bars[i].high);
        }
        if bars[i].low == min_low {
            lows.push(bars[i].low);
        }
    }

    SupportResistance {
        resistance: top_levels(cluster_levels(&highs, tolerance), num_levels),
        support: top_levels(cluster_levels(&lows, tolerance), num_levels),
    }
}

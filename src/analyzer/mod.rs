// Analyzer module: aggregates submodules for different aspects of analysis.

pub mod comparison;
pub mod levels;
pub mod price_analysis;
pub mod statistics;
pub mod streak;
pub mod volatility;
pub mod volume_price;

// Re-export the main Analyzer implementation for ease of use.
pub use comparison::{Comparison, CorrelationEntry, IndexSnapshot, MarketAnalyzer};
pub use levels::{SupportResistance, cluster_levels, detect_support_resistance};
pub use price_analysis::{AnalysisParams, AnalysisSummary, Analyzer, AnalyzerImpl};
pub use statistics::{Statistics, calculate_statistics};
pub use streak::{ConsecutiveDays, CurrentStreak, StreakDirection, StreakRun, find_consecutive_days};
pub use volatility::{RollingVolatility, Volatility, calculate_volatility};
pub use volume_price::{VolumePrice, VolumePricePatterns, VolumeStatus, analyze_volume_price, classify_volume};

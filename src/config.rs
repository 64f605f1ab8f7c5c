use crate::analyzer::AnalysisParams;
use crate::indicators::IndicatorParams;
use crate::indices;
use crate::model::Period;
use serde::Deserialize;
use std::fs;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    pub symbol: String,
    #[serde(default = "default_period")]
    pub period: Period,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// How many calendar days of history to request per index.
    #[serde(default = "default_history_days")]
    pub history_days: i64,
    /// 0 runs a single pass and exits.
    #[serde(default)]
    pub update_interval_seconds: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    pub indices: Vec<IndexConfig>,
    #[serde(default)]
    pub indicators: IndicatorParams,
    #[serde(default)]
    pub analysis: AnalysisParams,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown index symbol: {0}")]
    UnknownSymbol(String),
}

fn default_period() -> Period {
    Period::Daily
}

fn default_database_path() -> String {
    "data/index_data.db".to_string()
}

fn default_history_days() -> i64 {
    365
}

fn default_request_timeout() -> u64 {
    10
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content)?;
    if let Some(unknown) = config.indices.iter().find(|i| indices::lookup(&i.symbol).is_none()) {
        return Err(ConfigError::UnknownSymbol(unknown.symbol.clone()));
    }
    Ok(config)
}

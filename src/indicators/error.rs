//! Indicator error types.

use thiserror::Error;

/// Why an indicator could not be computed for a series.
///
/// These never escape the public indicator functions: the affected key is
/// left out of the resulting set and the reason is logged.
#[derive(Debug, Error, PartialEq)]
pub enum IndicatorError {
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("insufficient data: need {required} bars, got {actual}")]
    InsufficientData { required: usize, actual: usize },
}

impl IndicatorError {
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        IndicatorError::InvalidParams(msg.into())
    }

    /// Returns `InsufficientData` when `actual < required`.
    pub fn require(required: usize, actual: usize) -> Result<(), Self> {
        if actual < required {
            Err(IndicatorError::InsufficientData { required, actual })
        } else {
            Ok(())
        }
    }
}

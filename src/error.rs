use thiserror::Error;

/// Rejected engine or strategy configuration.
///
/// Only raised while building an engine; the per-sample path never fails.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("trigger low threshold {low} must be below high threshold {high}")]
    InvertedThresholds { low: f32, high: f32 },

    #[error("minimum time {minimum}s must be below maximum time {maximum}s")]
    InvertedTimes { minimum: f32, maximum: f32 },
}

pub(crate) fn require_finite(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

pub(crate) fn require_positive(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    let value = require_finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

pub(crate) fn require_non_negative(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    let value = require_finite(field, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

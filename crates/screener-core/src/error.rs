//! Error types for the screening pipeline.

use thiserror::Error;

/// Top-level screener error.
#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Run parameter errors. These are fatal and surface before any fetch begins.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    Missing(String),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Data source errors.
///
/// Every variant is recoverable from the run's point of view: the scheduler
/// scopes it to a ticker, a batch, or (for ticker lists) a region.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for {0}")]
    NoDataAvailable(String),

    #[error("Ticker source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Batch fetch not supported by {0}")]
    BatchUnsupported(String),

    #[error("API error: {0}")]
    ApiError(String),
}

/// Result type alias for screener operations.
pub type ScreenerResult<T> = Result<T, ScreenerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_wraps() {
        let err: ScreenerError = ConfigError::invalid("threshold", "must be positive").into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid value for threshold: must be positive"
        );
    }
}

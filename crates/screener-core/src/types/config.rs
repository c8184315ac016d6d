//! Run parameters for a screening pass.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;

/// Parameters supplied once per run. Immutable for the run's duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// Maximum fractional distance from an extreme (0.03 = 3%)
    pub threshold: f64,
    /// Trailing window requested from the provider, in calendar days
    pub lookback_days: u32,
    /// Minimum bars required before a ticker is evaluated
    pub min_history_bars: usize,
    /// Tickers per batch
    pub batch_size: usize,
    /// Batches allowed in flight at once
    pub max_concurrency: usize,
    /// Minimum gap between successive batch dispatches
    pub batch_delay: Duration,
    /// Gap between per-ticker calls when the provider has no batch fetch
    pub ticker_delay: Duration,
    /// Pause after a region completes, before the next one starts
    pub region_delay: Duration,
    /// Upper bound on a single provider call
    pub fetch_timeout: Duration,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            threshold: 0.03,
            lookback_days: 365,
            min_history_bars: 50,
            batch_size: 150,
            max_concurrency: 4,
            batch_delay: Duration::from_millis(500),
            ticker_delay: Duration::ZERO,
            region_delay: Duration::from_secs(3),
            fetch_timeout: Duration::from_secs(60),
        }
    }
}

impl ScreenConfig {
    /// Validate the run parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 || self.threshold >= 1.0 {
            return Err(ConfigError::invalid(
                "threshold",
                format!("must be a fraction in (0, 1), got {}", self.threshold),
            ));
        }
        if self.lookback_days == 0 {
            return Err(ConfigError::invalid("lookback_days", "must be greater than 0"));
        }
        if self.min_history_bars == 0 {
            return Err(ConfigError::invalid("min_history_bars", "must be greater than 0"));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::invalid("batch_size", "must be greater than 0"));
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::invalid("max_concurrency", "must be greater than 0"));
        }
        if self.fetch_timeout.is_zero() {
            return Err(ConfigError::invalid("fetch_timeout", "must be greater than 0"));
        }
        Ok(())
    }
}

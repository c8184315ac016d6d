//! Price series provider trait definitions.

use crate::error::DataError;
use crate::types::PriceSeries;
use async_trait::async_trait;
use std::collections::HashMap;

/// Series returned by a multi-ticker fetch, keyed by ticker.
///
/// Tickers the provider had no data for are simply absent.
pub type BatchSeries = HashMap<String, PriceSeries>;

/// Trait for historical daily price providers.
///
/// Latency and availability are outside the pipeline's control; the
/// scheduler bounds every call with a timeout and never retries.
#[async_trait]
pub trait PriceSeriesProvider: Send + Sync {
    /// Fetch the trailing daily series for one ticker.
    ///
    /// # Arguments
    /// * `ticker` - The symbol to fetch
    /// * `lookback_days` - Trailing window in calendar days
    ///
    /// # Returns
    /// Bars ordered from oldest to newest
    async fn fetch_series(&self, ticker: &str, lookback_days: u32) -> Result<PriceSeries, DataError>;

    /// Whether `fetch_batch` is implemented.
    fn supports_batch(&self) -> bool {
        false
    }

    /// Fetch series for many tickers in a single request.
    ///
    /// An `Err` fails the whole batch. Missing tickers in an `Ok` map are
    /// per-ticker failures.
    async fn fetch_batch(
        &self,
        _tickers: &[String],
        _lookback_days: u32,
    ) -> Result<BatchSeries, DataError> {
        Err(DataError::BatchUnsupported(self.name().to_string()))
    }

    /// Get the provider name.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SingleOnly;

    #[async_trait]
    impl PriceSeriesProvider for SingleOnly {
        async fn fetch_series(&self, ticker: &str, _lookback_days: u32) -> Result<PriceSeries, DataError> {
            Ok(PriceSeries::new(ticker))
        }

        fn name(&self) -> &str {
            "single"
        }
    }

    #[tokio::test]
    async fn test_batch_defaults_to_unsupported() {
        let provider = SingleOnly;
        assert!(!provider.supports_batch());

        let result = provider.fetch_batch(&["AAPL".to_string()], 365).await;
        assert_eq!(result, Err(DataError::BatchUnsupported("single".to_string())));
    }
}

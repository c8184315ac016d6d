//! Ticker universe source trait.

use crate::error::DataError;
use async_trait::async_trait;

/// Supplies the ordered ticker universe for a region.
#[async_trait]
pub trait TickerSource: Send + Sync {
    /// Load the region's tickers in their listed order.
    ///
    /// Duplicates are passed through. An `Err` means the source is
    /// unavailable; callers screen the region with an empty universe.
    async fn load(&self, region: &str) -> Result<Vec<String>, DataError>;

    /// Get the source name.
    fn name(&self) -> &str;
}

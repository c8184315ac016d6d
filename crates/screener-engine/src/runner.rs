//! Multi-region screening run.

use chrono::Utc;
use std::sync::Arc;
use screener_core::error::{ConfigError, ScreenerResult};
use screener_core::traits::{PriceSeriesProvider, TickerSource};
use screener_core::types::{RegionResult, ScreenConfig};
use tokio::time::sleep;
use tracing::{info, warn};
use uuid::Uuid;

use crate::report::ScreenReport;
use crate::scheduler::BatchScheduler;

/// Screens a list of regions one after another.
pub struct Screener {
    config: ScreenConfig,
    source: Arc<dyn TickerSource>,
    scheduler: BatchScheduler,
}

impl Screener {
    /// Create a screener. Fails if the run parameters are invalid.
    pub fn new(
        config: ScreenConfig,
        source: Arc<dyn TickerSource>,
        provider: Arc<dyn PriceSeriesProvider>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            scheduler: BatchScheduler::new(provider, config.clone()),
            config,
            source,
        })
    }

    /// Run the screen over `regions`, in order.
    ///
    /// A region whose ticker list cannot be loaded yields an empty result;
    /// only configuration problems abort the run.
    pub async fn run(&self, regions: &[String]) -> ScreenerResult<ScreenReport> {
        if regions.is_empty() {
            return Err(ConfigError::Missing("regions".to_string()).into());
        }

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(
            %run_id,
            regions = regions.len(),
            source = self.source.name(),
            threshold = self.config.threshold,
            "Starting screen"
        );

        let mut results = Vec::with_capacity(regions.len());
        let mut fetched_previous = false;

        for region in regions {
            let tickers = match self.source.load(region).await {
                Ok(tickers) => tickers,
                Err(e) => {
                    warn!(region = %region, error = %e, "Ticker list unavailable, region yields no signals");
                    Vec::new()
                }
            };

            if tickers.is_empty() {
                info!(region = %region, "Empty universe, skipping region");
                results.push(RegionResult::empty(region.as_str()));
                continue;
            }

            // Pause between regions that hit the provider
            if fetched_previous && !self.config.region_delay.is_zero() {
                sleep(self.config.region_delay).await;
            }

            results.push(self.scheduler.run_region(region, &tickers).await);
            fetched_previous = true;
        }

        let report = ScreenReport {
            run_id,
            started_at,
            completed_at: Utc::now(),
            config: self.config.clone(),
            regions: results,
        };

        info!(
            %run_id,
            signals = report.total_signals(),
            elapsed_secs = report.elapsed_secs(),
            "Screen complete"
        );

        Ok(report)
    }
}

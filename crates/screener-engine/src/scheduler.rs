//! Batch scheduler.
//!
//! Splits a region's universe into contiguous batches and runs them on a
//! worker pool bounded by `max_concurrency`. Each worker owns its batch's
//! outcome and hands it back to the aggregator, which merges by batch index.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use screener_core::error::DataError;
use screener_core::traits::{BatchSeries, PriceSeriesProvider};
use screener_core::types::{PriceSeries, RegionResult, ScreenConfig, TickerOutcome};
use screener_signals::SignalExtractor;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{sleep, sleep_until, timeout, Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::aggregator::RegionAggregator;

/// Lifecycle of a single batch.
///
/// `Pending -> Fetching -> Extracting -> Done`, or `Fetching -> Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchState {
    Pending,
    Fetching,
    Extracting,
    Done,
    Failed,
}

impl BatchState {
    /// Check whether moving to `next` is a legal transition.
    pub fn can_transition_to(self, next: BatchState) -> bool {
        matches!(
            (self, next),
            (BatchState::Pending, BatchState::Fetching)
                | (BatchState::Fetching, BatchState::Extracting)
                | (BatchState::Fetching, BatchState::Failed)
                | (BatchState::Extracting, BatchState::Done)
        )
    }

    /// Check if the batch has finished, successfully or not.
    pub fn is_terminal(self) -> bool {
        matches!(self, BatchState::Done | BatchState::Failed)
    }
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BatchState::Pending => "pending",
            BatchState::Fetching => "fetching",
            BatchState::Extracting => "extracting",
            BatchState::Done => "done",
            BatchState::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Scheduler state for a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionState {
    /// Some batches have not reached a terminal state
    Running,
    /// Every batch is done or failed
    Complete,
}

/// A contiguous slice of the universe processed as one unit.
#[derive(Debug, Clone)]
pub struct Batch {
    /// Position of the batch in dispatch order
    pub index: usize,
    /// Tickers in universe order
    pub tickers: Vec<String>,
    state: BatchState,
}

impl Batch {
    /// Create a pending batch.
    pub fn new(index: usize, tickers: Vec<String>) -> Self {
        Self {
            index,
            tickers,
            state: BatchState::Pending,
        }
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    fn advance(&mut self, next: BatchState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal batch transition {} -> {}",
            self.state,
            next
        );
        debug!(batch = self.index, from = %self.state, to = %next, "Batch state");
        self.state = next;
    }
}

/// Result of running one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// Batch index
    pub index: usize,
    /// Terminal state, `Done` or `Failed`
    pub state: BatchState,
    /// Number of tickers in the batch
    pub size: usize,
    /// Per-ticker outcomes in universe order; empty when the batch failed
    pub outcomes: Vec<TickerOutcome>,
    /// Batch-level failure
    pub error: Option<String>,
}

impl BatchOutcome {
    /// Outcome for a batch that failed as a whole.
    pub fn failed(index: usize, size: usize, error: impl Into<String>) -> Self {
        Self {
            index,
            state: BatchState::Failed,
            size,
            outcomes: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Partition tickers into contiguous batches of `batch_size`, preserving order.
pub fn partition(tickers: &[String], batch_size: usize) -> Vec<Batch> {
    tickers
        .chunks(batch_size.max(1))
        .enumerate()
        .map(|(index, chunk)| Batch::new(index, chunk.to_vec()))
        .collect()
}

/// What a provider returned for a batch.
enum Fetched {
    /// One multi-ticker call
    Batch(BatchSeries),
    /// One call per ticker, in batch order
    PerTicker(Vec<Result<PriceSeries, DataError>>),
}

/// Runs a single batch: fetch, then extract.
#[derive(Clone)]
struct BatchWorker {
    provider: Arc<dyn PriceSeriesProvider>,
    extractor: SignalExtractor,
    lookback_days: u32,
    ticker_delay: Duration,
    fetch_timeout: Duration,
}

impl BatchWorker {
    async fn run(self, mut batch: Batch) -> BatchOutcome {
        batch.advance(BatchState::Fetching);

        let fetched = match self.fetch(&batch.tickers).await {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!(batch = batch.index, tickers = batch.len(), error = %e, "Batch fetch failed, skipping batch");
                batch.advance(BatchState::Failed);
                return BatchOutcome::failed(batch.index, batch.len(), e.to_string());
            }
        };

        batch.advance(BatchState::Extracting);

        let outcomes = match fetched {
            Fetched::Batch(series) => batch
                .tickers
                .iter()
                .map(|ticker| match series.get(ticker) {
                    Some(s) => self.extractor.extract(s),
                    None => TickerOutcome::Failed {
                        ticker: ticker.clone(),
                        reason: "missing from batch response".to_string(),
                    },
                })
                .collect(),
            Fetched::PerTicker(results) => batch
                .tickers
                .iter()
                .zip(results)
                .map(|(ticker, result)| match result {
                    Ok(s) => self.extractor.extract(&s),
                    Err(e) => TickerOutcome::Failed {
                        ticker: ticker.clone(),
                        reason: e.to_string(),
                    },
                })
                .collect(),
        };

        batch.advance(BatchState::Done);

        BatchOutcome {
            index: batch.index,
            state: BatchState::Done,
            size: batch.len(),
            outcomes,
            error: None,
        }
    }

    async fn fetch(&self, tickers: &[String]) -> Result<Fetched, DataError> {
        if self.provider.supports_batch() {
            let series = timeout(
                self.fetch_timeout,
                self.provider.fetch_batch(tickers, self.lookback_days),
            )
            .await
            .map_err(|_| DataError::Timeout(self.fetch_timeout.as_secs()))??;
            return Ok(Fetched::Batch(series));
        }

        let mut results = Vec::with_capacity(tickers.len());
        for (i, ticker) in tickers.iter().enumerate() {
            if i > 0 && !self.ticker_delay.is_zero() {
                sleep(self.ticker_delay).await;
            }
            let result = timeout(
                self.fetch_timeout,
                self.provider.fetch_series(ticker, self.lookback_days),
            )
            .await
            .unwrap_or_else(|_| Err(DataError::Timeout(self.fetch_timeout.as_secs())));

            if let Err(e) = &result {
                debug!(ticker = %ticker, error = %e, "Ticker fetch failed");
            }
            results.push(result);
        }
        Ok(Fetched::PerTicker(results))
    }
}

/// Dispatches a region's batches to a bounded worker pool.
pub struct BatchScheduler {
    provider: Arc<dyn PriceSeriesProvider>,
    extractor: SignalExtractor,
    config: ScreenConfig,
}

impl BatchScheduler {
    /// Create a new scheduler.
    pub fn new(provider: Arc<dyn PriceSeriesProvider>, config: ScreenConfig) -> Self {
        Self {
            provider,
            extractor: SignalExtractor::from_config(&config),
            config,
        }
    }

    fn worker(&self) -> BatchWorker {
        BatchWorker {
            provider: Arc::clone(&self.provider),
            extractor: self.extractor,
            lookback_days: self.config.lookback_days,
            ticker_delay: self.config.ticker_delay,
            fetch_timeout: self.config.fetch_timeout,
        }
    }

    /// Screen one region's universe.
    ///
    /// Never fails: batch and ticker failures are counted in the summary.
    /// Dropping the returned future aborts in-flight batches, and no provider
    /// call is started after that.
    pub async fn run_region(&self, region: &str, tickers: &[String]) -> RegionResult {
        let batches = partition(tickers, self.config.batch_size);
        let mut aggregator = RegionAggregator::new(region, tickers.len());

        info!(
            region,
            tickers = tickers.len(),
            batches = batches.len(),
            provider = self.provider.name(),
            "Screening region"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));
        let mut join_set: JoinSet<BatchOutcome> = JoinSet::new();
        let mut last_dispatch: Option<Instant> = None;

        for batch in batches {
            aggregator.register(batch.index, batch.len());

            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    error!(region, error = %e, "Worker pool closed, abandoning remaining batches");
                    break;
                }
            };

            if let Some(last) = last_dispatch {
                sleep_until(last + self.config.batch_delay).await;
            }
            last_dispatch = Some(Instant::now());

            debug!(region, batch = batch.index, tickers = batch.len(), "Dispatching batch");

            let worker = self.worker();
            join_set.spawn(async move {
                let _permit = permit;
                worker.run(batch).await
            });
        }

        // A panicked batch never reports; the aggregator counts it as failed
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(outcome) => aggregator.absorb(outcome),
                Err(e) => error!(region, error = %e, "Batch worker panicked"),
            }
        }

        let result = aggregator.finish();
        info!(
            region,
            highs = result.highs.len(),
            lows = result.lows.len(),
            failed = result.summary.failed,
            batches_failed = result.summary.batches_failed,
            "{}: {} highs, {} lows",
            region,
            result.highs.len(),
            result.lows.len()
        );
        result
    }
}

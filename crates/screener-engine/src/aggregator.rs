//! Region aggregation.
//!
//! Batch outcomes arrive in completion order; they are keyed by dispatch
//! index and only concatenated when the region finishes, so the result
//! follows the universe order regardless of timing.

use std::collections::BTreeMap;
use screener_core::types::{RegionResult, RegionSummary, SignalKind, TickerOutcome};
use tracing::warn;

use crate::scheduler::{BatchOutcome, BatchState, RegionState};

/// Collects batch outcomes for one region.
#[derive(Debug)]
pub struct RegionAggregator {
    region: String,
    tickers_total: usize,
    /// Dispatched batches: index -> ticker count
    dispatched: BTreeMap<usize, usize>,
    completed: BTreeMap<usize, BatchOutcome>,
}

impl RegionAggregator {
    /// Create an aggregator for a region with `tickers_total` tickers.
    pub fn new(region: impl Into<String>, tickers_total: usize) -> Self {
        Self {
            region: region.into(),
            tickers_total,
            dispatched: BTreeMap::new(),
            completed: BTreeMap::new(),
        }
    }

    /// Record that a batch has been dispatched.
    pub fn register(&mut self, index: usize, size: usize) {
        self.dispatched.insert(index, size);
    }

    /// Accept a finished batch.
    pub fn absorb(&mut self, outcome: BatchOutcome) {
        if !self.dispatched.contains_key(&outcome.index) {
            warn!(region = %self.region, batch = outcome.index, "Ignoring outcome for unknown batch");
            return;
        }
        if !outcome.state.is_terminal() {
            warn!(region = %self.region, batch = outcome.index, state = %outcome.state, "Ignoring unfinished batch");
            return;
        }
        self.completed.insert(outcome.index, outcome);
    }

    /// Running until every dispatched batch has reported.
    pub fn state(&self) -> RegionState {
        if self.completed.len() == self.dispatched.len() {
            RegionState::Complete
        } else {
            RegionState::Running
        }
    }

    /// Merge outcomes in dispatch order.
    ///
    /// Batches that never reported count as failed.
    pub fn finish(mut self) -> RegionResult {
        let mut result = RegionResult::empty(self.region);
        let mut summary = RegionSummary {
            tickers_total: self.tickers_total,
            batches_total: self.dispatched.len(),
            ..Default::default()
        };

        // Undispatched tickers (abandoned pool) are failures too
        let dispatched_tickers: usize = self.dispatched.values().sum();
        summary.failed += self.tickers_total.saturating_sub(dispatched_tickers);

        for (index, size) in &self.dispatched {
            let Some(outcome) = self.completed.remove(index) else {
                summary.batches_failed += 1;
                summary.failed += size;
                continue;
            };

            if outcome.state == BatchState::Failed {
                summary.batches_failed += 1;
                summary.failed += outcome.size;
                continue;
            }

            for ticker_outcome in outcome.outcomes {
                match ticker_outcome {
                    TickerOutcome::Signal(record) => {
                        summary.signals += 1;
                        match record.kind {
                            SignalKind::High => result.highs.push(record),
                            SignalKind::Low => result.lows.push(record),
                        }
                    }
                    TickerOutcome::Excluded { .. } => summary.excluded += 1,
                    TickerOutcome::Failed { .. } => summary.failed += 1,
                }
            }
        }

        result.summary = summary;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use screener_core::types::{ExclusionReason, SignalRecord};

    fn record(ticker: &str, kind: SignalKind) -> TickerOutcome {
        TickerOutcome::Signal(SignalRecord {
            ticker: ticker.to_string(),
            company_name: ticker.to_string(),
            price: 100.0,
            level: 100.0,
            distance_pct: 0.0,
            return_3m: None,
            return_6m: None,
            kind,
        })
    }

    fn done(index: usize, outcomes: Vec<TickerOutcome>) -> BatchOutcome {
        BatchOutcome {
            index,
            state: BatchState::Done,
            size: outcomes.len(),
            outcomes,
            error: None,
        }
    }

    #[test]
    fn test_merges_in_dispatch_order() {
        let mut aggregator = RegionAggregator::new("US", 5);
        aggregator.register(0, 2);
        aggregator.register(1, 2);
        aggregator.register(2, 1);

        aggregator.absorb(done(2, vec![record("E", SignalKind::High)]));
        assert_eq!(aggregator.state(), RegionState::Running);
        aggregator.absorb(done(
            1,
            vec![
                record("C", SignalKind::Low),
                TickerOutcome::Excluded {
                    ticker: "D".to_string(),
                    reason: ExclusionReason::NotNearExtreme,
                },
            ],
        ));
        aggregator.absorb(done(
            0,
            vec![
                record("A", SignalKind::High),
                TickerOutcome::Failed {
                    ticker: "B".to_string(),
                    reason: "timeout".to_string(),
                },
            ],
        ));
        assert_eq!(aggregator.state(), RegionState::Complete);

        let result = aggregator.finish();
        let highs: Vec<&str> = result.highs.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(highs, vec!["A", "E"]);
        assert_eq!(result.lows[0].ticker, "C");
        assert_eq!(
            result.summary,
            RegionSummary {
                tickers_total: 5,
                signals: 3,
                excluded: 1,
                failed: 1,
                batches_total: 3,
                batches_failed: 0,
            }
        );
        assert_eq!(result.summary.tickers_processed(), 4);
    }

    #[test]
    fn test_failed_and_missing_batches() {
        let mut aggregator = RegionAggregator::new("Europe", 7);
        aggregator.register(0, 3);
        aggregator.register(1, 3);

        aggregator.absorb(BatchOutcome::failed(0, 3, "transport error"));
        // Batch 1 never reports; one ticker was never dispatched

        let result = aggregator.finish();
        assert_eq!(result.signal_count(), 0);
        assert_eq!(result.summary.batches_failed, 2);
        assert_eq!(result.summary.failed, 7);
    }

    #[test]
    fn test_unknown_batch_ignored() {
        let mut aggregator = RegionAggregator::new("UK", 1);
        aggregator.register(0, 1);
        aggregator.absorb(done(5, vec![record("X", SignalKind::High)]));
        aggregator.absorb(done(0, vec![record("A", SignalKind::Low)]));

        let result = aggregator.finish();
        assert!(result.highs.is_empty());
        assert_eq!(result.lows.len(), 1);
    }
}

//! Per-region aggregated results.

use serde::{Deserialize, Serialize};

use super::{SignalKind, SignalRecord};

/// Counts reported alongside a region's signals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSummary {
    /// Tickers in the region's universe
    pub tickers_total: usize,
    /// Tickers that produced a signal
    pub signals: usize,
    /// Tickers excluded by the extractor
    pub excluded: usize,
    /// Tickers lost to fetch or data failures, including failed batches
    pub failed: usize,
    /// Batches dispatched
    pub batches_total: usize,
    /// Batches that failed as a whole
    pub batches_failed: usize,
}

impl RegionSummary {
    /// Tickers for which data was fetched and evaluated.
    pub fn tickers_processed(&self) -> usize {
        self.signals + self.excluded
    }
}

/// Screening result for one region.
///
/// Records are held in the order their tickers appear in the universe list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionResult {
    /// Region name
    pub region: String,
    /// Tickers near their 52-week high
    pub highs: Vec<SignalRecord>,
    /// Tickers near their 52-week low
    pub lows: Vec<SignalRecord>,
    /// Summary counts
    pub summary: RegionSummary,
}

impl RegionResult {
    /// Create an empty result for a region.
    pub fn empty(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Default::default()
        }
    }

    /// Records of one kind.
    pub fn records(&self, kind: SignalKind) -> &[SignalRecord] {
        match kind {
            SignalKind::High => &self.highs,
            SignalKind::Low => &self.lows,
        }
    }

    /// Total number of signals.
    pub fn signal_count(&self) -> usize {
        self.highs.len() + self.lows.len()
    }
}

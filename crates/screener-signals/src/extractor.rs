//! 52-week high/low proximity extraction.
//!
//! High proximity is evaluated before low proximity and wins when both
//! are within the threshold. Tickers with short history, a non-positive
//! high, or no nearby extreme are excluded rather than reported as errors.

use screener_core::types::{
    ExclusionReason, PriceSeries, ScreenConfig, SignalKind, SignalRecord, TickerOutcome,
};

use crate::returns::{round2, trailing_return, BARS_3M, BARS_6M};

/// Computes the screening signal for one ticker's series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalExtractor {
    threshold: f64,
    min_history_bars: usize,
}

impl SignalExtractor {
    /// Create a new extractor.
    ///
    /// # Arguments
    /// * `threshold` - Maximum fractional distance from an extreme (0.03 = 3%)
    /// * `min_history_bars` - Bars required before a ticker is evaluated
    pub fn new(threshold: f64, min_history_bars: usize) -> Self {
        Self {
            threshold,
            min_history_bars,
        }
    }

    /// Create an extractor from run parameters.
    pub fn from_config(config: &ScreenConfig) -> Self {
        Self::new(config.threshold, config.min_history_bars)
    }

    /// Screen one series.
    pub fn extract(&self, series: &PriceSeries) -> TickerOutcome {
        let ticker = series.ticker.clone();

        if series.is_empty() || series.len() < self.min_history_bars {
            return TickerOutcome::Excluded {
                ticker,
                reason: ExclusionReason::InsufficientHistory {
                    required: self.min_history_bars,
                    available: series.len(),
                },
            };
        }

        if let Some(bar) = series.bars().iter().find(|b| !b.is_finite()) {
            return TickerOutcome::Failed {
                ticker,
                reason: format!("non-finite price on {}", bar.date),
            };
        }

        // Non-empty and finite from here on.
        let (Some(high_52w), Some(low_52w), Some(current)) =
            (series.highest_high(), series.lowest_low(), series.last_close())
        else {
            return TickerOutcome::Failed {
                ticker,
                reason: "series has no bars".to_string(),
            };
        };

        if high_52w <= 0.0 {
            return TickerOutcome::Excluded {
                ticker,
                reason: ExclusionReason::DegenerateHigh,
            };
        }

        let distance_from_high = (high_52w - current) / high_52w;
        let distance_from_low = if low_52w > 0.0 {
            (current - low_52w) / low_52w
        } else {
            f64::INFINITY
        };

        let (kind, level) = if distance_from_high <= self.threshold {
            (SignalKind::High, high_52w)
        } else if distance_from_low <= self.threshold {
            (SignalKind::Low, low_52w)
        } else {
            return TickerOutcome::Excluded {
                ticker,
                reason: ExclusionReason::NotNearExtreme,
            };
        };

        let company_name = series.company_name.clone().unwrap_or_else(|| ticker.clone());

        TickerOutcome::Signal(SignalRecord {
            ticker,
            company_name,
            price: round2(current),
            level: round2(level),
            distance_pct: round2((current / level - 1.0) * 100.0),
            return_3m: trailing_return(series, BARS_3M).map(round2),
            return_6m: trailing_return(series, BARS_6M).map(round2),
            kind,
        })
    }
}

impl Default for SignalExtractor {
    fn default() -> Self {
        Self::from_config(&ScreenConfig::default())
    }
}

//! Daily OHLC bars and the per-ticker price series.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// One daily bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading date
    pub date: NaiveDate,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume (informational)
    #[serde(default)]
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// True when every price field is a finite number.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.open.is_finite() && self.high.is_finite() && self.low.is_finite() && self.close.is_finite()
    }
}

/// Date-ordered daily bars for one ticker over a trailing window.
///
/// Owned transiently by the fetch step and dropped once the signal has been
/// extracted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Ticker symbol
    pub ticker: String,
    /// Display name, when the provider knows it
    pub company_name: Option<String>,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Create a new empty series.
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            company_name: None,
            bars: Vec::new(),
        }
    }

    /// Create a series from bars in any order; bars are sorted by date.
    pub fn with_bars(ticker: impl Into<String>, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.date);
        Self {
            ticker: ticker.into(),
            company_name: None,
            bars,
        }
    }

    /// Attach a display name.
    pub fn with_company_name(mut self, name: impl Into<String>) -> Self {
        self.company_name = Some(name.into());
        self
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars as a slice.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Highest high across the series.
    pub fn highest_high(&self) -> Option<f64> {
        self.bars.iter().map(|b| b.high).reduce(f64::max)
    }

    /// Lowest low across the series.
    pub fn lowest_low(&self) -> Option<f64> {
        self.bars.iter().map(|b| b.low).reduce(f64::min)
    }

    /// Close of the most recent bar.
    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    /// Close `n` positions from the end, counting the last bar as 1.
    pub fn close_from_end(&self, n: usize) -> Option<f64> {
        if n == 0 || n > self.bars.len() {
            return None;
        }
        Some(self.bars[self.bars.len() - n].close)
    }

    /// Keep only bars within `days` calendar days of the newest bar.
    pub fn trailing(mut self, days: u32) -> Self {
        if let Some(newest) = self.bars.last().map(|b| b.date) {
            let cutoff = newest - Duration::days(i64::from(days));
            self.bars.retain(|b| b.date > cutoff);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(n)
    }

    #[test]
    fn test_series_extremes() {
        let series = PriceSeries::with_bars(
            "AAPL",
            vec![
                Bar::new(day(1), 100.0, 105.0, 98.0, 104.0, 1000.0),
                Bar::new(day(0), 99.0, 101.0, 95.0, 100.0, 1000.0),
                Bar::new(day(2), 104.0, 110.0, 103.0, 109.0, 1000.0),
            ],
        );

        assert_eq!(series.highest_high(), Some(110.0));
        assert_eq!(series.lowest_low(), Some(95.0));
        assert_eq!(series.last_close(), Some(109.0));
        assert_eq!(series.bars()[0].close, 100.0);
    }

    #[test]
    fn test_close_from_end() {
        let bars = (0..5)
            .map(|i| Bar::new(day(i), 1.0, 1.0, 1.0, i as f64, 0.0))
            .collect();
        let series = PriceSeries::with_bars("T", bars);

        assert_eq!(series.close_from_end(1), Some(4.0));
        assert_eq!(series.close_from_end(5), Some(0.0));
        assert_eq!(series.close_from_end(6), None);
        assert_eq!(series.close_from_end(0), None);
    }

    #[test]
    fn test_trailing_window() {
        let bars = (0..400)
            .map(|i| Bar::new(day(i), 1.0, 1.0, 1.0, 1.0, 0.0))
            .collect();
        let series = PriceSeries::with_bars("T", bars).trailing(365);

        assert_eq!(series.len(), 365);
        assert_eq!(series.bars()[0].date, day(35));
    }

    #[test]
    fn test_empty_series() {
        let series = PriceSeries::new("EMPTY");
        assert!(series.is_empty());
        assert_eq!(series.highest_high(), None);
        assert_eq!(series.last_close(), None);
        assert!(series.trailing(365).is_empty());
    }
}

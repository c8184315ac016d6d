//! CSV directory price provider.
//!
//! Reads one file per ticker from a directory, the layout produced by most
//! data export tools: `<dir>/<TICKER>.csv` with a header row.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;
use screener_core::error::DataError;
use screener_core::traits::{BatchSeries, PriceSeriesProvider};
use screener_core::types::{Bar, PriceSeries};
use tracing::{debug, warn};

/// CSV record format.
///
/// Price cells may be empty; such rows are dropped like missing rows.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: Option<f64>,
    #[serde(alias = "High", alias = "high")]
    high: Option<f64>,
    #[serde(alias = "Low", alias = "low")]
    low: Option<f64>,
    #[serde(alias = "Close", alias = "close")]
    close: Option<f64>,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: Option<f64>,
}

impl CsvRecord {
    fn into_bar(self) -> Result<Option<Bar>, DataError> {
        let date = parse_date(&self.date)?;
        let bar = match (self.open, self.high, self.low, self.close) {
            (Some(open), Some(high), Some(low), Some(close)) => {
                Bar::new(date, open, high, low, close, self.volume.unwrap_or(0.0))
            }
            _ => return Ok(None),
        };
        Ok(bar.is_finite().then_some(bar))
    }
}

/// Parse bars from CSV text, dropping incomplete rows and sorting by date.
pub(crate) fn parse_bars<R: Read>(reader: R) -> Result<Vec<Bar>, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut bars = Vec::new();

    for result in reader.deserialize() {
        let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
        if let Some(bar) = record.into_bar()? {
            bars.push(bar);
        }
    }

    bars.sort_by_key(|b| b.date);

    Ok(bars)
}

/// Parse various date formats.
fn parse_date(date_str: &str) -> Result<NaiveDate, DataError> {
    let date_str = date_str.trim();
    let formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

    for format in formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d);
        }
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }

    // Unix timestamps, milliseconds if > 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        let secs = if ts > 10_000_000_000 { ts / 1000 } else { ts };
        if let Some(dt) = DateTime::from_timestamp(secs, 0) {
            return Ok(dt.date_naive());
        }
    }

    Err(DataError::ParseError(format!("Could not parse date: {}", date_str)))
}

/// Price provider backed by a directory of per-ticker CSV files.
///
/// Supports batch fetch: a batch is one pass over the directory, and tickers
/// without a readable file are left out of the returned map.
pub struct CsvDirectoryProvider {
    dir: PathBuf,
}

impl CsvDirectoryProvider {
    /// Create a new provider over `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, DataError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(DataError::NoDataAvailable(format!(
                "data directory {} does not exist",
                dir.display()
            )));
        }
        Ok(Self { dir })
    }

    /// Find the file for a ticker: `{ticker}.csv`, lowercase, or `_daily` variants.
    fn resolve(&self, ticker: &str) -> Option<PathBuf> {
        let lower = ticker.to_lowercase();
        let candidates = [
            self.dir.join(format!("{}.csv", ticker)),
            self.dir.join(format!("{}.csv", lower)),
            self.dir.join(format!("{}_daily.csv", ticker)),
            self.dir.join(format!("{}_daily.csv", lower)),
        ];
        candidates.into_iter().find(|p| p.is_file())
    }

    async fn load(&self, ticker: &str, lookback_days: u32) -> Result<PriceSeries, DataError> {
        let path = self
            .resolve(ticker)
            .ok_or_else(|| DataError::SymbolNotFound(ticker.to_string()))?;

        let text = tokio::fs::read(&path)
            .await
            .map_err(|e| DataError::NoDataAvailable(format!("{}: {}", path.display(), e)))?;
        let bars = parse_bars(text.as_slice())?;

        debug!(ticker, bars = bars.len(), path = %path.display(), "Loaded CSV series");

        Ok(PriceSeries::with_bars(ticker, bars).trailing(lookback_days))
    }
}

#[async_trait]
impl PriceSeriesProvider for CsvDirectoryProvider {
    async fn fetch_series(&self, ticker: &str, lookback_days: u32) -> Result<PriceSeries, DataError> {
        self.load(ticker, lookback_days).await
    }

    fn supports_batch(&self) -> bool {
        true
    }

    async fn fetch_batch(
        &self,
        tickers: &[String],
        lookback_days: u32,
    ) -> Result<BatchSeries, DataError> {
        if !self.dir.is_dir() {
            return Err(DataError::NoDataAvailable(format!(
                "data directory {} is gone",
                self.dir.display()
            )));
        }

        let mut batch = BatchSeries::with_capacity(tickers.len());
        for ticker in tickers {
            match self.load(ticker, lookback_days).await {
                Ok(series) => {
                    batch.insert(ticker.clone(), series);
                }
                Err(DataError::SymbolNotFound(_)) => {
                    debug!(ticker = %ticker, "No CSV file for ticker");
                }
                Err(e) => {
                    warn!(ticker = %ticker, error = %e, "Skipping unreadable CSV");
                }
            }
        }

        Ok(batch)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

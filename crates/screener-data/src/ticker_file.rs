//! Ticker universe sources.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use screener_core::error::DataError;
use screener_core::traits::TickerSource;
use tracing::debug;

/// Parse a ticker list: one symbol per line, blanks and `#` comments skipped.
///
/// Order and duplicates are preserved.
pub fn parse_ticker_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Ticker lists read from one text file per region.
#[derive(Debug, Clone, Default)]
pub struct FileTickerSource {
    files: HashMap<String, PathBuf>,
}

impl FileTickerSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a region to its ticker file.
    pub fn with_region(mut self, region: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.files.insert(region.into(), path.into());
        self
    }
}

#[async_trait]
impl TickerSource for FileTickerSource {
    async fn load(&self, region: &str) -> Result<Vec<String>, DataError> {
        let path = self
            .files
            .get(region)
            .ok_or_else(|| DataError::SourceUnavailable(format!("no ticker file for {}", region)))?;

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DataError::SourceUnavailable(format!("{}: {}", path.display(), e)))?;

        let tickers = parse_ticker_lines(&text);
        debug!(region, count = tickers.len(), path = %path.display(), "Loaded ticker list");
        Ok(tickers)
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// In-memory ticker lists.
#[derive(Debug, Clone, Default)]
pub struct StaticTickerSource {
    lists: HashMap<String, Vec<String>>,
}

impl StaticTickerSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a region's tickers.
    pub fn with_region<I, S>(mut self, region: impl Into<String>, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lists
            .insert(region.into(), tickers.into_iter().map(Into::into).collect());
        self
    }
}

#[async_trait]
impl TickerSource for StaticTickerSource {
    async fn load(&self, region: &str) -> Result<Vec<String>, DataError> {
        self.lists
            .get(region)
            .cloned()
            .ok_or_else(|| DataError::SourceUnavailable(format!("no ticker list for {}", region)))
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_ticker_lines() {
        let text = "# Russell 1000\nAAPL\n\n  MSFT  \n#BRK.B\nAAPL\r\nRY.TO\n";
        assert_eq!(
            parse_ticker_lines(text),
            vec!["AAPL", "MSFT", "AAPL", "RY.TO"]
        );
        assert!(parse_ticker_lines("").is_empty());
    }

    #[tokio::test]
    async fn test_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("us.txt");
        fs::write(&path, "AAPL\n# comment\nMSFT\n").unwrap();

        let source = FileTickerSource::new()
            .with_region("US", &path)
            .with_region("UK", dir.path().join("missing.txt"));

        assert_eq!(source.load("US").await.unwrap(), vec!["AAPL", "MSFT"]);
        assert!(matches!(
            source.load("UK").await,
            Err(DataError::SourceUnavailable(_))
        ));
        assert!(matches!(
            source.load("Europe").await,
            Err(DataError::SourceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticTickerSource::new().with_region("US", ["AAPL", "MSFT"]);

        assert_eq!(source.load("US").await.unwrap(), vec!["AAPL", "MSFT"]);
        assert!(source.load("Canada").await.is_err());
    }
}

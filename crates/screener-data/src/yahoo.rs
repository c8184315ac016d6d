//! Yahoo Finance chart API provider.
//!
//! One request per ticker against the v8 chart endpoint. The endpoint has no
//! multi-symbol variant, so the scheduler falls back to per-ticker fetches
//! spaced by the configured ticker delay.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::{header, Client, StatusCode, Url};
use serde::Deserialize;
use screener_core::error::DataError;
use screener_core::traits::PriceSeriesProvider;
use screener_core::types::{Bar, PriceSeries};
use tracing::debug;

/// Yahoo chart provider configuration.
#[derive(Debug, Clone)]
pub struct YahooChartConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for YahooChartConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            user_agent: "Mozilla/5.0 (compatible; screener/0.1)".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Chart API response types
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
    long_name: Option<String>,
    short_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Yahoo Finance chart client.
pub struct YahooChartProvider {
    config: YahooChartConfig,
    client: Client,
}

impl YahooChartProvider {
    /// Create a new chart client.
    pub fn new(config: YahooChartConfig) -> Result<Self, DataError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl PriceSeriesProvider for YahooChartProvider {
    async fn fetch_series(&self, ticker: &str, lookback_days: u32) -> Result<PriceSeries, DataError> {
        let url = chart_url(&self.config.base_url, ticker)?;
        let end = Utc::now();
        let start = end - Duration::days(i64::from(lookback_days));

        let params = [
            ("period1", start.timestamp().to_string()),
            ("period2", end.timestamp().to_string()),
            ("interval", "1d".to_string()),
            ("includePrePost", "false".to_string()),
        ];

        let resp = self
            .client
            .get(url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DataError::Timeout(self.config.timeout_secs)
                } else {
                    DataError::ConnectionError(e.to_string())
                }
            })?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound(ticker.to_string()));
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(DataError::ApiError(format!("{}: {}", status, text)));
        }

        let body: ChartResponse = resp
            .json()
            .await
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let series = parse_chart(ticker, body)?.trailing(lookback_days);
        debug!(ticker, bars = series.len(), "Fetched chart series");
        Ok(series)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

/// Chart endpoint for a ticker; the symbol is escaped as one path segment.
fn chart_url(base_url: &str, ticker: &str) -> Result<Url, DataError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| DataError::ApiError(format!("invalid base url {}: {}", base_url, e)))?;
    url.path_segments_mut()
        .map_err(|_| DataError::ApiError(format!("base url {} cannot carry a path", base_url)))?
        .pop_if_empty()
        .extend(["v8", "finance", "chart", ticker]);
    Ok(url)
}

/// Convert a chart response into a series, dropping rows with null prices.
fn parse_chart(ticker: &str, body: ChartResponse) -> Result<PriceSeries, DataError> {
    if let Some(err) = body.chart.error {
        return Err(DataError::ApiError(format!(
            "{}: {}",
            err.code,
            err.description.unwrap_or_default()
        )));
    }

    let result = body
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.swap_remove(0)) })
        .ok_or_else(|| DataError::NoDataAvailable(ticker.to_string()))?;

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let offset = result.meta.gmtoffset;

    let bars = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let open = quote.open.get(i).copied().flatten()?;
            let high = quote.high.get(i).copied().flatten()?;
            let low = quote.low.get(i).copied().flatten()?;
            let close = quote.close.get(i).copied().flatten()?;
            let volume = quote.volume.get(i).copied().flatten().unwrap_or(0.0);
            // Exchange-local trading date
            let date = DateTime::from_timestamp(ts + offset, 0)?.date_naive();
            Some(Bar::new(date, open, high, low, close, volume))
        })
        .collect();

    let mut series = PriceSeries::with_bars(ticker, bars);
    if let Some(name) = result.meta.long_name.or(result.meta.short_name) {
        series = series.with_company_name(name);
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn parse(json: &str) -> Result<PriceSeries, DataError> {
        let body: ChartResponse = serde_json::from_str(json).unwrap();
        parse_chart("AAPL", body)
    }

    #[test]
    fn test_parse_chart() {
        let json = r#"{
            "chart": {
                "result": [{
                    "meta": {"symbol": "AAPL", "gmtoffset": -18000, "longName": "Apple Inc."},
                    "timestamp": [1704983400, 1705069800, 1705415400],
                    "indicators": {"quote": [{
                        "open":   [186.0, 186.1, null],
                        "high":   [187.0, 186.7, 184.3],
                        "low":    [183.6, 185.2, 182.4],
                        "close":  [185.6, 185.9, 183.6],
                        "volume": [40000000, 40400000, 65000000]
                    }]}
                }],
                "error": null
            }
        }"#;

        let series = parse(json).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.company_name.as_deref(), Some("Apple Inc."));
        assert_eq!(series.bars()[0].date, NaiveDate::from_ymd_opt(2024, 1, 11).unwrap());
        assert_eq!(series.last_close(), Some(185.9));
    }

    #[test]
    fn test_chart_url_escapes_ticker() {
        let url = chart_url("https://query1.finance.yahoo.com", "BRK/B").unwrap();
        assert_eq!(url.as_str(), "https://query1.finance.yahoo.com/v8/finance/chart/BRK%2FB");

        let url = chart_url("http://localhost:8080/proxy/", "SHOP.TO").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/proxy/v8/finance/chart/SHOP.TO");

        let url = chart_url("https://query1.finance.yahoo.com", "^GSPC").unwrap();
        assert_eq!(url.path_segments().unwrap().count(), 4);
        assert!(url.path().starts_with("/v8/finance/chart/"));

        assert!(matches!(chart_url("not a url", "AAPL"), Err(DataError::ApiError(_))));
    }

    #[test]
    fn test_parse_chart_error() {
        let json = r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#;

        assert!(matches!(parse(json), Err(DataError::ApiError(_))));
    }

    #[test]
    fn test_parse_chart_empty_result() {
        let json = r#"{"chart": {"result": [], "error": null}}"#;
        assert_eq!(
            parse(json),
            Err(DataError::NoDataAvailable("AAPL".to_string()))
        );
    }

    #[test]
    fn test_short_name_fallback() {
        let json = r#"{
            "chart": {
                "result": [{
                    "meta": {"shortName": "SHOPIFY INC"},
                    "indicators": {"quote": [{}]}
                }],
                "error": null
            }
        }"#;

        let series = parse(json).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.company_name.as_deref(), Some("SHOPIFY INC"));
    }
}

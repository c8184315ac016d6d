//! Configuration structures.

use serde::{Deserialize, Serialize};
use screener_core::error::ConfigError;
use screener_core::types::ScreenConfig;
use std::time::Duration;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub screen: ScreenSettings,
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default = "default_regions")]
    pub regions: Vec<RegionSettings>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSettings::default(),
            logging: LoggingConfig::default(),
            screen: ScreenSettings::default(),
            provider: ProviderSettings::default(),
            regions: default_regions(),
        }
    }
}

impl AppConfig {
    /// Look up a region by name, case-insensitively.
    pub fn region(&self, name: &str) -> Option<&RegionSettings> {
        self.regions.iter().find(|r| r.name.eq_ignore_ascii_case(name))
    }

    /// Configured region names, in screening order.
    pub fn region_names(&self) -> Vec<String> {
        self.regions.iter().map(|r| r.name.clone()).collect()
    }

    /// Check the whole configuration before a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.regions.is_empty() {
            return Err(ConfigError::Missing("regions".to_string()));
        }
        for region in &self.regions {
            if region.name.trim().is_empty() {
                return Err(ConfigError::invalid("regions.name", "must not be empty"));
            }
            if region.tickers_file.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "regions.tickers_file",
                    format!("missing for region {}", region.name),
                ));
            }
        }
        if self.provider.kind == ProviderKind::Csv && self.provider.data_dir.trim().is_empty() {
            return Err(ConfigError::Missing("provider.data_dir".to_string()));
        }
        self.screen.to_screen_config().map(|_| ())
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "screener".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    /// Daily-rolling log file, in addition to stderr
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Screening parameters as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenSettings {
    /// Fractional proximity threshold (0.03 = 3%)
    pub threshold: f64,
    pub batch_size: usize,
    pub max_concurrency: usize,
    pub lookback_days: u32,
    pub min_history_bars: usize,
    pub batch_delay_ms: u64,
    pub ticker_delay_ms: u64,
    pub region_delay_ms: u64,
    pub fetch_timeout_secs: u64,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        let defaults = ScreenConfig::default();
        Self {
            threshold: defaults.threshold,
            batch_size: defaults.batch_size,
            max_concurrency: defaults.max_concurrency,
            lookback_days: defaults.lookback_days,
            min_history_bars: defaults.min_history_bars,
            batch_delay_ms: defaults.batch_delay.as_millis() as u64,
            ticker_delay_ms: defaults.ticker_delay.as_millis() as u64,
            region_delay_ms: defaults.region_delay.as_millis() as u64,
            fetch_timeout_secs: defaults.fetch_timeout.as_secs(),
        }
    }
}

impl ScreenSettings {
    /// Convert to validated run parameters.
    pub fn to_screen_config(&self) -> Result<ScreenConfig, ConfigError> {
        let config = ScreenConfig {
            threshold: self.threshold,
            lookback_days: self.lookback_days,
            min_history_bars: self.min_history_bars,
            batch_size: self.batch_size,
            max_concurrency: self.max_concurrency,
            batch_delay: Duration::from_millis(self.batch_delay_ms),
            ticker_delay: Duration::from_millis(self.ticker_delay_ms),
            region_delay: Duration::from_millis(self.region_delay_ms),
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Which price provider to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Per-ticker CSV files in `data_dir`
    Csv,
    /// Yahoo Finance chart API
    Yahoo,
}

/// Price provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub data_dir: String,
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Csv,
            data_dir: "data/prices".to_string(),
            base_url: "https://query1.finance.yahoo.com".to_string(),
            user_agent: "Mozilla/5.0 (compatible; screener/0.1)".to_string(),
            timeout_secs: 30,
        }
    }
}

/// A named ticker universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSettings {
    pub name: String,
    /// One ticker per line
    pub tickers_file: String,
}

impl RegionSettings {
    pub fn new(name: impl Into<String>, tickers_file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tickers_file: tickers_file.into(),
        }
    }
}

fn default_regions() -> Vec<RegionSettings> {
    vec![
        RegionSettings::new("US", "tickers/russell1000_tickers_corrected.txt"),
        RegionSettings::new("Canada", "tickers/tsx_composite_tickers.txt"),
        RegionSettings::new("UK", "tickers/ftse_allshare_tickers.txt"),
        RegionSettings::new("Europe", "tickers/stoxx600_tickers.txt"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.region_names(), vec!["US", "Canada", "UK", "Europe"]);

        let screen = config.screen.to_screen_config().unwrap();
        assert_eq!(screen, ScreenConfig::default());
    }

    #[test]
    fn test_region_lookup() {
        let config = AppConfig::default();
        assert_eq!(
            config.region("canada").map(|r| r.tickers_file.as_str()),
            Some("tickers/tsx_composite_tickers.txt")
        );
        assert!(config.region("Japan").is_none());
    }

    #[test]
    fn test_invalid_screen_settings() {
        let settings = ScreenSettings {
            batch_size: 0,
            ..Default::default()
        };
        assert_eq!(
            settings.to_screen_config(),
            Err(ConfigError::invalid("batch_size", "must be greater than 0"))
        );
    }

    #[test]
    fn test_no_regions() {
        let config = AppConfig {
            regions: Vec::new(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Missing("regions".to_string()))
        );
    }

    #[test]
    fn test_parse_toml() {
        let text = r#"
            [screen]
            threshold = 0.05
            batch_size = 50

            [provider]
            kind = "yahoo"

            [[regions]]
            name = "US"
            tickers_file = "us.txt"
        "#;
        let config: AppConfig = toml::from_str(text).unwrap();

        assert_eq!(config.screen.threshold, 0.05);
        assert_eq!(config.screen.batch_size, 50);
        assert_eq!(config.screen.max_concurrency, 4);
        assert_eq!(config.provider.kind, ProviderKind::Yahoo);
        assert_eq!(config.regions, vec![RegionSettings::new("US", "us.txt")]);
        assert_eq!(config.logging.level, "info");
    }
}

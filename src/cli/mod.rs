//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use screener_config::{AppConfig, ProviderKind};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "screener")]
#[command(author, version, about = "Find stocks trading near their 52-week high or low")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level, overrides `[logging] level`
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format, overrides `[logging] format`
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Effective log filter: the flag if given, else the configured level.
    pub fn log_filter<'a>(&self, config: &'a AppConfig) -> &'a str {
        match &self.log_level {
            Some(level) => level.as_str(),
            None => &config.logging.level,
        }
    }

    /// Whether to log as JSON.
    pub fn json_logs(&self, config: &AppConfig) -> bool {
        self.json_logs || config.logging.format.eq_ignore_ascii_case("json")
    }
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Screen regions for tickers near a 52-week extreme
    Screen(ScreenArgs),
    /// List configured regions and their ticker counts
    Regions,
    /// Validate configuration
    ValidateConfig,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ProviderArg {
    Csv,
    Yahoo,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Csv => ProviderKind::Csv,
            ProviderArg::Yahoo => ProviderKind::Yahoo,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(clap::Args)]
pub struct ScreenArgs {
    /// Regions to screen (comma-separated), defaults to every configured region
    #[arg(short, long, value_delimiter = ',')]
    pub region: Vec<String>,

    /// Proximity threshold as a fraction (0.03 = 3%)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Tickers per batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Batches in flight at once
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Price provider
    #[arg(short, long)]
    pub provider: Option<ProviderArg>,

    /// Directory of per-ticker CSV files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub output: OutputFormat,

    /// Save the report as JSON
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Export signals as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_logging(level: &str, format: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.logging.level = level.to_string();
        config.logging.format = format.to_string();
        config
    }

    #[test]
    fn test_log_settings_fall_back_to_config() {
        let cli = Cli::parse_from(["screener", "validate-config"]);
        let config = config_with_logging("debug,screener_engine=trace", "json");

        assert_eq!(cli.log_filter(&config), "debug,screener_engine=trace");
        assert!(cli.json_logs(&config));
    }

    #[test]
    fn test_log_flags_override_config() {
        let cli = Cli::parse_from(["screener", "--log-level", "warn", "--json-logs", "validate-config"]);
        let config = config_with_logging("debug", "pretty");

        assert_eq!(cli.log_filter(&config), "warn");
        assert!(cli.json_logs(&config));

        let cli = Cli::parse_from(["screener", "validate-config"]);
        assert!(!cli.json_logs(&config));
    }
}

//! Screen command implementation.

use anyhow::{Context, Result};
use screener_config::{AppConfig, ProviderKind};
use screener_core::traits::PriceSeriesProvider;
use screener_data::{CsvDirectoryProvider, FileTickerSource, YahooChartConfig, YahooChartProvider};
use screener_engine::{ScreenReport, Screener};
use std::sync::Arc;
use tracing::{info, warn};

use crate::cli::{OutputFormat, ScreenArgs};

pub async fn run(args: ScreenArgs, mut config: AppConfig) -> Result<()> {
    apply_overrides(&args, &mut config);
    config.validate().context("Invalid configuration")?;

    let regions = select_regions(&config, &args.region)?;
    let screen_config = config.screen.to_screen_config()?;

    let source = config
        .regions
        .iter()
        .fold(FileTickerSource::new(), |source, region| {
            source.with_region(region.name.clone(), &region.tickers_file)
        });
    let provider = build_provider(&config)?;

    info!(
        provider = provider.name(),
        regions = ?regions,
        threshold = screen_config.threshold,
        "Starting screen"
    );

    let screener = Screener::new(screen_config, Arc::new(source), provider)?;

    // Dropping the run future aborts in-flight batches
    let report = tokio::select! {
        result = screener.run(&regions) => result?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, abandoning screen");
            anyhow::bail!("Screen interrupted");
        }
    };

    // Output results
    match args.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => println!("{}", report.summary()),
    }

    save_outputs(&args, &report)
}

fn apply_overrides(args: &ScreenArgs, config: &mut AppConfig) {
    if let Some(threshold) = args.threshold {
        config.screen.threshold = threshold;
    }
    if let Some(batch_size) = args.batch_size {
        config.screen.batch_size = batch_size;
    }
    if let Some(max_concurrency) = args.max_concurrency {
        config.screen.max_concurrency = max_concurrency;
    }
    if let Some(provider) = args.provider {
        config.provider.kind = provider.into();
    }
    if let Some(data_dir) = &args.data_dir {
        config.provider.data_dir = data_dir.display().to_string();
    }
}

/// Resolve requested region names against the configured regions.
fn select_regions(config: &AppConfig, requested: &[String]) -> Result<Vec<String>> {
    if requested.is_empty() {
        return Ok(config.region_names());
    }

    requested
        .iter()
        .map(|name| {
            config
                .region(name)
                .map(|r| r.name.clone())
                .with_context(|| {
                    format!(
                        "Unknown region '{}'. Configured regions: {}",
                        name,
                        config.region_names().join(", ")
                    )
                })
        })
        .collect()
}

fn build_provider(config: &AppConfig) -> Result<Arc<dyn PriceSeriesProvider>> {
    let settings = &config.provider;
    let provider: Arc<dyn PriceSeriesProvider> = match settings.kind {
        ProviderKind::Csv => Arc::new(
            CsvDirectoryProvider::new(&settings.data_dir)
                .with_context(|| format!("Cannot use data directory '{}'", settings.data_dir))?,
        ),
        ProviderKind::Yahoo => Arc::new(YahooChartProvider::new(YahooChartConfig {
            base_url: settings.base_url.clone(),
            user_agent: settings.user_agent.clone(),
            timeout_secs: settings.timeout_secs,
        })?),
    };
    Ok(provider)
}

fn save_outputs(args: &ScreenArgs, report: &ScreenReport) -> Result<()> {
    if let Some(save_path) = &args.save {
        let json = report.to_json()?;
        std::fs::write(save_path, json)?;
        info!("Results saved to {:?}", save_path);
    }

    if let Some(csv_path) = &args.csv {
        let csv = report.signals_to_csv()?;
        std::fs::write(csv_path, csv)?;
        info!("Signals exported to {:?}", csv_path);
    }

    Ok(())
}

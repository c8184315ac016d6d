//! Validate configuration command.

use anyhow::Result;
use screener_config::AppConfig;
use std::path::Path;

pub async fn run(config_path: &Path, config: &AppConfig) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match config.validate() {
        Ok(()) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Threshold: {:.2}%", config.screen.threshold * 100.0);
            println!("Batch size: {}", config.screen.batch_size);
            println!("Max concurrency: {}", config.screen.max_concurrency);
            println!("Provider: {:?}", config.provider.kind);
            println!("Regions: {}", config.region_names().join(", "));
            println!();
            println!("Effective configuration:");
            println!("{}", toml::to_string_pretty(config)?);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}

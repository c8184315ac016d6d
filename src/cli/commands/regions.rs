//! List regions command.

use anyhow::Result;
use screener_config::AppConfig;
use screener_core::traits::TickerSource;
use screener_data::FileTickerSource;

pub async fn run(config: &AppConfig) -> Result<()> {
    println!("Configured Regions");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for region in &config.regions {
        let source = FileTickerSource::new().with_region(region.name.clone(), &region.tickers_file);
        let status = match source.load(&region.name).await {
            Ok(tickers) => format!("{} tickers", tickers.len()),
            Err(e) => format!("unavailable ({})", e),
        };

        println!("  {}", region.name);
        println!("  ───────────────────────────────────────────────────────");
        println!("  File:    {}", region.tickers_file);
        println!("  Status:  {}", status);
        println!();
    }

    println!("Use --region <name> with the screen command to select regions.");

    Ok(())
}

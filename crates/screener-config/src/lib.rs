//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, LoggingConfig, ProviderKind, ProviderSettings, RegionSettings,
    ScreenSettings,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from file and environment.
///
/// Environment variables use the `SCREENER__` prefix with `__` between
/// levels, e.g. `SCREENER__SCREEN__BATCH_SIZE=100`.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("SCREENER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
#[cfg(feature = "clap")]
pub use settings::AnalysisOverrides;
pub use logging::init_tracing;
pub use settings::{AnalysisSettings, Config, LoggingConfig, ProviderConfig, DEFAULT_SYMBOLS};

/// The file read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Loads the application configuration.
///
/// Sources, lowest priority first:
/// 1. built-in defaults,
/// 2. the TOML file at `path` (or `config.toml`), which may be absent,
/// 3. environment variables such as `COINSCOPE__ANALYSIS__LONG_WINDOW=100`.
///
/// `COINSCOPE__ANALYSIS__SYMBOLS` accepts a comma-separated list.
/// The result is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        // An explicitly requested file has to exist.
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix("COINSCOPE")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("analysis.symbols")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}

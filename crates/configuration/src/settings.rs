use crate::error::ConfigError;
use chrono::NaiveDate;
use core_types::PairMode;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section has defaults, so a missing `config.toml` still yields a
/// usable configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Parameters of a single analysis run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// The symbols to compare (e.g., "BTC-USD").
    pub symbols: Vec<String>,
    /// First calendar date of the analysis window, inclusive.
    pub start_date: NaiveDate,
    /// End of the analysis window, exclusive: bars dated on it are not included.
    pub end_date: NaiveDate,
    /// Window of the short moving average, in rows of the aligned table.
    pub short_window: usize,
    /// Window of the long moving average, in rows of the aligned table.
    pub long_window: usize,
    /// Whether the ranked pair list keeps both (A, B) and (B, A).
    pub pair_mode: PairMode,
}

/// Settings for the HTTP price-history provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

/// Settings for the tracing subscriber.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG` when set.
    pub level: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

pub const DEFAULT_SYMBOLS: [&str; 12] = [
    "BTC-USD", "ETH-USD", "XRP-USD", "LTC-USD", "ADA-USD", "BNB-USD", "DOT-USD", "LINK-USD",
    "XLM-USD", "SOL-USD", "DOGE-USD", "ETC-USD",
];

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            start_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            short_window: 50,
            long_window: 200,
            pair_mode: PairMode::Ordered,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) coinscope/0.1".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "coinscope.log".to_string(),
        }
    }
}

impl Config {
    /// Rejects settings that would make every run fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let analysis = &self.analysis;
        if analysis.short_window == 0 || analysis.long_window == 0 {
            return Err(ConfigError::ValidationError(
                "moving average windows must be at least 1".to_string(),
            ));
        }
        if self.provider.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "provider.base_url must not be empty".to_string(),
            ));
        }
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "provider.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Settings that are usable but probably not what was meant.
    ///
    /// Kept separate from `validate` so the caller can report them once
    /// logging is up.
    pub fn warnings(&self) -> Vec<String> {
        let analysis = &self.analysis;
        let mut warnings = Vec::new();
        if analysis.short_window >= analysis.long_window {
            warnings.push(format!(
                "short moving average window ({}) is not shorter than the long one ({})",
                analysis.short_window, analysis.long_window
            ));
        }
        warnings
    }
}

/// Command-line overrides for the `[analysis]` section.
///
/// Any flag left unset keeps the value loaded from the file or environment.
#[cfg(feature = "clap")]
#[derive(Debug, Clone, Default, clap::Args)]
pub struct AnalysisOverrides {
    /// Comma-separated symbols to compare (e.g., "BTC-USD,ETH-USD").
    #[arg(long, value_delimiter = ',')]
    pub symbols: Option<Vec<String>>,

    /// The start date of the analysis window (format: YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// The end date of the analysis window, exclusive (format: YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Window of the short moving average.
    #[arg(long)]
    pub short_window: Option<usize>,

    /// Window of the long moving average.
    #[arg(long)]
    pub long_window: Option<usize>,

    /// Keep a single entry per symbol pair in the ranking.
    #[arg(long)]
    pub unordered_pairs: bool,
}

#[cfg(feature = "clap")]
impl AnalysisSettings {
    pub fn apply_overrides(&mut self, overrides: AnalysisOverrides) {
        if let Some(symbols) = overrides.symbols {
            self.symbols = symbols;
        }
        if let Some(from) = overrides.from {
            self.start_date = from;
        }
        if let Some(to) = overrides.to {
            self.end_date = to;
        }
        if let Some(short) = overrides.short_window {
            self.short_window = short;
        }
        if let Some(long) = overrides.long_window {
            self.long_window = long;
        }
        if overrides.unordered_pairs {
            self.pair_mode = PairMode::Unordered;
        }
    }
}

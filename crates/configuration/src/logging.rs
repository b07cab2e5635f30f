use crate::error::ConfigError;
use crate::settings::LoggingConfig;
use indicatif::ProgressStyle;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global tracing subscriber.
///
/// - `RUST_LOG` wins over `config.level` when it is set.
/// - Instrumented spans (one per symbol fetch) are drawn as spinners on stderr,
///   and log lines are routed through the same writer so they don't tear the bars.
/// - When `config.directory` is set, a plain-text copy of every event goes to a
///   daily-rolling file. The returned guard must be held until shutdown to flush it.
pub fn init_tracing(config: &LoggingConfig) -> Result<Option<WorkerGuard>, ConfigError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ConfigError::Logging(e.to_string()))?;

    let spinner_style =
        ProgressStyle::with_template("{spinner:.green} {span_name}{{{span_fields}}} [{elapsed}]")
            .map_err(|e| ConfigError::Logging(e.to_string()))?;
    let indicatif_layer = IndicatifLayer::new().with_progress_style(spinner_style);

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(indicatif_layer.get_stderr_writer());

    let (file_layer, guard) = match &config.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, &config.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .with(indicatif_layer)
        .try_init()
        .map_err(|e| ConfigError::Logging(e.to_string()))?;

    tracing::debug!(level = %config.level, file = config.directory.is_some(), "Logging initialized.");
    Ok(guard)
}

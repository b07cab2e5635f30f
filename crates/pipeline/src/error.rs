use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// A single symbol's fetch failed; the whole run is abandoned.
    #[error("Failed to fetch price history for {symbol}: {source}")]
    Provider {
        symbol: String,
        #[source]
        source: api_client::error::ApiError,
    },

    #[error("Invalid data received: {0}")]
    Core(#[from] core_types::CoreError),

    #[error("Analytics calculation error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),
}

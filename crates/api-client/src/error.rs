use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to send the HTTP request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Unknown symbol '{symbol}': {reason}")]
    UnknownSymbol { symbol: String, reason: String },

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Invalid data format from API: {0}")]
    InvalidData(String),
}

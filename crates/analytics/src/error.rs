use thiserror::Error;

/// Errors raised by the analytics layer.
///
/// Sparse or degenerate data is never an error here; it surfaces as undefined
/// (`None`) values in the outputs. Only invalid parameters fail a calculation.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Moving average window must be at least 1, got {0}")]
    InvalidWindow(usize),

    #[error("An error occurred during indicator calculation: {0}")]
    Indicator(String),
}

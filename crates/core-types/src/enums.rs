use serde::{Deserialize, Serialize};

/// The sampling interval requested from a price-history provider.
///
/// Only daily bars are analysed; the enum exists so the provider contract
/// carries the interval explicitly instead of assuming it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    #[default]
    Daily,
}

impl Interval {
    /// The interval code used in provider query strings.
    pub fn as_code(&self) -> &'static str {
        match self {
            Interval::Daily => "1d",
        }
    }
}

/// Selects which field of a bar is laid out on the aligned calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarField {
    Close,
    Volume,
}

/// Controls how the ranked pair list treats symmetric pairs.
///
/// `Ordered` keeps both (A, B) and (B, A). `Unordered` keeps a single entry
/// per pair, the one whose first symbol sorts lower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairMode {
    #[default]
    Ordered,
    Unordered,
}

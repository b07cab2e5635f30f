use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One day of market data for a single asset, as delivered by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

impl DailyBar {
    /// A bar where open, high, low and close are all the same price.
    pub fn flat(date: NaiveDate, close: Decimal, volume: Decimal) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume,
        }
    }
}

/// The raw history of one asset. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSeries {
    symbol: String,
    bars: Vec<DailyBar>,
}

impl AssetSeries {
    /// Builds a series, sorting the bars by date.
    ///
    /// The sort is stable, so bars sharing a date keep their provider order.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<DailyBar>) -> Result<Self, CoreError> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "symbol".to_string(),
                "symbol must not be empty".to_string(),
            ));
        }
        bars.sort_by_key(|bar| bar.date);
        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[DailyBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Returns a copy restricted to bars dated within `[start, end)`.
    pub fn clipped(&self, start: NaiveDate, end: NaiveDate) -> Self {
        let bars = self
            .bars
            .iter()
            .filter(|bar| bar.date >= start && bar.date < end)
            .cloned()
            .collect::<Vec<_>>();
        let dropped = self.bars.len() - bars.len();
        if dropped > 0 {
            tracing::debug!(
                symbol = %self.symbol,
                dropped,
                "Dropped bars outside the requested date range."
            );
        }
        Self {
            symbol: self.symbol.clone(),
            bars,
        }
    }
}

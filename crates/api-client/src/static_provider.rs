use crate::PriceProvider;
use crate::error::ApiError;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{DailyBar, Interval};
use std::collections::HashMap;

/// An in-memory `PriceProvider` backed by pre-loaded bars.
///
/// Useful for offline runs and tests. Symbols that were never registered are
/// reported as unknown, the same way the HTTP provider reports them.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    series: HashMap<String, Vec<DailyBar>>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the history of a symbol.
    pub fn with_series(mut self, symbol: impl Into<String>, bars: Vec<DailyBar>) -> Self {
        self.series.insert(symbol.into(), bars);
        self
    }
}

#[async_trait]
impl PriceProvider for StaticProvider {
    async fn fetch_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        _interval: Interval,
    ) -> Result<Vec<DailyBar>, ApiError> {
        let bars = self
            .series
            .get(symbol)
            .ok_or_else(|| ApiError::UnknownSymbol {
                symbol: symbol.to_string(),
                reason: "not registered with the static provider".to_string(),
            })?;

        Ok(bars
            .iter()
            .filter(|bar| bar.date >= start && bar.date < end)
            .cloned()
            .collect())
    }
}

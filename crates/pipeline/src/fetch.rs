use crate::error::PipelineError;
use api_client::PriceProvider;
use chrono::NaiveDate;
use core_types::{AssetSeries, Interval};
use futures::future::try_join_all;
use std::collections::HashMap;

/// Fetches every symbol's daily history over one date range.
///
/// Requests are issued together; the first failure aborts the stage and no
/// partial result is returned. Bars outside `[start, end)` are discarded so
/// every downstream structure sees exactly the requested window.
pub async fn fetch_all<P>(
    provider: &P,
    symbols: &[String],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<HashMap<String, AssetSeries>, PipelineError>
where
    P: PriceProvider + ?Sized,
{
    let fetches = symbols
        .iter()
        .map(|symbol| fetch_one(provider, symbol, start, end));

    let series = try_join_all(fetches).await?;

    Ok(series
        .into_iter()
        .map(|s| (s.symbol().to_string(), s))
        .collect())
}

async fn fetch_one<P>(
    provider: &P,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<AssetSeries, PipelineError>
where
    P: PriceProvider + ?Sized,
{
    let bars = provider
        .fetch_history(symbol, start, end, Interval::Daily)
        .await
        .map_err(|source| PipelineError::Provider {
            symbol: symbol.to_string(),
            source,
        })?;

    let series = AssetSeries::new(symbol, bars)?.clipped(start, end);
    if series.is_empty() {
        tracing::warn!(symbol, %start, %end, "Provider returned no data in range.");
    } else {
        tracing::debug!(symbol, bars = series.len(), "Fetched price history.");
    }
    Ok(series)
}

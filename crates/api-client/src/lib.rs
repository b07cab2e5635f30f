use crate::error::ApiError;
use crate::responses::ChartResponse;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use configuration::ProviderConfig;
use core_types::{DailyBar, Interval};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::time::Duration;

pub mod error;
pub mod responses;
pub mod static_provider;
// --- Public API ---
pub use static_provider::StaticProvider;

/// The abstract interface for a price-history source.
///
/// The analysis pipeline only depends on this trait, so the HTTP client can be
/// swapped for an in-memory provider in tests or offline runs.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetches the bars of `symbol` dated within `[start, end)`.
    ///
    /// An empty vector means the symbol exists but has no data in the range.
    async fn fetch_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<Vec<DailyBar>, ApiError>;
}

/// A concrete implementation of the `PriceProvider` for the Yahoo Finance chart API.
#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PriceProvider for YahooClient {
    #[tracing::instrument(name = "fetch", skip(self, start, end, interval))]
    async fn fetch_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<Vec<DailyBar>, ApiError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let (period1, period2) = period_bounds(start, end)?;

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", interval.as_code().to_string()),
                ("events", "history".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        tracing::debug!(status = %status, bytes = text.len(), "Received chart response.");

        // Yahoo reports unknown tickers as 404 with a chart-level error body.
        if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        let bars = parse_chart(symbol, &text)?;
        tracing::debug!(bars = bars.len(), "Parsed daily bars.");
        Ok(bars)
    }
}

/// Unix-second bounds from midnight of `start` up to, not including, midnight of `end`.
fn period_bounds(start: NaiveDate, end: NaiveDate) -> Result<(i64, i64), ApiError> {
    let midnight = |date: NaiveDate, label: &str| {
        date.and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .ok_or_else(|| ApiError::InvalidData(format!("Invalid {label} date: {date}")))
    };
    Ok((midnight(start, "start")?, midnight(end, "end")?))
}

/// Converts a chart payload into daily bars.
///
/// The adjusted close is preferred over the raw close. Slots without any close
/// are skipped; missing open/high/low fall back to the close and a missing
/// volume counts as zero.
pub fn parse_chart(symbol: &str, body: &str) -> Result<Vec<DailyBar>, ApiError> {
    let response: ChartResponse = serde_json::from_str(body).map_err(|e| {
        ApiError::Deserialization(format!("Failed to parse chart for {symbol}: {e}"))
    })?;

    if let Some(error) = response.chart.error {
        return Err(ApiError::UnknownSymbol {
            symbol: symbol.to_string(),
            reason: format!("{} - {}", error.code, error.description),
        });
    }

    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| ApiError::UnknownSymbol {
            symbol: symbol.to_string(),
            reason: "no chart result returned".to_string(),
        })?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adj_closes = result
        .indicators
        .adj_close
        .and_then(|adj| adj.into_iter().next())
        .map(|adj| adj.adj_close)
        .unwrap_or_default();

    let slot = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let Some(close) = slot(&adj_closes, i).or_else(|| slot(&quote.close, i)) else {
            continue;
        };
        let date = DateTime::from_timestamp(ts, 0)
            .ok_or_else(|| ApiError::InvalidData(format!("Invalid timestamp: {ts}")))?
            .date_naive();

        let close = to_decimal(close)?;
        let price_or_close = |values: &[Option<f64>]| -> Result<Decimal, ApiError> {
            slot(values, i).map(to_decimal).transpose().map(|v| v.unwrap_or(close))
        };

        bars.push(DailyBar {
            date,
            open: price_or_close(&quote.open)?,
            high: price_or_close(&quote.high)?,
            low: price_or_close(&quote.low)?,
            close,
            volume: slot(&quote.volume, i)
                .map(to_decimal)
                .transpose()?
                .unwrap_or(Decimal::ZERO),
        });
    }

    Ok(bars)
}

fn to_decimal(value: f64) -> Result<Decimal, ApiError> {
    Decimal::from_f64(value)
        .ok_or_else(|| ApiError::InvalidData(format!("Value is not representable: {value}")))
}

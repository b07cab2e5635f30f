//! # Coinscope Analysis Pipeline
//!
//! The single entry point that turns `(symbols, start, end)` plus a price
//! provider into a complete analytics bundle. Every call is an independent
//! run: it fetches all series afresh, computes everything, and shares nothing
//! with earlier runs.

use analytics::{AnalysisParams, AnalysisReport, AnalyticsEngine};
use api_client::PriceProvider;
use chrono::NaiveDate;
use configuration::AnalysisSettings;
use serde::Serialize;
use uuid::Uuid;

pub mod error;
pub mod fetch;

pub use error::PipelineError;
pub use fetch::fetch_all;

/// The inputs of one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub symbols: Vec<String>,
    /// Inclusive. `start_date <= end_date` is assumed, not checked.
    pub start_date: NaiveDate,
    /// Exclusive.
    pub end_date: NaiveDate,
    pub params: AnalysisParams,
}

impl AnalysisRequest {
    pub fn from_settings(settings: &AnalysisSettings) -> Self {
        Self {
            symbols: settings.symbols.clone(),
            start_date: settings.start_date,
            end_date: settings.end_date,
            params: AnalysisParams {
                short_window: settings.short_window,
                long_window: settings.long_window,
                pair_mode: settings.pair_mode,
            },
        }
    }

    /// Trimmed, non-blank symbols with duplicates removed, first occurrence kept.
    pub fn selected_symbols(&self) -> Vec<String> {
        let mut selected: Vec<String> = Vec::with_capacity(self.symbols.len());
        for symbol in self.symbols.iter().map(|s| s.trim()) {
            if !symbol.is_empty() && !selected.iter().any(|s| s == symbol) {
                selected.push(symbol.to_string());
            }
        }
        selected
    }
}

/// Everything one run produced, together with the parameters that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisBundle {
    pub run_id: Uuid,
    pub symbols: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub params: AnalysisParams,
    #[serde(flatten)]
    pub report: AnalysisReport,
}

/// The result of a run that did not fail.
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    /// The selection was empty; nothing was fetched or computed.
    NoAnalysis,
    Completed(Box<AnalysisBundle>),
}

impl AnalysisOutcome {
    pub fn bundle(&self) -> Option<&AnalysisBundle> {
        match self {
            AnalysisOutcome::NoAnalysis => None,
            AnalysisOutcome::Completed(bundle) => Some(bundle),
        }
    }
}

/// Runs the whole pipeline: fetch, align, and derive every output.
///
/// An empty selection short-circuits to `AnalysisOutcome::NoAnalysis` without
/// touching the provider. Invalid parameters are rejected before any fetch.
/// A fetch failure for any symbol aborts the run with
/// `PipelineError::Provider`; there is no retry and no partial result.
pub async fn run<P>(request: &AnalysisRequest, provider: &P) -> Result<AnalysisOutcome, PipelineError>
where
    P: PriceProvider + ?Sized,
{
    let symbols = request.selected_symbols();
    if symbols.is_empty() {
        tracing::warn!("No symbols selected; skipping analysis.");
        return Ok(AnalysisOutcome::NoAnalysis);
    }
    request.params.validate()?;

    let run_id = Uuid::new_v4();
    tracing::info!(
        %run_id,
        symbols = symbols.len(),
        start = %request.start_date,
        end = %request.end_date,
        "Starting analysis run."
    );

    let series = fetch_all(provider, &symbols, request.start_date, request.end_date).await?;

    let engine = AnalyticsEngine::new(request.params);
    let report = engine.calculate(&symbols, &series)?;

    tracing::info!(%run_id, dates = report.prices.row_count(), "Analysis run complete.");

    Ok(AnalysisOutcome::Completed(Box::new(AnalysisBundle {
        run_id,
        symbols,
        start_date: request.start_date,
        end_date: request.end_date,
        params: request.params,
        report,
    })))
}

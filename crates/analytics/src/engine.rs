use crate::aligner::align;
use crate::correlation::{correlation_matrix, rank_pairs};
use crate::error::AnalyticsError;
use crate::moving_average::moving_averages;
use crate::performance::normalize_performance;
use crate::report::AnalysisReport;
use crate::returns::calculate_returns;
use crate::summary::summarize;
use core_types::{AssetSeries, BarField, PairMode};
use serde::Serialize;
use std::collections::HashMap;

/// Tunable inputs of the analytics stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalysisParams {
    pub short_window: usize,
    pub long_window: usize,
    pub pair_mode: PairMode,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            short_window: 50,
            long_window: 200,
            pair_mode: PairMode::Ordered,
        }
    }
}

impl AnalysisParams {
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        for window in [self.short_window, self.long_window] {
            if window == 0 {
                return Err(AnalyticsError::InvalidWindow(window));
            }
        }
        Ok(())
    }
}

/// A stateless calculator that turns fetched series into an `AnalysisReport`.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {
    params: AnalysisParams,
}

impl AnalyticsEngine {
    pub fn new(params: AnalysisParams) -> Self {
        Self { params }
    }

    /// The main entry point for calculating the analytics bundle.
    ///
    /// # Arguments
    ///
    /// * `symbols` - The selected symbols, in display order. Each becomes a column
    ///   even when `series` holds no data for it.
    /// * `series` - The raw history fetched for each symbol.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AnalysisReport` or an `AnalyticsError`. Only
    /// invalid parameters produce an error; missing data yields undefined values.
    pub fn calculate(
        &self,
        symbols: &[String],
        series: &HashMap<String, AssetSeries>,
    ) -> Result<AnalysisReport, AnalyticsError> {
        self.params.validate()?;
        if self.params.short_window >= self.params.long_window {
            tracing::warn!(
                short = self.params.short_window,
                long = self.params.long_window,
                "Short moving average window is not shorter than the long one."
            );
        }

        let prices = align(symbols, series, BarField::Close);
        let volumes = align(symbols, series, BarField::Volume);

        let returns = calculate_returns(&prices);
        let correlation = correlation_matrix(&returns);
        let ranked_pairs = rank_pairs(&correlation, self.params.pair_mode);

        let short_moving_averages = moving_averages(&prices, self.params.short_window)?;
        let long_moving_averages = moving_averages(&prices, self.params.long_window)?;
        let performance = normalize_performance(&prices);
        let summary = summarize(&prices);

        tracing::info!(
            symbols = symbols.len(),
            dates = prices.row_count(),
            return_rows = returns.row_count(),
            pairs = ranked_pairs.len(),
            "Analytics calculated."
        );

        Ok(AnalysisReport {
            prices,
            volumes,
            summary,
            returns,
            correlation,
            ranked_pairs,
            short_moving_averages,
            long_moving_averages,
            performance,
        })
    }
}

use crate::table::{AlignedPriceTable, Column};
use serde::Serialize;

/// Descriptive statistics of one symbol's present prices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub symbol: String,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n − 1 in the denominator).
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

/// Summarises every column of the price table, ignoring missing cells.
pub fn summarize(prices: &AlignedPriceTable) -> Vec<SummaryStatistics> {
    prices.columns.iter().map(summarize_column).collect()
}

fn summarize_column(column: &Column) -> SummaryStatistics {
    let mut sorted: Vec<f64> = column.values.iter().flatten().copied().collect();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let mean = (count > 0).then(|| sorted.iter().sum::<f64>() / count as f64);
    let std = mean.filter(|_| count > 1).map(|mean| {
        let squares: f64 = sorted.iter().map(|v| (v - mean) * (v - mean)).sum();
        (squares / (count - 1) as f64).sqrt()
    });

    SummaryStatistics {
        symbol: column.symbol.clone(),
        count,
        mean,
        std,
        min: sorted.first().copied(),
        p25: quantile(&sorted, 0.25),
        p50: quantile(&sorted, 0.50),
        p75: quantile(&sorted, 0.75),
        max: sorted.last().copied(),
    }
}

/// Linear interpolation between closest ranks over an ascending slice.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let position = q * last as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

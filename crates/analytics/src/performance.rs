use crate::table::{AlignedPriceTable, Column};
use serde::Serialize;

/// Cumulative return of one symbol since its first observation, on the
/// aligned table's date axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSeries {
    pub symbol: String,
    pub values: Vec<Option<f64>>,
}

impl PerformanceSeries {
    /// The latest defined cumulative return, i.e. the return over the whole window.
    pub fn total_return(&self) -> Option<f64> {
        self.values.iter().rev().find_map(|v| *v)
    }
}

/// Rescales every column to `price(i) / price(origin) - 1`.
///
/// The origin is the column's first present price, which is not necessarily
/// row 0. The origin entry is exactly 0; entries before it and missing prices
/// are undefined. A column whose origin price is 0 cannot be rescaled and is
/// entirely undefined.
pub fn normalize_performance(prices: &AlignedPriceTable) -> Vec<PerformanceSeries> {
    prices.columns.iter().map(normalize_column).collect()
}

fn normalize_column(column: &Column) -> PerformanceSeries {
    let mut values = vec![None; column.values.len()];

    match column.first_present() {
        Some((_, base)) if base == 0.0 => {
            tracing::warn!(symbol = %column.symbol, "First price is zero; performance is undefined.");
        }
        Some((origin, base)) => {
            for (i, cell) in column.values.iter().enumerate().skip(origin + 1) {
                values[i] = cell.map(|price| price / base - 1.0);
            }
            values[origin] = Some(0.0);
        }
        None => {}
    }

    PerformanceSeries {
        symbol: column.symbol.clone(),
        values,
    }
}

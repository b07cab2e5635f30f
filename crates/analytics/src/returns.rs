use crate::table::AlignedPriceTable;
use chrono::NaiveDate;
use serde::Serialize;

/// One symbol's simple returns on the return table's date axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnColumn {
    pub symbol: String,
    pub values: Vec<f64>,
}

/// Period-over-period simple returns for every symbol.
///
/// Only dates on which every symbol has a defined return are kept, so all
/// columns share one date axis and contain no gaps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnTable {
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<ReturnColumn>,
}

impl ReturnTable {
    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn column(&self, symbol: &str) -> Option<&ReturnColumn> {
        self.columns.iter().find(|c| c.symbol == symbol)
    }
}

/// `price(i) / price(i-1) - 1`, defined only when both prices are present and
/// the previous one is non-zero.
fn simple_return(previous: Option<f64>, current: Option<f64>) -> Option<f64> {
    match (previous, current) {
        (Some(prev), Some(curr)) if prev != 0.0 => Some(curr / prev - 1.0),
        _ => None,
    }
}

/// Derives simple returns from an aligned price table.
///
/// A row is dropped when any column's return on it is undefined. The first
/// date never has a return, so a table with fewer than two rows yields an
/// empty result.
pub fn calculate_returns(prices: &AlignedPriceTable) -> ReturnTable {
    let mut dates = Vec::new();
    let mut columns: Vec<ReturnColumn> = prices
        .columns
        .iter()
        .map(|c| ReturnColumn {
            symbol: c.symbol.clone(),
            values: Vec::new(),
        })
        .collect();

    for row in 1..prices.row_count() {
        let row_returns: Option<Vec<f64>> = prices
            .columns
            .iter()
            .map(|c| simple_return(c.values[row - 1], c.values[row]))
            .collect();

        if let Some(row_returns) = row_returns {
            dates.push(prices.dates[row]);
            for (column, value) in columns.iter_mut().zip(row_returns) {
                column.values.push(value);
            }
        }
    }

    tracing::debug!(
        price_rows = prices.row_count(),
        return_rows = dates.len(),
        "Calculated simple returns."
    );

    ReturnTable { dates, columns }
}

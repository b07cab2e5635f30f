use crate::error::AnalyticsError;
use crate::table::{AlignedPriceTable, Column};
use serde::Serialize;
use ta::indicators::SimpleMovingAverage as Sma;
use ta::{Next, Reset};

/// Rolling mean of one symbol's prices on the aligned table's date axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverageSeries {
    pub symbol: String,
    pub window: usize,
    pub values: Vec<Option<f64>>,
}

impl MovingAverageSeries {
    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// The most recent defined value, if any.
    pub fn last_defined(&self) -> Option<f64> {
        self.values.iter().rev().find_map(|v| *v)
    }
}

/// Computes a `window`-row simple moving average for every column.
///
/// The value at row `i` is the mean of rows `i-window+1..=i` and exists only
/// when all of those rows hold a price. There is no partial-window average:
/// a gap-free column of length L yields `window-1` leading undefined entries,
/// and every missing price blanks the next `window` entries.
pub fn moving_averages(
    prices: &AlignedPriceTable,
    window: usize,
) -> Result<Vec<MovingAverageSeries>, AnalyticsError> {
    if window == 0 {
        return Err(AnalyticsError::InvalidWindow(window));
    }

    prices
        .columns
        .iter()
        .map(|column| rolling_mean(column, window))
        .collect()
}

fn rolling_mean(column: &Column, window: usize) -> Result<MovingAverageSeries, AnalyticsError> {
    let mut sma = Sma::new(window).map_err(|e| AnalyticsError::Indicator(format!("{e:?}")))?;
    let mut run = 0usize;

    let values = column
        .values
        .iter()
        .map(|cell| match cell {
            Some(price) => {
                let mean = sma.next(*price);
                run += 1;
                (run >= window).then_some(mean)
            }
            None => {
                // A gap starts a fresh window.
                sma.reset();
                run = 0;
                None
            }
        })
        .collect();

    Ok(MovingAverageSeries {
        symbol: column.symbol.clone(),
        window,
        values,
    })
}

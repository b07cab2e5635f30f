use chrono::NaiveDate;
use core_types::BarField;
use serde::Serialize;

/// One symbol's values laid out on a shared date axis. `None` marks a date
/// the asset has no observation for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub symbol: String,
    pub values: Vec<Option<f64>>,
}

impl Column {
    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Index and value of the first present cell.
    pub fn first_present(&self) -> Option<(usize, f64)> {
        self.values
            .iter()
            .enumerate()
            .find_map(|(i, v)| v.map(|value| (i, value)))
    }
}

/// A wide table: rows are strictly increasing dates, columns are symbols.
///
/// Built by the calendar aligner. The column order follows the symbol
/// selection and carries no meaning beyond display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedTable {
    pub field: BarField,
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<Column>,
}

/// Aligned closing prices.
pub type AlignedPriceTable = AlignedTable;
/// Aligned trading volumes.
pub type AlignedVolumeTable = AlignedTable;

impl AlignedTable {
    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.symbol.as_str())
    }

    pub fn column(&self, symbol: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.symbol == symbol)
    }

    pub fn value(&self, date: NaiveDate, symbol: &str) -> Option<f64> {
        let row = self.dates.binary_search(&date).ok()?;
        self.column(symbol)?.values[row]
    }

    /// True when no cell in the table is missing.
    pub fn is_complete(&self) -> bool {
        self.columns
            .iter()
            .all(|c| c.values.iter().all(Option::is_some))
    }
}

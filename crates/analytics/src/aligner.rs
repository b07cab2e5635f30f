use crate::table::{AlignedTable, Column};
use chrono::NaiveDate;
use core_types::{AssetSeries, BarField, DailyBar};
use rust_decimal::prelude::ToPrimitive;
use std::collections::{BTreeSet, HashMap};

/// Lays the selected symbols' series out on one shared calendar.
///
/// The date axis is the union of every selected series' dates. A symbol with
/// no bar on a date gets a missing cell there; nothing is filled forward or
/// interpolated. A selected symbol that has no series at all (or an empty one)
/// still gets a column, entirely missing.
///
/// If a series holds several bars for one date, the last of them wins.
pub fn align(
    symbols: &[String],
    series: &HashMap<String, AssetSeries>,
    field: BarField,
) -> AlignedTable {
    let selected: Vec<Option<&AssetSeries>> = symbols.iter().map(|s| series.get(s)).collect();

    let dates: Vec<NaiveDate> = selected
        .iter()
        .flatten()
        .flat_map(|s| s.bars().iter().map(|bar| bar.date))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let columns = symbols
        .iter()
        .zip(selected)
        .map(|(symbol, asset)| {
            let mut values = vec![None; dates.len()];
            if let Some(asset) = asset {
                for bar in asset.bars() {
                    // Every bar date is on the axis by construction.
                    if let Ok(row) = dates.binary_search(&bar.date) {
                        values[row] = field_value(bar, field);
                    }
                }
            }
            let column = Column {
                symbol: symbol.clone(),
                values,
            };
            if column.present_count() == 0 {
                tracing::warn!(symbol = %symbol, ?field, "No observations for symbol; column is entirely missing.");
            }
            column
        })
        .collect();

    tracing::debug!(
        ?field,
        rows = dates.len(),
        columns = symbols.len(),
        "Aligned series onto a shared calendar."
    );

    AlignedTable {
        field,
        dates,
        columns,
    }
}

fn field_value(bar: &DailyBar, field: BarField) -> Option<f64> {
    let value = match field {
        BarField::Close => bar.close,
        BarField::Volume => bar.volume,
    };
    value.to_f64().filter(|v| v.is_finite())
}

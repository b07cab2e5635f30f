//! Property-based tests for the analytics stages.
//!
//! These hold for any mix of sparse, overlapping series:
//! - The aligned date axis is the sorted, duplicate-free union of input dates
//! - Gap-free columns have exactly `window - 1` undefined moving-average entries
//! - Performance is exactly 0 at each column's first observation
//! - The ranked pair list has n·(n−1) entries, sorted with undefined last

use analytics::{
    AnalysisParams, AnalyticsEngine, align, calculate_returns, correlation_matrix,
    moving_averages, normalize_performance, rank_pairs,
};
use chrono::{Duration, NaiveDate};
use core_types::{AssetSeries, BarField, DailyBar, PairMode};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet, HashMap};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
}

/// Up to five symbols, each with a sparse set of day offsets and positive prices.
fn series_strategy() -> impl Strategy<Value = BTreeMap<String, Vec<(i64, u32)>>> {
    prop::collection::btree_map(
        "[A-Z]{1,4}",
        prop::collection::vec((0i64..60, 1u32..100_000), 0..40),
        1..=5,
    )
}

fn to_input(raw: &BTreeMap<String, Vec<(i64, u32)>>) -> (Vec<String>, HashMap<String, AssetSeries>) {
    let symbols: Vec<String> = raw.keys().cloned().collect();
    let series = raw
        .iter()
        .map(|(symbol, points)| {
            let bars = points
                .iter()
                .map(|&(offset, cents)| {
                    DailyBar::flat(
                        base_date() + Duration::days(offset),
                        Decimal::new(cents as i64, 2),
                        Decimal::ONE,
                    )
                })
                .collect();
            (symbol.clone(), AssetSeries::new(symbol.clone(), bars).unwrap())
        })
        .collect();
    (symbols, series)
}

proptest! {
    #[test]
    fn aligned_axis_is_sorted_union_of_input_dates(raw in series_strategy()) {
        let (symbols, series) = to_input(&raw);

        let table = align(&symbols, &series, BarField::Close);

        let union: BTreeSet<NaiveDate> = raw
            .values()
            .flatten()
            .map(|&(offset, _)| base_date() + Duration::days(offset))
            .collect();
        prop_assert_eq!(table.dates.clone(), union.into_iter().collect::<Vec<_>>());
        prop_assert!(table.dates.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(table.columns.len(), symbols.len());
        for column in &table.columns {
            prop_assert_eq!(column.values.len(), table.dates.len());
        }
    }

    #[test]
    fn moving_average_warmup_on_gap_free_column(
        prices in prop::collection::vec(1.0f64..1_000.0, 1..120),
        window in 1usize..150,
    ) {
        let bars = prices
            .iter()
            .enumerate()
            .map(|(i, p)| DailyBar::flat(
                base_date() + Duration::days(i as i64),
                Decimal::try_from(*p).unwrap(),
                Decimal::ONE,
            ))
            .collect();
        let series: HashMap<_, _> =
            [("A".to_string(), AssetSeries::new("A", bars).unwrap())].into_iter().collect();
        let table = align(&["A".to_string()], &series, BarField::Close);

        let ma = &moving_averages(&table, window).unwrap()[0];

        let len = prices.len();
        let leading = ma.values.iter().take_while(|v| v.is_none()).count();
        prop_assert_eq!(leading, (window - 1).min(len));
        prop_assert_eq!(ma.defined_count(), len.saturating_sub(window - 1));
    }

    #[test]
    fn performance_starts_at_exactly_zero(raw in series_strategy()) {
        let (symbols, series) = to_input(&raw);
        let table = align(&symbols, &series, BarField::Close);

        for (column, perf) in table.columns.iter().zip(normalize_performance(&table)) {
            match column.first_present() {
                Some((origin, _)) => {
                    prop_assert_eq!(perf.values[origin], Some(0.0));
                    prop_assert!(perf.values[..origin].iter().all(Option::is_none));
                }
                None => prop_assert!(perf.values.iter().all(Option::is_none)),
            }
        }
    }

    #[test]
    fn ranked_pairs_cover_every_ordered_pair_in_order(raw in series_strategy()) {
        let (symbols, series) = to_input(&raw);
        let table = align(&symbols, &series, BarField::Close);
        let matrix = correlation_matrix(&calculate_returns(&table));

        let ranked = rank_pairs(&matrix, PairMode::Ordered);

        let n = symbols.len();
        prop_assert_eq!(ranked.len(), n * (n - 1));
        for pair in ranked.windows(2) {
            match (pair[0].correlation, pair[1].correlation) {
                (Some(a), Some(b)) => prop_assert!(a >= b),
                (None, Some(_)) => prop_assert!(false, "undefined ranked before defined"),
                _ => {}
            }
        }
        for i in 0..n {
            for j in 0..n {
                prop_assert_eq!(matrix.values[i][j], matrix.values[j][i]);
            }
        }
    }

    #[test]
    fn complete_tables_lose_exactly_one_return_row(
        rows in 2usize..60,
        symbols in 1usize..5,
    ) {
        let series: HashMap<String, AssetSeries> = (0..symbols)
            .map(|s| {
                let symbol = format!("S{s}");
                let bars = (0..rows)
                    .map(|i| DailyBar::flat(
                        base_date() + Duration::days(i as i64),
                        Decimal::from(10 + ((i * (s + 3)) % 17) as i64),
                        Decimal::ONE,
                    ))
                    .collect();
                (symbol.clone(), AssetSeries::new(symbol, bars).unwrap())
            })
            .collect();
        let names: Vec<String> = (0..symbols).map(|s| format!("S{s}")).collect();

        let report = AnalyticsEngine::new(AnalysisParams::default())
            .calculate(&names, &series)
            .unwrap();

        prop_assert!(report.prices.is_complete());
        prop_assert_eq!(report.returns.row_count(), rows - 1);
    }
}

//! End-to-end runs of the pipeline against in-memory providers.

use analytics::AnalysisParams;
use api_client::error::ApiError;
use api_client::{PriceProvider, StaticProvider};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use core_types::{DailyBar, Interval, PairMode};
use pipeline::{AnalysisOutcome, AnalysisRequest, PipelineError, run};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicUsize, Ordering};

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
}

fn bars(closes: &[Decimal]) -> Vec<DailyBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| DailyBar::flat(day(i as i64), *close, dec!(1000)))
        .collect()
}

fn request(symbols: &[&str], start: NaiveDate, end: NaiveDate, params: AnalysisParams) -> AnalysisRequest {
    AnalysisRequest {
        symbols: symbols.iter().map(|s| s.to_string()).collect(),
        start_date: start,
        end_date: end,
        params,
    }
}

/// Counts calls and always fails, so tests can assert it was never reached.
#[derive(Default)]
struct CountingProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl PriceProvider for CountingProvider {
    async fn fetch_history(
        &self,
        symbol: &str,
        _start: NaiveDate,
        _end: NaiveDate,
        _interval: Interval,
    ) -> Result<Vec<DailyBar>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ApiError::InvalidData(format!("unexpected fetch of {symbol}")))
    }
}

/// Serves a fixed series for every symbol except one, which always fails.
struct FlakyProvider {
    failing: &'static str,
}

#[async_trait]
impl PriceProvider for FlakyProvider {
    async fn fetch_history(
        &self,
        symbol: &str,
        _start: NaiveDate,
        _end: NaiveDate,
        _interval: Interval,
    ) -> Result<Vec<DailyBar>, ApiError> {
        if symbol == self.failing {
            return Err(ApiError::Http {
                status: 503,
                body: "service unavailable".to_string(),
            });
        }
        Ok(bars(&[dec!(1), dec!(2), dec!(3)]))
    }
}

/// Ignores the requested range and returns everything it holds.
struct UnfilteredProvider {
    bars: Vec<DailyBar>,
}

#[async_trait]
impl PriceProvider for UnfilteredProvider {
    async fn fetch_history(
        &self,
        _symbol: &str,
        _start: NaiveDate,
        _end: NaiveDate,
        _interval: Interval,
    ) -> Result<Vec<DailyBar>, ApiError> {
        Ok(self.bars.clone())
    }
}

#[tokio::test]
async fn two_assets_with_identical_growth_are_perfectly_correlated() {
    let provider = StaticProvider::new()
        .with_series("A", bars(&[dec!(100), dec!(110), dec!(121)]))
        .with_series("B", bars(&[dec!(50), dec!(55), dec!(60.5)]));
    let params = AnalysisParams {
        short_window: 2,
        long_window: 200,
        pair_mode: PairMode::Ordered,
    };

    let outcome = run(&request(&["A", "B"], day(0), day(3), params), &provider)
        .await
        .unwrap();

    let bundle = outcome.bundle().expect("a completed run");
    let report = &bundle.report;
    assert_eq!(bundle.symbols, vec!["A", "B"]);
    assert_eq!(report.prices.dates, vec![day(0), day(1), day(2)]);
    assert_eq!(report.returns.dates, vec![day(1), day(2)]);
    assert_eq!(report.correlation.get("A", "B"), Some(1.0));
    assert_eq!(report.ranked_pairs.len(), 2);
    assert!(report.ranked_pairs.iter().all(|p| p.correlation == Some(1.0)));
    let a_perf = &report.performance[0].values;
    assert_eq!(a_perf[0], Some(0.0));
    assert!((a_perf[2].unwrap() - 0.21).abs() < 1e-9);
}

#[tokio::test]
async fn empty_selection_yields_no_analysis_without_fetching() {
    let provider = CountingProvider::default();

    let outcome = run(
        &request(&["", "  "], day(0), day(10), AnalysisParams::default()),
        &provider,
    )
    .await
    .unwrap();

    assert!(matches!(outcome, AnalysisOutcome::NoAnalysis));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn invalid_window_is_rejected_before_fetching() {
    let provider = CountingProvider::default();
    let params = AnalysisParams {
        long_window: 0,
        ..AnalysisParams::default()
    };

    let result = run(&request(&["A"], day(0), day(10), params), &provider).await;

    assert!(matches!(result, Err(PipelineError::Analytics(_))));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn one_failing_symbol_fails_the_whole_run() {
    let provider = FlakyProvider { failing: "B" };

    let result = run(
        &request(&["A", "B", "C"], day(0), day(3), AnalysisParams::default()),
        &provider,
    )
    .await;

    match result {
        Err(PipelineError::Provider { symbol, source }) => {
            assert_eq!(symbol, "B");
            assert!(matches!(source, ApiError::Http { status: 503, .. }));
        }
        other => panic!("expected a provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_symbol_is_reported_by_name() {
    let provider = StaticProvider::new().with_series("A", bars(&[dec!(1), dec!(2)]));

    let result = run(
        &request(&["A", "NOPE"], day(0), day(2), AnalysisParams::default()),
        &provider,
    )
    .await;

    assert!(matches!(
        result,
        Err(PipelineError::Provider { ref symbol, source: ApiError::UnknownSymbol { .. } }) if symbol == "NOPE"
    ));
}

#[tokio::test]
async fn long_window_beyond_history_is_entirely_undefined() {
    let closes: Vec<Decimal> = (1..=10).map(Decimal::from).collect();
    let provider = StaticProvider::new().with_series("A", bars(&closes));

    let outcome = run(
        &request(&["A"], day(0), day(10), AnalysisParams::default()),
        &provider,
    )
    .await
    .unwrap();

    let report = &outcome.bundle().unwrap().report;
    assert_eq!(report.prices.row_count(), 10);
    assert_eq!(report.long_moving_averages[0].defined_count(), 0);
    assert!(report.correlation.values[0][0].is_some());
    assert!(report.ranked_pairs.is_empty());
}

#[tokio::test]
async fn bars_outside_the_range_are_discarded() {
    let closes: Vec<Decimal> = (1..=10).map(Decimal::from).collect();
    let provider = UnfilteredProvider { bars: bars(&closes) };

    // The end date itself is excluded, so day(6) never appears.
    let outcome = run(
        &request(&["A"], day(2), day(6), AnalysisParams::default()),
        &provider,
    )
    .await
    .unwrap();

    let report = &outcome.bundle().unwrap().report;
    assert_eq!(report.prices.dates, vec![day(2), day(3), day(4), day(5)]);
    // The origin is the first in-range close, not the first bar served.
    assert_eq!(report.performance[0].values[0], Some(0.0));
    assert!((report.performance[0].values[3].unwrap() - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn duplicated_symbols_are_fetched_once() {
    let provider = StaticProvider::new().with_series("A", bars(&[dec!(1), dec!(2)]));

    let outcome = run(
        &request(&["A", " A ", "A"], day(0), day(2), AnalysisParams::default()),
        &provider,
    )
    .await
    .unwrap();

    let bundle = outcome.bundle().unwrap();
    assert_eq!(bundle.symbols, vec!["A"]);
    assert_eq!(bundle.report.prices.columns.len(), 1);
}

#[tokio::test]
async fn bundle_serializes_undefined_values_as_null() {
    let provider = StaticProvider::new()
        .with_series("A", bars(&[dec!(1), dec!(2), dec!(4)]))
        .with_series("B", bars(&[dec!(3), dec!(3), dec!(3)]));
    let params = AnalysisParams {
        short_window: 2,
        long_window: 3,
        pair_mode: PairMode::Ordered,
    };

    let outcome = run(&request(&["A", "B"], day(0), day(3), params), &provider)
        .await
        .unwrap();
    let json = serde_json::to_value(outcome.bundle().unwrap()).unwrap();

    assert!(json["run_id"].is_string());
    assert_eq!(json["start_date"], "2024-01-01");
    assert!(json["short_moving_averages"][0]["values"][0].is_null());
    assert!(json["long_moving_averages"][0]["values"][2].is_number());
    // B never moves, so its correlation with A is undefined.
    assert!(json["correlation"]["values"][0][1].is_null());
    assert!(json["ranked_pairs"][0]["correlation"].is_null());
}

#[tokio::test]
async fn default_year_range_stops_before_its_end_date() {
    let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let year: Vec<DailyBar> = (0..=365)
        .map(|i| DailyBar::flat(start + Duration::days(i), Decimal::from(100 + i), dec!(1)))
        .collect();
    let provider = UnfilteredProvider { bars: year };

    let outcome = run(&request(&["A"], start, end, AnalysisParams::default()), &provider)
        .await
        .unwrap();

    let prices = &outcome.bundle().unwrap().report.prices;
    assert_eq!(prices.row_count(), 365);
    assert_eq!(prices.dates.last(), Some(&NaiveDate::from_ymd_opt(2022, 12, 31).unwrap()));
}

#[tokio::test]
async fn proportional_price_series_correlate_perfectly() {
    let provider = StaticProvider::new()
        .with_series("P", bars(&[dec!(1), dec!(1.1), dec!(1.21)]))
        .with_series("Q", bars(&[dec!(3), dec!(3.3), dec!(3.63)]))
        .with_series("R", bars(&[dec!(0.3), dec!(0.33), dec!(0.363)]));

    let outcome = run(
        &request(&["P", "Q", "R"], day(0), day(3), AnalysisParams::default()),
        &provider,
    )
    .await
    .unwrap();

    let correlation = &outcome.bundle().unwrap().report.correlation;
    assert_eq!(correlation.get("P", "Q"), Some(1.0));
    assert_eq!(correlation.get("P", "R"), Some(1.0));
    assert_eq!(correlation.get("Q", "R"), Some(1.0));
}

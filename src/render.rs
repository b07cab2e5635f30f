use anyhow::Context;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use pipeline::AnalysisBundle;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Formats an optional value; undefined values become an empty cell.
fn fmt(value: Option<f64>, precision: usize) -> String {
    value.map(|v| format!("{v:.precision$}")).unwrap_or_default()
}

fn fmt_pct(value: Option<f64>) -> String {
    value.map(|v| format!("{:+.2}%", v * 100.0)).unwrap_or_default()
}

fn new_table(header: Vec<String>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn numeric(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Prints the bundle as a series of terminal tables.
pub fn print_tables(bundle: &AnalysisBundle) {
    let report = &bundle.report;

    println!(
        "\nRun {} | {} to {} | {} trading days | {} return rows",
        bundle.run_id,
        bundle.start_date,
        bundle.end_date,
        report.prices.row_count(),
        report.returns.row_count(),
    );

    // --- Summary statistics ---
    let mut summary = new_table(
        ["Symbol", "Count", "Mean", "Std", "Min", "25%", "50%", "75%", "Max"]
            .map(String::from)
            .to_vec(),
    );
    for stats in &report.summary {
        summary.add_row(vec![
            Cell::new(&stats.symbol),
            numeric(stats.count.to_string()),
            numeric(fmt(stats.mean, 4)),
            numeric(fmt(stats.std, 4)),
            numeric(fmt(stats.min, 4)),
            numeric(fmt(stats.p25, 4)),
            numeric(fmt(stats.p50, 4)),
            numeric(fmt(stats.p75, 4)),
            numeric(fmt(stats.max, 4)),
        ]);
    }
    println!("\nClose price summary\n{summary}");

    // --- Correlation matrix ---
    let matrix = &report.correlation;
    let mut header = vec![String::new()];
    header.extend(matrix.symbols.iter().cloned());
    let mut correlation = new_table(header);
    for (symbol, row) in matrix.symbols.iter().zip(&matrix.values) {
        let mut cells = vec![Cell::new(symbol)];
        cells.extend(row.iter().map(|v| numeric(fmt(*v, 3))));
        correlation.add_row(cells);
    }
    println!(
        "\nCorrelation of daily returns ({} observations)\n{correlation}",
        matrix.observations
    );

    // --- Ranked pairs ---
    let mut pairs = new_table(
        ["Rank", "First", "Second", "Correlation"]
            .map(String::from)
            .to_vec(),
    );
    for (rank, pair) in report.ranked_pairs.iter().enumerate() {
        pairs.add_row(vec![
            numeric((rank + 1).to_string()),
            Cell::new(&pair.first),
            Cell::new(&pair.second),
            numeric(fmt(pair.correlation, 4)),
        ]);
    }
    println!("\nMost correlated pairs\n{pairs}");

    // --- Latest overlay values ---
    let short_window = bundle.params.short_window;
    let long_window = bundle.params.long_window;
    let mut latest = new_table(vec![
        "Symbol".to_string(),
        "Last close".to_string(),
        format!("MA({short_window})"),
        format!("MA({long_window})"),
        "Performance".to_string(),
    ]);
    let overlays = report
        .prices
        .columns
        .iter()
        .zip(&report.short_moving_averages)
        .zip(&report.long_moving_averages)
        .zip(&report.performance);
    for (((prices, short), long), performance) in overlays {
        let last_close = prices.values.iter().rev().flatten().next().copied();
        latest.add_row(vec![
            Cell::new(&prices.symbol),
            numeric(fmt(last_close, 4)),
            numeric(fmt(short.last_defined(), 4)),
            numeric(fmt(long.last_defined(), 4)),
            numeric(fmt_pct(performance.total_return())),
        ]);
    }
    println!("\nLatest values\n{latest}");
}

/// Writes the whole bundle as pretty JSON to `output`, or to stdout.
pub fn write_json(bundle: &AnalysisBundle, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, bundle)
                .context("Failed to serialize the analysis bundle")?;
            writer.flush()?;
            tracing::info!(path = %path.display(), "Analysis written.");
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, bundle)
                .context("Failed to serialize the analysis bundle")?;
            writeln!(handle)?;
        }
    }
    Ok(())
}

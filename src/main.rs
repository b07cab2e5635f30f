use anyhow::Context;
use api_client::YahooClient;
use clap::{Parser, Subcommand, ValueEnum};
use configuration::{AnalysisOverrides, DEFAULT_SYMBOLS, load_config};
use indicatif::ProgressStyle;
use pipeline::{AnalysisOutcome, AnalysisRequest};
use std::path::PathBuf;
use tracing::Instrument;
use tracing_indicatif::span_ext::IndicatifSpanExt;

mod render;

/// The main entry point for the Coinscope analytics application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A .env file is optional; real environment variables take precedence.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => handle_analyze(args).await,
        Commands::Symbols(args) => handle_symbols(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Comparative analytics over the daily history of several crypto assets.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch daily history and compute correlations, moving averages and performance.
    Analyze(AnalyzeArgs),
    /// List the symbol universe of the active configuration.
    Symbols(SymbolsArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    #[command(flatten)]
    overrides: AnalysisOverrides,

    /// How the results are presented.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Write JSON output to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Path to a configuration file (default: ./config.toml if present).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct SymbolsArgs {
    /// Path to a configuration file (default: ./config.toml if present).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

// ==============================================================================
// Analyze Command Logic
// ==============================================================================

/// Loads configuration, runs the pipeline against Yahoo Finance and renders the result.
async fn handle_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref()).context("Failed to load configuration")?;

    // Held until the end of main so buffered file logs are flushed.
    let _log_guard =
        configuration::init_tracing(&config.logging).context("Failed to initialize logging")?;

    config.analysis.apply_overrides(args.overrides);
    config
        .validate()
        .context("Invalid analysis parameters")?;
    for warning in config.warnings() {
        tracing::warn!("{warning}");
    }

    let request = AnalysisRequest::from_settings(&config.analysis);
    let client = YahooClient::new(&config.provider).context("Failed to build the HTTP client")?;

    let span = tracing::info_span!("analyze");
    span.pb_set_style(&ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] {msg}",
    )?);
    span.pb_set_message(&format!(
        "Analyzing {} symbols from {} to {}",
        request.symbols.len(),
        request.start_date,
        request.end_date
    ));

    let outcome = pipeline::run(&request, &client)
        .instrument(span)
        .await
        .context("Analysis run failed")?;

    let bundle = match outcome {
        AnalysisOutcome::NoAnalysis => {
            tracing::warn!("Please select at least one symbol to analyze.");
            return Ok(());
        }
        AnalysisOutcome::Completed(bundle) => bundle,
    };

    match args.format {
        OutputFormat::Table => render::print_tables(&bundle),
        OutputFormat::Json => render::write_json(&bundle, args.output.as_deref())?,
    }

    Ok(())
}

/// Prints the configured symbols, marking those outside the built-in default set.
fn handle_symbols(args: SymbolsArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;

    for symbol in &config.analysis.symbols {
        if DEFAULT_SYMBOLS.contains(&symbol.as_str()) {
            println!("{symbol}");
        } else {
            println!("{symbol} (custom)");
        }
    }
    Ok(())
}

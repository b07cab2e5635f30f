//! # Coinscope Analytics Engine
//!
//! This crate turns the raw daily history of several assets into a comparative
//! analytics bundle: aligned prices and volumes, simple returns, a correlation
//! matrix with a ranked pair list, two moving averages per asset, a normalized
//! performance view and summary statistics.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no I/O and no async. It depends only on `core-types`.
//! - **Stateless calculation:** `AnalyticsEngine` takes fetched series as input
//!   and produces an `AnalysisReport`. Every stage is a plain function over the
//!   aligned table and can be used on its own.
//! - **Missing is not zero:** absent observations, undersized windows and flat
//!   series produce `None` values that flow through every downstream stage.
//!
//! ## Public API
//!
//! - `AnalyticsEngine` / `AnalysisParams`: runs every stage in order.
//! - `AnalysisReport`: the bundle of all outputs.
//! - The stage functions: `align`, `calculate_returns`, `correlation_matrix`,
//!   `rank_pairs`, `moving_averages`, `normalize_performance`, `summarize`.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod aligner;
pub mod correlation;
pub mod engine;
pub mod error;
pub mod moving_average;
pub mod performance;
pub mod report;
pub mod returns;
pub mod summary;
pub mod table;

// Re-export the key components to create a clean, public-facing API.
pub use aligner::align;
pub use correlation::{CorrelationMatrix, RankedPair, correlation_matrix, pearson, rank_pairs};
pub use engine::{AnalysisParams, AnalyticsEngine};
pub use error::AnalyticsError;
pub use moving_average::{MovingAverageSeries, moving_averages};
pub use performance::{PerformanceSeries, normalize_performance};
pub use report::AnalysisReport;
pub use returns::{ReturnColumn, ReturnTable, calculate_returns};
pub use summary::{SummaryStatistics, summarize};
pub use table::{AlignedPriceTable, AlignedTable, AlignedVolumeTable, Column};

use crate::correlation::{CorrelationMatrix, RankedPair};
use crate::moving_average::MovingAverageSeries;
use crate::performance::PerformanceSeries;
use crate::returns::ReturnTable;
use crate::summary::SummaryStatistics;
use crate::table::{AlignedPriceTable, AlignedVolumeTable};
use serde::Serialize;

/// Every structure derived from one set of fetched series.
///
/// This struct is the final output of the `AnalyticsEngine`. All of its parts
/// share the same symbol set, and every date axis in it is a subset of
/// `prices.dates`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    // I. Aligned inputs
    pub prices: AlignedPriceTable,
    pub volumes: AlignedVolumeTable,
    pub summary: Vec<SummaryStatistics>,

    // II. Returns and correlation
    pub returns: ReturnTable,
    pub correlation: CorrelationMatrix,
    pub ranked_pairs: Vec<RankedPair>,

    // III. Per-symbol overlays
    pub short_moving_averages: Vec<MovingAverageSeries>,
    pub long_moving_averages: Vec<MovingAverageSeries>,
    pub performance: Vec<PerformanceSeries>,
}

impl AnalysisReport {
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.prices.symbols()
    }
}

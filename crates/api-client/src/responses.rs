use serde::Deserialize;

// Shapes of the `/v8/finance/chart/{symbol}` payload. Every array is
// index-aligned with `timestamp`, and individual slots may be null.

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    /// Absent when the requested range holds no bars.
    pub timestamp: Option<Vec<i64>>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    pub quote: Vec<Quote>,
    #[serde(rename = "adjclose")]
    pub adj_close: Option<Vec<AdjClose>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct AdjClose {
    #[serde(rename = "adjclose", default)]
    pub adj_close: Vec<Option<f64>>,
}

//! Pairwise correlation of returns and the ranked pair list built from it.
//!
//! Correlations that cannot be computed (too few rows, a flat return series)
//! are `None` everywhere: in the matrix, in the ranking, and in serialized
//! output. They are never reported as 0 or 1.

use crate::returns::ReturnTable;
use core_types::PairMode;
use serde::Serialize;
use std::cmp::Ordering;

/// Square, symmetric matrix of return correlations indexed by `symbols` on both axes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub symbols: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
    /// Number of return rows the correlations were computed over.
    pub observations: usize,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        self.values[i][j]
    }

    fn index_of(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }
}

/// One entry of the ranked pair list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPair {
    pub first: String,
    pub second: String,
    pub correlation: Option<f64>,
}

/// Spread below which values are considered equal, relative to their magnitude.
///
/// Returns derived from proportional price series differ only by a few ulps,
/// and that noise must not be mistaken for variance.
const RELATIVE_TOLERANCE: f64 = 1e-12;

/// Pearson correlation coefficient of two equally long series.
///
/// Returns `None` for fewer than two points, mismatched lengths, or when
/// either series has zero variance (within `RELATIVE_TOLERANCE`). The result
/// is clamped to `[-1, 1]`.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    if is_flat(x) || is_flat(y) {
        return None;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    let corr = cov / (var_x.sqrt() * var_y.sqrt());
    corr.is_finite().then(|| corr.clamp(-1.0, 1.0))
}

fn magnitude(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc: f64, v| acc.max(v.abs()))
}

/// True when every value lies within the tolerance of every other.
fn is_flat(values: &[f64]) -> bool {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    max - min <= RELATIVE_TOLERANCE * magnitude(values)
}

/// True when the two series agree element-wise within the tolerance.
fn is_identical(x: &[f64], y: &[f64]) -> bool {
    let tolerance = RELATIVE_TOLERANCE * magnitude(x).max(magnitude(y));
    x.len() == y.len() && x.iter().zip(y).all(|(a, b)| (a - b).abs() <= tolerance)
}

/// Correlation between two return series, including a series with itself.
///
/// Series that are identical within the tolerance move together perfectly
/// and score 1, even when they are flat and Pearson is undefined (one price
/// series being a constant multiple of another with a constant growth rate).
/// Otherwise a flat series correlates as undefined.
fn pair_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() >= 2 && is_identical(x, y) {
        return Some(1.0);
    }
    pearson(x, y)
}

/// Builds the correlation matrix of every pair of return columns.
///
/// Only the upper triangle is computed; the lower one is mirrored from it, so
/// the result is symmetric by construction. The diagonal follows the same rule
/// as identical columns: 1 whenever there are at least two rows.
pub fn correlation_matrix(returns: &ReturnTable) -> CorrelationMatrix {
    let n = returns.columns.len();
    let mut values = vec![vec![None; n]; n];

    for i in 0..n {
        let x = &returns.columns[i].values;
        values[i][i] = pair_correlation(x, x);
        for j in (i + 1)..n {
            let corr = pair_correlation(x, &returns.columns[j].values);
            values[i][j] = corr;
            values[j][i] = corr;
        }
    }

    let undefined = values
        .iter()
        .enumerate()
        .flat_map(|(i, row)| row.iter().skip(i + 1))
        .filter(|v| v.is_none())
        .count();
    if undefined > 0 {
        tracing::warn!(
            undefined_pairs = undefined,
            rows = returns.row_count(),
            "Some correlations are undefined (flat return series or too few rows)."
        );
    }

    CorrelationMatrix {
        symbols: returns.columns.iter().map(|c| c.symbol.clone()).collect(),
        values,
        observations: returns.row_count(),
    }
}

/// Orders pairs by correlation, highest first, undefined last; ties fall back
/// to the lexical order of (first, second).
fn compare_pairs(a: &RankedPair, b: &RankedPair) -> Ordering {
    let by_correlation = match (a.correlation, b.correlation) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_correlation
        .then_with(|| a.first.cmp(&b.first))
        .then_with(|| a.second.cmp(&b.second))
}

/// Ranks symbol pairs by their correlation.
///
/// With `PairMode::Ordered` every ordered pair (A, B) with A != B is listed,
/// so both (A, B) and (B, A) appear with the same value and the list holds
/// n·(n−1) entries. `PairMode::Unordered` keeps only the entry whose first
/// symbol sorts lower, n·(n−1)/2 entries.
pub fn rank_pairs(matrix: &CorrelationMatrix, mode: PairMode) -> Vec<RankedPair> {
    let mut pairs = Vec::new();
    for (i, first) in matrix.symbols.iter().enumerate() {
        for (j, second) in matrix.symbols.iter().enumerate() {
            if i == j {
                continue;
            }
            if mode == PairMode::Unordered && first > second {
                continue;
            }
            pairs.push(RankedPair {
                first: first.clone(),
                second: second.clone(),
                correlation: matrix.values[i][j],
            });
        }
    }

    pairs.sort_by(compare_pairs);
    pairs
}

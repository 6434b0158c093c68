// Percent-of-average normalization.
//
// Both value columns are rescaled so that 100 is the mean of the merged
// population. The mean is taken over analyzable players only, so the basis
// moves with match coverage.

use tracing::info;

use crate::error::{AnalysisError, ValueColumn};
use crate::valuation::merge::MergedRow;

/// Means used to normalize one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationBasis {
    pub perceived_mean: f64,
    pub forecasted_mean: f64,
    pub rows: usize,
}

/// A merged row with both values expressed as percent of the field average.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub row: MergedRow,
    pub perceived_normalized: f64,
    pub forecasted_normalized: f64,
}

fn mean(values: impl Iterator<Item = f64>) -> (f64, usize) {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        (0.0, 0)
    } else {
        (sum / n as f64, n)
    }
}

/// Compute the normalization basis for a merged row set.
///
/// Fails with `DegenerateBasis` when the set is empty or either mean is not
/// strictly positive.
pub fn normalization_basis(rows: &[MergedRow]) -> Result<NormalizationBasis, AnalysisError> {
    let (perceived_mean, n) = mean(rows.iter().map(|r| r.perceived_value));
    let (forecasted_mean, _) = mean(rows.iter().map(|r| r.forecasted_value));

    for (column, m) in [
        (ValueColumn::Perceived, perceived_mean),
        (ValueColumn::Forecasted, forecasted_mean),
    ] {
        if n == 0 || !m.is_finite() || m <= 0.0 {
            return Err(AnalysisError::DegenerateBasis {
                column,
                rows: n,
                mean: m,
            });
        }
    }

    info!(
        "normalization basis over {} players: perceived mean {:.2}, forecasted mean {:.2}",
        n, perceived_mean, forecasted_mean
    );

    Ok(NormalizationBasis {
        perceived_mean,
        forecasted_mean,
        rows: n,
    })
}

/// Rescale rows against a precomputed basis.
pub fn normalize_with(rows: &[MergedRow], basis: &NormalizationBasis) -> Vec<NormalizedRow> {
    rows.iter()
        .map(|r| NormalizedRow {
            row: r.clone(),
            perceived_normalized: r.perceived_value / basis.perceived_mean * 100.0,
            forecasted_normalized: r.forecasted_value / basis.forecasted_mean * 100.0,
        })
        .collect()
}

/// Compute the basis for `rows` and rescale them.
pub fn normalize(rows: &[MergedRow]) -> Result<Vec<NormalizedRow>, AnalysisError> {
    let basis = normalization_basis(rows)?;
    Ok(normalize_with(rows, &basis))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

// League-wide aggregates over classified rows.

use serde::Serialize;

use crate::valuation::{ValuationRow, ValueCategory};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_players: usize,
    pub undervalued_count: usize,
    pub overvalued_count: usize,
    pub fair_value_count: usize,
    /// Merged players left out because their divergence was undefined.
    pub undefined_count: usize,
    pub avg_discount_premium: Option<f64>,
    /// Largest discount_premium (most undervalued).
    pub max_discount: Option<f64>,
    /// Smallest discount_premium (most overvalued).
    pub max_premium: Option<f64>,
}

impl SummaryStats {
    /// Share of classified players in `category`, in percent.
    pub fn percent_of(&self, category: ValueCategory) -> f64 {
        if self.total_players == 0 {
            return 0.0;
        }
        let count = match category {
            ValueCategory::Undervalued => self.undervalued_count,
            ValueCategory::FairValue => self.fair_value_count,
            ValueCategory::Overvalued => self.overvalued_count,
        };
        count as f64 / self.total_players as f64 * 100.0
    }
}

/// Aggregate `rows`. The divergence statistics are `None` when there are no
/// rows.
pub fn summarize(rows: &[ValuationRow], undefined_count: usize) -> SummaryStats {
    let count = |category: ValueCategory| rows.iter().filter(|r| r.value_category == category).count();

    let (avg, max, min) = if rows.is_empty() {
        (None, None, None)
    } else {
        let values = rows.iter().map(|r| r.discount_premium);
        let sum: f64 = values.clone().sum();
        let max = values.clone().fold(f64::NEG_INFINITY, f64::max);
        let min = values.fold(f64::INFINITY, f64::min);
        (Some(sum / rows.len() as f64), Some(max), Some(min))
    };

    SummaryStats {
        total_players: rows.len(),
        undervalued_count: count(ValueCategory::Undervalued),
        overvalued_count: count(ValueCategory::Overvalued),
        fair_value_count: count(ValueCategory::FairValue),
        undefined_count,
        avg_discount_premium: avg,
        max_discount: max,
        max_premium: min,
    }
}

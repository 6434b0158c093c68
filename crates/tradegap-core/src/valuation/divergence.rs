// Discount/premium divergence and its categorical bands.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::config::{AnalysisConfig, InterpretationBands};
use crate::valuation::normalize::NormalizedRow;
use crate::valuation::ValuationRow;

/// Forecasts at or below this normalized value have no defined divergence.
const FORECAST_EPSILON: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Three-way market verdict driven by the configured thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueCategory {
    Undervalued,
    #[serde(rename = "Fair Value")]
    FairValue,
    Overvalued,
}

impl ValueCategory {
    /// Strictly above the discount threshold is Undervalued, strictly below
    /// the premium threshold is Overvalued, everything else is Fair Value.
    pub fn from_discount(discount_premium: f64, config: &AnalysisConfig) -> Self {
        if discount_premium > config.discount_threshold {
            ValueCategory::Undervalued
        } else if discount_premium < config.premium_threshold {
            ValueCategory::Overvalued
        } else {
            ValueCategory::FairValue
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ValueCategory::Undervalued => "Undervalued",
            ValueCategory::FairValue => "Fair Value",
            ValueCategory::Overvalued => "Overvalued",
        }
    }
}

/// Five-way display bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interpretation {
    #[serde(rename = "Severely undervalued - BUY")]
    SeverelyUndervalued,
    #[serde(rename = "Undervalued - Good buy target")]
    Undervalued,
    #[serde(rename = "Fair value")]
    Fair,
    #[serde(rename = "Overvalued - Good sell candidate")]
    Overvalued,
    #[serde(rename = "Severely overvalued - SELL")]
    SeverelyOvervalued,
}

impl Interpretation {
    pub fn from_discount(discount_premium: f64, bands: &InterpretationBands) -> Self {
        if discount_premium > bands.severe_discount {
            Interpretation::SeverelyUndervalued
        } else if discount_premium > bands.discount {
            Interpretation::Undervalued
        } else if discount_premium > bands.fair {
            Interpretation::Fair
        } else if discount_premium > bands.premium {
            Interpretation::Overvalued
        } else {
            Interpretation::SeverelyOvervalued
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Interpretation::SeverelyUndervalued => "Severely undervalued - BUY",
            Interpretation::Undervalued => "Undervalued - Good buy target",
            Interpretation::Fair => "Fair value",
            Interpretation::Overvalued => "Overvalued - Good sell candidate",
            Interpretation::SeverelyOvervalued => "Severely overvalued - SELL",
        }
    }
}

// ---------------------------------------------------------------------------
// Divergence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DivergenceError {
    #[error("divergence undefined for '{player_name}': forecasted_normalized is {forecasted_normalized}")]
    UndefinedDivergence {
        player_name: String,
        forecasted_normalized: f64,
    },
}

/// `(forecasted_normalized - perceived_normalized) / forecasted_normalized * 100`
pub fn discount_premium(row: &NormalizedRow) -> Result<f64, DivergenceError> {
    let f = row.forecasted_normalized;
    if !f.is_finite() || f <= FORECAST_EPSILON {
        return Err(DivergenceError::UndefinedDivergence {
            player_name: row.row.player_name.clone(),
            forecasted_normalized: f,
        });
    }
    Ok((f - row.perceived_normalized) / f * 100.0)
}

/// Attach divergence, category and interpretation to a normalized row.
pub fn classify(row: &NormalizedRow, config: &AnalysisConfig) -> Result<ValuationRow, DivergenceError> {
    let dp = discount_premium(row)?;
    let r = &row.row;
    Ok(ValuationRow {
        player_name: r.player_name.clone(),
        position: r.position,
        team_name: r.team_name.clone(),
        team_id: r.team_id.clone(),
        perceived_value_raw: r.perceived_value_raw,
        perceived_value: r.perceived_value,
        perceived_normalized: row.perceived_normalized,
        forecasted_value: r.forecasted_value,
        forecasted_normalized: row.forecasted_normalized,
        discount_premium: dp,
        value_category: ValueCategory::from_discount(dp, config),
        interpretation: Interpretation::from_discount(dp, &config.interpretation),
        overall_rank: r.overall_rank,
        position_rank: r.position_rank,
    })
}

/// Classify every row. Rows with undefined divergence are left out and
/// returned separately by player name.
pub fn classify_all(rows: &[NormalizedRow], config: &AnalysisConfig) -> (Vec<ValuationRow>, Vec<String>) {
    let mut classified = Vec::with_capacity(rows.len());
    let mut undefined = Vec::new();

    for row in rows {
        match classify(row, config) {
            Ok(v) => classified.push(v),
            Err(e) => {
                warn!("excluding from classification: {}", e);
                undefined.push(row.row.player_name.clone());
            }
        }
    }

    (classified, undefined)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Position;
    use crate::valuation::merge::MergedRow;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn normalized(name: &str, perceived_normalized: f64, forecasted_normalized: f64) -> NormalizedRow {
        NormalizedRow {
            row: MergedRow {
                player_name: name.into(),
                position: Position::RunningBack,
                team_name: "TeamX".into(),
                team_id: Some("1".into()),
                perceived_value_raw: perceived_normalized,
                perceived_value: perceived_normalized,
                forecasted_value: forecasted_normalized,
                overall_rank: Some(4),
                position_rank: Some(2),
            },
            perceived_normalized,
            forecasted_normalized,
        }
    }

    #[test]
    fn discount_formula() {
        let dp = discount_premium(&normalized("Alice", 400.0 / 3.0, 50.0)).unwrap();
        assert!(approx_eq(dp, -166.667, 0.001));

        let dp = discount_premium(&normalized("Bob", 200.0 / 3.0, 150.0)).unwrap();
        assert!(approx_eq(dp, 55.556, 0.001));

        let dp = discount_premium(&normalized("Even", 100.0, 100.0)).unwrap();
        assert!(approx_eq(dp, 0.0, 1e-9));
    }

    #[test]
    fn zero_forecast_is_undefined() {
        let err = discount_premium(&normalized("Hurt", 80.0, 0.0)).unwrap_err();
        assert_eq!(
            err,
            DivergenceError::UndefinedDivergence {
                player_name: "Hurt".into(),
                forecasted_normalized: 0.0,
            }
        );
    }

    #[test]
    fn category_thresholds_are_strict() {
        let config = AnalysisConfig::default();
        assert_eq!(ValueCategory::from_discount(15.0, &config), ValueCategory::Undervalued);
        assert_eq!(ValueCategory::from_discount(10.0, &config), ValueCategory::FairValue);
        assert_eq!(ValueCategory::from_discount(0.0, &config), ValueCategory::FairValue);
        assert_eq!(ValueCategory::from_discount(-10.0, &config), ValueCategory::FairValue);
        assert_eq!(ValueCategory::from_discount(-10.5, &config), ValueCategory::Overvalued);
    }

    #[test]
    fn category_follows_custom_thresholds() {
        let config = AnalysisConfig {
            discount_threshold: 25.0,
            premium_threshold: -5.0,
            ..AnalysisConfig::default()
        };
        assert_eq!(ValueCategory::from_discount(20.0, &config), ValueCategory::FairValue);
        assert_eq!(ValueCategory::from_discount(-6.0, &config), ValueCategory::Overvalued);
    }

    #[test]
    fn interpretation_buckets() {
        let bands = InterpretationBands::default();
        assert_eq!(Interpretation::from_discount(55.0, &bands), Interpretation::SeverelyUndervalued);
        assert_eq!(Interpretation::from_discount(30.0, &bands), Interpretation::Undervalued);
        assert_eq!(Interpretation::from_discount(10.0, &bands), Interpretation::Fair);
        assert_eq!(Interpretation::from_discount(-10.0, &bands), Interpretation::Overvalued);
        assert_eq!(Interpretation::from_discount(-30.0, &bands), Interpretation::SeverelyOvervalued);
    }

    #[test]
    fn interpretation_is_independent_of_category() {
        // Wider category band, default interpretation bands.
        let config = AnalysisConfig {
            discount_threshold: 40.0,
            premium_threshold: -40.0,
            ..AnalysisConfig::default()
        };
        let row = classify(&normalized("Mid", 75.0, 100.0), &config).unwrap();
        assert!(approx_eq(row.discount_premium, 25.0, 1e-9));
        assert_eq!(row.value_category, ValueCategory::FairValue);
        assert_eq!(row.interpretation, Interpretation::Undervalued);
    }

    #[test]
    fn classify_carries_row_fields() {
        let row = classify(&normalized("Bob", 50.0, 150.0), &AnalysisConfig::default()).unwrap();
        assert_eq!(row.player_name, "Bob");
        assert_eq!(row.team_id.as_deref(), Some("1"));
        assert_eq!(row.overall_rank, Some(4));
        assert_eq!(row.value_category, ValueCategory::Undervalued);
        assert_eq!(row.interpretation, Interpretation::SeverelyUndervalued);
    }

    #[test]
    fn classify_all_sets_aside_undefined_rows() {
        let rows = vec![
            normalized("Fine", 90.0, 110.0),
            normalized("Zero", 50.0, 0.0),
        ];
        let (classified, undefined) = classify_all(&rows, &AnalysisConfig::default());
        assert_eq!(classified.len(), 1);
        assert_eq!(classified[0].player_name, "Fine");
        assert_eq!(undefined, vec!["Zero".to_string()]);
    }

    #[test]
    fn labels() {
        assert_eq!(ValueCategory::FairValue.label(), "Fair Value");
        assert_eq!(Interpretation::SeverelyOvervalued.label(), "Severely overvalued - SELL");
    }
}

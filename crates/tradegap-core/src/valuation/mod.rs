// Valuation pipeline: merge -> normalize -> classify. Each stage takes the
// previous stage's rows by reference and returns new rows.

pub mod divergence;
pub mod merge;
pub mod normalize;

use serde::Serialize;

use crate::player::Position;
pub use divergence::{Interpretation, ValueCategory};

/// A fully analyzed player: merged, normalized and classified.
///
/// Field order is the column order of exported tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationRow {
    pub player_name: String,
    pub position: Position,
    pub team_name: String,
    pub team_id: Option<String>,
    pub perceived_value_raw: f64,
    pub perceived_value: f64,
    pub perceived_normalized: f64,
    pub forecasted_value: f64,
    pub forecasted_normalized: f64,
    pub discount_premium: f64,
    pub value_category: ValueCategory,
    pub interpretation: Interpretation,
    pub overall_rank: Option<u32>,
    pub position_rank: Option<u32>,
}

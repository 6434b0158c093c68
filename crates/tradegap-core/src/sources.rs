// Input tables consumed by the engine and the source-side adjustments made
// before a run: positional scarcity, ADP conversion, recent-form blending.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::config::{AnalysisConfig, ForecastConfig};
use crate::player::{PlayerIdentity, Position};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One rostered player: who owns them and where they play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player_name: String,
    pub position: Position,
    pub team_name: String,
    /// Provider team id; opaque to the engine.
    #[serde(default)]
    pub team_id: Option<String>,
}

/// Market trade value for a player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerceivedValue {
    pub player_name: String,
    pub position: Position,
    pub perceived_value: f64,
    /// Adjusted value (e.g. after a scarcity multiplier). Supersedes
    /// `perceived_value` when present.
    #[serde(default)]
    pub perceived_value_adjusted: Option<f64>,
    #[serde(default)]
    pub overall_rank: Option<u32>,
    #[serde(default)]
    pub position_rank: Option<u32>,
}

impl PerceivedValue {
    /// The value every downstream stage uses.
    pub fn effective_value(&self) -> f64 {
        self.perceived_value_adjusted.unwrap_or(self.perceived_value)
    }
}

/// Expected future output for a player.
///
/// ESPN-sourced tables label the value `rest_of_season_projection`; both
/// labels deserialize into `forecasted_value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastedValue {
    pub player_name: String,
    #[serde(alias = "rest_of_season_projection")]
    pub forecasted_value: f64,
}

/// Average points per game over the last few weeks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentPerformance {
    pub player_name: String,
    pub recent_avg: f64,
}

/// Average draft position, used as a stand-in for market value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdpEntry {
    pub player_name: String,
    pub position: Position,
    pub adp: f64,
}

/// The three tables one analysis run needs.
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub roster: Vec<RosterEntry>,
    pub perceived: Vec<PerceivedValue>,
    pub forecasted: Vec<ForecastedValue>,
}

// ---------------------------------------------------------------------------
// Positional scarcity
// ---------------------------------------------------------------------------

/// Fill in `perceived_value_adjusted` from the configured per-position
/// scarcity multipliers.
///
/// Rows that already carry an adjusted value keep it. Positions without a
/// multiplier are left unadjusted (equivalent to a multiplier of 1.0).
pub fn apply_scarcity(perceived: &[PerceivedValue], config: &AnalysisConfig) -> Vec<PerceivedValue> {
    perceived
        .iter()
        .map(|row| {
            let mut row = row.clone();
            if row.perceived_value_adjusted.is_none() {
                if let Some(multiplier) = config.scarcity_multiplier(row.position) {
                    row.perceived_value_adjusted = Some(row.perceived_value * multiplier);
                }
            }
            row
        })
        .collect()
}

// ---------------------------------------------------------------------------
// ADP fallback
// ---------------------------------------------------------------------------

/// Value points given to the first overall pick.
const ADP_VALUE_CEILING: f64 = 1000.0;
/// Value points lost per draft slot.
const ADP_VALUE_PER_PICK: f64 = 5.0;

/// Convert ADP into a perceived value: `max(1000 - 5 * adp, 0)`.
///
/// Overall rank follows ADP order. Entries with a non-finite or negative ADP
/// are skipped.
pub fn perceived_from_adp(entries: &[AdpEntry]) -> Vec<PerceivedValue> {
    let mut valid: Vec<&AdpEntry> = entries
        .iter()
        .filter(|e| {
            let ok = e.adp.is_finite() && e.adp >= 0.0;
            if !ok {
                warn!("skipping ADP entry for '{}': invalid ADP {}", e.player_name, e.adp);
            }
            ok
        })
        .collect();
    valid.sort_by(|a, b| a.adp.total_cmp(&b.adp));

    valid
        .into_iter()
        .enumerate()
        .map(|(i, e)| PerceivedValue {
            player_name: e.player_name.clone(),
            position: e.position,
            perceived_value: (ADP_VALUE_CEILING - e.adp * ADP_VALUE_PER_PICK).max(0.0),
            perceived_value_adjusted: None,
            overall_rank: Some(i as u32 + 1),
            position_rank: None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Recent-form blending
// ---------------------------------------------------------------------------

/// Blend rest-of-season projections with recent per-game scoring:
///
/// `projection * (1 - w) + recent_avg * weeks_remaining * w`
///
/// Players with no recent entry keep their projection. When a player has
/// several recent entries the last one wins.
pub fn blend_recent_performance(
    projections: &[ForecastedValue],
    recent: &[RecentPerformance],
    forecast: &ForecastConfig,
) -> Vec<ForecastedValue> {
    if recent.is_empty() {
        return projections.to_vec();
    }

    let mut recent_by_id: HashMap<PlayerIdentity, f64> = HashMap::new();
    for entry in recent {
        if !entry.recent_avg.is_finite() {
            warn!("ignoring recent average for '{}': non-finite value", entry.player_name);
            continue;
        }
        recent_by_id.insert(PlayerIdentity::from_name(&entry.player_name), entry.recent_avg);
    }

    let w = forecast.recent_weight;
    let mut blended_count = 0usize;
    let blended = projections
        .iter()
        .map(|p| match recent_by_id.get(&PlayerIdentity::from_name(&p.player_name)) {
            Some(&avg) => {
                blended_count += 1;
                ForecastedValue {
                    player_name: p.player_name.clone(),
                    forecasted_value: (p.forecasted_value * (1.0 - w)
                        + avg * forecast.weeks_remaining * w)
                        .max(0.0),
                }
            }
            None => p.clone(),
        })
        .collect();

    debug!(
        "blended recent form into {} of {} projections (weight {})",
        blended_count,
        projections.len(),
        w
    );
    blended
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

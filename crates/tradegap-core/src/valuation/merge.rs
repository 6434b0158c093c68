// Joining the roster with both value tables.
//
// Roster rows drive the join. A roster player survives only when both a
// perceived and a forecasted value exist for their identity key; everyone
// else is dropped here and never reaches normalization.

use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::error::{AnalysisError, SourceTable};
use crate::player::{PlayerIdentity, Position};
use crate::sources::{ForecastedValue, PerceivedValue, RosterEntry};

/// A rostered player with both values attached, not yet normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedRow {
    pub player_name: String,
    pub position: Position,
    pub team_name: String,
    pub team_id: Option<String>,
    /// Perceived value as the provider reported it.
    pub perceived_value_raw: f64,
    /// Effective perceived value (adjusted when an adjustment was supplied).
    pub perceived_value: f64,
    pub forecasted_value: f64,
    pub overall_rank: Option<u32>,
    pub position_rank: Option<u32>,
}

/// Values must be finite and non-negative to take part in a join.
fn usable(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Index a value table by identity key. Later rows replace earlier ones.
fn index_by_identity<'a, T>(
    rows: &'a [T],
    table: SourceTable,
    name_of: impl Fn(&T) -> &str,
    value_of: impl Fn(&T) -> f64,
) -> HashMap<PlayerIdentity, &'a T> {
    let mut index = HashMap::with_capacity(rows.len());
    for row in rows {
        let name = name_of(row);
        let id = PlayerIdentity::from_name(name);
        if id.is_empty() {
            warn!("skipping {} row with unusable player name '{}'", table, name);
            continue;
        }
        let value = value_of(row);
        if !usable(value) {
            warn!("skipping {} row for '{}': invalid value {}", table, name, value);
            continue;
        }
        if index.insert(id, row).is_some() {
            warn!("duplicate {} entry for '{}', using latest value", table, name);
        }
    }
    index
}

/// Join roster → perceived → forecasted on player identity.
///
/// Fails with `MissingSourceData` when any table is empty, and with
/// `NoCompleteMatches` when no roster player matched both value tables.
pub fn merge(
    roster: &[RosterEntry],
    perceived: &[PerceivedValue],
    forecasted: &[ForecastedValue],
) -> Result<Vec<MergedRow>, AnalysisError> {
    for (table, len) in [
        (SourceTable::Roster, roster.len()),
        (SourceTable::Perceived, perceived.len()),
        (SourceTable::Forecasted, forecasted.len()),
    ] {
        if len == 0 {
            return Err(AnalysisError::MissingSourceData { table });
        }
    }

    let perceived_by_id = index_by_identity(
        perceived,
        SourceTable::Perceived,
        |p| p.player_name.as_str(),
        |p| p.effective_value(),
    );
    let forecast_by_id = index_by_identity(
        forecasted,
        SourceTable::Forecasted,
        |f| f.player_name.as_str(),
        |f| f.forecasted_value,
    );

    let mut perceived_matches = 0usize;
    let mut rows = Vec::new();

    for entry in roster {
        let id = PlayerIdentity::from_name(&entry.player_name);
        if id.is_empty() {
            warn!("skipping roster row with unusable player name '{}'", entry.player_name);
            continue;
        }

        let Some(perceived) = perceived_by_id.get(&id) else {
            debug!("no perceived value for '{}'", entry.player_name);
            continue;
        };
        perceived_matches += 1;

        let Some(forecast) = forecast_by_id.get(&id) else {
            debug!("no forecast for '{}'", entry.player_name);
            continue;
        };

        rows.push(MergedRow {
            player_name: entry.player_name.clone(),
            position: entry.position,
            team_name: entry.team_name.clone(),
            team_id: entry.team_id.clone(),
            perceived_value_raw: perceived.perceived_value,
            perceived_value: perceived.effective_value(),
            forecasted_value: forecast.forecasted_value,
            overall_rank: perceived.overall_rank,
            position_rank: perceived.position_rank,
        });
    }

    info!(
        "merged {} roster players: {} matched perceived values, {} with complete data",
        roster.len(),
        perceived_matches,
        rows.len()
    );

    if rows.is_empty() {
        return Err(AnalysisError::NoCompleteMatches {
            roster_players: roster.len(),
            perceived_matches,
            complete_matches: 0,
        });
    }

    Ok(rows)
}

/// Drop rows whose effective perceived value is below `floor`.
///
/// A floor of zero keeps everything. Fails when the floor removes every row.
pub fn apply_value_floor(rows: Vec<MergedRow>, floor: f64) -> Result<Vec<MergedRow>, AnalysisError> {
    if floor <= 0.0 {
        return Ok(rows);
    }

    let candidates = rows.len();
    let kept: Vec<MergedRow> = rows
        .into_iter()
        .filter(|r| r.perceived_value >= floor)
        .collect();

    if kept.len() < candidates {
        info!(
            "dropped {} players below perceived value floor {}",
            candidates - kept.len(),
            floor
        );
    }

    if kept.is_empty() {
        return Err(AnalysisError::BelowValueFloor { floor, candidates });
    }
    Ok(kept)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

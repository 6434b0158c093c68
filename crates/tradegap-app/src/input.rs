// Source table loading from CSV.
//
// Each table has a reader-based loader (tested without temp files) and a
// path-based wrapper. Malformed rows are skipped with a warning; an empty
// table is returned as-is and rejected later by the analysis with a
// table-specific error.

use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use tradegap_core::config::ForecastConfig;
use tradegap_core::sources::{
    blend_recent_performance, perceived_from_adp, AdpEntry, ForecastedValue, PerceivedValue,
    RecentPerformance, RosterEntry, SourceTables,
};
use tradegap_core::Position;

use crate::config::DataPaths;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parse error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

// ---------------------------------------------------------------------------
// Raw CSV rows
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawRoster {
    player_name: String,
    position: String,
    team_name: String,
    #[serde(default)]
    team_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPerceived {
    player_name: String,
    position: String,
    perceived_value: f64,
    #[serde(default)]
    perceived_value_adjusted: Option<f64>,
    #[serde(default)]
    overall_rank: Option<u32>,
    #[serde(default)]
    position_rank: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    player_name: String,
    #[serde(alias = "rest_of_season_projection")]
    forecasted_value: f64,
}

#[derive(Debug, Deserialize)]
struct RawRecent {
    player_name: String,
    recent_avg: f64,
}

#[derive(Debug, Deserialize)]
struct RawAdp {
    player_name: String,
    position: String,
    adp: f64,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_position(table: &str, name: &str, raw: &str) -> Option<Position> {
    let position = Position::from_str_pos(raw);
    if position.is_none() {
        warn!("skipping {} row for '{}': unknown position '{}'", table, name, raw);
    }
    position
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Reader-based loaders
// ---------------------------------------------------------------------------

fn load_roster_from_reader<R: Read>(rdr: R) -> Result<Vec<RosterEntry>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut rows = Vec::new();
    for result in reader.deserialize::<RawRoster>() {
        match result {
            Ok(raw) => {
                let name = raw.player_name.trim();
                let Some(position) = parse_position("roster", name, &raw.position) else {
                    continue;
                };
                rows.push(RosterEntry {
                    player_name: name.to_string(),
                    position,
                    team_name: raw.team_name.trim().to_string(),
                    team_id: non_empty(raw.team_id),
                });
            }
            Err(e) => warn!("skipping malformed roster row: {}", e),
        }
    }
    Ok(rows)
}

fn load_perceived_from_reader<R: Read>(rdr: R) -> Result<Vec<PerceivedValue>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut rows = Vec::new();
    for result in reader.deserialize::<RawPerceived>() {
        match result {
            Ok(raw) => {
                let name = raw.player_name.trim();
                if !raw.perceived_value.is_finite() {
                    warn!("skipping perceived value for '{}': non-finite value", name);
                    continue;
                }
                let Some(position) = parse_position("perceived value", name, &raw.position) else {
                    continue;
                };
                rows.push(PerceivedValue {
                    player_name: name.to_string(),
                    position,
                    perceived_value: raw.perceived_value,
                    perceived_value_adjusted: raw.perceived_value_adjusted.filter(|v| v.is_finite()),
                    overall_rank: raw.overall_rank,
                    position_rank: raw.position_rank,
                });
            }
            Err(e) => warn!("skipping malformed perceived value row: {}", e),
        }
    }
    Ok(rows)
}

fn load_forecasts_from_reader<R: Read>(rdr: R) -> Result<Vec<ForecastedValue>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut rows = Vec::new();
    for result in reader.deserialize::<RawForecast>() {
        match result {
            Ok(raw) => {
                let name = raw.player_name.trim();
                if !raw.forecasted_value.is_finite() {
                    warn!("skipping forecast for '{}': non-finite value", name);
                    continue;
                }
                rows.push(ForecastedValue {
                    player_name: name.to_string(),
                    forecasted_value: raw.forecasted_value,
                });
            }
            Err(e) => warn!("skipping malformed forecast row: {}", e),
        }
    }
    Ok(rows)
}

fn load_recent_from_reader<R: Read>(rdr: R) -> Result<Vec<RecentPerformance>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut rows = Vec::new();
    for result in reader.deserialize::<RawRecent>() {
        match result {
            Ok(raw) => rows.push(RecentPerformance {
                player_name: raw.player_name.trim().to_string(),
                recent_avg: raw.recent_avg,
            }),
            Err(e) => warn!("skipping malformed recent performance row: {}", e),
        }
    }
    Ok(rows)
}

fn load_adp_from_reader<R: Read>(rdr: R) -> Result<Vec<AdpEntry>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut rows = Vec::new();
    for result in reader.deserialize::<RawAdp>() {
        match result {
            Ok(raw) => {
                let name = raw.player_name.trim();
                let Some(position) = parse_position("ADP", name, &raw.position) else {
                    continue;
                };
                rows.push(AdpEntry {
                    player_name: name.to_string(),
                    position,
                    adp: raw.adp,
                });
            }
            Err(e) => warn!("skipping malformed ADP row: {}", e),
        }
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<std::fs::File, InputError> {
    std::fs::File::open(path).map_err(|e| InputError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn csv_error(path: &Path) -> impl FnOnce(csv::Error) -> InputError + '_ {
    move |e| InputError::Csv {
        path: path.display().to_string(),
        source: e,
    }
}

pub fn load_roster(path: &Path) -> Result<Vec<RosterEntry>, InputError> {
    load_roster_from_reader(open(path)?).map_err(csv_error(path))
}

pub fn load_perceived(path: &Path) -> Result<Vec<PerceivedValue>, InputError> {
    load_perceived_from_reader(open(path)?).map_err(csv_error(path))
}

pub fn load_forecasts(path: &Path) -> Result<Vec<ForecastedValue>, InputError> {
    load_forecasts_from_reader(open(path)?).map_err(csv_error(path))
}

pub fn load_recent(path: &Path) -> Result<Vec<RecentPerformance>, InputError> {
    load_recent_from_reader(open(path)?).map_err(csv_error(path))
}

pub fn load_adp(path: &Path) -> Result<Vec<AdpEntry>, InputError> {
    load_adp_from_reader(open(path)?).map_err(csv_error(path))
}

/// Load all three source tables.
///
/// Perceived values fall back to the ADP table when the perceived CSV is
/// missing, unreadable or empty and an ADP path is configured. Forecasts are
/// blended with recent form when a recent path is configured.
pub fn load_tables(paths: &DataPaths, forecast: &ForecastConfig) -> Result<SourceTables, InputError> {
    let roster = load_roster(Path::new(&paths.roster))?;

    let perceived = match (load_perceived(Path::new(&paths.perceived)), &paths.adp) {
        (Ok(rows), _) if !rows.is_empty() => rows,
        (result, Some(adp_path)) => {
            match &result {
                Err(e) => warn!("perceived values unavailable ({}), falling back to ADP", e),
                Ok(_) => warn!("perceived value table is empty, falling back to ADP"),
            }
            perceived_from_adp(&load_adp(Path::new(adp_path))?)
        }
        (result, None) => result?,
    };

    let mut forecasted = load_forecasts(Path::new(&paths.forecasted))?;
    if let Some(recent_path) = &paths.recent {
        let recent = load_recent(Path::new(recent_path))?;
        forecasted = blend_recent_performance(&forecasted, &recent, forecast);
    }

    info!(
        "loaded {} roster rows, {} perceived values, {} forecasts",
        roster.len(),
        perceived.len(),
        forecasted.len()
    );

    Ok(SourceTables {
        roster,
        perceived,
        forecasted,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

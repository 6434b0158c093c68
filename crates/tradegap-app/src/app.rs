// One end-to-end run: load tables, analyze, pick the team, render, export.

use anyhow::Context;
use chrono::{DateTime, TimeZone};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

use tradegap_core::Analysis;

use crate::config::Config;
use crate::export::export_results;
use crate::input::load_tables;
use crate::report::{render_team_list, Report};

#[derive(Debug, Error, PartialEq)]
pub enum TeamSelectionError {
    #[error("no team configured; set league.my_team in config/tradegap.toml\n{known}")]
    NotConfigured { known: String },

    #[error("team '{team}' not found among analyzed players\n{known}")]
    NotFound { team: String, known: String },
}

/// Match the configured team against the analyzed teams.
///
/// Exact match first, then a case-insensitive one.
pub fn select_team<'a>(
    teams: &[&'a str],
    wanted: Option<&str>,
) -> Result<&'a str, TeamSelectionError> {
    let known = render_team_list(teams);
    let Some(wanted) = wanted.map(str::trim) else {
        return Err(TeamSelectionError::NotConfigured { known });
    };

    if let Some(team) = teams.iter().copied().find(|t| *t == wanted) {
        return Ok(team);
    }
    if let Some(team) = teams.iter().copied().find(|t| t.eq_ignore_ascii_case(wanted)) {
        warn!("team '{}' matched '{}' ignoring case", wanted, team);
        return Ok(team);
    }
    Err(TeamSelectionError::NotFound {
        team: wanted.to_string(),
        known,
    })
}

#[derive(Debug)]
pub struct RunOutput {
    pub team: String,
    pub report: String,
    pub exported: Vec<PathBuf>,
}

/// Run the full analysis described by `config`, stamping exports with `at`.
pub fn run<Tz: TimeZone>(config: &Config, at: &DateTime<Tz>) -> anyhow::Result<RunOutput>
where
    Tz::Offset: std::fmt::Display,
{
    let tables = load_tables(&config.data_paths, &config.forecast)
        .context("failed to load source tables")?;

    let analysis =
        Analysis::run(&tables, &config.analysis).context("failed to analyze source tables")?;

    let teams = analysis.teams();
    let team = select_team(&teams, config.league.my_team.as_deref())?;
    info!("analyzing trades for '{}'", team);

    let report = Report::build(
        &analysis,
        team,
        config.output.max_suggestions,
        config.output.max_targets_displayed,
    );

    let exported = export_results(
        analysis.rows(),
        report.suggestions(),
        &config.league.name,
        &config.output,
        at,
    )
    .context("failed to export results")?;

    Ok(RunOutput {
        team: team.to_string(),
        report: report.to_string(),
        exported,
    })
}

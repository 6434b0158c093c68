// Integration tests: CSV fixtures through loading, analysis, reporting and
// export, using the library crate's public API.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use tradegap_app::app::{self, TeamSelectionError};
use tradegap_app::config::Config;
use tradegap_app::input::load_tables;
use tradegap_core::{Analysis, ValueCategory};

// ===========================================================================
// Test helpers
// ===========================================================================

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture(name: &str) -> String {
    fixtures().join(name).display().to_string()
}

/// Config pointing at the fixtures. `extra_paths` is appended to
/// `[data_paths]`; `my_team` may be empty for "not configured".
fn make_config(my_team: &str, perceived: &str, extra_paths: &str, output_dir: &Path) -> Config {
    let team_line = if my_team.is_empty() {
        String::new()
    } else {
        format!("my_team = \"{my_team}\"")
    };
    let text = format!(
        r#"
[league]
name = "Fixture League"
{team_line}

[data_paths]
roster = '{roster}'
perceived = '{perceived}'
forecasted = '{forecasted}'
{extra_paths}

[output]
dir = '{dir}'
export_csv = true
export_json = true
"#,
        roster = fixture("rosters.csv"),
        forecasted = fixture("projections.csv"),
        dir = output_dir.display(),
    );
    toml::from_str(&text).unwrap()
}

fn stamp() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 2, 18, 30, 0).unwrap()
}

fn temp_output(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&dir);
    dir
}

// ===========================================================================
// Loading
// ===========================================================================

#[test]
fn fixtures_join_on_identity_and_drop_unmatched() {
    let out = temp_output("tradegap_pipeline_join");
    let config = make_config("Sharks", &fixture("trade_values.csv"), "", &out);
    let tables = load_tables(&config.data_paths, &config.forecast).unwrap();
    assert_eq!(tables.roster.len(), 11);

    let analysis = Analysis::run(&tables, &config.analysis).unwrap();
    // "Practice Squad" has no values; "Marvin Harrison Jr." joins "Marvin Harrison".
    assert_eq!(analysis.rows().len(), 10);
    assert!(analysis
        .rows()
        .iter()
        .any(|r| r.player_name == "Marvin Harrison Jr."));
    assert!(analysis.rows().iter().all(|r| r.player_name != "Practice Squad"));
    assert_eq!(analysis.teams(), vec!["Jets", "Owls", "Sharks"]);
}

#[test]
fn recent_form_blends_into_forecast() {
    let out = temp_output("tradegap_pipeline_recent");
    let recent = format!("recent = '{}'", fixture("recent.csv"));
    let config = make_config("Sharks", &fixture("trade_values.csv"), &recent, &out);
    let tables = load_tables(&config.data_paths, &config.forecast).unwrap();

    let bell_cow = tables
        .forecasted
        .iter()
        .find(|f| f.player_name == "Bell Cow")
        .unwrap();
    // 160 * 0.6 + 20 * 13 * 0.4
    assert!((bell_cow.forecasted_value - 200.0).abs() < 1e-9);
    let leg = tables.forecasted.iter().find(|f| f.player_name == "Leg").unwrap();
    assert!((leg.forecasted_value - 60.0).abs() < 1e-9);
}

#[test]
fn adp_fallback_when_perceived_missing() {
    let out = temp_output("tradegap_pipeline_adp");
    let adp = format!("adp = '{}'", fixture("adp.csv"));
    let config = make_config("Sharks", &fixture("no_such_file.csv"), &adp, &out);
    let tables = load_tables(&config.data_paths, &config.forecast).unwrap();

    assert_eq!(tables.perceived.len(), 10);
    let ace = &tables.perceived[0];
    assert_eq!(ace.player_name, "Ace Passer");
    assert!((ace.perceived_value - 975.0).abs() < 1e-9);
    assert_eq!(ace.overall_rank, Some(1));

    assert!(Analysis::run(&tables, &config.analysis).is_ok());
}

#[test]
fn missing_perceived_without_fallback_is_an_error() {
    let out = temp_output("tradegap_pipeline_no_fallback");
    let config = make_config("Sharks", &fixture("no_such_file.csv"), "", &out);
    assert!(load_tables(&config.data_paths, &config.forecast).is_err());
}

// ===========================================================================
// Full run
// ===========================================================================

#[test]
fn full_run_reports_and_exports() {
    let out = temp_output("tradegap_pipeline_full");
    let config = make_config("Sharks", &fixture("trade_values.csv"), "", &out);

    let output = app::run(&config, &stamp()).unwrap();
    assert_eq!(output.team, "Sharks");
    assert!(output.report.contains("COMPLETE ROSTER ANALYSIS: Sharks"));
    assert!(output.report.contains("GIVE: Bell Cow"));
    assert!(output.report.contains("Marvin Harrison Jr."));

    // Analysis CSV, suggestions CSV, analysis JSON.
    assert_eq!(output.exported.len(), 3);
    for path in &output.exported {
        assert!(path.exists(), "{} missing", path.display());
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.contains("fixture_league_20251102_183000"), "{name}");
    }

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output.exported[2]).unwrap()).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 10);

    let _ = fs::remove_dir_all(&out);
}

#[test]
fn full_run_without_team_lists_teams() {
    let out = temp_output("tradegap_pipeline_no_team");
    let config = make_config("", &fixture("trade_values.csv"), "", &out);

    let err = app::run(&config, &stamp()).unwrap_err();
    let selection = err.downcast_ref::<TeamSelectionError>().unwrap();
    match selection {
        TeamSelectionError::NotConfigured { known } => {
            assert!(known.contains("Jets"));
            assert!(known.contains("Owls"));
            assert!(known.contains("Sharks"));
        }
        other => panic!("expected NotConfigured, got: {other}"),
    }
}

#[test]
fn sharks_hold_overvalued_backs() {
    let out = temp_output("tradegap_pipeline_breakdown");
    let config = make_config("Sharks", &fixture("trade_values.csv"), "", &out);
    let tables = load_tables(&config.data_paths, &config.forecast).unwrap();
    let analysis = Analysis::run(&tables, &config.analysis).unwrap();

    let breakdown = analysis.analyze_team("Sharks");
    let names: Vec<&str> = breakdown
        .overvalued
        .iter()
        .map(|r| r.player_name.as_str())
        .collect();
    assert_eq!(names, vec!["Bell Cow", "Ace Passer"]);
    assert!(breakdown.undervalued.is_empty());
    assert!(analysis
        .team_data("Sharks")
        .iter()
        .any(|r| r.value_category == ValueCategory::FairValue));
}

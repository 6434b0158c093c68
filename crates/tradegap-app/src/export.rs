// CSV and JSON export of an analysis run.

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use tradegap_core::{TradeSuggestion, ValuationRow};

use crate::config::OutputConfig;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV error writing {path}: {source}")]
    Csv { path: String, source: csv::Error },
    #[error("JSON error writing {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// League name reduced to a file-name-safe slug.
fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.trim().chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "league".into()
    } else {
        trimmed.to_string()
    }
}

/// `<stem>_<league>_<YYYYmmdd_HHMMSS>.<ext>`
pub fn export_file_name<Tz: TimeZone>(
    stem: &str,
    league: &str,
    at: &DateTime<Tz>,
    ext: &str,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{stem}_{}_{}.{ext}", slug(league), at.format("%Y%m%d_%H%M%S"))
}

fn write_csv<T: Serialize>(path: &Path, records: &[T]) -> Result<(), ExportError> {
    let csv_err = |e| ExportError::Csv {
        path: path.display().to_string(),
        source: e,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    for record in records {
        writer.serialize(record).map_err(csv_err)?;
    }
    writer.flush().map_err(|e| ExportError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn write_json<T: Serialize>(path: &Path, records: &[T]) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|e| ExportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::to_writer_pretty(file, records).map_err(|e| ExportError::Json {
        path: path.display().to_string(),
        source: e,
    })
}

/// Write the enabled exports into `output.dir` and return the files written.
///
/// The classified table goes to CSV and/or JSON. Suggestions go to their
/// own CSV when CSV export is on and there is at least one.
pub fn export_results<Tz: TimeZone>(
    rows: &[ValuationRow],
    suggestions: &[TradeSuggestion],
    league: &str,
    output: &OutputConfig,
    at: &DateTime<Tz>,
) -> Result<Vec<PathBuf>, ExportError>
where
    Tz::Offset: std::fmt::Display,
{
    if !output.export_csv && !output.export_json {
        return Ok(Vec::new());
    }

    let dir = Path::new(&output.dir);
    std::fs::create_dir_all(dir).map_err(|e| ExportError::Io {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut written = Vec::new();

    if output.export_csv {
        let path = dir.join(export_file_name("trade_analysis", league, at, "csv"));
        write_csv(&path, rows)?;
        written.push(path);

        if !suggestions.is_empty() {
            let path = dir.join(export_file_name("trade_suggestions", league, at, "csv"));
            write_csv(&path, suggestions)?;
            written.push(path);
        }
    }

    if output.export_json {
        let path = dir.join(export_file_name("trade_analysis", league, at, "json"));
        write_json(&path, rows)?;
        written.push(path);
    }

    for path in &written {
        info!("exported {}", path.display());
    }
    Ok(written)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

// Configuration loading and parsing (config/tradegap.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use tradegap_core::config::{AnalysisConfig, ConfigError as CoreConfigError, ForecastConfig};

/// Name of the single config file under `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "tradegap.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

impl From<CoreConfigError> for ConfigError {
    fn from(e: CoreConfigError) -> Self {
        match e {
            CoreConfigError::ValidationError { field, message } => {
                ConfigError::ValidationError { field, message }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub league: LeagueConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    pub data_paths: DataPaths,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    /// Team to analyze. When omitted the run lists the known teams and stops.
    #[serde(default)]
    pub my_team: Option<String>,
}

/// CSV inputs, relative to the working directory.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub roster: String,
    pub perceived: String,
    pub forecasted: String,
    /// Recent per-game scoring, blended into the forecast when present.
    #[serde(default)]
    pub recent: Option<String>,
    /// ADP table, used for perceived values when the perceived CSV is absent
    /// or empty.
    #[serde(default)]
    pub adp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: String,
    pub export_csv: bool,
    pub export_json: bool,
    pub max_suggestions: usize,
    pub max_targets_displayed: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            dir: "output".into(),
            export_csv: true,
            export_json: false,
            max_suggestions: 10,
            max_targets_displayed: 15,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/tradegap.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Copy files from `defaults/` into `config/` when missing there.
/// Returns the files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }

        let target = config_dir.join(file_name);
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.name.trim().is_empty() {
        return Err(invalid("league.name", "must not be empty"));
    }
    if let Some(team) = &config.league.my_team {
        if team.trim().is_empty() {
            return Err(invalid("league.my_team", "must not be empty when set"));
        }
    }

    config.analysis.validate()?;
    config.forecast.validate()?;

    let paths = &config.data_paths;
    for (field, value) in [
        ("data_paths.roster", &paths.roster),
        ("data_paths.perceived", &paths.perceived),
        ("data_paths.forecasted", &paths.forecasted),
    ] {
        if value.trim().is_empty() {
            return Err(invalid(field, "must not be empty"));
        }
    }

    if config.output.max_suggestions == 0 {
        return Err(invalid("output.max_suggestions", "must be > 0"));
    }
    if config.output.max_targets_displayed == 0 {
        return Err(invalid("output.max_targets_displayed", "must be > 0"));
    }
    if (config.output.export_csv || config.output.export_json) && config.output.dir.trim().is_empty()
    {
        return Err(invalid("output.dir", "must not be empty when exporting"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

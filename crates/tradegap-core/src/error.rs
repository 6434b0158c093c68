// Fatal conditions for an analysis run.

use std::fmt;
use thiserror::Error;

use crate::config::ConfigError;

/// One of the three input tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceTable {
    Roster,
    Perceived,
    Forecasted,
}

impl SourceTable {
    pub fn label(&self) -> &'static str {
        match self {
            SourceTable::Roster => "roster",
            SourceTable::Perceived => "perceived value",
            SourceTable::Forecasted => "forecasted value",
        }
    }
}

impl fmt::Display for SourceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which value column a normalization basis belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueColumn {
    Perceived,
    Forecasted,
}

impl fmt::Display for ValueColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueColumn::Perceived => f.write_str("perceived_value"),
            ValueColumn::Forecasted => f.write_str("forecasted_value"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// An input table arrived empty: nothing was fetched.
    #[error("{table} table is empty; cannot analyze without it")]
    MissingSourceData { table: SourceTable },

    /// Tables were fetched but no player appeared in all three.
    #[error(
        "no players with complete data: {roster_players} rostered, \
         {perceived_matches} matched a perceived value, \
         {complete_matches} also matched a forecast; \
         check that player names agree across sources"
    )]
    NoCompleteMatches {
        roster_players: usize,
        perceived_matches: usize,
        complete_matches: usize,
    },

    /// Every merged player fell below the configured perceived value floor.
    #[error("all {candidates} merged players are below the perceived value floor of {floor}")]
    BelowValueFloor { floor: f64, candidates: usize },

    /// The mean of a value column is not positive, so no basis exists.
    #[error("cannot normalize {column}: mean over {rows} rows is {mean}")]
    DegenerateBasis {
        column: ValueColumn,
        rows: usize,
        mean: f64,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl AnalysisError {
    /// Whether the failure means input was absent, as opposed to present but
    /// unusable.
    pub fn is_missing_data(&self) -> bool {
        matches!(self, AnalysisError::MissingSourceData { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failing_stage() {
        let err = AnalysisError::MissingSourceData {
            table: SourceTable::Forecasted,
        };
        assert_eq!(
            err.to_string(),
            "forecasted value table is empty; cannot analyze without it"
        );
        assert!(err.is_missing_data());

        let err = AnalysisError::NoCompleteMatches {
            roster_players: 12,
            perceived_matches: 3,
            complete_matches: 0,
        };
        let msg = err.to_string();
        assert!(msg.contains("12 rostered"));
        assert!(msg.contains("3 matched a perceived value"));
        assert!(!err.is_missing_data());
    }

    #[test]
    fn config_errors_convert() {
        let err: AnalysisError = ConfigError::ValidationError {
            field: "analysis.match_tolerance".into(),
            message: "must be in (0.0, 1.0], got -1".into(),
        }
        .into();
        assert!(err.to_string().contains("analysis.match_tolerance"));
    }
}

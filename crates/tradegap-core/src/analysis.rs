// One analysis run over a set of source tables.
//
// `Analysis::run` chains the pipeline stages and keeps the classified rows
// plus the configuration they were classified under. Everything after that
// (team views, targets, suggestions, summary) is a read-only query.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::info;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::player::Position;
use crate::sources::{apply_scarcity, SourceTables};
use crate::summary::{summarize, SummaryStats};
use crate::trade::{self, TradeSuggestion, Untouchables};
use crate::valuation::divergence::classify_all;
use crate::valuation::merge::{apply_value_floor, merge};
use crate::valuation::normalize::{normalization_basis, normalize_with, NormalizationBasis};
use crate::valuation::{ValuationRow, ValueCategory};

/// A team's players split by market verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamBreakdown<'a> {
    /// Most overvalued first.
    pub overvalued: Vec<&'a ValuationRow>,
    /// Most undervalued first.
    pub undervalued: Vec<&'a ValuationRow>,
}

#[derive(Debug, Clone)]
pub struct Analysis {
    rows: Vec<ValuationRow>,
    undefined: Vec<String>,
    basis: NormalizationBasis,
    config: AnalysisConfig,
}

impl Analysis {
    /// Validate `config`, then merge, normalize and classify `tables`.
    ///
    /// Scarcity multipliers are applied to perceived values that have no
    /// adjusted value yet.
    pub fn run(tables: &SourceTables, config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;

        let perceived = apply_scarcity(&tables.perceived, config);
        let merged = merge(&tables.roster, &perceived, &tables.forecasted)?;
        let merged = apply_value_floor(merged, config.min_perceived_value)?;

        let basis = normalization_basis(&merged)?;
        let normalized = normalize_with(&merged, &basis);
        let (rows, undefined) = classify_all(&normalized, config);

        info!(
            "classified {} players ({} excluded with undefined divergence)",
            rows.len(),
            undefined.len()
        );

        Ok(Analysis {
            rows,
            undefined,
            basis,
            config: config.clone(),
        })
    }

    /// Every classified row, in roster order.
    pub fn rows(&self) -> &[ValuationRow] {
        &self.rows
    }

    /// Names of merged players whose divergence could not be computed.
    pub fn undefined(&self) -> &[String] {
        &self.undefined
    }

    pub fn basis(&self) -> &NormalizationBasis {
        &self.basis
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Distinct team names among classified rows, sorted.
    pub fn teams(&self) -> Vec<&str> {
        self.rows
            .iter()
            .map(|r| r.team_name.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// All rows for one team, regardless of category.
    pub fn team_data(&self, team: &str) -> Vec<&ValuationRow> {
        self.rows.iter().filter(|r| r.team_name == team).collect()
    }

    pub fn analyze_team(&self, team: &str) -> TeamBreakdown<'_> {
        let of_category = |category: ValueCategory| -> Vec<&ValuationRow> {
            self.rows
                .iter()
                .filter(|r| r.team_name == team && r.value_category == category)
                .collect()
        };

        let mut overvalued = of_category(ValueCategory::Overvalued);
        overvalued.sort_by(|a, b| {
            a.discount_premium
                .partial_cmp(&b.discount_premium)
                .unwrap_or(Ordering::Equal)
        });

        let mut undervalued = of_category(ValueCategory::Undervalued);
        undervalued.sort_by(|a, b| {
            b.discount_premium
                .partial_cmp(&a.discount_premium)
                .unwrap_or(Ordering::Equal)
        });

        TeamBreakdown {
            overvalued,
            undervalued,
        }
    }

    /// Undervalued players on other teams, using the configured untouchables.
    pub fn find_trade_targets(
        &self,
        excluding_team: &str,
        position_filter: Option<Position>,
    ) -> Vec<&ValuationRow> {
        let untouchables = Untouchables::new(&self.config.untouchables);
        trade::find_trade_targets(&self.rows, excluding_team, position_filter, &untouchables)
    }

    pub fn suggest_trade_pairs(&self, team: &str, max_suggestions: usize) -> Vec<TradeSuggestion> {
        trade::suggest_trade_pairs(&self.rows, team, max_suggestions, &self.config)
    }

    pub fn summary_stats(&self) -> SummaryStats {
        summarize(&self.rows, self.undefined.len())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

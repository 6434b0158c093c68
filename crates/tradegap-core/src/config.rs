// Analysis configuration: divergence thresholds, trade matching parameters,
// scarcity multipliers and untouchables.
//
// Every entry point takes an `&AnalysisConfig`; nothing reads process-wide
// settings. `validate()` must pass before a run starts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::player::Position;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

impl ConfigError {
    fn invalid(field: &str, message: impl Into<String>) -> Self {
        ConfigError::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Name of the offending setting.
    pub fn field(&self) -> &str {
        match self {
            ConfigError::ValidationError { field, .. } => field,
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_DISCOUNT_THRESHOLD: f64 = 10.0;
pub const DEFAULT_PREMIUM_THRESHOLD: f64 = -10.0;
/// Perceived values within ±15% of each other count as a market-fair swap.
pub const DEFAULT_MATCH_TOLERANCE: f64 = 0.15;
pub const DEFAULT_MIN_VALUE_GAIN: f64 = 5.0;
pub const DEFAULT_MAX_MATCHES_PER_PLAYER: usize = 3;
pub const DEFAULT_RECENT_WEIGHT: f64 = 0.4;
pub const DEFAULT_WEEKS_REMAINING: f64 = 13.0;

// ---------------------------------------------------------------------------
// Interpretation bands
// ---------------------------------------------------------------------------

/// Lower bounds (exclusive) of the five display interpretation buckets.
///
/// Tuned independently of the value-category thresholds; the defaults only
/// happen to share the ±10 tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpretationBands {
    pub severe_discount: f64,
    pub discount: f64,
    pub fair: f64,
    pub premium: f64,
}

impl Default for InterpretationBands {
    fn default() -> Self {
        InterpretationBands {
            severe_discount: 30.0,
            discount: 10.0,
            fair: -10.0,
            premium: -30.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Forecast blending
// ---------------------------------------------------------------------------

/// How recent per-game scoring is folded into rest-of-season projections.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Weight of recent performance, 0.0-1.0.
    pub recent_weight: f64,
    /// Games left in the horizon the projection covers.
    pub weeks_remaining: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        ForecastConfig {
            recent_weight: DEFAULT_RECENT_WEIGHT,
            weeks_remaining: DEFAULT_WEEKS_REMAINING,
        }
    }
}

impl ForecastConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.recent_weight) {
            return Err(ConfigError::invalid(
                "forecast.recent_weight",
                format!("must be between 0.0 and 1.0 inclusive, got {}", self.recent_weight),
            ));
        }
        if !self.weeks_remaining.is_finite() || self.weeks_remaining <= 0.0 {
            return Err(ConfigError::invalid(
                "forecast.weeks_remaining",
                format!("must be > 0, got {}", self.weeks_remaining),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Analysis config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Discount % above which a player is Undervalued.
    pub discount_threshold: f64,
    /// Discount % below which a player is Overvalued.
    pub premium_threshold: f64,
    /// Fractional band around the give player's perceived_normalized that a
    /// target must fall in.
    pub match_tolerance: f64,
    /// Minimum forecasted_normalized gain for a suggestion.
    pub min_value_gain: f64,
    /// Targets considered per give player, in target order.
    pub max_matches_per_player: usize,
    /// Effective perceived values below this are not analyzed.
    pub min_perceived_value: f64,
    /// Players never offered or requested in a trade.
    pub untouchables: Vec<String>,
    /// Position label ("QB", "D/ST", ...) to perceived value multiplier.
    pub scarcity_multipliers: BTreeMap<String, f64>,
    pub interpretation: InterpretationBands,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            discount_threshold: DEFAULT_DISCOUNT_THRESHOLD,
            premium_threshold: DEFAULT_PREMIUM_THRESHOLD,
            match_tolerance: DEFAULT_MATCH_TOLERANCE,
            min_value_gain: DEFAULT_MIN_VALUE_GAIN,
            max_matches_per_player: DEFAULT_MAX_MATCHES_PER_PLAYER,
            min_perceived_value: 0.0,
            untouchables: Vec::new(),
            scarcity_multipliers: BTreeMap::new(),
            interpretation: InterpretationBands::default(),
        }
    }
}

impl AnalysisConfig {
    /// Multiplier configured for `position`, if any.
    pub fn scarcity_multiplier(&self, position: Position) -> Option<f64> {
        self.scarcity_multipliers
            .iter()
            .find(|(label, _)| Position::from_str_pos(label) == Some(position))
            .map(|(_, &m)| m)
    }

    /// Check every setting, reporting the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite_fields: &[(&str, f64)] = &[
            ("analysis.discount_threshold", self.discount_threshold),
            ("analysis.premium_threshold", self.premium_threshold),
            ("analysis.match_tolerance", self.match_tolerance),
            ("analysis.min_value_gain", self.min_value_gain),
            ("analysis.min_perceived_value", self.min_perceived_value),
        ];
        for (name, val) in finite_fields {
            if !val.is_finite() {
                return Err(ConfigError::invalid(name, format!("must be finite, got {val}")));
            }
        }

        if self.premium_threshold > self.discount_threshold {
            return Err(ConfigError::invalid(
                "analysis.premium_threshold",
                format!(
                    "must not exceed discount_threshold ({}), got {}",
                    self.discount_threshold, self.premium_threshold
                ),
            ));
        }

        if self.match_tolerance <= 0.0 || self.match_tolerance > 1.0 {
            return Err(ConfigError::invalid(
                "analysis.match_tolerance",
                format!("must be in (0.0, 1.0], got {}", self.match_tolerance),
            ));
        }

        if self.min_value_gain < 0.0 {
            return Err(ConfigError::invalid(
                "analysis.min_value_gain",
                format!("must be >= 0, got {}", self.min_value_gain),
            ));
        }

        if self.max_matches_per_player == 0 {
            return Err(ConfigError::invalid(
                "analysis.max_matches_per_player",
                "must be > 0",
            ));
        }

        if self.min_perceived_value < 0.0 {
            return Err(ConfigError::invalid(
                "analysis.min_perceived_value",
                format!("must be >= 0, got {}", self.min_perceived_value),
            ));
        }

        for (label, &multiplier) in &self.scarcity_multipliers {
            let field = format!("analysis.scarcity_multipliers.{label}");
            if Position::from_str_pos(label).is_none() {
                return Err(ConfigError::invalid(&field, "unknown position"));
            }
            if !multiplier.is_finite() || multiplier <= 0.0 {
                return Err(ConfigError::invalid(
                    &field,
                    format!("must be > 0, got {multiplier}"),
                ));
            }
        }

        let bands = &self.interpretation;
        let band_fields: &[(&str, f64)] = &[
            ("analysis.interpretation.severe_discount", bands.severe_discount),
            ("analysis.interpretation.discount", bands.discount),
            ("analysis.interpretation.fair", bands.fair),
            ("analysis.interpretation.premium", bands.premium),
        ];
        for window in band_fields.windows(2) {
            let (upper_name, upper) = window[0];
            let (lower_name, lower) = window[1];
            if !upper.is_finite() || !lower.is_finite() || upper <= lower {
                return Err(ConfigError::invalid(
                    lower_name,
                    format!("must be finite and below {upper_name} ({upper}), got {lower}"),
                ));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_field(config: &AnalysisConfig, field: &str) {
        match config.validate() {
            Err(err) => assert_eq!(err.field(), field),
            Ok(()) => panic!("expected validation error for {field}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.discount_threshold - 10.0).abs() < f64::EPSILON);
        assert!((config.premium_threshold + 10.0).abs() < f64::EPSILON);
        assert!((config.match_tolerance - 0.15).abs() < f64::EPSILON);
        assert!((config.min_value_gain - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.max_matches_per_player, 3);
        assert!(config.scarcity_multipliers.is_empty());
    }

    #[test]
    fn rejects_negative_tolerance() {
        let config = AnalysisConfig {
            match_tolerance: -0.1,
            ..AnalysisConfig::default()
        };
        expect_field(&config, "analysis.match_tolerance");
    }

    #[test]
    fn rejects_zero_tolerance() {
        let config = AnalysisConfig {
            match_tolerance: 0.0,
            ..AnalysisConfig::default()
        };
        expect_field(&config, "analysis.match_tolerance");
    }

    #[test]
    fn rejects_nan_threshold() {
        let config = AnalysisConfig {
            discount_threshold: f64::NAN,
            ..AnalysisConfig::default()
        };
        expect_field(&config, "analysis.discount_threshold");
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let config = AnalysisConfig {
            discount_threshold: -5.0,
            premium_threshold: 5.0,
            ..AnalysisConfig::default()
        };
        expect_field(&config, "analysis.premium_threshold");
    }

    #[test]
    fn equal_thresholds_are_allowed() {
        let config = AnalysisConfig {
            discount_threshold: 0.0,
            premium_threshold: 0.0,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_matches_per_player() {
        let config = AnalysisConfig {
            max_matches_per_player: 0,
            ..AnalysisConfig::default()
        };
        expect_field(&config, "analysis.max_matches_per_player");
    }

    #[test]
    fn rejects_negative_floor_and_gain() {
        let config = AnalysisConfig {
            min_perceived_value: -1.0,
            ..AnalysisConfig::default()
        };
        expect_field(&config, "analysis.min_perceived_value");

        let config = AnalysisConfig {
            min_value_gain: -1.0,
            ..AnalysisConfig::default()
        };
        expect_field(&config, "analysis.min_value_gain");
    }

    #[test]
    fn rejects_unknown_scarcity_position() {
        let mut config = AnalysisConfig::default();
        config.scarcity_multipliers.insert("LB".into(), 1.0);
        expect_field(&config, "analysis.scarcity_multipliers.LB");
    }

    #[test]
    fn rejects_non_positive_multiplier() {
        let mut config = AnalysisConfig::default();
        config.scarcity_multipliers.insert("RB".into(), 0.0);
        expect_field(&config, "analysis.scarcity_multipliers.RB");
    }

    #[test]
    fn rejects_unordered_interpretation_bands() {
        let mut config = AnalysisConfig::default();
        config.interpretation.discount = 40.0;
        expect_field(&config, "analysis.interpretation.discount");
    }

    #[test]
    fn scarcity_lookup_accepts_aliases() {
        let mut config = AnalysisConfig::default();
        config.scarcity_multipliers.insert("D/ST".into(), 0.6);
        config.scarcity_multipliers.insert("RB".into(), 1.2);
        assert_eq!(config.scarcity_multiplier(Position::Defense), Some(0.6));
        assert_eq!(config.scarcity_multiplier(Position::RunningBack), Some(1.2));
        assert_eq!(config.scarcity_multiplier(Position::Quarterback), None);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: AnalysisConfig = toml::from_str(
            r#"
match_tolerance = 0.2
untouchables = ["Josh Allen"]

[scarcity_multipliers]
RB = 1.2
"D/ST" = 0.6

[interpretation]
severe_discount = 40.0
"#,
        )
        .unwrap();

        assert!((config.match_tolerance - 0.2).abs() < f64::EPSILON);
        assert!((config.discount_threshold - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.untouchables, vec!["Josh Allen".to_string()]);
        assert_eq!(config.scarcity_multiplier(Position::Defense), Some(0.6));
        assert!((config.interpretation.severe_discount - 40.0).abs() < f64::EPSILON);
        assert!((config.interpretation.discount - 10.0).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn forecast_config_validation() {
        assert!(ForecastConfig::default().validate().is_ok());

        let bad_weight = ForecastConfig {
            recent_weight: 1.5,
            ..ForecastConfig::default()
        };
        assert_eq!(
            bad_weight.validate().unwrap_err().field(),
            "forecast.recent_weight"
        );

        let bad_weeks = ForecastConfig {
            weeks_remaining: 0.0,
            ..ForecastConfig::default()
        };
        assert_eq!(
            bad_weeks.validate().unwrap_err().field(),
            "forecast.weeks_remaining"
        );
    }
}

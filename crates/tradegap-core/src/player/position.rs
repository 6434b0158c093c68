// Football positions as reported by roster and value providers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fantasy football positions, including the flex slot variants some
/// providers report instead of a concrete position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "QB")]
    Quarterback,
    #[serde(rename = "RB")]
    RunningBack,
    #[serde(rename = "WR")]
    WideReceiver,
    #[serde(rename = "TE")]
    TightEnd,
    #[serde(rename = "K")]
    Kicker,
    #[serde(rename = "D/ST")]
    Defense,
    /// RB/WR/TE flex.
    #[serde(rename = "FLEX")]
    Flex,
    /// QB/RB/WR/TE superflex ("OP" on ESPN).
    #[serde(rename = "SFLEX")]
    SuperFlex,
}

impl Position {
    /// Parse a provider position string.
    ///
    /// Handles the spellings seen across providers:
    /// - "D/ST", "DST", "DEF", "D" -> Defense
    /// - "PK" -> Kicker
    /// - "RB/WR/TE", "W/R/T" -> Flex
    /// - "OP", "SUPERFLEX", "QB/RB/WR/TE" -> SuperFlex
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" | "PK" => Some(Position::Kicker),
            "D/ST" | "DST" | "DEF" | "D" => Some(Position::Defense),
            "FLEX" | "RB/WR/TE" | "W/R/T" => Some(Position::Flex),
            "SFLEX" | "SUPERFLEX" | "OP" | "QB/RB/WR/TE" => Some(Position::SuperFlex),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "D/ST",
            Position::Flex => "FLEX",
            Position::SuperFlex => "SFLEX",
        }
    }

    /// Whether this is a flex designation rather than a concrete position.
    pub fn is_flex(&self) -> bool {
        matches!(self, Position::Flex | Position::SuperFlex)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_str())
    }
}

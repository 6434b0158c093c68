// Trade matching: undervalued targets on other teams, and give/get pairs
// that look even to the market but gain forecasted value.

pub mod pairs;
pub mod targets;

use serde::Serialize;
use std::collections::HashSet;

use crate::player::{PlayerIdentity, Position};

pub use pairs::suggest_trade_pairs;
pub use targets::find_trade_targets;

/// Players excluded from every trade, matched by identity key.
#[derive(Debug, Clone, Default)]
pub struct Untouchables(HashSet<PlayerIdentity>);

impl Untouchables {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Untouchables(
            names
                .into_iter()
                .map(|n| PlayerIdentity::from_name(n.as_ref()))
                .filter(|id| !id.is_empty())
                .collect(),
        )
    }

    pub fn contains(&self, player_name: &str) -> bool {
        !self.0.is_empty() && self.0.contains(&PlayerIdentity::from_name(player_name))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A proposed one-for-one swap.
///
/// `give_*` is the analyzed team's overvalued player, `get_*` the undervalued
/// target. Values are normalized (percent of field average).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeSuggestion {
    pub give_player: String,
    pub give_position: Position,
    pub give_team: String,
    pub give_perceived: f64,
    pub give_forecasted: f64,
    pub give_discount: f64,
    pub get_player: String,
    pub get_position: Position,
    pub get_team: String,
    pub get_perceived: f64,
    pub get_forecasted: f64,
    pub get_discount: f64,
    /// `get_forecasted - give_forecasted`.
    pub value_gain: f64,
    /// Gain relative to the give player's forecast; 0 when that forecast is 0.
    pub value_gain_pct: f64,
}

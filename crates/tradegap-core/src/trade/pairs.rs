// Give/get trade pairing.
//
// For each overvalued player the team holds, look for undervalued players
// elsewhere whose perceived value is close enough that the market sees an
// even swap, then keep the pairs where the forecast improves.

use std::cmp::Ordering;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::trade::targets::find_trade_targets;
use crate::trade::{TradeSuggestion, Untouchables};
use crate::valuation::{ValuationRow, ValueCategory};

/// Whether `get` lies within the tolerance band around `give`'s perceived
/// value.
fn within_tolerance(give: &ValuationRow, get: &ValuationRow, tolerance: f64) -> bool {
    (get.perceived_normalized - give.perceived_normalized).abs()
        <= tolerance * give.perceived_normalized
}

/// The team's overvalued players, most overvalued first.
fn give_candidates<'a>(
    rows: &'a [ValuationRow],
    team: &str,
    untouchables: &Untouchables,
) -> Vec<&'a ValuationRow> {
    let mut give: Vec<&ValuationRow> = rows
        .iter()
        .filter(|r| r.team_name == team && r.value_category == ValueCategory::Overvalued)
        .filter(|r| !untouchables.contains(&r.player_name))
        .collect();
    give.sort_by(|a, b| {
        a.discount_premium
            .partial_cmp(&b.discount_premium)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.player_name.cmp(&b.player_name))
    });
    give
}

fn suggestion(give: &ValuationRow, get: &ValuationRow, value_gain: f64) -> TradeSuggestion {
    let value_gain_pct = if give.forecasted_normalized > 0.0 {
        value_gain / give.forecasted_normalized * 100.0
    } else {
        0.0
    };
    TradeSuggestion {
        give_player: give.player_name.clone(),
        give_position: give.position,
        give_team: give.team_name.clone(),
        give_perceived: give.perceived_normalized,
        give_forecasted: give.forecasted_normalized,
        give_discount: give.discount_premium,
        get_player: get.player_name.clone(),
        get_position: get.position,
        get_team: get.team_name.clone(),
        get_perceived: get.perceived_normalized,
        get_forecasted: get.forecasted_normalized,
        get_discount: get.discount_premium,
        value_gain,
        value_gain_pct,
    }
}

/// Suggest up to `max_suggestions` trades for `team`, best forecast gain
/// first.
///
/// Each give candidate is compared against at most
/// `config.max_matches_per_player` in-band targets, taken in target order.
/// A pair is kept only when its gain exceeds `config.min_value_gain`.
/// Untouchables are never offered or requested. Returns an empty list when
/// the team has nothing overvalued or the league has nothing undervalued.
pub fn suggest_trade_pairs(
    rows: &[ValuationRow],
    team: &str,
    max_suggestions: usize,
    config: &AnalysisConfig,
) -> Vec<TradeSuggestion> {
    let untouchables = Untouchables::new(&config.untouchables);
    let give = give_candidates(rows, team, &untouchables);
    let targets = find_trade_targets(rows, team, None, &untouchables);

    if give.is_empty() || targets.is_empty() {
        debug!(
            "no trade pairs for '{}': {} overvalued, {} targets",
            team,
            give.len(),
            targets.len()
        );
        return Vec::new();
    }

    let mut suggestions = Vec::new();
    for g in &give {
        let matches = targets
            .iter()
            .filter(|t| within_tolerance(g, t, config.match_tolerance))
            .take(config.max_matches_per_player);

        for t in matches {
            let value_gain = t.forecasted_normalized - g.forecasted_normalized;
            if value_gain > config.min_value_gain {
                suggestions.push(suggestion(g, t, value_gain));
            }
        }
    }

    suggestions.sort_by(|a, b| {
        b.value_gain
            .partial_cmp(&a.value_gain)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.give_player.cmp(&b.give_player))
            .then_with(|| a.get_player.cmp(&b.get_player))
    });
    suggestions.truncate(max_suggestions);

    debug!(
        "{} trade suggestions for '{}' from {} overvalued players and {} targets",
        suggestions.len(),
        team,
        give.len(),
        targets.len()
    );
    suggestions
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

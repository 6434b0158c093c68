// Undervalued players on other teams.

use std::cmp::Ordering;

use crate::player::Position;
use crate::trade::Untouchables;
use crate::valuation::{ValuationRow, ValueCategory};

/// Undervalued players not on `excluding_team`, most undervalued first.
///
/// `position_filter` keeps only one position. Untouchables are removed. Ties
/// on discount_premium are ordered by player name.
pub fn find_trade_targets<'a>(
    rows: &'a [ValuationRow],
    excluding_team: &str,
    position_filter: Option<Position>,
    untouchables: &Untouchables,
) -> Vec<&'a ValuationRow> {
    let mut targets: Vec<&ValuationRow> = rows
        .iter()
        .filter(|r| r.team_name != excluding_team)
        .filter(|r| r.value_category == ValueCategory::Undervalued)
        .filter(|r| position_filter.map_or(true, |pos| r.position == pos))
        .filter(|r| !untouchables.contains(&r.player_name))
        .collect();

    targets.sort_by(|a, b| {
        b.discount_premium
            .partial_cmp(&a.discount_premium)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.player_name.cmp(&b.player_name))
    });

    targets
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::Interpretation;

    fn make_row(name: &str, team: &str, position: Position, discount: f64) -> ValuationRow {
        let category = if discount > 10.0 {
            ValueCategory::Undervalued
        } else if discount < -10.0 {
            ValueCategory::Overvalued
        } else {
            ValueCategory::FairValue
        };
        ValuationRow {
            player_name: name.into(),
            position,
            team_name: team.into(),
            team_id: None,
            perceived_value_raw: 50.0,
            perceived_value: 50.0,
            perceived_normalized: 100.0,
            forecasted_value: 50.0,
            forecasted_normalized: 100.0,
            discount_premium: discount,
            value_category: category,
            interpretation: Interpretation::Fair,
            overall_rank: None,
            position_rank: None,
        }
    }

    fn league() -> Vec<ValuationRow> {
        vec![
            make_row("Mine Cheap", "Mine", Position::RunningBack, 45.0),
            make_row("Their WR", "Other", Position::WideReceiver, 20.0),
            make_row("Their RB", "Other", Position::RunningBack, 35.0),
            make_row("Third RB", "Third", Position::RunningBack, 12.0),
            make_row("Fair Guy", "Other", Position::TightEnd, 5.0),
            make_row("Pricey", "Third", Position::Quarterback, -40.0),
        ]
    }

    fn names(rows: &[&ValuationRow]) -> Vec<String> {
        rows.iter().map(|r| r.player_name.clone()).collect()
    }

    #[test]
    fn excludes_own_team_and_non_undervalued() {
        let rows = league();
        let targets = find_trade_targets(&rows, "Mine", None, &Untouchables::default());
        assert_eq!(names(&targets), vec!["Their RB", "Their WR", "Third RB"]);
    }

    #[test]
    fn position_filter_is_exact() {
        let rows = league();
        let targets = find_trade_targets(
            &rows,
            "Mine",
            Some(Position::RunningBack),
            &Untouchables::default(),
        );
        assert_eq!(names(&targets), vec!["Their RB", "Third RB"]);
    }

    #[test]
    fn untouchables_removed() {
        let rows = league();
        let untouchables = Untouchables::new(["their rb"]);
        let targets = find_trade_targets(&rows, "Mine", None, &untouchables);
        assert_eq!(names(&targets), vec!["Their WR", "Third RB"]);
    }

    #[test]
    fn ties_broken_by_name() {
        let rows = vec![
            make_row("Zed", "Other", Position::WideReceiver, 25.0),
            make_row("Abe", "Other", Position::WideReceiver, 25.0),
        ];
        let targets = find_trade_targets(&rows, "Mine", None, &Untouchables::default());
        assert_eq!(names(&targets), vec!["Abe", "Zed"]);
    }

    #[test]
    fn no_undervalued_elsewhere_is_empty() {
        let rows = vec![
            make_row("Mine Cheap", "Mine", Position::RunningBack, 45.0),
            make_row("Pricey", "Other", Position::Quarterback, -40.0),
        ];
        assert!(find_trade_targets(&rows, "Mine", None, &Untouchables::default()).is_empty());
    }
}

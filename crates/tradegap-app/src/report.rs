// Plain-text trade report.
//
// `Report::build` runs every query the report needs once; `Display` renders
// it. The same suggestions are reused by the exporter.

use std::cmp::Ordering;
use std::fmt;

use tradegap_core::{Analysis, SummaryStats, TradeSuggestion, ValuationRow, ValueCategory};

const RULE_WIDTH: usize = 80;

/// Coarse label for the roster table, based on discount_premium alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterStatus {
    GreatBuy,
    FairValue,
    SlightPremium,
    Overvalued,
}

impl RosterStatus {
    pub fn from_discount(discount_premium: f64) -> Self {
        if discount_premium > 20.0 {
            RosterStatus::GreatBuy
        } else if discount_premium > 0.0 {
            RosterStatus::FairValue
        } else if discount_premium > -20.0 {
            RosterStatus::SlightPremium
        } else {
            RosterStatus::Overvalued
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RosterStatus::GreatBuy => "Great Buy",
            RosterStatus::FairValue => "Fair Value",
            RosterStatus::SlightPremium => "Slight Premium",
            RosterStatus::Overvalued => "Overvalued",
        }
    }
}

pub struct Report<'a> {
    team: &'a str,
    /// Team rows, best value first.
    roster: Vec<&'a ValuationRow>,
    overvalued: Vec<&'a ValuationRow>,
    undervalued: Vec<&'a ValuationRow>,
    targets: Vec<&'a ValuationRow>,
    suggestions: Vec<TradeSuggestion>,
    stats: SummaryStats,
}

impl<'a> Report<'a> {
    pub fn build(
        analysis: &'a Analysis,
        team: &'a str,
        max_suggestions: usize,
        max_targets_displayed: usize,
    ) -> Self {
        let mut roster = analysis.team_data(team);
        roster.sort_by(|a, b| {
            b.discount_premium
                .partial_cmp(&a.discount_premium)
                .unwrap_or(Ordering::Equal)
        });

        let breakdown = analysis.analyze_team(team);
        let mut targets = analysis.find_trade_targets(team, None);
        targets.truncate(max_targets_displayed);

        Report {
            team,
            roster,
            overvalued: breakdown.overvalued,
            undervalued: breakdown.undervalued,
            targets,
            suggestions: analysis.suggest_trade_pairs(team, max_suggestions),
            stats: analysis.summary_stats(),
        }
    }

    pub fn suggestions(&self) -> &[TradeSuggestion] {
        &self.suggestions
    }

    fn heading(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(f, "{title}")?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))
    }

    fn write_roster(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::heading(f, &format!("COMPLETE ROSTER ANALYSIS: {}", self.team))?;

        if self.roster.is_empty() {
            writeln!(f, "\nNo players found with complete data for {}.", self.team)?;
            return writeln!(f, "Check that player names agree across the input files.");
        }

        writeln!(f, "\n{} players with complete value data:", self.roster.len())?;
        writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;
        writeln!(
            f,
            "{:25} {:5} | {:>9} | {:>9} | {:>7} | Status",
            "Player", "Pos", "Perceived", "Forecast", "Ratio"
        )?;
        writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;
        for p in &self.roster {
            writeln!(
                f,
                "{:25} {:5} | {:9.1} | {:9.1} | {:+6.1}% | {}",
                p.player_name,
                p.position.display_str(),
                p.perceived_normalized,
                p.forecasted_normalized,
                p.discount_premium,
                RosterStatus::from_discount(p.discount_premium).label()
            )?;
        }

        let avg = self.roster.iter().map(|p| p.discount_premium).sum::<f64>()
            / self.roster.len() as f64;
        writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;
        writeln!(f, "Team Summary:")?;
        writeln!(f, "  Average Ratio: {avg:+.1}%")?;
        if let (Some(best), Some(worst)) = (self.roster.first(), self.roster.last()) {
            writeln!(f, "  Best Value:    {}", best.player_name)?;
            writeln!(f, "  Worst Value:   {}", worst.player_name)?;
        }
        writeln!(f, "  Players analyzed: {}", self.roster.len())
    }

    fn write_team_split(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::heading(f, &format!("TEAM ANALYSIS: {}", self.team))?;

        let groups = [
            (
                &self.overvalued,
                "OVERVALUED PLAYERS (Good to trade away)",
                "Premium",
                "No significantly overvalued players on your roster",
            ),
            (
                &self.undervalued,
                "UNDERVALUED PLAYERS (Good value on your roster)",
                "Discount",
                "No significantly undervalued players on your roster",
            ),
        ];
        for (rows, title, label, empty) in groups {
            if rows.is_empty() {
                writeln!(f, "\n{empty}")?;
                continue;
            }
            writeln!(f, "\n{title}")?;
            writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;
            for p in rows {
                writeln!(
                    f,
                    "{:25} {:5} | Perceived: {:6.1} | Forecasted: {:6.1} | {}: {:6.1}%",
                    p.player_name,
                    p.position.display_str(),
                    p.perceived_normalized,
                    p.forecasted_normalized,
                    label,
                    p.discount_premium
                )?;
            }
        }
        Ok(())
    }

    fn write_targets(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::heading(f, "TOP TRADE TARGETS (Undervalued players on other teams)")?;
        if self.targets.is_empty() {
            return writeln!(f, "\nNo undervalued players found on other teams.");
        }
        for p in &self.targets {
            writeln!(f, "\n{:25} ({}) - {}", p.player_name, p.position, p.team_name)?;
            writeln!(f, "  Perceived Value:  {:6.1}", p.perceived_normalized)?;
            writeln!(f, "  Forecasted Value: {:6.1}", p.forecasted_normalized)?;
            writeln!(
                f,
                "  Discount: {:6.1}% - {}",
                p.discount_premium,
                p.interpretation.label()
            )?;
        }
        Ok(())
    }

    fn write_suggestions(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::heading(f, "SUGGESTED TRADES (Similar perceived value, gain forecasted value)")?;
        if self.suggestions.is_empty() {
            writeln!(f, "\nNo trade pairs found.")?;
            return writeln!(f, "Try widening analysis.match_tolerance in config/tradegap.toml.");
        }
        for (i, t) in self.suggestions.iter().enumerate() {
            writeln!(f, "\nTRADE #{}", i + 1)?;
            writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;
            writeln!(f, "GIVE: {:25} ({})", t.give_player, t.give_position)?;
            writeln!(f, "  Perceived Value:  {:6.1}", t.give_perceived)?;
            writeln!(f, "  Forecasted Value: {:6.1}", t.give_forecasted)?;
            writeln!(f, "  Premium: {:6.1}% (Overvalued)", t.give_discount)?;
            writeln!(
                f,
                "GET:  {:25} ({}) from {}",
                t.get_player, t.get_position, t.get_team
            )?;
            writeln!(f, "  Perceived Value:  {:6.1}", t.get_perceived)?;
            writeln!(f, "  Forecasted Value: {:6.1}", t.get_forecasted)?;
            writeln!(f, "  Discount: {:6.1}% (Undervalued)", t.get_discount)?;
            writeln!(
                f,
                "VALUE GAINED: +{:.1} points ({:.1}%)",
                t.value_gain, t.value_gain_pct
            )?;
        }
        Ok(())
    }

    fn write_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.stats;
        Self::heading(f, "ANALYSIS SUMMARY")?;
        writeln!(f, "Total players analyzed: {}", s.total_players)?;
        for (label, count, category) in [
            ("Undervalued players", s.undervalued_count, ValueCategory::Undervalued),
            ("Overvalued players", s.overvalued_count, ValueCategory::Overvalued),
            ("Fair value players", s.fair_value_count, ValueCategory::FairValue),
        ] {
            writeln!(f, "{label}: {count} ({:.1}%)", s.percent_of(category))?;
        }
        if s.undefined_count > 0 {
            writeln!(
                f,
                "Excluded (zero forecast, divergence undefined): {}",
                s.undefined_count
            )?;
        }
        if let (Some(avg), Some(max), Some(min)) =
            (s.avg_discount_premium, s.max_discount, s.max_premium)
        {
            writeln!(f, "\nAverage discount/premium: {avg:.2}%")?;
            writeln!(f, "Biggest discount: {max:.2}%")?;
            writeln!(f, "Biggest premium: {min:.2}%")?;
        }
        Ok(())
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_roster(f)?;
        self.write_team_split(f)?;
        self.write_targets(f)?;
        self.write_suggestions(f)?;
        self.write_summary(f)
    }
}

/// Team listing shown when no team is selected or the selection is unknown.
pub fn render_team_list(teams: &[&str]) -> String {
    let mut out = String::from("Teams in this league:\n");
    for (i, team) in teams.iter().enumerate() {
        out.push_str(&format!("{:2}. {}\n", i + 1, team));
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

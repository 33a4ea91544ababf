// Betting-style lines for head-to-head matchups.
// Weekly projections are turned into a logistic win probability, a spread, an over/under and
// American moneylines. Entertainment only: nothing here is stored.

use serde::Serialize;

use crate::config::ModelSettings;
use crate::league::{League, Team};
use crate::lineup::weekly_value;

/// Logistic win probability for a projection difference
pub fn win_probability(diff: f64, scale: f64) -> f64 {
    1.0 / (1.0 + (-diff / scale).exp())
}

/// American odds for a win probability. p outside (0, 1) has no finite line.
pub fn american_odds(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::INFINITY;
    }
    if p >= 1.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 0.5 {
        -(p / (1.0 - p) * 100.0).round()
    } else {
        ((1.0 - p) / p * 100.0).round()
    }
}

pub fn round_to_half(n: f64) -> f64 {
    (n * 2.0).round() / 2.0
}

/// "+150", "-200", or "n/a" for a degenerate line
pub fn format_moneyline(line: f64) -> String {
    if !line.is_finite() {
        "n/a".to_string()
    } else if line > 0.0 {
        format!("+{}", line)
    } else {
        format!("{}", line)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupLine {
    pub home_weekly: f64,
    pub away_weekly: f64,
    pub home_win_prob: f64,
    pub away_win_prob: f64,
    /// Home is favored on an exact tie
    pub home_favored: bool,
    pub spread: f64,
    pub over_under: f64,
    pub home_moneyline: f64,
    pub away_moneyline: f64,
}

/// Line from two weekly projections
pub fn line_from_projections(ph: f64, pa: f64, model: &ModelSettings) -> MatchupLine {
    let diff = ph - pa;
    let home_win_prob = win_probability(diff, model.matchup_scale);
    let away_win_prob = 1.0 - home_win_prob;
    MatchupLine {
        home_weekly: ph,
        away_weekly: pa,
        home_win_prob,
        away_win_prob,
        home_favored: diff >= 0.0,
        spread: round_to_half(diff.abs()),
        over_under: round_to_half(ph + pa),
        home_moneyline: american_odds(home_win_prob),
        away_moneyline: american_odds(away_win_prob),
    }
}

/// Line for two teams using their best-lineup weekly projections
pub fn build_line(home: &Team, away: &Team, weeks: u32, model: &ModelSettings) -> MatchupLine {
    line_from_projections(
        weekly_value(&home.roster, weeks),
        weekly_value(&away.roster, weeks),
        model,
    )
}

/// First week (by number) that still has a game without a final result.
/// Falls back to the earliest scheduled week, or 1 with no schedule.
pub fn next_unscored_week(league: &League) -> u32 {
    let mut weeks: Vec<u32> = league.schedule.iter().map(|w| w.week).collect();
    weeks.sort_unstable();
    weeks
        .iter()
        .copied()
        .find(|&w| {
            league
                .week(w)
                .map_or(false, |wk| wk.games.iter().any(|g| !g.r#final))
        })
        .or_else(|| weeks.first().copied())
        .unwrap_or(1)
}

#[derive(Debug, Clone, Serialize)]
pub struct GameLine {
    pub week: u32,
    pub home_id: String,
    pub away_id: String,
    pub line: MatchupLine,
}

/// Lines for every game of a week whose teams both still exist
pub fn week_lines(league: &League, week: u32, model: &ModelSettings) -> Vec<GameLine> {
    let Some(wk) = league.week(week) else {
        return Vec::new();
    };
    wk.games
        .iter()
        .filter_map(|g| {
            let home = league.team(&g.home)?;
            let away = league.team(&g.away)?;
            Some(GameLine {
                week,
                home_id: home.id.clone(),
                away_id: away.id.clone(),
                line: build_line(home, away, league.settings.weeks, model),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::Settings;
    use crate::player::{Player, Position};
    use crate::roster::default_slot_limits;

    #[test]
    fn test_reference_matchup() {
        let line = line_from_projections(120.0, 100.0, &ModelSettings::default());
        assert!((line.home_win_prob - 0.8411).abs() < 1e-3);
        assert!(line.home_favored);
        assert_eq!(line.spread, 20.0);
        assert_eq!(line.over_under, 220.0);
        assert_eq!(line.home_moneyline, -529.0);
        assert_eq!(line.away_moneyline, 529.0);
    }

    #[test]
    fn test_pickem() {
        let line = line_from_projections(100.0, 100.0, &ModelSettings::default());
        assert_eq!(line.home_win_prob, 0.5);
        assert_eq!(line.spread, 0.0);
        assert!(line.home_favored);
        assert_eq!(line.home_moneyline.abs(), line.away_moneyline.abs());
    }

    #[test]
    fn test_heavy_favorite() {
        let line = line_from_projections(160.0, 100.0, &ModelSettings::default());
        assert!(line.home_moneyline < -10000.0);
        assert!(line.away_moneyline > 0.0);
        let dog = line_from_projections(100.0, 160.0, &ModelSettings::default());
        assert!(!dog.home_favored);
        assert_eq!(dog.spread, 60.0);
    }

    #[test]
    fn test_american_odds_edges() {
        assert_eq!(american_odds(0.0), f64::INFINITY);
        assert_eq!(american_odds(1.0), f64::NEG_INFINITY);
        assert_eq!(american_odds(0.75), -300.0);
        assert_eq!(american_odds(0.25), 300.0);
        assert_eq!(format_moneyline(f64::INFINITY), "n/a");
        assert_eq!(format_moneyline(19.0), "+19");
        assert_eq!(format_moneyline(-529.0), "-529");
    }

    #[test]
    fn test_round_to_half() {
        assert_eq!(round_to_half(20.2), 20.0);
        assert_eq!(round_to_half(20.3), 20.5);
        assert_eq!(round_to_half(219.76), 220.0);
    }

    fn league_with_rosters() -> League {
        let mut league = League::new(Settings::default());
        league.settings.weeks = 13;
        let limits = default_slot_limits();
        let mut home = Team::new("h", "Home", "", &limits);
        home.roster.qb.push(Player::new("q1", "Q1", Position::QB, "KC", 1560.0));
        let mut away = Team::new("a", "Away", "", &limits);
        away.roster.qb.push(Player::new("q2", "Q2", Position::QB, "BUF", 1300.0));
        league.teams = vec![home, away];
        league.add_game(1, "h", "a")
    }

    #[test]
    fn test_week_lines_uses_season_length() {
        let league = league_with_rosters();
        let lines = week_lines(&league, 1, &ModelSettings::default());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].line.home_weekly, 120.0);
        assert_eq!(lines[0].line.away_weekly, 100.0);
        assert_eq!(lines[0].line.home_moneyline, -529.0);
        assert!(week_lines(&league, 5, &ModelSettings::default()).is_empty());
    }

    #[test]
    fn test_next_unscored_week() {
        let league = league_with_rosters();
        assert_eq!(next_unscored_week(&league), 1);
        let league = league
            .set_game_result(1, 0, 100.0, 90.0, true)
            .add_game(3, "a", "h");
        assert_eq!(next_unscored_week(&league), 3);
        assert_eq!(next_unscored_week(&League::new(Settings::default())), 1);
    }
}

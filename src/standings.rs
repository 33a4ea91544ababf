// Standings and power rankings.
// The power score blends normalized win percentage with normalized points-for.

use serde::Serialize;
use std::cmp::Ordering;

use crate::config::ModelSettings;
use crate::league::League;
use crate::matchup::next_unscored_week;

/// Min-max scale values into [0, 1]. Every value maps to 0.5 when there is no spread.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    values
        .iter()
        .map(|&v| if max == min { 0.5 } else { (v - min) / (max - min) })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct Standing {
    pub team_id: String,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub points_for: f64,
    pub points_against: f64,
    pub win_pct: f64,
    pub power_score: f64,
}

/// Teams ranked by power score, highest first. Equal scores keep league order.
pub fn power_rankings(league: &League, model: &ModelSettings) -> Vec<Standing> {
    let win_pcts: Vec<f64> = league.teams.iter().map(|t| t.win_pct()).collect();
    let points: Vec<f64> = league.teams.iter().map(|t| t.points_for).collect();
    let n_win = normalize(&win_pcts);
    let n_points = normalize(&points);

    let mut standings: Vec<Standing> = league
        .teams
        .iter()
        .enumerate()
        .map(|(i, t)| Standing {
            team_id: t.id.clone(),
            name: t.name.clone(),
            wins: t.wins,
            losses: t.losses,
            points_for: t.points_for,
            points_against: t.points_against,
            win_pct: win_pcts[i],
            power_score: model.power_win_weight * n_win[i] + model.power_points_weight * n_points[i],
        })
        .collect();
    standings.sort_by(|a, b| {
        b.power_score
            .partial_cmp(&a.power_score)
            .unwrap_or(Ordering::Equal)
    });
    standings
}

/// Team totals re-derived from the schedule
pub fn recompute_team_totals(league: &League) -> League {
    let mut next = league.clone();
    next.recompute_totals();
    next
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleStrength {
    pub team_id: String,
    pub name: String,
    /// Opponent power score per week, None when the team has no game that week
    pub weekly: Vec<Option<f64>>,
    /// Mean opponent power score over the remaining weeks
    pub remaining_avg: f64,
}

/// Remaining strength of schedule for every team, easiest first
pub fn strength_of_schedule(league: &League, model: &ModelSettings) -> Vec<ScheduleStrength> {
    let rankings = power_rankings(league, model);
    let score_of = |team_id: &str| {
        rankings
            .iter()
            .find(|s| s.team_id == team_id)
            .map_or(0.0, |s| s.power_score)
    };
    let start = next_unscored_week(league);

    let mut out: Vec<ScheduleStrength> = league
        .teams
        .iter()
        .map(|team| {
            let mut remaining = Vec::new();
            let weekly = (1..=league.settings.weeks)
                .map(|w| {
                    let game = league.week(w)?.games.iter().find(|g| g.involves(&team.id))?;
                    let opponent = if game.home == team.id { &game.away } else { &game.home };
                    let s = score_of(opponent);
                    if w >= start {
                        remaining.push(s);
                    }
                    Some(s)
                })
                .collect();
            let remaining_avg = if remaining.is_empty() {
                0.0
            } else {
                remaining.iter().sum::<f64>() / remaining.len() as f64
            };
            ScheduleStrength {
                team_id: team.id.clone(),
                name: team.name.clone(),
                weekly,
                remaining_avg,
            }
        })
        .collect();
    out.sort_by(|a, b| a.remaining_avg.partial_cmp(&b.remaining_avg).unwrap_or(Ordering::Equal));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::{Settings, Team};
    use crate::roster::default_slot_limits;

    fn team(id: &str, wins: u32, losses: u32, pf: f64) -> Team {
        let mut t = Team::new(id, id, "", &default_slot_limits());
        t.wins = wins;
        t.losses = losses;
        t.points_for = pf;
        t
    }

    #[test]
    fn test_normalize_range() {
        let n = normalize(&[10.0, 20.0, 15.0, 30.0]);
        assert!(n.iter().all(|v| (0.0..=1.0).contains(v)));
        assert_eq!(n[0], 0.0);
        assert_eq!(n[3], 1.0);
        assert_eq!(n[2], 0.25);
    }

    #[test]
    fn test_normalize_flat() {
        assert_eq!(normalize(&[7.0, 7.0, 7.0]), vec![0.5, 0.5, 0.5]);
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn test_power_rankings() {
        let mut league = League::new(Settings::default());
        league.teams = vec![
            team("a", 2, 2, 400.0),
            team("b", 4, 0, 350.0),
            team("c", 0, 4, 500.0),
        ];
        let ranks = power_rankings(&league, &ModelSettings::default());
        // b: 0.7*1 + 0.3*0 = 0.70, a: 0.7*0.5 + 0.3*(50/150) = 0.45, c: 0 + 0.3 = 0.30
        let order: Vec<&str> = ranks.iter().map(|s| s.team_id.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert!((ranks[0].power_score - 0.7).abs() < 1e-12);
        assert!((ranks[1].power_score - 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_preseason_all_equal() {
        let league = League::seed();
        let ranks = power_rankings(&league, &ModelSettings::default());
        assert!(ranks.iter().all(|s| (s.power_score - 0.5).abs() < 1e-12));
        assert!(ranks.iter().all(|s| s.win_pct == 0.0));
        // stable order when tied
        assert_eq!(ranks[0].team_id, "t1");
    }

    #[test]
    fn test_recompute_team_totals_resets() {
        let mut league = League::new(Settings::default());
        league.teams = vec![team("a", 9, 9, 999.0), team("b", 0, 0, 0.0)];
        let league = recompute_team_totals(&league);
        assert_eq!(league.team("a").unwrap().wins, 0);
        assert_eq!(league.team("a").unwrap().points_for, 0.0);
    }

    #[test]
    fn test_strength_of_schedule() {
        let mut league = League::new(Settings::default());
        league.settings.weeks = 3;
        league.teams = vec![team("a", 0, 0, 0.0), team("b", 0, 0, 0.0), team("c", 0, 0, 0.0)];
        let league = league
            .add_game(1, "a", "b")
            .set_game_result(1, 0, 120.0, 80.0, true)
            .add_game(2, "c", "a")
            .add_game(3, "c", "b");
        let sos = strength_of_schedule(&league, &ModelSettings::default());
        let c = sos.iter().find(|s| s.team_id == "c").unwrap();
        assert_eq!(c.weekly.len(), 3);
        assert_eq!(c.weekly[0], None);
        // c still faces a (the 1-0 leader) and b (0-1)
        let ranks = power_rankings(&league, &ModelSettings::default());
        let a_score = ranks.iter().find(|s| s.team_id == "a").unwrap().power_score;
        let b_score = ranks.iter().find(|s| s.team_id == "b").unwrap().power_score;
        assert!((c.remaining_avg - (a_score + b_score) / 2.0).abs() < 1e-12);
        // sorted easiest first
        assert!(sos.windows(2).all(|w| w[0].remaining_avg <= w[1].remaining_avg));
    }
}

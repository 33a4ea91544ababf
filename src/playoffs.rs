// Playoff seeding, bracket pairings and the week-by-week playoff projection.
// Seeds order by wins, then points-for, then name. The projection re-runs the rest of the
// season from each week using a logistic on the power-score gap.

use fnv::FnvHashMap;
use serde::Serialize;
use std::cmp::Ordering;

use crate::config::{ModelSettings, PlayoffSettings};
use crate::league::League;
use crate::matchup::win_probability;
use crate::standings::power_rankings;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Seed {
    pub seed: usize,
    pub team_id: String,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub points_for: f64,
}

/// Every team seeded by wins desc, points-for desc, name asc
pub fn compute_seeds(league: &League) -> Vec<Seed> {
    let mut teams: Vec<_> = league.teams.iter().collect();
    teams.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then_with(|| b.points_for.partial_cmp(&a.points_for).unwrap_or(Ordering::Equal))
            .then_with(|| a.name.cmp(&b.name))
    });
    teams
        .into_iter()
        .enumerate()
        .map(|(i, t)| Seed {
            seed: i + 1,
            team_id: t.id.clone(),
            name: t.name.clone(),
            wins: t.wins,
            losses: t.losses,
            points_for: t.points_for,
        })
        .collect()
}

/// First round of a single-elimination bracket: best vs worst, working inwards
pub fn bracket_pairings(seeds: &[Seed]) -> Vec<(Seed, Seed)> {
    let n = seeds.len();
    (0..n / 2)
        .map(|i| (seeds[i].clone(), seeds[n - 1 - i].clone()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LosersBracket {
    Populated {
        seeds: Vec<Seed>,
        pairings: Vec<(Seed, Seed)>,
    },
    /// Not enough non-playoff teams yet; `have` is the current count
    NotEnoughTeams { have: usize, need: usize },
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayoffPicture {
    pub seeds: Vec<Seed>,
    pub winners: Vec<Seed>,
    pub winners_pairings: Vec<(Seed, Seed)>,
    pub losers: LosersBracket,
}

pub fn playoff_picture(league: &League, format: &PlayoffSettings) -> PlayoffPicture {
    let seeds = compute_seeds(league);
    let split = format.winners_bracket_size.min(seeds.len());
    let winners: Vec<Seed> = seeds[..split].to_vec();
    let winners_pairings = bracket_pairings(&winners);

    let others = &seeds[split..];
    let losers = if others.len() < format.losers_bracket_size {
        LosersBracket::NotEnoughTeams {
            have: others.len(),
            need: format.losers_bracket_size,
        }
    } else {
        let seeds = others[..format.losers_bracket_size].to_vec();
        LosersBracket::Populated {
            pairings: bracket_pairings(&seeds),
            seeds,
        }
    };

    PlayoffPicture {
        seeds,
        winners,
        winners_pairings,
        losers,
    }
}

/// Highest week number holding at least one final game, 0 when nothing is final
pub fn last_final_week(league: &League) -> u32 {
    league
        .schedule
        .iter()
        .filter(|w| w.games.iter().any(|g| g.r#final))
        .map(|w| w.week)
        .max()
        .unwrap_or(0)
}

/// Expected season wins per team as of `week`: actual wins from final games up to and
/// including that week, plus a logistic expectation for every game after it.
pub fn expected_wins_as_of(league: &League, week: u32, model: &ModelSettings) -> FnvHashMap<String, f64> {
    let power: FnvHashMap<String, f64> = power_rankings(league, model)
        .into_iter()
        .map(|s| (s.team_id, s.power_score))
        .collect();
    let mut totals: FnvHashMap<String, f64> =
        league.teams.iter().map(|t| (t.id.clone(), 0.0)).collect();

    for (w, game) in league.games() {
        if !totals.contains_key(&game.home) || !totals.contains_key(&game.away) {
            continue;
        }
        if w <= week {
            if let Some(winner) = game.winner() {
                if let Some(total) = totals.get_mut(winner) {
                    *total += 1.0;
                }
            }
        } else {
            let ph = power.get(&game.home).copied().unwrap_or(0.0);
            let pa = power.get(&game.away).copied().unwrap_or(0.0);
            let p = win_probability(ph - pa, 1.0 / model.playoff_slope);
            if let Some(total) = totals.get_mut(&game.home) {
                *total += p;
            }
            if let Some(total) = totals.get_mut(&game.away) {
                *total += 1.0 - p;
            }
        }
    }
    totals
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekProjection {
    pub week: u32,
    /// (team id, projected into the winners bracket), in league team order
    pub flags: Vec<(String, bool)>,
}

impl WeekProjection {
    pub fn is_in(&self, team_id: &str) -> bool {
        self.flags.iter().any(|(id, flag)| id == team_id && *flag)
    }
}

/// Per-week playoff flags for every team, reported up to the last week with a final game
pub fn playoff_probability_series(
    league: &League,
    model: &ModelSettings,
    format: &PlayoffSettings,
) -> Vec<WeekProjection> {
    let horizon = last_final_week(league).max(1);
    (1..=league.settings.weeks)
        .filter(|&w| w <= horizon)
        .map(|w| {
            let expected = expected_wins_as_of(league, w, model);
            let mut order: Vec<_> = league
                .teams
                .iter()
                .map(|t| (t, expected.get(&t.id).copied().unwrap_or(0.0)))
                .collect();
            order.sort_by(|(ta, a), (tb, b)| {
                b.partial_cmp(a)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| tb.points_for.partial_cmp(&ta.points_for).unwrap_or(Ordering::Equal))
            });
            let top: Vec<&str> = order
                .iter()
                .take(format.winners_bracket_size)
                .map(|(t, _)| t.id.as_str())
                .collect();
            WeekProjection {
                week: w,
                flags: league
                    .teams
                    .iter()
                    .map(|t| (t.id.clone(), top.contains(&t.id.as_str())))
                    .collect(),
            }
        })
        .collect()
}

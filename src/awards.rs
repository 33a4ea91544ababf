// Weekly and season awards derived from final scores.

use serde::Serialize;
use std::cmp::Ordering;

use crate::league::{League, Team};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreAward {
    pub team_id: String,
    pub score: f64,
    pub opponent_id: String,
}

/// Margin award credited to the winning side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarginAward {
    pub team_id: String,
    pub margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekAwards {
    pub week: u32,
    pub top_score: Option<ScoreAward>,
    /// None when every final game of the week was tied
    pub narrowest_win: Option<MarginAward>,
    pub biggest_blowout: Option<MarginAward>,
}

/// Awards for every week holding at least one final game, in week order.
/// Ties keep the first game seen.
pub fn weekly_awards(league: &League) -> Vec<WeekAwards> {
    let mut weeks: Vec<_> = league.schedule.iter().collect();
    weeks.sort_by_key(|w| w.week);

    weeks
        .into_iter()
        .filter_map(|wk| {
            let finals: Vec<_> = wk.games.iter().filter(|g| g.r#final).collect();
            if finals.is_empty() {
                return None;
            }
            let mut top: Option<ScoreAward> = None;
            let mut narrow: Option<MarginAward> = None;
            let mut blowout: Option<MarginAward> = None;

            for g in finals {
                for (team, score, opp) in [
                    (&g.home, g.home_score, &g.away),
                    (&g.away, g.away_score, &g.home),
                ] {
                    if top.as_ref().map_or(true, |t| score > t.score) {
                        top = Some(ScoreAward {
                            team_id: team.clone(),
                            score,
                            opponent_id: opp.clone(),
                        });
                    }
                }
                let Some(winner) = g.winner() else {
                    continue;
                };
                let margin = (g.home_score - g.away_score).abs();
                if narrow.as_ref().map_or(true, |n| margin < n.margin) {
                    narrow = Some(MarginAward {
                        team_id: winner.to_string(),
                        margin,
                    });
                }
                if blowout.as_ref().map_or(true, |b| margin > b.margin) {
                    blowout = Some(MarginAward {
                        team_id: winner.to_string(),
                        margin,
                    });
                }
            }
            Some(WeekAwards {
                week: wk.week,
                top_score: top,
                narrowest_win: narrow,
                biggest_blowout: blowout,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonAwards {
    pub most_points: Option<String>,
    pub best_record: Option<String>,
}

fn by_record(a: &Team, b: &Team) -> Ordering {
    let net = |t: &Team| t.wins as i64 - t.losses as i64;
    net(b)
        .cmp(&net(a))
        .then_with(|| b.win_pct().partial_cmp(&a.win_pct()).unwrap_or(Ordering::Equal))
}

/// Season leaders by points-for and by record; the earlier team wins a tie
pub fn season_awards(league: &League) -> SeasonAwards {
    let mut by_points: Vec<&Team> = league.teams.iter().collect();
    by_points.sort_by(|a, b| b.points_for.partial_cmp(&a.points_for).unwrap_or(Ordering::Equal));
    let mut records: Vec<&Team> = league.teams.iter().collect();
    records.sort_by(|a, b| by_record(a, b));

    SeasonAwards {
        most_points: by_points.first().map(|t| t.id.clone()),
        best_record: records.first().map(|t| t.id.clone()),
    }
}

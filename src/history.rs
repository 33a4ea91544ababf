// Franchise history: career records that follow a franchise across renames and relocations.
// Three sources feed the aggregate: season entries, standalone historical matches and the live
// schedule's final games (mapped from team ids to the franchise that currently owns the team).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::league::League;

/// A league-membership identity that outlives any particular team name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Franchise {
    pub id: String,
    pub name: String,
    /// None for legacy franchises with no current roster
    #[serde(default)]
    pub current_team_id: Option<String>,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonEntry {
    pub franchise_id: String,
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub manager: String,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    /// Final standing, 1 = champion
    #[serde(default)]
    pub finish: Option<u32>,
}

impl SeasonEntry {
    pub fn new(franchise_id: &str, wins: u32, losses: u32, finish: Option<u32>) -> SeasonEntry {
        SeasonEntry {
            franchise_id: franchise_id.to_string(),
            team_name: String::new(),
            manager: String::new(),
            wins,
            losses,
            finish,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    pub year: i32,
    #[serde(default)]
    pub entries: Vec<SeasonEntry>,
}

/// A head-to-head box score from before live schedule tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub week: Option<u32>,
    pub home_franchise_id: String,
    pub away_franchise_id: String,
    #[serde(default)]
    pub home_score: f64,
    #[serde(default)]
    pub away_score: f64,
}

impl Match {
    pub fn new(year: i32, home: &str, away: &str, home_score: f64, away_score: f64) -> Match {
        Match {
            id: None,
            year: Some(year),
            week: None,
            home_franchise_id: home.to_string(),
            away_franchise_id: away.to_string(),
            home_score,
            away_score,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    #[serde(default)]
    pub franchises: Vec<Franchise>,
    #[serde(default)]
    pub seasons: Vec<Season>,
    #[serde(default)]
    pub matches: Vec<Match>,
}

impl History {
    pub fn franchise(&self, franchise_id: &str) -> Option<&Franchise> {
        self.franchises.iter().find(|f| f.id == franchise_id)
    }

    pub fn franchise_name(&self, franchise_id: &str) -> String {
        self.franchise(franchise_id)
            .map(|f| f.name.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub(crate) fn upsert_entry(&mut self, year: i32, entry: SeasonEntry) {
        let idx = match self.seasons.iter().position(|s| s.year == year) {
            Some(idx) => idx,
            None => {
                self.seasons.push(Season { year, entries: Vec::new() });
                self.seasons.len() - 1
            }
        };
        let season = &mut self.seasons[idx];
        match season
            .entries
            .iter()
            .position(|e| e.franchise_id == entry.franchise_id)
        {
            Some(i) => season.entries[i] = entry,
            None => season.entries.push(entry),
        }
    }

    /// A franchise's finish in a given year, if recorded
    pub fn finish_for(&self, franchise_id: &str, year: i32) -> Option<u32> {
        self.seasons
            .iter()
            .find(|s| s.year == year)?
            .entries
            .iter()
            .find(|e| e.franchise_id == franchise_id)?
            .finish
    }

    /// Every recorded (year, finish) for a franchise, oldest first
    pub fn franchise_finishes(&self, franchise_id: &str) -> Vec<(i32, u32)> {
        let mut out: Vec<(i32, u32)> = self
            .seasons
            .iter()
            .filter_map(|s| {
                s.entries
                    .iter()
                    .find(|e| e.franchise_id == franchise_id)
                    .and_then(|e| e.finish)
                    .map(|finish| (s.year, finish))
            })
            .collect();
        out.sort_by_key(|&(year, _)| year);
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeadToHead {
    pub opponent_id: String,
    pub wins: u32,
    pub losses: u32,
}

impl HeadToHead {
    pub fn games(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn win_pct(&self) -> f64 {
        if self.games() == 0 {
            0.0
        } else {
            self.wins as f64 / self.games() as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpponentSummary {
    pub opponent_id: String,
    pub pct: f64,
    pub games: u32,
}

/// Career numbers for one franchise
#[derive(Debug, Clone, Serialize)]
pub struct FranchiseStats {
    pub franchise_id: String,
    pub name: String,
    pub seasons: u32,
    pub wins: u32,
    pub losses: u32,
    pub championships: u32,
    pub playoff_apps: u32,
    pub top3: u32,
    pub top5: u32,
    pub win_pct: f64,
    pub total_matchups: u32,
    /// Head-to-head records in first-seen order
    pub opponents: Vec<HeadToHead>,
    pub easiest: Option<OpponentSummary>,
    pub toughest: Option<OpponentSummary>,
}

impl FranchiseStats {
    fn new(franchise_id: &str, name: String) -> FranchiseStats {
        FranchiseStats {
            franchise_id: franchise_id.to_string(),
            name,
            seasons: 0,
            wins: 0,
            losses: 0,
            championships: 0,
            playoff_apps: 0,
            top3: 0,
            top5: 0,
            win_pct: 0.0,
            total_matchups: 0,
            opponents: Vec::new(),
            easiest: None,
            toughest: None,
        }
    }

    pub fn opponent(&self, opponent_id: &str) -> Option<&HeadToHead> {
        self.opponents.iter().find(|o| o.opponent_id == opponent_id)
    }

    fn opponent_mut(&mut self, opponent_id: &str) -> &mut HeadToHead {
        let idx = match self.opponents.iter().position(|o| o.opponent_id == opponent_id) {
            Some(idx) => idx,
            None => {
                self.opponents.push(HeadToHead {
                    opponent_id: opponent_id.to_string(),
                    ..HeadToHead::default()
                });
                self.opponents.len() - 1
            }
        };
        &mut self.opponents[idx]
    }

    fn record_finish(&mut self, finish: u32) {
        if finish == 1 {
            self.championships += 1;
        }
        if finish <= 3 {
            self.top3 += 1;
        }
        if finish <= 4 {
            self.playoff_apps += 1;
        }
        if finish <= 5 {
            self.top5 += 1;
        }
    }

    fn finalize(&mut self) {
        let total = self.wins + self.losses;
        self.total_matchups = total;
        self.win_pct = if total > 0 { self.wins as f64 / total as f64 } else { 0.0 };

        let mut easiest: Option<OpponentSummary> = None;
        let mut toughest: Option<OpponentSummary> = None;
        for rec in &self.opponents {
            if rec.games() == 0 {
                continue;
            }
            let item = OpponentSummary {
                opponent_id: rec.opponent_id.clone(),
                pct: rec.win_pct(),
                games: rec.games(),
            };
            if easiest.as_ref().map_or(true, |e| item.pct > e.pct) {
                easiest = Some(item.clone());
            }
            if toughest.as_ref().map_or(true, |t| item.pct < t.pct) {
                toughest = Some(item);
            }
        }
        self.easiest = easiest;
        self.toughest = toughest;
    }
}

/// Accumulates stats keyed by franchise id, preserving first-seen order
struct Tally<'a> {
    history: &'a History,
    stats: Vec<FranchiseStats>,
}

impl<'a> Tally<'a> {
    fn ensure(&mut self, franchise_id: &str) -> usize {
        match self.stats.iter().position(|s| s.franchise_id == franchise_id) {
            Some(idx) => idx,
            None => {
                let name = self.history.franchise_name(franchise_id);
                self.stats.push(FranchiseStats::new(franchise_id, name));
                self.stats.len() - 1
            }
        }
    }

    /// One decided game: exactly one win and one loss. Ties are ignored.
    fn head_to_head(&mut self, home: &str, away: &str, home_score: f64, away_score: f64) {
        let h = self.ensure(home);
        let a = self.ensure(away);
        if home_score == away_score {
            return;
        }
        let home_won = home_score > away_score;
        {
            let rec = self.stats[h].opponent_mut(away);
            if home_won { rec.wins += 1 } else { rec.losses += 1 }
        }
        let rec = self.stats[a].opponent_mut(home);
        if home_won { rec.losses += 1 } else { rec.wins += 1 }
    }
}

fn compare_stats(a: &FranchiseStats, b: &FranchiseStats) -> Ordering {
    b.championships
        .cmp(&a.championships)
        .then_with(|| b.win_pct.partial_cmp(&a.win_pct).unwrap_or(Ordering::Equal))
        .then_with(|| b.seasons.cmp(&a.seasons))
        .then_with(|| a.name.cmp(&b.name))
}

/// Career stats for every franchise, best first
pub fn compute_history_stats(league: &League) -> Vec<FranchiseStats> {
    let history = &league.history;
    let mut tally = Tally { history, stats: Vec::new() };

    for f in &history.franchises {
        tally.ensure(&f.id);
    }

    for season in &history.seasons {
        for entry in &season.entries {
            let idx = tally.ensure(&entry.franchise_id);
            let st = &mut tally.stats[idx];
            st.seasons += 1;
            st.wins += entry.wins;
            st.losses += entry.losses;
            if let Some(finish) = entry.finish {
                st.record_finish(finish);
            }
        }
    }

    for m in &history.matches {
        if m.home_franchise_id.is_empty() || m.away_franchise_id.is_empty() {
            continue;
        }
        tally.head_to_head(&m.home_franchise_id, &m.away_franchise_id, m.home_score, m.away_score);
    }

    // The live season counts once, unless it was already archived as a season entry.
    let year = league.settings.season_year;
    for team in &league.teams {
        let Some(f) = league.franchise_for_team(&team.id) else {
            continue;
        };
        if history.seasons.iter().any(|s| {
            s.year == year && s.entries.iter().any(|e| e.franchise_id == f.id)
        }) {
            continue;
        }
        let idx = tally.ensure(&f.id);
        let st = &mut tally.stats[idx];
        st.seasons += 1;
        st.wins += team.wins;
        st.losses += team.losses;
    }

    for (_, game) in league.games() {
        if !game.r#final {
            continue;
        }
        let (Some(fh), Some(fa)) = (
            league.franchise_for_team(&game.home),
            league.franchise_for_team(&game.away),
        ) else {
            continue;
        };
        tally.head_to_head(&fh.id, &fa.id, game.home_score, game.away_score);
    }

    let mut stats = tally.stats;
    for st in stats.iter_mut() {
        st.finalize();
    }
    stats.sort_by(compare_stats);
    stats
}

/// One game between two franchises, seen from the first franchise's side
#[derive(Debug, Clone, Serialize)]
pub struct RivalryGame {
    pub year: Option<i32>,
    pub week: Option<u32>,
    pub home_franchise_id: String,
    pub away_franchise_id: String,
    pub home_score: f64,
    pub away_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Rivalry {
    pub franchise_a: String,
    pub franchise_b: String,
    pub wins_a: u32,
    pub wins_b: u32,
    /// Mean of A's score minus B's score over every listed game
    pub avg_margin: f64,
    pub games: Vec<RivalryGame>,
}

/// Every meeting between two franchises, optionally limited to one year.
/// Live final games are dated to the league's current season year.
pub fn rivalry(league: &League, a: &str, b: &str, year: Option<i32>) -> Rivalry {
    let mut games = Vec::new();
    if a != b {
        let pairing = |home: &str, away: &str| (home == a && away == b) || (home == b && away == a);

        for m in &league.history.matches {
            if year.is_some() && m.year != year {
                continue;
            }
            if pairing(&m.home_franchise_id, &m.away_franchise_id) {
                games.push(RivalryGame {
                    year: m.year,
                    week: m.week,
                    home_franchise_id: m.home_franchise_id.clone(),
                    away_franchise_id: m.away_franchise_id.clone(),
                    home_score: m.home_score,
                    away_score: m.away_score,
                });
            }
        }

        let current = league.settings.season_year;
        if year.map_or(true, |y| y == current) {
            for (week, game) in league.games() {
                if !game.r#final {
                    continue;
                }
                let (Some(fh), Some(fa)) = (
                    league.franchise_for_team(&game.home),
                    league.franchise_for_team(&game.away),
                ) else {
                    continue;
                };
                if pairing(&fh.id, &fa.id) {
                    games.push(RivalryGame {
                        year: Some(current),
                        week: Some(week),
                        home_franchise_id: fh.id.clone(),
                        away_franchise_id: fa.id.clone(),
                        home_score: game.home_score,
                        away_score: game.away_score,
                    });
                }
            }
        }
    }

    let mut wins_a = 0;
    let mut wins_b = 0;
    let mut margin_sum = 0.0;
    for g in &games {
        let (score_a, score_b) = if g.home_franchise_id == a {
            (g.home_score, g.away_score)
        } else {
            (g.away_score, g.home_score)
        };
        if score_a > score_b {
            wins_a += 1;
        } else if score_b > score_a {
            wins_b += 1;
        }
        margin_sum += score_a - score_b;
    }
    let avg_margin = if games.is_empty() { 0.0 } else { margin_sum / games.len() as f64 };

    games.sort_by(|x, y| {
        y.year
            .cmp(&x.year)
            .then_with(|| y.week.cmp(&x.week))
    });

    Rivalry {
        franchise_a: a.to_string(),
        franchise_b: b.to_string(),
        wins_a,
        wins_b,
        avg_margin,
        games,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::{Settings, Team};
    use crate::roster::default_slot_limits;
    use rand::Rng;

    fn league_with_history() -> League {
        let mut settings = Settings::default();
        settings.season_year = 2024;
        let mut league = League::new(settings);
        let limits = default_slot_limits();
        league.teams.push(Team::new("t1", "Alpha", "A", &limits));
        league.teams.push(Team::new("t2", "Bravo", "B", &limits));
        league.history.franchises = vec![
            Franchise { id: "fa".into(), name: "Alpha".into(), current_team_id: Some("t1".into()), active: true },
            Franchise { id: "fb".into(), name: "Bravo".into(), current_team_id: Some("t2".into()), active: true },
            Franchise { id: "fz".into(), name: "Zulu".into(), current_team_id: None, active: false },
        ];
        league
            .upsert_season_entry(2022, SeasonEntry::new("fa", 10, 3, Some(1)))
            .upsert_season_entry(2022, SeasonEntry::new("fb", 6, 7, Some(4)))
            .upsert_season_entry(2022, SeasonEntry::new("fz", 3, 10, Some(9)))
            .upsert_season_entry(2023, SeasonEntry::new("fb", 11, 2, Some(1)))
            .upsert_season_entry(2023, SeasonEntry::new("fa", 7, 6, Some(3)))
            .add_match(Match::new(2022, "fa", "fb", 120.0, 100.0))
            .add_match(Match::new(2023, "fb", "fa", 110.0, 90.0))
            .add_match(Match::new(2023, "fa", "fz", 130.0, 80.0))
            .add_match(Match::new(2023, "fz", "fb", 99.0, 99.0))
            .add_game(1, "t1", "t2")
            .set_game_result(1, 0, 101.0, 88.0, true)
    }

    fn stats_for<'a>(stats: &'a [FranchiseStats], id: &str) -> &'a FranchiseStats {
        stats.iter().find(|s| s.franchise_id == id).unwrap()
    }

    #[test]
    fn test_career_totals() {
        let stats = compute_history_stats(&league_with_history());
        let a = stats_for(&stats, "fa");
        // two archived seasons plus the live one
        assert_eq!(a.seasons, 3);
        assert_eq!(a.wins, 10 + 7 + 1);
        assert_eq!(a.losses, 3 + 6);
        assert_eq!(a.championships, 1);
        assert_eq!(a.playoff_apps, 2);
        assert_eq!(a.top3, 2);
        assert_eq!(a.top5, 2);

        let z = stats_for(&stats, "fz");
        assert_eq!(z.seasons, 1);
        assert_eq!(z.top5, 0);
    }

    #[test]
    fn test_head_to_head_merges_sources() {
        let stats = compute_history_stats(&league_with_history());
        let a = stats_for(&stats, "fa");
        let vs_b = a.opponent("fb").unwrap();
        // 2022 match win, 2023 match loss, live win
        assert_eq!((vs_b.wins, vs_b.losses), (2, 1));
        // tied match is excluded entirely
        let z = stats_for(&stats, "fz");
        assert!(z.opponent("fb").map_or(true, |r| r.games() == 0));
    }

    #[test]
    fn test_easiest_and_toughest() {
        let stats = compute_history_stats(&league_with_history());
        let a = stats_for(&stats, "fa");
        assert_eq!(a.easiest.as_ref().unwrap().opponent_id, "fz");
        assert_eq!(a.toughest.as_ref().unwrap().opponent_id, "fb");
    }

    #[test]
    fn test_sort_order() {
        let stats = compute_history_stats(&league_with_history());
        // fa and fb both have one title; fa has the better win pct
        let order: Vec<&str> = stats.iter().map(|s| s.franchise_id.as_str()).collect();
        assert_eq!(order, vec!["fa", "fb", "fz"]);
    }

    #[test]
    fn test_archived_current_season_not_double_counted() {
        let league = league_with_history()
            .upsert_season_entry(2024, SeasonEntry::new("fa", 1, 0, None));
        let stats = compute_history_stats(&league);
        let a = stats_for(&stats, "fa");
        assert_eq!(a.seasons, 3);
        assert_eq!(a.wins, 18);
    }

    #[test]
    fn test_unknown_franchise_named_unknown() {
        let league = league_with_history().add_match(Match::new(2020, "fa", "ghost", 50.0, 60.0));
        let stats = compute_history_stats(&league);
        assert_eq!(stats_for(&stats, "ghost").name, "Unknown");
    }

    #[test]
    fn test_head_to_head_symmetry_randomized() {
        let mut rng = rand::thread_rng();
        let ids = ["fa", "fb", "fz"];
        for _ in 0..50 {
            let mut league = league_with_history();
            for _ in 0..rng.gen_range(0..30) {
                let h = ids[rng.gen_range(0..ids.len())];
                let a = ids[rng.gen_range(0..ids.len())];
                let hs = rng.gen_range(0..5) as f64 * 10.0;
                let as_ = rng.gen_range(0..5) as f64 * 10.0;
                league = league.add_match(Match::new(2021, h, a, hs, as_));
            }
            let stats = compute_history_stats(&league);
            for x in &stats {
                for rec in &x.opponents {
                    let y = stats_for(&stats, &rec.opponent_id);
                    let back = y.opponent(&x.franchise_id).unwrap();
                    assert_eq!(rec.wins, back.losses);
                    assert_eq!(rec.losses, back.wins);
                }
            }
        }
    }

    #[test]
    fn test_finish_lookup() {
        let league = league_with_history();
        assert_eq!(league.history.finish_for("fb", 2023), Some(1));
        assert_eq!(league.history.finish_for("fz", 2023), None);
        assert_eq!(league.history.finish_for("fa", 1999), None);
        assert_eq!(league.history.franchise_finishes("fa"), vec![(2022, 1), (2023, 3)]);
    }

    #[test]
    fn test_upsert_replaces_entry() {
        let league = league_with_history()
            .upsert_season_entry(2022, SeasonEntry::new("fa", 12, 1, Some(2)));
        assert_eq!(league.history.finish_for("fa", 2022), Some(2));
        let season = league.history.seasons.iter().find(|s| s.year == 2022).unwrap();
        assert_eq!(season.entries.len(), 3);
    }

    #[test]
    fn test_rivalry() {
        let league = league_with_history();
        let r = rivalry(&league, "fa", "fb", None);
        assert_eq!(r.games.len(), 3);
        assert_eq!((r.wins_a, r.wins_b), (2, 1));
        // (20 - 20 + 13) / 3
        assert!((r.avg_margin - 13.0 / 3.0).abs() < 1e-9);
        assert_eq!(r.games[0].year, Some(2024));

        let only_2023 = rivalry(&league, "fa", "fb", Some(2023));
        assert_eq!(only_2023.games.len(), 1);
        assert_eq!(only_2023.wins_b, 1);

        assert!(rivalry(&league, "fa", "fa", None).games.is_empty());
    }
}

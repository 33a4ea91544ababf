// The league snapshot: settings, teams, players, schedule and history, plus the admin transforms over it.
// Every transform takes `&self` and returns a fresh League, so callers can keep the old value for undo.
// Snapshots written by older versions are upgraded while decoding (see `League::from_json`).

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use tracing::{debug, info};

use crate::error::{LeagueError, Result};
use crate::history::{Franchise, History, Match, SeasonEntry};
use crate::player::{starter_players, Player};
use crate::roster::{default_slot_limits, deserialize_slot_limits, Roster, Slot, SlotLimits};

/// Snapshot layout version written by this crate
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Snapshots that predate versioning are treated as version 1
fn legacy_schema_version() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub manager: String,
    #[serde(default)]
    pub roster: Roster,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub points_for: f64,
    #[serde(default)]
    pub points_against: f64,
}

impl Team {
    pub fn new(id: &str, name: &str, manager: &str, limits: &SlotLimits) -> Team {
        Team {
            id: id.to_string(),
            name: name.to_string(),
            manager: manager.to_string(),
            roster: Roster::new(limits),
            wins: 0,
            losses: 0,
            points_for: 0.0,
            points_against: 0.0,
        }
    }

    /// wins / (wins + losses), 0 before any decided game
    pub fn win_pct(&self) -> f64 {
        let games = self.wins + self.losses;
        if games == 0 {
            0.0
        } else {
            self.wins as f64 / games as f64
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledGame {
    pub home: String,
    pub away: String,
    #[serde(default)]
    pub home_score: f64,
    #[serde(default)]
    pub away_score: f64,
    #[serde(default)]
    pub r#final: bool,
}

impl ScheduledGame {
    pub fn new(home: &str, away: &str) -> ScheduledGame {
        ScheduledGame {
            home: home.to_string(),
            away: away.to_string(),
            home_score: 0.0,
            away_score: 0.0,
            r#final: false,
        }
    }

    pub fn involves(&self, team_id: &str) -> bool {
        self.home == team_id || self.away == team_id
    }

    /// Id of the winning team of a final, non-tied game
    pub fn winner(&self) -> Option<&str> {
        if !self.r#final || self.home_score == self.away_score {
            return None;
        }
        if self.home_score > self.away_score {
            Some(&self.home)
        } else {
            Some(&self.away)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Week {
    pub week: u32,
    #[serde(default)]
    pub games: Vec<ScheduledGame>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commissioner {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_league_name")]
    pub league_name: String,
    #[serde(default)]
    pub commissioner: Commissioner,
    #[serde(default = "default_slot_limits", deserialize_with = "deserialize_slot_limits")]
    pub roster_slots: SlotLimits,
    #[serde(default = "default_scoring")]
    pub scoring: String,
    #[serde(default = "default_season_year")]
    pub season_year: i32,
    #[serde(default = "default_weeks")]
    pub weeks: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            league_name: default_league_name(),
            commissioner: Commissioner::default(),
            roster_slots: default_slot_limits(),
            scoring: default_scoring(),
            season_year: default_season_year(),
            weeks: default_weeks(),
        }
    }
}

fn default_league_name() -> String {
    "League Hub".to_string()
}

fn default_scoring() -> String {
    "ESPN Redraft Default".to_string()
}

fn default_season_year() -> i32 {
    Utc::now().year()
}

fn default_weeks() -> u32 {
    13
}

/// Connection details for the optional hosted mirror. Stored only; the engine never syncs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub supabase_url: String,
    #[serde(default)]
    pub anon_key: String,
    #[serde(default = "default_cloud_table")]
    pub table: String,
    #[serde(default = "default_cloud_league_id")]
    pub league_id: String,
    #[serde(default = "default_commish_write")]
    pub commish_write: bool,
    #[serde(default)]
    pub last_pulled: i64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        CloudConfig {
            enabled: false,
            supabase_url: String::new(),
            anon_key: String::new(),
            table: default_cloud_table(),
            league_id: default_cloud_league_id(),
            commish_write: default_commish_write(),
            last_pulled: 0,
        }
    }
}

fn default_cloud_table() -> String {
    "leagues".to_string()
}

fn default_cloud_league_id() -> String {
    "main".to_string()
}

fn default_commish_write() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    #[serde(default)]
    pub commish_unlocked: bool,
    #[serde(default)]
    pub cloud: CloudConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct League {
    #[serde(default = "legacy_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub ui: UiState,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub schedule: Vec<Week>,
    #[serde(default)]
    pub history: History,
    #[serde(default)]
    pub trade_block: Vec<Value>,
    /// Fields this crate does not interpret (news, feed, recaps, champions...), kept for re-encoding
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl League {
    /// An empty league with the given settings
    pub fn new(settings: Settings) -> League {
        League {
            schema_version: CURRENT_SCHEMA_VERSION,
            settings,
            ui: UiState::default(),
            teams: Vec::new(),
            players: Vec::new(),
            schedule: Vec::new(),
            history: History::default(),
            trade_block: Vec::new(),
            extra: Map::new(),
        }
    }

    /// A fresh league: nine teams, the starter player pool, no games
    pub fn seed() -> League {
        let mut league = League::new(Settings::default());
        let limits = league.settings.roster_slots.clone();
        league.teams = (1..=9)
            .map(|i| {
                Team::new(
                    &format!("t{}", i),
                    &format!("Team {}", i),
                    &format!("Manager {}", i),
                    &limits,
                )
            })
            .collect();
        league.players = starter_players();
        league.ensure_franchises();
        league
    }

    /// Decode a snapshot, filling defaults for anything an older version did not write
    pub fn from_json(text: &str) -> Result<League> {
        let mut league: League = serde_json::from_str(text)?;
        if league.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(LeagueError::SchemaVersion {
                found: league.schema_version,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }
        if league.schema_version < CURRENT_SCHEMA_VERSION {
            info!(
                from = league.schema_version,
                to = CURRENT_SCHEMA_VERSION,
                "upgrading league snapshot"
            );
        }
        league.ensure_franchises();
        league.schema_version = CURRENT_SCHEMA_VERSION;
        Ok(league)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &str) -> Result<League> {
        let text = fs::read_to_string(path).map_err(|source| LeagueError::Io {
            path: path.to_string(),
            source,
        })?;
        let league = League::from_json(&text)?;
        info!(path, teams = league.teams.len(), "loaded league");
        Ok(league)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        fs::write(path, self.to_json()?).map_err(|source| LeagueError::Io {
            path: path.to_string(),
            source,
        })?;
        info!(path, "saved league");
        Ok(())
    }

    /// Every team gets a backing franchise with id "f" + team id
    fn ensure_franchises(&mut self) {
        for team in &self.teams {
            let backed = self
                .history
                .franchises
                .iter()
                .any(|f| f.current_team_id.as_deref() == Some(team.id.as_str()));
            if !backed {
                self.history.franchises.push(Franchise {
                    id: format!("f{}", team.id),
                    name: team.name.clone(),
                    current_team_id: Some(team.id.clone()),
                    active: true,
                });
            }
        }
    }

    pub fn team(&self, team_id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    fn team_index(&self, team_id: &str) -> Option<usize> {
        self.teams.iter().position(|t| t.id == team_id)
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn franchise_for_team(&self, team_id: &str) -> Option<&Franchise> {
        self.history
            .franchises
            .iter()
            .find(|f| f.current_team_id.as_deref() == Some(team_id))
    }

    pub fn week(&self, week: u32) -> Option<&Week> {
        self.schedule.iter().find(|w| w.week == week)
    }

    /// All scheduled games with their week number, in schedule order
    pub fn games(&self) -> impl Iterator<Item = (u32, &ScheduledGame)> {
        self.schedule
            .iter()
            .flat_map(|w| w.games.iter().map(move |g| (w.week, g)))
    }

    pub fn is_rostered(&self, player_id: &str) -> bool {
        self.teams.iter().any(|t| t.roster.contains(player_id))
    }

    /// Players in the pool that no team rosters
    pub fn free_agents(&self) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| !self.is_rostered(&p.id))
            .collect()
    }

    /// Reset team totals and re-aggregate them from the schedule.
    /// Points accumulate from every entered score; wins and losses only from final games.
    pub(crate) fn recompute_totals(&mut self) {
        for team in self.teams.iter_mut() {
            team.wins = 0;
            team.losses = 0;
            team.points_for = 0.0;
            team.points_against = 0.0;
        }
        let games: Vec<ScheduledGame> = self.games().map(|(_, g)| g.clone()).collect();
        for game in games {
            let (Some(h), Some(a)) = (self.team_index(&game.home), self.team_index(&game.away)) else {
                continue;
            };
            self.teams[h].points_for += game.home_score;
            self.teams[h].points_against += game.away_score;
            self.teams[a].points_for += game.away_score;
            self.teams[a].points_against += game.home_score;
            if let Some(winner) = game.winner() {
                let (w, l) = if winner == game.home { (h, a) } else { (a, h) };
                self.teams[w].wins += 1;
                self.teams[l].losses += 1;
            }
        }
    }

    fn fresh_id(&self, prefix: &str, taken: impl Fn(&str) -> bool) -> String {
        let base = format!("{}{}", prefix, Utc::now().timestamp_millis());
        let mut id = base.clone();
        let mut n = 1;
        while taken(&id) {
            id = format!("{}-{}", base, n);
            n += 1;
        }
        id
    }

    /// Move a player into a slot of a team's roster, pulling them from the player pool if not yet rostered.
    pub fn move_player(&self, team_id: &str, player_id: &str, to: Slot) -> League {
        let mut next = self.clone();
        let Some(ti) = next.team_index(team_id) else {
            debug!(team = team_id, "move_player: unknown team");
            return next;
        };
        let player = match next.teams[ti].roster.find_slot(player_id) {
            Some(at) => next.teams[ti].roster.slot(at.slot)[at.index].clone(),
            None => {
                if next.is_rostered(player_id) {
                    debug!(player = player_id, "move_player: rostered by another team");
                    return next;
                }
                match next.player(player_id) {
                    Some(p) => p.clone(),
                    None => {
                        debug!(player = player_id, "move_player: unknown player");
                        return next;
                    }
                }
            }
        };
        next.teams[ti].roster.move_player(&player, to);
        next
    }

    pub fn remove_player(&self, team_id: &str, player_id: &str) -> League {
        let mut next = self.clone();
        match next.team_index(team_id) {
            Some(ti) => {
                next.teams[ti].roster.remove_player(player_id);
            }
            None => debug!(team = team_id, "remove_player: unknown team"),
        }
        next
    }

    pub fn add_team(&self, name: &str, manager: &str) -> League {
        let mut next = self.clone();
        let name = name.trim();
        if name.is_empty() {
            debug!("add_team: empty name");
            return next;
        }
        let id = self.fresh_id("t", |id| self.team(id).is_some());
        let limits = next.settings.roster_slots.clone();
        next.teams.push(Team::new(&id, name, manager.trim(), &limits));
        next.ensure_franchises();
        next
    }

    /// Drop a team, its games and its franchise link, then recompute totals
    pub fn remove_team(&self, team_id: &str) -> League {
        let mut next = self.clone();
        if next.team_index(team_id).is_none() {
            debug!(team = team_id, "remove_team: unknown team");
            return next;
        }
        if let Some(f) = next
            .history
            .franchises
            .iter_mut()
            .find(|f| f.current_team_id.as_deref() == Some(team_id))
        {
            f.current_team_id = None;
            f.active = false;
        }
        for week in next.schedule.iter_mut() {
            week.games.retain(|g| !g.involves(team_id));
        }
        next.teams.retain(|t| t.id != team_id);
        next.recompute_totals();
        next
    }

    pub fn add_game(&self, week: u32, home: &str, away: &str) -> League {
        let mut next = self.clone();
        if home == away || self.team(home).is_none() || self.team(away).is_none() {
            debug!(week, home, away, "add_game: invalid pairing");
            return next;
        }
        let idx = match next.schedule.iter().position(|w| w.week == week) {
            Some(idx) => idx,
            None => {
                next.schedule.push(Week { week, games: Vec::new() });
                next.schedule.len() - 1
            }
        };
        next.schedule[idx].games.push(ScheduledGame::new(home, away));
        next.recompute_totals();
        next
    }

    /// Enter scores and the final flag for the `index`-th game of a week
    pub fn set_game_result(
        &self,
        week: u32,
        index: usize,
        home_score: f64,
        away_score: f64,
        is_final: bool,
    ) -> League {
        let mut next = self.clone();
        let game = next
            .schedule
            .iter_mut()
            .find(|w| w.week == week)
            .and_then(|w| w.games.get_mut(index));
        match game {
            Some(g) => {
                g.home_score = home_score;
                g.away_score = away_score;
                g.r#final = is_final;
            }
            None => {
                debug!(week, index, "set_game_result: no such game");
                return next;
            }
        }
        next.recompute_totals();
        next
    }

    pub fn remove_game(&self, week: u32, index: usize) -> League {
        let mut next = self.clone();
        if let Some(w) = next.schedule.iter_mut().find(|w| w.week == week) {
            if index < w.games.len() {
                w.games.remove(index);
            }
        }
        next.recompute_totals();
        next
    }

    /// Insert or replace a franchise's entry for a season year
    pub fn upsert_season_entry(&self, year: i32, entry: SeasonEntry) -> League {
        let mut next = self.clone();
        next.history.upsert_entry(year, entry);
        next
    }

    pub fn add_match(&self, mut record: Match) -> League {
        let mut next = self.clone();
        if record.home_franchise_id == record.away_franchise_id {
            debug!(franchise = %record.home_franchise_id, "add_match: franchise cannot play itself");
            return next;
        }
        if record.id.is_none() {
            record.id = Some(self.fresh_id("m", |id| {
                self.history.matches.iter().any(|m| m.id.as_deref() == Some(id))
            }));
        }
        next.history.matches.push(record);
        next
    }

    pub fn remove_match(&self, match_id: &str) -> League {
        let mut next = self.clone();
        next.history
            .matches
            .retain(|m| m.id.as_deref() != Some(match_id));
        next
    }

    /// Register a franchise, optionally linked to a current team.
    /// A team maps to one franchise: linking a team that already has one retires the old link.
    pub fn add_franchise(&self, name: &str, current_team_id: Option<&str>) -> League {
        let mut next = self.clone();
        let name = name.trim();
        if name.is_empty() {
            debug!("add_franchise: empty name");
            return next;
        }
        if let Some(team_id) = current_team_id {
            if self.team(team_id).is_none() {
                debug!(team = team_id, "add_franchise: unknown team");
                return next;
            }
            for f in next.history.franchises.iter_mut() {
                if f.current_team_id.as_deref() == Some(team_id) {
                    debug!(franchise = %f.id, team = team_id, "add_franchise: unlinking previous franchise");
                    f.current_team_id = None;
                    f.active = false;
                }
            }
        }
        let id = self.fresh_id("f", |id| self.history.franchise(id).is_some());
        next.history.franchises.push(Franchise {
            id,
            name: name.to_string(),
            current_team_id: current_team_id.map(str::to_string),
            active: current_team_id.is_some(),
        });
        next
    }

    /// Replace the player pool wholesale, e.g. after a CSV import
    pub fn with_players(&self, players: Vec<Player>) -> League {
        let mut next = self.clone();
        next.players = players;
        next
    }

    /// Append imported players whose id is not already in the pool
    pub fn merge_players(&self, players: Vec<Player>) -> League {
        let mut next = self.clone();
        let before = next.players.len();
        for player in players {
            if next.player(&player.id).is_none() {
                next.players.push(player);
            }
        }
        debug!(added = next.players.len() - before, "merged players");
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_team_league() -> League {
        let mut league = League::new(Settings::default());
        let limits = default_slot_limits();
        league.teams.push(Team::new("t1", "Alpha", "A", &limits));
        league.teams.push(Team::new("t2", "Bravo", "B", &limits));
        league.players = starter_players();
        league.ensure_franchises();
        league
    }

    #[test]
    fn test_seed_has_franchise_per_team() {
        let league = League::seed();
        assert_eq!(league.teams.len(), 9);
        for team in &league.teams {
            let f = league.franchise_for_team(&team.id).unwrap();
            assert_eq!(f.id, format!("f{}", team.id));
            assert!(f.active);
        }
    }

    #[test]
    fn test_final_game_recompute() {
        let league = two_team_league()
            .add_game(1, "t1", "t2")
            .set_game_result(1, 0, 100.0, 90.0, true);
        let home = league.team("t1").unwrap();
        let away = league.team("t2").unwrap();
        assert_eq!((home.wins, home.losses), (1, 0));
        assert_eq!((away.wins, away.losses), (0, 1));
        assert_eq!(home.points_for, 100.0);
        assert_eq!(home.points_against, 90.0);
        assert_eq!(away.points_for, 90.0);
        assert_eq!(away.points_against, 100.0);
    }

    #[test]
    fn test_tied_and_open_games_award_no_result() {
        let league = two_team_league()
            .add_game(1, "t1", "t2")
            .set_game_result(1, 0, 95.0, 95.0, true)
            .add_game(2, "t2", "t1")
            .set_game_result(2, 0, 80.0, 70.0, false);
        let t1 = league.team("t1").unwrap();
        assert_eq!((t1.wins, t1.losses), (0, 0));
        assert_eq!(t1.points_for, 165.0);
    }

    #[test]
    fn test_transforms_do_not_touch_input() {
        let league = two_team_league();
        let next = league.move_player("t1", "p1", Slot::QB);
        assert!(league.team("t1").unwrap().roster.qb.is_empty());
        assert_eq!(next.team("t1").unwrap().roster.qb.len(), 1);
    }

    #[test]
    fn test_player_cannot_join_two_teams() {
        let league = two_team_league()
            .move_player("t1", "p1", Slot::QB)
            .move_player("t2", "p1", Slot::QB);
        assert!(league.team("t2").unwrap().roster.qb.is_empty());
        assert!(league.free_agents().iter().all(|p| p.id != "p1"));
    }

    #[test]
    fn test_move_unknown_ids_is_noop() {
        let league = two_team_league();
        let next = league.move_player("nope", "p1", Slot::QB).move_player("t1", "nope", Slot::BENCH);
        assert!(next.team("t1").unwrap().roster.players().is_empty());
    }

    #[test]
    fn test_remove_team_unlinks_franchise_and_games() {
        let league = two_team_league()
            .add_game(1, "t1", "t2")
            .set_game_result(1, 0, 100.0, 90.0, true)
            .remove_team("t2");
        assert!(league.team("t2").is_none());
        assert!(league.week(1).unwrap().games.is_empty());
        assert_eq!(league.team("t1").unwrap().wins, 0);
        let f = league.history.franchise("ft2").unwrap();
        assert_eq!(f.current_team_id, None);
        assert!(!f.active);
    }

    #[test]
    fn test_add_game_rejects_self_pairing() {
        let league = two_team_league().add_game(1, "t1", "t1");
        assert!(league.schedule.is_empty());
    }

    #[test]
    fn test_add_team_creates_franchise() {
        let league = two_team_league().add_team("  Charlie ", "C");
        let team = league.teams.last().unwrap();
        assert_eq!(team.name, "Charlie");
        assert!(league.franchise_for_team(&team.id).is_some());
        assert_eq!(team.roster.limits, default_slot_limits());
    }

    #[test]
    fn test_legacy_snapshot_upgrade() {
        let json = r#"{
            "settings": {"leagueName": "Old League", "weeks": 14},
            "teams": [{"id": "t1", "name": "Alpha", "manager": "A", "wins": 3, "losses": 1,
                       "pointsFor": 400, "pointsAgainst": 350}],
            "players": [],
            "schedule": [],
            "news": {"posts": [{"title": "hello"}]}
        }"#;
        let league = League::from_json(json).unwrap();
        assert_eq!(league.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(league.settings.weeks, 14);
        assert_eq!(league.history.franchises.len(), 1);
        assert!(!league.ui.commish_unlocked);
        assert_eq!(league.ui.cloud.table, "leagues");
        assert!(league.trade_block.is_empty());

        // unknown sections survive a round trip
        let encoded = league.to_json().unwrap();
        let value: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["news"]["posts"][0]["title"], "hello");
        assert_eq!(value["schemaVersion"], CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_legacy_import_positions_load() {
        let json = r#"{
            "settings": {"rosterSlots": {"QB": 1, "DST": 1, "IR": 2}},
            "teams": [],
            "players": [
                {"id": "x", "name": "Ravens", "pos": "DEF", "nfl": "BAL", "projected": 140},
                {"id": "y", "name": "Tucker", "pos": "PK", "nfl": "BAL"}
            ],
            "schedule": []
        }"#;
        let league = League::from_json(json).unwrap();
        assert_eq!(league.player("x").unwrap().position, crate::player::Position::DST);
        assert_eq!(league.player("y").unwrap().position, crate::player::Position::K);
        assert_eq!(league.settings.roster_slots.get(&Slot::DST), Some(&1));
        assert_eq!(league.settings.roster_slots.len(), 2);

        let value: Value = serde_json::from_str(&league.to_json().unwrap()).unwrap();
        assert_eq!(value["players"][0]["pos"], "DST");
        assert_eq!(value["settings"]["rosterSlots"]["QB"], 1);
    }

    #[test]
    fn test_merge_players_keeps_existing() {
        let league = two_team_league();
        let incoming = vec![
            Player::new("p1", "Someone Else", crate::player::Position::QB, "NYJ", 1.0),
            Player::new("new", "New Guy", crate::player::Position::WR, "NYJ", 100.0),
        ];
        let merged = league.merge_players(incoming.clone());
        assert_eq!(merged.players.len(), league.players.len() + 1);
        assert_eq!(merged.player("p1").unwrap().name, "Patrick Mahomes");
        assert_eq!(league.with_players(incoming).players.len(), 2);
    }

    #[test]
    fn test_add_franchise_moves_team_link() {
        let league = League::seed();
        let next = league.add_franchise("Rebrand", Some("t1"));
        let bound: Vec<&Franchise> = next
            .history
            .franchises
            .iter()
            .filter(|f| f.current_team_id.as_deref() == Some("t1"))
            .collect();
        assert_eq!(bound.len(), 1);
        assert_eq!(bound[0].name, "Rebrand");
        assert!(bound[0].active);
        assert_eq!(next.franchise_for_team("t1").unwrap().name, "Rebrand");

        let old = next.history.franchise("ft1").unwrap();
        assert_eq!(old.current_team_id, None);
        assert!(!old.active);
        assert_eq!(next.history.franchises.len(), league.history.franchises.len() + 1);

        // input untouched
        assert_eq!(league.franchise_for_team("t1").unwrap().id, "ft1");
    }

    #[test]
    fn test_add_franchise_rejects_unknown_team() {
        let league = League::seed();
        let next = league.add_franchise("Ghost", Some("nope"));
        assert_eq!(next.history.franchises.len(), league.history.franchises.len());
        assert_eq!(league.add_franchise("   ", None).history.franchises.len(), league.history.franchises.len());

        let unlinked = league.add_franchise("Old Guard", None);
        let added = unlinked.history.franchises.last().unwrap();
        assert_eq!(added.name, "Old Guard");
        assert_eq!(added.current_team_id, None);
        assert!(!added.active);
    }

    #[test]
    fn test_remove_player() {
        let league = two_team_league().move_player("t1", "p1", Slot::QB);
        let next = league.remove_player("t1", "p1");
        assert!(next.team("t1").unwrap().roster.qb.is_empty());
        assert!(next.free_agents().iter().any(|p| p.id == "p1"));
        assert_eq!(league.team("t1").unwrap().roster.qb.len(), 1);

        let same = league.remove_player("nope", "p1");
        assert_eq!(same.team("t1").unwrap().roster.qb.len(), 1);
    }

    #[test]
    fn test_remove_game_recomputes_totals() {
        let league = two_team_league()
            .add_game(1, "t1", "t2")
            .set_game_result(1, 0, 100.0, 90.0, true)
            .add_game(1, "t2", "t1")
            .set_game_result(1, 1, 80.0, 70.0, true);
        let next = league.remove_game(1, 0);

        let t1 = next.team("t1").unwrap();
        assert_eq!((t1.wins, t1.losses), (0, 1));
        assert_eq!(t1.points_for, 70.0);
        assert_eq!(t1.points_against, 80.0);
        let games = &next.week(1).unwrap().games;
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].home, "t2");

        let before = league.team("t1").unwrap();
        assert_eq!((before.wins, before.losses), (1, 1));
        assert_eq!(before.points_for, 170.0);
        assert_eq!(league.week(1).unwrap().games.len(), 2);

        // out of range is a no-op
        assert_eq!(league.remove_game(1, 7).week(1).unwrap().games.len(), 2);
    }

    #[test]
    fn test_remove_match_by_id() {
        let league = two_team_league()
            .add_match(Match::new(2022, "ft1", "ft2", 100.0, 90.0))
            .add_match(Match::new(2023, "ft2", "ft1", 110.0, 95.0));
        let ids: Vec<String> = league
            .history
            .matches
            .iter()
            .map(|m| m.id.clone().unwrap())
            .collect();
        assert_ne!(ids[0], ids[1]);

        let next = league.remove_match(&ids[0]);
        assert_eq!(next.history.matches.len(), 1);
        assert_eq!(next.history.matches[0].id.as_deref(), Some(ids[1].as_str()));
        assert_eq!(league.history.matches.len(), 2);
        assert_eq!(league.remove_match("missing").history.matches.len(), 2);
    }

    #[test]
    fn test_future_schema_rejected() {
        let err = League::from_json(r#"{"schemaVersion": 99}"#).unwrap_err();
        assert!(matches!(err, LeagueError::SchemaVersion { found: 99, .. }));
    }
}

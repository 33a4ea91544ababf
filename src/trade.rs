// Trade analyzer: best-lineup value for both sides before and after a proposed swap.

use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::config::TradeSettings;
use crate::league::{League, Team};
use crate::lineup::best_starting_value;
use crate::player::Player;
use crate::roster::Roster;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TradeGrade {
    A,
    B,
    C,
    D,
    F,
}

impl TradeGrade {
    /// Grade for the gap between the two sides' value changes
    pub fn from_swing(swing: f64, thresholds: &[f64; 4]) -> TradeGrade {
        let grades = [TradeGrade::A, TradeGrade::B, TradeGrade::C, TradeGrade::D];
        thresholds
            .iter()
            .zip(grades)
            .find(|(limit, _)| swing <= **limit)
            .map_or(TradeGrade::F, |(_, g)| g)
    }

    pub fn description(&self) -> &'static str {
        match self {
            TradeGrade::A => "Very even",
            TradeGrade::B => "Close",
            TradeGrade::C => "Somewhat uneven",
            TradeGrade::D => "Uneven",
            TradeGrade::F => "Lopsided",
        }
    }
}

impl fmt::Display for TradeGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            TradeGrade::A => "A",
            TradeGrade::B => "B",
            TradeGrade::C => "C",
            TradeGrade::D => "D",
            TradeGrade::F => "F",
        };
        write!(f, "{}", letter)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TradeSide {
    pub team_id: String,
    /// Players actually leaving this team (ids not on the roster are dropped)
    pub sends: Vec<String>,
    pub before: f64,
    pub after: f64,
    pub delta: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TradeAnalysis {
    pub side_a: TradeSide,
    pub side_b: TradeSide,
    pub swing: f64,
    pub grade: TradeGrade,
}

fn outgoing(team: &Team, ids: &[String]) -> Vec<Player> {
    ids.iter()
        .filter_map(|id| {
            let found = team.roster.find_slot(id).map(|at| team.roster.slot(at.slot)[at.index].clone());
            if found.is_none() {
                debug!(team = %team.id, player = %id, "trade: player not on roster, ignored");
            }
            found
        })
        .collect()
}

fn after_trade(roster: &Roster, sent: &[Player], received: &[Player]) -> Roster {
    let ids: Vec<String> = sent.iter().map(|p| p.id.clone()).collect();
    roster.without_players(&ids).with_players_added(received)
}

/// Value both sides of a trade. Returns None when either team id is unknown.
pub fn analyze_trade(
    league: &League,
    team_a: &str,
    team_b: &str,
    send_a: &[String],
    send_b: &[String],
    settings: &TradeSettings,
) -> Option<TradeAnalysis> {
    let a = league.team(team_a)?;
    let b = league.team(team_b)?;
    let out_a = outgoing(a, send_a);
    let out_b = outgoing(b, send_b);

    let side = |team: &Team, sent: &[Player], received: &[Player]| {
        let before = best_starting_value(&team.roster).round();
        let after = best_starting_value(&after_trade(&team.roster, sent, received)).round();
        TradeSide {
            team_id: team.id.clone(),
            sends: sent.iter().map(|p| p.id.clone()).collect(),
            before,
            after,
            delta: after - before,
        }
    };
    let side_a = side(a, &out_a, &out_b);
    let side_b = side(b, &out_b, &out_a);
    let swing = (side_a.delta - side_b.delta).abs();

    Some(TradeAnalysis {
        grade: TradeGrade::from_swing(swing, &settings.grade_thresholds),
        side_a,
        side_b,
        swing,
    })
}

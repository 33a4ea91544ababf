// Player records and the positions they can hold.
// Players come either from the seeded pool or from a CSV import and are never edited in place.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// On-field position of a player.
/// Decoding goes through [`FromStr`], so snapshots holding raw import letters ("DEF", "PK") still load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    DST,
    K,
}

impl Position {
    pub const ALL: [Position; 6] = [
        Position::QB,
        Position::RB,
        Position::WR,
        Position::TE,
        Position::DST,
        Position::K,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::DST => "DST",
            Position::K => "K",
        }
    }

    /// RB, WR and TE may start in the FLEX slot
    pub fn is_flex_eligible(&self) -> bool {
        matches!(self, Position::RB | Position::WR | Position::TE)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = String;

    /// Accepts the common spellings found in ranking exports ("DEF", "D/ST", "PK").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let letters: String = s
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_uppercase();
        match letters.as_str() {
            "QB" => Ok(Position::QB),
            "RB" => Ok(Position::RB),
            "WR" => Ok(Position::WR),
            "TE" => Ok(Position::TE),
            "DST" | "DEF" | "D" => Ok(Position::DST),
            "K" | "PK" => Ok(Position::K),
            _ => Err(format!("Unknown position '{}'", s)),
        }
    }
}

impl TryFrom<String> for Position {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Position> for String {
    fn from(pos: Position) -> String {
        pos.as_str().to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    #[serde(rename = "pos")]
    pub position: Position,
    /// Pro team code, e.g. "KC"
    #[serde(rename = "nfl", default)]
    pub pro_team: String,
    #[serde(default)]
    pub projected: f64,
    #[serde(default)]
    pub adp: f64,
    #[serde(default)]
    pub rank: f64,
    #[serde(default)]
    pub bye: Option<u32>,
}

impl Player {
    pub fn new(id: &str, name: &str, position: Position, pro_team: &str, projected: f64) -> Player {
        Player {
            id: id.to_string(),
            name: name.to_string(),
            position,
            pro_team: pro_team.to_string(),
            projected,
            adp: 0.0,
            rank: 0.0,
            bye: None,
        }
    }

    pub fn with_draft_values(mut self, adp: f64, rank: f64, bye: Option<u32>) -> Player {
        self.adp = adp;
        self.rank = rank;
        self.bye = bye;
        self
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// The starter pool a fresh league is seeded with
pub fn starter_players() -> Vec<Player> {
    let rows: [(&str, &str, Position, &str, f64, f64, f64, u32); 15] = [
        ("p1", "Patrick Mahomes", Position::QB, "KC", 365.0, 10.0, 6.0, 10),
        ("p2", "Jalen Hurts", Position::QB, "PHI", 355.0, 15.0, 12.0, 5),
        ("p3", "Josh Allen", Position::QB, "BUF", 360.0, 12.0, 8.0, 13),
        ("p4", "Christian McCaffrey", Position::RB, "SF", 330.0, 1.0, 1.0, 9),
        ("p5", "Bijan Robinson", Position::RB, "ATL", 280.0, 5.0, 5.0, 11),
        ("p6", "Saquon Barkley", Position::RB, "PHI", 265.0, 18.0, 18.0, 5),
        ("p7", "Justin Jefferson", Position::WR, "MIN", 300.0, 2.0, 2.0, 6),
        ("p8", "CeeDee Lamb", Position::WR, "DAL", 290.0, 4.0, 4.0, 7),
        ("p9", "Ja'Marr Chase", Position::WR, "CIN", 285.0, 3.0, 3.0, 12),
        ("p10", "Travis Kelce", Position::TE, "KC", 230.0, 22.0, 22.0, 10),
        ("p11", "Sam LaPorta", Position::TE, "DET", 215.0, 28.0, 28.0, 5),
        ("p12", "49ers D/ST", Position::DST, "SF", 145.0, 120.0, 120.0, 9),
        ("p13", "Ravens D/ST", Position::DST, "BAL", 140.0, 130.0, 130.0, 14),
        ("p14", "Justin Tucker", Position::K, "BAL", 150.0, 140.0, 140.0, 14),
        ("p15", "Evan McPherson", Position::K, "CIN", 145.0, 150.0, 150.0, 12),
    ];

    rows.iter()
        .map(|&(id, name, pos, team, projected, adp, rank, bye)| {
            Player::new(id, name, pos, team, projected).with_draft_values(adp, rank, Some(bye))
        })
        .collect()
}

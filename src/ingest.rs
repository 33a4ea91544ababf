// This file parses player ranking exports (FantasyPros-style CSV) into the league's player pool.
// Columns are located by header name, so extra or reordered columns are fine.
// Projections are estimated from position and overall rank since rankings carry no points.

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

use crate::error::ImportError;
use crate::gate::hash_lite;
use crate::player::{Player, Position};

/// Player label split into its parts, e.g. "Courtland Sutton DEN (9)"
#[derive(Debug, Clone, PartialEq)]
pub struct NameTeamBye {
    pub name: String,
    pub team: String,
    pub bye: Option<u32>,
}

/// Trailing "(n)" with one or two digits
fn split_bye(s: &str) -> (String, Option<u32>) {
    let trimmed = s.trim_end();
    if let Some(body) = trimmed.strip_suffix(')') {
        if let Some(open) = body.rfind('(') {
            let digits = &body[open + 1..];
            if (1..=2).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()) {
                return (body[..open].trim().to_string(), digits.parse().ok());
            }
        }
    }
    (trimmed.to_string(), None)
}

fn is_team_code(token: &str) -> bool {
    (2..=4).contains(&token.len()) && token.chars().all(|c| c.is_ascii_uppercase())
}

pub fn parse_name_team_bye(label: &str) -> NameTeamBye {
    let (cleaned, bye) = split_bye(label.trim());
    let parts: Vec<&str> = cleaned.split_whitespace().collect();
    match parts.split_last() {
        Some((last, rest)) if is_team_code(last) => NameTeamBye {
            name: rest.join(" "),
            team: last.to_string(),
            bye,
        },
        _ => NameTeamBye {
            name: cleaned,
            team: String::new(),
            bye,
        },
    }
}

/// Season projection from overall rank: the position base decays by 1.5% per rank,
/// flattening out at 55% of the base.
pub fn estimate_projection(position: Position, rank: f64) -> f64 {
    let base = match position {
        Position::QB => 330.0,
        Position::RB => 300.0,
        Position::WR => 290.0,
        Position::TE => 220.0,
        Position::DST => 135.0,
        Position::K => 145.0,
    };
    let r = rank.max(1.0);
    (base * (0.55 + 0.45 * 0.985f64.powf(r - 1.0))).round()
}

struct Columns {
    player: Option<usize>,
    pos: Option<usize>,
    team: Option<usize>,
    bye: Option<usize>,
    rank: Option<usize>,
    adp: Option<usize>,
}

impl Columns {
    fn from_header(header: &StringRecord) -> Columns {
        let lower: Vec<String> = header.iter().map(|h| h.to_lowercase()).collect();
        let find = |name: &str| lower.iter().position(|h| h.contains(name));
        Columns {
            player: find("player"),
            pos: find("pos"),
            team: find("team"),
            bye: find("bye"),
            rank: find("rank"),
            adp: find("adp"),
        }
    }
}

fn field<'r>(record: &'r StringRecord, col: Option<usize>) -> &'r str {
    col.and_then(|i| record.get(i)).unwrap_or("")
}

/// Positive number in a cell, None for blanks, garbage and zero
fn positive(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|v| *v > 0.0)
}

/// Parse CSV text into players. Rows without a name or a known position are skipped.
pub fn parse_players_csv(text: &str) -> Result<Vec<Player>, ImportError> {
    let clean = text.replace('\u{FEFF}', "");
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(clean.as_bytes());

    let header = rdr.headers()?.clone();
    if header.iter().all(|h| h.is_empty()) {
        return Err(ImportError::MissingHeader);
    }
    let cols = Columns::from_header(&header);

    let mut players = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let row = i + 1;
        // without a player column the first column holds the label
        let label = field(&record, cols.player.or(Some(0)));
        let parsed = parse_name_team_bye(label);
        if parsed.name.is_empty() {
            warn!(row, "skipping row without a player name");
            continue;
        }
        let pos_letters: String = field(&record, cols.pos)
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_uppercase();
        let position: Position = match pos_letters.parse() {
            Ok(p) => p,
            Err(e) => {
                warn!(row, player = %parsed.name, "skipping row: {}", e);
                continue;
            }
        };
        let team = match field(&record, cols.team) {
            "" => parsed.team.clone(),
            t => t.to_uppercase(),
        };
        let bye = field(&record, cols.bye)
            .parse::<u32>()
            .ok()
            .filter(|b| *b > 0)
            .or(parsed.bye);
        let rank = positive(field(&record, cols.rank)).unwrap_or(row as f64);
        let adp = positive(field(&record, cols.adp)).unwrap_or(rank);
        let id = hash_lite(&format!("{}|{}|{}", parsed.name, pos_letters, team))
            .unwrap_or_default();

        players.push(
            Player::new(&id, &parsed.name, position, &team, estimate_projection(position, rank))
                .with_draft_values(adp, rank, bye),
        );
    }
    debug!(count = players.len(), "parsed player csv");
    Ok(players)
}

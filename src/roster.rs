// Roster slots, capacity limits and the placement rules used by every roster edit.
// Edits on a roster are total: a request that cannot be honoured leaves the roster as it was.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::player::{Player, Position};

/// A named place on a roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Slot {
    QB,
    RB,
    WR,
    TE,
    FLEX,
    DST,
    K,
    BENCH,
}

impl Slot {
    /// Scan order used when locating a player
    pub const ORDER: [Slot; 8] = [
        Slot::QB,
        Slot::RB,
        Slot::WR,
        Slot::TE,
        Slot::FLEX,
        Slot::DST,
        Slot::K,
        Slot::BENCH,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::QB => "QB",
            Slot::RB => "RB",
            Slot::WR => "WR",
            Slot::TE => "TE",
            Slot::FLEX => "FLEX",
            Slot::DST => "DST",
            Slot::K => "K",
            Slot::BENCH => "BENCH",
        }
    }

    /// The dedicated slot for a position
    pub fn for_position(position: Position) -> Slot {
        match position {
            Position::QB => Slot::QB,
            Position::RB => Slot::RB,
            Position::WR => Slot::WR,
            Position::TE => Slot::TE,
            Position::DST => Slot::DST,
            Position::K => Slot::K,
        }
    }

    pub fn accepts(&self, position: Position) -> bool {
        match self {
            Slot::BENCH => true,
            Slot::FLEX => position.is_flex_eligible(),
            other => *other == Slot::for_position(position),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Slot::ORDER
            .iter()
            .copied()
            .find(|slot| slot.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown roster slot '{}'", s))
    }
}

/// Slot -> capacity. Serialized with the uppercase slot names as keys.
pub type SlotLimits = BTreeMap<Slot, u32>;

/// Read a limits map, dropping keys that name no known slot
pub fn deserialize_slot_limits<'de, D>(deserializer: D) -> Result<SlotLimits, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, u32>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, n)| match key.parse::<Slot>() {
            Ok(slot) => Some((slot, n)),
            Err(_) => {
                debug!(slot = %key, "ignoring limit for unknown slot");
                None
            }
        })
        .collect())
}

pub fn default_slot_limits() -> SlotLimits {
    [
        (Slot::QB, 1),
        (Slot::RB, 2),
        (Slot::WR, 2),
        (Slot::TE, 1),
        (Slot::FLEX, 1),
        (Slot::DST, 1),
        (Slot::K, 1),
        (Slot::BENCH, 8),
    ]
    .into_iter()
    .collect()
}

/// Location of a player inside a roster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotIndex {
    pub slot: Slot,
    pub index: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    #[serde(rename = "QB", default)]
    pub qb: Vec<Player>,
    #[serde(rename = "RB", default)]
    pub rb: Vec<Player>,
    #[serde(rename = "WR", default)]
    pub wr: Vec<Player>,
    #[serde(rename = "TE", default)]
    pub te: Vec<Player>,
    #[serde(rename = "FLEX", default)]
    pub flex: Vec<Player>,
    #[serde(rename = "DST", default)]
    pub dst: Vec<Player>,
    #[serde(rename = "K", default)]
    pub k: Vec<Player>,
    #[serde(rename = "BENCH", default)]
    pub bench: Vec<Player>,
    #[serde(rename = "_limits", default, deserialize_with = "deserialize_slot_limits")]
    pub limits: SlotLimits,
}

impl Roster {
    pub fn new(limits: &SlotLimits) -> Roster {
        Roster {
            limits: limits.clone(),
            ..Roster::default()
        }
    }

    pub fn slot(&self, slot: Slot) -> &[Player] {
        match slot {
            Slot::QB => &self.qb,
            Slot::RB => &self.rb,
            Slot::WR => &self.wr,
            Slot::TE => &self.te,
            Slot::FLEX => &self.flex,
            Slot::DST => &self.dst,
            Slot::K => &self.k,
            Slot::BENCH => &self.bench,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Vec<Player> {
        match slot {
            Slot::QB => &mut self.qb,
            Slot::RB => &mut self.rb,
            Slot::WR => &mut self.wr,
            Slot::TE => &mut self.te,
            Slot::FLEX => &mut self.flex,
            Slot::DST => &mut self.dst,
            Slot::K => &mut self.k,
            Slot::BENCH => &mut self.bench,
        }
    }

    /// Capacity of a slot. BENCH is unbounded; a slot without a limit holds nothing.
    pub fn limit(&self, slot: Slot) -> Option<u32> {
        if slot == Slot::BENCH {
            return None;
        }
        Some(self.limits.get(&slot).copied().unwrap_or(0))
    }

    pub fn can_place(&self, slot: Slot, player: &Player) -> bool {
        if !slot.accepts(player.position) {
            return false;
        }
        match self.limit(slot) {
            None => true,
            Some(limit) => self.slot(slot).len() < limit as usize,
        }
    }

    pub fn find_slot(&self, player_id: &str) -> Option<SlotIndex> {
        Slot::ORDER.iter().find_map(|&slot| {
            self.slot(slot)
                .iter()
                .position(|p| p.id == player_id)
                .map(|index| SlotIndex { slot, index })
        })
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.find_slot(player_id).is_some()
    }

    /// Move (or add) a player into `to`. Returns whether the roster changed.
    pub fn move_player(&mut self, player: &Player, to: Slot) -> bool {
        let origin = self.find_slot(&player.id);
        if let Some(at) = origin {
            if at.slot == to {
                return false;
            }
        }
        if !self.can_place(to, player) {
            debug!(player = %player.id, slot = %to, "slot cannot accept player");
            return false;
        }
        let moved = match origin {
            Some(at) => self.slot_mut(at.slot).remove(at.index),
            None => player.clone(),
        };
        self.slot_mut(to).push(moved);
        true
    }

    /// Strip a player from every slot. Returns whether anything was removed.
    pub fn remove_player(&mut self, player_id: &str) -> bool {
        let mut removed = false;
        for slot in Slot::ORDER {
            let list = self.slot_mut(slot);
            let before = list.len();
            list.retain(|p| p.id != player_id);
            removed |= list.len() != before;
        }
        removed
    }

    /// Every slot other than `current` that would accept the player right now
    pub fn valid_destinations(&self, player: &Player, current: Option<Slot>) -> Vec<Slot> {
        Slot::ORDER
            .iter()
            .copied()
            .filter(|&slot| Some(slot) != current && self.can_place(slot, player))
            .collect()
    }

    /// All rostered players in slot order, each id once
    pub fn players(&self) -> Vec<&Player> {
        let mut seen: Vec<&str> = Vec::new();
        let mut out = Vec::new();
        for slot in Slot::ORDER {
            for player in self.slot(slot) {
                if !seen.contains(&player.id.as_str()) {
                    seen.push(&player.id);
                    out.push(player);
                }
            }
        }
        out
    }

    pub fn player_ids(&self) -> Vec<String> {
        self.players().into_iter().map(|p| p.id.clone()).collect()
    }

    /// Copy of this roster without the given ids
    pub fn without_players(&self, ids: &[String]) -> Roster {
        let mut out = self.clone();
        for id in ids {
            out.remove_player(id);
        }
        out
    }

    /// Copy of this roster with players dropped into their position slot.
    /// Capacity is ignored: this is only used for what-if valuations.
    pub fn with_players_added(&self, players: &[Player]) -> Roster {
        let mut out = self.clone();
        for player in players {
            out.slot_mut(Slot::for_position(player.position)).push(player.clone());
        }
        out
    }
}

//! League engine for a fantasy-football league hub.
//!
//! A [`League`] snapshot holds settings, teams, rosters, the schedule and franchise history.
//! Admin transforms on it return a new snapshot; everything else (power rankings, matchup
//! lines, playoff seeds and projections, trade values, career records, awards) is derived
//! on demand from the snapshot.

pub mod awards;
pub mod config;
pub mod error;
pub mod gate;
pub mod history;
pub mod ingest;
pub mod league;
pub mod lineup;
pub mod matchup;
pub mod player;
pub mod playoffs;
pub mod roster;
pub mod standings;
pub mod trade;

pub use config::Config;
pub use error::{GateError, ImportError, LeagueError, Result};
pub use league::League;
pub use player::{Player, Position};
pub use roster::{Roster, Slot};

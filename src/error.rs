//! Error types for the league engine.
//!
//! Derivations never fail; only the edges that touch files, text input or
//! the commissioner passphrase report errors.

use thiserror::Error;

/// Result type for fallible league operations
pub type Result<T> = std::result::Result<T, LeagueError>;

/// Errors raised while loading, saving or configuring a league
#[derive(Error, Debug)]
pub enum LeagueError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Snapshot decode error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    #[error("Unsupported schema version {found} (newest known is {supported})")]
    SchemaVersion { found: u32, supported: u32 },

    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Commissioner gate: {0}")]
    Gate(#[from] GateError),
}

/// Errors from parsing a player CSV export
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV input has no header row")]
    MissingHeader,
}

/// Errors from the commissioner passphrase gate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("a password is already set")]
    AlreadySet,

    #[error("password is empty")]
    EmptyPassword,

    #[error("passwords must match")]
    Mismatch,

    #[error("incorrect password")]
    IncorrectPassword,

    #[error("commissioner tools are locked")]
    Locked,
}

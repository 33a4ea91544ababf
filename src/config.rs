// Configuration module for the league engine
// Supports YAML configuration files for the rating model, playoff format, trade grading and logging

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{LeagueError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelSettings,
    #[serde(default)]
    pub playoffs: PlayoffSettings,
    #[serde(default)]
    pub trade: TradeSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Err(LeagueError::ConfigNotFound(path.to_string()));
        }

        let content = fs::read_to_string(path).map_err(|source| LeagueError::Io {
            path: path.to_string(),
            source,
        })?;

        Ok(serde_yaml::from_str(&content)?)
    }

    /// Resolve the configuration without logging anything.
    /// An explicit path that cannot be loaded falls back to defaults and carries the error.
    pub fn resolve(path: Option<&str>) -> (Self, ConfigSource) {
        match path {
            Some(p) => match Self::from_file(p) {
                Ok(config) => (config, ConfigSource::File(p.to_string())),
                Err(e) => (Self::default(), ConfigSource::Fallback(e)),
            },
            None => {
                for default_path in &["ffl-hub.yaml", "ffl-hub.yml", ".ffl-hub.yaml"] {
                    if Path::new(default_path).exists() {
                        if let Ok(config) = Self::from_file(default_path) {
                            return (config, ConfigSource::File(default_path.to_string()));
                        }
                    }
                }
                (Self::default(), ConfigSource::Defaults)
            }
        }
    }

    /// Load configuration from file if it exists, otherwise use defaults
    pub fn load_or_default(path: Option<&str>) -> Self {
        let (config, source) = Self::resolve(path);
        source.report();
        config
    }

    /// Save configuration to a YAML file
    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml).map_err(|source| LeagueError::Io {
            path: path.to_string(),
            source,
        })
    }
}

/// Where a resolved configuration came from
#[derive(Debug)]
pub enum ConfigSource {
    File(String),
    Defaults,
    Fallback(LeagueError),
}

impl ConfigSource {
    /// Log the outcome. Call once a subscriber is installed.
    pub fn report(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded configuration from {}", path),
            ConfigSource::Defaults => {}
            ConfigSource::Fallback(e) => warn!("{}; using default configuration", e),
        }
    }
}

/// Rating model constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Points of weekly projection difference per logistic unit for matchup lines
    #[serde(default = "default_matchup_scale")]
    pub matchup_scale: f64,

    /// Multiplier on the power-score gap for rest-of-season win probability
    #[serde(default = "default_playoff_slope")]
    pub playoff_slope: f64,

    /// Weight of normalized win percentage in the power score
    #[serde(default = "default_win_weight")]
    pub power_win_weight: f64,

    /// Weight of normalized points-for in the power score
    #[serde(default = "default_points_weight")]
    pub power_points_weight: f64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        ModelSettings {
            matchup_scale: default_matchup_scale(),
            playoff_slope: default_playoff_slope(),
            power_win_weight: default_win_weight(),
            power_points_weight: default_points_weight(),
        }
    }
}

fn default_matchup_scale() -> f64 { 12.0 }
fn default_playoff_slope() -> f64 { 6.0 }
fn default_win_weight() -> f64 { 0.7 }
fn default_points_weight() -> f64 { 0.3 }

/// Playoff format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayoffSettings {
    /// Teams seeded into the winners bracket
    #[serde(default = "default_winners_size")]
    pub winners_bracket_size: usize,

    /// Teams seeded into the losers bracket, directly after the winners bracket
    #[serde(default = "default_losers_size")]
    pub losers_bracket_size: usize,
}

impl Default for PlayoffSettings {
    fn default() -> Self {
        PlayoffSettings {
            winners_bracket_size: default_winners_size(),
            losers_bracket_size: default_losers_size(),
        }
    }
}

fn default_winners_size() -> usize { 4 }
fn default_losers_size() -> usize { 6 }

/// Trade fairness grading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeSettings {
    /// Upper bounds on the value swing for grades A, B, C and D; anything larger is F
    #[serde(default = "default_grade_thresholds")]
    pub grade_thresholds: [f64; 4],
}

impl Default for TradeSettings {
    fn default() -> Self {
        TradeSettings {
            grade_thresholds: default_grade_thresholds(),
        }
    }
}

fn default_grade_thresholds() -> [f64; 4] {
    [1.0, 3.0, 6.0, 10.0]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Generate a sample configuration file
pub fn generate_sample_config() -> String {
    r#"# ffl-hub configuration
# All values shown are defaults - uncomment and modify as needed

# Rating model
model:
  # Weekly projection points per logistic unit when pricing matchups
  matchup_scale: 12.0
  # Power-score gap multiplier for rest-of-season win probability
  playoff_slope: 6.0
  # Power score blend
  power_win_weight: 0.7
  power_points_weight: 0.3

# Playoff format
playoffs:
  winners_bracket_size: 4
  losers_bracket_size: 6

# Trade analyzer grading: max swing for A, B, C, D (anything larger is F)
trade:
  grade_thresholds: [1.0, 3.0, 6.0, 10.0]

# Logging (RUST_LOG overrides this)
logging:
  level: info
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model.matchup_scale, 12.0);
        assert_eq!(config.model.playoff_slope, 6.0);
        assert_eq!(config.playoffs.winners_bracket_size, 4);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
model:
  matchup_scale: 10.0
playoffs:
  losers_bracket_size: 4
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.model.matchup_scale, 10.0);
        assert_eq!(config.playoffs.losers_bracket_size, 4);
        // Defaults should still work
        assert_eq!(config.model.playoff_slope, 6.0);
        assert_eq!(config.playoffs.winners_bracket_size, 4);
        assert_eq!(config.trade.grade_thresholds, [1.0, 3.0, 6.0, 10.0]);
    }

    #[test]
    fn test_sample_config_matches_defaults() {
        let config: Config = serde_yaml::from_str(&generate_sample_config()).unwrap();
        let defaults = Config::default();
        assert_eq!(config.model.matchup_scale, defaults.model.matchup_scale);
        assert_eq!(config.model.power_win_weight, defaults.model.power_win_weight);
        assert_eq!(config.trade.grade_thresholds, defaults.trade.grade_thresholds);
    }

    #[test]
    fn test_resolve_falls_back_with_error() {
        let (config, source) = Config::resolve(Some("definitely-not-here.yaml"));
        assert_eq!(config.model.matchup_scale, 12.0);
        assert!(matches!(source, ConfigSource::Fallback(LeagueError::ConfigNotFound(_))));

        let path = std::env::temp_dir().join(format!("ffl-hub-bad-{}.yaml", std::process::id()));
        fs::write(&path, "model: [not, a, map]\n").unwrap();
        let (config, source) = Config::resolve(path.to_str());
        fs::remove_file(&path).unwrap();
        assert_eq!(config.model.playoff_slope, 6.0);
        assert!(matches!(source, ConfigSource::Fallback(LeagueError::Config(_))));
    }

    #[test]
    fn test_resolve_reads_explicit_file() {
        let path = std::env::temp_dir().join(format!("ffl-hub-good-{}.yaml", std::process::id()));
        fs::write(&path, "model:\n  matchup_scale: 9.0\n").unwrap();
        let (config, source) = Config::resolve(path.to_str());
        fs::remove_file(&path).unwrap();
        assert_eq!(config.model.matchup_scale, 9.0);
        assert!(matches!(source, ConfigSource::File(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("definitely-not-here.yaml").unwrap_err();
        assert!(matches!(err, LeagueError::ConfigNotFound(_)));
    }
}

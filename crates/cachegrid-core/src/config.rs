//! Game constants, overridable from a JSON file.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geom::Position;
use crate::Token;

/// Where a fresh player starts when nothing else is known.
pub const DEFAULT_START: Position = Position {
    lat: 36.997936938057016,
    lng: -122.05703507501151,
};

/// Tunables of a game. Every field has a default; a config file only needs
/// the fields it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct GameConfig {
    /// Probability that a cell holds a cache.
    pub spawn_probability: f64,
    /// Largest token a cache can start with.
    pub max_token_rank: Token,
    /// Holding a token of this value wins the game.
    pub goal_value: Token,
    /// Chebyshev distance, in cells, within which caches can be used.
    pub collect_distance: i32,
    /// Starting position of a fresh player.
    pub start: Position,
    /// Varies the generated world; empty reproduces the default layout.
    pub world_seed: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            spawn_probability: 0.1,
            max_token_rank: 2,
            goal_value: 4,
            collect_distance: 1,
            start: DEFAULT_START,
            world_seed: String::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config: {0}")]
    Io(#[from] io::Error),
    #[error("parsing config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl GameConfig {
    /// Parse a (possibly partial) JSON config.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::info!("loaded game config from {}", path.display());
        Ok(config)
    }

    /// Reject values that make the game meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(ConfigError::Invalid(format!(
                "spawnProbability {} is outside [0, 1]",
                self.spawn_probability
            )));
        }
        if self.goal_value == 0 {
            return Err(ConfigError::Invalid("goalValue must be positive".into()));
        }
        if !self.start.on_globe() {
            return Err(ConfigError::Invalid(format!(
                "start {} is not a latitude/longitude",
                self.start
            )));
        }
        if self.collect_distance < 0 {
            return Err(ConfigError::Invalid(format!(
                "collectDistance {} is negative",
                self.collect_distance
            )));
        }
        Ok(())
    }
}

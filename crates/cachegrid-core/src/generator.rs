//! Deterministic cache generation.
//!
//! Whether a cell holds a cache, and the token it starts with, is a pure
//! function of the cell's coordinates (and the optional world seed). The
//! overlay relies on this: "unmodified" means "equal to what the generator
//! says", so the answer must never change.

use crate::config::GameConfig;
use crate::geom::Cell;
use crate::luck::luck;
use crate::Token;

/// Discriminator appended to the seed of the value draw, keeping it
/// independent from the spawn draw.
const VALUE_DISCRIMINATOR: &str = "initialValue";

/// The generated default of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Classification {
    pub spawns: bool,
    pub value: Token,
}

impl Classification {
    pub const EMPTY: Self = Self {
        spawns: false,
        value: 0,
    };
}

/// Seeded, stateless cache generator.
#[derive(Clone, Debug, PartialEq)]
pub struct Generator {
    spawn_probability: f64,
    max_token_rank: Token,
    world_seed: String,
}

impl Generator {
    pub fn new(spawn_probability: f64, max_token_rank: Token, world_seed: impl Into<String>) -> Self {
        Self {
            spawn_probability,
            max_token_rank,
            world_seed: world_seed.into(),
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.spawn_probability,
            config.max_token_rank,
            config.world_seed.clone(),
        )
    }

    pub fn spawn_probability(&self) -> f64 {
        self.spawn_probability
    }

    pub fn max_token_rank(&self) -> Token {
        self.max_token_rank
    }

    fn seed(&self, cell: Cell, discriminator: Option<&str>) -> String {
        let mut s = String::new();
        if !self.world_seed.is_empty() {
            s.push_str(&self.world_seed);
            s.push(':');
        }
        s.push_str(&cell.key());
        if let Some(d) = discriminator {
            s.push(',');
            s.push_str(d);
        }
        s
    }

    /// Spawn decision and starting token of `cell`.
    pub fn classify(&self, cell: Cell) -> Classification {
        if luck(&self.seed(cell, None)) >= self.spawn_probability {
            return Classification::EMPTY;
        }
        let draw = luck(&self.seed(cell, Some(VALUE_DISCRIMINATOR)));
        let value = (draw * (f64::from(self.max_token_rank) + 1.0)).floor() as Token;
        Classification {
            spawns: true,
            value: value.min(self.max_token_rank),
        }
    }

    /// Shorthand for `classify(cell).value`.
    #[inline]
    pub fn initial_value(&self, cell: Cell) -> Token {
        self.classify(cell).value
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

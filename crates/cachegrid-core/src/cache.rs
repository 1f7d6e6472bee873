//! Visible caches and the token exchange rules.
//!
//! A [`CacheEntity`] is the runtime form of one cell in view. It is rebuilt
//! on every redraw and is never the source of truth; the overlay is.
//! [`interact`] applies one click to a cache and the player's hand.

use std::fmt;

use crate::generator::Generator;
use crate::geom::{Bounds, Cell, Position};
use crate::mapper;
use crate::overlay::Overlay;
use crate::player::PlayerState;
use crate::Token;

/// A materialized cache.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheEntity {
    pub cell: Cell,
    pub bounds: Bounds,
    /// Copy of the cell's token taken at materialization, kept in step with
    /// the overlay by [`crate::world::World::click`].
    pub value: Token,
}

impl CacheEntity {
    /// Resolve the cell's current token (overlay, else generator).
    pub fn materialize(cell: Cell, overlay: &Overlay, generator: &Generator) -> Self {
        Self {
            cell,
            bounds: mapper::cell_bounds(cell),
            value: overlay.value_at(generator, cell),
        }
    }

    /// Text shown on the cache: empty for 0, else the token.
    pub fn label(&self) -> String {
        if self.value == 0 {
            String::new()
        } else {
            self.value.to_string()
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value == 0
    }
}

/// Whether a player at `player` may use the cache in `cell`: Chebyshev
/// distance between the two cells of at most `collect_distance`.
#[inline]
pub fn within_range(player: Position, cell: Cell, collect_distance: i32) -> bool {
    mapper::to_cell(player).chebyshev(cell) <= collect_distance
}

/// Result of clicking a cache.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The cache is too far away; nothing changed.
    OutOfRange,
    /// Empty cache and empty hand; nothing changed.
    NothingToExchange,
    /// Two tokens of `value` merged; the hand now holds `2 * value`.
    Combined { value: Token },
    /// The player took `taken` from the cache and left `deposited`.
    Swapped { taken: Token, deposited: Token },
}

impl Outcome {
    /// Whether the click changed the cache and the hand.
    #[inline]
    pub fn exchanged(self) -> bool {
        matches!(self, Self::Combined { .. } | Self::Swapped { .. })
    }

    /// Status line after this outcome, given the token now held.
    pub fn status_message(self, held: Token) -> String {
        match self {
            Self::Combined { value } => {
                format!("two {value} tokens combined to create {} token", value.saturating_mul(2))
            }
            _ => hand_message(held),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange => f.write_str("out of range"),
            Self::NothingToExchange => f.write_str("nothing to exchange"),
            Self::Combined { value } => write!(f, "combined {value}+{value}"),
            Self::Swapped { taken, deposited } => write!(f, "took {taken}, left {deposited}"),
        }
    }
}

/// Status line describing the hand.
pub fn hand_message(held: Token) -> String {
    if held == 0 {
        "no token in hand".to_string()
    } else {
        format!("{held} token in hand")
    }
}

/// Apply one click on `cache`.
///
/// Rules, in order: out of range → no-op; empty cache and empty hand →
/// no-op; equal tokens → combine (cache emptied, hand doubled); otherwise
/// swap. A non-empty hand on an empty cache therefore swaps, which
/// deposits the token.
pub fn interact(cache: &mut CacheEntity, player: &mut PlayerState, collect_distance: i32) -> Outcome {
    if !within_range(player.position, cache.cell, collect_distance) {
        return Outcome::OutOfRange;
    }
    if cache.value == 0 && player.held == 0 {
        return Outcome::NothingToExchange;
    }
    if cache.value == player.held {
        let value = cache.value;
        cache.value = 0;
        player.held = value.saturating_mul(2);
        return Outcome::Combined { value };
    }
    let taken = cache.value;
    let deposited = player.held;
    cache.value = deposited;
    player.held = taken;
    Outcome::Swapped { taken, deposited }
}

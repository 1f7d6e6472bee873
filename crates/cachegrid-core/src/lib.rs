//! **cachegrid-core**: the deterministic grid behind a token-collecting
//! exploration game.
//!
//! The world is an infinite lattice of [`Cell`]s laid over latitude and
//! longitude. Whether a cell holds a cache, and which token it starts with,
//! is derived from the cell's coordinates alone ([`Generator`]); only cells
//! the player has changed are stored ([`Overlay`]). [`World`] runs a game on
//! top of these and reports what to draw through a [`Renderer`].

pub mod cache;
pub mod config;
pub mod generator;
pub mod geom;
pub mod luck;
pub mod mapper;
pub mod overlay;
pub mod persist;
pub mod player;
pub mod viewport;
pub mod world;

/// A token value. 0 is "no token".
pub type Token = u32;

pub use cache::{interact, within_range, CacheEntity, Outcome};
pub use config::{ConfigError, GameConfig};
pub use generator::{Classification, Generator};
pub use geom::{Bounds, Cell, CellRange, Position};
pub use mapper::{snap_to_cell_center, to_cell, to_position, TILE_DEGREES};
pub use overlay::Overlay;
pub use persist::{FileStore, MemoryStore, PersistError, SavedState, Store};
pub use player::{Controls, Direction, PlayerState};
pub use viewport::{cells_in_view, Viewport};
pub use world::{Renderer, World};

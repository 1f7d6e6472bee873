//! Terminal front end for cachegrid: a crossterm driver, a diffing glyph
//! screen, and the game model that binds keys and clicks to a
//! [`cachegrid_core::World`].

pub mod app;
pub mod colors;
pub mod model;
pub mod render;
pub mod screen;
pub mod term;

pub use app::{App, Effect, Model};
pub use model::GameModel;
pub use render::{MapLayout, ScreenRenderer};
pub use screen::{Point, Screen};
pub use term::{Driver, Input, Key, Terminal};

//! Saved games.
//!
//! The record is a flat JSON object:
//!
//! ```text
//! {
//!   "playerLatLng": {"lat": 36.9979, "lng": -122.0570},
//!   "currentToken": 2,
//!   "following": true,
//!   "cacheMap": [["739958,-2441141", 0], ["739959,-2441140", 4]]
//! }
//! ```
//!
//! Decoding is lenient field by field: a missing or mistyped field is left
//! out of the [`SavedState`] and the caller keeps its default. A record that
//! is not JSON at all counts as no record.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::geom::{Cell, Position};
use crate::overlay::Overlay;
use crate::player::PlayerState;
use crate::Token;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("save store I/O: {0}")]
    Io(#[from] io::Error),
    #[error("encoding saved state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Durable storage for one saved record.
pub trait Store {
    /// The stored record, `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<String>, PersistError>;

    /// Replace the stored record.
    fn save(&mut self, record: &str) -> Result<(), PersistError>;
}

/// A record kept in a JSON file.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for FileStore {
    fn load(&self) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(&self.path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, record: &str) -> Result<(), PersistError> {
        // Write beside the target and rename, so a crash never leaves half a
        // record.
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, record)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// An in-memory record.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub record: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: impl Into<String>) -> Self {
        Self {
            record: Some(record.into()),
        }
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<Option<String>, PersistError> {
        Ok(self.record.clone())
    }

    fn save(&mut self, record: &str) -> Result<(), PersistError> {
        self.record = Some(record.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SavedState
// ---------------------------------------------------------------------------

/// A decoded record. Every field is optional; `None` means "absent or
/// unusable, keep the default".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SavedState {
    pub position: Option<Position>,
    pub held: Option<Token>,
    pub following: Option<bool>,
    pub caches: Option<Vec<(Cell, Token)>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Record {
    player_lat_lng: Position,
    current_token: Token,
    following: bool,
    cache_map: Vec<(String, Token)>,
}

impl SavedState {
    /// Snapshot of the player and the overlay.
    pub fn capture(player: &PlayerState, overlay: &Overlay) -> Self {
        Self {
            position: Some(player.position),
            held: Some(player.held),
            following: Some(player.following),
            caches: Some(overlay.iter().collect()),
        }
    }

    /// JSON text of the record. Absent fields are written as defaults.
    pub fn encode(&self) -> Result<String, PersistError> {
        let record = Record {
            player_lat_lng: self.position.unwrap_or_default(),
            current_token: self.held.unwrap_or(0),
            following: self.following.unwrap_or(true),
            cache_map: self
                .caches
                .iter()
                .flatten()
                .map(|&(c, v)| (c.key(), v))
                .collect(),
        };
        Ok(serde_json::to_string(&record)?)
    }

    /// Decode a record; `None` when the text is not a JSON object.
    pub fn decode(text: &str) -> Option<Self> {
        let value: Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("ignoring unreadable saved state: {e}");
                return None;
            }
        };
        let Value::Object(obj) = value else {
            log::warn!("ignoring saved state that is not an object");
            return None;
        };
        Some(Self {
            position: obj.get("playerLatLng").and_then(decode_position),
            held: obj.get("currentToken").and_then(decode_token),
            following: obj.get("following").and_then(Value::as_bool),
            caches: obj.get("cacheMap").and_then(decode_caches),
        })
    }
}

fn decode_position(v: &Value) -> Option<Position> {
    let lat = v.get("lat")?.as_f64()?;
    let lng = v.get("lng")?.as_f64()?;
    let pos = Position::new(lat, lng);
    pos.on_globe().then_some(pos)
}

fn decode_token(v: &Value) -> Option<Token> {
    if let Some(n) = v.as_u64() {
        return Token::try_from(n).ok();
    }
    // Integral floats such as `2.0` are still tokens.
    let f = v.as_f64()?;
    (f >= 0.0 && f.fract() == 0.0 && f <= f64::from(Token::MAX)).then_some(f as Token)
}

fn decode_caches(v: &Value) -> Option<Vec<(Cell, Token)>> {
    let items = v.as_array()?;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match decode_cache_entry(item) {
            Some(entry) => out.push(entry),
            None => log::warn!("skipping malformed cache entry {item}"),
        }
    }
    Some(out)
}

fn decode_cache_entry(v: &Value) -> Option<(Cell, Token)> {
    let pair = v.as_array()?;
    if pair.len() != 2 {
        return None;
    }
    let cell: Cell = pair[0].as_str()?.parse().ok()?;
    let value = decode_token(&pair[1])?;
    Some((cell, value))
}

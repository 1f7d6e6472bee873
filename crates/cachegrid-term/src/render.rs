//! Cache drawing: the [`Renderer`] the world talks to, and the layout that
//! places cells on the terminal.
//!
//! Every cell takes a 3×1 slot. North is up and east is right, so latitude
//! index `i` grows towards the top of the screen.

use std::collections::HashMap;

use cachegrid_core::{to_cell, CacheEntity, Cell, Position, Renderer, Token};

use crate::colors;
use crate::screen::{AttrMask, Glyph, Point, Screen, Style};

/// Columns per cell.
pub const SLOT_WIDTH: i32 = 3;

/// What the world last told us about one drawn cache.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    pub value: Token,
    pub label: String,
    pub in_range: bool,
}

/// Keeps the drawn caches until the model paints them.
#[derive(Debug, Default)]
pub struct ScreenRenderer {
    slots: HashMap<Cell, Slot>,
}

impl ScreenRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, cell: Cell) -> Option<&Slot> {
        self.slots.get(&cell)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Paint every slot that falls inside `layout`. The player's cell is
    /// highlighted; an empty player cell shows `@`.
    pub fn paint(&self, screen: &mut Screen, layout: &MapLayout, player: Cell) {
        for (&cell, slot) in &self.slots {
            let Some(origin) = layout.slot_origin(cell) else {
                continue;
            };
            let is_player = cell == player;
            let mut style = Style::default().with_fg(colors::token_color(slot.value));
            if slot.in_range {
                style = style.with_bg(colors::BG_REACH);
            }
            if is_player {
                style = style.with_bg(colors::BG_PLAYER).with_attrs(AttrMask::BOLD);
            }
            let text = if is_player && slot.label.is_empty() {
                style = style.with_fg(colors::PLAYER_FG);
                " @ ".to_string()
            } else if slot.label.is_empty() {
                style = style.with_attrs(style.attrs | AttrMask::DIM);
                " · ".to_string()
            } else {
                slot_text(&slot.label)
            };
            for (k, ch) in text.chars().take(SLOT_WIDTH as usize).enumerate() {
                let p = Point::new(origin.x + k as i32, origin.y);
                if layout.area_contains(p) {
                    screen.set(p, Glyph::new(ch, style));
                }
            }
        }
    }
}

/// A label centered in a slot; longer labels keep their last digits.
fn slot_text(label: &str) -> String {
    let width = SLOT_WIDTH as usize;
    let n = label.chars().count();
    if n > width {
        label.chars().skip(n - width).collect()
    } else {
        format!("{label:^width$}")
    }
}

impl Renderer for ScreenRenderer {
    type Handle = Cell;

    fn clear(&mut self) {
        self.slots.clear();
    }

    fn draw_cache(&mut self, cache: &CacheEntity, in_range: bool) -> Cell {
        self.slots.insert(
            cache.cell,
            Slot {
                value: cache.value,
                label: cache.label(),
                in_range,
            },
        );
        cache.cell
    }

    fn update_label(&mut self, handle: &Cell, cache: &CacheEntity) {
        if let Some(slot) = self.slots.get_mut(handle) {
            slot.value = cache.value;
            slot.label = cache.label();
        }
    }
}

// ---------------------------------------------------------------------------
// MapLayout
// ---------------------------------------------------------------------------

/// Where the map sits on the screen and which cell is in its middle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MapLayout {
    /// Top-left corner of the map area.
    pub origin: Point,
    pub width: i32,
    pub height: i32,
    /// Cell drawn at the middle of the area.
    pub center: Cell,
}

impl MapLayout {
    pub fn new(origin: Point, width: i32, height: i32, center: Position) -> Self {
        Self {
            origin,
            width: width.max(0),
            height: height.max(0),
            center: to_cell(center),
        }
    }

    /// Rows and columns of cells a viewport needs to cover the area.
    pub fn view_size(&self) -> (i32, i32) {
        (self.height + 1, self.width / SLOT_WIDTH + 2)
    }

    #[inline]
    fn mid(&self) -> Point {
        Point::new(
            self.origin.x + (self.width - SLOT_WIDTH) / 2,
            self.origin.y + self.height / 2,
        )
    }

    pub fn area_contains(&self, p: Point) -> bool {
        p.x >= self.origin.x
            && p.y >= self.origin.y
            && p.x < self.origin.x + self.width
            && p.y < self.origin.y + self.height
    }

    /// Leftmost column and the row of `cell`'s slot, `None` when no part of
    /// the slot is inside the area.
    pub fn slot_origin(&self, cell: Cell) -> Option<Point> {
        let mid = self.mid();
        let p = Point::new(
            mid.x + (cell.j - self.center.j) * SLOT_WIDTH,
            mid.y - (cell.i - self.center.i),
        );
        let visible = p.y >= self.origin.y
            && p.y < self.origin.y + self.height
            && p.x + SLOT_WIDTH > self.origin.x
            && p.x < self.origin.x + self.width;
        visible.then_some(p)
    }

    /// The cell whose slot covers `p`.
    pub fn cell_at(&self, p: Point) -> Option<Cell> {
        if !self.area_contains(p) {
            return None;
        }
        let mid = self.mid();
        let dj = (p.x - mid.x).div_euclid(SLOT_WIDTH);
        let di = mid.y - p.y;
        Some(self.center.shift(di, dj))
    }
}

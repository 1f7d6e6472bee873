//! Value types of the world grid: [`Cell`], [`Position`], [`Bounds`] and
//! [`CellRange`].
//!
//! A [`Cell`] is a square of the infinite lattice, a [`Position`] a continuous
//! latitude/longitude pair. Conversions between the two live in
//! [`crate::mapper`].

use std::fmt;
use std::num::ParseIntError;
use std::ops::{Add, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A grid square identified by `(i, j)`. `i` grows north (latitude), `j`
/// grows east (longitude).
///
/// Its `Display` form `"{i},{j}"` is the canonical key used in saved state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    pub i: i32,
    pub j: i32,
}

impl Cell {
    /// The cell at the origin, also the "no movement" delta.
    pub const ZERO: Self = Self { i: 0, j: 0 };

    #[inline]
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// Return a cell shifted by (di, dj), saturating at the `i32` limits.
    #[inline]
    pub const fn shift(self, di: i32, dj: i32) -> Self {
        Self {
            i: self.i.saturating_add(di),
            j: self.j.saturating_add(dj),
        }
    }

    /// Canonical string key, `"{i},{j}"`.
    pub fn key(self) -> String {
        self.to_string()
    }

    /// Chebyshev (L∞) distance in cells.
    #[inline]
    pub fn chebyshev(self, other: Cell) -> i32 {
        let d = self.i.abs_diff(other.i).max(self.j.abs_diff(other.j));
        i32::try_from(d).unwrap_or(i32::MAX)
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.i.cmp(&other.i).then(self.j.cmp(&other.j))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.i, self.j)
    }
}

/// Failure to parse a `"{i},{j}"` cell key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCellError {
    #[error("cell key {0:?} is not of the form \"i,j\"")]
    Shape(String),
    #[error("cell key component is not an integer: {0}")]
    Int(#[from] ParseIntError),
}

impl FromStr for Cell {
    type Err = ParseCellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (i, j) = s
            .split_once(',')
            .ok_or_else(|| ParseCellError::Shape(s.to_string()))?;
        Ok(Self::new(i.trim().parse()?, j.trim().parse()?))
    }
}

impl Add for Cell {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.i + rhs.i, self.j + rhs.j)
    }
}

impl Sub for Cell {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.i - rhs.i, self.j - rhs.j)
    }
}

// ---------------------------------------------------------------------------
// Position / Bounds
// ---------------------------------------------------------------------------

/// A continuous (latitude, longitude) pair, in degrees.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Position {
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether this is a real place: latitude in [-90, 90], longitude in
    /// [-180, 180]. NaN and infinities are not.
    #[inline]
    pub fn on_globe(self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

impl Add for Position {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.lat + rhs.lat, self.lng + rhs.lng)
    }
}

impl Sub for Position {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.lat - rhs.lat, self.lng - rhs.lng)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// A rectangle in coordinate space, given by its south-west and north-east
/// corners.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Bounds {
    pub south_west: Position,
    pub north_east: Position,
}

impl Bounds {
    #[inline]
    pub const fn new(south_west: Position, north_east: Position) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Midpoint of the rectangle.
    pub fn center(self) -> Position {
        Position::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    /// Whether `p` lies inside, south-west edges inclusive.
    pub fn contains(self, p: Position) -> bool {
        p.lat >= self.south_west.lat
            && p.lat < self.north_east.lat
            && p.lng >= self.south_west.lng
            && p.lng < self.north_east.lng
    }
}

// ---------------------------------------------------------------------------
// CellRange
// ---------------------------------------------------------------------------

/// A half-open block of cells \[min, max). `min` is inclusive, `max` is
/// exclusive on both axes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub min: Cell,
    pub max: Cell,
}

impl CellRange {
    /// Create a range from two corners, canonicalized so that `min` ≤ `max`
    /// on each axis.
    #[inline]
    pub fn new(i0: i32, j0: i32, i1: i32, j1: i32) -> Self {
        Self {
            min: Cell::new(i0.min(i1), j0.min(j1)),
            max: Cell::new(i0.max(i1), j0.max(j1)),
        }
    }

    /// The range covering `first..=last` on both axes.
    #[inline]
    pub fn inclusive(first: Cell, last: Cell) -> Self {
        let end = last.shift(1, 1);
        Self::new(first.i, first.j, end.i, end.j)
    }

    /// Number of rows (cells along `i`).
    #[inline]
    pub fn rows(self) -> i32 {
        self.max.i - self.min.i
    }

    /// Number of columns (cells along `j`).
    #[inline]
    pub fn cols(self) -> i32 {
        self.max.j - self.min.j
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.min.i >= self.max.i || self.min.j >= self.max.j
    }

    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.rows() as usize) * (self.cols() as usize)
    }

    #[inline]
    pub fn contains(self, c: Cell) -> bool {
        c.i >= self.min.i && c.i < self.max.i && c.j >= self.min.j && c.j < self.max.j
    }

    /// Iterator over every cell, `i` in the outer loop and `j` in the inner.
    #[inline]
    pub fn iter(self) -> CellRangeIter {
        CellRangeIter {
            range: self,
            cur: self.min,
        }
    }
}

impl IntoIterator for CellRange {
    type Item = Cell;
    type IntoIter = CellRangeIter;
    #[inline]
    fn into_iter(self) -> CellRangeIter {
        self.iter()
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{})", self.min, self.max)
    }
}

/// Iterator over the cells of a [`CellRange`].
#[derive(Clone, Debug)]
pub struct CellRangeIter {
    range: CellRange,
    cur: Cell,
}

impl Iterator for CellRangeIter {
    type Item = Cell;

    #[inline]
    fn next(&mut self) -> Option<Cell> {
        if self.cur.i >= self.range.max.i || self.range.is_empty() {
            return None;
        }
        let c = self.cur;
        self.cur.j += 1;
        if self.cur.j >= self.range.max.j {
            self.cur.j = self.range.min.j;
            self.cur.i += 1;
        }
        Some(c)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.range.is_empty() || self.cur.i >= self.range.max.i {
            return (0, Some(0));
        }
        let cols = self.range.cols() as usize;
        let remaining_in_row = (self.range.max.j - self.cur.j) as usize;
        let remaining_rows = (self.range.max.i - self.cur.i - 1) as usize;
        let total = remaining_in_row + remaining_rows * cols;
        (total, Some(total))
    }
}

impl ExactSizeIterator for CellRangeIter {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn cell_key_format() {
        assert_eq!(Cell::new(3, -7).key(), "3,-7");
        assert_eq!(Cell::new(-1, 0).to_string(), "-1,0");
    }

    #[test]
    fn cell_key_parses_back() {
        let c: Cell = "740000,-2441140".parse().unwrap();
        assert_eq!(c, Cell::new(740000, -2441140));
        assert_eq!(" 2 , 5".parse::<Cell>().unwrap(), Cell::new(2, 5));
    }

    #[test]
    fn cell_key_rejects_garbage() {
        assert!(matches!("12".parse::<Cell>(), Err(ParseCellError::Shape(_))));
        assert!(matches!("a,1".parse::<Cell>(), Err(ParseCellError::Int(_))));
        assert!("1,2,3".parse::<Cell>().is_err());
    }

    #[test]
    fn cells_are_structural() {
        let a = Cell::new(4, 5);
        let b = Cell::ZERO.shift(4, 5);
        assert_eq!(a, b);
        let set: HashSet<Cell> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn cell_arithmetic_and_distance() {
        let a = Cell::new(1, 2);
        let b = Cell::new(-2, 4);
        assert_eq!(a + b, Cell::new(-1, 6));
        assert_eq!(a - b, Cell::new(3, -2));
        assert_eq!(a.chebyshev(b), 3);
        assert_eq!(a.chebyshev(a), 0);
    }

    #[test]
    fn extreme_cells_do_not_overflow() {
        let top = Cell::new(i32::MAX, i32::MIN);
        assert_eq!(top.shift(1, -1), top);
        assert_eq!(top.chebyshev(Cell::new(i32::MIN, i32::MAX)), i32::MAX);
        let r = CellRange::inclusive(top, top);
        assert!(r.max.i >= r.min.i && r.max.j >= r.min.j);
    }

    #[test]
    fn positions_on_and_off_the_globe() {
        assert!(Position::new(90.0, -180.0).on_globe());
        assert!(Position::new(36.99, -122.05).on_globe());
        assert!(!Position::new(1e12, 0.0).on_globe());
        assert!(!Position::new(0.0, 180.5).on_globe());
        assert!(!Position::new(f64::NAN, 0.0).on_globe());
        assert!(!Position::new(0.0, f64::INFINITY).on_globe());
    }

    #[test]
    fn bounds_center_and_contains() {
        let b = Bounds::new(Position::new(0.0, 0.0), Position::new(2.0, 4.0));
        assert_eq!(b.center(), Position::new(1.0, 2.0));
        assert!(b.contains(Position::new(0.0, 0.0)));
        assert!(!b.contains(Position::new(2.0, 1.0)));
    }

    #[test]
    fn range_iter_order_and_count() {
        let r = CellRange::new(0, 0, 2, 3);
        let cells: Vec<_> = r.iter().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(r.len(), 6);
        assert_eq!(cells[0], Cell::new(0, 0));
        assert_eq!(cells[1], Cell::new(0, 1));
        assert_eq!(cells[3], Cell::new(1, 0));
        assert_eq!(cells[5], Cell::new(1, 2));
    }

    #[test]
    fn range_inclusive_covers_both_ends() {
        let r = CellRange::inclusive(Cell::new(-1, -1), Cell::new(1, 1));
        assert_eq!(r.len(), 9);
        assert!(r.contains(Cell::new(1, 1)));
        assert!(r.contains(Cell::new(-1, -1)));
        assert!(!r.contains(Cell::new(2, 0)));
    }

    #[test]
    fn range_iter_size_hint_tracks_progress() {
        let mut it = CellRange::new(0, 0, 3, 3).iter();
        assert_eq!(it.len(), 9);
        it.next();
        it.next();
        it.next();
        it.next();
        assert_eq!(it.len(), 5);
    }

    #[test]
    fn empty_range_yields_nothing() {
        let r = CellRange::new(2, 2, 2, 5);
        assert!(r.is_empty());
        assert_eq!(r.iter().count(), 0);
        assert_eq!(r.len(), 0);
    }
}

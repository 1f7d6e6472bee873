//! Which cells are in view.

use crate::geom::{Bounds, Cell, CellRange, Position};
use crate::mapper::{self, TILE_DEGREES};

/// Cells to materialize for the region between `south_west` and
/// `north_east`.
///
/// Both corners are snapped to cell centers and converted to cells; the
/// result spans `[sw.i, ne.i + 1] × [sw.j, ne.j + 1]`, one extra row and
/// column past the north-east corner so a panned view never shows an
/// undrawn edge.
pub fn cells_in_view(south_west: Position, north_east: Position) -> CellRange {
    let first = mapper::to_cell(mapper::snap_to_cell_center(south_west));
    let last = mapper::to_cell(mapper::snap_to_cell_center(north_east));
    CellRange::inclusive(first, last.shift(1, 1))
}

/// A window of `rows` × `cols` cells centered on a position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub center: Position,
    pub rows: i32,
    pub cols: i32,
}

impl Viewport {
    pub fn new(center: Position, rows: i32, cols: i32) -> Self {
        Self {
            center,
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    /// Coordinate rectangle covered by the window.
    pub fn bounds(&self) -> Bounds {
        let half_lat = f64::from(self.rows) * TILE_DEGREES / 2.0;
        let half_lng = f64::from(self.cols) * TILE_DEGREES / 2.0;
        Bounds::new(
            Position::new(self.center.lat - half_lat, self.center.lng - half_lng),
            Position::new(self.center.lat + half_lat, self.center.lng + half_lng),
        )
    }

    /// Cells to draw for the current window.
    pub fn cells(&self) -> CellRange {
        let b = self.bounds();
        cells_in_view(b.south_west, b.north_east)
    }

    /// Move the window by whole cells.
    pub fn pan_by(&mut self, delta: Cell) {
        self.center = self.center + mapper::delta_to_offset(delta);
    }

    pub fn center_on(&mut self, pos: Position) {
        self.center = pos;
    }

    /// Change the window size, keeping its center.
    pub fn resize(&mut self, rows: i32, cols: i32) {
        self.rows = rows.max(1);
        self.cols = cols.max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::{cell_center, to_position};

    #[test]
    fn far_off_corners_stay_bounded() {
        let r = cells_in_view(Position::new(-1e12, -1e12), Position::new(1e12, 1e12));
        assert_eq!(r.min, Cell::new(-mapper::MAX_INDEX, -mapper::MAX_INDEX));
        assert_eq!(r.max, Cell::new(mapper::MAX_INDEX + 2, mapper::MAX_INDEX + 2));
        let b = mapper::cell_bounds(Cell::new(i32::MAX, i32::MAX));
        assert!(b.north_east.lat >= b.south_west.lat);
    }

    #[test]
    fn single_cell_view_gets_padding() {
        let c = Cell::new(4, 4);
        let corner = to_position(c);
        let sw = Position::new(corner.lat + TILE_DEGREES * 0.1, corner.lng + TILE_DEGREES * 0.1);
        let ne = Position::new(corner.lat + TILE_DEGREES * 0.9, corner.lng + TILE_DEGREES * 0.9);
        let r = cells_in_view(sw, ne);
        assert_eq!(r.min, c);
        assert_eq!(r.max, Cell::new(6, 6));
        assert_eq!(r.len(), 4);
    }

    #[test]
    fn view_spans_inclusive_range_plus_one() {
        let sw = cell_center(Cell::new(-2, 10));
        let ne = cell_center(Cell::new(3, 14));
        let cells: Vec<_> = cells_in_view(sw, ne).iter().collect();
        assert_eq!(cells.len(), 7 * 6);
        assert_eq!(cells.first(), Some(&Cell::new(-2, 10)));
        assert_eq!(cells.last(), Some(&Cell::new(4, 15)));
    }

    #[test]
    fn view_is_idempotent() {
        let sw = Position::new(36.9975, -122.058);
        let ne = Position::new(36.9985, -122.056);
        let a: Vec<_> = cells_in_view(sw, ne).iter().collect();
        let b: Vec<_> = cells_in_view(sw, ne).iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn viewport_bounds_are_centered() {
        let v = Viewport::new(Position::new(0.0, 0.0), 10, 20);
        let b = v.bounds();
        assert!((b.north_east.lat - 5.0 * TILE_DEGREES).abs() < 1e-12);
        assert!((b.south_west.lng + 10.0 * TILE_DEGREES).abs() < 1e-12);
        assert!((b.center().lat).abs() < 1e-12);
    }

    #[test]
    fn viewport_cells_cover_window() {
        let v = Viewport::new(cell_center(Cell::new(100, 100)), 5, 7);
        let r = v.cells();
        assert!(r.contains(Cell::new(100, 100)));
        assert!(r.rows() >= 5);
        assert!(r.cols() >= 7);
    }

    #[test]
    fn pan_moves_center_by_cells() {
        let mut v = Viewport::new(cell_center(Cell::new(0, 0)), 3, 3);
        v.pan_by(Cell::new(2, -1));
        assert_eq!(mapper::to_cell(v.center), Cell::new(2, -1));
    }

    #[test]
    fn degenerate_sizes_are_clamped() {
        let mut v = Viewport::new(Position::default(), 0, -4);
        assert_eq!((v.rows, v.cols), (1, 1));
        v.resize(-1, 9);
        assert_eq!((v.rows, v.cols), (1, 9));
    }
}

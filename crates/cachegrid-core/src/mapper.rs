//! Conversions between continuous [`Position`]s and discrete [`Cell`]s.
//!
//! [`TILE_DEGREES`] is the only tile size in the crate. The generator, the
//! overlay and the viewport all reach the grid through these functions, so
//! cell identities cannot drift apart between components.

use crate::geom::{Bounds, Cell, Position};

/// Edge length of one cell, in degrees of latitude/longitude.
pub const TILE_DEGREES: f64 = 5e-5;

/// Quotients this close to an integer are treated as that integer, so the
/// floating-point corner `i * TILE_DEGREES` maps back to cell `i`.
const INDEX_EPSILON: f64 = 1e-9;

/// Largest grid index on either axis. Far beyond the globe (±180° is
/// 3.6 million cells) and far enough below `i32::MAX` that neighbouring
/// cells and view ranges never overflow.
pub const MAX_INDEX: i32 = 1 << 30;

#[inline]
fn grid_index(coord: f64) -> i32 {
    let q = coord / TILE_DEGREES;
    let nearest = q.round();
    let idx = if (q - nearest).abs() < INDEX_EPSILON {
        nearest
    } else {
        q.floor()
    };
    // Float-to-int `as` saturates and maps NaN to 0.
    (idx as i32).clamp(-MAX_INDEX, MAX_INDEX)
}

/// The cell enclosing `pos`.
#[inline]
pub fn to_cell(pos: Position) -> Cell {
    Cell::new(grid_index(pos.lat), grid_index(pos.lng))
}

/// The south-west corner of `cell`.
#[inline]
pub fn to_position(cell: Cell) -> Position {
    Position::new(
        f64::from(cell.i) * TILE_DEGREES,
        f64::from(cell.j) * TILE_DEGREES,
    )
}

/// A cell delta expressed as a coordinate offset.
#[inline]
pub fn delta_to_offset(delta: Cell) -> Position {
    to_position(delta)
}

/// The center of the cell containing `pos`.
///
/// Goes through [`to_cell`], so positions south or west of the origin snap
/// into their own cell and snapping twice is exact.
#[inline]
pub fn snap_to_cell_center(pos: Position) -> Position {
    cell_center(to_cell(pos))
}

/// Center point of `cell`.
#[inline]
pub fn cell_center(cell: Cell) -> Position {
    let sw = to_position(cell);
    Position::new(sw.lat + TILE_DEGREES / 2.0, sw.lng + TILE_DEGREES / 2.0)
}

/// The rectangle covered by `cell`.
pub fn cell_bounds(cell: Cell) -> Bounds {
    Bounds::new(to_position(cell), to_position(cell.shift(1, 1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn to_cell_floors() {
        let p = Position::new(2.7 * TILE_DEGREES, 0.2 * TILE_DEGREES);
        assert_eq!(to_cell(p), Cell::new(2, 0));
    }

    #[test]
    fn to_cell_floors_negative_toward_minus_infinity() {
        let p = Position::new(-0.3 * TILE_DEGREES, -2.5 * TILE_DEGREES);
        assert_eq!(to_cell(p), Cell::new(-1, -3));
    }

    #[test]
    fn huge_coordinates_clamp() {
        assert_eq!(to_cell(Position::new(1e12, -1e12)), Cell::new(MAX_INDEX, -MAX_INDEX));
        assert_eq!(to_cell(Position::new(f64::NAN, f64::INFINITY)), Cell::new(0, MAX_INDEX));
    }

    #[test]
    fn start_position_cell() {
        let p = Position::new(36.997936938057016, -122.05703507501151);
        assert_eq!(to_cell(p), Cell::new(739958, -2441141));
    }

    #[test]
    fn corner_round_trip_for_awkward_indices() {
        for i in [-1_000_003, -7, -3, -1, 0, 1, 3, 7, 29, 739_958, 1_800_000] {
            let c = Cell::new(i, -i);
            assert_eq!(to_cell(to_position(c)), c, "cell {c}");
        }
    }

    #[test]
    fn snap_positive() {
        let p = Position::new(3.2 * TILE_DEGREES, 7.9 * TILE_DEGREES);
        let s = snap_to_cell_center(p);
        assert!(close(s.lat, 3.5 * TILE_DEGREES));
        assert!(close(s.lng, 7.5 * TILE_DEGREES));
    }

    #[test]
    fn snap_negative_stays_in_own_cell() {
        let p = Position::new(-0.2 * TILE_DEGREES, -4.6 * TILE_DEGREES);
        let s = snap_to_cell_center(p);
        assert!(close(s.lat, -0.5 * TILE_DEGREES));
        assert!(close(s.lng, -4.5 * TILE_DEGREES));
        assert_eq!(to_cell(s), to_cell(p));
    }

    #[test]
    fn snap_is_idempotent() {
        let p = Position::new(36.997936938057016, -122.05703507501151);
        let once = snap_to_cell_center(p);
        assert_eq!(snap_to_cell_center(once), once);
        assert_eq!(once, cell_center(to_cell(p)));
    }

    #[test]
    fn center_and_bounds_agree() {
        let c = Cell::new(-4, 9);
        let b = cell_bounds(c);
        assert_eq!(b.south_west, to_position(c));
        assert_eq!(b.north_east, to_position(Cell::new(-3, 10)));
        let center = cell_center(c);
        assert!(close(center.lat, b.center().lat));
        assert!(close(center.lng, b.center().lng));
        assert_eq!(to_cell(center), c);
    }

    #[test]
    fn delta_offset_is_one_tile() {
        let o = delta_to_offset(Cell::new(1, -1));
        assert!(close(o.lat, TILE_DEGREES));
        assert!(close(o.lng, -TILE_DEGREES));
    }
}

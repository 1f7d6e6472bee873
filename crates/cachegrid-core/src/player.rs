//! Player state and movement.

use serde::{Deserialize, Serialize};

use crate::geom::{Cell, Position};
use crate::mapper;
use crate::Token;

/// A button-driven move, one cell at a time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Cell delta of one step: up is north (+i), right is east (+j).
    pub const fn delta(self) -> Cell {
        match self {
            Self::Up => Cell::new(1, 0),
            Self::Down => Cell::new(-1, 0),
            Self::Left => Cell::new(0, -1),
            Self::Right => Cell::new(0, 1),
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Self::Up => '↑',
            Self::Down => '↓',
            Self::Left => '←',
            Self::Right => '→',
        }
    }
}

/// How the player's position is driven.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Controls {
    /// Direction commands, one cell per press; the marker sits on cell
    /// centers.
    #[default]
    Buttons,
    /// A live position feed; positions are applied as given.
    Geo,
}

/// Everything the world knows about the player.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlayerState {
    /// Token in hand, 0 when empty.
    pub held: Token,
    pub position: Position,
    /// Whether the view re-centers on the player as it moves.
    pub following: bool,
}

impl PlayerState {
    pub fn new(position: Position) -> Self {
        Self {
            held: 0,
            position,
            following: true,
        }
    }

    /// The cell the player stands in.
    #[inline]
    pub fn cell(&self) -> Cell {
        mapper::to_cell(self.position)
    }

    #[inline]
    pub fn has_token(&self) -> bool {
        self.held != 0
    }

    /// Move one cell in `dir`, landing on the center of the new cell.
    pub fn step(&mut self, dir: Direction) {
        let target = self.position + mapper::delta_to_offset(dir.delta());
        self.position = mapper::snap_to_cell_center(target);
    }

    /// Put the marker on the center of its current cell.
    pub fn center_marker(&mut self) {
        self.position = mapper::snap_to_cell_center(self.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::{cell_center, to_cell};

    #[test]
    fn new_player_is_empty_handed_and_following() {
        let p = PlayerState::new(Position::new(1.0, 2.0));
        assert_eq!(p.held, 0);
        assert!(!p.has_token());
        assert!(p.following);
    }

    #[test]
    fn steps_move_one_cell() {
        let start = cell_center(Cell::new(10, 10));
        let mut p = PlayerState::new(start);
        p.step(Direction::Up);
        assert_eq!(p.cell(), Cell::new(11, 10));
        p.step(Direction::Right);
        p.step(Direction::Right);
        assert_eq!(p.cell(), Cell::new(11, 12));
        p.step(Direction::Down);
        p.step(Direction::Left);
        assert_eq!(p.cell(), Cell::new(10, 11));
    }

    #[test]
    fn step_snaps_off_center_positions() {
        let c = Cell::new(-3, 7);
        let sw = crate::mapper::to_position(c);
        let mut p = PlayerState::new(Position::new(sw.lat + 1e-6, sw.lng + 4e-5));
        p.step(Direction::Left);
        let expect = cell_center(Cell::new(-3, 6));
        assert!((p.position.lat - expect.lat).abs() < 1e-12);
        assert!((p.position.lng - expect.lng).abs() < 1e-12);
    }

    #[test]
    fn opposite_steps_cancel() {
        let mut p = PlayerState::new(cell_center(Cell::new(0, 0)));
        for d in Direction::ALL {
            p.step(d);
        }
        assert_eq!(to_cell(p.position), Cell::new(0, 0));
    }

    #[test]
    fn center_marker_keeps_cell() {
        let mut p = PlayerState::new(Position::new(36.997936938057016, -122.05703507501151));
        let before = p.cell();
        p.center_marker();
        assert_eq!(p.cell(), before);
    }

    #[test]
    fn direction_symbols() {
        let s: String = Direction::ALL.iter().map(|d| d.symbol()).collect();
        assert_eq!(s, "↑↓←→");
    }
}

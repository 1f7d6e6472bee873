//! Sparse record of cells whose token differs from the generated default.
//!
//! Together with [`Generator`] this gives the value of every cell in an
//! unbounded world while only storing the cells that were actually changed.
//! An entry exists exactly while the cell's value differs from its default;
//! [`Overlay::reconcile`] is the mutation path that keeps it that way.

use indexmap::IndexMap;

use crate::generator::Generator;
use crate::geom::Cell;
use crate::Token;

/// Cell → current token, for diverged cells only. Iteration follows
/// insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Overlay {
    entries: IndexMap<Cell, Token>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn has(&self, cell: Cell) -> bool {
        self.entries.contains_key(&cell)
    }

    /// The recorded value, `None` when the cell is at its default.
    #[inline]
    pub fn get(&self, cell: Cell) -> Option<Token> {
        self.entries.get(&cell).copied()
    }

    /// Unconditional upsert.
    pub fn set(&mut self, cell: Cell, value: Token) {
        self.entries.insert(cell, value);
    }

    /// Record `value` as the current token of `cell`, dropping the entry when
    /// it equals the generated default.
    ///
    /// Returns `true` if an entry exists afterwards.
    pub fn reconcile(&mut self, generator: &Generator, cell: Cell, value: Token) -> bool {
        if value == generator.initial_value(cell) {
            if self.entries.shift_remove(&cell).is_some() {
                log::debug!("cell {cell} restored to its default");
            }
            false
        } else {
            self.set(cell, value);
            true
        }
    }

    /// Current value of `cell`: the overlay entry, else the generated default.
    pub fn value_at(&self, generator: &Generator, cell: Cell) -> Token {
        self.get(cell).unwrap_or_else(|| generator.initial_value(cell))
    }

    /// Drop every entry (world reset).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Token)> + '_ {
        self.entries.iter().map(|(&c, &v)| (c, v))
    }
}

impl FromIterator<(Cell, Token)> for Overlay {
    fn from_iter<I: IntoIterator<Item = (Cell, Token)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::CellRange;

    /// A cell that spawns with a non-zero token under the default generator.
    fn spawning_cell(g: &Generator) -> (Cell, Token) {
        CellRange::new(0, 0, 200, 200)
            .iter()
            .map(|c| (c, g.initial_value(c)))
            .find(|&(_, v)| v > 0)
            .expect("some cell spawns a token")
    }

    #[test]
    fn empty_overlay_falls_back_to_generator() {
        let g = Generator::default();
        let o = Overlay::new();
        for c in CellRange::new(0, 0, 10, 10) {
            assert!(!o.has(c));
            assert_eq!(o.get(c), None);
            assert_eq!(o.value_at(&g, c), g.initial_value(c));
        }
        assert!(o.is_empty());
    }

    #[test]
    fn set_overrides_default() {
        let g = Generator::default();
        let mut o = Overlay::new();
        let c = Cell::new(3, 4);
        o.set(c, 9);
        assert!(o.has(c));
        assert_eq!(o.get(c), Some(9));
        assert_eq!(o.value_at(&g, c), 9);
        o.set(c, 10);
        assert_eq!(o.get(c), Some(10));
        assert_eq!(o.len(), 1);
    }

    #[test]
    fn reconcile_to_default_removes_entry() {
        let g = Generator::default();
        let (c, v) = spawning_cell(&g);
        let mut o = Overlay::new();
        assert!(o.reconcile(&g, c, 0));
        assert_eq!(o.get(c), Some(0));
        assert!(!o.reconcile(&g, c, v));
        assert!(!o.has(c));
    }

    #[test]
    fn reconcile_default_on_untouched_cell_creates_nothing() {
        let g = Generator::default();
        let mut o = Overlay::new();
        for c in CellRange::new(-5, -5, 5, 5) {
            o.reconcile(&g, c, g.initial_value(c));
        }
        assert!(o.is_empty());
    }

    #[test]
    fn iteration_keeps_insertion_order_after_removal() {
        let g = Generator::new(0.0, 2, "");
        let mut o = Overlay::new();
        o.reconcile(&g, Cell::new(5, 5), 1);
        o.reconcile(&g, Cell::new(1, 1), 2);
        o.reconcile(&g, Cell::new(3, 3), 4);
        o.reconcile(&g, Cell::new(1, 1), 0);
        let order: Vec<_> = o.iter().collect();
        assert_eq!(order, vec![(Cell::new(5, 5), 1), (Cell::new(3, 3), 4)]);
    }

    #[test]
    fn clear_drops_everything() {
        let mut o: Overlay = [(Cell::new(0, 0), 1), (Cell::new(0, 1), 2)]
            .into_iter()
            .collect();
        assert_eq!(o.len(), 2);
        o.clear();
        assert!(o.is_empty());
    }
}

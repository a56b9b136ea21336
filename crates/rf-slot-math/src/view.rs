//! Visible window and winners mask
//!
//! Both are fixed-size reel × row buffers stored column by column, so a reel
//! is one contiguous slice. They are allocated once per engine and cleared,
//! never reallocated, between rounds.

use crate::config::GridSpec;
use crate::paytable::Payline;
use crate::symbols::{NO_SYMBOL, SymbolId};

/// Reel-major 2D buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    reels: usize,
    rows: usize,
    cells: Vec<T>,
}

/// Symbols currently on screen
pub type View = Grid<SymbolId>;

/// Cells that contributed to a win in the current evaluation pass
pub type WinnersMask = Grid<bool>;

impl<T: Copy> Grid<T> {
    /// Create a grid with every cell set to `value`
    pub fn filled(grid: GridSpec, value: T) -> Self {
        Self {
            reels: grid.reels,
            rows: grid.rows,
            cells: vec![value; grid.total_positions()],
        }
    }

    /// Number of reels
    #[inline]
    pub fn reels(&self) -> usize {
        self.reels
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn index(&self, reel: usize, row: usize) -> usize {
        debug_assert!(reel < self.reels && row < self.rows);
        reel * self.rows + row
    }

    /// Cell value
    #[inline]
    pub fn get(&self, reel: usize, row: usize) -> T {
        self.cells[self.index(reel, row)]
    }

    /// Set a cell
    #[inline]
    pub fn set(&mut self, reel: usize, row: usize, value: T) {
        let idx = self.index(reel, row);
        self.cells[idx] = value;
    }

    /// One reel, top row first
    #[inline]
    pub fn column(&self, reel: usize) -> &[T] {
        &self.cells[reel * self.rows..(reel + 1) * self.rows]
    }

    /// One reel, mutable
    #[inline]
    pub fn column_mut(&mut self, reel: usize) -> &mut [T] {
        &mut self.cells[reel * self.rows..(reel + 1) * self.rows]
    }

    /// Set every cell
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }

    /// Set every cell of one reel
    pub fn fill_column(&mut self, reel: usize, value: T) {
        self.column_mut(reel).fill(value);
    }

    /// Overwrite with another grid of the same size
    pub fn copy_from(&mut self, other: &Self) {
        self.cells.copy_from_slice(&other.cells);
    }

    /// All cells in reel-major order
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// `(reel, row, value)` for every cell
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        let rows = self.rows;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &v)| (i / rows, i % rows, v))
    }
}

impl View {
    /// Create an empty view
    pub fn new(grid: GridSpec) -> Self {
        Self::filled(grid, NO_SYMBOL)
    }

    /// Reset every cell to [`NO_SYMBOL`]
    pub fn clear(&mut self) {
        self.fill(NO_SYMBOL);
    }

    /// Build from rows of symbols (`rows[row][reel]`), as a window is drawn
    pub fn from_rows(rows: &[Vec<SymbolId>]) -> Self {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut view = Self::new(GridSpec::new(width, height));
        for (row, symbols) in rows.iter().enumerate() {
            for (reel, &symbol) in symbols.iter().enumerate() {
                view.set(reel, row, symbol);
            }
        }
        view
    }

    /// Symbols under a payline, left to right
    pub fn line_into(&self, payline: &Payline, out: &mut Vec<SymbolId>) {
        out.clear();
        out.extend(
            payline
                .rows
                .iter()
                .enumerate()
                .map(|(reel, &row)| self.get(reel, row)),
        );
    }

    /// Occurrences of cells matching `predicate`
    pub fn count_where(&self, predicate: impl Fn(SymbolId) -> bool) -> usize {
        self.cells.iter().filter(|&&s| predicate(s)).count()
    }
}

impl WinnersMask {
    /// Create a cleared mask
    pub fn new(grid: GridSpec) -> Self {
        Self::filled(grid, false)
    }

    /// Unmark every cell
    pub fn clear(&mut self) {
        self.fill(false);
    }

    /// Mark one cell
    #[inline]
    pub fn mark(&mut self, reel: usize, row: usize) {
        self.set(reel, row, true);
    }

    /// Number of marked cells
    pub fn marked(&self) -> usize {
        self.cells.iter().filter(|&&m| m).count()
    }

    /// Check if nothing is marked
    pub fn is_clear(&self) -> bool {
        !self.cells.iter().any(|&m| m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_layout() {
        let view = View::from_rows(&[vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(view.reels(), 3);
        assert_eq!(view.rows(), 2);
        assert_eq!(view.get(1, 0), 2);
        assert_eq!(view.get(1, 1), 5);
        assert_eq!(view.column(2), &[3, 6]);
    }

    #[test]
    fn test_view_line() {
        let view = View::from_rows(&[vec![1, 2, 3], vec![4, 5, 6]]);
        let mut line = Vec::new();
        view.line_into(&Payline::new(vec![0, 1, 0]), &mut line);
        assert_eq!(line, vec![1, 5, 3]);
    }

    #[test]
    fn test_clear_and_fill() {
        let mut view = View::new(GridSpec::new(2, 2));
        assert_eq!(view.count_where(|s| s == NO_SYMBOL), 4);
        view.fill_column(1, 7);
        assert_eq!(view.column(1), &[7, 7]);
        assert_eq!(view.count_where(|s| s == 7), 2);
        view.clear();
        assert_eq!(view.get(1, 1), NO_SYMBOL);
    }

    #[test]
    fn test_winners_mask() {
        let mut mask = WinnersMask::new(GridSpec::new(3, 3));
        assert!(mask.is_clear());
        mask.mark(2, 1);
        mask.mark(0, 0);
        assert_eq!(mask.marked(), 2);
        assert!(mask.get(2, 1));
        let marked: Vec<_> = mask.iter().filter(|c| c.2).map(|c| (c.0, c.1)).collect();
        assert_eq!(marked, vec![(0, 0), (2, 1)]);
    }
}

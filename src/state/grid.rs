//! Focus Grid - Sparse row/column map of focusable items.
//!
//! Rebuilt from scratch every frame. Rows and columns may have holes; the
//! lookups below resolve a move from a cell to the index of the item that
//! should receive focus, or `None` when the caller should fall back to
//! linear navigation.

use std::collections::BTreeMap;

use crate::types::{Direction, GridPosition};

#[derive(Debug, Default, Clone)]
pub struct FocusGrid {
    rows: BTreeMap<usize, BTreeMap<usize, usize>>,
}

impl FocusGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Place item `index` at `pos`. A later insert at the same cell wins.
    pub fn insert(&mut self, pos: GridPosition, index: usize) {
        self.rows.entry(pos.row).or_default().insert(pos.col, index);
    }

    pub fn get(&self, pos: GridPosition) -> Option<usize> {
        self.rows.get(&pos.row)?.get(&pos.col).copied()
    }

    /// Item in `row` whose column is closest to `col`. Ties go to the
    /// smaller column.
    pub fn nearest_in_row(&self, row: usize, col: usize) -> Option<usize> {
        let cells = self.rows.get(&row)?;
        let below = cells.range(..=col).next_back();
        let above = cells.range(col..).next();
        let (_, index) = match (below, above) {
            (Some(b), Some(a)) => {
                if col - b.0 <= a.0 - col {
                    b
                } else {
                    a
                }
            }
            (Some(b), None) => b,
            (None, Some(a)) => a,
            (None, None) => return None,
        };
        Some(*index)
    }

    pub fn first_in_row(&self, row: usize) -> Option<usize> {
        self.rows.get(&row)?.values().next().copied()
    }

    pub fn last_in_row(&self, row: usize) -> Option<usize> {
        self.rows.get(&row)?.values().next_back().copied()
    }

    fn next_row(&self, row: usize) -> Option<usize> {
        self.rows.range(row + 1..).next().map(|(r, _)| *r)
    }

    fn prev_row(&self, row: usize) -> Option<usize> {
        self.rows.range(..row).next_back().map(|(r, _)| *r)
    }

    /// Resolve a move from `from`.
    ///
    /// - Up/Down: the adjacent row, exact column or nearest column.
    /// - Left/Right: the adjacent cell in the same row, exact only.
    /// - Next/Prev: the adjacent cell in the same row, else the first cell of
    ///   the next populated row or the last cell of the previous one.
    pub fn target(&self, from: GridPosition, dir: Direction) -> Option<usize> {
        match dir {
            Direction::Up => {
                let row = from.row.checked_sub(1)?;
                self.nearest_in_row(row, from.col)
            }
            Direction::Down => self.nearest_in_row(from.row + 1, from.col),
            Direction::Left => {
                let col = from.col.checked_sub(1)?;
                self.get(GridPosition::new(from.row, col))
            }
            Direction::Right => self.get(GridPosition::new(from.row, from.col + 1)),
            Direction::Next => self
                .get(GridPosition::new(from.row, from.col + 1))
                .or_else(|| self.next_row(from.row).and_then(|r| self.first_in_row(r))),
            Direction::Prev => from
                .col
                .checked_sub(1)
                .and_then(|col| self.get(GridPosition::new(from.row, col)))
                .or_else(|| self.prev_row(from.row).and_then(|r| self.last_in_row(r))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Row 0 has four items, row 1 has three.
    fn two_rows() -> FocusGrid {
        let mut grid = FocusGrid::new();
        for col in 0..4 {
            grid.insert(GridPosition::new(0, col), col);
        }
        for col in 0..3 {
            grid.insert(GridPosition::new(1, col), 4 + col);
        }
        grid
    }

    #[test]
    fn test_down_same_column() {
        let grid = two_rows();
        assert_eq!(grid.target(GridPosition::new(0, 2), Direction::Down), Some(6));
    }

    #[test]
    fn test_down_nearest_column() {
        let grid = two_rows();
        // (0,3) has no cell below; (1,2) is nearest.
        assert_eq!(grid.target(GridPosition::new(0, 3), Direction::Down), Some(6));
    }

    #[test]
    fn test_nearest_tie_prefers_smaller_column() {
        let mut grid = FocusGrid::new();
        grid.insert(GridPosition::new(0, 0), 10);
        grid.insert(GridPosition::new(0, 4), 11);
        assert_eq!(grid.nearest_in_row(0, 2), Some(10));
        assert_eq!(grid.nearest_in_row(0, 3), Some(11));
    }

    #[test]
    fn test_missing_row_has_no_target() {
        let grid = two_rows();
        assert_eq!(grid.target(GridPosition::new(1, 0), Direction::Down), None);
        assert_eq!(grid.target(GridPosition::new(0, 0), Direction::Up), None);
    }

    #[test]
    fn test_horizontal_is_exact() {
        let grid = two_rows();
        assert_eq!(grid.target(GridPosition::new(0, 1), Direction::Right), Some(2));
        assert_eq!(grid.target(GridPosition::new(1, 2), Direction::Right), None);
        assert_eq!(grid.target(GridPosition::new(1, 0), Direction::Left), None);
    }

    #[test]
    fn test_next_prev_wrap_rows() {
        let grid = two_rows();
        assert_eq!(grid.target(GridPosition::new(0, 3), Direction::Next), Some(4));
        assert_eq!(grid.target(GridPosition::new(1, 0), Direction::Prev), Some(3));
        assert_eq!(grid.target(GridPosition::new(1, 2), Direction::Next), None);
    }

    #[test]
    fn test_sparse_rows_skip_gaps_for_next() {
        let mut grid = FocusGrid::new();
        grid.insert(GridPosition::new(0, 0), 0);
        grid.insert(GridPosition::new(5, 2), 1);
        assert_eq!(grid.target(GridPosition::new(0, 0), Direction::Next), Some(1));
        assert_eq!(grid.target(GridPosition::new(0, 0), Direction::Down), None);
    }
}

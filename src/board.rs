//! Board: the committed cell matrix, collision tests, locking, and line clears.

use crate::piece::{ActivePiece, Kind, Shape};
use std::collections::VecDeque;

/// Playfield width in columns.
pub const WIDTH: usize = 10;
/// Playfield height in rows.
pub const HEIGHT: usize = 20;

/// Single cell: either empty or locked by a piece of the given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Kind),
}

impl Cell {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[inline]
    pub fn kind(&self) -> Option<Kind> {
        match self {
            Self::Empty => None,
            Self::Filled(k) => Some(*k),
        }
    }
}

/// Playfield: grid of cells. Row 0 is the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// rows[y][x] = cell. rows[0] is top.
    rows: VecDeque<[Cell; WIDTH]>,
}

impl Board {
    pub fn new() -> Self {
        Self {
            rows: (0..HEIGHT).map(|_| [Cell::Empty; WIDTH]).collect(),
        }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Every (row, col, cell) triple, row-major from the top; used for a full repaint.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, cell)| (r, c, *cell)))
    }

    pub fn is_row_full(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .is_some_and(|r| r.iter().all(|c| !c.is_empty()))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|r| r.iter().all(Cell::is_empty))
    }

    /// True if every occupied cell of `shape`, offset by (row, col), is on the board and empty.
    pub fn is_valid_placement(&self, row: i32, col: i32, shape: &Shape) -> bool {
        shape.occupied().all(|(r, c)| {
            let (y, x) = (row + r as i32, col + c as i32);
            if y < 0 || x < 0 || y >= HEIGHT as i32 || x >= WIDTH as i32 {
                return false;
            }
            matches!(self.get(y as usize, x as usize), Some(Cell::Empty))
        })
    }

    /// Write the piece into the grid. Does nothing if the piece does not fit where it is.
    /// Returns whether the cells were written.
    pub fn lock(&mut self, piece: &ActivePiece) -> bool {
        if !self.is_valid_placement(piece.row, piece.col, &piece.shape) {
            log::warn!(
                "refusing to lock {:?} at ({}, {}): placement is invalid",
                piece.kind,
                piece.row,
                piece.col
            );
            return false;
        }
        for (y, x) in piece.footprint() {
            self.rows[y as usize][x as usize] = Cell::Filled(piece.kind);
        }
        true
    }

    /// Remove every full row, pulling the rows above down and adding empty rows at the top.
    /// Scans bottom-up and re-checks the same row after a removal. Returns rows cleared.
    pub fn clear_full_rows_and_compact(&mut self) -> u32 {
        let mut cleared = 0;
        let mut row = HEIGHT;
        while row > 0 {
            if self.is_row_full(row - 1) {
                self.rows.remove(row - 1);
                self.rows.push_front([Cell::Empty; WIDTH]);
                cleared += 1;
            } else {
                row -= 1;
            }
        }
        debug_assert_eq!(self.rows.len(), HEIGHT);
        cleared
    }

    #[cfg(test)]
    pub(crate) fn fill(&mut self, row: usize, col: usize, kind: Kind) {
        self.rows[row][col] = Cell::Filled(kind);
    }

    #[cfg(test)]
    pub(crate) fn fill_row(&mut self, row: usize, kind: Kind) {
        self.rows[row] = [Cell::Filled(kind); WIDTH];
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(board: &Board) -> (usize, usize) {
        let cells: Vec<_> = board.cells().collect();
        let rows = cells.iter().map(|(r, _, _)| *r).max().unwrap_or(0) + 1;
        let cols = cells.iter().map(|(_, c, _)| *c).max().unwrap_or(0) + 1;
        assert_eq!(cells.len(), rows * cols);
        (rows, cols)
    }

    #[test]
    fn new_board_is_empty_and_sized() {
        let b = Board::new();
        assert!(b.is_empty());
        assert_eq!(dims(&b), (HEIGHT, WIDTH));
    }

    #[test]
    fn placement_respects_walls_floor_and_cells() {
        let mut b = Board::new();
        let o = Kind::O.shape();
        assert!(b.is_valid_placement(0, 0, &o));
        assert!(b.is_valid_placement(18, 8, &o));
        assert!(!b.is_valid_placement(19, 0, &o));
        assert!(!b.is_valid_placement(0, 9, &o));
        assert!(!b.is_valid_placement(0, -1, &o));
        assert!(!b.is_valid_placement(-1, 0, &o));
        b.fill(5, 5, Kind::T);
        assert!(!b.is_valid_placement(4, 4, &o));
        assert!(b.is_valid_placement(3, 4, &o));
    }

    #[test]
    fn empty_shape_cells_may_overlap() {
        let mut b = Board::new();
        // I template only occupies row 1 of its 4x4 box
        b.fill(0, 3, Kind::Z);
        b.fill(2, 3, Kind::Z);
        assert!(b.is_valid_placement(0, 3, &Kind::I.shape()));
        // and may hang off the bottom
        assert!(b.is_valid_placement(18, 0, &Kind::I.shape()));
    }

    #[test]
    fn lock_writes_kind() {
        let mut b = Board::new();
        let mut p = ActivePiece::spawn(Kind::S, WIDTH);
        p.row = 18;
        assert!(b.lock(&p));
        let filled: Vec<_> = b.cells().filter(|(_, _, c)| !c.is_empty()).collect();
        assert_eq!(filled.len(), 4);
        assert!(filled.iter().all(|(_, _, c)| *c == Cell::Filled(Kind::S)));
    }

    #[test]
    fn lock_on_invalid_placement_is_noop() {
        let mut b = Board::new();
        b.fill(0, 4, Kind::L);
        let before = b.clone();
        let p = ActivePiece::spawn(Kind::O, WIDTH);
        assert!(!b.lock(&p));
        assert_eq!(b, before);
    }

    #[test]
    fn single_bottom_row_clears() {
        let mut b = Board::new();
        for (c, kind) in Kind::ALL.iter().cycle().take(WIDTH).enumerate() {
            b.fill(HEIGHT - 1, c, *kind);
        }
        assert_eq!(b.clear_full_rows_and_compact(), 1);
        assert!(b.is_empty());
        assert_eq!(dims(&b), (HEIGHT, WIDTH));
    }

    #[test]
    fn three_rows_clear_in_one_pass() {
        let mut b = Board::new();
        for r in 17..20 {
            b.fill_row(r, Kind::J);
        }
        assert_eq!(b.clear_full_rows_and_compact(), 3);
        assert!(b.is_empty());
        assert_eq!(dims(&b), (HEIGHT, WIDTH));
    }

    #[test]
    fn rows_above_shift_down_in_order() {
        let mut b = Board::new();
        b.fill(15, 0, Kind::I);
        b.fill(16, 1, Kind::O);
        b.fill_row(17, Kind::T);
        b.fill(18, 2, Kind::S);
        b.fill_row(19, Kind::T);
        assert_eq!(b.clear_full_rows_and_compact(), 2);
        assert_eq!(b.get(19, 2), Some(Cell::Filled(Kind::S)));
        assert_eq!(b.get(18, 1), Some(Cell::Filled(Kind::O)));
        assert_eq!(b.get(17, 0), Some(Cell::Filled(Kind::I)));
        assert_eq!(b.cells().filter(|(_, _, c)| !c.is_empty()).count(), 3);
    }

    #[test]
    fn partial_rows_stay() {
        let mut b = Board::new();
        b.fill_row(19, Kind::Z);
        b.rows[19][4] = Cell::Empty;
        let before = b.clone();
        assert_eq!(b.clear_full_rows_and_compact(), 0);
        assert_eq!(b, before);
    }
}

//! Piece catalog: the seven tetromino kinds, their shape templates, and the falling piece.

/// Largest bounding box side of any template (the I piece).
pub const MAX_SHAPE: usize = 4;

/// Tetromino kinds (I, O, T, S, Z, J, L).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

/// Template rows per kind; `1` is an occupied cell. Row 0 is the top of the box.
const TEMPLATES: [(usize, [[u8; MAX_SHAPE]; MAX_SHAPE]); 7] = [
    (4, [[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]]),
    (2, [[1, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
    (3, [[0, 1, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
    (3, [[0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
    (3, [[1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
    (3, [[1, 0, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
    (3, [[0, 0, 1, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
];

impl Kind {
    pub const ALL: [Self; 7] = [Self::I, Self::O, Self::T, Self::S, Self::Z, Self::J, Self::L];

    /// Stable 1..=7 id (0 is reserved for an empty cell by renderers that need a number).
    pub fn index(self) -> u8 {
        match self {
            Self::I => 1,
            Self::O => 2,
            Self::T => 3,
            Self::S => 4,
            Self::Z => 5,
            Self::J => 6,
            Self::L => 7,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Self::I => 'I',
            Self::O => 'O',
            Self::T => 'T',
            Self::S => 'S',
            Self::Z => 'Z',
            Self::J => 'J',
            Self::L => 'L',
        }
    }

    /// Fresh copy of the canonical occupancy matrix for this kind.
    pub fn shape(self) -> Shape {
        let (size, rows) = TEMPLATES[(self.index() - 1) as usize];
        let mut cells = [[false; MAX_SHAPE]; MAX_SHAPE];
        for (r, row) in rows.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                cells[r][c] = v != 0;
            }
        }
        Shape { size, cells }
    }
}

/// Square occupancy matrix of side `size` (2, 3 or 4). Cells outside `size` are always empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    size: usize,
    cells: [[bool; MAX_SHAPE]; MAX_SHAPE],
}

impl Shape {
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.cells[row][col]
    }

    /// Occupied (row, col) pairs inside the bounding box, row-major.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.size)
            .flat_map(move |r| (0..self.size).map(move |c| (r, c)))
            .filter(|&(r, c)| self.cells[r][c])
    }

    /// 90° clockwise turn inside the same box: `rotated[i][j] = shape[n-1-j][i]`.
    pub fn rotated_cw(&self) -> Self {
        let n = self.size;
        let mut cells = [[false; MAX_SHAPE]; MAX_SHAPE];
        for (i, row) in cells.iter_mut().enumerate().take(n) {
            for (j, cell) in row.iter_mut().enumerate().take(n) {
                *cell = self.cells[n - 1 - j][i];
            }
        }
        Self { size: n, cells }
    }
}

/// The falling piece: kind, its own shape copy, and the board offset of the shape's top-left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePiece {
    pub kind: Kind,
    pub shape: Shape,
    pub row: i32,
    pub col: i32,
}

impl ActivePiece {
    /// New piece at row 0, horizontally centred on a board `board_width` columns wide.
    pub fn spawn(kind: Kind, board_width: usize) -> Self {
        let shape = kind.shape();
        let col = (board_width.saturating_sub(shape.size()) / 2) as i32;
        Self {
            kind,
            shape,
            row: 0,
            col,
        }
    }

    /// Board coordinates (row, col) covered by the piece. May be out of bounds when invalid.
    pub fn footprint(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .occupied()
            .map(|(r, c)| (self.row + r as i32, self.col + c as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_template_has_four_cells() {
        for kind in Kind::ALL {
            assert_eq!(kind.shape().occupied().count(), 4, "{kind:?}");
        }
    }

    #[test]
    fn template_sizes() {
        assert_eq!(Kind::I.shape().size(), 4);
        assert_eq!(Kind::O.shape().size(), 2);
        for kind in [Kind::T, Kind::S, Kind::Z, Kind::J, Kind::L] {
            assert_eq!(kind.shape().size(), 3);
        }
    }

    #[test]
    fn index_is_one_based_and_unique() {
        let mut seen: Vec<u8> = Kind::ALL.iter().map(|k| k.index()).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn rotating_t_points_right() {
        // 010/111/000 -> 010/011/010
        let r = Kind::T.shape().rotated_cw();
        let cells: Vec<_> = r.occupied().collect();
        assert_eq!(cells, vec![(0, 1), (1, 1), (1, 2), (2, 1)]);
    }

    #[test]
    fn four_turns_restore_every_shape() {
        for kind in Kind::ALL {
            let s = kind.shape();
            assert_eq!(s.rotated_cw().rotated_cw().rotated_cw().rotated_cw(), s);
        }
    }

    #[test]
    fn spawn_is_centred() {
        assert_eq!(ActivePiece::spawn(Kind::O, 10).col, 4);
        assert_eq!(ActivePiece::spawn(Kind::I, 10).col, 3);
        assert_eq!(ActivePiece::spawn(Kind::T, 10).col, 3);
        assert_eq!(ActivePiece::spawn(Kind::T, 10).row, 0);
    }
}

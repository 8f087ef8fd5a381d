//! Active-piece controller: moves, rotates and drops the falling piece against the board.
//!
//! Every operation either commits a new placement and reports the cells to repaint, or leaves
//! the piece exactly as it was. Locking and what follows it belong to the session.

use crate::board::{Board, HEIGHT, WIDTH};
use crate::event::Redraw;
use crate::piece::{ActivePiece, Kind};

/// Column nudges tried, in order, when a rotation does not fit where the piece is.
const KICKS: [i32; 4] = [-1, -2, 1, 2];

/// Outcome of a one-row fall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fall {
    Moved(Redraw),
    /// Blocked below; the piece must lock.
    Landed,
}

#[derive(Debug, Clone)]
pub struct Controller {
    piece: ActivePiece,
}

impl Controller {
    pub fn new(piece: ActivePiece) -> Self {
        Self { piece }
    }

    #[inline]
    pub fn piece(&self) -> &ActivePiece {
        &self.piece
    }

    pub fn into_piece(self) -> ActivePiece {
        self.piece
    }

    /// Whether the piece fits where it currently is.
    pub fn fits(&self, board: &Board) -> bool {
        board.is_valid_placement(self.piece.row, self.piece.col, &self.piece.shape)
    }

    /// Shift one column left (`-1`) or right (`+1`).
    pub fn move_horizontal(&mut self, board: &Board, dir: i32) -> Option<Redraw> {
        let p = &self.piece;
        if !board.is_valid_placement(p.row, p.col + dir, &p.shape) {
            return None;
        }
        let next = ActivePiece {
            col: p.col + dir,
            ..p.clone()
        };
        Some(self.commit(next))
    }

    pub fn move_down(&mut self, board: &Board) -> Fall {
        let p = &self.piece;
        if !board.is_valid_placement(p.row + 1, p.col, &p.shape) {
            return Fall::Landed;
        }
        let next = ActivePiece {
            row: p.row + 1,
            ..p.clone()
        };
        Fall::Moved(self.commit(next))
    }

    /// Turn 90° clockwise, nudging up to two columns either way if needed.
    /// The O piece never turns. If nothing fits the piece is left untouched.
    pub fn rotate_clockwise(&mut self, board: &Board) -> Option<Redraw> {
        let p = &self.piece;
        if p.kind == Kind::O {
            return None;
        }
        let rotated = p.shape.rotated_cw();
        let col = std::iter::once(0)
            .chain(KICKS)
            .map(|dx| p.col + dx)
            .find(|&c| board.is_valid_placement(p.row, c, &rotated))?;
        if col != p.col {
            log::trace!("{:?} rotation kicked {} -> {}", p.kind, p.col, col);
        }
        let next = ActivePiece {
            shape: rotated,
            col,
            ..p.clone()
        };
        Some(self.commit(next))
    }

    /// Slide straight down to the resting row. Returns the repaint if it moved at all;
    /// the caller locks the piece afterwards either way.
    pub fn hard_drop(&mut self, board: &Board) -> Option<Redraw> {
        let p = &self.piece;
        let mut row = p.row;
        while board.is_valid_placement(row + 1, p.col, &p.shape) {
            row += 1;
        }
        if row == p.row {
            return None;
        }
        let next = ActivePiece { row, ..p.clone() };
        Some(self.commit(next))
    }

    /// Cells covered by the piece that lie on the board, with its kind.
    pub fn painted(&self) -> Vec<(usize, usize, Kind)> {
        on_board(&self.piece)
            .map(|(r, c)| (r, c, self.piece.kind))
            .collect()
    }

    fn commit(&mut self, next: ActivePiece) -> Redraw {
        let cleared = on_board(&self.piece).collect();
        self.piece = next;
        Redraw {
            cleared,
            painted: self.painted(),
        }
    }
}

fn on_board(piece: &ActivePiece) -> impl Iterator<Item = (usize, usize)> + '_ {
    piece
        .footprint()
        .filter(|&(r, c)| r >= 0 && c >= 0)
        .map(|(r, c)| (r as usize, c as usize))
        .filter(|&(r, c)| r < HEIGHT && c < WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(kind: Kind, row: i32, col: i32) -> Controller {
        let mut p = ActivePiece::spawn(kind, WIDTH);
        p.row = row;
        p.col = col;
        Controller::new(p)
    }

    #[test]
    fn moves_until_wall() {
        let b = Board::new();
        let mut c = at(Kind::O, 0, 4);
        for _ in 0..4 {
            assert!(c.move_horizontal(&b, -1).is_some());
        }
        assert_eq!(c.piece().col, 0);
        assert!(c.move_horizontal(&b, -1).is_none());
        assert_eq!(c.piece().col, 0);
    }

    #[test]
    fn redraw_lists_old_and_new_cells() {
        let b = Board::new();
        let mut c = at(Kind::O, 0, 4);
        let r = c.move_horizontal(&b, 1).unwrap();
        let mut cleared = r.cleared.clone();
        cleared.sort_unstable();
        assert_eq!(cleared, vec![(0, 4), (0, 5), (1, 4), (1, 5)]);
        let mut painted: Vec<_> = r.painted.iter().map(|&(r, c, _)| (r, c)).collect();
        painted.sort_unstable();
        assert_eq!(painted, vec![(0, 5), (0, 6), (1, 5), (1, 6)]);
        assert!(r.painted.iter().all(|&(_, _, k)| k == Kind::O));
    }

    #[test]
    fn lands_on_floor() {
        let b = Board::new();
        let mut c = at(Kind::O, 0, 4);
        let mut falls = 0;
        while let Fall::Moved(_) = c.move_down(&b) {
            falls += 1;
        }
        assert_eq!(falls, HEIGHT - 2);
        assert_eq!(c.piece().row, HEIGHT as i32 - 2);
    }

    #[test]
    fn o_never_rotates() {
        let b = Board::new();
        let mut c = at(Kind::O, 5, 4);
        assert!(c.rotate_clockwise(&b).is_none());
        assert_eq!(c.piece().shape, Kind::O.shape());
    }

    #[test]
    fn four_rotations_in_open_space_round_trip() {
        let b = Board::new();
        for kind in Kind::ALL {
            let mut c = at(kind, 8, 3);
            let start = c.piece().clone();
            for _ in 0..4 {
                c.rotate_clockwise(&b);
            }
            assert_eq!(c.piece(), &start, "{kind:?}");
        }
    }

    #[test]
    fn rotation_at_right_wall_kicks_left() {
        let b = Board::new();
        // vertical I in the last column: box col 7, filled column 2 of the box
        let mut c = at(Kind::I, 5, 3);
        c.rotate_clockwise(&b).unwrap();
        while c.move_horizontal(&b, 1).is_some() {}
        assert_eq!(c.piece().col, 7);
        // flat again would need columns 7..=10
        c.rotate_clockwise(&b).unwrap();
        assert_eq!(c.piece().col, 6);
        assert_eq!(c.piece().row, 5);
    }

    #[test]
    fn kick_prefers_left() {
        let mut b = Board::new();
        // T at (6, 3) pointing up; turned it would cover (6, 4), (7, 4), (7, 5), (8, 4)
        // block (8, 4) so only a nudge works; both -1 and +1 would fit
        b.fill(8, 4, Kind::Z);
        let mut c = at(Kind::T, 6, 3);
        assert!(c.fits(&b));
        c.rotate_clockwise(&b).unwrap();
        assert_eq!(c.piece().col, 2);
    }

    #[test]
    fn second_left_nudge_beats_right_nudge() {
        let mut b = Board::new();
        // turned T at col c covers (6, c+1), (7, c+1), (7, c+2), (8, c+1)
        // (8, 4) rules out c = 3, (8, 3) rules out c = 2; c = 1 and c = 4 both fit
        b.fill(8, 4, Kind::Z);
        b.fill(8, 3, Kind::Z);
        let mut c = at(Kind::T, 6, 3);
        assert!(c.fits(&b));
        assert!(b.is_valid_placement(6, 4, &Kind::T.shape().rotated_cw()));
        c.rotate_clockwise(&b).unwrap();
        assert_eq!(c.piece().col, 1);
        assert_eq!(c.piece().row, 6);
    }

    #[test]
    fn blocked_rotation_changes_nothing() {
        let mut b = Board::new();
        // a vertical I in a one-wide well cannot lie flat anywhere within two columns
        for r in 0..HEIGHT {
            for col in 0..WIDTH {
                if col != 5 {
                    b.fill(r, col, Kind::L);
                }
            }
        }
        let mut c = at(Kind::I, 5, 3);
        c.piece.shape = Kind::I.shape().rotated_cw();
        assert!(c.fits(&b));
        let before = c.piece().clone();
        assert!(c.rotate_clockwise(&b).is_none());
        assert_eq!(c.piece(), &before);
    }

    #[test]
    fn hard_drop_rests_on_stack() {
        let mut b = Board::new();
        b.fill(HEIGHT - 1, 4, Kind::S);
        let mut c = at(Kind::O, 0, 4);
        assert!(c.hard_drop(&b).is_some());
        assert_eq!(c.piece().row, HEIGHT as i32 - 3);
        assert!(c.hard_drop(&b).is_none());
        assert_eq!(c.move_down(&b), Fall::Landed);
    }
}

//! Active piece ("Cosmono") - position, rotation state and movement
//!
//! A piece keeps its own copy of the shape offsets and rotates them in place,
//! so the offsets always describe the current rotation state. Rotation
//! resolves collisions through the kick tables in [`crate::pieces`].

use crate::board::Board;
use crate::pieces::{kick_translations, shape, spawn_row_offset, KickFamily, Offset, PieceShape};
use crate::types::{RotateDirection, Rotation, ShapeKind, BUFFER_ROWS, SPAWN_COLUMN};

/// A piece on (or above) the board
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cosmono {
    shape: &'static PieceShape,
    rotation: Rotation,
    offsets: [Offset; 4],
    /// Column of the reference cell
    pub x: i8,
    /// Row of the reference cell
    pub y: i8,
    /// Preview copy; never collides when rotating and is never placed
    pub is_ghost: bool,
    /// No further movement is accepted
    pub is_frozen: bool,
    /// Resting on something as of the last check
    pub is_grounded: bool,
    /// Has touched the ground at least once
    pub has_grounded: bool,
    pub last_move_was_rotation: bool,
    pub last_rotation_was_kick: bool,
}

impl Cosmono {
    /// Create a piece in spawn orientation with its reference cell at (x, y)
    pub fn new(kind: ShapeKind, x: i8, y: i8) -> Self {
        let shape = shape(kind);
        Self {
            shape,
            rotation: Rotation::North,
            offsets: shape.offsets,
            x,
            y,
            is_ghost: false,
            is_frozen: false,
            is_grounded: false,
            has_grounded: false,
            last_move_was_rotation: false,
            last_rotation_was_kick: false,
        }
    }

    /// Create a piece at its spawn position (before any I/O nudge)
    pub fn spawn(kind: ShapeKind) -> Self {
        Self::new(kind, SPAWN_COLUMN, BUFFER_ROWS as i8 + spawn_row_offset(kind))
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Offsets for the current rotation state
    pub fn offsets(&self) -> [Offset; 4] {
        self.offsets
    }

    /// Absolute board cells of the four parts
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.offsets.map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Absolute cell of the reference part
    pub fn reference_cell(&self) -> (i8, i8) {
        let (dx, dy) = self.offsets[0];
        (self.x + dx, self.y + dy)
    }

    /// Check if all parts are at free, in-bounds cells
    pub fn fits(&self, board: &Board) -> bool {
        board.fits(&self.cells())
    }

    /// Check if the piece could be translated by (dx, dy)
    pub fn can_move(&self, board: &Board, dx: i8, dy: i8) -> bool {
        self.offsets
            .iter()
            .all(|&(ox, oy)| board.is_free(self.x + ox + dx, self.y + oy + dy))
    }

    /// Translate if the target cells are free. A successful move ends any
    /// rotation streak.
    pub fn try_move(&mut self, board: &Board, dx: i8, dy: i8) -> bool {
        if self.is_frozen || !self.can_move(board, dx, dy) {
            return false;
        }
        self.x += dx;
        self.y += dy;
        self.last_move_was_rotation = false;
        true
    }

    /// Nothing free directly below
    pub fn is_resting(&self, board: &Board) -> bool {
        !self.can_move(board, 0, 1)
    }

    /// Rows the piece can fall before resting
    pub fn drop_distance(&self, board: &Board) -> i8 {
        let mut distance = 0;
        while self.can_move(board, 0, distance + 1) {
            distance += 1;
        }
        distance
    }

    /// Ghost copy dropped to the resting row
    pub fn ghost(&self, board: &Board) -> Cosmono {
        Cosmono {
            y: self.y + self.drop_distance(board),
            is_ghost: true,
            is_frozen: false,
            is_grounded: true,
            has_grounded: true,
            last_move_was_rotation: false,
            last_rotation_was_kick: false,
            ..*self
        }
    }

    /// Pivot in doubled coordinates so that the I/O half-cell pivot stays
    /// integral.
    fn pivot2(&self) -> (i8, i8) {
        if self.kind().rotates_between_cells() {
            (1, 1)
        } else {
            let (px, py) = self.offsets[0];
            (px * 2, py * 2)
        }
    }

    /// Rotate 90° in `direction`, resolving collisions with the kick table.
    ///
    /// Kick candidates are tried in table order and the first one that fits
    /// wins. If none fits, offsets, position and rotation state are restored.
    /// Returns whether the rotation state changed.
    pub fn rotate(&mut self, board: &Board, direction: RotateDirection) -> bool {
        if self.is_frozen {
            return false;
        }

        let saved_offsets = self.offsets;
        let saved_rotation = self.rotation;
        let (saved_x, saved_y) = (self.x, self.y);

        let pivot2 = self.pivot2();
        for offset in &mut self.offsets {
            *offset = rotate_offset(*offset, pivot2, direction);
        }
        self.rotation = direction.apply(saved_rotation);

        if self.is_ghost {
            return true;
        }

        if self.fits(board) {
            self.last_move_was_rotation = true;
            self.last_rotation_was_kick = false;
            return true;
        }

        let family = KickFamily::from(self.kind());
        for (dx, dy) in kick_translations(family, saved_rotation, direction) {
            self.x = saved_x + dx;
            self.y = saved_y + dy;
            if self.fits(board) {
                self.last_move_was_rotation = true;
                self.last_rotation_was_kick = true;
                return true;
            }
        }

        self.offsets = saved_offsets;
        self.rotation = saved_rotation;
        self.x = saved_x;
        self.y = saved_y;
        false
    }
}

/// Rotate one offset a quarter turn about a doubled pivot.
///
/// Clockwise maps a relative `(x, y)` to `(-y, x)`, counter-clockwise to
/// `(y, -x)`.
fn rotate_offset(offset: Offset, pivot2: (i8, i8), direction: RotateDirection) -> Offset {
    let rel = (offset.0 * 2 - pivot2.0, offset.1 * 2 - pivot2.1);
    let turned = match direction {
        RotateDirection::Right => (-rel.1, rel.0),
        RotateDirection::Left => (rel.1, -rel.0),
    };
    ((pivot2.0 + turned.0) / 2, (pivot2.1 + turned.1) / 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellKind;

    #[test]
    fn test_spawn_positions() {
        let t = Cosmono::spawn(ShapeKind::T);
        assert_eq!((t.x, t.y), (4, 2));

        let i = Cosmono::spawn(ShapeKind::I);
        assert_eq!((i.x, i.y), (4, 0));

        let o = Cosmono::spawn(ShapeKind::O);
        assert_eq!((o.x, o.y), (4, 0));
    }

    #[test]
    fn test_t_rotates_about_center() {
        let board = Board::new();
        let mut t = Cosmono::new(ShapeKind::T, 4, 10);

        assert!(t.rotate(&board, RotateDirection::Right));
        assert_eq!(t.rotation(), Rotation::East);
        assert_eq!(t.offsets(), [(0, 0), (0, -1), (0, 1), (1, 0)]);
        assert!(!t.last_rotation_was_kick);
        assert!(t.last_move_was_rotation);
    }

    #[test]
    fn test_i_rotates_about_half_cell() {
        let board = Board::new();
        let mut i = Cosmono::new(ShapeKind::I, 4, 10);

        assert!(i.rotate(&board, RotateDirection::Right));
        assert_eq!(i.offsets(), [(1, 0), (1, -1), (1, 1), (1, 2)]);

        assert!(i.rotate(&board, RotateDirection::Left));
        assert_eq!(i.offsets(), shape(ShapeKind::I).offsets);
    }

    #[test]
    fn test_o_rotation_keeps_cells() {
        let board = Board::new();
        let mut o = Cosmono::new(ShapeKind::O, 4, 10);
        let before: std::collections::BTreeSet<_> = o.cells().into_iter().collect();

        assert!(o.rotate(&board, RotateDirection::Left));
        let after: std::collections::BTreeSet<_> = o.cells().into_iter().collect();
        assert_eq!(before, after);
        assert_eq!(o.rotation(), Rotation::West);
    }

    #[test]
    fn test_wall_kick_off_left_wall() {
        let board = Board::new();
        // Vertical T against the left wall, nub pointing right.
        let mut t = Cosmono::new(ShapeKind::T, 0, 10);
        assert!(t.rotate(&board, RotateDirection::Right));
        assert_eq!(t.x, 0);

        // Turning to South needs column -1; the first kick moves right.
        assert!(t.rotate(&board, RotateDirection::Right));
        assert_eq!(t.rotation(), Rotation::South);
        assert!(t.last_rotation_was_kick);
        assert_eq!(t.x, 1);
    }

    #[test]
    fn test_failed_rotation_restores_state() {
        let mut board = Board::new();
        // Box the T in completely.
        for y in 8..13 {
            for x in 2..7 {
                board.set(x, y, Some(CellKind::Garbage));
            }
        }
        let mut t = Cosmono::new(ShapeKind::T, 4, 10);
        for (x, y) in t.cells() {
            board.set(x, y, None);
        }
        let before = t;

        assert!(!t.rotate(&board, RotateDirection::Right));
        assert_eq!(t, before);
    }

    #[test]
    fn test_ghost_rotation_skips_collision() {
        let mut board = Board::new();
        for x in 0..10 {
            board.set(x, 11, Some(CellKind::Garbage));
        }
        let mut ghost = Cosmono::new(ShapeKind::T, 4, 10);
        ghost.is_ghost = true;
        assert!(ghost.rotate(&board, RotateDirection::Right));
        assert_eq!((ghost.x, ghost.y), (4, 10));
    }

    #[test]
    fn test_ghost_lands_on_floor() {
        let board = Board::new();
        let piece = Cosmono::spawn(ShapeKind::T);
        let ghost = piece.ghost(&board);
        assert!(ghost.is_ghost);
        assert_eq!(ghost.y, 21);
        assert!(ghost.is_resting(&board));
    }

    #[test]
    fn test_frozen_piece_does_not_move() {
        let board = Board::new();
        let mut piece = Cosmono::spawn(ShapeKind::L);
        piece.is_frozen = true;
        assert!(!piece.try_move(&board, 1, 0));
        assert!(!piece.rotate(&board, RotateDirection::Right));
    }
}

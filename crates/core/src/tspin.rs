//! T-spin classification
//!
//! Runs after a T piece locks. The four diagonal neighbours of the T's
//! center are probed; walls and the floor count as filled. The corner set
//! rotates with the piece so "front" always means the side the nub points to.

use crate::board::Board;
use crate::piece::Cosmono;
use crate::types::{ShapeKind, TSpinKind};

/// Corners around the center for the North (nub up) orientation:
/// front-left, front-right, back-left, back-right.
const NORTH_CORNERS: [(i8, i8); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// Corner offsets for the piece's current rotation, in the same
/// front-left, front-right, back-left, back-right order.
pub fn corner_offsets(piece: &Cosmono) -> [(i8, i8); 4] {
    let turns = piece.rotation().index();
    NORTH_CORNERS.map(|mut c| {
        for _ in 0..turns {
            c = (-c.1, c.0);
        }
        c
    })
}

/// Which corners are blocked, in [`corner_offsets`] order
pub fn corner_occupancy(board: &Board, piece: &Cosmono) -> [bool; 4] {
    let (cx, cy) = piece.reference_cell();
    corner_offsets(piece).map(|(dx, dy)| board.is_blocked(cx + dx, cy + dy))
}

/// Classify a lock.
///
/// - three or more corners blocked and the last move was a rotation: full
///   T-spin, graded by lines cleared
/// - exactly the two back corners blocked, reached by a kicked rotation:
///   mini T-spin (no lines or a single)
/// - anything else: `TSpinKind::None`
pub fn classify(board: &Board, piece: &Cosmono, cleared_lines: u8) -> TSpinKind {
    if piece.kind() != ShapeKind::T || !piece.last_move_was_rotation {
        return TSpinKind::None;
    }

    let corners = corner_occupancy(board, piece);
    let blocked = corners.iter().filter(|&&c| c).count();

    if blocked >= 3 {
        return match cleared_lines {
            0 => TSpinKind::Zero,
            1 => TSpinKind::Single,
            2 => TSpinKind::Double,
            _ => TSpinKind::Triple,
        };
    }

    let [front_left, front_right, back_left, back_right] = corners;
    let mini_pattern = !front_left && !front_right && back_left && back_right;
    if blocked == 2 && mini_pattern && piece.last_rotation_was_kick {
        return match cleared_lines {
            0 => TSpinKind::MiniZero,
            1 => TSpinKind::MiniSingle,
            _ => TSpinKind::None,
        };
    }

    TSpinKind::None
}

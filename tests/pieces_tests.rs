//! Piece tests - shapes, rotation and wall kicks

use cosmono::core::pieces::{kick_translations, shape, KickFamily};
use cosmono::core::{Board, Cosmono};
use cosmono::types::{CellKind, RotateDirection, Rotation, ShapeKind};

// ============== Shape Tests ==============

#[test]
fn test_every_shape_has_four_distinct_parts() {
    for kind in ShapeKind::ALL {
        let offsets = shape(kind).offsets;
        assert_eq!(offsets[0], (0, 0));
        for i in 0..4 {
            for j in (i + 1)..4 {
                assert_ne!(offsets[i], offsets[j], "{:?} repeats a part", kind);
            }
        }
    }
}

// ============== Rotation Tests ==============

#[test]
fn test_four_turns_restore_piece() {
    let board = Board::new();
    for kind in ShapeKind::ALL {
        for direction in [RotateDirection::Right, RotateDirection::Left] {
            let mut piece = Cosmono::new(kind, 4, 10);
            let start = piece.offsets();
            for _ in 0..4 {
                assert!(piece.rotate(&board, direction));
            }
            assert_eq!(piece.rotation(), Rotation::North);
            assert_eq!(piece.offsets(), start, "{:?} {:?}", kind, direction);
            assert_eq!((piece.x, piece.y), (4, 10));
        }
    }
}

#[test]
fn test_right_then_left_is_identity() {
    let board = Board::new();
    for kind in ShapeKind::ALL {
        let mut piece = Cosmono::new(kind, 4, 10);
        let start = piece.cells();
        piece.rotate(&board, RotateDirection::Right);
        piece.rotate(&board, RotateDirection::Left);
        assert_eq!(piece.cells(), start);
    }
}

#[test]
fn test_s_piece_east() {
    let board = Board::new();
    let mut s = Cosmono::new(ShapeKind::S, 4, 10);
    assert!(s.rotate(&board, RotateDirection::Right));
    assert_eq!(s.offsets(), [(0, 0), (0, -1), (1, 0), (1, 1)]);
}

// ============== Wall Kick Tests ==============

#[test]
fn test_kick_order_for_right_turns() {
    let kicks: Vec<_> = kick_translations(KickFamily::Jlszt, Rotation::North, RotateDirection::Right)
        .collect();
    // Stored y-up; rows grow downward on the board.
    assert_eq!(kicks, vec![(-1, 0), (-1, -1), (0, 2), (-1, 2)]);
}

#[test]
fn test_o_never_kicks() {
    for rotation in [Rotation::North, Rotation::East, Rotation::South, Rotation::West] {
        assert_eq!(
            kick_translations(KickFamily::O, rotation, RotateDirection::Left).count(),
            0
        );
    }
}

#[test]
fn test_i_kicks_off_right_wall() {
    let board = Board::new();
    let mut i = Cosmono::new(ShapeKind::I, 4, 10);
    assert!(i.rotate(&board, RotateDirection::Right));
    // Vertical I hugging the right wall.
    while i.try_move(&board, 1, 0) {}

    assert_eq!((i.x, i.y), (8, 10));

    assert!(i.rotate(&board, RotateDirection::Right));
    assert_eq!(i.rotation(), Rotation::South);
    assert!(i.last_rotation_was_kick);
    // East -> South first candidate: one column left.
    assert_eq!((i.x, i.y), (7, 10));
    assert_eq!(i.cells(), [(8, 11), (9, 11), (7, 11), (6, 11)]);
    assert!(i.fits(&board));
}

#[test]
fn test_left_turn_kicks_mirror_column() {
    let mut board = Board::new();
    let mut t = Cosmono::new(ShapeKind::T, 4, 10);
    // Block the in-place West position's lower part.
    board.set(4, 11, Some(CellKind::Garbage));

    assert!(t.rotate(&board, RotateDirection::Left));
    assert_eq!(t.rotation(), Rotation::West);
    assert!(t.last_rotation_was_kick);
    // A right turn would have shifted left; the left turn shifts right.
    assert_eq!((t.x, t.y), (5, 10));
}

#[test]
fn test_left_turn_kick_rows_keep_sign() {
    let mut board = Board::new();
    let mut t = Cosmono::new(ShapeKind::T, 4, 10);
    board.set(4, 11, Some(CellKind::Garbage));
    board.set(5, 11, Some(CellKind::Garbage));

    // First two candidates hit (4,11) or (5,11); the third lifts two rows.
    assert!(t.rotate(&board, RotateDirection::Left));
    assert_eq!(t.rotation(), Rotation::West);
    assert_eq!((t.x, t.y), (4, 8));
    assert_eq!(t.cells(), [(4, 8), (4, 9), (4, 7), (3, 8)]);
}

#[test]
fn test_rotation_uses_first_fitting_kick() {
    let mut board = Board::new();
    let mut t = Cosmono::new(ShapeKind::T, 4, 10);
    // Block the in-place East position's lower part.
    board.set(4, 11, Some(CellKind::Garbage));

    assert!(t.rotate(&board, RotateDirection::Right));
    assert_eq!(t.rotation(), Rotation::East);
    assert!(t.last_rotation_was_kick);
    // First candidate shifts one column left.
    assert_eq!((t.x, t.y), (3, 10));
}

#[test]
fn test_blocked_rotation_changes_nothing() {
    let mut board = Board::new();
    for y in 0..22 {
        for x in 0..10 {
            board.set(x, y, Some(CellKind::Garbage));
        }
    }
    let mut t = Cosmono::new(ShapeKind::T, 4, 10);
    for (x, y) in t.cells() {
        board.set(x, y, None);
    }
    let before = t;
    assert!(!t.rotate(&board, RotateDirection::Left));
    assert_eq!(t, before);
}

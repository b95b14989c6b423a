//! Pieces module - Cosmono shape catalog and rotation kick tables
//!
//! Shapes are stored once as four offsets around a reference cell; rotation
//! state is applied by rotating those offsets (see [`crate::piece`]), so the
//! catalog only describes the spawn orientation.
//!
//! Offsets are `(dx, dy)` with `dy` growing downward, matching board rows.

use crate::types::{RotateDirection, Rotation, ShapeKind};

/// Offset of a single part relative to the piece position
pub type Offset = (i8, i8);

/// Immutable description of one shape in spawn orientation
#[derive(Debug, PartialEq, Eq)]
pub struct PieceShape {
    pub kind: ShapeKind,
    /// `offsets[0]` is the reference cell; it is the rotation pivot for
    /// every shape except I and O.
    pub offsets: [Offset; 4],
}

static SHAPES: [PieceShape; 7] = [
    PieceShape {
        kind: ShapeKind::I,
        offsets: [(0, 0), (-1, 0), (1, 0), (2, 0)],
    },
    PieceShape {
        kind: ShapeKind::O,
        offsets: [(0, 0), (1, 0), (0, 1), (1, 1)],
    },
    PieceShape {
        kind: ShapeKind::T,
        offsets: [(0, 0), (-1, 0), (1, 0), (0, -1)],
    },
    PieceShape {
        kind: ShapeKind::S,
        offsets: [(0, 0), (-1, 0), (0, -1), (1, -1)],
    },
    PieceShape {
        kind: ShapeKind::Z,
        offsets: [(0, 0), (1, 0), (0, -1), (-1, -1)],
    },
    PieceShape {
        kind: ShapeKind::J,
        offsets: [(0, 0), (-1, 0), (1, 0), (-1, -1)],
    },
    PieceShape {
        kind: ShapeKind::L,
        offsets: [(0, 0), (-1, 0), (1, 0), (1, -1)],
    },
];

/// Catalog entry for a shape
pub fn shape(kind: ShapeKind) -> &'static PieceShape {
    &SHAPES[kind.index()]
}

/// Spawn row offset relative to the first visible row.
///
/// I and O start two rows higher so they sit in the buffer like the other
/// shapes' top rows do.
pub fn spawn_row_offset(kind: ShapeKind) -> i8 {
    if kind.rotates_between_cells() {
        -2
    } else {
        0
    }
}

/// Which kick table a shape uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KickFamily {
    I,
    O,
    Jlszt,
}

impl From<ShapeKind> for KickFamily {
    fn from(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::I => KickFamily::I,
            ShapeKind::O => KickFamily::O,
            _ => KickFamily::Jlszt,
        }
    }
}

/// Kick candidates for one clockwise transition.
///
/// Values are in guideline orientation: `(kx, ky)` means `kx` columns right
/// and `ky` rows up. The untranslated attempt is not part of the list.
type KickRow = [(i8, i8); 4];

/// Indexed by the `from` rotation of the clockwise transitions
/// 0→1, 1→2, 2→3, 3→0.
static JLSZT_KICKS: [KickRow; 4] = [
    [(-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(1, 0), (1, -1), (0, 2), (1, 2)],
    [(1, 0), (1, 1), (0, -2), (1, -2)],
    [(-1, 0), (-1, -1), (0, 2), (-1, 2)],
];

static I_KICKS: [KickRow; 4] = [
    [(-2, 0), (1, 0), (-2, -1), (1, 2)],
    [(-1, 0), (2, 0), (-1, 2), (2, -1)],
    [(2, 0), (-1, 0), (2, 1), (-1, -2)],
    [(1, 0), (-2, 0), (1, -2), (-2, 1)],
];

static O_KICKS: [(i8, i8); 0] = [];

/// Look up the kick list for an exact `(from, to)` pair.
///
/// Only the clockwise transitions are tabulated. Any other pair is a
/// programming error and panics.
pub fn kick_candidates(family: KickFamily, from: Rotation, to: Rotation) -> &'static [(i8, i8)] {
    if from.rotate_cw() != to {
        panic!(
            "kick table has no entry for {} -> {}",
            from.as_str(),
            to.as_str()
        );
    }

    match family {
        KickFamily::O => &O_KICKS,
        KickFamily::I => &I_KICKS[from.index()],
        KickFamily::Jlszt => &JLSZT_KICKS[from.index()],
    }
}

/// Board-space translations to try, in table order, after a rotation from
/// `from` in `direction` collided.
///
/// Right turns read the `(from, to)` row directly. Left turns read the
/// mirrored `(to, from)` row and invert only the x component.
pub fn kick_translations(
    family: KickFamily,
    from: Rotation,
    direction: RotateDirection,
) -> impl Iterator<Item = (i8, i8)> {
    let to = direction.apply(from);
    let (row, flip_x) = match direction {
        RotateDirection::Right => (kick_candidates(family, from, to), false),
        RotateDirection::Left => (kick_candidates(family, to, from), true),
    };

    row.iter().map(move |&(kx, ky)| {
        let dx = if flip_x { -kx } else { kx };
        // Guideline y points up; board rows grow downward.
        (dx, -ky)
    })
}

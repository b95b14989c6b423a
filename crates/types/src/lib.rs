//! Shared vocabulary for the Cosmono engine.
//!
//! Everything here is plain data with no external dependencies, so the same
//! types can be handed to the simulation core, a renderer, or an input layer.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 22 rows (indexed 0-21), of which rows 0-1 are hidden buffer
//!   rows above the visible play area
//! - Rows grow downward: row 0 is the top buffer row, row 21 the floor row
//!
//! # Game Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Frame interval used by the headless driver (~60 FPS) |
//! | `SPAWN_DELAY_MS` | 500 | Grace period before gravity acts on a new piece |
//! | `LOCK_DELAY_MS` | 500 | Default time a grounded piece waits before locking |
//! | `LOCK_RESET_LIMIT` | 15 | Move/rotate resets allowed before a forced lock |
//! | `LINE_CLEAR_MS` | 500 | Per-row dissolve countdown before rows are deleted |
//!
//! # Examples
//!
//! ```
//! use cosmono_types::{Button, Rotation, ShapeKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(ShapeKind::from_str("t"), Some(ShapeKind::T));
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Button::from_name("Hard Drop"), Some(Button::HardDrop));
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 22);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Rows visible to the player
pub const VISIBLE_ROWS: u8 = 20;

/// Hidden rows stacked above the visible area
pub const BUFFER_ROWS: u8 = 2;

/// Total board height in cells (visible + buffer)
pub const BOARD_HEIGHT: u8 = VISIBLE_ROWS + BUFFER_ROWS;

/// Frame interval used by the headless driver (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Grace period after a spawn before gravity is applied
pub const SPAWN_DELAY_MS: u32 = 500;

/// Default lock delay for a grounded piece
pub const LOCK_DELAY_MS: u32 = 500;

/// Maximum number of lock timer resets per piece
pub const LOCK_RESET_LIMIT: u8 = 15;

/// Dissolve countdown assigned to every row marked for removal
pub const LINE_CLEAR_MS: u32 = 500;

/// Gravity stops speeding up past this level
pub const GRAVITY_LEVEL_CAP: u32 = 20;

/// Cleared lines needed for each level-up
pub const LINES_PER_LEVEL: u32 = 10;

/// Number of upcoming shapes exposed for preview
pub const NEXT_PREVIEW: usize = 5;

/// Column of the spawn reference cell
pub const SPAWN_COLUMN: i8 = 4;

/// Base points for clearing N lines at level 1, multiplied by the level.
///
/// - 1 line: 100
/// - 2 lines: 300
/// - 3 lines: 500
/// - 4 lines: 800
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Combo bonus per chained clear beyond the first (times level)
pub const COMBO_BASE: u32 = 50;

/// Flat back-to-back award (times level)
pub const BACK_TO_BACK_BONUS: u32 = 100;

/// Flat perfect-clear award (times level)
pub const PERFECT_CLEAR_BONUS: u32 = 1000;


/// The seven Cosmono shapes
///
/// - **I**: 4-long bar
/// - **O**: 2x2 square
/// - **T**: T-shaped
/// - **S** / **Z**: skew pair
/// - **J** / **L**: hook pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl ShapeKind {
    /// All shapes in catalog order
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::T,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::J,
        ShapeKind::L,
    ];

    /// Parse shape kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use cosmono_types::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_str("i"), Some(ShapeKind::I));
    /// assert_eq!(ShapeKind::from_str("O"), Some(ShapeKind::O));
    /// assert_eq!(ShapeKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(ShapeKind::I),
            "o" => Some(ShapeKind::O),
            "t" => Some(ShapeKind::T),
            "s" => Some(ShapeKind::S),
            "z" => Some(ShapeKind::Z),
            "j" => Some(ShapeKind::J),
            "l" => Some(ShapeKind::L),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::I => "i",
            ShapeKind::O => "o",
            ShapeKind::T => "t",
            ShapeKind::S => "s",
            ShapeKind::Z => "z",
            ShapeKind::J => "j",
            ShapeKind::L => "l",
        }
    }

    /// Position in [`ShapeKind::ALL`]
    pub fn index(&self) -> usize {
        match self {
            ShapeKind::I => 0,
            ShapeKind::O => 1,
            ShapeKind::T => 2,
            ShapeKind::S => 3,
            ShapeKind::Z => 4,
            ShapeKind::J => 5,
            ShapeKind::L => 6,
        }
    }

    /// I and O rotate about a point between cells rather than about a cell
    pub fn rotates_between_cells(&self) -> bool {
        matches!(self, ShapeKind::I | ShapeKind::O)
    }
}

/// Rotation states
///
/// - **North**: Spawn orientation (0°)
/// - **East**: Rotated 90° clockwise
/// - **South**: Rotated 180°
/// - **West**: Rotated 270° clockwise
///
/// The rotation cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use cosmono_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use cosmono_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_ccw(), Rotation::West);
    /// assert_eq!(Rotation::East.rotate_ccw(), Rotation::North);
    /// ```
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Quarter turns clockwise from North (0..=3)
    pub fn index(&self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

/// Direction of a rotation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotateDirection {
    /// Clockwise
    Right,
    /// Counter-clockwise
    Left,
}

impl RotateDirection {
    /// Rotation state reached by turning `from` in this direction
    pub fn apply(&self, from: Rotation) -> Rotation {
        match self {
            RotateDirection::Right => from.rotate_cw(),
            RotateDirection::Left => from.rotate_ccw(),
        }
    }
}

/// Discrete button-down events delivered by the input collaborator
///
/// The session never polls devices; it only consumes these named events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Shift one column left
    Left,
    /// Shift one column right
    Right,
    /// Soft drop one row
    Down,
    /// Alias of `RotateRight`
    Up,
    RotateLeft,
    RotateRight,
    /// Swap the active piece with the hold slot
    Hold,
    /// Drop to the resting row and lock immediately
    HardDrop,
}

impl Button {
    pub const ALL: [Button; 8] = [
        Button::Left,
        Button::Right,
        Button::Down,
        Button::Up,
        Button::RotateLeft,
        Button::RotateRight,
        Button::Hold,
        Button::HardDrop,
    ];

    /// Parse a named button event (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use cosmono_types::Button;
    ///
    /// assert_eq!(Button::from_name("Rotate Left"), Some(Button::RotateLeft));
    /// assert_eq!(Button::from_name("hold"), Some(Button::Hold));
    /// assert_eq!(Button::from_name("Pause"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "left" => Some(Button::Left),
            "right" => Some(Button::Right),
            "down" => Some(Button::Down),
            "up" => Some(Button::Up),
            "rotate left" => Some(Button::RotateLeft),
            "rotate right" => Some(Button::RotateRight),
            "hold" => Some(Button::Hold),
            "hard drop" => Some(Button::HardDrop),
            _ => None,
        }
    }

    /// Event name as delivered by the input collaborator
    pub fn as_str(&self) -> &'static str {
        match self {
            Button::Left => "Left",
            Button::Right => "Right",
            Button::Down => "Down",
            Button::Up => "Up",
            Button::RotateLeft => "Rotate Left",
            Button::RotateRight => "Rotate Right",
            Button::Hold => "Hold",
            Button::HardDrop => "Hard Drop",
        }
    }
}

/// T-spin classification of a lock
///
/// `Zero` and `MiniZero` both describe a spin that cleared no lines; `Zero`
/// comes from the three-corner test and `MiniZero` from the two-corner mini
/// pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TSpinKind {
    None,
    MiniZero,
    MiniSingle,
    Zero,
    Single,
    Double,
    Triple,
}

impl TSpinKind {
    pub fn is_t_spin(&self) -> bool {
        !matches!(self, TSpinKind::None)
    }

    pub fn is_mini(&self) -> bool {
        matches!(self, TSpinKind::MiniZero | TSpinKind::MiniSingle)
    }

    /// Text for the floating label, `None` when there is nothing to show
    pub fn label(&self) -> Option<&'static str> {
        match self {
            TSpinKind::None => None,
            TSpinKind::MiniZero => Some("Mini T-Spin"),
            TSpinKind::MiniSingle => Some("Mini T-Spin Single"),
            TSpinKind::Zero => Some("T-Spin"),
            TSpinKind::Single => Some("T-Spin Single"),
            TSpinKind::Double => Some("T-Spin Double"),
            TSpinKind::Triple => Some("T-Spin Triple"),
        }
    }
}

/// Visual reference carried by an occupied cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Piece(ShapeKind),
    Garbage,
}

impl CellKind {
    /// Compact numeric code: 1..=7 for shapes, 8 for garbage
    pub fn code(&self) -> u8 {
        match self {
            CellKind::Piece(kind) => kind.index() as u8 + 1,
            CellKind::Garbage => 8,
        }
    }
}

/// A cell on the board
///
/// - `None`: Empty cell
/// - `Some(CellKind)`: Occupied, with the visual reference for rendering
pub type Cell = Option<CellKind>;

use crate::piece::Cosmono;
use crate::types::{Rotation, ShapeKind, BOARD_HEIGHT, BOARD_WIDTH, NEXT_PREVIEW};

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// Built, `start` not called yet
    Ready,
    /// A piece is in play
    Playing,
    /// Rows are dissolving; the next spawn waits
    Clearing,
    /// Game over, the board is being swept row by row
    Sweeping,
    /// Sweep done; nothing else will happen
    Finished,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Ready => "ready",
            SessionPhase::Playing => "playing",
            SessionPhase::Clearing => "clearing",
            SessionPhase::Sweeping => "sweeping",
            SessionPhase::Finished => "finished",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSnapshot {
    pub kind: ShapeKind,
    pub rotation: Rotation,
    /// Absolute board cells
    pub cells: [(i8, i8); 4],
}

impl From<&Cosmono> for PieceSnapshot {
    fn from(value: &Cosmono) -> Self {
        Self {
            kind: value.kind(),
            rotation: value.rotation(),
            cells: value.cells(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TimersSnapshot {
    pub gravity_ms: u32,
    pub lock_ms: u32,
    pub spawn_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionSnapshot {
    /// 0 empty, 1..=7 shape, 8 garbage
    pub board: [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<PieceSnapshot>,
    pub ghost: Option<PieceSnapshot>,
    pub hold: Option<ShapeKind>,
    pub can_hold: bool,
    pub next: [ShapeKind; NEXT_PREVIEW],
    /// Remaining dissolve time per row, 0 for rows not clearing
    pub clearing_rows: [u32; BOARD_HEIGHT as usize],
    pub phase: SessionPhase,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub timers: TimersSnapshot,
}

impl SessionSnapshot {
    pub fn playable(&self) -> bool {
        self.phase == SessionPhase::Playing && self.active.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            ghost: None,
            hold: None,
            can_hold: true,
            next: [ShapeKind::I; NEXT_PREVIEW],
            clearing_rows: [0; BOARD_HEIGHT as usize],
            phase: SessionPhase::Ready,
            score: 0,
            level: 1,
            lines: 0,
            timers: TimersSnapshot::default(),
        }
    }
}

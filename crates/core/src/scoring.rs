//! Scoring module - score, level, combo and back-to-back bookkeeping
//!
//! Compatibility notes:
//! - A T-spin that clears lines earns both the line-clear points and the
//!   T-spin points.
//! - Back-to-back is a flat bonus, not a multiplier.
//! - Everything except the drop counters scales linearly with the level the
//!   lock happened at.

use serde::{Deserialize, Serialize};

use crate::types::{
    TSpinKind, BACK_TO_BACK_BONUS, COMBO_BASE, GRAVITY_LEVEL_CAP, LINES_PER_LEVEL, LINE_SCORES,
    PERFECT_CLEAR_BONUS,
};

/// Points awarded by a single lock, broken down by source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    pub line_points: u32,
    pub combo_points: u32,
    pub t_spin_points: u32,
    pub back_to_back_points: u32,
    pub perfect_clear_points: u32,
    pub total: u32,
    /// Level after this lock, if it changed
    pub new_level: Option<u32>,
}

/// Base points for a line clear at level 1
pub fn line_clear_points(lines: u32, level: u32) -> u32 {
    if lines == 0 || lines > 4 {
        return 0;
    }
    LINE_SCORES[lines as usize] * level
}

/// T-spin points (added on top of line-clear points)
pub fn t_spin_points(kind: TSpinKind, level: u32) -> u32 {
    let base = match kind {
        TSpinKind::None => 0,
        TSpinKind::MiniZero | TSpinKind::Zero => 100,
        TSpinKind::MiniSingle => 200,
        TSpinKind::Single => 800,
        TSpinKind::Double => 1200,
        TSpinKind::Triple => 1600,
    };
    base * level
}

/// Combo bonus for the `combo`-th consecutive clearing lock.
///
/// The first clear in a chain earns nothing; from the second on the bonus is
/// `COMBO_BASE * (combo - 1) * level`.
pub fn combo_points(combo: u32, level: u32) -> u32 {
    if combo < 2 {
        return 0;
    }
    COMBO_BASE * (combo - 1) * level
}

/// Whether this lock can earn (and continue) a back-to-back chain:
/// any T-spin that cleared lines, or a four-line clear.
pub fn qualifies_for_back_to_back(kind: TSpinKind, lines: u32) -> bool {
    lines > 0 && (kind.is_t_spin() || lines == 4)
}

/// Gravity interval in milliseconds for a level.
///
/// Seconds per row are `(0.8 - (L - 1) * 0.007) ^ (L - 1)` with `L` clamped
/// to `1..=20`, rounded to 5 decimals, then scaled by
/// `1000 / gravity_multiplier`.
pub fn gravity_interval_ms(level: u32, gravity_multiplier: f64) -> f64 {
    let l = level.clamp(1, GRAVITY_LEVEL_CAP) as f64;
    let seconds = (0.8 - (l - 1.0) * 0.007).powf(l - 1.0);
    let seconds = (seconds * 100_000.0).round() / 100_000.0;
    seconds * (1000.0 / gravity_multiplier)
}

/// Running totals for one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub lines_cleared: u32,
    pub t_spin_mini: u32,
    pub t_spin: u32,
    pub back_to_back: u32,
    pub combo: u32,
    pub soft_drop: u32,
    pub hard_drop: u32,
    pub perfect_clear: u32,
    pub score: u32,
    pub level: u32,
    pub last_was_back_to_back: bool,
    running_combo: u32,
    lines_since_level_up: u32,
}

impl ScoreState {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Fresh totals at a given starting level (at least 1)
    pub fn starting_at(level: u32) -> Self {
        Self {
            lines_cleared: 0,
            t_spin_mini: 0,
            t_spin: 0,
            back_to_back: 0,
            combo: 0,
            soft_drop: 0,
            hard_drop: 0,
            perfect_clear: 0,
            score: 0,
            level: level.max(1),
            last_was_back_to_back: false,
            running_combo: 0,
            lines_since_level_up: 0,
        }
    }

    /// Consecutive clearing locks so far (0 when the chain is broken)
    pub fn running_combo(&self) -> u32 {
        self.running_combo
    }

    /// Apply one lock. Must be called for every lock, including ones that
    /// cleared nothing, so combo and back-to-back state stay correct.
    pub fn apply_lock(&mut self, cleared: u32, t_spin: TSpinKind, perfect_clear: bool) -> ScoreResult {
        let level = self.level;
        let mut result = ScoreResult::default();

        self.lines_cleared += cleared;
        self.lines_since_level_up += cleared;

        if cleared == 0 {
            self.running_combo = 0;
        } else {
            self.running_combo += 1;
            result.combo_points = combo_points(self.running_combo, level);
            if result.combo_points > 0 {
                self.combo += 1;
            }
        }

        result.line_points = line_clear_points(cleared, level);

        result.t_spin_points = t_spin_points(t_spin, level);
        if t_spin.is_mini() {
            self.t_spin_mini += 1;
        } else if t_spin.is_t_spin() {
            self.t_spin += 1;
        }

        let qualifies = qualifies_for_back_to_back(t_spin, cleared);
        let awarded = qualifies && self.last_was_back_to_back;
        if awarded {
            result.back_to_back_points = BACK_TO_BACK_BONUS * level;
            self.back_to_back += 1;
        }
        // A T-spin clear always arms the chain; a four-line clear only keeps
        // it going.
        self.last_was_back_to_back = (t_spin.is_t_spin() && cleared > 0) || awarded;

        if perfect_clear {
            result.perfect_clear_points = PERFECT_CLEAR_BONUS * level;
            self.perfect_clear += 1;
        }

        result.total = result.line_points
            + result.combo_points
            + result.t_spin_points
            + result.back_to_back_points
            + result.perfect_clear_points;
        self.score = self.score.saturating_add(result.total);

        while self.lines_since_level_up >= LINES_PER_LEVEL {
            self.lines_since_level_up -= LINES_PER_LEVEL;
            self.level += 1;
            result.new_level = Some(self.level);
        }

        result
    }

    /// Count one soft-dropped row
    pub fn record_soft_drop(&mut self) {
        self.soft_drop += 1;
    }

    /// Count one hard drop
    pub fn record_hard_drop(&mut self) {
        self.hard_drop += 1;
    }
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::new()
    }
}

//! Collaborator interfaces - audio/visual feedback and high-score storage
//!
//! The session never touches a device or a file. It reports through
//! [`Feedback`] and persists through [`HighScoreStore`]; both are traits so a
//! front end can plug in whatever it has.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::scoring::ScoreState;

/// Visual weight of a floating label or message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelStyle {
    Normal,
    Highlight,
    Warning,
}

/// Fire-and-forget feedback sink. Every method defaults to a no-op.
pub trait Feedback {
    fn play_sound(&mut self, _name: &str) {}

    fn play_music(&mut self, _name: &str) {}

    fn show_floating_label(&mut self, _text: &str, _style: LabelStyle) {}

    fn show_message(&mut self, _text: &str, _style: LabelStyle, _duration_ms: u32) {}
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullFeedback;

impl Feedback for NullFeedback {}

/// One recorded feedback call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackCall {
    Sound(String),
    Music(String),
    Label(String, LabelStyle),
    Message(String, LabelStyle, u32),
}

/// Keeps every call, in order
#[derive(Debug, Default, Clone)]
pub struct RecordingFeedback {
    pub calls: Vec<FeedbackCall>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels shown so far
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.calls.iter().filter_map(|c| match c {
            FeedbackCall::Label(text, _) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Sounds played so far
    pub fn sounds(&self) -> impl Iterator<Item = &str> {
        self.calls.iter().filter_map(|c| match c {
            FeedbackCall::Sound(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

impl Feedback for RecordingFeedback {
    fn play_sound(&mut self, name: &str) {
        self.calls.push(FeedbackCall::Sound(name.to_string()));
    }

    fn play_music(&mut self, name: &str) {
        self.calls.push(FeedbackCall::Music(name.to_string()));
    }

    fn show_floating_label(&mut self, text: &str, style: LabelStyle) {
        self.calls.push(FeedbackCall::Label(text.to_string(), style));
    }

    fn show_message(&mut self, text: &str, style: LabelStyle, duration_ms: u32) {
        self.calls
            .push(FeedbackCall::Message(text.to_string(), style, duration_ms));
    }
}

/// Persisted record for one game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScore {
    pub lines_cleared: u32,
    pub t_spin_mini: u32,
    pub t_spin: u32,
    pub back_to_back: u32,
    pub combo: u32,
    pub soft_drop: u32,
    pub hard_drop: u32,
    pub perfect_clear: u32,
    pub score_value: u32,
    pub level: u32,
}

impl From<&ScoreState> for HighScore {
    fn from(s: &ScoreState) -> Self {
        Self {
            lines_cleared: s.lines_cleared,
            t_spin_mini: s.t_spin_mini,
            t_spin: s.t_spin,
            back_to_back: s.back_to_back,
            combo: s.combo,
            soft_drop: s.soft_drop,
            hard_drop: s.hard_drop,
            perfect_clear: s.perfect_clear,
            score_value: s.score,
            level: s.level,
        }
    }
}

/// High-score persistence keyed by game-mode name
pub trait HighScoreStore {
    fn load(&self, mode: &str) -> Option<HighScore>;

    fn store(&mut self, mode: &str, record: HighScore);
}

/// In-process store, mostly for tests and the simulator
#[derive(Debug, Default, Clone)]
pub struct MemoryHighScores {
    records: HashMap<String, HighScore>,
}

impl MemoryHighScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl HighScoreStore for MemoryHighScores {
    fn load(&self, mode: &str) -> Option<HighScore> {
        self.records.get(mode).copied()
    }

    fn store(&mut self, mode: &str, record: HighScore) {
        self.records.insert(mode.to_string(), record);
    }
}

/// Store `record` under `mode` only if it beats the stored score.
/// Returns whether it was written.
pub fn record_high_score(store: &mut dyn HighScoreStore, mode: &str, record: HighScore) -> bool {
    match store.load(mode) {
        Some(existing) if existing.score_value >= record.score_value => false,
        _ => {
            store.store(mode, record);
            true
        }
    }
}

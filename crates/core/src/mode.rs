//! Game modes - win/finish rules and mode-specific pressure
//!
//! A mode is consulted at three points: once when the session starts, after
//! every batch of removed rows, and every tick while a piece is in play. It
//! answers with a [`ModeVerdict`] and never touches the board itself; the
//! session carries the verdict out.

use crate::rng::RandomSource;
use crate::scoring::ScoreState;
use crate::services::{Feedback, LabelStyle};

/// Lines needed to finish "40 Lines"
pub const FORTY_LINE_TARGET: u32 = 40;

/// Length of a "Time Attack" run
pub const TIME_ATTACK_LIMIT_MS: u32 = 120_000;

/// How often the punisher rolls
pub const PUNISH_INTERVAL_MS: u32 = 10_000;

const PUNISH_BASE_CHANCE: f32 = 0.25;
const PUNISH_CHANCE_PER_LEVEL: f32 = 0.05;
const PUNISH_MAX_CHANCE: f32 = 0.9;

/// How long the intro message stays up
const INTRO_MESSAGE_MS: u32 = 2000;

/// What the session should do after consulting the mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeVerdict {
    Continue,
    /// Goal reached; the session ends as a win
    Won,
    /// Time limit reached; the session ends without losing
    TimeUp,
    /// Inject this many garbage rows
    Garbage(u8),
}

/// Mode selector without runtime state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameModeKind {
    Survival,
    FortyLine,
    TimeAttack,
    Punisher,
}

impl GameModeKind {
    pub const ALL: [GameModeKind; 4] = [
        GameModeKind::Survival,
        GameModeKind::FortyLine,
        GameModeKind::TimeAttack,
        GameModeKind::Punisher,
    ];

    /// Display name, also used as the high-score key
    pub fn name(&self) -> &'static str {
        match self {
            GameModeKind::Survival => "Survival",
            GameModeKind::FortyLine => "40 Lines",
            GameModeKind::TimeAttack => "Time Attack",
            GameModeKind::Punisher => "Punisher",
        }
    }

    /// Parse a display name or a short alias (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "survival" => Some(GameModeKind::Survival),
            "40 lines" | "40lines" | "40-lines" | "forty" | "fortyline" => {
                Some(GameModeKind::FortyLine)
            }
            "time attack" | "timeattack" | "time-attack" => Some(GameModeKind::TimeAttack),
            "punisher" => Some(GameModeKind::Punisher),
            _ => None,
        }
    }
}

/// A mode with its runtime state
#[derive(Debug, Clone, PartialEq)]
pub enum GameMode {
    Survival,
    FortyLine { target: u32 },
    TimeAttack { limit_ms: u32, elapsed_ms: u32 },
    Punisher { countdown_ms: u32 },
}

impl GameMode {
    pub fn new(kind: GameModeKind) -> Self {
        match kind {
            GameModeKind::Survival => GameMode::Survival,
            GameModeKind::FortyLine => GameMode::FortyLine {
                target: FORTY_LINE_TARGET,
            },
            GameModeKind::TimeAttack => GameMode::TimeAttack {
                limit_ms: TIME_ATTACK_LIMIT_MS,
                elapsed_ms: 0,
            },
            GameModeKind::Punisher => GameMode::Punisher {
                countdown_ms: PUNISH_INTERVAL_MS,
            },
        }
    }

    pub fn kind(&self) -> GameModeKind {
        match self {
            GameMode::Survival => GameModeKind::Survival,
            GameMode::FortyLine { .. } => GameModeKind::FortyLine,
            GameMode::TimeAttack { .. } => GameModeKind::TimeAttack,
            GameMode::Punisher { .. } => GameModeKind::Punisher,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    fn intro(&self) -> String {
        match self {
            GameMode::Survival => "Survive as long as you can".to_string(),
            GameMode::FortyLine { target } => format!("Clear {} lines", target),
            GameMode::TimeAttack { limit_ms, .. } => {
                format!("Score big in {} seconds", limit_ms / 1000)
            }
            GameMode::Punisher { .. } => "Keep clearing or get punished".to_string(),
        }
    }

    /// Called once when the session starts
    pub fn on_init(&mut self, feedback: &mut dyn Feedback) {
        feedback.show_message(&self.intro(), LabelStyle::Normal, INTRO_MESSAGE_MS);
    }

    /// Called after each batch of removed rows, once scoring has run
    pub fn on_lines_cleared(&mut self, score: &ScoreState, cleared: u32) -> ModeVerdict {
        match self {
            GameMode::FortyLine { target } if score.lines_cleared >= *target => ModeVerdict::Won,
            GameMode::Punisher { countdown_ms } if cleared >= 2 => {
                *countdown_ms = PUNISH_INTERVAL_MS;
                ModeVerdict::Continue
            }
            _ => ModeVerdict::Continue,
        }
    }

    /// Called every tick while a piece is in play
    pub fn on_tick(
        &mut self,
        elapsed_ms: u32,
        level: u32,
        rng: &mut dyn RandomSource,
    ) -> ModeVerdict {
        match self {
            GameMode::TimeAttack {
                limit_ms,
                elapsed_ms: total,
            } => {
                *total = total.saturating_add(elapsed_ms);
                if *total >= *limit_ms {
                    ModeVerdict::TimeUp
                } else {
                    ModeVerdict::Continue
                }
            }
            GameMode::Punisher { countdown_ms } => {
                *countdown_ms = countdown_ms.saturating_sub(elapsed_ms);
                if *countdown_ms > 0 {
                    return ModeVerdict::Continue;
                }
                *countdown_ms = PUNISH_INTERVAL_MS;
                if rng.next_float(0.0, 1.0) < punish_chance(level) {
                    ModeVerdict::Garbage(1)
                } else {
                    ModeVerdict::Continue
                }
            }
            _ => ModeVerdict::Continue,
        }
    }

    /// Time left in a timed mode
    pub fn remaining_ms(&self) -> Option<u32> {
        match self {
            GameMode::TimeAttack {
                limit_ms,
                elapsed_ms,
            } => Some(limit_ms.saturating_sub(*elapsed_ms)),
            _ => None,
        }
    }
}

/// Probability that a punisher roll injects garbage
pub fn punish_chance(level: u32) -> f32 {
    let steps = level.saturating_sub(1) as f32;
    (PUNISH_BASE_CHANCE + PUNISH_CHANCE_PER_LEVEL * steps).min(PUNISH_MAX_CHANCE)
}

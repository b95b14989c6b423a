//! Core engine - pure, deterministic, and testable
//!
//! This crate holds every rule of the Cosmono falling-block game and the
//! session that runs them. It has **no dependencies** on rendering, input
//! devices, audio or storage; those are reached through the traits in
//! [`services`] and the random source in [`rng`], which makes it:
//!
//! - **Deterministic**: the same seed and the same button script replay the
//!   same game
//! - **Testable**: every rule is reachable without a front end
//! - **Portable**: runs headless, in a terminal, or behind any UI
//!
//! # Module Structure
//!
//! - [`board`]: 10x22 grid, placement, deferred line clears, garbage
//! - [`pieces`]: shape catalog and wall-kick tables
//! - [`piece`]: the active piece, movement and kicked rotation
//! - [`tspin`]: corner-based T-spin classification
//! - [`scoring`]: score, combo, back-to-back, level and gravity speed
//! - [`mode`]: Survival, 40 Lines, Time Attack and Punisher rules
//! - [`session`]: the per-game state machine tying it all together
//! - [`services`]: feedback and high-score collaborator traits
//! - [`snapshot`]: allocation-free view for renderers
//!
//! # Example
//!
//! ```
//! use cosmono_core::{GameModeKind, Session, SessionConfig};
//! use cosmono_core::types::{Button, TICK_MS};
//!
//! let mut session = Session::with_seed(GameModeKind::Survival, SessionConfig::default(), 12345);
//! session.start();
//!
//! session.update(TICK_MS, &[Button::Right, Button::RotateRight]);
//! session.update(TICK_MS, &[Button::HardDrop]);
//!
//! assert_eq!(session.score().hard_drop, 1);
//! assert_eq!(session.board().occupied_count(), 4);
//! ```
//!
//! # Timing
//!
//! Time only moves when [`Session::update`] or [`Session::tick`] is called
//! with an elapsed duration:
//! - **Spawn delay**: 500ms before gravity acts on a new piece
//! - **Gravity**: 1000ms per row at level 1, faster each level up to 20
//! - **Lock delay**: 500ms once grounded, at most 15 resets per piece
//! - **Line clear**: marked rows dissolve for 500ms before removal

pub mod board;
pub mod config;
pub mod mode;
pub mod piece;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod services;
pub mod session;
pub mod snapshot;
pub mod tspin;

pub use cosmono_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, PlaceOutcome, RowsRemoved};
pub use config::SessionConfig;
pub use mode::{GameMode, GameModeKind, ModeVerdict};
pub use piece::Cosmono;
pub use rng::{Bag, RandomSource, SimpleRng};
pub use scoring::{gravity_interval_ms, ScoreResult, ScoreState};
pub use services::{
    record_high_score, Feedback, HighScore, HighScoreStore, LabelStyle, MemoryHighScores,
    NullFeedback, RecordingFeedback,
};
pub use session::{GameOutcome, Session, SessionEvent};
pub use snapshot::{SessionPhase, SessionSnapshot};

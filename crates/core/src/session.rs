//! Session module - one running game
//!
//! The session owns every piece of mutable game state: board, active and
//! ghost piece, bag, hold slot, score and mode. A front end drives it with
//! [`Session::update`] once per frame; button presses are applied first, then
//! gravity, lock delay, the line-clear countdown and the mode rules run in a
//! fixed order.
//!
//! Line clears are two-phase. Locking a piece that fills rows only marks
//! them; the rows dissolve over [`LINE_CLEAR_MS`](crate::types::LINE_CLEAR_MS)
//! while the next spawn waits. When the batch is deleted the score is
//! applied, the mode is consulted, and play resumes.
//!
//! Game over freezes the active piece and sweeps the board away one row per
//! tick before the session reports [`SessionPhase::Finished`].

use crate::board::{Board, RowsRemoved};
use crate::config::SessionConfig;
use crate::mode::{GameMode, GameModeKind, ModeVerdict};
use crate::piece::Cosmono;
use crate::rng::{Bag, RandomSource, SimpleRng};
use crate::scoring::{gravity_interval_ms, ScoreResult, ScoreState};
use crate::services::{self, Feedback, HighScore, HighScoreStore, LabelStyle, NullFeedback};
use crate::snapshot::{PieceSnapshot, SessionPhase, SessionSnapshot, TimersSnapshot};
use crate::tspin;
use crate::types::{
    Button, RotateDirection, ShapeKind, TSpinKind, LOCK_RESET_LIMIT, NEXT_PREVIEW,
    SPAWN_DELAY_MS,
};

/// How long end-of-game and level-up messages stay up
const MESSAGE_MS: u32 = 1500;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    /// A new piece could not enter the board
    BlockOut,
    /// The mode's goal was reached
    Won,
    /// The mode's clock ran out
    TimeUp,
}

impl GameOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            GameOutcome::BlockOut => "Game Over",
            GameOutcome::Won => "Complete!",
            GameOutcome::TimeUp => "Time Up",
        }
    }
}

/// Journal entry recorded as the session runs; drained with
/// [`Session::take_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Spawned(ShapeKind),
    Held(ShapeKind),
    Locked {
        kind: ShapeKind,
        t_spin: TSpinKind,
        rows_marked: u8,
    },
    DissolveStarted {
        rows: u8,
    },
    RowsRemoved {
        count: u8,
        t_spin: TSpinKind,
        perfect_clear: bool,
        points: u32,
    },
    LevelUp(u32),
    Garbage(u8),
    GameOver(GameOutcome),
    SweepFinished,
}

/// Complete game session
pub struct Session<F: Feedback = NullFeedback> {
    config: SessionConfig,
    mode: GameMode,
    rng: Box<dyn RandomSource>,
    feedback: F,
    board: Board,
    bag: Bag,
    active: Option<Cosmono>,
    ghost: Option<Cosmono>,
    hold: Option<ShapeKind>,
    can_hold: bool,
    score: ScoreState,
    phase: SessionPhase,
    outcome: Option<GameOutcome>,
    gravity_interval_ms: f64,
    gravity_timer_ms: f64,
    lock_timer_ms: u32,
    spawn_timer_ms: u32,
    move_resets: u8,
    events: Vec<SessionEvent>,
}

impl Session<NullFeedback> {
    /// Deterministic session without feedback
    pub fn with_seed(mode: GameModeKind, config: SessionConfig, seed: u32) -> Self {
        Self::new(mode, config, Box::new(SimpleRng::new(seed)), NullFeedback)
    }
}

impl<F: Feedback> Session<F> {
    pub fn new(
        mode: GameModeKind,
        config: SessionConfig,
        mut rng: Box<dyn RandomSource>,
        feedback: F,
    ) -> Self {
        let config = config.sanitized();
        let bag = Bag::new(rng.as_mut());
        let score = ScoreState::new();
        let gravity = gravity_interval_ms(score.level, config.gravity_multiplier as f64);

        Self {
            config,
            mode: GameMode::new(mode),
            rng,
            feedback,
            board: Board::new(),
            bag,
            active: None,
            ghost: None,
            hold: None,
            can_hold: true,
            score,
            phase: SessionPhase::Ready,
            outcome: None,
            gravity_interval_ms: gravity,
            gravity_timer_ms: 0.0,
            lock_timer_ms: 0,
            spawn_timer_ms: 0,
            move_resets: 0,
            events: Vec::new(),
        }
    }

    /// Run the mode intro and spawn the first piece
    pub fn start(&mut self) {
        if self.phase != SessionPhase::Ready {
            return;
        }
        self.mode.on_init(&mut self.feedback);
        self.feedback.play_music("theme");
        self.phase = SessionPhase::Playing;
        self.spawn(None);
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Ended, whether or not the sweep has finished
    pub fn is_over(&self) -> bool {
        matches!(self.phase, SessionPhase::Sweeping | SessionPhase::Finished)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn mode(&self) -> &GameMode {
        &self.mode
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn active(&self) -> Option<&Cosmono> {
        self.active.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn set_active(&mut self, piece: Cosmono) {
        self.active = Some(piece);
        self.refresh_ghost();
    }

    pub fn ghost(&self) -> Option<&Cosmono> {
        self.ghost.as_ref()
    }

    pub fn hold_piece(&self) -> Option<ShapeKind> {
        self.hold
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold && self.config.hold_enabled
    }

    pub fn next_preview(&self) -> [ShapeKind; NEXT_PREVIEW] {
        self.bag.preview()
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn gravity_interval_ms(&self) -> f64 {
        self.gravity_interval_ms
    }

    pub fn lock_timer_ms(&self) -> u32 {
        self.lock_timer_ms
    }

    pub fn spawn_timer_ms(&self) -> u32 {
        self.spawn_timer_ms
    }

    pub fn move_resets(&self) -> u8 {
        self.move_resets
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    /// Drain the event journal
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Store this session's result under the mode name if it is a new best
    pub fn record_high_score(&self, store: &mut dyn HighScoreStore) -> bool {
        services::record_high_score(store, self.mode.name(), HighScore::from(&self.score))
    }

    /// Spawn a new active piece: `kind` if given, otherwise the next shape
    /// from the bag. Ends the session (block-out) if the spawn cells are
    /// not free.
    pub fn spawn(&mut self, kind: Option<ShapeKind>) -> bool {
        if self.phase != SessionPhase::Playing {
            return false;
        }

        let kind = match kind {
            Some(kind) => kind,
            None => self.bag.draw(self.rng.as_mut()),
        };

        let mut piece = Cosmono::spawn(kind);
        if !piece.fits(&self.board) {
            self.active = None;
            self.end_game(GameOutcome::BlockOut);
            return false;
        }

        if kind.rotates_between_cells() {
            piece.try_move(&self.board, 0, 1);
        }

        self.active = Some(piece);
        self.spawn_timer_ms = SPAWN_DELAY_MS;
        self.lock_timer_ms = 0;
        self.move_resets = 0;
        self.gravity_timer_ms = 0.0;
        self.recompute_gravity();
        self.refresh_ghost();
        self.events.push(SessionEvent::Spawned(kind));
        true
    }

    /// Apply one button-down event. Returns whether it changed anything.
    pub fn press(&mut self, button: Button) -> bool {
        if self.phase != SessionPhase::Playing || self.active.is_none() {
            return false;
        }

        match button {
            Button::Left => self.shift(-1),
            Button::Right => self.shift(1),
            Button::Up | Button::RotateRight => self.rotate(RotateDirection::Right),
            Button::RotateLeft => self.rotate(RotateDirection::Left),
            Button::Down => self.soft_drop(),
            Button::Hold => self.hold(),
            Button::HardDrop => self.hard_drop(),
        }
    }

    /// Per-frame entry point: buttons first, then time
    pub fn update(&mut self, elapsed_ms: u32, buttons: &[Button]) {
        for &button in buttons {
            self.press(button);
        }
        self.tick(elapsed_ms);
    }

    /// Advance timers by `elapsed_ms`
    pub fn tick(&mut self, elapsed_ms: u32) {
        match self.phase {
            SessionPhase::Ready | SessionPhase::Finished => {}
            SessionPhase::Sweeping => self.sweep_step(),
            SessionPhase::Clearing => {
                let verdict = self
                    .mode
                    .on_tick(elapsed_ms, self.score.level, self.rng.as_mut());
                if matches!(verdict, ModeVerdict::Won | ModeVerdict::TimeUp) {
                    // Rows already marked still count toward the final score.
                    if let Some(removed) = self.board.flush_pending() {
                        self.score_batch(removed);
                    }
                    self.apply_verdict(verdict);
                    return;
                }
                if !self.apply_verdict(verdict) {
                    return;
                }
                if let Some(removed) = self.board.tick(elapsed_ms) {
                    self.finish_clear(removed);
                }
            }
            SessionPhase::Playing => {
                if !self.consult_mode_clock(elapsed_ms) {
                    return;
                }
                self.tick_piece(elapsed_ms);
            }
        }
    }

    /// Add `rows` garbage rows at the bottom. Refused while rows are
    /// dissolving. A piece left overlapping is pushed up by `rows`; if it
    /// still does not fit the session tops out.
    pub fn inject_garbage(&mut self, rows: u8) -> bool {
        if !matches!(self.phase, SessionPhase::Playing | SessionPhase::Clearing) {
            return false;
        }
        if !self.board.garbage(rows as usize, self.rng.as_mut()) {
            return false;
        }

        self.events.push(SessionEvent::Garbage(rows));
        self.feedback.play_sound("garbage");

        let topped_out = match self.active.as_mut() {
            Some(piece) if !piece.fits(&self.board) => {
                piece.y -= rows as i8;
                !piece.fits(&self.board)
            }
            _ => false,
        };

        if topped_out {
            self.end_game(GameOutcome::BlockOut);
        } else {
            self.refresh_ghost();
        }
        true
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        self.board.write_u8_grid(&mut out.board);

        out.active = self.active.as_ref().map(PieceSnapshot::from);
        out.ghost = self.ghost.as_ref().map(PieceSnapshot::from);
        out.hold = self.hold;
        out.can_hold = self.can_hold();
        out.next = self.bag.preview();

        out.clearing_rows.fill(0);
        for pending in self.board.pending_rows() {
            out.clearing_rows[pending.row as usize] = pending.remaining_ms;
        }

        out.phase = self.phase;
        out.score = self.score.score;
        out.level = self.score.level;
        out.lines = self.score.lines_cleared;
        out.timers = TimersSnapshot {
            gravity_ms: self.gravity_timer_ms as u32,
            lock_ms: self.lock_timer_ms,
            spawn_ms: self.spawn_timer_ms,
        };
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut s = SessionSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    fn shift(&mut self, dx: i8) -> bool {
        let moved = match self.active.as_mut() {
            Some(piece) => piece.try_move(&self.board, dx, 0),
            None => false,
        };
        if moved {
            self.feedback.play_sound("move");
            self.refresh_ghost();
            self.register_lock_reset();
        }
        moved
    }

    fn rotate(&mut self, direction: RotateDirection) -> bool {
        let rotated = match self.active.as_mut() {
            Some(piece) => piece.rotate(&self.board, direction),
            None => false,
        };
        if rotated {
            self.feedback.play_sound("rotate");
            self.refresh_ghost();
            self.register_lock_reset();
        }
        rotated
    }

    fn soft_drop(&mut self) -> bool {
        let moved = match self.active.as_mut() {
            Some(piece) => piece.try_move(&self.board, 0, 1),
            None => false,
        };
        if moved {
            self.score.record_soft_drop();
            self.gravity_timer_ms = 0.0;
        }
        moved
    }

    fn hard_drop(&mut self) -> bool {
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        let distance = piece.drop_distance(&self.board);
        if distance > 0 {
            piece.try_move(&self.board, 0, distance);
        }
        self.score.record_hard_drop();
        self.feedback.play_sound("hard_drop");
        self.lock_active();
        true
    }

    fn hold(&mut self) -> bool {
        if !self.can_hold() {
            return false;
        }
        let Some(piece) = self.active.take() else {
            return false;
        };

        let current = piece.kind();
        let swapped_in = self.hold.replace(current);
        self.can_hold = false;
        self.events.push(SessionEvent::Held(current));
        self.feedback.play_sound("hold");
        self.spawn(swapped_in);
        true
    }

    /// A successful move or rotation after the piece has touched down
    /// restarts the lock delay, up to [`LOCK_RESET_LIMIT`] times.
    fn register_lock_reset(&mut self) {
        let resting = match self.active.as_ref() {
            Some(piece) if piece.has_grounded => piece.is_resting(&self.board),
            _ => return,
        };

        self.move_resets = self.move_resets.saturating_add(1);
        self.lock_timer_ms = 0;
        if self.move_resets >= LOCK_RESET_LIMIT && resting {
            self.lock_active();
        }
    }

    /// Returns false once the mode has ended the session
    fn consult_mode_clock(&mut self, elapsed_ms: u32) -> bool {
        let verdict = self
            .mode
            .on_tick(elapsed_ms, self.score.level, self.rng.as_mut());
        self.apply_verdict(verdict)
    }

    fn tick_piece(&mut self, elapsed_ms: u32) {
        if self.spawn_timer_ms > 0 {
            self.spawn_timer_ms = self.spawn_timer_ms.saturating_sub(elapsed_ms);
            return;
        }

        let resting = match self.active.as_mut() {
            Some(piece) => {
                let resting = piece.is_resting(&self.board);
                piece.is_grounded = resting;
                if resting {
                    piece.has_grounded = true;
                }
                resting
            }
            None => return,
        };

        if resting {
            self.lock_timer_ms = self.lock_timer_ms.saturating_add(elapsed_ms);
            if self.lock_timer_ms >= self.config.lock_delay_ms
                || self.move_resets >= LOCK_RESET_LIMIT
            {
                self.try_lock();
            }
        } else {
            self.lock_timer_ms = 0;
            self.apply_gravity(elapsed_ms);
        }
    }

    fn apply_gravity(&mut self, elapsed_ms: u32) {
        self.gravity_timer_ms += elapsed_ms as f64;
        while self.gravity_timer_ms >= self.gravity_interval_ms {
            self.gravity_timer_ms -= self.gravity_interval_ms;
            let moved = match self.active.as_mut() {
                Some(piece) => piece.try_move(&self.board, 0, 1),
                None => false,
            };
            if !moved {
                self.gravity_timer_ms = 0.0;
                break;
            }
        }
    }

    /// Lock only if the piece really rests on something; a stale grounded
    /// flag just restarts the delay.
    fn try_lock(&mut self) {
        let resting = self
            .active
            .as_ref()
            .is_some_and(|piece| piece.is_resting(&self.board));
        if resting {
            self.lock_active();
        } else {
            self.lock_timer_ms = 0;
        }
    }

    fn lock_active(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };
        self.ghost = None;

        let Some(outcome) = self.board.place_piece(&piece) else {
            self.active = Some(piece);
            self.end_game(GameOutcome::BlockOut);
            return;
        };

        let t_spin = tspin::classify(&self.board, &piece, outcome.rows_marked);
        self.can_hold = true;
        self.lock_timer_ms = 0;
        self.move_resets = 0;
        self.feedback.play_sound("lock");
        self.events.push(SessionEvent::Locked {
            kind: piece.kind(),
            t_spin,
            rows_marked: outcome.rows_marked,
        });

        if outcome.dissolve_started {
            self.board.set_batch_t_spin(t_spin);
            self.feedback.play_sound("line_clear");
            self.events.push(SessionEvent::DissolveStarted {
                rows: outcome.rows_marked,
            });
            self.phase = SessionPhase::Clearing;
        } else {
            let result = self.score.apply_lock(0, t_spin, false);
            self.announce(&result, t_spin, 0, false);
            self.spawn(None);
        }
    }

    fn finish_clear(&mut self, removed: RowsRemoved) {
        self.score_batch(removed);

        self.phase = SessionPhase::Playing;
        let verdict = self.mode.on_lines_cleared(&self.score, removed.count as u32);
        if self.apply_verdict(verdict) {
            self.spawn(None);
        }
    }

    fn score_batch(&mut self, removed: RowsRemoved) {
        let cleared = removed.count as u32;
        let result = self
            .score
            .apply_lock(cleared, removed.t_spin, removed.perfect_clear);
        self.announce(&result, removed.t_spin, cleared, removed.perfect_clear);
        self.events.push(SessionEvent::RowsRemoved {
            count: removed.count,
            t_spin: removed.t_spin,
            perfect_clear: removed.perfect_clear,
            points: result.total,
        });

        if let Some(level) = result.new_level {
            self.recompute_gravity();
            self.feedback.play_sound("level_up");
            self.feedback
                .show_message(&format!("Level {}", level), LabelStyle::Highlight, MESSAGE_MS);
            self.events.push(SessionEvent::LevelUp(level));
        }
    }

    /// Carry out a mode verdict. Returns false if the session ended.
    fn apply_verdict(&mut self, verdict: ModeVerdict) -> bool {
        match verdict {
            ModeVerdict::Continue => {}
            ModeVerdict::Won => self.end_game(GameOutcome::Won),
            ModeVerdict::TimeUp => self.end_game(GameOutcome::TimeUp),
            ModeVerdict::Garbage(rows) => {
                self.inject_garbage(rows);
            }
        }
        !self.is_over()
    }

    fn announce(&mut self, result: &ScoreResult, t_spin: TSpinKind, cleared: u32, perfect: bool) {
        if let Some(label) = t_spin.label() {
            self.feedback
                .show_floating_label(label, LabelStyle::Highlight);
        } else if let Some(label) = line_clear_label(cleared) {
            self.feedback.show_floating_label(label, LabelStyle::Normal);
        }

        if result.combo_points > 0 {
            let chain = self.score.running_combo() - 1;
            self.feedback
                .show_floating_label(&format!("{} Combo", chain), LabelStyle::Normal);
        }
        if result.back_to_back_points > 0 {
            self.feedback
                .show_floating_label("Back-to-Back", LabelStyle::Highlight);
        }
        if perfect {
            self.feedback
                .show_floating_label("Perfect Clear", LabelStyle::Highlight);
        }
    }

    fn end_game(&mut self, outcome: GameOutcome) {
        if self.is_over() {
            return;
        }
        if let Some(piece) = self.active.as_mut() {
            piece.is_frozen = true;
        }
        self.ghost = None;
        self.board.discard_pending();
        self.outcome = Some(outcome);
        self.phase = SessionPhase::Sweeping;

        let style = match outcome {
            GameOutcome::BlockOut => LabelStyle::Warning,
            GameOutcome::Won | GameOutcome::TimeUp => LabelStyle::Highlight,
        };
        self.feedback.play_sound("game_over");
        self.feedback
            .show_message(outcome.message(), style, MESSAGE_MS);
        self.events.push(SessionEvent::GameOver(outcome));
    }

    /// Delete the lowest occupied row; finish once the board is empty
    fn sweep_step(&mut self) {
        if let Some(row) = self.board.lowest_occupied_row() {
            self.board.delete_row(row);
        }
        if self.board.is_empty() {
            self.active = None;
            self.phase = SessionPhase::Finished;
            self.events.push(SessionEvent::SweepFinished);
        }
    }

    fn recompute_gravity(&mut self) {
        self.gravity_interval_ms =
            gravity_interval_ms(self.score.level, self.config.gravity_multiplier as f64);
    }

    fn refresh_ghost(&mut self) {
        self.ghost = match self.active.as_ref() {
            Some(piece) if self.config.ghost_enabled && !piece.is_frozen => {
                Some(piece.ghost(&self.board))
            }
            _ => None,
        };
    }
}

fn line_clear_label(cleared: u32) -> Option<&'static str> {
    match cleared {
        1 => Some("Single"),
        2 => Some("Double"),
        3 => Some("Triple"),
        4 => Some("Tetris"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{MemoryHighScores, RecordingFeedback};
    use crate::types::{CellKind, Rotation, TICK_MS};

    fn playing(mode: GameModeKind) -> Session<RecordingFeedback> {
        playing_with(mode, SessionConfig::default())
    }

    fn playing_with(mode: GameModeKind, config: SessionConfig) -> Session<RecordingFeedback> {
        let mut s = Session::new(
            mode,
            config,
            Box::new(SimpleRng::new(7)),
            RecordingFeedback::new(),
        );
        s.start();
        s
    }

    fn fill(s: &mut Session<RecordingFeedback>, y: i8, columns: std::ops::Range<i8>) {
        for x in columns {
            s.board_mut().set(x, y, Some(CellKind::Garbage));
        }
    }

    fn run_clear(s: &mut Session<RecordingFeedback>) {
        for _ in 0..40 {
            if s.phase() != SessionPhase::Clearing {
                break;
            }
            s.tick(TICK_MS);
        }
    }

    fn wait_out_spawn_delay(s: &mut Session<RecordingFeedback>) {
        while s.spawn_timer_ms() > 0 {
            s.tick(TICK_MS);
        }
    }

    fn drop_to_floor(s: &mut Session<RecordingFeedback>) {
        while s.press(Button::Down) {}
    }

    #[test]
    fn test_start_spawns_and_plays_theme() {
        let mut s = playing(GameModeKind::Survival);
        assert_eq!(s.phase(), SessionPhase::Playing);
        assert!(s.active().is_some());
        assert!(s.ghost().is_some());
        assert_eq!(s.spawn_timer_ms(), SPAWN_DELAY_MS);
        assert!(s
            .feedback()
            .calls
            .contains(&crate::services::FeedbackCall::Music("theme".into())));
        let events = s.take_events();
        assert!(matches!(events.as_slice(), [SessionEvent::Spawned(_)]));
    }

    #[test]
    fn test_o_single_then_empty_lock_breaks_combo() {
        let mut s = playing(GameModeKind::Survival);
        fill(&mut s, 21, 0..8);
        assert!(s.spawn(Some(ShapeKind::O)));
        for _ in 0..4 {
            assert!(s.press(Button::Right));
        }
        assert!(s.press(Button::HardDrop));

        assert_eq!(s.phase(), SessionPhase::Clearing);
        assert_eq!(s.score().score, 0);
        assert!(s.active().is_none());

        run_clear(&mut s);
        assert_eq!(s.phase(), SessionPhase::Playing);
        assert_eq!(s.score().score, 100);
        assert_eq!(s.score().lines_cleared, 1);
        assert_eq!(s.score().running_combo(), 1);
        assert!(s.feedback().labels().any(|l| l == "Single"));

        assert!(s.press(Button::HardDrop));
        assert_eq!(s.phase(), SessionPhase::Playing);
        assert_eq!(s.score().running_combo(), 0);
        assert_eq!(s.score().score, 100);
    }

    #[test]
    fn test_t_spin_double_scores_and_arms_back_to_back() {
        let mut s = playing(GameModeKind::Survival);
        fill(&mut s, 21, 0..4);
        fill(&mut s, 21, 5..10);
        fill(&mut s, 20, 0..3);
        fill(&mut s, 20, 6..10);
        fill(&mut s, 19, 3..4);

        // T pointing down into the slot, as if it had just rotated there.
        let scratch = Board::new();
        let mut t = Cosmono::new(ShapeKind::T, 4, 20);
        t.rotate(&scratch, RotateDirection::Right);
        t.rotate(&scratch, RotateDirection::Right);
        assert_eq!(t.rotation(), Rotation::South);
        assert!(t.last_move_was_rotation);
        s.set_active(t);

        assert!(s.press(Button::HardDrop));
        let events = s.take_events();
        assert!(events.contains(&SessionEvent::Locked {
            kind: ShapeKind::T,
            t_spin: TSpinKind::Double,
            rows_marked: 2,
        }));

        run_clear(&mut s);
        assert_eq!(s.score().score, 1200 + 300);
        assert_eq!(s.score().t_spin, 1);
        assert!(s.score().last_was_back_to_back);
        assert!(s.feedback().labels().any(|l| l == "T-Spin Double"));
    }

    #[test]
    fn test_grounded_piece_locks_after_delay() {
        let mut s = playing(GameModeKind::Survival);
        assert!(s.spawn(Some(ShapeKind::O)));
        drop_to_floor(&mut s);
        wait_out_spawn_delay(&mut s);
        s.take_events();

        for _ in 0..31 {
            s.tick(TICK_MS);
        }
        assert_eq!(s.board().occupied_count(), 0);
        assert!(s.lock_timer_ms() < 500);

        s.tick(TICK_MS);
        assert_eq!(s.board().occupied_count(), 4);
        assert!(s
            .take_events()
            .iter()
            .any(|e| matches!(e, SessionEvent::Locked { kind: ShapeKind::O, .. })));
    }

    #[test]
    fn test_fifteenth_reset_forces_lock() {
        let mut s = playing(GameModeKind::Survival);
        assert!(s.spawn(Some(ShapeKind::O)));
        drop_to_floor(&mut s);
        wait_out_spawn_delay(&mut s);
        s.tick(TICK_MS);
        assert!(s.active().is_some_and(|p| p.has_grounded));

        for i in 0..14 {
            let button = if i % 2 == 0 { Button::Left } else { Button::Right };
            assert!(s.press(button));
            assert_eq!(s.lock_timer_ms(), 0);
        }
        assert_eq!(s.move_resets(), 14);
        assert_eq!(s.board().occupied_count(), 0);

        assert!(s.press(Button::Left));
        assert_eq!(s.board().occupied_count(), 4);
        assert_eq!(s.move_resets(), 0);
    }

    #[test]
    fn test_moves_before_touchdown_do_not_count() {
        let mut s = playing(GameModeKind::Survival);
        assert!(s.spawn(Some(ShapeKind::T)));
        for _ in 0..3 {
            s.press(Button::Left);
            s.press(Button::Right);
        }
        assert_eq!(s.move_resets(), 0);
    }

    #[test]
    fn test_perfect_clear_bonus() {
        let mut s = playing(GameModeKind::Survival);
        fill(&mut s, 20, 0..8);
        fill(&mut s, 21, 0..8);
        assert!(s.spawn(Some(ShapeKind::O)));
        for _ in 0..4 {
            s.press(Button::Right);
        }
        s.press(Button::HardDrop);
        run_clear(&mut s);

        assert_eq!(s.score().perfect_clear, 1);
        assert_eq!(s.score().score, 300 + 1000);
        assert!(s.feedback().labels().any(|l| l == "Perfect Clear"));
    }

    #[test]
    fn test_spawn_waits_for_dissolve() {
        let mut s = playing(GameModeKind::Survival);
        fill(&mut s, 21, 0..8);
        s.spawn(Some(ShapeKind::O));
        for _ in 0..4 {
            s.press(Button::Right);
        }
        s.press(Button::HardDrop);

        s.tick(TICK_MS);
        assert!(s.active().is_none());
        assert!(!s.press(Button::Left));
        assert_eq!(s.snapshot().clearing_rows[21], 500 - TICK_MS);

        run_clear(&mut s);
        assert!(s.active().is_some());
    }

    #[test]
    fn test_block_out_then_sweep() {
        let mut s = playing(GameModeKind::Survival);
        fill(&mut s, 21, 0..9);
        fill(&mut s, 20, 0..5);
        fill(&mut s, 2, 4..5);

        assert!(!s.spawn(Some(ShapeKind::T)));
        assert_eq!(s.phase(), SessionPhase::Sweeping);
        assert_eq!(s.outcome(), Some(GameOutcome::BlockOut));
        assert!(!s.press(Button::Left));

        for _ in 0..3 {
            s.tick(TICK_MS);
        }
        assert_eq!(s.phase(), SessionPhase::Finished);
        assert!(s.board().is_empty());

        let events = s.take_events();
        assert!(events.contains(&SessionEvent::GameOver(GameOutcome::BlockOut)));
        assert_eq!(events.last(), Some(&SessionEvent::SweepFinished));
    }

    #[test]
    fn test_hold_once_per_piece() {
        let mut s = playing(GameModeKind::Survival);
        let first = s.active().map(|p| p.kind()).unwrap();
        let next = s.next_preview()[0];

        assert!(s.press(Button::Hold));
        assert_eq!(s.hold_piece(), Some(first));
        assert_eq!(s.active().map(|p| p.kind()), Some(next));
        assert!(!s.press(Button::Hold));

        s.press(Button::HardDrop);
        assert!(s.can_hold());
        assert!(s.press(Button::Hold));
        assert_eq!(s.active().map(|p| p.kind()), Some(first));
    }

    #[test]
    fn test_hold_disabled() {
        let config = SessionConfig {
            hold_enabled: false,
            ..SessionConfig::default()
        };
        let mut s = playing_with(GameModeKind::Survival, config);
        assert!(!s.press(Button::Hold));
        assert_eq!(s.hold_piece(), None);
    }

    #[test]
    fn test_ghost_disabled() {
        let config = SessionConfig {
            ghost_enabled: false,
            ..SessionConfig::default()
        };
        let s = playing_with(GameModeKind::Survival, config);
        assert!(s.ghost().is_none());
        assert!(s.snapshot().ghost.is_none());
    }

    #[test]
    fn test_ghost_follows_piece() {
        let mut s = playing(GameModeKind::Survival);
        s.spawn(Some(ShapeKind::T));
        s.press(Button::Left);
        let active = *s.active().unwrap();
        let ghost = *s.ghost().unwrap();
        assert_eq!(ghost.x, active.x);
        assert_eq!(ghost.y, 21);
        assert!(ghost.is_ghost);
    }

    #[test]
    fn test_gravity_moves_piece_after_spawn_delay() {
        let mut s = playing(GameModeKind::Survival);
        s.spawn(Some(ShapeKind::T));
        let start_y = s.active().unwrap().y;

        wait_out_spawn_delay(&mut s);
        assert_eq!(s.active().unwrap().y, start_y);

        s.tick(1000);
        assert_eq!(s.active().unwrap().y, start_y + 1);
    }

    #[test]
    fn test_soft_and_hard_drop_counters() {
        let mut s = playing(GameModeKind::Survival);
        s.spawn(Some(ShapeKind::T));
        s.press(Button::Down);
        s.press(Button::Down);
        s.press(Button::HardDrop);
        assert_eq!(s.score().soft_drop, 2);
        assert_eq!(s.score().hard_drop, 1);
        assert_eq!(s.score().score, 0);
    }

    #[test]
    fn test_garbage_pushes_piece_up() {
        let mut s = playing(GameModeKind::Survival);
        s.spawn(Some(ShapeKind::O));
        drop_to_floor(&mut s);
        assert_eq!(s.active().unwrap().y, 20);

        assert!(s.inject_garbage(1));
        assert_eq!(s.board().occupied_count(), 9);
        assert_eq!(s.active().unwrap().y, 19);
        assert!(!s.is_over());
        assert!(s.take_events().contains(&SessionEvent::Garbage(1)));
    }

    #[test]
    fn test_garbage_refused_while_clearing() {
        let mut s = playing(GameModeKind::Survival);
        fill(&mut s, 21, 0..8);
        s.spawn(Some(ShapeKind::O));
        for _ in 0..4 {
            s.press(Button::Right);
        }
        s.press(Button::HardDrop);
        assert_eq!(s.phase(), SessionPhase::Clearing);
        assert!(!s.inject_garbage(1));
    }

    /// Every roll comes out as low as possible
    struct LowRolls;

    impl RandomSource for LowRolls {
        fn next_int(&mut self, min: i32, _max_exclusive: i32) -> i32 {
            min
        }

        fn next_float(&mut self, min: f32, _max: f32) -> f32 {
            min
        }
    }

    #[test]
    fn test_punisher_injects_garbage() {
        let mut s = Session::new(
            GameModeKind::Punisher,
            SessionConfig::default(),
            Box::new(LowRolls),
            RecordingFeedback::new(),
        );
        s.start();
        s.tick(crate::mode::PUNISH_INTERVAL_MS);

        assert_eq!(s.board().occupied_count(), 9);
        // The hole lands in the first column.
        assert!(s.board().is_free(0, 21));
        assert!(s.take_events().contains(&SessionEvent::Garbage(1)));
    }

    #[test]
    fn test_time_attack_ends_without_block_out() {
        let mut s = playing(GameModeKind::TimeAttack);
        s.tick(crate::mode::TIME_ATTACK_LIMIT_MS);
        assert_eq!(s.outcome(), Some(GameOutcome::TimeUp));
        assert!(s.active().is_some_and(|p| p.is_frozen));

        s.tick(TICK_MS);
        assert_eq!(s.phase(), SessionPhase::Finished);
    }

    #[test]
    fn test_time_up_mid_dissolve_still_scores_rows() {
        let mut s = playing(GameModeKind::TimeAttack);
        fill(&mut s, 21, 0..8);
        s.spawn(Some(ShapeKind::O));
        for _ in 0..4 {
            s.press(Button::Right);
        }
        s.press(Button::HardDrop);
        assert_eq!(s.phase(), SessionPhase::Clearing);
        s.take_events();

        s.tick(crate::mode::TIME_ATTACK_LIMIT_MS);
        assert_eq!(s.outcome(), Some(GameOutcome::TimeUp));
        assert_eq!(s.score().lines_cleared, 1);
        assert_eq!(s.score().score, 100);
        // Only the O's upper half remains.
        assert_eq!(s.board().occupied_count(), 2);
        assert!(!s.board().is_clearing());

        let events = s.take_events();
        assert!(matches!(
            events.as_slice(),
            [
                SessionEvent::RowsRemoved { count: 1, points: 100, .. },
                SessionEvent::GameOver(GameOutcome::TimeUp)
            ]
        ));
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let s = playing(GameModeKind::Survival);
        let snap = s.snapshot();
        assert!(snap.playable());
        assert_eq!(snap.next, s.next_preview());
        assert_eq!(snap.level, 1);
        assert_eq!(snap.timers.spawn_ms, SPAWN_DELAY_MS);
        assert_eq!(
            snap.active.map(|a| a.cells),
            s.active().map(|p| p.cells())
        );
    }

    #[test]
    fn test_high_score_keyed_by_mode() {
        let mut s = playing(GameModeKind::FortyLine);
        fill(&mut s, 21, 0..8);
        s.spawn(Some(ShapeKind::O));
        for _ in 0..4 {
            s.press(Button::Right);
        }
        s.press(Button::HardDrop);
        run_clear(&mut s);

        let mut store = MemoryHighScores::new();
        assert!(s.record_high_score(&mut store));
        assert_eq!(store.load("40 Lines").map(|r| r.score_value), Some(100));
        assert!(!s.record_high_score(&mut store));
    }

    #[test]
    fn test_deterministic_with_seed() {
        let mut a = Session::with_seed(GameModeKind::Survival, SessionConfig::default(), 99);
        let mut b = Session::with_seed(GameModeKind::Survival, SessionConfig::default(), 99);
        a.start();
        b.start();
        for _ in 0..50 {
            a.update(TICK_MS, &[Button::HardDrop]);
            b.update(TICK_MS, &[Button::HardDrop]);
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }
}

//! Headless simulator - runs a session against a scripted button source.
//!
//! Stands in for a real front end: a seeded script presses buttons every
//! 16ms frame and the session runs until it finishes or the frame budget is
//! spent.

use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::core::{
    GameModeKind, HighScore, HighScoreStore, Session, SessionConfig, SessionEvent, SessionPhase,
    SimpleRng,
};
use crate::types::{Button, TICK_MS};

/// Frames run when `--frames` is not given (one minute at 60 FPS)
pub const DEFAULT_FRAMES: u32 = 3600;

/// Mixed into the seed so the button script and the bag do not share a
/// sequence.
const SCRIPT_SALT: u32 = 0x9E37_79B9;

#[derive(Debug, Clone, PartialEq)]
pub struct SimOptions {
    pub mode: GameModeKind,
    pub seed: u32,
    pub config: SessionConfig,
    pub frames: u32,
    pub json: bool,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            mode: GameModeKind::Survival,
            seed: 1,
            config: SessionConfig::default(),
            frames: DEFAULT_FRAMES,
            json: false,
        }
    }
}

fn parse_mode(v: &str, source: &str) -> Result<GameModeKind> {
    GameModeKind::from_name(v).ok_or_else(|| anyhow!("sim: invalid {} value: {}", source, v))
}

fn parse_seed(v: &str, source: &str) -> Result<u32> {
    v.parse::<u32>()
        .map_err(|_| anyhow!("sim: invalid {} value: {}", source, v))
}

fn parse_gravity(v: &str, source: &str) -> Result<f32> {
    match v.parse::<f32>() {
        Ok(g) if g.is_finite() && g > 0.0 => Ok(g),
        _ => Err(anyhow!("sim: invalid {} value: {}", source, v)),
    }
}

/// Build options from `COSMONO_*` variables, then command-line flags.
/// Flags win over the environment.
pub fn parse_sim_args<E>(args: &[String], env: E) -> Result<SimOptions>
where
    E: Fn(&str) -> Option<String>,
{
    let mut opts = SimOptions::default();

    if let Some(v) = env("COSMONO_MODE") {
        opts.mode = parse_mode(&v, "COSMONO_MODE")?;
    }
    if let Some(v) = env("COSMONO_SEED") {
        opts.seed = parse_seed(&v, "COSMONO_SEED")?;
    }
    if let Some(v) = env("COSMONO_GRAVITY") {
        opts.config.gravity_multiplier = parse_gravity(&v, "COSMONO_GRAVITY")?;
    }

    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--no-hold" => opts.config.hold_enabled = false,
            "--no-ghost" => opts.config.ghost_enabled = false,
            "--json" => opts.json = true,
            "--mode" | "--seed" | "--gravity" | "--lock-delay" | "--frames" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("sim: missing value for {}", flag))?;
                match flag {
                    "--mode" => opts.mode = parse_mode(v, flag)?,
                    "--seed" => opts.seed = parse_seed(v, flag)?,
                    "--gravity" => opts.config.gravity_multiplier = parse_gravity(v, flag)?,
                    "--lock-delay" => {
                        opts.config.lock_delay_ms = v
                            .parse::<u32>()
                            .map_err(|_| anyhow!("sim: invalid {} value: {}", flag, v))?;
                    }
                    _ => {
                        opts.frames = v
                            .parse::<u32>()
                            .map_err(|_| anyhow!("sim: invalid {} value: {}", flag, v))?;
                    }
                }
            }
            other => return Err(anyhow!("sim: unknown argument: {}", other)),
        }
        i += 1;
    }

    Ok(opts)
}

/// Seeded stand-in for a player: at most one button per frame, biased
/// towards sideways moves and rotations.
#[derive(Debug, Clone)]
pub struct ButtonScript {
    rng: SimpleRng,
}

impl ButtonScript {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed ^ SCRIPT_SALT),
        }
    }

    pub fn next_button(&mut self) -> Option<Button> {
        match self.rng.next_range(100) {
            0..=7 => Some(Button::Left),
            8..=15 => Some(Button::Right),
            16..=21 => Some(Button::RotateRight),
            22..=25 => Some(Button::RotateLeft),
            26..=29 => Some(Button::Down),
            30 => Some(Button::Hold),
            31..=32 => Some(Button::HardDrop),
            _ => None,
        }
    }
}

/// Final state of a simulated run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimReport {
    pub mode: String,
    pub seed: u32,
    pub frames: u32,
    pub elapsed_ms: u64,
    pub phase: String,
    pub outcome: Option<String>,
    pub pieces_locked: u32,
    pub record: HighScore,
    pub new_high_score: bool,
}

/// Run one session to completion or until the frame budget is spent.
///
/// `observer` sees every journal entry with the frame it happened on.
pub fn run_simulation<O>(
    opts: &SimOptions,
    store: &mut dyn HighScoreStore,
    mut observer: O,
) -> SimReport
where
    O: FnMut(u32, &SessionEvent),
{
    let mut session = Session::with_seed(opts.mode, opts.config, opts.seed);
    let mut script = ButtonScript::new(opts.seed);
    session.start();

    let mut frames = 0u32;
    let mut pieces_locked = 0u32;
    let mut buttons: Vec<Button> = Vec::with_capacity(1);

    while frames < opts.frames && session.phase() != SessionPhase::Finished {
        buttons.clear();
        buttons.extend(script.next_button());
        session.update(TICK_MS, &buttons);
        frames += 1;

        for event in session.take_events() {
            if matches!(event, SessionEvent::Locked { .. }) {
                pieces_locked += 1;
            }
            observer(frames, &event);
        }
    }

    let new_high_score = session.record_high_score(store);
    SimReport {
        mode: session.mode().name().to_string(),
        seed: opts.seed,
        frames,
        elapsed_ms: frames as u64 * TICK_MS as u64,
        phase: session.phase().as_str().to_string(),
        outcome: session.outcome().map(|o| o.message().to_string()),
        pieces_locked,
        record: HighScore::from(session.score()),
        new_high_score,
    }
}

/// One-line description of the events worth printing
pub fn describe_event(event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::RowsRemoved {
            count,
            t_spin,
            perfect_clear,
            points,
        } => {
            let mut line = format!("cleared {} row(s) for {} points", count, points);
            if let Some(label) = t_spin.label() {
                line.push_str(&format!(" ({})", label));
            }
            if *perfect_clear {
                line.push_str(" [perfect clear]");
            }
            Some(line)
        }
        SessionEvent::LevelUp(level) => Some(format!("level up -> {}", level)),
        SessionEvent::Garbage(rows) => Some(format!("garbage +{} row(s)", rows)),
        SessionEvent::GameOver(outcome) => Some(format!("game over: {}", outcome.message())),
        SessionEvent::SweepFinished => Some("board swept".to_string()),
        _ => None,
    }
}

//! Headless Cosmono runner (default binary).
//!
//! Runs one seeded session with a scripted player and prints a summary.
//!
//! ```text
//! cosmono-sim [--mode NAME] [--seed N] [--gravity X] [--lock-delay MS]
//!             [--frames N] [--no-hold] [--no-ghost] [--json]
//! ```

use anyhow::Result;

use cosmono::core::MemoryHighScores;
use cosmono::sim::{describe_event, parse_sim_args, run_simulation};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = match parse_sim_args(&args, |key| std::env::var(key).ok()) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("[Sim] {}", e);
            return Err(e);
        }
    };

    if !opts.json {
        println!(
            "[Sim] mode={} seed={} frames={} gravity={} lock_delay={}ms",
            opts.mode.name(),
            opts.seed,
            opts.frames,
            opts.config.gravity_multiplier,
            opts.config.lock_delay_ms
        );
    }

    let mut store = MemoryHighScores::new();
    let quiet = opts.json;
    let report = run_simulation(&opts, &mut store, |frame, event| {
        if quiet {
            return;
        }
        if let Some(line) = describe_event(event) {
            println!("[Sim] frame {:>5}: {}", frame, line);
        }
    });

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let r = &report.record;
    println!(
        "[Sim] finished: phase={} outcome={} after {}ms",
        report.phase,
        report.outcome.as_deref().unwrap_or("-"),
        report.elapsed_ms
    );
    println!(
        "[Sim] score={} level={} lines={} pieces={}",
        r.score_value, r.level, r.lines_cleared, report.pieces_locked
    );
    println!(
        "[Sim] t-spins={} minis={} b2b={} combos={} perfect={} soft={} hard={}",
        r.t_spin, r.t_spin_mini, r.back_to_back, r.combo, r.perfect_clear, r.soft_drop, r.hard_drop
    );
    Ok(())
}

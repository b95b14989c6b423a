//! Cosmono (workspace facade crate).
//!
//! Re-exports the engine crates under `cosmono::{core,types}` and hosts the
//! headless simulator used by the `cosmono-sim` binary.

pub use cosmono_core as core;
pub use cosmono_types as types;

pub mod sim;

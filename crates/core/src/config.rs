//! Session configuration

use serde::{Deserialize, Serialize};

use crate::types::LOCK_DELAY_MS;

/// Plain settings a session is built from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Divides every gravity interval; 2.0 falls twice as fast
    pub gravity_multiplier: f32,
    pub lock_delay_ms: u32,
    pub hold_enabled: bool,
    pub ghost_enabled: bool,
}

impl SessionConfig {
    /// Replace values the session cannot run with by their defaults
    pub fn sanitized(mut self) -> Self {
        if !self.gravity_multiplier.is_finite() || self.gravity_multiplier <= 0.0 {
            self.gravity_multiplier = 1.0;
        }
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            gravity_multiplier: 1.0,
            lock_delay_ms: LOCK_DELAY_MS,
            hold_enabled: true,
            ghost_enabled: true,
        }
    }
}

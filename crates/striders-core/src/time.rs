use std::time::Duration;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::PresetError;

// ---------------------------------------------------------------------------
// SimTime
// ---------------------------------------------------------------------------

/// Integer-nanosecond simulation clock.
///
/// Tracks elapsed simulated time as a monotonically increasing `u64`
/// nanosecond count to avoid floating-point accumulation errors.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
    Resource,
)]
pub struct SimTime {
    nanos: u64,
}

impl SimTime {
    #[must_use]
    pub const fn new() -> Self {
        Self { nanos: 0 }
    }

    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    /// Raw nanosecond count.
    #[must_use]
    pub const fn nanos(&self) -> u64 {
        self.nanos
    }

    /// Elapsed seconds as `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn secs_f64(&self) -> f64 {
        self.nanos as f64 / 1_000_000_000.0
    }

    /// Elapsed seconds as `f32`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn secs_f32(&self) -> f32 {
        self.nanos as f32 / 1_000_000_000.0
    }

    #[must_use]
    pub const fn to_duration(&self) -> Duration {
        Duration::from_nanos(self.nanos)
    }

    /// Advance the clock by `delta_nanos` nanoseconds.
    pub fn advance(&mut self, delta_nanos: u64) {
        self.nanos = self.nanos.saturating_add(delta_nanos);
    }

    /// Advance the clock by `delta_secs` seconds.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn advance_secs(&mut self, delta_secs: f64) {
        self.advance((delta_secs * 1_000_000_000.0) as u64);
    }
}

// ---------------------------------------------------------------------------
// TickConfig
// ---------------------------------------------------------------------------

const fn default_dt() -> f32 {
    0.02
}

/// Fixed tick configuration. All per-tick systems scale by `dt`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Resource)]
pub struct TickConfig {
    /// Tick length in seconds (default: 0.02 = 50 Hz).
    #[serde(default = "default_dt")]
    pub dt: f32,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self { dt: default_dt() }
    }
}

impl TickConfig {
    #[must_use]
    pub const fn new(dt: f32) -> Self {
        Self { dt }
    }

    /// Validate the tick length. Returns Err on non-positive values.
    pub fn validate(&self) -> Result<(), PresetError> {
        if self.dt <= 0.0 {
            return Err(PresetError::NonPositive {
                field: "dt",
                value: self.dt,
            });
        }
        Ok(())
    }

    /// Tick rate in Hz.
    #[must_use]
    pub fn hz(&self) -> f32 {
        1.0 / self.dt
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

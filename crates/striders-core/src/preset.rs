use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::PresetError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_far_distance() -> f32 {
    2.5
}
const fn default_near_distance() -> f32 {
    2.0
}
const fn default_leg_length() -> f32 {
    9.0
}
const fn default_foot_height() -> f32 {
    2.0
}
const fn default_step_height() -> f32 {
    0.5
}
const fn default_short_step_height_modifier() -> f32 {
    0.1
}
const fn default_step_speed() -> f32 {
    1.5
}
const fn default_step_length() -> f32 {
    1.5
}
const fn default_step_threshold() -> f32 {
    0.1
}
const fn default_randomization_offset() -> f32 {
    0.25
}
const fn default_long_step_speed_modifier() -> f32 {
    1.25
}
const fn default_run_speed_threshold() -> f32 {
    0.5
}
const fn default_run_modifier() -> f32 {
    1.5
}
const fn default_height_offset() -> f32 {
    1.0
}
const fn default_movement_speed() -> f32 {
    1.5
}
const fn default_body_weight() -> f32 {
    15.0
}

// ---------------------------------------------------------------------------
// StepPreset
// ---------------------------------------------------------------------------

/// Per-leg stepping tunables.
///
/// A preset is a shared template; each leg receives its own instance with
/// [`StepPreset::randomized`] jitter applied once at rig construction so
/// legs sharing a preset do not fall into lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepPreset {
    /// Destination distance beyond which a step counts as long.
    #[serde(default = "default_far_distance")]
    pub far_distance: f32,

    /// Destination distance beyond which a step counts as short.
    /// Must not exceed `far_distance`.
    #[serde(default = "default_near_distance")]
    pub near_distance: f32,

    /// Reach of the ground probe casts.
    #[serde(default = "default_leg_length")]
    pub leg_length: f32,

    /// Lift of the foot target above the surface, along the hit normal.
    #[serde(default = "default_foot_height")]
    pub foot_height: f32,

    /// Cap on the parabolic arc bump.
    #[serde(default = "default_step_height")]
    pub step_height: f32,

    /// Arc-height scale applied to short steps.
    #[serde(default = "default_short_step_height_modifier")]
    pub short_step_height_modifier: f32,

    /// Base phase rate of a step (1/s).
    #[serde(default = "default_step_speed")]
    pub step_speed: f32,

    /// Overshoot of the destination along the hit-to-target direction.
    #[serde(default = "default_step_length")]
    pub step_length: f32,

    /// Arrival distance: a step ends when the foot is this close.
    #[serde(default = "default_step_threshold")]
    pub step_threshold: f32,

    /// Amplitude of the per-leg jitter applied by [`StepPreset::randomized`].
    #[serde(default = "default_randomization_offset")]
    pub randomization_offset: f32,

    /// Phase-rate scale for long steps.
    #[serde(default = "default_long_step_speed_modifier")]
    pub long_step_speed_modifier: f32,

    /// Center-of-mass speed (per tick) above which the running branch is
    /// active: steps speed up and the opposite-grounded gate is bypassed.
    #[serde(default = "default_run_speed_threshold")]
    pub run_speed_threshold: f32,

    /// Phase-rate scale while running.
    #[serde(default = "default_run_modifier")]
    pub run_modifier: f32,
}

impl Default for StepPreset {
    fn default() -> Self {
        Self {
            far_distance: default_far_distance(),
            near_distance: default_near_distance(),
            leg_length: default_leg_length(),
            foot_height: default_foot_height(),
            step_height: default_step_height(),
            short_step_height_modifier: default_short_step_height_modifier(),
            step_speed: default_step_speed(),
            step_length: default_step_length(),
            step_threshold: default_step_threshold(),
            randomization_offset: default_randomization_offset(),
            long_step_speed_modifier: default_long_step_speed_modifier(),
            run_speed_threshold: default_run_speed_threshold(),
            run_modifier: default_run_modifier(),
        }
    }
}

impl StepPreset {
    /// Validate the preset. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), PresetError> {
        for (field, value) in [
            ("leg_length", self.leg_length),
            ("step_speed", self.step_speed),
            ("step_length", self.step_length),
            ("step_threshold", self.step_threshold),
            ("long_step_speed_modifier", self.long_step_speed_modifier),
            ("run_modifier", self.run_modifier),
        ] {
            if value <= 0.0 {
                return Err(PresetError::NonPositive { field, value });
            }
        }
        for (field, value) in [
            ("far_distance", self.far_distance),
            ("near_distance", self.near_distance),
            ("foot_height", self.foot_height),
            ("step_height", self.step_height),
            ("short_step_height_modifier", self.short_step_height_modifier),
            ("randomization_offset", self.randomization_offset),
            ("run_speed_threshold", self.run_speed_threshold),
        ] {
            if value < 0.0 {
                return Err(PresetError::Negative { field, value });
            }
        }
        if self.near_distance > self.far_distance {
            return Err(PresetError::ThresholdOrder {
                near: self.near_distance,
                far: self.far_distance,
            });
        }
        if self.step_speed < self.step_threshold {
            return Err(PresetError::SpeedBelowArrival {
                speed: self.step_speed,
                threshold: self.step_threshold,
            });
        }
        Ok(())
    }

    /// Load from a TOML file, validating before returning.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, PresetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML string, validating before returning.
    pub fn from_toml(content: &str) -> Result<Self, PresetError> {
        let preset: Self = toml::from_str(content)?;
        preset.validate()?;
        Ok(preset)
    }

    /// Per-leg instance with jitter on step speed and distance thresholds.
    ///
    /// Jittered values are re-clamped so the validation invariants hold by
    /// construction.
    #[must_use]
    pub fn randomized<R: Rng>(&self, rng: &mut R) -> Self {
        let mut jittered = *self;
        if self.randomization_offset > 0.0 {
            let mut jitter =
                |base: f32| base + rng.gen_range(-1.0..1.0_f32) * self.randomization_offset;
            jittered.step_speed = jitter(self.step_speed).max(self.step_threshold);
            jittered.far_distance = jitter(self.far_distance).max(0.0);
            jittered.near_distance = jitter(self.near_distance)
                .clamp(0.0, jittered.far_distance);
        }
        jittered
    }
}

// ---------------------------------------------------------------------------
// BalanceConfig
// ---------------------------------------------------------------------------

/// Body-level stabilization tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceConfig {
    /// Ride height of the body above the averaged foot position.
    #[serde(default = "default_height_offset")]
    pub height_offset: f32,

    /// Commit interpolation rate (units/s for position, slerp factor/s for
    /// rotation).
    #[serde(default = "default_movement_speed")]
    pub movement_speed: f32,

    /// Weight of the body itself in the center-of-mass aggregate.
    #[serde(default = "default_body_weight")]
    pub body_weight: f32,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            height_offset: default_height_offset(),
            movement_speed: default_movement_speed(),
            body_weight: default_body_weight(),
        }
    }
}

impl BalanceConfig {
    /// Validate the config. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), PresetError> {
        for (field, value) in [
            ("movement_speed", self.movement_speed),
            ("body_weight", self.body_weight),
        ] {
            if value <= 0.0 {
                return Err(PresetError::NonPositive { field, value });
            }
        }
        if self.height_offset < 0.0 {
            return Err(PresetError::Negative {
                field: "height_offset",
                value: self.height_offset,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Built-in presets
// ---------------------------------------------------------------------------

/// Named step presets for common creature archetypes.
pub mod presets {
    use super::StepPreset;

    /// Large eight-legged crawler: slow, deliberate, tall strides.
    #[must_use]
    pub fn spider() -> StepPreset {
        StepPreset::default()
    }

    /// Heavy biped: long reach, high clearance, sluggish recovery.
    #[must_use]
    pub fn mech() -> StepPreset {
        StepPreset {
            far_distance: 3.5,
            near_distance: 2.8,
            leg_length: 12.0,
            foot_height: 1.0,
            step_height: 2.0,
            step_speed: 0.9,
            step_length: 2.5,
            long_step_speed_modifier: 1.4,
            run_speed_threshold: 0.8,
            ..StepPreset::default()
        }
    }

    /// Small quick quadruped: short fast steps, low clearance.
    #[must_use]
    pub fn skitter() -> StepPreset {
        StepPreset {
            far_distance: 0.8,
            near_distance: 0.5,
            leg_length: 3.0,
            foot_height: 0.4,
            step_height: 0.3,
            step_speed: 4.0,
            step_length: 0.4,
            step_threshold: 0.05,
            randomization_offset: 0.1,
            run_speed_threshold: 0.2,
            ..StepPreset::default()
        }
    }

    /// Look up a built-in preset by name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<StepPreset> {
        match name {
            "spider" => Some(spider()),
            "mech" => Some(mech()),
            "skitter" => Some(skitter()),
            _ => None,
        }
    }

    /// Names of all built-in presets.
    pub const NAMES: &[&str] = &["spider", "mech", "skitter"];
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

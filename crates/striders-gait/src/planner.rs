//! Per-leg step decisions: footing search, destination, classification.

use nalgebra::Vector3;
use striders_core::preset::StepPreset;
use striders_core::traits::SpatialQuery;
use striders_core::types::{normalize_or_zero, ComSample, GroundHit};

/// World-space probe frame for one leg: where casts start and which way
/// they point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeFrame {
    /// Cast origin (the leg's mount point on the body).
    pub origin: Vector3<f32>,
    /// Body forward.
    pub forward: Vector3<f32>,
    /// Body up.
    pub up: Vector3<f32>,
    /// Away from the opposite leg's mount; zero when the mounts coincide.
    pub outward: Vector3<f32>,
}

/// Classification of a pending step by travel distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// Destination past `near_distance`.
    Short,
    /// Destination past `far_distance`.
    Long,
}

/// Search for footing, trying candidate directions in fixed priority order
/// and short-circuiting on the first hit:
///
/// 1. forward sphere cast,
/// 2. backward ray cast,
/// 3. outward ray cast (away from the opposite leg, half range),
/// 4. downward sphere cast.
///
/// Returns `None` when no direction finds a surface this tick.
pub fn probe(
    sensor: &dyn SpatialQuery,
    frame: &ProbeFrame,
    preset: &StepPreset,
) -> Option<GroundHit> {
    if let Some(hit) = sphere_probe(sensor, &frame.origin, &frame.forward, preset) {
        return Some(hit);
    }
    if let Some(hit) = sensor.cast_ray(&frame.origin, &-frame.forward, preset.leg_length) {
        return Some(hit);
    }
    if frame.outward.norm_squared() > 0.0 {
        if let Some(hit) =
            sensor.cast_ray(&frame.origin, &frame.outward, preset.leg_length * 0.5)
        {
            return Some(hit);
        }
    }
    sphere_probe(sensor, &frame.origin, &-frame.up, preset)
}

/// Sphere cast at the wide radius, falling back to the narrow one.
fn sphere_probe(
    sensor: &dyn SpatialQuery,
    origin: &Vector3<f32>,
    direction: &Vector3<f32>,
    preset: &StepPreset,
) -> Option<GroundHit> {
    sensor
        .cast_sphere(origin, preset.far_distance, direction, preset.leg_length)
        .or_else(|| {
            sensor.cast_sphere(origin, preset.near_distance, direction, preset.leg_length)
        })
}

/// Candidate foot destination for a footing hit.
///
/// The hit point is first shifted by the center-of-mass offset plus its
/// movement direction scaled by current speed — anticipating where the
/// body is heading — then pushed `step_length` further along the
/// target-to-hit direction and lifted off the surface along the hit
/// normal.
#[must_use]
pub fn foot_destination(
    hit: &GroundHit,
    target: &Vector3<f32>,
    com: &ComSample,
    preset: &StepPreset,
) -> Vector3<f32> {
    let adjusted = hit.point + com.offset + com.direction * com.speed;
    adjusted
        + preset.step_length * normalize_or_zero(&(adjusted - target))
        + hit.normal * preset.foot_height
}

/// Decide whether a step is warranted and of which kind.
///
/// The opposite-grounded gate keeps a pair from lifting simultaneously;
/// only the running override (`com` speed above `run_speed_threshold`)
/// bypasses it. The distance gate always applies.
#[must_use]
pub fn classify(
    dist: f32,
    opposite_grounded: bool,
    running: bool,
    preset: &StepPreset,
) -> Option<StepKind> {
    if !(opposite_grounded || running) {
        return None;
    }
    if dist > preset.far_distance {
        Some(StepKind::Long)
    } else if dist > preset.near_distance {
        Some(StepKind::Short)
    } else {
        None
    }
}

/// Phase rate for a step of the given kind.
#[must_use]
pub fn phase_speed(kind: StepKind, running: bool, preset: &StepPreset) -> f32 {
    let base = match kind {
        StepKind::Short => preset.step_speed,
        StepKind::Long => preset.step_speed * preset.long_step_speed_modifier,
    };
    if running {
        base * preset.run_modifier
    } else {
        base
    }
}

/// Arc bump height for a step: short steps stay low, long steps use the
/// full travel distance, both capped by `step_height`.
#[must_use]
pub fn arc_height(kind: StepKind, dist: f32, preset: &StepPreset) -> f32 {
    let raw = match kind {
        StepKind::Short => dist * preset.short_step_height_modifier,
        StepKind::Long => dist,
    };
    raw.clamp(0.0, preset.step_height)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

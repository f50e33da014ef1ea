//! Parabolic step trajectories.

use nalgebra::Vector3;
use striders_core::types::lerp_vec;

/// Point along a symmetric parabolic arc between `start` and `end`.
///
/// The horizontal components interpolate linearly; the vertical component
/// adds a bump `4h·t·(1−t)` on top of the interpolated height — zero at
/// both endpoints, peaking at `h` for `t = 0.5`. The bump is along world
/// up.
#[must_use]
pub fn parabola(start: &Vector3<f32>, end: &Vector3<f32>, height: f32, t: f32) -> Vector3<f32> {
    let bump = 4.0 * height * t * (1.0 - t);
    lerp_vec(start, end, t) + Vector3::new(0.0, bump, 0.0)
}

/// One tick of arc progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcStep {
    /// Foot position for this tick.
    pub position: Vector3<f32>,
    /// Whether the step has landed.
    pub arrived: bool,
}

/// An in-flight step: frozen endpoints, phase advanced each tick.
///
/// Phase is clamped to `[0, 1]`, so the trajectory can never run past the
/// destination; arrival is declared at phase 1 or once the remaining
/// distance drops below the arrival threshold, whichever comes first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepArc {
    start: Vector3<f32>,
    dest: Vector3<f32>,
    height: f32,
    speed: f32,
    phase: f32,
}

impl StepArc {
    #[must_use]
    pub fn new(start: Vector3<f32>, dest: Vector3<f32>, height: f32, speed: f32) -> Self {
        Self {
            start,
            dest,
            height,
            speed,
            phase: 0.0,
        }
    }

    #[must_use]
    pub const fn destination(&self) -> Vector3<f32> {
        self.dest
    }

    #[must_use]
    pub const fn phase(&self) -> f32 {
        self.phase
    }

    /// Advance by `dt` and produce the next foot position.
    pub fn advance(&mut self, dt: f32, arrive_dist: f32) -> ArcStep {
        self.phase = (self.phase + dt * self.speed).min(1.0);
        let position = parabola(&self.start, &self.dest, self.height, self.phase);
        let arrived = self.phase >= 1.0 || (self.dest - position).norm() < arrive_dist;
        ArcStep { position, arrived }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

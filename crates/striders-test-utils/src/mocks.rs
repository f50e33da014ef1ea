//! Analytic [`SpatialQuery`] test doubles.
//!
//! These answer casts in closed form so tests are exact and never depend on
//! a physics backend. Surfaces are one-sided: only casts approaching from
//! above can hit.

use nalgebra::Vector3;
use striders_core::traits::SpatialQuery;
use striders_core::types::GroundHit;

// ---------------------------------------------------------------------------
// FlatGround
// ---------------------------------------------------------------------------

/// Infinite horizontal plane at a fixed height.
#[derive(Debug, Clone, Copy)]
pub struct FlatGround {
    pub y: f32,
}

impl FlatGround {
    #[must_use]
    pub const fn new(y: f32) -> Self {
        Self { y }
    }

    fn plane_cast(
        &self,
        origin: &Vector3<f32>,
        direction: &Vector3<f32>,
        max_dist: f32,
        clearance: f32,
    ) -> Option<GroundHit> {
        let surface = self.y + clearance;
        // Already touching: contact directly beneath the origin.
        if origin.y <= surface {
            return Some(GroundHit::new(
                Vector3::new(origin.x, self.y, origin.z),
                Vector3::y(),
                0.0,
            ));
        }
        if direction.y >= -1.0e-6 {
            return None;
        }
        let t = (surface - origin.y) / direction.y;
        if t < 0.0 || t > max_dist {
            return None;
        }
        let center = origin + direction * t;
        Some(GroundHit::new(
            Vector3::new(center.x, self.y, center.z),
            Vector3::y(),
            t,
        ))
    }
}

impl SpatialQuery for FlatGround {
    fn cast_ray(
        &self,
        origin: &Vector3<f32>,
        direction: &Vector3<f32>,
        max_dist: f32,
    ) -> Option<GroundHit> {
        self.plane_cast(origin, direction, max_dist, 0.0)
    }

    fn cast_sphere(
        &self,
        origin: &Vector3<f32>,
        radius: f32,
        direction: &Vector3<f32>,
        max_dist: f32,
    ) -> Option<GroundHit> {
        self.plane_cast(origin, direction, max_dist, radius)
    }
}

// ---------------------------------------------------------------------------
// SteppedGround
// ---------------------------------------------------------------------------

/// Flat treads of varying height, banded along the x axis.
///
/// Tread `i` spans `[i * period, (i + 1) * period)` and repeats cyclically.
/// Only near-vertical casts can hit; lateral probes miss, which exercises
/// the planner's direction fallback.
#[derive(Debug, Clone)]
pub struct SteppedGround {
    pub period: f32,
    pub heights: Vec<f32>,
}

impl SteppedGround {
    #[must_use]
    pub fn new(period: f32, heights: Vec<f32>) -> Self {
        assert!(period > 0.0 && !heights.is_empty());
        Self { period, heights }
    }

    /// Tread height beneath an x coordinate.
    #[must_use]
    pub fn height_at(&self, x: f32) -> f32 {
        let band = (x / self.period).floor() as i64;
        let idx = band.rem_euclid(self.heights.len() as i64) as usize;
        self.heights[idx]
    }

    fn tread_cast(
        &self,
        origin: &Vector3<f32>,
        direction: &Vector3<f32>,
        max_dist: f32,
        clearance: f32,
    ) -> Option<GroundHit> {
        if direction.y > -0.9 {
            return None;
        }
        let ground = self.height_at(origin.x);
        let surface = ground + clearance;
        if origin.y <= surface {
            return Some(GroundHit::new(
                Vector3::new(origin.x, ground, origin.z),
                Vector3::y(),
                0.0,
            ));
        }
        let t = (surface - origin.y) / direction.y;
        if t < 0.0 || t > max_dist {
            return None;
        }
        let center = origin + direction * t;
        Some(GroundHit::new(
            Vector3::new(center.x, self.height_at(center.x), center.z),
            Vector3::y(),
            t,
        ))
    }
}

impl SpatialQuery for SteppedGround {
    fn cast_ray(
        &self,
        origin: &Vector3<f32>,
        direction: &Vector3<f32>,
        max_dist: f32,
    ) -> Option<GroundHit> {
        self.tread_cast(origin, direction, max_dist, 0.0)
    }

    fn cast_sphere(
        &self,
        origin: &Vector3<f32>,
        radius: f32,
        direction: &Vector3<f32>,
        max_dist: f32,
    ) -> Option<GroundHit> {
        self.tread_cast(origin, direction, max_dist, radius)
    }
}

// ---------------------------------------------------------------------------
// NoGround
// ---------------------------------------------------------------------------

/// Never hits anything. Exercises the "no footing found" paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGround;

impl SpatialQuery for NoGround {
    fn cast_ray(
        &self,
        _origin: &Vector3<f32>,
        _direction: &Vector3<f32>,
        _max_dist: f32,
    ) -> Option<GroundHit> {
        None
    }

    fn cast_sphere(
        &self,
        _origin: &Vector3<f32>,
        _radius: f32,
        _direction: &Vector3<f32>,
        _max_dist: f32,
    ) -> Option<GroundHit> {
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Capability traits at the crate seams.

use bevy::prelude::Resource;
use nalgebra::Vector3;

use crate::types::GroundHit;

/// Spatial query service: directional casts against walkable surfaces.
///
/// Implementations restrict hits to a ground collision layer; anything
/// outside it is invisible to the walker. A miss is a normal result — the
/// caller tries its next candidate direction or skips the correction this
/// tick.
pub trait SpatialQuery {
    /// Cast a thin ray. Returns the first surface hit within `max_dist`.
    fn cast_ray(
        &self,
        origin: &Vector3<f32>,
        direction: &Vector3<f32>,
        max_dist: f32,
    ) -> Option<GroundHit>;

    /// Sweep a sphere of `radius`. Tolerant search over an area; returns
    /// the first surface contact within `max_dist` of travel.
    fn cast_sphere(
        &self,
        origin: &Vector3<f32>,
        radius: f32,
        direction: &Vector3<f32>,
        max_dist: f32,
    ) -> Option<GroundHit>;
}

impl<T: SpatialQuery + ?Sized> SpatialQuery for &T {
    fn cast_ray(
        &self,
        origin: &Vector3<f32>,
        direction: &Vector3<f32>,
        max_dist: f32,
    ) -> Option<GroundHit> {
        (**self).cast_ray(origin, direction, max_dist)
    }

    fn cast_sphere(
        &self,
        origin: &Vector3<f32>,
        radius: f32,
        direction: &Vector3<f32>,
        max_dist: f32,
    ) -> Option<GroundHit> {
        (**self).cast_sphere(origin, radius, direction, max_dist)
    }
}

/// The ground query shared by every system in the app.
///
/// Read by many systems, written by none after insertion.
#[derive(Resource)]
pub struct GroundQuery(pub Box<dyn SpatialQuery + Send + Sync>);

impl GroundQuery {
    #[must_use]
    pub fn new(query: impl SpatialQuery + Send + Sync + 'static) -> Self {
        Self(Box::new(query))
    }
}

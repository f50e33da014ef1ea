//! Rapier-backed ground sensing.
//!
//! [`GroundWorld`] owns a static collider set and a query pipeline, and
//! implements [`SpatialQuery`] with a thin ray cast and a ball shape cast.
//! Walkable surfaces live in a dedicated collision group — the ground
//! mask — and every query filters to it, so decorative colliders are
//! invisible to foot placement.

use nalgebra::{DMatrix, Isometry3, Point3, Vector3};
use rapier3d::parry::query::ShapeCastOptions;
use rapier3d::prelude::*;

use striders_core::traits::SpatialQuery;
use striders_core::types::GroundHit;

/// Collision group for walkable surfaces.
const GROUND_GROUP: Group = Group::GROUP_1;
/// Collision group for everything else (ignored by ground queries).
const DECOR_GROUP: Group = Group::GROUP_2;

/// A static query world: ground colliders + query pipeline.
///
/// Build it once with the `with_*` methods, then share it read-only; casts
/// never mutate the world.
pub struct GroundWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    query: QueryPipeline,
}

impl GroundWorld {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            query: QueryPipeline::new(),
        }
    }

    /// Add a large flat walkable plane with its top surface at `y`.
    #[must_use]
    pub fn with_flat(mut self, y: f32) -> Self {
        let collider = ColliderBuilder::cuboid(500.0, 0.5, 500.0)
            .translation(vector![0.0, y - 0.5, 0.0])
            .collision_groups(InteractionGroups::new(GROUND_GROUP, Group::ALL))
            .build();
        self.colliders.insert(collider);
        self.refresh()
    }

    /// Add a walkable plane tilted `angle` radians around the x axis, its
    /// top surface sitting near height `y` above the origin.
    #[must_use]
    pub fn with_slope(mut self, y: f32, angle: f32) -> Self {
        let collider = ColliderBuilder::cuboid(500.0, 0.5, 500.0)
            .position(Isometry3::new(
                vector![0.0, y - 0.5, 0.0],
                vector![angle, 0.0, 0.0],
            ))
            .collision_groups(InteractionGroups::new(GROUND_GROUP, Group::ALL))
            .build();
        self.colliders.insert(collider);
        self.refresh()
    }

    /// Add a walkable axis-aligned box (for steps and platforms).
    /// `half_extents` are half sizes; `center` is the box center.
    #[must_use]
    pub fn with_box(mut self, center: Vector3<f32>, half_extents: Vector3<f32>) -> Self {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(center)
            .collision_groups(InteractionGroups::new(GROUND_GROUP, Group::ALL))
            .build();
        self.colliders.insert(collider);
        self.refresh()
    }

    /// Add a walkable heightfield. `heights` is a row-major grid sampled
    /// over an `extent.x` × `extent.z` patch centered at the origin and
    /// scaled vertically by `extent.y`.
    #[must_use]
    pub fn with_heightfield(mut self, heights: &[Vec<f32>], extent: Vector3<f32>) -> Self {
        let nrows = heights.len();
        let ncols = heights.first().map_or(0, Vec::len);
        let grid = DMatrix::from_fn(nrows, ncols, |r, c| heights[r][c]);
        let collider = ColliderBuilder::heightfield(grid, extent)
            .collision_groups(InteractionGroups::new(GROUND_GROUP, Group::ALL))
            .build();
        self.colliders.insert(collider);
        self.refresh()
    }

    /// Add a non-walkable collider; ground queries must skip it.
    #[must_use]
    pub fn with_decor_box(mut self, center: Vector3<f32>, half_extents: Vector3<f32>) -> Self {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(center)
            .collision_groups(InteractionGroups::new(DECOR_GROUP, Group::ALL))
            .build();
        self.colliders.insert(collider);
        self.refresh()
    }

    fn refresh(mut self) -> Self {
        self.query.update(&self.colliders);
        self
    }

    /// Queries cast from this filter: members of no group, hitting only
    /// the ground group.
    fn ground_filter(&self) -> QueryFilter<'_> {
        QueryFilter::default().groups(InteractionGroups::new(Group::ALL, GROUND_GROUP))
    }
}

impl Default for GroundWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialQuery for GroundWorld {
    fn cast_ray(
        &self,
        origin: &Vector3<f32>,
        direction: &Vector3<f32>,
        max_dist: f32,
    ) -> Option<GroundHit> {
        let ray = Ray::new(Point3::from(*origin), *direction);
        let (_, hit) = self.query.cast_ray_and_get_normal(
            &self.bodies,
            &self.colliders,
            &ray,
            max_dist,
            true,
            self.ground_filter(),
        )?;
        Some(GroundHit::new(
            ray.point_at(hit.time_of_impact).coords,
            hit.normal,
            hit.time_of_impact,
        ))
    }

    fn cast_sphere(
        &self,
        origin: &Vector3<f32>,
        radius: f32,
        direction: &Vector3<f32>,
        max_dist: f32,
    ) -> Option<GroundHit> {
        let shape = Ball::new(radius.max(1.0e-4));
        let pos = Isometry3::translation(origin.x, origin.y, origin.z);
        let (_, hit) = self.query.cast_shape(
            &self.bodies,
            &self.colliders,
            &pos,
            direction,
            &shape,
            ShapeCastOptions::with_max_time_of_impact(max_dist),
            self.ground_filter(),
        )?;
        // Surface normal, oriented against the cast direction.
        let mut normal = *hit.normal2;
        if normal.dot(direction) > 0.0 {
            normal = -normal;
        }
        // Contact point: one radius from the sphere center at impact time,
        // along the surface normal.
        let center = origin + direction * hit.time_of_impact;
        Some(GroundHit::new(
            center - normal * radius,
            normal,
            hit.time_of_impact,
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

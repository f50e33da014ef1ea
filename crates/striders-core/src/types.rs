use bevy::ecs::component::Component;
use nalgebra::{UnitQuaternion, Vector3};

// ---------------------------------------------------------------------------
// Ids
// ---------------------------------------------------------------------------

/// Index of a leg within its rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LegId(pub usize);

impl std::fmt::Display for LegId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "leg{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// GroundHit
// ---------------------------------------------------------------------------

/// A surface point found by a spatial query.
///
/// Absence of a hit is normal control flow (the probe tries the next
/// candidate direction), so queries return `Option<GroundHit>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundHit {
    /// Contact point in world space.
    pub point: Vector3<f32>,
    /// Surface normal in world space, unit length, facing the cast origin.
    pub normal: Vector3<f32>,
    /// Travel distance along the cast direction.
    pub distance: f32,
}

impl GroundHit {
    #[must_use]
    pub const fn new(point: Vector3<f32>, normal: Vector3<f32>, distance: f32) -> Self {
        Self {
            point,
            normal,
            distance,
        }
    }
}

// ---------------------------------------------------------------------------
// Pose
// ---------------------------------------------------------------------------

/// World-space position + orientation, owned explicitly by each entity and
/// passed by reference into update functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vector3<f32>,
    pub rotation: UnitQuaternion<f32>,
}

impl Pose {
    #[must_use]
    pub fn identity() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
        }
    }

    #[must_use]
    pub fn from_position(position: Vector3<f32>) -> Self {
        Self {
            position,
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Local +Z in world space.
    #[must_use]
    pub fn forward(&self) -> Vector3<f32> {
        self.rotation * Vector3::z()
    }

    /// Local +Y in world space.
    #[must_use]
    pub fn up(&self) -> Vector3<f32> {
        self.rotation * Vector3::y()
    }

    /// Transform a body-local offset into world space.
    #[must_use]
    pub fn transform_point(&self, local: &Vector3<f32>) -> Vector3<f32> {
        self.position + self.rotation * local
    }

    /// Translate toward `target` at constant rate, never overshooting.
    pub fn approach_position(&mut self, target: &Vector3<f32>, max_delta: f32) {
        self.position = move_towards(&self.position, target, max_delta);
    }

    /// Slerp toward `target` by `t`, clamped to [0, 1].
    pub fn approach_rotation(&mut self, target: &UnitQuaternion<f32>, t: f32) {
        self.rotation = self.rotation.slerp(target, t.clamp(0.0, 1.0));
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

// ---------------------------------------------------------------------------
// ComSample
// ---------------------------------------------------------------------------

/// One tick's committed center-of-mass reading.
///
/// Written by the tracking phase, read by step planning (predictive foot
/// placement) and body stabilization (balance correction). Single writer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComSample {
    /// Vector from the body root to the tracked center of mass.
    pub offset: Vector3<f32>,
    /// Normalized movement direction; zero when stationary.
    pub direction: Vector3<f32>,
    /// Displacement since the previous tick.
    pub speed: f32,
}

impl Default for ComSample {
    fn default() -> Self {
        Self {
            offset: Vector3::zeros(),
            direction: Vector3::zeros(),
            speed: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared components
// ---------------------------------------------------------------------------

/// The walker body's actual pose plus one tick of position history.
///
/// Mutated only in [`StriderSet::Commit`](crate::StriderSet); every earlier
/// phase sees the previous tick's committed value.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    pub pose: Pose,
    /// Position at the end of the previous commit phase.
    pub previous_position: Vector3<f32>,
}

impl BodyPose {
    #[must_use]
    pub fn new(pose: Pose) -> Self {
        Self {
            pose,
            previous_position: pose.position,
        }
    }

    /// Normalized movement since last tick; zero when stationary.
    #[must_use]
    pub fn movement_direction(&self) -> Vector3<f32> {
        normalize_or_zero(&(self.pose.position - self.previous_position))
    }
}

impl Default for BodyPose {
    fn default() -> Self {
        Self::new(Pose::identity())
    }
}

/// The latest committed [`ComSample`] for a walker.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct ComState(pub ComSample);

// ---------------------------------------------------------------------------
// Vector helpers
// ---------------------------------------------------------------------------

/// Move `current` toward `target` by at most `max_delta`, never overshooting.
#[must_use]
pub fn move_towards(
    current: &Vector3<f32>,
    target: &Vector3<f32>,
    max_delta: f32,
) -> Vector3<f32> {
    let delta = target - current;
    let dist = delta.norm();
    if dist <= max_delta || dist <= f32::EPSILON {
        *target
    } else {
        current + delta * (max_delta / dist)
    }
}

/// Normalize, or return zero for degenerate vectors.
#[must_use]
pub fn normalize_or_zero(v: &Vector3<f32>) -> Vector3<f32> {
    v.try_normalize(1.0e-6).unwrap_or_else(Vector3::zeros)
}

/// Component-wise linear interpolation.
#[must_use]
pub fn lerp_vec(a: &Vector3<f32>, b: &Vector3<f32>, t: f32) -> Vector3<f32> {
    a + (b - a) * t
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn move_towards_clamps_to_rate() {
        let from = Vector3::zeros();
        let to = Vector3::new(10.0, 0.0, 0.0);
        let next = move_towards(&from, &to, 1.5);
        assert_relative_eq!(next.x, 1.5, epsilon = 1e-6);
        assert_relative_eq!(next.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn move_towards_never_overshoots() {
        let from = Vector3::new(0.9, 0.0, 0.0);
        let to = Vector3::new(1.0, 0.0, 0.0);
        let next = move_towards(&from, &to, 5.0);
        assert_eq!(next, to);
    }

    #[test]
    fn move_towards_is_monotonic() {
        let target = Vector3::new(3.0, -2.0, 7.0);
        let mut pos = Vector3::zeros();
        let mut prev_dist = (target - pos).norm();
        for _ in 0..100 {
            pos = move_towards(&pos, &target, 0.25);
            let dist = (target - pos).norm();
            assert!(dist <= prev_dist);
            prev_dist = dist;
        }
        assert_eq!(pos, target);
    }

    #[test]
    fn normalize_or_zero_handles_degenerate() {
        assert_eq!(normalize_or_zero(&Vector3::zeros()), Vector3::zeros());
        let n = normalize_or_zero(&Vector3::new(0.0, 3.0, 0.0));
        assert_relative_eq!(n.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn pose_axes_follow_rotation() {
        let pose = Pose {
            position: Vector3::zeros(),
            rotation: UnitQuaternion::from_axis_angle(
                &Vector3::y_axis(),
                std::f32::consts::FRAC_PI_2,
            ),
        };
        // Quarter turn around +Y sends +Z to +X.
        assert_relative_eq!(pose.forward().x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(pose.up().y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn pose_transform_point_applies_rotation_then_translation() {
        let pose = Pose {
            position: Vector3::new(1.0, 2.0, 3.0),
            rotation: UnitQuaternion::from_axis_angle(
                &Vector3::y_axis(),
                std::f32::consts::PI,
            ),
        };
        let p = pose.transform_point(&Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn body_pose_movement_direction() {
        let mut body = BodyPose::new(Pose::identity());
        assert_eq!(body.movement_direction(), Vector3::zeros());

        body.pose.position = Vector3::new(2.0, 0.0, 0.0);
        let dir = body.movement_direction();
        assert_relative_eq!(dir.x, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn com_sample_default_is_zero() {
        let s = ComSample::default();
        assert_eq!(s.offset, Vector3::zeros());
        assert_eq!(s.speed, 0.0);
    }

    #[test]
    fn leg_id_display() {
        assert_eq!(LegId(3).to_string(), "leg3");
    }
}

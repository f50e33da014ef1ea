//! Body stabilization: desired-pose computation and commit interpolation.

use nalgebra::{UnitQuaternion, Vector3};
use striders_core::error::PresetError;
use striders_core::preset::BalanceConfig;
use striders_core::traits::SpatialQuery;
use striders_core::types::{normalize_or_zero, BodyPose, ComSample, Pose};
use striders_gait::LegRig;

/// Aggregates leg targets and ground normals into a desired body pose and
/// chases it at a constant rate.
///
/// The two halves run in different tick phases: [`desired_pose`] during
/// pose computation, [`commit`] strictly afterwards. The body therefore
/// lags smoothly behind leg placement instead of snapping.
///
/// [`desired_pose`]: BodyStabilizer::desired_pose
/// [`commit`]: BodyStabilizer::commit
#[derive(Debug, Clone)]
pub struct BodyStabilizer {
    pub config: BalanceConfig,
}

impl BodyStabilizer {
    /// Build a stabilizer, validating the config.
    pub fn new(config: BalanceConfig) -> Result<Self, PresetError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Desired body pose for this tick, or `None` when every leg is
    /// excluded from averaging.
    #[must_use]
    pub fn desired_pose(
        &self,
        rig: &LegRig,
        body: &BodyPose,
        com: &ComSample,
        sensor: &dyn SpatialQuery,
    ) -> Option<Pose> {
        let mut sum_pos = Vector3::zeros();
        let mut sum_up = Vector3::zeros();
        let mut count = 0u32;
        for leg in rig.legs() {
            if leg.skip_for_average {
                continue;
            }
            sum_pos += leg.target();
            sum_up += normalize_or_zero(&(body.pose.position - leg.target()));
            count += 1;
        }
        if count == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let mut position = sum_pos / count as f32;
        let up = match normalize_or_zero(&sum_up) {
            v if v == Vector3::zeros() => Vector3::y(),
            v => v,
        };

        // Ride height: follow the surface normal when ground is within the
        // height offset, otherwise lift vertically.
        let lift = self.config.height_offset;
        match sensor.cast_ray(&body.pose.position, &-body.pose.up(), lift) {
            Some(hit) => position += hit.normal * lift,
            None => position += Vector3::y() * lift,
        }
        position += com.offset;

        let rotation = look_rotation(
            &body.movement_direction(),
            &up,
            &body.pose.forward(),
            &body.pose.rotation,
        );
        Some(Pose { position, rotation })
    }

    /// Move the actual pose toward `desired` and record position history.
    pub fn commit(&self, body: &mut BodyPose, desired: &Pose, dt: f32) {
        let before = body.pose.position;
        let rate = self.config.movement_speed * dt;
        body.pose.approach_position(&desired.position, rate);
        body.pose.approach_rotation(&desired.rotation, rate);
        // History holds the pre-commit position, so next tick's movement
        // direction reflects this commit's actual displacement.
        body.previous_position = before;
    }
}

/// Rotation looking along `dir` with the given up vector, falling back to
/// `fallback_dir` when stationary and to `current` when the frame is
/// degenerate.
fn look_rotation(
    dir: &Vector3<f32>,
    up: &Vector3<f32>,
    fallback_dir: &Vector3<f32>,
    current: &UnitQuaternion<f32>,
) -> UnitQuaternion<f32> {
    let dir = if dir.norm_squared() > 1.0e-8 {
        *dir
    } else {
        *fallback_dir
    };
    if dir.norm_squared() < 1.0e-8 || dir.cross(up).norm_squared() < 1.0e-8 {
        return *current;
    }
    UnitQuaternion::face_towards(&dir, up)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

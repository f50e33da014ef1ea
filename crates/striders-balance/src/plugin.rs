//! Bevy ECS integration for balancing.
//!
//! Three systems, one per tick phase: COM tracking in
//! [`StriderSet::Track`], desired-pose computation in
//! [`StriderSet::Pose`], and the pose commit in [`StriderSet::Commit`].

use bevy::prelude::*;

use striders_core::time::TickConfig;
use striders_core::traits::GroundQuery;
use striders_core::types::{BodyPose, ComState, Pose};
use striders_core::StriderSet;
use striders_gait::WalkerRig;

use crate::body::BodyStabilizer;
use crate::com::ComTracker;

/// Adds center-of-mass tracking and body stabilization to an app.
pub struct BalancePlugin;

impl Plugin for BalancePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, com_track_system.in_set(StriderSet::Track))
            .add_systems(Update, body_pose_system.in_set(StriderSet::Pose))
            .add_systems(Update, body_commit_system.in_set(StriderSet::Commit));
    }
}

/// A walker's center-of-mass tracker.
#[derive(Component, Debug)]
pub struct WalkerCom(pub ComTracker);

/// A walker's body stabilizer.
#[derive(Component, Debug)]
pub struct Stabilizer(pub BodyStabilizer);

/// The desired body pose computed this tick, consumed by the commit.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct DesiredBodyPose(pub Pose);

/// Recompute each walker's center of mass and commit the sample.
pub fn com_track_system(
    mut walkers: Query<(&BodyPose, &WalkerRig, &mut WalkerCom, &mut ComState)>,
) {
    for (body, rig, mut tracker, mut state) in &mut walkers {
        let root = body.pose.position;
        state.0 = tracker.0.update(&root, |leg| {
            rig.0.get(leg).map_or(root, |l| l.target())
        });
    }
}

/// Compute each walker's desired body pose from its legs and COM.
#[allow(clippy::needless_pass_by_value)]
pub fn body_pose_system(
    ground: Option<Res<GroundQuery>>,
    mut walkers: Query<(&BodyPose, &WalkerRig, &ComState, &Stabilizer, &mut DesiredBodyPose)>,
) {
    let Some(ground) = ground else {
        return;
    };
    for (body, rig, com, stabilizer, mut desired) in &mut walkers {
        if let Some(pose) =
            stabilizer
                .0
                .desired_pose(&rig.0, body, &com.0, ground.0.as_ref())
        {
            desired.0 = pose;
        }
    }
}

/// Interpolate each walker's actual pose toward its desired pose.
#[allow(clippy::needless_pass_by_value)]
pub fn body_commit_system(
    tick: Res<TickConfig>,
    mut walkers: Query<(&mut BodyPose, &DesiredBodyPose, &Stabilizer)>,
) {
    for (mut body, desired, stabilizer) in &mut walkers {
        stabilizer.0.commit(&mut body, &desired.0, tick.dt);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Headless scene construction.

use bevy::prelude::*;
use nalgebra::Vector3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use striders_balance::{BodyStabilizer, ComTracker, DesiredBodyPose, Stabilizer, WalkerCom, WeightNode};
use striders_core::error::{RigError, StridersError};
use striders_core::preset::{BalanceConfig, StepPreset};
use striders_core::time::TickConfig;
use striders_core::traits::{GroundQuery, SpatialQuery};
use striders_core::types::{BodyPose, ComState, LegId, Pose};
use striders_gait::{Leg, LegRig, WalkerRig};

use crate::StridersSimPlugin;

/// Builds a headless app with one walker entity, validated and settled.
pub struct WalkerBuilder {
    preset: StepPreset,
    balance: BalanceConfig,
    tick: TickConfig,
    mounts: Vec<Vector3<f32>>,
    pairs: Vec<(usize, usize)>,
    body: Pose,
    seed: u64,
    ground: Option<Box<dyn SpatialQuery + Send + Sync>>,
}

impl WalkerBuilder {
    /// Four legs at `(±spacing, 0, ±spacing)`, laterally paired, body
    /// centered at half the default leg length.
    #[must_use]
    pub fn quad(spacing: f32) -> Self {
        let mounts = vec![
            Vector3::new(spacing, 0.0, spacing),
            Vector3::new(-spacing, 0.0, spacing),
            Vector3::new(spacing, 0.0, -spacing),
            Vector3::new(-spacing, 0.0, -spacing),
        ];
        Self::with_layout(mounts, vec![(0, 1), (2, 3)])
    }

    /// Six legs in three lateral pairs (front, middle, rear).
    #[must_use]
    pub fn hex(spacing: f32) -> Self {
        let mounts = vec![
            Vector3::new(spacing, 0.0, spacing),
            Vector3::new(-spacing, 0.0, spacing),
            Vector3::new(spacing, 0.0, 0.0),
            Vector3::new(-spacing, 0.0, 0.0),
            Vector3::new(spacing, 0.0, -spacing),
            Vector3::new(-spacing, 0.0, -spacing),
        ];
        Self::with_layout(mounts, vec![(0, 1), (2, 3), (4, 5)])
    }

    /// Arbitrary mount layout and pairing.
    #[must_use]
    pub fn with_layout(mounts: Vec<Vector3<f32>>, pairs: Vec<(usize, usize)>) -> Self {
        let preset = StepPreset::default();
        let body = Pose::from_position(Vector3::new(0.0, preset.leg_length * 0.5, 0.0));
        Self {
            preset,
            balance: BalanceConfig::default(),
            tick: TickConfig::default(),
            mounts,
            pairs,
            body,
            seed: 0,
            ground: None,
        }
    }

    #[must_use]
    pub fn with_preset(mut self, preset: StepPreset) -> Self {
        self.preset = preset;
        self
    }

    #[must_use]
    pub fn with_balance(mut self, balance: BalanceConfig) -> Self {
        self.balance = balance;
        self
    }

    #[must_use]
    pub fn with_tick(mut self, tick: TickConfig) -> Self {
        self.tick = tick;
        self
    }

    #[must_use]
    pub fn with_body_pose(mut self, body: Pose) -> Self {
        self.body = body;
        self
    }

    /// Seed for the per-leg preset jitter.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_ground(mut self, ground: impl SpatialQuery + Send + Sync + 'static) -> Self {
        self.ground = Some(Box::new(ground));
        self
    }

    /// Validate everything, settle the legs, and assemble the app.
    pub fn build(self) -> Result<WalkerScene, StridersError> {
        self.preset.validate()?;
        self.balance.validate()?;
        self.tick.validate()?;
        let ground = self.ground.ok_or(RigError::MissingGround)?;

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let legs: Vec<Leg> = self
            .mounts
            .iter()
            .enumerate()
            .map(|(i, &mount)| Leg::new(LegId(i), mount, self.preset.randomized(&mut rng)))
            .collect();
        let nodes: Vec<WeightNode> = legs
            .iter()
            .map(|leg| WeightNode::new(leg.id(), 1.0))
            .collect();
        let mut rig = LegRig::paired(legs, &self.pairs)?;
        rig.settle(&*ground, &self.body);

        let tracker = ComTracker::new(self.balance.body_weight, nodes)?;
        let stabilizer = BodyStabilizer::new(self.balance)?;

        let mut app = App::new();
        app.add_plugins(StridersSimPlugin);
        app.insert_resource(self.tick);
        app.insert_resource(GroundQuery(ground));

        let walker = app
            .world_mut()
            .spawn((
                BodyPose::new(self.body),
                ComState::default(),
                WalkerRig(rig),
                WalkerCom(tracker),
                Stabilizer(stabilizer),
                DesiredBodyPose(self.body),
            ))
            .id();

        Ok(WalkerScene { app, walker })
    }
}

/// A built scene: the app plus its walker entity.
pub struct WalkerScene {
    pub app: App,
    pub walker: Entity,
}

impl WalkerScene {
    /// Advance one tick.
    pub fn tick(&mut self) {
        self.app.update();
    }

    /// Advance `ticks` ticks.
    pub fn run(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.app.update();
        }
    }

    /// Displace the body, the way an external controller or physics push
    /// would between ticks.
    pub fn nudge_body(&mut self, delta: Vector3<f32>) {
        if let Some(mut body) = self.app.world_mut().get_mut::<BodyPose>(self.walker) {
            body.pose.position += delta;
        }
    }

    #[must_use]
    pub fn rig(&self) -> Option<&LegRig> {
        self.app
            .world()
            .get::<WalkerRig>(self.walker)
            .map(|rig| &rig.0)
    }

    #[must_use]
    pub fn body(&self) -> Option<BodyPose> {
        self.app.world().get::<BodyPose>(self.walker).copied()
    }

    #[must_use]
    pub fn stats(&self) -> crate::WalkStats {
        self.app.world().resource::<crate::WalkStats>().clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

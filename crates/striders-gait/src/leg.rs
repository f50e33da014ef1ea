//! Legs and the paired rig.

use bevy::prelude::Event;
use nalgebra::Vector3;
use striders_core::error::RigError;
use striders_core::preset::StepPreset;
use striders_core::traits::SpatialQuery;
use striders_core::types::{normalize_or_zero, ComSample, LegId, Pose};

use crate::arc::StepArc;
use crate::planner::{
    arc_height, classify, foot_destination, phase_speed, probe, ProbeFrame, StepKind,
};

// ---------------------------------------------------------------------------
// Leg
// ---------------------------------------------------------------------------

/// One leg's identity, tunables, and mutable stepping state.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    id: LegId,
    /// Mount point in body space; probes originate here.
    pub mount_offset: Vector3<f32>,
    /// This leg's (jittered) tunables.
    pub preset: StepPreset,
    /// Exclude from the body-stabilizer averages (decorative legs).
    pub skip_for_average: bool,

    target: Vector3<f32>,
    normal: Vector3<f32>,
    grounded: bool,
    arc: Option<StepArc>,
}

impl Leg {
    #[must_use]
    pub fn new(id: LegId, mount_offset: Vector3<f32>, preset: StepPreset) -> Self {
        Self {
            id,
            mount_offset,
            preset,
            skip_for_average: false,
            target: mount_offset,
            normal: Vector3::y(),
            grounded: true,
            arc: None,
        }
    }

    #[must_use]
    pub fn with_skip_for_average(mut self, skip: bool) -> Self {
        self.skip_for_average = skip;
        self
    }

    #[must_use]
    pub const fn id(&self) -> LegId {
        self.id
    }

    /// Current foot target in world space.
    #[must_use]
    pub const fn target(&self) -> Vector3<f32> {
        self.target
    }

    /// Surface normal under the foot (up vector of the foot target).
    #[must_use]
    pub const fn normal(&self) -> Vector3<f32> {
        self.normal
    }

    #[must_use]
    pub const fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Destination of the in-flight step, if any.
    #[must_use]
    pub fn step_destination(&self) -> Option<Vector3<f32>> {
        self.arc.as_ref().map(StepArc::destination)
    }
}

// ---------------------------------------------------------------------------
// StepEvent
// ---------------------------------------------------------------------------

/// Emitted when a leg lifts off.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct StepEvent {
    pub leg: LegId,
    pub kind: StepKind,
    /// Whether the running override was active at lift-off.
    pub running: bool,
}

// ---------------------------------------------------------------------------
// LegRig
// ---------------------------------------------------------------------------

/// A fixed set of legs plus the symmetric opposite table.
///
/// Pairing is validated once at construction; asymmetric tables are
/// rejected rather than repaired.
#[derive(Debug, Clone, PartialEq)]
pub struct LegRig {
    legs: Vec<Leg>,
    opposite: Vec<usize>,
}

impl LegRig {
    /// Build a rig from legs and a per-leg opposite table
    /// (`opposites[i]` is the index of leg `i`'s partner).
    pub fn new(legs: Vec<Leg>, opposites: &[usize]) -> Result<Self, RigError> {
        if legs.is_empty() {
            return Err(RigError::Empty);
        }
        if opposites.len() != legs.len() {
            return Err(RigError::Unpaired {
                leg: opposites.len().min(legs.len()),
            });
        }
        for (leg, &opp) in opposites.iter().enumerate() {
            if opp >= legs.len() {
                return Err(RigError::PairOutOfRange {
                    leg,
                    opposite: opp,
                    len: legs.len(),
                });
            }
            if opp == leg {
                return Err(RigError::SelfPaired { leg });
            }
            if opposites[opp] != leg {
                return Err(RigError::AsymmetricPair { leg, opposite: opp });
            }
        }
        Ok(Self {
            legs,
            opposite: opposites.to_vec(),
        })
    }

    /// Build a rig from unordered leg pairs.
    pub fn paired(legs: Vec<Leg>, pairs: &[(usize, usize)]) -> Result<Self, RigError> {
        let len = legs.len();
        if len == 0 {
            return Err(RigError::Empty);
        }
        let mut opposites = vec![usize::MAX; len];
        for &(a, b) in pairs {
            for (leg, opp) in [(a, b), (b, a)] {
                if leg >= len || opp >= len {
                    return Err(RigError::PairOutOfRange {
                        leg,
                        opposite: opp,
                        len,
                    });
                }
                if opposites[leg] != usize::MAX {
                    return Err(RigError::AsymmetricPair { leg, opposite: opp });
                }
                opposites[leg] = opp;
            }
        }
        if let Some(leg) = opposites.iter().position(|&o| o == usize::MAX) {
            return Err(RigError::Unpaired { leg });
        }
        Self::new(legs, &opposites)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.legs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    #[must_use]
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    #[must_use]
    pub fn get(&self, id: LegId) -> Option<&Leg> {
        self.legs.get(id.0)
    }

    /// The partner of `id`.
    #[must_use]
    pub fn opposite_of(&self, id: LegId) -> LegId {
        LegId(self.opposite[id.0])
    }

    /// Number of legs currently airborne.
    #[must_use]
    pub fn stepping_count(&self) -> usize {
        self.legs.iter().filter(|l| !l.grounded).count()
    }

    /// Plant every foot on the nearest surface below its mount.
    ///
    /// Run once at spawn, before the first tick. Feet with no ground in
    /// reach hang at half leg length below the mount.
    pub fn settle(&mut self, sensor: &dyn SpatialQuery, body: &Pose) {
        let up = body.up();
        for leg in &mut self.legs {
            let mount = body.transform_point(&leg.mount_offset);
            let hit = sensor
                .cast_sphere(&mount, leg.preset.far_distance, &-up, leg.preset.leg_length)
                .or_else(|| {
                    sensor.cast_sphere(
                        &mount,
                        leg.preset.near_distance,
                        &-up,
                        leg.preset.leg_length,
                    )
                });
            match hit {
                Some(hit) => {
                    leg.target = hit.point + hit.normal * leg.preset.foot_height;
                    leg.normal = hit.normal;
                }
                None => {
                    leg.target = mount - up * (leg.preset.leg_length * 0.5);
                    leg.normal = up;
                }
            }
            leg.grounded = true;
            leg.arc = None;
        }
    }

    /// Advance every leg by one tick.
    ///
    /// Grounded flags are snapshotted first; each planner reads its
    /// opposite's previous-tick state, further gated on the partner not
    /// having lifted earlier in this pass. Legs update in index order, so
    /// a simultaneous-lift tie deterministically goes to the lower index.
    pub fn tick(
        &mut self,
        sensor: &dyn SpatialQuery,
        body: &Pose,
        com: &ComSample,
        dt: f32,
    ) -> Vec<StepEvent> {
        let grounded_before: Vec<bool> = self.legs.iter().map(|l| l.grounded).collect();
        let mounts: Vec<Vector3<f32>> = self
            .legs
            .iter()
            .map(|l| body.transform_point(&l.mount_offset))
            .collect();

        let mut events = Vec::new();
        for i in 0..self.legs.len() {
            let opp = self.opposite[i];
            let outward = normalize_or_zero(&(mounts[i] - mounts[opp]));
            // The partner must have been grounded when the tick began and
            // must not have lifted earlier in this pass; a pair can never
            // lift in the same tick outside the running override.
            let opposite_grounded = grounded_before[opp] && self.legs[opp].grounded;
            let leg = &mut self.legs[i];

            if let Some(arc) = leg.arc.as_mut() {
                let step = arc.advance(dt, leg.preset.step_threshold);
                leg.target = step.position;
                if step.arrived {
                    leg.grounded = true;
                    leg.arc = None;
                }
                continue;
            }

            let frame = ProbeFrame {
                origin: mounts[i],
                forward: body.forward(),
                up: body.up(),
                outward,
            };
            let Some(hit) = probe(sensor, &frame, &leg.preset) else {
                continue;
            };

            let dest = foot_destination(&hit, &leg.target, com, &leg.preset);
            let dist = (dest - leg.target).norm();
            let running = com.speed > leg.preset.run_speed_threshold;
            let Some(kind) = classify(dist, opposite_grounded, running, &leg.preset) else {
                continue;
            };

            leg.normal = hit.normal;
            leg.arc = Some(StepArc::new(
                leg.target,
                dest,
                arc_height(kind, dist, &leg.preset),
                phase_speed(kind, running, &leg.preset),
            ));
            leg.grounded = false;
            events.push(StepEvent {
                leg: leg.id,
                kind,
                running,
            });
        }
        events
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use striders_test_utils::{FlatGround, NoGround, SteppedGround};

    fn quad_legs(preset: StepPreset) -> Vec<Leg> {
        let mounts = [
            Vector3::new(2.0, 0.0, 2.0),
            Vector3::new(-2.0, 0.0, 2.0),
            Vector3::new(2.0, 0.0, -2.0),
            Vector3::new(-2.0, 0.0, -2.0),
        ];
        mounts
            .iter()
            .enumerate()
            .map(|(i, &m)| Leg::new(LegId(i), m, preset))
            .collect()
    }

    fn quad_rig(preset: StepPreset) -> LegRig {
        LegRig::paired(quad_legs(preset), &[(0, 1), (2, 3)]).unwrap()
    }

    fn body_at(y: f32) -> Pose {
        Pose::from_position(Vector3::new(0.0, y, 0.0))
    }

    #[test]
    fn empty_rig_rejected() {
        assert_eq!(LegRig::new(vec![], &[]), Err(RigError::Empty));
    }

    #[test]
    fn asymmetric_pairing_rejected() {
        let legs: Vec<Leg> = (0..3)
            .map(|i| Leg::new(LegId(i), Vector3::zeros(), StepPreset::default()))
            .collect();
        // 0→1, 1→2, 2→0 is a cycle, not a pairing.
        assert_eq!(
            LegRig::new(legs, &[1, 2, 0]),
            Err(RigError::AsymmetricPair {
                leg: 0,
                opposite: 1
            })
        );
    }

    #[test]
    fn self_pairing_rejected() {
        let legs: Vec<Leg> = (0..2)
            .map(|i| Leg::new(LegId(i), Vector3::zeros(), StepPreset::default()))
            .collect();
        assert_eq!(LegRig::new(legs, &[0, 1]), Err(RigError::SelfPaired { leg: 0 }));
    }

    #[test]
    fn out_of_range_pairing_rejected() {
        let legs: Vec<Leg> = (0..2)
            .map(|i| Leg::new(LegId(i), Vector3::zeros(), StepPreset::default()))
            .collect();
        assert!(matches!(
            LegRig::new(legs, &[5, 0]),
            Err(RigError::PairOutOfRange { leg: 0, .. })
        ));
    }

    #[test]
    fn duplicate_pair_entry_rejected() {
        let legs: Vec<Leg> = (0..4)
            .map(|i| Leg::new(LegId(i), Vector3::zeros(), StepPreset::default()))
            .collect();
        assert!(LegRig::paired(legs, &[(0, 1), (1, 2)]).is_err());
    }

    #[test]
    fn unpaired_leg_rejected() {
        let legs: Vec<Leg> = (0..4)
            .map(|i| Leg::new(LegId(i), Vector3::zeros(), StepPreset::default()))
            .collect();
        assert_eq!(
            LegRig::paired(legs, &[(0, 1)]),
            Err(RigError::Unpaired { leg: 2 })
        );
    }

    #[test]
    fn paired_builds_symmetric_table() {
        let rig = quad_rig(StepPreset::default());
        assert_eq!(rig.opposite_of(LegId(0)), LegId(1));
        assert_eq!(rig.opposite_of(LegId(1)), LegId(0));
        assert_eq!(rig.opposite_of(LegId(3)), LegId(2));
    }

    #[test]
    fn settle_plants_feet_on_ground() {
        let mut rig = quad_rig(StepPreset::default());
        let ground = FlatGround::new(0.0);
        let body = body_at(4.5);
        rig.settle(&ground, &body);
        for leg in rig.legs() {
            assert!(leg.is_grounded());
            // Foot sits foot_height above the surface along the normal.
            assert_relative_eq!(leg.target().y, leg.preset.foot_height, epsilon = 1e-5);
        }
    }

    #[test]
    fn settle_without_ground_hangs_feet() {
        let mut rig = quad_rig(StepPreset::default());
        let body = body_at(4.5);
        rig.settle(&NoGround, &body);
        for leg in rig.legs() {
            let mount = body.transform_point(&leg.mount_offset);
            assert_relative_eq!(
                leg.target().y,
                mount.y - leg.preset.leg_length * 0.5,
                epsilon = 1e-5
            );
        }
    }

    #[test]
    fn planted_rig_at_rest_takes_no_step() {
        let mut rig = quad_rig(StepPreset::default());
        let ground = FlatGround::new(0.0);
        let body = body_at(4.5);
        rig.settle(&ground, &body);
        for _ in 0..100 {
            let events = rig.tick(&ground, &body, &ComSample::default(), 0.02);
            assert!(events.is_empty(), "settled rig stepped at rest");
        }
        assert_eq!(rig.stepping_count(), 0);
    }

    #[test]
    fn displaced_body_triggers_long_step() {
        let preset = StepPreset {
            randomization_offset: 0.0,
            ..StepPreset::default()
        };
        let mut rig = quad_rig(preset);
        let ground = FlatGround::new(0.0);
        let body = body_at(4.5);
        rig.settle(&ground, &body);

        // Teleport the body far forward: destinations outrun far_distance.
        let moved = Pose::from_position(Vector3::new(0.0, 4.5, 20.0));
        let events = rig.tick(&ground, &moved, &ComSample::default(), 0.02);
        assert!(!events.is_empty());
        for e in &events {
            assert_eq!(e.kind, StepKind::Long);
            assert!(!e.running);
        }
    }

    #[test]
    fn opposite_legs_never_step_together_when_walking() {
        let preset = StepPreset {
            randomization_offset: 0.0,
            run_speed_threshold: f32::INFINITY, // never run
            ..StepPreset::default()
        };
        let mut rig = quad_rig(preset);
        let ground = SteppedGround::new(3.0, vec![0.0, 0.4, 0.1, 0.6]);
        let mut body = body_at(4.5);
        rig.settle(&ground, &body);

        for tick in 0..2000 {
            body.position.z += 0.04; // steady crawl
            rig.tick(&ground, &body, &ComSample::default(), 0.02);
            for i in 0..rig.len() {
                let id = LegId(i);
                let opp = rig.opposite_of(id);
                assert!(
                    rig.get(id).unwrap().is_grounded()
                        || rig.get(opp).unwrap().is_grounded(),
                    "pair ({id}, {opp}) both airborne at tick {tick}"
                );
            }
        }
    }

    #[test]
    fn running_com_lets_pairs_overlap() {
        let preset = StepPreset {
            randomization_offset: 0.0,
            run_speed_threshold: 0.1,
            ..StepPreset::default()
        };
        let mut rig = quad_rig(preset);
        let ground = FlatGround::new(0.0);
        let body = body_at(4.5);
        rig.settle(&ground, &body);

        // Fast COM, and a body displaced enough that both pair members
        // want long steps in the same tick.
        let com = ComSample {
            offset: Vector3::zeros(),
            direction: Vector3::z(),
            speed: 0.5,
        };
        let moved = Pose::from_position(Vector3::new(0.0, 4.5, 20.0));
        let events = rig.tick(&ground, &moved, &com, 0.02);
        assert!(events.iter().all(|e| e.running));
        // Both members of at least one pair lifted in the same tick.
        assert!(rig.stepping_count() >= 2);
        let both_up = (0..rig.len()).any(|i| {
            !rig.legs()[i].grounded && !rig.legs()[rig.opposite[i]].grounded
        });
        assert!(both_up);
    }

    #[test]
    fn step_lands_and_regounds() {
        let preset = StepPreset {
            randomization_offset: 0.0,
            ..StepPreset::default()
        };
        let mut rig = quad_rig(preset);
        let ground = FlatGround::new(0.0);
        let body = body_at(4.5);
        rig.settle(&ground, &body);

        let moved = Pose::from_position(Vector3::new(0.0, 4.5, 20.0));
        let events = rig.tick(&ground, &moved, &ComSample::default(), 0.02);
        assert!(!events.is_empty());
        let stepping = events[0].leg;
        let dest = rig.get(stepping).unwrap().step_destination().unwrap();

        let mut landed_tick = None;
        for tick in 0..1000 {
            rig.tick(&ground, &moved, &ComSample::default(), 0.02);
            if rig.get(stepping).unwrap().is_grounded() {
                landed_tick = Some(tick);
                break;
            }
        }
        assert!(landed_tick.is_some(), "step never landed");
        let foot = rig.get(stepping).unwrap().target();
        assert!((foot - dest).norm() <= preset.step_threshold + 1e-4);
    }

    #[test]
    fn no_ground_means_no_steps() {
        let mut rig = quad_rig(StepPreset::default());
        let body = body_at(4.5);
        rig.settle(&NoGround, &body);
        let moved = Pose::from_position(Vector3::new(0.0, 4.5, 50.0));
        let events = rig.tick(&NoGround, &moved, &ComSample::default(), 0.02);
        assert!(events.is_empty());
        assert_eq!(rig.stepping_count(), 0);
    }
}

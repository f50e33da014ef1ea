//! Bevy ECS integration for leg stepping.
//!
//! [`GaitPlugin`] adds one system in [`StriderSet::Legs`] that advances
//! every walker's [`LegRig`] by one tick, reading the shared
//! [`GroundQuery`] and each walker's committed [`ComState`].

use bevy::prelude::*;

use striders_core::time::TickConfig;
use striders_core::traits::GroundQuery;
use striders_core::types::{BodyPose, ComState};
use striders_core::StriderSet;

use crate::leg::{LegRig, StepEvent};

/// Adds leg stepping to an app.
pub struct GaitPlugin;

impl Plugin for GaitPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<StepEvent>()
            .add_systems(Update, gait_step_system.in_set(StriderSet::Legs));
    }
}

/// A walker's legs.
#[derive(Component, Debug)]
pub struct WalkerRig(pub LegRig);

/// Advance all rigs one tick and emit [`StepEvent`]s for lift-offs.
#[allow(clippy::needless_pass_by_value)]
pub fn gait_step_system(
    ground: Option<Res<GroundQuery>>,
    tick: Res<TickConfig>,
    mut events: EventWriter<StepEvent>,
    mut walkers: Query<(&BodyPose, &ComState, &mut WalkerRig)>,
) {
    let Some(ground) = ground else {
        return;
    };
    for (body, com, mut rig) in &mut walkers {
        for event in rig.0.tick(ground.0.as_ref(), &body.pose, &com.0, tick.dt) {
            events.send(event);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use striders_core::preset::StepPreset;
    use striders_core::types::{LegId, Pose};
    use striders_core::StridersCorePlugin;
    use striders_test_utils::FlatGround;

    use crate::leg::Leg;

    fn test_rig() -> LegRig {
        let preset = StepPreset {
            randomization_offset: 0.0,
            ..StepPreset::default()
        };
        let legs = vec![
            Leg::new(LegId(0), Vector3::new(2.0, 0.0, 0.0), preset),
            Leg::new(LegId(1), Vector3::new(-2.0, 0.0, 0.0), preset),
        ];
        LegRig::paired(legs, &[(0, 1)]).unwrap()
    }

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(StridersCorePlugin);
        app.add_plugins(GaitPlugin);
        app.insert_resource(GroundQuery::new(FlatGround::new(0.0)));
        app
    }

    #[test]
    fn plugin_builds_and_updates() {
        let mut app = test_app();
        app.update();
        assert!(app.world().get_resource::<TickConfig>().is_some());
    }

    #[test]
    fn plugin_without_ground_does_not_panic() {
        let mut app = App::new();
        app.add_plugins(StridersCorePlugin);
        app.add_plugins(GaitPlugin);
        app.update();
    }

    #[test]
    fn system_steps_displaced_walker() {
        let mut app = test_app();

        let ground = FlatGround::new(0.0);
        let body = Pose::from_position(Vector3::new(0.0, 4.5, 0.0));
        let mut rig = test_rig();
        rig.settle(&ground, &body);

        let walker = app
            .world_mut()
            .spawn((BodyPose::new(body), ComState::default(), WalkerRig(rig)))
            .id();

        // At rest nothing moves.
        app.update();
        let rig = &app.world().get::<WalkerRig>(walker).unwrap().0;
        assert_eq!(rig.stepping_count(), 0);

        // Teleport the body; the next tick must start a step.
        app.world_mut()
            .get_mut::<BodyPose>(walker)
            .unwrap()
            .pose
            .position = Vector3::new(0.0, 4.5, 20.0);
        app.update();
        let rig = &app.world().get::<WalkerRig>(walker).unwrap().0;
        assert!(rig.stepping_count() > 0);
    }
}

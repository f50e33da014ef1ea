// striders-core: Types, traits, presets, time, and errors for the Striders walker stack.

use bevy::prelude::{App, IntoSystemSetConfigs, Plugin, SystemSet, Update};

pub mod error;
pub mod preset;
pub mod time;
pub mod traits;
pub mod types;

/// Ordered phases of one walker tick.
///
/// Every system in the stack runs in exactly one of these sets; the core
/// plugin chains them so each phase only ever reads the previous phase's
/// committed output.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StriderSet {
    /// Ground probing, step planning, and step-arc animation for every leg.
    Legs,
    /// Center-of-mass aggregation from the body and planted feet.
    Track,
    /// Desired body pose computation from leg targets and COM.
    Pose,
    /// Commit: interpolate the actual body pose toward the desired pose
    /// and advance the simulation clock.
    Commit,
}

/// Registers shared resources and the [`StriderSet`] phase ordering.
pub struct StridersCorePlugin;

impl Plugin for StridersCorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<time::TickConfig>()
            .init_resource::<time::SimTime>()
            .configure_sets(
                Update,
                (
                    StriderSet::Legs,
                    StriderSet::Track,
                    StriderSet::Pose,
                    StriderSet::Commit,
                )
                    .chain(),
            );
    }
}

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::error::{PresetError, RigError, StridersError};
    pub use crate::preset::{presets, BalanceConfig, StepPreset};
    pub use crate::time::{SimTime, TickConfig};
    pub use crate::traits::{GroundQuery, SpatialQuery};
    pub use crate::types::{
        move_towards, BodyPose, ComSample, ComState, GroundHit, LegId, Pose,
    };
    pub use crate::{StriderSet, StridersCorePlugin};
}

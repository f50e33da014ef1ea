//! Headless simulation wiring for striders walkers.
//!
//! [`StridersSimPlugin`] assembles the full stack — core phases, gait,
//! balance, statistics, and the simulation clock — into one plugin.
//! [`WalkerBuilder`] produces a ready-to-tick headless scene.

use bevy::prelude::*;

use striders_balance::plugin::body_commit_system;
use striders_balance::BalancePlugin;
use striders_core::time::{SimTime, TickConfig};
use striders_core::{StriderSet, StridersCorePlugin};
use striders_gait::GaitPlugin;

pub mod builder;
pub mod stats;

mod headless;

pub use builder::{WalkerBuilder, WalkerScene};
pub use stats::{walk_stats_system, WalkStats};

/// The whole striders stack in one plugin.
///
/// Adds the core, gait, and balance plugins, walk statistics, and clock
/// advancement; do not also add the individual plugins.
pub struct StridersSimPlugin;

impl Plugin for StridersSimPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(StridersCorePlugin)
            .add_plugins(GaitPlugin)
            .add_plugins(BalancePlugin)
            .init_resource::<WalkStats>()
            .add_systems(
                Update,
                (
                    advance_clock.in_set(StriderSet::Commit),
                    walk_stats_system
                        .in_set(StriderSet::Commit)
                        .after(body_commit_system),
                ),
            );
    }
}

/// Advance the simulation clock by one tick.
#[allow(clippy::needless_pass_by_value)]
pub fn advance_clock(tick: Res<TickConfig>, mut time: ResMut<SimTime>) {
    time.advance_secs(f64::from(tick.dt));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_plugin_builds_and_updates() {
        let mut app = App::new();
        app.add_plugins(StridersSimPlugin);
        for _ in 0..3 {
            app.update();
        }
        let time = app.world().resource::<SimTime>();
        // Three default ticks of 20 ms each.
        assert_eq!(time.nanos(), 60_000_000);
        assert!(app.world().get_resource::<WalkStats>().is_some());
    }
}

//! Walk statistics accumulated over a headless run.

use std::collections::HashMap;

use bevy::prelude::*;
use nalgebra::Vector3;

use striders_core::types::BodyPose;
use striders_gait::{StepEvent, StepKind};

/// Counters for a running simulation, read back after a headless run.
#[derive(Resource, Debug, Clone, Default)]
pub struct WalkStats {
    /// Ticks simulated.
    pub ticks: u64,
    /// Total lift-offs.
    pub steps: u64,
    /// Lift-offs classified long.
    pub long_steps: u64,
    /// Lift-offs classified short.
    pub short_steps: u64,
    /// Lift-offs taken under the running override.
    pub running_steps: u64,
    /// Total body travel, summed per tick over all walkers.
    pub distance_travelled: f32,

    last_positions: HashMap<Entity, Vector3<f32>>,
}

impl WalkStats {
    /// One-line human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} ticks, {} steps ({} long / {} short, {} running), {:.2} travelled",
            self.ticks,
            self.steps,
            self.long_steps,
            self.short_steps,
            self.running_steps,
            self.distance_travelled,
        )
    }

    fn record_step(&mut self, event: &StepEvent) {
        self.steps += 1;
        match event.kind {
            StepKind::Long => self.long_steps += 1,
            StepKind::Short => self.short_steps += 1,
        }
        if event.running {
            self.running_steps += 1;
        }
    }
}

/// Accumulate step events and body travel. Runs at the end of the commit
/// phase so it sees the tick's final body positions.
#[allow(clippy::needless_pass_by_value)]
pub fn walk_stats_system(
    mut stats: ResMut<WalkStats>,
    mut events: EventReader<StepEvent>,
    walkers: Query<(Entity, &BodyPose)>,
) {
    stats.ticks += 1;
    for event in events.read() {
        stats.record_step(event);
    }
    for (entity, body) in &walkers {
        let pos = body.pose.position;
        if let Some(last) = stats.last_positions.insert(entity, pos) {
            stats.distance_travelled += (pos - last).norm();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

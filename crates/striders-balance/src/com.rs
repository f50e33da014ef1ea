//! Mass-weighted center-of-mass tracking.

use nalgebra::Vector3;
use striders_core::error::RigError;
use striders_core::types::{normalize_or_zero, ComSample, LegId};

/// One limb's contribution to the center of mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightNode {
    /// Leg whose foot target anchors this node.
    pub leg: LegId,
    /// Scalar mass weight.
    pub weight: f32,
}

impl WeightNode {
    #[must_use]
    pub const fn new(leg: LegId, weight: f32) -> Self {
        Self { leg, weight }
    }
}

/// Tracks the mass-weighted aggregate position of body + limb nodes.
///
/// Speed and movement direction derive from the delta between this tick's
/// and the previous tick's tracked position; the weighted average itself is
/// order-independent over the nodes.
#[derive(Debug, Clone)]
pub struct ComTracker {
    body_weight: f32,
    nodes: Vec<WeightNode>,
    total_weight: f32,
    position: Vector3<f32>,
    previous: Vector3<f32>,
    initialized: bool,
}

impl ComTracker {
    /// Build a tracker. Total weight must be positive and node weights
    /// non-negative.
    pub fn new(body_weight: f32, nodes: Vec<WeightNode>) -> Result<Self, RigError> {
        for node in &nodes {
            if node.weight < 0.0 {
                return Err(RigError::NegativeWeight {
                    leg: node.leg.0,
                    weight: node.weight,
                });
            }
        }
        let total_weight = body_weight + nodes.iter().map(|n| n.weight).sum::<f32>();
        if total_weight <= 0.0 {
            return Err(RigError::NonPositiveWeight {
                total: total_weight,
            });
        }
        Ok(Self {
            body_weight,
            nodes,
            total_weight,
            position: Vector3::zeros(),
            previous: Vector3::zeros(),
            initialized: false,
        })
    }

    #[must_use]
    pub fn nodes(&self) -> &[WeightNode] {
        &self.nodes
    }

    /// The tracked center-of-mass position from the latest update.
    #[must_use]
    pub const fn position(&self) -> Vector3<f32> {
        self.position
    }

    /// Recompute the aggregate and derive this tick's sample.
    ///
    /// `root` is the body root position; `foot_position` resolves each
    /// node's anchor. The first update seeds the history, reporting zero
    /// speed.
    pub fn update<F>(&mut self, root: &Vector3<f32>, foot_position: F) -> ComSample
    where
        F: Fn(LegId) -> Vector3<f32>,
    {
        let mut weighted = root * self.body_weight;
        for node in &self.nodes {
            weighted += foot_position(node.leg) * node.weight;
        }
        let com = weighted / self.total_weight;

        if !self.initialized {
            self.previous = com;
            self.initialized = true;
        } else {
            self.previous = self.position;
        }
        self.position = com;

        let delta = self.position - self.previous;
        ComSample {
            offset: com - root,
            direction: normalize_or_zero(&delta),
            speed: delta.norm(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_total_weight_rejected() {
        let result = ComTracker::new(0.0, vec![]);
        assert!(matches!(
            result,
            Err(RigError::NonPositiveWeight { total }) if total == 0.0
        ));
    }

    #[test]
    fn negative_node_weight_rejected() {
        let result = ComTracker::new(1.0, vec![WeightNode::new(LegId(0), -2.0)]);
        assert!(matches!(result, Err(RigError::NegativeWeight { leg: 0, .. })));
    }

    #[test]
    fn weighted_average_matches_hand_computation() {
        let mut tracker = ComTracker::new(
            2.0,
            vec![WeightNode::new(LegId(0), 1.0), WeightNode::new(LegId(1), 1.0)],
        )
        .unwrap();
        let root = Vector3::new(0.0, 4.0, 0.0);
        let feet = [Vector3::new(2.0, 0.0, 0.0), Vector3::new(-2.0, 0.0, 0.0)];
        let sample = tracker.update(&root, |leg| feet[leg.0]);

        // (2·root + foot0 + foot1) / 4 = (0, 2, 0)
        assert_relative_eq!(tracker.position(), Vector3::new(0.0, 2.0, 0.0), epsilon = 1e-6);
        // Offset points from the root toward the aggregate.
        assert_relative_eq!(sample.offset, Vector3::new(0.0, -2.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn average_is_invariant_under_node_permutation() {
        let feet = [
            Vector3::new(1.0, 0.0, 3.0),
            Vector3::new(-2.0, 0.5, 1.0),
            Vector3::new(0.3, -0.2, -4.0),
        ];
        let root = Vector3::new(0.5, 3.0, 0.0);

        let forward = vec![
            WeightNode::new(LegId(0), 1.0),
            WeightNode::new(LegId(1), 2.0),
            WeightNode::new(LegId(2), 0.5),
        ];
        let mut shuffled = forward.clone();
        shuffled.reverse();

        let mut a = ComTracker::new(3.0, forward).unwrap();
        let mut b = ComTracker::new(3.0, shuffled).unwrap();
        let sa = a.update(&root, |leg| feet[leg.0]);
        let sb = b.update(&root, |leg| feet[leg.0]);

        assert_relative_eq!(a.position(), b.position(), epsilon = 1e-5);
        assert_relative_eq!(sa.offset, sb.offset, epsilon = 1e-5);
    }

    #[test]
    fn first_update_reports_zero_speed() {
        let mut tracker = ComTracker::new(1.0, vec![]).unwrap();
        let sample = tracker.update(&Vector3::new(5.0, 0.0, 0.0), |_| Vector3::zeros());
        assert_eq!(sample.speed, 0.0);
        assert_eq!(sample.direction, Vector3::zeros());
    }

    #[test]
    fn speed_and_direction_track_movement() {
        let mut tracker = ComTracker::new(1.0, vec![]).unwrap();
        tracker.update(&Vector3::zeros(), |_| Vector3::zeros());
        let sample = tracker.update(&Vector3::new(0.3, 0.0, 0.4), |_| Vector3::zeros());
        assert_relative_eq!(sample.speed, 0.5, epsilon = 1e-6);
        assert_relative_eq!(sample.direction, Vector3::new(0.6, 0.0, 0.8), epsilon = 1e-5);
    }

    #[test]
    fn stationary_com_has_zero_direction() {
        let mut tracker = ComTracker::new(1.0, vec![]).unwrap();
        let root = Vector3::new(1.0, 2.0, 3.0);
        tracker.update(&root, |_| Vector3::zeros());
        let sample = tracker.update(&root, |_| Vector3::zeros());
        assert_eq!(sample.speed, 0.0);
        assert_eq!(sample.direction, Vector3::zeros());
    }

    #[test]
    fn offset_leans_toward_heavy_nodes() {
        let mut tracker = ComTracker::new(1.0, vec![WeightNode::new(LegId(0), 9.0)]).unwrap();
        let root = Vector3::zeros();
        let sample = tracker.update(&root, |_| Vector3::new(10.0, 0.0, 0.0));
        // 9/10 of the mass sits at x=10 → COM at x=9, offset +9x.
        assert_relative_eq!(sample.offset.x, 9.0, epsilon = 1e-5);
    }
}

//! Body balancing for striders walkers.
//!
//! Two cooperating pieces:
//!
//! - [`ComTracker`] — mass-weighted center of mass over the body and its
//!   limb nodes, with per-tick speed and movement direction.
//! - [`BodyStabilizer`] — aggregates leg targets and ground normals into a
//!   desired body pose, then interpolates the actual pose toward it in a
//!   separate commit phase.
//!
//! The tracker is single-writer: only the tracking system mutates it, and
//! everything downstream reads the committed
//! [`ComSample`](striders_core::types::ComSample).

pub mod body;
pub mod com;
pub mod plugin;

pub use body::BodyStabilizer;
pub use com::{ComTracker, WeightNode};
pub use plugin::{BalancePlugin, DesiredBodyPose, Stabilizer, WalkerCom};

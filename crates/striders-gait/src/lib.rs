//! Procedural leg stepping for striders walkers.
//!
//! Each leg runs a two-state machine: while planted it probes for fresh
//! footing and decides whether a step is worth taking; while airborne it
//! follows a parabolic arc to a frozen destination.
//!
//! # Architecture
//!
//! ```text
//! SpatialQuery ──► probe ──► foot_destination ──► classify ──► StepArc
//!                  (per leg, short-circuit)       (short/long/run)
//! ```
//!
//! The [`LegRig`] couples each leg with its opposite: grounded flags are
//! snapshotted before any leg mutates, so a leg never lifts while its
//! partner is airborne under normal gait conditions.

pub mod arc;
pub mod leg;
pub mod planner;
pub mod plugin;

pub use arc::{parabola, ArcStep, StepArc};
pub use leg::{Leg, LegRig, StepEvent};
pub use planner::{classify, foot_destination, probe, ProbeFrame, StepKind};
pub use plugin::{gait_step_system, GaitPlugin, WalkerRig};

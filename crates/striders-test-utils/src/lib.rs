//! Shared test utilities for the striders workspace.
//!
//! Deterministic RNG construction and analytic [`SpatialQuery`] mocks so
//! gait and balance tests never depend on a physics backend.
//!
//! [`SpatialQuery`]: striders_core::traits::SpatialQuery

pub mod mocks;
pub mod rng;

pub use mocks::{FlatGround, NoGround, SteppedGround};
pub use rng::seeded_rng;

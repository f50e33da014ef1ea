//! Headless full-stack walks.
//!
//! Exercises the entire stack — core phases, gait, balance, terrain, and
//! statistics — with no window and no GPU, the way the CLI drives it.

use thiserror::Error;

/// Top-level error type for the striders stack.
#[derive(Debug, Error)]
pub enum StridersError {
    #[error("Preset error: {0}")]
    Preset(#[from] PresetError),

    #[error("Rig error: {0}")]
    Rig(#[from] RigError),
}

/// Preset/configuration errors, raised at load time.
///
/// Invalid presets are rejected with a structured error rather than
/// silently corrected.
#[derive(Debug, Error)]
pub enum PresetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("near_distance {near} exceeds far_distance {far}")]
    ThresholdOrder { near: f32, far: f32 },

    #[error("step_speed {speed} is below step_threshold {threshold}")]
    SpeedBelowArrival { speed: f32, threshold: f32 },

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },
}

/// Rig construction errors.
///
/// Copy + static contents for cheap matching in setup code.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RigError {
    #[error("rig has no legs")]
    Empty,

    #[error("leg {leg} pairs with {opposite}, but the rig has {len} legs")]
    PairOutOfRange {
        leg: usize,
        opposite: usize,
        len: usize,
    },

    #[error("leg {leg} is paired with itself")]
    SelfPaired { leg: usize },

    #[error("asymmetric pairing: leg {leg} names {opposite}, which names another leg")]
    AsymmetricPair { leg: usize, opposite: usize },

    #[error("leg {leg} has no opposite")]
    Unpaired { leg: usize },

    #[error("total node weight must be positive, got {total}")]
    NonPositiveWeight { total: f32 },

    #[error("node weight for leg {leg} is negative: {weight}")]
    NegativeWeight { leg: usize, weight: f32 },

    #[error("no ground query configured")]
    MissingGround,
}

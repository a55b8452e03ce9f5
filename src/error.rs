//! Configuration errors
//!
//! The simulation itself never fails: degenerate numbers are normalized in
//! place. Only an inconsistent [`crate::ArenaConfig`] is rejected, and it is
//! rejected before an arena is ever built.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("side count must be at least {min}, got {got}")]
    SideCount { got: u32, min: u32 },

    #[error("gap width {width} rad must be in [0, 2π)")]
    GapTooWide { width: f32 },

    #[error("gap of {width} rad removes all {side_count} ring segments")]
    GapSwallowsRing { width: f32, side_count: u32 },

    #[error("speed band is inverted or negative: min {min}, max {max}")]
    SpeedBand { min: f32, max: f32 },

    #[error("'{name}' must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("'{name}' must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },

    #[error("'{name}' must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },

    #[error("growth factor {value} would shrink the predator (must be >= 1)")]
    GrowthFactor { value: f32 },

    #[error("replacement factor must be at least 1")]
    ReplacementFactor,

    #[error("at least one predator is required")]
    PredatorCount,

    #[error("milestone thresholds must be non-zero")]
    ZeroMilestone,

    #[error("population cap must be at least 1 when set")]
    PopulationCap,

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Convenience alias: a `Result` using `ConfigError` as the error type.
pub type ConfigResult<T> = Result<T, ConfigError>;

//! Ring Hunter - a predator/prey arena inside a rotating polygonal ring
//!
//! Core modules:
//! - `sim`: Deterministic simulation (boundary, kinematics, collisions, population)
//! - `driver`: Fixed-step clock, session state machine and observers
//! - `config`: Data-driven arena parameters
//! - `render` / `audio`: Read-only sinks that turn ticks into snapshots and cues

pub mod audio;
pub mod config;
pub mod driver;
pub mod error;
pub mod render;
pub mod sim;

pub use config::ArenaConfig;
pub use driver::{Command, DriverState, Simulation, SimulationObserver, TickFrame};
pub use error::{ConfigError, ConfigResult};

use glam::Vec2;

/// Simulation constants
pub mod consts {
    /// Default fixed simulation rate (the rate the ring was tuned at)
    pub const DEFAULT_TICK_HZ: f32 = 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the driver will account for (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Smallest radius any entity may have
    pub const MIN_ENTITY_RADIUS: f32 = 0.5;
    /// Smallest polygon the boundary builder accepts
    pub const MIN_SIDE_COUNT: u32 = 3;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

//! Speed regulation
//!
//! Every entity's speed is kept inside `[min, max]` each tick, after
//! integration and before contacts are resolved.

use glam::Vec2;

/// Direction used when a velocity has no direction to preserve
pub const FALLBACK_DIRECTION: Vec2 = Vec2::X;

/// Rescale `velocity` so its magnitude lies in `[min_speed, max_speed]`.
///
/// Direction is preserved. A zero velocity has no direction, so it is sent
/// along [`FALLBACK_DIRECTION`] at `min_speed` instead of dividing by zero.
pub fn clamp_speed(velocity: Vec2, min_speed: f32, max_speed: f32) -> Vec2 {
    let speed = velocity.length();
    if !speed.is_finite() || speed <= f32::EPSILON {
        log::trace!("degenerate velocity {velocity:?}, using fallback direction");
        return FALLBACK_DIRECTION * min_speed;
    }

    if speed > max_speed {
        velocity * (max_speed / speed)
    } else if speed < min_speed {
        velocity * (min_speed / speed)
    } else {
        velocity
    }
}

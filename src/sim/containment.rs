//! Escape detection
//!
//! An entity is outside once its whole disc has cleared the ring radius. That
//! happens through the gap, or when a fast body slips between thin walls.

use glam::Vec2;

use super::entity::{Entity, EntityKind};

/// What to do with an entity after the containment check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeAction {
    /// Still inside the ring
    Stay,
    /// Prey escaped: remove it and spawn replacements inside
    Replace,
    /// Predator escaped: teleport it back inside
    Relocate,
}

/// Classify an entity against the ring
pub fn check_escape(entity: &Entity, boundary_center: Vec2, boundary_radius: f32) -> EscapeAction {
    let dist = entity.pos.distance(boundary_center);
    if dist <= boundary_radius + entity.radius {
        return EscapeAction::Stay;
    }
    match entity.kind {
        EntityKind::Prey => EscapeAction::Replace,
        EntityKind::Predator => EscapeAction::Relocate,
    }
}

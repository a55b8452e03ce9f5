//! Mobile bodies: prey and predators

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MIN_ENTITY_RADIUS;

/// Stable opaque entity handle (never reused within a session)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Consumed by a predator on contact
    Prey,
    /// Grows on every capture, never removed
    Predator,
}

/// Per-predator growth bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthAccumulator {
    /// Prey consumed by this predator
    pub captures: u32,
    /// Radius at spawn
    pub base_radius: f32,
}

/// A prey or predator body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub alive: bool,
    /// Present on predators only
    pub growth: Option<GrowthAccumulator>,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        let radius = sanitize_radius(radius);
        let growth = match kind {
            EntityKind::Predator => Some(GrowthAccumulator {
                captures: 0,
                base_radius: radius,
            }),
            EntityKind::Prey => None,
        };
        Self {
            id,
            kind,
            pos,
            vel,
            radius,
            alive: true,
            growth,
        }
    }

    #[inline]
    pub fn is_predator(&self) -> bool {
        self.kind == EntityKind::Predator
    }

    #[inline]
    pub fn is_prey(&self) -> bool {
        self.kind == EntityKind::Prey
    }

    /// Mass for elastic response (uniform density disc)
    #[inline]
    pub fn mass(&self) -> f32 {
        self.radius * self.radius
    }

    /// Multiply the radius by `factor` (never shrinks) and count the capture
    pub fn grow(&mut self, factor: f32) -> f32 {
        let factor = if factor.is_finite() { factor.max(1.0) } else { 1.0 };
        self.radius = sanitize_radius(self.radius * factor);
        if let Some(growth) = self.growth.as_mut() {
            growth.captures += 1;
        }
        self.radius
    }
}

/// Replace zero, negative or NaN radii with the minimum floor
pub fn sanitize_radius(radius: f32) -> f32 {
    if radius.is_finite() && radius >= MIN_ENTITY_RADIUS {
        radius
    } else {
        MIN_ENTITY_RADIUS
    }
}

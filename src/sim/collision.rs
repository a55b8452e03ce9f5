//! Contact detection and response
//!
//! Detection produces a flat list of [`Contact`]s for the tick, in this order:
//! predation, predator-predator bounces, prey-prey bounces, then at most one
//! wall contact (the deepest) per entity. Resolution walks that list once;
//! any contact naming an entity already removed earlier in the list is
//! skipped, so removal is idempotent within a tick.
//!
//! Spawns triggered here are queued, never created inline, so a capture can
//! not produce new contacts in the same tick.

use glam::Vec2;

use super::boundary::Boundary;
use super::entity::{Entity, EntityId, EntityKind};
use super::events::SimulationEvent;
use super::kinematics::FALLBACK_DIRECTION;
use super::spatial::SpatialGrid;
use super::state::Arena;

/// A single contact found this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// Predator touched prey
    Predation { predator: EntityId, prey: EntityId },
    /// Two mobile bodies touched (prey-prey or predator-predator)
    Bounce { a: EntityId, b: EntityId },
    /// Body touched the ring; `normal` points from the wall toward the body
    Wall {
        entity: EntityId,
        normal: Vec2,
        penetration: f32,
    },
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

#[inline]
fn discs_overlap(a: &Entity, b: &Entity) -> bool {
    a.pos.distance_squared(b.pos) < (a.radius + b.radius).powi(2)
}

/// Deepest wall contact for one body, as (normal, penetration)
pub fn wall_contact(boundary: &Boundary, entity: &Entity) -> Option<(Vec2, f32)> {
    let thickness = boundary.segments.first()?.thickness;
    let dist = entity.pos.distance(boundary.center);

    // Too far from the ring band to touch any wall
    let band_inner = boundary.apothem() - thickness / 2.0 - entity.radius;
    let band_outer = boundary.radius + thickness / 2.0 + entity.radius;
    if dist < band_inner || dist > band_outer {
        return None;
    }

    let mut deepest: Option<(Vec2, f32)> = None;
    for seg in boundary.segments_near(entity.pos, entity.radius + thickness / 2.0) {
        let closest = seg.closest_point(entity.pos);
        let offset = entity.pos - closest;
        let gap = offset.length();
        let reach = entity.radius + seg.thickness / 2.0;
        if gap >= reach {
            continue;
        }

        let normal = if gap > f32::EPSILON {
            offset / gap
        } else {
            seg.inward_normal
        };
        let penetration = reach - gap;
        if deepest.is_none_or(|(_, d)| penetration > d) {
            deepest = Some((normal, penetration));
        }
    }
    deepest
}

/// Find every contact in the arena's current state
pub fn detect_contacts(arena: &Arena) -> Vec<Contact> {
    let entities = arena.population.entities();
    let prey_radius = arena.population.params.prey_radius;

    let mut grid = SpatialGrid::new(prey_radius * 2.0);
    for (i, e) in entities.iter().enumerate() {
        if e.is_prey() {
            grid.insert(i, e.pos);
        }
    }

    let mut contacts = Vec::new();
    let predators: Vec<&Entity> = entities.iter().filter(|e| e.is_predator()).collect();

    for hunter in &predators {
        let mut near = grid.query(hunter.pos, hunter.radius + prey_radius);
        near.sort_unstable();
        for j in near {
            let prey = &entities[j];
            if discs_overlap(hunter, prey) {
                contacts.push(Contact::Predation {
                    predator: hunter.id,
                    prey: prey.id,
                });
            }
        }
    }

    for (i, a) in predators.iter().enumerate() {
        for b in &predators[i + 1..] {
            if discs_overlap(a, b) {
                contacts.push(Contact::Bounce { a: a.id, b: b.id });
            }
        }
    }

    if arena.config.prey_collisions {
        for (i, a) in entities.iter().enumerate() {
            if !a.is_prey() {
                continue;
            }
            let mut near = grid.query(a.pos, prey_radius * 2.0);
            near.sort_unstable();
            for j in near.into_iter().filter(|&j| j > i) {
                let b = &entities[j];
                if discs_overlap(a, b) {
                    contacts.push(Contact::Bounce { a: a.id, b: b.id });
                }
            }
        }
    }

    for e in entities {
        if let Some((normal, penetration)) = wall_contact(&arena.boundary, e) {
            contacts.push(Contact::Wall {
                entity: e.id,
                normal,
                penetration,
            });
        }
    }

    contacts
}

/// Apply game and physical response for this tick's contacts
pub fn resolve_contacts(
    arena: &mut Arena,
    contacts: &[Contact],
    events: &mut Vec<SimulationEvent>,
) {
    for contact in contacts {
        match *contact {
            Contact::Predation { predator, prey } => consume(arena, predator, prey, events),
            Contact::Bounce { a, b } => {
                bounce_pair(arena.population.entities_mut_pair(a, b));
            }
            Contact::Wall {
                entity,
                normal,
                penetration,
            } => {
                let Some(e) = arena.population.get_mut(entity) else {
                    continue;
                };
                e.pos += normal * penetration;
                if e.vel.dot(normal) < 0.0 {
                    e.vel = reflect_velocity(e.vel, normal);
                    events.push(SimulationEvent::WallContact { entity_id: entity });
                }
            }
        }
    }
}

/// Predator eats prey: grow, remove, queue replacements, count, milestone
fn consume(
    arena: &mut Arena,
    predator: EntityId,
    prey: EntityId,
    events: &mut Vec<SimulationEvent>,
) {
    let population = &mut arena.population;
    if !population.get(prey).is_some_and(Entity::is_prey) {
        return;
    }
    let Some(new_radius) = population.grow_predator(predator, arena.config.growth_factor) else {
        return;
    };
    population.remove_prey(prey);

    events.push(SimulationEvent::PredatorGrew {
        id: predator,
        new_radius,
    });
    events.push(SimulationEvent::EntityRemoved { id: prey });

    population.queue_prey_spawns(arena.config.replacement_factor);

    if population.record_capture() {
        let eaten = population.eaten;
        log::debug!("milestone reached at {eaten} captures");
        events.push(SimulationEvent::MilestoneReached { eaten });
        if population.purges_on_milestone() {
            for id in population.purge_all_of(EntityKind::Prey) {
                events.push(SimulationEvent::EntityRemoved { id });
            }
        }
    }
}

/// Elastic (restitution 1) response between two discs, masses ∝ r²
pub fn bounce_pair(pair: Option<(&mut Entity, &mut Entity)>) -> bool {
    let Some((a, b)) = pair else {
        return false;
    };

    let delta = b.pos - a.pos;
    let dist = delta.length();
    let overlap = a.radius + b.radius - dist;
    if overlap <= 0.0 {
        // Already separated by an earlier contact this tick
        return false;
    }
    let normal = if dist > f32::EPSILON {
        delta / dist
    } else {
        FALLBACK_DIRECTION
    };

    let (ma, mb) = (a.mass(), b.mass());
    let total = ma + mb;

    // Push apart, heavier body moves less
    a.pos -= normal * overlap * (mb / total);
    b.pos += normal * overlap * (ma / total);

    let approach = (b.vel - a.vel).dot(normal);
    if approach < 0.0 {
        let impulse = 2.0 * approach / total;
        a.vel += normal * impulse * mb;
        b.vel -= normal * impulse * ma;
    }
    true
}

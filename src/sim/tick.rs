//! Fixed timestep simulation tick
//!
//! Phase order within one tick:
//! 1. Materialize spawns deferred from the previous tick
//! 2. Integrate gravity and velocity
//! 3. Clamp every speed into the configured band
//! 4. Containment: replace escaped prey, relocate escaped predators
//! 5. Detect contacts, then resolve them
//! 6. Rebuild the ring if it rotates
//! 7. Terminal check
//!
//! A tick always runs to completion; the returned events are in causal order.

use super::collision::{detect_contacts, resolve_contacts};
use super::containment::{EscapeAction, check_escape};
use super::entity::EntityId;
use super::events::{GameOverReason, SimulationEvent};
use super::kinematics::clamp_speed;
use super::state::Arena;

/// Advance the arena by one fixed timestep
///
/// Returns no events and mutates nothing once the session is over.
pub fn tick(arena: &mut Arena) -> Vec<SimulationEvent> {
    if arena.is_over() {
        return Vec::new();
    }

    let mut events = Vec::new();
    let dt = arena.config.dt();
    arena.time_ticks += 1;

    arena
        .population
        .drain_spawn_queue(&mut arena.rng, &mut events);

    let gravity = arena.config.gravity;
    let (min_speed, max_speed) = (arena.config.min_speed, arena.config.max_speed);
    for e in arena.population.entities_mut() {
        e.vel += gravity * dt;
        e.pos += e.vel * dt;
        e.vel = clamp_speed(e.vel, min_speed, max_speed);
    }

    contain(arena, &mut events);

    let contacts = detect_contacts(arena);
    resolve_contacts(arena, &contacts, &mut events);

    if arena.config.is_rotating() {
        let rotation = arena.boundary.rotation + arena.config.rotation_per_tick();
        arena.boundary = arena.boundary.rotated(rotation);
    }

    let boundary_radius = arena.boundary.radius;
    let winner = arena
        .population
        .predators()
        .find(|p| p.radius >= boundary_radius)
        .map(|p| p.id);
    if let Some(predator) = winner {
        let reason = GameOverReason::ArenaFilled { predator };
        log::info!(
            "Predator {predator} filled the arena after {} captures ({} ticks)",
            arena.population.eaten,
            arena.time_ticks
        );
        arena.outcome = Some(reason);
        events.push(SimulationEvent::GameOver { reason });
    }

    events
}

/// Replace escaped prey and bring escaped predators back inside
fn contain(arena: &mut Arena, events: &mut Vec<SimulationEvent>) {
    let center = arena.boundary.center;
    let radius = arena.boundary.radius;
    let escaped: Vec<(EntityId, EscapeAction)> = arena
        .population
        .entities()
        .iter()
        .map(|e| (e.id, check_escape(e, center, radius)))
        .filter(|&(_, action)| action != EscapeAction::Stay)
        .collect();

    for (id, action) in escaped {
        match action {
            EscapeAction::Replace => {
                if arena.population.remove_prey(id).is_some() {
                    events.push(SimulationEvent::EntityRemoved { id });
                    arena
                        .population
                        .queue_prey_spawns(arena.config.replacement_factor);
                    log::trace!("prey {id} escaped");
                }
            }
            EscapeAction::Relocate => {
                if arena.population.relocate_predator(id, &mut arena.rng) {
                    events.push(SimulationEvent::PredatorRelocated { id });
                    log::trace!("predator {id} relocated");
                }
            }
            EscapeAction::Stay => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArenaConfig;
    use glam::Vec2;

    fn closed_arena(prey: usize) -> Arena {
        Arena::new(ArenaConfig {
            side_count: 1000,
            gap_width: 0.0,
            rotation_speed: 0.0,
            initial_prey: prey,
            replacement_factor: 2,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_speeds_stay_in_band_every_tick() {
        // Wall reflection and predation keep speeds, so with prey-prey
        // bounces off the band must hold after the whole tick
        let mut arena = Arena::new(ArenaConfig {
            initial_prey: 200,
            prey_collisions: false,
            ..Default::default()
        })
        .unwrap();
        let (min, max) = (arena.config.min_speed, arena.config.max_speed);

        for _ in 0..120 {
            tick(&mut arena);
            for e in arena.population.entities() {
                let speed = e.vel.length();
                assert!(speed >= min - 1e-2 && speed <= max + 1e-2, "speed {speed}");
            }
        }
    }

    #[test]
    fn test_gravity_accelerates_before_clamp() {
        let mut arena = Arena::new(ArenaConfig {
            gap_width: 0.0,
            rotation_speed: 0.0,
            initial_prey: 0,
            gravity: Vec2::new(0.0, -600.0),
            ..Default::default()
        })
        .unwrap();
        let hunter = arena.population.predators().next().unwrap().id;
        {
            let e = arena.population.get_mut(hunter).unwrap();
            e.pos = Vec2::ZERO;
            e.vel = Vec2::new(300.0, 0.0);
        }

        tick(&mut arena);
        let e = arena.population.get(hunter).unwrap();
        // One 60 Hz step of -600 u/s² adds -10 u/s, well inside the speed band
        assert!((e.vel - Vec2::new(300.0, -10.0)).length() < 1e-3);
        assert!((e.pos - Vec2::new(5.0, -10.0 / 60.0)).length() < 1e-3);
    }

    #[test]
    fn test_zero_velocity_entity_recovers() {
        let mut arena = closed_arena(1);
        let hunter = arena.population.predators().next().unwrap().id;
        arena.population.get_mut(hunter).unwrap().pos = Vec2::new(200.0, 0.0);
        let id = arena.population.prey().next().unwrap().id;
        {
            let e = arena.population.get_mut(id).unwrap();
            e.pos = Vec2::new(-200.0, 0.0);
            e.vel = Vec2::ZERO;
        }

        tick(&mut arena);
        let e = arena.population.get(id).unwrap();
        assert!(e.vel.is_finite());
        assert!(e.vel.length() >= arena.config.min_speed - 1e-3);
    }

    #[test]
    fn test_escaped_prey_is_replaced_next_tick() {
        // Spawns land near the center, well away from the parked predator
        let mut arena = Arena::new(ArenaConfig {
            gap_width: 0.0,
            rotation_speed: 0.0,
            initial_prey: 1,
            replacement_factor: 2,
            spawn_radius_ratio: 0.3,
            ..Default::default()
        })
        .unwrap();
        let hunter = arena.population.predators().next().unwrap().id;
        {
            let e = arena.population.get_mut(hunter).unwrap();
            e.pos = Vec2::new(0.0, -340.0);
            e.vel = Vec2::new(480.0, 0.0);
        }
        let id = arena.population.prey().next().unwrap().id;
        {
            let e = arena.population.get_mut(id).unwrap();
            e.pos = Vec2::new(0.0, 900.0);
            e.vel = Vec2::new(0.0, 200.0);
        }

        let events = tick(&mut arena);
        assert!(events.contains(&SimulationEvent::EntityRemoved { id }));
        assert_eq!(arena.population.prey_count(), 0);
        assert_eq!(arena.population.pending_spawns(), 2);

        let events = tick(&mut arena);
        let spawned = events
            .iter()
            .filter(|e| matches!(e, SimulationEvent::EntitySpawned { .. }))
            .count();
        assert_eq!(spawned, 2);
        assert_eq!(arena.population.prey_count(), 2);
    }

    #[test]
    fn test_escaped_predator_is_relocated_not_removed() {
        let mut arena = closed_arena(0);
        let hunter = arena.population.predators().next().unwrap().id;
        arena.population.get_mut(hunter).unwrap().pos = Vec2::new(-1000.0, 0.0);

        let events = tick(&mut arena);
        assert!(events.contains(&SimulationEvent::PredatorRelocated { id: hunter }));
        let e = arena.population.get(hunter).unwrap();
        assert!(e.pos.length() <= arena.config.spawn_radius() + 1e-3);
        assert_eq!(arena.population.predator_count(), 1);
    }

    #[test]
    fn test_rotation_rebuilds_ring_each_tick() {
        let mut arena = Arena::new(ArenaConfig::default()).unwrap();
        let before = arena.boundary.segments[0].midpoint;
        tick(&mut arena);
        assert!((arena.boundary.rotation - arena.config.rotation_per_tick()).abs() < 1e-6);
        assert_ne!(arena.boundary.segments[0].midpoint, before);
    }

    #[test]
    fn test_static_ring_is_not_rebuilt() {
        let mut arena = closed_arena(0);
        let before = arena.boundary.segments.clone();
        tick(&mut arena);
        assert_eq!(arena.boundary.segments, before);
    }

    #[test]
    fn test_game_over_fires_once_and_freezes_state() {
        let mut arena = closed_arena(3);
        let hunter = arena.population.predators().next().unwrap().id;
        arena.population.get_mut(hunter).unwrap().radius = arena.boundary.radius;

        let events = tick(&mut arena);
        let game_overs = events
            .iter()
            .filter(|e| matches!(e, SimulationEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
        assert!(arena.is_over());

        let ticks = arena.time_ticks;
        let snapshot = arena.population.entities().to_vec();
        for _ in 0..10 {
            assert!(tick(&mut arena).is_empty());
        }
        assert_eq!(arena.time_ticks, ticks);
        assert_eq!(arena.population.entities(), snapshot.as_slice());
    }

    #[test]
    fn test_predator_radius_never_decreases() {
        let mut arena = Arena::new(ArenaConfig {
            initial_prey: 300,
            side_count: 128,
            ..Default::default()
        })
        .unwrap();
        let mut last = arena.largest_predator_radius();
        for _ in 0..600 {
            tick(&mut arena);
            let r = arena.largest_predator_radius();
            assert!(r >= last);
            last = r;
        }
    }

    #[test]
    fn test_determinism() {
        let config = ArenaConfig {
            initial_prey: 50,
            ..Default::default()
        };
        let mut a = Arena::new(config.clone()).unwrap();
        let mut b = Arena::new(config).unwrap();
        for _ in 0..90 {
            assert_eq!(tick(&mut a), tick(&mut b));
        }
        assert_eq!(a.population.entities(), b.population.entities());
        assert_eq!(a.population.eaten, b.population.eaten);
    }
}

//! Population manager
//!
//! Owns every live entity plus the counters that drive the rules:
//! - Dense storage with an `id -> index` map; removal is a swap-remove, so
//!   ids stay valid while indices may move
//! - Spawns requested mid-tick are only counted here and materialize when
//!   [`Population::drain_spawn_queue`] runs at the start of the next tick
//! - The eaten counter and milestone thresholds

use std::collections::HashMap;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::entity::{Entity, EntityId, EntityKind};
use super::events::SimulationEvent;
use crate::config::ArenaConfig;
use crate::polar_to_cartesian;

/// Where and how fast new bodies appear
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnParams {
    pub center: Vec2,
    pub spawn_radius: f32,
    pub prey_radius: f32,
    pub prey_speed: f32,
    pub predator_radius: f32,
    pub predator_speed: f32,
}

impl SpawnParams {
    pub fn from_config(config: &ArenaConfig) -> Self {
        Self {
            center: config.center,
            spawn_radius: config.spawn_radius(),
            prey_radius: config.prey_radius(),
            prey_speed: config.prey_spawn_speed,
            predator_radius: config.predator_radius(),
            predator_speed: config.predator_spawn_speed,
        }
    }

    /// Uniform angle, uniform distance in `[0, spawn_radius)` from the center
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let theta = rng.random_range(0.0..TAU);
        let dist = rng.random::<f32>() * self.spawn_radius;
        self.center + polar_to_cartesian(dist, theta)
    }
}

/// A velocity of `speed` in a uniformly random direction
pub fn random_velocity<R: Rng + ?Sized>(rng: &mut R, speed: f32) -> Vec2 {
    polar_to_cartesian(speed, rng.random_range(0.0..TAU))
}

#[derive(Debug, Clone)]
pub struct Population {
    /// Live entities, order changes on removal
    entities: Vec<Entity>,
    index: HashMap<EntityId, usize>,
    next_id: u32,
    /// Prey spawns deferred to the next tick
    pending_spawns: usize,
    /// Total prey consumed this session
    pub eaten: u32,
    milestones: Vec<u32>,
    purge_on_milestone: bool,
    population_cap: Option<usize>,
    pub params: SpawnParams,
}

impl Population {
    pub fn new(config: &ArenaConfig) -> Self {
        Self {
            entities: Vec::new(),
            index: HashMap::new(),
            next_id: 1,
            pending_spawns: 0,
            eaten: 0,
            milestones: config.milestones.clone(),
            purge_on_milestone: config.purge_on_milestone,
            population_cap: config.population_cap,
            params: SpawnParams::from_config(config),
        }
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.index.insert(id, self.entities.len());
        self.entities.push(entity);
        id
    }

    /// Swap-remove; idempotent
    fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.index.remove(&id)?;
        let mut removed = self.entities.swap_remove(idx);
        if let Some(moved) = self.entities.get(idx) {
            self.index.insert(moved.id, idx);
        }
        removed.alive = false;
        Some(removed)
    }

    /// Create a prey at `position` (or a random interior point) moving at the spawn speed
    pub fn spawn_prey<R: Rng + ?Sized>(&mut self, position: Option<Vec2>, rng: &mut R) -> EntityId {
        let pos = position.unwrap_or_else(|| self.params.random_point(rng));
        let vel = random_velocity(rng, self.params.prey_speed);
        let id = self.next_entity_id();
        self.insert(Entity::new(id, EntityKind::Prey, pos, vel, self.params.prey_radius))
    }

    /// Create a predator at `position` (or a random interior point)
    pub fn spawn_predator<R: Rng + ?Sized>(
        &mut self,
        position: Option<Vec2>,
        rng: &mut R,
    ) -> EntityId {
        let pos = position.unwrap_or_else(|| self.params.random_point(rng));
        let vel = random_velocity(rng, self.params.predator_speed);
        let id = self.next_entity_id();
        self.insert(Entity::new(
            id,
            EntityKind::Predator,
            pos,
            vel,
            self.params.predator_radius,
        ))
    }

    /// Remove a prey. Unknown or already-removed ids are a no-op.
    pub fn remove_prey(&mut self, id: EntityId) -> Option<Entity> {
        match self.get(id) {
            Some(e) if e.is_prey() => self.remove(id),
            Some(_) => {
                log::warn!("refusing to remove predator {id}");
                None
            }
            None => None,
        }
    }

    /// Grow a predator; returns its new radius
    pub fn grow_predator(&mut self, id: EntityId, factor: f32) -> Option<f32> {
        self.get_mut(id)
            .filter(|e| e.is_predator())
            .map(|e| e.grow(factor))
    }

    /// Teleport a predator to a random interior point, keeping its velocity
    pub fn relocate_predator<R: Rng + ?Sized>(&mut self, id: EntityId, rng: &mut R) -> bool {
        let pos = self.params.random_point(rng);
        match self.get_mut(id) {
            Some(e) if e.is_predator() => {
                e.pos = pos;
                true
            }
            _ => false,
        }
    }

    /// Remove every entity of `kind`; predators are never purged
    pub fn purge_all_of(&mut self, kind: EntityKind) -> Vec<EntityId> {
        if kind == EntityKind::Predator {
            log::warn!("predators cannot be purged");
            return Vec::new();
        }
        let ids: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.id)
            .collect();
        for &id in &ids {
            self.remove(id);
        }
        log::debug!("purged {} {:?}", ids.len(), kind);
        ids
    }

    /// Request `count` prey for the next tick; returns how many the cap allowed
    pub fn queue_prey_spawns(&mut self, count: u32) -> u32 {
        let accepted = match self.population_cap {
            Some(cap) => {
                let room = cap.saturating_sub(self.prey_count() + self.pending_spawns);
                (count as usize).min(room) as u32
            }
            None => count,
        };
        if accepted < count {
            log::trace!("population cap dropped {} spawns", count - accepted);
        }
        self.pending_spawns += accepted as usize;
        accepted
    }

    /// Materialize deferred spawns, emitting `EntitySpawned` for each
    pub fn drain_spawn_queue<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        events: &mut Vec<SimulationEvent>,
    ) -> usize {
        let count = std::mem::take(&mut self.pending_spawns);
        for _ in 0..count {
            let id = self.spawn_prey(None, rng);
            events.push(SimulationEvent::EntitySpawned { id });
        }
        count
    }

    /// Count a capture; returns true when the new total is a milestone
    pub fn record_capture(&mut self) -> bool {
        self.eaten += 1;
        self.milestones.contains(&self.eaten)
    }

    pub fn purges_on_milestone(&self) -> bool {
        self.purge_on_milestone
    }

    pub fn pending_spawns(&self) -> usize {
        self.pending_spawns
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index.get(&id).map(|&i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.index.get(&id).map(|&i| &mut self.entities[i])
    }

    /// Dense index of a live entity
    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    /// Mutable access to two distinct live entities at once
    pub fn entities_mut_pair(
        &mut self,
        a: EntityId,
        b: EntityId,
    ) -> Option<(&mut Entity, &mut Entity)> {
        let (ia, ib) = (self.index_of(a)?, self.index_of(b)?);
        if ia == ib {
            return None;
        }
        if ia < ib {
            let (left, right) = self.entities.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.entities.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    pub fn prey(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.is_prey())
    }

    pub fn predators(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.is_predator())
    }

    pub fn prey_count(&self) -> usize {
        self.prey().count()
    }

    pub fn predator_count(&self) -> usize {
        self.predators().count()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

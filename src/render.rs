//! Render sink
//!
//! Backend-agnostic view of the arena. The recorder keeps the latest snapshot
//! plus a short fading trail per entity; a drawing backend only has to walk
//! the snapshot.

use std::collections::{HashMap, VecDeque};

use glam::Vec2;
use serde::Serialize;

use crate::driver::{SimulationObserver, TickFrame};
use crate::sim::{Arena, EntityId, EntityKind, SimulationEvent, WallSegment};

/// Interpolate color from speed (slow=blue, medium=green, fast=red/orange)
pub fn speed_color(speed: f32, min_speed: f32, max_speed: f32, alpha: f32) -> [f32; 4] {
    let span = (max_speed - min_speed).max(f32::EPSILON);
    let t = ((speed - min_speed) / span).clamp(0.0, 1.0);

    let (r, g, b) = if t < 0.25 {
        let u = t / 0.25;
        (0.2, 0.4 + 0.4 * u, 1.0)
    } else if t < 0.5 {
        let u = (t - 0.25) / 0.25;
        (0.2, 0.8, 1.0 - 0.6 * u)
    } else if t < 0.75 {
        let u = (t - 0.5) / 0.25;
        (0.2 + 0.8 * u, 0.8, 0.4 - 0.2 * u)
    } else {
        let u = (t - 0.75) / 0.25;
        (1.0, 0.8 - 0.5 * u, 0.2)
    };

    [r, g, b, alpha]
}

/// One recorded trail sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub speed: f32,
}

/// Drawable state of one entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub radius: f32,
    pub color: [f32; 4],
    /// Oldest first, alpha fading toward the tail
    pub trail: Vec<(Vec2, f32)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub tick: u64,
    pub center: Vec2,
    pub boundary_radius: f32,
    pub rotation: f32,
    pub segments: Vec<WallSegment>,
    pub entities: Vec<EntityView>,
    pub eaten: u32,
}

impl RenderSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

const PREDATOR_COLOR: [f32; 4] = [1.0, 0.35, 0.25, 1.0];

/// Observer that records snapshots and trails
#[derive(Debug, Default)]
pub struct RenderRecorder {
    latest: Option<RenderSnapshot>,
    trails: HashMap<EntityId, VecDeque<TrailPoint>>,
}

impl RenderRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<&RenderSnapshot> {
        self.latest.as_ref()
    }

    pub fn trail(&self, id: EntityId) -> Option<&VecDeque<TrailPoint>> {
        self.trails.get(&id)
    }

    pub fn trail_count(&self) -> usize {
        self.trails.len()
    }

    fn record(&mut self, tick: u64, events: &[SimulationEvent], arena: &Arena) {
        for event in events {
            if let SimulationEvent::EntityRemoved { id } = event {
                self.trails.remove(id);
            }
        }

        let limit = arena.config.trail_ticks;
        let (min_speed, max_speed) = (arena.config.min_speed, arena.config.max_speed);
        let mut entities = Vec::with_capacity(arena.population.len());

        for e in arena.population.entities() {
            let speed = e.vel.length();
            let trail = self.trails.entry(e.id).or_default();
            if limit > 0 {
                if trail.len() == limit {
                    trail.pop_front();
                }
                trail.push_back(TrailPoint { pos: e.pos, speed });
            }

            let len = trail.len() as f32;
            let faded = trail
                .iter()
                .enumerate()
                .map(|(i, p)| (p.pos, (i + 1) as f32 / len * 0.8))
                .collect();

            let color = match e.kind {
                EntityKind::Predator => PREDATOR_COLOR,
                EntityKind::Prey => speed_color(speed, min_speed, max_speed, 1.0),
            };
            entities.push(EntityView {
                id: e.id,
                kind: e.kind,
                pos: e.pos,
                radius: e.radius,
                color,
                trail: faded,
            });
        }

        self.latest = Some(RenderSnapshot {
            tick,
            center: arena.boundary.center,
            boundary_radius: arena.boundary.radius,
            rotation: arena.boundary.rotation,
            segments: arena.boundary.segments.clone(),
            entities,
            eaten: arena.population.eaten,
        });
    }
}

impl SimulationObserver for RenderRecorder {
    fn on_tick(&mut self, frame: &TickFrame<'_>) {
        self.record(frame.tick, frame.events, frame.arena);
    }

    fn on_reset(&mut self) {
        self.latest = None;
        self.trails.clear();
    }
}

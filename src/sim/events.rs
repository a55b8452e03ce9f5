//! Discrete events emitted by a tick, in causal order

use serde::{Deserialize, Serialize};

use super::entity::EntityId;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// A predator grew to the size of the ring (the session is won)
    ArenaFilled { predator: EntityId },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimulationEvent {
    EntityRemoved { id: EntityId },
    EntitySpawned { id: EntityId },
    PredatorGrew { id: EntityId, new_radius: f32 },
    /// Predator left the ring and was put back inside
    PredatorRelocated { id: EntityId },
    WallContact { entity_id: EntityId },
    /// The cumulative capture count hit a configured threshold
    MilestoneReached { eaten: u32 },
    GameOver { reason: GameOverReason },
}

impl SimulationEvent {
    /// Short stable label for logs
    pub fn label(&self) -> &'static str {
        match self {
            SimulationEvent::EntityRemoved { .. } => "entity_removed",
            SimulationEvent::EntitySpawned { .. } => "entity_spawned",
            SimulationEvent::PredatorGrew { .. } => "predator_grew",
            SimulationEvent::PredatorRelocated { .. } => "predator_relocated",
            SimulationEvent::WallContact { .. } => "wall_contact",
            SimulationEvent::MilestoneReached { .. } => "milestone",
            SimulationEvent::GameOver { .. } => "game_over",
        }
    }
}

//! Deterministic simulation module
//!
//! All arena logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (dense population order, then entity id)
//! - No rendering, audio or platform dependencies

pub mod boundary;
pub mod collision;
pub mod containment;
pub mod entity;
pub mod events;
pub mod kinematics;
pub mod population;
pub mod spatial;
pub mod state;
pub mod tick;

pub use boundary::{Boundary, WallSegment, build_boundary};
pub use collision::{Contact, detect_contacts, resolve_contacts};
pub use containment::{EscapeAction, check_escape};
pub use entity::{Entity, EntityId, EntityKind};
pub use events::{GameOverReason, SimulationEvent};
pub use kinematics::clamp_speed;
pub use population::Population;
pub use state::Arena;
pub use tick::tick;

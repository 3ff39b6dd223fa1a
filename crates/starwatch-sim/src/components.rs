//! ECS components attached to space objects in the registry.
//!
//! Components are plain data; behavior lives in the modules that consume
//! them (damage, comms, replication). An object's capabilities are the set of
//! optional components it carries.

use glam::Vec2;
use hecs::Entity;

use starwatch_core::enums::{CommsState, DamageType};
use starwatch_core::types::BlastParams;

use crate::factions::FactionId;

/// Interaction radius, fixed at construction from the collision range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub radius: f32,
}

/// Faction the object belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allegiance(pub FactionId);

/// Human-facing metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Descriptor {
    /// Explicit call sign. When unset a call sign is derived from kind and id.
    pub call_sign: Option<String>,
    /// Free text shown on the science station.
    pub description: String,
}

/// Structural hit points. Objects without a hull ignore damage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hull {
    pub current: f32,
    pub max: f32,
}

/// Shield capacity, drained before the hull.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shields {
    pub current: f32,
    pub max: f32,
}

/// Blast released when the object is destroyed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Explosive {
    pub blast: BlastParams,
    pub kind: DamageType,
}

/// Comms session of a player ship.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommsSession {
    pub state: CommsState,
    /// The object on the other end of the channel.
    pub target: Option<Entity>,
    /// Call sign of `target` when the session was established.
    pub target_name: String,
    /// Message shown to the crew once they answer.
    pub incoming_message: String,
}

/// Last replicated values of the synchronized fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Replicated {
    /// Position changes shorter than this are not sent (meters).
    pub significant_range: f32,
    pub last_position: Option<Vec2>,
    pub last_velocity: Option<Vec2>,
    pub last_rotation: Option<f32>,
    pub last_angular_velocity: Option<f32>,
    pub last_faction: Option<FactionId>,
}

impl Replicated {
    pub fn new(significant_range: f32) -> Self {
        Self {
            significant_range,
            last_position: None,
            last_velocity: None,
            last_rotation: None,
            last_angular_velocity: None,
            last_faction: None,
        }
    }
}

/// Marks an object whose destruction is in progress. Its destruction hook
/// may still see it in the registry, but it no longer takes damage.
#[derive(Debug, Clone, Copy)]
pub struct Destroying;

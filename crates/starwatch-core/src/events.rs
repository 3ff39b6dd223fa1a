//! Events emitted by the simulation for consumers outside the core
//! (replication, presentation, scripting callbacks).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::{CommsState, DamageType, ObjectKind};
use crate::types::ObjectId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// Object added to the registry.
    Spawned { id: ObjectId, kind: ObjectKind },
    /// Object's damage hook changed its shields or hull.
    Damaged {
        id: ObjectId,
        amount: f32,
        kind: DamageType,
        instigator: Option<ObjectId>,
    },
    /// Object removed from the registry.
    Destroyed {
        id: ObjectId,
        kind: ObjectKind,
        position: Vec2,
    },
    /// A hail was accepted into a player ship's session.
    Hailed {
        source: ObjectId,
        target: ObjectId,
        message: String,
    },
    /// A player ship's session changed state for a reason other than a hail.
    CommsChanged {
        ship: ObjectId,
        state: CommsState,
    },
}

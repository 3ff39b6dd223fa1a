//! Space-object interaction layer for Starwatch.
//!
//! Owns the hecs registry of live space objects and the services built on
//! it: faction relations, the reputation ledger, proximity queries over a
//! broad-phase spatial index, area damage, player ship comms arbitration and
//! replication change tracking. [`Simulation`] ties them together for one
//! game world; [`ObjectHandle`] is the per-object surface given to scripts.

pub mod comms;
pub mod components;
pub mod config;
pub mod damage;
pub mod engine;
pub mod factions;
pub mod lifecycle;
pub mod proximity;
pub mod registry;
pub mod replication;
pub mod reputation;
pub mod script;
pub mod spatial;
pub mod templates;

pub use starwatch_core as core;

pub use config::{ConfigError, FactionConfig, SimConfig};
pub use damage::{DamageOutcome, DamageReport};
pub use engine::{Simulation, TickOutput};
pub use factions::{FactionId, FactionTable};
pub use proximity::ObjectFilter;
pub use registry::{ObjectSpec, Registry};
pub use replication::ReplicationFrame;
pub use script::ObjectHandle;

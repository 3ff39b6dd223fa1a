//! Core types and definitions for the Starwatch space-object layer.
//!
//! This crate defines the vocabulary shared by the simulation and by any
//! consumer of its output: transforms, object kinds, faction relations,
//! damage descriptors, comms states, events, and constants.
//! It has no dependency on the ECS or any runtime framework.

pub mod constants;
pub mod enums;
pub mod events;
pub mod sector;
pub mod types;

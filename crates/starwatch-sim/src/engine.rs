//! Simulation instance: the registry, faction table, reputation ledger and
//! everything that acts on them.
//!
//! One `Simulation` exists per game world. Gameplay code and scripts mutate
//! it between ticks; `tick` advances the clock and hands back the events and
//! the replication frame produced since the previous tick. Physics
//! integration is left to the caller.

use glam::Vec2;
use hecs::Entity;
use serde::Serialize;

use starwatch_core::enums::CommsState;
use starwatch_core::events::SimEvent;
use starwatch_core::sector::sector_name_with_size;
use starwatch_core::types::{BlastParams, DamageInfo, SimTime};

use crate::comms;
use crate::components::CommsSession;
use crate::config::{self, ConfigError, FactionConfig, SimConfig};
use crate::damage::{self, DamageOutcome, DamageReport};
use crate::factions::{FactionId, FactionTable};
use crate::lifecycle;
use crate::proximity::{self, ObjectFilter};
use crate::registry::{object_id, ObjectSpec, Registry};
use crate::replication::{self, ReplicationFrame};
use crate::reputation::ReputationLedger;
use crate::script::ObjectHandle;
use crate::spatial::GridIndex;

/// Output of one tick.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TickOutput {
    pub time: SimTime,
    /// Events raised since the previous tick, in the order they happened.
    pub events: Vec<SimEvent>,
    pub replication: ReplicationFrame,
}

pub struct Simulation {
    config: SimConfig,
    time: SimTime,
    registry: Registry,
    factions: FactionTable,
    reputation: ReputationLedger,
    events: Vec<SimEvent>,
}

impl Simulation {
    /// Create a simulation with an explicit faction table.
    pub fn new(config: SimConfig, factions: FactionTable) -> Self {
        let reputation = ReputationLedger::with_factions(factions.len());
        let index = GridIndex::new(config.grid_cell_size);
        tracing::debug!(
            target: "starwatch::sim",
            factions = factions.len(),
            grid_cell_size = config.grid_cell_size,
            "simulation.created"
        );
        Self {
            config,
            time: SimTime::default(),
            registry: Registry::new(Box::new(index)),
            factions,
            reputation,
            events: Vec::new(),
        }
    }

    /// Create a simulation from a faction config.
    pub fn with_faction_config(
        config: SimConfig,
        factions: &FactionConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(config, FactionTable::from_config(factions)?))
    }

    /// Create a simulation with the factions named by the environment, or
    /// the builtin set when the override is missing or invalid.
    pub fn from_env(config: SimConfig) -> Self {
        let loaded = config::load_factions_from_env();
        let factions = match FactionTable::from_config(&loaded) {
            Ok(table) => table,
            Err(err) => {
                tracing::warn!(
                    target: "starwatch::config",
                    error = %err,
                    "faction_config.invalid, using builtin"
                );
                Self::builtin_factions()
            }
        };
        Self::new(config, factions)
    }

    fn builtin_factions() -> FactionTable {
        FactionTable::from_config(&FactionConfig::builtin()).unwrap_or_default()
    }

    // --- Lifecycle ---

    /// Register a new object.
    pub fn spawn(&mut self, spec: ObjectSpec) -> Entity {
        let kind = spec.kind;
        let entity = self
            .registry
            .register(spec, self.config.default_significant_range);
        self.events.push(SimEvent::Spawned {
            id: object_id(entity),
            kind,
        });
        entity
    }

    /// Destroy an object, running its destruction hook first. Returns false
    /// if it was already gone.
    pub fn destroy(&mut self, id: Entity) -> bool {
        lifecycle::destroy(&mut self.registry, id, &mut self.events)
    }

    /// Advance the clock by one tick and collect everything produced since
    /// the previous one.
    pub fn tick(&mut self) -> TickOutput {
        self.time.advance();
        let replication = self.replication_frame();
        TickOutput {
            time: self.time,
            events: self.drain_events(),
            replication,
        }
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Changes to replicated fields since the previous frame.
    pub fn replication_frame(&mut self) -> ReplicationFrame {
        replication::collect(&mut self.registry, self.time.tick)
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable registry access for transform and metadata setters.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    // --- Factions and reputation ---

    pub fn factions(&self) -> &FactionTable {
        &self.factions
    }

    pub fn factions_mut(&mut self) -> &mut FactionTable {
        &mut self.factions
    }

    /// Add a faction and give it a reputation balance.
    pub fn add_faction(&mut self, name: &str, description: &str) -> FactionId {
        let id = self.factions.add_faction(name, description);
        self.reputation.provision(self.factions.len());
        id
    }

    pub fn reputation(&self) -> &ReputationLedger {
        &self.reputation
    }

    pub fn reputation_mut(&mut self) -> &mut ReputationLedger {
        &mut self.reputation
    }

    pub fn is_enemy(&self, a: Entity, b: Entity) -> bool {
        match (self.registry.faction(a), self.registry.faction(b)) {
            (Some(own), Some(other)) => self.factions.is_enemy(own, other),
            _ => false,
        }
    }

    pub fn is_friendly(&self, a: Entity, b: Entity) -> bool {
        match (self.registry.faction(a), self.registry.faction(b)) {
            (Some(own), Some(other)) => self.factions.is_friendly(own, other),
            _ => false,
        }
    }

    // --- Proximity ---

    pub fn query_circle(&self, center: Vec2, radius: f32, filter: ObjectFilter) -> Vec<Entity> {
        proximity::query_circle(&self.registry, center, radius, filter, None)
    }

    pub fn any_enemy_within(&self, origin: Entity, range: f32) -> bool {
        proximity::any_enemy_within(&self.registry, &self.factions, origin, range)
    }

    pub fn all_within(&self, origin: Entity, range: f32) -> Vec<Entity> {
        proximity::all_within(&self.registry, origin, range)
    }

    pub fn enemies_within(&self, origin: Entity, range: f32) -> Vec<Entity> {
        proximity::enemies_within(&self.registry, &self.factions, origin, range)
    }

    // --- Damage ---

    /// Resolve one area pulse.
    pub fn damage_area(
        &mut self,
        epicenter: Vec2,
        blast: BlastParams,
        info: DamageInfo,
    ) -> DamageReport {
        damage::damage_area(&mut self.registry, epicenter, blast, info, &mut self.events)
    }

    /// Run one object's damage hook.
    pub fn take_damage(&mut self, id: Entity, amount: f32, info: DamageInfo) -> DamageOutcome {
        damage::apply_damage(&mut self.registry, id, amount, info, &mut self.events)
    }

    // --- Comms ---

    pub fn hail(&mut self, source: Entity, target: Entity, message: &str) -> bool {
        comms::hail(&mut self.registry, source, target, message, &mut self.events)
    }

    pub fn open_comms_to(&mut self, source: Entity, target: Entity) -> bool {
        comms::open_comms_to(&mut self.registry, source, target, &mut self.events)
    }

    pub fn comms_session(&self, ship: Entity) -> Option<CommsSession> {
        comms::session(&self.registry, ship)
    }

    /// Crew-side transition of a player ship's session.
    pub fn set_comms_state(&mut self, ship: Entity, state: CommsState) -> bool {
        comms::set_state(&mut self.registry, ship, state, &mut self.events)
    }

    // --- Navigation ---

    /// Sector name of `position` under this simulation's sector size.
    pub fn sector_name(&self, position: Vec2) -> String {
        sector_name_with_size(position, self.config.sector_size)
    }

    // --- Scripting ---

    /// Scripting handle for a live object.
    pub fn object(&mut self, id: Entity) -> Option<ObjectHandle<'_>> {
        if self.registry.contains(id) {
            Some(ObjectHandle::new(self, id))
        } else {
            None
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimConfig::default(), Self::builtin_factions())
    }
}

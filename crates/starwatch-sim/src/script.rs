//! Per-object handle exposed to scenario scripts.
//!
//! A handle borrows the simulation mutably for as long as the script holds
//! it. Once the object is destroyed through the handle (directly or by
//! damage) getters fall back to zero or empty values and setters return
//! false; check [`ObjectHandle::is_valid`] when it matters.

use glam::Vec2;
use hecs::Entity;

use starwatch_core::types::{DamageInfo, ObjectId};

use crate::damage::DamageOutcome;
use crate::engine::Simulation;
use crate::factions::FactionId;
use crate::registry::object_id;

pub struct ObjectHandle<'a> {
    sim: &'a mut Simulation,
    id: Entity,
}

impl<'a> ObjectHandle<'a> {
    pub(crate) fn new(sim: &'a mut Simulation, id: Entity) -> Self {
        Self { sim, id }
    }

    pub fn entity(&self) -> Entity {
        self.id
    }

    pub fn id(&self) -> ObjectId {
        object_id(self.id)
    }

    pub fn is_valid(&self) -> bool {
        self.sim.registry().contains(self.id)
    }

    // --- Transform ---

    pub fn position(&self) -> Vec2 {
        self.sim.registry().position(self.id).unwrap_or_default()
    }

    pub fn set_position(&mut self, position: Vec2) -> bool {
        self.sim.registry_mut().set_position(self.id, position)
    }

    /// Heading in degrees, `[0, 360)`.
    pub fn rotation(&self) -> f32 {
        self.transform().rotation
    }

    pub fn set_rotation(&mut self, degrees: f32) -> bool {
        self.sim.registry_mut().set_rotation(self.id, degrees)
    }

    pub fn velocity(&self) -> Vec2 {
        self.transform().velocity
    }

    /// Degrees per second.
    pub fn angular_velocity(&self) -> f32 {
        self.transform().angular_velocity
    }

    fn transform(&self) -> starwatch_core::types::Transform {
        self.sim.registry().transform(self.id).unwrap_or_default()
    }

    // --- Faction ---

    fn faction(&self) -> FactionId {
        self.sim.registry().faction(self.id).unwrap_or_default()
    }

    /// Name of the object's faction.
    pub fn faction_name(&self) -> String {
        self.sim.factions().name(self.faction()).to_owned()
    }

    /// Faction table index, usable with [`Self::set_faction_id`] on another
    /// object.
    pub fn faction_id(&self) -> u32 {
        self.faction().index()
    }

    /// Join the faction called `name`. Unknown names leave the faction as is.
    pub fn set_faction(&mut self, name: &str) -> bool {
        match self.sim.factions().id_by_name(name) {
            Some(faction) => self.sim.registry_mut().set_faction(self.id, faction),
            None => {
                tracing::debug!(
                    target: "starwatch::sim",
                    id = %self.id(),
                    faction = name,
                    "set_faction.unknown_name"
                );
                false
            }
        }
    }

    /// Join the faction at `index`. Out-of-range indices are ignored.
    pub fn set_faction_id(&mut self, index: u32) -> bool {
        match self.sim.factions().id(index) {
            Some(faction) => self.sim.registry_mut().set_faction(self.id, faction),
            None => false,
        }
    }

    /// Whether this object's faction considers `other` hostile.
    pub fn is_enemy(&self, other: Entity) -> bool {
        self.sim.is_enemy(self.id, other)
    }

    pub fn is_friendly(&self, other: Entity) -> bool {
        self.sim.is_friendly(self.id, other)
    }

    // --- Identity ---

    pub fn call_sign(&self) -> String {
        self.sim.registry().call_sign(self.id).unwrap_or_default()
    }

    pub fn set_call_sign(&mut self, call_sign: &str) -> bool {
        self.sim.registry_mut().set_call_sign(self.id, call_sign)
    }

    /// Text shown on the science station.
    pub fn description(&self) -> String {
        self.sim.registry().description(self.id).unwrap_or_default()
    }

    pub fn set_description(&mut self, description: &str) -> bool {
        self.sim.registry_mut().set_description(self.id, description)
    }

    /// Navigation sector the object is in, e.g. `F5`.
    pub fn sector_name(&self) -> String {
        self.sim.sector_name(self.position())
    }

    // --- Surroundings ---

    pub fn are_enemies_in_range(&self, range: f32) -> bool {
        self.sim.any_enemy_within(self.id, range)
    }

    /// Every other object within `range`, in ascending id order.
    pub fn objects_in_range(&self, range: f32) -> Vec<Entity> {
        self.sim.all_within(self.id, range)
    }

    // --- Reputation of the object's faction ---

    pub fn reputation_points(&self) -> f32 {
        self.sim.reputation().get(self.faction())
    }

    /// Spend points. Fails without spending when the balance is too low.
    pub fn take_reputation_points(&mut self, amount: f32) -> bool {
        let faction = self.faction();
        self.sim.reputation_mut().take(faction, amount)
    }

    pub fn add_reputation_points(&mut self, amount: f32) {
        let faction = self.faction();
        self.sim.reputation_mut().add(faction, amount);
    }

    pub fn remove_reputation_points(&mut self, amount: f32) {
        let faction = self.faction();
        self.sim.reputation_mut().remove(faction, amount);
    }

    // --- Comms ---

    /// Hail a player ship. See [`crate::comms::hail`].
    pub fn open_comms_to(&mut self, target: Entity) -> bool {
        self.sim.open_comms_to(self.id, target)
    }

    /// Hail a player ship, showing `message` when the crew answers.
    pub fn send_comms_message(&mut self, target: Entity, message: &str) -> bool {
        self.sim.hail(self.id, target, message)
    }

    // --- Damage ---

    /// Apply damage. `kind` is `"energy"`, `"kinetic"` or `"emp"`, any other
    /// value or `None` deals unspecified damage.
    pub fn take_damage(&mut self, amount: f32, kind: Option<&str>) -> DamageOutcome {
        self.sim
            .take_damage(self.id, amount, DamageInfo::from_token(kind))
    }

    /// Destroy the object.
    pub fn destroy(self) -> bool {
        self.sim.destroy(self.id)
    }
}

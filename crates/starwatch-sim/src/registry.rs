//! Entity registry: the authoritative set of live space objects.
//!
//! Objects are rows of a `hecs::World` keyed by generational [`Entity`]
//! handles. The registry also owns the broad-phase index and keeps it in
//! step with every position or radius change, so a proximity query issued
//! after a setter sees the new position.

use glam::Vec2;
use hecs::{Entity, EntityBuilder, World};

use starwatch_core::enums::{DamageType, ObjectKind};
use starwatch_core::types::{normalize_degrees, BlastParams, ObjectId, Transform};

use crate::components::*;
use crate::factions::FactionId;
use crate::spatial::SpatialIndex;

/// Serializable id of a registry handle.
pub fn object_id(entity: Entity) -> ObjectId {
    ObjectId(entity.to_bits().get())
}

/// Registry handle for a serialized id. The object may no longer exist.
pub fn entity_of(id: ObjectId) -> Option<Entity> {
    Entity::from_bits(id.0)
}

/// Everything needed to construct a space object.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSpec {
    pub kind: ObjectKind,
    /// Collision range; becomes the object's fixed radius.
    pub collision_range: f32,
    pub transform: Transform,
    pub faction: FactionId,
    pub call_sign: Option<String>,
    pub description: String,
    pub hull: Option<f32>,
    pub shields: Option<f32>,
    pub explosive: Option<Explosive>,
    /// Overrides the simulation's default significant range.
    pub significant_range: Option<f32>,
}

impl ObjectSpec {
    pub fn new(kind: ObjectKind, collision_range: f32) -> Self {
        Self {
            kind,
            collision_range,
            transform: Transform::default(),
            faction: FactionId::NEUTRAL,
            call_sign: None,
            description: String::new(),
            hull: None,
            shields: None,
            explosive: None,
            significant_range: None,
        }
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.transform.position = position;
        self
    }

    pub fn rotation(mut self, degrees: f32) -> Self {
        self.transform.rotation = normalize_degrees(degrees);
        self
    }

    pub fn velocity(mut self, velocity: Vec2) -> Self {
        self.transform.velocity = velocity;
        self
    }

    pub fn faction(mut self, faction: FactionId) -> Self {
        self.faction = faction;
        self
    }

    pub fn call_sign(mut self, call_sign: impl Into<String>) -> Self {
        self.call_sign = Some(call_sign.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn hull(mut self, hit_points: f32) -> Self {
        self.hull = Some(hit_points);
        self
    }

    pub fn shields(mut self, capacity: f32) -> Self {
        self.shields = Some(capacity);
        self
    }

    pub fn explosive(mut self, blast: BlastParams, kind: DamageType) -> Self {
        self.explosive = Some(Explosive { blast, kind });
        self
    }

    pub fn significant_range(mut self, range: f32) -> Self {
        self.significant_range = Some(range);
        self
    }
}

pub struct Registry {
    world: World,
    index: Box<dyn SpatialIndex>,
    /// Ids unregistered since the last replication frame.
    removed: Vec<ObjectId>,
}

impl Registry {
    pub fn new(index: Box<dyn SpatialIndex>) -> Self {
        Self {
            world: World::new(),
            index,
            removed: Vec::new(),
        }
    }

    /// Add an object and start tracking it in the spatial index.
    pub fn register(&mut self, spec: ObjectSpec, default_significant_range: f32) -> Entity {
        let radius = spec.collision_range.max(0.0);
        let descriptor = Descriptor {
            call_sign: spec.call_sign,
            description: spec.description,
        };
        let significant_range = spec
            .significant_range
            .unwrap_or(default_significant_range);

        let mut builder = EntityBuilder::new();
        builder
            .add(spec.kind)
            .add(spec.transform)
            .add(Collision { radius })
            .add(Allegiance(spec.faction))
            .add(descriptor)
            .add(Replicated::new(significant_range));
        if let Some(hp) = spec.hull {
            builder.add(Hull { current: hp, max: hp });
        }
        if let Some(capacity) = spec.shields {
            builder.add(Shields {
                current: capacity,
                max: capacity,
            });
        }
        if let Some(explosive) = spec.explosive {
            builder.add(explosive);
        }
        if spec.kind.is_player_ship() {
            builder.add(CommsSession::default());
        }
        let entity = self.world.spawn(builder.build());

        self.index
            .insert(entity, spec.transform.position, radius);
        entity
    }

    /// Remove an object from the index and the registry. Called once from
    /// the destruction path after the object's destruction hook ran.
    pub fn unregister(&mut self, entity: Entity) -> bool {
        if self.world.despawn(entity).is_err() {
            return false;
        }
        self.index.remove(entity);
        self.removed.push(object_id(entity));
        true
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.world.contains(entity)
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All live objects in ascending id order.
    pub fn ids(&self) -> Vec<Entity> {
        let mut ids: Vec<Entity> = self.world.iter().map(|e| e.entity()).collect();
        ids.sort_unstable_by_key(|id| id.to_bits());
        ids
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub(crate) fn take_removed(&mut self) -> Vec<ObjectId> {
        std::mem::take(&mut self.removed)
    }

    /// Broad-phase candidates overlapping `[min, max]`.
    pub fn query_area(&self, min: Vec2, max: Vec2) -> Vec<Entity> {
        self.index.query_area(min, max)
    }

    pub fn has<T: hecs::Component>(&self, entity: Entity) -> bool {
        self.world
            .entity(entity)
            .map(|e| e.has::<T>())
            .unwrap_or(false)
    }

    pub fn get<T: hecs::Component + Clone>(&self, entity: Entity) -> Option<T> {
        self.world
            .get::<&T>(entity)
            .ok()
            .map(|component| (*component).clone())
    }

    pub fn kind(&self, entity: Entity) -> Option<ObjectKind> {
        self.get::<ObjectKind>(entity)
    }

    pub fn transform(&self, entity: Entity) -> Option<Transform> {
        self.get::<Transform>(entity)
    }

    pub fn position(&self, entity: Entity) -> Option<Vec2> {
        self.transform(entity).map(|t| t.position)
    }

    pub fn radius(&self, entity: Entity) -> Option<f32> {
        self.get::<Collision>(entity).map(|c| c.radius)
    }

    pub fn faction(&self, entity: Entity) -> Option<FactionId> {
        self.get::<Allegiance>(entity).map(|a| a.0)
    }

    pub fn set_faction(&mut self, entity: Entity, faction: FactionId) -> bool {
        match self.world.query_one_mut::<&mut Allegiance>(entity) {
            Ok(allegiance) => {
                allegiance.0 = faction;
                true
            }
            Err(_) => false,
        }
    }

    fn with_transform(&mut self, entity: Entity, f: impl FnOnce(&mut Transform)) -> bool {
        match self.world.query_one_mut::<&mut Transform>(entity) {
            Ok(transform) => {
                f(transform);
                true
            }
            Err(_) => false,
        }
    }

    /// Move an object. The spatial index is updated before returning.
    pub fn set_position(&mut self, entity: Entity, position: Vec2) -> bool {
        if !self.with_transform(entity, |t| t.position = position) {
            return false;
        }
        let radius = self.radius(entity).unwrap_or(0.0);
        self.index.update(entity, position, radius);
        true
    }

    pub fn set_rotation(&mut self, entity: Entity, degrees: f32) -> bool {
        self.with_transform(entity, |t| t.rotation = normalize_degrees(degrees))
    }

    pub fn set_velocity(&mut self, entity: Entity, velocity: Vec2) -> bool {
        self.with_transform(entity, |t| t.velocity = velocity)
    }

    pub fn set_angular_velocity(&mut self, entity: Entity, degrees_per_sec: f32) -> bool {
        self.with_transform(entity, |t| t.angular_velocity = degrees_per_sec)
    }

    /// Explicit call sign, or one derived from kind and id.
    pub fn call_sign(&self, entity: Entity) -> Option<String> {
        let kind = self.kind(entity)?;
        let descriptor = self.get::<Descriptor>(entity)?;
        Some(
            descriptor
                .call_sign
                .unwrap_or_else(|| format!("{}{}", kind.call_sign_prefix(), entity.id())),
        )
    }

    pub fn set_call_sign(&mut self, entity: Entity, call_sign: impl Into<String>) -> bool {
        match self.world.query_one_mut::<&mut Descriptor>(entity) {
            Ok(descriptor) => {
                descriptor.call_sign = Some(call_sign.into());
                true
            }
            Err(_) => false,
        }
    }

    pub fn description(&self, entity: Entity) -> Option<String> {
        self.get::<Descriptor>(entity).map(|d| d.description)
    }

    pub fn set_description(&mut self, entity: Entity, description: impl Into<String>) -> bool {
        match self.world.query_one_mut::<&mut Descriptor>(entity) {
            Ok(descriptor) => {
                descriptor.description = description.into();
                true
            }
            Err(_) => false,
        }
    }
}
